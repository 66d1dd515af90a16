//! One cell of the boundaries raster.

use std::sync::Arc;

use hashbrown::HashSet;

use super::area::{AreaFragment, Point};

/// One rectangular tile of the world grid.
///
/// Ids in `containing_ids` are guaranteed to cover the whole cell and
/// resolve without any geometry test. Areas in `areas` cover the cell only
/// partially and carry the local polygon fragments for an exact test. The
/// two id sets are disjoint; both may be empty (open ocean).
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Cell {
    containing_ids: Vec<Arc<str>>,
    areas: Vec<AreaFragment>,
}

impl Cell {
    pub fn new(containing_ids: Vec<Arc<str>>, areas: Vec<AreaFragment>) -> Self {
        Self {
            containing_ids,
            areas,
        }
    }

    pub(crate) fn containing_ids(&self) -> &[Arc<str>] {
        &self.containing_ids
    }

    pub(crate) fn areas(&self) -> &[AreaFragment] {
        &self.areas
    }

    pub(crate) fn contains_id(&self, id: &str) -> bool {
        self.containing_ids.iter().any(|c| c.as_ref() == id)
    }

    /// Whether the given point is covered by any of the given ids.
    pub(crate) fn is_in_any(&self, point: Point, ids: &HashSet<&str>) -> bool {
        self.containing_ids.iter().any(|id| ids.contains(id.as_ref()))
            || self
                .areas
                .iter()
                .any(|area| ids.contains(area.id()) && area.covers(point))
    }

    /// All ids that cover the given point, in no particular order.
    pub(crate) fn ids_at(&self, point: Point) -> Vec<&str> {
        self.containing_ids
            .iter()
            .map(|id| id.as_ref())
            .chain(
                self.areas
                    .iter()
                    .filter(|area| area.covers(point))
                    .map(|area| area.id()),
            )
            .collect()
    }

    /// All ids that completely or partly cover this cell.
    pub(crate) fn all_ids(&self) -> impl Iterator<Item = &str> + '_ {
        self.containing_ids
            .iter()
            .map(|id| id.as_ref())
            .chain(self.areas.iter().map(|area| area.id()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(values: &[&str]) -> Vec<Arc<str>> {
        values.iter().map(|&v| Arc::from(v)).collect()
    }

    fn square_b() -> Vec<AreaFragment> {
        let ring = vec![
            Point::new(0, 0),
            Point::new(0, 2),
            Point::new(2, 2),
            Point::new(2, 0),
        ];
        vec![AreaFragment::new("B", vec![ring], vec![])]
    }

    #[test]
    fn returns_definite_ids() {
        let cell = Cell::new(ids(&["A", "C"]), vec![]);
        assert_eq!(vec!["A", "C"], cell.ids_at(Point::new(0, 0)));
    }

    #[test]
    fn returns_in_geometry_ids() {
        let cell = Cell::new(vec![], square_b());
        assert_eq!(vec!["B"], cell.ids_at(Point::new(1, 1)));
    }

    #[test]
    fn does_not_return_out_of_geometry_ids() {
        let cell = Cell::new(vec![], square_b());
        assert!(cell.ids_at(Point::new(4, 4)).is_empty());
    }

    #[test]
    fn returns_definite_and_in_geometry_ids() {
        let cell = Cell::new(ids(&["A"]), square_b());
        assert_eq!(vec!["A", "B"], cell.ids_at(Point::new(1, 1)));
    }

    #[test]
    fn all_ids_ignores_geometry() {
        let cell = Cell::new(ids(&["A"]), square_b());
        let all: Vec<&str> = cell.all_ids().collect();
        assert_eq!(vec!["A", "B"], all);
    }

    #[test]
    fn is_in_any_checks_definite_ids_first() {
        let cell = Cell::new(ids(&["A"]), square_b());
        let wanted: HashSet<&str> = ["A"].into_iter().collect();
        // point outside B's square, A still matches without a geometry test
        assert!(cell.is_in_any(Point::new(9, 9), &wanted));
    }

    #[test]
    fn is_in_any_tests_fragment_geometry() {
        let cell = Cell::new(vec![], square_b());
        let wanted: HashSet<&str> = ["B", "X"].into_iter().collect();
        assert!(cell.is_in_any(Point::new(1, 1), &wanted));
        assert!(!cell.is_in_any(Point::new(4, 4), &wanted));
    }

    #[test]
    fn is_in_any_ignores_unrequested_ids() {
        let cell = Cell::new(ids(&["A"]), square_b());
        let wanted: HashSet<&str> = ["Z"].into_iter().collect();
        assert!(!cell.is_in_any(Point::new(1, 1), &wanted));
    }
}
