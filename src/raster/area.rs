//! Cell-local polygon fragments and the point-in-polygon test.

use std::sync::Arc;

/// A position relative to one grid cell's bounding box, quantized to 16
/// bits per axis. x counts from the cell's west edge, y from its south
/// edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Point {
    pub x: u16,
    pub y: u16,
}

impl Point {
    pub fn new(x: u16, y: u16) -> Self {
        Self { x, y }
    }
}

/// The polygon fragments that one area covers within a single grid cell.
///
/// `outer` rings contribute positively and may represent several disjoint
/// pieces of the same area; `inner` rings are holes. Rings are implicitly
/// closed. Fragments are immutable, constructed only by the generator or
/// the deserializer.
#[derive(Debug, Clone, PartialEq)]
pub struct AreaFragment {
    id: Arc<str>,
    outer: Vec<Vec<Point>>,
    inner: Vec<Vec<Point>>,
}

impl AreaFragment {
    pub fn new(id: impl Into<Arc<str>>, outer: Vec<Vec<Point>>, inner: Vec<Vec<Point>>) -> Self {
        Self {
            id: id.into(),
            outer,
            inner,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub(crate) fn outer(&self) -> &[Vec<Point>] {
        &self.outer
    }

    pub(crate) fn inner(&self) -> &[Vec<Point>] {
        &self.inner
    }

    /// Whether the fragment covers the given point. Containment is purely
    /// geometric: holes and disjoint outer pieces compose additively, so a
    /// piece lying inside a hole counts again.
    pub fn covers(&self, point: Point) -> bool {
        let outer_hits = self.outer.iter().filter(|ring| is_in_polygon(point, ring)).count();
        let inner_hits = self.inner.iter().filter(|ring| is_in_polygon(point, ring)).count();
        outer_hits as i32 - inner_hits as i32 > 0
    }
}

// Winding number test after Dan Sunday's crossing algorithm
// (http://geomalgorithms.com/a03-_inclusion.html), on integer coordinates.
fn is_in_polygon(point: Point, ring: &[Point]) -> bool {
    let Some(&last) = ring.last() else {
        return false;
    };
    let mut wn = 0;
    let mut a = last;
    for &b in ring {
        if a.y <= point.y {
            if b.y > point.y && is_left_of(point, a, b) > 0 {
                wn += 1;
            }
        } else if b.y <= point.y && is_left_of(point, a, b) < 0 {
            wn -= 1;
        }
        a = b;
    }
    wn != 0
}

// widened to i64 so products of two 16-bit-range deltas cannot overflow
fn is_left_of(p: Point, a: Point, b: Point) -> i64 {
    (b.x as i64 - a.x as i64) * (p.y as i64 - a.y as i64)
        - (p.x as i64 - a.x as i64) * (b.y as i64 - a.y as i64)
}

#[cfg(test)]
mod tests {
    use super::*;

    const BIG_SQUARE: [(u16, u16); 4] = [(0, 0), (0, 10), (10, 10), (10, 0)];
    const HOLE: [(u16, u16); 4] = [(2, 2), (2, 8), (8, 8), (8, 2)];
    const SMALL_SQUARE: [(u16, u16); 4] = [(4, 4), (4, 6), (6, 6), (6, 4)];

    fn ring(points: &[(u16, u16)]) -> Vec<Point> {
        points.iter().map(|&(x, y)| Point::new(x, y)).collect()
    }

    #[test]
    fn covers_simple_polygon() {
        let area = AreaFragment::new("A", vec![ring(&BIG_SQUARE)], vec![]);
        assert!(area.covers(Point::new(5, 5)));
    }

    #[test]
    fn does_not_cover_point_outside() {
        let area = AreaFragment::new("A", vec![ring(&BIG_SQUARE)], vec![]);
        assert!(!area.covers(Point::new(11, 5)));
    }

    #[test]
    fn does_not_cover_hole() {
        let area = AreaFragment::new("A", vec![ring(&BIG_SQUARE)], vec![ring(&HOLE)]);
        assert!(!area.covers(Point::new(5, 5)));
    }

    #[test]
    fn covers_piece_inside_hole() {
        let area = AreaFragment::new(
            "A",
            vec![ring(&BIG_SQUARE), ring(&SMALL_SQUARE)],
            vec![ring(&HOLE)],
        );
        assert!(area.covers(Point::new(5, 5)));
    }

    #[test]
    fn covers_any_of_disjoint_pieces() {
        let left = ring(&[(0, 0), (0, 4), (4, 4), (4, 0)]);
        let right = ring(&[(6, 6), (6, 9), (9, 9), (9, 6)]);
        let area = AreaFragment::new("A", vec![left, right], vec![]);
        assert!(area.covers(Point::new(2, 2)));
        assert!(area.covers(Point::new(7, 7)));
        assert!(!area.covers(Point::new(5, 5)));
    }

    #[test]
    fn empty_ring_covers_nothing() {
        let area = AreaFragment::new("A", vec![vec![]], vec![]);
        assert!(!area.covers(Point::new(0, 0)));
    }

    #[test]
    fn winding_handles_extreme_coordinates_without_overflow() {
        let huge = ring(&[(0, 0), (0, 65535), (65535, 65535), (65535, 0)]);
        let area = AreaFragment::new("A", vec![huge], vec![]);
        assert!(area.covers(Point::new(32768, 32768)));
        assert!(area.covers(Point::new(1, 65534)));
    }
}
