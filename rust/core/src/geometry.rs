// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Grid geometry: point-on-wall tests, orthogonal intersections, 1-D
//! interval arithmetic and enclosed-area flood fill.

use std::collections::VecDeque;

use rustc_hash::FxHashMap;

use crate::types::{Orientation, Point, Wall, WallLine};

/// Padding around the wall bounding box so the flood fill can walk around
/// the outside of the plan
const FLOOD_PADDING: i32 = 2;

/// Half-open 1-D interval `[start, end)` on a wall line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Interval {
    pub start: i32,
    pub end: i32,
}

impl Interval {
    pub fn new(start: i32, end: i32) -> Self {
        Self { start, end }
    }

    pub fn length(&self) -> i32 {
        self.end - self.start
    }
}

/// True when `point` lies on the wall, both ends included
pub fn is_point_on_wall(point: Point, wall: &Wall) -> bool {
    let line = wall.line();
    match line.orientation {
        Orientation::Horizontal => point.y == line.offset && point.x >= line.start && point.x <= line.end,
        Orientation::Vertical => point.x == line.offset && point.y >= line.start && point.y <= line.end,
    }
}

/// Crossing point of two orthogonal walls, ends included. Parallel walls
/// never intersect here, even when collinear.
pub fn intersection_point(a: &Wall, b: &Wall) -> Option<Point> {
    let (h, v) = match (a.orientation(), b.orientation()) {
        (Orientation::Horizontal, Orientation::Vertical) => (a.line(), b.line()),
        (Orientation::Vertical, Orientation::Horizontal) => (b.line(), a.line()),
        _ => return None,
    };

    let x = v.offset;
    let y = h.offset;
    if x >= h.start && x <= h.end && y >= v.start && y <= v.end {
        Some(Point::new(x, y))
    } else {
        None
    }
}

/// Remove `[other_start, other_end)` from every interval, keeping the
/// remaining sub-runs in order
pub fn subtract_interval(intervals: &[Interval], other_start: i32, other_end: i32) -> Vec<Interval> {
    let mut result = Vec::with_capacity(intervals.len() + 1);

    for segment in intervals {
        if segment.end <= other_start || segment.start >= other_end {
            result.push(*segment);
            continue;
        }
        if other_start > segment.start {
            result.push(Interval::new(segment.start, other_start));
        }
        if other_end < segment.end {
            result.push(Interval::new(other_end, segment.end));
        }
    }

    result
}

/// Sort and coalesce touching or overlapping intervals
pub fn merge_intervals(mut intervals: Vec<Interval>) -> Vec<Interval> {
    intervals.sort_by_key(|i| (i.start, i.end));
    let mut merged: Vec<Interval> = Vec::with_capacity(intervals.len());

    for interval in intervals {
        match merged.last_mut() {
            Some(last) if interval.start <= last.end => {
                last.end = last.end.max(interval.end);
            }
            _ => merged.push(interval),
        }
    }

    merged
}

/// Merged wall coverage per `(orientation, offset)` line
#[derive(Debug, Default)]
pub struct LineCoverage {
    lines: FxHashMap<(Orientation, i32), Vec<Interval>>,
}

impl LineCoverage {
    pub fn from_walls(walls: &[Wall]) -> Self {
        let mut raw: FxHashMap<(Orientation, i32), Vec<Interval>> = FxHashMap::default();
        for wall in walls {
            let line = wall.line();
            raw.entry((line.orientation, line.offset))
                .or_default()
                .push(Interval::new(line.start, line.end));
        }

        let lines = raw
            .into_iter()
            .map(|(key, intervals)| (key, merge_intervals(intervals)))
            .collect();

        Self { lines }
    }

    /// True when the whole of `line` is already covered by walls
    pub fn covers(&self, line: &WallLine) -> bool {
        self.lines
            .get(&(line.orientation, line.offset))
            .map(|intervals| {
                intervals
                    .iter()
                    .any(|i| i.start <= line.start && i.end >= line.end)
            })
            .unwrap_or(false)
    }
}

/// Count grid cells enclosed by walls.
///
/// The padded bounding box is cut along every wall coordinate into
/// rectangular blocks, so the fill visits O(W²) blocks however far apart
/// the walls lie. Walls are barriers on block edges; a 4-connected flood
/// fill from the padded top-left block marks everything reachable from
/// outside. Cells of blocks never reached are enclosed.
pub fn enclosed_area_cells(walls: &[Wall]) -> usize {
    let Some((min, max)) = bounds(walls) else {
        return 0;
    };

    let mut xs = vec![min.x - FLOOD_PADDING, max.x + FLOOD_PADDING];
    let mut ys = vec![min.y - FLOOD_PADDING, max.y + FLOOD_PADDING];
    for wall in walls {
        xs.extend([wall.start().x, wall.end().x]);
        ys.extend([wall.start().y, wall.end().y]);
    }
    xs.sort_unstable();
    xs.dedup();
    ys.sort_unstable();
    ys.dedup();

    let (cols, rows) = (xs.len() - 1, ys.len() - 1);
    // Every wall coordinate is in the lists
    let slot = |coords: &[i32], c: i32| coords.binary_search(&c).unwrap_or_else(|i| i);

    // (j * cols + i): wall along y = ys[j] over block column i
    let mut horizontal_edges = vec![false; ys.len() * cols];
    // (j * xs.len() + i): wall along x = xs[i] over block row j
    let mut vertical_edges = vec![false; rows * xs.len()];

    for wall in walls {
        let line = wall.line();
        match line.orientation {
            Orientation::Horizontal => {
                let j = slot(&ys, line.offset);
                for i in slot(&xs, line.start)..slot(&xs, line.end) {
                    horizontal_edges[j * cols + i] = true;
                }
            }
            Orientation::Vertical => {
                let i = slot(&xs, line.offset);
                for j in slot(&ys, line.start)..slot(&ys, line.end) {
                    vertical_edges[j * xs.len() + i] = true;
                }
            }
        }
    }

    let mut visited = vec![false; cols * rows];
    let mut queue = VecDeque::from([(0usize, 0usize)]);
    visited[0] = true;

    // Block (i, j) spans [xs[i], xs[i+1]] x [ys[j], ys[j+1]]
    while let Some((i, j)) = queue.pop_front() {
        let neighbors = [
            (i + 1 < cols && !vertical_edges[j * xs.len() + i + 1]).then(|| (i + 1, j)),
            (i > 0 && !vertical_edges[j * xs.len() + i]).then(|| (i - 1, j)),
            (j + 1 < rows && !horizontal_edges[(j + 1) * cols + i]).then(|| (i, j + 1)),
            (j > 0 && !horizontal_edges[j * cols + i]).then(|| (i, j - 1)),
        ];
        for (ni, nj) in neighbors.into_iter().flatten() {
            let idx = nj * cols + ni;
            if !visited[idx] {
                visited[idx] = true;
                queue.push_back((ni, nj));
            }
        }
    }

    let mut enclosed: u64 = 0;
    for j in 0..rows {
        for i in 0..cols {
            if !visited[j * cols + i] {
                let width = u64::from(xs[i + 1].abs_diff(xs[i]));
                let height = u64::from(ys[j + 1].abs_diff(ys[j]));
                enclosed += width * height;
            }
        }
    }
    usize::try_from(enclosed).unwrap_or(usize::MAX)
}

/// Bounding box of all wall endpoints
pub fn bounds(walls: &[Wall]) -> Option<(Point, Point)> {
    let mut points = walls.iter().flat_map(|w| [w.start(), w.end()]);
    let first = points.next()?;
    let (mut min, mut max) = (first, first);
    for p in points {
        min.x = min.x.min(p.x);
        min.y = min.y.min(p.y);
        max.x = max.x.max(p.x);
        max.y = max.y.max(p.y);
    }
    Some((min, max))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wall(x1: i32, y1: i32, x2: i32, y2: i32) -> Wall {
        Wall::new(Point::new(x1, y1), Point::new(x2, y2)).unwrap()
    }

    fn square(size: i32) -> Vec<Wall> {
        vec![
            wall(0, 0, size, 0),
            wall(size, 0, size, size),
            wall(size, size, 0, size),
            wall(0, size, 0, 0),
        ]
    }

    #[test]
    fn point_on_wall_includes_ends() {
        let w = wall(0, 2, 4, 2);
        assert!(is_point_on_wall(Point::new(0, 2), &w));
        assert!(is_point_on_wall(Point::new(4, 2), &w));
        assert!(is_point_on_wall(Point::new(2, 2), &w));
        assert!(!is_point_on_wall(Point::new(5, 2), &w));
        assert!(!is_point_on_wall(Point::new(2, 3), &w));
    }

    #[test]
    fn orthogonal_intersection() {
        let h = wall(0, 2, 6, 2);
        let v = wall(3, 0, 3, 5);
        assert_eq!(intersection_point(&h, &v), Some(Point::new(3, 2)));
        assert_eq!(intersection_point(&v, &h), Some(Point::new(3, 2)));
        assert_eq!(intersection_point(&h, &wall(0, 4, 6, 4)), None);
        assert_eq!(intersection_point(&h, &wall(7, 0, 7, 5)), None);
    }

    #[test]
    fn subtract_splits_interval() {
        let result = subtract_interval(&[Interval::new(0, 10)], 3, 5);
        assert_eq!(result, vec![Interval::new(0, 3), Interval::new(5, 10)]);

        let untouched = subtract_interval(&[Interval::new(0, 3)], 3, 5);
        assert_eq!(untouched, vec![Interval::new(0, 3)]);

        let gone = subtract_interval(&[Interval::new(2, 4)], 0, 10);
        assert!(gone.is_empty());
    }

    #[test]
    fn merge_coalesces_touching() {
        let merged = merge_intervals(vec![
            Interval::new(4, 6),
            Interval::new(0, 2),
            Interval::new(2, 3),
        ]);
        assert_eq!(merged, vec![Interval::new(0, 3), Interval::new(4, 6)]);
    }

    #[test]
    fn coverage_spans_split_walls() {
        let walls = vec![wall(0, 0, 3, 0), wall(3, 0, 6, 0)];
        let coverage = LineCoverage::from_walls(&walls);
        assert!(coverage.covers(&wall(1, 0, 5, 0).line()));
        assert!(!coverage.covers(&wall(1, 0, 7, 0).line()));
        assert!(!coverage.covers(&wall(1, 1, 5, 1).line()));
    }

    #[test]
    fn square_encloses_interior() {
        assert_eq!(enclosed_area_cells(&square(4)), 16);
        assert_eq!(enclosed_area_cells(&square(5)), 25);
    }

    #[test]
    fn open_plan_encloses_nothing() {
        assert_eq!(enclosed_area_cells(&[]), 0);
        assert_eq!(enclosed_area_cells(&[wall(0, 0, 5, 0)]), 0);

        let mut u_shape = square(4);
        u_shape.pop();
        assert_eq!(enclosed_area_cells(&u_shape), 0);
    }

    #[test]
    fn distant_walls_do_not_blow_up_the_fill() {
        use crate::types::COORD_LIMIT;

        assert_eq!(enclosed_area_cells(&square(COORD_LIMIT)), (COORD_LIMIT as usize).pow(2));

        let far_apart = vec![wall(-COORD_LIMIT, 0, -COORD_LIMIT + 3, 0), wall(COORD_LIMIT, 0, COORD_LIMIT, 5)];
        assert_eq!(enclosed_area_cells(&far_apart), 0);
    }

    #[test]
    fn two_rooms_sharing_a_wall() {
        let mut walls = square(4);
        walls.extend([wall(4, 0, 10, 0), wall(10, 0, 10, 4), wall(10, 4, 4, 4)]);
        assert_eq!(enclosed_area_cells(&walls), 40);
    }

    #[test]
    fn split_walls_still_enclose() {
        let walls = vec![
            wall(0, 0, 2, 0),
            wall(2, 0, 4, 0),
            wall(4, 0, 4, 4),
            wall(4, 4, 0, 4),
            wall(0, 4, 0, 0),
        ];
        assert_eq!(enclosed_area_cells(&walls), 16);
    }
}
