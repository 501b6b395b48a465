// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Overlap-resolving wall insertion.
//!
//! Every wall added by drawing, offsetting or applying a suggestion goes
//! through [`insert_wall`]. The candidate's interval on its line has the
//! intervals of all collinear walls subtracted, and only the uncovered
//! sub-runs are stored, so no grid point is ever covered twice.

use serde::Serialize;

use crate::error::{Error, Result};
use crate::geometry::{subtract_interval, Interval};
use crate::types::{Segment, Wall, WallLine};

/// What an insertion actually added
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InsertOutcome {
    pub added_segments: usize,
    pub added_cells: i32,
    /// Part of the candidate already covered by existing walls
    pub removed_cells: i32,
}

impl InsertOutcome {
    pub fn is_noop(&self) -> bool {
        self.added_segments == 0
    }
}

/// Sub-intervals of `line` not covered by any collinear wall in `walls`
pub fn uncovered_intervals<'a, I>(line: &WallLine, walls: I) -> Vec<Interval>
where
    I: IntoIterator<Item = &'a Wall>,
{
    let mut intervals = vec![Interval::new(line.start, line.end)];

    for existing in walls {
        let other = existing.line();
        if !other.shares_line(line) {
            continue;
        }
        intervals = subtract_interval(&intervals, other.start, other.end);
        if intervals.is_empty() {
            break;
        }
    }

    intervals.retain(|i| i.length() > 0);
    intervals
}

/// Insert `candidate`, appending one wall per uncovered sub-interval.
///
/// Zero-length and diagonal candidates are refused with
/// [`Error::InvalidGeometry`] and leave `walls` untouched.
pub fn insert_wall(walls: &mut Vec<Wall>, candidate: Segment) -> Result<InsertOutcome> {
    let line = candidate.line().ok_or(Error::InvalidGeometry)?;
    let intervals = uncovered_intervals(&line, walls.iter());

    let mut outcome = InsertOutcome::default();
    for interval in &intervals {
        let wall = Wall::from_segment(line.segment(interval.start, interval.end))?;
        walls.push(wall);
        outcome.added_segments += 1;
        outcome.added_cells += interval.length();
    }
    outcome.removed_cells = line.length() - outcome.added_cells;

    if outcome.removed_cells > 0 {
        tracing::debug!(
            removed_cells = outcome.removed_cells,
            added_segments = outcome.added_segments,
            "Trimmed overlapping wall coverage"
        );
    }

    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Orientation;

    fn assert_no_overlap(walls: &[Wall]) {
        for (i, a) in walls.iter().enumerate() {
            for b in walls.iter().skip(i + 1) {
                let (la, lb) = (a.line(), b.line());
                if la.shares_line(&lb) {
                    assert!(
                        la.end <= lb.start || lb.end <= la.start,
                        "overlap between {:?} and {:?}",
                        a,
                        b
                    );
                }
            }
        }
    }

    #[test]
    fn inserts_clean_wall() {
        let mut walls = Vec::new();
        let outcome = insert_wall(&mut walls, Segment::new(0, 0, 5, 0)).unwrap();
        assert_eq!(outcome, InsertOutcome { added_segments: 1, added_cells: 5, removed_cells: 0 });
        assert_eq!(walls.len(), 1);
        assert!(walls[0].features().is_empty());
    }

    #[test]
    fn rejects_invalid_geometry() {
        let mut walls = Vec::new();
        assert_eq!(insert_wall(&mut walls, Segment::new(0, 0, 3, 3)), Err(Error::InvalidGeometry));
        assert_eq!(insert_wall(&mut walls, Segment::new(1, 1, 1, 1)), Err(Error::InvalidGeometry));
        assert!(walls.is_empty());
    }

    #[test]
    fn second_identical_insert_is_fully_removed() {
        let mut walls = Vec::new();
        insert_wall(&mut walls, Segment::new(0, 0, 5, 0)).unwrap();
        let before = walls.clone();

        let outcome = insert_wall(&mut walls, Segment::new(5, 0, 0, 0)).unwrap();
        assert_eq!(outcome.removed_cells, 5);
        assert!(outcome.is_noop());
        assert_eq!(walls, before);
    }

    #[test]
    fn splits_around_existing_coverage() {
        let mut walls = Vec::new();
        insert_wall(&mut walls, Segment::new(3, 2, 5, 2)).unwrap();
        let outcome = insert_wall(&mut walls, Segment::new(0, 2, 9, 2)).unwrap();

        assert_eq!(outcome.added_segments, 2);
        assert_eq!(outcome.added_cells, 7);
        assert_eq!(outcome.removed_cells, 2);
        assert_eq!(walls[1].line().start, 0);
        assert_eq!(walls[1].line().end, 3);
        assert_eq!(walls[2].line().start, 5);
        assert_eq!(walls[2].line().end, 9);
        assert_no_overlap(&walls);
    }

    #[test]
    fn other_lines_are_ignored() {
        let mut walls = Vec::new();
        insert_wall(&mut walls, Segment::new(0, 0, 5, 0)).unwrap();
        insert_wall(&mut walls, Segment::new(0, 1, 5, 1)).unwrap();
        insert_wall(&mut walls, Segment::new(2, -3, 2, 3)).unwrap();
        assert_eq!(walls.len(), 3);
        assert_eq!(walls[2].orientation(), Orientation::Vertical);
    }

    #[test]
    fn random_sequence_keeps_invariant() {
        let candidates = [
            Segment::new(0, 0, 10, 0),
            Segment::new(4, 0, 14, 0),
            Segment::new(-3, 0, 2, 0),
            Segment::new(1, 0, 12, 0),
            Segment::new(0, 0, 0, 8),
            Segment::new(0, 4, 0, -2),
            Segment::new(0, 10, 0, 3),
        ];
        let mut walls = Vec::new();
        for candidate in candidates {
            insert_wall(&mut walls, candidate).unwrap();
            assert_no_overlap(&walls);
        }
    }
}
