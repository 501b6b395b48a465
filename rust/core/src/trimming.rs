// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Wall trimming.
//!
//! [`plan_trim`] cuts a span out of a wall between the intersections that
//! surround a target coordinate. [`trim_extensions`] pulls short overshoots
//! past a crossing wall back to the crossing.

use serde::Serialize;

use crate::error::{Error, Result};
use crate::geometry::intersection_point;
use crate::openings::SPAN_TOLERANCE;
use crate::types::{Feature, Point, Wall};

/// Tolerance when comparing a fractional target against grid coordinates
const TARGET_EPSILON: f64 = 1e-9;

/// Result of a successful trim
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrimOutcome {
    pub removed_cells: i32,
    pub resulting_segments: usize,
    pub removed_features: usize,
}

/// Walls that replace a trimmed wall, computed without touching the plan
#[derive(Debug, Clone, PartialEq)]
pub struct TrimPlan {
    pub index: usize,
    pub replacements: Vec<Wall>,
    pub outcome: TrimOutcome,
}

/// Redistribute features of a wall of `wall_length` onto retained pieces.
///
/// `pieces` are `(t0, t1)` distances from the original wall start. A
/// feature survives only when its whole span fits inside one piece; its
/// position is renormalized to that piece. Returns per-piece features and
/// the number dropped.
pub fn partition_features(
    features: &[Feature],
    wall_length: f64,
    pieces: &[(i32, i32)],
) -> (Vec<Vec<Feature>>, usize) {
    let mut kept: Vec<Vec<Feature>> = vec![Vec::new(); pieces.len()];
    let mut dropped = 0;

    for feature in features {
        let (start, end) = feature.span_cells(wall_length);
        let center = feature.position * wall_length;

        let home = pieces.iter().position(|&(t0, t1)| {
            start >= t0 as f64 - SPAN_TOLERANCE && end <= t1 as f64 + SPAN_TOLERANCE
        });

        match home {
            Some(i) => {
                let (t0, t1) = pieces[i];
                let mut moved = feature.clone();
                moved.position = ((center - t0 as f64) / (t1 - t0) as f64).clamp(0.0, 1.0);
                kept[i].push(moved);
            }
            None => dropped += 1,
        }
    }

    (kept, dropped)
}

/// Convert absolute axis spans on `wall`'s line into sorted `(t0, t1)`
/// distances from the wall start. Empty spans are skipped.
pub fn pieces_along<I>(wall: &Wall, spans: I) -> Vec<(i32, i32)>
where
    I: IntoIterator<Item = (i32, i32)>,
{
    let mut pieces: Vec<(i32, i32)> = spans
        .into_iter()
        .filter(|(a, b)| b > a)
        .map(|(a, b)| {
            let ta = wall.param_of(a as f64) as i32;
            let tb = wall.param_of(b as f64) as i32;
            (ta.min(tb), ta.max(tb))
        })
        .collect();
    pieces.sort_unstable();
    pieces
}

/// Cut `wall` into `pieces`, carrying over the features that fit.
/// Returns the new walls and the number of features dropped.
pub fn cut_wall(wall: &Wall, pieces: &[(i32, i32)]) -> Result<(Vec<Wall>, usize)> {
    let (features, dropped) = partition_features(wall.features(), wall.length() as f64, pieces);

    let mut walls = Vec::with_capacity(pieces.len());
    for (&(t0, t1), features) in pieces.iter().zip(features) {
        walls.push(wall.sub_wall(t0, t1)?.with_features(features));
    }
    Ok((walls, dropped))
}

/// Plan removal of the span around `target` (an axis coordinate: `x` for
/// horizontal walls, `y` for vertical ones).
///
/// Each side of the removed span stops at the nearest orthogonal
/// intersection; a side with no intersection stops `gap_cells / 2` from the
/// target, rounded outward to the grid.
pub fn plan_trim(walls: &[Wall], index: usize, target: f64, gap_cells: f64) -> Result<TrimPlan> {
    let wall = walls.get(index).ok_or(Error::MissingWall(index))?;
    if wall.length() <= 0 || !target.is_finite() {
        return Err(Error::UnsupportedWall);
    }

    let line = wall.line();
    if target <= line.start as f64 + TARGET_EPSILON || target >= line.end as f64 - TARGET_EPSILON {
        return Err(Error::Edge);
    }

    let mut left: Option<i32> = None;
    let mut right: Option<i32> = None;

    for (other_index, other) in walls.iter().enumerate() {
        if other_index == index {
            continue;
        }
        let Some(point) = intersection_point(wall, other) else {
            continue;
        };
        let c = wall.axis_coord(point);
        let cf = c as f64;
        if (cf - target).abs() <= TARGET_EPSILON {
            return Err(Error::Intersection);
        }
        if cf < target {
            left = Some(left.map_or(c, |l| l.max(c)));
        } else {
            right = Some(right.map_or(c, |r| r.min(c)));
        }
    }

    let half = gap_cells / 2.0;
    let left = left.unwrap_or_else(|| ((target - half).floor() as i32).max(line.start));
    let right = right.unwrap_or_else(|| ((target + half).ceil() as i32).min(line.end));

    if right - left <= 0 {
        return Err(Error::NoSpan);
    }

    let pieces = pieces_along(wall, [(line.start, left), (right, line.end)]);
    let (replacements, removed_features) = cut_wall(wall, &pieces)?;

    Ok(TrimPlan {
        index,
        outcome: TrimOutcome {
            removed_cells: right - left,
            resulting_segments: replacements.len(),
            removed_features,
        },
        replacements,
    })
}

/// Replace `walls[index]` with `replacements` in place and keep the
/// selected index pointing at the same wall. Selecting the replaced wall
/// clears the selection.
pub fn splice_walls(
    walls: &mut Vec<Wall>,
    selected: &mut Option<usize>,
    index: usize,
    replacements: Vec<Wall>,
) {
    let added = replacements.len();
    walls.splice(index..=index, replacements);

    *selected = match *selected {
        Some(s) if s == index => None,
        Some(s) if s > index => Some(s + added - 1),
        other => other,
    };
}

/// Result of [`trim_extensions`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtensionTrimOutcome {
    pub trims: usize,
    pub removed_features: usize,
}

/// Move the nearer end of `wall` onto `point` when it overshoots by at most
/// `threshold` cells. Returns dropped feature count, or `None` when the
/// wall was left alone.
fn pull_back_to(wall: &mut Wall, point: Point, threshold: i32) -> Option<usize> {
    let dist_start = wall.start().manhattan_to(&point);
    let dist_end = wall.end().manhattan_to(&point);

    let (start, end, piece) = if dist_start > 0 && dist_start <= threshold && dist_start <= dist_end {
        (point, wall.end(), (dist_start, wall.length()))
    } else if dist_end > 0 && dist_end <= threshold && dist_end < dist_start {
        (wall.start(), point, (0, wall.length() - dist_end))
    } else {
        return None;
    };

    let (mut features, dropped) =
        partition_features(wall.features(), wall.length() as f64, &[piece]);
    wall.set_endpoints(start, end).ok()?;
    *wall.features_mut() = features.pop().unwrap_or_default();
    Some(dropped)
}

/// Pull back wall ends that overshoot a crossing wall by up to `threshold`
/// cells. Only shortens walls, so the no-overlap invariant holds.
pub fn trim_extensions(walls: &mut [Wall], threshold: i32) -> ExtensionTrimOutcome {
    let mut outcome = ExtensionTrimOutcome::default();

    for i in 0..walls.len() {
        for j in (i + 1)..walls.len() {
            let Some(point) = intersection_point(&walls[i], &walls[j]) else {
                continue;
            };
            for k in [i, j] {
                if let Some(dropped) = pull_back_to(&mut walls[k], point, threshold) {
                    outcome.trims += 1;
                    outcome.removed_features += dropped;
                }
            }
        }
    }

    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::OpeningKind;
    use approx::assert_relative_eq;

    fn wall(x1: i32, y1: i32, x2: i32, y2: i32) -> Wall {
        Wall::new(Point::new(x1, y1), Point::new(x2, y2)).unwrap()
    }

    fn window(position: f64, length_cells: f64) -> Feature {
        Feature {
            kind: OpeningKind::Window,
            position,
            length_cells,
            width_units: length_cells / 2.0,
            height_units: 1.0,
            area: length_cells / 2.0,
        }
    }

    #[test]
    fn zero_gap_needs_a_fractional_target() {
        let walls = [wall(0, 0, 10, 0)];
        assert_eq!(plan_trim(&walls, 0, 5.0, 0.0).unwrap_err(), Error::NoSpan);

        let plan = plan_trim(&walls, 0, 5.5, 0.0).unwrap();
        assert_eq!(plan.outcome.removed_cells, 1);
        assert_eq!(plan.replacements[0].segment(), crate::types::Segment::new(0, 0, 5, 0));
        assert_eq!(plan.replacements[1].segment(), crate::types::Segment::new(6, 0, 10, 0));
    }

    #[test]
    fn isolated_midpoint_trim_splits_in_two() {
        let host = wall(0, 0, 10, 0).with_features(vec![window(0.2, 2.0), window(0.5, 2.0)]);
        let plan = plan_trim(&[host], 0, 5.0, 1.0).unwrap();

        assert_eq!(plan.outcome.resulting_segments, 2);
        assert_eq!(plan.outcome.removed_cells, 2);
        assert_eq!(plan.outcome.removed_features, 1);
        assert_eq!(plan.replacements[0].segment(), crate::types::Segment::new(0, 0, 4, 0));
        assert_eq!(plan.replacements[1].segment(), crate::types::Segment::new(6, 0, 10, 0));

        // Window centered at 2 of 10 keeps its absolute place on the 4-cell piece
        let kept = &plan.replacements[0].features()[0];
        assert_relative_eq!(kept.position, 0.5);
        assert!(plan.replacements[1].features().is_empty());
    }

    #[test]
    fn trim_between_intersections() {
        let walls = vec![
            wall(0, 0, 10, 0),
            wall(2, -1, 2, 3),
            wall(7, -1, 7, 3),
        ];
        let plan = plan_trim(&walls, 0, 4.5, 1.0).unwrap();
        assert_eq!(plan.outcome.removed_cells, 5);
        assert_eq!(plan.replacements.len(), 2);
        assert_eq!(plan.replacements[0].line().end, 2);
        assert_eq!(plan.replacements[1].line().start, 7);
    }

    #[test]
    fn rectangle_side_is_removed_entirely() {
        let walls = vec![
            wall(0, 0, 5, 0),
            wall(5, 0, 5, 5),
            wall(5, 5, 0, 5),
            wall(0, 5, 0, 0),
        ];
        let plan = plan_trim(&walls, 0, 2.5, 1.0).unwrap();
        assert!(plan.replacements.is_empty());
        assert_eq!(plan.outcome.removed_cells, 5);
    }

    #[test]
    fn refuses_endpoint_and_junction_targets() {
        let walls = vec![wall(0, 0, 10, 0), wall(4, 0, 4, 5)];
        assert_eq!(plan_trim(&walls, 0, 0.0, 1.0), Err(Error::Edge));
        assert_eq!(plan_trim(&walls, 0, 10.0, 1.0), Err(Error::Edge));
        assert_eq!(plan_trim(&walls, 0, 12.0, 1.0), Err(Error::Edge));
        assert_eq!(plan_trim(&walls, 0, 4.0, 1.0), Err(Error::Intersection));
        assert_eq!(plan_trim(&walls, 7, 4.0, 1.0), Err(Error::MissingWall(7)));
    }

    #[test]
    fn reversed_wall_keeps_direction() {
        let host = wall(0, 10, 0, 0).with_features(vec![window(0.1, 1.0)]);
        let plan = plan_trim(&[host], 0, 5.0, 1.0).unwrap();
        assert_eq!(plan.replacements.len(), 2);
        // First piece starts where the original started
        assert_eq!(plan.replacements[0].start(), Point::new(0, 10));
        assert_eq!(plan.replacements[0].end(), Point::new(0, 6));
        assert_eq!(plan.replacements[0].features().len(), 1);
        assert_relative_eq!(plan.replacements[0].features()[0].position, 0.25);
    }

    #[test]
    fn splice_adjusts_selection() {
        let mut walls = vec![wall(0, 0, 1, 0), wall(0, 1, 9, 1), wall(0, 2, 1, 2)];
        let pieces = vec![wall(0, 1, 3, 1), wall(5, 1, 9, 1)];

        let mut selected = Some(2);
        splice_walls(&mut walls.clone(), &mut selected, 1, pieces.clone());
        assert_eq!(selected, Some(3));

        let mut selected = Some(1);
        splice_walls(&mut walls.clone(), &mut selected, 1, pieces.clone());
        assert_eq!(selected, None);

        let mut selected = Some(2);
        splice_walls(&mut walls, &mut selected, 1, Vec::new());
        assert_eq!(selected, Some(1));
        assert_eq!(walls.len(), 2);
    }

    #[test]
    fn extension_overshoot_is_pulled_back() {
        let mut walls = vec![wall(-1, 0, 6, 0), wall(0, -2, 0, 5)];
        let outcome = trim_extensions(&mut walls, 2);
        assert_eq!(outcome.trims, 2);
        assert_eq!(walls[0].segment(), crate::types::Segment::new(0, 0, 6, 0));
        assert_eq!(walls[1].segment(), crate::types::Segment::new(0, 0, 0, 5));
    }

    #[test]
    fn long_extensions_are_kept() {
        let mut walls = vec![wall(-4, 0, 6, 0), wall(0, -5, 0, 5)];
        let outcome = trim_extensions(&mut walls, 2);
        assert_eq!(outcome.trims, 0);
        assert_eq!(walls[0].line().start, -4);
    }
}
