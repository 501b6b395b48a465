// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Corner and gap suggestions.
//!
//! Suggestions are derived from the walls on demand and never stored with
//! the plan. Candidates already covered by existing walls are dropped.

use rustc_hash::{FxHashMap, FxHashSet};
use serde::Serialize;

use crate::geometry::LineCoverage;
use crate::insertion::insert_wall;
use crate::types::{Orientation, Point, Segment, Wall};

/// What a suggestion would close
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SuggestionKind {
    Corner,
    Gap,
}

/// Proposed walls completing a corner or closing a short gap
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Suggestion {
    #[serde(rename = "type")]
    pub kind: SuggestionKind,
    pub description: &'static str,
    pub walls: Vec<Segment>,
    /// Corner the suggestion grows from
    #[serde(skip_serializing_if = "Option::is_none")]
    pub anchor: Option<Point>,
}

/// Counts from applying suggestion walls
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplyOutcome {
    pub applied: bool,
    pub added: usize,
    /// Walls inserted only partially because of existing coverage
    pub adjusted: usize,
    pub skipped: usize,
}

impl ApplyOutcome {
    fn absorb(&mut self, other: ApplyOutcome) {
        self.added += other.added;
        self.adjusted += other.adjusted;
        self.skipped += other.skipped;
        self.applied = self.added > 0;
    }
}

/// Compute all corner suggestions followed by all gap suggestions
pub fn compute_suggestions(walls: &[Wall], gap_threshold: i32) -> Vec<Suggestion> {
    let coverage = LineCoverage::from_walls(walls);
    let mut suggestions = corner_suggestions(walls, &coverage);
    suggestions.extend(gap_suggestions(walls, &coverage, gap_threshold));
    suggestions
}

fn is_uncovered(candidate: &Segment, coverage: &LineCoverage) -> bool {
    candidate
        .line()
        .map(|line| !coverage.covers(&line))
        .unwrap_or(false)
}

struct EndpointEntry<'a> {
    wall: &'a Wall,
    /// The wall end that is not at the shared point
    far: Point,
}

fn corner_suggestions(walls: &[Wall], coverage: &LineCoverage) -> Vec<Suggestion> {
    let mut order: Vec<Point> = Vec::new();
    let mut endpoints: FxHashMap<Point, Vec<EndpointEntry<'_>>> = FxHashMap::default();

    for wall in walls {
        for (point, far) in [(wall.start(), wall.end()), (wall.end(), wall.start())] {
            endpoints
                .entry(point)
                .or_insert_with(|| {
                    order.push(point);
                    Vec::new()
                })
                .push(EndpointEntry { wall, far });
        }
    }

    let mut suggestions = Vec::new();
    let mut seen: FxHashSet<String> = FxHashSet::default();

    for corner in order {
        let Some(entries) = endpoints.get(&corner) else {
            continue;
        };
        if entries.len() < 2 {
            continue;
        }

        let horizontals = entries
            .iter()
            .filter(|e| e.wall.orientation() == Orientation::Horizontal);

        for horizontal in horizontals {
            let verticals = entries
                .iter()
                .filter(|e| e.wall.orientation() == Orientation::Vertical);

            for vertical in verticals {
                if horizontal.wall.length() <= 0 || vertical.wall.length() <= 0 {
                    continue;
                }

                let far_x = horizontal.far.x;
                let far_y = vertical.far.y;
                let candidates: Vec<Segment> = [
                    Segment::new(far_x, corner.y, far_x, far_y),
                    Segment::new(corner.x, far_y, far_x, far_y),
                ]
                .into_iter()
                .map(|c| c.normalized())
                .filter(|c| c.length() > 0 && is_uncovered(c, coverage))
                .collect();

                if candidates.is_empty() {
                    continue;
                }

                let mut keys: Vec<String> = candidates.iter().map(Segment::key).collect();
                keys.sort();
                if !seen.insert(keys.join("|")) {
                    continue;
                }

                suggestions.push(Suggestion {
                    kind: SuggestionKind::Corner,
                    description: "Complete the corner rectangle.",
                    walls: candidates,
                    anchor: Some(corner),
                });
            }
        }
    }

    suggestions
}

fn gap_suggestions(walls: &[Wall], coverage: &LineCoverage, gap_threshold: i32) -> Vec<Suggestion> {
    let mut suggestions = Vec::new();
    let mut seen: FxHashSet<String> = FxHashSet::default();

    for (i, first) in walls.iter().enumerate() {
        for second in walls.iter().skip(i + 1) {
            let (a, b) = (first.line(), second.line());
            if !a.shares_line(&b) {
                continue;
            }

            let (before, after) = if b.start < a.start { (b, a) } else { (a, b) };
            let gap = after.start - before.end;
            if gap <= 0 || gap > gap_threshold {
                continue;
            }

            let candidate = before.segment(before.end, after.start);
            if !is_uncovered(&candidate, coverage) || !seen.insert(candidate.key()) {
                continue;
            }

            let description = match a.orientation {
                Orientation::Horizontal => "Close the short gap between horizontal walls.",
                Orientation::Vertical => "Close the short gap between vertical walls.",
            };
            suggestions.push(Suggestion {
                kind: SuggestionKind::Gap,
                description,
                walls: vec![candidate],
                anchor: None,
            });
        }
    }

    suggestions
}

/// Insert suggestion walls through the overlap-resolving insertion path
pub fn apply_walls(walls: &mut Vec<Wall>, candidates: &[Segment]) -> ApplyOutcome {
    let mut outcome = ApplyOutcome::default();

    for candidate in candidates {
        match insert_wall(walls, *candidate) {
            Ok(result) if !result.is_noop() => {
                outcome.added += result.added_segments;
                if result.removed_cells > 0 {
                    outcome.adjusted += 1;
                }
            }
            _ => outcome.skipped += 1,
        }
    }

    outcome.applied = outcome.added > 0;
    outcome
}

/// Apply every wall of every suggestion
pub fn apply_all(walls: &mut Vec<Wall>, suggestions: &[Suggestion]) -> ApplyOutcome {
    let mut outcome = ApplyOutcome::default();
    for suggestion in suggestions {
        outcome.absorb(apply_walls(walls, &suggestion.walls));
    }
    outcome
}
