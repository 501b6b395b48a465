// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Editing session.
//!
//! A [`Session`] owns the plan, the selection, in-progress gestures and the
//! undo history. Every wall-set mutation runs inside a transaction: a
//! snapshot is pushed first and discarded again when the edit is refused or
//! turns out to change nothing, so a failed edit never leaves a trace.
//!
//! Connectivity, suggestions and metrics are derived on demand and cached
//! until the next mutation.

use std::collections::BTreeSet;

use serde::Serialize;

use crate::config::PlanConfig;
use crate::connectivity::{compute_connectivity, Connectivity};
use crate::error::{Error, Result};
use crate::history::{History, SnapshotHandle};
use crate::insertion::{insert_wall, uncovered_intervals, InsertOutcome};
use crate::metrics::PlanMetrics;
use crate::openings::{self, OpeningRequest};
use crate::suggestions::{self, ApplyOutcome, Suggestion};
use crate::trimming::{self, cut_wall, pieces_along, splice_walls, ExtensionTrimOutcome, TrimOutcome};
use crate::types::{Feature, OpeningKind, Orientation, Point, Segment, Wall};

/// Everything a renderer needs to draw the plan
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Frame<'a> {
    pub walls: &'a [Wall],
    pub selected: Option<usize>,
    pub preview: Option<Segment>,
    pub suggestions: &'a [Suggestion],
    pub open_wall_indexes: &'a BTreeSet<usize>,
    pub open_endpoints: &'a [Point],
    pub grid_size: f64,
}

/// Draws frames. Called after every change; must be idempotent.
pub trait Renderer {
    fn render(&mut self, frame: &Frame<'_>);
}

/// Result of offsetting the selected wall
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OffsetOutcome {
    /// Index of the new wall, now selected; `None` when the copy landed on
    /// existing walls only
    pub index: Option<usize>,
    #[serde(flatten)]
    pub insertion: InsertOutcome,
}

/// Opening placed from a pointer position
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlacedOpening {
    pub wall_index: usize,
    #[serde(flatten)]
    pub feature: Feature,
}

/// Result of committing a wall drag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveOutcome {
    pub dx: i32,
    pub dy: i32,
    /// Index of the moved wall; `None` when it landed entirely on other walls
    pub index: Option<usize>,
    /// Cells of the moved wall dropped because other walls already cover them
    pub removed_cells: i32,
    pub removed_features: usize,
}

#[derive(Debug, Clone)]
struct DrawGesture {
    start: Point,
    preview: Option<Segment>,
}

#[derive(Debug, Clone)]
struct MoveGesture {
    index: usize,
    origin: Wall,
    handle: SnapshotHandle,
    offset: (i32, i32),
}

#[derive(Debug)]
struct Derived {
    dirty: bool,
    connectivity: Connectivity,
    suggestions: Vec<Suggestion>,
    metrics: PlanMetrics,
}

/// Editing state for one plan
#[derive(Debug)]
pub struct Session {
    walls: Vec<Wall>,
    selected: Option<usize>,
    config: PlanConfig,
    history: History,
    draw: Option<DrawGesture>,
    drag: Option<MoveGesture>,
    derived: Derived,
}

impl Default for Session {
    fn default() -> Self {
        let config = PlanConfig::default();
        Self {
            walls: Vec::new(),
            selected: None,
            history: History::new(config.history_depth),
            draw: None,
            drag: None,
            derived: Derived {
                dirty: true,
                connectivity: Connectivity::default(),
                suggestions: Vec::new(),
                metrics: PlanMetrics::compute(&[], &config),
            },
            config,
        }
    }
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: PlanConfig) -> Result<Self> {
        let mut session = Self::default();
        session.set_config(config)?;
        Ok(session)
    }

    pub fn walls(&self) -> &[Wall] {
        &self.walls
    }

    pub fn wall(&self, index: usize) -> Option<&Wall> {
        self.walls.get(index)
    }

    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    pub fn config(&self) -> &PlanConfig {
        &self.config
    }

    /// Replace the configuration. Scale changes only affect derived values.
    pub fn set_config(&mut self, config: PlanConfig) -> Result<()> {
        let config = config.validated()?;
        self.history.set_capacity(config.history_depth);
        self.config = config;
        self.derived.dirty = true;
        Ok(())
    }

    pub fn can_undo(&self) -> bool {
        !self.history.is_empty()
    }

    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    pub fn is_moving(&self) -> bool {
        self.drag.is_some()
    }

    /// Snapshot, run `edit`, and keep the snapshot only if the plan changed
    fn transact<T, F>(&mut self, action: &'static str, edit: F) -> Result<T>
    where
        F: FnOnce(&mut Self) -> Result<(T, bool)>,
    {
        self.cancel_move();
        let handle = self.history.push(&self.walls, self.selected);

        match edit(self) {
            Ok((value, true)) => {
                self.derived.dirty = true;
                Ok(value)
            }
            Ok((value, false)) => {
                self.history.discard(handle);
                tracing::debug!(action, "Edit left the plan unchanged");
                Ok(value)
            }
            Err(err) => {
                self.history.discard(handle);
                tracing::debug!(action, reason = err.reason(), "Edit refused");
                Err(err)
            }
        }
    }

    fn refresh(&mut self) {
        if !self.derived.dirty {
            return;
        }
        tracing::trace!(walls = self.walls.len(), "Recomputing derived plan state");
        self.derived.connectivity = compute_connectivity(&self.walls);
        self.derived.suggestions =
            suggestions::compute_suggestions(&self.walls, self.config.suggestion_gap_cells);
        self.derived.metrics = PlanMetrics::compute(&self.walls, &self.config);
        self.derived.dirty = false;
    }

    pub fn connectivity(&mut self) -> &Connectivity {
        self.refresh();
        &self.derived.connectivity
    }

    pub fn suggestions(&mut self) -> &[Suggestion] {
        self.refresh();
        &self.derived.suggestions
    }

    pub fn metrics(&mut self) -> &PlanMetrics {
        self.refresh();
        &self.derived.metrics
    }

    pub fn enclosed_area_cells(&mut self) -> usize {
        self.metrics().enclosed_cells
    }

    pub fn frame(&mut self) -> Frame<'_> {
        self.refresh();
        Frame {
            walls: &self.walls,
            selected: self.selected,
            preview: self.preview(),
            suggestions: &self.derived.suggestions,
            open_wall_indexes: &self.derived.connectivity.open_wall_indexes,
            open_endpoints: &self.derived.connectivity.open_endpoints,
            grid_size: self.config.grid_size,
        }
    }

    pub fn render<R: Renderer + ?Sized>(&mut self, renderer: &mut R) {
        let frame = self.frame();
        renderer.render(&frame);
    }

    // Drawing

    /// Start a freehand wall at a grid point
    pub fn begin_draw(&mut self, cell: Point) {
        self.draw = Some(DrawGesture {
            start: cell,
            preview: None,
        });
    }

    /// Move the free end of the wall being drawn. The preview is locked to
    /// the dominant axis of the drag; `None` while the pointer is back on
    /// the start point.
    pub fn update_draw(&mut self, cell: Point) -> Option<Segment> {
        let gesture = self.draw.as_mut()?;
        let start = gesture.start;
        let dx = (i64::from(cell.x) - i64::from(start.x)).abs();
        let dy = (i64::from(cell.y) - i64::from(start.y)).abs();

        let end = if dx >= dy {
            Point::new(cell.x, start.y)
        } else {
            Point::new(start.x, cell.y)
        };

        gesture.preview = (end != start).then(|| Segment::from_points(start, end));
        gesture.preview
    }

    /// Insert the previewed wall. Without a preview there is nothing to add.
    pub fn finish_draw(&mut self) -> Result<InsertOutcome> {
        let preview = self.draw.take().and_then(|g| g.preview);
        match preview {
            Some(segment) => self.draw_wall(segment),
            None => Err(Error::InvalidGeometry),
        }
    }

    pub fn cancel_draw(&mut self) -> bool {
        self.draw.take().is_some()
    }

    pub fn preview(&self) -> Option<Segment> {
        self.draw.as_ref().and_then(|g| g.preview)
    }

    /// Add a wall through overlap-resolving insertion
    pub fn draw_wall(&mut self, segment: Segment) -> Result<InsertOutcome> {
        self.transact("draw", |s| {
            let outcome = insert_wall(&mut s.walls, segment)?;
            let changed = !outcome.is_noop();
            if changed {
                s.selected = None;
            }
            Ok((outcome, changed))
        })
    }

    // Selection

    /// Topmost wall within the selection tolerance of a pixel position
    pub fn wall_at(&self, px: f64, py: f64) -> Option<usize> {
        let grid = self.config.grid_size;
        let tolerance = self.config.selection_tolerance_px;

        self.walls
            .iter()
            .enumerate()
            .rev()
            .find(|(_, wall)| {
                let (a, b) = (wall.start(), wall.end());
                let (x1, y1) = (a.x as f64 * grid, a.y as f64 * grid);
                let (x2, y2) = (b.x as f64 * grid, b.y as f64 * grid);
                px >= x1.min(x2) - tolerance
                    && px <= x1.max(x2) + tolerance
                    && py >= y1.min(y2) - tolerance
                    && py <= y1.max(y2) + tolerance
            })
            .map(|(index, _)| index)
    }

    /// Select the wall under a pixel position, or clear the selection
    pub fn select_at(&mut self, px: f64, py: f64) -> Option<usize> {
        self.selected = self.wall_at(px, py);
        self.selected
    }

    pub fn select_wall(&mut self, index: usize) -> Result<()> {
        if index >= self.walls.len() {
            return Err(Error::MissingWall(index));
        }
        self.selected = Some(index);
        Ok(())
    }

    pub fn clear_selection(&mut self) {
        self.selected = None;
    }

    // Whole-wall edits

    pub fn erase_selected(&mut self) -> Result<Wall> {
        self.transact("erase", |s| {
            let index = s.selected.ok_or(Error::NoSelection)?;
            if index >= s.walls.len() {
                return Err(Error::MissingWall(index));
            }
            let wall = s.walls.remove(index);
            s.selected = None;
            Ok((wall, true))
        })
    }

    /// Remove every wall; false when the plan was already empty
    pub fn clear_all(&mut self) -> bool {
        self.transact("clear", |s| {
            if s.walls.is_empty() {
                return Ok((false, false));
            }
            s.walls.clear();
            s.selected = None;
            s.draw = None;
            Ok((true, true))
        })
        .unwrap_or(false)
    }

    /// Copy the selected wall `distance` whole cells across its axis.
    /// Fractional distances are truncated toward zero.
    pub fn offset_selected(&mut self, distance: f64) -> Result<OffsetOutcome> {
        self.transact("offset", |s| {
            if !distance.is_finite() || distance.trunc() == 0.0 {
                return Err(Error::InvalidOffset);
            }
            let offset = distance.trunc() as i32;
            let index = s.selected.ok_or(Error::NoSelection)?;
            let wall = s.walls.get(index).ok_or(Error::MissingWall(index))?;

            let (dx, dy) = match wall.orientation() {
                Orientation::Horizontal => (0, offset),
                Orientation::Vertical => (offset, 0),
            };
            let copy = wall
                .translated(dx, dy)
                .map_err(|_| Error::InvalidOffset)?
                .segment();

            let insertion = insert_wall(&mut s.walls, copy)?;
            let changed = !insertion.is_noop();
            let index = changed.then(|| s.walls.len() - 1);
            if index.is_some() {
                s.selected = index;
            }
            Ok((OffsetOutcome { index, insertion }, changed))
        })
    }

    // Openings

    pub fn add_opening(&mut self, index: usize, request: &OpeningRequest) -> Result<Feature> {
        self.transact("add-opening", |s| {
            let unit_per_cell = s.config.unit_per_cell;
            let wall = s.walls.get_mut(index).ok_or(Error::MissingWall(index))?;
            let feature =
                openings::add_opening(wall, request, &s.config.opening_presets, unit_per_cell)?;
            Ok((feature, true))
        })
    }

    /// Place a preset-sized opening on the wall under a pixel position,
    /// centered on the pointer. The host wall becomes selected.
    pub fn place_opening_at(&mut self, kind: OpeningKind, px: f64, py: f64) -> Result<PlacedOpening> {
        let wall_index = self.wall_at(px, py).ok_or(Error::NoSelection)?;
        let wall = self.walls.get(wall_index).ok_or(Error::MissingWall(wall_index))?;
        let grid = self.config.grid_size;
        let position = openings::position_on_wall(wall, px / grid, py / grid);

        let feature = self.add_opening(wall_index, &OpeningRequest::new(kind, position))?;
        self.selected = Some(wall_index);
        Ok(PlacedOpening { wall_index, feature })
    }

    /// Remove all openings from a wall; false when it had none
    pub fn clear_openings(&mut self, index: usize) -> Result<bool> {
        self.transact("clear-openings", |s| {
            let wall = s.walls.get_mut(index).ok_or(Error::MissingWall(index))?;
            let cleared = openings::clear_openings(wall);
            Ok((cleared, cleared))
        })
    }

    // Trimming

    /// Cut the span around axis coordinate `target` out of a wall
    pub fn trim_wall(&mut self, index: usize, target: f64) -> Result<TrimOutcome> {
        self.transact("trim", |s| {
            let plan = trimming::plan_trim(&s.walls, index, target, s.config.trim_gap_cells)?;
            let outcome = plan.outcome;
            splice_walls(&mut s.walls, &mut s.selected, plan.index, plan.replacements);
            tracing::debug!(
                index,
                removed_cells = outcome.removed_cells,
                resulting_segments = outcome.resulting_segments,
                "Trimmed wall"
            );
            Ok((outcome, true))
        })
    }

    /// Trim the wall under a pixel position at the pointer
    pub fn trim_at(&mut self, px: f64, py: f64) -> Result<TrimOutcome> {
        let index = self.wall_at(px, py).ok_or(Error::NoSelection)?;
        let wall = self.walls.get(index).ok_or(Error::MissingWall(index))?;
        let grid = self.config.grid_size;
        let target = match wall.orientation() {
            Orientation::Horizontal => px / grid,
            Orientation::Vertical => py / grid,
        };
        self.trim_wall(index, target)
    }

    /// Pull back wall ends overshooting a crossing by the configured threshold
    pub fn trim_extensions(&mut self) -> ExtensionTrimOutcome {
        let threshold = self.config.extension_trim_cells;
        self.transact("trim-extensions", |s| {
            let outcome = trimming::trim_extensions(&mut s.walls, threshold);
            Ok((outcome, outcome.trims > 0))
        })
        .unwrap_or_default()
    }

    // Moving

    /// Start dragging a wall. The plan is snapshotted now; the wall follows
    /// the drag in place until commit or cancel.
    pub fn begin_move(&mut self, index: usize) -> Result<()> {
        self.cancel_move();
        let origin = self
            .walls
            .get(index)
            .cloned()
            .ok_or(Error::MissingWall(index))?;

        let handle = self.history.push(&self.walls, self.selected);
        self.selected = Some(index);
        self.drag = Some(MoveGesture {
            index,
            origin,
            handle,
            offset: (0, 0),
        });
        Ok(())
    }

    /// Drag by a fractional cell offset from the start position. Returns
    /// the whole-cell offset applied. An offset that would push the wall
    /// off the grid is refused and the wall stays where it last was.
    pub fn update_move(&mut self, dx: f64, dy: f64) -> Result<(i32, i32)> {
        let snap = self
            .config
            .snap_to_walls
            .then_some(self.config.snap_threshold_cells);
        let gesture = self.drag.as_mut().ok_or(Error::NoSelection)?;
        let (dx, dy) = (finite_or_zero(dx), finite_or_zero(dy));

        let offset = snapped_offset(&self.walls, gesture.index, &gesture.origin, dx, dy, snap);
        if offset != gesture.offset {
            let moved = gesture.origin.translated(offset.0, offset.1)?;
            gesture.offset = offset;
            if let Some(slot) = self.walls.get_mut(gesture.index) {
                *slot = moved;
            }
            self.derived.dirty = true;
        }
        Ok(offset)
    }

    /// Finish the drag. Parts of the moved wall that land on collinear
    /// walls are dropped and its openings reprojected onto what remains.
    pub fn commit_move(&mut self) -> Option<MoveOutcome> {
        let gesture = self.drag.take()?;
        let (dx, dy) = gesture.offset;
        let index = gesture.index;

        if (dx, dy) == (0, 0) {
            self.history.discard(gesture.handle);
            return Some(MoveOutcome {
                dx,
                dy,
                index: Some(index),
                removed_cells: 0,
                removed_features: 0,
            });
        }

        let Ok(moved) = gesture.origin.translated(dx, dy) else {
            self.drag = Some(gesture);
            self.cancel_move();
            return None;
        };
        let line = moved.line();
        let others = self
            .walls
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != index)
            .map(|(_, wall)| wall);
        let spans: Vec<(i32, i32)> = uncovered_intervals(&line, others)
            .iter()
            .map(|interval| (interval.start, interval.end))
            .collect();
        let kept_cells: i32 = spans.iter().map(|(a, b)| b - a).sum();

        let mut outcome = MoveOutcome {
            dx,
            dy,
            index: Some(index),
            removed_cells: moved.length() - kept_cells,
            removed_features: 0,
        };

        if outcome.removed_cells > 0 {
            let pieces = pieces_along(&moved, spans);
            let (replacements, dropped) = match cut_wall(&moved, &pieces) {
                Ok(result) => result,
                Err(err) => {
                    tracing::debug!(reason = err.reason(), "Could not resolve moved wall overlap");
                    (Vec::new(), moved.features().len())
                }
            };
            outcome.removed_features = dropped;
            outcome.index = (!replacements.is_empty()).then_some(index);

            splice_walls(&mut self.walls, &mut self.selected, index, replacements);
            self.selected = outcome.index.or(self.selected);
            tracing::debug!(
                index,
                removed_cells = outcome.removed_cells,
                "Moved wall overlapped existing walls"
            );
        } else if let Some(slot) = self.walls.get_mut(index) {
            *slot = moved;
        }

        self.derived.dirty = true;
        Some(outcome)
    }

    /// Abort the drag, restoring the wall and dropping its snapshot
    pub fn cancel_move(&mut self) -> bool {
        let Some(gesture) = self.drag.take() else {
            return false;
        };
        if let Some(slot) = self.walls.get_mut(gesture.index) {
            *slot = gesture.origin;
        }
        self.history.discard(gesture.handle);
        self.derived.dirty = true;
        true
    }

    // History

    /// Restore the plan as it was before the last edit. An active drag is
    /// cancelled instead.
    pub fn undo(&mut self) -> bool {
        if self.cancel_move() {
            return true;
        }
        let Some(snapshot) = self.history.pop() else {
            return false;
        };

        self.walls = snapshot.walls;
        self.selected = snapshot.selected.filter(|&i| i < self.walls.len());
        self.draw = None;
        self.derived.dirty = true;
        true
    }

    // Suggestions

    fn suggestion(&mut self, index: usize) -> Result<Suggestion> {
        self.cancel_move();
        self.suggestions()
            .get(index)
            .cloned()
            .ok_or(Error::MissingSuggestion(index))
    }

    pub fn apply_all_suggestions(&mut self) -> ApplyOutcome {
        self.cancel_move();
        let pending = self.suggestions().to_vec();
        self.transact("apply-suggestions", |s| {
            let outcome = suggestions::apply_all(&mut s.walls, &pending);
            Ok((outcome, outcome.applied))
        })
        .unwrap_or_default()
    }

    pub fn apply_suggestion(&mut self, index: usize) -> Result<ApplyOutcome> {
        let suggestion = self.suggestion(index)?;
        self.transact("apply-suggestion", |s| {
            let outcome = suggestions::apply_walls(&mut s.walls, &suggestion.walls);
            Ok((outcome, outcome.applied))
        })
    }

    /// Apply a single wall of a suggestion
    pub fn apply_suggestion_wall(&mut self, index: usize, wall: usize) -> Result<ApplyOutcome> {
        let suggestion = self.suggestion(index)?;
        let candidate = *suggestion
            .walls
            .get(wall)
            .ok_or(Error::MissingSuggestion(index))?;
        self.transact("apply-suggestion", |s| {
            let outcome = suggestions::apply_walls(&mut s.walls, &[candidate]);
            Ok((outcome, outcome.applied))
        })
    }
}

fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        0.0
    }
}

/// Whole-cell drag offset. With snapping on, an endpoint of the dragged
/// wall that comes within `snap` cells of another wall's endpoint locks
/// onto it; the closest such pair wins.
fn snapped_offset(
    walls: &[Wall],
    moving: usize,
    origin: &Wall,
    dx: f64,
    dy: f64,
    snap: Option<f64>,
) -> (i32, i32) {
    let rounded = (dx.round() as i32, dy.round() as i32);
    let Some(threshold) = snap else {
        return rounded;
    };

    let mut best: Option<(f64, (i32, i32))> = None;
    for end in [origin.start(), origin.end()] {
        let (tx, ty) = (end.x as f64 + dx, end.y as f64 + dy);

        let targets = walls
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != moving)
            .flat_map(|(_, wall)| [wall.start(), wall.end()]);

        for target in targets {
            let distance = (target.x as f64 - tx).hypot(target.y as f64 - ty);
            if distance <= threshold && best.map_or(true, |(d, _)| distance < d) {
                best = Some((distance, (target.x - end.x, target.y - end.y)));
            }
        }
    }

    best.map_or(rounded, |(_, offset)| offset)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::merge_intervals;
    use crate::geometry::Interval;
    use crate::types::COORD_LIMIT;
    use approx::assert_relative_eq;

    fn seg(x1: i32, y1: i32, x2: i32, y2: i32) -> Segment {
        Segment::new(x1, y1, x2, y2)
    }

    fn square(session: &mut Session, size: i32) {
        session.draw_wall(seg(0, 0, size, 0)).unwrap();
        session.draw_wall(seg(size, 0, size, size)).unwrap();
        session.draw_wall(seg(size, size, 0, size)).unwrap();
        session.draw_wall(seg(0, size, 0, 0)).unwrap();
    }

    fn assert_no_overlap(walls: &[Wall]) {
        for (i, a) in walls.iter().enumerate() {
            for b in walls.iter().skip(i + 1) {
                let (la, lb) = (a.line(), b.line());
                if la.shares_line(&lb) {
                    let merged = merge_intervals(vec![
                        Interval::new(la.start, la.end),
                        Interval::new(lb.start, lb.end),
                    ]);
                    let total: i32 = merged.iter().map(Interval::length).sum();
                    assert_eq!(total, la.length() + lb.length(), "{a:?} overlaps {b:?}");
                }
            }
        }
    }

    #[test]
    fn session_is_send() {
        fn assert_send<T: Send>() {}
        assert_send::<Session>();
    }

    #[test]
    fn draw_gesture_locks_to_dominant_axis() {
        let mut session = Session::new();
        session.begin_draw(Point::new(2, 2));
        assert_eq!(session.update_draw(Point::new(7, 3)), Some(seg(2, 2, 7, 2)));
        assert_eq!(session.update_draw(Point::new(3, -4)), Some(seg(2, 2, 2, -4)));
        assert_eq!(session.update_draw(Point::new(2, 2)), None);
        assert_eq!(session.update_draw(Point::new(6, 2)), Some(seg(2, 2, 6, 2)));

        let outcome = session.finish_draw().unwrap();
        assert_eq!(outcome.added_cells, 4);
        assert_eq!(session.walls().len(), 1);
        assert_eq!(session.preview(), None);
    }

    #[test]
    fn finish_without_preview_adds_nothing() {
        let mut session = Session::new();
        session.begin_draw(Point::new(1, 1));
        assert_eq!(session.finish_draw(), Err(Error::InvalidGeometry));
        assert!(session.walls().is_empty());
        assert!(!session.can_undo());
    }

    #[test]
    fn duplicate_wall_leaves_no_history() {
        let mut session = Session::new();
        session.draw_wall(seg(0, 0, 5, 0)).unwrap();
        assert_eq!(session.history_len(), 1);

        let again = session.draw_wall(seg(0, 0, 5, 0)).unwrap();
        assert_eq!(again.removed_cells, 5);
        assert!(again.is_noop());
        assert_eq!(session.history_len(), 1);
        assert_eq!(session.walls().len(), 1);
    }

    #[test]
    fn diagonal_wall_is_refused() {
        let mut session = Session::new();
        assert_eq!(session.draw_wall(seg(0, 0, 3, 3)), Err(Error::InvalidGeometry));
        assert!(!session.can_undo());
    }

    #[test]
    fn undo_restores_previous_plan() {
        let mut session = Session::new();
        square(&mut session, 4);
        session.select_wall(1).unwrap();
        let before = session.walls().to_vec();

        session.trim_wall(0, 2.0).unwrap();
        assert_ne!(session.walls(), &before[..]);

        assert!(session.undo());
        assert_eq!(session.walls(), &before[..]);
        assert_eq!(session.selected(), Some(1));
    }

    #[test]
    fn select_at_uses_pixel_tolerance() {
        let mut session = Session::new();
        session.draw_wall(seg(0, 0, 10, 0)).unwrap();
        session.draw_wall(seg(5, -5, 5, 5)).unwrap();

        // 13 px grid, 10 px tolerance
        assert_eq!(session.select_at(26.0, 8.0), Some(0));
        assert_eq!(session.select_at(26.0, 12.0), None);
        // topmost wins where both are in reach
        assert_eq!(session.select_at(65.0, 0.0), Some(1));
        assert_eq!(session.select_at(200.0, 0.0), None);
        assert_eq!(session.selected(), None);
    }

    #[test]
    fn erase_and_clear() {
        let mut session = Session::new();
        assert_eq!(session.erase_selected(), Err(Error::NoSelection));
        assert!(!session.clear_all());

        square(&mut session, 3);
        session.select_wall(2).unwrap();
        let erased = session.erase_selected().unwrap();
        assert_eq!(erased.segment(), seg(3, 3, 0, 3));
        assert_eq!(session.walls().len(), 3);
        assert_eq!(session.selected(), None);

        assert!(session.clear_all());
        assert!(session.walls().is_empty());
        assert!(session.undo());
        assert_eq!(session.walls().len(), 3);
    }

    #[test]
    fn offset_copies_and_selects() {
        let mut session = Session::new();
        assert_eq!(session.offset_selected(2.0), Err(Error::NoSelection));

        session.draw_wall(seg(0, 0, 6, 0)).unwrap();
        session.select_wall(0).unwrap();
        assert_eq!(session.offset_selected(0.4), Err(Error::InvalidOffset));
        assert_eq!(session.offset_selected(f64::NAN), Err(Error::InvalidOffset));

        let outcome = session.offset_selected(-3.7).unwrap();
        assert_eq!(outcome.index, Some(1));
        assert_eq!(session.selected(), Some(1));
        assert_eq!(session.walls()[1].segment(), seg(0, -3, 6, -3));
    }

    #[test]
    fn offset_selected_vertical_wall_moves_in_x() {
        let mut session = Session::new();
        session.draw_wall(seg(2, 0, 2, 4)).unwrap();
        session.select_wall(0).unwrap();
        session.offset_selected(3.0).unwrap();
        assert_eq!(session.walls()[1].segment(), seg(5, 0, 5, 4));
    }

    #[test]
    fn openings_through_session() {
        let mut session = Session::new();
        session.draw_wall(seg(0, 0, 10, 0)).unwrap();
        let door = session
            .add_opening(0, &OpeningRequest::new(OpeningKind::Door, 0.5))
            .unwrap();
        assert_relative_eq!(door.length_cells, 1.8);

        assert_eq!(
            session.add_opening(0, &OpeningRequest::new(OpeningKind::Window, 0.5)),
            Err(Error::Overlap)
        );
        assert_eq!(
            session.add_opening(4, &OpeningRequest::new(OpeningKind::Window, 0.5)),
            Err(Error::MissingWall(4))
        );
        assert_eq!(session.history_len(), 2);

        assert_eq!(session.metrics().door_count, 1);
        assert_eq!(session.clear_openings(0), Ok(true));
        assert_eq!(session.clear_openings(0), Ok(false));
        assert_eq!(session.metrics().door_count, 0);
    }

    #[test]
    fn place_opening_at_pointer() {
        let mut session = Session::new();
        session.draw_wall(seg(0, 0, 20, 0)).unwrap();
        let placed = session.place_opening_at(OpeningKind::Window, 52.0, 3.0).unwrap();
        assert_eq!(placed.wall_index, 0);
        assert_relative_eq!(placed.feature.position, 0.2);
        assert_eq!(session.selected(), Some(0));

        assert_eq!(
            session.place_opening_at(OpeningKind::Door, 52.0, 200.0),
            Err(Error::NoSelection)
        );
    }

    #[test]
    fn trim_shifts_selection() {
        let mut session = Session::new();
        session.draw_wall(seg(0, 0, 10, 0)).unwrap();
        session.draw_wall(seg(0, 3, 10, 3)).unwrap();
        session.select_wall(1).unwrap();

        let outcome = session.trim_wall(0, 5.0).unwrap();
        assert_eq!(outcome.resulting_segments, 2);
        assert_eq!(session.walls().len(), 3);
        assert_eq!(session.selected(), Some(2));
        assert_eq!(session.walls()[2].segment(), seg(0, 3, 10, 3));
    }

    #[test]
    fn trim_at_pointer_uses_axis_coordinate() {
        let mut session = Session::new();
        square(&mut session, 4);
        session.draw_wall(seg(2, 0, 2, 4)).unwrap();

        let outcome = session.trim_at(13.0, 0.0).unwrap();
        assert_eq!(outcome.removed_cells, 2);
        assert_eq!(session.walls()[0].segment(), seg(2, 0, 4, 0));
        // the vertical wall at x = 2 is on top and the pointer sits on its end
        assert_eq!(session.trim_at(26.0, 0.0), Err(Error::Edge));
    }

    #[test]
    fn failed_trim_leaves_no_history() {
        let mut session = Session::new();
        session.draw_wall(seg(0, 0, 10, 0)).unwrap();
        assert_eq!(session.trim_wall(0, 0.0), Err(Error::Edge));
        assert_eq!(session.trim_wall(7, 3.0), Err(Error::MissingWall(7)));
        assert_eq!(session.history_len(), 1);
    }

    #[test]
    fn extension_overshoot_is_pulled_back() {
        let mut session = Session::new();
        session.draw_wall(seg(0, 0, 10, 0)).unwrap();
        session.draw_wall(seg(4, -1, 4, 6)).unwrap();

        let outcome = session.trim_extensions();
        assert_eq!(outcome.trims, 1);
        assert_eq!(session.walls()[1].segment(), seg(4, 0, 4, 6));

        let again = session.trim_extensions();
        assert_eq!(again.trims, 0);
        assert_eq!(session.history_len(), 3);
    }

    #[test]
    fn zero_trim_gap_on_a_grid_point_has_no_span() {
        let mut session = Session::new();
        let mut config = PlanConfig::default();
        config.trim_gap_cells = 0.0;
        session.set_config(config).unwrap();
        session.draw_wall(seg(0, 0, 10, 0)).unwrap();

        assert_eq!(session.trim_wall(0, 5.0), Err(Error::NoSpan));
        assert_eq!(session.history_len(), 1);
        assert_eq!(session.trim_wall(0, 5.5).unwrap().removed_cells, 1);
    }

    #[test]
    fn move_snaps_to_nearby_endpoint() {
        let mut session = Session::new();
        session.draw_wall(seg(0, 0, 5, 0)).unwrap();
        session.draw_wall(seg(8, 2, 8, 6)).unwrap();

        session.begin_move(1).unwrap();
        // raw start would be (5.4, 0.3): within 0.75 of (5, 0)
        assert_eq!(session.update_move(-2.6, -1.7), Ok((-3, -2)));
        let outcome = session.commit_move().unwrap();
        assert_eq!((outcome.dx, outcome.dy), (-3, -2));
        assert_eq!(session.walls()[1].segment(), seg(5, 0, 5, 4));
        assert!(session.connectivity().open_endpoints.contains(&Point::new(5, 4)));
        assert!(!session.connectivity().open_endpoints.contains(&Point::new(5, 0)));
    }

    #[test]
    fn move_without_snap_rounds() {
        let mut session = Session::new();
        let mut config = PlanConfig::default();
        config.snap_to_walls = false;
        session.set_config(config).unwrap();
        session.draw_wall(seg(0, 0, 5, 0)).unwrap();
        session.draw_wall(seg(8, 2, 8, 6)).unwrap();

        session.begin_move(1).unwrap();
        assert_eq!(session.update_move(-2.6, -1.7), Ok((-3, -2)));
        assert_eq!(session.update_move(-2.4, -1.2), Ok((-2, -1)));
    }

    #[test]
    fn move_off_the_grid_is_refused() {
        let mut session = Session::new();
        session.draw_wall(seg(0, 0, 5, 0)).unwrap();
        session.begin_move(0).unwrap();
        session.update_move(0.0, 2.0).unwrap();

        assert_eq!(session.update_move(1e12, 0.0), Err(Error::InvalidGeometry));
        assert_eq!(session.walls()[0].segment(), seg(0, 2, 5, 2));

        let outcome = session.commit_move().unwrap();
        assert_eq!((outcome.dx, outcome.dy), (0, 2));
        assert_eq!(session.walls()[0].segment(), seg(0, 2, 5, 2));
    }

    #[test]
    fn update_move_without_drag() {
        let mut session = Session::new();
        assert_eq!(session.update_move(1.0, 0.0), Err(Error::NoSelection));
    }

    #[test]
    fn huge_walls_are_rejected() {
        let mut session = Session::new();
        assert_eq!(
            session.draw_wall(seg(-2_000_000_000, 0, 2_000_000_000, 0)),
            Err(Error::InvalidGeometry)
        );
        assert!(session.walls().is_empty());
        assert!(!session.can_undo());
    }

    #[test]
    fn offset_past_the_grid_edge_is_refused() {
        let mut session = Session::new();
        session.draw_wall(seg(0, 1, 4, 1)).unwrap();
        session.select_wall(0).unwrap();

        assert_eq!(session.offset_selected(3e9), Err(Error::InvalidOffset));
        assert_eq!(session.offset_selected(f64::from(COORD_LIMIT)), Err(Error::InvalidOffset));
        assert_eq!(session.walls().len(), 1);
        assert_eq!(session.history_len(), 1);
    }

    #[test]
    fn far_draw_preview_does_not_overflow() {
        let mut session = Session::new();
        session.begin_draw(Point::new(-2_000_000_000, 0));
        assert_eq!(
            session.update_draw(Point::new(2_000_000_000, 5)),
            Some(seg(-2_000_000_000, 0, 2_000_000_000, 0))
        );
        assert_eq!(session.finish_draw(), Err(Error::InvalidGeometry));
        assert!(session.walls().is_empty());
    }

    #[test]
    fn undo_clears_draw_preview() {
        let mut session = Session::new();
        session.draw_wall(seg(0, 0, 4, 0)).unwrap();

        session.begin_draw(Point::new(0, 0));
        assert_eq!(session.update_draw(Point::new(0, 3)), Some(seg(0, 0, 0, 3)));
        assert!(session.preview().is_some());

        assert!(session.undo());
        assert_eq!(session.preview(), None);
        assert_eq!(session.finish_draw(), Err(Error::InvalidGeometry));
        assert!(session.walls().is_empty());
    }

    #[test]
    fn zero_move_discards_snapshot() {
        let mut session = Session::new();
        session.draw_wall(seg(0, 0, 5, 0)).unwrap();
        session.begin_move(0).unwrap();
        assert_eq!(session.history_len(), 2);
        session.update_move(0.2, -0.3).unwrap();
        let outcome = session.commit_move().unwrap();
        assert_eq!((outcome.dx, outcome.dy), (0, 0));
        assert_eq!(session.history_len(), 1);
    }

    #[test]
    fn cancel_move_reverts() {
        let mut session = Session::new();
        session.draw_wall(seg(0, 0, 5, 0)).unwrap();
        session.begin_move(0).unwrap();
        session.update_move(3.0, 3.0).unwrap();
        assert_eq!(session.walls()[0].segment(), seg(3, 3, 8, 3));

        assert!(session.cancel_move());
        assert_eq!(session.walls()[0].segment(), seg(0, 0, 5, 0));
        assert_eq!(session.history_len(), 1);
        assert!(!session.cancel_move());
    }

    #[test]
    fn moved_wall_onto_collinear_wall_is_trimmed() {
        let mut session = Session::new();
        session.draw_wall(seg(0, 0, 6, 0)).unwrap();
        session.draw_wall(seg(4, 3, 10, 3)).unwrap();

        session.begin_move(1).unwrap();
        session.update_move(0.0, -3.0).unwrap();
        let outcome = session.commit_move().unwrap();

        assert_eq!(outcome.removed_cells, 2);
        assert_eq!(outcome.index, Some(1));
        assert_eq!(session.walls()[1].segment(), seg(6, 0, 10, 0));
        assert_no_overlap(session.walls());
        assert_eq!(session.selected(), Some(1));

        assert!(session.undo());
        assert_eq!(session.walls()[1].segment(), seg(4, 3, 10, 3));
    }

    #[test]
    fn wall_moved_fully_onto_another_disappears() {
        let mut session = Session::new();
        session.draw_wall(seg(0, 0, 6, 0)).unwrap();
        session.draw_wall(seg(1, 2, 4, 2)).unwrap();

        session.begin_move(1).unwrap();
        session.update_move(0.0, -2.0).unwrap();
        let outcome = session.commit_move().unwrap();
        assert_eq!(outcome.index, None);
        assert_eq!(outcome.removed_cells, 3);
        assert_eq!(session.walls().len(), 1);
        assert_eq!(session.selected(), None);
    }

    #[test]
    fn undo_during_drag_cancels_it() {
        let mut session = Session::new();
        session.draw_wall(seg(0, 0, 5, 0)).unwrap();
        session.begin_move(0).unwrap();
        session.update_move(0.0, 4.0).unwrap();

        assert!(session.undo());
        assert!(!session.is_moving());
        assert_eq!(session.walls()[0].segment(), seg(0, 0, 5, 0));
        assert_eq!(session.history_len(), 1);
    }

    #[test]
    fn suggestions_apply_and_refresh() {
        let mut session = Session::new();
        session.draw_wall(seg(0, 0, 4, 0)).unwrap();
        session.draw_wall(seg(0, 0, 0, 3)).unwrap();
        assert_eq!(session.suggestions().len(), 1);

        let outcome = session.apply_suggestion_wall(0, 1).unwrap();
        assert_eq!(outcome.added, 1);
        assert_eq!(session.walls().len(), 3);

        assert_eq!(session.apply_suggestion(5), Err(Error::MissingSuggestion(5)));

        let all = session.apply_all_suggestions();
        assert!(all.applied);
        assert!(session.suggestions().is_empty());
        assert_eq!(session.enclosed_area_cells(), 12);
        assert!(session.connectivity().is_closed());
    }

    #[test]
    fn renderer_receives_current_frame() {
        #[derive(Default)]
        struct Recorder {
            frames: Vec<(usize, Option<usize>, Option<Segment>, usize)>,
        }

        impl Renderer for Recorder {
            fn render(&mut self, frame: &Frame<'_>) {
                self.frames.push((
                    frame.walls.len(),
                    frame.selected,
                    frame.preview,
                    frame.open_endpoints.len(),
                ));
            }
        }

        let mut session = Session::new();
        let mut recorder = Recorder::default();
        session.draw_wall(seg(0, 0, 5, 0)).unwrap();
        session.select_wall(0).unwrap();
        session.begin_draw(Point::new(0, 2));
        session.update_draw(Point::new(3, 2));
        session.render(&mut recorder);

        assert_eq!(recorder.frames, vec![(1, Some(0), Some(seg(0, 2, 3, 2)), 2)]);
    }

    #[test]
    fn config_changes_update_metrics() {
        let mut session = Session::new();
        square(&mut session, 4);
        assert_relative_eq!(session.metrics().enclosed_area_value, 4.0);

        let mut config = session.config().clone();
        config.unit_per_cell = 1.0;
        config.unit_label = "  ".into();
        session.set_config(config).unwrap();
        assert_relative_eq!(session.metrics().enclosed_area_value, 16.0);
        assert_eq!(session.metrics().unit_label, "units");

        let mut bad = session.config().clone();
        bad.grid_size = 0.0;
        assert!(matches!(session.set_config(bad), Err(Error::Config(_))));
    }
}
