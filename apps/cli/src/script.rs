// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Edit scripts: a JSON list of sketch actions replayed through a session.
//!
//! ```json
//! {
//!   "config": { "unitLabel": "ft", "unitPerCell": 1.0 },
//!   "actions": [
//!     { "action": "wall", "x1": 0, "y1": 0, "x2": 8, "y2": 0 },
//!     { "action": "opening", "wall": 0, "type": "door", "position": 0.5 },
//!     { "action": "undo" }
//!   ]
//! }
//! ```
//!
//! Coordinates are grid cells unless a field says pixels.

use floorsketch_core::{
    Error, OpeningKind, OpeningRequest, PlanConfig, Point, Segment, Session,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

#[derive(Debug, Clone, Deserialize)]
pub struct Script {
    #[serde(default)]
    pub config: Option<PlanConfig>,
    pub actions: Vec<Action>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum Action {
    Wall { x1: i32, y1: i32, x2: i32, y2: i32 },
    /// Freehand gesture: pointer down at `from`, moves through `path`
    Draw { from: Point, path: Vec<Point> },
    Select { index: usize },
    SelectAt { px: f64, py: f64 },
    ClearSelection,
    Erase,
    ClearAll,
    Offset { distance: f64 },
    Opening {
        wall: usize,
        #[serde(flatten)]
        request: OpeningRequest,
    },
    PlaceOpening {
        #[serde(rename = "type")]
        kind: OpeningKind,
        px: f64,
        py: f64,
    },
    ClearOpenings { wall: usize },
    Trim { wall: usize, target: f64 },
    TrimAt { px: f64, py: f64 },
    TrimExtensions,
    /// Drag a wall by a fractional cell offset and release
    Move { wall: usize, dx: f64, dy: f64 },
    Undo,
    ApplySuggestions,
    ApplySuggestion { index: usize },
    ApplySuggestionWall { index: usize, wall: usize },
}

impl Action {
    pub fn name(&self) -> &'static str {
        match self {
            Action::Wall { .. } => "wall",
            Action::Draw { .. } => "draw",
            Action::Select { .. } => "select",
            Action::SelectAt { .. } => "selectAt",
            Action::ClearSelection => "clearSelection",
            Action::Erase => "erase",
            Action::ClearAll => "clearAll",
            Action::Offset { .. } => "offset",
            Action::Opening { .. } => "opening",
            Action::PlaceOpening { .. } => "placeOpening",
            Action::ClearOpenings { .. } => "clearOpenings",
            Action::Trim { .. } => "trim",
            Action::TrimAt { .. } => "trimAt",
            Action::TrimExtensions => "trimExtensions",
            Action::Move { .. } => "move",
            Action::Undo => "undo",
            Action::ApplySuggestions => "applySuggestions",
            Action::ApplySuggestion { .. } => "applySuggestion",
            Action::ApplySuggestionWall { .. } => "applySuggestionWall",
        }
    }
}

/// Outcome of one scripted action
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StepReport {
    pub step: usize,
    pub action: &'static str,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<&'static str>,
    #[serde(skip_serializing_if = "Value::is_null")]
    pub detail: Value,
}

/// Report payload; outcomes that fail to serialize are logged and left out
fn detail<T: Serialize>(value: T) -> Value {
    serde_json::to_value(value).unwrap_or_else(|err| {
        tracing::warn!(error = %err, "Dropping step detail");
        Value::Null
    })
}

fn apply(session: &mut Session, action: &Action) -> std::result::Result<Value, Error> {
    let value = match action {
        Action::Wall { x1, y1, x2, y2 } => {
            detail(session.draw_wall(Segment::new(*x1, *y1, *x2, *y2))?)
        }
        Action::Draw { from, path } => {
            session.begin_draw(*from);
            for point in path {
                session.update_draw(*point);
            }
            detail(session.finish_draw()?)
        }
        Action::Select { index } => detail(session.select_wall(*index)?),
        Action::SelectAt { px, py } => detail(json!({ "selected": session.select_at(*px, *py) })),
        Action::ClearSelection => {
            session.clear_selection();
            Value::Null
        }
        Action::Erase => detail(session.erase_selected()?),
        Action::ClearAll => detail(json!({ "cleared": session.clear_all() })),
        Action::Offset { distance } => detail(session.offset_selected(*distance)?),
        Action::Opening { wall, request } => detail(session.add_opening(*wall, request)?),
        Action::PlaceOpening { kind, px, py } => detail(session.place_opening_at(*kind, *px, *py)?),
        Action::ClearOpenings { wall } => {
            detail(json!({ "cleared": session.clear_openings(*wall)? }))
        }
        Action::Trim { wall, target } => detail(session.trim_wall(*wall, *target)?),
        Action::TrimAt { px, py } => detail(session.trim_at(*px, *py)?),
        Action::TrimExtensions => detail(session.trim_extensions()),
        Action::Move { wall, dx, dy } => {
            session.begin_move(*wall)?;
            if let Err(err) = session.update_move(*dx, *dy) {
                session.cancel_move();
                return Err(err);
            }
            detail(session.commit_move())
        }
        Action::Undo => detail(json!({ "undone": session.undo() })),
        Action::ApplySuggestions => detail(session.apply_all_suggestions()),
        Action::ApplySuggestion { index } => detail(session.apply_suggestion(*index)?),
        Action::ApplySuggestionWall { index, wall } => {
            detail(session.apply_suggestion_wall(*index, *wall)?)
        }
    };
    Ok(value)
}

/// Replay `actions` in order. Refused actions are reported and skipped.
pub fn run(session: &mut Session, actions: &[Action]) -> Vec<StepReport> {
    actions
        .iter()
        .enumerate()
        .map(|(step, action)| {
            let result = apply(session, action);
            match result {
                Ok(detail) => StepReport {
                    step,
                    action: action.name(),
                    success: true,
                    reason: None,
                    detail,
                },
                Err(err) => {
                    tracing::warn!(step, action = action.name(), reason = err.reason(), "Action refused");
                    StepReport {
                        step,
                        action: action.name(),
                        success: false,
                        reason: Some(err.reason()),
                        detail: Value::Null,
                    }
                }
            }
        })
        .collect()
}
