// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # FloorSketch Core
//!
//! Grid wall model for floor-plan sketching.
//!
//! Walls are axis-aligned segments on an integer grid. The plan keeps one
//! invariant above all others: no two walls on the same line overlap. Every
//! edit that adds walls goes through overlap-resolving insertion, and every
//! edit that changes walls is undoable.
//!
//! ## Overview
//!
//! - **Insertion**: collinear coverage is subtracted before a wall is stored
//! - **Connectivity**: wall ends joined to nothing, T-junctions included
//! - **Enclosed area**: edge-barrier flood fill over grid cells
//! - **Openings**: doors and windows with length and overlap checks
//! - **Trimming**: CAD-style span removal between intersections
//! - **Suggestions**: corner and gap completions
//! - **Session**: selection, gestures, undo and cached derived state
//!
//! ## Quick Start
//!
//! ```rust
//! use floorsketch_core::{Segment, Session};
//!
//! let mut session = Session::new();
//! for wall in [
//!     Segment::new(0, 0, 4, 0),
//!     Segment::new(4, 0, 4, 4),
//!     Segment::new(4, 4, 0, 4),
//!     Segment::new(0, 4, 0, 0),
//! ] {
//!     session.draw_wall(wall)?;
//! }
//!
//! assert!(session.connectivity().is_closed());
//! assert_eq!(session.enclosed_area_cells(), 16);
//! # Ok::<(), floorsketch_core::Error>(())
//! ```

pub mod config;
pub mod connectivity;
pub mod error;
pub mod geometry;
pub mod history;
pub mod insertion;
pub mod metrics;
pub mod openings;
pub mod session;
pub mod suggestions;
pub mod trimming;
pub mod types;

pub use config::{OpeningPresets, OpeningSize, PlanConfig};
pub use connectivity::{compute_connectivity, Connectivity};
pub use error::{Error, Result};
pub use geometry::{enclosed_area_cells, intersection_point, is_point_on_wall};
pub use history::{History, Snapshot, SnapshotHandle};
pub use insertion::{insert_wall, InsertOutcome};
pub use metrics::{round_display, PlanMetrics};
pub use openings::{add_opening, clear_openings, OpeningRequest};
pub use session::{Frame, MoveOutcome, OffsetOutcome, PlacedOpening, Renderer, Session};
pub use suggestions::{compute_suggestions, ApplyOutcome, Suggestion, SuggestionKind};
pub use trimming::{plan_trim, trim_extensions, ExtensionTrimOutcome, TrimOutcome, TrimPlan};
pub use types::{Feature, OpeningKind, Orientation, Point, Segment, Wall, WallLine, COORD_LIMIT};

/// Crate version, as reported by the bindings
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
