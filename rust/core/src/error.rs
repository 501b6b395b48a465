// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for sketch operations.
//!
//! Every refused edit maps to a stable kebab-case reason code so the
//! presentation layer can turn it into a human message.

use serde::{Serialize, Serializer};

/// Result type alias for sketch operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Reasons an edit was refused. A refused edit never mutates the plan.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// Zero-length or diagonal wall.
    #[error("wall must be horizontal or vertical with non-zero length")]
    InvalidGeometry,

    /// The host wall is shorter than the opening.
    #[error("wall is too short for this opening")]
    TooShort,

    /// No explicit size and no preset for the opening kind.
    #[error("opening width and height are not available")]
    MissingDimensions,

    /// The opening would overlap another opening on the same wall.
    #[error("opening overlaps an existing opening")]
    Overlap,

    /// The wall cannot be trimmed.
    #[error("wall is not trimmable")]
    UnsupportedWall,

    /// The trim target is on or beyond a wall endpoint.
    #[error("trim target lies on a wall endpoint")]
    Edge,

    /// The trim target coincides with a junction.
    #[error("cannot trim through a wall intersection")]
    Intersection,

    /// Nothing left to remove between the trim boundaries.
    #[error("no removable span at trim target")]
    NoSpan,

    /// Offset distance is zero, non-finite or rounds to zero.
    #[error("offset distance must be a non-zero whole number of cells")]
    InvalidOffset,

    /// An operation on the selected wall with nothing selected.
    #[error("no wall is selected")]
    NoSelection,

    /// The wall orientation does not support this operation.
    #[error("wall orientation is not supported")]
    UnsupportedOrientation,

    /// A wall index that no longer refers to a wall.
    #[error("wall {0} no longer exists")]
    MissingWall(usize),

    /// A suggestion index that is not in the current suggestion list.
    #[error("suggestion {0} is not available")]
    MissingSuggestion(usize),

    /// Configuration rejected during parsing or validation.
    #[error("invalid configuration: {0}")]
    Config(String),
}

impl Error {
    /// Stable reason code for the presentation layer.
    pub fn reason(&self) -> &'static str {
        match self {
            Error::InvalidGeometry => "invalid-geometry",
            Error::TooShort => "too-short",
            Error::MissingDimensions => "missing-dimensions",
            Error::Overlap => "overlap",
            Error::UnsupportedWall => "unsupported-wall",
            Error::Edge => "edge",
            Error::Intersection => "intersection",
            Error::NoSpan => "no-span",
            Error::InvalidOffset => "invalid-offset",
            Error::NoSelection => "no-selection",
            Error::UnsupportedOrientation => "unsupported-orientation",
            Error::MissingWall(_) => "missing-wall",
            Error::MissingSuggestion(_) => "missing-suggestion",
            Error::Config(_) => "invalid-config",
        }
    }
}

impl Serialize for Error {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.reason())
    }
}
