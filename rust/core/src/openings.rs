// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Door and window placement on walls.

use serde::Deserialize;

use crate::config::{OpeningPresets, OpeningSize};
use crate::error::{Error, Result};
use crate::types::{Feature, OpeningKind, Orientation, Wall};

/// Two opening spans closer than this (cells) do not count as overlapping
pub const SPAN_TOLERANCE: f64 = 1e-4;

/// Request to place an opening on a wall
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpeningRequest {
    #[serde(rename = "type")]
    pub kind: OpeningKind,
    /// Fractional center along the wall; clamped to `[0, 1]`
    pub position: f64,
    /// Explicit width in real-world units; falls back to the preset
    #[serde(default)]
    pub width: Option<f64>,
    /// Explicit height in real-world units; falls back to the preset
    #[serde(default)]
    pub height: Option<f64>,
}

impl OpeningRequest {
    pub fn new(kind: OpeningKind, position: f64) -> Self {
        Self {
            kind,
            position,
            width: None,
            height: None,
        }
    }

    pub fn with_size(mut self, width: f64, height: f64) -> Self {
        self.width = Some(width);
        self.height = Some(height);
        self
    }
}

fn positive(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite() && *v > 0.0)
}

/// Explicit dimensions first, then the preset for the opening kind
pub fn resolve_size(request: &OpeningRequest, presets: &OpeningPresets) -> Result<OpeningSize> {
    let preset = presets.get(request.kind);
    let width = positive(request.width).or(preset.map(|p| p.width));
    let height = positive(request.height).or(preset.map(|p| p.height));

    match (width, height) {
        (Some(width), Some(height)) => Ok(OpeningSize::new(width, height)),
        _ => Err(Error::MissingDimensions),
    }
}

/// True when two spans (cells) share more than [`SPAN_TOLERANCE`]
pub fn spans_overlap(a: (f64, f64), b: (f64, f64)) -> bool {
    a.0 < b.1 - SPAN_TOLERANCE && b.0 < a.1 - SPAN_TOLERANCE
}

/// Place an opening on `wall`.
///
/// The span is centered on the requested position and shifted inward when
/// it would cross a wall end. Refuses with `too-short` when the wall cannot
/// hold the opening and `overlap` when another opening is in the way.
pub fn add_opening(
    wall: &mut Wall,
    request: &OpeningRequest,
    presets: &OpeningPresets,
    unit_per_cell: f64,
) -> Result<Feature> {
    let size = resolve_size(request, presets)?;
    let length_cells = size.width / unit_per_cell;
    let wall_length = wall.length() as f64;

    if !length_cells.is_finite() || wall_length <= 0.0 || wall_length < length_cells {
        return Err(Error::TooShort);
    }

    let position = if request.position.is_finite() {
        request.position.clamp(0.0, 1.0)
    } else {
        0.5
    };
    let half = length_cells / wall_length / 2.0;
    let center = position.clamp(half, 1.0 - half);

    let feature = Feature {
        kind: request.kind,
        position: center,
        length_cells,
        width_units: size.width,
        height_units: size.height,
        area: size.width * size.height,
    };

    let span = feature.span_cells(wall_length);
    if wall
        .features()
        .iter()
        .any(|existing| spans_overlap(span, existing.span_cells(wall_length)))
    {
        return Err(Error::Overlap);
    }

    wall.features_mut().push(feature.clone());
    Ok(feature)
}

/// Remove every opening from `wall`; false when it had none
pub fn clear_openings(wall: &mut Wall) -> bool {
    if wall.features().is_empty() {
        return false;
    }
    wall.features_mut().clear();
    true
}

/// Fractional position along `wall` nearest to a point given in cells
pub fn position_on_wall(wall: &Wall, x: f64, y: f64) -> f64 {
    let axis = match wall.orientation() {
        Orientation::Horizontal => x,
        Orientation::Vertical => y,
    };
    (wall.param_of(axis) / wall.length() as f64).clamp(0.0, 1.0)
}
