// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Sketch configuration: grid scale, units, opening presets and the
//! heuristic tolerances used by snapping, trimming and suggestions.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::types::{OpeningKind, Point};

/// Width and height of an opening, in real-world units
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OpeningSize {
    pub width: f64,
    pub height: f64,
}

impl OpeningSize {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    fn is_valid(&self) -> bool {
        self.width.is_finite() && self.width > 0.0 && self.height.is_finite() && self.height > 0.0
    }
}

/// Default sizes per opening kind
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OpeningPresets {
    pub window: Option<OpeningSize>,
    pub door: Option<OpeningSize>,
}

impl Default for OpeningPresets {
    fn default() -> Self {
        Self {
            window: Some(OpeningSize::new(1.5, 1.2)),
            door: Some(OpeningSize::new(0.9, 2.0)),
        }
    }
}

impl OpeningPresets {
    pub fn get(&self, kind: OpeningKind) -> Option<OpeningSize> {
        let size = match kind {
            OpeningKind::Window => self.window,
            OpeningKind::Door => self.door,
        };
        size.filter(OpeningSize::is_valid)
    }

    pub fn set(&mut self, kind: OpeningKind, size: Option<OpeningSize>) {
        match kind {
            OpeningKind::Window => self.window = size,
            OpeningKind::Door => self.door = size,
        }
    }
}

/// Configuration for a sketch session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PlanConfig {
    /// Pixels per grid cell
    pub grid_size: f64,
    /// Label of the real-world unit, e.g. "m"
    pub unit_label: String,
    /// Real-world units per grid cell
    pub unit_per_cell: f64,
    pub opening_presets: OpeningPresets,
    /// Snap dragged walls onto nearby wall endpoints
    pub snap_to_walls: bool,
    /// Maximum endpoint distance for move snapping (cells)
    pub snap_threshold_cells: f64,
    /// Largest collinear gap closed by a gap suggestion (cells)
    pub suggestion_gap_cells: i32,
    /// Width removed by a trim on a side with no bounding intersection
    /// (cells). At 0 only a target between grid points removes anything.
    pub trim_gap_cells: f64,
    /// Largest overshoot pulled back by extension trimming (cells)
    pub extension_trim_cells: i32,
    /// Maximum undo depth
    pub history_depth: usize,
    /// Pointer distance for picking a wall (pixels)
    pub selection_tolerance_px: f64,
}

impl Default for PlanConfig {
    fn default() -> Self {
        Self {
            grid_size: 13.0,
            unit_label: "m".to_string(),
            unit_per_cell: 0.5,
            opening_presets: OpeningPresets::default(),
            snap_to_walls: true,
            snap_threshold_cells: 0.75,
            suggestion_gap_cells: 2,
            trim_gap_cells: 1.0,
            extension_trim_cells: 2,
            history_depth: 200,
            selection_tolerance_px: 10.0,
        }
    }
}

impl PlanConfig {
    /// Parse and validate configuration from JSON; missing keys take defaults
    pub fn from_json(json: &str) -> Result<Self> {
        let config: PlanConfig =
            serde_json::from_str(json).map_err(|e| Error::Config(e.to_string()))?;
        config.validated()
    }

    /// Check scales and tolerances; an empty unit label becomes "units"
    pub fn validated(mut self) -> Result<Self> {
        if !(self.grid_size.is_finite() && self.grid_size > 0.0) {
            return Err(Error::Config(format!("gridSize must be positive, got {}", self.grid_size)));
        }
        if !(self.unit_per_cell.is_finite() && self.unit_per_cell > 0.0) {
            return Err(Error::Config(format!(
                "unitPerCell must be positive, got {}",
                self.unit_per_cell
            )));
        }
        if !(self.snap_threshold_cells.is_finite() && self.snap_threshold_cells >= 0.0) {
            return Err(Error::Config("snapThresholdCells must be non-negative".into()));
        }
        if !(self.trim_gap_cells.is_finite() && self.trim_gap_cells >= 0.0) {
            return Err(Error::Config("trimGapCells must be non-negative".into()));
        }
        if self.suggestion_gap_cells < 0 || self.extension_trim_cells < 0 {
            return Err(Error::Config("gap thresholds must be non-negative".into()));
        }
        if self.history_depth == 0 {
            return Err(Error::Config("historyDepth must be at least 1".into()));
        }

        let label = self.unit_label.trim();
        self.unit_label = if label.is_empty() {
            "units".to_string()
        } else {
            label.to_string()
        };

        Ok(self)
    }

    /// Grid cell nearest to a pixel position
    pub fn cell_from_pixels(&self, px: f64, py: f64) -> Point {
        Point::new(
            (px / self.grid_size).round() as i32,
            (py / self.grid_size).round() as i32,
        )
    }
}
