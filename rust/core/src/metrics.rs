// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Plan metrics derived from the walls: counts, lengths, enclosed area and
//! opening totals.

use serde::Serialize;

use crate::config::PlanConfig;
use crate::geometry::enclosed_area_cells;
use crate::types::{OpeningKind, Wall};

/// Round for display: whole numbers stay whole, others keep two decimals
pub fn round_display(value: f64) -> f64 {
    if value.fract() == 0.0 {
        value
    } else {
        (value * 100.0).round() / 100.0
    }
}

/// Snapshot of plan measurements in cells and in real-world units
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanMetrics {
    pub wall_count: usize,
    pub total_length_cells: i64,
    pub total_length_value: f64,
    pub enclosed_cells: usize,
    pub enclosed_area_value: f64,
    pub unit_label: String,
    pub last_wall_length_value: Option<f64>,
    pub grid_spacing: f64,
    pub unit_per_cell: f64,
    pub window_area: f64,
    pub door_area: f64,
    pub window_count: usize,
    pub door_count: usize,
}

impl PlanMetrics {
    pub fn compute(walls: &[Wall], config: &PlanConfig) -> Self {
        let unit = config.unit_per_cell;
        let total_length_cells: i64 = walls.iter().map(|w| w.length() as i64).sum();
        let enclosed_cells = enclosed_area_cells(walls);

        let mut metrics = Self {
            wall_count: walls.len(),
            total_length_cells,
            total_length_value: total_length_cells as f64 * unit,
            enclosed_cells,
            enclosed_area_value: enclosed_cells as f64 * unit * unit,
            unit_label: config.unit_label.clone(),
            last_wall_length_value: walls.last().map(|w| w.length() as f64 * unit),
            grid_spacing: config.grid_size,
            unit_per_cell: unit,
            window_area: 0.0,
            door_area: 0.0,
            window_count: 0,
            door_count: 0,
        };

        for feature in walls.iter().flat_map(|w| w.features()) {
            let area = if feature.area.is_finite() {
                feature.area
            } else {
                feature.width_units * feature.height_units
            };
            let area = if area.is_finite() && area > 0.0 { area } else { 0.0 };

            match feature.kind {
                OpeningKind::Door => {
                    metrics.door_count += 1;
                    metrics.door_area += area;
                }
                OpeningKind::Window => {
                    metrics.window_count += 1;
                    metrics.window_area += area;
                }
            }
        }

        metrics
    }

    /// e.g. `"12.5 m"`
    pub fn total_length_label(&self) -> String {
        format!("{} {}", round_display(self.total_length_value), self.unit_label)
    }

    /// e.g. `"6.25 m²"`
    pub fn enclosed_area_label(&self) -> String {
        format!("{} {}²", round_display(self.enclosed_area_value), self.unit_label)
    }

    pub fn last_wall_length_label(&self) -> Option<String> {
        self.last_wall_length_value
            .map(|v| format!("{} {}", round_display(v), self.unit_label))
    }
}
