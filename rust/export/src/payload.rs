// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! JSON body posted to the handoff endpoint

use floorsketch_core::PlanMetrics;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportPayload {
    /// RFC 3339 time of the export, supplied by the host
    pub timestamp: String,
    pub metrics: PayloadMetrics,
}

/// Plan measurements in the shape the spreadsheet script expects
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PayloadMetrics {
    pub area: f64,
    pub area_label: String,
    pub area_cells: usize,
    pub wall_count: usize,
    pub total_wall_length: f64,
    pub total_wall_length_label: String,
    pub total_wall_length_cells: i64,
    pub last_wall_length: Option<f64>,
    pub last_wall_length_label: Option<String>,
    pub unit_label: String,
    pub units_per_square: f64,
    pub grid_spacing: f64,
    pub window_count: usize,
    pub window_area: f64,
    pub door_count: usize,
    pub door_area: f64,
}

impl ExportPayload {
    pub fn from_metrics(metrics: &PlanMetrics, timestamp: impl Into<String>) -> Self {
        Self {
            timestamp: timestamp.into(),
            metrics: PayloadMetrics {
                area: metrics.enclosed_area_value,
                area_label: metrics.enclosed_area_label(),
                area_cells: metrics.enclosed_cells,
                wall_count: metrics.wall_count,
                total_wall_length: metrics.total_length_value,
                total_wall_length_label: metrics.total_length_label(),
                total_wall_length_cells: metrics.total_length_cells,
                last_wall_length: metrics.last_wall_length_value,
                last_wall_length_label: metrics.last_wall_length_label(),
                unit_label: metrics.unit_label.clone(),
                units_per_square: metrics.unit_per_cell,
                grid_spacing: metrics.grid_spacing,
                window_count: metrics.window_count,
                window_area: metrics.window_area,
                door_count: metrics.door_count,
                door_area: metrics.door_area,
            },
        }
    }
}
