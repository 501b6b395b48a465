// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Endpoint connectivity: which wall ends are joined to nothing.

use std::collections::BTreeSet;

use rustc_hash::FxHashMap;
use serde::Serialize;

use crate::geometry::is_point_on_wall;
use crate::types::{Point, Wall};

/// Open wall ends of a plan
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Connectivity {
    /// Walls with at least one open end
    pub open_wall_indexes: BTreeSet<usize>,
    /// Open end points, in first-seen order
    pub open_endpoints: Vec<Point>,
}

impl Connectivity {
    pub fn is_closed(&self) -> bool {
        self.open_endpoints.is_empty()
    }
}

/// Build the endpoint adjacency map and report degree-1 endpoints.
///
/// A wall whose interior passes through another wall's endpoint counts as
/// touching it (T-junction). Runs in O(W²) for W walls.
pub fn compute_connectivity(walls: &[Wall]) -> Connectivity {
    // Insertion order of endpoint keys keeps the output deterministic
    let mut order: Vec<Point> = Vec::new();
    let mut entries: FxHashMap<Point, Vec<usize>> = FxHashMap::default();

    for (index, wall) in walls.iter().enumerate() {
        for point in [wall.start(), wall.end()] {
            let list = entries.entry(point).or_insert_with(|| {
                order.push(point);
                Vec::new()
            });
            list.push(index);
        }
    }

    for point in &order {
        let Some(list) = entries.get_mut(point) else {
            continue;
        };
        for (index, wall) in walls.iter().enumerate() {
            if list.contains(&index) {
                continue;
            }
            if is_point_on_wall(*point, wall) {
                list.push(index);
            }
        }
    }

    let mut result = Connectivity::default();
    for point in order {
        let Some(list) = entries.get(&point) else {
            continue;
        };
        if list.len() <= 1 {
            result.open_wall_indexes.extend(list.iter().copied());
            result.open_endpoints.push(point);
        }
    }

    result
}
