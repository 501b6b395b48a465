// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Export settings loaded from environment variables.

use std::time::Duration;

use floorsketch_export::DEFAULT_POLL_DELAY;

#[derive(Debug, Clone)]
pub struct ExportConfig {
    /// Handoff endpoint; `FLOORSKETCH_EXPORT_URL`
    pub url: Option<String>,
    /// Wait before following a poll URL; `FLOORSKETCH_POLL_DELAY_MS`
    pub poll_delay: Duration,
}

impl ExportConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            url: lookup("FLOORSKETCH_EXPORT_URL")
                .map(|url| url.trim().to_string())
                .filter(|url| !url.is_empty()),
            poll_delay: lookup("FLOORSKETCH_POLL_DELAY_MS")
                .and_then(|ms| ms.parse().ok())
                .map(Duration::from_millis)
                .unwrap_or(DEFAULT_POLL_DELAY),
        }
    }
}
