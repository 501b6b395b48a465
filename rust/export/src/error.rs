// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Export error types

use thiserror::Error;

pub type Result<T> = std::result::Result<T, ExportError>;

/// Why a metrics export did not go through
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Enter the engineer handoff link before sending.")]
    MissingUrl,

    /// The endpoint answered, but with a failure
    #[error("{0}")]
    Rejected(String),

    #[error("{0}")]
    Transport(#[from] reqwest::Error),

    #[error("could not encode payload: {0}")]
    Encode(#[from] serde_json::Error),
}

impl ExportError {
    /// Status line for the user
    pub fn status_text(&self) -> String {
        match self {
            ExportError::MissingUrl => self.to_string(),
            other => format!("We couldn't reach our engineers: {other}"),
        }
    }
}
