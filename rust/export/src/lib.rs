// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # FloorSketch Export
//!
//! Sends plan metrics to an engineer handoff endpoint and turns the outcome
//! into status text for the user. Works natively and on `wasm32`, where
//! requests go through the browser's fetch.
//!
//! ```rust,ignore
//! use floorsketch_export::{ExportClient, ExportPayload};
//!
//! let payload = ExportPayload::from_metrics(session.metrics(), timestamp);
//! let status = match ExportClient::new(&url) {
//!     Ok(client) => match client.send_and_poll(&payload).await {
//!         Ok(receipt) => receipt.message,
//!         Err(err) => err.status_text(),
//!     },
//!     Err(err) => err.status_text(),
//! };
//! ```

pub mod client;
pub mod error;
pub mod payload;
pub mod response;

pub use client::{ExportClient, DEFAULT_POLL_DELAY};
pub use error::{ExportError, Result};
pub use payload::{ExportPayload, PayloadMetrics};
pub use response::{
    document_url, interpret_response, ExportReceipt, DEFAULT_SUCCESS_MESSAGE, PENDING_MESSAGE,
};
