// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! FloorSketch WebAssembly Bindings
//!
//! JavaScript/TypeScript API for the sketch tool built with wasm-bindgen.

use wasm_bindgen::prelude::*;

mod api;
mod export;
mod utils;

pub use api::SketchAPI;
pub use export::send_metrics;
pub use utils::set_panic_hook;

/// Initialize the WASM module
#[wasm_bindgen(start)]
pub fn init() {
    utils::set_panic_hook();
}

/// Get the version of FloorSketch
#[wasm_bindgen]
pub fn version() -> String {
    floorsketch_core::VERSION.to_string()
}
