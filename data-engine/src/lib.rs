//! DataEngine - DuckDB analytics behind the sales dashboard
//!
//! Selects the best DuckDB-WASM bundle the asset host serves, instantiates it
//! once, seeds the sample `sales` table and runs SQL through a normalizer that
//! keeps every value chart-safe. Native builds run the same service on an
//! in-memory DuckDB database.

pub mod backend;
pub mod dashboard;
pub mod error;
pub mod normalize;
pub mod raw;
pub mod registry;
pub mod seed;
pub mod service;

#[cfg(not(target_arch = "wasm32"))]
pub mod assets;
#[cfg(not(target_arch = "wasm32"))]
pub mod native;
#[cfg(target_arch = "wasm32")]
pub mod web;

#[cfg(test)]
mod testing;

pub use dashboard::load_dashboard;
pub use error::{EngineError, InitializationError, QueryError, Result};
pub use normalize::Normalizer;
pub use registry::BundleRegistry;
pub use service::DashboardEngine;

// Re-export types
pub use dashboard_types::data::*;

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

/// Initialize the data engine
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn init() {
    // Set up panic hook for better error messages
    console_error_panic_hook::set_once();

    console_log::init_with_level(log::Level::Debug).ok();

    log::info!("DataEngine initialized");
}
