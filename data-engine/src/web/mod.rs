//! Browser backend: DuckDB-WASM in a web worker

mod bindings;
pub mod duckdb;
pub mod probe;
pub mod result;

pub use bindings::Dashboard;
pub use duckdb::WebLoader;
pub use probe::FetchProbe;
