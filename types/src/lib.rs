//! Shared types for the sales dashboard
//!
//! All types are exported to TypeScript via tsify.

pub mod assets;
pub mod bundle;
pub mod chart;
pub mod config;
pub mod data;

pub use bundle::*;
pub use chart::*;
pub use config::*;
pub use data::*;
