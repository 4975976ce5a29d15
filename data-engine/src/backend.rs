//! Seams to the embedded analytical engine and its asset host
//!
//! The engine itself is a black box: it can be instantiated from a bundle
//! variant, opens connections, and runs SQL. Everything is `?Send` because
//! the service runs on a single cooperative thread.

use crate::error::EngineFault;
use crate::raw::RawResult;
use async_trait::async_trait;
use dashboard_types::BundleVariant;

/// Non-blocking existence check for an asset URL
#[async_trait(?Send)]
pub trait AssetProbe {
    /// `false` for missing assets and for any transport error
    async fn exists(&self, url: &str) -> bool;
}

/// Creates engine instances from bundle variants
#[async_trait(?Send)]
pub trait EngineLoader {
    type Handle: EngineHandle + 'static;

    async fn instantiate(&self, variant: &BundleVariant) -> Result<Self::Handle, EngineFault>;
}

/// A live engine instance
#[async_trait(?Send)]
pub trait EngineHandle {
    type Connection: EngineConnection;

    async fn connect(&self) -> Result<Self::Connection, EngineFault>;
}

/// One query pipeline; must be closed by its user
#[async_trait(?Send)]
pub trait EngineConnection {
    async fn query(&mut self, sql: &str) -> Result<RawResult, EngineFault>;

    async fn close(self) -> Result<(), EngineFault>;
}
