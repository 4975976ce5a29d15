//! Engine bundle variants and the execution context they are resolved in

use serde::{Deserialize, Serialize};
use std::fmt;
use tsify::Tsify;

/// Capability tier of a packaged engine build
#[derive(Tsify, Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[tsify(into_wasm_abi, from_wasm_abi)]
#[serde(rename_all = "lowercase")]
pub enum BundleTier {
    /// Baseline WebAssembly, no extensions
    Mvp,
    /// Native exception handling
    Eh,
    /// Cross-origin isolated, threaded
    Coi,
}

impl BundleTier {
    /// All tiers, highest capability first
    pub const PREFERENCE_ORDER: [BundleTier; 3] = [BundleTier::Coi, BundleTier::Eh, BundleTier::Mvp];

    /// Suffix used in asset file names
    pub fn as_str(&self) -> &'static str {
        match self {
            BundleTier::Mvp => "mvp",
            BundleTier::Eh => "eh",
            BundleTier::Coi => "coi",
        }
    }

    /// Whether this tier ships a dedicated pthread worker
    pub fn has_pthread_worker(&self) -> bool {
        matches!(self, BundleTier::Coi)
    }
}

impl fmt::Display for BundleTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One loadable engine build: module plus worker scripts
#[derive(Tsify, Serialize, Deserialize, Clone, Debug, PartialEq)]
#[tsify(into_wasm_abi, from_wasm_abi)]
pub struct BundleVariant {
    /// Capability tier
    pub tier: BundleTier,
    /// URL of the `.wasm` module
    pub main_module: String,
    /// URL of the main worker script
    pub main_worker: String,
    /// URL of the pthread worker script (threaded tier only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pthread_worker: Option<String>,
}

impl BundleVariant {
    /// Locators that must resolve before the variant can be instantiated
    pub fn required_locators(&self) -> [&str; 2] {
        [&self.main_module, &self.main_worker]
    }

    /// True when every required locator is non-empty
    pub fn has_required_locators(&self) -> bool {
        self.required_locators().iter().all(|url| !url.trim().is_empty())
    }
}

/// Where the page runs, which decides how asset URLs are rooted
#[derive(Tsify, Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[tsify(into_wasm_abi, from_wasm_abi)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ExecutionContext {
    /// Embedded in a page; URLs are origin-relative
    #[default]
    Embedded,
    /// URLs must be absolute, rooted at the page origin
    Absolute { origin: String },
}

impl ExecutionContext {
    /// Base that asset paths are appended to
    pub fn base_path(&self) -> &str {
        match self {
            ExecutionContext::Embedded => "",
            ExecutionContext::Absolute { origin } => origin.trim_end_matches('/'),
        }
    }
}
