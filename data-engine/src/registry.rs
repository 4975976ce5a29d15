//! Bundle registry: the engine builds available to the initializer

use dashboard_types::{BundleTier, BundleVariant, DashboardConfig};

/// Static table of bundle variants in preference order
#[derive(Clone, Debug)]
pub struct BundleRegistry {
    variants: Vec<BundleVariant>,
}

impl BundleRegistry {
    /// Standard layout rooted at `base` (e.g. `/duckdb` or `https://host/duckdb`)
    pub fn new(base: &str) -> Self {
        let base = base.trim_end_matches('/');
        Self {
            variants: BundleTier::PREFERENCE_ORDER
                .iter()
                .map(|tier| standard_variant(base, *tier))
                .collect(),
        }
    }

    pub fn from_config(config: &DashboardConfig) -> Self {
        Self::new(&config.asset_base())
    }

    /// Registry over an explicit table; order is preference order
    pub fn from_variants(variants: Vec<BundleVariant>) -> Self {
        Self { variants }
    }

    /// Variants in preference order, highest capability first
    pub fn list_variants(&self) -> Vec<BundleVariant> {
        self.variants.clone()
    }

    pub fn variant(&self, tier: BundleTier) -> Option<&BundleVariant> {
        self.variants.iter().find(|v| v.tier == tier)
    }
}

fn standard_variant(base: &str, tier: BundleTier) -> BundleVariant {
    let t = tier.as_str();
    BundleVariant {
        tier,
        main_module: format!("{}/duckdb-{}.wasm", base, t),
        main_worker: format!("{}/duckdb-browser-{}.worker.js", base, t),
        pthread_worker: tier
            .has_pthread_worker()
            .then(|| format!("{}/duckdb-browser-{}.pthread.worker.js", base, t)),
    }
}
