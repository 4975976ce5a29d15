//! Dashboard configuration

use crate::bundle::ExecutionContext;
use serde::{Deserialize, Serialize};
use tsify::Tsify;

/// Settings for the dashboard engine service
#[derive(Tsify, Serialize, Deserialize, Clone, Debug, PartialEq)]
#[tsify(into_wasm_abi, from_wasm_abi)]
pub struct DashboardConfig {
    /// Path prefix the engine assets are served under
    #[serde(default = "default_asset_prefix")]
    pub asset_prefix: String,
    /// How asset URLs are rooted
    #[serde(default)]
    pub context: ExecutionContext,
    /// Seed the `sales` sample table after instantiation
    #[serde(default = "default_true")]
    pub seed_sample_data: bool,
    /// Columns whose values must always be chart-safe numbers
    #[serde(default = "default_aggregate_columns")]
    pub aggregate_columns: Vec<String>,
}

fn default_asset_prefix() -> String {
    "/duckdb".to_string()
}

fn default_true() -> bool {
    true
}

fn default_aggregate_columns() -> Vec<String> {
    vec!["total".into(), "amount".into(), "count".into()]
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            asset_prefix: default_asset_prefix(),
            context: ExecutionContext::default(),
            seed_sample_data: true,
            aggregate_columns: default_aggregate_columns(),
        }
    }
}

impl DashboardConfig {
    /// Config for a page served from `origin`, using absolute asset URLs
    pub fn with_origin(origin: impl Into<String>) -> Self {
        Self {
            context: ExecutionContext::Absolute {
                origin: origin.into(),
            },
            ..Self::default()
        }
    }

    /// Asset URL prefix with the context base applied, no trailing slash
    pub fn asset_base(&self) -> String {
        let prefix = self.asset_prefix.trim_end_matches('/');
        let prefix = if prefix.is_empty() || prefix.starts_with('/') {
            prefix.to_string()
        } else {
            format!("/{}", prefix)
        };
        format!("{}{}", self.context.base_path(), prefix)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_object_uses_defaults() {
        let config: DashboardConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, DashboardConfig::default());
        assert_eq!(config.asset_base(), "/duckdb");
        assert!(config.seed_sample_data);
    }

    #[test]
    fn absolute_context_prefixes_origin() {
        let config = DashboardConfig::with_origin("http://localhost:3000/");
        assert_eq!(config.asset_base(), "http://localhost:3000/duckdb");
    }

    #[test]
    fn prefix_is_normalized() {
        let config = DashboardConfig {
            asset_prefix: "assets/duckdb/".into(),
            ..DashboardConfig::default()
        };
        assert_eq!(config.asset_base(), "/assets/duckdb");
    }
}
