//! Local asset directory checks (native builds)

use crate::backend::AssetProbe;
use async_trait::async_trait;
use dashboard_types::assets::REQUIRED_ASSETS;
use std::path::{Component, Path, PathBuf};

/// Required engine assets absent from `dir`
pub fn missing_assets(dir: &Path) -> Vec<&'static str> {
    REQUIRED_ASSETS
        .iter()
        .copied()
        .filter(|name| !dir.join(name).is_file())
        .collect()
}

/// Probe resolving asset URLs against a local directory
///
/// `/duckdb/duckdb-eh.wasm` (or `https://host/duckdb/duckdb-eh.wasm`) with
/// prefix `/duckdb` resolves to `<root>/duckdb-eh.wasm`.
#[derive(Clone, Debug)]
pub struct LocalAssetProbe {
    root: PathBuf,
    prefix: String,
}

impl LocalAssetProbe {
    pub fn new(root: impl Into<PathBuf>, prefix: &str) -> Self {
        Self {
            root: root.into(),
            prefix: prefix.trim_end_matches('/').to_string(),
        }
    }

    /// Local file for `url`, or `None` if it escapes the root
    pub fn resolve(&self, url: &str) -> Option<PathBuf> {
        let path = url_path(url);
        let relative = match path.strip_prefix(self.prefix.as_str()) {
            Some(rest) if rest.is_empty() || rest.starts_with('/') => rest,
            _ => path,
        }
        .trim_start_matches('/');
        let relative = Path::new(relative);
        if relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_)))
        {
            return None;
        }
        Some(self.root.join(relative))
    }
}

#[async_trait(?Send)]
impl AssetProbe for LocalAssetProbe {
    async fn exists(&self, url: &str) -> bool {
        self.resolve(url).map_or(false, |path| path.is_file())
    }
}

/// Path component of a URL, without scheme, host, query or fragment
fn url_path(url: &str) -> &str {
    let rest = match url.find("://") {
        Some(idx) => {
            let after = &url[idx + 3..];
            after.find('/').map_or("", |slash| &after[slash..])
        }
        None => url,
    };
    let end = rest.find(|c| c == '?' || c == '#').unwrap_or(rest.len());
    &rest[..end]
}
