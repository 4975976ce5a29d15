//! Engine asset manifest and the response headers assets must carry

/// Files the asset setup step places under the asset prefix
pub const REQUIRED_ASSETS: &[&str] = &[
    "duckdb-browser-eh.worker.js",
    "duckdb-browser-eh.worker.js.map",
    "duckdb-browser-mvp.worker.js",
    "duckdb-eh.wasm",
    "duckdb-mvp.wasm",
    "duckdb-browser-coi.worker.js",
    "duckdb-browser-coi.worker.js.map",
    "duckdb-browser-coi.pthread.worker.js",
    "duckdb-browser-coi.pthread.worker.js.map",
    "duckdb-coi.wasm",
    "duckdb-browser.mjs",
];

pub const CROSS_ORIGIN_EMBEDDER_POLICY: &str = "require-corp";
pub const CROSS_ORIGIN_OPENER_POLICY: &str = "same-origin";
pub const CROSS_ORIGIN_RESOURCE_POLICY: &str = "cross-origin";
pub const CACHE_CONTROL: &str = "public, max-age=31536000, immutable";

/// Policy that lets the engine spawn blob workers and fetch its assets
pub const CONTENT_SECURITY_POLICY: &str = "default-src 'self'; \
script-src 'self' 'unsafe-inline' 'unsafe-eval' blob:; \
worker-src 'self' blob:; \
style-src 'self' 'unsafe-inline'; \
font-src 'self' data:; \
img-src 'self' data:; \
connect-src 'self' blob:;";

/// Content type for an asset path, by extension
pub fn content_type(path: &str) -> &'static str {
    let name = path.rsplit('/').next().unwrap_or(path).to_ascii_lowercase();
    let ext = match name.rfind('.') {
        Some(idx) => &name[idx + 1..],
        None => return "application/octet-stream",
    };
    match ext {
        "wasm" => "application/wasm",
        "js" | "mjs" => "application/javascript",
        "map" | "json" => "application/json",
        "html" => "text/html",
        "css" => "text/css",
        "svg" => "image/svg+xml",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        _ => "application/octet-stream",
    }
}

/// Whether an HTTP status means the asset exists
pub fn status_is_present(status: u16) -> bool {
    (200..300).contains(&status)
}

/// Full header set for serving an engine asset
pub fn asset_headers(path: &str) -> Vec<(&'static str, &'static str)> {
    vec![
        ("Content-Type", content_type(path)),
        ("Cache-Control", CACHE_CONTROL),
        ("Cross-Origin-Embedder-Policy", CROSS_ORIGIN_EMBEDDER_POLICY),
        ("Cross-Origin-Opener-Policy", CROSS_ORIGIN_OPENER_POLICY),
        ("Cross-Origin-Resource-Policy", CROSS_ORIGIN_RESOURCE_POLICY),
        ("Content-Security-Policy", CONTENT_SECURITY_POLICY),
    ]
}
