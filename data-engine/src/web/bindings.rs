//! JavaScript-facing dashboard API

use crate::dashboard::load_dashboard;
use crate::service::DashboardEngine;
use crate::web::duckdb::WebLoader;
use crate::web::probe::FetchProbe;
use dashboard_types::assets::asset_headers;
use dashboard_types::{DashboardConfig, EngineStatus, QueryRows};
use js_sys::Promise;
use serde::Serialize;
use std::collections::BTreeMap;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::future_to_promise;

type WebEngine = DashboardEngine<WebLoader, FetchProbe>;

fn to_js<T: Serialize>(value: &T) -> Result<JsValue, JsValue> {
    let json = serde_json::to_string(value).map_err(|e| JsValue::from_str(&e.to_string()))?;
    js_sys::JSON::parse(&json)
}

fn js_error(err: impl std::fmt::Display) -> JsValue {
    JsError::new(&err.to_string()).into()
}

/// Browser analytics engine backing the dashboard page
#[wasm_bindgen]
pub struct Dashboard {
    engine: WebEngine,
}

#[wasm_bindgen]
impl Dashboard {
    #[wasm_bindgen(constructor)]
    pub fn new(config: Option<DashboardConfig>) -> Dashboard {
        let config = config.unwrap_or_default();
        Self {
            engine: DashboardEngine::new(&config, WebLoader, FetchProbe),
        }
    }

    pub fn status(&self) -> EngineStatus {
        self.engine.status()
    }

    /// Resolves once an engine is ready; rejects with every attempt's failure
    pub fn initialize(&self) -> Promise {
        let engine = self.engine.clone();
        future_to_promise(async move {
            engine.initialize().await.map_err(js_error)?;
            to_js(&engine.status())
        })
    }

    /// Discard a failed attempt and initialize again
    pub fn retry(&self) -> Promise {
        let engine = self.engine.clone();
        future_to_promise(async move {
            engine.retry().await.map_err(js_error)?;
            to_js(&engine.status())
        })
    }

    /// Run `sql` and resolve with `{ rows }` of normalized row objects
    #[wasm_bindgen(js_name = runQuery)]
    pub fn run_query(&self, sql: String) -> Promise {
        let engine = self.engine.clone();
        future_to_promise(async move {
            let rows = engine.run(&sql).await.map_err(js_error)?;
            to_js(&QueryRows::from(rows))
        })
    }

    /// Resolve with the region, product and daily series
    #[wasm_bindgen(js_name = loadDashboard)]
    pub fn load_dashboard(&self) -> Promise {
        let engine = self.engine.clone();
        future_to_promise(async move {
            let data = load_dashboard(&engine).await.map_err(js_error)?;
            to_js(&data)
        })
    }

    /// Resolve with Chart.js configs for the dashboard series
    pub fn charts(&self) -> Promise {
        let engine = self.engine.clone();
        future_to_promise(async move {
            let data = load_dashboard(&engine).await.map_err(js_error)?;
            to_js(&data.charts())
        })
    }
}

/// Response headers the asset host must send for `path`
#[wasm_bindgen(js_name = assetHeaders)]
pub fn asset_headers_js(path: &str) -> Result<JsValue, JsValue> {
    let headers: BTreeMap<&str, &str> = asset_headers(path).into_iter().collect();
    to_js(&headers)
}
