//! Asset probing with `HEAD` requests

use crate::backend::AssetProbe;
use async_trait::async_trait;
use dashboard_types::assets::status_is_present;
use log::debug;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{Request, RequestInit, Response, Window, WorkerGlobalScope};

/// Probe that asks the asset host whether a URL exists
#[derive(Clone, Copy, Debug, Default)]
pub struct FetchProbe;

#[async_trait(?Send)]
impl AssetProbe for FetchProbe {
    async fn exists(&self, url: &str) -> bool {
        match head(url).await {
            Ok(found) => {
                if !found {
                    debug!("asset not found: {}", url);
                }
                found
            }
            Err(err) => {
                debug!("asset probe failed for {}: {:?}", url, err);
                false
            }
        }
    }
}

async fn head(url: &str) -> Result<bool, JsValue> {
    let init = RequestInit::new();
    init.set_method("HEAD");
    let request = Request::new_with_str_and_init(url, &init)?;

    let global = js_sys::global();
    let promise = if let Some(window) = global.dyn_ref::<Window>() {
        window.fetch_with_request(&request)
    } else if let Some(scope) = global.dyn_ref::<WorkerGlobalScope>() {
        scope.fetch_with_request(&request)
    } else {
        return Err(JsValue::from_str("fetch is not available in this context"));
    };

    let response: Response = JsFuture::from(promise).await?.dyn_into()?;
    Ok(status_is_present(response.status()))
}
