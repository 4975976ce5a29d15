//! DuckDB-WASM backend

use crate::backend::{EngineConnection, EngineHandle, EngineLoader};
use crate::error::EngineFault;
use crate::raw::RawResult;
use crate::web::result::classify;
use async_trait::async_trait;
use dashboard_types::BundleVariant;
use log::info;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

#[wasm_bindgen(module = "@duckdb/duckdb-wasm")]
extern "C" {
    #[wasm_bindgen(js_name = createWorker, catch)]
    async fn create_worker(url: &str) -> Result<JsValue, JsValue>;

    type ConsoleLogger;

    #[wasm_bindgen(constructor)]
    fn new() -> ConsoleLogger;

    type AsyncDuckDB;

    #[wasm_bindgen(constructor)]
    fn new(logger: &ConsoleLogger, worker: &web_sys::Worker) -> AsyncDuckDB;

    #[wasm_bindgen(method, catch)]
    async fn instantiate(
        this: &AsyncDuckDB,
        main_module: &str,
        pthread_worker: Option<String>,
    ) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(method, catch)]
    async fn connect(this: &AsyncDuckDB) -> Result<JsValue, JsValue>;

    type AsyncDuckDBConnection;

    #[wasm_bindgen(method, catch)]
    async fn query(this: &AsyncDuckDBConnection, sql: &str) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(method, catch)]
    async fn close(this: &AsyncDuckDBConnection) -> Result<JsValue, JsValue>;
}

fn fault(context: &str, err: JsValue) -> EngineFault {
    let detail = err
        .dyn_ref::<js_sys::Error>()
        .map(|e| String::from(e.message()))
        .or_else(|| err.as_string())
        .unwrap_or_else(|| format!("{:?}", err));
    EngineFault::new(format!("{}: {}", context, detail))
}

/// Spawns a DuckDB worker and instantiates the bundle's module in it
#[derive(Clone, Copy, Debug, Default)]
pub struct WebLoader;

#[async_trait(?Send)]
impl EngineLoader for WebLoader {
    type Handle = WebHandle;

    async fn instantiate(&self, variant: &BundleVariant) -> Result<WebHandle, EngineFault> {
        let worker: web_sys::Worker = create_worker(&variant.main_worker)
            .await
            .map_err(|e| fault("failed to start worker", e))?
            .dyn_into()
            .map_err(|e| fault("createWorker did not return a Worker", e))?;

        let db = AsyncDuckDB::new(&ConsoleLogger::new(), &worker);
        if let Err(err) = db
            .instantiate(&variant.main_module, variant.pthread_worker.clone())
            .await
        {
            worker.terminate();
            return Err(fault("failed to instantiate module", err));
        }

        info!("DuckDB-WASM ready ({} bundle)", variant.tier);
        Ok(WebHandle { db, _worker: worker })
    }
}

/// A DuckDB instance living in its own worker
pub struct WebHandle {
    db: AsyncDuckDB,
    _worker: web_sys::Worker,
}

#[async_trait(?Send)]
impl EngineHandle for WebHandle {
    type Connection = WebConnection;

    async fn connect(&self) -> Result<WebConnection, EngineFault> {
        let conn = self
            .db
            .connect()
            .await
            .map_err(|e| fault("failed to connect", e))?;
        Ok(WebConnection {
            conn: conn.unchecked_into(),
        })
    }
}

pub struct WebConnection {
    conn: AsyncDuckDBConnection,
}

#[async_trait(?Send)]
impl EngineConnection for WebConnection {
    async fn query(&mut self, sql: &str) -> Result<RawResult, EngineFault> {
        let table = self.conn.query(sql).await.map_err(|e| fault("query", e))?;
        Ok(classify(&table))
    }

    async fn close(self) -> Result<(), EngineFault> {
        self.conn
            .close()
            .await
            .map(|_| ())
            .map_err(|e| fault("failed to close connection", e))
    }
}
