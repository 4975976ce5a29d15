//! In-memory engine fakes for unit tests

use crate::backend::{AssetProbe, EngineConnection, EngineHandle, EngineLoader};
use crate::error::EngineFault;
use crate::raw::{ColumnTable, RawResult, RawValue};
use crate::seed::SALES_ROWS;
use async_trait::async_trait;
use dashboard_types::{BundleTier, BundleVariant};
use futures::future::poll_fn;
use std::cell::{Cell, RefCell};
use std::collections::HashSet;
use std::rc::Rc;
use std::task::Poll;

/// Returns `Pending` once, so concurrent callers get a chance to run
pub async fn yield_now() {
    let mut yielded = false;
    poll_fn(|cx| {
        if yielded {
            Poll::Ready(())
        } else {
            yielded = true;
            cx.waker().wake_by_ref();
            Poll::Pending
        }
    })
    .await
}

/// Probe answering from an allow/deny list and recording every URL asked
#[derive(Clone, Default)]
pub struct FakeProbe {
    missing: Rc<RefCell<HashSet<String>>>,
    nothing_reachable: Rc<Cell<bool>>,
    probed: Rc<RefCell<Vec<String>>>,
}

impl FakeProbe {
    pub fn missing(urls: &[&str]) -> Self {
        let probe = Self::default();
        probe
            .missing
            .borrow_mut()
            .extend(urls.iter().map(|u| u.to_string()));
        probe
    }

    pub fn nothing() -> Self {
        let probe = Self::default();
        probe.nothing_reachable.set(true);
        probe
    }

    pub fn make_all_reachable(&self) {
        self.nothing_reachable.set(false);
        self.missing.borrow_mut().clear();
    }

    pub fn probed(&self) -> Vec<String> {
        self.probed.borrow().clone()
    }
}

#[async_trait(?Send)]
impl AssetProbe for FakeProbe {
    async fn exists(&self, url: &str) -> bool {
        self.probed.borrow_mut().push(url.to_string());
        !self.nothing_reachable.get() && !self.missing.borrow().contains(url)
    }
}

/// Loader producing [`FakeHandle`]s, with per-tier failure injection
#[derive(Clone, Default)]
pub struct FakeLoader {
    failing: Rc<HashSet<BundleTier>>,
    yielding: bool,
    broken_seed: bool,
    attempted: Rc<RefCell<Vec<BundleTier>>>,
    instantiations: Rc<Cell<usize>>,
}

impl FakeLoader {
    pub fn failing(tiers: &[BundleTier]) -> Self {
        Self {
            failing: Rc::new(tiers.iter().copied().collect()),
            ..Self::default()
        }
    }

    /// Suspend once inside every instantiation
    pub fn yielding(mut self) -> Self {
        self.yielding = true;
        self
    }

    /// Handles reject every statement issued while seeding
    pub fn with_broken_seed(mut self) -> Self {
        self.broken_seed = true;
        self
    }

    pub fn attempted(&self) -> Vec<BundleTier> {
        self.attempted.borrow().clone()
    }

    /// Successful instantiations
    pub fn instantiations(&self) -> usize {
        self.instantiations.get()
    }
}

#[async_trait(?Send)]
impl EngineLoader for FakeLoader {
    type Handle = FakeHandle;

    async fn instantiate(&self, variant: &BundleVariant) -> Result<FakeHandle, EngineFault> {
        self.attempted.borrow_mut().push(variant.tier);
        if self.yielding {
            yield_now().await;
        }
        if self.failing.contains(&variant.tier) {
            return Err(EngineFault::new(format!("{} bundle rejected", variant.tier)));
        }
        self.instantiations.set(self.instantiations.get() + 1);
        let db = FakeDb::default();
        db.reject_all.set(self.broken_seed);
        Ok(FakeHandle {
            tier: variant.tier,
            db: Rc::new(db),
        })
    }
}

#[derive(Debug, Default)]
struct FakeDb {
    table_exists: Cell<bool>,
    rows: Cell<usize>,
    reject_all: Cell<bool>,
    refuse_connections: Cell<bool>,
    opened: Cell<usize>,
    closed: Cell<usize>,
}

/// Engine handle over a row counter standing in for the `sales` table
#[derive(Debug)]
pub struct FakeHandle {
    pub tier: BundleTier,
    db: Rc<FakeDb>,
}

impl FakeHandle {
    pub fn row_count(&self) -> usize {
        self.db.rows.get()
    }

    /// (opened, closed) connection counts
    pub fn connection_counts(&self) -> (usize, usize) {
        (self.db.opened.get(), self.db.closed.get())
    }

    pub fn refuse_connections(&self) {
        self.db.refuse_connections.set(true);
    }
}

#[async_trait(?Send)]
impl EngineHandle for FakeHandle {
    type Connection = FakeConnection;

    async fn connect(&self) -> Result<FakeConnection, EngineFault> {
        if self.db.refuse_connections.get() {
            return Err(EngineFault::new("connection refused"));
        }
        self.db.opened.set(self.db.opened.get() + 1);
        Ok(FakeConnection {
            db: Rc::clone(&self.db),
        })
    }
}

pub struct FakeConnection {
    db: Rc<FakeDb>,
}

#[async_trait(?Send)]
impl EngineConnection for FakeConnection {
    async fn query(&mut self, sql: &str) -> Result<RawResult, EngineFault> {
        let db = &self.db;
        if db.reject_all.get() {
            return Err(EngineFault::new("engine unavailable"));
        }
        let sql = sql.trim();
        if let Some(message) = sql.strip_prefix("FAIL:") {
            return Err(EngineFault::new(message.trim()));
        }
        if sql.starts_with("CREATE TABLE IF NOT EXISTS sales") {
            db.table_exists.set(true);
            return Ok(RawResult::Rows(vec![]));
        }
        if sql.starts_with("INSERT INTO sales") {
            db.rows.set(db.rows.get() + SALES_ROWS.len());
            return Ok(RawResult::Rows(vec![]));
        }
        if sql.starts_with("SELECT COUNT(*)") {
            if !db.table_exists.get() {
                return Err(EngineFault::new("table sales does not exist"));
            }
            return Ok(RawResult::Columnar(Box::new(ColumnTable {
                names: vec!["count".into()],
                columns: vec![vec![RawValue::IntArray(vec![db.rows.get() as i64])]],
            })));
        }
        Ok(RawResult::Rows(vec![vec![("value".into(), RawValue::Int(1))]]))
    }

    async fn close(self) -> Result<(), EngineFault> {
        self.db.closed.set(self.db.closed.get() + 1);
        Ok(())
    }
}

/// Service over native DuckDB with a complete asset directory
#[cfg(not(target_arch = "wasm32"))]
pub fn native_engine() -> (
    tempfile::TempDir,
    crate::DashboardEngine<crate::native::NativeLoader, crate::assets::LocalAssetProbe>,
) {
    use dashboard_types::assets::REQUIRED_ASSETS;
    use dashboard_types::DashboardConfig;

    let dir = tempfile::tempdir().expect("create asset dir");
    for name in REQUIRED_ASSETS {
        std::fs::write(dir.path().join(name), b"").expect("write asset");
    }
    let config = DashboardConfig::default();
    let probe = crate::assets::LocalAssetProbe::new(dir.path(), &config.asset_prefix);
    let engine = crate::DashboardEngine::new(&config, crate::native::NativeLoader, probe);
    (dir, engine)
}
