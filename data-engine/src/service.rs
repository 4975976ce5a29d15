//! The dashboard engine service: lazy one-time initialization and queries
//!
//! [`DashboardEngine`] owns the process-wide engine handle. The first
//! [`initialize`](DashboardEngine::initialize) call walks the bundle registry
//! in preference order; every concurrent caller awaits the same shared
//! in-flight attempt, so at most one instantiation runs at a time. A failed
//! attempt stays failed until [`retry`](DashboardEngine::retry) is called.

use crate::backend::{AssetProbe, EngineConnection, EngineHandle, EngineLoader};
use crate::error::{AttemptFailure, EngineError, InitializationError, QueryError, Result};
use crate::normalize::Normalizer;
use crate::registry::BundleRegistry;
use crate::seed::seed_handle;
use dashboard_types::{BundleVariant, DashboardConfig, EngineStatus, NormalizedRow};
use futures::future::{FutureExt, LocalBoxFuture, Shared};
use log::{debug, error, info, warn};
use std::cell::RefCell;
use std::rc::Rc;

type InitOutcome<H> = std::result::Result<Rc<H>, InitializationError>;
type InitFuture<H> = Shared<LocalBoxFuture<'static, InitOutcome<H>>>;

/// Initialization lifecycle of the engine handle
pub enum InitState<H> {
    Uninitialized,
    /// An attempt is in flight; callers share it
    Initializing(InitFuture<H>),
    Ready(Rc<H>),
    Failed(InitializationError),
}

impl<H> InitState<H> {
    pub fn status(&self) -> EngineStatus {
        match self {
            InitState::Uninitialized => EngineStatus::Uninitialized,
            InitState::Initializing(_) => EngineStatus::Initializing,
            InitState::Ready(_) => EngineStatus::Ready,
            InitState::Failed(_) => EngineStatus::Failed,
        }
    }
}

struct Inner<L, P> {
    loader: L,
    probe: P,
    registry: BundleRegistry,
    normalizer: Normalizer,
    seed_sample_data: bool,
}

/// Engine service shared by every dashboard panel
///
/// Cloning is cheap and yields another reference to the same engine.
pub struct DashboardEngine<L: EngineLoader, P: AssetProbe> {
    inner: Rc<Inner<L, P>>,
    state: Rc<RefCell<InitState<L::Handle>>>,
}

impl<L: EngineLoader, P: AssetProbe> Clone for DashboardEngine<L, P> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
            state: Rc::clone(&self.state),
        }
    }
}

impl<L, P> DashboardEngine<L, P>
where
    L: EngineLoader + 'static,
    P: AssetProbe + 'static,
{
    pub fn new(config: &DashboardConfig, loader: L, probe: P) -> Self {
        Self::with_registry(config, BundleRegistry::from_config(config), loader, probe)
    }

    pub fn with_registry(
        config: &DashboardConfig,
        registry: BundleRegistry,
        loader: L,
        probe: P,
    ) -> Self {
        Self {
            inner: Rc::new(Inner {
                loader,
                probe,
                registry,
                normalizer: Normalizer::new(config.aggregate_columns.iter().cloned()),
                seed_sample_data: config.seed_sample_data,
            }),
            state: Rc::new(RefCell::new(InitState::Uninitialized)),
        }
    }

    pub fn status(&self) -> EngineStatus {
        self.state.borrow().status()
    }

    /// Return the engine handle, instantiating it on first use
    pub async fn initialize(&self) -> InitOutcome<L::Handle> {
        let pending = {
            let mut state = self.state.borrow_mut();
            let in_flight = match &*state {
                InitState::Ready(handle) => return Ok(Rc::clone(handle)),
                InitState::Failed(err) => return Err(err.clone()),
                InitState::Initializing(pending) => Some(pending.clone()),
                InitState::Uninitialized => None,
            };
            match in_flight {
                Some(pending) => pending,
                None => {
                    let pending = self.start_attempt();
                    *state = InitState::Initializing(pending.clone());
                    pending
                }
            }
        };
        pending.await
    }

    /// Move a failed engine back to uninitialized; true if it was failed
    pub fn reset(&self) -> bool {
        let mut state = self.state.borrow_mut();
        if matches!(*state, InitState::Failed(_)) {
            *state = InitState::Uninitialized;
            true
        } else {
            false
        }
    }

    /// Re-run initialization after a failure
    pub async fn retry(&self) -> InitOutcome<L::Handle> {
        if self.reset() {
            info!("retrying engine initialization");
        }
        self.initialize().await
    }

    fn start_attempt(&self) -> InitFuture<L::Handle> {
        let inner = Rc::clone(&self.inner);
        let state = Rc::downgrade(&self.state);
        async move {
            let outcome = inner.attempt_variants().await.map(Rc::new);
            if let Some(state) = state.upgrade() {
                *state.borrow_mut() = match &outcome {
                    Ok(handle) => InitState::Ready(Rc::clone(handle)),
                    Err(err) => InitState::Failed(err.clone()),
                };
            }
            outcome
        }
        .boxed_local()
        .shared()
    }

    /// Run `sql` verbatim and return normalized rows
    ///
    /// Does not start initialization. While an attempt is in flight the
    /// call waits for it.
    pub async fn run(&self, sql: &str) -> Result<Vec<NormalizedRow>> {
        let handle = self.ready_handle().await?;
        debug!("running query: {}", sql.trim());

        let mut conn = handle.connect().await.map_err(QueryError::Connect)?;
        let outcome = conn.query(sql).await;
        if let Err(fault) = conn.close().await {
            warn!("failed to close query connection: {}", fault);
        }

        let raw = outcome.map_err(QueryError::Execute)?;
        Ok(self.inner.normalizer.normalize(raw))
    }

    async fn ready_handle(&self) -> Result<Rc<L::Handle>> {
        let pending = match &*self.state.borrow() {
            InitState::Ready(handle) => return Ok(Rc::clone(handle)),
            InitState::Initializing(pending) => pending.clone(),
            InitState::Uninitialized | InitState::Failed(_) => {
                return Err(EngineError::NotInitialized)
            }
        };
        pending.await.map_err(|_| EngineError::NotInitialized)
    }
}

impl<L: EngineLoader, P: AssetProbe> Inner<L, P> {
    async fn attempt_variants(&self) -> std::result::Result<L::Handle, InitializationError> {
        info!("initializing embedded engine");
        let mut attempts = Vec::new();

        for variant in self.registry.list_variants() {
            match self.try_variant(&variant).await {
                Ok(handle) => {
                    info!("engine instantiated from {} bundle", variant.tier);
                    if self.seed_sample_data {
                        match seed_handle(&handle, &self.normalizer).await {
                            Ok(outcome) => debug!("sample data: {:?}", outcome),
                            Err(fault) => warn!("sample data seeding failed: {}", fault),
                        }
                    }
                    return Ok(handle);
                }
                Err(failure) => {
                    warn!("skipping {} bundle: {}", variant.tier, failure);
                    attempts.push((variant.tier, failure));
                }
            }
        }

        let err = InitializationError { attempts };
        error!("{}", err);
        Err(err)
    }

    async fn try_variant(
        &self,
        variant: &BundleVariant,
    ) -> std::result::Result<L::Handle, AttemptFailure> {
        if !variant.has_required_locators() {
            return Err(AttemptFailure::MissingLocator);
        }
        for url in variant.required_locators() {
            if !self.probe.exists(url).await {
                return Err(AttemptFailure::Unreachable {
                    url: url.to_string(),
                });
            }
        }
        self.loader
            .instantiate(variant)
            .await
            .map_err(AttemptFailure::Instantiation)
    }
}
