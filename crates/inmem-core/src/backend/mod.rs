//! The in-memory backend.
//!
//! [`InMemoryBackend`] owns the database and serves [`Request`]s against it:
//! - route dispatch via [`Dispatcher`]
//! - collection handlers (GET, POST, PUT, DELETE)
//! - commands (`commands/resetDb`, `commands/config`)
//! - passthrough of unmocked requests to a [`PassThruBackend`]
//! - simulated latency
//!
//! The database and the runtime config sit behind one async mutex. A request
//! holds the lock while it reads or mutates the database and releases it
//! before the latency sleep, so every operation is atomic while delays of
//! concurrent requests overlap.

mod collections;
mod commands;
pub mod dispatcher;
mod passthru;

pub use dispatcher::{Action, Dispatcher, Resolved};
pub use passthru::{PassThruBackend, PassThruFuture};

use crate::backend::collections::Target;
use crate::config::backend::BackendConfig;
use crate::error::BackendError;
use crate::matching::parse_url;
use crate::overrides::{NoOverrides, OverridePolicy};
use crate::seed::SeedProvider;
use crate::types::database::Database;
use crate::types::request::Request;
use crate::types::response::Response;
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::{debug, warn};

/// Mutable state of the backend.
#[derive(Debug)]
pub(crate) struct Store {
    pub(crate) db: Database,
    pub(crate) config: BackendConfig,
}

impl Store {
    /// Wrap a response payload as configured.
    fn envelope(&self, data: Value) -> Value {
        if self.config.data_encapsulation {
            json!({ "data": data })
        } else {
            data
        }
    }
}

enum Step {
    Respond { response: Response, delay: Duration },
    PassThru,
}

/// Builder for [`InMemoryBackend`].
pub struct InMemoryBackendBuilder {
    seed: Arc<dyn SeedProvider>,
    config: BackendConfig,
    overrides: Arc<dyn OverridePolicy>,
    passthru: Option<Arc<dyn PassThruBackend>>,
    dispatcher: Dispatcher,
}

impl InMemoryBackendBuilder {
    pub fn config(mut self, config: BackendConfig) -> Self {
        self.config = config;
        self
    }

    /// Simulated latency in milliseconds.
    pub fn delay(mut self, delay: u64) -> Self {
        self.config.delay = delay;
        self
    }

    pub fn overrides(mut self, overrides: impl OverridePolicy + 'static) -> Self {
        self.overrides = Arc::new(overrides);
        self
    }

    pub fn passthru(mut self, backend: impl PassThruBackend + 'static) -> Self {
        self.passthru = Some(Arc::new(backend));
        self
    }

    pub fn dispatcher(mut self, dispatcher: Dispatcher) -> Self {
        self.dispatcher = dispatcher;
        self
    }

    pub fn build(self) -> InMemoryBackend {
        let db = self.seed.create_db();
        debug!(collections = db.len(), delay = self.config.delay, "Backend created");
        InMemoryBackend {
            store: Mutex::new(Store {
                db,
                config: self.config,
            }),
            seed: self.seed,
            overrides: self.overrides,
            passthru: self.passthru,
            dispatcher: self.dispatcher,
        }
    }
}

/// Collection-backed REST mock backend.
pub struct InMemoryBackend {
    store: Mutex<Store>,
    seed: Arc<dyn SeedProvider>,
    overrides: Arc<dyn OverridePolicy>,
    passthru: Option<Arc<dyn PassThruBackend>>,
    dispatcher: Dispatcher,
}

impl InMemoryBackend {
    /// Backend with the default config and no overrides.
    pub fn new(seed: impl SeedProvider + 'static) -> Self {
        Self::builder(seed).build()
    }

    pub fn builder(seed: impl SeedProvider + 'static) -> InMemoryBackendBuilder {
        InMemoryBackendBuilder {
            seed: Arc::new(seed),
            config: BackendConfig::default(),
            overrides: Arc::new(NoOverrides),
            passthru: None,
            dispatcher: Dispatcher::default(),
        }
    }

    /// Serve a request.
    ///
    /// Served responses, errors included, are delivered after the configured
    /// delay. Passthrough responses are returned as the forwarder produces them.
    pub async fn handle(&self, request: Request) -> Response {
        match self.process(&request).await {
            Step::Respond { response, delay } => {
                if !delay.is_zero() {
                    tokio::time::sleep(delay).await;
                }
                response
            }
            Step::PassThru => self.pass_thru(request).await,
        }
    }

    pub async fn config(&self) -> BackendConfig {
        self.store.lock().await.config.clone()
    }

    /// Copy of the current database.
    pub async fn snapshot(&self) -> Database {
        self.store.lock().await.db.clone()
    }

    /// Rebuild the database from the seed, without delay.
    pub async fn reset(&self, clear: bool) {
        self.store
            .lock()
            .await
            .reset_db(self.seed.as_ref(), self.overrides.as_ref(), clear);
    }

    async fn pass_thru(&self, request: Request) -> Response {
        match &self.passthru {
            Some(backend) => {
                debug!(method = %request.method, url = %request.url, "Passing request through");
                backend.forward(request).await
            }
            None => {
                warn!(
                    method = %request.method,
                    url = %request.url,
                    "Passthrough requested but no passthrough backend is installed"
                );
                BackendError::UnknownRoute {
                    method: request.method,
                    url: request.url,
                }
                .into()
            }
        }
    }

    async fn process(&self, request: &Request) -> Step {
        let mut store = self.store.lock().await;
        let parsed = parse_url(&request.url, store.config.api_base.as_deref());
        let resolved = self.dispatcher.resolve(request.method, &parsed.segments);

        let collection = resolved.as_ref().and_then(Resolved::collection);
        if self.overrides.is_passthru(request, collection) {
            return Step::PassThru;
        }

        let result = match resolved {
            Some(resolved) => {
                debug!(
                    method = %request.method,
                    url = %request.url,
                    action = ?resolved.action,
                    "Dispatching request"
                );
                match self.run(&mut store, request, &resolved, &parsed.query) {
                    Some(result) => result,
                    None => return Step::PassThru,
                }
            }
            None if store.config.passthru_unknown_url => return Step::PassThru,
            None => Err(BackendError::UnknownRoute {
                method: request.method,
                url: request.url.clone(),
            }),
        };

        let response = result.unwrap_or_else(|err| {
            debug!(error = %err, status = err.status(), "Request failed");
            err.into()
        });
        Step::Respond {
            response,
            delay: store.config.latency(),
        }
    }

    /// Run the action of a resolved route; `None` asks for a passthrough.
    fn run(
        &self,
        store: &mut Store,
        request: &Request,
        resolved: &Resolved,
        query: &[(String, String)],
    ) -> Option<Result<Response, BackendError>> {
        let body = request.body.as_ref();

        let collection = match resolved.collection() {
            Some(collection) if resolved.action.targets_collection() => collection,
            _ => {
                return Some(match resolved.action {
                    Action::ResetDb => {
                        store.reset_command(self.seed.as_ref(), self.overrides.as_ref(), body)
                    }
                    Action::GetConfig => store.get_config(),
                    Action::UpdateConfig => store.update_config(body),
                    action => Err(BackendError::invalid_body(format!(
                        "route for {action:?} has no collection"
                    ))),
                });
            }
        };

        if resolved.action.is_write() && self.overrides.is_read_only(collection) {
            return Some(Err(BackendError::ReadOnly {
                collection: collection.to_owned(),
                method: request.method,
            }));
        }
        // Unknown collections are unknown routes.
        if !store.db.contains(collection) && store.config.passthru_unknown_url {
            return None;
        }

        let target = Target {
            base: resolved.base(),
            collection,
            id: resolved.id(),
        };
        let result = match (resolved.action, target.id) {
            (Action::GetCollection, _) => store.get_collection(&target, query),
            (Action::GetRecord, Some(id)) => store.get_record(&target, id),
            (Action::Post, _) => store.post(&target, body, self.overrides.as_ref()),
            (Action::Put, Some(id)) => store.put(&target, id, body),
            (Action::Delete, Some(id)) => store.delete(&target, id),
            (action, _) => Err(BackendError::UnknownRoute {
                method: request.method,
                url: format!("{} ({action:?})", request.url),
            }),
        };
        Some(result)
    }
}
