//! Backend commands: `commands/resetDb` and `commands/config`.

use crate::backend::Store;
use crate::error::BackendError;
use crate::overrides::OverridePolicy;
use crate::seed::SeedProvider;
use crate::types::response::{status, Response};
use serde::Deserialize;
use serde_json::Value;
use tracing::info;

/// Body of `commands/resetDb`.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ResetOptions {
    clear: bool,
}

impl Store {
    /// Rebuild the database from the seed.
    ///
    /// With `clear`, collections are emptied unless the override policy keeps
    /// their seed contents.
    pub(crate) fn reset_db(
        &mut self,
        seed: &dyn SeedProvider,
        overrides: &dyn OverridePolicy,
        clear: bool,
    ) {
        let mut db = seed.create_db();
        if clear {
            db.clear_except(|name| overrides.keeps_seed_on_clear(name));
        }
        info!(clear, collections = db.len(), "Database reset");
        self.db = db;
    }

    pub(crate) fn reset_command(
        &mut self,
        seed: &dyn SeedProvider,
        overrides: &dyn OverridePolicy,
        body: Option<&Value>,
    ) -> Result<Response, BackendError> {
        let options: ResetOptions = match body {
            None | Some(Value::Null) => ResetOptions::default(),
            Some(value) => serde_json::from_value(value.clone())
                .map_err(|e| BackendError::invalid_body(e.to_string()))?,
        };
        self.reset_db(seed, overrides, options.clear);
        Ok(Response::new(status::NO_CONTENT))
    }

    pub(crate) fn get_config(&self) -> Result<Response, BackendError> {
        let config = serde_json::to_value(&self.config)
            .map_err(|e| BackendError::InvalidConfig(e.to_string()))?;
        Ok(Response::new(status::OK).with_body(config))
    }

    /// Replace the config fields present in the body.
    pub(crate) fn update_config(&mut self, body: Option<&Value>) -> Result<Response, BackendError> {
        let patch = body.ok_or_else(|| BackendError::invalid_body("missing body"))?;
        let config = self
            .config
            .merged(patch)
            .map_err(|e| BackendError::InvalidConfig(e.to_string()))?;

        info!(?config, "Backend config updated");
        self.config = config;
        self.get_config()
    }
}
