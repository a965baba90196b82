//! In-memory REST mock backend.
//!
//! Serves CRUD-style requests against named collections of JSON records held
//! in process memory:
//! - [`backend::InMemoryBackend`]: request dispatch, collection handlers, commands and latency
//! - [`types`]: records, the database, requests and responses
//! - [`matching`]: URL parsing, route patterns and query filtering
//! - [`overrides`]: per-collection behavior customization
//! - [`seed`]: initial database contents
//! - [`config`]: backend configuration and file parsing

pub mod backend;
pub mod config;
pub mod error;
pub mod matching;
pub mod overrides;
pub mod seed;
pub mod types;

pub use backend::{InMemoryBackend, InMemoryBackendBuilder, PassThruBackend};
pub use config::backend::BackendConfig;
pub use config::error::ConfigError;
pub use error::BackendError;
pub use overrides::{DeclarativeOverrides, NoOverrides, OverridePolicy};
pub use seed::{FileSeed, SeedProvider};
pub use types::database::Database;
pub use types::record::Record;
pub use types::request::{HttpMethod, Request};
pub use types::response::Response;
