//! Per-collection behavior overrides.

use crate::matching::request_path;
use crate::types::record::{max_integer_id, Record};
use crate::types::request::Request;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Hooks an embedding application uses to change backend behavior.
///
/// Every method has a default, so implementations override only what they need.
pub trait OverridePolicy: Send + Sync {
    /// Id for a new record of `collection`; `None` uses the default generator.
    fn gen_id(&self, _collection: &str, _records: &[Record]) -> Option<Value> {
        None
    }

    /// Writes to a read-only collection answer 404.
    fn is_read_only(&self, _collection: &str) -> bool {
        false
    }

    /// Forward the request to the real backend instead of serving it.
    ///
    /// `collection` is the collection segment of the URL when the route has one.
    fn is_passthru(&self, _request: &Request, _collection: Option<&str>) -> bool {
        false
    }

    /// Keep the seed contents of `collection` on `resetDb {clear: true}`.
    fn keeps_seed_on_clear(&self, _collection: &str) -> bool {
        false
    }
}

/// Policy without overrides.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOverrides;

impl OverridePolicy for NoOverrides {}

/// Override policy loaded from a config file.
///
/// ```yaml
/// read_only: [villains]
/// keep_on_clear: [villains]
/// passthru: [weather]
/// passthru_prefixes: [external/]
/// id_floor:
///   heroes: 1000
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeclarativeOverrides {
    /// Collections rejecting POST, PUT and DELETE
    pub read_only: Vec<String>,
    /// Collections whose requests are forwarded
    pub passthru: Vec<String>,
    /// URL path prefixes whose requests are forwarded
    pub passthru_prefixes: Vec<String>,
    /// Collections reverting to their seed on `resetDb {clear: true}`
    pub keep_on_clear: Vec<String>,
    /// Generated ids of these collections are always greater than the floor
    pub id_floor: BTreeMap<String, i64>,
}

impl OverridePolicy for DeclarativeOverrides {
    fn gen_id(&self, collection: &str, records: &[Record]) -> Option<Value> {
        let floor = *self.id_floor.get(collection)?;
        let max = max_integer_id(records).map_or(floor, |max| max.max(floor));
        max.checked_add(1).map(Value::from)
    }

    fn is_read_only(&self, collection: &str) -> bool {
        self.read_only.iter().any(|c| c == collection)
    }

    fn is_passthru(&self, request: &Request, collection: Option<&str>) -> bool {
        if collection.is_some_and(|name| self.passthru.iter().any(|c| c == name)) {
            return true;
        }
        let path = request_path(&request.url);
        self.passthru_prefixes
            .iter()
            .any(|prefix| path.starts_with(prefix.trim_start_matches('/')))
    }

    fn keeps_seed_on_clear(&self, collection: &str) -> bool {
        self.keep_on_clear.iter().any(|c| c == collection)
    }
}
