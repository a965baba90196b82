//! Named collections of records.

use crate::config::error::ConfigError;
use crate::types::record::{self, Record};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

/// Collection name to ordered records.
///
/// Record order is insertion order. Ids are unique inside each collection;
/// [`Database::validate`] checks this for seed data and the backend keeps it
/// for every write.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Database {
    collections: BTreeMap<String, Vec<Record>>,
}

impl Database {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style variant of [`Database::insert_collection`].
    pub fn with_collection(mut self, name: impl Into<String>, records: Vec<Record>) -> Self {
        self.insert_collection(name, records);
        self
    }

    /// Register a collection, replacing any collection with the same name.
    pub fn insert_collection(&mut self, name: impl Into<String>, records: Vec<Record>) {
        self.collections.insert(name.into(), records);
    }

    pub fn contains(&self, name: &str) -> bool {
        self.collections.contains_key(name)
    }

    pub fn collection(&self, name: &str) -> Option<&[Record]> {
        self.collections.get(name).map(Vec::as_slice)
    }

    pub fn collection_mut(&mut self, name: &str) -> Option<&mut Vec<Record>> {
        self.collections.get_mut(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.collections.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.collections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.collections.is_empty()
    }

    /// Move every collection of `other` into this database.
    pub fn merge(&mut self, other: Database) {
        self.collections.extend(other.collections);
    }

    /// Empty every collection for which `keep` returns `false`.
    pub fn clear_except(&mut self, keep: impl Fn(&str) -> bool) {
        for (name, records) in &mut self.collections {
            if !keep(name) {
                records.clear();
            }
        }
    }

    /// Check that every record has a valid id and ids are unique per collection.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, records) in &self.collections {
            let mut seen = HashSet::with_capacity(records.len());
            for (index, item) in records.iter().enumerate() {
                let key = record::record_key(item).ok_or_else(|| ConfigError::InvalidSeedRecord {
                    collection: name.clone(),
                    index,
                })?;
                if !seen.insert(key.clone()) {
                    return Err(ConfigError::DuplicateSeedId {
                        collection: name.clone(),
                        id: key,
                    });
                }
            }
        }
        Ok(())
    }
}
