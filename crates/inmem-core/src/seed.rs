//! Seed providers: the initial contents of the database.

use crate::config::error::ConfigError;
use crate::config::parser::load_config;
use crate::types::database::Database;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Source of the database contents used at startup and on `resetDb`.
pub trait SeedProvider: Send + Sync {
    fn create_db(&self) -> Database;
}

impl SeedProvider for Database {
    fn create_db(&self) -> Database {
        self.clone()
    }
}

impl<F> SeedProvider for F
where
    F: Fn() -> Database + Send + Sync,
{
    fn create_db(&self) -> Database {
        self()
    }
}

/// Seed read from one or more JSON, JSONC or YAML files.
///
/// Each file maps collection names to arrays of records. Files are merged in
/// path order; a collection defined twice keeps the later definition.
#[derive(Debug, Clone)]
pub struct FileSeed {
    database: Database,
    sources: Vec<PathBuf>,
}

impl FileSeed {
    /// Load every file matching the glob `pattern`.
    pub async fn load(pattern: &str) -> Result<Self, ConfigError> {
        let mut paths = glob::glob(pattern)?.collect::<Result<Vec<_>, _>>()?;
        if paths.is_empty() {
            return Err(ConfigError::NoSeedFiles(pattern.to_owned()));
        }
        paths.sort();

        let mut database = Database::new();
        for path in &paths {
            database.merge(Self::load_file(path).await?);
        }

        debug!(
            pattern,
            files = paths.len(),
            collections = database.len(),
            "Loaded seed files"
        );
        Ok(Self {
            database,
            sources: paths,
        })
    }

    async fn load_file(path: &Path) -> Result<Database, ConfigError> {
        let database: Database = load_config(path).await?;
        database.validate()?;
        Ok(database)
    }

    pub fn sources(&self) -> &[PathBuf] {
        &self.sources
    }

    pub fn database(&self) -> &Database {
        &self.database
    }
}

impl SeedProvider for FileSeed {
    fn create_db(&self) -> Database {
        self.database.clone()
    }
}
