use std::{env, path::PathBuf};

/// Settings a [`QueryBuilder`](crate::QueryBuilder) is constructed with.
#[derive(Debug, Clone)]
pub struct BuilderConfig {
    /// Prepended to every table name.
    pub table_prefix: String,
    /// Where [`cache`](crate::QueryBuilder::cache) stores results.
    pub cache_dir: PathBuf,
    /// Terminate the process on a failed statement instead of returning the error.
    pub debug: bool,
}

impl Default for BuilderConfig {
    fn default() -> Self {
        Self {
            table_prefix: String::new(),
            cache_dir: env::temp_dir().join("quarry-cache"),
            debug: false,
        }
    }
}

impl BuilderConfig {
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.table_prefix = prefix.into();
        self
    }

    pub fn with_cache_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cache_dir = dir.into();
        self
    }

    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }
}
