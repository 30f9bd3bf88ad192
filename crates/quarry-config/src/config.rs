use std::{
    env, fs,
    path::{Path, PathBuf},
};

use documented::{Documented, DocumentedFields};
use quarry_utils::{
    fs::ensure_dir_exists,
    path::{resolve_path, xdg_cache_home, xdg_config_home},
    time::parse_duration,
};
use serde::{Deserialize, Serialize};
use toml_edit::DocumentMut;
use tracing::{debug, info};

use crate::{
    annotations::annotate_toml_table,
    error::{ConfigError, Result},
};

/// Application's configuration
#[derive(Clone, Debug, Deserialize, Serialize, Documented, DocumentedFields)]
pub struct Config {
    /// Prefix prepended to every table name the builder renders.
    /// Default: "" (no prefix)
    #[serde(default)]
    pub table_prefix: String,

    /// Directory holding cached query results.
    /// Default: $XDG_CACHE_HOME/quarry
    pub cache_dir: Option<String>,

    /// Abort the process with a logged diagnostic when a statement fails,
    /// instead of returning an error to the caller.
    /// Default: false
    #[serde(default)]
    pub debug: bool,

    /// Lifetime of cached results when caching is requested without an explicit value.
    /// Accepts seconds or a duration such as "30s", "5m" or "1h30m".
    /// Default: 5m
    pub default_ttl: Option<String>,

    /// Database connection settings.
    #[serde(default)]
    pub database: DatabaseConfig,
}

/// Database connection settings
#[derive(Clone, Debug, Default, Deserialize, Serialize, Documented, DocumentedFields)]
pub struct DatabaseConfig {
    /// Path to the SQLite database file. ":memory:" opens a transient database.
    /// Default: :memory:
    pub path: Option<String>,
}

const DEFAULT_TTL: &str = "5m";
const MEMORY_DATABASE: &str = ":memory:";

/// Location of the configuration file: `$QUARRY_CONFIG` if set, otherwise
/// `$XDG_CONFIG_HOME/quarry/config.toml`.
pub fn default_config_path() -> PathBuf {
    match env::var("QUARRY_CONFIG") {
        Ok(path) => PathBuf::from(path),
        Err(_) => xdg_config_home().join("quarry").join("config.toml"),
    }
}

impl Config {
    pub fn default_config() -> Self {
        Self {
            table_prefix: String::new(),
            cache_dir: None,
            debug: false,
            default_ttl: Some(DEFAULT_TTL.to_string()),
            database: DatabaseConfig {
                path: Some(MEMORY_DATABASE.to_string()),
            },
        }
    }

    /// Loads the configuration from `path`, falling back to the defaults when the file
    /// does not exist.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        let mut config = match fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content)?,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                debug!("no config at {}, using defaults", path.display());
                Self::default_config()
            }
            Err(err) => return Err(ConfigError::IoError(err)),
        };

        config.resolve()?;

        Ok(config)
    }

    pub fn resolve(&mut self) -> Result<()> {
        if self.table_prefix.contains('`') {
            return Err(ConfigError::InvalidTablePrefix(self.table_prefix.clone()));
        }

        let ttl = self.default_ttl.get_or_insert_with(|| DEFAULT_TTL.to_string());
        if parse_duration(ttl).is_none() {
            return Err(ConfigError::InvalidTtl(ttl.clone()));
        }

        Ok(())
    }

    pub fn get_cache_dir(&self) -> Result<PathBuf> {
        if let Ok(env_path) = env::var("QUARRY_CACHE") {
            return Ok(resolve_path(&env_path)?);
        }
        if let Some(cache_dir) = &self.cache_dir {
            return Ok(resolve_path(cache_dir)?);
        }
        Ok(xdg_cache_home().join("quarry"))
    }

    /// Returns the database location. `None` means an in-memory database.
    pub fn get_database_path(&self) -> Result<Option<PathBuf>> {
        let raw = match env::var("QUARRY_DB") {
            Ok(env_path) => env_path,
            Err(_) => {
                match &self.database.path {
                    Some(path) => path.clone(),
                    None => return Ok(None),
                }
            }
        };

        if raw == MEMORY_DATABASE {
            return Ok(None);
        }
        Ok(Some(resolve_path(&raw)?))
    }

    pub fn default_ttl_secs(&self) -> Result<u64> {
        let ttl = self.default_ttl.as_deref().unwrap_or(DEFAULT_TTL);
        parse_duration(ttl).ok_or_else(|| ConfigError::InvalidTtl(ttl.to_string()))
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let serialized = toml::to_string_pretty(self)?;
        if let Some(parent) = path.parent() {
            ensure_dir_exists(parent)?;
        }
        fs::write(path, serialized)?;
        info!("Configuration saved to {}", path.display());
        Ok(())
    }

    pub fn to_annotated_document(&self) -> Result<DocumentMut> {
        let toml_string = toml::to_string_pretty(self)?;
        let mut doc = toml_string.parse::<DocumentMut>()?;

        annotate_toml_table::<Config>(doc.as_table_mut(), true)?;

        if let Some(database) = doc.get_mut("database").and_then(|i| i.as_table_mut()) {
            annotate_toml_table::<DatabaseConfig>(database, false)?;
        }

        Ok(doc)
    }
}

/// Writes the default configuration, annotated with field documentation, to `path`.
///
/// Refuses to overwrite an existing file.
pub fn generate_default_config<P: AsRef<Path>>(path: P) -> Result<()> {
    let path = path.as_ref();

    if path.exists() {
        return Err(ConfigError::ConfigAlreadyExists(path.display().to_string()));
    }

    let annotated_doc = Config::default_config().to_annotated_document()?;

    if let Some(parent) = path.parent() {
        ensure_dir_exists(parent)?;
    }

    fs::write(path, annotated_doc.to_string())?;
    info!(
        "Default configuration file generated with documentation at: {}",
        path.display()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use serial_test::serial;
    use tempfile::tempdir;

    use super::*;
    use crate::test_utils::EnvGuard;

    #[test]
    fn test_default_config_creation() {
        let config = Config::default_config();

        assert_eq!(config.table_prefix, "");
        assert!(!config.debug);
        assert_eq!(config.default_ttl.as_deref(), Some("5m"));
        assert_eq!(config.database.path.as_deref(), Some(":memory:"));
    }

    #[test]
    fn test_load_missing_file_uses_defaults() {
        let dir = tempdir().unwrap();
        let config = Config::load(dir.path().join("absent.toml")).unwrap();
        assert_eq!(config.default_ttl_secs().unwrap(), 300);
    }

    #[test]
    fn test_load_partial_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "table_prefix = \"app_\"\ndebug = true\n").unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.table_prefix, "app_");
        assert!(config.debug);
        assert_eq!(config.default_ttl.as_deref(), Some("5m"));
        assert!(config.database.path.is_none());
    }

    #[test]
    fn test_load_rejects_backtick_prefix() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "table_prefix = \"a`b\"\n").unwrap();

        assert!(matches!(
            Config::load(&path),
            Err(ConfigError::InvalidTablePrefix(_))
        ));
    }

    #[test]
    fn test_load_rejects_bad_ttl() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "default_ttl = \"soon\"\n").unwrap();

        assert!(matches!(Config::load(&path), Err(ConfigError::InvalidTtl(_))));
    }

    #[test]
    fn test_load_invalid_toml() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "debug = [").unwrap();

        assert!(matches!(Config::load(&path), Err(ConfigError::TomlDeError(_))));
    }

    #[test]
    #[serial]
    fn test_cache_dir_env_override() {
        let _guard = EnvGuard::set(&[("QUARRY_CACHE", "/tmp/quarry-env-cache")]);
        let config = Config::default_config();
        assert_eq!(
            config.get_cache_dir().unwrap(),
            PathBuf::from("/tmp/quarry-env-cache")
        );
    }

    #[test]
    #[serial]
    fn test_cache_dir_default() {
        let _unset = EnvGuard::unset(&["QUARRY_CACHE"]);
        let _guard = EnvGuard::set(&[("XDG_CACHE_HOME", "/tmp/xdg")]);
        let config = Config::default_config();
        assert_eq!(
            config.get_cache_dir().unwrap(),
            PathBuf::from("/tmp/xdg/quarry")
        );
    }

    #[test]
    #[serial]
    fn test_database_path() {
        let _unset = EnvGuard::unset(&["QUARRY_DB"]);
        let mut config = Config::default_config();
        assert_eq!(config.get_database_path().unwrap(), None);

        config.database.path = Some("/srv/app.sqlite".into());
        assert_eq!(
            config.get_database_path().unwrap(),
            Some(PathBuf::from("/srv/app.sqlite"))
        );

        let _guard = EnvGuard::set(&[("QUARRY_DB", "/tmp/override.sqlite")]);
        assert_eq!(
            config.get_database_path().unwrap(),
            Some(PathBuf::from("/tmp/override.sqlite"))
        );
    }

    #[test]
    #[serial]
    fn test_default_config_path_env() {
        let _guard = EnvGuard::set(&[("QUARRY_CONFIG", "/etc/quarry.toml")]);
        assert_eq!(default_config_path(), PathBuf::from("/etc/quarry.toml"));
    }

    #[test]
    fn test_generate_default_config() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested/config.toml");

        generate_default_config(&path).unwrap();
        let written = fs::read_to_string(&path).unwrap();
        assert!(written.contains("# Database connection settings."));

        let loaded = Config::load(&path).unwrap();
        assert_eq!(loaded.default_ttl.as_deref(), Some("5m"));

        assert!(matches!(
            generate_default_config(&path),
            Err(ConfigError::ConfigAlreadyExists(_))
        ));
    }

    #[test]
    fn test_save_roundtrip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let mut config = Config::default_config();
        config.table_prefix = "t_".into();
        config.save(&path).unwrap();

        assert_eq!(Config::load(&path).unwrap().table_prefix, "t_");
    }
}
