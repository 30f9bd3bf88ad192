use miette::Diagnostic;
use quarry_cache::CacheError;
use quarry_config::error::ConfigError;
use quarry_db::DbError;
use quarry_utils::error::{FileSystemError, PathError};
use thiserror::Error;

#[derive(Error, Diagnostic, Debug)]
pub enum CliError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Db(#[from] DbError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Cache(#[from] CacheError),

    #[error(transparent)]
    #[diagnostic(code(quarry::cli::fs))]
    FileSystem(#[from] FileSystemError),

    #[error(transparent)]
    #[diagnostic(code(quarry::cli::path))]
    Path(#[from] PathError),

    #[error("Invalid cache lifetime: {0}")]
    #[diagnostic(
        code(quarry::cli::ttl),
        help("Use seconds or a duration such as 30s, 5m or 1h30m")
    )]
    InvalidTtl(String),

    #[error("Failed to encode output")]
    #[diagnostic(code(quarry::cli::output))]
    Output(#[from] serde_json::Error),
}

pub type CliResult<T> = std::result::Result<T, CliError>;
