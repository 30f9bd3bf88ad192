use std::path::PathBuf;

use miette::Diagnostic;
use quarry_utils::error::FileSystemError;
use thiserror::Error;

#[derive(Error, Diagnostic, Debug)]
pub enum CacheError {
    #[error("Cache directory `{}` is unusable", path.display())]
    #[diagnostic(
        code(quarry_cache::directory),
        help("Check that the cache directory is writable or point `cache_dir` elsewhere")
    )]
    Directory {
        path: PathBuf,
        #[source]
        source: FileSystemError,
    },

    #[error("Failed to write cache entry `{}`", path.display())]
    #[diagnostic(code(quarry_cache::write), help("Check free disk space and permissions"))]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to encode cache payload: {0}")]
    #[diagnostic(code(quarry_cache::encode))]
    Encode(#[from] serde_json::Error),

    #[error(transparent)]
    #[diagnostic(code(quarry_cache::fs))]
    FileSystem(#[from] FileSystemError),
}

pub type Result<T> = std::result::Result<T, CacheError>;
