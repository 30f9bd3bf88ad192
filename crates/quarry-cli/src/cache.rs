use std::path::Path;

use nu_ansi_term::Color::{Cyan, Magenta};
use quarry_cache::{cache::STALE_AFTER, ResultCache};
use quarry_utils::fs::{ensure_dir_exists, remove_stale_files};
use tracing::info;

use crate::{cli::CacheAction, error::CliResult, utils::Colored};

pub fn handle_cache(action: CacheAction, cache_dir: &Path) -> CliResult<()> {
    match action {
        CacheAction::Path => {
            info!("{}", cache_dir.display());
        }
        CacheAction::Sweep => {
            ensure_dir_exists(cache_dir)?;
            let removed = remove_stale_files(cache_dir, STALE_AFTER)?;
            info!(
                "Removed {} stale entries from {}",
                Colored(Magenta, removed),
                Colored(Cyan, cache_dir.display())
            );
        }
        CacheAction::Clear => {
            let removed = ResultCache::new(cache_dir, 0)?.clear()?;
            info!(
                "Removed {} entries from {}",
                Colored(Magenta, removed),
                Colored(Cyan, cache_dir.display())
            );
        }
    }
    Ok(())
}
