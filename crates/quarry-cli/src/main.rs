use std::sync::atomic::Ordering;

use cache::handle_cache;
use clap::Parser;
use cli::{Args, Commands};
use error::CliResult;
use logging::setup_logging;
use quarry_config::config::{default_config_path, generate_default_config, Config};
use quarry_utils::path::resolve_path;
use query::{run_exec, run_query};
use tracing::info;
use utils::COLOR;

mod cache;
mod cli;
mod error;
mod logging;
mod query;
mod utils;

fn handle_cli() -> CliResult<()> {
    let args = Args::parse();

    setup_logging(&args);

    if args.no_color {
        COLOR.store(false, Ordering::Relaxed);
    }

    let config_path = match args.config.as_deref() {
        Some(path) => resolve_path(path)?,
        None => default_config_path(),
    };

    match args.command {
        Commands::DefConfig => generate_default_config(&config_path)?,
        command => {
            let config = Config::load(&config_path)?;

            match command {
                Commands::Query {
                    sql,
                    params,
                    tuple,
                    cache,
                } => run_query(&config, &sql, &params, tuple, cache, args.json)?,
                Commands::Exec {
                    sql,
                    params,
                } => run_exec(&config, &sql, &params, args.json)?,
                Commands::Cache {
                    action,
                } => handle_cache(action, &config.get_cache_dir()?)?,
                Commands::Config => {
                    info!("# {}", config_path.display());
                    info!("{}", config.to_annotated_document()?);
                }
                Commands::DefConfig => unreachable!(),
            }
        }
    }

    Ok(())
}

fn main() {
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .context_lines(2)
                .build(),
        )
    }))
    .ok();

    if let Err(err) = handle_cli() {
        eprintln!("{:?}", miette::Report::new(err));
        std::process::exit(1);
    }
}
