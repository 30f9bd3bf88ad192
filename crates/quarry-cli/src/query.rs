use nu_ansi_term::Color::{Cyan, Green, Magenta};
use quarry_config::config::Config;
use quarry_db::{BuilderConfig, Outcome, QueryBuilder, Row, Shape, SqliteDriver, Value};
use quarry_utils::time::parse_duration;
use tracing::{debug, info};

use crate::{
    error::{CliError, CliResult},
    utils::{parse_param, Colored},
};

/// Builder settings taken from the loaded configuration.
pub fn builder_config(config: &Config) -> CliResult<BuilderConfig> {
    Ok(BuilderConfig::default()
        .with_prefix(config.table_prefix.clone())
        .with_cache_dir(config.get_cache_dir()?)
        .with_debug(config.debug))
}

pub fn open_builder(config: &Config) -> CliResult<QueryBuilder<SqliteDriver>> {
    let driver = match config.get_database_path()? {
        Some(path) => {
            debug!("opening database at {}", path.display());
            SqliteDriver::open(&path)?
        }
        None => {
            debug!("opening in-memory database");
            SqliteDriver::open_in_memory()?
        }
    };
    Ok(QueryBuilder::new(driver, builder_config(config)?))
}

fn cache_ttl(config: &Config, requested: Option<&str>) -> CliResult<u64> {
    match requested {
        Some(raw) => parse_duration(raw).ok_or_else(|| CliError::InvalidTtl(raw.to_string())),
        None => Ok(config.default_ttl_secs()?),
    }
}

pub fn run_query(
    config: &Config,
    sql: &str,
    params: &[String],
    tuple: bool,
    cache: Option<Option<String>>,
    json: bool,
) -> CliResult<()> {
    let mut db = open_builder(config)?;
    let params = params.iter().map(|p| parse_param(p)).collect::<Vec<_>>();

    if let Some(requested) = cache {
        let ttl = cache_ttl(config, requested.as_deref())?;
        debug!("caching result for {}s", ttl);
        db.cache(ttl)?;
    }
    if tuple {
        db.shape(Shape::Tuple);
    }

    let outcome = db.raw(sql, &params)?;
    report(&db, &outcome, json)
}

pub fn run_exec(config: &Config, sql: &str, params: &[String], json: bool) -> CliResult<()> {
    let mut db = open_builder(config)?;
    let params = params.iter().map(|p| parse_param(p)).collect::<Vec<_>>();

    let affected = db.query(sql, &params).exec()?.unwrap_or_default();
    report(&db, &Outcome::Affected(affected), json)
}

fn report(db: &QueryBuilder<SqliteDriver>, outcome: &Outcome, json: bool) -> CliResult<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(outcome)?);
        return Ok(());
    }

    match outcome {
        Outcome::Rows(rows) => {
            for row in rows {
                info!("{}", format_row(row));
            }
            info!("{} row(s)", Colored(Magenta, rows.len()));
        }
        Outcome::Affected(affected) => {
            info!("{} row(s) affected", Colored(Magenta, affected));
            if let Some(id) = db.insert_id() {
                info!("Last insert id: {}", Colored(Green, id));
            }
        }
    }
    Ok(())
}

fn format_row(row: &Row) -> String {
    match row {
        Row::Mapping(record) => {
            record
                .iter()
                .map(|(column, value)| format!("{}: {value}", Colored(Cyan, column)))
                .collect::<Vec<_>>()
                .join(" | ")
        }
        Row::Tuple(values) => {
            values
                .iter()
                .map(Value::to_string)
                .collect::<Vec<_>>()
                .join(" | ")
        }
    }
}
