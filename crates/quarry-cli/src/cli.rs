use clap::{ArgAction, Parser, Subcommand};

#[derive(Parser)]
#[command(
    author,
    version,
    about,
    help_template = "{before-help}{name} {version}
{author-with-newline}{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}",
    arg_required_else_help = true
)]
pub struct Args {
    /// Set output verbosity
    #[arg(short = 'v', long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress outputs
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Output as json
    #[arg(short, long, global = true)]
    pub json: bool,

    /// Disable colors in output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Provide custom config file
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    #[clap(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run a statement and print the rows it returns
    #[command(arg_required_else_help = true)]
    #[clap(name = "query", visible_alias = "q")]
    Query {
        /// Statement to run. Each `?` is replaced by the next parameter
        #[arg(required = true)]
        sql: String,

        /// Placeholder value. Integers, decimals and `null` are recognised, anything else is text
        #[arg(short = 'p', long = "param")]
        params: Vec<String>,

        /// Print rows as positional lists instead of column maps
        #[arg(long)]
        tuple: bool,

        /// Serve the result from the cache. Optional value sets the lifetime (e.g. 90, 10m)
        #[arg(long, num_args = 0..=1)]
        cache: Option<Option<String>>,
    },

    /// Run a statement that changes data and report affected rows
    #[command(arg_required_else_help = true)]
    #[clap(name = "exec", visible_alias = "x")]
    Exec {
        /// Statement to run. Each `?` is replaced by the next parameter
        #[arg(required = true)]
        sql: String,

        /// Placeholder value
        #[arg(short = 'p', long = "param")]
        params: Vec<String>,
    },

    /// Manage cached results
    #[command(arg_required_else_help = true)]
    Cache {
        #[clap(subcommand)]
        action: CacheAction,
    },

    /// Print the configuration in effect
    Config,

    /// Generate a default config file
    #[clap(name = "defconfig")]
    DefConfig,
}

#[derive(Subcommand)]
pub enum CacheAction {
    /// Remove entries untouched for more than 12 hours
    Sweep,
    /// Remove every cached entry
    Clear,
    /// Print the cache directory
    Path,
}
