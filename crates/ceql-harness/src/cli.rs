use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use tracing_subscriber::filter::LevelFilter;

/// Verbosity of the compiler and harness logs on stderr
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    /// Silent, even for failed samples
    Off,
    /// Errors only
    Error,
    /// Each failing sample (default)
    Warn,
    /// Early stops on the consecutive-failure limit
    Info,
    /// Every compiled or rejected query and the run summary
    Debug,
    /// Lexer output, parser steps and each extension applied
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Off => LevelFilter::OFF,
            LogLevel::Error => LevelFilter::ERROR,
            LogLevel::Warn => LevelFilter::WARN,
            LogLevel::Info => LevelFilter::INFO,
            LogLevel::Debug => LevelFilter::DEBUG,
            LogLevel::Trace => LevelFilter::TRACE,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "ceql")]
#[command(about = "Compile CEQL simple queries to CQP and check them against recorded samples")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Log level for compile and harness diagnostics on stderr
    #[arg(short = 'l', long, global = true, value_enum)]
    pub log_level: Option<LogLevel>,

    /// Enable verbose logging (shortcut for --log-level=debug)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Attribute binding file (TOML)
    #[arg(short = 'b', long, global = true)]
    pub binding: Option<PathBuf>,

    /// Restrict phrase queries to a structural attribute, e.g. `s`
    #[arg(long, global = true)]
    pub within: Option<String>,
}

impl Cli {
    /// Effective log level; warnings only unless asked otherwise
    pub fn level(&self) -> LevelFilter {
        match (self.log_level, self.verbose) {
            (Some(level), _) => level.into(),
            (None, true) => LevelFilter::DEBUG,
            (None, false) => LevelFilter::WARN,
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Compile one query and print the CQP
    Compile {
        /// Match words and lemmas case-sensitively
        #[arg(long, conflicts_with = "ignore_case")]
        case_sensitive: bool,

        /// Match words and lemmas case-insensitively
        #[arg(long)]
        ignore_case: bool,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,

        /// CEQL query
        query: String,
    },

    /// Run a regression sample file
    Check {
        /// Tab-separated sample file
        #[arg(long)]
        samples: PathBuf,

        /// Stop after this many failures in a row (0 = never)
        #[arg(long, default_value_t = 10)]
        max_consecutive_failures: usize,

        /// Print the summary as JSON
        #[arg(long)]
        json: bool,

        /// Hide the progress bar
        #[arg(long)]
        no_progress: bool,
    },
}
