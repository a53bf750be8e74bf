use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use tracing_subscriber::filter::LevelFilter;

/// Log level options for CLI
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    /// No logging output
    Off,
    /// Error messages only
    Error,
    /// Warnings and errors
    Warn,
    /// Informational messages
    Info,
    /// Debug messages, including skipped transforms
    Debug,
    /// Every applied transform
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

#[derive(Debug, Parser)]
#[command(name = "solr-bridge")]
#[command(about = "Translate Solr queries and messages into search-engine JSON")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Set log level (off, error, warn, info, debug, trace)
    #[arg(short = 'l', long, global = true, value_enum)]
    pub log_level: Option<LogLevel>,

    /// Enable verbose logging (shortcut for --log-level=debug)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Translator config file (TOML)
    #[arg(short = 'C', long, global = true)]
    pub config: Option<PathBuf>,

    /// Pretty-print JSON output
    #[arg(short, long, global = true)]
    pub pretty: bool,
}

impl Cli {
    /// Effective log filter; logging is off unless asked for.
    pub fn level_filter(&self) -> LevelFilter {
        match (self.log_level, self.verbose) {
            (Some(level), _) => level.into(),
            (None, true) => LevelFilter::DEBUG,
            (None, false) => LevelFilter::OFF,
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Parse a Solr query string and print the structured query
    Parse {
        /// Query text, e.g. 'title:"the dune" AND year:[1960 TO *]'
        query: String,

        /// Field for fieldless terms (Solr `df`)
        #[arg(long)]
        df: Option<String>,

        /// Treat the query as edismax over these fields (Solr `qf`)
        #[arg(long)]
        qf: Option<String>,

        /// Minimum should match for edismax (Solr `mm`)
        #[arg(long, requires = "qf")]
        mm: Option<String>,
    },

    /// Translate a request message (JSON file, or `-` for stdin)
    Request {
        #[arg(default_value = "-")]
        input: PathBuf,
    },

    /// Translate a `{request, response}` pair (JSON file, or `-` for stdin)
    Response {
        #[arg(default_value = "-")]
        input: PathBuf,
    },
}
