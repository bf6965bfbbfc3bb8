use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use tracing_subscriber::filter::LevelFilter;

use nl2cypher_core::QueryType;

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
    /// Debug messages
    Debug,
    /// Trace-level messages (most verbose)
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

#[derive(Parser)]
#[command(name = "n2c")]
#[command(about = "n2c - natural language to Cypher gateway")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Set log level (off, error, warn, info, debug, trace)
    /// If not specified, uses the config file value, then RUST_LOG
    #[arg(short = 'l', long, global = true, value_enum)]
    pub log_level: Option<LogLevel>,

    /// Enable verbose logging (shortcut for --log-level=debug)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Config file path (defaults to ~/.config/nl2cypher/config.toml)
    #[arg(short = 'C', long, global = true, env = "NL2CYPHER_CONFIG")]
    pub config: Option<PathBuf>,
}

impl Cli {
    /// Explicit level from the command line, if any.
    pub fn level_filter(&self) -> Option<LevelFilter> {
        if self.verbose {
            Some(LevelFilter::DEBUG)
        } else {
            self.log_level.map(LevelFilter::from)
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the HTTP service
    Serve {
        /// Bind host (overrides config)
        #[arg(long)]
        host: Option<String>,

        /// Bind port (overrides config)
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Normalize raw generated text into one clean query
    Normalize {
        /// Input file (stdin when omitted)
        file: Option<PathBuf>,

        /// Print the pipeline report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Validate a query against the schema without a database
    Validate {
        /// Input file (stdin when omitted)
        file: Option<PathBuf>,

        /// Normalize the input before validating
        #[arg(short, long)]
        normalize: bool,
    },

    /// Print the schema as JSON
    Schema,

    /// Ask a question through the generate, validate, execute gate
    Ask {
        /// Natural language question
        question: String,

        /// Query type hint (MATCH, CREATE, MERGE, DELETE, SET, REMOVE)
        #[arg(short = 't', long, value_parser = parse_query_type)]
        query_type: Option<QueryType>,

        /// Result count hint (1-1000)
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..=1000))]
        limit: Option<u32>,
    },
}

fn parse_query_type(value: &str) -> Result<QueryType, String> {
    serde_json::from_value(serde_json::Value::String(value.to_string()))
        .map_err(|_| format!("unknown query type '{value}'"))
}
