use std::path::PathBuf;

use acc_convert::declaration::DeclarationKind;
use clap::{Parser, ValueEnum};
use log::LevelFilter;

#[derive(Parser, Debug)]
#[command(name = "acc-convert")]
#[command(about = "Convert appliance configuration text into declarative JSON")]
pub struct Cli {
    /// Log verbosity for diagnostics written to stderr.
    #[arg(long, global = true, value_enum, default_value_t = LogLevel::Warn)]
    pub log_level: LogLevel,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(clap::Subcommand, Debug)]
pub enum Command {
    /// Convert configuration files into a declaration.
    Convert(ConvertArgs),
    /// Show the parsed structure of configuration files.
    Inspect(InspectArgs),
}

#[derive(Parser, Debug)]
pub struct ConvertArgs {
    /// Configuration files, concatenated in the given order.
    #[arg(required = true)]
    pub files: Vec<PathBuf>,
    /// Where to write the declaration.
    #[arg(short, long)]
    pub output: PathBuf,
    #[arg(long, value_enum, default_value_t = DeclarationArg::Adc)]
    pub declaration: DeclarationArg,
    /// Add a controls block to the declaration.
    #[arg(long)]
    pub controls: bool,
    /// TOML rule table merged over the built-in rules.
    #[arg(long)]
    pub custom_properties: Option<PathBuf>,
    /// JSON schema used to remove default values.
    #[arg(long)]
    pub schema: Option<PathBuf>,
    /// Also write unsupported objects and warnings as JSON.
    #[arg(long)]
    pub report: Option<PathBuf>,
}

#[derive(Parser, Debug)]
pub struct InspectArgs {
    #[arg(required = true)]
    pub files: Vec<PathBuf>,
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
    #[arg(long, default_value_t = 3)]
    pub depth: usize,
    /// Only show objects whose keyword starts with this prefix.
    #[arg(long)]
    pub keyword: Option<String>,
}

#[derive(Clone, Copy, Debug, ValueEnum, PartialEq, Eq)]
pub enum DeclarationArg {
    Adc,
    Device,
}

impl From<DeclarationArg> for DeclarationKind {
    fn from(arg: DeclarationArg) -> Self {
        match arg {
            DeclarationArg::Adc => DeclarationKind::Adc,
            DeclarationArg::Device => DeclarationKind::Device,
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Clone, Copy, Debug, ValueEnum, PartialEq, Eq)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}
