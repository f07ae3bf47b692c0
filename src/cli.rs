//! Command-line arguments and the checks that run before the terminal is taken over

use std::path::PathBuf;

use clap::Parser;
use thiserror::Error;

use crate::config::{AppConfig, ConfigError};
use crate::fileio::FileFormat;
use crate::style::{resolve_theme, Theme, ThemeError};

/// A terminal viewer and editor for CSV files
#[derive(Parser, Debug)]
#[command(name = "csv-ve", version, about = "A terminal viewer and editor for CSV files")]
pub struct CliArgs {
    /// CSV or TSV file to open
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Color theme name or path to a theme file
    #[arg(short, long, value_name = "NAME")]
    pub theme: Option<String>,

    /// Field delimiter (comma, tab, semicolon, pipe, or a single character)
    #[arg(short, long, value_name = "DELIM", value_parser = parse_delimiter)]
    pub delimiter: Option<u8>,

    /// Config file (defaults to ~/.config/csv-ve/config.toml)
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Write logs to this file
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

#[derive(Debug, Error)]
pub enum CliError {
    #[error("File '{}' not found", .0.display())]
    FileNotFound(PathBuf),

    #[error("'{}' is not a CSV file", .0.display())]
    NotCsv(PathBuf),

    #[error("{0}\nAvailable themes: {names}", names = Theme::builtin_names().join(", "))]
    Theme(#[from] ThemeError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Everything `main` needs once the arguments check out
#[derive(Debug)]
pub struct Startup {
    pub file: PathBuf,
    pub delimiter: Option<u8>,
    pub theme: Theme,
    pub config: AppConfig,
    pub log_file: Option<PathBuf>,
}

impl CliArgs {
    /// Validate the arguments and merge them over the config file. CLI flags win.
    pub fn into_startup(self) -> Result<Startup, CliError> {
        if !self.file.exists() {
            return Err(CliError::FileNotFound(self.file));
        }
        if FileFormat::from_extension(&self.file).is_none() {
            return Err(CliError::NotCsv(self.file));
        }

        let mut config = AppConfig::load(self.config.as_deref())?;
        if self.theme.is_some() {
            config.theme = self.theme;
        }
        let theme = resolve_theme(config.theme.as_deref())?;
        let log_file = self.log_file.or_else(|| config.log_path());

        Ok(Startup {
            file: self.file,
            delimiter: self.delimiter,
            theme,
            config,
            log_file,
        })
    }
}

/// Parse a delimiter string into a byte
pub fn parse_delimiter(s: &str) -> Result<u8, String> {
    match s.to_lowercase().as_str() {
        "comma" | "," => Ok(b','),
        "tab" | "\\t" | "\t" => Ok(b'\t'),
        "semicolon" | ";" => Ok(b';'),
        "pipe" | "|" => Ok(b'|'),
        _ if s.len() == 1 => Ok(s.as_bytes()[0]),
        _ => Err(format!(
            "invalid delimiter '{}'; use comma, tab, semicolon, pipe, or a single character",
            s
        )),
    }
}
