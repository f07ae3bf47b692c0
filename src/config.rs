use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::input::SequenceAction;

/// Where the config file lives when `--config` is not given
pub const DEFAULT_CONFIG_PATH: &str = "~/.config/csv-ve/config.toml";

#[derive(PartialEq, Eq, Hash, Copy, Clone, Debug)]
pub enum KeySequence {
    Zero,
    One(char),
    Two(char, char),
}

impl KeySequence {
    pub fn from_chars(s: &[char]) -> Self {
        match s {
            [] => KeySequence::Zero,
            [a] => KeySequence::One(*a),
            [a, b, ..] => KeySequence::Two(*a, *b),
        }
    }

    /// First key of a two-key sequence
    pub fn prefix(&self) -> Option<char> {
        match self {
            KeySequence::Two(a, _) => Some(*a),
            _ => None,
        }
    }
}

/// Maps key sequences typed in normal mode to actions
#[derive(Debug, Clone, PartialEq)]
pub struct CommandTable {
    basic_map: HashMap<KeySequence, SequenceAction>,
}

impl CommandTable {
    pub fn get(&self, seq: KeySequence) -> Option<SequenceAction> {
        self.basic_map.get(&seq).copied()
    }

    pub fn match_sequence(&self, s: &[char]) -> Option<SequenceAction> {
        self.get(KeySequence::from_chars(s))
    }

    /// Whether `s` is the first key of some longer sequence
    pub fn is_prefix(&self, s: &[char]) -> bool {
        match s {
            [c] => self.basic_map.keys().any(|k| k.prefix() == Some(*c)),
            _ => false,
        }
    }
}

impl Default for CommandTable {
    fn default() -> Self {
        Self {
            basic_map: HashMap::from([
                (KeySequence::Two('g', 'g'), SequenceAction::MoveToTop),
                (KeySequence::Two('d', 'r'), SequenceAction::DeleteRow),
                (KeySequence::Two('d', 'c'), SequenceAction::DeleteCol),

                (KeySequence::One('j'), SequenceAction::MoveDown),
                (KeySequence::One('k'), SequenceAction::MoveUp),
                (KeySequence::One('h'), SequenceAction::MoveLeft),
                (KeySequence::One('l'), SequenceAction::MoveRight),
            ]),
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Config file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Failed to read config file {}: {source}", path.display())]
    Read { path: PathBuf, source: std::io::Error },

    #[error("Failed to parse config file {}: {source}", path.display())]
    Parse { path: PathBuf, source: toml::de::Error },
}

/// User settings, read from TOML. Every key is optional.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Theme name or path to a theme file
    pub theme: Option<String>,
    pub max_col_width: usize,
    pub notification_timeout_ms: u64,
    /// Refuse `q` while there are unsaved changes
    pub confirm_quit: bool,
    pub log_file: Option<String>,

    #[serde(skip)]
    pub commands: CommandTable,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            theme: None,
            max_col_width: 30,
            notification_timeout_ms: 3000,
            confirm_quit: true,
            log_file: None,
            commands: CommandTable::default(),
        }
    }
}

impl AppConfig {
    /// Load settings from `path`, or from the default location when `None`.
    /// A missing default file yields the defaults; a missing explicit file is an error.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let (path, explicit) = match path {
            Some(p) => (p.to_path_buf(), true),
            None => (PathBuf::from(shellexpand::tilde(DEFAULT_CONFIG_PATH).into_owned()), false),
        };

        if !path.exists() {
            return if explicit {
                Err(ConfigError::NotFound(path))
            } else {
                Ok(Self::default())
            };
        }

        let content = std::fs::read_to_string(&path)
            .map_err(|source| ConfigError::Read { path: path.clone(), source })?;
        Self::from_toml(&content).map_err(|source| ConfigError::Parse { path, source })
    }

    pub fn from_toml(content: &str) -> Result<Self, toml::de::Error> {
        let mut config: AppConfig = toml::from_str(content)?;
        config.max_col_width = config.max_col_width.max(crate::table::MIN_COL_WIDTH);
        Ok(config)
    }

    pub fn notification_timeout(&self) -> Duration {
        Duration::from_millis(self.notification_timeout_ms)
    }

    /// Log file path with `~` expanded
    pub fn log_path(&self) -> Option<PathBuf> {
        self.log_file
            .as_deref()
            .map(|p| PathBuf::from(shellexpand::tilde(p).into_owned()))
    }
}
