//! Display settings loaded from `gambit.toml`.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur when loading the configuration file.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The file exists but could not be read.
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),
    /// The file is not valid TOML or has fields of the wrong type.
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),
}

/// Front-end settings. Every key is optional.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct TermConfig {
    /// Print the legal moves above the board after every move.
    pub show_moves: bool,
    /// Draw pieces with chess glyphs instead of FEN letters.
    pub unicode: bool,
    /// Draw Black at the bottom.
    pub flip_board: bool,
    /// FEN to start from instead of the standard position.
    pub start_fen: Option<String>,
}

impl Default for TermConfig {
    fn default() -> Self {
        TermConfig {
            show_moves: false,
            unicode: true,
            flip_board: false,
            start_fen: None,
        }
    }
}

impl TermConfig {
    /// Loads the configuration at `path`, or the defaults if there is no
    /// file there.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ReadError`] if the file exists but cannot be read,
    /// or [`ConfigError::ParseError`] if the file contains invalid TOML.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            Ok(toml::from_str(&content)?)
        } else {
            Ok(Self::default())
        }
    }

    /// The configuration file looked up when none is given.
    pub fn default_path() -> PathBuf {
        PathBuf::from("gambit.toml")
    }
}
