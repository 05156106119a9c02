// Copyright 2017-2019 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.
use std::error::Error;
use std::fmt;
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;
use std::time::Duration;

use crate::position::{FenParseError, Position};
use crate::search::DEFAULT_DEPTH;
use crate::types::Color;

/// Settings for a table in the parlor, read from JSON. Every field may be left out.
///
/// ```json
/// { "ai_color": "black", "ai_delay_ms": 600, "search_depth": 2 }
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// The side the engine plays, or `null` for two human players.
    pub ai_color: Option<Color>,
    /// Pause before the engine's move is played.
    pub ai_delay_ms: u64,
    pub search_depth: u32,
    /// Start from this position instead of the standard setup.
    pub start_fen: Option<String>,
}

impl Default for GameConfig {
    fn default() -> GameConfig {
        GameConfig {
            ai_color: Some(Color::Black),
            ai_delay_ms: 600,
            search_depth: DEFAULT_DEPTH,
            start_fen: None,
        }
    }
}

impl GameConfig {
    pub fn from_reader<R: Read>(reader: R) -> Result<GameConfig, ConfigError> {
        let config: GameConfig = serde_json::from_reader(reader)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<GameConfig, ConfigError> {
        let file = File::open(path)?;
        GameConfig::from_reader(io::BufReader::new(file))
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.search_depth == 0 {
            return Err(ConfigError::InvalidDepth);
        }

        self.start_position()?;
        Ok(())
    }

    pub fn ai_delay(&self) -> Duration {
        Duration::from_millis(self.ai_delay_ms)
    }

    pub fn start_position(&self) -> Result<Position, ConfigError> {
        match self.start_fen {
            Some(ref fen) => Ok(Position::from_fen(fen)?),
            None => Ok(Position::from_start_position()),
        }
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Io(io::Error),
    Parse(serde_json::Error),
    Fen(FenParseError),
    InvalidDepth,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ConfigError::Io(err) => write!(f, "failed to read config: {}", err),
            ConfigError::Parse(err) => write!(f, "invalid config: {}", err),
            ConfigError::Fen(err) => write!(f, "invalid start position: {}", err),
            ConfigError::InvalidDepth => write!(f, "search depth must be at least 1"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            ConfigError::Io(err) => Some(err),
            ConfigError::Parse(err) => Some(err),
            ConfigError::Fen(err) => Some(err),
            ConfigError::InvalidDepth => None,
        }
    }
}

impl From<io::Error> for ConfigError {
    fn from(err: io::Error) -> ConfigError {
        ConfigError::Io(err)
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> ConfigError {
        ConfigError::Parse(err)
    }
}

impl From<FenParseError> for ConfigError {
    fn from(err: FenParseError) -> ConfigError {
        ConfigError::Fen(err)
    }
}
