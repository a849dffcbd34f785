//! History persistence configuration.

use std::env;
use std::path::PathBuf;

/// Where the competition documents live.
#[derive(Debug, Clone)]
pub struct HistoryConfig {
    /// Directory holding both documents.
    pub data_dir: PathBuf,

    /// File name of the single current-competition document.
    pub competition_file: String,

    /// File name of the competition history array.
    pub history_file: String,
}

impl HistoryConfig {
    /// Create configuration from environment variables.
    ///
    /// - `COMPETITION_DATA_DIR`: document directory (default: `./data`)
    /// - `COMPETITION_FILE`: current-competition file name
    ///   (default: `competition.json`)
    /// - `COMPETITION_HISTORY_FILE`: history file name
    ///   (default: `history_competition.json`)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            data_dir: env::var("COMPETITION_DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.data_dir),
            competition_file: env::var("COMPETITION_FILE").unwrap_or(defaults.competition_file),
            history_file: env::var("COMPETITION_HISTORY_FILE").unwrap_or(defaults.history_file),
        }
    }
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("./data"),
            competition_file: "competition.json".to_string(),
            history_file: "history_competition.json".to_string(),
        }
    }
}
