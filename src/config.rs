use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::session::timer::Timings;

const FLIP_DEBOUNCE_RANGE_MS: (u64, u64) = (100, 5000);
const ADVANCE_DELAY_RANGE_MS: (u64, u64) = (0, 5000);

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_theme")]
    pub theme: String,
    #[serde(default = "default_flip_debounce_ms")]
    pub flip_debounce_ms: u64,
    #[serde(default = "default_advance_delay_ms")]
    pub advance_delay_ms: u64,
    #[serde(default = "default_seed_sample_deck")]
    pub seed_sample_deck: bool,
    /// Program (plus arguments) used to read words aloud. Unset means
    /// auto-detect.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub speech_command: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,
}

fn default_theme() -> String {
    "catppuccin-mocha".to_string()
}
fn default_flip_debounce_ms() -> u64 {
    600
}
fn default_advance_delay_ms() -> u64 {
    500
}
fn default_seed_sample_deck() -> bool {
    true
}

impl Default for Config {
    fn default() -> Self {
        Self {
            theme: default_theme(),
            flip_debounce_ms: default_flip_debounce_ms(),
            advance_delay_ms: default_advance_delay_ms(),
            seed_sample_deck: default_seed_sample_deck(),
            speech_command: None,
            data_dir: None,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let path = Self::config_path();
        if path.exists() {
            let content = fs::read_to_string(&path)?;
            let mut config: Config = toml::from_str(&content)?;
            config.validate();
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        let path = Self::config_path();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        fs::write(&path, content)?;
        Ok(())
    }

    pub fn config_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("flashdeck")
    }

    fn config_path() -> PathBuf {
        Self::config_dir().join("config.toml")
    }

    /// Where the deck lives: the configured override, or the platform data dir.
    pub fn data_dir(&self) -> PathBuf {
        self.data_dir.clone().unwrap_or_else(|| {
            dirs::data_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("flashdeck")
        })
    }

    /// Clamp timings into the supported ranges and reset a blank theme.
    pub fn validate(&mut self) {
        self.flip_debounce_ms = self
            .flip_debounce_ms
            .clamp(FLIP_DEBOUNCE_RANGE_MS.0, FLIP_DEBOUNCE_RANGE_MS.1);
        self.advance_delay_ms = self
            .advance_delay_ms
            .clamp(ADVANCE_DELAY_RANGE_MS.0, ADVANCE_DELAY_RANGE_MS.1);
        if self.theme.trim().is_empty() {
            self.theme = default_theme();
        }
        if self
            .speech_command
            .as_deref()
            .is_some_and(|c| c.trim().is_empty())
        {
            self.speech_command = None;
        }
    }

    pub fn timings(&self) -> Timings {
        Timings {
            flip_debounce: Duration::from_millis(self.flip_debounce_ms),
            advance_delay: Duration::from_millis(self.advance_delay_ms),
        }
    }
}
