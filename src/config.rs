use serde::{Deserialize, Deserializer, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use anyhow::{Context, Result};

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub logger: LoggerConfig,

    #[serde(default)]
    pub console: ConsoleMessages,
}

/// Rotating file logger settings
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct LoggerConfig {
    /// Active log file; backups live next to it as `<path>.1` .. `<path>.N`
    #[serde(default = "default_path")]
    pub path: PathBuf,

    /// The active file is rotated before a write once it grows past this many bytes
    #[serde(default = "default_max_size")]
    pub max_size: u64,

    /// Number of numbered backups kept, never less than 1
    #[serde(default = "default_max_backups", deserialize_with = "deserialize_backups")]
    pub max_backups: usize,

    /// Mirror every entry to the echo writer (stdout unless overridden)
    #[serde(default)]
    pub console_echo: bool,
}

/// Messages printed by the console helper when a token does not parse
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ConsoleMessages {
    #[serde(default = "default_invalid_int")]
    pub invalid_int: String,

    #[serde(default = "default_invalid_long")]
    pub invalid_long: String,

    #[serde(default = "default_invalid_float")]
    pub invalid_float: String,

    #[serde(default = "default_invalid_double")]
    pub invalid_double: String,

    #[serde(default = "default_invalid_bool")]
    pub invalid_bool: String,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            path: default_path(),
            max_size: default_max_size(),
            max_backups: default_max_backups(),
            console_echo: false,
        }
    }
}

impl Default for ConsoleMessages {
    fn default() -> Self {
        Self {
            invalid_int: default_invalid_int(),
            invalid_long: default_invalid_long(),
            invalid_float: default_invalid_float(),
            invalid_double: default_invalid_double(),
            invalid_bool: default_invalid_bool(),
        }
    }
}

// Default functions for serde
fn default_path() -> PathBuf { PathBuf::from("logs/trion/Trion.log") }
fn default_max_size() -> u64 { 10 * 1024 * 1024 }
fn default_max_backups() -> usize { 5 }
fn default_invalid_int() -> String { "Ungültige Eingabe! Bitte geben Sie eine gültige ganze Zahl ein.".to_string() }
fn default_invalid_long() -> String { "Ungültige Eingabe! Bitte geben Sie eine gültige Zahl ein.".to_string() }
fn default_invalid_float() -> String { "Ungültige Eingabe! Bitte geben Sie eine gültige Dezimalzahl ein.".to_string() }
fn default_invalid_double() -> String { "Ungültige Eingabe! Bitte geben Sie eine gültige Zahl ein.".to_string() }
fn default_invalid_bool() -> String { "Ungültige Eingabe! Bitte geben Sie 'true' oder 'false' ein.".to_string() }

/// Clamp a requested backup count to the supported minimum of one
pub fn clamp_backups(count: i64) -> usize {
    if count > 0 {
        usize::try_from(count).unwrap_or(usize::MAX)
    } else {
        1
    }
}

fn deserialize_backups<'de, D>(deserializer: D) -> std::result::Result<usize, D::Error>
where
    D: Deserializer<'de>,
{
    i64::deserialize(deserializer).map(clamp_backups)
}

impl LoggerConfig {
    /// Apply the invariants serde cannot express
    pub fn normalized(mut self) -> Self {
        self.max_backups = self.max_backups.max(1);
        self
    }
}

impl Config {
    /// Load configuration from file, or use defaults if not found
    pub fn load() -> Result<Self> {
        // Try to load from config.yaml in current directory
        let config_path = Path::new("config.yaml");

        if config_path.exists() {
            Self::load_from(config_path)
        } else {
            Ok(Config::default())
        }
    }

    /// Load configuration from a specific file path
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {:?}", path))?;
        Self::from_yaml(&contents)
            .with_context(|| format!("Failed to parse config from {:?}", path))
    }

    pub fn from_yaml(contents: &str) -> Result<Self> {
        let mut config: Config = serde_yaml::from_str(contents)?;
        config.logger = config.logger.normalized();
        Ok(config)
    }
}
