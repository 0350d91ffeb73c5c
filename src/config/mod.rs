use crate::errors::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use serde_yaml::Value;
use std::fs;
use std::path::{Path, PathBuf};

/// Keys every configuration file is expected to carry.
pub const KNOWN_KEYS: &[&str] = &[
    "database",
    "utc_offset_minutes",
    "hourly_rate",
    "currency",
    "busy_timeout_ms",
    "idle_threshold_minutes",
];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub database: String,
    /// Offset applied to UTC timestamps to decide which calendar day a
    /// session belongs to.
    #[serde(default)]
    pub utc_offset_minutes: i32,
    #[serde(default)]
    pub hourly_rate: f64,
    #[serde(default = "default_currency")]
    pub currency: String,
    #[serde(default = "default_busy_timeout")]
    pub busy_timeout_ms: u64,
    #[serde(default = "default_idle_threshold")]
    pub idle_threshold_minutes: u32,
}

fn default_currency() -> String {
    "EUR".to_string()
}
fn default_busy_timeout() -> u64 {
    5000
}
fn default_idle_threshold() -> u32 {
    5
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database: Self::database_file().to_string_lossy().to_string(),
            utc_offset_minutes: 0,
            hourly_rate: 0.0,
            currency: default_currency(),
            busy_timeout_ms: default_busy_timeout(),
            idle_threshold_minutes: default_idle_threshold(),
        }
    }
}

impl Config {
    /// Return the standard configuration directory (`~/.rtimetrack`).
    pub fn config_dir() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".rtimetrack")
    }

    /// Return the full path of the config file
    pub fn config_file() -> PathBuf {
        Self::config_dir().join("rtimetrack.conf")
    }

    /// Return the full path of the SQLite database
    pub fn database_file() -> PathBuf {
        Self::config_dir().join("rtimetrack.sqlite")
    }

    /// Load configuration from file, or return defaults if not found
    pub fn load() -> AppResult<Self> {
        Self::load_from(&Self::config_file())
    }

    pub fn load_from(path: &Path) -> AppResult<Self> {
        if !path.exists() {
            return Ok(Config::default());
        }

        let content = fs::read_to_string(path)?;
        serde_yaml::from_str(&content)
            .map_err(|e| AppError::Config(format!("{}: {}", path.display(), e)))
    }

    pub fn to_yaml(&self) -> AppResult<String> {
        serde_yaml::to_string(self).map_err(|e| AppError::Config(e.to_string()))
    }

    /// Keys from [`KNOWN_KEYS`] absent from the file at `path`.
    pub fn missing_keys(path: &Path) -> AppResult<Vec<&'static str>> {
        let content = fs::read_to_string(path)?;
        let yaml: Value =
            serde_yaml::from_str(&content).map_err(|e| AppError::Config(e.to_string()))?;

        let Some(map) = yaml.as_mapping() else {
            return Err(AppError::Config(format!(
                "{} is not a YAML mapping",
                path.display()
            )));
        };

        Ok(KNOWN_KEYS
            .iter()
            .copied()
            .filter(|k| !map.contains_key(Value::String(k.to_string())))
            .collect())
    }

    /// Initialize configuration directory and file.
    /// Returns the database path the new configuration points to.
    pub fn init_all(custom_db: Option<&str>, is_test: bool) -> AppResult<Config> {
        let dir = Self::config_dir();
        fs::create_dir_all(&dir)?;

        let db_path = match custom_db {
            Some(name) => {
                let p = Path::new(name);
                if p.is_absolute() {
                    p.to_path_buf()
                } else {
                    dir.join(p)
                }
            }
            None => Self::database_file(),
        };

        let config = Config {
            database: db_path.to_string_lossy().to_string(),
            ..Config::default()
        };

        // test mode never touches the user's config file
        if !is_test {
            fs::write(Self::config_file(), config.to_yaml()?)?;
        }

        Ok(config)
    }
}
