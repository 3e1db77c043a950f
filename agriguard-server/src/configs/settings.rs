use std::env;
use std::path::Path;

use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};

use crate::configs::normalize_path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Server {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Logger {
    pub level: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Database {
    pub migration_path: Option<String>,
    pub clean_start: bool,
    pub url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Gemini {
    pub endpoint: String,
    pub model: String,
    pub api_key: Option<String>,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Irrigation {
    /// Control loop period in milliseconds
    pub tick_millis: u64,
    pub threshold: i32,
    pub auto_mode: bool,
    pub window_capacity: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct History {
    pub retention_hours: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    pub server: Server,
    pub logger: Logger,
    pub database: Database,
    pub gemini: Gemini,
    pub irrigation: Irrigation,
    pub history: History,
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or("development".into());

        let mut settings: Settings = Config::builder()
            .add_source(File::with_name("configs/default"))
            .add_source(File::with_name(&format!("configs/{run_mode}")).required(false))
            .add_source(Environment::with_prefix("AGRIGUARD").separator("__"))
            .build()?
            .try_deserialize()?;

        if settings.gemini.api_key.as_deref().is_none_or(str::is_empty) {
            settings.gemini.api_key = env::var("GEMINI_API_KEY")
                .or_else(|_| env::var("API_KEY"))
                .ok()
                .filter(|key| !key.is_empty());
        }

        if let Some(migrate) = &settings.database.migration_path {
            if Path::new(migrate).is_dir() {
                let migrate_path = normalize_path(migrate)
                    .map_err(|e| ConfigError::Message(e.to_string()))?
                    .to_string_lossy()
                    .to_string();

                settings.database.migration_path = Some(migrate_path);
            } else {
                settings.database.migration_path = None;
            }
        }

        Ok(settings)
    }
}

impl Default for Gemini {
    fn default() -> Self {
        Self {
            endpoint: String::from("https://generativelanguage.googleapis.com/v1beta"),
            model: String::from("gemini-3-flash-preview"),
            api_key: None,
            timeout_secs: 60,
        }
    }
}

impl Default for Irrigation {
    fn default() -> Self {
        Self {
            tick_millis: 1000,
            threshold: 45,
            auto_mode: true,
            window_capacity: 7,
        }
    }
}

impl Default for History {
    fn default() -> Self {
        Self { retention_hours: 24 }
    }
}
