use serde::Deserialize;
use std::fs;
use std::path::PathBuf;
use tracing::Level;

/// Optional settings read once at startup from JSON. Never written back.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct AppConfig {
    /// Outline the grab handle when rendering (development aid)
    #[serde(default)]
    pub show_drag_region: bool,
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_log_level() -> String {
    "info".into()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            show_drag_region: false,
            log_level: default_log_level(),
        }
    }
}

pub fn config_path() -> PathBuf {
    let base = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
    base.join("CrosshairOverlay").join("config.json")
}

pub fn load_config() -> AppConfig {
    let path = config_path();
    if path.exists() {
        let data = fs::read_to_string(&path).unwrap_or_default();
        parse_config(&data)
    } else {
        AppConfig::default()
    }
}

/// Unreadable or malformed config falls back to defaults.
pub fn parse_config(data: &str) -> AppConfig {
    serde_json::from_str(data).unwrap_or_default()
}

/// `LOG_LEVEL` from the environment wins over the config file.
pub fn log_level(config: &AppConfig) -> Level {
    let name = std::env::var("LOG_LEVEL").unwrap_or_else(|_| config.log_level.clone());
    parse_level(&name)
}

pub fn parse_level(name: &str) -> Level {
    match name.trim().to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    }
}
