use crate::config::{AppConfig, LogFormat};

/// Subscriber settings resolved from the `logging` config section
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

impl From<&AppConfig> for LoggingConfig {
    fn from(config: &AppConfig) -> Self {
        Self {
            level: config.logging.level.clone(),
            format: config.logging.format.clone(),
        }
    }
}

impl LoggingConfig {
    /// Quieter defaults for one-shot CLI commands whose stdout is parsed
    pub fn for_cli(config: &AppConfig) -> Self {
        Self {
            level: "warn".to_string(),
            ..Self::from(config)
        }
    }
}
