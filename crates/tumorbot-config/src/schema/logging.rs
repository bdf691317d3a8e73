use serde::{Deserialize, Serialize};

/// Log level.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl LogLevel {
    /// `EnvFilter` directive scoping this level to the tumorbot crates.
    pub fn directive(self) -> &'static str {
        match self {
            LogLevel::Trace => "tumorbot=trace",
            LogLevel::Debug => "tumorbot=debug",
            LogLevel::Info => "tumorbot=info",
            LogLevel::Warn => "tumorbot=warn",
            LogLevel::Error => "tumorbot=error",
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: LogLevel,
}
