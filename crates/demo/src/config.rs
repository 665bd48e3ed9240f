//! Demo configuration, read from the environment.

use ordership_observability::{LogFormat, ParseLogFormatError};

pub const LOG_FORMAT_VAR: &str = "ORDERSHIP_LOG_FORMAT";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DemoConfig {
    pub log_format: LogFormat,
    /// Set when the configured format was not recognized and the default was used.
    pub log_format_error: Option<ParseLogFormatError>,
}

impl DemoConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        match lookup(LOG_FORMAT_VAR).map(|raw| raw.parse::<LogFormat>()) {
            None => Self {
                log_format: LogFormat::default(),
                log_format_error: None,
            },
            Some(Ok(log_format)) => Self {
                log_format,
                log_format_error: None,
            },
            Some(Err(e)) => Self {
                log_format: LogFormat::default(),
                log_format_error: Some(e),
            },
        }
    }
}
