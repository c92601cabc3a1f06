//! [`Config`]-related definitions.

use std::{path::PathBuf, time};

use config::{builder::DefaultState, ConfigBuilder, ConfigError};
use serde::Deserialize;
use service::infra::api::http;
use smart_default::SmartDefault;
use url::Url;

/// Application configuration.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct Config {
    /// API configuration.
    #[serde(default)]
    pub api: Api,

    /// Session storage configuration.
    #[serde(default)]
    pub storage: Storage,

    /// Reservations configuration.
    #[serde(default)]
    pub scheduler: Scheduler,

    /// Log configuration.
    #[serde(default)]
    pub log: Log,
}

impl Config {
    /// Creates a new [`Config`] by:
    /// - loading it from the provided `path` (if any);
    /// - merging it with the environment variables (if any);
    /// - using default values for missing fields.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn new(path: impl AsRef<str>) -> Result<Self, ConfigError> {
        ConfigBuilder::<DefaultState>::default()
            .add_source(config::File::with_name(path.as_ref()).required(false))
            .add_source(config::Environment::with_prefix("CONF").separator("."))
            .build()?
            .try_deserialize()
    }
}

/// API configuration.
#[derive(Clone, Debug, Deserialize, SmartDefault)]
#[serde(default)]
pub struct Api {
    /// Base URL of the REST API.
    #[default("https://reservasaabb-production.up.railway.app".to_owned())]
    pub base_url: String,

    /// Timeout of a whole request, none if omitted.
    #[serde(with = "humantime_serde")]
    pub timeout: Option<time::Duration>,
}

impl TryFrom<Api> for http::Config {
    type Error = url::ParseError;

    fn try_from(value: Api) -> Result<Self, Self::Error> {
        let Api { base_url, timeout } = value;
        Ok(Self {
            base_url: Url::parse(&base_url)?,
            timeout,
        })
    }
}

/// Session storage configuration.
#[derive(Clone, Debug, Deserialize, SmartDefault)]
#[serde(default)]
pub struct Storage {
    /// Path to the file persisting the session.
    #[default(PathBuf::from(".aabb-session.json"))]
    pub path: PathBuf,
}

/// Reservations configuration.
#[derive(Clone, Copy, Debug, Deserialize, SmartDefault)]
#[serde(default)]
pub struct Scheduler {
    /// Maximum number of simultaneously active reservations of a member.
    #[default(4)]
    pub reservation_limit: usize,
}

impl From<Scheduler> for service::Config {
    fn from(value: Scheduler) -> Self {
        let Scheduler { reservation_limit } = value;
        Self { reservation_limit }
    }
}

/// Log configuration.
#[derive(Clone, Copy, Debug, Default, Deserialize)]
#[serde(default)]
pub struct Log {
    /// Log level.
    pub level: LogLevel,
}

/// Log level.
#[derive(Clone, Copy, Debug, Default, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LogLevel {
    /// Designates very low priority, often extremely verbose, information.
    Trace,

    /// Designates lower priority information.
    Debug,

    /// Designates useful information.
    Info,

    /// Designates hazardous situations.
    #[default]
    Warn,

    /// Designates very serious errors.
    Error,
}

impl From<LogLevel> for tracing::Level {
    fn from(value: LogLevel) -> Self {
        match value {
            LogLevel::Trace => Self::TRACE,
            LogLevel::Debug => Self::DEBUG,
            LogLevel::Info => Self::INFO,
            LogLevel::Warn => Self::WARN,
            LogLevel::Error => Self::ERROR,
        }
    }
}
