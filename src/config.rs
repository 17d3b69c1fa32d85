use crate::attendance::ELIGIBILITY_THRESHOLD;
use serde::Deserialize;
use std::fmt;
use std::fs;
use std::io;
use std::path::Path;

/// Environment variable naming a JSON config file for the binaries.
pub const CONFIG_PATH_ENV: &str = "CLASS_SCHEDULE_CONFIG";
/// Environment variable overriding `http_addr`.
pub const HTTP_ADDR_ENV: &str = "CLASS_SCHEDULE_HTTP_ADDR";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    /// Course code searched for in the timetable.
    #[serde(default)]
    pub course_code: String,

    /// Minimum attendance percentage for exam eligibility.
    #[serde(default = "default_eligibility_threshold")]
    pub eligibility_threshold: f64,

    /// Listen address of the HTTP API.
    #[serde(default = "default_http_addr")]
    pub http_addr: String,

    /// Log verbosity (0 = warn .. 3 = trace).
    #[serde(default)]
    pub verbosity: u8,
}

fn default_eligibility_threshold() -> f64 {
    ELIGIBILITY_THRESHOLD
}

fn default_http_addr() -> String {
    "0.0.0.0:3000".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            course_code: String::new(),
            eligibility_threshold: default_eligibility_threshold(),
            http_addr: default_http_addr(),
            verbosity: 0,
        }
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Io(io::Error),
    Parse(serde_json::Error),
    Invalid(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(err) => write!(f, "cannot read config: {err}"),
            ConfigError::Parse(err) => write!(f, "invalid config JSON: {err}"),
            ConfigError::Invalid(msg) => write!(f, "invalid config: {msg}"),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<io::Error> for ConfigError {
    fn from(value: io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(value: serde_json::Error) -> Self {
        Self::Parse(value)
    }
}

impl AppConfig {
    pub fn from_json_str(contents: &str) -> Result<Self, ConfigError> {
        let config: AppConfig = serde_json::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }

    /// Config named by `CLASS_SCHEDULE_CONFIG`, or the defaults when unset.
    /// `CLASS_SCHEDULE_HTTP_ADDR` overrides the listen address either way.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = match std::env::var_os(CONFIG_PATH_ENV) {
            Some(path) => Self::load(path)?,
            None => Self::default(),
        };
        if let Ok(addr) = std::env::var(HTTP_ADDR_ENV) {
            config.http_addr = addr;
        }
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if !self.eligibility_threshold.is_finite()
            || !(0.0..=100.0).contains(&self.eligibility_threshold)
        {
            return Err(ConfigError::Invalid(format!(
                "eligibility_threshold must be between 0 and 100 (got {})",
                self.eligibility_threshold
            )));
        }
        Ok(())
    }
}
