use crate::error::{FiretruckError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

const CONFIG_FILENAME: &str = "config.json";
const DEFAULT_SERVICE_URL: &str = "http://localhost:8080";
const DEFAULT_TIMEOUT_SECS: u64 = 60;
const DEFAULT_REPORT_CONCURRENCY: usize = 8;

pub const SERVICE_ENV: &str = "FT_SERVICE";
pub const TARGET_SERVICE_ENV: &str = "FT_SERVICE_TARGET";
pub const CONFIG_DIR_ENV: &str = "FT_CONFIG_DIR";

/// Configuration for firetruck, stored in `<config dir>/config.json`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FiretruckConfig {
    /// Base URL of the contract service
    #[serde(default = "default_service_url")]
    pub service_url: String,

    /// Base URL of the service migrations write to, if not the same one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_service_url: Option<String>,

    /// Per-request deadline in seconds; 0 waits forever
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// How many reports listing commands evaluate at the same time
    #[serde(default = "default_report_concurrency")]
    pub report_concurrency: usize,
}

fn default_service_url() -> String {
    DEFAULT_SERVICE_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

fn default_report_concurrency() -> usize {
    DEFAULT_REPORT_CONCURRENCY
}

impl Default for FiretruckConfig {
    fn default() -> Self {
        Self {
            service_url: default_service_url(),
            target_service_url: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            report_concurrency: DEFAULT_REPORT_CONCURRENCY,
        }
    }
}

impl FiretruckConfig {
    /// Load config from the given directory, or return defaults if not found
    pub fn load<P: AsRef<Path>>(config_dir: P) -> Result<Self> {
        let config_path = config_dir.as_ref().join(CONFIG_FILENAME);

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&config_path)?;
        let config: FiretruckConfig = serde_json::from_str(&content).map_err(|e| {
            FiretruckError::Config(format!("{}: {}", config_path.display(), e))
        })?;
        Ok(config)
    }

    /// Save config to the given directory
    pub fn save<P: AsRef<Path>>(&self, config_dir: P) -> Result<()> {
        let config_dir = config_dir.as_ref();

        if !config_dir.exists() {
            fs::create_dir_all(config_dir)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        fs::write(config_dir.join(CONFIG_FILENAME), content)?;
        Ok(())
    }

    /// Overrides service URLs from the environment, read through `lookup`.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(url) = lookup(SERVICE_ENV).filter(|u| !u.is_empty()) {
            self.service_url = url;
        }
        if let Some(url) = lookup(TARGET_SERVICE_ENV).filter(|u| !u.is_empty()) {
            self.target_service_url = Some(url);
        }
    }

    /// Where migrations write to.
    pub fn target_url(&self) -> &str {
        self.target_service_url
            .as_deref()
            .unwrap_or(&self.service_url)
    }

    pub fn timeout(&self) -> Option<Duration> {
        match self.timeout_secs {
            0 => None,
            secs => Some(Duration::from_secs(secs)),
        }
    }

    pub fn concurrency(&self) -> usize {
        self.report_concurrency.max(1)
    }

    pub fn get(&self, key: &str) -> Option<String> {
        match key {
            "service-url" => Some(self.service_url.clone()),
            "target-service-url" => Some(
                self.target_service_url
                    .clone()
                    .unwrap_or_else(|| "(same as service-url)".to_string()),
            ),
            "timeout-secs" => Some(self.timeout_secs.to_string()),
            "report-concurrency" => Some(self.report_concurrency.to_string()),
            _ => None,
        }
    }

    pub fn set(&mut self, key: &str, value: &str) -> std::result::Result<(), String> {
        match key {
            "service-url" => {
                self.service_url = parse_url(value)?;
            }
            "target-service-url" => {
                self.target_service_url = if value.is_empty() {
                    None
                } else {
                    Some(parse_url(value)?)
                };
            }
            "timeout-secs" => {
                self.timeout_secs = value
                    .parse()
                    .map_err(|_| format!("timeout-secs must be a number, got {}", value))?;
            }
            "report-concurrency" => {
                let n: usize = value
                    .parse()
                    .map_err(|_| format!("report-concurrency must be a number, got {}", value))?;
                if n == 0 {
                    return Err("report-concurrency must be at least 1".to_string());
                }
                self.report_concurrency = n;
            }
            _ => return Err(format!("Unknown config key: {}", key)),
        }
        Ok(())
    }

    pub fn list_all(&self) -> Vec<(&'static str, String)> {
        ["service-url", "target-service-url", "timeout-secs", "report-concurrency"]
            .into_iter()
            .filter_map(|k| self.get(k).map(|v| (k, v)))
            .collect()
    }
}

fn parse_url(value: &str) -> std::result::Result<String, String> {
    if value.starts_with("http://") || value.starts_with("https://") {
        Ok(value.trim_end_matches('/').to_string())
    } else {
        Err(format!("expected an http(s) URL, got {}", value))
    }
}
