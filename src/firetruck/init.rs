use crate::api::FiretruckApi;
use crate::config::{FiretruckConfig, CONFIG_DIR_ENV};
use crate::error::{FiretruckError, Result};
use crate::remote::http::{HttpService, ServiceEndpoint};
use directories::ProjectDirs;
use std::path::PathBuf;

pub struct FiretruckContext {
    pub api: FiretruckApi<HttpService>,
    pub config: FiretruckConfig,
}

/// Values given on the command line; they win over the environment and the file.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub service_url: Option<String>,
    pub target_service_url: Option<String>,
}

/// `FT_CONFIG_DIR` if set, otherwise the platform config directory.
pub fn config_dir() -> Result<PathBuf> {
    if let Some(dir) = std::env::var_os(CONFIG_DIR_ENV).filter(|d| !d.is_empty()) {
        return Ok(PathBuf::from(dir));
    }
    ProjectDirs::from("com", "firetruck", "firetruck")
        .map(|dirs| dirs.config_dir().to_path_buf())
        .ok_or_else(|| FiretruckError::Config("Could not determine config dir".to_string()))
}

/// Resolves configuration (defaults, file, environment, flags) for `config_dir`.
pub fn resolve_config(config_dir: &std::path::Path, overrides: &Overrides) -> Result<FiretruckConfig> {
    let mut config = FiretruckConfig::load(config_dir)?;
    config.apply_env(|key| std::env::var(key).ok());
    if let Some(url) = &overrides.service_url {
        config.service_url = url.clone();
    }
    if let Some(url) = &overrides.target_service_url {
        config.target_service_url = Some(url.clone());
    }
    Ok(config)
}

pub fn initialize(overrides: &Overrides) -> Result<FiretruckContext> {
    let config_dir = config_dir()?;
    let config = resolve_config(&config_dir, overrides)?;
    tracing::debug!(
        config_dir = %config_dir.display(),
        service = %config.service_url,
        target = %config.target_url(),
        "resolved configuration"
    );

    let source = HttpService::new(
        ServiceEndpoint::new(config.service_url.clone()).with_timeout(config.timeout()),
    );
    let target = HttpService::new(
        ServiceEndpoint::new(config.target_url()).with_timeout(config.timeout()),
    );
    let api = FiretruckApi::new(source, target, config_dir).with_concurrency(config.concurrency());

    Ok(FiretruckContext { api, config })
}
