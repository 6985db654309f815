use crate::commands::{CmdMessage, CmdResult};
use crate::config::FiretruckConfig;
use crate::error::{FiretruckError, Result};
use std::path::Path;

#[derive(Debug, Clone)]
pub enum ConfigAction {
    ShowAll,
    ShowKey(String),
    Set(String, String),
}

/// Reads or edits `config.json` in `config_dir`.
///
/// Environment and flag overrides are not applied: this shows what is on disk. An
/// unknown key or an invalid value is an error and leaves the file untouched.
pub fn run(config_dir: &Path, action: ConfigAction) -> Result<CmdResult> {
    let mut config = FiretruckConfig::load(config_dir)?;

    let key = match action {
        ConfigAction::ShowAll => return Ok(CmdResult::default().with_config(config)),
        ConfigAction::ShowKey(key) => {
            let shown = lookup(&config, &key)?;
            let mut result = CmdResult::default();
            result.add_message(CmdMessage::info(shown));
            return Ok(result);
        }
        ConfigAction::Set(key, value) => {
            config.set(&key, &value).map_err(FiretruckError::Config)?;
            config.save(config_dir)?;
            key
        }
    };

    let shown = lookup(&config, &key)?;
    tracing::info!(key = %key, value = %shown, dir = %config_dir.display(), "config saved");
    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!("{} = {}", key, shown)));
    Ok(result.with_config(config))
}

fn lookup(config: &FiretruckConfig, key: &str) -> Result<String> {
    config
        .get(key)
        .ok_or_else(|| FiretruckError::Config(format!("Unknown config key: {}", key)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::MessageLevel;
    use tempfile::TempDir;

    #[test]
    fn shows_defaults_without_file() {
        let temp = TempDir::new().unwrap();
        let result = run(temp.path(), ConfigAction::ShowAll).unwrap();
        assert_eq!(result.config, Some(FiretruckConfig::default()));
        assert!(!temp.path().join("config.json").exists());
    }

    #[test]
    fn set_persists_normalized_value() {
        let temp = TempDir::new().unwrap();
        let result = run(
            temp.path(),
            ConfigAction::Set("target-service-url".into(), "https://staging:8443/".into()),
        )
        .unwrap();
        assert!(matches!(result.messages[0].level, MessageLevel::Success));
        assert_eq!(
            result.messages[0].content,
            "target-service-url = https://staging:8443"
        );

        let shown = run(temp.path(), ConfigAction::ShowKey("target-service-url".into())).unwrap();
        assert_eq!(shown.messages[0].content, "https://staging:8443");
    }

    #[test]
    fn invalid_value_is_an_error_and_not_saved() {
        let temp = TempDir::new().unwrap();
        let err = run(
            temp.path(),
            ConfigAction::Set("report-concurrency".into(), "many".into()),
        )
        .unwrap_err();
        assert!(matches!(err, FiretruckError::Config(_)));
        assert!(!temp.path().join("config.json").exists());
    }

    #[test]
    fn unknown_key_is_an_error() {
        let temp = TempDir::new().unwrap();
        let err = run(temp.path(), ConfigAction::ShowKey("nope".into())).unwrap_err();
        assert_eq!(err.to_string(), "Config error: Unknown config key: nope");
    }
}
