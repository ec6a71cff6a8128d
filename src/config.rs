//! JSON configuration and level files

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};

use crate::types::{GameConfig, LevelDefinition};

/// Environment fallback for `--config`
pub const CONFIG_ENV: &str = "CAT_SHELF_CONFIG";

/// Parse and validate a config; missing fields take their defaults
pub fn parse_config(text: &str) -> Result<GameConfig> {
    let config: GameConfig = serde_json::from_str(text).context("config is not valid JSON")?;
    config
        .validate()
        .map_err(|e| anyhow!("invalid config: {}", e))?;
    Ok(config)
}

pub fn load_config(path: impl AsRef<Path>) -> Result<GameConfig> {
    let path = path.as_ref();
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    parse_config(&text).with_context(|| format!("failed to load config {}", path.display()))
}

/// `CAT_SHELF_CONFIG`, ignoring blank values
pub fn config_path_from_env() -> Option<PathBuf> {
    std::env::var(CONFIG_ENV)
        .ok()
        .map(|s| s.trim().to_string())
        .and_then(|s| if s.is_empty() { None } else { Some(s) })
        .map(PathBuf::from)
}

pub fn load_level(path: impl AsRef<Path>, group_size: usize) -> Result<LevelDefinition> {
    let path = path.as_ref();
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read level {}", path.display()))?;
    let level: LevelDefinition = serde_json::from_str(&text)
        .with_context(|| format!("level {} is not valid JSON", path.display()))?;
    level
        .validate(group_size)
        .map_err(|e| anyhow!("invalid level {}: {}", path.display(), e))?;
    Ok(level)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_object_is_the_default_config() {
        assert_eq!(parse_config("{}").unwrap(), GameConfig::default());
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let config = parse_config(r#"{ "evaluator": { "runs": 8 } }"#).unwrap();
        assert_eq!(config.evaluator.runs, 8);
        assert_eq!(config.evaluator.move_budget, GameConfig::default().evaluator.move_budget);
        assert_eq!(config.layout, GameConfig::default().layout);
    }

    #[test]
    fn rejects_invalid_values() {
        let err = parse_config(r#"{ "group_size": 0 }"#).unwrap_err();
        assert!(err.to_string().contains("invalid config"));
        assert!(parse_config("not json").is_err());
    }

    #[test]
    fn missing_file_names_the_path() {
        let err = load_config("/definitely/not/here.json").unwrap_err();
        assert!(format!("{err:#}").contains("/definitely/not/here.json"));
    }
}
