use serde::Deserialize;

use crate::outcome::OutcomeRules;

#[derive(Debug, Deserialize, Clone, Default)]
pub struct EngineConfig {
    #[serde(default)]
    pub outcome: OutcomeConfig,
    #[serde(default)]
    pub source: SourceConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct OutcomeConfig {
    pub waste_duration_threshold_sec: f64,
}

impl Default for OutcomeConfig {
    fn default() -> Self {
        Self {
            waste_duration_threshold_sec: OutcomeRules::default().waste_duration_threshold_sec,
        }
    }
}

impl OutcomeConfig {
    pub fn rules(&self) -> OutcomeRules {
        OutcomeRules {
            waste_duration_threshold_sec: self.waste_duration_threshold_sec,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct SourceConfig {
    pub page_size: usize,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self { page_size: 1000 }
    }
}

/// Default configuration embedded in the library
const DEFAULT_CONFIG: &str = r#"
[outcome]
waste_duration_threshold_sec = 900.0

[source]
page_size = 1000
"#;

/// Load configuration from an engine.toml file
///
/// Search order:
/// 1. Next to the executable (for production)
/// 2. Falls back to embedded default config
pub fn load_config() -> anyhow::Result<EngineConfig> {
    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            let config_path = exe_dir.join("engine.toml");

            if config_path.exists() {
                tracing::info!("Loading config from: {}", config_path.display());
                let contents = std::fs::read_to_string(&config_path)?;
                let config: EngineConfig = toml::from_str(&contents)?;
                return Ok(config);
            }
        }
    }

    tracing::info!("Using default embedded configuration");
    let config: EngineConfig = toml::from_str(DEFAULT_CONFIG)?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_loads() {
        let config: Result<EngineConfig, _> = toml::from_str(DEFAULT_CONFIG);
        assert!(config.is_ok());
        let config = config.unwrap();
        assert_eq!(config.outcome.waste_duration_threshold_sec, 900.0);
        assert_eq!(config.source.page_size, 1000);
    }

    #[test]
    fn test_partial_config_keeps_defaults() {
        let config: EngineConfig = toml::from_str("[source]\npage_size = 250\n").unwrap();
        assert_eq!(config.source.page_size, 250);
        assert_eq!(config.outcome.waste_duration_threshold_sec, 900.0);
    }
}
