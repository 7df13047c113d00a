use anyhow::{Context, Result};
use extract::LlmConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub llm: LlmConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter used when `RUST_LOG` is not set
    pub filter: String,
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "info".to_string(),
            json: false,
        }
    }
}

impl AppConfig {
    /// Defaults, then the JSON file if one is given, then the environment.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config: AppConfig = match path {
            Some(path) => {
                let text = std::fs::read_to_string(path)
                    .context(format!("Failed to read config file: {:?}", path))?;
                serde_json::from_str(&text)
                    .context(format!("Failed to parse config file: {:?}", path))?
            }
            None => Self::default(),
        };

        Ok(config.with_overrides(|key| std::env::var(key).ok()))
    }

    /// Applies `OLLAMA_URL`, `OLLAMA_MODEL` and `READER_JSON_LOGS`.
    pub fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(url) = lookup("OLLAMA_URL") {
            self.llm.base_url = url;
        }
        if let Some(model) = lookup("OLLAMA_MODEL") {
            self.llm.model = model;
        }
        if let Some(json) = lookup("READER_JSON_LOGS") {
            self.logging.json = matches!(json.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes");
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config: AppConfig =
            serde_json::from_str(r#"{ "llm": { "model": "mistral" } }"#).unwrap();

        assert_eq!(config.llm.model, "mistral");
        assert_eq!(config.llm.base_url, "http://localhost:11434");
        assert_eq!(config.logging, LoggingConfig::default());
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = HashMap::from([
            ("OLLAMA_URL", "http://gpu-box:11434"),
            ("READER_JSON_LOGS", "true"),
        ]);
        let config = AppConfig::default().with_overrides(|key| env.get(key).map(|v| v.to_string()));

        assert_eq!(config.llm.base_url, "http://gpu-box:11434");
        assert_eq!(config.llm.model, "llama3");
        assert!(config.logging.json);
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("reader.json");
        std::fs::write(&path, r#"{ "logging": { "filter": "debug" } }"#).unwrap();

        let config = AppConfig::load(Some(&path)).unwrap();
        assert_eq!(config.logging.filter, "debug");
    }

    #[test]
    fn test_load_rejects_bad_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("reader.json");
        std::fs::write(&path, "not json").unwrap();

        assert!(AppConfig::load(Some(&path)).is_err());
    }
}
