use anyhow::Result;
use std::env;
use std::path::PathBuf;

use crate::services::openai::{DEFAULT_BASE_URL, DEFAULT_MODEL};

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";
pub const DEFAULT_SERVER_URL: &str = "http://localhost:3000";
pub const DEFAULT_HISTORY_PATH: &str = "nutrisnap_history.json";

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub api_key: String,
    pub model: String,
    pub base_url: String,
    pub bind_addr: String,
    pub static_dir: Option<PathBuf>,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let api_key = non_empty(lookup("OPENAI_API_KEY"))
            .ok_or_else(|| anyhow::anyhow!("OPENAI_API_KEY must be set in .env file"))?;

        Ok(Self {
            api_key,
            model: non_empty(lookup("OPENAI_MODEL")).unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            base_url: non_empty(lookup("OPENAI_BASE_URL"))
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            bind_addr: non_empty(lookup("BIND_ADDR"))
                .unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string()),
            static_dir: non_empty(lookup("STATIC_DIR")).map(PathBuf::from),
        })
    }
}

#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub server_url: String,
    pub history_path: PathBuf,
}

impl ClientConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            server_url: non_empty(lookup("NUTRISNAP_URL"))
                .unwrap_or_else(|| DEFAULT_SERVER_URL.to_string()),
            history_path: non_empty(lookup("NUTRISNAP_HISTORY"))
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_HISTORY_PATH)),
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_server_config_defaults() {
        let config =
            ServerConfig::from_lookup(lookup_from(&[("OPENAI_API_KEY", "sk-test")])).unwrap();

        assert_eq!(config.api_key, "sk-test");
        assert_eq!(config.model, "gpt-4o");
        assert_eq!(config.base_url, "https://api.openai.com/v1");
        assert_eq!(config.bind_addr, "0.0.0.0:3000");
        assert!(config.static_dir.is_none());
    }

    #[test]
    fn test_server_config_requires_api_key() {
        assert!(ServerConfig::from_lookup(lookup_from(&[])).is_err());
        assert!(ServerConfig::from_lookup(lookup_from(&[("OPENAI_API_KEY", " ")])).is_err());
    }

    #[test]
    fn test_server_config_overrides() {
        let config = ServerConfig::from_lookup(lookup_from(&[
            ("OPENAI_API_KEY", "sk-test"),
            ("OPENAI_MODEL", "gpt-4o-mini"),
            ("OPENAI_BASE_URL", "http://localhost:11434/v1"),
            ("BIND_ADDR", "127.0.0.1:8080"),
            ("STATIC_DIR", "./public"),
        ]))
        .unwrap();

        assert_eq!(config.model, "gpt-4o-mini");
        assert_eq!(config.base_url, "http://localhost:11434/v1");
        assert_eq!(config.bind_addr, "127.0.0.1:8080");
        assert_eq!(config.static_dir, Some(PathBuf::from("./public")));
    }

    #[test]
    fn test_client_config_defaults() {
        let config = ClientConfig::from_lookup(lookup_from(&[]));
        assert_eq!(config.server_url, "http://localhost:3000");
        assert_eq!(config.history_path, PathBuf::from("nutrisnap_history.json"));
    }
}
