#[cfg(test)]
#[path = "config_test.rs"]
mod tests;

use std::env;

use dashmap::DashMap;
use once_cell::sync::Lazy;

static CONFIG: Lazy<DashMap<String, String>> = Lazy::new(DashMap::new);

/// Environment variable holding the base URL every endpoint is resolved
/// against.
pub const API_BASE_URL_ENV: &str = "CHAT_API_BASE_URL";

#[derive(Clone, Copy, PartialEq, Eq)]
pub enum ConfigKey {
    ApiBaseUrl,
}

impl ToString for ConfigKey {
    fn to_string(&self) -> String {
        match self {
            ConfigKey::ApiBaseUrl => return String::from("api-base-url"),
        }
    }
}

pub struct Config {}

impl Config {
    pub fn get(key: ConfigKey) -> String {
        if let Some(val) = CONFIG.get(&key.to_string()) {
            return val.to_string();
        }

        return Config::default(key);
    }

    pub fn set(key: ConfigKey, value: &str) {
        CONFIG.insert(key.to_string(), value.to_string());
    }

    pub fn default(key: ConfigKey) -> String {
        let res = match key {
            ConfigKey::ApiBaseUrl => "http://localhost:8080",
        };

        return res.to_string();
    }

    /// Seeds the process-wide configuration from the environment. Meant to be
    /// called once at startup, before any client is constructed.
    pub fn load_from_env() {
        if let Ok(url) = env::var(API_BASE_URL_ENV) {
            if !url.is_empty() {
                Config::set(ConfigKey::ApiBaseUrl, &url);
            }
        }

        tracing::debug!(
            api_base_url = Config::get(ConfigKey::ApiBaseUrl),
            "config loaded"
        );
    }
}
