use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::Path;
use std::sync::OnceLock;
use strum::{Display, EnumString};

static SETTINGS: OnceLock<Settings> = OnceLock::new();

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    pub sink: SinkConfig,
    pub share: Share,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum SinkBackend {
    Rest,
    Sqlite,
    Disabled,
}

/// Everything a results sink needs; handed to `Sink::from_config` at startup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SinkConfig {
    pub backend: SinkBackend,
    pub rest: Rest,
    pub sqlite: Sqlite,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Rest {
    pub url: String,
    pub anon_key: String,
    pub table: String,
    pub timeout_secs: u64,
}

impl Rest {
    pub fn is_configured(&self) -> bool {
        !self.url.trim().is_empty() && !self.anon_key.trim().is_empty()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Sqlite {
    pub database_url: String,
    pub pool_size: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Share {
    pub base_url: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            sink: SinkConfig {
                backend: SinkBackend::Sqlite,
                rest: Rest {
                    url: String::new(),
                    anon_key: String::new(),
                    table: "hamilton_results".to_string(),
                    timeout_secs: 10,
                },
                sqlite: Sqlite {
                    database_url: "results.db".to_string(),
                    pool_size: 2,
                },
            },
            share: Share {
                base_url: "https://hamilton-stress.example.com/".to_string(),
            },
        }
    }
}

impl Settings {
    pub fn load() -> &'static Settings {
        SETTINGS.get_or_init(|| {
            let mut settings = Self::load_from_files();
            settings.apply_overrides(|key| env::var(key).ok());
            settings
        })
    }

    fn load_from_files() -> Settings {
        let default_path = Path::new("settings.default.ron");
        let override_path = Path::new("settings.ron");

        let mut settings = if default_path.exists() {
            fs::read_to_string(default_path)
                .ok()
                .and_then(|content| ron::from_str(&content).ok())
                .unwrap_or_default()
        } else {
            Settings::default()
        };

        if override_path.exists() {
            if let Ok(content) = fs::read_to_string(override_path) {
                if let Ok(overrides) = ron::from_str::<Settings>(&content) {
                    settings = overrides;
                }
            }
        }

        settings
    }

    /// Environment wins over both settings files. Blank values are ignored.
    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        if let Some(backend) = get("RESULTS_BACKEND").and_then(|b| b.parse().ok()) {
            self.sink.backend = backend;
        }
        if let Some(url) = get("SUPABASE_URL") {
            self.sink.rest.url = url;
        }
        if let Some(key) = get("SUPABASE_ANON_KEY") {
            self.sink.rest.anon_key = key;
        }
        if let Some(table) = get("RESULTS_TABLE") {
            self.sink.rest.table = table;
        }
        if let Some(database_url) = get("DATABASE_URL") {
            self.sink.sqlite.database_url = database_url;
        }
        if let Some(base_url) = get("SHARE_URL") {
            self.share.base_url = base_url;
        }
    }
}

pub fn settings() -> &'static Settings {
    Settings::load()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env_of(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_env_overrides() {
        let env = env_of(&[
            ("RESULTS_BACKEND", "REST"),
            ("SUPABASE_URL", " https://abc.supabase.co "),
            ("SUPABASE_ANON_KEY", "anon"),
            ("SHARE_URL", "https://share.example/"),
        ]);
        let mut settings = Settings::default();
        settings.apply_overrides(|k| env.get(k).cloned());

        assert_eq!(settings.sink.backend, SinkBackend::Rest);
        assert_eq!(settings.sink.rest.url, "https://abc.supabase.co");
        assert!(settings.sink.rest.is_configured());
        assert_eq!(settings.sink.rest.table, "hamilton_results");
        assert_eq!(settings.share.base_url, "https://share.example/");
    }

    #[test]
    fn test_blank_and_unknown_values_ignored() {
        let env = env_of(&[("RESULTS_BACKEND", "mongo"), ("DATABASE_URL", "   ")]);
        let mut settings = Settings::default();
        settings.apply_overrides(|k| env.get(k).cloned());

        assert_eq!(settings.sink.backend, SinkBackend::Sqlite);
        assert_eq!(settings.sink.sqlite.database_url, "results.db");
        assert!(!settings.sink.rest.is_configured());
    }

    #[test]
    fn test_ron_round_trip() {
        let text = ron::to_string(&Settings::default()).unwrap();
        let parsed: Settings = ron::from_str(&text).unwrap();
        assert_eq!(parsed.sink.backend, SinkBackend::Sqlite);
        assert_eq!(parsed.sink.rest.timeout_secs, 10);
    }
}
