use std::path::{Path, PathBuf};
use std::time::Duration;

use tracing::warn;
use url::Url;

use crate::error::AppError;

const DATA_DIR_NAME: &str = ".meal-favourites";
const DEFAULT_API_BASE: &str = "https://www.themealdb.com/api/json/v1/1";
const DEFAULT_DEBOUNCE_MS: u64 = 300;
const DEFAULT_BIND_ADDR: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 3000;

/// Name of the durable slot holding the favourites collection
pub const FAVOURITES_SLOT: &str = "favourites";

const DATA_DIR_ENV: &str = "MEALS_DATA_DIR";
const API_BASE_ENV: &str = "MEALDB_API_BASE";
const DEBOUNCE_ENV: &str = "MEALS_DEBOUNCE_MS";
const BIND_ADDR_ENV: &str = "BIND_ADDR";
const PORT_ENV: &str = "PORT";

/// Configuration for storage paths, the remote API and input settling
#[derive(Debug, Clone)]
pub struct Config {
    base_dir: PathBuf,
    api_base: Url,
    debounce: Duration,
    bind_addr: String,
    port: u16,
}

impl Config {
    /// Create config with a specific base directory and default remote settings
    pub fn new(base_dir: PathBuf) -> Result<Self, AppError> {
        Ok(Self {
            base_dir,
            api_base: Url::parse(DEFAULT_API_BASE)?,
            debounce: Duration::from_millis(DEFAULT_DEBOUNCE_MS),
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
            port: DEFAULT_PORT,
        })
    }

    /// Create config using the current working directory
    pub fn from_current_dir() -> Result<Self, AppError> {
        let cwd = std::env::current_dir()?;
        Self::new(cwd.join(DATA_DIR_NAME))
    }

    /// Defaults from the current directory, overridden by environment variables
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Like `from_env`, reading overrides through `var`.
    ///
    /// Invalid values are logged and the default is kept.
    pub fn from_vars(var: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let mut config = match var(DATA_DIR_ENV) {
            Some(dir) if !dir.trim().is_empty() => Self::new(PathBuf::from(dir))?,
            _ => Self::from_current_dir()?,
        };

        if let Some(url) = parse_var(&var, API_BASE_ENV, |raw| Url::parse(raw)) {
            config.api_base = url;
        }
        if let Some(ms) = parse_var(&var, DEBOUNCE_ENV, |raw| raw.parse::<u64>()) {
            config.debounce = Duration::from_millis(ms);
        }
        if let Some(addr) = var(BIND_ADDR_ENV).filter(|a| !a.trim().is_empty()) {
            config.bind_addr = addr.trim().to_string();
        }
        if let Some(port) = parse_var(&var, PORT_ENV, |raw| raw.parse::<u16>()) {
            config.port = port;
        }

        Ok(config)
    }

    pub fn with_api_base(mut self, api_base: Url) -> Self {
        self.api_base = api_base;
        self
    }

    pub fn with_debounce(mut self, debounce: Duration) -> Self {
        self.debounce = debounce;
        self
    }

    /// Get the base directory path
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    pub fn api_base(&self) -> &Url {
        &self.api_base
    }

    pub fn debounce(&self) -> Duration {
        self.debounce
    }

    /// Address the HTTP server binds to
    pub fn bind_addr(&self) -> &str {
        &self.bind_addr
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    /// Get the file path backing a named slot
    pub fn slot_path(&self, slot: &str) -> PathBuf {
        self.base_dir.join(format!("{}.json", slot))
    }

    /// Get the favourites slot file path
    pub fn favourites_path(&self) -> PathBuf {
        self.slot_path(FAVOURITES_SLOT)
    }
}

fn parse_var<T, E: std::fmt::Display>(
    var: &impl Fn(&str) -> Option<String>,
    key: &str,
    parse: impl FnOnce(&str) -> Result<T, E>,
) -> Option<T> {
    let raw = var(key)?;
    parse(raw.trim())
        .map_err(|e| warn!("Invalid {key} value {raw:?}: {e}, using default"))
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_slot_paths() {
        let config = Config::new(PathBuf::from("/tmp/meals")).unwrap();
        assert_eq!(
            config.favourites_path(),
            PathBuf::from("/tmp/meals/favourites.json")
        );
        assert_eq!(
            config.slot_path("drafts"),
            PathBuf::from("/tmp/meals/drafts.json")
        );
    }

    #[test]
    fn test_defaults() {
        let config = Config::new(PathBuf::from("/tmp/meals")).unwrap();
        assert_eq!(config.api_base().as_str(), DEFAULT_API_BASE);
        assert_eq!(config.debounce(), Duration::from_millis(300));
    }

    fn vars(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_env_overrides() {
        let config = Config::from_vars(vars(&[
            ("MEALS_DATA_DIR", "/tmp/x"),
            ("MEALDB_API_BASE", "http://localhost:9000/api/"),
            ("MEALS_DEBOUNCE_MS", " 50 "),
            ("BIND_ADDR", "0.0.0.0"),
            ("PORT", "8080"),
        ]))
        .unwrap();

        assert_eq!(config.favourites_path(), PathBuf::from("/tmp/x/favourites.json"));
        assert_eq!(config.api_base().as_str(), "http://localhost:9000/api/");
        assert_eq!(config.debounce(), Duration::from_millis(50));
        assert_eq!(config.bind_addr(), "0.0.0.0");
        assert_eq!(config.port(), 8080);
    }

    #[test]
    fn test_invalid_env_overrides_keep_defaults() {
        let config = Config::from_vars(vars(&[
            ("MEALS_DATA_DIR", "/tmp/x"),
            ("MEALDB_API_BASE", "not a url"),
            ("MEALS_DEBOUNCE_MS", "abc"),
            ("BIND_ADDR", "  "),
            ("PORT", "99999"),
        ]))
        .unwrap();

        assert_eq!(config.favourites_path(), PathBuf::from("/tmp/x/favourites.json"));
        assert_eq!(config.api_base().as_str(), DEFAULT_API_BASE);
        assert_eq!(config.debounce(), Duration::from_millis(300));
        assert_eq!(config.bind_addr(), "127.0.0.1");
        assert_eq!(config.port(), 3000);
    }

    #[test]
    fn test_missing_data_dir_uses_current_dir() {
        let config = Config::from_vars(vars(&[])).unwrap();
        let expected = std::env::current_dir().unwrap().join(".meal-favourites");
        assert_eq!(config.base_dir(), expected.as_path());
    }

    #[test]
    fn test_builder_overrides() {
        let base = Url::parse("http://localhost:8080/api/").unwrap();
        let config = Config::new(PathBuf::from("/tmp/meals"))
            .unwrap()
            .with_api_base(base.clone())
            .with_debounce(Duration::ZERO);
        assert_eq!(config.api_base(), &base);
        assert_eq!(config.debounce(), Duration::ZERO);
    }
}
