use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::heuristic::HeuristicKind;

/// Default config file looked up in the working directory
pub const DEFAULT_CONFIG_FILE: &str = "wikiracer.toml";

/// Environment variable naming an explicit config file
pub const CONFIG_ENV: &str = "WIKIRACER_CONFIG";

/// Main configuration structure
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub provider: ProviderConfig,
    #[serde(default)]
    pub rest: RestConfig,
    #[serde(default)]
    pub sql: SqlConfig,
    #[serde(default)]
    pub memory: MemoryConfig,
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub tfidf: TfIdfConfig,
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

/// Which content provider backs the search
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    /// Live Wikipedia REST API
    #[default]
    Rest,
    /// MediaWiki-style SQLite database
    Sql,
    /// JSON graph loaded into memory
    Memory,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProviderConfig {
    #[serde(default)]
    pub kind: ProviderKind,
}

/// Live REST provider configuration
#[derive(Debug, Clone, Deserialize)]
pub struct RestConfig {
    #[serde(default = "default_api_root")]
    pub api_root: String,
    /// Wikipedia asks clients to identify themselves with contact info
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    #[serde(default = "default_worker_count")]
    pub worker_count: usize,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_summary_cache_capacity")]
    pub summary_cache_capacity: usize,
}

impl Default for RestConfig {
    fn default() -> Self {
        Self {
            api_root: default_api_root(),
            user_agent: default_user_agent(),
            worker_count: default_worker_count(),
            timeout_secs: default_timeout_secs(),
            summary_cache_capacity: default_summary_cache_capacity(),
        }
    }
}

/// SQLite provider configuration
#[derive(Debug, Clone, Deserialize)]
pub struct SqlConfig {
    #[serde(default = "default_db_path")]
    pub db_path: PathBuf,
}

impl Default for SqlConfig {
    fn default() -> Self {
        Self {
            db_path: default_db_path(),
        }
    }
}

/// In-memory provider configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MemoryConfig {
    #[serde(default)]
    pub graph_path: Option<PathBuf>,
}

/// Search defaults
#[derive(Debug, Clone, Deserialize)]
pub struct SearchConfig {
    #[serde(default = "default_heuristic")]
    pub heuristic: HeuristicKind,
    #[serde(default)]
    pub greedy: bool,
    /// Abort a single search after this many seconds (benchmark and CLI)
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            heuristic: default_heuristic(),
            greedy: false,
            timeout_secs: None,
        }
    }
}

/// TF-IDF heuristic configuration
#[derive(Debug, Clone, Deserialize)]
pub struct TfIdfConfig {
    /// Corpus file, one document per line
    #[serde(default)]
    pub corpus_path: Option<PathBuf>,
    #[serde(default = "default_keyword_limit")]
    pub keyword_limit: usize,
}

impl Default for TfIdfConfig {
    fn default() -> Self {
        Self {
            corpus_path: None,
            keyword_limit: default_keyword_limit(),
        }
    }
}

fn default_api_root() -> String {
    "https://en.wikipedia.org/api/rest_v1/".to_string()
}

fn default_user_agent() -> String {
    format!(
        "wikiracer/{} (https://github.com/wikiracer/wikiracer)",
        env!("CARGO_PKG_VERSION")
    )
}

fn default_worker_count() -> usize {
    8
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_summary_cache_capacity() -> usize {
    10_000
}

fn default_db_path() -> PathBuf {
    PathBuf::from("wiki.db")
}

fn default_heuristic() -> HeuristicKind {
    HeuristicKind::Bfs
}

fn default_keyword_limit() -> usize {
    5
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            provider: ProviderConfig::default(),
            rest: RestConfig::default(),
            sql: SqlConfig::default(),
            memory: MemoryConfig::default(),
            search: SearchConfig::default(),
            tfidf: TfIdfConfig::default(),
            log_level: default_log_level(),
        }
    }
}

impl Config {
    /// Load configuration
    ///
    /// Loads environment variables from .env file (if present) first.
    /// Looks for a config file in this order:
    /// 1. Path in the WIKIRACER_CONFIG environment variable (must exist)
    /// 2. ./wikiracer.toml in the current directory
    /// 3. Built-in defaults
    pub fn load() -> Result<Self> {
        // .env is optional
        let _ = dotenv::dotenv();

        let config = match std::env::var(CONFIG_ENV) {
            Ok(path) => Self::from_file(Path::new(&path))?,
            Err(_) => {
                let default_path = PathBuf::from(DEFAULT_CONFIG_FILE);
                if default_path.exists() {
                    Self::from_file(&default_path)?
                } else {
                    log::debug!("No {} found, using built-in defaults", DEFAULT_CONFIG_FILE);
                    Self::default()
                }
            }
        };

        config.validate()?;
        Ok(config)
    }

    /// Parse and validate a config file
    pub fn from_file(path: &Path) -> Result<Self> {
        let config_str = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config = Self::from_toml_str(&config_str)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        Ok(config)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if self.rest.api_root.trim().is_empty() {
            anyhow::bail!("rest.api_root must not be empty");
        }

        url::Url::parse(&self.rest.api_root)
            .with_context(|| format!("rest.api_root is not a valid URL: {}", self.rest.api_root))?;

        if self.rest.worker_count == 0 {
            anyhow::bail!("rest.worker_count must be greater than 0");
        }

        if self.rest.timeout_secs == 0 {
            anyhow::bail!("rest.timeout_secs must be greater than 0");
        }

        if self.tfidf.keyword_limit == 0 {
            anyhow::bail!("tfidf.keyword_limit must be greater than 0");
        }

        if self.search.timeout_secs == Some(0) {
            anyhow::bail!("search.timeout_secs must be greater than 0 when set");
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::sync::Mutex;
    use tempfile::TempDir;

    /// Serialize tests that mutate process-wide env so they don't race.
    static CONFIG_TEST_LOCK: Mutex<()> = Mutex::new(());

    const FULL_CONFIG: &str = r#"
log_level = "debug"

[provider]
kind = "sql"

[rest]
worker_count = 4
user_agent = "tests (test@example.org)"

[sql]
db_path = "/tmp/wiki.db"

[search]
heuristic = "shortcut-bfs"
greedy = true
timeout_secs = 60

[tfidf]
corpus_path = "corpus.txt"
keyword_limit = 3
"#;

    fn with_config_env(path: Option<&Path>, f: impl FnOnce()) {
        let original = std::env::var(CONFIG_ENV).ok();
        match path {
            Some(p) => std::env::set_var(CONFIG_ENV, p),
            None => std::env::remove_var(CONFIG_ENV),
        }
        f();
        std::env::remove_var(CONFIG_ENV);
        if let Some(val) = original {
            std::env::set_var(CONFIG_ENV, val);
        }
    }

    #[test]
    fn test_full_config_parses() {
        let config = Config::from_toml_str(FULL_CONFIG).unwrap();
        assert_eq!(config.log_level, "debug");
        assert_eq!(config.provider.kind, ProviderKind::Sql);
        assert_eq!(config.rest.worker_count, 4);
        assert_eq!(config.rest.timeout_secs, 30);
        assert_eq!(config.sql.db_path, PathBuf::from("/tmp/wiki.db"));
        assert_eq!(config.search.heuristic, HeuristicKind::ShortcutBfs);
        assert!(config.search.greedy);
        assert_eq!(config.search.timeout_secs, Some(60));
        assert_eq!(config.tfidf.keyword_limit, 3);
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = Config::from_toml_str("").unwrap();
        assert_eq!(config.provider.kind, ProviderKind::Rest);
        assert_eq!(config.rest.worker_count, 8);
        assert_eq!(config.rest.api_root, "https://en.wikipedia.org/api/rest_v1/");
        assert_eq!(config.search.heuristic, HeuristicKind::Bfs);
        assert!(!config.search.greedy);
        assert_eq!(config.log_level, "info");
    }

    #[test]
    fn test_validation_rejects_zero_workers() {
        let err = Config::from_toml_str("[rest]\nworker_count = 0\n").unwrap_err();
        assert!(err.to_string().contains("worker_count"));
    }

    #[test]
    fn test_validation_rejects_zero_timeout() {
        assert!(Config::from_toml_str("[search]\ntimeout_secs = 0\n").is_err());
    }

    #[test]
    fn test_unknown_heuristic_rejected() {
        assert!(Config::from_toml_str("[search]\nheuristic = \"telepathy\"\n").is_err());
    }

    #[test]
    fn test_load_from_env_path() {
        let _lock = CONFIG_TEST_LOCK.lock().unwrap();
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("custom.toml");
        fs::write(&config_path, FULL_CONFIG).unwrap();

        with_config_env(Some(&config_path), || {
            let config = Config::load();
            assert!(config.is_ok(), "Config::load() failed: {:?}", config.err());
            assert_eq!(config.unwrap().provider.kind, ProviderKind::Sql);
        });
    }

    #[test]
    fn test_load_missing_explicit_path_fails() {
        let _lock = CONFIG_TEST_LOCK.lock().unwrap();
        with_config_env(Some(Path::new("nonexistent-wikiracer.toml")), || {
            let config = Config::load();
            assert!(config.is_err());
            assert!(config
                .unwrap_err()
                .to_string()
                .contains("nonexistent-wikiracer.toml"));
        });
    }
}
