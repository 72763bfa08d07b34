//! Runtime configuration with TOML, environment variables, and CLI overrides.

use crate::amazon::locales::Locale;
use crate::amazon::session::Device;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

// Base URL pieces for per-branch CI deployments.
const CI_PREFIX: &str = "https://dev-amazon-";
const CI_SUFFIX: &str = ".mydomain.com";

/// Runtime environment the suite targets.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Env {
    Local,
    Staging,
    #[default]
    Production,
    Ci,
}

impl Env {
    /// Whether this environment defaults to the staging storefront URL.
    pub fn default_staging(&self) -> bool {
        matches!(self, Env::Staging | Env::Ci)
    }
}

impl std::str::FromStr for Env {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "local" => Ok(Env::Local),
            "staging" => Ok(Env::Staging),
            "production" | "prod" => Ok(Env::Production),
            "ci" => Ok(Env::Ci),
            _ => Err(format!("Unknown environment: {}. Use: local, staging, production, ci", s)),
        }
    }
}

impl std::fmt::Display for Env {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Env::Local => write!(f, "local"),
            Env::Staging => write!(f, "staging"),
            Env::Production => write!(f, "production"),
            Env::Ci => write!(f, "ci"),
        }
    }
}

/// Suite configuration with layered loading.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Target environment
    #[serde(default)]
    pub env: Env,

    /// Storefront locale
    #[serde(default)]
    pub locale: Locale,

    /// Force the staging storefront URL on or off (default: per environment)
    #[serde(default)]
    pub use_staging: Option<bool>,

    /// CI branch name for per-branch deployment URLs
    #[serde(default)]
    pub branch: Option<String>,

    /// Explicit base URL override (fixture servers, tunnels)
    #[serde(default)]
    pub base_url: Option<String>,

    /// WebDriver endpoint to drive the browser through
    #[serde(default = "default_webdriver_url")]
    pub webdriver_url: String,

    /// Run the browser headless
    #[serde(default)]
    pub headless: bool,

    /// Device profile (viewport) to emulate
    #[serde(default)]
    pub device: Device,

    /// Overall budget for one results wait, in milliseconds
    #[serde(default = "default_results_timeout_ms")]
    pub results_timeout_ms: u64,

    /// Quiet period the tile count must hold for, in milliseconds
    #[serde(default = "default_quiet_ms")]
    pub quiet_ms: u64,

    /// Pages to walk during a flow run
    #[serde(default = "default_max_pages")]
    pub max_pages: u32,

    /// How many leading titles to sample for relevance checks
    #[serde(default = "default_top_titles")]
    pub top_titles: usize,

    /// Output format
    #[serde(default)]
    pub format: OutputFormat,
}

fn default_webdriver_url() -> String {
    "http://localhost:9515".to_string()
}

fn default_results_timeout_ms() -> u64 {
    16_000
}

fn default_quiet_ms() -> u64 {
    300
}

fn default_max_pages() -> u32 {
    3
}

fn default_top_titles() -> usize {
    10
}

impl Default for Config {
    fn default() -> Self {
        Self {
            env: Env::Production,
            locale: Locale::Us,
            use_staging: None,
            branch: None,
            base_url: None,
            webdriver_url: default_webdriver_url(),
            headless: false,
            device: Device::Desktop,
            results_timeout_ms: default_results_timeout_ms(),
            quiet_ms: default_quiet_ms(),
            max_pages: default_max_pages(),
            top_titles: default_top_titles(),
            format: OutputFormat::Table,
        }
    }
}

impl Config {
    /// Creates a new default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        debug!("Loading config from: {}", path.display());

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Loads configuration with fallback to default locations.
    pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
        // 1. Explicit path takes precedence
        if let Some(path) = explicit_path {
            return Self::from_file(path);
        }

        // 2. Try current directory
        let local_config = Path::new("e2e.toml");
        if local_config.exists() {
            debug!("Found e2e.toml in current directory");
            return Self::from_file(local_config);
        }

        // 3. Try XDG config directory
        if let Some(config_dir) = dirs::config_dir() {
            let xdg_config = config_dir.join("amz-e2e").join("e2e.toml");
            if xdg_config.exists() {
                debug!("Found config in XDG config directory");
                return Self::from_file(xdg_config);
            }
        }

        // 4. Return default config
        debug!("No config file found, using defaults");
        Ok(Self::default())
    }

    /// Applies environment variable overrides.
    pub fn with_env(mut self) -> Self {
        if let Ok(env) = std::env::var("AMZ_E2E_ENV") {
            if let Ok(e) = env.parse() {
                self.env = e;
            }
        }

        if let Ok(locale) = std::env::var("AMZ_E2E_LOCALE") {
            if let Ok(l) = locale.parse() {
                self.locale = l;
            }
        }

        if let Ok(staging) = std::env::var("AMZ_E2E_STAGING") {
            self.use_staging = Some(staging == "true" || staging == "1");
        }

        if let Ok(branch) = std::env::var("AMZ_E2E_BRANCH") {
            self.branch = Some(branch);
        }

        if let Ok(url) = std::env::var("AMZ_E2E_WEBDRIVER") {
            self.webdriver_url = url;
        }

        self
    }

    /// Whether the staging storefront URL is in effect.
    pub fn use_staging(&self) -> bool {
        self.use_staging.unwrap_or_else(|| self.env.default_staging())
    }

    /// Resolves the base URL for the configured environment and locale.
    pub fn base_url(&self) -> String {
        if let Some(url) = &self.base_url {
            return url.clone();
        }
        match self.env {
            Env::Ci => {
                let branch = self.branch.as_deref().unwrap_or("main");
                format!("{}{}{}", CI_PREFIX, branch, CI_SUFFIX)
            }
            _ if self.use_staging() => self.locale.staging_url(),
            _ => self.locale.production_url(),
        }
    }

    /// Overall results-wait budget as a [`std::time::Duration`].
    pub fn results_timeout(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.results_timeout_ms)
    }

    /// Quiet period as a [`std::time::Duration`].
    pub fn quiet(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.quiet_ms)
    }
}

/// Output format for flow reports.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
    Markdown,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "table" => Ok(OutputFormat::Table),
            "json" => Ok(OutputFormat::Json),
            "markdown" | "md" => Ok(OutputFormat::Markdown),
            _ => Err(format!("Unknown format: {}. Use: table, json, markdown", s)),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Table => write!(f, "table"),
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Markdown => write!(f, "markdown"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.env, Env::Production);
        assert_eq!(config.locale, Locale::Us);
        assert_eq!(config.webdriver_url, "http://localhost:9515");
        assert_eq!(config.results_timeout_ms, 16_000);
        assert_eq!(config.quiet_ms, 300);
        assert_eq!(config.max_pages, 3);
        assert_eq!(config.top_titles, 10);
        assert_eq!(config.device, Device::Desktop);
        assert!(config.use_staging.is_none());
        assert!(!config.headless);
    }

    #[test]
    fn test_env_parsing() {
        assert_eq!("local".parse::<Env>().unwrap(), Env::Local);
        assert_eq!("staging".parse::<Env>().unwrap(), Env::Staging);
        assert_eq!("production".parse::<Env>().unwrap(), Env::Production);
        assert_eq!("prod".parse::<Env>().unwrap(), Env::Production);
        assert_eq!("CI".parse::<Env>().unwrap(), Env::Ci);
        assert!("qa".parse::<Env>().is_err());
    }

    #[test]
    fn test_env_default_staging() {
        assert!(!Env::Local.default_staging());
        assert!(Env::Staging.default_staging());
        assert!(!Env::Production.default_staging());
        assert!(Env::Ci.default_staging());
    }

    #[test]
    fn test_base_url_production() {
        let config = Config { locale: Locale::De, ..Config::default() };
        assert_eq!(config.base_url(), "https://www.amazon.de");
    }

    #[test]
    fn test_base_url_staging_by_env() {
        let config = Config { env: Env::Staging, ..Config::default() };
        assert_eq!(config.base_url(), "https://amazon.staging.com");
    }

    #[test]
    fn test_base_url_staging_override_wins() {
        let config = Config { env: Env::Staging, use_staging: Some(false), ..Config::default() };
        assert_eq!(config.base_url(), "https://www.amazon.com");
    }

    #[test]
    fn test_base_url_explicit_override() {
        let config = Config {
            base_url: Some("http://127.0.0.1:8080".to_string()),
            env: Env::Ci,
            ..Config::default()
        };
        assert_eq!(config.base_url(), "http://127.0.0.1:8080");
    }

    #[test]
    fn test_base_url_ci_branch() {
        let config =
            Config { env: Env::Ci, branch: Some("feature-x".to_string()), ..Config::default() };
        assert_eq!(config.base_url(), "https://dev-amazon-feature-x.mydomain.com");

        let config = Config { env: Env::Ci, branch: None, ..Config::default() };
        assert_eq!(config.base_url(), "https://dev-amazon-main.mydomain.com");
    }

    #[test]
    fn test_config_from_toml() {
        let toml = r#"
            env = "staging"
            locale = "de"
            max_pages = 2
            headless = true
        "#;

        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.env, Env::Staging);
        assert_eq!(config.locale, Locale::De);
        assert_eq!(config.max_pages, 2);
        assert!(config.headless);
    }

    #[test]
    fn test_config_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
            locale = "uk"
            quiet_ms = 400
            "#
        )
        .unwrap();

        let config = Config::from_file(file.path()).unwrap();
        assert_eq!(config.locale, Locale::Uk);
        assert_eq!(config.quiet_ms, 400);
    }

    #[test]
    fn test_config_from_file_not_found() {
        let result = Config::from_file("/nonexistent/path/e2e.toml");
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("Failed to read config file"));
    }

    #[test]
    fn test_config_from_file_invalid_toml() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "not valid toml {{{{").unwrap();

        let result = Config::from_file(file.path());
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("Failed to parse config file"));
    }

    #[test]
    fn test_config_with_env_overrides() {
        let orig_locale = std::env::var("AMZ_E2E_LOCALE").ok();
        let orig_staging = std::env::var("AMZ_E2E_STAGING").ok();

        std::env::set_var("AMZ_E2E_LOCALE", "de");
        std::env::set_var("AMZ_E2E_STAGING", "true");

        let config = Config::new().with_env();
        assert_eq!(config.locale, Locale::De);
        assert_eq!(config.use_staging, Some(true));

        match orig_locale {
            Some(v) => std::env::set_var("AMZ_E2E_LOCALE", v),
            None => std::env::remove_var("AMZ_E2E_LOCALE"),
        }
        match orig_staging {
            Some(v) => std::env::set_var("AMZ_E2E_STAGING", v),
            None => std::env::remove_var("AMZ_E2E_STAGING"),
        }
    }

    #[test]
    fn test_config_with_env_invalid_values_ignored() {
        let orig = std::env::var("AMZ_E2E_ENV").ok();
        std::env::set_var("AMZ_E2E_ENV", "not_an_env");

        let config = Config::new().with_env();
        assert_eq!(config.env, Env::Production);

        match orig {
            Some(v) => std::env::set_var("AMZ_E2E_ENV", v),
            None => std::env::remove_var("AMZ_E2E_ENV"),
        }
    }

    #[test]
    fn test_output_format_parsing() {
        assert_eq!("table".parse::<OutputFormat>().unwrap(), OutputFormat::Table);
        assert_eq!("json".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
        assert_eq!("md".parse::<OutputFormat>().unwrap(), OutputFormat::Markdown);
        assert!("csv".parse::<OutputFormat>().is_err());
    }

    #[test]
    fn test_durations() {
        let config = Config::default();
        assert_eq!(config.results_timeout(), std::time::Duration::from_secs(16));
        assert_eq!(config.quiet(), std::time::Duration::from_millis(300));
    }
}
