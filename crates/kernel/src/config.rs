//! Configuration loaded from environment variables.

use std::env;
use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{Context, Result, bail};

/// Runtime environment classification.
///
/// Mirrors the usual local/development/staging/production split. Only
/// `Local` relaxes URL validation (loopback and private hosts are allowed).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EnvironmentType {
    Local,
    Development,
    Staging,
    #[default]
    Production,
}

impl EnvironmentType {
    pub fn is_local(self) -> bool {
        self == Self::Local
    }
}

impl FromStr for EnvironmentType {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "local" => Ok(Self::Local),
            "development" | "dev" => Ok(Self::Development),
            "staging" => Ok(Self::Staging),
            "production" | "prod" => Ok(Self::Production),
            other => bail!("unknown environment type '{other}'"),
        }
    }
}

/// Application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server port (default: 3000).
    pub port: u16,

    /// PostgreSQL connection URL. When unset, content is served from an
    /// in-memory store.
    pub database_url: Option<String>,

    /// Maximum database connections in pool (default: 10).
    pub database_max_connections: u32,

    /// JSON file of content items loaded into the in-memory store.
    pub content_seed_file: Option<PathBuf>,

    /// Public site URL used to build item permalinks.
    pub site_url: String,

    /// CORS allowed origins (comma-separated, default: "*").
    pub cors_allowed_origins: Vec<String>,

    /// Environment classification (default: production).
    pub environment: EnvironmentType,

    /// Hosts external modal URLs must match, when non-empty.
    pub allowed_domains: Vec<String>,

    /// Hosts external modal URLs must never match.
    pub blocked_domains: Vec<String>,

    /// Cache lifetime advertised for external URL content, in seconds
    /// (default: 3600).
    pub cache_duration: u64,

    /// Block names added to the default supported block set.
    pub extra_supported_blocks: Vec<String>,

    /// Whether the active theme declares block gap support (default: true).
    pub theme_block_gap: bool,

    /// Bearer tokens accepted on editor-only endpoints.
    pub editor_tokens: Vec<String>,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        let port = env::var("PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse()
            .context("PORT must be a valid u16")?;

        let database_url = env::var("DATABASE_URL").ok().filter(|v| !v.is_empty());

        let database_max_connections = env::var("DATABASE_MAX_CONNECTIONS")
            .unwrap_or_else(|_| "10".to_string())
            .parse()
            .context("DATABASE_MAX_CONNECTIONS must be a valid u32")?;

        let content_seed_file = env::var("CONTENT_SEED_FILE").ok().map(PathBuf::from);

        let site_url = env::var("SITE_URL")
            .unwrap_or_else(|_| format!("http://localhost:{port}"))
            .trim_end_matches('/')
            .to_string();

        let cors_allowed_origins = env::var("CORS_ALLOWED_ORIGINS")
            .map(|v| v.split(',').map(|s| s.trim().to_string()).collect())
            .unwrap_or_else(|_| vec!["*".to_string()]);

        let environment = match env::var("ENVIRONMENT_TYPE") {
            Ok(v) => v.parse().context("ENVIRONMENT_TYPE is invalid")?,
            Err(_) => EnvironmentType::default(),
        };

        let cache_duration = env::var("MODAL_CACHE_DURATION")
            .unwrap_or_else(|_| "3600".to_string())
            .parse()
            .context("MODAL_CACHE_DURATION must be a number of seconds")?;

        let theme_block_gap = env::var("THEME_BLOCK_GAP")
            .map(|v| !matches!(v.trim().to_lowercase().as_str(), "0" | "false" | "no" | "off"))
            .unwrap_or(true);

        Ok(Self {
            port,
            database_url,
            database_max_connections,
            content_seed_file,
            site_url,
            cors_allowed_origins,
            environment,
            allowed_domains: list_var("MODAL_ALLOWED_DOMAINS"),
            blocked_domains: list_var("MODAL_BLOCKED_DOMAINS"),
            cache_duration,
            extra_supported_blocks: list_var("MODAL_SUPPORTED_BLOCKS"),
            theme_block_gap,
            editor_tokens: list_var("EDITOR_API_TOKENS"),
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 3000,
            database_url: None,
            database_max_connections: 10,
            content_seed_file: None,
            site_url: "http://localhost:3000".to_string(),
            cors_allowed_origins: vec!["*".to_string()],
            environment: EnvironmentType::default(),
            allowed_domains: Vec::new(),
            blocked_domains: Vec::new(),
            cache_duration: 3600,
            extra_supported_blocks: Vec::new(),
            theme_block_gap: true,
            editor_tokens: Vec::new(),
        }
    }
}

/// Read a comma-separated variable, dropping empty entries.
fn list_var(name: &str) -> Vec<String> {
    env::var(name)
        .map(|v| {
            v.split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect()
        })
        .unwrap_or_default()
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn environment_type_parses_aliases() {
        assert_eq!("local".parse::<EnvironmentType>().unwrap(), EnvironmentType::Local);
        assert_eq!("PROD".parse::<EnvironmentType>().unwrap(), EnvironmentType::Production);
        assert_eq!(
            " dev ".parse::<EnvironmentType>().unwrap(),
            EnvironmentType::Development
        );
        assert!("moon".parse::<EnvironmentType>().is_err());
    }

    #[test]
    fn only_local_is_local() {
        assert!(EnvironmentType::Local.is_local());
        assert!(!EnvironmentType::Staging.is_local());
        assert!(!EnvironmentType::default().is_local());
    }

    #[test]
    fn default_config_matches_documented_defaults() {
        let config = Config::default();
        assert_eq!(config.cache_duration, 3600);
        assert!(config.theme_block_gap);
        assert!(config.database_url.is_none());
        assert!(config.allowed_domains.is_empty());
    }
}
