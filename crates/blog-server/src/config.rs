//! Server configuration
//!
//! Layered with the `config` crate: built-in defaults, then an optional
//! `blog.toml` in the working directory, then `BLOG_*` environment
//! variables, then a plain `PORT` variable.

use anyhow::{Context, Result};
use ::config::{Config, Environment, File, FileFormat, FileSourceFile};
use serde::Deserialize;
use std::collections::HashMap;

pub const DEFAULT_PORT: u16 = 3000;

/// Which persistence backend the server runs on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    Memory,
    Sqlite,
}

impl std::fmt::Display for StorageBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StorageBackend::Memory => write!(f, "memory"),
            StorageBackend::Sqlite => write!(f, "sqlite"),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub storage: StorageBackend,
    pub database_path: String,
    pub seed: bool,
}

impl ServerConfig {
    /// Load from `blog.toml` and the process environment
    pub fn load() -> Result<Self> {
        Self::build(
            Some(File::with_name("blog").required(false)),
            Environment::with_prefix("BLOG"),
            std::env::var("PORT").ok(),
        )
    }

    /// Load from an explicit set of `BLOG_*` variables, ignoring the process
    /// environment and any config file
    pub fn from_vars(vars: HashMap<String, String>, port: Option<String>) -> Result<Self> {
        Self::build(
            None,
            Environment::with_prefix("BLOG").source(Some(vars)),
            port,
        )
    }

    fn build(
        file: Option<File<FileSourceFile, FileFormat>>,
        env: Environment,
        port: Option<String>,
    ) -> Result<Self> {
        let mut builder = Config::builder()
            .set_default("host", "0.0.0.0")?
            .set_default("port", i64::from(DEFAULT_PORT))?
            .set_default("storage", "memory")?
            .set_default("database_path", "blog.db")?
            .set_default("seed", false)?;

        if let Some(file) = file {
            builder = builder.add_source(file);
        }

        let settings = builder
            .add_source(env.try_parsing(true))
            .set_override_option("port", port)?
            .build()
            .context("Failed to read configuration")?;

        settings
            .try_deserialize()
            .context("Invalid configuration")
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ServerConfig::from_vars(HashMap::new(), None).unwrap();
        assert_eq!(config.port, 3000);
        assert_eq!(config.storage, StorageBackend::Memory);
        assert_eq!(config.database_path, "blog.db");
        assert!(!config.seed);
        assert_eq!(config.bind_address(), "0.0.0.0:3000");
    }

    #[test]
    fn test_prefixed_vars() {
        let vars = HashMap::from([
            ("BLOG_STORAGE".to_string(), "sqlite".to_string()),
            ("BLOG_DATABASE_PATH".to_string(), "/tmp/posts.db".to_string()),
            ("BLOG_SEED".to_string(), "true".to_string()),
            ("BLOG_PORT".to_string(), "8080".to_string()),
        ]);
        let config = ServerConfig::from_vars(vars, None).unwrap();
        assert_eq!(config.storage, StorageBackend::Sqlite);
        assert_eq!(config.database_path, "/tmp/posts.db");
        assert!(config.seed);
        assert_eq!(config.port, 8080);
    }

    #[test]
    fn test_plain_port_wins() {
        let vars = HashMap::from([("BLOG_PORT".to_string(), "8080".to_string())]);
        let config = ServerConfig::from_vars(vars, Some("4000".to_string())).unwrap();
        assert_eq!(config.port, 4000);
    }

    #[test]
    fn test_unknown_backend_is_rejected() {
        let vars = HashMap::from([("BLOG_STORAGE".to_string(), "postgres".to_string())]);
        assert!(ServerConfig::from_vars(vars, None).is_err());
    }
}
