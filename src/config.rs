//! Generator configuration
//!
//! Settings come from `andphp.toml` in the project directory when present,
//! otherwise from defaults. Environment variables are applied on top in both
//! cases.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Name of the configuration file looked up in the project directory
pub const CONFIG_FILE_NAME: &str = "andphp.toml";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratorConfig {
    /// Application root namespace, e.g. `App`
    #[serde(default = "default_root_namespace")]
    pub root_namespace: String,

    /// Directory the root namespace maps onto
    #[serde(default = "default_base_path")]
    pub base_path: PathBuf,

    /// Custom stub file; the embedded stub is used when unset
    #[serde(default)]
    pub stub_path: Option<PathBuf>,

    #[serde(default)]
    pub database: DatabaseConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Connection used when the command does not name one
    #[serde(default = "default_connection_name")]
    pub default: String,

    #[serde(default)]
    pub connections: HashMap<String, ConnectionConfig>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConnectionConfig {
    #[serde(default)]
    pub url: Option<String>,

    /// Schema to introspect; the connection's current database when unset
    #[serde(default)]
    pub database: Option<String>,

    #[serde(default)]
    pub max_connections: Option<u32>,
}

fn default_root_namespace() -> String {
    "App".to_string()
}

fn default_base_path() -> PathBuf {
    PathBuf::from("app")
}

fn default_connection_name() -> String {
    "mysql".to_string()
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            root_namespace: default_root_namespace(),
            base_path: default_base_path(),
            stub_path: None,
            database: DatabaseConfig::default(),
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            default: default_connection_name(),
            connections: HashMap::new(),
        }
    }
}

impl GeneratorConfig {
    /// Load configuration for a project directory
    pub fn load<P: AsRef<Path>>(project_path: P) -> Result<Self> {
        let project_path = project_path.as_ref();
        let config_file = project_path.join(CONFIG_FILE_NAME);

        let mut config = if config_file.exists() {
            Self::from_file(&config_file)?
        } else {
            log::debug!(
                "No {} in {}, using defaults",
                CONFIG_FILE_NAME,
                project_path.display()
            );
            Self::default()
        };

        config.apply_env_overrides()?;
        config.resolve_paths(project_path);
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path_ref = path.as_ref();

        let content = fs::read_to_string(path_ref).map_err(|e| {
            Error::config(format!(
                "Failed to read config file '{}': {}",
                path_ref.display(),
                e
            ))
        })?;

        let config = Self::from_toml_str(&content).map_err(|e| {
            Error::config(format!("{} (in '{}')", e, path_ref.display()))
        })?;

        log::debug!("Loaded configuration from: {}", path_ref.display());
        Ok(config)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content)
            .map_err(|e| Error::config(format!("Failed to parse config: {}", e)))
    }

    /// Apply `ANDPHP_*` and `DATABASE_URL` environment variables
    pub fn apply_env_overrides(&mut self) -> Result<()> {
        self.apply_overrides(|key| env::var(key).ok())
    }

    fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(namespace) = lookup("ANDPHP_ROOT_NAMESPACE") {
            self.root_namespace = namespace;
        }
        if let Some(base_path) = lookup("ANDPHP_BASE_PATH") {
            self.base_path = PathBuf::from(base_path);
        }
        if let Some(stub_path) = lookup("ANDPHP_STUB_PATH") {
            self.stub_path = Some(PathBuf::from(stub_path));
        }
        if let Some(connection) = lookup("ANDPHP_DB_CONNECTION") {
            if connection.trim().is_empty() {
                return Err(Error::config("ANDPHP_DB_CONNECTION must not be empty"));
            }
            self.database.default = connection;
        }

        let default_name = self.database.default.clone();
        if let Some(url) = lookup("DATABASE_URL") {
            self.database
                .connections
                .entry(default_name.clone())
                .or_default()
                .url = Some(url);
        }
        if let Some(database) = lookup("ANDPHP_DB_DATABASE") {
            self.database
                .connections
                .entry(default_name)
                .or_default()
                .database = Some(database);
        }

        Ok(())
    }

    /// Anchor relative paths at the project directory
    pub fn resolve_paths(&mut self, project_path: &Path) {
        if self.base_path.is_relative() {
            self.base_path = project_path.join(&self.base_path);
        }
        if let Some(stub_path) = &self.stub_path {
            if stub_path.is_relative() {
                self.stub_path = Some(project_path.join(stub_path));
            }
        }
    }

    pub fn validate(&self) -> Result<()> {
        let namespace = self.root_namespace.trim_matches('\\');
        if namespace.is_empty() {
            return Err(Error::config("root_namespace must not be empty"));
        }
        if let Some(segment) = namespace
            .split('\\')
            .find(|segment| !crate::utils::validators::is_valid_php_identifier(segment))
        {
            return Err(Error::config(format!(
                "root_namespace segment '{}' is not a valid PHP identifier",
                segment
            )));
        }
        Ok(())
    }

    /// Pick a named connection, or the default one
    pub fn connection(&self, name: Option<&str>) -> Result<(&str, &ConnectionConfig)> {
        let name = name.unwrap_or(self.database.default.as_str());

        let (name, connection) = self
            .database
            .connections
            .get_key_value(name)
            .ok_or_else(|| {
                Error::config(format!(
                    "Database connection '{}' is not configured. Set DATABASE_URL or add [database.connections.{}] to {}",
                    name, name, CONFIG_FILE_NAME
                ))
            })?;

        match connection.url.as_deref() {
            Some(url) if !url.trim().is_empty() => Ok((name.as_str(), connection)),
            _ => Err(Error::config(format!(
                "No database URL found for connection '{}'. Set DATABASE_URL or configure it in {}",
                name, CONFIG_FILE_NAME
            ))),
        }
    }
}
