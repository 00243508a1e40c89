//! Connections and saved queries
//!
//! Everything lives in a single TOML file, by default
//! `<config dir>/pam/config.toml`:
//!
//! ```toml
//! current_connection = "local"
//!
//! [connections.local]
//! db_type = "postgres"
//! conn_string = "postgres://me@localhost/app"
//!
//! [connections.local.queries.active_users]
//! id = 1
//! sql = "select * from users where active"
//! ```

use crate::config::settings::Settings;
use crate::db::DbType;
use crate::error::{ConfigError, ConfigResult};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// The whole config file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Name of the connection commands run against
    #[serde(default)]
    pub current_connection: String,

    #[serde(default)]
    pub settings: Settings,

    /// Keybinding overrides: action name -> key (e.g. `copy_cell = "c"`)
    #[serde(default)]
    pub keybindings: BTreeMap<String, String>,

    #[serde(default)]
    pub connections: BTreeMap<String, ConnectionProfile>,
}

/// A saved database connection and its named queries
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConnectionProfile {
    #[serde(default)]
    pub db_type: DbType,

    pub conn_string: String,

    /// Named queries keyed by name
    #[serde(default)]
    pub queries: BTreeMap<String, SavedQuery>,
}

/// A named query
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedQuery {
    pub id: u32,
    pub sql: String,
}

impl Config {
    /// Default config file path (`<config dir>/pam/config.toml`)
    pub fn default_path() -> ConfigResult<PathBuf> {
        let dir = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
        Ok(dir.join("pam").join("config.toml"))
    }

    /// Load from `path`; a missing file yields an empty config
    pub fn load(path: &Path) -> ConfigResult<Self> {
        if !path.exists() {
            log::debug!("no config at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Write to `path`, creating parent directories as needed
    pub fn save(&self, path: &Path) -> ConfigResult<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// The connection commands currently run against
    pub fn current(&self) -> ConfigResult<&ConnectionProfile> {
        if self.current_connection.is_empty() {
            return Err(ConfigError::NoCurrentConnection);
        }
        self.connections
            .get(&self.current_connection)
            .ok_or_else(|| ConfigError::ConnectionNotFound(self.current_connection.clone()))
    }

    pub fn current_mut(&mut self) -> ConfigResult<&mut ConnectionProfile> {
        if self.current_connection.is_empty() {
            return Err(ConfigError::NoCurrentConnection);
        }
        let name = self.current_connection.clone();
        self.connections
            .get_mut(&name)
            .ok_or(ConfigError::ConnectionNotFound(name))
    }

    /// Make `name` the current connection
    pub fn switch(&mut self, name: &str) -> ConfigResult<()> {
        if !self.connections.contains_key(name) {
            return Err(ConfigError::ConnectionNotFound(name.to_string()));
        }
        self.current_connection = name.to_string();
        Ok(())
    }
}

impl ConnectionProfile {
    pub fn new(db_type: DbType, conn_string: impl Into<String>) -> Self {
        Self {
            db_type,
            conn_string: conn_string.into(),
            queries: BTreeMap::new(),
        }
    }

    /// Find a query by name, or by numeric id when `selector` parses as one
    pub fn find_query(&self, selector: &str) -> Option<(&str, &SavedQuery)> {
        if let Some((name, query)) = self.queries.get_key_value(selector) {
            return Some((name.as_str(), query));
        }
        let id: u32 = selector.parse().ok()?;
        self.queries
            .iter()
            .find(|(_, q)| q.id == id)
            .map(|(name, q)| (name.as_str(), q))
    }

    /// One past the highest id in use
    pub fn next_query_id(&self) -> u32 {
        self.queries.values().map(|q| q.id).max().unwrap_or(0) + 1
    }

    /// Save `sql` under `name`, keeping the existing id when overwriting
    pub fn add_query(&mut self, name: &str, sql: &str) -> u32 {
        let id = self
            .queries
            .get(name)
            .map_or_else(|| self.next_query_id(), |q| q.id);
        self.queries.insert(
            name.to_string(),
            SavedQuery {
                id,
                sql: sql.to_string(),
            },
        );
        id
    }

    /// Remove a query by name or id, returning its name
    pub fn remove_query(&mut self, selector: &str) -> ConfigResult<String> {
        let name = self
            .find_query(selector)
            .map(|(name, _)| name.to_string())
            .ok_or_else(|| ConfigError::QueryNotFound(selector.to_string()))?;
        self.queries.remove(&name);
        Ok(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile_with_queries() -> ConnectionProfile {
        let mut profile = ConnectionProfile::new(DbType::Postgres, "postgres://me@localhost/app");
        profile.add_query("users", "select * from users");
        profile.add_query("orders", "select * from orders");
        profile
    }

    #[test]
    fn test_query_ids_increase() {
        let profile = profile_with_queries();
        assert_eq!(profile.queries["users"].id, 1);
        assert_eq!(profile.queries["orders"].id, 2);
        assert_eq!(profile.next_query_id(), 3);
    }

    #[test]
    fn test_overwrite_keeps_id() {
        let mut profile = profile_with_queries();
        let id = profile.add_query("users", "select id from users");
        assert_eq!(id, 1);
        assert_eq!(profile.queries["users"].sql, "select id from users");
    }

    #[test]
    fn test_find_query_by_name_or_id() {
        let profile = profile_with_queries();
        assert_eq!(profile.find_query("orders").map(|(n, _)| n), Some("orders"));
        assert_eq!(profile.find_query("1").map(|(n, _)| n), Some("users"));
        assert!(profile.find_query("missing").is_none());
        assert!(profile.find_query("42").is_none());
    }

    #[test]
    fn test_remove_query() {
        let mut profile = profile_with_queries();
        assert_eq!(profile.remove_query("2").unwrap(), "orders");
        assert!(profile.find_query("orders").is_none());
        assert!(matches!(
            profile.remove_query("orders"),
            Err(ConfigError::QueryNotFound(_))
        ));
    }

    #[test]
    fn test_current_requires_selection() {
        let mut config = Config::default();
        assert!(matches!(
            config.current(),
            Err(ConfigError::NoCurrentConnection)
        ));
        config
            .connections
            .insert("local".to_string(), profile_with_queries());
        assert!(matches!(
            config.switch("prod"),
            Err(ConfigError::ConnectionNotFound(_))
        ));
        config.switch("local").unwrap();
        assert_eq!(config.current().unwrap().queries.len(), 2);
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = Config::default();
        config
            .connections
            .insert("local".to_string(), profile_with_queries());
        config.current_connection = "local".to_string();
        config
            .keybindings
            .insert("copy_cell".to_string(), "c".to_string());
        config.save(&path).unwrap();

        let loaded = Config::load(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_load_missing_file_is_default() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_parse_handwritten_file() {
        let content = r#"
current_connection = "local"

[settings]
format_width = 100

[connections.local]
db_type = "postgresql"
conn_string = "host=localhost user=me"

[connections.local.queries.one]
id = 1
sql = "select 1"
"#;
        let config: Config = toml::from_str(content).unwrap();
        assert_eq!(config.settings.format_width, 100);
        assert_eq!(config.settings.row_limit, 1000);
        let profile = config.current().unwrap();
        assert_eq!(profile.db_type, DbType::Postgres);
        assert_eq!(profile.find_query("1").unwrap().1.sql, "select 1");
    }
}
