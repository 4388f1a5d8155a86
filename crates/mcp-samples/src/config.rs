//! Configuration records.
//!
//! Two independent sources live here: the MCP host config (`mcpServers` JSON,
//! the same shape Claude/Cursor use) that tells `sql-client` how to launch its
//! server, and the optional `config.toml` under the samples home that supplies
//! logging defaults when the environment does not.

use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::error::ConfigError;

/// Built-in MCP config used when `MCP_CONFIG` is not set.
pub const DEFAULT_MCP_CONFIG: &str = r#"{
  "mcpServers": {
    "pgsql-mcp-server": {
      "command": "sql-mcp-server",
      "args": [],
      "env": {
        "DB_HOST": "localhost"
      },
      "disabled": false,
      "autoApprove": []
    }
  }
}"#;

pub const DEFAULT_SERVER_NAME: &str = "pgsql-mcp-server";

#[derive(Debug, Default, Deserialize)]
pub struct McpConfig {
    #[serde(rename = "mcpServers", default)]
    pub mcp_servers: HashMap<String, McpServerConfig>,
}

/// A single stdio server launch definition.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct McpServerConfig {
    pub command: String,
    #[serde(default)]
    pub args: Vec<String>,
    #[serde(default)]
    pub env: HashMap<String, String>,
    #[serde(default)]
    pub disabled: bool,
    #[serde(default)]
    pub auto_approve: Vec<String>,
}

impl McpConfig {
    pub fn from_json(s: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(s)?)
    }

    /// Load from `path`, or the built-in config when `path` is `None`.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(p) => {
                let s = std::fs::read_to_string(p).map_err(|source| ConfigError::Read {
                    path: p.display().to_string(),
                    source,
                })?;
                Self::from_json(&s)
            }
            None => Self::from_json(DEFAULT_MCP_CONFIG),
        }
    }

    /// Look up an enabled server by name.
    pub fn enabled_server(&self, name: &str) -> Result<&McpServerConfig, ConfigError> {
        let server = self
            .mcp_servers
            .get(name)
            .ok_or_else(|| ConfigError::ServerNotFound(name.to_string()))?;
        if server.disabled {
            return Err(ConfigError::ServerDisabled(name.to_string()));
        }
        Ok(server)
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct UserConfig {
    pub logging: Option<LoggingCfg>,
}

#[derive(Debug, Default, Deserialize)]
pub struct LoggingCfg {
    pub to_file: Option<bool>,
    pub dir: Option<String>,
    pub json: Option<bool>,
    pub compact: Option<bool>,
    pub pretty: Option<bool>,
    pub level: Option<String>,
}

pub fn load_user_config(home: &Path) -> anyhow::Result<Option<UserConfig>> {
    let path = home.join("config.toml");
    if !path.exists() {
        return Ok(None);
    }
    let s = std::fs::read_to_string(&path)?;
    let cfg: UserConfig = toml::from_str(&s)?;
    Ok(Some(cfg))
}

/// `$MCP_SAMPLES_HOME`, else `$HOME/.mcp-samples`, else `./.mcp-samples`.
pub fn samples_home(explicit: &str) -> PathBuf {
    if !explicit.is_empty() {
        return expand_home(explicit);
    }
    if let Ok(home) = std::env::var("HOME") {
        return PathBuf::from(home).join(".mcp-samples");
    }
    std::env::current_dir()
        .unwrap_or_else(|_| PathBuf::from("."))
        .join(".mcp-samples")
}

pub fn expand_home(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/")
        && let Ok(home) = std::env::var("HOME")
    {
        return PathBuf::from(home).join(stripped);
    }
    PathBuf::from(path)
}
