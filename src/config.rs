// File: ./src/config.rs
// Settings from config.toml, a local .env file and the environment
use crate::client::DEFAULT_API_URL;
use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::Deserialize;
use std::env;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

pub const ENV_FILE: &str = ".env";

pub const TOKEN_VAR: &str = "CLICKUP_TOKEN";
pub const LIST_ID_VAR: &str = "CLICKUP_LIST_ID";
pub const CLOSED_STATUS_VAR: &str = "CLICKUP_CLOSED_STATUS";
pub const API_URL_VAR: &str = "CLICKUP_API_URL";

#[derive(Deserialize, Debug, Default)]
#[serde(default)]
struct FileConfig {
    token: Option<String>,
    list_id: Option<String>,
    closed_status: Option<String>,
    api_url: Option<String>,
}

#[derive(Clone, PartialEq, Eq)]
pub struct Config {
    pub token: Option<String>,
    pub list_id: Option<String>,
    /// Status given to subtasks whose checkbox was ticked.
    pub closed_status: Option<String>,
    pub api_url: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            token: None,
            list_id: None,
            closed_status: None,
            api_url: DEFAULT_API_URL.to_string(),
        }
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .field("list_id", &self.list_id)
            .field("closed_status", &self.closed_status)
            .field("api_url", &self.api_url)
            .finish()
    }
}

fn non_empty(value: impl Into<String>) -> Option<String> {
    let value = value.into();
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

impl Config {
    pub fn get_path() -> Option<PathBuf> {
        ProjectDirs::from("com", "mdload", "mdload").map(|proj| proj.config_dir().join("config.toml"))
    }

    /// Layers config.toml, then `.env` in the working directory, then the
    /// process environment. Later sources win.
    pub fn load() -> Result<Self> {
        let mut config = match Self::get_path() {
            Some(path) if path.exists() => Self::from_file(&path)?,
            _ => Self::default(),
        };

        let env_file = Path::new(ENV_FILE);
        if env_file.exists() {
            let content = fs::read_to_string(env_file)
                .with_context(|| format!("Failed to read {:?}", env_file))?;
            config.apply_vars(parse_env_file(&content));
        }

        // Variables that are not valid UTF-8 cannot be ours.
        config.apply_vars(
            env::vars_os()
                .filter_map(|(k, v)| Some((k.into_string().ok()?, v.into_string().ok()?))),
        );
        tracing::debug!("Loaded {:?}", config);
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content =
            fs::read_to_string(path).with_context(|| format!("Failed to read {:?}", path))?;
        let file: FileConfig =
            toml::from_str(&content).with_context(|| format!("Invalid config file {:?}", path))?;

        Ok(Self {
            token: file.token.and_then(non_empty),
            list_id: file.list_id.and_then(non_empty),
            closed_status: file.closed_status.and_then(non_empty),
            api_url: file
                .api_url
                .and_then(non_empty)
                .unwrap_or_else(|| DEFAULT_API_URL.to_string()),
        })
    }

    /// Overrides settings from `CLICKUP_*` key/value pairs. Unknown keys and
    /// empty values are ignored.
    pub fn apply_vars<I, K, V>(&mut self, vars: I)
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        for (key, value) in vars {
            let Some(value) = non_empty(value) else {
                continue;
            };
            match key.as_ref() {
                TOKEN_VAR => self.token = Some(value),
                LIST_ID_VAR => self.list_id = Some(value),
                CLOSED_STATUS_VAR => self.closed_status = Some(value),
                API_URL_VAR => self.api_url = value,
                _ => {}
            }
        }
    }

    pub fn require_token(&self) -> Result<&str> {
        self.token
            .as_deref()
            .ok_or_else(|| anyhow!("{} is not set (environment, {} or config file)", TOKEN_VAR, ENV_FILE))
    }

    /// The list to import into: the command line override, else the configured one.
    pub fn resolve_list_id<'a>(&'a self, list_override: Option<&'a str>) -> Result<&'a str> {
        list_override
            .filter(|id| !id.trim().is_empty())
            .or(self.list_id.as_deref())
            .ok_or_else(|| anyhow!("No list id: pass --list-id or set {}", LIST_ID_VAR))
    }
}

/// Parses `KEY=VALUE` lines. Blank lines and `#` comments are skipped, an
/// `export ` prefix is allowed and matching surrounding quotes are removed.
pub fn parse_env_file(content: &str) -> Vec<(String, String)> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .filter_map(|line| {
            let line = line.strip_prefix("export ").unwrap_or(line);
            let (key, value) = line.split_once('=')?;
            let value = value.trim();
            let value = ['"', '\'']
                .iter()
                .find_map(|q| value.strip_prefix(*q).and_then(|v| v.strip_suffix(*q)))
                .unwrap_or(value);
            Some((key.trim().to_string(), value.to_string()))
        })
        .collect()
}
