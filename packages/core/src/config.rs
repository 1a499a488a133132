//! Configuration.
//!
//! The JSON config file is bootstrapped with defaults on first run, then
//! merged with the CLI into an immutable [`Settings`] that is passed down
//! explicitly.

use std::collections::BTreeSet;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::cli::Cli;
use crate::error::{AppError, AppResult};
use crate::judges::KNOWN_SERVICES;

pub const APP_NAME: &str = "shoujin-slack-notifier";

/// Service name -> handle on that service, in file order.
pub type Handles = IndexMap<String, String>;

/// On-disk config file. Users and their services keep the order they are
/// written in; that order is the processing and tie-break order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ConfigFile {
    pub users: IndexMap<String, Handles>,
    pub webhook_url: String,
    pub cache_dir: String,
}

impl Default for ConfigFile {
    fn default() -> Self {
        let handles = |name: &str| -> Handles {
            KNOWN_SERVICES
                .iter()
                .map(|service| (service.to_string(), name.to_string()))
                .collect()
        };

        Self {
            users: IndexMap::from([
                ("kimiyuki".to_string(), handles("kimiyuki")),
                ("tourist".to_string(), handles("tourist")),
            ]),
            webhook_url:
                "https://hooks.slack.com/services/?????????/?????????/????????????????????????"
                    .to_string(),
            cache_dir: default_cache_dir().display().to_string(),
        }
    }
}

impl ConfigFile {
    pub fn load(path: &Path) -> AppResult<Self> {
        tracing::info!("read config file: {}", path.display());
        let raw = fs::read_to_string(path).map_err(|err| AppError::io(path, err))?;
        serde_json::from_str(&raw)
            .map_err(|err| AppError::Config(format!("{}: {}", path.display(), err)))
    }

    pub fn save(&self, path: &Path) -> AppResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|err| AppError::io(parent, err))?;
        }
        let body = serde_json::to_string_pretty(self)
            .map_err(|err| AppError::Config(format!("cannot serialise config: {}", err)))?;
        fs::write(path, body).map_err(|err| AppError::io(path, err))
    }

    /// Load `path`, writing the default config there first if it is missing.
    pub fn load_or_create(path: &Path) -> AppResult<Self> {
        if !path.exists() {
            tracing::info!("write config file: {}", path.display());
            Self::default().save(path)?;
        }
        Self::load(path)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TrackedUser {
    pub name: String,
    pub handles: Handles,
}

/// Effective settings for one run.
#[derive(Debug, Clone)]
pub struct Settings {
    pub users: Vec<TrackedUser>,
    pub webhook_url: String,
    pub cache_dir: PathBuf,
    pub post: bool,
}

impl Settings {
    /// CLI values win over the config file. Positional users select (and
    /// order) a subset of the configured users.
    pub fn resolve(cli: &Cli, file: ConfigFile) -> AppResult<Self> {
        let ConfigFile {
            users: configured,
            webhook_url,
            cache_dir,
        } = file;

        let mut users: Vec<TrackedUser> = Vec::new();
        if cli.users.is_empty() {
            users.extend(
                configured
                    .into_iter()
                    .map(|(name, handles)| TrackedUser { name, handles }),
            );
        } else {
            for name in &cli.users {
                if users.iter().any(|u| &u.name == name) {
                    continue;
                }
                let handles = configured
                    .get(name)
                    .cloned()
                    .ok_or_else(|| AppError::Config(format!("user '{}' is not configured", name)))?;
                users.push(TrackedUser {
                    name: name.clone(),
                    handles,
                });
            }
        }

        for user in &users {
            if let Some(service) = user
                .handles
                .keys()
                .find(|service| !KNOWN_SERVICES.contains(&service.as_str()))
            {
                return Err(AppError::Config(format!(
                    "user '{}' has unknown service '{}'",
                    user.name, service
                )));
            }
        }

        let cache_dir = match &cli.cache_dir {
            Some(dir) => expand_home(dir),
            None => expand_home(Path::new(&cache_dir)),
        };

        Ok(Self {
            users,
            webhook_url: cli.webhook_url.clone().unwrap_or(webhook_url),
            cache_dir,
            post: !cli.no_post,
        })
    }

    /// Every service some selected user has a handle on.
    pub fn services(&self) -> BTreeSet<&str> {
        self.users
            .iter()
            .flat_map(|user| user.handles.keys().map(String::as_str))
            .collect()
    }
}

fn home_dir() -> PathBuf {
    env::var_os("HOME")
        .filter(|home| !home.is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."))
}

fn xdg_dir(var: &str, fallback: &str) -> PathBuf {
    env::var_os(var)
        .filter(|dir| !dir.is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| home_dir().join(fallback))
}

pub fn default_config_path() -> PathBuf {
    xdg_dir("XDG_CONFIG_HOME", ".config")
        .join(APP_NAME)
        .join("config.json")
}

pub fn default_cache_dir() -> PathBuf {
    xdg_dir("XDG_CACHE_HOME", ".cache").join(APP_NAME)
}

/// Expand a leading `~` against `$HOME`.
pub fn expand_home(path: &Path) -> PathBuf {
    expand_tilde(path, &home_dir())
}

fn expand_tilde(path: &Path, home: &Path) -> PathBuf {
    match path.strip_prefix("~") {
        Ok(rest) if rest.as_os_str().is_empty() => home.to_path_buf(),
        Ok(rest) => home.join(rest),
        Err(_) => path.to_path_buf(),
    }
}
