mod api;
mod defaults;
mod session;
mod speech;
mod validation;

use crate::cli::Args;
use crate::models::{default_portals, Portal};
use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::PathBuf;

pub use api::ApiConfig;
pub use defaults::DEFAULT_API_ENDPOINT;
pub use session::SessionConfig;
pub use speech::SpeechConfig;
pub use validation::{
    expand_vars_with, has_unexpanded_var, validate_portals,
};

pub struct Config {
    pub api_endpoint: String,
    pub api_token: Option<String>,
    pub request_timeout: Option<u64>,
    pub user_id: Option<String>,
    pub verbose: bool,
    pub advance_day: bool,
    pub mode: String,
    pub store_path: Option<PathBuf>,
    pub speech_enabled: bool,
    pub speak_command: Option<String>,
    pub listen_command: Option<String>,
    pub portals: Vec<Portal>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct JsonConfig {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub session: SessionConfig,
    #[serde(default)]
    pub speech: SpeechConfig,
    #[serde(default)]
    pub portals: Vec<Portal>,
}

impl Config {
    pub fn from_env_and_args(args: &Args) -> Result<Self> {
        let json_config = JsonConfig::load()?;
        Self::resolve(args, json_config, |name| env::var(name).ok())
    }

    /// Merge CLI args > environment > config file > defaults
    pub fn resolve<F>(args: &Args, json_config: JsonConfig, env_var: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_endpoint = args
            .api_endpoint
            .clone()
            .or_else(|| env_var("PORTAL_API_ENDPOINT"))
            .or(json_config.api.endpoint)
            .unwrap_or_else(|| DEFAULT_API_ENDPOINT.to_string());

        let api_token = env_var("PORTAL_API_TOKEN")
            .or(json_config.api.token)
            .map(|t| expand_vars_with(&t, &env_var))
            .filter(|t| !t.trim().is_empty())
            .filter(|t| {
                let unresolved = has_unexpanded_var(t);
                if unresolved {
                    tracing::warn!("api token references an unset variable, sending no token");
                }
                !unresolved
            });

        let request_timeout = env_var("PORTAL_REQUEST_TIMEOUT")
            .and_then(|s| s.parse::<u64>().ok())
            .or(json_config.api.request_timeout)
            .filter(|secs| *secs > 0);

        let user_id = args
            .user_id
            .clone()
            .or_else(|| env_var("PORTAL_USER_ID"))
            .or(json_config.session.user_id);

        let verbose = args.verbose
            || env_var("PORTAL_VERBOSE")
                .map(|v| matches!(v.to_lowercase().as_str(), "true" | "1" | "yes"))
                .or(json_config.session.verbose)
                .unwrap_or(false);

        let store_path = env_var("PORTAL_STORE_PATH")
            .or(json_config.session.store_path)
            .map(|p| PathBuf::from(expand_vars_with(&p, &env_var)));

        let speech_enabled = args.speak || json_config.speech.enabled;
        let speak_command = json_config
            .speech
            .speak_command
            .map(|c| expand_vars_with(&c, &env_var));
        let listen_command = json_config
            .speech
            .listen_command
            .map(|c| expand_vars_with(&c, &env_var));

        let portals = if json_config.portals.is_empty() {
            default_portals()
        } else {
            json_config.portals
        };
        if let Err(e) = validate_portals(&portals) {
            bail!("Invalid portals: {}", e);
        }

        Ok(Config {
            api_endpoint,
            api_token,
            request_timeout,
            user_id,
            verbose,
            advance_day: json_config.session.advance_day,
            mode: json_config.session.mode,
            store_path,
            speech_enabled,
            speak_command,
            listen_command,
            portals,
        })
    }
}

impl JsonConfig {
    pub fn load() -> Result<Self> {
        let config_paths = Self::get_config_paths();

        for path in config_paths {
            if path.exists() {
                let contents = fs::read_to_string(&path)
                    .with_context(|| format!("Failed to read config file: {}", path.display()))?;

                let config: JsonConfig = if path.extension().and_then(|s| s.to_str())
                    == Some("yaml")
                    || path.extension().and_then(|s| s.to_str()) == Some("yml")
                {
                    serde_yaml::from_str(&contents).with_context(|| {
                        format!("Failed to parse YAML config file: {}", path.display())
                    })?
                } else {
                    serde_json::from_str(&contents).with_context(|| {
                        format!("Failed to parse JSON config file: {}", path.display())
                    })?
                };

                tracing::debug!(path = %path.display(), "loaded config file");
                return Ok(config);
            }
        }

        Ok(JsonConfig::default())
    }

    pub fn get_config_paths() -> Vec<PathBuf> {
        let mut paths = Vec::new();

        // 1. Current directory (local override)
        paths.push(PathBuf::from(".portalchat.yaml"));
        paths.push(PathBuf::from(".portalchat.yml"));
        paths.push(PathBuf::from(".portalchat.json"));

        // 2. User's config directory
        if let Some(config_dir) = Self::user_config_dir() {
            paths.push(config_dir.join("portalchat.yaml"));
            paths.push(config_dir.join("portalchat.yml"));
            paths.push(config_dir.join("portalchat.json"));
        }

        paths
    }

    fn user_config_dir() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(".config").join("portalchat"))
    }

    /// Example config carrying the built-in portals
    pub fn example() -> Self {
        JsonConfig {
            api: ApiConfig {
                endpoint: Some(DEFAULT_API_ENDPOINT.to_string()),
                token: Some("${PORTAL_API_TOKEN}".to_string()),
                request_timeout: None,
            },
            session: SessionConfig::default(),
            speech: SpeechConfig {
                enabled: false,
                speak_command: Some("espeak".to_string()),
                listen_command: None,
            },
            portals: default_portals(),
        }
    }

    /// Write the example config to `~/.config/portalchat/portalchat.yaml`
    pub fn init_user_config() -> Result<PathBuf> {
        let dir = Self::user_config_dir().context("Could not determine home directory")?;
        let path = dir.join("portalchat.yaml");
        if path.exists() {
            bail!("Config file already exists: {}", path.display());
        }

        fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create config directory: {}", dir.display()))?;
        let contents = serde_yaml::to_string(&Self::example())?;
        fs::write(&path, contents)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;
        Ok(path)
    }
}
