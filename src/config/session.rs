use crate::config::defaults::{default_advance_day, default_mode};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SessionConfig {
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub verbose: Option<bool>,
    #[serde(default = "default_advance_day")]
    pub advance_day: bool,
    #[serde(default = "default_mode")]
    pub mode: String,
    #[serde(default)]
    pub store_path: Option<String>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            user_id: None,
            verbose: None,
            advance_day: default_advance_day(),
            mode: default_mode(),
            store_path: None,
        }
    }
}
