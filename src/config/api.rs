use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ApiConfig {
    #[serde(default)]
    pub endpoint: Option<String>,
    /// Bearer token; `${VAR}` references are expanded
    #[serde(default)]
    pub token: Option<String>,
    /// Seconds; no timeout when unset
    #[serde(default)]
    pub request_timeout: Option<u64>,
}
