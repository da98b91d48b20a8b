use serde::{Deserialize, Serialize};
use tether_core::BindPolicy;

use crate::error::AppError;

#[derive(Serialize, Deserialize)]
#[serde(remote = "BindPolicy", rename_all = "lowercase")]
enum BindPolicyDef {
    Strict,
    Lenient,
}

/// App-level settings. Every field has a default, so `{}` is a valid config.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Used by [`App::mount_default`](crate::App::mount_default).
    pub mount_selector: String,
    /// How listener bindings that a target refuses are handled.
    #[serde(with = "BindPolicyDef")]
    pub bind_policy: BindPolicy,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            mount_selector: "#app".to_string(),
            bind_policy: BindPolicy::Strict,
        }
    }
}

impl AppConfig {
    pub fn from_json_str(s: &str) -> Result<Self, AppError> {
        Ok(serde_json::from_str(s)?)
    }

    pub fn to_json_string(&self) -> Result<String, AppError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
