use crate::core::mutation::DEFAULT_FALLBACK_ERROR;
use crate::core::notifications::DEFAULT_AUTO_DISMISS;
use crate::utils::error::{AdminError, Result};
use crate::utils::validation::{
    validate_positive_number, validate_range, validate_required_field, validate_url, Validate,
};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AdminConfig {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub notifications: NotificationConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    pub base_url: Option<String>,
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationConfig {
    #[serde(default = "default_auto_dismiss_ms")]
    pub auto_dismiss_ms: u64,
    #[serde(default = "default_fallback_error_message")]
    pub fallback_error_message: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default)]
    pub verbose: bool,
    #[serde(default)]
    pub json: bool,
}

fn default_timeout_seconds() -> u64 {
    10
}

fn default_auto_dismiss_ms() -> u64 {
    DEFAULT_AUTO_DISMISS.as_millis() as u64
}

fn default_fallback_error_message() -> String {
    DEFAULT_FALLBACK_ERROR.to_string()
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            timeout_seconds: default_timeout_seconds(),
        }
    }
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            auto_dismiss_ms: default_auto_dismiss_ms(),
            fallback_error_message: default_fallback_error_message(),
        }
    }
}

impl ApiConfig {
    /// The configured API root; required for anything that talks to the server.
    pub fn base_url(&self) -> Result<&str> {
        validate_required_field("api.base_url", &self.base_url).map(String::as_str)
    }
}

impl NotificationConfig {
    pub fn auto_dismiss(&self) -> Duration {
        Duration::from_millis(self.auto_dismiss_ms)
    }
}

impl AdminConfig {
    /// Loads the configuration from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(AdminError::IoError)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| AdminError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Replaces `${VAR}` references with environment values (e.g. `${SHOP_API_URL}`).
    /// Unset variables are left as written.
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| AdminError::ConfigValidationError {
            field: "env_substitution".to_string(),
            message: e.to_string(),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }
}

impl Validate for AdminConfig {
    fn validate(&self) -> Result<()> {
        if let Some(base_url) = &self.api.base_url {
            validate_url("api.base_url", base_url)?;
        }
        validate_range("api.timeout_seconds", self.api.timeout_seconds, 1, 300)?;
        validate_positive_number(
            "notifications.auto_dismiss_ms",
            self.notifications.auto_dismiss_ms,
            1,
        )?;
        if self.notifications.fallback_error_message.trim().is_empty() {
            return Err(AdminError::InvalidConfigValueError {
                field: "notifications.fallback_error_message".to_string(),
                value: self.notifications.fallback_error_message.clone(),
                reason: "Fallback message cannot be empty".to_string(),
            });
        }
        Ok(())
    }
}
