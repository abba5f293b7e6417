//! Startup configuration, read once from the process environment.

use std::env;

use thiserror::Error;

pub const API_TOKEN_VAR: &str = "REPLICATE_API_TOKEN";
pub const BUDGET_LIMIT_VAR: &str = "REPLICATE_BUDGET_LIMIT";
pub const DEFAULT_BUDGET_LIMIT: f64 = 100.0;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{API_TOKEN_VAR} environment variable not set")]
    MissingApiToken,

    #[error("{BUDGET_LIMIT_VAR} is not a valid number: {0}")]
    InvalidBudgetLimit(String),
}

/// Process-lifetime configuration. The API token is required before any
/// generation tool can be served; the budget ceiling defaults when unset.
#[derive(Debug, Clone)]
pub struct Config {
    pub api_token: String,
    pub budget_limit: f64,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let api_token = env::var(API_TOKEN_VAR)
            .ok()
            .filter(|t| !t.is_empty())
            .ok_or(ConfigError::MissingApiToken)?;

        let budget_limit = match env::var(BUDGET_LIMIT_VAR) {
            Ok(raw) => raw
                .parse::<f64>()
                .map_err(|_| ConfigError::InvalidBudgetLimit(raw))?,
            Err(_) => DEFAULT_BUDGET_LIMIT,
        };

        Ok(Self {
            api_token,
            budget_limit,
        })
    }
}
