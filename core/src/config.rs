//! Connection settings for a Canvas instance.
//!
//! `from_env` reads:
//!
//! - `CANVAS_BASE_URL` (required), e.g. `https://canvas.example.edu`
//! - `CANVAS_OAUTH_TOKEN` (required)
//! - `CANVAS_API_VERSION` (optional, defaults to `1`)
//! - `CANVAS_ACCOUNT_ID` (optional, defaults to `1`, the root account)

use crate::error::ApiError;

pub const DEFAULT_API_VERSION: u32 = 1;
pub const DEFAULT_ACCOUNT_ID: &str = "1";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CanvasConfig {
    pub base_url: String,
    pub api_version: u32,
    pub oauth_token: String,
    /// Account new courses are created under.
    pub account_id: String,
}

impl CanvasConfig {
    pub fn new(base_url: impl Into<String>, oauth_token: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_version: DEFAULT_API_VERSION,
            oauth_token: oauth_token.into(),
            account_id: DEFAULT_ACCOUNT_ID.to_string(),
        }
    }

    pub fn with_api_version(mut self, api_version: u32) -> Self {
        self.api_version = api_version;
        self
    }

    pub fn with_account_id(mut self, account_id: impl Into<String>) -> Self {
        self.account_id = account_id.into();
        self
    }

    pub fn from_env() -> Result<Self, ApiError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ApiError> {
        let required = |key: &str| {
            lookup(key)
                .filter(|value| !value.trim().is_empty())
                .ok_or_else(|| ApiError::Config(format!("{key} is not set")))
        };

        let mut config = Self::new(required("CANVAS_BASE_URL")?, required("CANVAS_OAUTH_TOKEN")?);
        if let Some(raw) = lookup("CANVAS_API_VERSION") {
            let version = raw
                .trim()
                .parse::<u32>()
                .ok()
                .filter(|version| *version > 0)
                .ok_or_else(|| ApiError::Config(format!("CANVAS_API_VERSION must be a positive integer, got {raw:?}")))?;
            config = config.with_api_version(version);
        }
        if let Some(account_id) = lookup("CANVAS_ACCOUNT_ID") {
            config = config.with_account_id(account_id.trim());
        }
        Ok(config)
    }
}
