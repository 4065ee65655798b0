use std::env;

use crate::error::DataPublicError;

/// Secrets loaded from the environment (after `.env`, if present).
/// Everything non-secret lives in the TOML [`FileConfig`](crate::FileConfig).
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Name of the variable the token was read from, for error messages.
    pub token_env: String,
    pub dispatch_token: Option<String>,
}

impl AppConfig {
    /// Read the dispatch credential. A missing or blank variable is `None`;
    /// whether that is fatal is up to the caller.
    pub fn from_env(token_env: &str) -> Self {
        dotenvy::dotenv().ok();

        let config = Self {
            token_env: token_env.to_string(),
            dispatch_token: env::var(token_env)
                .ok()
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty()),
        };

        config.log_redacted();
        config
    }

    /// The token, or the user-facing missing-credential error.
    pub fn require_token(&self) -> crate::Result<&str> {
        self.dispatch_token
            .as_deref()
            .ok_or_else(|| DataPublicError::MissingCredential {
                var: self.token_env.clone(),
            })
    }

    pub fn log_redacted(&self) {
        tracing::info!(
            var = %self.token_env,
            value = %preview(self.dispatch_token.as_deref()),
            "Dispatch credential"
        );
    }
}

/// Short values are reduced to their length; long ones show a 4-char head.
fn preview(val: Option<&str>) -> String {
    match val {
        Some(v) if v.chars().count() > 12 => {
            let head: String = v.chars().take(4).collect();
            format!("{head}...({} chars)", v.len())
        }
        Some(v) => format!("<{} chars>", v.len()),
        None => "<not set>".to_string(),
    }
}
