//! Resolution of the generation service bearer token.
//!
//! The token can be supplied three ways, checked in this order:
//!
//! 1. **Direct value** - `auth.token` in the config file (local testing only)
//! 2. **File reference** - `auth.token_file`, e.g. a mounted Docker secret
//! 3. **Env var reference** - `auth.token_env_var`, e.g. `THREADCRAFT_API_TOKEN`

use secrecy::SecretString;
use std::fs;

use crate::config::schema::AuthConfig;

#[derive(Debug, thiserror::Error)]
pub enum SecretError {
    #[error("No token source provided (need one of: token, token_file, token_env_var)")]
    NoSourceProvided,

    #[error("Failed to read token from file '{path}': {source}")]
    FileReadError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Environment variable '{name}' not set")]
    EnvVarNotSet { name: String },

    #[error("Environment variable '{name}' contains invalid UTF-8")]
    EnvVarNotUnicode { name: String },
}

pub type Result<T> = std::result::Result<T, SecretError>;

/// Resolves the bearer token described by `auth`.
///
/// Empty strings count as "not provided" so that a blank `token` does not
/// shadow a configured env var.
pub fn resolve_token(auth: &AuthConfig) -> Result<SecretString> {
    if let Some(value) = non_empty(auth.token.as_deref()) {
        return Ok(SecretString::from(value.to_string()));
    }

    if let Some(path) = non_empty(auth.token_file.as_deref()) {
        let expanded = expand_home(path);
        return fs::read_to_string(&expanded)
            .map(|content| SecretString::from(content.trim().to_string()))
            .map_err(|source| SecretError::FileReadError {
                path: expanded,
                source,
            });
    }

    if let Some(name) = non_empty(auth.token_env_var.as_deref()) {
        return match std::env::var(name) {
            Ok(value) => Ok(SecretString::from(value.trim().to_string())),
            Err(std::env::VarError::NotPresent) => Err(SecretError::EnvVarNotSet {
                name: name.to_string(),
            }),
            Err(std::env::VarError::NotUnicode(_)) => Err(SecretError::EnvVarNotUnicode {
                name: name.to_string(),
            }),
        };
    }

    Err(SecretError::NoSourceProvided)
}

/// Like [`resolve_token`], but an unconfigured token is `Ok(None)`.
pub fn resolve_token_optional(auth: &AuthConfig) -> Result<Option<SecretString>> {
    match resolve_token(auth) {
        Ok(secret) => Ok(Some(secret)),
        Err(SecretError::NoSourceProvided) => Ok(None),
        Err(e) => Err(e),
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|s| !s.is_empty())
}

/// Expands a leading `~` to the current user's home directory.
/// `~user/...` is not supported.
fn expand_home(path: &str) -> String {
    if path == "~" || path.starts_with("~/") {
        if let Some(home) = dirs::home_dir() {
            let home = home.to_string_lossy();
            if path == "~" {
                return home.into_owned();
            }
            return path.replacen('~', &home, 1);
        }
    }
    path.to_string()
}
