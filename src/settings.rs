//! Runtime settings from the environment (a `.env` file is honored when present).

use crate::error::ConfigError;
use axum::http::HeaderValue;
use std::path::PathBuf;
use std::str::FromStr;

/// How a caller-supplied `?next=` redirect target is treated after add/edit/delete.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RedirectPolicy {
    /// Follow any `next` value.
    #[default]
    Any,
    /// Follow `next` only when it is a local path (`/...` but not `//...`).
    SameOrigin,
}

impl RedirectPolicy {
    /// The redirect target: `next` when allowed, otherwise `fallback`.
    /// A `next` that cannot be sent as a `Location` header is never followed.
    pub fn choose(&self, next: Option<&str>, fallback: String) -> String {
        match (self, next) {
            (_, None) => fallback,
            (_, Some(next)) if HeaderValue::try_from(next).is_err() => {
                tracing::warn!(next = ?next, "ignoring malformed redirect target");
                fallback
            }
            (RedirectPolicy::Any, Some(next)) => next.to_string(),
            (RedirectPolicy::SameOrigin, Some(next)) => {
                let local = next.starts_with('/') && !next.starts_with("//") && !next.starts_with("/\\");
                if local {
                    next.to_string()
                } else {
                    tracing::warn!(next = %next, "ignoring off-site redirect target");
                    fallback
                }
            }
        }
    }
}

impl FromStr for RedirectPolicy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "any" => Ok(RedirectPolicy::Any),
            "same_origin" | "same-origin" => Ok(RedirectPolicy::SameOrigin),
            _ => Err(ConfigError::Validation(format!(
                "invalid redirect policy: {} (expected any or same_origin)",
                s
            ))),
        }
    }
}

#[derive(Clone, Debug)]
pub struct Settings {
    /// PostgreSQL URL; when absent the in-memory store is used.
    pub database_url: Option<String>,
    pub config_path: Option<PathBuf>,
    /// Directory of `.html` templates overriding the built-in ones.
    pub template_dir: Option<PathBuf>,
    pub bind: String,
    /// Path under which web routes are nested (e.g. "/admin"); empty for the root.
    pub mount: String,
    pub redirect_policy: RedirectPolicy,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            database_url: None,
            config_path: None,
            template_dir: None,
            bind: "127.0.0.1:3000".into(),
            mount: String::new(),
            redirect_policy: RedirectPolicy::Any,
        }
    }
}

impl Settings {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build settings from any key lookup (the environment in production).
    pub fn from_lookup<F>(get: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Settings::default();
        let non_empty = |key: &str| get(key).filter(|v| !v.trim().is_empty());
        Ok(Settings {
            database_url: non_empty("DATABASE_URL"),
            config_path: non_empty("WEBS_CONFIG_PATH").map(PathBuf::from),
            template_dir: non_empty("WEBS_TEMPLATE_DIR").map(PathBuf::from),
            bind: non_empty("WEBS_BIND").unwrap_or(defaults.bind),
            mount: non_empty("WEBS_MOUNT")
                .map(|m| m.trim_end_matches('/').to_string())
                .unwrap_or(defaults.mount),
            redirect_policy: non_empty("WEBS_REDIRECT_POLICY")
                .map(|p| p.parse())
                .transpose()?
                .unwrap_or_default(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn lookup_overrides_defaults() {
        let env: HashMap<&str, &str> = [
            ("WEBS_BIND", "0.0.0.0:8080"),
            ("WEBS_MOUNT", "/admin/"),
            ("WEBS_REDIRECT_POLICY", "same_origin"),
            ("DATABASE_URL", ""),
        ]
        .into_iter()
        .collect();
        let s = Settings::from_lookup(|k| env.get(k).map(|v| v.to_string())).unwrap();
        assert_eq!(s.bind, "0.0.0.0:8080");
        assert_eq!(s.mount, "/admin");
        assert_eq!(s.redirect_policy, RedirectPolicy::SameOrigin);
        assert!(s.database_url.is_none());
    }

    #[test]
    fn bad_policy_is_rejected() {
        let err = Settings::from_lookup(|k| (k == "WEBS_REDIRECT_POLICY").then(|| "sometimes".to_string()));
        assert!(err.is_err());
    }

    #[test]
    fn redirect_policy_choice() {
        let fallback = || "/book/1/".to_string();
        assert_eq!(RedirectPolicy::Any.choose(None, fallback()), "/book/1/");
        assert_eq!(RedirectPolicy::Any.choose(Some("https://x.test/"), fallback()), "https://x.test/");
        assert_eq!(RedirectPolicy::SameOrigin.choose(Some("/shelf/"), fallback()), "/shelf/");
        assert_eq!(RedirectPolicy::SameOrigin.choose(Some("//x.test/"), fallback()), "/book/1/");
        assert_eq!(RedirectPolicy::SameOrigin.choose(Some("https://x.test/"), fallback()), "/book/1/");
    }

    #[test]
    fn control_characters_in_next_fall_back() {
        let fallback = || "/book/1/".to_string();
        assert_eq!(RedirectPolicy::SameOrigin.choose(Some("/\nevil"), fallback()), "/book/1/");
        assert_eq!(RedirectPolicy::Any.choose(Some("/shelf/\r\nSet-Cookie: a=b"), fallback()), "/book/1/");
    }
}
