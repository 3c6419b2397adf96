//! Process settings, read once at startup and immutable afterwards.
//!
//! Everything is built from a `Fn(&str) -> Option<String>` lookup so tests can feed
//! a map instead of mutating the process environment.

use serde::Serialize;
use std::fmt;
use std::path::Path;
use tubescript_core::{Error, Result};

pub const DEFAULT_API_BASE: &str = "https://www.googleapis.com/youtube/v3";
pub const DEFAULT_LANGUAGE: &str = "en";
pub const DEFAULT_PROXY_RETRIES: u32 = 50;

pub const API_KEY_VAR: &str = "YOUTUBE_API_KEY";
pub const PROXY_USERNAME_VAR: &str = "WEBSHARE_PROXY_USERNAME";
pub const PROXY_PASSWORD_VAR: &str = "WEBSHARE_PROXY_PASSWORD";
pub const LANGUAGES_VAR: &str = "TRANSCRIPT_LANGUAGE";
pub const PROXY_RETRIES_VAR: &str = "TUBESCRIPT_PROXY_RETRIES";
pub const API_BASE_VAR: &str = "TUBESCRIPT_YOUTUBE_API_BASE";
pub const ENV_FILE_VAR: &str = "TUBESCRIPT_ENV_FILE";

fn env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Webshare rotating-residential proxy credentials.
#[derive(Clone)]
pub struct ProxyCredentials {
    pub username: String,
    pub password: String,
    pub retries_when_blocked: u32,
}

impl fmt::Debug for ProxyCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProxyCredentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("retries_when_blocked", &self.retries_when_blocked)
            .finish()
    }
}

#[derive(Clone)]
pub struct Settings {
    pub api_key: String,
    pub api_base: url::Url,
    /// Ordered; the first language with a transcript wins.
    pub languages: Vec<String>,
    pub proxy: Option<ProxyCredentials>,
}

impl fmt::Debug for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Settings")
            .field("api_key", &"<redacted>")
            .field("api_base", &self.api_base.as_str())
            .field("languages", &self.languages)
            .field("proxy", &self.proxy)
            .finish()
    }
}

impl Settings {
    pub fn from_env() -> Result<Self> {
        Self::from_vars(env)
    }

    pub fn from_vars(get: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let get = |k: &str| {
            get(k)
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
        };
        let api_key = get(API_KEY_VAR).ok_or_else(|| {
            Error::NotConfigured(format!("{API_KEY_VAR} environment variable is required"))
        })?;
        Ok(Self {
            api_key,
            api_base: api_base_from(get(API_BASE_VAR))?,
            languages: languages_from(get(LANGUAGES_VAR).as_deref()),
            proxy: proxy_from(&get)?,
        })
    }
}

/// Split a comma-separated language list; blanks are dropped, order is kept.
pub fn languages_from(raw: Option<&str>) -> Vec<String> {
    let langs: Vec<String> = raw
        .unwrap_or(DEFAULT_LANGUAGE)
        .split(',')
        .map(|x| x.trim().to_string())
        .filter(|x| !x.is_empty())
        .collect();
    if langs.is_empty() {
        vec![DEFAULT_LANGUAGE.to_string()]
    } else {
        langs
    }
}

fn api_base_from(raw: Option<String>) -> Result<url::Url> {
    let s = raw.unwrap_or_else(|| DEFAULT_API_BASE.to_string());
    url::Url::parse(&s).map_err(|e| Error::NotConfigured(format!("{API_BASE_VAR}: {e}")))
}

fn proxy_from(get: &impl Fn(&str) -> Option<String>) -> Result<Option<ProxyCredentials>> {
    let (Some(username), Some(password)) = (get(PROXY_USERNAME_VAR), get(PROXY_PASSWORD_VAR))
    else {
        return Ok(None);
    };
    let retries_when_blocked = match get(PROXY_RETRIES_VAR) {
        Some(s) => s.parse::<u32>().map_err(|_| {
            Error::NotConfigured(format!(
                "{PROXY_RETRIES_VAR} must be a non-negative integer"
            ))
        })?,
        None => DEFAULT_PROXY_RETRIES,
    };
    Ok(Some(ProxyCredentials {
        username,
        password,
        retries_when_blocked,
    }))
}

/// Configuration summary for `doctor`: presence flags and non-secret values only.
#[derive(Debug, Clone, Serialize)]
pub struct ConfigReport {
    pub api_key_configured: bool,
    pub proxy_configured: bool,
    pub proxy_retries_when_blocked: Option<u32>,
    pub languages: Vec<String>,
    pub api_base: String,
    pub errors: Vec<String>,
}

impl ConfigReport {
    pub fn from_env() -> Self {
        Self::from_vars(env)
    }

    pub fn from_vars(get: impl Fn(&str) -> Option<String>) -> Self {
        let get = |k: &str| {
            get(k)
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
        };
        let mut errors = Vec::new();
        let api_key_configured = get(API_KEY_VAR).is_some();
        if !api_key_configured {
            errors.push(format!("missing {API_KEY_VAR}"));
        }
        let proxy = proxy_from(&get).unwrap_or_else(|e| {
            errors.push(e.to_string());
            None
        });
        let api_base = match api_base_from(get(API_BASE_VAR)) {
            Ok(u) => u.to_string(),
            Err(e) => {
                errors.push(e.to_string());
                DEFAULT_API_BASE.to_string()
            }
        };
        Self {
            api_key_configured,
            proxy_configured: proxy.is_some(),
            proxy_retries_when_blocked: proxy.map(|p| p.retries_when_blocked),
            languages: languages_from(get(LANGUAGES_VAR).as_deref()),
            api_base,
            errors,
        }
    }

    pub fn ok(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Apply a `KEY=VALUE` file to the process environment.
///
/// Blank lines and `#` comments are skipped, surrounding quotes are stripped, and
/// variables already present in the process environment are left alone. Returns the
/// number of variables set. Values are never logged.
pub fn apply_env_file(path: &Path) -> std::io::Result<usize> {
    let txt = std::fs::read_to_string(path)?;
    let mut applied = 0;
    for raw in txt.lines() {
        let s = raw.trim();
        if s.is_empty() || s.starts_with('#') {
            continue;
        }
        let s = s.strip_prefix("export ").unwrap_or(s);
        let Some((k, v)) = s.split_once('=') else {
            continue;
        };
        let k = k.trim();
        if k.is_empty() {
            continue;
        }
        let v = strip_quotes(v.trim());
        if std::env::var_os(k).is_none() {
            std::env::set_var(k, v);
            applied += 1;
        }
    }
    tracing::debug!(path = %path.display(), applied, "applied env file");
    Ok(applied)
}

fn strip_quotes(v: &str) -> &str {
    for q in ['"', '\''] {
        if v.len() >= 2 && v.starts_with(q) && v.ends_with(q) {
            return &v[1..v.len() - 1];
        }
    }
    v
}

/// Load `TUBESCRIPT_ENV_FILE` if set, otherwise `./.env` when present.
///
/// Missing default files are fine; an explicitly named file that can't be read is
/// reported.
pub fn load_env_files() -> std::io::Result<usize> {
    match env(ENV_FILE_VAR) {
        Some(p) => apply_env_file(Path::new(&p)),
        None => {
            let p = Path::new(".env");
            if p.is_file() {
                apply_env_file(p)
            } else {
                Ok(0)
            }
        }
    }
}
