use std::env;
use std::path::Path;
use std::time::Duration;

// Default configuration constants
pub const DEFAULT_SERVER_ROOT: &str = "http://localhost:3000";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
pub const USERS_ENDPOINT: &str = "/staff/usr";

/// Resolved settings for a panel session.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PanelConfig {
    /// Prefix every `/staff/usr` path is appended to.
    pub server_root: String,
    pub request_timeout: Duration,
    /// Raw `Cookie` header forwarded on every request, if any.
    pub session_cookie: Option<String>,
}

impl Default for PanelConfig {
    fn default() -> Self {
        Self {
            server_root: DEFAULT_SERVER_ROOT.to_string(),
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            session_cookie: None,
        }
    }
}

impl PanelConfig {
    pub fn from_env() -> Self {
        Self {
            server_root: get_server_root(),
            request_timeout: get_request_timeout(),
            session_cookie: get_session_cookie(),
        }
    }

    /// Replace the server root, applying the same cleanup as the env variable.
    pub fn with_server_root(mut self, raw: &str) -> Self {
        self.server_root = sanitize_base_url(raw);
        self
    }

    pub fn users_url(&self) -> String {
        format!("{}{}", self.server_root, USERS_ENDPOINT)
    }

    pub fn user_url(&self, username: &str) -> String {
        format!(
            "{}{}/{}",
            self.server_root,
            USERS_ENDPOINT,
            urlencoding::encode(username)
        )
    }
}

pub fn load_env_file(env_file: Option<&str>) {
    if let Some(path) = env_file {
        dotenvy::from_path(Path::new(path)).ok();
    } else {
        dotenvy::dotenv().ok();
    }
}

pub fn get_server_root() -> String {
    sanitize_base_url(&env::var("SERVER_ROOT").unwrap_or_else(|_| DEFAULT_SERVER_ROOT.to_string()))
}

pub fn get_request_timeout() -> Duration {
    let secs = env::var("REQUEST_TIMEOUT_SECS")
        .ok()
        .and_then(|raw| raw.trim().parse::<u64>().ok())
        .filter(|secs| *secs > 0)
        .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS);
    Duration::from_secs(secs)
}

pub fn get_session_cookie() -> Option<String> {
    env::var("SESSION_COOKIE")
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

pub fn sanitize_base_url(raw: &str) -> String {
    let trimmed = raw.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        DEFAULT_SERVER_ROOT.to_string()
    } else {
        trimmed.to_string()
    }
}
