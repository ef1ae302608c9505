use reqwest::header::{ACCEPT, CONTENT_TYPE, COOKIE};
use reqwest::Method;
use serde_json::Value;
use std::sync::atomic::{AtomicBool, Ordering};
use yansi::Paint;

use crate::config::PanelConfig;
use crate::error::ApiError;

pub const JSON_CONTENT_TYPE: &str = "application/json; charset=utf-8";

static SILENT: AtomicBool = AtomicBool::new(false);

pub fn set_silent(silent: bool) {
    SILENT.store(silent, Ordering::Relaxed);
}

pub fn is_silent() -> bool {
    SILENT.load(Ordering::Relaxed)
}

fn log_output(msg: String) {
    if !is_silent() {
        eprintln!("{}", msg);
    }
}

/// Build the HTTP client shared by a panel session.
pub fn build_client(config: &PanelConfig) -> Result<reqwest::Client, ApiError> {
    reqwest::Client::builder()
        .user_agent(format!("staffusr/{}", env!("CARGO_PKG_VERSION")))
        .timeout(config.request_timeout)
        .build()
        .map_err(|e| ApiError::Transport(format!("Failed to create HTTP client: {}", e)))
}

/// Echo a request as the equivalent curl command line.
fn log_request(method: &Method, url: &str, config: &PanelConfig, body: Option<&Value>) {
    let mut parts = Vec::new();
    parts.push(Paint::new("curl").fg(yansi::Color::Green).bold().to_string());
    parts.push(format!("-X {}", Paint::new(method.as_str()).fg(yansi::Color::Yellow).bold()));
    parts.push(format!("'{}'", Paint::new(url).fg(yansi::Color::Cyan)));

    if config.session_cookie.is_some() {
        parts.push(format!(
            "{} {}",
            Paint::new("-H").fg(yansi::Color::Magenta),
            Paint::new("'Cookie: <session>'").fg(yansi::Color::Magenta)
        ));
    }
    if let Some(d) = body {
        parts.push(format!(
            "{} {}",
            Paint::new("-H").fg(yansi::Color::Magenta),
            Paint::new(format!("'Content-Type: {}'", JSON_CONTENT_TYPE)).fg(yansi::Color::Magenta)
        ));
        let json_str = serde_json::to_string_pretty(d).unwrap_or_default();
        let escaped_json = json_str.replace('\'', "'\\''");
        parts.push(format!(
            "{} {}",
            Paint::new("-d").fg(yansi::Color::Blue),
            Paint::new(format!("'{}'", escaped_json)).fg(yansi::Color::White)
        ));
    }
    log_output(format!("Request:\n{}", parts.join(" ")));
}

/// Send one request and return the body text of a success response.
///
/// Non-success statuses become [`ApiError::Status`] carrying the body, so
/// callers can pick the server's `error` field or the raw text.
pub async fn api_call(
    client: &reqwest::Client,
    config: &PanelConfig,
    method: Method,
    url: &str,
    body: Option<Value>,
) -> Result<String, ApiError> {
    log_request(&method, url, config, body.as_ref());

    let mut req = client.request(method.clone(), url).header(ACCEPT, "application/json");
    if let Some(cookie) = &config.session_cookie {
        req = req.header(COOKIE, cookie);
    }
    if let Some(b) = &body {
        let bytes = serde_json::to_vec(b).map_err(|e| ApiError::Decode(e.to_string()))?;
        req = req.header(CONTENT_TYPE, JSON_CONTENT_TYPE).body(bytes);
    }

    let resp = match req.send().await {
        Ok(resp) => resp,
        Err(e) => {
            tracing::warn!(%method, %url, error = %e, "request failed");
            log_output(format!("Response:\n{}", Paint::new(format!("error: {}", e)).red()));
            return Err(ApiError::Transport(e.to_string()));
        }
    };

    let status = resp.status();
    let text = resp.text().await.map_err(|e| ApiError::Transport(e.to_string()))?;

    let shown = if text.is_empty() {
        format!("HTTP {}", status.as_u16())
    } else {
        format!("HTTP {} {}", status.as_u16(), text)
    };
    if status.is_success() {
        // Grayed out so it does not compete with the banners
        log_output(format!("Response:\n{}", Paint::new(shown).rgb(100, 100, 100)));
        tracing::debug!(%method, %url, status = status.as_u16(), "request succeeded");
        Ok(text)
    } else {
        log_output(format!("Response:\n{}", Paint::new(shown).red()));
        tracing::warn!(%method, %url, status = status.as_u16(), "server rejected request");
        Err(ApiError::from_body(status.as_u16(), text))
    }
}
