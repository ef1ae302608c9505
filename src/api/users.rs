use async_trait::async_trait;
use reqwest::Method;

use super::client::{api_call, build_client};
use crate::config::PanelConfig;
use crate::error::ApiError;
use crate::models::{FormFields, UserRecord, UserUpdate};

/// The `/staff/usr` endpoints the panel drives.
#[async_trait]
pub trait UserApi: Send + Sync {
    /// `POST /staff/usr` with the create form.
    async fn create_user(&self, form: &FormFields) -> Result<UserRecord, ApiError>;

    /// `PUT /staff/usr/{username}` with the fields that changed.
    async fn update_user(&self, username: &str, payload: &FormFields) -> Result<UserUpdate, ApiError>;

    /// `DELETE /staff/usr/{username}`; the response body is ignored.
    async fn delete_user(&self, username: &str) -> Result<(), ApiError>;
}

/// [`UserApi`] over HTTP.
#[derive(Clone)]
pub struct HttpUserApi {
    client: reqwest::Client,
    config: PanelConfig,
}

impl HttpUserApi {
    pub fn new(config: PanelConfig) -> Result<Self, ApiError> {
        let client = build_client(&config)?;
        Ok(Self { client, config })
    }

    pub fn config(&self) -> &PanelConfig {
        &self.config
    }
}

fn form_to_value(form: &FormFields) -> Result<serde_json::Value, ApiError> {
    serde_json::to_value(form).map_err(|e| ApiError::Decode(e.to_string()))
}

#[async_trait]
impl UserApi for HttpUserApi {
    async fn create_user(&self, form: &FormFields) -> Result<UserRecord, ApiError> {
        let url = self.config.users_url();
        let text = api_call(&self.client, &self.config, Method::POST, &url, Some(form_to_value(form)?)).await?;
        serde_json::from_str(&text).map_err(|e| ApiError::Decode(e.to_string()))
    }

    async fn update_user(&self, username: &str, payload: &FormFields) -> Result<UserUpdate, ApiError> {
        let url = self.config.user_url(username);
        let text = api_call(&self.client, &self.config, Method::PUT, &url, Some(form_to_value(payload)?)).await?;
        if text.trim().is_empty() {
            return Ok(UserUpdate::default());
        }
        serde_json::from_str(&text).map_err(|e| ApiError::Decode(e.to_string()))
    }

    async fn delete_user(&self, username: &str) -> Result<(), ApiError> {
        let url = self.config.user_url(username);
        api_call(&self.client, &self.config, Method::DELETE, &url, None).await?;
        Ok(())
    }
}
