use std::sync::Arc;
use std::time::Duration;

use reqwest::{
    header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, CONTENT_TYPE},
    Client, Method, StatusCode,
};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, error, warn};

use shared_config::AppConfig;
use shared_models::{AppError, AuthContext};

use crate::session::SessionStore;

/// REST client for the booking API.
///
/// Every call carries its own [`AuthContext`]. A `401` from the server clears
/// the attached [`SessionStore`] once for that request before the error is
/// returned to the caller.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    config: AppConfig,
    session: Option<Arc<dyn SessionStore>>,
}

impl ApiClient {
    pub fn new(config: &AppConfig) -> Result<Self, AppError> {
        if config.api_base_url.trim().is_empty() {
            return Err(AppError::Config("API base URL is empty".to_string()));
        }

        let client = Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| AppError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            config: AppConfig {
                api_base_url: config.api_base_url.trim_end_matches('/').to_string(),
                ..config.clone()
            },
            session: None,
        })
    }

    pub fn with_session(mut self, session: Arc<dyn SessionStore>) -> Self {
        self.session = Some(session);
        self
    }

    fn get_headers(&self, auth: &AuthContext) -> Result<HeaderMap, AppError> {
        let mut headers = HeaderMap::new();

        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        if let Some(token) = auth.token() {
            let value = HeaderValue::from_str(&format!("Bearer {}", token))
                .map_err(|_| AppError::Validation("Access token contains invalid characters".to_string()))?;
            headers.insert(AUTHORIZATION, value);
        }

        Ok(headers)
    }

    /// Sends a request and returns the raw body of a 2xx response.
    async fn send(
        &self,
        method: Method,
        path: &str,
        auth: &AuthContext,
        query: &[(&str, String)],
        body: Option<Value>,
    ) -> Result<String, AppError> {
        let url = self.config.endpoint(path);

        if auth.is_authenticated() {
            debug!("[API Request] {} {} - {:?}", method, url, auth);
        } else {
            debug!("[API Request] {} {} - no token", method, url);
        }

        let mut req = self
            .client
            .request(method.clone(), &url)
            .headers(self.get_headers(auth)?);

        if !query.is_empty() {
            req = req.query(query);
        }

        if let Some(body_data) = body {
            req = req.json(&body_data);
        }

        let response = req
            .send()
            .await
            .map_err(|e| self.transport_error(&method, path, e))?;

        let status = response.status();
        let body_text = response
            .text()
            .await
            .map_err(|e| self.transport_error(&method, path, e))?;

        if !status.is_success() {
            error!("[API Error] {} {} - Status: {}: {}", method, path, status, body_text);

            if status == StatusCode::UNAUTHORIZED {
                self.force_logout();
                return Err(AppError::Unauthorized(body_text));
            }

            return Err(AppError::Api {
                status: status.as_u16(),
                body: body_text,
            });
        }

        debug!("[API Response] {} {} - Status: {}", method, path, status);
        Ok(body_text)
    }

    fn transport_error(&self, method: &Method, path: &str, err: reqwest::Error) -> AppError {
        if err.is_timeout() {
            error!("[API Error] {} {} - Timed out after {:?}", method, path, self.timeout());
            return AppError::Timeout(self.timeout());
        }

        error!("[API Error] {} {} - No response received: {}", method, path, err);
        AppError::Transport(err.to_string())
    }

    fn force_logout(&self) {
        match &self.session {
            Some(session) => {
                warn!("[API] 401 Unauthorized - logging out");
                session.logout();
            }
            None => warn!("[API] 401 Unauthorized - no session attached"),
        }
    }

    /// Sends a request and deserializes the body into `T`.
    pub async fn request<T>(
        &self,
        method: Method,
        path: &str,
        auth: &AuthContext,
        body: Option<Value>,
    ) -> Result<T, AppError>
    where
        T: DeserializeOwned,
    {
        let body_text = self.send(method.clone(), path, auth, &[], body).await?;

        serde_json::from_str::<T>(&body_text).map_err(|e| {
            error!("[API Error] {} {} - Unexpected response shape: {}", method, path, e);
            AppError::InvalidResponse(format!("{} {}: {}", method, path, e))
        })
    }

    /// Sends a request and returns the body as loosely parsed JSON.
    ///
    /// An empty body becomes `null` and a non-JSON body becomes a JSON string,
    /// so callers can decide how to treat shapes they did not expect.
    pub async fn request_value(
        &self,
        method: Method,
        path: &str,
        auth: &AuthContext,
        query: &[(&str, String)],
    ) -> Result<Value, AppError> {
        let body_text = self.send(method, path, auth, query, None).await?;
        Ok(parse_lenient(&body_text))
    }

    /// Sends a request whose response body carries nothing of interest.
    pub async fn request_empty(
        &self,
        method: Method,
        path: &str,
        auth: &AuthContext,
    ) -> Result<(), AppError> {
        self.send(method, path, auth, &[], None).await?;
        Ok(())
    }

    pub fn get_base_url(&self) -> &str {
        &self.config.api_base_url
    }

    pub fn timeout(&self) -> Duration {
        self.config.request_timeout
    }
}

fn parse_lenient(body: &str) -> Value {
    if body.trim().is_empty() {
        return Value::Null;
    }
    serde_json::from_str(body).unwrap_or_else(|_| Value::String(body.to_string()))
}
