//! HTTP API client (login, register, history).

use hiroba_server::infrastructure::dto::{
    http::{AuthResponse, CredentialsRequest, ErrorResponse},
    websocket::ChatFrame,
};
use reqwest::{Client, Response};

use crate::error::ClientError;

pub struct ApiClient {
    http: Client,
    base_url: String,
}

impl ApiClient {
    /// `base_url` must be an `http://` or `https://` URL
    pub fn new(base_url: &str) -> Result<Self, ClientError> {
        let base_url = base_url.trim_end_matches('/').to_string();
        if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
            return Err(ClientError::InvalidUrl(base_url));
        }
        Ok(Self {
            http: Client::new(),
            base_url,
        })
    }

    pub async fn login(&self, username: &str, password: &str) -> Result<AuthResponse, ClientError> {
        self.authenticate("/login", username, password).await
    }

    pub async fn register(
        &self,
        username: &str,
        password: &str,
    ) -> Result<AuthResponse, ClientError> {
        self.authenticate("/register", username, password).await
    }

    /// Retained messages, oldest first
    pub async fn history(&self, token: &str) -> Result<Vec<ChatFrame>, ClientError> {
        let response = self
            .http
            .get(format!("{}/history", self.base_url))
            .bearer_auth(token)
            .send()
            .await?;
        Ok(check(response).await?.json().await?)
    }

    /// WebSocket URL carrying `token` in the query string
    pub fn ws_url(&self, token: &str) -> String {
        let base = match self.base_url.strip_prefix("https://") {
            Some(rest) => format!("wss://{rest}"),
            None => format!("ws://{}", self.base_url.trim_start_matches("http://")),
        };
        format!("{base}/ws?token={token}")
    }

    async fn authenticate(
        &self,
        path: &str,
        username: &str,
        password: &str,
    ) -> Result<AuthResponse, ClientError> {
        let body = CredentialsRequest {
            username: Some(username.to_string()),
            password: Some(password.to_string()),
        };
        let response = self
            .http
            .post(format!("{}{}", self.base_url, path))
            .json(&body)
            .send()
            .await?;
        Ok(check(response).await?.json().await?)
    }
}

/// Turn a non-2xx response into `ClientError::Api` with the server's message
async fn check(response: Response) -> Result<Response, ClientError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let message = match response.json::<ErrorResponse>().await {
        Ok(body) => body.error,
        Err(_) => status.canonical_reason().unwrap_or("unknown error").to_string(),
    };
    Err(ClientError::Api {
        status: status.as_u16(),
        message,
    })
}
