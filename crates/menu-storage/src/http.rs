//! Remote medium over HTTP
//!
//! Talks to a single resource:
//! - `GET    {base_url}/api/menu` → payload text, 404 when nothing stored
//! - `PUT    {base_url}/api/menu` ← payload text
//! - `DELETE {base_url}/api/menu`

use crate::error::{Result, StorageError};
use crate::medium::{Medium, MediumKind};
use async_trait::async_trait;
use reqwest::{header, Client, Response, StatusCode};
use std::time::Duration;

/// Remote medium
#[derive(Debug, Clone)]
pub struct HttpMedium {
    endpoint: String,
    client: Client,
}

impl HttpMedium {
    /// Create a medium for `base_url`
    ///
    /// # Errors
    /// Returns error if the token is not a valid header value or the client
    /// cannot be built
    pub fn new(base_url: &str, api_token: Option<&str>, timeout: Duration) -> Result<Self> {
        let mut headers = header::HeaderMap::new();
        if let Some(token) = api_token {
            let value = header::HeaderValue::from_str(&format!("Bearer {token}"))
                .map_err(|e| StorageError::unavailable(MediumKind::Remote, e.to_string()))?;
            headers.insert(header::AUTHORIZATION, value);
        }

        let client = Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()?;

        Ok(Self {
            endpoint: format!("{}/api/menu", base_url.trim_end_matches('/')),
            client,
        })
    }

    /// Resource URL
    #[inline]
    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn check(response: Response) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let message = response.text().await.unwrap_or_default();
        Err(StorageError::Server {
            status: status.as_u16(),
            message,
        })
    }

    fn offline(err: reqwest::Error) -> StorageError {
        if err.is_connect() {
            StorageError::unavailable(MediumKind::Remote, err.to_string())
        } else {
            StorageError::Http(err)
        }
    }
}

#[async_trait]
impl Medium for HttpMedium {
    fn kind(&self) -> MediumKind {
        MediumKind::Remote
    }

    async fn read(&self) -> Result<Option<String>> {
        let response = self
            .client
            .get(&self.endpoint)
            .send()
            .await
            .map_err(Self::offline)?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let text = Self::check(response).await?.text().await?;
        Ok((!text.trim().is_empty()).then_some(text))
    }

    async fn write(&self, text: &str) -> Result<()> {
        let response = self
            .client
            .put(&self.endpoint)
            .header(header::CONTENT_TYPE, "application/json")
            .body(text.to_owned())
            .send()
            .await
            .map_err(Self::offline)?;
        Self::check(response).await.map(drop)
    }

    async fn remove(&self) -> Result<()> {
        let response = self
            .client
            .delete(&self.endpoint)
            .send()
            .await
            .map_err(Self::offline)?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(());
        }
        Self::check(response).await.map(drop)
    }
}
