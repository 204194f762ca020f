use reqwest::{Client as HttpClient, Response, StatusCode, Url};
use serde::{de::DeserializeOwned, Serialize};

use crate::{
    error::{AppError, AppResult},
    models::ErrorBody,
};

/// Thin JSON client for the recommendation backend
///
/// Shared by the repositories and the metadata service. No caching, no
/// retries, no timeouts: every call is a single request.
#[derive(Clone, Debug)]
pub struct ApiClient {
    http_client: HttpClient,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(HttpClient::new(), base_url)
    }

    pub fn with_client(http_client: HttpClient, base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            http_client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Appends `segments` to the base URL, percent-encoding each one
    fn url(&self, segments: &[&str]) -> AppResult<Url> {
        let mut url = Url::parse(&self.base_url).map_err(|e| {
            AppError::InvalidInput(format!("Invalid base URL {}: {}", self.base_url, e))
        })?;
        url.path_segments_mut()
            .map_err(|_| {
                AppError::InvalidInput(format!("Base URL {} cannot carry a path", self.base_url))
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    pub async fn get_json<T: DeserializeOwned>(
        &self,
        segments: &[&str],
        query: &[(&str, String)],
    ) -> AppResult<T> {
        let url = self.url(segments)?;
        tracing::debug!(url = %url, "GET");

        let response = self.http_client.get(url).query(query).send().await?;
        let response = Self::ensure_success(response).await?;
        Ok(response.json().await?)
    }

    /// Like [`ApiClient::get_json`], but maps 404 to `None`
    pub async fn get_optional<T: DeserializeOwned>(
        &self,
        segments: &[&str],
    ) -> AppResult<Option<T>> {
        let url = self.url(segments)?;
        tracing::debug!(url = %url, "GET");

        let response = self.http_client.get(url).send().await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let response = Self::ensure_success(response).await?;
        Ok(Some(response.json().await?))
    }

    pub async fn post_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        segments: &[&str],
        body: &B,
    ) -> AppResult<T> {
        let url = self.url(segments)?;
        tracing::debug!(url = %url, "POST");

        let response = self.http_client.post(url).json(body).send().await?;
        let response = Self::ensure_success(response).await?;
        Ok(response.json().await?)
    }

    pub async fn put_json<B: Serialize + ?Sized>(&self, segments: &[&str], body: &B) -> AppResult<()> {
        let url = self.url(segments)?;
        tracing::debug!(url = %url, "PUT");

        let response = self.http_client.put(url).json(body).send().await?;
        Self::ensure_success(response).await?;
        Ok(())
    }

    /// Converts a non-2xx response into [`AppError::Api`]
    ///
    /// Uses the body's `error` field when present, otherwise the status text.
    async fn ensure_success(response: Response) -> AppResult<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        Err(AppError::Api {
            status: status.as_u16(),
            message: error_message(status, &body),
        })
    }
}

fn error_message(status: StatusCode, body: &str) -> String {
    serde_json::from_str::<ErrorBody>(body)
        .map(|b| b.error)
        .unwrap_or_else(|_| {
            status
                .canonical_reason()
                .map(str::to_string)
                .unwrap_or_else(|| status.to_string())
        })
}
