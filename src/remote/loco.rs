//! Loco (localise.biz) REST API client.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{
    AUTHORIZATION,
    CONTENT_TYPE,
};
use reqwest::{
    Client,
    Response,
    StatusCode,
    Url,
};
use serde::Deserialize;

use super::{
    RemoteConfig,
    RemoteError,
    RemoteStore,
};
use crate::cache::TranslationTree;

/// Request timeout applied to every call.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Default value of assets created without translation text.
pub const DEFAULT_ASSET_VALUE: &str = "untranslated";

/// An asset as listed by `GET /api/assets`.
#[derive(Debug, Deserialize)]
struct Asset {
    id: String,
}

/// Error body of non-2xx responses.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

/// [`RemoteStore`] backed by the Loco REST API.
#[derive(Debug, Clone)]
pub struct LocoClient {
    http: Client,
    config: RemoteConfig,
}

impl LocoClient {
    /// # Errors
    /// - The base URL cannot be used as an API root
    /// - The HTTP client cannot be built (TLS backend initialization)
    pub fn new(config: RemoteConfig) -> Result<Self, RemoteError> {
        endpoint(config.base_url(), &[])?;

        let http = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self { http, config })
    }

    /// API root に続くエンドポイント URL
    fn url(&self, segments: &[&str]) -> Result<Url, RemoteError> {
        endpoint(self.config.base_url(), segments)
    }

    /// `Authorization` ヘッダーの値
    fn authorization(&self) -> String {
        format!("Loco {}", self.config.api_key())
    }
}

#[async_trait]
impl RemoteStore for LocoClient {
    async fn list_keys(&self) -> Result<Vec<String>, RemoteError> {
        let url = self.url(&["api", "assets"])?;
        tracing::debug!(%url, "Listing Loco assets");

        let response =
            self.http.get(url).header(AUTHORIZATION, self.authorization()).send().await?;
        let body = check_status(response).await?.text().await?;

        let assets: Vec<Asset> =
            serde_json::from_str(&body).map_err(|e| RemoteError::Malformed(e.to_string()))?;

        Ok(assets.into_iter().map(|asset| asset.id).collect())
    }

    async fn export_locale(&self, language_code: &str) -> Result<TranslationTree, RemoteError> {
        let file_name = format!("{language_code}.json");
        let url = self.url(&["api", "export", "locale", &file_name])?;
        tracing::debug!(%url, "Exporting Loco locale");

        let response =
            self.http.get(url).header(AUTHORIZATION, self.authorization()).send().await?;
        let body = check_status(response).await?.text().await?;

        serde_json::from_str(&body).map_err(|e| RemoteError::Malformed(e.to_string()))
    }

    async fn create_asset(&self, id: &str, default_value: &str) -> Result<(), RemoteError> {
        let url = self.url(&["api", "assets"])?;
        tracing::debug!(%url, id, "Creating Loco asset");

        let response = self
            .http
            .post(url)
            .header(AUTHORIZATION, self.authorization())
            .form(&[("id", id), ("default", default_value)])
            .send()
            .await?;
        check_status(response).await?;

        Ok(())
    }

    async fn set_translation(
        &self,
        id: &str,
        language_code: &str,
        text: &str,
    ) -> Result<(), RemoteError> {
        let url = self.url(&["api", "translations", id, language_code])?;
        tracing::debug!(%url, id, language_code, "Setting Loco translation");

        let response = self
            .http
            .post(url)
            .header(AUTHORIZATION, self.authorization())
            .header(CONTENT_TYPE, "text/plain; charset=utf-8")
            .body(text.to_string())
            .send()
            .await?;
        check_status(response).await?;

        Ok(())
    }
}

/// Appends percent-encoded path segments to the API root.
fn endpoint(base_url: &str, segments: &[&str]) -> Result<Url, RemoteError> {
    let mut url = Url::parse(base_url).map_err(|_| RemoteError::InvalidUrl(base_url.to_string()))?;

    url.path_segments_mut()
        .map_err(|()| RemoteError::InvalidUrl(base_url.to_string()))?
        .pop_if_empty()
        .extend(segments);

    Ok(url)
}

/// Turns a non-2xx response into `RemoteError::Rejected`.
async fn check_status(response: Response) -> Result<Response, RemoteError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    Err(RemoteError::Rejected { status: status.as_u16(), message: error_message(status, &body) })
}

/// Extracts the `error` field of a Loco error body, falling back to the
/// status reason.
fn error_message(status: StatusCode, body: &str) -> String {
    serde_json::from_str::<ErrorBody>(body).map_or_else(
        |_| status.canonical_reason().unwrap_or("Unknown error").to_string(),
        |parsed| parsed.error,
    )
}
