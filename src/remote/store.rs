use async_trait::async_trait;
use thiserror::Error;

use crate::cache::TranslationTree;

/// Errors raised by a remote store call.
#[derive(Error, Debug)]
pub enum RemoteError {
    /// The request did not complete (connection, TLS, timeout...)
    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),
    /// The store answered with a non-2xx status
    #[error("HTTP {status}: {message}")]
    Rejected {
        /// HTTP ステータス
        status: u16,
        /// Loco のエラーメッセージ、なければステータスの説明
        message: String,
    },
    /// The store answered 2xx with a body that could not be understood
    #[error("Malformed response: {0}")]
    Malformed(String),
    /// `remoteUrl` cannot be joined with an endpoint path
    #[error("Invalid remote URL '{0}'")]
    InvalidUrl(String),
}

/// The operations the cache needs from a translation-management service.
///
/// Every call is authenticated by the implementation.
#[async_trait]
pub trait RemoteStore: Send + Sync + std::fmt::Debug {
    /// Lists the ids of every registered asset (translation key).
    async fn list_keys(&self) -> Result<Vec<String>, RemoteError>;

    /// Exports all translations of one locale as a nested tree.
    async fn export_locale(&self, language_code: &str) -> Result<TranslationTree, RemoteError>;

    /// Registers a new asset with a default value.
    async fn create_asset(&self, id: &str, default_value: &str) -> Result<(), RemoteError>;

    /// Sets the translation text of an asset for one locale.
    async fn set_translation(
        &self,
        id: &str,
        language_code: &str,
        text: &str,
    ) -> Result<(), RemoteError>;
}
