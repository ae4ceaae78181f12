use crate::config::ConfigError;

/// Connection settings for one Loco project and target language.
#[derive(Clone, PartialEq, Eq)]
pub struct RemoteConfig {
    base_url: String,
    api_key: String,
    language_code: String,
}

impl RemoteConfig {
    /// # Errors
    /// Returns `ConfigError::MissingSettings` naming every absent or blank field.
    pub fn new(
        base_url: Option<&str>,
        api_key: Option<&str>,
        language_code: Option<&str>,
    ) -> Result<Self, ConfigError> {
        let required = [("remoteUrl", base_url), ("apiKey", api_key), ("lang", language_code)];

        let missing: Vec<String> = required
            .iter()
            .filter(|(_, value)| value.is_none_or(|v| v.trim().is_empty()))
            .map(|(name, _)| (*name).to_string())
            .collect();

        match (base_url, api_key, language_code) {
            (Some(base_url), Some(api_key), Some(language_code)) if missing.is_empty() => {
                Ok(Self {
                    base_url: base_url.trim().to_string(),
                    api_key: api_key.trim().to_string(),
                    language_code: language_code.trim().to_string(),
                })
            }
            _ => Err(ConfigError::MissingSettings(missing)),
        }
    }

    /// API root as configured, trimmed.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Project key.
    #[must_use]
    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    /// Locale for lookups and new translations.
    #[must_use]
    pub fn language_code(&self) -> &str {
        &self.language_code
    }
}

// API キーをログに出さない
impl std::fmt::Debug for RemoteConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RemoteConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &"<redacted>")
            .field("language_code", &self.language_code)
            .finish()
    }
}
