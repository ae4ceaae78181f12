use serde::{
    Deserialize,
    Serialize,
};
use thiserror::Error;

use crate::cache::CacheMode;
use crate::remote::RemoteConfig;

/// A single invalid setting.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Configuration error in '{field_path}': {message}")]
pub struct ValidationError {
    /// JSON path to the field (e.g., "excludePatterns[0]")
    pub field_path: String,
    /// 内容
    pub message: String,
}

impl ValidationError {
    /// Creates a validation error for `field_path`.
    #[must_use]
    pub fn new(field_path: impl Into<String>, message: impl Into<String>) -> Self {
        Self { field_path: field_path.into(), message: message.into() }
    }
}

/// Errors while loading or validating settings.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// One or more settings are invalid
    #[error("Configuration validation failed:\n{}", format_validation_errors(.0))]
    ValidationErrors(Vec<ValidationError>),

    /// Remote settings needed to build an engine are absent
    #[error("Missing required settings: {}", .0.join(", "))]
    MissingSettings(Vec<String>),

    /// 設定ファイルの読み込み失敗
    #[error("Failed to load configuration file: {0}")]
    IoError(#[from] std::io::Error),

    /// 設定ファイルの JSON が不正
    #[error("Failed to parse configuration: {0}")]
    ParseError(#[from] serde_json::Error),
}

/// 検証エラーを番号付きで整形
fn format_validation_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .enumerate()
        .map(|(i, err)| format!("  {}. {} - {}", i + 1, err.field_path, err.message))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Server settings (`.loco-i18n.json` / client settings).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LocoSettings {
    /// Loco API root (e.g., `https://localise.biz`)
    pub remote_url: Option<String>,
    /// Loco project key
    pub api_key: Option<String>,
    /// Locale the translations are read from and written to
    pub lang: Option<String>,

    /// Name of the translation function (`t("key")`)
    pub t_function_name: String,

    /// LSP `languageId`s that are scanned.
    pub target_languages: Vec<String>,
    /// Globs relative to the workspace root
    pub exclude_patterns: Vec<String>,

    /// Existence checks only, or full translations
    pub cache_mode: CacheMode,

    /// インレイヒントを表示するか
    pub inlay_hints: bool,
    /// Max characters before truncation with ellipsis.
    pub inlay_hint_max_length: usize,
}

impl LocoSettings {
    /// # Errors
    /// - Invalid function name
    /// - Empty language list
    /// - Invalid glob pattern
    /// - Invalid remote URL
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        if !is_identifier(&self.t_function_name) {
            errors.push(ValidationError::new(
                "tFunctionName",
                format!(
                    "'{}' is not a valid identifier. Example: \"t\" or \"translate\"",
                    self.t_function_name
                ),
            ));
        }

        if self.target_languages.is_empty() {
            errors.push(ValidationError::new(
                "targetLanguages",
                "At least one language is required. Example: [\"typescript\", \"typescriptreact\"]",
            ));
        }

        for (index, pattern) in self.exclude_patterns.iter().enumerate() {
            if let Err(e) = globset::Glob::new(pattern) {
                errors.push(ValidationError::new(
                    format!("excludePatterns[{index}]"),
                    format!("Invalid glob pattern '{pattern}': {e}"),
                ));
            }
        }

        if let Some(url) = self.remote_url.as_deref().map(str::trim).filter(|url| !url.is_empty())
        {
            match reqwest::Url::parse(url) {
                Ok(parsed) if matches!(parsed.scheme(), "http" | "https") => {}
                Ok(parsed) => errors.push(ValidationError::new(
                    "remoteUrl",
                    format!("Unsupported scheme '{}'. Use http or https", parsed.scheme()),
                )),
                Err(e) => errors.push(ValidationError::new(
                    "remoteUrl",
                    format!("Invalid URL '{url}': {e}"),
                )),
            }
        }

        if self.inlay_hint_max_length == 0 {
            errors.push(ValidationError::new(
                "inlayHintMaxLength",
                "The length must be greater than 0",
            ));
        }

        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }

    /// Connection settings for the remote store.
    ///
    /// # Errors
    /// `ConfigError::MissingSettings` when `remoteUrl`, `apiKey` or `lang` is
    /// unset or blank.
    pub fn remote_config(&self) -> Result<RemoteConfig, ConfigError> {
        RemoteConfig::new(self.remote_url.as_deref(), self.api_key.as_deref(), self.lang.as_deref())
    }
}

/// ECMAScript identifier check, limited to the ASCII-and-alphabetic subset
/// used for function names in practice.
fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    (first.is_alphabetic() || first == '_' || first == '$')
        && chars.all(|c| c.is_alphanumeric() || c == '_' || c == '$')
}

impl Default for LocoSettings {
    fn default() -> Self {
        Self {
            remote_url: None,
            api_key: None,
            lang: None,
            t_function_name: "t".to_string(),
            target_languages: ["javascript", "javascriptreact", "typescript", "typescriptreact"]
                .map(String::from)
                .to_vec(),
            exclude_patterns: vec!["**/node_modules/**".to_string()],
            cache_mode: CacheMode::default(),
            inlay_hints: true,
            inlay_hint_max_length: 40,
        }
    }
}
