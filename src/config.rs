//! Server configuration: workspace file, client settings and validation.

/// Config file loader
mod loader;
/// Configuration manager
mod manager;
/// Document filter
mod matcher;
/// Configuration types and settings
mod types;

pub use loader::CONFIG_FILE_NAME;
pub use manager::{
    ConfigManager,
    SETTINGS_SECTION,
};
pub use matcher::{
    DocumentFilter,
    MatcherError,
};
pub use types::{
    ConfigError,
    LocoSettings,
    ValidationError,
};
