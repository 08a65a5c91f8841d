use std::path::PathBuf;

use thiserror::Error;

/// Errors produced while decoding blueprint and string bundle files
#[derive(Debug, Error)]
pub enum BlueprintError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to decode record")]
    Json(#[from] serde_json::Error),

    #[error("String bundle {key} has no text for locale {locale}")]
    MissingLocale { key: String, locale: String },
}

pub type BlueprintResult<T> = Result<T, BlueprintError>;
