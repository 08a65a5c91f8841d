mod error;
mod models;
mod reference;
mod strings;

pub use error::{BlueprintError, BlueprintResult};
pub use models::*;
pub use reference::{BP_PREFIX, BlueprintRef, NONE_TEXT, is_none_text, strip_bp_prefix};
pub use strings::{DEFAULT_LOCALE, LanguageEntry, LocalizedStringFile};

use std::fs;
use std::path::Path;

use log::trace;
use serde::de::DeserializeOwned;

/// Decode a blueprint record from its JSON text.
///
/// Unrecognised `$type` discriminators decode to [`BlueprintData::Unknown`];
/// a known kind with missing required fields is an error.
pub fn decode_str(content: &str) -> BlueprintResult<Blueprint> {
    decode_json(content)
}

/// Decode a blueprint record from a `.jbp` file
pub fn decode_file(path: &Path) -> BlueprintResult<Blueprint> {
    trace!("Decoding blueprint {}", path.display());
    decode_json(&read_file(path)?)
}

/// Decode only the `AssetId` of a record, whatever its kind
pub fn decode_header(path: &Path) -> BlueprintResult<BlueprintHeader> {
    decode_json(&read_file(path)?)
}

/// Decode a localized string bundle from a `.json` file
pub fn decode_string_file(path: &Path) -> BlueprintResult<LocalizedStringFile> {
    trace!("Decoding string bundle {}", path.display());
    decode_json(&read_file(path)?)
}

fn read_file(path: &Path) -> BlueprintResult<String> {
    fs::read_to_string(path).map_err(|source| BlueprintError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn decode_json<T: DeserializeOwned>(content: &str) -> BlueprintResult<T> {
    // Unity-exported files sometimes carry a byte order mark
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);
    Ok(serde_json::from_str(content)?)
}
