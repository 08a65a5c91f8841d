pub mod types;
mod diff;
mod resolve;
mod writer;

pub use diff::{diff, diff_ability, fact_component_id};
pub use resolve::resolve_references;
pub use types::*;
pub use writer::{MANIFEST_FILE, PATCH_EXTENSION, PatchWriter, manifest_yaml, read_manifest, write_manifest};
