//! Interchange formats: the JSON baseline, the TSV edit sheet and the GUID list

mod baseline;
mod guids;
pub mod tsv;

pub use baseline::*;
pub use guids::*;
pub use tsv::{TSV_EXTENSION, parse_tsv, read_tsv, tsv_string, write_tsv};
