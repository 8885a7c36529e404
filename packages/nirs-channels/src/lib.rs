//! Channel label codec for fNIRS montages.
//!
//! Labels name one optode pair and one measurement, e.g. `S1D2WL685` for
//! source 1, detector 2 at 685 nm, or `S3D1HbR` for deoxy-hemoglobin.
//! This crate decodes them, writes them back in canonical form, and checks a
//! whole batch for duplicates, mixed channel types and incomplete optode
//! pairs.

pub mod error;
pub mod parser;
pub mod types;
pub mod validate;

pub use error::{ChannelError, Result};
pub use parser::{
    canonicalize_label, format_channel_label, parse_channel_label, parse_channel_labels,
};
pub use types::*;
pub use validate::{
    check_pair_consistency, find_duplicate_channels, resolve_channel_type, validate_channel_batch,
};
