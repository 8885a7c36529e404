use thiserror::Error;

use crate::types::{ChannelType, DuplicateChannel};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ChannelError {
    #[error("Malformed channel label '{label}': {reason}")]
    Parse { label: String, reason: String },

    #[error("Duplicate channel labels: {}", join_duplicates(.0))]
    DuplicateChannels(Vec<DuplicateChannel>),

    #[error("Mixed channel types in one batch: {}", join_types(.found))]
    HeterogeneousTypes { found: Vec<ChannelType> },
}

impl ChannelError {
    pub(crate) fn parse(label: &str, reason: impl Into<String>) -> Self {
        ChannelError::Parse {
            label: label.to_string(),
            reason: reason.into(),
        }
    }
}

fn join_duplicates(duplicates: &[DuplicateChannel]) -> String {
    duplicates
        .iter()
        .map(|d| d.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

fn join_types(types: &[ChannelType]) -> String {
    types
        .iter()
        .map(|t| t.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

pub type Result<T> = std::result::Result<T, ChannelError>;
