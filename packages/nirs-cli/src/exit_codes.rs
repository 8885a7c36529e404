//! Process exit codes shared by all subcommands.

pub const SUCCESS: i32 = 0;
/// Bad arguments, missing label source, unreadable label file
pub const INPUT_ERROR: i32 = 1;
/// Serialization or write failure
pub const EXECUTION_ERROR: i32 = 2;
/// Malformed, duplicate or mixed-type channel labels
pub const INVALID_CHANNELS: i32 = 3;
/// Validation warnings while running with --deny-warnings
pub const WARNINGS_DENIED: i32 = 4;
/// Some files in a batch failed
pub const PARTIAL_FAILURE: i32 = 5;
