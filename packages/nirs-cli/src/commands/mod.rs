pub mod batch;
pub mod format;
pub mod parse;
pub mod validate;
