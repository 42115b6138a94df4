//! CLI command implementations

pub mod completions;
pub mod init;
pub mod inspect;
pub mod render;
pub mod validate;
