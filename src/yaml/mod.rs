//! YAML helpers - diagnostics for metadata blocks

pub mod diagnostics;

pub use diagnostics::YamlSyntaxError;
