//! Schema system - variable definitions, metadata shape checks and validation

pub mod definition;
pub mod shape;
pub mod validator;

pub use definition::{SchemaError, ValidationRules, VariableDefinition, VariableSchema};
pub use shape::{check_metadata, MetadataError};
pub use validator::{validate, ValidationError, ValidationErrorKind, ValidationResult};
