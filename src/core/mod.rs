//! Core module - the render and validate pipeline

pub mod config;
pub mod document;
pub mod engine;
pub mod normalize;
pub mod render;
pub mod resolver;
pub mod scaffold;
pub mod template;
pub mod value;

pub use config::Config;
pub use document::{split, DocumentError, MetadataBlock, Split};
pub use engine::{EngineError, EngineOptions, TemplateEngine, TeraEngine};
pub use normalize::normalize;
pub use render::{RenderError, Renderer};
pub use resolver::resolve;
pub use template::Template;
pub use value::{VariableSet, VariableType};
