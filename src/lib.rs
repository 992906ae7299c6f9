pub mod args;
pub mod case;
pub mod config;
pub mod error;
pub mod log;
pub mod materialize;
pub mod placeholder;
pub mod source;
pub mod values;
pub mod version;

pub use error::MaterializeError;
pub use materialize::{Materializer, RenderContext, Summary};
pub use source::{DirectoryTemplates, EmbeddedTemplates, TemplateSource};
