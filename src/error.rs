use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::placeholder::PlaceholderError;

pub type Result<T, E = MaterializeError> = std::result::Result<T, E>;

/// Everything that can stop a template from being materialized.
///
/// Nothing here is retried. The first error aborts the run and whatever
/// was already written to the destination stays there.
#[derive(Debug, Error)]
pub enum MaterializeError {
    #[error("template '{0}' not found")]
    TemplateNotFound(String),

    #[error("path '{}' exists but is not a directory", .0.display())]
    DestinationNotDirectory(PathBuf),

    #[error(
        "directory '{}' is not empty - cannot generate code in a non-empty directory",
        .0.display()
    )]
    DestinationNotEmpty(PathBuf),

    #[error("cannot derive a project name from '{}'", .0.display())]
    UnnamedDestination(PathBuf),

    #[error("failed to {action} '{}'", path.display())]
    Io {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse template '{}'", path.display())]
    TemplateSyntax {
        path: PathBuf,
        #[source]
        source: PlaceholderError,
    },

    #[error("failed to render template '{}'", path.display())]
    TemplateRender {
        path: PathBuf,
        #[source]
        source: PlaceholderError,
    },
}

impl MaterializeError {
    pub(crate) fn io(
        action: &'static str,
        path: impl AsRef<Path>,
    ) -> impl FnOnce(std::io::Error) -> Self {
        let path = path.as_ref().to_path_buf();
        move |source| MaterializeError::Io {
            action,
            path,
            source,
        }
    }
}
