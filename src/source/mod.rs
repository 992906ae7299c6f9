//! Read-only template catalogs.
//!
//! A catalog holds one directory per template. The materializer only needs
//! to list a template's entries and read its files, so any backing store that
//! can do both works.

mod directory;
mod embedded;

use std::{
    borrow::Cow,
    path::{Component, Path, PathBuf},
};

pub use directory::DirectoryTemplates;
pub use embedded::EmbeddedTemplates;

use crate::error::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    Dir,
    File,
}

/// A directory or file inside a template, relative to the template root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateEntry {
    pub path: PathBuf,
    pub kind: EntryKind,
}

impl TemplateEntry {
    pub fn dir(path: impl Into<PathBuf>) -> Self {
        TemplateEntry {
            path: path.into(),
            kind: EntryKind::Dir,
        }
    }

    pub fn file(path: impl Into<PathBuf>) -> Self {
        TemplateEntry {
            path: path.into(),
            kind: EntryKind::File,
        }
    }

    #[must_use]
    pub fn is_dir(&self) -> bool {
        self.kind == EntryKind::Dir
    }
}

pub trait TemplateSource {
    /// Names of every template in the catalog, sorted.
    fn names(&self) -> Vec<String>;

    fn contains(&self, name: &str) -> bool;

    /// Every entry below the template root, depth first, parents before
    /// their children and siblings sorted by name. The root is not included.
    ///
    /// # Errors
    ///
    /// Returns [`crate::MaterializeError::TemplateNotFound`] for unknown
    /// templates, or an I/O error if the catalog can not be listed.
    fn entries(&self, name: &str) -> Result<Vec<TemplateEntry>>;

    /// Contents of the file at `path`, relative to the template root.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the file does not exist or can not be read.
    fn read(&self, name: &str, path: &Path) -> Result<Cow<'_, [u8]>>;
}

/// Template names are a single plain path component, so `../x` or `a/b`
/// never resolve to something outside the catalog root.
pub(crate) fn is_plain_name(name: &str) -> bool {
    let mut components = Path::new(name).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    )
}
