use std::{
    borrow::Cow,
    io,
    path::{Path, PathBuf},
};

use walkdir::WalkDir;

use super::{is_plain_name, TemplateEntry, TemplateSource};
use crate::error::{MaterializeError, Result};

/// A catalog on disk: every directory directly under `root` is a template.
#[derive(Debug, Clone)]
pub struct DirectoryTemplates {
    root: PathBuf,
}

impl DirectoryTemplates {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        DirectoryTemplates { root: root.into() }
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        self.root.as_path()
    }

    fn template_dir(&self, name: &str) -> Option<PathBuf> {
        let dir = self.root.join(name);
        (is_plain_name(name) && dir.is_dir()).then_some(dir)
    }
}

impl TemplateSource for DirectoryTemplates {
    fn names(&self) -> Vec<String> {
        let Ok(read_dir) = self.root.read_dir() else {
            crate::trace!("Template directory {} can not be read", self.root.display());
            return Vec::new();
        };

        let mut names = read_dir
            .filter_map(std::result::Result::ok)
            .filter(|e| e.file_type().is_ok_and(|t| t.is_dir()))
            .filter_map(|e| e.file_name().to_str().map(ToString::to_string))
            .collect::<Vec<_>>();
        names.sort();
        names
    }

    fn contains(&self, name: &str) -> bool {
        self.template_dir(name).is_some()
    }

    fn entries(&self, name: &str) -> Result<Vec<TemplateEntry>> {
        let root = self
            .template_dir(name)
            .ok_or_else(|| MaterializeError::TemplateNotFound(name.into()))?;

        let mut entries = Vec::new();

        for entry in WalkDir::new(&root).min_depth(1).sort_by_file_name() {
            let entry = entry.map_err(|e| {
                let path = e.path().unwrap_or(&root).to_path_buf();
                MaterializeError::io("walk template directory", path)(io::Error::from(e))
            })?;

            let relative = entry
                .path()
                .strip_prefix(&root)
                .unwrap_or(entry.path())
                .to_path_buf();

            if entry.file_type().is_dir() {
                entries.push(TemplateEntry::dir(relative));
            } else {
                entries.push(TemplateEntry::file(relative));
            }
        }

        Ok(entries)
    }

    fn read(&self, name: &str, path: &Path) -> Result<Cow<'_, [u8]>> {
        if !is_plain_name(name) {
            return Err(MaterializeError::TemplateNotFound(name.into()));
        }

        let full = self.root.join(name).join(path);

        std::fs::read(&full)
            .map(Cow::Owned)
            .map_err(MaterializeError::io("read template file", &full))
    }
}
