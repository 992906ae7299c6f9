use std::{
    borrow::Cow,
    io,
    path::{Path, PathBuf},
};

use include_dir::{include_dir, Dir, DirEntry};

use super::{is_plain_name, TemplateEntry, TemplateSource};
use crate::error::{MaterializeError, Result};

static TEMPLATES: Dir<'static> = include_dir!("$CARGO_MANIFEST_DIR/templates");

/// The templates shipped inside the `iron` executable.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmbeddedTemplates;

impl EmbeddedTemplates {
    fn root(name: &str) -> Option<&'static Dir<'static>> {
        is_plain_name(name)
            .then(|| TEMPLATES.get_dir(name))
            .flatten()
    }
}

fn walk(dir: &Dir<'_>, root: &Path, out: &mut Vec<TemplateEntry>) {
    let mut children = dir.entries().iter().collect::<Vec<_>>();
    children.sort_by(|a, b| a.path().cmp(b.path()));

    for child in children {
        // Paths in the embedded tree are relative to `templates/`
        let relative = child
            .path()
            .strip_prefix(root)
            .unwrap_or(child.path())
            .to_path_buf();

        match child {
            DirEntry::Dir(d) => {
                out.push(TemplateEntry::dir(relative));
                walk(d, root, out);
            }
            DirEntry::File(_) => out.push(TemplateEntry::file(relative)),
        }
    }
}

impl TemplateSource for EmbeddedTemplates {
    fn names(&self) -> Vec<String> {
        let mut names = TEMPLATES
            .dirs()
            .map(|d| d.path().to_string_lossy().into_owned())
            .collect::<Vec<_>>();
        names.sort();
        names
    }

    fn contains(&self, name: &str) -> bool {
        Self::root(name).is_some()
    }

    fn entries(&self, name: &str) -> Result<Vec<TemplateEntry>> {
        let root =
            Self::root(name).ok_or_else(|| MaterializeError::TemplateNotFound(name.into()))?;

        let mut entries = Vec::new();
        walk(root, root.path(), &mut entries);
        Ok(entries)
    }

    fn read(&self, name: &str, path: &Path) -> Result<Cow<'_, [u8]>> {
        let full: PathBuf = Path::new(name).join(path);

        TEMPLATES
            .get_file(&full)
            .filter(|_| is_plain_name(name))
            .map(|f| Cow::Borrowed(f.contents()))
            .ok_or_else(|| {
                MaterializeError::io("read template file", &full)(io::Error::new(
                    io::ErrorKind::NotFound,
                    "no such file in the embedded templates",
                ))
            })
    }
}
