//! Materialization of a template into a project directory.

use std::{
    ffi::{OsStr, OsString},
    fs,
    path::{Component, Path, PathBuf},
};

use crate::{
    case::{to_camel_case, to_kebab_case, to_snake_case},
    error::{MaterializeError, Result},
    placeholder::{self, Piece, PlaceholderError},
    source::TemplateSource,
    trace,
    values::token::location,
};

/// Suffix that hides a file from tooling while it lives in the catalog,
/// such as `go.mod.template`. It is stripped on output and the file is
/// never rendered.
pub const TEMPLATE_SUFFIX: &str = ".template";

/// Extensions of files rendered with the project name variants. Anything
/// else is copied as is.
pub const TEXT_EXTENSIONS: &[&str] = &["go", "mod", "yaml", "yml", "json", "md", "txt", "env"];

/// The project name variants available to templates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderContext {
    pub name: String,
    pub camel: String,
    pub snake: String,
    pub kebab: String,
}

impl RenderContext {
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();

        RenderContext {
            camel: to_camel_case(&name),
            snake: to_snake_case(&name),
            kebab: to_kebab_case(&name),
            name,
        }
    }

    /// Value of the placeholder `name`.
    #[must_use]
    pub fn lookup(&self, name: &str) -> Option<&str> {
        match name {
            "ProjectName" => Some(self.name.as_str()),
            "ProjectNameCamel" => Some(self.camel.as_str()),
            "ProjectNameSnake" => Some(self.snake.as_str()),
            "ProjectNameKebab" => Some(self.kebab.as_str()),
            _ => None,
        }
    }

    /// Replaces every placeholder in `contents`. `path` only names the
    /// template in errors.
    ///
    /// # Errors
    ///
    /// [`MaterializeError::TemplateSyntax`] if the contents are not UTF-8 or
    /// hold a malformed placeholder, [`MaterializeError::TemplateRender`] if
    /// they use anything but the four project name placeholders.
    pub fn render(&self, path: &Path, contents: &[u8]) -> Result<String> {
        let syntax = |source: PlaceholderError| MaterializeError::TemplateSyntax {
            path: path.to_path_buf(),
            source,
        };

        let text = std::str::from_utf8(contents).map_err(|_| syntax(PlaceholderError::NotUtf8))?;
        let pieces = placeholder::parse(text).map_err(syntax)?;

        let mut out = String::with_capacity(text.len());

        for piece in pieces {
            match piece {
                Piece::Text(chunk) => out.push_str(chunk),
                Piece::Placeholder { name, at } => {
                    let value = self.lookup(name).ok_or_else(|| MaterializeError::TemplateRender {
                        path: path.to_path_buf(),
                        source: PlaceholderError::Unknown {
                            name: name.to_string(),
                            at: location(text, at),
                        },
                    })?;
                    out.push_str(value);
                }
            }
        }

        Ok(out)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileAction {
    Render,
    Copy,
}

impl FileAction {
    /// Decides from the template file name, before the rename rule applies.
    #[must_use]
    pub fn for_path(path: &Path) -> Self {
        let Some(name) = path.file_name().and_then(OsStr::to_str) else {
            return FileAction::Copy;
        };

        if name.ends_with(TEMPLATE_SUFFIX) {
            return FileAction::Copy;
        }

        match extension(name) {
            Some(ext) if TEXT_EXTENSIONS.contains(&ext) => FileAction::Render,
            _ => FileAction::Copy,
        }
    }
}

/// Text after the last dot. Unlike [`Path::extension`], a dotfile such as
/// `.env` has the extension `env`.
fn extension(name: &str) -> Option<&str> {
    name.rfind('.').map(|i| &name[i + 1..])
}

fn strip_template_suffix(component: &OsStr) -> OsString {
    component
        .to_str()
        .and_then(|c| c.strip_suffix(TEMPLATE_SUFFIX))
        .filter(|c| !c.is_empty())
        .map_or_else(|| component.to_owned(), OsString::from)
}

/// Destination path of a template entry: [`TEMPLATE_SUFFIX`] is removed
/// from every component that ends with it.
#[must_use]
pub fn rename(relative: &Path) -> PathBuf {
    relative
        .components()
        .map(|c| match c {
            Component::Normal(name) => strip_template_suffix(name),
            other => other.as_os_str().to_owned(),
        })
        .collect()
}

/// Refuses anything but a missing path or an empty directory.
///
/// # Errors
///
/// [`MaterializeError::DestinationNotDirectory`],
/// [`MaterializeError::DestinationNotEmpty`], or an I/O error if the path
/// can not be inspected.
pub fn validate_destination(destination: &Path) -> Result<()> {
    let metadata = match fs::metadata(destination) {
        Ok(metadata) => metadata,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(()),
        Err(e) => return Err(MaterializeError::io("inspect destination", destination)(e)),
    };

    if !metadata.is_dir() {
        return Err(MaterializeError::DestinationNotDirectory(
            destination.to_path_buf(),
        ));
    }

    let mut entries = fs::read_dir(destination)
        .map_err(MaterializeError::io("read directory", destination))?;

    if entries.next().is_some() {
        return Err(MaterializeError::DestinationNotEmpty(
            destination.to_path_buf(),
        ));
    }

    Ok(())
}

fn create_dir_all(path: &Path) -> Result<()> {
    let mut builder = fs::DirBuilder::new();
    builder.recursive(true);

    #[cfg(unix)]
    {
        use std::os::unix::fs::DirBuilderExt;
        builder.mode(0o755);
    }

    builder
        .create(path)
        .map_err(MaterializeError::io("create directory", path))
}

/// What a successful run produced.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Summary {
    pub dirs: usize,
    pub rendered: usize,
    pub copied: usize,
}

impl Summary {
    #[must_use]
    pub fn files(&self) -> usize {
        self.rendered + self.copied
    }
}

/// Copies templates out of a [`TemplateSource`] into project directories.
pub struct Materializer<'s, S: TemplateSource + ?Sized> {
    source: &'s S,
}

impl<'s, S: TemplateSource + ?Sized> Materializer<'s, S> {
    pub fn new(source: &'s S) -> Self {
        Materializer { source }
    }

    /// Writes template `template` to `destination`, which must be missing or
    /// an empty directory. The project name is the last component of
    /// `destination`.
    ///
    /// Nothing is touched until the template and the destination have been
    /// validated. After that the first failure aborts the run and leaves
    /// what was already written in place.
    ///
    /// # Errors
    ///
    /// See [`MaterializeError`].
    pub fn materialize(&self, template: &str, destination: &Path) -> Result<Summary> {
        if !self.source.contains(template) {
            return Err(MaterializeError::TemplateNotFound(template.to_string()));
        }

        validate_destination(destination)?;

        let project_name = destination
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .ok_or_else(|| MaterializeError::UnnamedDestination(destination.to_path_buf()))?;

        let entries = self.source.entries(template)?;

        create_dir_all(destination)?;

        let context = RenderContext::new(project_name);
        trace!("Rendering '{template}' with {context:?}");

        let mut summary = Summary::default();

        for entry in entries {
            let target = destination.join(rename(&entry.path));

            if entry.is_dir() {
                trace!("mkdir {}", target.display());
                create_dir_all(&target)?;
                summary.dirs += 1;
                continue;
            }

            if let Some(parent) = target.parent() {
                create_dir_all(parent)?;
            }

            let contents = self.source.read(template, &entry.path)?;

            match FileAction::for_path(&entry.path) {
                FileAction::Render => {
                    trace!("render {} -> {}", entry.path.display(), target.display());
                    let rendered =
                        context.render(&Path::new(template).join(&entry.path), &contents)?;
                    fs::write(&target, rendered)
                        .map_err(MaterializeError::io("write file", &target))?;
                    summary.rendered += 1;
                }
                FileAction::Copy => {
                    trace!("copy {} -> {}", entry.path.display(), target.display());
                    fs::write(&target, &contents)
                        .map_err(MaterializeError::io("write file", &target))?;
                    summary.copied += 1;
                }
            }
        }

        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use walkdir::WalkDir;

    use super::*;
    use crate::source::{DirectoryTemplates, EmbeddedTemplates};

    fn files_under(root: &Path) -> BTreeSet<PathBuf> {
        WalkDir::new(root)
            .min_depth(1)
            .into_iter()
            .map(|e| e.unwrap())
            .map(|e| e.path().strip_prefix(root).unwrap().to_path_buf())
            .collect()
    }

    fn catalog(files: &[(&str, &str)]) -> (tempfile::TempDir, DirectoryTemplates) {
        let dir = tempfile::tempdir().unwrap();

        for (path, contents) in files {
            let path = dir.path().join(path);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(path, contents).unwrap();
        }

        let source = DirectoryTemplates::new(dir.path());
        (dir, source)
    }

    #[test]
    fn render_context_variants() {
        let context = RenderContext::new("My Cool App");

        assert_eq!(context.name, "My Cool App");
        assert_eq!(context.camel, "myCoolApp");
        assert_eq!(context.snake, "my_cool_app");
        assert_eq!(context.kebab, "my-cool-app");
    }

    #[test]
    fn renders_all_placeholders() {
        let context = RenderContext::new("my-app");
        let out = context
            .render(
                Path::new("x.md"),
                b"{{ProjectName}} {{ ProjectNameCamel }} {{ProjectNameSnake}} {{ProjectNameKebab}}",
            )
            .unwrap();

        assert_eq!(out, "my-app myApp my_app my-app");
    }

    #[test]
    fn render_errors() {
        let context = RenderContext::new("demo");

        assert!(matches!(
            context.render(Path::new("a.md"), b"{{ ProjectName "),
            Err(MaterializeError::TemplateSyntax { .. })
        ));
        assert!(matches!(
            context.render(Path::new("a.md"), b"{{ Unknown }}"),
            Err(MaterializeError::TemplateRender { .. })
        ));
        assert!(matches!(
            context.render(Path::new("a.md"), &[0xff, 0xfe]),
            Err(MaterializeError::TemplateSyntax { .. })
        ));
        assert!(matches!(
            context.render(Path::new("a.md"), b"{{ ProjectName }} {{ ProjectName | upper }}"),
            Err(MaterializeError::TemplateSyntax { .. })
        ));
    }

    #[test]
    fn other_braces_pass_through() {
        let context = RenderContext::new("demo");

        let go = "package main\n\nvar s = fmt.Sprintf(\"{%d}\", 1)\nvar t = T{}\nfunc f() { if x { return } }\n// {{ProjectName}}\n";
        assert_eq!(
            context.render(Path::new("main.go"), go.as_bytes()).unwrap(),
            go.replace("{{ProjectName}}", "demo")
        );

        let md = "# {{ProjectName}}\n\n## Setup {#setup}\n\nA lone { brace and }} {% raw %}\n";
        assert_eq!(
            context.render(Path::new("README.md"), md.as_bytes()).unwrap(),
            "# demo\n\n## Setup {#setup}\n\nA lone { brace and }} {% raw %}\n"
        );
    }

    #[test]
    fn template_errors_fit_on_one_line() {
        let context = RenderContext::new("demo");

        for contents in ["{{ ProjectName ", "# t\n{{ Unknown }}", "{{ 1 }}"] {
            let err = context
                .render(Path::new("oauth/README.md"), contents.as_bytes())
                .unwrap_err();
            let msg = format!("{:#}", anyhow::Error::from(err));

            assert_eq!(msg.lines().count(), 1, "{msg}");
            assert!(msg.contains("oauth/README.md"), "{msg}");
        }

        let err = context
            .render(Path::new("a.md"), b"# t\n{{ Unknown }}")
            .unwrap_err();
        assert_eq!(
            format!("{:#}", anyhow::Error::from(err)),
            "failed to render template 'a.md': unknown placeholder 'Unknown' at 2:1"
        );
    }

    #[test]
    fn file_actions() {
        for path in [
            "main.go", "go.mod", "a.yaml", "a.yml", "x.json", "README.md", "a.txt", ".env",
            "web/pages/home.go",
        ] {
            assert_eq!(FileAction::for_path(Path::new(path)), FileAction::Render, "{path}");
        }

        for path in [
            "go.mod.template",
            "go.sum.template",
            "README.md.template",
            "logo.png",
            "Makefile",
            "style.css",
            "README.MD",
        ] {
            assert_eq!(FileAction::for_path(Path::new(path)), FileAction::Copy, "{path}");
        }
    }

    #[test]
    fn rename_rule() {
        assert_eq!(rename(Path::new("go.mod.template")), Path::new("go.mod"));
        assert_eq!(rename(Path::new("a/go.sum.template")), Path::new("a/go.sum"));
        assert_eq!(rename(Path::new("cfg.template/x.txt")), Path::new("cfg/x.txt"));
        assert_eq!(rename(Path::new("a/.template")), Path::new("a/.template"));
        assert_eq!(rename(Path::new("a/b/main.go")), Path::new("a/b/main.go"));
        assert_eq!(rename(Path::new("templates/x")), Path::new("templates/x"));
    }

    #[test]
    fn oauth_into_empty_directory() {
        let tmp = tempfile::tempdir().unwrap();
        let destination = tmp.path().join("proj");
        fs::create_dir(&destination).unwrap();

        let summary = Materializer::new(&EmbeddedTemplates)
            .materialize("oauth", &destination)
            .unwrap();

        let expected = EmbeddedTemplates
            .entries("oauth")
            .unwrap()
            .into_iter()
            .map(|e| rename(&e.path))
            .collect::<BTreeSet<_>>();
        assert_eq!(files_under(&destination), expected);

        let go_mod = fs::read(destination.join("go.mod")).unwrap();
        let source = EmbeddedTemplates
            .read("oauth", Path::new("go.mod.template"))
            .unwrap();
        assert_eq!(go_mod, &*source);
        assert!(!destination.join("go.mod.template").exists());

        assert!(summary.rendered > 0);
        assert!(summary.copied >= 2);

        for entry in EmbeddedTemplates.entries("oauth").unwrap() {
            if !entry.is_dir() && FileAction::for_path(&entry.path) == FileAction::Render {
                let out = fs::read_to_string(destination.join(rename(&entry.path))).unwrap();
                assert!(!out.contains("{{"), "{}", entry.path.display());
            }
        }

        let readme = fs::read_to_string(destination.join("README.md")).unwrap();
        assert!(readme.contains("# proj"));
    }

    #[test]
    fn creates_missing_destination_with_parents() {
        let tmp = tempfile::tempdir().unwrap();
        let destination = tmp.path().join("nested/deeper/My Cool App");
        let (_catalog, source) = catalog(&[("web/README.md", "{{ProjectNameKebab}}")]);

        let summary = Materializer::new(&source)
            .materialize("web", &destination)
            .unwrap();

        assert_eq!(
            summary,
            Summary {
                dirs: 0,
                rendered: 1,
                copied: 0
            }
        );
        assert_eq!(
            fs::read_to_string(destination.join("README.md")).unwrap(),
            "my-cool-app"
        );
    }

    #[cfg(unix)]
    #[test]
    fn created_directories_are_owner_writable() {
        use std::os::unix::fs::PermissionsExt;

        let tmp = tempfile::tempdir().unwrap();
        let destination = tmp.path().join("proj");
        let (_catalog, source) = catalog(&[("web/src/main.go", "package main")]);

        Materializer::new(&source)
            .materialize("web", &destination)
            .unwrap();

        let mode = fs::metadata(destination.join("src"))
            .unwrap()
            .permissions()
            .mode();
        assert_eq!(mode & 0o700, 0o700);
    }

    #[test]
    fn markdown_placeholder_uses_destination_name() {
        let tmp = tempfile::tempdir().unwrap();
        let destination = tmp.path().join("demo");
        let (_catalog, source) = catalog(&[("web/docs/intro.md", "Welcome to {{ProjectName}}!")]);

        Materializer::new(&source)
            .materialize("web", &destination)
            .unwrap();

        assert_eq!(
            fs::read_to_string(destination.join("docs/intro.md")).unwrap(),
            "Welcome to demo!"
        );
    }

    #[test]
    fn verbatim_files_keep_placeholders() {
        let tmp = tempfile::tempdir().unwrap();
        let destination = tmp.path().join("demo");
        let (_catalog, source) = catalog(&[
            ("web/go.mod.template", "module {{ProjectName}}"),
            ("web/index.html", "<h1>{{ProjectName}}</h1>"),
            ("web/.env", "APP={{ProjectNameSnake}}"),
        ]);

        let summary = Materializer::new(&source)
            .materialize("web", &destination)
            .unwrap();

        assert_eq!(summary.copied, 2);
        assert_eq!(summary.rendered, 1);
        assert_eq!(
            fs::read_to_string(destination.join("go.mod")).unwrap(),
            "module {{ProjectName}}"
        );
        assert_eq!(
            fs::read_to_string(destination.join("index.html")).unwrap(),
            "<h1>{{ProjectName}}</h1>"
        );
        assert_eq!(
            fs::read_to_string(destination.join(".env")).unwrap(),
            "APP=demo"
        );
    }

    #[test]
    fn refuses_non_empty_destination() {
        let tmp = tempfile::tempdir().unwrap();
        let destination = tmp.path().join("proj");
        fs::create_dir(&destination).unwrap();
        fs::write(destination.join("existing.txt"), "keep me").unwrap();

        let err = Materializer::new(&EmbeddedTemplates)
            .materialize("oauth", &destination)
            .unwrap_err();

        assert!(matches!(err, MaterializeError::DestinationNotEmpty(ref p) if p == &destination));
        assert_eq!(
            files_under(&destination),
            BTreeSet::from([PathBuf::from("existing.txt")])
        );
        assert_eq!(
            fs::read_to_string(destination.join("existing.txt")).unwrap(),
            "keep me"
        );
    }

    #[test]
    fn refuses_file_destination() {
        let tmp = tempfile::tempdir().unwrap();
        let destination = tmp.path().join("proj");
        fs::write(&destination, "a file").unwrap();

        let err = Materializer::new(&EmbeddedTemplates)
            .materialize("oauth", &destination)
            .unwrap_err();

        assert!(matches!(err, MaterializeError::DestinationNotDirectory(_)));
        assert_eq!(fs::read_to_string(&destination).unwrap(), "a file");
    }

    #[test]
    fn unknown_template_touches_nothing() {
        let tmp = tempfile::tempdir().unwrap();
        let destination = tmp.path().join("proj");

        let err = Materializer::new(&EmbeddedTemplates)
            .materialize("graphql", &destination)
            .unwrap_err();

        assert!(matches!(err, MaterializeError::TemplateNotFound(ref t) if t == "graphql"));
        assert!(!destination.exists());
        assert_eq!(err.to_string(), "template 'graphql' not found");
    }

    #[test]
    fn destination_without_a_name() {
        let tmp = tempfile::tempdir().unwrap();
        let destination = tmp.path().join("missing/..");
        let (_catalog, source) = catalog(&[("web/a.txt", "")]);

        let err = Materializer::new(&source)
            .materialize("web", &destination)
            .unwrap_err();

        assert!(matches!(err, MaterializeError::UnnamedDestination(_)));
        assert!(!tmp.path().join("missing").exists());
    }

    #[test]
    fn syntax_error_aborts_and_keeps_partial_output() {
        let tmp = tempfile::tempdir().unwrap();
        let destination = tmp.path().join("proj");
        let (_catalog, source) = catalog(&[
            ("web/a.txt", "fine {{ProjectName}}"),
            ("web/b.md", "broken {{ ProjectName"),
            ("web/c.txt", "never written"),
        ]);

        let err = Materializer::new(&source)
            .materialize("web", &destination)
            .unwrap_err();

        assert!(
            matches!(err, MaterializeError::TemplateSyntax { ref path, .. } if path == Path::new("web/b.md"))
        );
        assert_eq!(
            fs::read_to_string(destination.join("a.txt")).unwrap(),
            "fine proj"
        );
        assert!(!destination.join("c.txt").exists());
    }
}
