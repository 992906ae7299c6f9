use anyhow::{bail, ensure, Context};
use derive_builder::Builder;
use directories::UserDirs;
use std::path::{Path, PathBuf};
use tera::Value;

use crate::{
    source::{DirectoryTemplates, EmbeddedTemplates, TemplateSource},
    trace,
    values::Values,
    warn,
};

/// Name of the configuration directory inside the user's home
pub const CONFIG_DIR: &str = ".iron";

/// Name of the configuration file inside [`CONFIG_DIR`]
pub const CONFIG_FILE: &str = "iron.conf";

#[derive(Builder, Debug, Clone)]
#[builder(setter(into))]
pub struct IronDirs {
    user_home: PathBuf,
    config_dir: PathBuf,
}

impl IronDirs {
    /// Create a new [`IronDirs`] builder
    #[must_use]
    pub fn builder() -> IronDirsBuilder {
        IronDirsBuilder::default()
    }

    /// Attempt to create a new [`IronDirs`] instance rooted at the user's
    /// home directory.
    ///
    /// # Errors
    ///
    /// Returns an [`Err`] if the user's home directory can not be found.
    pub fn default_paths() -> anyhow::Result<Self> {
        let home = Self::get_user_home()?;
        Ok(Self {
            config_dir: home.join(CONFIG_DIR),
            user_home: home,
        })
    }

    /// Returns the path for the user home `~/`
    ///
    /// # Errors
    ///
    /// Returns an [`Err`] if a path for the users home can not
    /// be found
    pub fn get_user_home() -> anyhow::Result<PathBuf> {
        Ok(UserDirs::new()
            .context("Failed to get user's home directory")?
            .home_dir()
            .to_owned())
    }

    /// Creates the configuration directory if it does not exist yet.
    ///
    /// # Errors
    ///
    /// Returns an [`Err`] if the path exists but is not a directory, or if
    /// any IO error occurs.
    pub fn ensure_config_dir(&self) -> anyhow::Result<()> {
        let dir = self.config_dir();

        if dir.is_dir() {
            trace!("Config directory {} already exists", dir.display());
            return Ok(());
        }

        ensure!(
            !dir.exists(),
            "Config path {} exists but is not a directory",
            dir.display()
        );

        let mut builder = std::fs::DirBuilder::new();
        builder.recursive(true);

        #[cfg(unix)]
        {
            use std::os::unix::fs::DirBuilderExt;
            builder.mode(0o750);
        }

        builder
            .create(dir)
            .with_context(|| format!("Failed to create {}", dir.display()))
    }

    /// Returns the default path of the configuration file.
    #[must_use]
    pub fn config_file(&self) -> PathBuf {
        self.config_dir.join(CONFIG_FILE)
    }

    /// Replaces the user home prefix of `path` with `~`.
    #[must_use]
    pub fn shorten(&self, path: &Path) -> String {
        match path.strip_prefix(self.user_home()) {
            Ok(rest) if rest.as_os_str().is_empty() => "~".to_string(),
            Ok(rest) => format!("~/{}", rest.display()),
            Err(_) => path.display().to_string(),
        }
    }

    /// Returns a reference to the user home of this [`IronDirs`].
    #[must_use]
    pub fn user_home(&self) -> &Path {
        self.user_home.as_path()
    }

    /// Returns a reference to the config directory of this [`IronDirs`].
    #[must_use]
    pub fn config_dir(&self) -> &Path {
        self.config_dir.as_path()
    }
}

/// Settings read from `iron.conf`.
///
/// None of them change how a template is materialized, only where
/// templates are read from and how the output looks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Colored output, when the terminal supports it
    pub color: bool,
    /// Directory of templates used instead of the ones built into `iron`
    pub templates: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            color: true,
            templates: None,
        }
    }
}

fn expand_home(path: &str, home: &Path) -> PathBuf {
    match path.strip_prefix('~') {
        Some("") => home.to_path_buf(),
        Some(rest) if rest.starts_with('/') => home.join(&rest[1..]),
        _ => PathBuf::from(path),
    }
}

impl Config {
    /// Reads the configuration at `path`. A missing file yields the default
    /// configuration unless `required` is set.
    ///
    /// # Errors
    ///
    /// Returns an [`Err`] if the file can not be read, does not parse, or
    /// sets a known key to a value of the wrong type.
    pub fn load(path: &Path, required: bool, home: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            if required {
                bail!("Config file {} does not exist", path.display());
            }

            trace!("No config at {}, using defaults", path.display());
            return Ok(Config::default());
        }

        trace!("Reading: {}", path.display());

        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;

        let values = Values::from_str(&contents, path)
            .with_context(|| format!("Failed to parse values from {}", path.display()))?;

        values
            .verify_types()
            .with_context(|| format!("Invalid types in {}", path.display()))?;

        Self::from_values(&values, home)
    }

    /// Picks the known keys out of `values`; unknown keys are reported and
    /// ignored.
    ///
    /// # Errors
    ///
    /// Returns an [`Err`] if a known key holds a value of the wrong type.
    pub fn from_values(values: &Values, home: &Path) -> anyhow::Result<Self> {
        let mut config = Config::default();

        let mut keys = values.keys().collect::<Vec<_>>();
        keys.sort_unstable();

        for key in keys {
            match (key, values.get(key)) {
                ("color", Some(Value::Bool(color))) => config.color = *color,
                ("templates", Some(Value::String(dir))) => {
                    config.templates = Some(expand_home(dir, home));
                }
                ("color", Some(v)) => bail!("`color` must be a Bool, found {v}"),
                ("templates", Some(v)) => bail!("`templates` must be a String, found {v}"),
                (key, _) => warn!("Unknown configuration key `{key}`, ignoring it"),
            }
        }

        Ok(config)
    }

    /// Lets `IRON_TEMPLATES` take precedence over the configuration file.
    #[must_use]
    pub fn override_templates(mut self, templates: Option<impl Into<PathBuf>>) -> Self {
        if let Some(templates) = templates {
            self.templates = Some(templates.into());
        }

        self
    }

    /// The template catalog selected by this configuration.
    #[must_use]
    pub fn template_source(&self) -> Box<dyn TemplateSource> {
        match &self.templates {
            Some(dir) => {
                trace!("Using templates from {}", dir.display());
                Box::new(DirectoryTemplates::new(dir))
            }
            None => Box::new(EmbeddedTemplates),
        }
    }
}
