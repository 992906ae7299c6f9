use std::path::{Path, PathBuf};

pub use clap::{CommandFactory, Parser, Subcommand};
use path_absolutize::Absolutize;

#[derive(Parser, Debug)]
#[command(
    name = "iron",
    version,
    about = "CLI tool for scaffolding educational programming projects",
    long_about = "Iron helps students scaffold programming projects and focus on core learning \
while simplifying the bootstrap process.

Iron provides templates to generate common project structures, so that getting started \
does not require getting bogged down in setup and configuration.",
    disable_help_subcommand = true
)]
pub struct Args {
    /// Config file [default: ~/.iron/iron.conf]
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Never color the output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate code from templates
    #[command(long_about = "Generate code scaffolding from predefined templates.

Available templates:
  oauth   - OAuth authentication implementation")]
    Generate {
        #[command(subcommand)]
        template: Option<Generate>,
    },

    /// Print version information
    Version {
        /// Output version information in JSON format
        #[arg(short, long)]
        json: bool,

        /// Output only the version number
        #[arg(short, long, conflicts_with = "json")]
        short: bool,
    },
}

#[derive(Subcommand, Debug)]
pub enum Generate {
    /// Generate OAuth authentication boilerplate
    #[command(long_about = "Generate a complete OAuth authentication implementation including:
- OAuth providers configuration
- Authentication handlers
- Token management
- User sessions
- Example routes and middleware

Use \".\" as project-name to use the current working directory.")]
    Oauth {
        /// Name of the project, "." for the current directory
        project_name: String,
    },

    /// Generate a project from any available template
    Template {
        /// Name of the template
        template_name: String,

        /// Name of the project, "." for the current directory
        project_name: String,
    },

    /// List the available templates
    List {
        /// Only print the template names
        #[arg(long, short)]
        short: bool,
    },
}

/// Directory a project named `project_name` is generated in. `.` is `cwd`
/// itself, anything else is resolved against `cwd` and normalized.
///
/// # Errors
///
/// Returns an [`Err`] if the path can not be made absolute.
pub fn resolve_destination(cwd: &Path, project_name: &str) -> std::io::Result<PathBuf> {
    let path = if project_name == "." {
        cwd.to_path_buf()
    } else {
        cwd.join(project_name)
    };

    Ok(path.absolutize_from(cwd)?.into_owned())
}
