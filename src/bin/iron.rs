use anyhow::{Context, Result};
use iron::{
    args::{resolve_destination, Args, CommandFactory, Commands, Generate, Parser},
    config::{Config, IronDirs},
    error, hint, success, trace,
    version::{BuildInfo, VersionFormat},
    Materializer,
};
use std::process::ExitCode;

fn load_config(args: &Args, dirs: &IronDirs) -> Result<Config> {
    let config = match args.config {
        Some(ref path) => Config::load(path, true, dirs.user_home())?,
        None => {
            dirs.ensure_config_dir()?;
            Config::load(&dirs.config_file(), false, dirs.user_home())?
        }
    };

    Ok(config.override_templates(std::env::var_os("IRON_TEMPLATES")))
}

fn generate(config: &Config, template: &str, project_name: &str) -> Result<()> {
    let cwd = std::env::current_dir().context("Failed to get current working directory")?;
    let destination = resolve_destination(&cwd, project_name)
        .with_context(|| format!("Invalid project path '{project_name}'"))?;

    let source = config.template_source();
    let summary = Materializer::new(source.as_ref()).materialize(template, &destination)?;

    trace!(
        "Created {} directories, rendered {} files and copied {} files",
        summary.dirs,
        summary.rendered,
        summary.copied
    );

    success!(
        "Successfully generated {template} project in '{}'",
        destination.display()
    );
    hint!("Navigate to your project:", "cd {}", destination.display());

    Ok(())
}

fn list(config: &Config, dirs: &IronDirs, short: bool) -> Result<()> {
    let names = config.template_source().names();

    if short {
        println!("{}", names.join(" "));
        return Ok(());
    }

    let origin = config
        .templates
        .as_deref()
        .map_or_else(|| "built-in".to_string(), |dir| dirs.shorten(dir));

    if names.is_empty() {
        iron::warn!("No templates available ({origin})");
        return Ok(());
    }

    println!("Available templates ({origin}):");
    for name in names {
        println!("    {name}");
    }

    Ok(())
}

fn app(args: &Args) -> Result<()> {
    let dirs = IronDirs::default_paths()?;

    trace!("Config directory: {}", dirs.config_dir().display());

    let config = load_config(args, &dirs)?;

    if args.no_color || !config.color {
        owo_colors::set_override(false);
    }

    match args.command {
        Commands::Generate { template: None } => {
            let mut cmd = Args::command();
            if let Some(generate) = cmd.find_subcommand_mut("generate") {
                generate.print_help()?;
            }
            Ok(())
        }
        Commands::Generate {
            template: Some(Generate::Oauth { ref project_name }),
        } => generate(&config, "oauth", project_name),
        Commands::Generate {
            template:
                Some(Generate::Template {
                    ref template_name,
                    ref project_name,
                }),
        } => generate(&config, template_name, project_name),
        Commands::Generate {
            template: Some(Generate::List { short }),
        } => list(&config, &dirs, short),
        Commands::Version { json, short } => {
            let info = BuildInfo::current();
            println!("{}", info.render(VersionFormat::from_flags(json, short))?);
            Ok(())
        }
    }
}

fn main() -> ExitCode {
    let args = Args::parse();

    match app(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}
