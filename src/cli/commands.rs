//! Command dispatch

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use clap::CommandFactory;
use clap_complete::{generate, Shell};
use tracing::{debug, instrument};

use crate::cli::args::{Cli, Commands, ConfigCommands};
use crate::cli::error::{CliError, CliResult};
use crate::cli::output;
use crate::config::{global_config_path, local_config_path, Settings};
use crate::domain::{audit, OrphanPolicy};
use crate::infrastructure::di::ServiceContainer;
use crate::infrastructure::InfraError;

pub fn execute_command(cli: &Cli) -> CliResult<()> {
    match &cli.command {
        Some(Commands::Build { file, output }) => cmd_build(cli, file, output.as_deref()),
        Some(Commands::Flatten { file, output }) => cmd_flatten(cli, file, output.as_deref()),
        Some(Commands::Tree { file }) => cmd_tree(cli, file),
        Some(Commands::Groups { file }) => cmd_groups(cli, file),
        Some(Commands::Get { file, id }) => cmd_get(cli, file, *id),
        Some(Commands::Children { file, group }) => cmd_children(cli, file, *group),
        Some(Commands::Check { file }) => cmd_check(cli, file),
        Some(Commands::Config { command }) => cmd_config(cli, command),
        Some(Commands::Completion { shell }) => cmd_completion(*shell),
        None => {
            Cli::command()
                .print_help()
                .map_err(|e| InfraError::io("print help", e))?;
            Ok(())
        }
    }
}

fn config_dir(cli: &Cli) -> CliResult<PathBuf> {
    match &cli.dir {
        Some(dir) => Ok(dir.clone()),
        None => std::env::current_dir()
            .map_err(|e| CliError::from(InfraError::io("get current directory", e))),
    }
}

fn load_settings(cli: &Cli) -> CliResult<Settings> {
    let dir = config_dir(cli)?;
    let mut settings = Settings::load(Some(dir.as_path()))?;
    if let Some(orphans) = cli.orphans {
        settings.orphans = orphans;
    }
    debug!("settings: {:?}", settings);
    Ok(settings)
}

fn create_container(cli: &Cli) -> CliResult<ServiceContainer> {
    Ok(ServiceContainer::new(load_settings(cli)?))
}

/// Write data to stdout.
fn emit(content: &str) -> CliResult<()> {
    let mut stdout = io::stdout().lock();
    writeln!(stdout, "{}", content).map_err(|e| InfraError::io("write stdout", e))?;
    Ok(())
}

fn emit_or_write(container: &ServiceContainer, out: Option<&Path>, json: &str) -> CliResult<()> {
    match out {
        Some(path) => {
            container.items.write(path, json)?;
            output::action("Written", &path.display());
            Ok(())
        }
        None => emit(json),
    }
}

#[instrument(skip(cli))]
fn cmd_build(cli: &Cli, file: &Path, out: Option<&Path>) -> CliResult<()> {
    let container = create_container(cli)?;
    let items = container.items.load(file)?;
    if container.settings.orphans == OrphanPolicy::Drop {
        let report = audit(&items);
        if !report.orphans.is_empty() {
            output::warning(&format!(
                "dropping {} orphaned children: {:?}",
                report.orphans.len(),
                report.orphans
            ));
        }
    }
    let tree = container.items.build(&items)?;
    let json = container.items.to_json(&tree)?;
    emit_or_write(&container, out, &json)
}

#[instrument(skip(cli))]
fn cmd_flatten(cli: &Cli, file: &Path, out: Option<&Path>) -> CliResult<()> {
    let container = create_container(cli)?;
    let flat = container.items.flatten(file)?;
    let json = container.items.to_json(&flat)?;
    emit_or_write(&container, out, &json)
}

#[instrument(skip(cli))]
fn cmd_tree(cli: &Cli, file: &Path) -> CliResult<()> {
    let container = create_container(cli)?;
    emit(container.items.render(file)?.trim_end())
}

#[instrument(skip(cli))]
fn cmd_groups(cli: &Cli, file: &Path) -> CliResult<()> {
    let container = create_container(cli)?;
    let groups = container.items.groups(file)?;
    emit(&container.items.to_json(&groups)?)
}

#[instrument(skip(cli))]
fn cmd_get(cli: &Cli, file: &Path, id: i64) -> CliResult<()> {
    let container = create_container(cli)?;
    let item = container.items.item(file, id)?;
    emit(&container.items.to_json(&item)?)
}

#[instrument(skip(cli))]
fn cmd_children(cli: &Cli, file: &Path, group: i64) -> CliResult<()> {
    let container = create_container(cli)?;
    let children = container.items.children(file, group)?;
    emit(&container.items.to_json(&children)?)
}

#[instrument(skip(cli))]
fn cmd_check(cli: &Cli, file: &Path) -> CliResult<()> {
    let container = create_container(cli)?;
    let report = container.items.check(file)?;
    if report.is_clean() {
        output::success(&format!("{}: no problems found", file.display()));
        return Ok(());
    }
    for line in report.to_string().lines() {
        output::failure(line);
    }
    Err(CliError::DataErr(format!(
        "{}: inconsistent items",
        file.display()
    )))
}

fn cmd_config(cli: &Cli, command: &ConfigCommands) -> CliResult<()> {
    match command {
        ConfigCommands::Show => {
            let settings = load_settings(cli)?;
            emit(settings.to_toml()?.trim_end())
        }
        ConfigCommands::Template => emit(Settings::template().trim_end()),
        ConfigCommands::Path => {
            let global = global_config_path()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| "<unavailable>".to_string());
            let local = local_config_path(&config_dir(cli)?);
            emit(&format!("global: {}\nlocal:  {}", global, local.display()))
        }
    }
}

fn cmd_completion(shell: Shell) -> CliResult<()> {
    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();
    generate(shell, &mut cmd, name, &mut io::stdout());
    Ok(())
}
