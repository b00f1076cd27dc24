use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use clap_complete::Shell;

use optpkg_installer::{
    application_files, default_root, list_applications, resolve_app, AliasTask, AppState,
    AutocompleteTask, DesktopEntryTask, InstallTask, PathLinkTask, RemoveScope, RemoveTask,
    RootLayout, Task,
};

use crate::completion::write_completions_script;
use crate::prompt::confirm;
use crate::render::TerminalRenderer;

#[derive(Parser, Debug)]
#[command(name = "optpkg")]
#[command(about = "Manual application installer for a shared /opt tree", long_about = None)]
pub struct Cli {
    /// Application root to operate on, instead of OPTPKG_ROOT or /opt.
    #[arg(long, global = true, value_name = "DIR")]
    pub(crate) root: Option<PathBuf>,

    /// Answer yes to every confirmation prompt.
    #[arg(short = 'y', long = "yes", global = true)]
    pub(crate) assume_yes: bool,

    /// Show the planned changes without touching the filesystem.
    #[arg(short = 'n', long = "dry-run", global = true)]
    pub(crate) dry_run: bool,

    /// Enable debug logging.
    #[arg(short = 'v', long = "verbose", global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub(crate) command: Commands,
}

#[derive(Subcommand, Debug)]
pub(crate) enum Commands {
    /// Install a new application from archives, plain files, or directories.
    Install {
        name: String,
        #[arg(required = true, value_name = "FILE")]
        files: Vec<PathBuf>,
    },
    /// Replace or extend the files of an installed application.
    Update {
        name: String,
        #[arg(required = true, value_name = "FILE")]
        files: Vec<PathBuf>,
        /// Preserve these paths across the update, even when resupplied.
        #[arg(long = "keep", value_name = "PATH")]
        keep: Vec<PathBuf>,
        /// Delete the existing application data before applying new files.
        #[arg(long = "delete")]
        delete: bool,
    },
    /// Remove an application and every file it ever created.
    Remove {
        name: String,
        /// Remove even when the on-disk layout looks tampered with.
        #[arg(short = 'f', long)]
        force: bool,
        /// Only remove menu entries and icons.
        #[arg(long = "desktop-only", conflicts_with = "path_only")]
        desktop_only: bool,
        /// Only remove PATH symlinks.
        #[arg(long = "path-only")]
        path_only: bool,
    },
    /// Point an alias name at an installed application.
    Alias { name: String, target: String },
    /// Install menu entries (.desktop) and icons (.png) for an application.
    Menu {
        name: String,
        #[arg(required = true, value_name = "FILE")]
        files: Vec<PathBuf>,
    },
    /// Expose application executables on the PATH.
    Path {
        name: String,
        #[arg(required = true, value_name = "FILE")]
        files: Vec<PathBuf>,
        /// Name for the command, instead of the executable's own name.
        #[arg(long = "command", value_name = "NAME")]
        command_name: Option<String>,
    },
    /// Install shell completion scripts for an application.
    Autocomplete {
        name: String,
        #[arg(required = true, value_name = "FILE")]
        files: Vec<PathBuf>,
    },
    /// List managed applications, or the files of one application.
    List { name: Option<String> },
    /// Generate completions for this tool itself.
    Completions { shell: Shell },
}

pub fn run_cli(cli: Cli) -> Result<()> {
    let layout = RootLayout::new(cli.root.clone().unwrap_or_else(default_root));
    let renderer = TerminalRenderer::current();
    let assume_yes = cli.assume_yes;
    let dry_run = cli.dry_run;

    match cli.command {
        Commands::Install { name, files } => {
            let app = resolve_app(&layout, &name)?;
            let task = InstallTask::install(&layout, &app, files)?;
            run_task(renderer, &task, assume_yes, dry_run)?;
        }
        Commands::Update {
            name,
            files,
            keep,
            delete,
        } => {
            let app = resolve_app(&layout, &name)?;
            let task = InstallTask::update(&layout, &app, files, keep, delete)?;
            run_task(renderer, &task, assume_yes, dry_run)?;
        }
        Commands::Remove {
            name,
            force,
            desktop_only,
            path_only,
        } => {
            let scope = if desktop_only {
                RemoveScope::DesktopOnly
            } else if path_only {
                RemoveScope::PathOnly
            } else {
                RemoveScope::All
            };
            let app = resolve_app(&layout, &name)?;
            let task = RemoveTask::new(&layout, &app, scope, force)?;
            run_task(renderer, &task, assume_yes, dry_run)?;
        }
        Commands::Alias { name, target } => {
            let alias = resolve_app(&layout, &name)?;
            let target = resolve_app(&layout, &target)?;
            let task = AliasTask::new(&layout, &alias, &target)?;
            run_task(renderer, &task, assume_yes, dry_run)?;
        }
        Commands::Menu { name, files } => {
            let app = resolve_app(&layout, &name)?;
            let task = DesktopEntryTask::new(&layout, &app, files)?;
            run_task(renderer, &task, assume_yes, dry_run)?;
        }
        Commands::Path {
            name,
            files,
            command_name,
        } => {
            let app = resolve_app(&layout, &name)?;
            let task = PathLinkTask::new(&layout, &app, files, command_name)?;
            run_task(renderer, &task, assume_yes, dry_run)?;
        }
        Commands::Autocomplete { name, files } => {
            let app = resolve_app(&layout, &name)?;
            let task = AutocompleteTask::new(&layout, &app, files)?;
            run_task(renderer, &task, assume_yes, dry_run)?;
        }
        Commands::List { name } => run_list(&layout, name.as_deref())?,
        Commands::Completions { shell } => {
            let mut stdout = std::io::stdout();
            write_completions_script(shell, &mut stdout)?;
        }
    }

    Ok(())
}

/// Shared flow for every mutating command: summary, preview, confirmation,
/// execution, report. A dry run stops after the preview.
fn run_task(
    renderer: TerminalRenderer,
    task: &dyn Task,
    assume_yes: bool,
    dry_run: bool,
) -> Result<()> {
    renderer.print_summary(&task.summary());
    renderer.print_preview(&task.preview());
    if dry_run {
        return Ok(());
    }

    if !assume_yes && !confirm("Continue?")? {
        renderer.print_status("abort", "cancelled, nothing was changed");
        return Ok(());
    }

    let report = task.execute()?;
    renderer.print_report(&report);
    Ok(())
}

fn run_list(layout: &RootLayout, name: Option<&str>) -> Result<()> {
    match name {
        Some(name) => {
            let app = resolve_app(layout, name)?;
            match app.state {
                AppState::Alias => {
                    let target = app
                        .alias_target
                        .as_ref()
                        .map(|path| path.display().to_string())
                        .unwrap_or_default();
                    println!("{name}: alias -> {target}");
                }
                state => println!("{name}: {}", state.as_str()),
            }
            for file in application_files(layout, name)? {
                println!("  {}", file.display());
            }
        }
        None => {
            let listings = list_applications(layout)?;
            if listings.is_empty() {
                println!("No applications installed");
            }
            for entry in listings {
                println!("{} -> {}", entry.name, entry.target.display());
            }
        }
    }
    Ok(())
}
