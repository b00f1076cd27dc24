use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tempfile::TempDir;
use tracing::debug;

use optpkg_core::{extract_archive, ArchiveKind};

use crate::fs_utils::{
    absolutize, is_executable, make_symlink, remove_file_if_exists, skip_container_dirs,
    walk_files,
};
use crate::journal::{append_journal, OpKind};
use crate::layout::RootLayout;
use crate::state::{AppSnapshot, AppState};
use crate::task::{FileOperation, Task, TaskReport, TaskSummary};
use crate::ValidationError;

/// A planned bin-directory symlink: `bin_dir/link_name -> target`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathTarget {
    pub link_name: String,
    pub target: PathBuf,
}

/// Appends application executables to the global bin directory.
#[derive(Debug)]
pub struct PathLinkTask {
    layout: RootLayout,
    app: AppSnapshot,
    targets: Vec<PathTarget>,
}

impl PathLinkTask {
    pub fn new(
        layout: &RootLayout,
        app: &AppSnapshot,
        files: Vec<PathBuf>,
        command_name: Option<String>,
    ) -> Result<Self, ValidationError> {
        if app.state == AppState::Unmanaged {
            return Err(ValidationError::Unmanaged(app.name.clone()));
        }
        if files.is_empty() {
            return Err(ValidationError::NoInputFiles);
        }
        if command_name.is_some() && files.len() > 1 {
            return Err(ValidationError::TooManyFiles);
        }

        let mut targets = Vec::with_capacity(files.len());
        for file in files {
            let abs = absolutize(&file);
            if !abs.is_file() {
                return Err(ValidationError::MissingFile(abs));
            }
            if !abs.starts_with(&app.app_dir) {
                return Err(ValidationError::ForeignPath {
                    name: app.name.clone(),
                    path: abs,
                });
            }
            if !is_executable(&abs) {
                return Err(ValidationError::NotExecutable(abs));
            }

            let link_name = match &command_name {
                Some(name) => name.clone(),
                None => abs
                    .file_name()
                    .and_then(|name| name.to_str())
                    .ok_or_else(|| ValidationError::MissingFile(abs.clone()))?
                    .to_string(),
            };
            targets.push(PathTarget {
                link_name,
                target: abs,
            });
        }

        Ok(Self {
            layout: layout.clone(),
            app: app.clone(),
            targets,
        })
    }
}

impl Task for PathLinkTask {
    fn summary(&self) -> TaskSummary {
        let mut summary = TaskSummary::new("path", &self.app.name);
        for target in &self.targets {
            summary = summary.detail("File", target.target.display().to_string());
            summary = summary.detail("Command Name", target.link_name.clone());
        }
        summary
    }

    fn preview(&self) -> Vec<FileOperation> {
        self.targets
            .iter()
            .map(|target| {
                FileOperation::link(
                    &target.target,
                    self.layout.bin_dir().join(&target.link_name),
                )
            })
            .collect()
    }

    fn execute(&self) -> Result<TaskReport> {
        let mut report = TaskReport::new();
        for target in &self.targets {
            create_link(&self.layout, &self.app.name, target, &mut report)?;
        }
        Ok(report)
    }
}

/// Creates one bin symlink, tolerating a target that vanished or lost its
/// executable bit between preview and execute: that degrades to a warning.
fn create_link(
    layout: &RootLayout,
    name: &str,
    target: &PathTarget,
    report: &mut TaskReport,
) -> Result<()> {
    if !target.target.is_file() || !is_executable(&target.target) {
        report.warn(format!(
            "skipping path link '{}': target is missing or not executable: {}",
            target.link_name,
            target.target.display()
        ));
        return Ok(());
    }

    let dest = layout.bin_dir().join(&target.link_name);
    std::fs::create_dir_all(layout.bin_dir())
        .with_context(|| format!("failed to create {}", layout.bin_dir().display()))?;
    remove_file_if_exists(&dest)?;
    make_symlink(&target.target, &dest)?;
    append_journal(layout, name, OpKind::Path, &dest)?;
    report.created.push(dest);
    Ok(())
}

/// Install-time auto-detection: picks the most plausible executable among the
/// input files and links it. Finding nothing suitable is not an error.
pub(crate) fn auto_link(
    layout: &RootLayout,
    app: &AppSnapshot,
    input_files: &[PathBuf],
    report: &mut TaskReport,
) -> Result<()> {
    let Some(target) = detect_target(&app.name, &app.app_dir, input_files)? else {
        debug!("no executable path-link candidate for '{}'", app.name);
        return Ok(());
    };
    create_link(layout, &app.name, &target, report)
}

/// Ranks candidates by basename-matches-application-name first, then by
/// shorter path, then lexicographically.
fn rank_key(app_name: &str, path: &Path) -> (bool, usize, String) {
    let base = path
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or_default()
        .to_string();
    (
        !base.starts_with(app_name),
        path.as_os_str().len(),
        base,
    )
}

fn best_candidate<'a>(app_name: &str, candidates: &[&'a PathBuf]) -> Option<&'a PathBuf> {
    candidates
        .iter()
        .min_by_key(|path| rank_key(app_name, path))
        .copied()
}

fn detect_target(
    app_name: &str,
    app_dir: &Path,
    input_files: &[PathBuf],
) -> Result<Option<PathTarget>> {
    // Plain executable inputs end up directly under the data folder.
    let plain: Vec<&PathBuf> = input_files
        .iter()
        .filter(|file| !ArchiveKind::is_archive(file) && is_executable(file))
        .collect();
    if let Some(best) = best_candidate(app_name, &plain) {
        let Some(base) = best.file_name().and_then(|name| name.to_str()) else {
            return Ok(None);
        };
        return Ok(Some(PathTarget {
            link_name: base.to_string(),
            target: app_dir.join(base),
        }));
    }

    let archives: Vec<&PathBuf> = input_files
        .iter()
        .filter(|file| ArchiveKind::is_archive(file))
        .collect();
    let Some(best_archive) = best_candidate(app_name, &archives) else {
        return Ok(None);
    };
    peek_archive(app_name, app_dir, best_archive)
}

/// Extracts the archive into a scratch directory, skips wrapper directories,
/// and ranks the contained executables. The winner's relative path maps back
/// to its final on-disk location under the public application directory.
fn peek_archive(
    app_name: &str,
    app_dir: &Path,
    archive: &Path,
) -> Result<Option<PathTarget>> {
    let Some(kind) = ArchiveKind::detect(archive) else {
        return Ok(None);
    };

    let scratch = TempDir::new().context("failed to create scratch directory for archive peek")?;
    extract_archive(archive, scratch.path(), kind)?;
    let payload = skip_container_dirs(scratch.path());

    let files = walk_files(&payload)?;
    let executables: Vec<&PathBuf> = files.iter().filter(|file| is_executable(file)).collect();
    let Some(best) = best_candidate(app_name, &executables) else {
        return Ok(None);
    };

    let rel = best
        .strip_prefix(&payload)
        .with_context(|| format!("failed to relativize {}", best.display()))?;
    let Some(base) = best.file_name().and_then(|name| name.to_str()) else {
        return Ok(None);
    };
    Ok(Some(PathTarget {
        link_name: base.to_string(),
        target: app_dir.join(rel),
    }))
}
