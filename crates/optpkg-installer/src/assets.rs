use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::fs_utils::{absolutize, set_mode};
use crate::journal::{append_journal, OpKind};
use crate::layout::RootLayout;
use crate::state::{AppSnapshot, AppState};
use crate::task::{FileOperation, Task, TaskReport, TaskSummary};
use crate::ValidationError;

// Desktop entries and completion scripts follow the same thin pattern as
// install: copy, fix the mode, journal the destination. No state machine.

fn validated_asset_files(
    app: &AppSnapshot,
    files: Vec<PathBuf>,
) -> Result<Vec<PathBuf>, ValidationError> {
    if app.state == AppState::Unmanaged {
        return Err(ValidationError::Unmanaged(app.name.clone()));
    }
    if files.is_empty() {
        return Err(ValidationError::NoInputFiles);
    }

    let mut abs_files = Vec::with_capacity(files.len());
    for file in files {
        let abs = absolutize(&file);
        if !abs.is_file() {
            return Err(ValidationError::MissingFile(abs));
        }
        abs_files.push(abs);
    }
    Ok(abs_files)
}

fn install_asset(
    layout: &RootLayout,
    name: &str,
    op: OpKind,
    src: &Path,
    dst_dir: &Path,
    mode: u32,
    report: &mut TaskReport,
) -> Result<()> {
    let Some(base) = src.file_name() else {
        report.warn(format!("skipping path without file name: {}", src.display()));
        return Ok(());
    };

    fs::create_dir_all(dst_dir)
        .with_context(|| format!("failed to create {}", dst_dir.display()))?;
    let dst = dst_dir.join(base);
    fs::copy(src, &dst)
        .with_context(|| format!("failed to copy {} to {}", src.display(), dst.display()))?;
    set_mode(&dst, mode)?;
    append_journal(layout, name, op, &dst)?;
    report.created.push(dst);
    Ok(())
}

/// Installs menu entries: `.desktop` files and `.png` icons.
#[derive(Debug)]
pub struct DesktopEntryTask {
    layout: RootLayout,
    app: AppSnapshot,
    files: Vec<PathBuf>,
}

impl DesktopEntryTask {
    pub fn new(
        layout: &RootLayout,
        app: &AppSnapshot,
        files: Vec<PathBuf>,
    ) -> Result<Self, ValidationError> {
        let files = validated_asset_files(app, files)?;
        Ok(Self {
            layout: layout.clone(),
            app: app.clone(),
            files,
        })
    }

    fn dest_for(&self, file: &Path) -> Option<(PathBuf, u32)> {
        let name = file.file_name()?.to_str()?;
        if name.ends_with(".desktop") {
            Some((self.layout.desktop_dir().to_path_buf(), 0o755))
        } else if name.ends_with(".png") {
            Some((self.layout.icon_dir().to_path_buf(), 0o644))
        } else {
            None
        }
    }
}

impl Task for DesktopEntryTask {
    fn summary(&self) -> TaskSummary {
        let mut summary = TaskSummary::new("menu", &self.app.name);
        for file in &self.files {
            summary = summary.detail("File", file.display().to_string());
        }
        summary
    }

    fn preview(&self) -> Vec<FileOperation> {
        self.files
            .iter()
            .filter_map(|file| {
                let (dir, _) = self.dest_for(file)?;
                let base = file.file_name()?;
                Some(FileOperation::copy(file, dir.join(base)))
            })
            .collect()
    }

    fn execute(&self) -> Result<TaskReport> {
        let mut report = TaskReport::new();
        for file in &self.files {
            match self.dest_for(file) {
                Some((dir, mode)) => install_asset(
                    &self.layout,
                    &self.app.name,
                    OpKind::Desktop,
                    file,
                    &dir,
                    mode,
                    &mut report,
                )?,
                None => report.warn(format!("unsupported file format: {}", file.display())),
            }
        }
        Ok(report)
    }
}

/// Installs shell completion scripts into the autocomplete directory.
#[derive(Debug)]
pub struct AutocompleteTask {
    layout: RootLayout,
    app: AppSnapshot,
    files: Vec<PathBuf>,
}

impl AutocompleteTask {
    pub fn new(
        layout: &RootLayout,
        app: &AppSnapshot,
        files: Vec<PathBuf>,
    ) -> Result<Self, ValidationError> {
        let files = validated_asset_files(app, files)?;
        Ok(Self {
            layout: layout.clone(),
            app: app.clone(),
            files,
        })
    }
}

impl Task for AutocompleteTask {
    fn summary(&self) -> TaskSummary {
        let mut summary = TaskSummary::new("autocomplete", &self.app.name);
        for file in &self.files {
            summary = summary.detail("File", file.display().to_string());
        }
        summary
    }

    fn preview(&self) -> Vec<FileOperation> {
        self.files
            .iter()
            .filter_map(|file| {
                let base = file.file_name()?;
                Some(FileOperation::copy(
                    file,
                    self.layout.autocomplete_dir().join(base),
                ))
            })
            .collect()
    }

    fn execute(&self) -> Result<TaskReport> {
        let mut report = TaskReport::new();
        let dir = self.layout.autocomplete_dir().to_path_buf();
        for file in &self.files {
            install_asset(
                &self.layout,
                &self.app.name,
                OpKind::Autocomplete,
                file,
                &dir,
                0o644,
                &mut report,
            )?;
        }
        Ok(report)
    }
}
