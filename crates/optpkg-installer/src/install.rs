use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use tempfile::TempDir;
use tracing::debug;

use optpkg_core::{extract_archive, ArchiveKind};

use crate::fs_utils::{
    absolutize, copy_into_dir, copy_to_path, is_symlink, make_symlink, path_present, remove_path,
    set_mode, skip_container_dirs,
};
use crate::journal::{append_journal, OpKind};
use crate::layout::RootLayout;
use crate::path_link;
use crate::state::{AppSnapshot, AppState};
use crate::task::{FileOperation, Task, TaskReport, TaskSummary};
use crate::ValidationError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstallMode {
    /// First installation; requires a New application.
    Fresh,
    /// Update of an existing installation; requires Installed.
    Refresh,
}

/// Installs or updates an application from a set of input files.
///
/// Archives are extracted into the data directory, plain files and whole
/// directories are copied. Kept files are snapshotted to a scratch directory
/// before the tree is touched and restored afterwards, so they always win
/// over freshly supplied content at the same relative path.
#[derive(Debug)]
pub struct InstallTask {
    layout: RootLayout,
    app: AppSnapshot,
    mode: InstallMode,
    files: Vec<PathBuf>,
    keep: Vec<PathBuf>,
    delete_existing: bool,
}

impl InstallTask {
    pub fn install(
        layout: &RootLayout,
        app: &AppSnapshot,
        files: Vec<PathBuf>,
    ) -> Result<Self, ValidationError> {
        match app.state {
            AppState::New => {}
            AppState::Installed => {
                return Err(ValidationError::AlreadyInstalled(app.name.clone()))
            }
            AppState::Alias => return Err(ValidationError::IsAlias(app.name.clone())),
            AppState::Unmanaged => return Err(ValidationError::Unmanaged(app.name.clone())),
        }
        Self::build(layout, app, InstallMode::Fresh, files, Vec::new(), true)
    }

    pub fn update(
        layout: &RootLayout,
        app: &AppSnapshot,
        files: Vec<PathBuf>,
        keep: Vec<PathBuf>,
        delete_existing: bool,
    ) -> Result<Self, ValidationError> {
        match app.state {
            AppState::Installed => {}
            AppState::New => return Err(ValidationError::NotInstalled(app.name.clone())),
            AppState::Alias => return Err(ValidationError::IsAlias(app.name.clone())),
            AppState::Unmanaged => return Err(ValidationError::Unmanaged(app.name.clone())),
        }
        Self::build(layout, app, InstallMode::Refresh, files, keep, delete_existing)
    }

    fn build(
        layout: &RootLayout,
        app: &AppSnapshot,
        mode: InstallMode,
        files: Vec<PathBuf>,
        keep: Vec<PathBuf>,
        delete_existing: bool,
    ) -> Result<Self, ValidationError> {
        if files.is_empty() {
            return Err(ValidationError::NoInputFiles);
        }

        let mut abs_files = Vec::with_capacity(files.len());
        for file in files {
            let abs = absolutize(&file);
            if !abs.exists() {
                return Err(ValidationError::MissingFile(abs));
            }
            abs_files.push(abs);
        }

        let mut abs_keep = Vec::with_capacity(keep.len());
        for path in keep {
            let abs = absolutize(&path);
            if !path_present(&abs) {
                return Err(ValidationError::MissingFile(abs));
            }
            if !abs.starts_with(&app.app_dir) {
                return Err(ValidationError::ForeignPath {
                    name: app.name.clone(),
                    path: abs,
                });
            }
            abs_keep.push(abs);
        }

        Ok(Self {
            layout: layout.clone(),
            app: app.clone(),
            mode,
            files: abs_files,
            keep: abs_keep,
            delete_existing,
        })
    }

    pub fn mode(&self) -> InstallMode {
        self.mode
    }

    fn op_kind(&self) -> OpKind {
        match self.mode {
            InstallMode::Fresh => OpKind::Install,
            InstallMode::Refresh => OpKind::Update,
        }
    }

    /// Copies every kept file or folder into a scratch directory, preserving
    /// its path relative to the public application directory.
    fn snapshot_keeps(&self) -> Result<Option<(TempDir, Vec<PathBuf>)>> {
        if self.keep.is_empty() {
            return Ok(None);
        }

        let staging =
            TempDir::new().context("failed to create scratch directory for kept files")?;
        let mut rels = Vec::with_capacity(self.keep.len());
        for keep in &self.keep {
            let rel = keep
                .strip_prefix(&self.app.app_dir)
                .with_context(|| format!("kept path left the application: {}", keep.display()))?
                .to_path_buf();
            copy_to_path(keep, &staging.path().join(&rel))?;
            debug!("kept file staged: {}", keep.display());
            rels.push(rel);
        }
        Ok(Some((staging, rels)))
    }
}

impl Task for InstallTask {
    fn summary(&self) -> TaskSummary {
        let action = match self.mode {
            InstallMode::Fresh => "install",
            InstallMode::Refresh => "update",
        };
        let mut summary = TaskSummary::new(action, &self.app.name)
            .detail("Symlink", self.app.app_dir.display().to_string())
            .detail("Data Folder", self.app.install_dir.display().to_string());
        for file in &self.files {
            summary = summary.detail("File", file.display().to_string());
        }
        for keep in &self.keep {
            summary = summary.detail("Keep", keep.display().to_string());
        }
        if self.mode == InstallMode::Refresh {
            summary = summary.detail("Delete", self.delete_existing.to_string());
        }
        summary
    }

    fn preview(&self) -> Vec<FileOperation> {
        let mut operations = Vec::with_capacity(self.files.len() + 1);
        for file in &self.files {
            if ArchiveKind::is_archive(file) {
                operations.push(FileOperation::copy(file, &self.app.install_dir));
            } else {
                let dest = match file.file_name() {
                    Some(name) => self.app.install_dir.join(name),
                    None => self.app.install_dir.clone(),
                };
                operations.push(FileOperation::copy(file, dest));
            }
        }
        operations.push(FileOperation::link(&self.app.install_dir, &self.app.app_dir));
        operations
    }

    fn execute(&self) -> Result<TaskReport> {
        let mut report = TaskReport::new();
        let install_dir = &self.app.install_dir;

        let staged = self.snapshot_keeps()?;

        if self.delete_existing && path_present(install_dir) {
            debug!("removing existing data folder: {}", install_dir.display());
            remove_path(install_dir)?;
        }
        fs::create_dir_all(install_dir)
            .with_context(|| format!("failed to create {}", install_dir.display()))?;

        for file in &self.files {
            if let Some(kind) = ArchiveKind::detect(file) {
                debug!("extracting {} ({})", file.display(), kind.as_str());
                extract_archive(file, install_dir, kind)?;
            } else {
                debug!("copying {}", file.display());
                copy_into_dir(file, install_dir)?;
            }
        }
        append_journal(&self.layout, &self.app.name, self.op_kind(), install_dir)?;
        report.created.push(install_dir.clone());

        // The public symlink descends through redundant single-entry wrapper
        // directories that many archives carry around their payload.
        if is_symlink(&self.app.app_dir) {
            fs::remove_file(&self.app.app_dir)
                .with_context(|| format!("failed to unlink {}", self.app.app_dir.display()))?;
        }
        let payload = skip_container_dirs(install_dir);
        make_symlink(&payload, &self.app.app_dir)?;
        append_journal(&self.layout, &self.app.name, self.op_kind(), &self.app.app_dir)?;
        report.created.push(self.app.app_dir.clone());

        // Kept files are restored last so they win over anything the fresh
        // copy or extraction placed at the same relative path.
        if let Some((staging, rels)) = staged {
            for rel in rels {
                copy_to_path(&staging.path().join(&rel), &self.app.app_dir.join(&rel))?;
            }
        }

        set_mode(install_dir, 0o755)?;

        if self.mode == InstallMode::Fresh {
            path_link::auto_link(&self.layout, &self.app, &self.files, &mut report)?;
        }

        Ok(report)
    }
}
