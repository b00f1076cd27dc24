use anyhow::Result;
use tracing::debug;

use crate::fs_utils::{make_symlink, path_present, remove_path};
use crate::journal::{append_journal, OpKind};
use crate::layout::RootLayout;
use crate::state::{AppSnapshot, AppState};
use crate::task::{FileOperation, Task, TaskReport, TaskSummary};
use crate::ValidationError;

/// Creates a named indirection: the alias resolves through to the target
/// application's public directory instead of carrying its own data.
///
/// Aliases are immutable pointers as far as updates are concerned;
/// redirecting one means running this task again, which replaces the inner
/// symlink while the public symlink, once created, stays untouched.
#[derive(Debug)]
pub struct AliasTask {
    layout: RootLayout,
    alias: AppSnapshot,
    target: AppSnapshot,
}

impl AliasTask {
    pub fn new(
        layout: &RootLayout,
        alias: &AppSnapshot,
        target: &AppSnapshot,
    ) -> Result<Self, ValidationError> {
        if alias.name == target.name {
            return Err(ValidationError::AliasSelfReference(alias.name.clone()));
        }

        match alias.state {
            AppState::New | AppState::Alias => {}
            AppState::Installed => {
                return Err(ValidationError::AlreadyInstalled(alias.name.clone()))
            }
            AppState::Unmanaged => return Err(ValidationError::Unmanaged(alias.name.clone())),
        }

        match target.state {
            AppState::Installed | AppState::Alias => {}
            AppState::New => return Err(ValidationError::NotInstalled(target.name.clone())),
            AppState::Unmanaged => return Err(ValidationError::Unmanaged(target.name.clone())),
        }

        Ok(Self {
            layout: layout.clone(),
            alias: alias.clone(),
            target: target.clone(),
        })
    }
}

impl Task for AliasTask {
    fn summary(&self) -> TaskSummary {
        TaskSummary::new("alias", &self.alias.name)
            .detail("Symlink", self.alias.app_dir.display().to_string())
            .detail("Target Name", self.target.name.clone())
            .detail("Target Symlink", self.target.app_dir.display().to_string())
    }

    fn preview(&self) -> Vec<FileOperation> {
        let mut operations = vec![FileOperation::link(
            &self.target.app_dir,
            &self.alias.install_dir,
        )];
        if !path_present(&self.alias.app_dir) {
            operations.push(FileOperation::link(
                &self.alias.install_dir,
                &self.alias.app_dir,
            ));
        }
        operations
    }

    fn execute(&self) -> Result<TaskReport> {
        let mut report = TaskReport::new();

        // Replacing a previous alias only moves the inner indirection.
        if path_present(&self.alias.install_dir) {
            debug!(
                "replacing existing alias data path: {}",
                self.alias.install_dir.display()
            );
            remove_path(&self.alias.install_dir)?;
        }
        make_symlink(&self.target.app_dir, &self.alias.install_dir)?;
        append_journal(
            &self.layout,
            &self.alias.name,
            OpKind::Alias,
            &self.alias.install_dir,
        )?;
        report.created.push(self.alias.install_dir.clone());

        if !path_present(&self.alias.app_dir) {
            make_symlink(&self.alias.install_dir, &self.alias.app_dir)?;
            append_journal(
                &self.layout,
                &self.alias.name,
                OpKind::Alias,
                &self.alias.app_dir,
            )?;
            report.created.push(self.alias.app_dir.clone());
        }

        Ok(report)
    }
}
