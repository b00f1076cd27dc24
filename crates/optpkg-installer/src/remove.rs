use std::collections::BTreeSet;
use std::path::PathBuf;

use anyhow::Result;
use tracing::debug;

use crate::fs_utils::{path_present, remove_path};
use crate::journal::{delete_journal, read_journal, OpKind};
use crate::layout::RootLayout;
use crate::state::{AppSnapshot, AppState};
use crate::task::{FileOperation, Task, TaskReport, TaskSummary};
use crate::ValidationError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoveScope {
    /// Everything: data, public symlink, every journaled path, all journals.
    All,
    /// Only files ever journaled under the desktop operation.
    DesktopOnly,
    /// Only files ever journaled under the path operation.
    PathOnly,
}

impl RemoveScope {
    fn op_kinds(self) -> Vec<OpKind> {
        match self {
            Self::All => OpKind::all().to_vec(),
            Self::DesktopOnly => vec![OpKind::Desktop],
            Self::PathOnly => vec![OpKind::Path],
        }
    }

    fn as_str(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::DesktopOnly => "desktop-only",
            Self::PathOnly => "path-only",
        }
    }
}

/// Removes an application: deletes every eligible journaled path, then the
/// journal files themselves.
#[derive(Debug)]
pub struct RemoveTask {
    layout: RootLayout,
    app: AppSnapshot,
    scope: RemoveScope,
    force: bool,
}

impl RemoveTask {
    pub fn new(
        layout: &RootLayout,
        app: &AppSnapshot,
        scope: RemoveScope,
        force: bool,
    ) -> Result<Self, ValidationError> {
        match app.state {
            AppState::New => return Err(ValidationError::NotInstalled(app.name.clone())),
            AppState::Unmanaged if !force => {
                return Err(ValidationError::Unmanaged(app.name.clone()))
            }
            _ => {}
        }
        Ok(Self {
            layout: layout.clone(),
            app: app.clone(),
            scope,
            force,
        })
    }

    /// Paths eligible for deletion: the deduplicated union of the in-scope
    /// journals, plus the application pair itself for a full removal. A path
    /// qualifies if it exists or is a dangling symlink.
    fn targets(&self) -> Result<BTreeSet<PathBuf>> {
        let mut targets = BTreeSet::new();
        for op in self.scope.op_kinds() {
            targets.extend(read_journal(&self.layout, &self.app.name, op)?);
        }
        if self.scope == RemoveScope::All {
            for path in [&self.app.install_dir, &self.app.app_dir] {
                if path_present(path) {
                    targets.insert(path.clone());
                }
            }
        }
        Ok(targets)
    }
}

impl Task for RemoveTask {
    fn summary(&self) -> TaskSummary {
        let mut summary = TaskSummary::new("remove", &self.app.name)
            .detail("Symlink", self.app.app_dir.display().to_string())
            .detail("State", self.app.state.as_str().to_string())
            .detail("Scope", self.scope.as_str().to_string());
        if self.force {
            summary = summary.detail("Force", "true".to_string());
        }
        summary
    }

    fn preview(&self) -> Vec<FileOperation> {
        self.targets()
            .map(|targets| {
                targets
                    .into_iter()
                    .map(|path| FileOperation::copy(path.clone(), path))
                    .collect()
            })
            .unwrap_or_default()
    }

    fn execute(&self) -> Result<TaskReport> {
        let mut report = TaskReport::new();
        for path in self.targets()? {
            if remove_path(&path)? {
                debug!("removed {}", path.display());
                report.deleted.push(path);
            }
        }
        for op in self.scope.op_kinds() {
            if delete_journal(&self.layout, &self.app.name, op)? {
                debug!("deleted {} journal for '{}'", op.as_str(), self.app.name);
            }
        }
        Ok(report)
    }
}
