use std::path::PathBuf;

use anyhow::Result;
use tracing::warn;

use crate::fs_utils::path_present;

/// One planned filesystem operation, used only for previews.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileOperation {
    pub source: PathBuf,
    pub dest: PathBuf,
    /// True when the operation creates a symlink rather than copying data.
    pub alias_like: bool,
}

impl FileOperation {
    pub fn copy(source: impl Into<PathBuf>, dest: impl Into<PathBuf>) -> Self {
        Self {
            source: source.into(),
            dest: dest.into(),
            alias_like: false,
        }
    }

    pub fn link(target: impl Into<PathBuf>, link: impl Into<PathBuf>) -> Self {
        Self {
            source: target.into(),
            dest: link.into(),
            alias_like: true,
        }
    }

    /// Overwrite detection: something already occupies the destination.
    pub fn replaces_existing(&self) -> bool {
        path_present(&self.dest)
    }
}

/// Human-previewable description of a task, rendered before confirmation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskSummary {
    pub action: &'static str,
    pub name: String,
    pub details: Vec<(String, String)>,
}

impl TaskSummary {
    pub fn new(action: &'static str, name: impl Into<String>) -> Self {
        Self {
            action,
            name: name.into(),
            details: Vec::new(),
        }
    }

    pub fn detail(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.details.push((key.into(), value.into()));
        self
    }
}

/// What a task actually did. Warnings are non-fatal execution hiccups.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct TaskReport {
    pub created: Vec<PathBuf>,
    pub deleted: Vec<PathBuf>,
    pub warnings: Vec<String>,
}

impl TaskReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn warn(&mut self, message: impl Into<String>) {
        let message = message.into();
        warn!("{message}");
        self.warnings.push(message);
    }

    pub fn is_noop(&self) -> bool {
        self.created.is_empty() && self.deleted.is_empty()
    }
}

/// The shared capability surface of every lifecycle task. Constructors do
/// the validation; `execute` mutates the filesystem and writes journals.
pub trait Task {
    fn summary(&self) -> TaskSummary;
    fn preview(&self) -> Vec<FileOperation>;
    fn execute(&self) -> Result<TaskReport>;
}
