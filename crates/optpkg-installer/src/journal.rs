use std::collections::BTreeSet;
use std::fs;
use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::fs_utils::path_present;
use crate::layout::RootLayout;

/// Operation kinds with their own append-only journal file per application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum OpKind {
    Install,
    Update,
    Alias,
    Desktop,
    Path,
    Autocomplete,
}

impl OpKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Install => "install",
            Self::Update => "update",
            Self::Alias => "alias",
            Self::Desktop => "desktop",
            Self::Path => "path",
            Self::Autocomplete => "autocomplete",
        }
    }

    pub fn all() -> [OpKind; 6] {
        [
            Self::Install,
            Self::Update,
            Self::Alias,
            Self::Desktop,
            Self::Path,
            Self::Autocomplete,
        ]
    }
}

/// Appends one created path to the journal for `(name, op)`, creating the
/// journal file and its parent directory on first use.
pub fn append_journal(layout: &RootLayout, name: &str, op: OpKind, path: &std::path::Path) -> Result<()> {
    let journal = layout.journal_path(name, op);
    if let Some(parent) = journal.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }

    let mut file = fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&journal)
        .with_context(|| format!("failed to open journal {}", journal.display()))?;
    writeln!(file, "{}", path.display())
        .with_context(|| format!("failed to append to journal {}", journal.display()))?;
    file.flush()
        .with_context(|| format!("failed to flush journal {}", journal.display()))?;
    Ok(())
}

/// Reads the journal back, deduplicated, dropping entries whose path is gone
/// (dangling symlinks still count as present, so they remain removable).
pub fn read_journal(layout: &RootLayout, name: &str, op: OpKind) -> Result<BTreeSet<PathBuf>> {
    let journal = layout.journal_path(name, op);
    if !journal.exists() {
        return Ok(BTreeSet::new());
    }

    let raw = fs::read_to_string(&journal)
        .with_context(|| format!("failed to read journal {}", journal.display()))?;
    let mut paths = BTreeSet::new();
    for line in raw.lines().map(str::trim).filter(|line| !line.is_empty()) {
        let path = PathBuf::from(line);
        if path_present(&path) {
            paths.insert(path);
        }
    }
    Ok(paths)
}

/// Removes the journal file itself; the final step of a full removal.
pub fn delete_journal(layout: &RootLayout, name: &str, op: OpKind) -> Result<bool> {
    let journal = layout.journal_path(name, op);
    if !journal.exists() {
        return Ok(false);
    }
    fs::remove_file(&journal)
        .with_context(|| format!("failed to delete journal {}", journal.display()))?;
    Ok(true)
}
