use std::collections::BTreeSet;
use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::journal::{read_journal, OpKind};
use crate::layout::RootLayout;

/// One installed (or aliased) application, for `list` output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppListing {
    pub name: String,
    pub app_dir: PathBuf,
    /// Fully resolved data location, or the public path itself when
    /// resolution fails (dangling chain).
    pub target: PathBuf,
}

/// Enumerates applications by walking the hidden install root; journal files
/// are skipped, only data directories and alias symlinks count.
pub fn list_applications(layout: &RootLayout) -> Result<Vec<AppListing>> {
    let dir = layout.install_root();
    if !dir.exists() {
        return Ok(Vec::new());
    }

    let mut listings = Vec::new();
    for entry in
        fs::read_dir(&dir).with_context(|| format!("failed to read {}", dir.display()))?
    {
        let entry = entry?;
        let metadata = fs::symlink_metadata(entry.path())
            .with_context(|| format!("failed to stat {}", entry.path().display()))?;
        if !metadata.is_dir() && !metadata.file_type().is_symlink() {
            continue;
        }
        let Some(name) = entry.file_name().to_str().map(ToOwned::to_owned) else {
            continue;
        };

        let app_dir = layout.app_dir(&name);
        let target = fs::canonicalize(&app_dir).unwrap_or_else(|_| app_dir.clone());
        listings.push(AppListing {
            name,
            app_dir,
            target,
        });
    }

    listings.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(listings)
}

/// Deduplicated union of every journal for one application.
pub fn application_files(layout: &RootLayout, name: &str) -> Result<BTreeSet<PathBuf>> {
    let mut files = BTreeSet::new();
    for op in OpKind::all() {
        files.extend(read_journal(layout, name, op)?);
    }
    Ok(files)
}
