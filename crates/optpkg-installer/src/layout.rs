use std::path::{Path, PathBuf};

use crate::journal::OpKind;

/// Fixed directory roots for one invocation.
///
/// The application root (normally `/opt`) carries the public symlinks; real
/// data and the per-operation journals live under its hidden `.installer`
/// subdirectory. The auxiliary directories default to the usual system
/// locations and are overridable for tests and non-root setups.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RootLayout {
    root: PathBuf,
    bin_dir: PathBuf,
    desktop_dir: PathBuf,
    icon_dir: PathBuf,
    autocomplete_dir: PathBuf,
}

impl RootLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            bin_dir: PathBuf::from("/usr/local/bin"),
            desktop_dir: PathBuf::from("/usr/share/applications"),
            icon_dir: PathBuf::from("/usr/share/pixmaps"),
            autocomplete_dir: PathBuf::from("/etc/bash_completion.d"),
        }
    }

    pub fn with_bin_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.bin_dir = dir.into();
        self
    }

    pub fn with_desktop_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.desktop_dir = dir.into();
        self
    }

    pub fn with_icon_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.icon_dir = dir.into();
        self
    }

    pub fn with_autocomplete_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.autocomplete_dir = dir.into();
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Public entry point for an application, always a symlink once managed.
    pub fn app_dir(&self, name: &str) -> PathBuf {
        self.root.join(name)
    }

    /// Hidden directory holding real application data and journals.
    pub fn install_root(&self) -> PathBuf {
        self.root.join(".installer")
    }

    /// Real data location for an application, or an alias symlink.
    pub fn install_dir(&self, name: &str) -> PathBuf {
        self.install_root().join(name)
    }

    pub fn journal_path(&self, name: &str, op: OpKind) -> PathBuf {
        self.install_root().join(format!("{name}.{}", op.as_str()))
    }

    pub fn bin_dir(&self) -> &Path {
        &self.bin_dir
    }

    pub fn desktop_dir(&self) -> &Path {
        &self.desktop_dir
    }

    pub fn icon_dir(&self) -> &Path {
        &self.icon_dir
    }

    pub fn autocomplete_dir(&self) -> &Path {
        &self.autocomplete_dir
    }
}

/// Resolves the application root: `OPTPKG_ROOT` if set, `/opt` otherwise.
pub fn default_root() -> PathBuf {
    match std::env::var("OPTPKG_ROOT") {
        Ok(root) if !root.trim().is_empty() => PathBuf::from(root),
        _ => PathBuf::from("/opt"),
    }
}
