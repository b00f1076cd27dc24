use std::fs;
use std::path::PathBuf;

use crate::fs_utils::path_present;
use crate::journal::OpKind;
use crate::layout::RootLayout;
use crate::ValidationError;

/// Application state, derived purely from filesystem inspection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppState {
    /// Neither the public path nor the data path exists.
    New,
    /// Both paths exist and no alias journal is present.
    Installed,
    /// Both paths exist and the alias journal marks the name as an alias.
    Alias,
    /// Exactly one of the two paths exists; the tree was tampered with
    /// outside this tool.
    Unmanaged,
}

impl AppState {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::New => "new",
            Self::Installed => "installed",
            Self::Alias => "alias",
            Self::Unmanaged => "unmanaged",
        }
    }
}

/// Immutable snapshot of one application's paths and state, taken at task
/// construction time and never cached across invocations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppSnapshot {
    pub name: String,
    pub app_dir: PathBuf,
    pub install_dir: PathBuf,
    pub state: AppState,
    /// Immediate symlink target of `install_dir` when the application is an
    /// alias. This may itself point at another alias; callers needing the
    /// ultimate target must resolve further.
    pub alias_target: Option<PathBuf>,
}

/// Classifies `name` with a bounded number of existence checks and at most
/// one `read_link` call; no tree walk.
///
/// A dangling symlink counts as present on either side, so a pair of broken
/// links is still a consistent Alias/Installed pair, and only a lone
/// surviving side is Unmanaged.
pub fn resolve_app(layout: &RootLayout, name: &str) -> Result<AppSnapshot, ValidationError> {
    validate_name(name)?;

    let app_dir = layout.app_dir(name);
    let install_dir = layout.install_dir(name);
    let app_present = path_present(&app_dir);
    let install_present = path_present(&install_dir);

    let (state, alias_target) = match (app_present, install_present) {
        (false, false) => (AppState::New, None),
        (true, true) => {
            if layout.journal_path(name, OpKind::Alias).exists() {
                (AppState::Alias, fs::read_link(&install_dir).ok())
            } else {
                (AppState::Installed, None)
            }
        }
        _ => (AppState::Unmanaged, None),
    };

    Ok(AppSnapshot {
        name: name.to_string(),
        app_dir,
        install_dir,
        state,
        alias_target,
    })
}

fn validate_name(name: &str) -> Result<(), ValidationError> {
    if name.is_empty()
        || name == "."
        || name == ".."
        || name == ".installer"
        || name.contains('/')
        || name.contains('\\')
    {
        return Err(ValidationError::InvalidName(name.to_string()));
    }
    Ok(())
}
