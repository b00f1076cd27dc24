use std::path::PathBuf;

/// Precondition violations raised by task constructors before any
/// filesystem mutation. Always recoverable by the caller.
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("application name is invalid: '{0}'")]
    InvalidName(String),

    #[error("application does not exist: {0}")]
    NotInstalled(String),

    #[error("application is already installed: {0}")]
    AlreadyInstalled(String),

    #[error("application '{0}' is an alias, remove it first")]
    IsAlias(String),

    #[error("application '{0}' is not managed by this tool, choose another name")]
    Unmanaged(String),

    #[error("application and alias name must not be identical: {0}")]
    AliasSelfReference(String),

    #[error("no input files given")]
    NoInputFiles,

    #[error("input file does not exist: {}", .0.display())]
    MissingFile(PathBuf),

    #[error("path does not belong to application '{name}': {}", .path.display())]
    ForeignPath { name: String, path: PathBuf },

    #[error("file is not executable: {}", .0.display())]
    NotExecutable(PathBuf),

    #[error("a command name allows only a single file")]
    TooManyFiles,
}
