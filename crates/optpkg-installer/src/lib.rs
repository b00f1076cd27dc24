mod alias;
mod assets;
mod error;
mod fs_utils;
mod install;
mod journal;
mod layout;
mod listing;
mod path_link;
mod remove;
mod state;
mod task;

pub use alias::AliasTask;
pub use assets::{AutocompleteTask, DesktopEntryTask};
pub use error::ValidationError;
pub use install::{InstallMode, InstallTask};
pub use journal::{append_journal, delete_journal, read_journal, OpKind};
pub use layout::{default_root, RootLayout};
pub use listing::{application_files, list_applications, AppListing};
pub use path_link::{PathLinkTask, PathTarget};
pub use remove::{RemoveScope, RemoveTask};
pub use state::{resolve_app, AppSnapshot, AppState};
pub use task::{FileOperation, Task, TaskReport, TaskSummary};
