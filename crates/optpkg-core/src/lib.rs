mod archive;

pub use archive::{extract_archive, ArchiveKind};
