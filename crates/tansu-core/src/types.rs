//! Backend-confirmed descriptions of filesystem entities.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::path::{PathAddress, PathInfo};

/// Three-way kind classification of a resolved entity.
///
/// Exactly one kind applies to any entity a backend can describe; something
/// that is none of these cannot become a [`FileInfo`] in the first place.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FileKind {
    File,
    Folder,
    Link,
}

/// What a path currently points to, as confirmed by its backend.
///
/// Built on demand by [`crate::backend::Resolver::resolve`]; a missing entity
/// is an error, never a degenerate `FileInfo`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FileInfo {
    /// The address this description was resolved for.
    pub address: PathAddress,
    /// Backend-local path after normalization; for a symlink, the link target.
    pub real_path: String,
    pub size: u64,
    /// Opaque fingerprint that changes whenever the content changes.
    pub etag: String,
    /// Not every backend reports a modification time.
    pub modified: Option<DateTime<Utc>>,
    pub readable: bool,
    pub writable: bool,
    pub executable: bool,
    pub kind: FileKind,
}

impl FileInfo {
    pub fn is_file(&self) -> bool {
        self.kind == FileKind::File
    }

    pub fn is_folder(&self) -> bool {
        self.kind == FileKind::Folder
    }

    pub fn is_link(&self) -> bool {
        self.kind == FileKind::Link
    }

    /// Address of [`Self::real_path`] on the same filesystem.
    ///
    /// For symlinks this is the link target, which is how link chains are
    /// followed one hop at a time.
    pub fn real_address(&self) -> PathAddress {
        PathAddress::from_parts(self.prefix(), self.real_path.clone())
    }
}

impl PathInfo for FileInfo {
    fn prefix(&self) -> &str {
        self.address.prefix()
    }

    fn full_path(&self) -> &str {
        self.address.full_path()
    }
}

/// Lightweight per-child record inside a directory listing.
///
/// Whatever the backend happened to learn while enumerating: the kind is
/// always known, the rest is optional. `detail` carries backend-specific
/// extras (an object-store listing's raw entry, for instance) opaquely.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChildRecord {
    pub kind: FileKind,
    pub size: Option<u64>,
    pub etag: Option<String>,
    pub modified: Option<DateTime<Utc>>,
    pub detail: Option<Value>,
}

impl ChildRecord {
    pub fn new(kind: FileKind) -> Self {
        Self {
            kind,
            size: None,
            etag: None,
            modified: None,
            detail: None,
        }
    }
}
