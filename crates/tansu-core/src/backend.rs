//! Backend capability traits: the storage abstraction.
//!
//! Each storage plugin implements a closed set of capability traits, selected
//! by prefix when it is mounted into a [`crate::filesystem::Filesystem`]. The
//! traits receive full [`PathAddress`] values and translate them to their
//! native addressing (OS paths, object keys, database rows) internally.
//!
//! Backends are intentionally dumb: [`Lister::list_dir`] hands back raw
//! entries in whatever order the storage reported them, and the core
//! assembles them into a [`crate::contents::FilesystemContents`] node. That
//! keeps the partition and ordering invariants in one place instead of in
//! every backend.

use crate::error::Result;
use crate::path::PathAddress;
use crate::types::{ChildRecord, FileInfo};

/// Describe whatever a path currently points to.
pub trait Resolver {
    /// Fails when the path cannot be described at all: missing entity,
    /// permission denial, backend unreachable.
    fn resolve(&self, path: &PathAddress) -> Result<FileInfo>;
}

/// Enumerate one directory level.
pub trait Lister {
    /// Raw `(name, record)` entries, in the order the storage reports them.
    fn list_dir(&self, path: &PathAddress) -> Result<Vec<(String, ChildRecord)>>;
}

/// Duplicate an entity within one backend.
pub trait Copier {
    fn copy(&self, source: &PathAddress, dest: &PathAddress) -> Result<()>;
}

/// Operation-specific parameters for backend transforms.
///
/// A closed enum rather than an operation-name string, so a backend that does
/// not understand an operation finds out at the match, not at dispatch time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransformOp {
    /// Thumbnail an image in place, preserving aspect ratio.
    ///
    /// The bounding box is `width * scale` by `height * scale`; `quality`
    /// applies to lossy re-encoding.
    ResizeImage {
        width: u32,
        height: u32,
        scale: u32,
        quality: u8,
    },
}

impl TransformOp {
    pub fn name(&self) -> &'static str {
        match self {
            TransformOp::ResizeImage { .. } => "resize-image",
        }
    }
}

/// Apply a content-rewriting operation to one entity.
pub trait Transformer {
    /// Backends refuse operations they cannot perform with
    /// [`crate::error::Error::Unsupported`].
    fn transform(&self, path: &PathAddress, op: &TransformOp) -> Result<()>;
}

/// Everything the core requires from a storage backend.
///
/// Blanket-implemented, so a backend only ever implements the four
/// capability traits.
pub trait Backend: Resolver + Lister + Copier + Transformer + Send + Sync {}

impl<T: Resolver + Lister + Copier + Transformer + Send + Sync> Backend for T {}
