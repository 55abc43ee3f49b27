//! High-level operations against a mounted filesystem.

use crate::backend::TransformOp;
use crate::error::Result;
use crate::filesystem::Filesystem;
use crate::path::PathAddress;

/// Copy a file or folder tree from one path to another.
///
/// Both paths must live on the same filesystem; the owning backend does the
/// actual work.
pub fn copy(fs: &Filesystem, source: &PathAddress, dest: &PathAddress) -> Result<()> {
    fs.copy(source, dest)
}

/// A content-rewriting operation bound to its parameters, reusable across
/// many paths.
pub trait Transform {
    fn apply(&self, fs: &Filesystem, path: &PathAddress) -> Result<()>;
}

/// Thumbnail an image in place, preserving aspect ratio.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResizeImage {
    width: u32,
    height: u32,
    scale: u32,
    quality: u8,
}

impl ResizeImage {
    /// Bounding box of `width * scale` by `height * scale`; `quality`
    /// applies to lossy re-encoding.
    pub fn new(width: u32, height: u32, scale: u32, quality: u8) -> Self {
        Self {
            width,
            height,
            scale,
            quality,
        }
    }
}

impl Transform for ResizeImage {
    fn apply(&self, fs: &Filesystem, path: &PathAddress) -> Result<()> {
        fs.transform(
            path,
            &TransformOp::ResizeImage {
                width: self.width,
                height: self.height,
                scale: self.scale,
                quality: self.quality,
            },
        )
    }
}
