//! Local-disk backend.
//!
//! Maps backend-local paths to OS paths under a configured root directory.
//! Paths are normalized lexically on the way in and may not climb above the
//! root; symlink targets are read back into backend-local coordinates, so
//! nothing above the root ever leaks out through a link either.

use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};

use chrono::{DateTime, Utc};
use log::trace;
use sha2::{Digest, Sha256};

use crate::backend::{Copier, Lister, Resolver, TransformOp, Transformer};
use crate::error::{Error, Result};
use crate::path::{PathAddress, PathInfo};
use crate::types::{ChildRecord, FileInfo, FileKind};

/// Storage rooted at one directory of the local disk.
pub struct LocalBackend {
    root: PathBuf,
}

impl LocalBackend {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    /// Normalized path segments, with `.` and empty segments dropped and
    /// `..` resolved lexically. Climbing above the root is unresolvable.
    fn segments(&self, path: &PathAddress) -> Result<Vec<String>> {
        let mut parts: Vec<String> = Vec::new();
        for segment in path.full_path().split('/') {
            match segment {
                "" | "." => {}
                ".." => {
                    if parts.pop().is_none() {
                        return Err(Error::unresolvable(path, "path escapes the backend root"));
                    }
                }
                other => parts.push(other.to_string()),
            }
        }
        Ok(parts)
    }

    fn os_path(&self, parts: &[String]) -> PathBuf {
        let mut os = self.root.clone();
        for part in parts {
            os.push(part);
        }
        os
    }

    fn canonical(parts: &[String]) -> String {
        if parts.is_empty() {
            "/".to_string()
        } else {
            format!("/{}", parts.join("/"))
        }
    }

    /// Map a symlink target back into backend-local space.
    ///
    /// Absolute targets must live under the root; relative targets resolve
    /// against the link's parent folder. Targets that leave the root have no
    /// backend-local name.
    fn link_target(&self, link_parts: &[String], target: &Path) -> Option<String> {
        let mut parts: Vec<String>;
        let components: Vec<Component<'_>>;
        if target.is_absolute() {
            parts = Vec::new();
            components = target.strip_prefix(&self.root).ok()?.components().collect();
        } else {
            parts = link_parts[..link_parts.len().saturating_sub(1)].to_vec();
            components = target.components().collect();
        }
        for component in components {
            match component {
                Component::CurDir => {}
                Component::ParentDir => {
                    parts.pop()?;
                }
                Component::Normal(segment) => parts.push(segment.to_str()?.to_string()),
                Component::RootDir | Component::Prefix(_) => return None,
            }
        }
        Some(Self::canonical(&parts))
    }

    fn describe(&self, path: &PathAddress, parts: &[String]) -> Result<FileInfo> {
        let os = self.os_path(parts);
        let meta =
            fs::symlink_metadata(&os).map_err(|err| Error::unresolvable(path, err))?;
        let file_type = meta.file_type();
        let kind = if file_type.is_symlink() {
            FileKind::Link
        } else if file_type.is_dir() {
            FileKind::Folder
        } else {
            FileKind::File
        };
        let canonical = Self::canonical(parts);
        let real_path = if kind == FileKind::Link {
            let target = fs::read_link(&os).map_err(|err| Error::unresolvable(path, err))?;
            self.link_target(parts, &target).ok_or_else(|| {
                Error::unresolvable(path, "symlink target escapes the backend root")
            })?
        } else {
            canonical.clone()
        };
        let modified = meta.modified().ok().map(DateTime::<Utc>::from);
        let (readable, writable, executable) = permission_bits(&meta);
        Ok(FileInfo {
            address: path.clone(),
            real_path,
            size: meta.len(),
            etag: metadata_etag(&canonical, meta.len(), modified.as_ref()),
            modified,
            readable,
            writable,
            executable,
            kind,
        })
    }

    fn resize_image(
        &self,
        path: &PathAddress,
        width: u32,
        height: u32,
        scale: u32,
        quality: u8,
    ) -> Result<()> {
        let parts = self.segments(path)?;
        let os = self.os_path(&parts);
        let img = image::open(&os)
            .map_err(|err| Error::Io {
                path: path.to_string(),
                source: io::Error::other(err),
            })?
            .thumbnail(width * scale, height * scale);
        let format = image::ImageFormat::from_path(&os).unwrap_or(image::ImageFormat::Png);
        let file = fs::File::create(&os).map_err(|err| Error::Io {
            path: path.to_string(),
            source: err,
        })?;
        let mut out = io::BufWriter::new(file);
        let written = match format {
            image::ImageFormat::Jpeg => {
                let mut encoder =
                    image::codecs::jpeg::JpegEncoder::new_with_quality(&mut out, quality);
                encoder.encode_image(&img)
            }
            other => img.write_to(&mut out, other),
        };
        written.map_err(|err| Error::Io {
            path: path.to_string(),
            source: io::Error::other(err),
        })
    }
}

#[cfg(unix)]
fn permission_bits(meta: &fs::Metadata) -> (bool, bool, bool) {
    use std::os::unix::fs::PermissionsExt;
    let mode = meta.permissions().mode();
    (mode & 0o400 != 0, mode & 0o200 != 0, mode & 0o100 != 0)
}

#[cfg(not(unix))]
fn permission_bits(meta: &fs::Metadata) -> (bool, bool, bool) {
    (true, !meta.permissions().readonly(), false)
}

/// Cheap fingerprint over what the OS already knows; content is not read.
fn metadata_etag(canonical: &str, size: u64, modified: Option<&DateTime<Utc>>) -> String {
    let mut hasher = Sha256::new();
    hasher.update(canonical.as_bytes());
    hasher.update(size.to_le_bytes());
    if let Some(modified) = modified {
        let nanos = modified.timestamp_nanos_opt().unwrap_or_default();
        hasher.update(nanos.to_le_bytes());
    }
    format!("{:x}", hasher.finalize())
}

fn copy_tree(src: &Path, dst: &Path) -> io::Result<()> {
    fs::create_dir_all(dst)?;
    for entry in fs::read_dir(src)? {
        let entry = entry?;
        let to = dst.join(entry.file_name());
        if entry.file_type()?.is_dir() {
            copy_tree(&entry.path(), &to)?;
        } else {
            fs::copy(entry.path(), &to)?;
        }
    }
    Ok(())
}

impl Resolver for LocalBackend {
    fn resolve(&self, path: &PathAddress) -> Result<FileInfo> {
        let parts = self.segments(path)?;
        self.describe(path, &parts)
    }
}

impl Lister for LocalBackend {
    fn list_dir(&self, path: &PathAddress) -> Result<Vec<(String, ChildRecord)>> {
        let parts = self.segments(path)?;
        let os = self.os_path(&parts);
        trace!("listing '{path}'");
        let read_dir = fs::read_dir(&os).map_err(|err| Error::unresolvable(path, err))?;
        let mut entries = Vec::new();
        for entry in read_dir {
            let entry = entry.map_err(|err| Error::Io {
                path: path.to_string(),
                source: err,
            })?;
            let name = entry.file_name().to_string_lossy().into_owned();
            // DirEntry::metadata does not traverse symlinks
            let Ok(meta) = entry.metadata() else {
                entries.push((name, ChildRecord::new(FileKind::File)));
                continue;
            };
            let file_type = meta.file_type();
            let kind = if file_type.is_symlink() {
                FileKind::Link
            } else if file_type.is_dir() {
                FileKind::Folder
            } else {
                FileKind::File
            };
            let mut record = ChildRecord::new(kind);
            record.size = Some(meta.len());
            record.modified = meta.modified().ok().map(DateTime::<Utc>::from);
            entries.push((name, record));
        }
        Ok(entries)
    }
}

impl Copier for LocalBackend {
    fn copy(&self, source: &PathAddress, dest: &PathAddress) -> Result<()> {
        let src = self.os_path(&self.segments(source)?);
        let dst = self.os_path(&self.segments(dest)?);
        let meta = fs::metadata(&src).map_err(|err| Error::unresolvable(source, err))?;
        let io_err = |err| Error::Io {
            path: dest.to_string(),
            source: err,
        };
        if let Some(parent) = dst.parent() {
            fs::create_dir_all(parent).map_err(io_err)?;
        }
        if meta.is_dir() {
            copy_tree(&src, &dst).map_err(io_err)?;
        } else {
            fs::copy(&src, &dst).map_err(io_err)?;
        }
        Ok(())
    }
}

impl Transformer for LocalBackend {
    fn transform(&self, path: &PathAddress, op: &TransformOp) -> Result<()> {
        match *op {
            TransformOp::ResizeImage {
                width,
                height,
                scale,
                quality,
            } => self.resize_image(path, width, height, scale, quality),
        }
    }
}
