//! In-memory backend.
//!
//! A whole filesystem in one insertion-ordered map, symlinks included, so
//! traversal and link semantics can be exercised without touching a disk.
//! Useful as scratch storage and as the reference backend in tests.

use std::sync::{Mutex, PoisonError};

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use sha2::{Digest, Sha256};

use crate::backend::{Copier, Lister, Resolver, TransformOp, Transformer};
use crate::error::{Error, Result};
use crate::path::{PathAddress, PathInfo};
use crate::types::{ChildRecord, FileInfo, FileKind};

#[derive(Debug, Clone)]
enum Node {
    File {
        data: Vec<u8>,
        modified: DateTime<Utc>,
    },
    Folder,
    Link {
        target: String,
    },
}

impl Node {
    fn kind(&self) -> FileKind {
        match self {
            Node::File { .. } => FileKind::File,
            Node::Folder => FileKind::Folder,
            Node::Link { .. } => FileKind::Link,
        }
    }
}

/// Storage that lives entirely in memory.
///
/// Paths are normalized on the way in (`//`, `.` and `..` collapse), and
/// every ancestor folder of an added entry springs into existence with it.
#[derive(Default)]
pub struct MemoryBackend {
    nodes: Mutex<IndexMap<String, Node>>,
}

/// Collapse a backend-local path to its canonical `/a/b` form.
fn normalize(path: &str) -> String {
    let mut parts: Vec<&str> = Vec::new();
    for segment in path.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                parts.pop();
            }
            other => parts.push(other),
        }
    }
    if parts.is_empty() {
        "/".to_string()
    } else {
        format!("/{}", parts.join("/"))
    }
}

/// Every ancestor of `path`, root first, excluding `path` itself.
fn ancestors(path: &str) -> Vec<String> {
    let mut out = vec!["/".to_string()];
    let mut so_far = String::new();
    let mut segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
    segments.pop();
    for segment in segments {
        so_far.push('/');
        so_far.push_str(segment);
        out.push(so_far.clone());
    }
    out
}

/// The bare child name when `key` sits directly inside `parent`.
fn child_name_of<'a>(parent: &str, key: &'a str) -> Option<&'a str> {
    let rest = if parent == "/" {
        key.strip_prefix('/')?
    } else {
        key.strip_prefix(parent)?.strip_prefix('/')?
    };
    (!rest.is_empty() && !rest.contains('/')).then_some(rest)
}

fn content_etag(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    format!("{:x}", hasher.finalize())
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, IndexMap<String, Node>> {
        self.nodes.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Create a folder, along with any missing ancestors.
    pub fn add_folder(&self, path: &str) {
        let path = normalize(path);
        let mut nodes = self.lock();
        for ancestor in ancestors(&path) {
            nodes.entry(ancestor).or_insert(Node::Folder);
        }
        nodes.entry(path).or_insert(Node::Folder);
    }

    /// Create or overwrite a file, along with any missing ancestors.
    pub fn add_file(&self, path: &str, data: impl Into<Vec<u8>>) {
        let path = normalize(path);
        let mut nodes = self.lock();
        for ancestor in ancestors(&path) {
            nodes.entry(ancestor).or_insert(Node::Folder);
        }
        nodes.insert(
            path,
            Node::File {
                data: data.into(),
                modified: Utc::now(),
            },
        );
    }

    /// Create or overwrite a symlink pointing at `target`.
    pub fn add_link(&self, path: &str, target: &str) {
        let path = normalize(path);
        let mut nodes = self.lock();
        for ancestor in ancestors(&path) {
            nodes.entry(ancestor).or_insert(Node::Folder);
        }
        nodes.insert(
            path,
            Node::Link {
                target: normalize(target),
            },
        );
    }

    fn describe(&self, address: &PathAddress, canonical: &str, node: &Node) -> FileInfo {
        let (real_path, size, etag, modified) = match node {
            Node::File { data, modified } => (
                canonical.to_string(),
                data.len() as u64,
                content_etag(data),
                Some(*modified),
            ),
            Node::Folder => (canonical.to_string(), 0, content_etag(canonical.as_bytes()), None),
            Node::Link { target } => (target.clone(), 0, content_etag(target.as_bytes()), None),
        };
        FileInfo {
            address: address.clone(),
            real_path,
            size,
            etag,
            modified,
            readable: true,
            writable: true,
            executable: false,
            kind: node.kind(),
        }
    }
}

impl Resolver for MemoryBackend {
    fn resolve(&self, path: &PathAddress) -> Result<FileInfo> {
        let canonical = normalize(path.full_path());
        let nodes = self.lock();
        let node = nodes
            .get(&canonical)
            .ok_or_else(|| Error::unresolvable(path, "no such entry"))?;
        Ok(self.describe(path, &canonical, node))
    }
}

impl Lister for MemoryBackend {
    fn list_dir(&self, path: &PathAddress) -> Result<Vec<(String, ChildRecord)>> {
        let canonical = normalize(path.full_path());
        let nodes = self.lock();
        match nodes.get(&canonical) {
            None => return Err(Error::unresolvable(path, "no such entry")),
            Some(Node::Folder) => {}
            Some(_) => {
                return Err(Error::NotAFolder {
                    path: path.to_string(),
                });
            }
        }
        let mut entries = Vec::new();
        for (key, node) in nodes.iter() {
            let Some(name) = child_name_of(&canonical, key) else {
                continue;
            };
            let mut record = ChildRecord::new(node.kind());
            if let Node::File { data, modified } = node {
                record.size = Some(data.len() as u64);
                record.etag = Some(content_etag(data));
                record.modified = Some(*modified);
            }
            entries.push((name.to_string(), record));
        }
        Ok(entries)
    }
}

impl Copier for MemoryBackend {
    fn copy(&self, source: &PathAddress, dest: &PathAddress) -> Result<()> {
        let src = normalize(source.full_path());
        let dst = normalize(dest.full_path());
        let mut nodes = self.lock();
        let node = nodes
            .get(&src)
            .cloned()
            .ok_or_else(|| Error::unresolvable(source, "no such entry"))?;
        for ancestor in ancestors(&dst) {
            nodes.entry(ancestor).or_insert(Node::Folder);
        }
        if matches!(node, Node::Folder) {
            let src_prefix = if src == "/" {
                "/".to_string()
            } else {
                format!("{src}/")
            };
            let subtree: Vec<(String, Node)> = nodes
                .iter()
                .filter(|(key, _)| key.as_str() != src && key.starts_with(&src_prefix))
                .map(|(key, node)| {
                    let suffix = &key[src_prefix.len()..];
                    let rekeyed = if dst == "/" {
                        format!("/{suffix}")
                    } else {
                        format!("{dst}/{suffix}")
                    };
                    (rekeyed, node.clone())
                })
                .collect();
            nodes.insert(dst, Node::Folder);
            for (key, node) in subtree {
                nodes.insert(key, node);
            }
        } else {
            nodes.insert(dst, node);
        }
        Ok(())
    }
}

impl Transformer for MemoryBackend {
    fn transform(&self, _path: &PathAddress, op: &TransformOp) -> Result<()> {
        Err(Error::Unsupported {
            operation: op.name().to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_describes_a_file() {
        let backend = MemoryBackend::new();
        backend.add_file("/notes/today.md", "plans");
        let info = backend
            .resolve(&PathAddress::parse("mem::/notes/today.md"))
            .unwrap();
        assert_eq!(info.kind, FileKind::File);
        assert_eq!(info.size, 5);
        assert_eq!(info.real_path, "/notes/today.md");
        assert!(info.modified.is_some());
    }

    #[test]
    fn test_ancestors_spring_into_existence() {
        let backend = MemoryBackend::new();
        backend.add_file("/deep/ly/nested/file.txt", "x");
        assert!(
            backend
                .resolve(&PathAddress::parse("mem::/deep/ly"))
                .unwrap()
                .is_folder()
        );
    }

    #[test]
    fn test_etag_tracks_content() {
        let backend = MemoryBackend::new();
        backend.add_file("/a.txt", "one");
        let before = backend.resolve(&PathAddress::parse("mem::/a.txt")).unwrap();
        backend.add_file("/a.txt", "two");
        let after = backend.resolve(&PathAddress::parse("mem::/a.txt")).unwrap();
        assert_ne!(before.etag, after.etag);
    }

    #[test]
    fn test_paths_are_normalized() {
        let backend = MemoryBackend::new();
        backend.add_file("/a/b.txt", "x");
        let info = backend
            .resolve(&PathAddress::parse("mem::/a/./../a//b.txt"))
            .unwrap();
        assert_eq!(info.real_path, "/a/b.txt");
    }

    #[test]
    fn test_list_dir_reports_in_insertion_order() {
        let backend = MemoryBackend::new();
        backend.add_file("/d/b.txt", "b");
        backend.add_folder("/d/sub");
        backend.add_file("/d/a.txt", "a");
        let names: Vec<String> = backend
            .list_dir(&PathAddress::parse("mem::/d"))
            .unwrap()
            .into_iter()
            .map(|(name, _)| name)
            .collect();
        assert_eq!(names, ["b.txt", "sub", "a.txt"]);
    }

    #[test]
    fn test_list_dir_of_a_file_fails() {
        let backend = MemoryBackend::new();
        backend.add_file("/f.txt", "x");
        assert!(matches!(
            backend.list_dir(&PathAddress::parse("mem::/f.txt")),
            Err(Error::NotAFolder { .. })
        ));
    }

    #[test]
    fn test_list_dir_only_returns_direct_children() {
        let backend = MemoryBackend::new();
        backend.add_file("/d/sub/deep.txt", "x");
        backend.add_file("/d/top.txt", "y");
        let names: Vec<String> = backend
            .list_dir(&PathAddress::parse("mem::/d"))
            .unwrap()
            .into_iter()
            .map(|(name, _)| name)
            .collect();
        assert_eq!(names, ["sub", "top.txt"]);
    }

    #[test]
    fn test_copy_file() {
        let backend = MemoryBackend::new();
        backend.add_file("/src.txt", "payload");
        backend
            .copy(
                &PathAddress::parse("mem::/src.txt"),
                &PathAddress::parse("mem::/dir/dst.txt"),
            )
            .unwrap();
        let copied = backend
            .resolve(&PathAddress::parse("mem::/dir/dst.txt"))
            .unwrap();
        assert_eq!(copied.size, 7);
        assert!(
            backend
                .resolve(&PathAddress::parse("mem::/src.txt"))
                .is_ok()
        );
    }

    #[test]
    fn test_copy_folder_copies_the_subtree() {
        let backend = MemoryBackend::new();
        backend.add_file("/tree/a.txt", "a");
        backend.add_file("/tree/sub/b.txt", "b");
        backend
            .copy(
                &PathAddress::parse("mem::/tree"),
                &PathAddress::parse("mem::/copy"),
            )
            .unwrap();
        assert!(
            backend
                .resolve(&PathAddress::parse("mem::/copy/sub/b.txt"))
                .unwrap()
                .is_file()
        );
    }

    #[test]
    fn test_transform_is_unsupported() {
        let backend = MemoryBackend::new();
        backend.add_file("/pic.png", "not really a png");
        let op = TransformOp::ResizeImage {
            width: 10,
            height: 10,
            scale: 1,
            quality: 80,
        };
        assert!(matches!(
            backend.transform(&PathAddress::parse("mem::/pic.png"), &op),
            Err(Error::Unsupported { .. })
        ));
    }
}
