//! Directory-listing nodes.
//!
//! A [`FilesystemContents`] holds what is known about the children of exactly
//! one folder. Children are split into a file partition and a folder
//! partition, while a separate name list preserves the order the backend
//! reported them in. A child folder's own node is loaded lazily, on first
//! descent, never eagerly for a whole tree.

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;

use crate::backend::Backend;
use crate::checks;
use crate::error::{Error, Result};
use crate::path::{PathAddress, PathInfo};
use crate::types::{ChildRecord, FileInfo, FileKind};

/// The children known at one folder level.
pub struct FilesystemContents {
    info: FileInfo,
    backend: Arc<dyn Backend>,
    /// Child names in the order they were tracked.
    names: Vec<String>,
    files: IndexMap<String, ChildRecord>,
    folders: IndexMap<String, ChildRecord>,
}

impl FilesystemContents {
    /// An empty node for the folder described by `info`.
    pub fn new(info: FileInfo, backend: Arc<dyn Backend>) -> Self {
        Self {
            info,
            backend,
            names: Vec::new(),
            files: IndexMap::new(),
            folders: IndexMap::new(),
        }
    }

    /// Load the node for a folder path: resolve it, then enumerate one level.
    ///
    /// A symlink is followed to the folder it points at; the node is then
    /// rooted at the link target, so descent continues in real coordinates.
    /// Fails with [`Error::NotAFolder`] when the path points at anything
    /// else.
    pub fn load(backend: Arc<dyn Backend>, path: &PathAddress) -> Result<Self> {
        let info = backend.resolve(path)?;
        let target = checks::resolve_links(backend.as_ref(), info)?;
        if !target.is_folder() {
            return Err(Error::NotAFolder {
                path: path.to_string(),
            });
        }
        let entries = backend.list_dir(&target.address)?;
        let mut node = Self::new(target, backend);
        for (name, record) in entries {
            match record.kind {
                FileKind::Folder => node.track_folder(name, record)?,
                FileKind::File | FileKind::Link => node.track_file(name, record)?,
            }
        }
        Ok(node)
    }

    /// This folder's own backend-confirmed description.
    pub fn info(&self) -> &FileInfo {
        &self.info
    }

    pub fn address(&self) -> &PathAddress {
        &self.info.address
    }

    pub(crate) fn backend(&self) -> &Arc<dyn Backend> {
        &self.backend
    }

    /// Child names at this level, in the order the backend reported them.
    pub fn filenames(&self) -> &[String] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Is `name` tracked at this level as something other than a folder?
    pub fn has_file(&self, name: &str) -> bool {
        self.files.contains_key(name)
    }

    /// Is `name` tracked at this level as a folder?
    pub fn has_folder(&self, name: &str) -> bool {
        self.folders.contains_key(name)
    }

    /// The listing record for a child, whichever partition it is in.
    pub fn child_record(&self, name: &str) -> Option<&ChildRecord> {
        self.files.get(name).or_else(|| self.folders.get(name))
    }

    /// Resolve full information about any tracked child.
    pub fn file_info(&self, name: &str) -> Result<FileInfo> {
        if self.child_record(name).is_none() {
            return Err(self.no_such_child(name));
        }
        self.backend.resolve(&self.address().with_child(name))
    }

    /// Resolve full information about a tracked child file.
    pub fn file(&self, name: &str) -> Result<FileInfo> {
        if !self.has_file(name) {
            return Err(self.no_such_child(name));
        }
        self.backend.resolve(&self.address().with_child(name))
    }

    /// Load the node for a tracked child folder.
    pub fn folder(&self, name: &str) -> Result<FilesystemContents> {
        if !self.has_folder(name) {
            if self.has_file(name) {
                return Err(Error::NotAFolder {
                    path: self.address().with_child(name).to_string(),
                });
            }
            return Err(self.no_such_child(name));
        }
        Self::load(self.backend.clone(), &self.address().with_child(name))
    }

    /// Register a newly observed child file (or symlink).
    ///
    /// Tracking a name the folder partition already holds is a backend
    /// contract breach and fails with [`Error::AmbiguousChildName`].
    pub fn track_file(&mut self, name: impl Into<String>, record: ChildRecord) -> Result<()> {
        let name = name.into();
        if self.folders.contains_key(&name) {
            return Err(self.ambiguous(name));
        }
        if self.files.insert(name.clone(), record).is_none() {
            self.names.push(name);
        }
        Ok(())
    }

    /// Register a newly observed child folder.
    pub fn track_folder(&mut self, name: impl Into<String>, record: ChildRecord) -> Result<()> {
        let name = name.into();
        if self.files.contains_key(&name) {
            return Err(self.ambiguous(name));
        }
        if self.folders.insert(name.clone(), record).is_none() {
            self.names.push(name);
        }
        Ok(())
    }

    fn no_such_child(&self, name: &str) -> Error {
        Error::NoSuchChild {
            name: name.to_string(),
            path: self.address().to_string(),
        }
    }

    fn ambiguous(&self, name: String) -> Error {
        Error::AmbiguousChildName {
            name,
            path: self.address().to_string(),
        }
    }
}

impl PathInfo for FilesystemContents {
    fn prefix(&self) -> &str {
        self.info.prefix()
    }

    fn full_path(&self) -> &str {
        self.info.full_path()
    }
}

impl fmt::Debug for FilesystemContents {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FilesystemContents")
            .field("address", &self.address().to_string())
            .field("names", &self.names)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryBackend;

    fn seeded() -> Arc<MemoryBackend> {
        let backend = Arc::new(MemoryBackend::new());
        backend.add_file("/docs/readme.md", "hello");
        backend.add_folder("/docs/archive");
        backend.add_file("/docs/notes.txt", "notes");
        backend.add_file("/docs/archive/old.txt", "old");
        backend
    }

    fn docs(backend: &Arc<MemoryBackend>) -> FilesystemContents {
        FilesystemContents::load(backend.clone(), &PathAddress::parse("mem::/docs")).unwrap()
    }

    #[test]
    fn test_load_partitions_children() {
        let backend = seeded();
        let node = docs(&backend);
        assert!(node.has_file("readme.md"));
        assert!(node.has_file("notes.txt"));
        assert!(node.has_folder("archive"));
        assert!(!node.has_file("archive"));
        assert!(!node.has_folder("readme.md"));
        assert_eq!(node.len(), 3);
    }

    #[test]
    fn test_filenames_preserve_backend_order() {
        let backend = seeded();
        let node = docs(&backend);
        assert_eq!(node.filenames(), ["readme.md", "archive", "notes.txt"]);
    }

    #[test]
    fn test_load_of_a_file_is_not_a_folder() {
        let backend = seeded();
        let err =
            FilesystemContents::load(backend.clone(), &PathAddress::parse("mem::/docs/readme.md"))
                .unwrap_err();
        assert!(matches!(err, Error::NotAFolder { .. }));
    }

    #[test]
    fn test_load_follows_a_link_to_its_target_folder() {
        let backend = seeded();
        backend.add_link("/mirror", "/docs/archive");
        let node =
            FilesystemContents::load(backend.clone(), &PathAddress::parse("mem::/mirror")).unwrap();
        assert_eq!(node.address().to_string(), "mem::/docs/archive");
        assert!(node.has_file("old.txt"));
    }

    #[test]
    fn test_file_info_resolves_any_child() {
        let backend = seeded();
        let node = docs(&backend);
        let info = node.file_info("archive").unwrap();
        assert!(info.is_folder());
        let info = node.file_info("readme.md").unwrap();
        assert!(info.is_file());
        assert_eq!(info.size, 5);
    }

    #[test]
    fn test_missing_children_fail() {
        let backend = seeded();
        let node = docs(&backend);
        assert!(matches!(
            node.file_info("ghost"),
            Err(Error::NoSuchChild { .. })
        ));
        assert!(matches!(node.file("ghost"), Err(Error::NoSuchChild { .. })));
        assert!(matches!(
            node.folder("ghost"),
            Err(Error::NoSuchChild { .. })
        ));
    }

    #[test]
    fn test_file_and_folder_respect_partitions() {
        let backend = seeded();
        let node = docs(&backend);
        assert!(matches!(
            node.file("archive"),
            Err(Error::NoSuchChild { .. })
        ));
        assert!(matches!(
            node.folder("readme.md"),
            Err(Error::NotAFolder { .. })
        ));
    }

    #[test]
    fn test_folder_descends_one_level() {
        let backend = seeded();
        let node = docs(&backend);
        let archive = node.folder("archive").unwrap();
        assert_eq!(archive.filenames(), ["old.txt"]);
        assert_eq!(archive.address().to_string(), "mem::/docs/archive");
    }

    #[test]
    fn test_tracking_the_same_name_in_both_partitions_is_fatal() {
        let backend = seeded();
        let mut node = docs(&backend);
        node.track_file("fresh", ChildRecord::new(FileKind::File))
            .unwrap();
        let err = node
            .track_folder("fresh", ChildRecord::new(FileKind::Folder))
            .unwrap_err();
        assert!(matches!(err, Error::AmbiguousChildName { .. }));
        let err = node
            .track_file("archive", ChildRecord::new(FileKind::File))
            .unwrap_err();
        assert!(matches!(err, Error::AmbiguousChildName { .. }));
    }

    #[test]
    fn test_retracking_a_known_child_does_not_duplicate_it() {
        let backend = seeded();
        let mut node = docs(&backend);
        let before = node.len();
        node.track_file("readme.md", ChildRecord::new(FileKind::File))
            .unwrap();
        assert_eq!(node.len(), before);
    }
}
