//! The mount router: one facade over many storage backends.
//!
//! A [`Filesystem`] maps path prefixes to backends. Every operation routes on
//! the prefix of the address it is given and delegates to the owning
//! backend. The facade implements the backend capability traits itself, so
//! anything written against a single backend accepts a whole mounted
//! filesystem unchanged.

use std::sync::Arc;

use indexmap::IndexMap;
use log::debug;

use crate::backend::{Backend, Copier, Lister, Resolver, TransformOp, Transformer};
use crate::contents::FilesystemContents;
use crate::error::{Error, Result};
use crate::path::{PathAddress, PathInfo};
use crate::types::{ChildRecord, FileInfo};

/// Routes each operation to whichever backend owns the path's prefix.
#[derive(Default)]
pub struct Filesystem {
    mounts: IndexMap<String, Arc<dyn Backend>>,
}

impl Filesystem {
    pub fn new() -> Self {
        Self::default()
    }

    /// Route `prefix` to `backend`. Remounting a prefix replaces the backend.
    pub fn mount(&mut self, prefix: impl Into<String>, backend: Arc<dyn Backend>) {
        let prefix = prefix.into();
        debug!("mounting backend at prefix '{prefix}'");
        self.mounts.insert(prefix, backend);
    }

    /// The backend owning `prefix`, if one is mounted.
    pub fn backend_for(&self, prefix: &str) -> Result<&Arc<dyn Backend>> {
        self.mounts.get(prefix).ok_or_else(|| Error::UnknownPrefix {
            prefix: prefix.to_string(),
        })
    }

    /// Mounted prefixes, in mount order.
    pub fn prefixes(&self) -> impl Iterator<Item = &str> {
        self.mounts.keys().map(String::as_str)
    }

    /// Describe whatever `path` currently points to.
    pub fn resolve(&self, path: &PathAddress) -> Result<FileInfo> {
        self.backend_for(path.prefix())?.resolve(path)
    }

    /// The directory node for a folder path.
    pub fn list_contents(&self, path: &PathAddress) -> Result<FilesystemContents> {
        let backend = self.backend_for(path.prefix())?.clone();
        FilesystemContents::load(backend, path)
    }

    /// Copy a file or folder tree. Both paths must share one prefix; copying
    /// across backends is not routable.
    pub fn copy(&self, source: &PathAddress, dest: &PathAddress) -> Result<()> {
        if source.prefix() != dest.prefix() {
            return Err(Error::CrossFilesystem {
                source_path: source.to_string(),
                dest_path: dest.to_string(),
            });
        }
        debug!("copying '{source}' to '{dest}'");
        self.backend_for(source.prefix())?.copy(source, dest)
    }

    /// Apply a backend transform operation to `path`.
    pub fn transform(&self, path: &PathAddress, op: &TransformOp) -> Result<()> {
        debug!("applying {} to '{path}'", op.name());
        self.backend_for(path.prefix())?.transform(path, op)
    }
}

impl Resolver for Filesystem {
    fn resolve(&self, path: &PathAddress) -> Result<FileInfo> {
        Filesystem::resolve(self, path)
    }
}

impl Lister for Filesystem {
    fn list_dir(&self, path: &PathAddress) -> Result<Vec<(String, ChildRecord)>> {
        self.backend_for(path.prefix())?.list_dir(path)
    }
}

impl Copier for Filesystem {
    fn copy(&self, source: &PathAddress, dest: &PathAddress) -> Result<()> {
        Filesystem::copy(self, source, dest)
    }
}

impl Transformer for Filesystem {
    fn transform(&self, path: &PathAddress, op: &TransformOp) -> Result<()> {
        Filesystem::transform(self, path, op)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checks;
    use crate::memory::MemoryBackend;

    fn mounted() -> Filesystem {
        let docs = Arc::new(MemoryBackend::new());
        docs.add_file("/guide.md", "guide");
        let media = Arc::new(MemoryBackend::new());
        media.add_file("/cat.jpg", "meow");

        let mut fs = Filesystem::new();
        fs.mount("docs", docs);
        fs.mount("media", media);
        fs
    }

    #[test]
    fn test_routes_by_prefix() {
        let fs = mounted();
        assert!(
            fs.resolve(&PathAddress::parse("docs::/guide.md"))
                .unwrap()
                .is_file()
        );
        assert!(
            fs.resolve(&PathAddress::parse("media::/cat.jpg"))
                .unwrap()
                .is_file()
        );
        assert!(fs.resolve(&PathAddress::parse("docs::/cat.jpg")).is_err());
    }

    #[test]
    fn test_unknown_prefix_is_an_error() {
        let fs = mounted();
        let err = fs
            .resolve(&PathAddress::parse("tapes::/reel1"))
            .unwrap_err();
        assert!(matches!(err, Error::UnknownPrefix { .. }));
    }

    #[test]
    fn test_prefixes_in_mount_order() {
        let fs = mounted();
        let prefixes: Vec<&str> = fs.prefixes().collect();
        assert_eq!(prefixes, ["docs", "media"]);
    }

    #[test]
    fn test_remount_replaces_the_backend() {
        let mut fs = mounted();
        let other = Arc::new(MemoryBackend::new());
        other.add_file("/fresh.md", "fresh");
        fs.mount("docs", other);
        assert!(fs.resolve(&PathAddress::parse("docs::/guide.md")).is_err());
        assert!(fs.resolve(&PathAddress::parse("docs::/fresh.md")).is_ok());
    }

    #[test]
    fn test_list_contents_builds_a_node() {
        let fs = mounted();
        let node = fs.list_contents(&PathAddress::parse("docs::/")).unwrap();
        assert!(node.has_file("guide.md"));
    }

    #[test]
    fn test_copy_within_one_backend() {
        let fs = mounted();
        fs.copy(
            &PathAddress::parse("docs::/guide.md"),
            &PathAddress::parse("docs::/copy.md"),
        )
        .unwrap();
        assert!(fs.resolve(&PathAddress::parse("docs::/copy.md")).is_ok());
    }

    #[test]
    fn test_copy_across_prefixes_is_refused() {
        let fs = mounted();
        let err = fs
            .copy(
                &PathAddress::parse("docs::/guide.md"),
                &PathAddress::parse("media::/guide.md"),
            )
            .unwrap_err();
        assert!(matches!(err, Error::CrossFilesystem { .. }));
    }

    #[test]
    fn test_facade_satisfies_the_resolver_capability() {
        let fs = mounted();
        assert!(checks::is_file(&fs, &PathAddress::parse("docs::/guide.md")).unwrap());
    }
}
