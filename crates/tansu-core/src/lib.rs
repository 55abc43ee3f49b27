//! tansu-core: one path syntax and one traversal model over many storage
//! backends.
//!
//! Callers address files and folders as `prefix::path` strings; the prefix
//! selects a mounted backend, and everything above the backend — kind
//! checks, directory nodes, seekable iterators, recursive walks, find
//! filters — behaves identically whether the bytes live on local disk, in
//! memory, or behind an object-store SDK.
//!
//! # Architecture
//!
//! ```text
//! find/checks  ->  iterators  ->  Filesystem (prefix routing)  ->  Backend (dumb storage)
//! ```
//!
//! Backends implement four small capability traits ([`Resolver`], [`Lister`],
//! [`Copier`], [`Transformer`]) and know nothing about traversal. Traversal
//! is pull-based throughout: a consumer advancing a sequence is the only
//! thing that triggers backend work, so abandoning an iterator abandons the
//! remaining cost with it.
//!
//! # Quick start
//!
//! ```
//! use std::sync::Arc;
//! use tansu_core::{Filesystem, MemoryBackend, PathAddress, SearchOrder, find_all_files};
//!
//! let store = Arc::new(MemoryBackend::new());
//! store.add_file("/reports/2026/q1.txt", "totals");
//! store.add_file("/reports/cover.txt", "cover");
//!
//! let mut fs = Filesystem::new();
//! fs.mount("mem", store);
//!
//! let reports = PathAddress::parse("mem::/reports");
//! let found = find_all_files(&fs, &reports, SearchOrder::ChildFirst)
//!     .expect("reports folder exists")
//!     .filter_map(Result::ok)
//!     .count();
//! assert_eq!(found, 2);
//! ```

pub mod backend;
pub mod checks;
pub mod contents;
pub mod error;
pub mod filesystem;
pub mod find;
pub mod iter;
pub mod local;
pub mod memory;
pub mod ops;
pub mod path;
pub mod types;

pub use backend::{Backend, Copier, Lister, Resolver, TransformOp, Transformer};
pub use contents::FilesystemContents;
pub use error::{Error, Result};
pub use filesystem::Filesystem;
pub use find::{find_all_files, find_all_folders, find_matching_folders};
pub use iter::{
    ContentsIterator, CurrentShape, DescendPath, Entry, IterFlags, KeyShape,
    RecursiveContentsIterator, RecursiveWalk, SearchOrder, descend_path,
};
pub use local::LocalBackend;
pub use memory::MemoryBackend;
pub use ops::{ResizeImage, Transform};
pub use path::{FS_SEPARATOR, PathAddress, PathInfo};
pub use types::{ChildRecord, FileInfo, FileKind};
