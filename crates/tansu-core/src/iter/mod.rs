//! Iteration over filesystem contents.
//!
//! [`ContentsIterator`] is a seekable cursor over one folder's children;
//! [`RecursiveContentsIterator`] adds the parent/child relationship, and
//! [`RecursiveWalk`] turns that into a lazy depth-first traversal.
//! [`descend_path`] walks a path's own ancestry instead of the tree.

pub mod contents;
pub mod descend;
pub mod recursive;

pub use contents::{ContentsIterator, CurrentShape, Entry, IterFlags, KeyShape};
pub use descend::{DescendPath, descend_path};
pub use recursive::{RecursiveContentsIterator, RecursiveWalk, SearchOrder};
