//! Depth-first expansion over a tree of folder nodes.

use std::collections::HashSet;
use std::sync::Arc;

use crate::backend::Backend;
use crate::checks;
use crate::contents::FilesystemContents;
use crate::error::{Error, Result};
use crate::iter::contents::{ContentsIterator, CurrentShape, Entry, IterFlags};
use crate::types::FileInfo;

/// Which way a recursive walk hands nodes back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SearchOrder {
    /// Descendants are yielded before the folder that contains them; the
    /// right order for operations like recursive delete.
    #[default]
    ChildFirst,
    /// A folder is yielded before its descendants.
    SelfFirst,
}

/// A [`ContentsIterator`] that knows how to descend.
///
/// `current` is always resolved [`FileInfo`] here, whatever the requested
/// flags say: recursion cannot decide where to descend from a bare path. The
/// other axes are inherited unchanged by every child iterator.
pub struct RecursiveContentsIterator {
    inner: ContentsIterator,
}

impl RecursiveContentsIterator {
    pub fn new(contents: &FilesystemContents, flags: IterFlags) -> Self {
        let flags = IterFlags {
            current: CurrentShape::Info,
            ..flags
        };
        Self {
            inner: ContentsIterator::new(contents, flags),
        }
    }

    pub fn flags(&self) -> IterFlags {
        self.inner.flags()
    }

    pub fn current(&self) -> Option<Entry> {
        self.inner.current()
    }

    pub fn key(&self) -> Option<String> {
        self.inner.key()
    }

    pub fn next(&mut self) {
        self.inner.next();
    }

    pub fn rewind(&mut self) {
        self.inner.rewind();
    }

    pub fn valid(&self) -> bool {
        self.inner.valid()
    }

    pub fn seek(&mut self, position: usize) -> Result<()> {
        self.inner.seek(position)
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Is the cursor pointing at something that can be descended into?
    ///
    /// True for a folder; with `follow_symlinks` set, also for a symlink
    /// that resolves to a folder. A link that cannot be resolved (missing
    /// target, cycle) has nothing to descend into and reports `false`.
    pub fn has_children(&self) -> bool {
        let Some(Entry::Info(info)) = self.inner.current() else {
            return false;
        };
        if info.is_folder() {
            return true;
        }
        if info.is_link() && self.inner.flags().follow_symlinks {
            return checks::is_folder_info(self.inner.backend().as_ref(), &info)
                .unwrap_or(false);
        }
        false
    }

    /// A new iterator over the child node at the cursor, same flags.
    pub fn children(&self) -> Result<Self> {
        let entry = self.inner.current().ok_or_else(|| Error::NotAFolder {
            path: self.inner.base().to_string(),
        })?;
        let child = FilesystemContents::load(self.inner.backend().clone(), entry.address())?;
        Ok(Self {
            inner: ContentsIterator::new(&child, self.inner.flags()),
        })
    }
}

struct Frame {
    iter: RecursiveContentsIterator,
    /// The folder that owns `iter`, handed back on pop in child-first order.
    node: Option<FileInfo>,
    /// The current position was consumed; advance past it on the next visit.
    advance_pending: bool,
}

/// Lazy depth-first traversal over a folder and everything beneath it.
///
/// Yields every reachable node exactly once, the starting folder included.
/// Children whose resolution fails are skipped rather than aborting the
/// walk. When symlink-following is on, folders already expanded (by real
/// path) are not expanded again, so cyclic links cannot recurse forever —
/// the link itself is still yielded, as a leaf.
///
/// Pull-based: backend work happens only when the consumer asks for the next
/// node, so stopping early leaves the rest of the tree untouched.
pub struct RecursiveWalk {
    backend: Arc<dyn Backend>,
    order: SearchOrder,
    /// Root node: yielded up front in self-first order, last in child-first.
    pending_root: Option<FileInfo>,
    stack: Vec<Frame>,
    /// Real paths of folders already expanded.
    visited: HashSet<String>,
}

impl RecursiveWalk {
    pub fn new(root: &FilesystemContents, flags: IterFlags, order: SearchOrder) -> Self {
        let root_info = root.info().clone();
        let mut visited = HashSet::new();
        visited.insert(root_info.real_address().to_string());
        Self {
            backend: root.backend().clone(),
            order,
            pending_root: Some(root_info),
            stack: vec![Frame {
                iter: RecursiveContentsIterator::new(root, flags),
                node: None,
                advance_pending: false,
            }],
            visited,
        }
    }

    /// Where descending through this entry actually lands, for cycle
    /// bookkeeping. `None` when the target cannot be pinned down.
    fn descent_key(&self, info: &FileInfo) -> Option<String> {
        if info.is_folder() {
            return Some(info.real_address().to_string());
        }
        checks::resolve_links(self.backend.as_ref(), info.clone())
            .ok()
            .filter(FileInfo::is_folder)
            .map(|target| target.real_address().to_string())
    }
}

impl Iterator for RecursiveWalk {
    type Item = FileInfo;

    fn next(&mut self) -> Option<FileInfo> {
        if self.order == SearchOrder::SelfFirst {
            if let Some(root) = self.pending_root.take() {
                return Some(root);
            }
        }
        loop {
            let Some(frame) = self.stack.last_mut() else {
                return self.pending_root.take();
            };
            if frame.advance_pending {
                frame.advance_pending = false;
                frame.iter.next();
                continue;
            }
            if !frame.iter.valid() {
                if let Some(node) = self.stack.pop().and_then(|done| done.node) {
                    return Some(node);
                }
                continue;
            }
            frame.advance_pending = true;
            let entry = frame.iter.current();
            let child_iter = if frame.iter.has_children() {
                frame.iter.children().ok()
            } else {
                None
            };
            let Some(Entry::Info(info)) = entry else {
                continue;
            };
            if let Some(child_iter) = child_iter {
                if let Some(key) = self.descent_key(&info) {
                    if self.visited.insert(key) {
                        let node =
                            (self.order == SearchOrder::ChildFirst).then(|| info.clone());
                        self.stack.push(Frame {
                            iter: child_iter,
                            node,
                            advance_pending: false,
                        });
                        match self.order {
                            SearchOrder::SelfFirst => return Some(info),
                            SearchOrder::ChildFirst => continue,
                        }
                    }
                }
                // Already expanded through another route: keep it, as a leaf.
            }
            return Some(info);
        }
    }
}
