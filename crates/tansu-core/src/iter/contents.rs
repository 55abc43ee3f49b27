//! A seekable, flag-configured cursor over one folder's children.

use std::sync::Arc;

use crate::backend::Backend;
use crate::contents::FilesystemContents;
use crate::error::{Error, Result};
use crate::path::PathAddress;
use crate::types::FileInfo;

/// Shape of what [`ContentsIterator::current`] yields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CurrentShape {
    /// Resolved [`FileInfo`] values.
    #[default]
    Info,
    /// Full path addresses, with no backend confirmation.
    FullPath,
}

/// Shape of what [`ContentsIterator::key`] yields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum KeyShape {
    /// The child's full prefixed path.
    #[default]
    FullPath,
    /// The bare child name.
    Name,
}

/// Iterator behavior, one named field per axis.
///
/// The axes are independent; the default matches what recursive walks want:
/// resolved values, full-path keys, dot entries skipped, symlinks not
/// followed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IterFlags {
    pub current: CurrentShape,
    pub key: KeyShape,
    /// Treat a child symlink that points at a folder as a folder for
    /// recursion purposes.
    pub follow_symlinks: bool,
    /// Leave `.` and `..` style self/parent entries out of the name list.
    pub skip_dots: bool,
}

impl Default for IterFlags {
    fn default() -> Self {
        Self {
            current: CurrentShape::default(),
            key: KeyShape::default(),
            follow_symlinks: false,
            skip_dots: true,
        }
    }
}

/// What the cursor is pointing at, shaped by [`IterFlags::current`].
#[derive(Debug, Clone, PartialEq)]
pub enum Entry {
    FullPath(PathAddress),
    Info(FileInfo),
}

impl Entry {
    pub fn address(&self) -> &PathAddress {
        match self {
            Entry::FullPath(path) => path,
            Entry::Info(info) => &info.address,
        }
    }

    pub fn into_info(self) -> Option<FileInfo> {
        match self {
            Entry::Info(info) => Some(info),
            Entry::FullPath(_) => None,
        }
    }
}

/// A stateful cursor over one [`FilesystemContents`] node's children.
///
/// Construction snapshots the child-name list once; mutating the node
/// afterwards does not change what an existing iterator enumerates. The
/// resolved value for the current position is computed once per cursor move,
/// so reading [`Self::current`] repeatedly is free.
pub struct ContentsIterator {
    backend: Arc<dyn Backend>,
    base: PathAddress,
    flags: IterFlags,
    names: Vec<String>,
    position: usize,
    current_info: Option<FileInfo>,
}

impl ContentsIterator {
    pub fn new(contents: &FilesystemContents, flags: IterFlags) -> Self {
        let names = contents
            .filenames()
            .iter()
            .filter(|name| !flags.skip_dots || (name.as_str() != "." && name.as_str() != ".."))
            .cloned()
            .collect();
        let mut iter = Self {
            backend: contents.backend().clone(),
            base: contents.address().clone(),
            flags,
            names,
            position: 0,
            current_info: None,
        };
        iter.refresh_current();
        iter
    }

    pub fn flags(&self) -> IterFlags {
        self.flags
    }

    /// The folder this cursor enumerates.
    pub fn base(&self) -> &PathAddress {
        &self.base
    }

    pub(crate) fn backend(&self) -> &Arc<dyn Backend> {
        &self.backend
    }

    /// Number of snapshotted entries.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Is the cursor within bounds?
    pub fn valid(&self) -> bool {
        self.position < self.names.len()
    }

    /// What the cursor points at, or `None` past the end.
    ///
    /// With [`CurrentShape::Info`], `None` also stands in for a child whose
    /// resolution failed: lookups racing concurrent backend mutation are
    /// routine during tree walks and must not abort them.
    pub fn current(&self) -> Option<Entry> {
        if !self.valid() {
            return None;
        }
        match self.flags.current {
            CurrentShape::FullPath => Some(Entry::FullPath(
                self.base.with_child(&self.names[self.position]),
            )),
            CurrentShape::Info => self.current_info.clone().map(Entry::Info),
        }
    }

    /// The iteration key for the current position, or `None` past the end.
    pub fn key(&self) -> Option<String> {
        if !self.valid() {
            return None;
        }
        let name = &self.names[self.position];
        Some(match self.flags.key {
            KeyShape::FullPath => self.base.with_child(name).to_string(),
            KeyShape::Name => name.clone(),
        })
    }

    /// Advance the cursor by one.
    pub fn next(&mut self) {
        self.position += 1;
        self.refresh_current();
    }

    /// Reset the cursor to the first entry.
    pub fn rewind(&mut self) {
        self.position = 0;
        self.refresh_current();
    }

    /// Jump to `position`; out of range fails and leaves the cursor put.
    pub fn seek(&mut self, position: usize) -> Result<()> {
        if position >= self.names.len() {
            return Err(Error::InvalidSeek {
                position,
                len: self.names.len(),
            });
        }
        self.position = position;
        self.refresh_current();
        Ok(())
    }

    /// Resolve the value for the current position, once per cursor move.
    fn refresh_current(&mut self) {
        self.current_info = None;
        if !self.valid() || self.flags.current != CurrentShape::Info {
            return;
        }
        let child = self.base.with_child(&self.names[self.position]);
        self.current_info = self.backend.resolve(&child).ok();
    }
}
