//! Ancestor-by-ancestor descent of a path.

use std::vec;

use crate::path::{PathAddress, PathInfo};

/// Yields the cumulative path at each level from the filesystem root down to
/// the target, the target itself last. See [`descend_path`].
pub struct DescendPath {
    prefix: String,
    absolute: bool,
    so_far: String,
    segments: vec::IntoIter<String>,
}

/// Walk a path's own ancestry, top down.
///
/// `fs::/a/b/c` yields `fs::/a`, `fs::/a/b`, `fs::/a/b/c`. Empty segments
/// collapse, so doubled separators change nothing. Pure string work; the
/// backend is never consulted. Callers that need every ancestor folder to
/// exist before creating a descendant walk this and create as they go.
pub fn descend_path(path: &PathAddress) -> DescendPath {
    let segments: Vec<String> = path
        .full_path()
        .split('/')
        .filter(|segment| !segment.is_empty())
        .map(String::from)
        .collect();
    DescendPath {
        prefix: path.prefix().to_string(),
        absolute: path.full_path().starts_with('/'),
        so_far: String::new(),
        segments: segments.into_iter(),
    }
}

impl Iterator for DescendPath {
    type Item = PathAddress;

    fn next(&mut self) -> Option<PathAddress> {
        let segment = self.segments.next()?;
        if self.so_far.is_empty() && !self.absolute {
            self.so_far = segment;
        } else {
            self.so_far.push('/');
            self.so_far.push_str(&segment);
        }
        Some(PathAddress::from_parts(
            self.prefix.clone(),
            self.so_far.clone(),
        ))
    }
}
