//! Existence and kind predicates.
//!
//! [`is_file`] and [`is_folder`] are the only place in the crate that decides
//! what an entity *is*; the find/filter layer composes them rather than
//! re-deriving kind logic. Symlinks are classified by what they ultimately
//! point at, following the chain one hop at a time.
//!
//! Every predicate returns `Result<bool>` instead of taking a failure
//! handler: the immediate caller decides whether an unresolvable path means
//! "no" (tree walks) or a hard failure (direct inspection).

use std::collections::HashSet;

use crate::backend::Resolver;
use crate::error::{Error, Result};
use crate::path::{PathAddress, PathInfo};
use crate::types::FileInfo;

/// Upper bound on symlink chain length, mirroring common kernel limits.
const MAX_LINK_HOPS: usize = 40;

/// Follow symlinks until a non-link entity is reached.
///
/// A revisited target or an over-long chain fails with
/// [`Error::SymlinkCycle`]; this never loops forever. Non-links pass through
/// unchanged.
pub fn resolve_links<R: Resolver + ?Sized>(resolver: &R, mut info: FileInfo) -> Result<FileInfo> {
    let mut seen: HashSet<String> = HashSet::new();
    let mut hops = 0;
    while info.is_link() {
        if hops >= MAX_LINK_HOPS || !seen.insert(info.real_path.clone()) {
            return Err(Error::SymlinkCycle {
                path: info.prefixed_path(),
            });
        }
        hops += 1;
        info = resolver.resolve(&info.real_address())?;
    }
    Ok(info)
}

/// Is there a folder at `path`?
///
/// True for a real folder and for a symlink that ultimately points at one.
pub fn is_folder<R: Resolver + ?Sized>(resolver: &R, path: &PathAddress) -> Result<bool> {
    let info = resolver.resolve(path)?;
    is_folder_info(resolver, &info)
}

/// [`is_folder`], starting from an already-resolved description.
pub fn is_folder_info<R: Resolver + ?Sized>(resolver: &R, info: &FileInfo) -> Result<bool> {
    if info.is_folder() {
        return Ok(true);
    }
    if info.is_link() {
        return Ok(resolve_links(resolver, info.clone())?.is_folder());
    }
    Ok(false)
}

/// Is there a file at `path`?
///
/// True for a real file and for a symlink that ultimately points at one.
pub fn is_file<R: Resolver + ?Sized>(resolver: &R, path: &PathAddress) -> Result<bool> {
    let info = resolver.resolve(path)?;
    is_file_info(resolver, &info)
}

/// [`is_file`], starting from an already-resolved description.
pub fn is_file_info<R: Resolver + ?Sized>(resolver: &R, info: &FileInfo) -> Result<bool> {
    if info.is_file() {
        return Ok(true);
    }
    if info.is_link() {
        return Ok(resolve_links(resolver, info.clone())?.is_file());
    }
    Ok(false)
}
