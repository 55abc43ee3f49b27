//! Lazy find/filter operations over a filesystem tree.
//!
//! Each operation walks the subtree under a starting folder (the folder
//! itself included) and filters what the walk yields through the predicates
//! in [`crate::checks`]. The returned iterators are single-pass and
//! pull-based: nothing beyond the entries already consumed is ever listed or
//! resolved, and re-running an operation starts a fresh walk.
//!
//! Item type is `Result<FileInfo>`. An entry that merely cannot be resolved
//! is not a match and is dropped silently; a broken invariant underneath
//! (a symlink cycle, say) comes back as an `Err` item instead of vanishing.

use crate::checks;
use crate::error::Result;
use crate::filesystem::Filesystem;
use crate::iter::{IterFlags, RecursiveWalk, SearchOrder};
use crate::path::PathAddress;
use crate::types::FileInfo;

fn keep_match(
    fs: &Filesystem,
    info: FileInfo,
    check: fn(&Filesystem, &FileInfo) -> Result<bool>,
) -> Option<Result<FileInfo>> {
    match check(fs, &info) {
        Ok(true) => Some(Ok(info)),
        Ok(false) => None,
        Err(err) if err.is_skippable() => None,
        Err(err) => Some(Err(err)),
    }
}

/// Every file under `path`: real files and symlinks resolving to files,
/// hidden ones included.
///
/// Fails up front when `path` itself cannot be listed.
pub fn find_all_files<'a>(
    fs: &'a Filesystem,
    path: &PathAddress,
    order: SearchOrder,
) -> Result<impl Iterator<Item = Result<FileInfo>> + use<'a>> {
    let root = fs.list_contents(path)?;
    let walk = RecursiveWalk::new(&root, IterFlags::default(), order);
    Ok(walk.filter_map(move |info| keep_match(fs, info, checks::is_file_info)))
}

/// Every folder under `path`, the starting folder included: real folders and
/// symlinks resolving to folders.
pub fn find_all_folders<'a>(
    fs: &'a Filesystem,
    path: &PathAddress,
    order: SearchOrder,
) -> Result<impl Iterator<Item = Result<FileInfo>> + use<'a>> {
    let root = fs.list_contents(path)?;
    let walk = RecursiveWalk::new(&root, IterFlags::default(), order);
    Ok(walk.filter_map(move |info| keep_match(fs, info, checks::is_folder_info)))
}

/// [`find_all_folders`], narrowed by a caller-supplied predicate.
///
/// Errors from the underlying walk pass through unfiltered; the predicate
/// only ever sees folders that actually resolved.
pub fn find_matching_folders<'a, F>(
    fs: &'a Filesystem,
    path: &PathAddress,
    order: SearchOrder,
    mut predicate: F,
) -> Result<impl Iterator<Item = Result<FileInfo>> + use<'a, F>>
where
    F: FnMut(&FileInfo) -> bool,
{
    let folders = find_all_folders(fs, path, order)?;
    Ok(folders.filter(move |item| match item {
        Ok(info) => predicate(info),
        Err(_) => true,
    }))
}
