//! End-to-end traversal over a real on-disk tree.

use std::fs;
use std::sync::Arc;

use tempfile::TempDir;

use tansu_core::{
    Filesystem, IterFlags, LocalBackend, PathAddress, PathInfo, RecursiveWalk, SearchOrder,
    descend_path, find_all_files, find_matching_folders, ops,
};

fn setup() -> (TempDir, Filesystem) {
    let dir = TempDir::new().unwrap();
    fs::create_dir_all(dir.path().join("projects/alpha/src")).unwrap();
    fs::create_dir_all(dir.path().join("projects/beta")).unwrap();
    fs::write(dir.path().join("projects/alpha/src/main.rs"), b"fn main() {}").unwrap();
    fs::write(dir.path().join("projects/alpha/README.md"), b"# alpha").unwrap();
    fs::write(dir.path().join("projects/beta/notes.txt"), b"beta notes").unwrap();

    let mut vfs = Filesystem::new();
    vfs.mount(
        "work",
        Arc::new(LocalBackend::new(dir.path().to_path_buf())),
    );
    (dir, vfs)
}

#[test]
fn test_find_all_files_covers_the_tree_exactly_once() {
    let (_dir, vfs) = setup();
    let mut names: Vec<String> = find_all_files(
        &vfs,
        &PathAddress::parse("work::/projects"),
        SearchOrder::ChildFirst,
    )
    .unwrap()
    .map(|item| item.unwrap().basename().to_string())
    .collect();
    names.sort();
    assert_eq!(names, ["README.md", "main.rs", "notes.txt"]);
}

#[test]
fn test_find_matching_folders_by_name() {
    let (_dir, vfs) = setup();
    let matches: Vec<String> = find_matching_folders(
        &vfs,
        &PathAddress::parse("work::/projects"),
        SearchOrder::SelfFirst,
        |info| info.basename() == "src",
    )
    .unwrap()
    .map(|item| item.unwrap().address.to_string())
    .collect();
    assert_eq!(matches, ["work::/projects/alpha/src"]);
}

#[test]
fn test_walk_is_deterministic_across_runs() {
    let (_dir, vfs) = setup();
    let run = || -> Vec<String> {
        let root = vfs
            .list_contents(&PathAddress::parse("work::/projects"))
            .unwrap();
        RecursiveWalk::new(&root, IterFlags::default(), SearchOrder::SelfFirst)
            .map(|info| info.address.to_string())
            .collect()
    };
    let first = run();
    assert_eq!(first.len(), 7);
    assert_eq!(first, run());
}

#[test]
fn test_descend_path_guides_folder_creation() {
    let (dir, vfs) = setup();
    let target = PathAddress::parse("work::/archive/2026/q3");
    for ancestor in descend_path(&target) {
        let os = dir.path().join(&ancestor.full_path()[1..]);
        if vfs.resolve(&ancestor).is_err() {
            fs::create_dir(&os).unwrap();
        }
    }
    assert!(
        vfs.resolve(&target).unwrap().is_folder(),
        "every ancestor was created in root-down order"
    );
}

#[test]
fn test_copy_then_walk_sees_the_duplicate() {
    let (_dir, vfs) = setup();
    ops::copy(
        &vfs,
        &PathAddress::parse("work::/projects/alpha"),
        &PathAddress::parse("work::/projects/gamma"),
    )
    .unwrap();
    let copied: Vec<String> = find_all_files(
        &vfs,
        &PathAddress::parse("work::/projects/gamma"),
        SearchOrder::ChildFirst,
    )
    .unwrap()
    .map(|item| item.unwrap().basename().to_string())
    .collect();
    assert_eq!(copied.len(), 2);
    assert!(copied.contains(&"README.md".to_string()));
}
