//! Integration tests for the build pipeline
//!
//! These tests run full builds against temporary addon trees and validate
//! the resulting archive contents by reading them back. Tests that need the
//! system `git` binary are gated behind the `integration-tests` feature.

use std::fs;
use std::io::Cursor;
use std::path::Path;
use std::process::Command;

use addon_packer::builder::Builder;
use addon_packer::cache::Cache;
use tempfile::TempDir;

/// Builds the addon in `dir` and returns the sorted archive entry names.
fn build_to_names(dir: &Path, cache: &mut Cache) -> Vec<String> {
    let mut buffer = Cursor::new(Vec::new());
    let builder = Builder::new(dir, "Fallback", "addon.zip", cache, &mut buffer).unwrap();
    builder.build().unwrap();

    let mut archive = zip::ZipArchive::new(buffer).unwrap();
    let mut names: Vec<String> = (0..archive.len())
        .map(|i| archive.by_index(i).unwrap().name().to_string())
        .collect();
    names.sort();
    names
}

fn write_tree(root: &Path, files: &[(&str, &str)]) {
    for (path, content) in files {
        let full = root.join(path);
        if let Some(parent) = full.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(full, content).unwrap();
    }
}

#[test]
fn test_round_trip_with_ignore_and_move_folders() {
    let addon = TempDir::new().unwrap();
    write_tree(
        addon.path(),
        &[
            (
                ".pkgmeta",
                "package-as: MyAddon\nignore:\n  - README.md\nmove-folders:\n  MyAddon/Libs: Libs\n",
            ),
            ("README.md", "# readme"),
            ("Core.lua", "-- core"),
            ("Libs/Ace3/Ace.lua", "-- ace"),
        ],
    );

    let cache_dir = TempDir::new().unwrap();
    let mut cache = Cache::open(Some(cache_dir.path().to_path_buf()));

    let names = build_to_names(addon.path(), &mut cache);
    assert_eq!(
        names,
        vec![
            "Libs/Ace3/Ace.lua".to_string(),
            "MyAddon/Core.lua".to_string(),
        ]
    );
}

#[test]
fn test_package_name_falls_back_to_caller_supplied_name() {
    let addon = TempDir::new().unwrap();
    write_tree(addon.path(), &[(".pkgmeta", "{}"), ("Core.lua", "-- core")]);

    let cache_dir = TempDir::new().unwrap();
    let mut cache = Cache::open(Some(cache_dir.path().to_path_buf()));

    let names = build_to_names(addon.path(), &mut cache);
    assert_eq!(names, vec!["Fallback/Core.lua".to_string()]);
}

#[test]
fn test_archive_content_round_trips() {
    let addon = TempDir::new().unwrap();
    write_tree(
        addon.path(),
        &[(".pkgmeta", "package-as: MyAddon\n"), ("Core.lua", "-- core logic")],
    );

    let cache_dir = TempDir::new().unwrap();
    let mut cache = Cache::open(Some(cache_dir.path().to_path_buf()));

    let mut buffer = Cursor::new(Vec::new());
    let builder = Builder::new(addon.path(), "Fallback", "addon.zip", &mut cache, &mut buffer)
        .unwrap();
    builder.build().unwrap();

    let mut archive = zip::ZipArchive::new(buffer).unwrap();
    let mut entry = archive.by_name("MyAddon/Core.lua").unwrap();
    let mut content = String::new();
    std::io::Read::read_to_string(&mut entry, &mut content).unwrap();
    assert_eq!(content, "-- core logic");
}

/// Initializes a git repository with one commit containing `files`.
fn init_git_repo(root: &Path, files: &[(&str, &str)]) {
    write_tree(root, files);
    for args in [
        vec!["init", "--initial-branch=main"],
        vec!["config", "user.email", "test@example.com"],
        vec!["config", "user.name", "Test"],
        vec!["add", "."],
        vec!["commit", "-m", "initial"],
    ] {
        let status = Command::new("git")
            .current_dir(root)
            .args(&args)
            .output()
            .unwrap();
        assert!(status.status.success(), "git {:?} failed", args);
    }
}

#[test]
#[cfg_attr(not(feature = "integration-tests"), ignore)]
fn test_external_checkout_lands_under_target_path() {
    let library = TempDir::new().unwrap();
    init_git_repo(
        library.path(),
        &[("MyLib.lua", "-- lib"), ("MyLib.xml", "<Ui/>")],
    );

    let addon = TempDir::new().unwrap();
    let meta = format!(
        "package-as: MyAddon\nexternals:\n  Libs/MyLib: {}\n",
        library.path().display()
    );
    write_tree(
        addon.path(),
        &[(".pkgmeta", meta.as_str()), ("Core.lua", "-- core")],
    );

    let cache_dir = TempDir::new().unwrap();
    let mut cache = Cache::open(Some(cache_dir.path().to_path_buf()));

    let names = build_to_names(addon.path(), &mut cache);
    assert_eq!(
        names,
        vec![
            "MyAddon/Core.lua".to_string(),
            "MyAddon/Libs/MyLib/MyLib.lua".to_string(),
            "MyAddon/Libs/MyLib/MyLib.xml".to_string(),
        ]
    );
}

#[test]
#[cfg_attr(not(feature = "integration-tests"), ignore)]
fn test_external_pinned_tag_checks_out_that_revision() {
    let library = TempDir::new().unwrap();
    init_git_repo(library.path(), &[("MyLib.lua", "-- v1")]);

    let tag = Command::new("git")
        .current_dir(library.path())
        .args(["tag", "v1"])
        .output()
        .unwrap();
    assert!(tag.status.success());

    // Move the default branch past the tag.
    write_tree(library.path(), &[("MyLib.lua", "-- v2")]);
    for args in [vec!["add", "."], vec!["commit", "-m", "second"]] {
        let status = Command::new("git")
            .current_dir(library.path())
            .args(&args)
            .output()
            .unwrap();
        assert!(status.status.success());
    }

    let addon = TempDir::new().unwrap();
    let meta = format!(
        "package-as: MyAddon\nexternals:\n  Libs/MyLib:\n    url: {}\n    tag: v1\n",
        library.path().display()
    );
    write_tree(addon.path(), &[(".pkgmeta", meta.as_str())]);

    let cache_dir = TempDir::new().unwrap();
    let mut cache = Cache::open(Some(cache_dir.path().to_path_buf()));

    let mut buffer = Cursor::new(Vec::new());
    let builder = Builder::new(addon.path(), "Fallback", "addon.zip", &mut cache, &mut buffer)
        .unwrap();
    builder.build().unwrap();

    let mut archive = zip::ZipArchive::new(buffer).unwrap();
    let mut entry = archive.by_name("MyAddon/Libs/MyLib/MyLib.lua").unwrap();
    let mut content = String::new();
    std::io::Read::read_to_string(&mut entry, &mut content).unwrap();
    assert_eq!(content, "-- v1");
}

#[test]
#[cfg_attr(not(feature = "integration-tests"), ignore)]
fn test_second_build_reuses_cached_checkout() {
    let library = TempDir::new().unwrap();
    init_git_repo(library.path(), &[("MyLib.lua", "-- lib")]);

    let tag = Command::new("git")
        .current_dir(library.path())
        .args(["tag", "v1"])
        .output()
        .unwrap();
    assert!(tag.status.success());

    let addon = TempDir::new().unwrap();
    let meta = format!(
        "package-as: MyAddon\nexternals:\n  Libs/MyLib:\n    url: {}\n    tag: v1\n",
        library.path().display()
    );
    write_tree(addon.path(), &[(".pkgmeta", meta.as_str())]);

    let cache_root = TempDir::new().unwrap();

    let mut cache = Cache::open(Some(cache_root.path().to_path_buf()));
    let first = build_to_names(addon.path(), &mut cache);

    // A fresh cache instance over the same root must reuse the directory
    // recorded in the persisted index.
    let mut cache = Cache::open(Some(cache_root.path().to_path_buf()));
    let (_, fresh) = cache
        .dir_for(&library.path().display().to_string(), "v1")
        .unwrap();
    assert!(!fresh);

    let second = build_to_names(addon.path(), &mut cache);
    assert_eq!(first, second);
}
