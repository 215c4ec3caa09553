#![allow(clippy::unwrap_used, clippy::expect_used)]

use super::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn write(root: &Path, rel: &str, text: &str) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, text).unwrap();
}

fn tree() -> TempDir {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "a.go", "package root\n");
    write(dir.path(), "a_test.go", "package root\n");
    write(dir.path(), "README.md", "not go\n");
    write(dir.path(), "sub/b.go", "package sub\n");
    write(dir.path(), "sub/deeper/c.go", "package deeper\n");
    fs::create_dir_all(dir.path().join("empty")).unwrap();
    dir
}

#[test]
fn test_one_unit_per_directory_with_sources() {
    let dir = tree();
    let units = UnitWalker::default().units_for_path(dir.path()).unwrap();
    let paths: Vec<_> = units.iter().map(|u| u.path().to_path_buf()).collect();
    assert_eq!(
        paths,
        vec![
            dir.path().to_path_buf(),
            dir.path().join("sub"),
            dir.path().join("sub/deeper"),
        ]
    );
    assert_eq!(units[0].files().len(), 2);
    assert!(units.iter().all(|u| !u.is_single_file()));
}

#[test]
fn test_non_recursive_only_reads_root() {
    let dir = tree();
    let walker = UnitWalker::new(WalkOptions {
        recursive: false,
        ..WalkOptions::default()
    });
    let units = walker.units_in_directory(dir.path()).unwrap();
    assert_eq!(units.len(), 1);
    assert_eq!(units[0].path(), dir.path());
}

#[test]
fn test_skip_tests() {
    let dir = tree();
    let walker = UnitWalker::new(WalkOptions {
        include_tests: false,
        ..WalkOptions::default()
    });
    let units = walker.units_for_path(dir.path()).unwrap();
    assert_eq!(units[0].files(), &[dir.path().join("a.go")]);
}

#[test]
fn test_file_root_is_single_unit() {
    let dir = tree();
    let file = dir.path().join("sub/b.go");
    let units = UnitWalker::default().units_for_path(&file).unwrap();
    assert_eq!(units.len(), 1);
    assert!(units[0].is_single_file());
    assert_eq!(units[0].files(), &[file]);
}

#[test]
fn test_file_root_via_directory_entry_fails() {
    let dir = tree();
    let file = dir.path().join("a.go");
    let err = UnitWalker::default().units_in_directory(&file).unwrap_err();
    assert!(matches!(err, WalkError::NotADirectory(_)));
    assert!(err.to_string().ends_with("path must be a directory"));
}

#[test]
fn test_missing_root_is_path_error() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("nope");
    let err = UnitWalker::default().units_for_path(&missing).unwrap_err();
    assert!(matches!(err, WalkError::Path { .. }));
    assert_eq!(err.path(), missing.as_path());
}

#[test]
fn test_directory_without_sources_yields_no_units() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "notes.txt", "hello");
    let units = UnitWalker::default().units_for_path(dir.path()).unwrap();
    assert!(units.is_empty());
}

#[test]
fn test_load_file() {
    let dir = tree();
    let loaded = load_file(&dir.path().join("sub/b.go")).unwrap();
    assert_eq!(&*loaded.text, "package sub\n");
    assert!(load_file(&dir.path().join("missing.go")).is_err());
}

#[test]
fn test_source_file_predicates() {
    assert!(is_source_file(Path::new("x/file1.go")));
    assert!(!is_source_file(Path::new("x/file1.go.txt")));
    assert!(is_test_file(Path::new("impl_test.go")));
    assert!(!is_test_file(Path::new("impl.go")));
}

#[test]
fn test_module_path_directive() {
    assert_eq!(
        module_path("// generated\nmodule example.com/m // main module\n\ngo 1.22\n").as_deref(),
        Some("example.com/m")
    );
    assert_eq!(module_path("module \"example.com/quoted\"\n").as_deref(), Some("example.com/quoted"));
    assert_eq!(module_path("modules example.com/m\n"), None);
    assert_eq!(module_path("go 1.22\n"), None);
}

#[test]
fn test_units_inside_a_module_carry_import_paths() {
    let dir = tree();
    write(dir.path(), GO_MOD, "module example.com/m\n\ngo 1.22\n");
    let units = UnitWalker::default().units_for_path(dir.path()).unwrap();
    let paths: Vec<_> = units.iter().map(|u| u.import_path()).collect();
    assert_eq!(
        paths,
        vec![
            Some("example.com/m"),
            Some("example.com/m/sub"),
            Some("example.com/m/sub/deeper"),
        ]
    );

    let single = UnitWalker::default()
        .units_for_path(&dir.path().join("sub/b.go"))
        .unwrap();
    assert_eq!(single[0].import_path(), Some("example.com/m/sub"));
}

#[test]
fn test_nested_module_takes_precedence() {
    let dir = tree();
    write(dir.path(), GO_MOD, "module example.com/m\n");
    write(dir.path(), "sub/go.mod", "module example.com/other\n");
    let units = UnitWalker::default().units_for_path(dir.path()).unwrap();
    let paths: Vec<_> = units.iter().map(|u| u.import_path()).collect();
    assert_eq!(
        paths,
        vec![
            Some("example.com/m"),
            Some("example.com/other"),
            Some("example.com/other/deeper"),
        ]
    );
}

#[test]
fn test_units_outside_a_module_have_no_import_path() {
    let dir = tree();
    let units = UnitWalker::default().units_for_path(dir.path()).unwrap();
    assert!(units.iter().all(|u| u.import_path().is_none()));
}
