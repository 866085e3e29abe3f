// Tests for marker directory discovery

use crate::common::{make_project, Recorder};
use modsweep::cleaner::{Config, Event, NullReporter, Scanner};
use std::fs;
use std::sync::Arc;

fn scanner(root: &std::path::Path) -> Scanner {
    Scanner::new(root.to_path_buf(), Arc::new(Config::default())).unwrap()
}

#[test]
fn test_nested_marker_is_pruned() {
    let dir = tempfile::tempdir().unwrap();
    let outer = make_project(dir.path(), "app", 2, 0, 0);

    // A package inside node_modules with its own manifest and node_modules
    let inner_pkg = outer.join("sub");
    fs::create_dir_all(inner_pkg.join("node_modules")).unwrap();
    fs::write(inner_pkg.join("package.json"), r#"{"dependencies":{"x":"1"}}"#).unwrap();

    let result = scanner(dir.path()).scan(&NullReporter);

    assert_eq!(result.candidates.len(), 1);
    assert_eq!(result.candidates[0].path, outer);
    assert_eq!(result.candidates[0].dependencies, 2);
}

#[test]
fn test_markers_without_valid_manifest_are_excluded() {
    let dir = tempfile::tempdir().unwrap();
    fs::create_dir_all(dir.path().join("no-manifest/node_modules")).unwrap();
    fs::create_dir_all(dir.path().join("broken/node_modules")).unwrap();
    fs::write(dir.path().join("broken/package.json"), "{\"dependencies\": [").unwrap();
    let good = make_project(dir.path(), "good", 1, 1, 0);

    let recorder = Recorder::default();
    let result = scanner(dir.path()).scan(&recorder);

    assert_eq!(result.candidates.len(), 1);
    assert_eq!(result.candidates[0].path, good);
    assert_eq!(result.skipped, 2);
    assert_eq!(recorder.count(|e| matches!(e, Event::Skipped { .. })), 2);
    assert_eq!(recorder.count(|e| matches!(e, Event::Discovered { .. })), 1);
}

#[test]
fn test_marker_file_is_not_a_candidate() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("node_modules"), b"not a directory").unwrap();
    fs::write(dir.path().join("package.json"), "{}").unwrap();

    let result = scanner(dir.path()).scan(&NullReporter);
    assert!(result.candidates.is_empty());
}

#[test]
fn test_finds_markers_at_every_depth() {
    let dir = tempfile::tempdir().unwrap();
    let mut expected = vec![
        make_project(dir.path(), "", 1, 0, 0),
        make_project(dir.path(), "packages/a", 2, 0, 0),
        make_project(dir.path(), "packages/b", 3, 0, 0),
        make_project(dir.path(), "deep/one/two/three", 4, 1, 0),
    ];
    expected.sort();

    let result = scanner(dir.path()).scan(&NullReporter);

    let mut found: Vec<_> = result.candidates.iter().map(|c| c.path.clone()).collect();
    found.sort();
    assert_eq!(found, expected);
    assert!(result.walk_errors.is_empty());
}

#[test]
fn test_empty_tree() {
    let dir = tempfile::tempdir().unwrap();
    let result = scanner(dir.path()).scan(&NullReporter);
    assert!(result.candidates.is_empty());
    assert_eq!(result.skipped, 0);
}

#[test]
fn test_missing_root_is_a_walk_error() {
    let dir = tempfile::tempdir().unwrap();
    let result = scanner(&dir.path().join("gone")).scan(&NullReporter);
    assert!(result.candidates.is_empty());
    assert!(!result.walk_errors.is_empty());
}

#[test]
fn test_custom_marker_and_manifest_names() {
    let dir = tempfile::tempdir().unwrap();
    fs::create_dir_all(dir.path().join("lib/vendor")).unwrap();
    fs::write(dir.path().join("lib/composer.json"), r#"{"dependencies":{"a":"1","b":"2"}}"#).unwrap();
    make_project(dir.path(), "web", 1, 0, 0);

    let config = Config {
        marker_name: "vendor".to_string(),
        manifest_name: "composer.json".to_string(),
        ..Config::default()
    };
    let result = Scanner::new(dir.path().to_path_buf(), Arc::new(config))
        .unwrap()
        .scan(&NullReporter);

    assert_eq!(result.candidates.len(), 1);
    assert_eq!(result.candidates[0].path, dir.path().join("lib/vendor"));
    assert_eq!(result.candidates[0].combined_dependencies(), 2);
}

#[test]
fn test_non_string_versions_exclude_the_marker() {
    let dir = tempfile::tempdir().unwrap();
    fs::create_dir_all(dir.path().join("app/node_modules")).unwrap();
    fs::write(
        dir.path().join("app/package.json"),
        r#"{"dependencies":{"a":1,"b":{"x":true}}}"#,
    )
    .unwrap();

    let result = scanner(dir.path()).scan(&NullReporter);

    assert!(result.candidates.is_empty());
    assert_eq!(result.skipped, 1);
}

#[cfg(unix)]
#[test]
fn test_unreadable_branch_does_not_stop_discovery() {
    use crate::common::{lock_dir, unlock_dir};

    let dir = tempfile::tempdir().unwrap();
    let good = make_project(dir.path(), "good", 2, 0, 0);
    let locked = dir.path().join("locked");
    make_project(&locked, "inner", 1, 0, 0);
    if !lock_dir(&locked) {
        return;
    }

    let result = scanner(dir.path()).scan(&NullReporter);
    unlock_dir(&locked);

    assert_eq!(result.candidates.len(), 1);
    assert_eq!(result.candidates[0].path, good);
    assert_eq!(result.walk_errors.len(), 1);
}
