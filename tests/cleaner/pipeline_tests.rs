// End-to-end tests for the discovery and deletion pipeline

use crate::common::{make_project, Recorder};
use modsweep::cleaner::{
    Candidate, Config, DefaultSelection, Event, FixedSelection, NullReporter, Pipeline, SelectAll,
};
use std::sync::Arc;

const MB: usize = 1024 * 1024;

#[tokio::test]
async fn test_rank_select_and_delete() {
    let dir = tempfile::tempdir().unwrap();
    let root = Pipeline::resolve_root(Some(dir.path())).unwrap();

    let two = make_project(&root, "two", 1, 1, 2 * MB);
    let five = make_project(&root, "five", 3, 2, 3 * MB + 10);
    let one = make_project(&root, "one", 1, 0, MB);

    let pipeline = Pipeline::new(Arc::new(Config::default()), Arc::new(NullReporter));
    let candidates = pipeline.discover(&root).unwrap();

    let order: Vec<_> = candidates.iter().map(|c| c.path.clone()).collect();
    assert_eq!(order, vec![five.clone(), two.clone(), one.clone()]);
    let sizes: Vec<_> = candidates.iter().map(|c| c.size_mb).collect();
    assert_eq!(sizes, vec![3, 2, 1]);

    let mut selector = FixedSelection::new(vec![five.clone(), two.clone()]);
    let summary = pipeline.run(&root, &mut selector).await.unwrap();

    assert_eq!(summary.found, 3);
    assert_eq!(summary.selected, 2);
    assert_eq!(summary.deletion.freed_mb, 5);
    assert!(!five.exists());
    assert!(!two.exists());
    assert!(one.exists());
}

#[tokio::test]
async fn test_inverted_default_removes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let root = Pipeline::resolve_root(Some(dir.path())).unwrap();
    let marker = make_project(&root, "app", 2, 0, 0);

    let config = Config {
        invert_selection: true,
        ..Config::default()
    };
    let recorder = Arc::new(Recorder::default());
    let pipeline = Pipeline::new(Arc::new(config), recorder.clone());

    let summary = pipeline.run(&root, &mut DefaultSelection).await.unwrap();

    assert_eq!(summary.found, 1);
    assert_eq!(summary.selected, 0);
    assert!(marker.exists());
    assert_eq!(recorder.count(|e| matches!(e, Event::NothingSelected)), 1);
}

#[tokio::test]
async fn test_dry_run_leaves_tree_intact() {
    let dir = tempfile::tempdir().unwrap();
    let root = Pipeline::resolve_root(Some(dir.path())).unwrap();
    let marker = make_project(&root, "app", 2, 0, MB);

    let recorder = Arc::new(Recorder::default());
    let pipeline =
        Pipeline::new(Arc::new(Config::default()), recorder.clone()).with_dry_run(true);
    let summary = pipeline.run(&root, &mut SelectAll).await.unwrap();

    assert!(marker.exists());
    assert_eq!(summary.selected, 1);
    assert_eq!(recorder.count(|e| matches!(e, Event::WouldRemove { .. })), 1);
    assert_eq!(recorder.count(|e| matches!(e, Event::Removed { .. })), 0);
    assert_eq!(
        recorder.count(|e| matches!(e, Event::Finished { dry_run: true, .. })),
        1
    );
}

#[tokio::test]
async fn test_empty_tree_skips_selection() {
    let dir = tempfile::tempdir().unwrap();
    let root = Pipeline::resolve_root(Some(dir.path())).unwrap();

    let recorder = Arc::new(Recorder::default());
    let pipeline = Pipeline::new(Arc::new(Config::default()), recorder.clone());
    let summary = pipeline.run(&root, &mut SelectAll).await.unwrap();

    assert_eq!(summary.found, 0);
    assert_eq!(
        recorder.count(|e| matches!(e, Event::Summary { candidates: 0, .. })),
        1
    );
    assert_eq!(recorder.count(|e| matches!(e, Event::Finished { .. })), 0);
}

#[test]
fn test_discovery_reports_each_size() {
    let dir = tempfile::tempdir().unwrap();
    let root = Pipeline::resolve_root(Some(dir.path())).unwrap();
    make_project(&root, "a", 1, 0, 0);
    make_project(&root, "b", 2, 0, 0);

    let recorder = Arc::new(Recorder::default());
    let pipeline = Pipeline::new(Arc::new(Config::default()), recorder.clone());
    let candidates: Vec<Candidate> = pipeline.discover(&root).unwrap();

    assert_eq!(candidates.len(), 2);
    assert_eq!(recorder.count(|e| matches!(e, Event::Sized { .. })), 2);
    assert!(candidates.iter().all(|c| !c.size_error));
}
