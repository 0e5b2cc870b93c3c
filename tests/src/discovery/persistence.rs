use std::fs;
use std::net::Ipv4Addr;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use mnat_common::error::{RunError, StoreError};
use mnat_common::output::OutputTarget;

use super::fakes::{FakeScanner, TableResolver, device, orchestrator};

fn read_rows(path: &Path) -> Vec<Vec<String>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .from_path(path)
        .unwrap();
    reader
        .records()
        .map(|record| record.unwrap().iter().map(String::from).collect())
        .collect()
}

fn csv_files(dir: &Path) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = fs::read_dir(dir)
        .unwrap()
        .map(|entry| entry.unwrap().path())
        .filter(|path| path.extension().is_some_and(|ext| ext == "csv"))
        .collect();
    files.sort();
    files
}

fn two_devices() -> FakeScanner {
    FakeScanner::Replies(vec![device(1, 0xaa), device(7, 0xbb)])
}

fn resolver() -> Arc<TableResolver> {
    Arc::new(TableResolver::default().with(Ipv4Addr::new(192, 168, 1, 1), "router.lan"))
}

#[tokio::test]
async fn directory_target_gets_timestamped_file() {
    let dir = tempfile::tempdir().unwrap();
    let target = OutputTarget::Directory(dir.path().to_path_buf());

    let result = orchestrator(two_devices(), resolver())
        .run("192.168.1.0", 24, Some(&target))
        .await
        .unwrap();

    let files = csv_files(dir.path());
    assert_eq!(files.len(), 1);
    assert_eq!(result.saved_to.as_deref(), Some(files[0].as_path()));

    let name = files[0].file_name().unwrap().to_string_lossy().into_owned();
    let stamp = name.strip_prefix("mnet.scan.").unwrap().strip_suffix(".csv").unwrap();
    assert_eq!(stamp.len(), 14);
    assert!(stamp.chars().all(|c| c.is_ascii_digit()));

    assert_eq!(
        read_rows(&files[0]),
        vec![
            vec!["IP", "MAC", "Hostname"],
            vec!["192.168.1.1", "02:00:00:00:00:aa", "router.lan"],
            vec!["192.168.1.7", "02:00:00:00:00:bb", "unresolved"],
        ]
    );
}

#[tokio::test]
async fn file_target_creates_missing_parents() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("scans").join("lan").join("out.csv");
    let target = OutputTarget::classify(&path);

    let result = orchestrator(two_devices(), resolver())
        .run("192.168.1.0", 24, Some(&target))
        .await
        .unwrap();

    assert_eq!(result.saved_to.as_deref(), Some(path.as_path()));
    let text = fs::read_to_string(&path).unwrap();
    assert_eq!(text.lines().count(), 3);
    assert!(text.starts_with("IP,MAC,Hostname\n"));
}

#[tokio::test]
async fn nothing_found_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let out_dir = dir.path().join("results");
    let target = OutputTarget::Directory(out_dir.clone());

    let result = orchestrator(FakeScanner::Replies(vec![]), resolver())
        .run("192.168.1.0", 24, Some(&target))
        .await
        .unwrap();

    assert!(!result.found);
    assert!(result.saved_to.is_none());
    assert!(!out_dir.exists());
}

#[tokio::test]
async fn save_failure_keeps_the_result() {
    let dir = tempfile::tempdir().unwrap();
    let blocker = dir.path().join("not-a-dir");
    fs::write(&blocker, b"occupied").unwrap();
    let target = OutputTarget::File(blocker.join("out.csv"));

    let err = orchestrator(two_devices(), resolver())
        .run("192.168.1.0", 24, Some(&target))
        .await
        .unwrap_err();

    let result = err.result().expect("scan result survives a save failure");
    assert!(result.found);
    assert_eq!(result.devices.len(), 2);
    assert!(result.saved_to.is_none());

    let RunError::Persist { source: StoreError::Io { path, .. }, .. } = &err else {
        panic!("expected a persistence error, got {err:?}");
    };
    assert_eq!(path, &blocker);
}

#[tokio::test]
async fn repeated_runs_into_one_directory_do_not_clobber() {
    let dir = tempfile::tempdir().unwrap();
    let target = OutputTarget::Directory(dir.path().to_path_buf());
    let orch = orchestrator(two_devices(), resolver());

    let first = orch.run("192.168.1.0", 24, Some(&target)).await.unwrap();
    let second = orch.run("192.168.1.0", 24, Some(&target)).await.unwrap();

    assert_ne!(first.saved_to, second.saved_to);
    assert_eq!(csv_files(dir.path()).len(), 2);
}
