mod common;

use std::path::PathBuf;

use common::{FakePage, Screen, header, program, table};
use skillbridge_scrape::{
    Accumulator, Dataset, DatasetWriter, ExpansionPolicy, PaginationDriver, RowMarkers,
    SelectorConfig, Settle, StopReason, TableExtractor, snapshot_hook,
};
use tokio_util::sync::CancellationToken;

fn two_pages() -> FakePage {
    FakePage::new(vec![
        Screen::new(
            table(&[header("A"), program("First")]),
            Some("Showing 1 to 1 of 2 entries"),
        ),
        Screen::new(
            table(&[header("B"), program("Second")]),
            Some("Showing 2 to 2 of 2 entries"),
        ),
    ])
}

fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("skillbridge_{}_{}", name, std::process::id()));
    let _ = std::fs::remove_dir_all(&dir);
    dir
}

async fn run(page: &FakePage, writer: &DatasetWriter, enabled: bool) -> Accumulator {
    let extractor = TableExtractor::new(&SelectorConfig::default(), &RowMarkers::default()).unwrap();
    let driver = PaginationDriver::new(
        page,
        &extractor,
        ExpansionPolicy::Never,
        Settle::immediate(),
        CancellationToken::new(),
    );
    let mut acc = Accumulator::new();
    let reason = driver
        .run(&mut acc, snapshot_hook(writer, enabled))
        .await
        .unwrap();
    assert_eq!(reason, StopReason::LastPage);
    acc
}

#[tokio::test]
async fn first_page_snapshot_holds_only_page_one() {
    let dir = scratch_dir("first_page_snapshot");
    let writer = DatasetWriter::with_stem(&dir, "opportunities_test");

    let acc = run(&two_pages(), &writer, true).await;
    assert_eq!(acc.pages(), 2);

    let files: Vec<String> = std::fs::read_dir(&dir)
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().to_string())
        .collect();
    assert_eq!(files, vec!["opportunities_test_page1.json"]);

    let contents = std::fs::read_to_string(writer.intermediate_path(1)).unwrap();
    let snapshot: Dataset = serde_json::from_str(&contents).unwrap();
    assert_eq!(snapshot.len(), 1);
    assert_eq!(snapshot.locations()[0].company, "A");
    assert_eq!(snapshot.locations()[0].opportunities[0].program_name, "First");

    std::fs::remove_dir_all(&dir).unwrap();
}

#[tokio::test]
async fn disabled_snapshot_writes_nothing() {
    let dir = scratch_dir("disabled_snapshot");
    let writer = DatasetWriter::with_stem(&dir, "opportunities_test");

    let acc = run(&two_pages(), &writer, false).await;

    assert_eq!(acc.len(), 2);
    assert!(!dir.exists());
}
