/*!
 * Integration tests for fetch, extract and persist passes
 */

use anyhow::Result;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio_test::assert_ok;

use newshaiku::feed::{FeedEntry, StaticFeed};
use newshaiku::nlp::MockNlp;
use newshaiku::{Controller, HaikuExtractor, HaikuRecord, HaikuStore, PassReport};
use crate::common;

fn controller_for(feed: StaticFeed, nlp: MockNlp, store: HaikuStore) -> Controller {
    Controller::new(
        Arc::new(feed),
        Arc::new(nlp),
        HaikuExtractor::new(),
        store,
        Duration::from_secs(3600),
    )
}

/// Test that one pass over an RSS feed writes the haiku it contains
#[tokio::test]
async fn test_runPass_withHaikuEntry_shouldPersistRecord() -> Result<()> {
    common::init_test_logging();
    let temp_dir = common::create_temp_dir()?;
    let store = HaikuStore::new(temp_dir.path().join("haikus.json"));
    let nlp = common::norwegian_mock();
    let feed = StaticFeed::from_rss(&common::sample_rss())?;

    let controller = controller_for(feed, nlp.clone(), store.clone());
    let report = assert_ok!(controller.run_pass().await);

    assert_eq!(
        report,
        PassReport {
            entries: 2,
            skipped: 0,
            windows: 1,
            haikus: 1,
        }
    );
    assert_eq!(nlp.analyze_calls(), 2);
    assert_eq!(
        store.load()?,
        vec![HaikuRecord::new(common::SEVENTEEN_HAIKU, "https://www.nrk.no/vaer-1")]
    );
    Ok(())
}

/// Test that a pass replaces the haikus of the previous pass
#[tokio::test]
async fn test_runPass_withChangedFeed_shouldReplacePreviousList() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let store = HaikuStore::new(temp_dir.path().join("haikus.json"));
    store.save(&[HaikuRecord::new("gammel\nhaiku\nher", "https://www.nrk.no/gammel")])?;

    let feed = StaticFeed::new(vec![FeedEntry::new(
        "Ingen haiku",
        "Statsministeren holdt pressekonferanse.",
        "https://www.nrk.no/ny",
    )]);
    let controller = controller_for(feed, MockNlp::new(), store.clone());
    let report = controller.run_pass().await?;

    assert_eq!(report.haikus, 0);
    assert!(store.load()?.is_empty());
    Ok(())
}

/// Test that a failing feed leaves the previous list untouched
#[tokio::test]
async fn test_runPass_withFailingFeed_shouldKeepPreviousFile() -> Result<()> {
    common::init_test_logging();
    let temp_dir = common::create_temp_dir()?;
    let store = HaikuStore::new(temp_dir.path().join("haikus.json"));
    let previous = vec![HaikuRecord::new(common::SEVENTEEN_HAIKU, "https://www.nrk.no/vaer-1")];
    store.save(&previous)?;

    let controller = controller_for(StaticFeed::failing(), MockNlp::new(), store.clone());

    assert!(controller.run_pass().await.is_err());
    assert_eq!(store.load()?, previous);
    Ok(())
}

/// Test that entries the NLP backend cannot analyze are skipped
#[tokio::test]
async fn test_runPass_withFailingNlp_shouldSkipEntries() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let store = HaikuStore::new(temp_dir.path().join("haikus.json"));
    let nlp = MockNlp::failing();
    let feed = StaticFeed::from_rss(&common::sample_rss())?;

    let controller = controller_for(feed, nlp.clone(), store.clone());
    let report = controller.run_pass().await?;

    assert_eq!(report.entries, 2);
    assert_eq!(report.skipped, 2);
    assert_eq!(report.haikus, 0);
    assert_eq!(nlp.analyze_calls(), 2);
    assert!(store.load()?.is_empty());
    Ok(())
}

/// Test that the loop runs a pass and stops once shutdown is requested
#[tokio::test]
async fn test_run_withShutdown_shouldStopDuringWait() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let store = HaikuStore::new(temp_dir.path().join("haikus.json"));
    let feed = StaticFeed::from_rss(&common::sample_rss())?;
    let nlp = common::norwegian_mock();
    let controller = controller_for(feed, nlp.clone(), store.clone());

    let (tx, rx) = watch::channel(false);
    let stop = async {
        tokio::time::sleep(Duration::from_millis(200)).await;
        tx.send(true).ok();
    };

    let (result, ()) = tokio::time::timeout(Duration::from_secs(10), async {
        tokio::join!(controller.run(rx), stop)
    })
    .await?;

    assert_ok!(result);
    assert_eq!(nlp.analyze_calls(), 2);
    assert_eq!(store.load()?.len(), 1);
    Ok(())
}

/// Test that the loop stops when the shutdown sender goes away
#[tokio::test]
async fn test_run_withDroppedSender_shouldStop() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let store = HaikuStore::new(temp_dir.path().join("haikus.json"));
    let controller = controller_for(StaticFeed::failing(), MockNlp::new(), store);

    let (tx, rx) = watch::channel(false);
    drop(tx);

    let result = tokio::time::timeout(Duration::from_secs(10), controller.run(rx)).await?;
    assert_ok!(result);
    Ok(())
}

/// Test that the loop does not start a pass when shutdown is already requested
#[tokio::test]
async fn test_run_withShutdownAlreadyRequested_shouldNotFetch() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let store = HaikuStore::new(temp_dir.path().join("haikus.json"));
    let nlp = MockNlp::new();
    let feed = StaticFeed::from_rss(&common::sample_rss())?;
    let controller = controller_for(feed, nlp.clone(), store.clone());

    let (_tx, rx) = watch::channel(true);
    controller.run(rx).await?;

    assert_eq!(nlp.analyze_calls(), 0);
    assert!(!store.path().exists());
    Ok(())
}
