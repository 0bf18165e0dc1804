/*!
 * Tests for the persisted haiku list
 */

use anyhow::Result;
use newshaiku::errors::StoreError;
use newshaiku::{HaikuRecord, HaikuStore};
use crate::common;

/// Test that a saved list reads back unchanged
#[test]
fn test_save_thenLoad_shouldReturnSameList() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let store = HaikuStore::new(temp_dir.path().join("haikus.json"));
    let haikus = vec![
        HaikuRecord::new(common::SEVENTEEN_HAIKU, "https://www.nrk.no/vaer-1"),
        HaikuRecord::new("æ ø å\nblå bær\nhøst", "https://www.nrk.no/hoest"),
    ];

    store.save(&haikus)?;

    assert_eq!(store.load()?, haikus);
    Ok(())
}

/// Test that each save replaces the previous list instead of appending
#[test]
fn test_save_twice_shouldKeepOnlyLatestList() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let store = HaikuStore::new(temp_dir.path().join("haikus.json"));

    store.save(&[HaikuRecord::new("a\nb\nc", "https://example.com/1")])?;
    store.save(&[HaikuRecord::new("d\ne\nf", "https://example.com/2")])?;

    let loaded = store.load()?;
    assert_eq!(loaded.len(), 1);
    assert_eq!(loaded[0].link, "https://example.com/2");
    Ok(())
}

/// Test that the file is a plain array of haiku/link objects
#[test]
fn test_save_shouldWriteArrayOfObjects() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = temp_dir.path().join("haikus.json");
    HaikuStore::new(&path).save(&[HaikuRecord::new("a\nb\nc", "https://example.com")])?;

    let value: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(&path)?)?;
    let items = value.as_array().expect("top level should be an array");
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["haiku"], "a\nb\nc");
    assert_eq!(items[0]["link"], "https://example.com");
    Ok(())
}

/// Test that an empty list loads but is refused when something must be shown
#[test]
fn test_loadNonEmpty_withEmptyList_shouldFail() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let store = HaikuStore::new(temp_dir.path().join("haikus.json"));
    store.save(&[])?;

    assert!(store.load()?.is_empty());
    assert!(matches!(store.load_non_empty(), Err(StoreError::Empty(_))));
    Ok(())
}

/// Test that a file written by hand in the expected format is readable
#[test]
fn test_load_withHandWrittenFile_shouldParse() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_file(
        temp_dir.path(),
        "haikus.json",
        r#"[{"haiku": "sol\nsnø\nvind", "link": "https://www.nrk.no/x"}]"#,
    )?;

    let haikus = HaikuStore::new(path).load_non_empty()?;
    assert_eq!(haikus[0].lines(), vec!["sol", "snø", "vind"]);
    Ok(())
}
