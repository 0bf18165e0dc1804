/*!
 * Common test utilities for the newshaiku test suite
 */

use std::fs;
use std::path::{Path, PathBuf};
use anyhow::Result;
use tempfile::TempDir;

use newshaiku::nlp::MockNlp;
use newshaiku::PartOfSpeech;

/// Seventeen one-syllable words forming a single sentence
pub const SEVENTEEN: &str = "Sol på tak og mur, snø i skog og dal ved hav, vind i tre og strand.";

/// The haiku found in `SEVENTEEN`
pub const SEVENTEEN_HAIKU: &str = "sol på tak og mur\nsnø i skog og dal ved hav\nvind i tre og strand";

/// Creates a temporary directory for test files
pub fn create_temp_dir() -> Result<TempDir> {
    Ok(TempDir::new()?)
}

/// Creates a test file with the given content in the specified directory
pub fn create_test_file(dir: &Path, filename: &str, content: &str) -> Result<PathBuf> {
    let file_path = dir.join(filename);
    fs::write(&file_path, content)?;
    Ok(file_path)
}

/// Routes log output through the test harness
pub fn init_test_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Mock NLP backend tagging conjunctions like a Norwegian pipeline would
pub fn norwegian_mock() -> MockNlp {
    MockNlp::new()
        .with_word("og", PartOfSpeech::Cconj, "CCONJ___")
        .with_word("i", PartOfSpeech::Adp, "ADP___")
        .with_word("på", PartOfSpeech::Adp, "ADP___")
        .with_word("ved", PartOfSpeech::Adp, "ADP___")
}

/// Sample RSS document with one haiku entry and one plain entry
pub fn sample_rss() -> String {
    format!(
        r#"<?xml version="1.0" encoding="utf-8"?>
<rss version="2.0">
  <channel>
    <title>Nyheter</title>
    <item>
      <title>Været</title>
      <link>https://www.nrk.no/vaer-1</link>
      <description><![CDATA[{}]]></description>
    </item>
    <item>
      <title>Kort</title>
      <link>https://www.nrk.no/kort-2</link>
      <description>Regjeringen la fram budsjettet.</description>
    </item>
  </channel>
</rss>"#,
        SEVENTEEN
    )
}
