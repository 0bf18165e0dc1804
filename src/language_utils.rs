//! Language utilities for the configured NLP language
//!
//! The syllable estimator uses the Norwegian vowel inventory, so the NLP
//! language code is validated here and checked against the Norwegian
//! variants the estimator was written for.

use anyhow::{Result, anyhow};
use isolang::Language;

/// ISO 639-3 codes of the Norwegian written standards
const NORWEGIAN_CODES: [&str; 3] = ["nor", "nob", "nno"];

/// Normalize a language code to ISO 639-3 (3-letter) format
pub fn normalize_to_part3(code: &str) -> Result<String> {
    let normalized_code = code.trim().to_lowercase();

    if normalized_code.len() == 2 {
        if let Some(lang) = Language::from_639_1(&normalized_code) {
            return Ok(lang.to_639_3().to_string());
        }
    } else if normalized_code.len() == 3 && Language::from_639_3(&normalized_code).is_some() {
        return Ok(normalized_code);
    }

    Err(anyhow!("Invalid language code: {}", code))
}

/// Get the English language name from a code
pub fn get_language_name(code: &str) -> Result<String> {
    let normalized = normalize_to_part3(code)?;
    let lang = Language::from_639_3(&normalized)
        .ok_or_else(|| anyhow!("Failed to get language from code: {}", normalized))?;

    Ok(lang.to_name().to_string())
}

/// Whether the code names Norwegian, Bokmål or Nynorsk
pub fn is_norwegian(code: &str) -> bool {
    match normalize_to_part3(code) {
        Ok(normalized) => NORWEGIAN_CODES.contains(&normalized.as_str()),
        Err(_) => false,
    }
}
