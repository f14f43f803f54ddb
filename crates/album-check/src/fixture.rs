// Fixtures - Test case records loaded from `test-cases.json`
//
// Each suite reads a JSON array of records. Field names follow the fixture files
// (`msg`, `start_date`, `results_expected`, ...); missing optional fields fall
// back to empty strings, empty lists and zero expected results.

use crate::error::{Error, Result};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::path::Path;

/// A date search case: results must fall inside `[start_date, end_date]`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DateCase {
    #[serde(rename = "msg")]
    pub message: String,
    #[serde(default)]
    pub start_date: String,
    #[serde(default)]
    pub end_date: String,
    #[serde(rename = "results_expected", default)]
    pub expected_count: usize,
}

/// A keyword search case: results must carry at least one of `keywords`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct KeywordCase {
    #[serde(rename = "msg")]
    pub message: String,
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(rename = "results_expected", default)]
    pub expected_count: usize,
}

impl KeywordCase {
    /// Text typed into the keyword search field.
    pub fn search_input(&self) -> String {
        self.keywords.join(",")
    }
}

/// A login attempt with the given credentials.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoginCase {
    #[serde(rename = "msg")]
    pub message: String,
    pub username: String,
    pub password: String,
}

/// Parses a fixture document.
pub fn parse_cases<T: DeserializeOwned>(json: &str) -> Result<Vec<T>> {
    Ok(serde_json::from_str(json)?)
}

/// Reads and parses the fixture file at `path`.
pub fn load_cases<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    let json = std::fs::read_to_string(path)
        .map_err(|e| Error::Setup(format!("cannot read {}: {}", path.display(), e)))?;
    let cases = parse_cases(&json)
        .map_err(|e| Error::Setup(format!("malformed {}: {}", path.display(), e)))?;
    tracing::debug!("Loaded {} test cases from {}", cases.len(), path.display());
    Ok(cases)
}
