//! album-check: Browser-driven acceptance suites for the photo album application
//!
//! Three suites exercise the application's login, date search and keyword
//! search. Each reads its test cases from a JSON fixture file, drives a browser
//! through the application, verifies what the page renders and writes a
//! human-readable test log.
//!
//! # Examples
//!
//! ## Running a suite against a live application
//!
//! ```ignore
//! use album_check::browser::PlaywrightLauncher;
//! use album_check::config::RunConfig;
//! use album_check::suite::{DateSearchSuite, run_suite};
//!
//! #[tokio::main]
//! async fn main() -> album_check::Result<()> {
//!     let config = RunConfig::default();
//!     let mut suite = DateSearchSuite::new();
//!     let summary = run_suite(&mut suite, &config, &PlaywrightLauncher).await?;
//!     println!("{} of {} cases failed", summary.failed, summary.total);
//!     Ok(())
//! }
//! ```
//!
//! ## Verifying results without a browser
//!
//! ```ignore
//! use album_check::fixture::DateCase;
//! use album_check::reference::ReferenceDataset;
//! use album_check::verify::DateVerifier;
//!
//! let dataset = ReferenceDataset::build();
//! let case = DateCase {
//!     message: "first week of June".to_string(),
//!     start_date: "2018-06-01T12:00:00Z".to_string(),
//!     end_date: "2018-06-07T12:00:00Z".to_string(),
//!     expected_count: 7,
//! };
//! let mut verifier = DateVerifier::new(&dataset, &case);
//! for id in 1..=7 {
//!     assert!(verifier.check(&id.to_string()).is_ok());
//! }
//! assert!(!verifier.finish().failed());
//! ```

pub mod browser;
pub mod config;
mod error;
pub mod fixture;
pub mod pagination;
pub mod reference;
pub mod report;
pub mod suite;
pub mod verify;

// Re-export error types
pub use error::{Error, Result};

// Re-export the entry points used by the binary
pub use config::RunConfig;
pub use suite::{RunStatus, RunSummary, Suite, run_suite};
