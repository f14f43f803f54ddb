// Suites - The three acceptance suites and the run skeleton they share
//
// Every run has the same shape: banner, setup (reference data and fixtures),
// browser start, the suite's case loop, unconditional browser teardown, and a
// results footer. Suites only supply setup and the case loop.
//
// Failure handling:
// - setup failure aborts the run before a browser is started
// - an interaction failure abandons the current case; the loop goes on
// - a failed login inside the loop ends the loop
// - a log write failure ends the run with an error

mod date_search;
mod keyword_search;
mod login;

pub use date_search::DateSearchSuite;
pub use keyword_search::KeywordSearchSuite;
pub use login::LoginSuite;

use crate::browser::{Browser, Launcher, Target};
use crate::config::RunConfig;
use crate::error::{Error, Result};
use crate::report::TestLog;
use crate::verify::CaseSummary;
use async_trait::async_trait;

/// A fixture-driven suite run against one application page.
#[async_trait(?Send)]
pub trait Suite {
    /// Title of the log banner, e.g. `DATE SEARCH TEST`
    fn title(&self) -> &'static str;

    /// Application version path segment (`v1`, `v2`)
    fn app_version(&self) -> &'static str;

    /// Builds reference data and loads fixtures, logging what was added.
    ///
    /// An error aborts the run.
    fn prepare(&mut self, config: &RunConfig, log: &mut TestLog) -> Result<()>;

    /// Number of loaded test cases
    fn case_count(&self) -> usize;

    /// Runs every case and returns how many failed.
    async fn run_cases(
        &self,
        browser: &dyn Browser,
        config: &RunConfig,
        log: &mut TestLog,
    ) -> Result<usize>;
}

/// How one test case ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaseOutcome {
    Passed,
    Failed,
    /// An interaction failed before verification finished
    Abandoned,
}

impl From<&CaseSummary> for CaseOutcome {
    fn from(summary: &CaseSummary) -> Self {
        if summary.failed() {
            CaseOutcome::Failed
        } else {
            CaseOutcome::Passed
        }
    }
}

/// How a run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    Completed,
    /// Stopped before any case ran
    Aborted,
}

/// Totals of one suite run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub status: RunStatus,
    pub failed: usize,
    pub total: usize,
}

impl RunSummary {
    fn aborted(total: usize) -> Self {
        Self {
            status: RunStatus::Aborted,
            failed: 0,
            total,
        }
    }

    pub fn passed(&self) -> bool {
        self.status == RunStatus::Completed && self.failed == 0
    }
}

/// Runs `suite` from banner to footer, writing the log at `config.log`.
pub async fn run_suite(
    suite: &mut dyn Suite,
    config: &RunConfig,
    launcher: &dyn Launcher,
) -> Result<RunSummary> {
    let mut log = TestLog::create(&config.log)
        .map_err(|e| e.context(format!("creating {}", config.log.display())))?;

    log.banner(suite.title())?;
    log.stage("Initializing test")?;
    log.blank()?;

    if let Err(e) = suite.prepare(config, &mut log) {
        if e.is_log_write() {
            return Err(e);
        }
        tracing::error!("{}", e);
        log.aborted()?;
        return Ok(RunSummary::aborted(suite.case_count()));
    }

    let browser_name = config.browser.kind.display_name();
    log.blank()?;
    log.stage(&format!("Starting {}", browser_name))?;

    let browser = match launcher.launch(&config.browser).await {
        Ok(browser) => browser,
        Err(e) => {
            tracing::error!("{}", e);
            log.entry(&format!("Failed to start {}", browser_name))?;
            log.aborted()?;
            return Ok(RunSummary::aborted(suite.case_count()));
        }
    };

    let url = config.app_url(suite.app_version());
    let cases = match browser.navigate(&url).await {
        Ok(()) => suite.run_cases(browser.as_ref(), config, &mut log).await.map(Some),
        Err(e) => {
            tracing::error!("Cannot open {}: {}", url, e);
            log.entry(&format!("Failed to open {}", url)).map(|_| None)
        }
    };

    let closing = close_session(browser.as_ref(), browser_name, &mut log).await;
    let failed = cases?;
    closing?;

    let total = suite.case_count();
    let summary = match failed {
        Some(failed) => {
            log.footer(failed, total)?;
            RunSummary {
                status: RunStatus::Completed,
                failed,
                total,
            }
        }
        None => {
            log.aborted()?;
            RunSummary::aborted(total)
        }
    };

    println!("# Test completed");
    Ok(summary)
}

async fn close_session(browser: &dyn Browser, name: &str, log: &mut TestLog) -> Result<()> {
    let logged = log
        .blank()
        .and_then(|_| log.stage(&format!("Closing {}", name)));
    if let Err(e) = browser.close().await {
        tracing::warn!("Failed to close {}: {}", name, e);
    }
    logged
}

/// Logs in with the configured credentials.
pub(crate) async fn login(browser: &dyn Browser, config: &RunConfig) -> Result<()> {
    let selectors = &config.selectors;
    browser
        .type_text(&config.credentials.username, &selectors.username_field)
        .await?;
    browser
        .type_text(&config.credentials.password, &selectors.password_field)
        .await?;
    browser.click(&Target::text(&selectors.login_button)).await
}

/// Records an abandoned case.
pub(crate) fn abandon(log: &mut TestLog, line: &str, cause: &Error) -> Result<CaseOutcome> {
    tracing::warn!("{}: {}", line, cause);
    log.entry(line)?;
    Ok(CaseOutcome::Abandoned)
}

/// Reloads the page between cases. A failure shows up in the next case's login.
pub(crate) async fn refresh(browser: &dyn Browser) {
    if let Err(e) = browser.refresh().await {
        tracing::warn!("Page refresh failed: {}", e);
    }
}
