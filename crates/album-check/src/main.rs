//! album-check CLI
//!
//! Runs one of the acceptance suites against the photo album application and
//! writes its test log.
//!
//! Exit status: 0 when every case passed, 1 when some case failed, 2 when the
//! run was aborted or could not write its log.

use album_check::browser::PlaywrightLauncher;
use album_check::config::{
    AppSelectors, BrowserKind, BrowserOptions, Credentials, DEFAULT_BASE_URL, DEFAULT_MAX_PAGES,
};
use album_check::suite::{DateSearchSuite, KeywordSearchSuite, LoginSuite};
use album_check::{RunConfig, RunStatus, RunSummary, Suite, run_suite};
use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

/// Acceptance suites for the photo album web application
#[derive(Parser)]
#[command(name = "album-check")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Test case fixture file
    #[arg(long, global = true, env = "ALBUM_CHECK_FIXTURES", default_value = "test-cases.json")]
    fixtures: PathBuf,

    /// Test log file (truncated on every run)
    #[arg(long, global = true, env = "ALBUM_CHECK_LOG", default_value = "test-log.txt")]
    log: PathBuf,

    /// Base URL of the application; suites append `/v1/index.html` or `/v2/index.html`
    #[arg(long, global = true, env = "ALBUM_CHECK_BASE_URL", default_value = DEFAULT_BASE_URL)]
    base_url: String,

    /// Full page URL, overriding --base-url
    #[arg(long, global = true, env = "ALBUM_CHECK_URL")]
    url: Option<String>,

    /// Username accepted by the application
    #[arg(long, global = true, env = "ALBUM_CHECK_USERNAME", default_value = "user")]
    username: String,

    /// Password accepted by the application
    #[arg(long, global = true, env = "ALBUM_CHECK_PASSWORD", default_value = "password")]
    password: String,

    /// Browser engine
    #[arg(long, global = true, value_enum, env = "ALBUM_CHECK_BROWSER", default_value_t = BrowserArg::Chromium)]
    browser: BrowserArg,

    /// Show the browser window
    #[arg(long, global = true, env = "ALBUM_CHECK_HEADED")]
    headed: bool,

    /// Navigation and action timeout in milliseconds
    #[arg(long, global = true, env = "ALBUM_CHECK_TIMEOUT_MS", default_value_t = 30_000)]
    timeout_ms: u64,

    /// Pause after clicks and reloads, in milliseconds
    #[arg(long, global = true, env = "ALBUM_CHECK_SETTLE_MS", default_value_t = 250)]
    settle_ms: u64,

    /// Maximum number of result pages walked per date search
    #[arg(long, global = true, env = "ALBUM_CHECK_MAX_PAGES", default_value_t = DEFAULT_MAX_PAGES)]
    max_pages: usize,

    /// JSON file overriding field labels and selectors
    #[arg(long, global = true, env = "ALBUM_CHECK_SELECTORS")]
    selectors: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Test login with valid and invalid credentials
    Login,

    /// Test searching images by date range
    DateSearch,

    /// Test searching images by keywords
    KeywordSearch,
}

#[derive(Clone, Copy, ValueEnum)]
enum BrowserArg {
    Chromium,
    Firefox,
    Webkit,
}

impl From<BrowserArg> for BrowserKind {
    fn from(arg: BrowserArg) -> Self {
        match arg {
            BrowserArg::Chromium => BrowserKind::Chromium,
            BrowserArg::Firefox => BrowserKind::Firefox,
            BrowserArg::Webkit => BrowserKind::Webkit,
        }
    }
}

impl Cli {
    fn run_config(&self) -> anyhow::Result<RunConfig> {
        let selectors = match &self.selectors {
            Some(path) => AppSelectors::from_file(path)?,
            None => AppSelectors::default(),
        };

        Ok(RunConfig {
            fixtures: self.fixtures.clone(),
            log: self.log.clone(),
            base_url: self.base_url.clone(),
            url: self.url.clone(),
            credentials: Credentials {
                username: self.username.clone(),
                password: self.password.clone(),
            },
            browser: BrowserOptions {
                kind: self.browser.into(),
                headless: !self.headed,
                timeout: Duration::from_millis(self.timeout_ms),
                settle: Duration::from_millis(self.settle_ms),
            },
            max_pages: self.max_pages,
            selectors,
        })
    }
}

fn init_tracing(verbose: bool) {
    let default_filter = if verbose {
        "album_check=debug"
    } else {
        "album_check=info"
    };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(cli: &Cli) -> anyhow::Result<RunSummary> {
    let config = cli.run_config()?;

    let mut suite: Box<dyn Suite> = match cli.command {
        Commands::Login => Box::new(LoginSuite::new()),
        Commands::DateSearch => Box::new(DateSearchSuite::new()),
        Commands::KeywordSearch => Box::new(KeywordSearchSuite::new()),
    };

    let summary = run_suite(suite.as_mut(), &config, &PlaywrightLauncher)
        .await
        .with_context(|| format!("{} run failed", suite.title()))?;
    Ok(summary)
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(&cli).await {
        Ok(summary) => {
            tracing::info!(
                "{} of {} test cases failed ({:?})",
                summary.failed,
                summary.total,
                summary.status
            );
            match summary.status {
                RunStatus::Aborted => ExitCode::from(2),
                RunStatus::Completed if summary.passed() => ExitCode::SUCCESS,
                RunStatus::Completed => ExitCode::from(1),
            }
        }
        Err(e) => {
            let log_write = e
                .downcast_ref::<album_check::Error>()
                .is_some_and(album_check::Error::is_log_write);
            if log_write {
                println!("Error in writing text log");
            }
            eprintln!("Error: {:#}", e);
            ExitCode::from(2)
        }
    }
}
