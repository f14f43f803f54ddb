// Run configuration
//
// Everything a suite needs to know about its environment: where the fixtures and
// the log live, which URL to open, which credentials are valid, how to launch
// the browser, and how to find the application's controls on the page.

use crate::error::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Default location of the album application.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8080/ps";

/// Default page walk guard for the date suite.
pub const DEFAULT_MAX_PAGES: usize = 100;

/// Credentials accepted by the application.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Default for Credentials {
    fn default() -> Self {
        Self {
            username: "user".to_string(),
            password: "password".to_string(),
        }
    }
}

/// Browser engine to drive.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BrowserKind {
    #[default]
    Chromium,
    Firefox,
    Webkit,
}

impl BrowserKind {
    /// Name used in the log banners.
    pub fn display_name(&self) -> &'static str {
        match self {
            BrowserKind::Chromium => "Chrome",
            BrowserKind::Firefox => "Firefox",
            BrowserKind::Webkit => "WebKit",
        }
    }
}

/// How the browser session is launched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrowserOptions {
    pub kind: BrowserKind,
    pub headless: bool,
    /// Passed to every navigation and action
    pub timeout: Duration,
    /// Pause after clicks and reloads so the page can re-render
    pub settle: Duration,
}

impl Default for BrowserOptions {
    fn default() -> Self {
        Self {
            kind: BrowserKind::default(),
            headless: true,
            timeout: Duration::from_secs(30),
            settle: Duration::from_millis(250),
        }
    }
}

/// Field labels and CSS selectors of the album application.
///
/// Labels are matched against an input's placeholder, name, id or aria-label.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AppSelectors {
    pub username_field: String,
    pub password_field: String,
    pub login_button: String,
    pub start_date_field: String,
    pub end_date_field: String,
    pub keywords_field: String,
    pub keyword_editor_field: String,
    pub search_button: String,
    pub next_page_button: String,
    pub save_keywords_button: String,
    pub close_full_view_button: String,
    /// Album thumbnails on the search view
    pub result_images: String,
    /// Any image, used to detect a successful login
    pub any_image: String,
}

impl Default for AppSelectors {
    fn default() -> Self {
        Self {
            username_field: "username".to_string(),
            password_field: "password".to_string(),
            login_button: "Login".to_string(),
            start_date_field: "Type start date in RFC3339 format".to_string(),
            end_date_field: "Type end date in RFC3339 format".to_string(),
            keywords_field: "Type keywords for search, separated by comma (,)".to_string(),
            keyword_editor_field: "Syötä avainsanat pilkulla (,) erotettuna.".to_string(),
            search_button: "#view-search".to_string(),
            next_page_button: "#view-next".to_string(),
            save_keywords_button: "#view-full-save-keywords".to_string(),
            close_full_view_button: "#view-full-close".to_string(),
            result_images: "div > p > img".to_string(),
            any_image: "img".to_string(),
        }
    }
}

impl AppSelectors {
    /// Loads selectors from a JSON file; keys not present keep their defaults.
    pub fn from_file(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)
            .map_err(|e| Error::Setup(format!("cannot read {}: {}", path.display(), e)))?;
        serde_json::from_str(&json)
            .map_err(|e| Error::Setup(format!("malformed {}: {}", path.display(), e)))
    }
}

/// Settings shared by every suite.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub fixtures: PathBuf,
    pub log: PathBuf,
    pub base_url: String,
    /// Full URL override; wins over `base_url`
    pub url: Option<String>,
    pub credentials: Credentials,
    pub browser: BrowserOptions,
    pub max_pages: usize,
    pub selectors: AppSelectors,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            fixtures: PathBuf::from("test-cases.json"),
            log: PathBuf::from("test-log.txt"),
            base_url: DEFAULT_BASE_URL.to_string(),
            url: None,
            credentials: Credentials::default(),
            browser: BrowserOptions::default(),
            max_pages: DEFAULT_MAX_PAGES,
            selectors: AppSelectors::default(),
        }
    }
}

impl RunConfig {
    /// URL of the given application version, e.g. `v1` for the login page.
    pub fn app_url(&self, version: &str) -> String {
        match &self.url {
            Some(url) => url.clone(),
            None => format!(
                "{}/{}/index.html",
                self.base_url.trim_end_matches('/'),
                version
            ),
        }
    }
}
