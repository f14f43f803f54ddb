// Login suite
//
// Submits each fixture's credentials and infers the result from whether any
// image is rendered afterwards.

use super::{Suite, refresh};
use crate::browser::{Browser, Target};
use crate::config::RunConfig;
use crate::error::Result;
use crate::fixture::{LoginCase, load_cases};
use crate::report::TestLog;
use crate::verify::login_passes;
use async_trait::async_trait;

#[derive(Debug, Default)]
pub struct LoginSuite {
    cases: Vec<LoginCase>,
}

impl LoginSuite {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Submits the case's credentials and counts the images shown afterwards.
async fn attempt(browser: &dyn Browser, case: &LoginCase, config: &RunConfig) -> Result<usize> {
    let selectors = &config.selectors;
    browser
        .type_text(&case.username, &selectors.username_field)
        .await?;
    browser
        .type_text(&case.password, &selectors.password_field)
        .await?;
    browser.click(&Target::text(&selectors.login_button)).await?;
    Ok(browser.find_all(&selectors.any_image).await?.len())
}

#[async_trait(?Send)]
impl Suite for LoginSuite {
    fn title(&self) -> &'static str {
        "LOGIN TEST"
    }

    fn app_version(&self) -> &'static str {
        "v1"
    }

    fn prepare(&mut self, config: &RunConfig, log: &mut TestLog) -> Result<()> {
        match load_cases(&config.fixtures) {
            Ok(cases) => {
                self.cases = cases;
                log.entry(&format!("Added {} test cases", self.cases.len()))
            }
            Err(e) => {
                log.entry("Failed to initialize test cases")?;
                println!("Failed to initialize test cases");
                Err(e)
            }
        }
    }

    fn case_count(&self) -> usize {
        self.cases.len()
    }

    async fn run_cases(
        &self,
        browser: &dyn Browser,
        config: &RunConfig,
        log: &mut TestLog,
    ) -> Result<usize> {
        log.stage("Going through test cases")?;
        log.entry("")?;
        let mut failed = 0;

        for case in &self.cases {
            match attempt(browser, case, config).await {
                Ok(images) => {
                    let passed = login_passes(&config.credentials, case, images);
                    tracing::info!("{}: {} images rendered", case.message, images);
                    log.login_result(&case.message, passed)?;
                    if !passed {
                        failed += 1;
                    }
                }
                Err(e) => {
                    tracing::warn!("{}: login attempt failed: {}", case.message, e);
                    log.entry(&format!("Login attempt failed: {}", case.message))?;
                }
            }
            refresh(browser).await;
        }

        Ok(failed)
    }
}
