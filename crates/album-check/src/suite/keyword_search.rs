// Keyword search suite
//
// Tags the first album page with the keyword index, then searches by keywords
// and checks that every rendered image carries one of them.

use super::{CaseOutcome, Suite, abandon, login, refresh};
use crate::browser::{Browser, IdSource, Target, rendered_ids};
use crate::config::{AppSelectors, RunConfig};
use crate::error::{Error, Result};
use crate::fixture::{KeywordCase, load_cases};
use crate::reference::KeywordIndex;
use crate::report::TestLog;
use crate::verify::KeywordVerifier;
use async_trait::async_trait;

#[derive(Debug, Default)]
pub struct KeywordSearchSuite {
    index: Option<KeywordIndex>,
    cases: Vec<KeywordCase>,
}

impl KeywordSearchSuite {
    pub fn new() -> Self {
        Self::default()
    }

    async fn search(
        &self,
        browser: &dyn Browser,
        index: &KeywordIndex,
        case: &KeywordCase,
        config: &RunConfig,
        log: &mut TestLog,
    ) -> Result<CaseOutcome> {
        let selectors = &config.selectors;
        let submitted = async {
            browser
                .type_text(&case.search_input(), &selectors.keywords_field)
                .await?;
            browser.click(&Target::css(&selectors.search_button)).await
        };
        if let Err(e) = submitted.await {
            return abandon(log, "Search failed", &e);
        }

        let ids = match rendered_ids(browser, &selectors.result_images, IdSource::IdAttribute).await {
            Ok(ids) => ids,
            Err(e) => return abandon(log, "Failed to load page elements", &e),
        };

        let mut verifier = KeywordVerifier::new(index, case);
        for id in &ids {
            let verdict = verifier.check(id);
            log.keyword_item(&verdict)?;
        }

        let summary = verifier.finish();
        log.search_summary(&summary)?;
        Ok(CaseOutcome::from(&summary))
    }
}

/// Tags first-page images through the full image view.
async fn seed_keywords(
    browser: &dyn Browser,
    index: &KeywordIndex,
    selectors: &AppSelectors,
) -> Result<()> {
    let thumbnails = browser.find_all(&selectors.result_images).await?;

    for (keyword, position) in index.assignments() {
        let thumbnail = thumbnails.get(position as usize).cloned().ok_or_else(|| {
            Error::interaction(
                "tag image",
                format!("only {} images on the first page", thumbnails.len()),
            )
        })?;
        tracing::debug!("Tagging image {} with {:?}", position, keyword);

        browser.click(&Target::Element(thumbnail)).await?;
        browser
            .type_text(keyword, &selectors.keyword_editor_field)
            .await?;
        browser
            .click(&Target::css(&selectors.save_keywords_button))
            .await?;
        browser
            .click(&Target::css(&selectors.close_full_view_button))
            .await?;
    }

    Ok(())
}

#[async_trait(?Send)]
impl Suite for KeywordSearchSuite {
    fn title(&self) -> &'static str {
        "KEYWORD SEARCH TEST"
    }

    fn app_version(&self) -> &'static str {
        "v2"
    }

    fn prepare(&mut self, config: &RunConfig, log: &mut TestLog) -> Result<()> {
        let index = KeywordIndex::standard();
        if index.is_empty() {
            log.entry("Failed to initialize keywords")?;
            println!("Failed to initialize keywords");
            return Err(Error::Setup("keyword index is empty".to_string()));
        }
        self.index = Some(index);

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
        let Some(index) = &self.index else {
            return Err(Error::Setup("keyword index not built".to_string()));
        };

        if let Err(e) = login(browser, config).await {
            tracing::warn!("Login before tagging failed: {}", e);
            log.entry("Failed to login")?;
        }

        if let Err(e) = seed_keywords(browser, index, &config.selectors).await {
            tracing::error!("Tagging failed: {}", e);
            log.entry("Failed to add keywords for images")?;
            println!("Failed to add keywords for images");
            return Ok(self.cases.len());
        }

        log.stage("Going through test cases")?;
        let mut failed = 0;

        for case in &self.cases {
            refresh(browser).await;
            log.case_header(&case.message)?;
            if let Err(e) = login(browser, config).await {
                tracing::warn!("Login failed, stopping: {}", e);
                log.entry("Failed to login")?;
                break;
            }

            let outcome = self.search(browser, index, case, config, log).await?;
            tracing::info!("{}: {:?}", case.message, outcome);
            if outcome == CaseOutcome::Failed {
                failed += 1;
            }
        }

        Ok(failed)
    }
}
