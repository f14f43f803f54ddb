// Date search suite
//
// Logs in, searches with a start and end date, and checks every image on every
// result page against the reference dataset.

use super::{CaseOutcome, Suite, abandon, login, refresh};
use crate::browser::{Browser, IdSource, Target};
use crate::config::RunConfig;
use crate::error::{Error, Result};
use crate::fixture::{DateCase, load_cases};
use crate::pagination::{PageStep, PaginationWalker};
use crate::reference::ReferenceDataset;
use crate::report::TestLog;
use crate::verify::DateVerifier;
use async_trait::async_trait;

#[derive(Debug, Default)]
pub struct DateSearchSuite {
    dataset: Option<ReferenceDataset>,
    cases: Vec<DateCase>,
}

impl DateSearchSuite {
    pub fn new() -> Self {
        Self::default()
    }

    async fn submit(&self, browser: &dyn Browser, case: &DateCase, config: &RunConfig) -> Result<()> {
        let selectors = &config.selectors;
        browser
            .type_text(&case.start_date, &selectors.start_date_field)
            .await?;
        browser
            .type_text(&case.end_date, &selectors.end_date_field)
            .await?;
        browser.click(&Target::css(&selectors.search_button)).await
    }

    async fn search(
        &self,
        browser: &dyn Browser,
        dataset: &ReferenceDataset,
        case: &DateCase,
        config: &RunConfig,
        log: &mut TestLog,
    ) -> Result<CaseOutcome> {
        if let Err(e) = self.submit(browser, case, config).await {
            return abandon(log, "Search failed", &e);
        }

        let mut walker = PaginationWalker::new(
            &config.selectors.result_images,
            Target::css(&config.selectors.next_page_button),
            IdSource::SrcFileStem,
            config.max_pages,
        );
        let mut verifier = DateVerifier::new(dataset, case);

        let mut ids = match walker.start(browser).await {
            Ok(ids) => ids,
            Err(e) => return abandon(log, "Failed to load page elements", &e),
        };
        loop {
            for id in &ids {
                let verdict = verifier.check(id);
                log.date_item(&verdict)?;
            }
            match walker.advance(browser).await {
                Ok(PageStep::Next(next)) => ids = next,
                Ok(PageStep::End(end)) => {
                    tracing::debug!("Walk ended after {} pages: {:?}", walker.pages(), end);
                    break;
                }
                Err(e) => return abandon(log, "Failed to load the next page", &e),
            }
        }

        let summary = verifier.finish();
        log.search_summary(&summary)?;
        Ok(CaseOutcome::from(&summary))
    }
}

#[async_trait(?Send)]
impl Suite for DateSearchSuite {
    fn title(&self) -> &'static str {
        "DATE SEARCH TEST"
    }

    fn app_version(&self) -> &'static str {
        "v2"
    }

    fn prepare(&mut self, config: &RunConfig, log: &mut TestLog) -> Result<()> {
        let dataset = ReferenceDataset::build();
        if dataset.is_empty() {
            log.entry("Failed to initialize images")?;
            println!("Failed to initialize images");
            return Err(Error::Setup("reference dataset is empty".to_string()));
        }
        log.entry(&format!("Added {} images", dataset.len()))?;
        self.dataset = Some(dataset);

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
        let Some(dataset) = &self.dataset else {
            return Err(Error::Setup("reference dataset not built".to_string()));
        };

        log.stage("Going through test cases")?;
        let mut failed = 0;

        for case in &self.cases {
            log.case_header(&case.message)?;
            if let Err(e) = login(browser, config).await {
                tracing::warn!("Login failed, stopping: {}", e);
                log.entry("Failed to login")?;
                break;
            }

            let outcome = self.search(browser, dataset, case, config, log).await?;
            tracing::info!("{}: {:?}", case.message, outcome);
            if outcome == CaseOutcome::Failed {
                failed += 1;
            }
            refresh(browser).await;
        }

        Ok(failed)
    }
}
