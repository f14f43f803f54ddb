// Pagination - Walks search result pages until the content stops changing
//
// The album's "next" control gives no reliable end-of-results signal, so the
// walk never looks at its state. After every advance the first rendered
// identifier is compared with the one seen before: a change means a new page,
// no change means the walk has reached its fixed point. A page limit stops
// sources that keep producing "new" pages forever.

use crate::browser::{Browser, IdSource, Target, first_rendered_id, rendered_ids};
use crate::error::Result;

/// Why a walk stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WalkEnd {
    /// The first identifier did not change after advancing
    Unchanged,
    /// The page held no results
    Empty,
    /// The page limit was reached
    PageLimit,
}

/// Result of one advance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageStep {
    /// A new page with these identifiers
    Next(Vec<String>),
    End(WalkEnd),
}

/// Walks result pages of the current search.
#[derive(Debug)]
pub struct PaginationWalker {
    results: String,
    next: Target,
    source: IdSource,
    max_pages: usize,
    first_seen: Option<String>,
    pages: usize,
}

impl PaginationWalker {
    pub fn new(results: &str, next: Target, source: IdSource, max_pages: usize) -> Self {
        Self {
            results: results.to_string(),
            next,
            source,
            max_pages: max_pages.max(1),
            first_seen: None,
            pages: 0,
        }
    }

    /// Number of pages read so far.
    pub fn pages(&self) -> usize {
        self.pages
    }

    /// Reads the page currently shown and remembers its first identifier.
    pub async fn start(&mut self, browser: &dyn Browser) -> Result<Vec<String>> {
        let ids = rendered_ids(browser, &self.results, self.source).await?;
        self.first_seen = ids.first().cloned();
        self.pages = 1;
        Ok(ids)
    }

    /// Requests the next page and reads it if its content changed.
    pub async fn advance(&mut self, browser: &dyn Browser) -> Result<PageStep> {
        let Some(previous) = self.first_seen.clone() else {
            return Ok(PageStep::End(WalkEnd::Empty));
        };
        if self.pages >= self.max_pages {
            tracing::warn!(
                "Stopped paging after {} pages; results may be incomplete",
                self.pages
            );
            return Ok(PageStep::End(WalkEnd::PageLimit));
        }

        browser.click(&self.next).await?;

        let first = first_rendered_id(browser, &self.results, self.source).await?;
        match first {
            None => Ok(PageStep::End(WalkEnd::Empty)),
            Some(first) if first == previous => {
                tracing::debug!("Page {} is the last page", self.pages);
                Ok(PageStep::End(WalkEnd::Unchanged))
            }
            Some(_) => {
                let ids = rendered_ids(browser, &self.results, self.source).await?;
                self.first_seen = ids.first().cloned();
                self.pages += 1;
                tracing::debug!("Advanced to page {} ({} results)", self.pages, ids.len());
                Ok(PageStep::Next(ids))
            }
        }
    }
}
