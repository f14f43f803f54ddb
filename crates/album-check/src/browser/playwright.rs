// PlaywrightBrowser - Browser capability set over playwright-rs
//
// One Playwright server, one browser, one page per run. Labels are resolved to
// CSS selectors the same way for every field, and text targets to buttons,
// links or submit inputs carrying that text.

use super::{Browser, Element, Launcher, Target};
use crate::config::{BrowserKind, BrowserOptions};
use crate::error::{Error, Result};
use async_trait::async_trait;
use playwright_rs::api::LaunchOptions;
use playwright_rs::{ClickOptions, FillOptions, GotoOptions, Locator, Page, Playwright};

/// A Playwright-driven browser session.
pub struct PlaywrightBrowser {
    playwright: Playwright,
    browser: playwright_rs::Browser,
    page: Page,
    options: BrowserOptions,
}

impl PlaywrightBrowser {
    /// Starts the Playwright server, launches the configured engine and opens a page.
    pub async fn launch(options: &BrowserOptions) -> Result<Self> {
        let playwright = Playwright::launch()
            .await
            .map_err(|e| Error::from(e).context("starting Playwright"))?;

        let browser_type = match options.kind {
            BrowserKind::Chromium => playwright.chromium(),
            BrowserKind::Firefox => playwright.firefox(),
            BrowserKind::Webkit => playwright.webkit(),
        };
        let launch_options = LaunchOptions::new()
            .headless(options.headless)
            .timeout(millis(options));

        let browser = browser_type
            .launch_with_options(launch_options)
            .await
            .map_err(|e| Error::from(e).context(format!("launching {:?}", options.kind)))?;
        let page = browser.new_page().await?;

        tracing::info!(
            "Launched {} {} (headless: {})",
            browser.name(),
            browser.version(),
            options.headless
        );

        Ok(Self {
            playwright,
            browser,
            page,
            options: options.clone(),
        })
    }

    async fn locate(&self, selector: &str) -> Locator {
        self.page.locator(selector).await
    }

    async fn settle(&self) {
        if !self.options.settle.is_zero() {
            tokio::time::sleep(self.options.settle).await;
        }
    }

    fn goto_options(&self) -> GotoOptions {
        GotoOptions::new().timeout(self.options.timeout)
    }
}

#[async_trait(?Send)]
impl Browser for PlaywrightBrowser {
    async fn navigate(&self, url: &str) -> Result<()> {
        tracing::debug!("goto {}", url);
        self.page.goto(url, Some(self.goto_options())).await?;
        Ok(())
    }

    async fn type_text(&self, text: &str, field: &str) -> Result<()> {
        tracing::debug!("type {:?} into {:?}", text, field);
        let input = self.locate(&field_selector(field)).await.first();
        let options = FillOptions::builder().timeout(millis(&self.options)).build();
        input.fill(text, Some(options)).await?;
        Ok(())
    }

    async fn click(&self, target: &Target) -> Result<()> {
        tracing::debug!("click {:?}", target);
        let locator = match target {
            Target::Css(selector) => self.locate(selector).await.first(),
            Target::Text(text) => self.locate(&text_selector(text)).await.first(),
            Target::Element(element) => self
                .locate(&element.selector)
                .await
                .nth(position(element)?),
        };
        let options = ClickOptions::builder().timeout(millis(&self.options)).build();
        locator.click(Some(options)).await?;
        self.settle().await;
        Ok(())
    }

    async fn find_all(&self, selector: &str) -> Result<Vec<Element>> {
        let count = self.locate(selector).await.count().await?;
        tracing::debug!("{} elements match {:?}", count, selector);
        Ok((0..count).map(|index| Element::new(selector, index)).collect())
    }

    async fn attribute(&self, element: &Element, name: &str) -> Result<Option<String>> {
        let locator = self
            .locate(&element.selector)
            .await
            .nth(position(element)?);
        Ok(locator.get_attribute(name).await?)
    }

    async fn refresh(&self) -> Result<()> {
        tracing::debug!("reload");
        self.page.reload(Some(self.goto_options())).await?;
        self.settle().await;
        Ok(())
    }

    async fn close(&self) -> Result<()> {
        self.browser.close().await?;
        self.playwright.shutdown().await?;
        tracing::debug!("Browser session closed");
        Ok(())
    }
}

/// Launches [`PlaywrightBrowser`] sessions.
#[derive(Debug, Default, Clone, Copy)]
pub struct PlaywrightLauncher;

#[async_trait(?Send)]
impl Launcher for PlaywrightLauncher {
    async fn launch(&self, options: &BrowserOptions) -> Result<Box<dyn Browser>> {
        let browser = PlaywrightBrowser::launch(options).await?;
        Ok(Box::new(browser))
    }
}

fn millis(options: &BrowserOptions) -> f64 {
    options.timeout.as_millis() as f64
}

fn position(element: &Element) -> Result<i32> {
    i32::try_from(element.index)
        .map_err(|_| Error::interaction("locate element", "element index out of range"))
}

fn quoted(value: &str) -> String {
    format!("\"{}\"", value.replace('\\', "\\\\").replace('"', "\\\""))
}

/// CSS selector for an input labelled `field`.
pub(crate) fn field_selector(field: &str) -> String {
    let value = quoted(field);
    ["placeholder", "name", "id", "aria-label"]
        .iter()
        .flat_map(|attr| {
            [
                format!("input[{}={}]", attr, value),
                format!("textarea[{}={}]", attr, value),
            ]
        })
        .collect::<Vec<_>>()
        .join(", ")
}

/// CSS selector for a clickable control showing `text`.
pub(crate) fn text_selector(text: &str) -> String {
    let value = quoted(text);
    format!(
        "button:has-text({v}), a:has-text({v}), input[type=submit][value={v}], input[type=button][value={v}]",
        v = value
    )
}
