// Browser - The capability set the suites drive
//
// Suites never talk to an automation library directly. They use the Browser
// trait: navigate, type into a labelled field, click, list elements matching a
// selector, read an attribute, reload, close. `PlaywrightBrowser` implements it
// over playwright-rs; tests implement it with a scripted in-memory album.

mod playwright;

pub use playwright::{PlaywrightBrowser, PlaywrightLauncher};

use crate::config::BrowserOptions;
use crate::error::{Error, Result};
use async_trait::async_trait;

/// One element out of a `find_all` result, addressed by selector and position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    pub selector: String,
    pub index: usize,
}

impl Element {
    pub fn new(selector: impl Into<String>, index: usize) -> Self {
        Self {
            selector: selector.into(),
            index,
        }
    }
}

/// Something to click.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    /// CSS selector, e.g. `#view-search`
    Css(String),
    /// Visible text of a button or link, e.g. `Login`
    Text(String),
    /// A previously listed element
    Element(Element),
}

impl Target {
    pub fn css(selector: impl Into<String>) -> Self {
        Target::Css(selector.into())
    }

    pub fn text(text: impl Into<String>) -> Self {
        Target::Text(text.into())
    }
}

/// A live browser session on one page.
#[async_trait(?Send)]
pub trait Browser {
    /// Opens `url` in the session's page.
    async fn navigate(&self, url: &str) -> Result<()>;

    /// Replaces the contents of the input identified by `field` with `text`.
    ///
    /// `field` is a label: placeholder, name, id or aria-label of the input.
    async fn type_text(&self, text: &str, field: &str) -> Result<()>;

    async fn click(&self, target: &Target) -> Result<()>;

    /// Lists the elements currently matching `selector`, in document order.
    async fn find_all(&self, selector: &str) -> Result<Vec<Element>>;

    async fn attribute(&self, element: &Element, name: &str) -> Result<Option<String>>;

    async fn refresh(&self) -> Result<()>;

    /// Ends the session. Called exactly once, after the last case.
    async fn close(&self) -> Result<()>;
}

/// Starts browser sessions.
#[async_trait(?Send)]
pub trait Launcher {
    async fn launch(&self, options: &BrowserOptions) -> Result<Box<dyn Browser>>;
}

/// Where an image's identifier is read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdSource {
    /// File stem of the `src` URL (`.../img/12.jpg` is image `12`)
    SrcFileStem,
    /// The element's `id` attribute
    IdAttribute,
}

impl IdSource {
    fn attribute(self) -> &'static str {
        match self {
            IdSource::SrcFileStem => "src",
            IdSource::IdAttribute => "id",
        }
    }

    fn extract(self, value: &str) -> String {
        match self {
            IdSource::SrcFileStem => image_id_from_src(value),
            IdSource::IdAttribute => value.trim().to_string(),
        }
    }
}

/// Reads the identifiers of all images matching `selector`, in display order.
pub async fn rendered_ids(
    browser: &dyn Browser,
    selector: &str,
    source: IdSource,
) -> Result<Vec<String>> {
    let elements = browser.find_all(selector).await?;
    let mut ids = Vec::with_capacity(elements.len());
    for element in &elements {
        ids.push(element_id(browser, element, source).await?);
    }
    Ok(ids)
}

/// Reads the identifier of the first image matching `selector`, if any.
pub async fn first_rendered_id(
    browser: &dyn Browser,
    selector: &str,
    source: IdSource,
) -> Result<Option<String>> {
    let elements = browser.find_all(selector).await?;
    match elements.first() {
        Some(element) => Ok(Some(element_id(browser, element, source).await?)),
        None => Ok(None),
    }
}

async fn element_id(browser: &dyn Browser, element: &Element, source: IdSource) -> Result<String> {
    let name = source.attribute();
    let value = browser.attribute(element, name).await?.ok_or_else(|| {
        Error::interaction(
            "read attribute",
            format!("{}[{}] has no '{}'", element.selector, element.index, name),
        )
    })?;
    Ok(source.extract(&value))
}

/// Extracts the image identifier from a thumbnail URL.
///
/// Absolute and relative URLs are accepted; the identifier is the last path
/// segment without its extension.
pub fn image_id_from_src(src: &str) -> String {
    let path = match url::Url::parse(src) {
        Ok(parsed) => parsed.path().to_string(),
        Err(_) => src.split(['?', '#']).next().unwrap_or_default().to_string(),
    };
    let file = path.rsplit('/').next().unwrap_or_default();
    match file.split_once('.') {
        Some((stem, _)) => stem.to_string(),
        None => file.to_string(),
    }
}
