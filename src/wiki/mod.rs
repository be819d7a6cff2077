//! Wiki page retrieval. The resolver only sees [PageSource]; the MediaWiki HTTP
//! client is one implementation, tests use in-memory fakes.

mod client;
mod response;

pub use client::{MediaWikiClient, DEFAULT_API_URL, DEFAULT_USER_AGENT};
pub use response::{parse_revisions_response, WikiPage};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum WikiError {
    #[error("request for '{titles}' failed: {source}")]
    Http {
        titles: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("request for '{titles}' returned HTTP {status}")]
    Status { titles: String, status: u16 },
    #[error("unable to decode wiki API response: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Anything that can return current wikitext for page titles.
pub trait PageSource {
    /// Fetch all `titles` in a single round-trip. Pages that do not exist or
    /// have no revision are simply missing from the result.
    fn fetch_pages(&self, titles: &[&str]) -> Result<Vec<WikiPage>, WikiError>;

    /// Wikitext of one page, empty when the page has no content.
    fn fetch_page(&self, title: &str) -> Result<String, WikiError> {
        let pages = self.fetch_pages(&[title])?;
        Ok(pages
            .into_iter()
            .next()
            .map(|page| page.content)
            .unwrap_or_default())
    }
}

impl<T: PageSource + ?Sized> PageSource for &T {
    fn fetch_pages(&self, titles: &[&str]) -> Result<Vec<WikiPage>, WikiError> {
        (**self).fetch_pages(titles)
    }
}
