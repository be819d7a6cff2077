//! Blocking MediaWiki API client.

use reqwest::blocking::Client;
use tracing::debug;

use super::response::{parse_revisions_response, WikiPage};
use super::{PageSource, WikiError};

pub const DEFAULT_API_URL: &str = "https://tibia.fandom.com/api.php";
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (NPC outfit scraper)";

#[derive(Debug, Clone)]
pub struct MediaWikiClient {
    http: Client,
    api_url: String,
}

impl MediaWikiClient {
    pub fn new(api_url: impl Into<String>, user_agent: &str) -> Result<Self, WikiError> {
        let http = Client::builder()
            .user_agent(user_agent)
            .build()
            .map_err(|source| WikiError::Http {
                titles: String::new(),
                source,
            })?;
        Ok(Self {
            http,
            api_url: api_url.into(),
        })
    }
}

impl PageSource for MediaWikiClient {
    fn fetch_pages(&self, titles: &[&str]) -> Result<Vec<WikiPage>, WikiError> {
        let joined = titles.join("|");
        debug!(api_url = %self.api_url, titles = %joined, "fetching wiki pages");

        let response = self
            .http
            .get(&self.api_url)
            .query(&[
                ("action", "query"),
                ("format", "json"),
                ("prop", "revisions"),
                ("rvslots", "main"),
                ("rvprop", "content"),
                ("titles", joined.as_str()),
            ])
            .send()
            .map_err(|source| WikiError::Http {
                titles: joined.clone(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(WikiError::Status {
                titles: joined,
                status: status.as_u16(),
            });
        }

        let body = response.text().map_err(|source| WikiError::Http {
            titles: joined.clone(),
            source,
        })?;
        parse_revisions_response(&body)
    }
}
