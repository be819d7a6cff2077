//! Decoding of `action=query&prop=revisions&rvslots=main&rvprop=content` responses.

use std::collections::BTreeMap;

use serde::Deserialize;

use super::WikiError;

/// Title and current wikitext of one page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WikiPage {
    pub title: String,
    pub content: String,
}

#[derive(Debug, Deserialize)]
struct QueryResponse {
    #[serde(default)]
    query: Option<QueryBody>,
}

#[derive(Debug, Deserialize)]
struct QueryBody {
    // Keyed by page id; BTreeMap keeps page order stable between runs.
    #[serde(default)]
    pages: Option<BTreeMap<String, RawPage>>,
}

#[derive(Debug, Deserialize)]
struct RawPage {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    revisions: Option<Vec<RawRevision>>,
}

#[derive(Debug, Deserialize)]
struct RawRevision {
    #[serde(default)]
    slots: Option<RawSlots>,
    // Legacy (pre-slots) responses put the content directly on the revision.
    #[serde(default, rename = "*")]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawSlots {
    #[serde(default)]
    main: Option<RawSlot>,
}

#[derive(Debug, Deserialize)]
struct RawSlot {
    #[serde(default, rename = "*")]
    content: Option<String>,
}

impl RawRevision {
    fn into_content(self) -> Option<String> {
        self.slots
            .and_then(|slots| slots.main)
            .and_then(|main| main.content)
            .or(self.content)
    }
}

/// Extract every page that has content. Missing pages (no revisions) are dropped.
pub fn parse_revisions_response(body: &str) -> Result<Vec<WikiPage>, WikiError> {
    let response: QueryResponse = serde_json::from_str(body)?;
    let pages = response
        .query
        .and_then(|query| query.pages)
        .unwrap_or_default();

    Ok(pages
        .into_values()
        .filter_map(|page| {
            let content = page
                .revisions?
                .into_iter()
                .next()
                .and_then(RawRevision::into_content)?;
            Some(WikiPage {
                title: page.title.unwrap_or_default(),
                content,
            })
        })
        .collect())
}
