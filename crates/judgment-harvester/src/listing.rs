//! Case-identifier discovery from a listing page

use crate::case_id::CaseId;
use crate::config::PipelineConfig;
use crate::http::HttpSource;
use scraper::{Html, Selector};
use std::collections::BTreeSet;
use tracing::{debug, error, info};

/// Path segment every judgment link carries
const RETRIEVAL_SEGMENT: &str = "/gd/";

/// Collect every case identifier linked from the listing markup.
///
/// Only `href` attributes are consulted. A link qualifies when it contains the
/// retrieval segment and an underscore, and its last path segment is a valid
/// [`CaseId`].
pub fn parse_listing(html: &str) -> BTreeSet<CaseId> {
    let document = Html::parse_document(html);
    let selector = match Selector::parse("a[href]") {
        Ok(selector) => selector,
        Err(_) => return BTreeSet::new(),
    };

    document
        .select(&selector)
        .filter_map(|a| a.value().attr("href"))
        .filter_map(case_id_from_href)
        .collect()
}

fn case_id_from_href(href: &str) -> Option<CaseId> {
    if href.is_empty() || !href.contains(RETRIEVAL_SEGMENT) || !href.contains('_') {
        return None;
    }
    href.rsplit('/').next().and_then(CaseId::parse)
}

/// Fetch the configured listing page and extract case identifiers.
///
/// Fetch failures are logged and produce an empty set.
pub async fn fetch_case_ids(source: &dyn HttpSource, config: &PipelineConfig) -> BTreeSet<CaseId> {
    let url = config.urls.listing_url.as_str();
    let html = match source.get_text(url, config.network.listing_timeout()).await {
        Ok(html) => html,
        Err(e) => {
            error!(url, error = %e, "could not load listing");
            return BTreeSet::new();
        }
    };

    let ids = parse_listing(&html);
    debug!(count = ids.len(), "potential case ids on listing page");
    info!(url, count = ids.len(), "listing parsed");
    ids
}
