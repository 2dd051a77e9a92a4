use crate::cache::{fetch_json_cached, FetchCache};
use crate::model::CaseRow;
use crate::providers::PageFetcher;
use anyhow::Context;
use tracing::{debug, info};

/// Walks the cursor-paginated case API, visiting at most `page_limit` pages.
///
/// Pagination is inherently sequential: each page's address is only
/// discoverable from the previous response. Every page goes through the
/// cache, which persists it before any row is extracted.
pub async fn walk_case_pages(
    cache: &mut FetchCache,
    fetcher: &dyn PageFetcher,
    initial_url: &str,
    page_limit: u32,
) -> anyhow::Result<Vec<CaseRow>> {
    let mut rows = Vec::new();
    let mut url = initial_url.to_string();
    let mut pages = 0u32;

    while pages < page_limit {
        let body = fetch_json_cached(cache, fetcher, &url).await?;
        pages += 1;

        let results = body
            .get("results")
            .and_then(|v| v.as_array())
            .with_context(|| format!("case API page {} has no results array", pages))?;
        debug!(page = pages, cases = results.len(), "extracted case page");
        for case in results {
            rows.push(extract_case(case));
        }

        match body.get("next").and_then(|v| v.as_str()) {
            Some(next) => url = next.to_string(),
            None => break,
        }
    }

    info!(pages, cases = rows.len(), "case corpus extracted");
    Ok(rows)
}

/// Pulls the five consumed fields out of one case record. Missing optional
/// fields become empty strings; a record never fails the page.
fn extract_case(case: &serde_json::Value) -> CaseRow {
    let text_at = |ptr: &str| {
        case.pointer(ptr)
            .and_then(|v| v.as_str())
            .unwrap_or_default()
            .to_string()
    };

    let mut body = String::new();
    if let Some(opinions) = case
        .pointer("/casebody/data/opinions")
        .and_then(|v| v.as_array())
    {
        for opinion in opinions {
            if let Some(text) = opinion.get("text").and_then(|v| v.as_str()) {
                body.push_str(text);
            }
        }
    }

    CaseRow {
        name: text_at("/name"),
        name_abbr: text_at("/name_abbreviation"),
        decision_date: text_at("/decision_date"),
        court_abbr: text_at("/court/name_abbreviation"),
        body,
    }
}
