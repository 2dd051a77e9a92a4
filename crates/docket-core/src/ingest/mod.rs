use crate::cache::{fetch_text_cached, FetchCache};
use crate::config::IngestConfig;
use crate::extract::{cases, courts};
use crate::model::IngestReport;
use crate::providers::PageFetcher;
use crate::reference;
use crate::storage::Store;
use std::sync::Arc;
use tracing::{info, warn};

/// Roster entry whose state resolution is forced after insert: its name
/// cannot be substring-matched against ordinary state names.
const DC_COURT_NAME: &str = "District of Columbia";

/// Resolve-then-insert pipeline. Owns the store, the request cache, and the
/// fetcher; `run` rebuilds the whole relational set from the two sources
/// plus the static state table.
pub struct Ingestor {
    pub store: Store,
    pub cache: FetchCache,
    pub fetcher: Arc<dyn PageFetcher>,
}

impl Ingestor {
    pub async fn run(&mut self, cfg: &IngestConfig) -> anyhow::Result<IngestReport> {
        let mut report = IngestReport::default();
        self.store.reset_schema()?;

        // States first: court resolution needs them in place.
        let states = reference::load_states(&cfg.states_csv)?;
        for state in &states {
            self.store.insert_state(state)?;
        }
        report.states = states.len();
        info!(states = report.states, "state reference loaded");

        let html =
            fetch_text_cached(&mut self.cache, self.fetcher.as_ref(), &cfg.courts_url).await?;
        let court_rows = courts::parse_roster(&html)?;
        for row in &court_rows {
            let state_id = match row.state.as_deref() {
                Some(state) => self.store.state_id_containing(state)?,
                None => None,
            };
            if state_id.is_none() {
                report.courts_unmatched += 1;
            }
            let circuit = normalize_circuit(&row.circuit);
            self.store.insert_court(row, state_id, &circuit)?;
        }
        report.courts = court_rows.len();
        info!(
            courts = report.courts,
            unmatched = report.courts_unmatched,
            "court roster ingested"
        );

        match self.store.state_id_by_name(DC_COURT_NAME)? {
            Some(dc_id) => {
                let n = self.store.force_court_state(DC_COURT_NAME, dc_id)?;
                info!(rows = n, "applied District of Columbia correction");
            }
            None => warn!("no District of Columbia state row; correction skipped"),
        }

        let case_rows = cases::walk_case_pages(
            &mut self.cache,
            self.fetcher.as_ref(),
            &cfg.cases_url,
            cfg.page_limit,
        )
        .await?;
        for row in &case_rows {
            let court_id = self.store.court_id_by_citation(&row.court_abbr)?;
            if court_id.is_none() {
                report.cases_unmatched += 1;
            }
            self.store.insert_case(row, court_id)?;
        }
        report.cases = case_rows.len();
        info!(
            cases = report.cases,
            unmatched = report.cases_unmatched,
            "ingestion complete"
        );

        Ok(report)
    }
}

/// Reduces a raw circuit label to its numeral: the leading whitespace token
/// with any trailing run of lowercase alphabetics stripped.
pub fn normalize_circuit(raw: &str) -> String {
    raw.split_whitespace()
        .next()
        .unwrap_or("")
        .trim_end_matches(|c: char| c.is_ascii_lowercase())
        .to_string()
}
