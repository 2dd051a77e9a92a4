use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One row of the static state reference table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateRow {
    pub name: String,
    pub abbr: String,
    pub assoc_press: String,
    pub census_region: String,
    pub census_division: String,
    pub circuit: String,
}

/// One entry extracted from the court roster table.
///
/// `state` is the owning state derived from the name cell; `None` means the
/// name did not fit any rule and the row resolves to a NULL StateId.
/// `circuit` carries the raw label; normalization happens at insert time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CourtRow {
    pub state: Option<String>,
    pub name: String,
    pub citation: String,
    pub circuit: String,
    pub established: Option<i64>,
    pub num_judges: Option<i64>,
}

/// One case record from the corpus API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaseRow {
    pub name: String,
    pub name_abbr: String,
    pub decision_date: String,
    pub court_abbr: String,
    /// Every opinion's text in document order, no separator.
    pub body: String,
}

/// Counters for one ingestion run. Unmatched rows were inserted with a NULL
/// foreign key, not dropped.
#[derive(Debug, Clone, Default, Serialize)]
pub struct IngestReport {
    pub states: usize,
    pub courts: usize,
    pub courts_unmatched: usize,
    pub cases: usize,
    pub cases_unmatched: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StateCaseCount {
    pub abbr: String,
    pub name: String,
    pub count: i64,
    /// Share of the total across all states, not of a per-group denominator.
    pub percent: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StateMatchRate {
    pub abbr: String,
    pub rate: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CaseMatch {
    pub state_abbr: String,
    pub state_name: String,
    pub case_name: String,
    pub case_abbr: String,
    pub court_name: String,
    pub court_citation: String,
}

/// Relative frequency of one word per decision date. Trends produced by the
/// same query share an identical date-key set.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WordTrend {
    pub word: String,
    pub by_date: BTreeMap<String, f64>,
}
