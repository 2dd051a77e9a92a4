use crate::model::{CaseMatch, StateCaseCount, StateMatchRate, WordTrend};
use crate::storage::Store;
use rusqlite::params;
use std::collections::BTreeMap;

/// Read-only aggregation surface over the store; these four shapes are the
/// only queries the renderer consumes. Search terms are always bound
/// parameters matched with instr(), so `%` and `_` carry no wildcard
/// meaning and nothing is ever spliced into statement text.
#[derive(Clone)]
pub struct Aggregations {
    store: Store,
}

const JOIN: &str = "FROM Cases
     JOIN DistrictCourts ON Cases.CourtId = DistrictCourts.Id
     JOIN States ON DistrictCourts.StateId = States.Id";

impl Aggregations {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    /// Case counts per state. `percent` shares one global denominator: the
    /// total across every returned state.
    pub fn counts_by_state(&self) -> anyhow::Result<Vec<StateCaseCount>> {
        let conn = self.store.conn.lock().unwrap();
        let mut stmt = conn.prepare(&format!(
            "SELECT States.Abbr, States.Name, COUNT(*) {} GROUP BY States.Abbr",
            JOIN
        ))?;
        let mut rows = stmt.query([])?;

        let mut grouped: Vec<(String, String, i64)> = Vec::new();
        while let Some(row) = rows.next()? {
            grouped.push((row.get(0)?, row.get(1)?, row.get(2)?));
        }
        let total: i64 = grouped.iter().map(|(_, _, c)| c).sum();

        Ok(grouped
            .into_iter()
            .map(|(abbr, name, count)| StateCaseCount {
                abbr,
                name,
                count,
                percent: if total == 0 {
                    0.0
                } else {
                    count as f64 / total as f64
                },
            })
            .collect())
    }

    /// Per state: cases whose body contains `term`, over all cases for that
    /// state. States with zero matches are reported at 0.0, never omitted.
    pub fn percent_containing(&self, term: &str) -> anyhow::Result<Vec<StateMatchRate>> {
        let conn = self.store.conn.lock().unwrap();

        let mut stmt = conn.prepare(&format!(
            "SELECT States.Abbr, COUNT(*) {} GROUP BY States.Abbr",
            JOIN
        ))?;
        let mut rows = stmt.query([])?;
        let mut totals: Vec<(String, i64)> = Vec::new();
        while let Some(row) = rows.next()? {
            totals.push((row.get(0)?, row.get(1)?));
        }

        let mut stmt = conn.prepare(&format!(
            "SELECT States.Abbr, COUNT(*) {}
             WHERE instr(lower(Cases.CaseBody), lower(?1)) > 0
             GROUP BY States.Abbr",
            JOIN
        ))?;
        let mut rows = stmt.query(params![term])?;
        let mut matching: BTreeMap<String, i64> = BTreeMap::new();
        while let Some(row) = rows.next()? {
            matching.insert(row.get(0)?, row.get(1)?);
        }

        Ok(totals
            .into_iter()
            .map(|(abbr, total)| {
                let hits = matching.get(&abbr).copied().unwrap_or(0);
                StateMatchRate {
                    rate: hits as f64 / total as f64,
                    abbr,
                }
            })
            .collect())
    }

    /// Every case whose body contains `term`, ordered by state abbreviation
    /// ascending. Empty Vec when nothing matches.
    pub fn cases_containing(&self, term: &str) -> anyhow::Result<Vec<CaseMatch>> {
        let conn = self.store.conn.lock().unwrap();
        let mut stmt = conn.prepare(&format!(
            "SELECT States.Abbr, States.Name, Cases.Name, Cases.NameAbbr,
                    DistrictCourts.CourtName, DistrictCourts.Citation
             {}
             WHERE instr(lower(Cases.CaseBody), lower(?1)) > 0
             ORDER BY States.Abbr",
            JOIN
        ))?;
        let mut rows = stmt.query(params![term])?;

        let mut matches = Vec::new();
        while let Some(row) = rows.next()? {
            matches.push(CaseMatch {
                state_abbr: row.get(0)?,
                state_name: row.get(1)?,
                case_name: row.get(2)?,
                case_abbr: row.get(3)?,
                court_name: row.get(4)?,
                court_citation: row.get(5)?,
            });
        }
        Ok(matches)
    }

    /// Relative frequency of each requested word per decision date, over
    /// every case body (unresolved courts included). All words share the
    /// identical date-key set; an absent word is 0.0 throughout.
    pub fn word_frequency_by_date(&self, words: &[String]) -> anyhow::Result<Vec<WordTrend>> {
        let conn = self.store.conn.lock().unwrap();
        let mut stmt = conn.prepare("SELECT DecisionDate, CaseBody FROM Cases")?;
        let mut rows = stmt.query([])?;

        // Whitespace tokens bucketed by decision date.
        let mut buckets: BTreeMap<String, Vec<String>> = BTreeMap::new();
        while let Some(row) = rows.next()? {
            let date: String = row.get(0)?;
            let body: String = row.get(1)?;
            buckets
                .entry(date)
                .or_default()
                .extend(body.split_whitespace().map(str::to_string));
        }

        Ok(words
            .iter()
            .map(|word| {
                let by_date = buckets
                    .iter()
                    .map(|(date, tokens)| {
                        let hits = tokens.iter().filter(|t| t.as_str() == word).count();
                        let freq = if tokens.is_empty() {
                            0.0
                        } else {
                            hits as f64 / tokens.len() as f64
                        };
                        (date.clone(), freq)
                    })
                    .collect();
                WordTrend {
                    word: word.clone(),
                    by_date,
                }
            })
            .collect())
    }
}
