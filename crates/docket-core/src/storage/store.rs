use crate::model::{CaseRow, CourtRow, StateRow};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use std::sync::{Arc, Mutex};

/// Handle on the relational store. Single-writer by design; every insert
/// commits on its own so partial progress stays visible if a run is
/// interrupted.
#[derive(Clone)]
pub struct Store {
    pub(crate) conn: Arc<Mutex<Connection>>,
}

impl Store {
    pub fn open(path: &Path) -> anyhow::Result<Self> {
        let conn = Connection::open(path)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Drops and recreates all three tables. Every ingestion run starts
    /// from an empty store.
    pub fn reset_schema(&self) -> anyhow::Result<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute_batch(crate::storage::schema::DROP)?;
        conn.execute_batch(crate::storage::schema::DDL)?;
        Ok(())
    }

    pub fn insert_state(&self, row: &StateRow) -> anyhow::Result<i64> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT INTO States (Name, Abbr, AssocPress, CensusRegionName, CensusDivisionName, CircuitCourt)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                row.name,
                row.abbr,
                row.assoc_press,
                row.census_region,
                row.census_division,
                row.circuit
            ],
        )?;
        Ok(conn.last_insert_rowid())
    }

    /// Case-insensitive substring containment of `name` in States.Name.
    /// The name is always a bound parameter, never interpolated.
    pub fn state_id_containing(&self, name: &str) -> anyhow::Result<Option<i64>> {
        let conn = self.conn.lock().unwrap();
        conn.query_row(
            "SELECT Id FROM States WHERE instr(lower(Name), lower(?1)) > 0 ORDER BY Id LIMIT 1",
            params![name],
            |r| r.get(0),
        )
        .optional()
        .map_err(Into::into)
    }

    pub fn state_id_by_name(&self, name: &str) -> anyhow::Result<Option<i64>> {
        let conn = self.conn.lock().unwrap();
        conn.query_row(
            "SELECT Id FROM States WHERE Name = ?1 LIMIT 1",
            params![name],
            |r| r.get(0),
        )
        .optional()
        .map_err(Into::into)
    }

    pub fn insert_court(
        &self,
        row: &CourtRow,
        state_id: Option<i64>,
        circuit: &str,
    ) -> anyhow::Result<i64> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT INTO DistrictCourts (StateId, CourtName, Citation, CircuitCourt, Established, NumJudges)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                state_id,
                row.name,
                row.citation,
                circuit,
                row.established,
                row.num_judges
            ],
        )?;
        Ok(conn.last_insert_rowid())
    }

    /// Post-insert correction for roster entries whose state cannot be
    /// substring-matched. Overrides whatever resolution produced, including
    /// NULL.
    pub fn force_court_state(&self, court_name: &str, state_id: i64) -> anyhow::Result<usize> {
        let conn = self.conn.lock().unwrap();
        let n = conn.execute(
            "UPDATE DistrictCourts SET StateId = ?1 WHERE CourtName = ?2",
            params![state_id, court_name],
        )?;
        Ok(n)
    }

    /// Case-insensitive match of a case's court abbreviation against
    /// DistrictCourts.Citation.
    pub fn court_id_by_citation(&self, citation: &str) -> anyhow::Result<Option<i64>> {
        let conn = self.conn.lock().unwrap();
        conn.query_row(
            "SELECT Id FROM DistrictCourts WHERE lower(Citation) = lower(?1) ORDER BY Id LIMIT 1",
            params![citation],
            |r| r.get(0),
        )
        .optional()
        .map_err(Into::into)
    }

    pub fn insert_case(&self, row: &CaseRow, court_id: Option<i64>) -> anyhow::Result<i64> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT INTO Cases (Name, NameAbbr, DecisionDate, CourtId, CaseBody)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                row.name,
                row.name_abbr,
                row.decision_date,
                court_id,
                row.body
            ],
        )?;
        Ok(conn.last_insert_rowid())
    }
}
