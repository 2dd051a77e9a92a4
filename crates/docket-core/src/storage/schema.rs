// The whole relational set is dropped and recreated at the start of every
// ingestion run; there is no incremental update path.

pub const DROP: &str = r#"
DROP TABLE IF EXISTS Cases;
DROP TABLE IF EXISTS DistrictCourts;
DROP TABLE IF EXISTS States;
"#;

pub const DDL: &str = r#"
CREATE TABLE IF NOT EXISTS States (
  Id INTEGER PRIMARY KEY AUTOINCREMENT,
  Name TEXT NOT NULL,
  Abbr TEXT NOT NULL,
  AssocPress TEXT,
  CensusRegionName TEXT,
  CensusDivisionName TEXT,
  CircuitCourt TEXT
);

CREATE TABLE IF NOT EXISTS DistrictCourts (
  Id INTEGER PRIMARY KEY AUTOINCREMENT,
  StateId INTEGER REFERENCES States(Id),
  CourtName TEXT NOT NULL,
  Citation TEXT,
  CircuitCourt TEXT,
  Established INTEGER,
  NumJudges INTEGER
);

CREATE TABLE IF NOT EXISTS Cases (
  Id INTEGER PRIMARY KEY AUTOINCREMENT,
  Name TEXT,
  NameAbbr TEXT,
  DecisionDate TEXT,
  CourtId INTEGER REFERENCES DistrictCourts(Id),
  CaseBody TEXT
);
"#;
