use crate::model::StateRow;
use anyhow::Context;
use std::path::Path;

// Column positions in the canonical state reference table. The file carries
// more columns than we consume; these six are read by fixed position with
// the header row skipped.
const COL_NAME: usize = 1;
const COL_ABBR: usize = 2;
const COL_AP: usize = 10;
const COL_REGION: usize = 13;
const COL_DIVISION: usize = 15;
const COL_CIRCUIT: usize = 16;

pub fn load_states(path: &Path) -> anyhow::Result<Vec<StateRow>> {
    let mut reader = csv::Reader::from_path(path)
        .with_context(|| format!("failed to open state table {}", path.display()))?;

    let mut rows = Vec::new();
    for (idx, record) in reader.records().enumerate() {
        let record = record.with_context(|| format!("failed to read state row {}", idx + 1))?;
        let col = |i: usize| -> anyhow::Result<String> {
            Ok(record
                .get(i)
                .with_context(|| format!("state row {} is missing column {}", idx + 1, i))?
                .to_string())
        };
        rows.push(StateRow {
            name: col(COL_NAME)?,
            abbr: col(COL_ABBR)?,
            assoc_press: col(COL_AP)?,
            census_region: col(COL_REGION)?,
            census_division: col(COL_DIVISION)?,
            circuit: col(COL_CIRCUIT)?,
        });
    }
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn csv_row(name: &str, abbr: &str, ap: &str, region: &str, division: &str, circuit: &str) -> String {
        let mut cols = vec![String::new(); 17];
        cols[COL_NAME] = name.to_string();
        cols[COL_ABBR] = abbr.to_string();
        cols[COL_AP] = ap.to_string();
        cols[COL_REGION] = region.to_string();
        cols[COL_DIVISION] = division.to_string();
        cols[COL_CIRCUIT] = circuit.to_string();
        cols.join(",")
    }

    fn header() -> String {
        (0..17).map(|i| format!("col{}", i)).collect::<Vec<_>>().join(",")
    }

    #[test]
    fn reads_columns_by_fixed_position() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("states.csv");
        let contents = format!(
            "{}\n{}\n{}\n",
            header(),
            csv_row("Minnesota", "MN", "Minn.", "Midwest", "West North Central", "8"),
            csv_row("New York", "NY", "N.Y.", "Northeast", "Middle Atlantic", "2"),
        );
        std::fs::write(&path, contents).unwrap();

        let rows = load_states(&path).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].name, "Minnesota");
        assert_eq!(rows[0].abbr, "MN");
        assert_eq!(rows[0].assoc_press, "Minn.");
        assert_eq!(rows[0].census_division, "West North Central");
        assert_eq!(rows[1].circuit, "2");
    }

    #[test]
    fn short_row_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("states.csv");
        std::fs::write(&path, format!("{}\na,b,c\n", header())).unwrap();
        // The csv reader enforces uniform record length against the header.
        assert!(load_states(&path).is_err());
    }
}
