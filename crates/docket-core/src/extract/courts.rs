use crate::model::CourtRow;
use anyhow::Context;
use scraper::{Html, Selector};

/// Parses the cached roster page into one CourtRow per data row.
///
/// The roster lives in the first sortable wikitable; the header row is
/// skipped and five fields are read positionally: name, citation, appellate
/// circuit, established year, judge count. Rows with fewer cells are
/// skipped; a document without the table is a hard error because nothing
/// downstream can proceed without the roster.
pub fn parse_roster(html: &str) -> anyhow::Result<Vec<CourtRow>> {
    let document = Html::parse_document(html);
    let table_sel = sel("table.wikitable.sortable")?;
    let row_sel = sel("tr")?;
    let cell_sel = sel("td")?;

    let table = document
        .select(&table_sel)
        .next()
        .context("no sortable roster table in document")?;

    let mut rows = Vec::new();
    for tr in table.select(&row_sel).skip(1) {
        let cells: Vec<String> = tr
            .select(&cell_sel)
            .map(|td| td.text().collect::<String>().trim().to_string())
            .collect();
        if cells.len() < 5 {
            continue;
        }
        let name = cells[0].clone();
        rows.push(CourtRow {
            state: state_from_court_name(&name),
            name,
            citation: cells[1].clone(),
            circuit: cells[2].clone(),
            established: cells[3].parse().ok(),
            num_judges: cells[4].parse().ok(),
        });
    }
    Ok(rows)
}

fn sel(css: &str) -> anyhow::Result<Selector> {
    Selector::parse(css).map_err(|e| anyhow::anyhow!("selector {:?}: {}", css, e))
}

/// Derives the owning state from a roster name cell.
///
/// Applied to the whitespace-split tokens:
/// - last token "Columbia"              -> "District of Columbia"
/// - second-to-last token is not "of"   -> last two tokens joined
/// - otherwise                          -> last token alone
///
/// Returns None when the name has too few tokens for the rule table. This
/// heuristic is brittle against source formatting drift, hence the
/// exhaustive tests below.
pub fn state_from_court_name(name: &str) -> Option<String> {
    let tokens: Vec<&str> = name.split_whitespace().collect();
    let last = *tokens.last()?;
    if last == "Columbia" {
        return Some("District of Columbia".to_string());
    }
    if tokens.len() < 2 {
        return None;
    }
    let second_last = tokens[tokens.len() - 2];
    if second_last != "of" {
        Some(format!("{} {}", second_last, last))
    } else {
        Some(last.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_state_name() {
        assert_eq!(
            state_from_court_name("District of Minnesota").as_deref(),
            Some("Minnesota")
        );
    }

    #[test]
    fn two_word_state_name() {
        assert_eq!(
            state_from_court_name("Southern District of New York").as_deref(),
            Some("New York")
        );
        assert_eq!(
            state_from_court_name("District of New Mexico").as_deref(),
            Some("New Mexico")
        );
    }

    #[test]
    fn district_of_columbia() {
        assert_eq!(
            state_from_court_name("District of Columbia").as_deref(),
            Some("District of Columbia")
        );
    }

    #[test]
    fn territory_with_two_word_name() {
        assert_eq!(
            state_from_court_name("District of the Virgin Islands").as_deref(),
            Some("Virgin Islands")
        );
    }

    #[test]
    fn directional_districts() {
        assert_eq!(
            state_from_court_name("Northern District of California").as_deref(),
            Some("California")
        );
        assert_eq!(
            state_from_court_name("Eastern District of Texas").as_deref(),
            Some("Texas")
        );
    }

    #[test]
    fn degenerate_names_are_unparsed() {
        assert_eq!(state_from_court_name(""), None);
        assert_eq!(state_from_court_name("Guam"), None);
    }

    #[test]
    fn single_token_columbia_still_maps_to_dc() {
        assert_eq!(
            state_from_court_name("Columbia").as_deref(),
            Some("District of Columbia")
        );
    }

    const ROSTER: &str = r#"
<html><body>
<table class="wikitable sortable">
<tr><th>Court</th><th>Citation</th><th>Appeals to</th><th>Est.</th><th>Judges</th></tr>
<tr><td>District of Minnesota</td><td>D. Minn.</td><td>8th</td><td>1858</td><td>7</td></tr>
<tr><td>Southern District of New York</td><td>S.D.N.Y.</td><td>2nd</td><td>1789</td><td>28</td></tr>
<tr><td>District of Columbia</td><td>D.D.C.</td><td>D.C.</td><td>1863</td><td>15</td></tr>
<tr><td colspan="5">spanner row</td></tr>
</table>
</body></html>
"#;

    #[test]
    fn parses_roster_rows_positionally() {
        let rows = parse_roster(ROSTER).unwrap();
        assert_eq!(rows.len(), 3);

        assert_eq!(rows[0].name, "District of Minnesota");
        assert_eq!(rows[0].state.as_deref(), Some("Minnesota"));
        assert_eq!(rows[0].citation, "D. Minn.");
        assert_eq!(rows[0].circuit, "8th");
        assert_eq!(rows[0].established, Some(1858));
        assert_eq!(rows[0].num_judges, Some(7));

        assert_eq!(rows[2].state.as_deref(), Some("District of Columbia"));
        assert_eq!(rows[2].citation, "D.D.C.");
    }

    #[test]
    fn missing_table_is_an_error() {
        assert!(parse_roster("<html><body><p>nothing</p></body></html>").is_err());
    }
}
