use crate::model::{CaseMatch, IngestReport, StateCaseCount, StateMatchRate, WordTrend};

pub fn print_ingest_summary(report: &IngestReport) {
    eprintln!(
        "Ingested: states={} courts={} (unmatched={}) cases={} (unmatched={})",
        report.states, report.courts, report.courts_unmatched, report.cases, report.cases_unmatched
    );
}

pub fn print_counts(rows: &[StateCaseCount]) {
    if rows.is_empty() {
        println!("No resolved cases in the store.");
        return;
    }
    println!("{:<6} {:<25} {:>7} {:>8}", "Abbr", "State", "Cases", "Share");
    for r in rows {
        println!(
            "{:<6} {:<25} {:>7} {:>7.1}%",
            r.abbr,
            r.name,
            r.count,
            r.percent * 100.0
        );
    }
}

pub fn print_match_rates(term: &str, rows: &[StateMatchRate]) {
    if rows.is_empty() {
        println!("No resolved cases in the store.");
        return;
    }
    println!("Share of cases containing {:?} by state:", term);
    for r in rows {
        println!("{:<6} {:>6.1}%", r.abbr, r.rate * 100.0);
    }
}

pub fn print_case_matches(term: &str, rows: &[CaseMatch]) {
    if rows.is_empty() {
        println!("No cases contain {:?}.", term);
        return;
    }
    for r in rows {
        println!(
            "{} | {} | {} ({}) | {} ({})",
            r.case_name, r.case_abbr, r.court_name, r.court_citation, r.state_name, r.state_abbr
        );
    }
}

pub fn print_word_trends(trends: &[WordTrend]) {
    for trend in trends {
        println!("{}", trend.word);
        for (date, freq) in &trend.by_date {
            println!("  {}  {:.6}", date, freq);
        }
    }
}
