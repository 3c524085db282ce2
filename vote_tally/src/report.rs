//! Printable reports of a tally.
//!
//! A [Report] is built from the positions of a tally and a generation time.
//! It can be rendered as plain text or as a PDF document. Both renderings
//! only depend on their input: the same positions and the same time always
//! produce the same output.

use chrono::{NaiveDate, NaiveDateTime};
use log::debug;

use crate::config::Position;
use crate::pdf;
use crate::ranking::rank_candidates;

pub const REPORT_TITLE: &str = "Relatório de Votação";

/// One line of the results table of a position.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct ReportRow {
    pub place: usize,
    pub name: String,
    pub votes: u64,
    /// Already formatted, for example `30.0%`.
    pub percentage: String,
    pub tied: bool,
}

/// The results of one position.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct PositionReport {
    pub name: String,
    pub total_votes: u64,
    /// In ranking order.
    pub rows: Vec<ReportRow>,
}

#[derive(Eq, PartialEq, Debug, Clone)]
pub struct Report {
    pub title: String,
    pub generated_at: NaiveDateTime,
    pub sections: Vec<PositionReport>,
}

/// Builds the report of all the positions, in their order.
pub fn build_report(positions: &[Position], generated_at: NaiveDateTime) -> Report {
    let sections: Vec<PositionReport> = positions.iter().map(position_report).collect();
    debug!(
        "build_report: {} sections, generated at {}",
        sections.len(),
        generated_at
    );
    Report {
        title: REPORT_TITLE.to_string(),
        generated_at,
        sections,
    }
}

pub fn position_report(position: &Position) -> PositionReport {
    let total_votes = position.total_votes();
    let rows = rank_candidates(&position.candidates)
        .iter()
        .map(|r| ReportRow {
            place: r.place,
            name: r.candidate.name.clone(),
            votes: r.candidate.votes,
            percentage: format_percentage(r.candidate.votes, total_votes),
            tied: r.tied,
        })
        .collect();
    PositionReport {
        name: position.name.clone(),
        total_votes,
        rows,
    }
}

/// The share of the votes, with one decimal. `0%` if there are no votes at all.
///
/// Halves are rounded up: 1 vote out of 16 is `6.3%`.
pub fn format_percentage(votes: u64, total: u64) -> String {
    if total == 0 {
        return "0%".to_string();
    }
    let (votes, total) = (votes as u128, total as u128);
    let tenths = (votes * 1000 + total / 2) / total;
    format!("{}.{}%", tenths / 10, tenths % 10)
}

/// The name of the PDF file for a report made on the given day.
pub fn report_file_name(date: NaiveDate) -> String {
    format!("votacao-{}.pdf", date.format("%Y-%m-%d"))
}

pub(crate) fn format_timestamp(ts: &NaiveDateTime) -> String {
    ts.format("%d/%m/%Y %H:%M").to_string()
}

/// "voto" or "votos", depending on the count.
pub fn votes_label(votes: u64) -> &'static str {
    if votes == 1 {
        "voto"
    } else {
        "votos"
    }
}

impl Report {
    /// Renders the report as plain text.
    pub fn to_text(&self) -> String {
        let mut lines: Vec<String> = vec![
            self.title.clone(),
            format!("Gerado em: {}", format_timestamp(&self.generated_at)),
        ];
        for section in self.sections.iter() {
            lines.push(String::new());
            lines.push(format!("Cargo: {}", section.name));
            lines.push(format!("Total de votos: {}", section.total_votes));
            if section.rows.is_empty() {
                lines.push("  Nenhum candidato".to_string());
                continue;
            }
            lines.push(format!(
                "  {:<5} {:<30} {:>6} {:>11}",
                "Pos.", "Candidato", "Votos", "Percentual"
            ));
            for row in section.rows.iter() {
                let name = if row.tied {
                    format!("{} (Empate)", row.name)
                } else {
                    row.name.clone()
                };
                lines.push(format!(
                    "  {:<5} {:<30} {:>6} {:>11}",
                    format!("{}º", row.place),
                    name,
                    row.votes,
                    row.percentage
                ));
            }
        }
        let mut res = lines.join("\n");
        res.push('\n');
        res
    }

    /// Renders the report as a PDF document.
    pub fn to_pdf(&self) -> Vec<u8> {
        pdf::render(self)
    }
}
