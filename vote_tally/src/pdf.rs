// A minimal PDF 1.4 writer for the reports.
//
// Only the standard Helvetica fonts are used, so that no font has to be
// embedded. Text is encoded with WinAnsiEncoding, which covers the Latin-1
// characters used in Portuguese names.

use std::fmt::Write;

use log::debug;

use crate::report::{format_timestamp, votes_label, Report};

const PAGE_WIDTH: i32 = 595;
const PAGE_HEIGHT: i32 = 842;
const MARGIN: i32 = 50;
const BOTTOM: i32 = 60;
const MAX_NAME_CHARS: usize = 48;

// Table columns
const COL_PLACE: i32 = MARGIN;
const COL_NAME: i32 = 95;
const COL_VOTES: i32 = 390;
const COL_PERCENT: i32 = 470;

#[derive(Eq, PartialEq, Debug, Clone, Copy)]
enum Font {
    Regular,
    Bold,
}

impl Font {
    fn resource(self) -> &'static str {
        match self {
            Font::Regular => "F1",
            Font::Bold => "F2",
        }
    }
}

#[derive(Eq, PartialEq, Debug, Clone)]
struct TextRun {
    font: Font,
    size: i32,
    x: i32,
    y: i32,
    text: String,
}

struct Layout {
    pages: Vec<Vec<TextRun>>,
    y: i32,
}

impl Layout {
    fn new() -> Layout {
        Layout {
            pages: vec![Vec::new()],
            y: PAGE_HEIGHT - MARGIN,
        }
    }

    /// Adds a line of text, starting a new page if it does not fit.
    fn line(&mut self, height: i32, font: Font, size: i32, cells: &[(i32, String)]) {
        if self.y - height < BOTTOM {
            self.pages.push(Vec::new());
            self.y = PAGE_HEIGHT - MARGIN;
        }
        self.y -= height;
        let y = self.y;
        if let Some(page) = self.pages.last_mut() {
            for (x, text) in cells {
                page.push(TextRun {
                    font,
                    size,
                    x: *x,
                    y,
                    text: text.clone(),
                });
            }
        }
    }

    fn gap(&mut self, height: i32) {
        self.y -= height;
    }
}

pub(crate) fn render(report: &Report) -> Vec<u8> {
    let pages = layout_report(report);
    debug!("pdf::render: {} pages", pages.len());
    write_document(report, &pages)
}

fn layout_report(report: &Report) -> Vec<Vec<TextRun>> {
    let mut layout = Layout::new();
    layout.line(
        22,
        Font::Bold,
        20,
        &[(MARGIN, report.title.clone())],
    );
    layout.line(
        16,
        Font::Regular,
        10,
        &[(
            MARGIN,
            format!("Gerado em: {}", format_timestamp(&report.generated_at)),
        )],
    );

    for section in report.sections.iter() {
        layout.gap(14);
        layout.line(20, Font::Bold, 15, &[(MARGIN, section.name.clone())]);
        layout.line(
            15,
            Font::Regular,
            11,
            &[(
                MARGIN,
                format!(
                    "Total de votos: {} {}",
                    section.total_votes,
                    votes_label(section.total_votes)
                ),
            )],
        );
        if section.rows.is_empty() {
            layout.line(
                15,
                Font::Regular,
                11,
                &[(COL_NAME, "Nenhum candidato".to_string())],
            );
            continue;
        }
        layout.line(
            16,
            Font::Bold,
            11,
            &[
                (COL_PLACE, "Pos.".to_string()),
                (COL_NAME, "Candidato".to_string()),
                (COL_VOTES, "Votos".to_string()),
                (COL_PERCENT, "Percentual".to_string()),
            ],
        );
        for row in section.rows.iter() {
            let mut name = truncate(&row.name, MAX_NAME_CHARS);
            if row.tied {
                name.push_str(" (Empate)");
            }
            let font = if row.place == 1 && row.votes > 0 {
                Font::Bold
            } else {
                Font::Regular
            };
            layout.line(
                15,
                font,
                11,
                &[
                    (COL_PLACE, format!("{}º", row.place)),
                    (COL_NAME, name),
                    (COL_VOTES, row.votes.to_string()),
                    (COL_PERCENT, row.percentage.clone()),
                ],
            );
        }
    }
    layout.pages
}

fn truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        s.to_string()
    } else {
        let mut res: String = s.chars().take(max_chars - 3).collect();
        res.push_str("...");
        res
    }
}

/// Encodes a string as the content of a PDF literal string (without the
/// parentheses), in WinAnsiEncoding.
fn encode_text(s: &str) -> String {
    let mut res = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '(' | ')' | '\\' => {
                res.push('\\');
                res.push(c);
            }
            ' '..='~' => res.push(c),
            c if (c as u32) < 0x20 => res.push(' '),
            _ => {
                let code: u32 = match c {
                    '\u{a0}'..='\u{ff}' => c as u32,
                    '€' => 0x80,
                    '…' => 0x85,
                    '‘' => 0x91,
                    '’' => 0x92,
                    '“' => 0x93,
                    '”' => 0x94,
                    '•' => 0x95,
                    '–' => 0x96,
                    '—' => 0x97,
                    _ => '?' as u32,
                };
                let _ = write!(res, "\\{:03o}", code);
            }
        }
    }
    res
}

fn content_stream(runs: &[TextRun], footer: &str) -> String {
    let mut res = String::new();
    for run in runs {
        let _ = writeln!(
            res,
            "BT /{} {} Tf {} {} Td ({}) Tj ET",
            run.font.resource(),
            run.size,
            run.x,
            run.y,
            encode_text(&run.text)
        );
    }
    let _ = writeln!(
        res,
        "BT /F1 9 Tf {} {} Td ({}) Tj ET",
        MARGIN,
        BOTTOM / 2,
        encode_text(footer)
    );
    res
}

fn write_document(report: &Report, pages: &[Vec<TextRun>]) -> Vec<u8> {
    // 1: catalog, 2: page tree, 3 and 4: fonts, 5: info,
    // then a page object and its content stream for each page.
    let page_ids: Vec<usize> = (0..pages.len()).map(|idx| 6 + 2 * idx).collect();
    let kids: Vec<String> = page_ids.iter().map(|id| format!("{} 0 R", id)).collect();

    let mut objects: Vec<String> = vec![
        "<< /Type /Catalog /Pages 2 0 R >>".to_string(),
        format!(
            "<< /Type /Pages /Kids [{}] /Count {} >>",
            kids.join(" "),
            pages.len()
        ),
        "<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica /Encoding /WinAnsiEncoding >>"
            .to_string(),
        "<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica-Bold /Encoding /WinAnsiEncoding >>"
            .to_string(),
        format!(
            "<< /Title ({}) /Producer (vote_tally) /CreationDate (D:{}) >>",
            encode_text(&report.title),
            report.generated_at.format("%Y%m%d%H%M%S")
        ),
    ];
    for (idx, runs) in pages.iter().enumerate() {
        let footer = format!("Página {} de {}", idx + 1, pages.len());
        let stream = content_stream(runs, &footer);
        objects.push(format!(
            "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 {} {}] \
             /Resources << /Font << /F1 3 0 R /F2 4 0 R >> >> /Contents {} 0 R >>",
            PAGE_WIDTH,
            PAGE_HEIGHT,
            page_ids[idx] + 1
        ));
        objects.push(format!(
            "<< /Length {} >>\nstream\n{}endstream",
            stream.len(),
            stream
        ));
    }

    // The body is pure ASCII: every other byte is escaped.
    let mut out = String::from("%PDF-1.4\n");
    let mut offsets: Vec<usize> = Vec::with_capacity(objects.len());
    for (idx, obj) in objects.iter().enumerate() {
        offsets.push(out.len());
        let _ = write!(out, "{} 0 obj\n{}\nendobj\n", idx + 1, obj);
    }
    let xref_offset = out.len();
    let _ = write!(out, "xref\n0 {}\n0000000000 65535 f \n", objects.len() + 1);
    for offset in offsets {
        let _ = write!(out, "{:010} 00000 n \n", offset);
    }
    let _ = write!(
        out,
        "trailer\n<< /Size {} /Root 1 0 R /Info 5 0 R >>\nstartxref\n{}\n%%EOF\n",
        objects.len() + 1,
        xref_offset
    );
    out.into_bytes()
}
