//! ICICI credit-card statement PDF parser.
//!
//! Card PDFs render their transaction tables inconsistently, so two
//! independent strategies recover rows from the extracted text and their
//! results are unioned:
//!
//! - gutter: cells split on runs of two or more spaces (ruled/grid layouts
//!   survive text extraction with wide gutters);
//! - stream: date-anchored token grouping, for layouts where the gutters
//!   collapse to single spaces.
//!
//! Both strategies see the same character stream, so a row found twice
//! reduces to the same whitespace-stripped key and is deduplicated.
//!
//! Only the "Domestic Transactions" section is parsed; international and
//! summary tables are ignored.

use std::collections::HashSet;
use std::sync::OnceLock;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use passbook_core::{ParseOutcome, ParseWarning, Transaction, synthesize_ref_id};
use regex::Regex;

const SECTION_LABEL: &str = "Domestic Transactions";
/// Section marker row plus column-header row at the top of each table.
const TABLE_HEADER_ROWS: usize = 2;
const MIN_CELLS: usize = 3;
const DATE_FORMAT: &str = "%d/%m/%Y";

type Row = Vec<String>;
type Table = Vec<Row>;

fn gutter_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\s{2,}").expect("gutter regex"))
}

fn date_token_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\d{2}/\d{2}/\d{4}$").expect("date token regex"))
}

fn credit_suffix_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)\s*cr\.?\s*$").expect("credit suffix regex"))
}

/// Parse raw PDF bytes into transactions.
///
/// A text-extraction failure is fatal for the invocation; a document with no
/// domestic-transactions table is not (empty outcome plus a warning).
pub fn parse_icici_card_pdf(bytes: &[u8]) -> Result<ParseOutcome> {
    let text = pdf_extract::extract_text_from_mem(bytes)
        .context("extracting text from PDF statement")?;
    transactions_from_text(&text)
}

/// Parse already-extracted statement text.
///
/// Split out from [`parse_icici_card_pdf`] so the table logic is testable
/// without a PDF fixture.
pub fn transactions_from_text(text: &str) -> Result<ParseOutcome> {
    let mut outcome = ParseOutcome::default();

    let tables = qualifying_tables(text);
    if tables.is_empty() {
        outcome.push_warning(ParseWarning::SectionNotFound {
            section: SECTION_LABEL.to_string(),
        });
        return Ok(outcome);
    }

    // Union the data rows from every qualifying table across both
    // strategies, keeping first-seen order. Rows below the minimum cell
    // count are a strategy failing to split a line the other strategy may
    // still recover, so they never enter the union. The gutter tables come
    // first, so their cleaner cell splits win over the stream reconstruction
    // of the same row.
    let mut rows: Vec<Row> = Vec::new();
    let mut seen: HashSet<String> = HashSet::new();
    for table in tables {
        for row in table.into_iter().skip(TABLE_HEADER_ROWS) {
            if row.len() < MIN_CELLS {
                continue;
            }
            if seen.insert(dedup_key(&row)) {
                rows.push(row);
            }
        }
    }

    for (ordinal, row) in rows.iter().enumerate() {
        let line = (ordinal + 1) as u64;

        // The date cell may carry a trailing time; only the leading token
        // matters.
        let date_token = row[0].split_whitespace().next().unwrap_or("");
        let date = match NaiveDate::parse_from_str(date_token, DATE_FORMAT) {
            Ok(date) => date,
            Err(_) => {
                outcome.push_warning(ParseWarning::BadField {
                    line,
                    field: "date",
                    value: row[0].clone(),
                });
                continue;
            }
        };

        // With 4+ cells a serial-number/reward-points column survived
        // extraction: the description sits at index 2 and the amount in the
        // last cell. With exactly 3 the row is date/description/amount.
        // Which shape shows up depends on the extraction strategy, so the
        // cell choice is a heuristic, not an invariant of the format.
        let (narration_cell, amount_cell) = if row.len() >= 4 {
            (&row[2], row.last().map(String::as_str).unwrap_or(""))
        } else {
            (&row[1], row[2].as_str())
        };
        let narration = narration_cell.trim();

        let amount = match parse_pdf_amount(amount_cell) {
            Some(value) => value,
            None => {
                outcome.push_warning(ParseWarning::BadField {
                    line,
                    field: "amount",
                    value: amount_cell.to_string(),
                });
                continue;
            }
        };

        // This format never supplies a reference id.
        let ref_id = synthesize_ref_id(date, amount, narration);
        let txn = Transaction::new(date, narration, amount, ref_id, 0.0)
            .with_context(|| format!("row {line}: building transaction"))?;
        outcome.transactions.push(txn);
    }

    Ok(outcome)
}

/// Tables from both strategies whose leading rows identify them as the
/// domestic-transactions section.
fn qualifying_tables(text: &str) -> Vec<Table> {
    let mut tables: Vec<Table> = Vec::new();
    tables.extend(gutter_tables(text).into_iter().filter(is_domestic_section));
    tables.extend(stream_tables(text).into_iter().filter(is_domestic_section));
    tables
}

fn is_domestic_section(table: &Table) -> bool {
    let needle = SECTION_LABEL.to_lowercase();
    table.iter().take(TABLE_HEADER_ROWS).any(|row| {
        row.iter().any(|cell| cell.to_lowercase().contains(&needle))
    })
}

/// Blank-line-delimited runs of non-empty lines.
fn blocks(text: &str) -> Vec<Vec<&str>> {
    let mut blocks = Vec::new();
    let mut current: Vec<&str> = Vec::new();
    for line in text.lines() {
        if line.trim().is_empty() {
            if !current.is_empty() {
                blocks.push(std::mem::take(&mut current));
            }
        } else {
            current.push(line);
        }
    }
    if !current.is_empty() {
        blocks.push(current);
    }
    blocks
}

/// Gutter strategy: one row per line, cells split on 2+-space runs.
fn gutter_tables(text: &str) -> Vec<Table> {
    blocks(text)
        .into_iter()
        .map(|lines| {
            lines
                .into_iter()
                .map(|line| {
                    gutter_re()
                        .split(line.trim())
                        .map(|cell| cell.trim().to_string())
                        .filter(|cell| !cell.is_empty())
                        .collect::<Row>()
                })
                .filter(|row| !row.is_empty())
                .collect::<Table>()
        })
        .filter(|table| !table.is_empty())
        .collect()
}

/// Stream strategy: a line whose leading token is a dd/mm/yyyy date becomes a
/// three-cell row (date, middle tokens joined, amount); anything else is a
/// single-cell row so section markers stay visible.
fn stream_tables(text: &str) -> Vec<Table> {
    blocks(text)
        .into_iter()
        .map(|lines| {
            lines
                .into_iter()
                .map(|line| stream_row(line))
                .collect::<Table>()
        })
        .filter(|table| !table.is_empty())
        .collect()
}

fn stream_row(line: &str) -> Row {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    if tokens.len() >= MIN_CELLS && date_token_re().is_match(tokens[0]) {
        // A trailing "Cr" marker belongs to the amount cell, not to a cell of
        // its own.
        let amount_start = if credit_suffix_re().is_match(tokens[tokens.len() - 1])
            && tokens.len() >= MIN_CELLS + 1
        {
            tokens.len() - 2
        } else {
            tokens.len() - 1
        };
        vec![
            tokens[0].to_string(),
            tokens[1..amount_start].join(" "),
            tokens[amount_start..].join(" "),
        ]
    } else {
        vec![line.trim().to_string()]
    }
}

/// Rows recovered by different strategies carry the same characters split
/// differently; stripping whitespace and digit grouping makes them compare
/// equal.
fn dedup_key(row: &Row) -> String {
    row.iter()
        .flat_map(|cell| cell.chars())
        .filter(|c| !c.is_whitespace() && *c != ',')
        .flat_map(char::to_lowercase)
        .collect()
}

/// `"1,499.00"` → −1499.00 (a plain amount is a purchase); `"5,000.00 Cr"` →
/// 5000.00.
fn parse_pdf_amount(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    let credit = credit_suffix_re().is_match(trimmed);
    let cleaned = credit_suffix_re().replace(trimmed, "");
    let value: f64 = cleaned.trim().replace(',', "").parse().ok()?;
    Some(if credit { value } else { -value })
}
