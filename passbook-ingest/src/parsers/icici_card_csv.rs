//! ICICI credit-card statement CSV parser.
//!
//! The export carries a variable-length preamble (card holder details,
//! summary blocks) before a marker row whose second field reads
//! "Transaction Details". One column-header row follows the marker, then the
//! data rows. Columns are fixed-position:
//!   _, _, date (ddmmyyyy, comma-grouped), narration, _, _, amount with a
//!   trailing "Dr."/"Cr." marker, _, reference id

use anyhow::{Context, Result};
use chrono::NaiveDate;
use passbook_core::{ParseOutcome, ParseWarning, Transaction};

const SECTION_MARKER: &str = "Transaction Details";
const MIN_FIELDS: usize = 9;
const DATE_FORMAT: &str = "%d%m%Y";

const COL_DATE: usize = 2;
const COL_NARRATION: usize = 3;
const COL_AMOUNT: usize = 6;
const COL_REF: usize = 8;

/// Parse a full statement text into transactions.
///
/// A statement without the marker row is a legitimate (empty) statement, not
/// an error: the outcome carries zero transactions and a section warning.
pub fn parse_icici_card_csv(text: &str) -> Result<ParseOutcome> {
    let mut outcome = ParseOutcome::default();

    let mut rdr = csv::ReaderBuilder::new()
        .flexible(true)
        .has_headers(false)
        .from_reader(text.as_bytes());
    let mut records = rdr.records();

    let mut marker_found = false;
    for record in records.by_ref() {
        let record = record.context("reading statement preamble")?;
        if record.get(1).map(str::trim) == Some(SECTION_MARKER) {
            marker_found = true;
            break;
        }
    }
    if !marker_found {
        outcome.push_warning(ParseWarning::SectionNotFound {
            section: SECTION_MARKER.to_string(),
        });
        return Ok(outcome);
    }

    // Column-header row directly after the marker; the source ending here
    // just means the table is empty.
    match records.next() {
        Some(record) => {
            record.context("reading column header")?;
        }
        None => return Ok(outcome),
    }

    for record in records {
        let record = record.context("reading statement row")?;
        let line = record.position().map(|p| p.line()).unwrap_or(0);

        if record.len() < MIN_FIELDS {
            continue;
        }
        let date_raw = record.get(COL_DATE).unwrap_or("").trim();
        if date_raw.is_empty() {
            continue;
        }

        // The export groups the date digits with commas ("02,04,2024").
        let date_digits = date_raw.replace(',', "");
        let date = match NaiveDate::parse_from_str(&date_digits, DATE_FORMAT) {
            Ok(date) => date,
            Err(_) => {
                outcome.push_warning(ParseWarning::BadField {
                    line,
                    field: "date",
                    value: date_raw.to_string(),
                });
                continue;
            }
        };

        let narration = record.get(COL_NARRATION).unwrap_or("").trim();

        let amount_raw = record.get(COL_AMOUNT).unwrap_or("").trim();
        if amount_raw.is_empty() {
            outcome.push_warning(ParseWarning::BadField {
                line,
                field: "amount",
                value: String::new(),
            });
            continue;
        }
        let amount = match parse_marked_amount(amount_raw) {
            Some(value) => value,
            None => {
                outcome.push_warning(ParseWarning::BadField {
                    line,
                    field: "amount",
                    value: amount_raw.to_string(),
                });
                continue;
            }
        };

        // This format always supplies a reference id; no synthesis.
        let ref_id = record.get(COL_REF).unwrap_or("").trim();

        let txn = Transaction::new(date, narration, amount, ref_id, 0.0)
            .with_context(|| format!("line {line}: building transaction"))?;
        outcome.transactions.push(txn);
    }

    Ok(outcome)
}

/// `"1,234.56 Dr."` → −1234.56; `"500.00 Cr."` → 500.00; an unmarked amount
/// stays positive.
fn parse_marked_amount(raw: &str) -> Option<f64> {
    let debit = raw.contains("Dr.");
    let cleaned = raw.replace(" Dr.", "").replace(" Cr.", "").replace(',', "");
    let value: f64 = cleaned.trim().parse().ok()?;
    Some(if debit { -value } else { value })
}
