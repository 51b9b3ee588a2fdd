//! passbook-ingest: statement parsers, payee heuristics, and format dispatch.
//!
//! One parser per supported export format, all yielding the same canonical
//! [`passbook_core::Transaction`] sequence. The dispatcher is the only place
//! that knows which payload encoding and which heuristics belong to which
//! format.

pub mod parsers;
pub mod payee;

use std::fmt;
use std::str::FromStr;

use anyhow::{Context, Result, bail};
use passbook_core::ParseOutcome;
use serde::{Deserialize, Serialize};

/// Supported statement export formats.
///
/// Parsing the kebab-case tag via `FromStr` is the single validation point
/// for "is this a supported format"; unknown tags fail fast there.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Source {
    /// HDFC bank statement CSV as exported from the netbanking web portal.
    HdfcBankCsv,
    /// ICICI credit-card statement CSV.
    IciciCardCsv,
    /// ICICI credit-card statement PDF.
    IciciCardPdf,
}

impl Source {
    pub const ALL: [Source; 3] = [
        Source::HdfcBankCsv,
        Source::IciciCardCsv,
        Source::IciciCardPdf,
    ];

    pub fn tag(self) -> &'static str {
        match self {
            Source::HdfcBankCsv => "hdfc-bank-csv",
            Source::IciciCardCsv => "icici-card-csv",
            Source::IciciCardPdf => "icici-card-pdf",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Source::HdfcBankCsv => "HDFC CSV export from the netbanking web portal",
            Source::IciciCardCsv => "ICICI credit card statement CSV",
            Source::IciciCardPdf => "ICICI credit card statement PDF",
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for Source {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        for source in Source::ALL {
            if source.tag() == s {
                return Ok(source);
            }
        }
        bail!(
            "unsupported statement source: {s:?} (expected one of: {})",
            Source::ALL.map(Source::tag).join(", ")
        );
    }
}

/// Route one statement payload to its parser.
///
/// Text formats are decoded as UTF-8 here; the PDF parser takes the raw
/// bytes. A payload that cannot be decoded is fatal for the invocation, not
/// a row-level warning.
pub fn parse_statement(source: Source, payload: &[u8]) -> Result<ParseOutcome> {
    match source {
        Source::HdfcBankCsv => parsers::parse_hdfc_bank_csv(decode_text(payload)?),
        Source::IciciCardCsv => parsers::parse_icici_card_csv(decode_text(payload)?),
        Source::IciciCardPdf => parsers::parse_icici_card_pdf(payload),
    }
}

fn decode_text(payload: &[u8]) -> Result<&str> {
    std::str::from_utf8(payload).context("statement payload is not valid UTF-8")
}

/// Per-format narration → payee enrichment. Pure; `None` when no rule applies.
pub fn extract_payee(source: Source, narration: &str) -> Option<String> {
    match source {
        Source::HdfcBankCsv => payee::hdfc_bank_payee(narration),
        Source::IciciCardCsv => payee::icici_card_payee(narration),
        // No reliable rule exists for narrations extracted from the PDF tables.
        Source::IciciCardPdf => None,
    }
}
