use anyhow::{Result, ensure};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Normalized output of statement parsers (source-agnostic).
///
/// Constructed once per source row and immutable afterwards; any repair of
/// the raw fields (trimming, merged narration columns) happens before
/// construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub date: NaiveDate,
    /// Free-text description as printed by the source institution.
    pub narration: String,
    /// Negative means money leaving the account; positive means money entering.
    pub amount: f64,
    /// Unique within the source statement; verbatim from the source or
    /// synthesized from transaction content. Downstream ledgers key
    /// deduplication on this.
    pub ref_id: String,
    /// Running balance after the transaction; 0.0 for formats that do not
    /// report one (credit-card statements).
    pub closing_balance: f64,
}

impl Transaction {
    /// Build a transaction, enforcing the model invariants: a finite amount
    /// and a usable reference id (length > 3). The date invariant is carried
    /// by the `NaiveDate` type itself.
    pub fn new(
        date: NaiveDate,
        narration: impl Into<String>,
        amount: f64,
        ref_id: impl Into<String>,
        closing_balance: f64,
    ) -> Result<Self> {
        let ref_id = ref_id.into();
        ensure!(amount.is_finite(), "non-finite amount: {amount}");
        ensure!(ref_id.len() > 3, "invalid ref id: {ref_id:?}");
        Ok(Self {
            date,
            narration: narration.into(),
            amount,
            ref_id,
            closing_balance,
        })
    }

    pub fn is_debit(&self) -> bool {
        self.amount < 0.0
    }
}
