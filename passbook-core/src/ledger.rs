//! Record shape accepted by the destination ledger client.
//!
//! The ledger performs upsert-by-reference-id, so re-submitting the same
//! statement is idempotent as long as `reference_id` is stable. The pipeline
//! never performs the submission itself; it only shapes the data.

use chrono::NaiveDate;
use serde::Serialize;

use crate::Transaction;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LedgerRecord {
    pub amount: f64,
    pub payee: Option<String>,
    pub reference_id: String,
    pub date: NaiveDate,
    pub narration: String,
    pub destination_account: String,
}

impl LedgerRecord {
    pub fn from_transaction(
        txn: &Transaction,
        payee: Option<String>,
        destination_account: impl Into<String>,
    ) -> Self {
        Self {
            amount: txn.amount,
            payee,
            reference_id: txn.ref_id.clone(),
            date: txn.date,
            narration: txn.narration.clone(),
            destination_account: destination_account.into(),
        }
    }

    pub fn is_withdrawal(&self) -> bool {
        self.amount < 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_transaction_preserves_identity() {
        let txn = Transaction::new(
            NaiveDate::from_ymd_opt(2024, 10, 1).unwrap(),
            "UPI-ZOMATO LTD-ZOMATO-ORDER",
            -450.0,
            "430213318243",
            12000.0,
        )
        .unwrap();

        let rec = LedgerRecord::from_transaction(&txn, Some("ZOMATO LTD".to_string()), "HDFC Savings");
        assert_eq!(rec.reference_id, "430213318243");
        assert_eq!(rec.amount, -450.0);
        assert!(rec.is_withdrawal());
        assert_eq!(rec.destination_account, "HDFC Savings");
        assert_eq!(rec.payee.as_deref(), Some("ZOMATO LTD"));
    }
}
