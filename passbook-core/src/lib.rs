//! passbook-core: canonical transaction model shared by statement parsers and sinks.

pub mod ledger;
pub mod refid;
pub mod report;
pub mod transaction;

pub use ledger::LedgerRecord;
pub use refid::{is_placeholder_ref, synthesize_ref_id};
pub use report::{ParseOutcome, ParseWarning};
pub use transaction::Transaction;
