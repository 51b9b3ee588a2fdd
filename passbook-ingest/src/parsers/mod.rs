pub mod hdfc_bank_csv;
pub mod icici_card_csv;
pub mod icici_card_pdf;

pub use hdfc_bank_csv::parse_hdfc_bank_csv;
pub use icici_card_csv::parse_icici_card_csv;
pub use icici_card_pdf::parse_icici_card_pdf;
