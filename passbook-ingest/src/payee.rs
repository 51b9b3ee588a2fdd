//! Narration → payee extraction rules, one per statement format.
//!
//! Kept separate from the parsers so callers can apply them independently
//! (display-time enrichment) or not at all. These never fail; a narration no
//! rule matches yields `None`.

/// HDFC bank statement narrations.
///
/// UPI narrations look like `UPI-<payee>-<vpa>-<bank>-<ref>-<note>`; the
/// payee is the second hyphen-delimited segment. NEFT/RTGS narrations look
/// like `NEFT DR-<ifsc>-<payee>-<channel>`; the payee is the third segment.
pub fn hdfc_bank_payee(narration: &str) -> Option<String> {
    let lower = narration.to_lowercase();
    if lower.starts_with("upi-") {
        hyphen_segment(narration, 1)
    } else if lower.starts_with("neft") || lower.starts_with("rtgs") {
        hyphen_segment(narration, 2)
    } else {
        None
    }
}

fn hyphen_segment(narration: &str, index: usize) -> Option<String> {
    narration.split('-').nth(index).map(|part| part.trim().to_string())
}

/// ICICI credit-card narrations: the text before the first comma.
pub fn icici_card_payee(narration: &str) -> Option<String> {
    if narration.is_empty() {
        return None;
    }
    narration.split(',').next().map(|part| part.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hdfc_upi_takes_second_segment() {
        assert_eq!(
            hdfc_bank_payee("UPI-ZOMATO LTD-ZOMATO-ORDER@PTYBL-YESB0PTMUPI-430213318243-ZOMATO PAYMENT"),
            Some("ZOMATO LTD".to_string())
        );
        assert_eq!(
            hdfc_bank_payee("UPI-John Doe-Reference"),
            Some("John Doe".to_string())
        );
    }

    #[test]
    fn test_hdfc_neft_rtgs_take_third_segment() {
        assert_eq!(
            hdfc_bank_payee("NEFT DR-PUNB0498700-random name-NETBANK"),
            Some("random name".to_string())
        );
        assert_eq!(
            hdfc_bank_payee("RTGS-SBIN000123-ACME Corp-Transfer"),
            Some("ACME Corp".to_string())
        );
    }

    #[test]
    fn test_hdfc_segment_shortfall_yields_none() {
        assert_eq!(hdfc_bank_payee("UPI"), None);
        assert_eq!(hdfc_bank_payee("NEFT DR"), None);
        assert_eq!(hdfc_bank_payee("NEFT DR-PUNB0498700"), None);
    }

    #[test]
    fn test_hdfc_unmatched_narrations_yield_none() {
        assert_eq!(hdfc_bank_payee("ATM Withdrawal"), None);
        assert_eq!(hdfc_bank_payee(""), None);
    }

    #[test]
    fn test_icici_card_takes_text_before_comma() {
        assert_eq!(
            icici_card_payee("AMAZON PAY INDIA, MUMBAI"),
            Some("AMAZON PAY INDIA".to_string())
        );
        assert_eq!(
            icici_card_payee("UBER RIDES"),
            Some("UBER RIDES".to_string())
        );
    }

    #[test]
    fn test_icici_card_empty_narration_yields_none() {
        assert_eq!(icici_card_payee(""), None);
    }
}
