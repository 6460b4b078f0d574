//! Instruction text for the extraction model.

/// Default bill-extraction instruction sent ahead of the document.
pub const EXTRACTION_PROMPT: &str = r#"Analyze this medical bill. Extract financial amounts.
Fix OCR errors (e.g. 'O' to '0').
Classify amounts as 'total_bill', 'paid', or 'due'.

Return ONLY valid JSON matching this structure:
{
    "currency": "detected currency code (e.g. INR, USD)",
    "amounts": [
        { "type": "total_bill", "value": number, "source": "exact text snippet found in doc" }
    ],
    "status": "ok"
}
If no amounts are found, return { "status": "no_amounts_found", "reason": "document too noisy" }"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_names_the_report_contract() {
        assert!(EXTRACTION_PROMPT.contains("total_bill"));
        assert!(EXTRACTION_PROMPT.contains("no_amounts_found"));
        assert!(EXTRACTION_PROMPT.contains("currency"));
    }
}
