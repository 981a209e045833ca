//! Turning free text into expense fields through a chain of language-model providers.
//!
//! The model call itself is behind [`ExtractionProvider`]; this module owns the
//! routing state ([`ModelRouter`]) and the normalization of model output.

pub mod router;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::{Category, NewExpense};
use crate::errors::ExpenseError;

pub use router::{extract_expense, system_prompt, ExtractionProvider, ModelRouter};

/// Structured fields pulled out of a transcript.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExtractedExpense {
    pub amount: f64,
    pub category: Category,
    pub item: String,
    pub note: String,
}

impl ExtractedExpense {
    /// Builds a record for `date`, keeping the transcript for audit display.
    pub fn into_new_expense(
        self,
        date: NaiveDate,
        raw_text: impl Into<String>,
    ) -> Result<NewExpense, ExpenseError> {
        let expense = NewExpense::new(self.amount, self.category, self.item, date)
            .with_note(self.note)
            .with_raw_text(raw_text);
        expense.validate()?;
        Ok(expense)
    }
}

/// Parses a model reply into [`ExtractedExpense`].
///
/// Markdown code fences are stripped, unknown categories become `other`,
/// and the amount is made non-negative (non-numeric amounts become 0).
pub fn parse_model_response(raw: &str) -> Result<ExtractedExpense, ExpenseError> {
    let body = strip_code_fence(raw.trim());
    let value: Value = serde_json::from_str(body)
        .map_err(|err| ExpenseError::Extraction(format!("model reply is not JSON: {err}")))?;
    let object = value
        .as_object()
        .ok_or_else(|| ExpenseError::Extraction("model reply is not a JSON object".into()))?;

    let amount = match object.get("amount") {
        Some(Value::Number(number)) => number.as_f64().unwrap_or(0.0),
        Some(Value::String(text)) => text.trim().parse::<f64>().unwrap_or(0.0),
        _ => 0.0,
    };
    let text_field = |key: &str| {
        object
            .get(key)
            .and_then(Value::as_str)
            .unwrap_or_default()
            .trim()
            .to_string()
    };

    Ok(ExtractedExpense {
        amount: if amount.is_finite() { amount.abs() } else { 0.0 },
        category: Category::normalize(&text_field("category")),
        item: text_field("item"),
        note: text_field("note"),
    })
}

fn strip_code_fence(text: &str) -> &str {
    let Some(rest) = text.strip_prefix("```") else {
        return text;
    };
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    let rest = rest.strip_suffix("```").unwrap_or(rest);
    rest.trim()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_plain_json() {
        let parsed =
            parse_model_response(r#"{"amount": 80, "category": "food", "item": "bento", "note": ""}"#)
                .unwrap();
        assert_eq!(parsed.amount, 80.0);
        assert_eq!(parsed.category, Category::Food);
        assert_eq!(parsed.item, "bento");
    }

    #[test]
    fn strips_fences_and_normalizes() {
        let reply = "```json\n{\"amount\": -120, \"category\": \"travel\", \"item\": \"taxi\"}\n```";
        let parsed = parse_model_response(reply).unwrap();
        assert_eq!(parsed.amount, 120.0);
        assert_eq!(parsed.category, Category::Other);
        assert_eq!(parsed.note, "");
    }

    #[test]
    fn non_numeric_amount_becomes_zero_and_fails_validation() {
        let parsed =
            parse_model_response(r#"{"amount": "about fifty", "category": "food", "item": "x"}"#)
                .unwrap();
        assert_eq!(parsed.amount, 0.0);
        let date = NaiveDate::from_ymd_opt(2025, 3, 1).unwrap();
        assert!(matches!(
            parsed.into_new_expense(date, "about fifty for x"),
            Err(ExpenseError::InvalidInput(_))
        ));
    }

    #[test]
    fn rejects_non_json() {
        assert!(matches!(
            parse_model_response("Sorry, I cannot help with that."),
            Err(ExpenseError::Extraction(_))
        ));
    }

    #[test]
    fn extracted_expense_keeps_transcript() {
        let parsed = parse_model_response(r#"{"amount": 35, "category": "transport", "item": "MRT"}"#)
            .unwrap();
        let date = NaiveDate::from_ymd_opt(2025, 3, 1).unwrap();
        let expense = parsed.into_new_expense(date, "MRT 35").unwrap();
        assert_eq!(expense.raw_text.as_deref(), Some("MRT 35"));
        assert_eq!(expense.category, Category::Transport);
    }
}
