//! Stricter re-extraction for weak fields

use formwright_domain::FieldName;
use formwright_extractor::patterns::{rule_for, Category};
use regex::Regex;
use std::sync::LazyLock;

/// Re-derives a value for a low-confidence field from the corpus text
///
/// Implementations are domain heuristics; returning `None` leaves the
/// field untouched.
pub trait FieldRepairer: Send + Sync {
    /// Try to find a better value for `field` in `text`
    fn repair(&self, field: &FieldName, text: &str) -> Option<String>;
}

static PARTY_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i:name|petitioner|respondent)\s*:?\s*([A-Z][a-z]+\s+[A-Z][a-z]+)")
        .expect("valid party name pattern")
});

/// Heuristics tuned for court and legal forms
///
/// Picks one strategy from the cleaned field name, in this order:
/// `name` takes a two-word capitalized name after a party label, `case`
/// takes the case-number rule, `amount` or `total` takes the largest
/// currency amount in the text.
#[derive(Debug, Clone, Copy, Default)]
pub struct LegalFormRepairer;

impl FieldRepairer for LegalFormRepairer {
    fn repair(&self, field: &FieldName, text: &str) -> Option<String> {
        let cleaned = field.as_str().to_lowercase().replace('_', " ");

        if cleaned.contains("name") {
            PARTY_NAME
                .captures(text)
                .and_then(|caps| caps.get(1))
                .map(|m| m.as_str().trim().to_string())
        } else if cleaned.contains("case") {
            rule_for(Category::CaseNumber)
                .regex
                .captures(text)
                .and_then(|caps| caps.get(1))
                .map(|m| m.as_str().trim().to_string())
        } else if cleaned.contains("amount") || cleaned.contains("total") {
            largest_amount(text).map(format_currency)
        } else {
            None
        }
    }
}

/// Largest currency amount in `text`, ignoring captures that do not parse
fn largest_amount(text: &str) -> Option<f64> {
    rule_for(Category::Money)
        .regex
        .captures_iter(text)
        .filter_map(|caps| caps.get(1))
        .filter_map(|m| m.as_str().replace(',', "").parse::<f64>().ok())
        .fold(None, |best: Option<f64>, v| Some(best.map_or(v, |b| b.max(v))))
}

/// Format as `$1,234.56`
pub fn format_currency(amount: f64) -> String {
    let formatted = format!("{:.2}", amount.abs());
    let (whole, cents) = formatted.split_once('.').unwrap_or((&formatted, "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    let sign = if amount < 0.0 { "-" } else { "" };
    format!("{}${}.{}", sign, grouped, cents)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_currency() {
        assert_eq!(format_currency(0.0), "$0.00");
        assert_eq!(format_currency(950.5), "$950.50");
        assert_eq!(format_currency(1234.56), "$1,234.56");
        assert_eq!(format_currency(1_250_000.0), "$1,250,000.00");
    }

    #[test]
    fn test_name_repair() {
        let text = "Petitioner: Maria Lopez\nRespondent: John Smith";
        let repaired = LegalFormRepairer.repair(&"petitioner_name".into(), text);
        assert_eq!(repaired.as_deref(), Some("Maria Lopez"));
    }

    #[test]
    fn test_name_repair_requires_capitalized_words() {
        let text = "name: maria lopez";
        assert_eq!(LegalFormRepairer.repair(&"name".into(), text), None);
    }

    #[test]
    fn test_case_repair() {
        let text = "Re: Case No. 24STFL00615";
        let repaired = LegalFormRepairer.repair(&"case_id".into(), text);
        assert_eq!(repaired.as_deref(), Some("24STFL00615"));
    }

    #[test]
    fn test_amount_takes_largest() {
        let text = "Rent $1,200.00, utilities $150, arrears $2,450.75";
        let repaired = LegalFormRepairer.repair(&"total_due".into(), text);
        assert_eq!(repaired.as_deref(), Some("$2,450.75"));
    }

    #[test]
    fn test_name_takes_precedence_over_amount() {
        // "amount_name" is handled by the name heuristic only
        let text = "Total $500.00";
        assert_eq!(LegalFormRepairer.repair(&"amount_name".into(), text), None);
    }

    #[test]
    fn test_unrelated_field() {
        assert_eq!(LegalFormRepairer.repair(&"county".into(), "County: Kern"), None);
    }
}
