//! Category rule table and phrase search
//!
//! Shared by the pattern extractor and the quality assessor's re-scans.

use regex::{Regex, RegexBuilder};
use std::sync::LazyLock;

/// Semantic category of a rule
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    /// Court or matter identifier
    CaseNumber,
    /// North American phone number
    Phone,
    /// Email address
    Email,
    /// Numeric date
    Date,
    /// Currency amount
    Money,
    /// Street address
    Address,
    /// Person name after a `Name` label
    Name,
    /// National identifier (SSN shape)
    Ssn,
    /// Postal code after a `zip`/`postal` label
    Zip,
}

impl Category {
    /// Keyword looked for in field names and labels
    pub fn keyword(&self) -> &'static str {
        match self {
            Category::CaseNumber => "case_number",
            Category::Phone => "phone",
            Category::Email => "email",
            Category::Date => "date",
            Category::Money => "money",
            Category::Address => "address",
            Category::Name => "name",
            Category::Ssn => "ssn",
            Category::Zip => "zip",
        }
    }
}

/// A named regular-expression rule
pub struct PatternRule {
    /// Category
    pub category: Category,
    /// Compiled case-insensitive pattern; group 1 holds the value
    pub regex: Regex,
}

fn rule(category: Category, pattern: &str) -> PatternRule {
    PatternRule {
        category,
        regex: RegexBuilder::new(pattern)
            .case_insensitive(true)
            .build()
            .expect("valid rule pattern"),
    }
}

/// Rules in match-priority order
pub static RULES: LazyLock<Vec<PatternRule>> = LazyLock::new(|| {
    vec![
        rule(Category::CaseNumber, r"case\s*(?:number|no\.?|#)\s*:?\s*([A-Z0-9\-]+)"),
        rule(
            Category::Phone,
            r"(?:\+?1[-.\s]?)?\(?([0-9]{3})\)?[-.\s]?([0-9]{3})[-.\s]?([0-9]{4})",
        ),
        rule(Category::Email, r"([a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,})"),
        rule(Category::Date, r"\b(\d{1,2}[/-]\d{1,2}[/-]\d{2,4})\b"),
        rule(Category::Money, r"\$\s*([0-9,]+(?:\.[0-9]{2})?)"),
        rule(
            Category::Address,
            r"(\d+\s+[A-Za-z\s]+(?:Street|St|Avenue|Ave|Road|Rd|Drive|Dr|Lane|Ln|Boulevard|Blvd))",
        ),
        rule(Category::Name, r"name[ \t]*:?[ \t]*([A-Za-z \t.]+)"),
        rule(Category::Ssn, r"(\d{3}-\d{2}-\d{4})"),
        rule(Category::Zip, r"(?:zip|postal)\s*:?\s*(\d{5}(?:-\d{4})?)"),
    ]
});

/// The rule for a category
pub fn rule_for(category: Category) -> &'static PatternRule {
    // Table order follows the enum declaration order
    &RULES[category as usize]
}

/// Rules whose keyword appears in the field name or alt label, in table order
pub fn rules_for(field_name: &str, alt_label: &str) -> impl Iterator<Item = &'static PatternRule> {
    let name = field_name.to_lowercase();
    let alt = alt_label.to_lowercase();
    RULES
        .iter()
        .filter(move |r| name.contains(r.category.keyword()) || alt.contains(r.category.keyword()))
}

/// First rule whose keyword appears in the field name or alt label
pub fn category_for(field_name: &str, alt_label: &str) -> Option<&'static PatternRule> {
    rules_for(field_name, alt_label).next()
}

/// Apply a rule to `text`, returning the first match's display value
///
/// Phone matches are reassembled as `(area) prefix-suffix`; everything else
/// is capture group 1, trimmed.
pub fn apply_rule(rule: &PatternRule, text: &str) -> Option<String> {
    let caps = rule.regex.captures(text)?;
    let value = match rule.category {
        Category::Phone => format!(
            "({}) {}-{}",
            caps.get(1)?.as_str(),
            caps.get(2)?.as_str(),
            caps.get(3)?.as_str()
        ),
        _ => caps.get(1)?.as_str().trim().to_string(),
    };
    (!value.is_empty()).then_some(value)
}

/// Longest accepted phrase capture, in characters (exclusive)
pub const MAX_PHRASE_CHARS: usize = 200;

/// Keep a captured line only when 0 < length < 200 characters
pub fn accept_capture(raw: &str) -> Option<String> {
    let value = raw.trim();
    let len = value.chars().count();
    (len > 0 && len < MAX_PHRASE_CHARS).then(|| value.to_string())
}

/// Search for `label`, an optional colon, then capture the rest of the line
pub fn phrase_search(text: &str, label: &str) -> Option<String> {
    let pattern = format!(r"{}\s*:?\s*([^\n\r]+)", regex::escape(label));
    let regex = RegexBuilder::new(&pattern)
        .case_insensitive(true)
        .build()
        .ok()?;
    let caps = regex.captures(text)?;
    accept_capture(caps.get(1)?.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_order_matches_categories() {
        for (index, rule) in RULES.iter().enumerate() {
            assert_eq!(rule.category as usize, index);
        }
    }

    #[test]
    fn test_case_number_rule() {
        let rule = rule_for(Category::CaseNumber);
        assert_eq!(
            apply_rule(rule, "Case Number: 24STFL00615").as_deref(),
            Some("24STFL00615")
        );
        assert_eq!(apply_rule(rule, "case no. ab-12").as_deref(), Some("ab-12"));
    }

    #[test]
    fn test_phone_reassembled() {
        let rule = rule_for(Category::Phone);
        assert_eq!(
            apply_rule(rule, "Phone: 555-123-4567").as_deref(),
            Some("(555) 123-4567")
        );
        assert_eq!(
            apply_rule(rule, "call +1 (310) 555.0101").as_deref(),
            Some("(310) 555-0101")
        );
    }

    #[test]
    fn test_whole_match_rules() {
        assert_eq!(
            apply_rule(rule_for(Category::Email), "mail jane.doe@example.org now").as_deref(),
            Some("jane.doe@example.org")
        );
        assert_eq!(
            apply_rule(rule_for(Category::Ssn), "SSN 123-45-6789").as_deref(),
            Some("123-45-6789")
        );
        assert_eq!(
            apply_rule(rule_for(Category::Address), "lives at 42 Elm Street, Springfield").as_deref(),
            Some("42 Elm Street")
        );
    }

    #[test]
    fn test_money_and_zip() {
        assert_eq!(
            apply_rule(rule_for(Category::Money), "Total: $ 1,250.00").as_deref(),
            Some("1,250.00")
        );
        assert_eq!(
            apply_rule(rule_for(Category::Zip), "Zip: 90210-1234").as_deref(),
            Some("90210-1234")
        );
    }

    #[test]
    fn test_name_stays_on_line() {
        assert_eq!(
            apply_rule(rule_for(Category::Name), "Name: Jane Doe\nPhone: 555").as_deref(),
            Some("Jane Doe")
        );
    }

    #[test]
    fn test_capture_trimmed() {
        assert_eq!(
            apply_rule(rule_for(Category::Name), "Name:\tJane Doe  \t\n").as_deref(),
            Some("Jane Doe")
        );
        assert_eq!(apply_rule(rule_for(Category::Name), "Name:   \nJane"), None);
    }

    #[test]
    fn test_category_keyword_match() {
        assert_eq!(category_for("case_number", "").map(|r| r.category), Some(Category::CaseNumber));
        assert_eq!(category_for("contact_phone", "").map(|r| r.category), Some(Category::Phone));
        assert_eq!(category_for("field1", "Petitioner Name").map(|r| r.category), Some(Category::Name));
        assert!(category_for("total_amount", "").is_none());
    }

    #[test]
    fn test_phrase_search() {
        let text = "Employer: Acme Corp\nCounty of: Los Angeles";
        assert_eq!(phrase_search(text, "employer").as_deref(), Some("Acme Corp"));
        assert_eq!(phrase_search(text, "county of").as_deref(), Some("Los Angeles"));
        assert_eq!(phrase_search(text, "missing"), None);
    }

    #[test]
    fn test_phrase_length_guard() {
        let long = format!("Notes: {}", "x".repeat(250));
        assert_eq!(phrase_search(&long, "notes"), None);
        assert_eq!(accept_capture("   "), None);
        assert_eq!(accept_capture(&"y".repeat(199)).map(|s| s.len()), Some(199));
    }
}
