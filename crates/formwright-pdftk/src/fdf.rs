//! FDF field-value exchange format

use std::collections::BTreeMap;

const HEADER: &str = "%FDF-1.2\n1 0 obj\n<<\n/FDF\n<<\n/Fields [";
const FOOTER: &str = "]\n>>\n>>\nendobj\ntrailer\n\n<<\n/Root 1 0 R\n>>\n%%EOF";

/// Escape `\`, `(` and `)` for a PDF literal string
pub fn escape_literal(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        if matches!(c, '\\' | '(' | ')') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

/// Render `values` as an FDF 1.2 document; empty values are omitted
pub fn render_fdf(values: &BTreeMap<String, String>) -> String {
    let entries: Vec<String> = values
        .iter()
        .filter(|(_, value)| !value.is_empty())
        .map(|(name, value)| {
            format!(
                "<<\n/T ({})\n/V ({})\n>>",
                escape_literal(name),
                escape_literal(value)
            )
        })
        .collect();

    format!("{}\n{}\n{}", HEADER, entries.join("\n"), FOOTER)
}
