//! Lexical-store filter syntax (`field:=[`v1`,`v2`]`, conjoined with `&&`).

/// Builds one `IN` filter for a field; `None` when there are no values.
/// Backticks inside values are escaped so a value can never break out of the
/// string literal.
pub fn build_in_filter(field: &str, values: &[String]) -> Option<String> {
    if values.is_empty() {
        return None;
    }
    let quoted: Vec<String> = values
        .iter()
        .map(|v| format!("`{}`", v.replace('`', "\\`")))
        .collect();
    Some(format!("{}:=[{}]", field, quoted.join(",")))
}

/// Conjoins the client-provided filter with the auto-detected one.
///
/// Both present: each side is parenthesized. Only one present: passed through
/// unchanged.
pub fn merge_filters(client: Option<&str>, auto: Option<&str>) -> Option<String> {
    match (client, auto) {
        (Some(c), Some(a)) => Some(format!("({}) && ({})", c, a)),
        (Some(c), None) => Some(c.to_string()),
        (None, Some(a)) => Some(a.to_string()),
        (None, None) => None,
    }
}
