/// Turn free text into a prefix-matching `to_tsquery` expression.
///
/// Every word becomes `word:*`, joined with `&`. Operators and punctuation are
/// stripped so user input can never produce a tsquery syntax error.
pub(crate) fn build_tsquery(query: &str) -> Option<String> {
    let result = query
        .split_whitespace()
        .filter_map(|w| {
            let sanitized: String =
                w.chars().filter(|c| c.is_alphanumeric() || *c == '-' || *c == '_').collect();
            let sanitized = sanitized.trim_matches('-');
            if sanitized.is_empty() { None } else { Some(format!("{sanitized}:*")) }
        })
        .collect::<Vec<_>>()
        .join(" & ");
    if result.is_empty() { None } else { Some(result) }
}
