use crate::error::TailError;
use regex::{Regex, RegexBuilder};

/// First whitespace-delimited word of a query, or "" for a blank query.
pub fn first_token(query: &str) -> &str {
    query.split_whitespace().next().unwrap_or("")
}

/// Compile the first word of `query` as a regular expression.
///
/// The word is not escaped, so regex syntax typed into the query is honored.
pub fn compile_highlight_pattern(query: &str) -> Result<Regex, TailError> {
    let pattern = first_token(query);

    RegexBuilder::new(pattern)
        .build()
        .map_err(|source| TailError::InvalidPattern {
            pattern: pattern.to_string(),
            source,
        })
}
