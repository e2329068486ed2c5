//! SQL LIKE pattern translation
//!
//! `%` matches zero or more of any character, `_` exactly one; everything
//! else is literal. Literal characters are regex-escaped before the wildcard
//! translation so metacharacters in the pattern cannot leak into the matcher.
//! A backslash escapes the next character, letting patterns match a literal
//! `%` or `_`.

use regex::Regex;

use super::errors::{EvalError, EvalResult};

/// Translates a LIKE pattern into an anchored regex over the exact row value
pub fn like_regex(pattern: &str, case_insensitive: bool) -> EvalResult<Regex> {
    let mut translated = String::with_capacity(pattern.len() + 8);
    // `%` must cross line boundaries; `.` matches newlines under (?s)
    translated.push_str(if case_insensitive { "(?si)" } else { "(?s)" });
    translated.push('^');

    let mut chars = pattern.chars();
    while let Some(c) = chars.next() {
        match c {
            '\\' => match chars.next() {
                Some(escaped) => translated.push_str(&regex::escape(&escaped.to_string())),
                // Trailing backslash is a literal backslash
                None => translated.push_str(&regex::escape("\\")),
            },
            '%' => translated.push_str(".*"),
            '_' => translated.push('.'),
            literal => translated.push_str(&regex::escape(&literal.to_string())),
        }
    }

    translated.push('$');
    Regex::new(&translated).map_err(|e| EvalError::InvalidPattern {
        pattern: pattern.to_string(),
        reason: e.to_string(),
    })
}
