//! Per-user learned rules
//!
//! A learned rule says "if the description contains PATTERN, the category is X".
//! Rules are created when a user corrects a record's category or adds one
//! explicitly. Patterns are stored normalized so that the same merchant text
//! always maps to the same rule.

use crate::models::LearnedRule;

/// Maximum pattern length, in characters
pub const MAX_PATTERN_LEN: usize = 120;

/// Normalize text into a rule pattern
///
/// Trims, uppercases, collapses whitespace runs into a single space and
/// truncates to [`MAX_PATTERN_LEN`] characters.
pub fn normalize_contains(text: &str) -> String {
    text.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_uppercase()
        .chars()
        .take(MAX_PATTERN_LEN)
        .collect()
}

/// Find the category of the first rule whose pattern occurs in the description
///
/// Matching is case-insensitive containment against the uppercased description.
/// Rules are tried in list order (insertion order); the first hit wins.
/// Rules with an empty pattern never match.
pub fn match_user_rules<'a>(description: &str, rules: &'a [LearnedRule]) -> Option<&'a str> {
    let desc = description.to_uppercase();
    rules
        .iter()
        .find(|rule| !rule.pattern.is_empty() && desc.contains(&rule.pattern))
        .map(|rule| rule.category.as_str())
}
