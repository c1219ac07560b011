//! Pattern based extraction over raw documents.

use regex::{CaptureMatches, Regex, RegexBuilder};

/// Compiles an extraction pattern.
///
/// Patterns always run over the whole document: `.` spans newlines and `^`/`$`
/// match at line boundaries.
///
/// # Panics
///
/// Panics if `expression` is not a valid regular expression. Patterns are part
/// of the program, so a malformed one is a bug rather than a runtime condition.
#[must_use]
pub fn pattern(expression: &str) -> Regex {
    RegexBuilder::new(expression)
        .dot_matches_new_line(true)
        .multi_line(true)
        .build()
        .unwrap_or_else(|e| panic!("invalid extraction pattern '{expression}': {e}"))
}

/// Returns the first capture group of the first match.
///
/// Returns an empty string when nothing matches, so absence and empty content
/// look the same to the caller.
#[must_use]
pub fn find_first<'d>(document: &'d str, pattern: &Regex) -> &'d str {
    pattern
        .captures(document)
        .and_then(|captures| captures.get(1))
        .map_or("", |m| m.as_str())
}

/// Returns the first capture group of every match, lazily.
///
/// Calling this again with the same inputs restarts the scan from the top.
#[must_use]
pub fn find_all<'r, 'd>(document: &'d str, pattern: &'r Regex) -> FindAll<'r, 'd> {
    FindAll {
        captures: pattern.captures_iter(document),
    }
}

/// Iterator returned by [`find_all`].
#[derive(Debug)]
pub struct FindAll<'r, 'd> {
    captures: CaptureMatches<'r, 'd>,
}

impl<'d> Iterator for FindAll<'_, 'd> {
    type Item = &'d str;

    fn next(&mut self) -> Option<Self::Item> {
        self.captures
            .next()
            .map(|captures| captures.get(1).map_or("", |m| m.as_str()))
    }
}
