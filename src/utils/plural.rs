//! Counted nouns for log lines.

use std::fmt;

/// `count` followed by `noun`, pluralized with a trailing `s` unless the
/// count is one. Formats lazily, so it can sit directly in `log!` args.
#[derive(Debug, Clone, Copy)]
pub struct Counted<'a> {
    count: usize,
    noun: &'a str,
}

impl fmt::Display for Counted<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let suffix = if self.count == 1 { "" } else { "s" };
        write!(f, "{} {}{suffix}", self.count, self.noun)
    }
}

/// - `plural_count(0, "observer")` -> `0 observers`
/// - `plural_count(1, "observer")` -> `1 observer`
pub const fn plural_count(count: usize, noun: &str) -> Counted<'_> {
    Counted { count, noun }
}
