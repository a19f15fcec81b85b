// schemasync/src/scope/pattern.rs
use glob::{MatchOptions, Pattern, PatternError};
use tracing::warn;

/// The only wildcard. Matches any run of characters, including none.
pub const WILDCARD: char = '*';

const OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: false,
    require_literal_leading_dot: false,
};

/// Compares a configured pattern with an object name.
///
/// Surrounding whitespace is ignored on both sides. Without a `*` the pattern
/// must equal the name; with one or more `*` the pattern is anchored at both
/// ends and each `*` stands for any substring. No other character is special.
pub fn simple_match(pattern: &str, candidate: &str) -> bool {
    let pattern = pattern.trim();
    let candidate = candidate.trim();

    if pattern == candidate {
        return true;
    }
    if !pattern.contains(WILDCARD) {
        return false;
    }

    match compile(pattern) {
        Ok(compiled) => compiled.matches_with(candidate, OPTIONS),
        Err(e) => {
            warn!("Ignoring unusable pattern {:?}: {}", pattern, e);
            false
        }
    }
}

/// Builds a glob in which only `*` is live: the literal runs between
/// wildcards are escaped and repeated `*` are folded into one, since glob
/// reserves `**` for path components.
fn compile(pattern: &str) -> Result<Pattern, PatternError> {
    let mut folded = String::with_capacity(pattern.len());
    for ch in pattern.chars() {
        if ch == WILDCARD && folded.ends_with(WILDCARD) {
            continue;
        }
        folded.push(ch);
    }

    let glob = folded
        .split(WILDCARD)
        .map(Pattern::escape)
        .collect::<Vec<_>>()
        .join("*");
    Pattern::new(&glob)
}
