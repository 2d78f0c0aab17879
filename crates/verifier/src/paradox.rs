// Path: crates/verifier/src/paradox.rs

//! The pinned self-reference pattern set.
//!
//! Patterns run case-insensitively against the normalized text only (the
//! portion of the canonical payload after the last separator). The set is
//! part of the deterministic contract: adding, removing, or reordering a
//! pattern changes verdicts and therefore invalidates fraud proofs. The
//! `regex` crate is non-backtracking, so adversarial text cannot trigger
//! catastrophic backtracking.

use once_cell::sync::Lazy;
use regex::Regex;

/// The pinned patterns, compiled once.
///
/// Normalized text is already lowercase, but `(?i)` stays on each pattern
/// so the set is self-contained for fraud-proof re-execution on witness
/// bytes that were produced elsewhere.
static PARADOX_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"(?i)(this proposal|the motion).*(passes|fails)\s*iff.*(fails|passes)",
        r"(?i)(this rule|this statement|the following statement)\s*is\s*false",
        r"(?i)if\s+this.*(true|passes).*then.*(false|fails)",
    ]
    .iter()
    .filter_map(|p| Regex::new(p).ok())
    .collect()
});

/// Returns `true` when any pinned pattern matches the normalized text.
pub fn scan(normalized_text: &str) -> bool {
    PARADOX_PATTERNS.iter().any(|re| re.is_match(normalized_text))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pattern_set_compiles_fully() {
        assert_eq!(PARADOX_PATTERNS.len(), 3);
    }

    #[test]
    fn detects_iff_inversion() {
        assert!(scan("this proposal passes iff it fails"));
        assert!(scan("the motion fails iff the budget passes"));
    }

    #[test]
    fn detects_liar_sentences() {
        assert!(scan("this statement is false"));
        assert!(scan("this rule is false"));
        assert!(scan("the following statement is false"));
    }

    #[test]
    fn detects_conditional_inversion() {
        assert!(scan("if this passes then the rule becomes false"));
    }

    #[test]
    fn ignores_ordinary_text() {
        assert!(!scan("transfer 100 tokens to the community fund"));
        assert!(!scan("this proposal allocates funds if the vote passes"));
        assert!(!scan(""));
    }
}
