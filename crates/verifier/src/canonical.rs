// Path: crates/verifier/src/canonical.rs

//! Canonical payload construction.
//!
//! `bytes = canonical_json(logic_ast) ++ '.' ++ normalize(text)` and
//! `hash = sha256(bytes)`. Two proposals differing only by JSON key order,
//! whitespace runs, letter case, or punctuation in the text produce the
//! same bytes and therefore the same identity.

use accord_types::app::{CanonicalPayload, ProposalId};
use accord_types::codec;
use accord_types::error::VerifyError;
use accord_types::MAX_RAW_AST_BYTES;
use serde_json::Value;

/// The byte separating the canonical JSON from the normalized text.
pub const SEPARATOR: u8 = 0x2e; // '.'

/// Builds the canonical payload for a proposal's logic and text.
///
/// # Errors
///
/// Returns [`VerifyError::MalformedAst`] when `logic_ast` exceeds
/// [`MAX_RAW_AST_BYTES`], is not valid JSON, or contains a value with no
/// canonical JSON representation (non-finite floats, if the producing
/// parser admitted them). The size gate runs before the parse. The caller
/// surfaces the error as a failing Channel A verdict.
pub fn canonicalize(logic_ast: &str, text: &str) -> Result<CanonicalPayload, VerifyError> {
    if logic_ast.len() > MAX_RAW_AST_BYTES {
        return Err(VerifyError::MalformedAst(format!(
            "AST of {} bytes exceeds the {} byte bound",
            logic_ast.len(),
            MAX_RAW_AST_BYTES
        )));
    }
    let ast: Value = serde_json::from_str(logic_ast)
        .map_err(|e| VerifyError::MalformedAst(format!("AST parse failed: {}", e)))?;

    let canonical_json = codec::to_canonical_json(&ast).map_err(VerifyError::MalformedAst)?;

    let normalized = normalize_text(text);

    let mut bytes = canonical_json;
    bytes.push(SEPARATOR);
    bytes.extend_from_slice(normalized.as_bytes());

    let hash = ProposalId(codec::sha256(&bytes));
    Ok(CanonicalPayload { bytes, hash })
}

/// Normalizes natural-language text: simple case-fold to lowercase, strip
/// characters that are neither word characters nor whitespace, collapse
/// whitespace runs to a single U+0020, trim the ends.
pub fn normalize_text(text: &str) -> String {
    let lowered = text.to_lowercase();
    let mut out = String::with_capacity(lowered.len());
    let mut pending_space = false;
    for c in lowered.chars() {
        if c.is_whitespace() {
            if !out.is_empty() {
                pending_space = true;
            }
            continue;
        }
        if c.is_alphanumeric() || c == '_' {
            if pending_space {
                out.push(' ');
                pending_space = false;
            }
            out.push(c);
        }
        // Everything else is stripped outright.
    }
    out
}

/// Splits canonical bytes at the last separator into the canonical-JSON
/// part and the normalized-text part. The normalized text can never
/// contain the separator, so the last occurrence is the boundary.
pub fn split_canonical(bytes: &[u8]) -> Option<(&[u8], &[u8])> {
    let idx = bytes.iter().rposition(|&b| b == SEPARATOR)?;
    let (ast, rest) = bytes.split_at(idx);
    rest.split_first().map(|(_, text)| (ast, text))
}
