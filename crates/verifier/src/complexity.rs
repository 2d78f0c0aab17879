// Path: crates/verifier/src/complexity.rs

//! Deflate-based complexity scoring.
//!
//! The score is the length of the RFC 1951 deflate stream of the canonical
//! payload at compression level 9, default 32 KiB window, no preset
//! dictionary. `flate2`'s pure-Rust miniz_oxide backend produces identical
//! bytes on every platform, which is what makes the score fraud-provable:
//! the reference byte-level output is normative.

use flate2::write::DeflateEncoder;
use flate2::Compression;
use std::io::Write;

/// Computes the complexity score of a canonical payload.
///
/// An in-memory encoder over a `Vec` cannot fail; if the impossible
/// happens the function fails closed with `u64::MAX`, which can never
/// satisfy the complexity bound.
pub fn complexity_score(bytes: &[u8]) -> u64 {
    let mut encoder = DeflateEncoder::new(Vec::new(), Compression::new(9));
    let compressed = encoder
        .write_all(bytes)
        .and_then(|_| encoder.finish());
    match compressed {
        Ok(out) => out.len() as u64,
        Err(_) => u64::MAX,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn score_is_deterministic() {
        let payload = br#"{"action":"transfer","amount":100}.transfer 100 tokens"#;
        assert_eq!(complexity_score(payload), complexity_score(payload));
    }

    #[test]
    fn incompressible_input_scores_higher_than_repetitive_input() {
        // Pseudo-random bytes from a fixed LCG so the fixture is stable.
        let mut x: u64 = 0x2545_f491_4f6c_dd1d;
        let noise: Vec<u8> = (0..4096)
            .map(|_| {
                x = x.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
                (x >> 33) as u8
            })
            .collect();
        let repetitive = vec![b'a'; 4096];
        assert!(complexity_score(&noise) > complexity_score(&repetitive));
    }

    #[test]
    fn empty_payload_has_small_nonzero_score() {
        let s = complexity_score(b"");
        assert!(s > 0 && s < 16);
    }
}
