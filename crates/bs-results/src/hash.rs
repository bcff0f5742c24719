//! Content-based hashing for run IDs.

use crate::types::CanonicalRequest;
use sha2::{Digest, Sha256};

/// Stable identifier for a request evaluated by a specific engine.
///
/// Parameters are held in a sorted map, so override order never changes
/// the id.
pub fn compute_run_id(request: &CanonicalRequest, engine_id: &str) -> String {
    let mut hasher = Sha256::new();

    let request_json = serde_json::to_string(request).unwrap_or_default();
    hasher.update(request_json.as_bytes());

    hasher.update(engine_id.as_bytes());
    hasher.update(env!("CARGO_PKG_VERSION").as_bytes());

    let result = hasher.finalize();
    format!("{:x}", result)
}

/// True for strings in the [`compute_run_id`] format: 64 lowercase hex digits.
pub fn is_run_id(candidate: &str) -> bool {
    candidate.len() == 64
        && candidate
            .bytes()
            .all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b))
}
