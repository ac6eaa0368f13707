//! Content fingerprinting for commit snapshots.

use std::hash::Hasher;

use twox_hash::XxHash64;

/// xxhash64 of a snapshot, hex-encoded for storage alongside the commit row.
/// Cheap change check; not a cryptographic digest.
pub fn content_hash(text: &str) -> String {
    let mut hasher = XxHash64::with_seed(0);
    hasher.write(text.as_bytes());
    format!("{:016x}", hasher.finish())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_hash_stable_and_distinct() {
        assert_eq!(content_hash("hello"), content_hash("hello"));
        assert_ne!(content_hash("hello"), content_hash("hello world"));
        assert_eq!(content_hash("").len(), 16);
    }
}
