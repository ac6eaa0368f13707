//! Verification gate: time-limited, single-use codes for prospective commits.
//!
//! State machine per path: `NONE -> ISSUED -> {VERIFIED | EXPIRED |
//! SUPERSEDED}`. Re-issuing for a path with an outstanding pending commit
//! supersedes the old one; no verify attempt can succeed on it afterward.

use crate::domain::{ChangeStats, EngineError, EngineResult, PendingCommit};
use chrono::{DateTime, Duration, Utc};
use rand::rngs::OsRng;
use rand::Rng;
use std::collections::HashMap;

/// Length of the human-typeable verification code.
const CODE_LEN: usize = 6;

/// Code alphabet. Uppercase alphanumeric with the easily confused glyphs
/// (0/O, 1/I/L) removed, since the committer types the code back by hand.
const CODE_CHARSET: &[u8] = b"ABCDEFGHJKMNPQRSTUVWXYZ23456789";

/// Tuning for code issuance.
#[derive(Debug, Clone, Copy)]
pub struct GateConfig {
    /// Validity window of an issued code.
    pub ttl: Duration,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::minutes(15),
        }
    }
}

/// Issues and validates verification codes for pending commits.
///
/// Pending commits are transient and live only in this map; they are never
/// written to history. Clearing the gate (session end) abandons all of them.
pub struct VerificationGate {
    config: GateConfig,
    /// Outstanding pending commits, keyed by pre-allocated commit id.
    pending: HashMap<String, PendingCommit>,
    /// Active pending commit id per path, for the one-per-path invariant.
    by_path: HashMap<String, String>,
}

enum Lookup {
    Missing,
    Expired,
    Mismatch,
    Match,
}

impl VerificationGate {
    pub fn new(config: GateConfig) -> Self {
        Self {
            config,
            pending: HashMap::new(),
            by_path: HashMap::new(),
        }
    }

    /// Issue a code for a prospective commit.
    ///
    /// Pre-allocates the commit id, records issuance time, and computes the
    /// expiry from the configured window. An unverified pending commit for
    /// the same path is silently superseded.
    pub fn issue(
        &mut self,
        path: &str,
        content: &str,
        message: &str,
        author_email: &str,
        changes: ChangeStats,
    ) -> PendingCommit {
        let issued_at = Utc::now();
        let entry = PendingCommit {
            commit_id: uuid::Uuid::new_v4().to_string(),
            code: generate_code(),
            path: path.to_string(),
            content: content.to_string(),
            message: message.to_string(),
            author_email: author_email.to_string(),
            changes,
            issued_at,
            expires_at: issued_at + self.config.ttl,
        };

        if let Some(old_id) = self.by_path.insert(path.to_string(), entry.commit_id.clone()) {
            self.pending.remove(&old_id);
            log::debug!("superseded pending commit {} for {}", old_id, path);
        }
        self.pending.insert(entry.commit_id.clone(), entry.clone());
        entry
    }

    /// Validate a supplied code and consume the pending commit on success.
    ///
    /// Fails with a single undifferentiated error whether the id is unknown,
    /// the code wrong, or the entry expired. Expired entries are discarded on
    /// access; a correct code no longer helps after the window closes.
    pub fn verify(&mut self, commit_id: &str, supplied_code: &str) -> EngineResult<PendingCommit> {
        self.verify_at(commit_id, supplied_code, Utc::now())
    }

    fn verify_at(
        &mut self,
        commit_id: &str,
        supplied_code: &str,
        now: DateTime<Utc>,
    ) -> EngineResult<PendingCommit> {
        let outcome = match self.pending.get(commit_id) {
            None => Lookup::Missing,
            Some(entry) if entry.is_expired_at(now) => Lookup::Expired,
            Some(entry) if entry.code != supplied_code => Lookup::Mismatch,
            Some(_) => Lookup::Match,
        };

        match outcome {
            Lookup::Missing | Lookup::Mismatch => Err(EngineError::InvalidVerification),
            Lookup::Expired => {
                self.discard(commit_id);
                Err(EngineError::InvalidVerification)
            }
            Lookup::Match => self
                .discard(commit_id)
                .ok_or(EngineError::InvalidVerification),
        }
    }

    /// Number of outstanding pending commits.
    pub fn outstanding(&self) -> usize {
        self.pending.len()
    }

    /// Abandon all outstanding pending commits (session end).
    pub fn clear(&mut self) {
        self.pending.clear();
        self.by_path.clear();
    }

    fn discard(&mut self, commit_id: &str) -> Option<PendingCommit> {
        let entry = self.pending.remove(commit_id)?;
        if self.by_path.get(&entry.path) == Some(&entry.commit_id) {
            self.by_path.remove(&entry.path);
        }
        Some(entry)
    }
}

impl Default for VerificationGate {
    fn default() -> Self {
        Self::new(GateConfig::default())
    }
}

fn generate_code() -> String {
    let mut rng = OsRng;
    (0..CODE_LEN)
        .map(|_| {
            let idx = rng.gen_range(0..CODE_CHARSET.len());
            CODE_CHARSET[idx] as char
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn issue(gate: &mut VerificationGate) -> PendingCommit {
        gate.issue(
            "/doc.md",
            "hello",
            "init",
            "a@b.com",
            ChangeStats::default(),
        )
    }

    #[test]
    fn test_code_shape() {
        let mut gate = VerificationGate::default();
        let pending = issue(&mut gate);
        assert_eq!(pending.code.len(), CODE_LEN);
        assert!(pending.code.bytes().all(|b| CODE_CHARSET.contains(&b)));
        assert!(pending.expires_at > pending.issued_at);
    }

    #[test]
    fn test_verify_roundtrip_consumes_entry() {
        let mut gate = VerificationGate::default();
        let pending = issue(&mut gate);

        let verified = gate.verify(&pending.commit_id, &pending.code).unwrap();
        assert_eq!(verified.path, "/doc.md");
        assert_eq!(gate.outstanding(), 0);

        // Single-use: a second attempt with the same code fails.
        assert!(matches!(
            gate.verify(&pending.commit_id, &pending.code),
            Err(EngineError::InvalidVerification)
        ));
    }

    #[test]
    fn test_wrong_code_and_unknown_id_are_indistinguishable() {
        let mut gate = VerificationGate::default();
        let pending = issue(&mut gate);

        let wrong = gate.verify(&pending.commit_id, "WRONG1").unwrap_err();
        let unknown = gate.verify("no-such-id", &pending.code).unwrap_err();
        assert_eq!(wrong.to_string(), unknown.to_string());

        // A mismatch does not consume the entry; the right code still works.
        assert!(gate.verify(&pending.commit_id, &pending.code).is_ok());
    }

    #[test]
    fn test_code_is_case_sensitive() {
        let mut gate = VerificationGate::default();
        // Re-issue until the code carries a letter; an all-digit code has no
        // case to flip.
        let pending = loop {
            let pending = issue(&mut gate);
            if pending.code.bytes().any(|b| b.is_ascii_uppercase()) {
                break pending;
            }
        };
        assert!(gate
            .verify(&pending.commit_id, &pending.code.to_lowercase())
            .is_err());
    }

    #[test]
    fn test_expired_code_fails_even_when_correct() {
        let mut gate = VerificationGate::default();
        let pending = issue(&mut gate);

        let after_expiry = pending.expires_at + Duration::seconds(1);
        let result = gate.verify_at(&pending.commit_id, &pending.code, after_expiry);
        assert!(matches!(result, Err(EngineError::InvalidVerification)));
        // Discarded on access.
        assert_eq!(gate.outstanding(), 0);
    }

    #[test]
    fn test_valid_until_expiry_boundary() {
        let mut gate = VerificationGate::default();
        let pending = issue(&mut gate);
        assert!(gate
            .verify_at(&pending.commit_id, &pending.code, pending.expires_at)
            .is_ok());
    }

    #[test]
    fn test_reissue_supersedes_previous_code() {
        let mut gate = VerificationGate::default();
        let first = issue(&mut gate);
        let second = issue(&mut gate);

        assert_ne!(first.commit_id, second.commit_id);
        assert_eq!(gate.outstanding(), 1);
        assert!(gate.verify(&first.commit_id, &first.code).is_err());
        assert!(gate.verify(&second.commit_id, &second.code).is_ok());
    }

    #[test]
    fn test_distinct_paths_do_not_supersede() {
        let mut gate = VerificationGate::default();
        let a = gate.issue("/a.md", "x", "m", "a@b.com", ChangeStats::default());
        let b = gate.issue("/b.md", "y", "m", "a@b.com", ChangeStats::default());
        assert_eq!(gate.outstanding(), 2);
        assert!(gate.verify(&a.commit_id, &a.code).is_ok());
        assert!(gate.verify(&b.commit_id, &b.code).is_ok());
    }

    #[test]
    fn test_clear_abandons_everything() {
        let mut gate = VerificationGate::default();
        let pending = issue(&mut gate);
        gate.clear();
        assert_eq!(gate.outstanding(), 0);
        assert!(gate.verify(&pending.commit_id, &pending.code).is_err());
    }
}
