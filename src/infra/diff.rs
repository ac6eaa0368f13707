//! Line-level change summaries between two content snapshots.
//!
//! Uses `similar` for LCS alignment. Replaced blocks pair removed and added
//! lines positionally; a pair counts as one "modified" line when the two
//! sides are close enough, instead of one removal plus one addition.

use crate::domain::ChangeStats;
use similar::{DiffOp, TextDiff};

/// Minimum shared leading/trailing run (in chars) that pairs two lines as a
/// modification even when their overall similarity ratio falls short.
const MIN_SHARED_AFFIX: usize = 3;

/// Tuning for modified-pair detection.
#[derive(Debug, Clone, Copy)]
pub struct DiffConfig {
    /// Char-level similarity ratio (0.0 to 1.0) at or above which a
    /// removed/added line pair is classified as modified.
    pub similarity_threshold: f32,
}

impl Default for DiffConfig {
    fn default() -> Self {
        Self {
            similarity_threshold: 0.4,
        }
    }
}

/// Compute the line-level change summary between two snapshots.
///
/// Deterministic and side-effect-free. Line boundaries follow
/// [`str::lines`], so `\n` and `\r\n` content compare consistently.
/// Diffing empty content against N lines yields `{added: N, 0, 0}`.
pub fn compute_changes(old: &str, new: &str, config: &DiffConfig) -> ChangeStats {
    let old_lines: Vec<&str> = old.lines().collect();
    let new_lines: Vec<&str> = new.lines().collect();

    let diff = TextDiff::from_slices(&old_lines, &new_lines);
    let mut stats = ChangeStats::default();

    for op in diff.ops() {
        match *op {
            DiffOp::Equal { .. } => {}
            DiffOp::Delete { old_len, .. } => stats.removed += old_len as u32,
            DiffOp::Insert { new_len, .. } => stats.added += new_len as u32,
            DiffOp::Replace {
                old_index,
                old_len,
                new_index,
                new_len,
            } => {
                let paired = old_len.min(new_len);
                for offset in 0..paired {
                    let before = old_lines[old_index + offset];
                    let after = new_lines[new_index + offset];
                    if lines_similar(before, after, config.similarity_threshold) {
                        stats.modified += 1;
                    } else {
                        stats.removed += 1;
                        stats.added += 1;
                    }
                }
                stats.removed += (old_len - paired) as u32;
                stats.added += (new_len - paired) as u32;
            }
        }
    }

    stats
}

fn lines_similar(old: &str, new: &str, threshold: f32) -> bool {
    if old.is_empty() || new.is_empty() {
        return false;
    }
    if TextDiff::from_chars(old, new).ratio() >= threshold {
        return true;
    }
    // A short edit at the end of a long line can depress the char ratio;
    // a shared leading or trailing run still marks the pair as an edit.
    shared_prefix(old, new) >= MIN_SHARED_AFFIX || shared_suffix(old, new) >= MIN_SHARED_AFFIX
}

fn shared_prefix(a: &str, b: &str) -> usize {
    a.chars()
        .zip(b.chars())
        .take_while(|(x, y)| x == y)
        .count()
}

fn shared_suffix(a: &str, b: &str) -> usize {
    a.chars()
        .rev()
        .zip(b.chars().rev())
        .take_while(|(x, y)| x == y)
        .count()
}
