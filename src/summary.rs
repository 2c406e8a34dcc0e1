//! Run accounting: accepted/invalid tallies, rejected-line samples, and
//! derived statistics for the report.
//!
//! Counting identity: every non-blank line is classified exactly once, so
//! `accepted + invalid() == non-blank lines`. `accepted` includes lines whose
//! record was later suppressed as a duplicate; `unique()` is what actually
//! landed in buckets.
use std::collections::HashMap;

use log::warn;

use crate::parse::RejectReason;
use crate::record::CredRecord;

/// One sampled rejected line, kept as lossily-decoded text for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RejectedSample {
    pub reason: String,
    pub line: String,
}

/// Counters and diagnostics for one pipeline run.
#[derive(Debug, Clone, Default)]
pub struct RunSummary {
    /// Valid record lines, duplicates included.
    pub accepted: usize,
    /// Accepted lines suppressed because their fingerprint was already seen.
    pub duplicates: usize,
    pub grammar_mismatch: usize,
    pub empty_field: usize,
    pub unsupported_host: usize,
    /// Whether the windows-1252 fallback engaged at any point.
    pub fallback_engaged: bool,
    /// First-N rejected raw lines, tagged with their reason.
    pub samples: Vec<RejectedSample>,
}

impl RunSummary {
    /// Total rejected non-blank lines across all reason classes.
    pub fn invalid(&self) -> usize {
        self.grammar_mismatch + self.empty_field + self.unsupported_host
    }

    /// Records that made it into buckets.
    pub fn unique(&self) -> usize {
        self.accepted - self.duplicates
    }

    /// Count a rejection, sampling the first `sample_cap` raw lines.
    pub(crate) fn record_reject(&mut self, reason: RejectReason, raw: &[u8], sample_cap: usize) {
        match reason {
            RejectReason::GrammarMismatch => self.grammar_mismatch += 1,
            RejectReason::EmptyField => self.empty_field += 1,
            RejectReason::UnsupportedHost => self.unsupported_host += 1,
        }
        if self.samples.len() < sample_cap {
            let line = String::from_utf8_lossy(raw.trim_ascii()).into_owned();
            warn!("rejected ({reason}): {line}");
            self.samples.push(RejectedSample {
                reason: reason.to_string(),
                line,
            });
        }
    }
}

pub fn pct(n: usize, d: usize) -> String {
    if d == 0 {
        return "0.00%".to_string();
    }
    format!("{:.2}%", (n as f64) / (d as f64) * 100.0)
}

/// Top-N most reused passwords across accepted records, count descending,
/// password ascending to stabilize ordering.
pub fn top_reused_passwords<'a, I>(records: I, top_n: usize) -> Vec<(String, usize)>
where
    I: IntoIterator<Item = &'a CredRecord>,
{
    use std::cmp::Reverse;
    let mut freq: HashMap<&str, usize> = HashMap::new();
    for r in records {
        *freq.entry(r.pass.as_str()).or_insert(0) += 1;
    }
    let mut items: Vec<(String, usize)> = freq
        .into_iter()
        .map(|(pw, n)| (pw.to_string(), n))
        .collect();
    items.sort_by(|a, b| (Reverse(a.1), &a.0).cmp(&(Reverse(b.1), &b.0)));
    if items.len() > top_n {
        items.truncate(top_n);
    }
    items
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sample_cap_is_honored() {
        let mut s = RunSummary::default();
        for i in 0..10 {
            s.record_reject(RejectReason::GrammarMismatch, format!("bad{i}").as_bytes(), 3);
        }
        assert_eq!(s.grammar_mismatch, 10);
        assert_eq!(s.samples.len(), 3);
        assert_eq!(s.samples[0].line, "bad0");
        assert_eq!(s.samples[0].reason, "grammar-mismatch");
    }

    #[test]
    fn invalid_sums_all_reason_classes() {
        let mut s = RunSummary::default();
        s.record_reject(RejectReason::GrammarMismatch, b"a", 0);
        s.record_reject(RejectReason::EmptyField, b"b", 0);
        s.record_reject(RejectReason::UnsupportedHost, b"c", 0);
        assert_eq!(s.invalid(), 3);
        assert!(s.samples.is_empty());
    }

    #[test]
    fn unique_subtracts_duplicates() {
        let s = RunSummary {
            accepted: 5,
            duplicates: 2,
            ..Default::default()
        };
        assert_eq!(s.unique(), 3);
    }

    #[test]
    fn top_reused_sorts_and_truncates() {
        let records = vec![
            CredRecord::new("a.com", "u1", "pw"),
            CredRecord::new("a.com", "u2", "pw"),
            CredRecord::new("b.com", "u3", "other"),
        ];
        let top = top_reused_passwords(&records, 1);
        assert_eq!(top, vec![("pw".to_string(), 2)]);
    }

    #[test]
    fn pct_handles_zero_denominator() {
        assert_eq!(pct(1, 0), "0.00%");
        assert_eq!(pct(1, 4), "25.00%");
    }
}
