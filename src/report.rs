//! Human-readable report rendering for terminal output.
//!
//! Produces a colored summary of one run: overall counts, the per-host
//! breakdown in allow-list order, the invalid-line tallies with their
//! sampled offenders, and the most reused passwords among accepted records.
use colored::*;

use crate::pipeline::SiftOutcome;
use crate::summary::{pct, top_reused_passwords};

fn visible_len(s: &str) -> usize {
    // Strip ANSI escape sequences (\x1b[ ... m) to compute printable width
    let mut len = 0;
    let mut iter = s.chars().peekable();
    while let Some(ch) = iter.next() {
        if ch == '\u{1b}' {
            if let Some('[') = iter.peek().cloned() {
                let _ = iter.next();
            }
            for c in iter.by_ref() {
                if c == 'm' {
                    break;
                }
            }
        } else {
            len += 1;
        }
    }
    len
}

fn section_header(title: &str) -> String {
    let len = visible_len(title);
    let mut s = String::new();
    s.push('\n');
    s.push_str(title);
    s.push('\n');
    s.push_str(&"─".repeat(len));
    s.push_str("\n\n");
    s
}

pub fn render_summary(outcome: &SiftOutcome) -> String {
    render_summary_with_top(outcome, 10)
}

pub fn render_summary_with_top(outcome: &SiftOutcome, top_n: usize) -> String {
    let summary = &outcome.summary;
    let buckets = &outcome.buckets;
    let mut out = String::new();
    out.push_str(&format!(
        "{}\n",
        "CredSift: Credential Log Sift Results".bold().cyan()
    ));

    // Totals
    let classified = summary.accepted + summary.invalid();
    let mut total_lines: Vec<String> = Vec::new();
    total_lines.push(format!("Classified lines: {}", classified));
    total_lines.push(format!(
        "Accepted: {} ({})",
        summary.accepted,
        pct(summary.accepted, classified)
    ));
    total_lines.push(format!("Duplicates suppressed: {}", summary.duplicates));
    total_lines.push(format!("Unique records kept: {}", summary.unique()));
    total_lines.push(format!(
        "Invalid/unsupported: {} ({})",
        summary.invalid(),
        pct(summary.invalid(), classified)
    ));
    if summary.fallback_engaged {
        total_lines.push(
            "Encoding: windows-1252 fallback engaged"
                .yellow()
                .to_string(),
        );
    }
    out.push_str(&section_header(&"Totals".bold().yellow().to_string()));
    for line in total_lines {
        out.push_str(&line);
        out.push('\n');
    }

    // Per-host breakdown
    let mut host_lines: Vec<String> = Vec::new();
    let unique = summary.unique();
    for (host, records) in buckets.iter() {
        if records.is_empty() {
            host_lines.push(format!("{}: {}", host, "(no matches)".dimmed()));
        } else {
            host_lines.push(format!(
                "{}: {} ({})",
                host.bold().green(),
                records.len(),
                pct(records.len(), unique)
            ));
        }
    }
    out.push_str(&section_header(&"Host Breakdown".bold().cyan().to_string()));
    for line in host_lines {
        out.push_str(&line);
        out.push('\n');
    }

    // Invalid lines
    let mut invalid_lines: Vec<String> = Vec::new();
    if summary.invalid() == 0 {
        invalid_lines.push("(No invalid lines)".to_string());
    } else {
        invalid_lines.push(format!("Grammar mismatch: {}", summary.grammar_mismatch));
        invalid_lines.push(format!("Empty user/pass: {}", summary.empty_field));
        invalid_lines.push(format!("Unsupported host: {}", summary.unsupported_host));
        for sample in &summary.samples {
            invalid_lines.push(format!("  [{}] {}", sample.reason.red(), sample.line));
        }
    }
    out.push_str(&section_header(&"Invalid Lines".bold().cyan().to_string()));
    for line in invalid_lines {
        out.push_str(&line);
        out.push('\n');
    }

    // Top Reused Passwords
    let mut top_lines: Vec<String> = Vec::new();
    let all_records = buckets.iter().flat_map(|(_, recs)| recs.iter());
    let top: Vec<_> = top_reused_passwords(all_records, top_n)
        .into_iter()
        .filter(|(_, n)| *n > 1)
        .collect();
    if top.is_empty() {
        top_lines.push("(No reused passwords)".to_string());
    } else {
        for (pw, count) in top {
            top_lines.push(format!("  {}: {}", pw, count));
        }
    }
    out.push_str(&section_header(
        &"Top Reused Passwords".bold().magenta().to_string(),
    ));
    for line in top_lines {
        out.push_str(&line);
        out.push('\n');
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::allowlist::AllowList;
    use crate::pipeline::{SiftConfig, Sifter, SiftOutcome};

    fn outcome(input: &[u8], hosts: &[&str]) -> SiftOutcome {
        let mut sifter = Sifter::new(SiftConfig::new(AllowList::new(hosts)));
        sifter.feed_chunk(input);
        sifter.finish()
    }

    #[test]
    fn summary_mentions_hosts_counts_and_sections() {
        let out = outcome(
            b"x.com:a:pw\nx.com:b:pw\nbad-line\n",
            &["x.com", "quiet.com"],
        );
        let s = render_summary(&out);
        assert!(s.contains("Totals"));
        assert!(s.contains("Host Breakdown"));
        assert!(s.contains("x.com"));
        assert!(s.contains("quiet.com"));
        assert!(s.contains("(no matches)"));
        assert!(s.contains("Grammar mismatch: 1"));
        assert!(s.contains("bad-line"));
        assert!(s.contains("pw: 2"));
    }

    #[test]
    fn clean_run_reports_no_invalid_lines() {
        let out = outcome(b"x.com:a:unique1\n", &["x.com"]);
        let s = render_summary(&out);
        assert!(s.contains("(No invalid lines)"));
        assert!(s.contains("(No reused passwords)"));
    }

    #[test]
    fn top_limit_is_respected() {
        let out = outcome(
            b"x.com:a:pw\nx.com:b:pw\nx.com:c:other\nx.com:d:other\nx.com:e:third\nx.com:f:third\n",
            &["x.com"],
        );
        let s = render_summary_with_top(&out, 1);
        // only one reused password may appear
        let reused = ["pw: 2", "other: 2", "third: 2"]
            .iter()
            .filter(|needle| s.contains(**needle))
            .count();
        assert_eq!(reused, 1);
    }

    #[test]
    fn visible_len_ignores_ansi_codes() {
        assert_eq!(visible_len("\u{1b}[1;31mabc\u{1b}[0m"), 3);
        assert_eq!(visible_len("plain"), 5);
    }
}
