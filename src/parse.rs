//! The loose `host:user:pass` line grammar.
//!
//! A record line is an optional case-insensitive `http://`/`https://` prefix
//! followed by three colon-delimited fields, where the password is everything
//! after the second colon (further colons included). Host and user therefore
//! cannot contain colons; a username with a colon in it silently shifts the
//! fields, exactly as the source data format does. Matching happens on raw
//! bytes so each captured field can be decoded independently; the whole line
//! is whitespace-trimmed before matching and each field after decoding.
use regex::bytes::Regex;

use crate::decode::FieldDecoder;
use crate::record::CredRecord;

/// Why a non-blank line was rejected. `Display` gives the diagnostic tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum RejectReason {
    #[error("grammar-mismatch")]
    GrammarMismatch,
    #[error("empty-field")]
    EmptyField,
    #[error("filtered-out")]
    UnsupportedHost,
}

/// Classification of one raw line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseOutcome {
    /// Whitespace-only line; not counted at all.
    Blank,
    Record(CredRecord),
    Rejected(RejectReason),
}

/// Byte-level parser for the record grammar, carrying the run's decoder.
#[derive(Debug)]
pub struct RecordParser {
    grammar: Regex,
    decoder: FieldDecoder,
}

impl Default for RecordParser {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordParser {
    pub fn new() -> Self {
        // (?-u) so fields match arbitrary non-UTF-8 bytes; colons are ASCII
        // either way, so field boundaries are encoding-independent.
        let grammar = Regex::new(r"(?-u)(?i)^(?:https?://)?([^:]+):([^:]+):(.+)$")
            .expect("line grammar regex");
        Self {
            grammar,
            decoder: FieldDecoder::new(),
        }
    }

    /// Whether any field so far needed the windows-1252 fallback.
    pub fn fallback_engaged(&self) -> bool {
        self.decoder.fallback_engaged()
    }

    /// Classify one raw line (no trailing newline).
    pub fn parse(&mut self, raw: &[u8]) -> ParseOutcome {
        let line = raw.trim_ascii();
        if line.is_empty() {
            return ParseOutcome::Blank;
        }
        let Some(caps) = self.grammar.captures(line) else {
            return ParseOutcome::Rejected(RejectReason::GrammarMismatch);
        };

        let host = self.decoder.decode(&caps[1]);
        let user = self.decoder.decode(&caps[2]);
        let pass = self.decoder.decode(&caps[3]);

        let host = host.trim().to_lowercase();
        let user = user.trim();
        let pass = pass.trim();
        if host.is_empty() || user.is_empty() || pass.is_empty() {
            return ParseOutcome::Rejected(RejectReason::EmptyField);
        }
        ParseOutcome::Record(CredRecord::new(host, user, pass))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(parser: &mut RecordParser, line: &[u8]) -> CredRecord {
        match parser.parse(line) {
            ParseOutcome::Record(r) => r,
            other => panic!("expected record, got {:?}", other),
        }
    }

    #[test]
    fn scheme_stripped_host_lowercased_colons_kept_in_pass() {
        let mut p = RecordParser::new();
        let r = record(&mut p, b"HTTPS://Sso.Garena.com:alice:p@ss:word");
        assert_eq!(r.host, "sso.garena.com");
        assert_eq!(r.user, "alice");
        assert_eq!(r.pass, "p@ss:word");
    }

    #[test]
    fn plain_http_scheme_and_surrounding_whitespace() {
        let mut p = RecordParser::new();
        let r = record(&mut p, b"  http://x.com:bob:pw \r");
        assert_eq!(r.host, "x.com");
        assert_eq!(r.user, "bob");
        assert_eq!(r.pass, "pw");
    }

    #[test]
    fn no_scheme_is_fine() {
        let mut p = RecordParser::new();
        let r = record(&mut p, b"x.com:bob:pw");
        assert_eq!(r.host, "x.com");
    }

    #[test]
    fn missing_colons_is_grammar_mismatch() {
        let mut p = RecordParser::new();
        assert_eq!(
            p.parse(b"not-a-valid-line"),
            ParseOutcome::Rejected(RejectReason::GrammarMismatch)
        );
        assert_eq!(
            p.parse(b"host:only-one-colon"),
            ParseOutcome::Rejected(RejectReason::GrammarMismatch)
        );
    }

    #[test]
    fn whitespace_only_user_is_empty_field() {
        let mut p = RecordParser::new();
        assert_eq!(
            p.parse(b"x.com:  :pw"),
            ParseOutcome::Rejected(RejectReason::EmptyField)
        );
    }

    #[test]
    fn whitespace_only_pass_is_trimmed_into_grammar_mismatch() {
        // line-level trimming removes the trailing run, leaving "x.com:bob:"
        let mut p = RecordParser::new();
        assert_eq!(
            p.parse(b"x.com:bob: \t "),
            ParseOutcome::Rejected(RejectReason::GrammarMismatch)
        );
    }

    #[test]
    fn blank_lines_are_blank_not_invalid() {
        let mut p = RecordParser::new();
        assert_eq!(p.parse(b""), ParseOutcome::Blank);
        assert_eq!(p.parse(b"   \r"), ParseOutcome::Blank);
    }

    #[test]
    fn colon_in_username_shifts_fields() {
        // known grammar ambiguity, preserved deliberately
        let mut p = RecordParser::new();
        let r = record(&mut p, b"x.com:us:er:pw");
        assert_eq!(r.user, "us");
        assert_eq!(r.pass, "er:pw");
    }

    #[test]
    fn non_utf8_fields_decode_via_fallback() {
        let mut p = RecordParser::new();
        let r = record(&mut p, b"x.com:caf\xE9:s\xFCper");
        assert_eq!(r.user, "café");
        assert_eq!(r.pass, "süper");
        assert!(p.fallback_engaged());
    }

    #[test]
    fn reject_tags_for_diagnostics() {
        assert_eq!(RejectReason::GrammarMismatch.to_string(), "grammar-mismatch");
        assert_eq!(RejectReason::UnsupportedHost.to_string(), "filtered-out");
    }
}
