//! Credential record data model.
//!
//! A [`CredRecord`] is one extracted `host:user:pass` entry: host lowercase
//! and scheme-stripped, all three fields trimmed and non-empty. Records are
//! deduplicated by their [`CredRecord::fingerprint`], the joined
//! `host:user:pass` string. Passwords may themselves contain `:`; two
//! distinct triples can in principle join to the same key, a collision risk
//! the dedup layer knowingly tolerates.
use std::fmt;

use serde::Serialize;

/// One parsed credential entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct CredRecord {
    pub host: String,
    pub user: String,
    pub pass: String,
}

impl CredRecord {
    pub fn new(host: impl Into<String>, user: impl Into<String>, pass: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            user: user.into(),
            pass: pass.into(),
        }
    }

    /// Dedup key: the joined triple, colon-separated.
    pub fn fingerprint(&self) -> String {
        format!("{}:{}:{}", self.host, self.user, self.pass)
    }
}

impl fmt::Display for CredRecord {
    /// Renders the export form `host:user:pass`, fields verbatim.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.host, self.user, self.pass)
    }
}
