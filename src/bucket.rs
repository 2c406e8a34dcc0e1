//! Per-host record buckets.
//!
//! A [`BucketMap`] holds one ordered bucket per allow-listed host, seeded
//! empty at pipeline start so "no matches" is representable. Records are
//! appended in acceptance order and never reordered or merged across hosts.
use std::collections::HashMap;

use crate::allowlist::AllowList;
use crate::record::CredRecord;

/// host -> first-seen-ordered records, covering exactly the allow-list.
#[derive(Debug, Clone)]
pub struct BucketMap {
    hosts: Vec<String>,
    buckets: HashMap<String, Vec<CredRecord>>,
}

impl BucketMap {
    /// Seed an empty bucket for every allow-listed host.
    pub fn with_hosts(allow: &AllowList) -> Self {
        let hosts: Vec<String> = allow.iter().map(str::to_string).collect();
        let buckets = hosts.iter().map(|h| (h.clone(), Vec::new())).collect();
        Self { hosts, buckets }
    }

    /// Append a record to its host's bucket. The pipeline only calls this for
    /// allow-listed hosts; a record for an unknown host is a logic error.
    pub(crate) fn put(&mut self, record: CredRecord) {
        self.buckets
            .get_mut(&record.host)
            .unwrap_or_else(|| panic!("bucket for unfiltered host {:?}", record.host))
            .push(record);
    }

    pub fn get(&self, host: &str) -> Option<&[CredRecord]> {
        self.buckets.get(host).map(Vec::as_slice)
    }

    /// Buckets in allow-list order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[CredRecord])> {
        self.hosts
            .iter()
            .map(|h| (h.as_str(), self.buckets[h].as_slice()))
    }

    /// Hosts that matched at least one record, allow-list order.
    pub fn active_hosts(&self) -> Vec<&str> {
        self.iter()
            .filter(|(_, recs)| !recs.is_empty())
            .map(|(h, _)| h)
            .collect()
    }

    /// Total records across all buckets.
    pub fn total(&self) -> usize {
        self.buckets.values().map(Vec::len).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map() -> BucketMap {
        BucketMap::with_hosts(&AllowList::new(["a.com", "b.com"]))
    }

    #[test]
    fn seeded_empty_for_every_host() {
        let m = map();
        assert_eq!(m.get("a.com"), Some(&[][..]));
        assert_eq!(m.get("b.com"), Some(&[][..]));
        assert_eq!(m.get("c.com"), None);
        assert_eq!(m.total(), 0);
        assert!(m.active_hosts().is_empty());
    }

    #[test]
    fn append_preserves_order_within_bucket() {
        let mut m = map();
        m.put(CredRecord::new("a.com", "u1", "p1"));
        m.put(CredRecord::new("b.com", "u2", "p2"));
        m.put(CredRecord::new("a.com", "u3", "p3"));
        let a = m.get("a.com").unwrap();
        assert_eq!(a[0].user, "u1");
        assert_eq!(a[1].user, "u3");
        assert_eq!(m.total(), 3);
        assert_eq!(m.active_hosts(), vec!["a.com", "b.com"]);
    }

    #[test]
    fn iter_follows_allow_list_order() {
        let m = BucketMap::with_hosts(&AllowList::new(["z.com", "a.com"]));
        let hosts: Vec<_> = m.iter().map(|(h, _)| h).collect();
        assert_eq!(hosts, vec!["z.com", "a.com"]);
    }
}
