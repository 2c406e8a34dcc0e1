//! Host allow-list: the fixed set of hosts the run retains records for.
//!
//! Membership is O(1); the original insertion order is kept so buckets and
//! reports come out in a stable, caller-chosen order. Entries are lowercased
//! on insert and matched against already-lowercased hosts.
use std::collections::HashSet;

/// Ordered set of supported hosts.
#[derive(Debug, Clone, Default)]
pub struct AllowList {
    order: Vec<String>,
    set: HashSet<String>,
}

impl AllowList {
    /// Garena SSO/connect endpoints, the built-in default host set.
    pub const GARENA_DEFAULTS: [&'static str; 9] = [
        "authgop.garena.com",
        "sso.garena.com",
        "100082.connect.garena.com",
        "100055.connect.garena.com",
        "100054.connect.garena.com",
        "auth.garena.com",
        "account.garena.com",
        "100072.connect.garena.com",
        "com.garena.gaslite",
    ];

    pub fn new<I, S>(hosts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut list = Self::default();
        for h in hosts {
            list.insert(h.as_ref());
        }
        list
    }

    pub fn garena_defaults() -> Self {
        Self::new(Self::GARENA_DEFAULTS)
    }

    /// Parse one host per line; blank lines are skipped, entries trimmed.
    pub fn parse(contents: &str) -> Self {
        Self::new(contents.lines().map(|l| l.trim()).filter(|l| !l.is_empty()))
    }

    fn insert(&mut self, host: &str) {
        let host = host.trim().to_lowercase();
        if host.is_empty() || self.set.contains(&host) {
            return;
        }
        self.order.push(host.clone());
        self.set.insert(host);
    }

    pub fn contains(&self, host: &str) -> bool {
        self.set.contains(host)
    }

    /// Hosts in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lowercases_and_preserves_order() {
        let a = AllowList::new(["B.com", "a.COM", "b.com"]);
        assert_eq!(a.len(), 2);
        assert!(a.contains("b.com"));
        assert!(a.contains("a.com"));
        assert!(!a.contains("B.com"));
        assert_eq!(a.iter().collect::<Vec<_>>(), vec!["b.com", "a.com"]);
    }

    #[test]
    fn parse_trims_and_ignores_blank() {
        let a = AllowList::parse("\nx.com\n \n Y.com \n");
        assert_eq!(a.iter().collect::<Vec<_>>(), vec!["x.com", "y.com"]);
    }

    #[test]
    fn garena_defaults_complete() {
        let a = AllowList::garena_defaults();
        assert_eq!(a.len(), 9);
        assert!(a.contains("sso.garena.com"));
        assert!(a.contains("com.garena.gaslite"));
    }
}
