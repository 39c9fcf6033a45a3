//! Domain allow/deny policy.
//!
//! Entries in `allowed_domains` / `blocked_domains` are one of:
//! - a hostname, matching itself and every subdomain (`example.com` matches
//!   `www.example.com` but not `badexample.com`)
//! - an IP literal, matching that single address
//! - a CIDR range (`10.0.0.0/8`, `fd00::/8`), matching every address inside it
//!
//! Blocked entries win over allowed entries. An empty allow list allows
//! everything that is not blocked.

use std::fmt;
use std::net::IpAddr;
use std::str::FromStr;

use ipnetwork::IpNetwork;
use url::{Host, Url};

use crate::error_handling::PolicyError;

/// One parsed policy entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainRule {
    /// Hostname, lowercased, without trailing dot
    Host(String),
    /// IP network (single addresses are stored as /32 or /128)
    Network(IpNetwork),
}

impl DomainRule {
    /// Parses one list entry.
    ///
    /// Returns `Ok(None)` for blank entries.
    pub fn parse(list: &'static str, entry: &str) -> Result<Option<Self>, PolicyError> {
        let normalized = entry.trim().to_ascii_lowercase();
        if normalized.is_empty() {
            return Ok(None);
        }
        let unbracketed = normalized.trim_start_matches('[').replace(']', "");

        if unbracketed.contains('/') {
            let network =
                IpNetwork::from_str(&unbracketed).map_err(|e| PolicyError::InvalidCidr {
                    list,
                    entry: entry.trim().to_string(),
                    reason: e.to_string(),
                })?;
            return Ok(Some(DomainRule::Network(network)));
        }

        if let Ok(ip) = IpAddr::from_str(&unbracketed) {
            return Ok(Some(DomainRule::Network(IpNetwork::from(ip))));
        }

        Ok(Some(DomainRule::Host(
            normalized.trim_end_matches('.').to_string(),
        )))
    }

    fn matches(&self, host: &HostKind<'_>) -> bool {
        match (self, host) {
            (DomainRule::Host(rule), HostKind::Name(name)) => {
                name == rule
                    || (name.len() > rule.len()
                        && name.ends_with(rule.as_str())
                        && name.as_bytes()[name.len() - rule.len() - 1] == b'.')
            }
            (DomainRule::Network(network), HostKind::Ip(ip)) => {
                if network.contains(*ip) {
                    return true;
                }
                // ::ffff:a.b.c.d is checked against IPv4 ranges as well
                match ip {
                    IpAddr::V6(v6) => v6
                        .to_ipv4_mapped()
                        .is_some_and(|v4| network.contains(IpAddr::V4(v4))),
                    IpAddr::V4(_) => false,
                }
            }
            _ => false,
        }
    }
}

impl fmt::Display for DomainRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DomainRule::Host(host) => f.write_str(host),
            DomainRule::Network(network) => write!(f, "{}", network),
        }
    }
}

enum HostKind<'a> {
    Name(&'a str),
    Ip(IpAddr),
}

/// Result of evaluating a URL against the policy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PolicyDecision {
    Allowed,
    /// Matched a blocked entry
    Blocked(DomainRule),
    /// Allow list is non-empty and nothing in it matched
    NotAllowed,
    /// URL has no host to evaluate
    NoHost,
}

impl PolicyDecision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, PolicyDecision::Allowed)
    }
}

impl fmt::Display for PolicyDecision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PolicyDecision::Allowed => f.write_str("allowed"),
            PolicyDecision::Blocked(rule) => write!(f, "blocked by '{}'", rule),
            PolicyDecision::NotAllowed => f.write_str("not in allow list"),
            PolicyDecision::NoHost => f.write_str("no host"),
        }
    }
}

/// Compiled allow/deny policy.
#[derive(Debug, Clone, Default)]
pub struct DomainPolicy {
    allowed: Vec<DomainRule>,
    blocked: Vec<DomainRule>,
}

impl DomainPolicy {
    /// Compiles the configured lists.
    ///
    /// # Errors
    ///
    /// Returns `PolicyError::InvalidCidr` if an entry containing `/` is not a
    /// valid CIDR range.
    pub fn from_config(allowed: &[String], blocked: &[String]) -> Result<Self, PolicyError> {
        let parse_all = |list: &'static str, entries: &[String]| {
            entries
                .iter()
                .filter_map(|entry| DomainRule::parse(list, entry).transpose())
                .collect::<Result<Vec<_>, _>>()
        };
        Ok(DomainPolicy {
            allowed: parse_all("allowed_domains", allowed)?,
            blocked: parse_all("blocked_domains", blocked)?,
        })
    }

    pub fn allowed_count(&self) -> usize {
        self.allowed.len()
    }

    pub fn blocked_count(&self) -> usize {
        self.blocked.len()
    }

    /// Evaluates `url` against the blocked list, then the allow list.
    pub fn evaluate(&self, url: &Url) -> PolicyDecision {
        let lowered;
        let host = match url.host() {
            Some(Host::Domain(domain)) => {
                lowered = domain.trim_end_matches('.').to_ascii_lowercase();
                HostKind::Name(&lowered)
            }
            Some(Host::Ipv4(ip)) => HostKind::Ip(IpAddr::V4(ip)),
            Some(Host::Ipv6(ip)) => HostKind::Ip(IpAddr::V6(ip)),
            None => return PolicyDecision::NoHost,
        };

        if let Some(rule) = self.blocked.iter().find(|rule| rule.matches(&host)) {
            return PolicyDecision::Blocked(rule.clone());
        }
        if self.allowed.is_empty() || self.allowed.iter().any(|rule| rule.matches(&host)) {
            PolicyDecision::Allowed
        } else {
            PolicyDecision::NotAllowed
        }
    }

    /// Returns `true` if the URL may be visited.
    pub fn is_url_allowed(&self, url: &Url) -> bool {
        self.evaluate(url).is_allowed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_BLOCKED_DOMAINS;

    fn policy(allowed: &[&str], blocked: &[&str]) -> DomainPolicy {
        let to_vec = |v: &[&str]| v.iter().map(|s| s.to_string()).collect::<Vec<_>>();
        DomainPolicy::from_config(&to_vec(allowed), &to_vec(blocked)).unwrap()
    }

    fn default_policy() -> DomainPolicy {
        policy(&[], DEFAULT_BLOCKED_DOMAINS)
    }

    fn allowed(policy: &DomainPolicy, url: &str) -> bool {
        policy.is_url_allowed(&Url::parse(url).unwrap())
    }

    #[test]
    fn test_default_blocks_loopback_variants() {
        let p = default_policy();
        assert!(!allowed(&p, "http://localhost/"));
        assert!(!allowed(&p, "http://LOCALHOST./admin"));
        assert!(!allowed(&p, "http://app.localhost:8080/"));
        assert!(!allowed(&p, "http://127.0.0.1/"));
        assert!(!allowed(&p, "http://127.1.2.3/"));
        assert!(!allowed(&p, "http://0.0.0.0/"));
        assert!(!allowed(&p, "http://[::1]/"));
        assert!(!allowed(&p, "http://169.254.169.254/latest/meta-data"));
    }

    #[test]
    fn test_default_blocks_private_and_link_local_ranges() {
        let p = default_policy();
        assert!(!allowed(&p, "http://10.0.0.1/"));
        assert!(!allowed(&p, "http://172.16.5.4/"));
        assert!(!allowed(&p, "http://172.31.255.255/"));
        assert!(!allowed(&p, "http://192.168.1.1/"));
        assert!(!allowed(&p, "http://169.254.1.1/"));
        assert!(!allowed(&p, "http://[fd00::1]/"));
        assert!(!allowed(&p, "http://[fe80::1]/"));
        assert!(!allowed(&p, "http://[::ffff:192.168.0.1]/"));
        assert!(allowed(&p, "http://172.32.0.1/"));
        assert!(allowed(&p, "http://192.169.0.1/"));
    }

    #[test]
    fn test_default_allows_public_hosts() {
        let p = default_policy();
        assert!(allowed(&p, "https://example.com/"));
        assert!(allowed(&p, "https://notlocalhost.com/"));
        assert!(allowed(&p, "http://93.184.216.34/"));
        assert!(allowed(&p, "http://[2606:4700::1111]/"));
    }

    #[test]
    fn test_numeric_host_forms_are_normalized() {
        // The URL parser turns these into 127.0.0.1
        let p = default_policy();
        assert!(!allowed(&p, "http://2130706433/"));
        assert!(!allowed(&p, "http://0x7f.1/"));
    }

    #[test]
    fn test_ipv4_mapped_ipv6_checked_against_ipv4_ranges() {
        let p = default_policy();
        assert!(!allowed(&p, "http://[::ffff:127.0.0.1]/"));
        assert!(!allowed(&p, "http://[::ffff:169.254.169.254]/"));
    }

    #[test]
    fn test_ipv6_cidr_compressed_forms() {
        let p = policy(&[], &["fd00::/8", "2001:db8::/32"]);
        assert!(!allowed(&p, "http://[fd12:3456::1]/"));
        assert!(!allowed(&p, "http://[2001:0db8:0000:0000:0000:0000:0000:0001]/"));
        assert!(allowed(&p, "http://[2001:db9::1]/"));
    }

    #[test]
    fn test_subdomain_suffix_requires_label_boundary() {
        let p = policy(&[], &["example.com"]);
        assert!(!allowed(&p, "https://example.com/"));
        assert!(!allowed(&p, "https://deep.sub.example.com/"));
        assert!(allowed(&p, "https://badexample.com/"));
        assert!(allowed(&p, "https://example.com.evil.net/"));
    }

    #[test]
    fn test_allow_list_restricts() {
        let p = policy(&["example.com", "10.1.0.0/16"], &["admin.example.com"]);
        assert!(allowed(&p, "https://www.example.com/"));
        assert!(allowed(&p, "http://10.1.2.3/"));
        assert!(!allowed(&p, "https://other.org/"));
        assert!(!allowed(&p, "http://10.2.0.1/"));
        // Blocked wins over allowed
        assert_eq!(
            p.evaluate(&Url::parse("https://admin.example.com/").unwrap()),
            PolicyDecision::Blocked(DomainRule::Host("admin.example.com".into()))
        );
        assert_eq!(
            p.evaluate(&Url::parse("https://other.org/").unwrap()),
            PolicyDecision::NotAllowed
        );
    }

    #[test]
    fn test_entries_are_normalized() {
        let p = policy(&[], &["  Example.COM.  ", "[::1]", ""]);
        assert_eq!(p.blocked_count(), 2);
        assert!(!allowed(&p, "https://www.example.com/"));
    }

    #[test]
    fn test_invalid_cidr_is_an_error() {
        let err = DomainPolicy::from_config(&[], &["10.0.0.0/33".to_string()]).unwrap_err();
        assert!(err.to_string().contains("10.0.0.0/33"));
        assert!(DomainPolicy::from_config(&["not-a-net/8".to_string()], &[]).is_err());
    }

    #[test]
    fn test_url_without_host() {
        let p = default_policy();
        let url = Url::parse("data:text/plain,hello").unwrap();
        assert_eq!(p.evaluate(&url), PolicyDecision::NoHost);
    }

    use proptest::prelude::*;

    proptest! {
        #[test]
        fn prop_subdomains_of_blocked_host_are_blocked(
            labels in prop::collection::vec("[a-z][a-z0-9]{0,8}", 0..4),
            domain in "[a-z]{3,12}",
            tld in "(com|org|net|jp)"
        ) {
            let blocked = format!("{}.{}", domain, tld);
            let p = policy(&[], &[blocked.as_str()]);
            let mut host = labels.join(".");
            if !host.is_empty() {
                host.push('.');
            }
            host.push_str(&blocked);
            let url = format!("https://{}/", host);
            prop_assert!(!allowed(&p, &url));
        }

        #[test]
        fn prop_ipv4_inside_blocked_cidr(b in 0u8..=255, c in 0u8..=255, d in 0u8..=255) {
            let p = policy(&[], &["10.0.0.0/8"]);
            let inside = format!("http://10.{}.{}.{}/", b, c, d);
            let outside = format!("http://11.{}.{}.{}/", b, c, d);
            prop_assert!(!allowed(&p, &inside));
            prop_assert!(allowed(&p, &outside));
        }

        #[test]
        fn prop_evaluate_never_panics(host in "[a-zA-Z0-9.-]{1,40}") {
            let p = default_policy();
            if let Ok(url) = Url::parse(&format!("http://{}/", host)) {
                let _ = p.evaluate(&url);
            }
        }
    }
}
