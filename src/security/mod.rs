//! URL security policy.
//!
//! Decides which hosts may be visited at all, before any browser activity:
//! - Hostname allow/deny lists with subdomain matching
//! - IP literal and CIDR ranges (IPv4 and IPv6)

mod policy;

pub use policy::{DomainPolicy, DomainRule, PolicyDecision};
