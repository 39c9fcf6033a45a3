//! Validated target URLs.

use std::fmt;

use url::Url;

use crate::config::{INVALID_HOST_GROUP, MAX_URL_LENGTH};

/// Why a line of the URL list was rejected before policy evaluation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvalidReason {
    TooLong(usize),
    Unparsable(String),
    UnsupportedScheme(String),
    MissingHost,
}

impl fmt::Display for InvalidReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InvalidReason::TooLong(len) => {
                write!(f, "exceeds {} characters ({})", MAX_URL_LENGTH, len)
            }
            InvalidReason::Unparsable(e) => write!(f, "cannot be parsed: {}", e),
            InvalidReason::UnsupportedScheme(scheme) => {
                write!(f, "unsupported scheme '{}' (only http and https)", scheme)
            }
            InvalidReason::MissingHost => f.write_str("has no host"),
        }
    }
}

/// An absolute http(s) URL that passed syntactic validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetUrl {
    url: Url,
}

impl TargetUrl {
    /// Parses and validates one candidate.
    pub fn parse(raw: &str) -> Result<Self, InvalidReason> {
        let raw = raw.trim();
        if raw.len() > MAX_URL_LENGTH {
            return Err(InvalidReason::TooLong(raw.len()));
        }
        let url = Url::parse(raw).map_err(|e| InvalidReason::Unparsable(e.to_string()))?;
        match url.scheme() {
            "http" | "https" => {}
            scheme => return Err(InvalidReason::UnsupportedScheme(scheme.to_string())),
        }
        match url.host_str() {
            Some(host) if !host.is_empty() => Ok(TargetUrl { url }),
            _ => Err(InvalidReason::MissingHost),
        }
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn as_str(&self) -> &str {
        self.url.as_str()
    }

    /// Hostname used to group URLs for scheduling.
    ///
    /// Lowercased with any trailing dot removed, so `Example.com.` and
    /// `example.com` share one gate.
    pub fn host_key(&self) -> String {
        host_key(&self.url)
    }
}

/// Scheduling key for any URL; URLs without a host fall into one sentinel group.
pub fn host_key(url: &Url) -> String {
    match url.host_str() {
        Some(host) if !host.is_empty() => host.trim_end_matches('.').to_ascii_lowercase(),
        _ => INVALID_HOST_GROUP.to_string(),
    }
}

impl fmt::Display for TargetUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
