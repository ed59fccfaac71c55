//! Validation of external URLs shown in a modal iframe.
//!
//! A pure predicate over the URL text: no DNS lookups, so a public hostname
//! that resolves to a private address is not caught here.

use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

use url::{Host, Url};

use crate::config::{Config, EnvironmentType};

/// Domain lists and environment used to validate modal URLs.
#[derive(Debug, Clone, Default)]
pub struct UrlPolicy {
    allowed_domains: Vec<String>,
    blocked_domains: Vec<String>,
    environment: EnvironmentType,
}

impl UrlPolicy {
    /// Build a policy. Domain entries are matched case-insensitively as
    /// substrings of the host; blank entries are ignored.
    pub fn new(
        allowed_domains: Vec<String>,
        blocked_domains: Vec<String>,
        environment: EnvironmentType,
    ) -> Self {
        let normalize = |list: Vec<String>| -> Vec<String> {
            list.into_iter()
                .map(|d| d.trim().to_lowercase())
                .filter(|d| !d.is_empty())
                .collect()
        };
        Self {
            allowed_domains: normalize(allowed_domains),
            blocked_domains: normalize(blocked_domains),
            environment,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.allowed_domains.clone(),
            config.blocked_domains.clone(),
            config.environment,
        )
    }

    /// Whether `url` may be displayed.
    ///
    /// Checked in order: parseable absolute URL, `http`/`https` scheme,
    /// blocklist, allowlist (only when non-empty), then local or private
    /// hosts, which are allowed only in the local environment.
    pub fn validate(&self, url: &str) -> bool {
        let url = url.trim();
        if url.is_empty() {
            return false;
        }

        let Ok(parsed) = Url::parse(url) else {
            return false;
        };

        if !matches!(parsed.scheme(), "http" | "https") {
            return false;
        }

        let Some(host) = parsed.host() else {
            return false;
        };
        let host_name = host.to_string().to_lowercase();

        if self
            .blocked_domains
            .iter()
            .any(|blocked| host_name.contains(blocked.as_str()))
        {
            return false;
        }

        if !self.allowed_domains.is_empty()
            && !self
                .allowed_domains
                .iter()
                .any(|allowed| host_name.contains(allowed.as_str()))
        {
            return false;
        }

        if is_local_host(&host) {
            return self.environment.is_local();
        }

        true
    }
}

/// Loopback, private, link-local or unspecified addresses, plus `localhost`
/// and its subdomains.
pub fn is_local_host(host: &Host<&str>) -> bool {
    match host {
        Host::Domain(domain) => {
            let domain = domain.trim_end_matches('.').to_lowercase();
            domain == "localhost" || domain.ends_with(".localhost")
        }
        Host::Ipv4(ip) => is_local_ipv4(*ip),
        Host::Ipv6(ip) => is_local_ipv6(*ip),
    }
}

/// [`is_local_host`] for an address.
pub fn is_local_ip(ip: IpAddr) -> bool {
    match ip {
        IpAddr::V4(ip) => is_local_ipv4(ip),
        IpAddr::V6(ip) => is_local_ipv6(ip),
    }
}

fn is_local_ipv4(ip: Ipv4Addr) -> bool {
    ip.is_loopback() || ip.is_private() || ip.is_link_local() || ip.is_unspecified()
}

fn is_local_ipv6(ip: Ipv6Addr) -> bool {
    if let Some(mapped) = ip.to_ipv4_mapped() {
        return is_local_ipv4(mapped);
    }
    let first = ip.segments()[0];
    let unique_local = (first & 0xfe00) == 0xfc00;
    let link_local = (first & 0xffc0) == 0xfe80;
    ip.is_loopback() || ip.is_unspecified() || unique_local || link_local
}
