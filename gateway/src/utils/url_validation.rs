//! Validation of audio download URLs returned by providers.
//!
//! A JSON reply may point at a file to download, and the gateway fetches it
//! server-side. Only absolute `http` and `https` URLs with a host are
//! fetched, and hosts that name a loopback, private, link-local or otherwise
//! internal address are refused so a provider reply cannot steer requests
//! into the local network. Loopback may be allowed for local development.
//!
//! Hostnames are checked by name only (`localhost` and `*.localhost`); what
//! a public name resolves to is left to the resolver.

use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

use thiserror::Error;
use tracing::warn;
use url::{Host, Url};

/// Errors that can occur during URL validation
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum UrlValidationError {
    #[error("Invalid URL format: {0}")]
    InvalidFormat(#[from] url::ParseError),

    #[error("URL scheme must be http or https, got: {0}")]
    UnsupportedScheme(String),

    #[error("URL must have a host")]
    MissingHost,

    #[error("URL must not embed credentials")]
    EmbeddedCredentials,

    #[error("URL points at a private/internal address: {0}")]
    PrivateAddress(String),
}

/// Checks if an IPv4 address is private/internal
///
/// Private addresses include:
/// - Loopback (127.0.0.0/8)
/// - Private (10.0.0.0/8, 172.16.0.0/12, 192.168.0.0/16)
/// - Link-local (169.254.0.0/16), which hosts cloud metadata services
/// - Broadcast and unspecified
/// - Shared (100.64.0.0/10 - CGNAT)
pub fn is_private_ipv4(ip: &Ipv4Addr) -> bool {
    if ip.is_loopback()
        || ip.is_private()
        || ip.is_link_local()
        || ip.is_broadcast()
        || ip.is_unspecified()
    {
        return true;
    }
    let octets = ip.octets();
    // Shared address space (CGNAT) 100.64.0.0/10
    octets[0] == 100 && (octets[1] & 0xC0) == 64
}

/// Checks if an IPv6 address is private/internal
///
/// Covers loopback, unspecified, link-local (fe80::/10), unique local
/// (fc00::/7) and IPv4-mapped private addresses.
pub fn is_private_ipv6(ip: &Ipv6Addr) -> bool {
    if ip.is_loopback() || ip.is_unspecified() {
        return true;
    }
    let segments = ip.segments();
    // Link-local (fe80::/10)
    if segments[0] & 0xFFC0 == 0xFE80 {
        return true;
    }
    // Unique local address (fc00::/7)
    if segments[0] & 0xFE00 == 0xFC00 {
        return true;
    }
    if let Some(ipv4) = ip.to_ipv4_mapped() {
        return is_private_ipv4(&ipv4);
    }
    false
}

/// Checks if an IP address is private/internal
pub fn is_private_ip(ip: &IpAddr) -> bool {
    match ip {
        IpAddr::V4(ipv4) => is_private_ipv4(ipv4),
        IpAddr::V6(ipv6) => is_private_ipv6(ipv6),
    }
}

fn is_localhost_name(domain: &str) -> bool {
    let domain = domain.trim_end_matches('.').to_ascii_lowercase();
    domain == "localhost" || domain.ends_with(".localhost")
}

/// Parse and check an audio pointer URL.
///
/// With `allow_localhost` set, loopback hosts (`localhost`, `127.0.0.0/8`,
/// `::1`) are accepted. Other private ranges are refused either way.
pub fn validate_audio_url(raw: &str, allow_localhost: bool) -> Result<Url, UrlValidationError> {
    let parsed = Url::parse(raw.trim())?;

    match parsed.scheme() {
        "http" | "https" => {}
        other => {
            warn!(scheme = %other, "Rejected audio URL scheme");
            return Err(UrlValidationError::UnsupportedScheme(other.to_string()));
        }
    }

    if !parsed.username().is_empty() || parsed.password().is_some() {
        return Err(UrlValidationError::EmbeddedCredentials);
    }

    let ip_flags = |ip: IpAddr| (is_private_ip(&ip), ip.is_loopback());
    let (private, loopback) = match parsed.host() {
        Some(Host::Ipv4(ip)) => ip_flags(IpAddr::V4(ip)),
        Some(Host::Ipv6(ip)) => ip_flags(IpAddr::V6(ip)),
        Some(Host::Domain(domain)) if domain.is_empty() => {
            return Err(UrlValidationError::MissingHost);
        }
        Some(Host::Domain(domain)) => {
            let local = is_localhost_name(domain);
            (local, local)
        }
        None => return Err(UrlValidationError::MissingHost),
    };

    if private && !(allow_localhost && loopback) {
        let host = parsed.host_str().unwrap_or_default().to_string();
        warn!(host = %host, "Rejected audio URL pointing at internal address");
        return Err(UrlValidationError::PrivateAddress(host));
    }

    Ok(parsed)
}
