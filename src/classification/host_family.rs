//! Address family of a URL's hostname.

use std::net::{Ipv4Addr, Ipv6Addr};

use serde::Serialize;
use strum::{Display, IntoStaticStr};
use url::{Host, Url};

use crate::errors::AppResult;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, IntoStaticStr, Serialize)]
pub enum AddressFamily {
    #[strum(serialize = "IPv4")]
    #[serde(rename = "IPv4")]
    IPv4,
    #[strum(serialize = "IPv6")]
    #[serde(rename = "IPv6")]
    IPv6,
    /// Domain names, missing hosts and anything that is not an IP literal
    Unknown,
}

/// Classify the hostname of `url` as an IPv4 literal, an IPv6 literal, or
/// neither. URL parse failures propagate.
pub fn classify_host_family(url: &str) -> AppResult<AddressFamily> {
    let parsed = Url::parse(url)?;

    let family = match parsed.host() {
        Some(Host::Ipv4(_)) => AddressFamily::IPv4,
        Some(Host::Ipv6(_)) => AddressFamily::IPv6,
        // Non-special schemes (rtmp://, rtsp://) keep an opaque host string
        Some(Host::Domain(domain)) => family_of_literal(domain),
        None => AddressFamily::Unknown,
    };
    Ok(family)
}

fn family_of_literal(host: &str) -> AddressFamily {
    let host = host.trim_start_matches('[').trim_end_matches(']');
    if host.parse::<Ipv4Addr>().is_ok() {
        AddressFamily::IPv4
    } else if host.parse::<Ipv6Addr>().is_ok() {
        AddressFamily::IPv6
    } else {
        AddressFamily::Unknown
    }
}
