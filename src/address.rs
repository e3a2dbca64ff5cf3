use std::net::{Ipv4Addr, SocketAddr, SocketAddrV4};

use log::debug;
use tokio::net::lookup_host;

use crate::error::SampQueryError;

/// The port every SA-MP server uses by default.
pub const DEFAULT_PORT: u16 = 7777;

/// Resolve `host` to the single IPv4 address a session talks to.
///
/// Dotted-quad literals are used as-is; anything else goes through DNS and
/// the first IPv4 result wins.
pub async fn resolve(host: &str, port: u16) -> Result<SocketAddrV4, SampQueryError> {
    if let Some(ip) = parse_ipv4(host) {
        return Ok(SocketAddrV4::new(ip, port));
    }

    let resolved = lookup_host((host, port))
        .await
        .map_err(|err| SampQueryError::HostResolution(host.to_owned(), err))?
        .find_map(|addr| match addr {
            SocketAddr::V4(v4) => Some(v4),
            SocketAddr::V6(_) => None,
        })
        .ok_or_else(|| SampQueryError::NoIpv4Address(host.to_owned()))?;

    debug!("resolved {host} to {resolved}");
    Ok(resolved)
}

/// Split `host[:port]`, using [DEFAULT_PORT] if no port is given.
///
/// IPv6 addresses are rejected, the query protocol only carries IPv4.
pub fn split_host_port(input: &str) -> Result<(String, u16), SampQueryError> {
    if input.matches(':').count() > 1 {
        return Err(SampQueryError::UnsupportedAddress(input.to_owned()));
    }

    match input.split_once(':') {
        Some((host, port)) => {
            if !is_port_valid(port) {
                return Err(SampQueryError::InvalidPort(port.to_owned()));
            }
            let port: u16 = port.parse().map_err(|_| SampQueryError::InvalidPort(port.to_owned()))?;
            Ok((host.to_owned(), port))
        }
        None => Ok((input.to_owned(), DEFAULT_PORT)),
    }
}

/// True if `port` is an integer between 0 and 65535.
pub fn is_port_valid(port: &str) -> bool {
    port.parse::<i64>()
        .map(|n| (0..=u16::MAX as i64).contains(&n))
        .unwrap_or(false)
}

/// Parse a dotted-quad IPv4 address.
/// Leading zeros are accepted, so `010.0.0.1` is `10.0.0.1`.
pub fn parse_ipv4(address: &str) -> Option<Ipv4Addr> {
    let mut octets = [0u8; 4];
    let mut parts = address.split('.');
    for octet in octets.iter_mut() {
        let part = parts.next()?;
        if !(1..=3).contains(&part.len()) || !part.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        *octet = part.parse().ok()?;
    }
    match parts.next() {
        Some(_) => None,
        None => Some(Ipv4Addr::from(octets)),
    }
}
