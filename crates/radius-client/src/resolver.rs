//! Server address parsing and resolution
//!
//! Accepted forms:
//! - `10.0.0.1`, `10.0.0.1:1813`
//! - `radius.example.com`, `radius.example.com:1813`
//! - `::1`, `[::1]`, `[::1]:1813`
//! - `unix:/run/radiusd.sock`
//!
//! A host name may resolve to several addresses; they all land in the same
//! target group, in resolver order.

use std::net::{IpAddr, SocketAddr, ToSocketAddrs};
#[cfg(unix)]
use std::path::PathBuf;

use tracing::debug;

use crate::config::ServerEntry;
use crate::connection::{Candidate, ConnectionError, ConnectionResult, TargetGroup};

/// Default RADIUS authentication port
pub const DEFAULT_PORT: u16 = 1812;

/// Split `addr` into host and optional port
fn split_host_port(addr: &str) -> ConnectionResult<(&str, Option<&str>)> {
    if let Some(rest) = addr.strip_prefix('[') {
        let close = rest
            .find(']')
            .ok_or_else(|| ConnectionError::Resolution(format!("IPv6 address lacks ']': {}", addr)))?;
        let host = &rest[..close];
        let tail = &rest[close + 1..];
        return match tail.strip_prefix(':') {
            Some(port) if !port.is_empty() => Ok((host, Some(port))),
            None if tail.is_empty() => Ok((host, None)),
            _ => Err(ConnectionError::Resolution(format!(
                "Bad port separator in {}",
                addr
            ))),
        };
    }

    match addr.rfind(':') {
        // More than one colon without brackets is a bare IPv6 address
        Some(pos) if !addr[..pos].contains(':') => Ok((&addr[..pos], Some(&addr[pos + 1..]))),
        _ => Ok((addr, None)),
    }
}

/// Resolve one server address into connection candidates
pub fn resolve_address(addr: &str, default_port: u16) -> ConnectionResult<Vec<Candidate>> {
    let addr = addr.trim();
    if addr.is_empty() {
        return Err(ConnectionError::Resolution("Empty address".to_string()));
    }

    if let Some(path) = addr.strip_prefix("unix:") {
        return unix_candidate(path);
    }

    if let Ok(socket_addr) = addr.parse::<SocketAddr>() {
        return Ok(vec![Candidate::from(socket_addr)]);
    }

    let (host, port) = split_host_port(addr)?;
    let port = match port {
        Some(port) => port
            .parse::<u16>()
            .map_err(|_| ConnectionError::Resolution(format!("Invalid port in {}", addr)))?,
        None => default_port,
    };

    if let Ok(ip) = host.parse::<IpAddr>() {
        return Ok(vec![Candidate::from(SocketAddr::new(ip, port))]);
    }

    let candidates: Vec<Candidate> = (host, port)
        .to_socket_addrs()
        .map_err(|e| ConnectionError::Resolution(format!("{}: {}", addr, e)))?
        .map(Candidate::from)
        .collect();

    if candidates.is_empty() {
        return Err(ConnectionError::Resolution(format!("{}: no addresses", addr)));
    }

    debug!(address = %addr, count = candidates.len(), "Resolved server address");
    Ok(candidates)
}

#[cfg(unix)]
fn unix_candidate(path: &str) -> ConnectionResult<Vec<Candidate>> {
    if path.is_empty() {
        return Err(ConnectionError::Resolution("Empty unix socket path".to_string()));
    }
    Ok(vec![Candidate::Unix(PathBuf::from(path))])
}

#[cfg(not(unix))]
fn unix_candidate(path: &str) -> ConnectionResult<Vec<Candidate>> {
    Err(ConnectionError::Resolution(format!(
        "Unix sockets are not supported on this platform: {}",
        path
    )))
}

/// Resolve every address of one server tier into a single target group
pub fn resolve_group(server: &ServerEntry, default_port: u16) -> ConnectionResult<TargetGroup> {
    let mut candidates = Vec::new();
    for addr in &server.addresses {
        candidates.extend(resolve_address(addr, default_port)?);
    }
    Ok(TargetGroup::new(server.label(), candidates))
}

/// Resolve all configured servers, keeping their priority order
pub fn resolve_servers(
    servers: &[ServerEntry],
    default_port: u16,
) -> ConnectionResult<Vec<TargetGroup>> {
    servers
        .iter()
        .map(|server| resolve_group(server, default_port))
        .collect()
}
