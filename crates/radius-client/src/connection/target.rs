//! Candidate addresses, target groups and the failover cursor

use std::fmt;
use std::net::{IpAddr, SocketAddr, SocketAddrV4, SocketAddrV6};
#[cfg(unix)]
use std::path::PathBuf;

/// Address family of a candidate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddressFamily {
    Ipv4,
    Ipv6,
    #[cfg(unix)]
    Unix,
}

impl fmt::Display for AddressFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AddressFamily::Ipv4 => f.write_str("IPv4"),
            AddressFamily::Ipv6 => f.write_str("IPv6"),
            #[cfg(unix)]
            AddressFamily::Unix => f.write_str("Unix"),
        }
    }
}

/// One resolved server address
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Candidate {
    V4(SocketAddrV4),
    V6(SocketAddrV6),
    /// Unix domain socket path
    #[cfg(unix)]
    Unix(PathBuf),
}

impl Candidate {
    pub fn family(&self) -> AddressFamily {
        match self {
            Candidate::V4(_) => AddressFamily::Ipv4,
            Candidate::V6(_) => AddressFamily::Ipv6,
            #[cfg(unix)]
            Candidate::Unix(_) => AddressFamily::Unix,
        }
    }

    pub fn is_ipv4(&self) -> bool {
        matches!(self, Candidate::V4(_))
    }

    pub fn is_ipv6(&self) -> bool {
        matches!(self, Candidate::V6(_))
    }

    /// Standard library address, `None` for Unix sockets
    pub fn to_std(&self) -> Option<SocketAddr> {
        match self {
            Candidate::V4(v4) => Some(SocketAddr::V4(*v4)),
            Candidate::V6(v6) => Some(SocketAddr::V6(*v6)),
            #[cfg(unix)]
            Candidate::Unix(_) => None,
        }
    }

    pub fn ip(&self) -> Option<IpAddr> {
        self.to_std().map(|addr| addr.ip())
    }
}

impl fmt::Display for Candidate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Candidate::V4(v4) => write!(f, "{}", v4),
            Candidate::V6(v6) => write!(f, "{}", v6),
            #[cfg(unix)]
            Candidate::Unix(path) => write!(f, "unix:{}", path.display()),
        }
    }
}

impl From<SocketAddr> for Candidate {
    fn from(addr: SocketAddr) -> Self {
        match addr {
            SocketAddr::V4(v4) => Candidate::V4(v4),
            SocketAddr::V6(v6) => Candidate::V6(v6),
        }
    }
}

impl From<SocketAddrV4> for Candidate {
    fn from(addr: SocketAddrV4) -> Self {
        Candidate::V4(addr)
    }
}

impl From<SocketAddrV6> for Candidate {
    fn from(addr: SocketAddrV6) -> Self {
        Candidate::V6(addr)
    }
}

/// Ordered candidates sharing one priority tier
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetGroup {
    /// Where the group came from (server string or configured name)
    pub label: String,
    candidates: Vec<Candidate>,
}

impl TargetGroup {
    pub fn new(label: impl Into<String>, candidates: Vec<Candidate>) -> Self {
        TargetGroup {
            label: label.into(),
            candidates,
        }
    }

    pub fn candidates(&self) -> &[Candidate] {
        &self.candidates
    }

    pub fn get(&self, index: usize) -> Option<&Candidate> {
        self.candidates.get(index)
    }

    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }
}

/// Position of a candidate: target group index and index within the group
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Cursor {
    pub group: usize,
    pub index: usize,
}

impl Cursor {
    pub fn new(group: usize, index: usize) -> Self {
        Cursor { group, index }
    }
}

impl fmt::Display for Cursor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "group {} index {}", self.group, self.index)
    }
}

/// Cyclic walk over every candidate position, starting at a given cursor,
/// that stops after a fixed number of full passes.
///
/// Yields `(pass, cursor)` with `pass` counting from 1.
#[derive(Debug, Clone)]
pub struct FailoverOrder {
    positions: Vec<Cursor>,
    start: usize,
    step: usize,
    passes: usize,
}

impl FailoverOrder {
    pub fn new(groups: &[TargetGroup], start: Cursor, passes: usize) -> Self {
        let positions: Vec<Cursor> = groups
            .iter()
            .enumerate()
            .flat_map(|(group, target)| (0..target.len()).map(move |index| Cursor { group, index }))
            .collect();

        // A start outside the list falls back to the first candidate
        let start = positions.iter().position(|p| *p == start).unwrap_or(0);

        FailoverOrder {
            positions,
            start,
            step: 0,
            passes,
        }
    }

    /// Number of candidate positions in one pass
    pub fn pass_len(&self) -> usize {
        self.positions.len()
    }
}

impl Iterator for FailoverOrder {
    type Item = (usize, Cursor);

    fn next(&mut self) -> Option<Self::Item> {
        let len = self.positions.len();
        if len == 0 || self.step >= len * self.passes {
            return None;
        }

        let pass = self.step / len + 1;
        let cursor = self.positions[(self.start + self.step) % len];
        self.step += 1;
        Some((pass, cursor))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = (self.positions.len() * self.passes).saturating_sub(self.step);
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for FailoverOrder {}
