use serde::{Deserialize, Serialize};
use socket2::{Protocol, Type};
use std::net::{Ipv4Addr, Ipv6Addr, SocketAddrV4, SocketAddrV6};
use std::time::Duration;

/// Transport used to reach the server
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Transport {
    /// RADIUS over TCP (RFC 6613), stream socket
    Tcp,
    /// Classic RADIUS over UDP, datagram socket
    #[default]
    Udp,
}

impl Transport {
    /// Stream transports use send/recv; datagram ones may use sendto/recvfrom
    pub fn is_stream(self) -> bool {
        matches!(self, Transport::Tcp)
    }

    pub(crate) fn socket_type(self) -> Type {
        match self {
            Transport::Tcp => Type::STREAM,
            Transport::Udp => Type::DGRAM,
        }
    }

    pub(crate) fn inet_protocol(self) -> Protocol {
        match self {
            Transport::Tcp => Protocol::TCP,
            Transport::Udp => Protocol::UDP,
        }
    }
}

impl std::fmt::Display for Transport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Transport::Tcp => f.write_str("tcp"),
            Transport::Udp => f.write_str("udp"),
        }
    }
}

/// How the manager creates, binds and connects sockets
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectOptions {
    pub transport: Transport,
    /// Local address for IPv4 candidates
    pub bind_v4: SocketAddrV4,
    /// Local address for IPv6 candidates
    pub bind_v6: SocketAddrV6,
    /// Upper bound for one connect attempt; `None` blocks for the OS default
    pub connect_timeout: Option<Duration>,
    /// Enable SO_KEEPALIVE on stream sockets
    pub keepalive: bool,
}

impl ConnectOptions {
    pub fn new(transport: Transport) -> Self {
        ConnectOptions {
            transport,
            bind_v4: SocketAddrV4::new(Ipv4Addr::UNSPECIFIED, 0),
            bind_v6: SocketAddrV6::new(Ipv6Addr::UNSPECIFIED, 0, 0, 0),
            connect_timeout: None,
            keepalive: true,
        }
    }

    pub fn with_bind_v4(mut self, addr: SocketAddrV4) -> Self {
        self.bind_v4 = addr;
        self
    }

    pub fn with_bind_v6(mut self, addr: SocketAddrV6) -> Self {
        self.bind_v6 = addr;
        self
    }

    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }

    pub fn with_keepalive(mut self, enabled: bool) -> Self {
        self.keepalive = enabled;
        self
    }
}

impl Default for ConnectOptions {
    fn default() -> Self {
        Self::new(Transport::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_options() {
        let options = ConnectOptions::default();
        assert_eq!(options.transport, Transport::Udp);
        assert_eq!(options.bind_v4.port(), 0);
        assert!(options.bind_v6.ip().is_unspecified());
        assert!(options.connect_timeout.is_none());
        assert!(options.keepalive);
    }

    #[test]
    fn test_transport_kind() {
        assert!(Transport::Tcp.is_stream());
        assert!(!Transport::Udp.is_stream());
        assert_eq!(Transport::Tcp.to_string(), "tcp");
    }

    #[test]
    fn test_transport_serde() {
        let transport: Transport = serde_json::from_str("\"tcp\"").unwrap();
        assert_eq!(transport, Transport::Tcp);
    }
}
