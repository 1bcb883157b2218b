//! Socket creation for a single candidate

use std::io;

use socket2::{Domain, SockAddr, Socket};
use tracing::trace;

use super::options::ConnectOptions;
use super::target::Candidate;

/// Create, configure, bind and connect a socket for one candidate.
///
/// Option failures are logged and ignored. Any other failure drops the
/// socket, so the caller never sees a half-configured descriptor.
pub fn connect_candidate(candidate: &Candidate, options: &ConnectOptions) -> io::Result<Socket> {
    let transport = options.transport;

    let (domain, protocol, local, remote) = match candidate {
        Candidate::V4(addr) => (
            Domain::IPV4,
            Some(transport.inet_protocol()),
            Some(SockAddr::from(options.bind_v4)),
            SockAddr::from(*addr),
        ),
        Candidate::V6(addr) => (
            Domain::IPV6,
            Some(transport.inet_protocol()),
            Some(SockAddr::from(options.bind_v6)),
            SockAddr::from(*addr),
        ),
        #[cfg(unix)]
        Candidate::Unix(path) => (Domain::UNIX, None, None, SockAddr::unix(path)?),
    };

    let socket = Socket::new(domain, transport.socket_type(), protocol)?;
    apply_options(&socket, candidate, options);

    if let Some(local) = local {
        socket.bind(&local)?;
    }

    match options.connect_timeout {
        Some(timeout) => socket.connect_timeout(&remote, timeout)?,
        None => socket.connect(&remote)?,
    }

    Ok(socket)
}

fn apply_options(socket: &Socket, candidate: &Candidate, options: &ConnectOptions) {
    let inet = candidate.to_std().is_some();

    if inet {
        if let Err(e) = socket.set_reuse_address(true) {
            trace!(error = %e, "SO_REUSEADDR not applied");
        }

        #[cfg(all(unix, not(any(target_os = "solaris", target_os = "illumos"))))]
        {
            if let Err(e) = socket.set_reuse_port(true) {
                trace!(error = %e, "SO_REUSEPORT not applied");
            }
        }
    }

    if options.transport.is_stream() && options.keepalive {
        if let Err(e) = socket.set_keepalive(true) {
            trace!(error = %e, "SO_KEEPALIVE not applied");
        }
    }

    #[cfg(any(target_os = "macos", target_os = "ios"))]
    {
        if let Err(e) = socket.set_nosigpipe(true) {
            trace!(error = %e, "SO_NOSIGPIPE not applied");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connection::Transport;
    use std::net::{SocketAddr, TcpListener, UdpSocket};

    #[test]
    fn test_connect_tcp_listener() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let candidate = Candidate::from(listener.local_addr().unwrap());

        let socket = connect_candidate(&candidate, &ConnectOptions::new(Transport::Tcp)).unwrap();
        let peer = socket.peer_addr().unwrap().as_socket().unwrap();
        assert_eq!(peer, listener.local_addr().unwrap());
    }

    #[test]
    fn test_connect_refused() {
        let addr: SocketAddr = {
            let listener = TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap()
        };

        let result = connect_candidate(&Candidate::from(addr), &ConnectOptions::new(Transport::Tcp));
        assert!(result.is_err());
    }

    #[test]
    fn test_connect_udp_binds_local() {
        let server = UdpSocket::bind("127.0.0.1:0").unwrap();
        let candidate = Candidate::from(server.local_addr().unwrap());

        let socket = connect_candidate(&candidate, &ConnectOptions::new(Transport::Udp)).unwrap();
        let local = socket.local_addr().unwrap().as_socket().unwrap();
        assert_ne!(local.port(), 0);
    }

    #[cfg(unix)]
    #[test]
    fn test_connect_unix_socket() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("radius.sock");
        let _listener = std::os::unix::net::UnixListener::bind(&path).unwrap();

        let socket =
            connect_candidate(&Candidate::Unix(path), &ConnectOptions::new(Transport::Tcp)).unwrap();
        assert_eq!(socket.peer_addr().unwrap().domain(), Domain::UNIX);
    }
}
