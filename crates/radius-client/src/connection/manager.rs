use std::fmt;

use socket2::Socket;
use tracing::{debug, info, trace, warn};

use super::options::{ConnectOptions, Transport};
use super::socket::connect_candidate;
use super::target::{Candidate, Cursor, FailoverOrder, TargetGroup};
use super::{ConnectionError, ConnectionResult};

/// Upper bound on full passes over every candidate during `reopen`
pub const MAX_REOPEN_PASSES: usize = 2;

/// Result of one connection attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttemptOutcome {
    Connected,
    Failed(String),
}

/// One entry of the attempt log kept by the manager
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectAttempt {
    pub group: usize,
    pub index: usize,
    pub address: Candidate,
    /// Pass number, starting at 1
    pub pass: usize,
    pub outcome: AttemptOutcome,
}

impl ConnectAttempt {
    pub fn cursor(&self) -> Cursor {
        Cursor::new(self.group, self.index)
    }

    pub fn succeeded(&self) -> bool {
        self.outcome == AttemptOutcome::Connected
    }
}

impl fmt::Display for ConnectAttempt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "pass {} group {} index {} {}: ",
            self.pass, self.group, self.index, self.address
        )?;
        match &self.outcome {
            AttemptOutcome::Connected => f.write_str("connected"),
            AttemptOutcome::Failed(reason) => write!(f, "failed ({})", reason),
        }
    }
}

/// Owns at most one connected socket and the cursor of the server it reaches.
///
/// All mutation goes through `&mut self`; share between threads behind a
/// `Mutex` if needed.
pub struct ConnectionManager {
    options: ConnectOptions,
    targets: Vec<TargetGroup>,
    cursor: Option<Cursor>,
    socket: Option<Socket>,
    attempts: Vec<ConnectAttempt>,
}

impl ConnectionManager {
    /// Create a closed manager over `targets`, in priority order
    pub fn new(options: ConnectOptions, targets: Vec<TargetGroup>) -> Self {
        ConnectionManager {
            options,
            targets,
            cursor: None,
            socket: None,
            attempts: Vec::new(),
        }
    }

    /// Close the socket, if any, and clear the cursor
    pub fn close(&mut self) {
        self.close_socket();
        self.cursor = None;
    }

    /// Connect to the first reachable candidate, walking groups in order.
    ///
    /// Within a group, non-IPv6 candidates are tried first, then the IPv4
    /// candidates once more. IPv6 candidates are only reached through
    /// [`reopen`](Self::reopen).
    pub fn open(&mut self) -> ConnectionResult<()> {
        if self.is_open() {
            return Ok(());
        }

        self.attempts.clear();

        for group in 0..self.targets.len() {
            for pass in 1..=2 {
                for index in 0..self.targets[group].len() {
                    let eligible = match self.targets[group].get(index) {
                        Some(candidate) if pass == 1 => !candidate.is_ipv6(),
                        Some(candidate) => candidate.is_ipv4(),
                        None => false,
                    };

                    if eligible && self.try_candidate(Cursor::new(group, index), pass) {
                        return Ok(());
                    }
                }
            }

            debug!(group = group, label = %self.targets[group].label, "Target group exhausted");
        }

        self.cursor = None;
        warn!(attempts = self.attempts.len(), "No server reachable");
        Err(ConnectionError::ConnectFailure {
            attempts: self.attempts.len(),
        })
    }

    /// Create and connect a socket for one candidate, replacing any current
    /// socket on success. Never retries.
    pub fn open_socket(&mut self, candidate: &Candidate) -> ConnectionResult<()> {
        let socket = connect_candidate(candidate, &self.options)?;
        self.socket = Some(socket);
        Ok(())
    }

    /// Reconnect, failing over from the current cursor.
    ///
    /// With `force == false` an open manager is left alone. Otherwise the
    /// socket is closed and every candidate is tried in cyclic order from
    /// the cursor, at most [`MAX_REOPEN_PASSES`] times each.
    pub fn reopen(&mut self, force: bool) -> ConnectionResult<()> {
        if !force && self.is_open() {
            return Ok(());
        }

        self.close_socket();
        let start = self.normalized_cursor();
        self.cursor = Some(start);
        self.attempts.clear();

        for (pass, cursor) in FailoverOrder::new(&self.targets, start, MAX_REOPEN_PASSES) {
            if self.try_candidate(cursor, pass) {
                return Ok(());
            }
        }

        warn!(
            attempts = self.attempts.len(),
            passes = MAX_REOPEN_PASSES,
            "Failover exhausted every server"
        );
        Err(ConnectionError::ConnectFailure {
            attempts: self.attempts.len(),
        })
    }

    fn try_candidate(&mut self, cursor: Cursor, pass: usize) -> bool {
        let Some(candidate) = self
            .targets
            .get(cursor.group)
            .and_then(|group| group.get(cursor.index))
            .cloned()
        else {
            return false;
        };

        let outcome = match self.open_socket(&candidate) {
            Ok(()) => {
                self.cursor = Some(cursor);
                info!(address = %candidate, group = cursor.group, index = cursor.index, pass = pass, "Connected");
                AttemptOutcome::Connected
            }
            Err(e) => {
                debug!(address = %candidate, group = cursor.group, index = cursor.index, pass = pass, error = %e, "Connect attempt failed");
                AttemptOutcome::Failed(e.to_string())
            }
        };

        let connected = outcome == AttemptOutcome::Connected;
        self.attempts.push(ConnectAttempt {
            group: cursor.group,
            index: cursor.index,
            address: candidate,
            pass,
            outcome,
        });
        connected
    }

    fn close_socket(&mut self) {
        if let Some(socket) = self.socket.take() {
            trace!(cursor = ?self.cursor, "Closing socket");
            drop(socket);
        }
    }

    fn normalized_cursor(&self) -> Cursor {
        match self.cursor {
            Some(cursor)
                if self
                    .targets
                    .get(cursor.group)
                    .is_some_and(|group| cursor.index < group.len()) =>
            {
                cursor
            }
            _ => Cursor::new(0, 0),
        }
    }

    /// Active socket, if open
    pub fn socket(&self) -> Option<&Socket> {
        self.socket.as_ref()
    }

    #[cfg(unix)]
    pub fn raw_fd(&self) -> Option<std::os::fd::RawFd> {
        use std::os::fd::AsRawFd;
        self.socket.as_ref().map(|socket| socket.as_raw_fd())
    }

    pub fn transport(&self) -> Transport {
        self.options.transport
    }

    /// Stream sockets use send/recv, datagram sockets sendto/recvfrom
    pub fn is_stream(&self) -> bool {
        self.options.transport.is_stream()
    }

    pub fn cursor(&self) -> Option<Cursor> {
        self.cursor
    }

    /// Candidate the cursor points at
    pub fn current_target(&self) -> Option<&Candidate> {
        let cursor = self.cursor?;
        self.targets.get(cursor.group)?.get(cursor.index)
    }

    pub fn is_open(&self) -> bool {
        self.socket.is_some()
    }

    /// Attempts made by the last `open` or `reopen`
    pub fn attempts(&self) -> &[ConnectAttempt] {
        &self.attempts
    }

    pub fn targets(&self) -> &[TargetGroup] {
        &self.targets
    }

    pub fn options(&self) -> &ConnectOptions {
        &self.options
    }
}

impl fmt::Debug for ConnectionManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionManager")
            .field("transport", &self.options.transport)
            .field("groups", &self.targets.len())
            .field("cursor", &self.cursor)
            .field("open", &self.is_open())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::{SocketAddr, TcpListener};

    fn closed_port() -> Candidate {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        Candidate::from(listener.local_addr().unwrap())
    }

    fn tcp(targets: Vec<TargetGroup>) -> ConnectionManager {
        ConnectionManager::new(ConnectOptions::new(Transport::Tcp), targets)
    }

    #[test]
    fn test_new_manager_is_closed() {
        let manager = tcp(vec![]);
        assert!(!manager.is_open());
        assert!(manager.cursor().is_none());
        assert!(manager.current_target().is_none());
        assert!(manager.is_stream());
    }

    #[test]
    fn test_open_without_targets_fails() {
        let mut manager = tcp(vec![]);
        match manager.open() {
            Err(ConnectionError::ConnectFailure { attempts }) => assert_eq!(attempts, 0),
            other => panic!("unexpected result: {:?}", other),
        }
        assert!(manager.reopen(true).is_err());
    }

    #[test]
    fn test_open_skips_ipv6_candidates() {
        let v6: SocketAddr = "[::1]:9".parse().unwrap();
        let mut manager = tcp(vec![TargetGroup::new("v6", vec![Candidate::from(v6)])]);

        assert!(manager.open().is_err());
        assert!(manager.attempts().is_empty());
        assert!(manager.cursor().is_none());
    }

    /// An IPv6 loopback port with no listener, or the discard port when the
    /// host has no IPv6 loopback
    fn closed_v6_port() -> Candidate {
        TcpListener::bind("[::1]:0")
            .and_then(|listener| listener.local_addr())
            .map(Candidate::from)
            .unwrap_or_else(|_| Candidate::from("[::1]:9".parse::<SocketAddr>().unwrap()))
    }

    #[test]
    fn test_reopen_tries_ipv6_candidates() {
        let v6 = closed_v6_port();
        let mut manager = tcp(vec![TargetGroup::new("v6", vec![v6.clone()])]);

        assert!(manager.open().is_err());
        assert!(manager.attempts().is_empty());

        let _ = manager.reopen(true);
        let attempts = manager.attempts();
        assert!(!attempts.is_empty());
        assert!(attempts.len() <= MAX_REOPEN_PASSES);
        assert!(attempts
            .iter()
            .all(|a| a.cursor() == Cursor::new(0, 0) && a.address == v6));
        assert!(attempts[0].address.is_ipv6());
    }

    #[test]
    fn test_open_tries_ipv4_twice_per_group() {
        let mut manager = tcp(vec![TargetGroup::new("down", vec![closed_port()])]);

        assert!(manager.open().is_err());
        let passes: Vec<_> = manager.attempts().iter().map(|a| a.pass).collect();
        assert_eq!(passes, vec![1, 2]);
    }

    #[test]
    fn test_open_and_close() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let up = Candidate::from(listener.local_addr().unwrap());
        let mut manager = tcp(vec![TargetGroup::new("up", vec![up.clone()])]);

        manager.open().unwrap();
        assert!(manager.is_open());
        assert_eq!(manager.cursor(), Some(Cursor::new(0, 0)));
        assert_eq!(manager.current_target(), Some(&up));
        assert!(manager.attempts()[0].succeeded());

        manager.close();
        manager.close();
        assert!(!manager.is_open());
        assert!(manager.cursor().is_none());
    }

    #[test]
    fn test_normalized_cursor_resets_out_of_range() {
        let mut manager = tcp(vec![TargetGroup::new("a", vec![closed_port()])]);
        manager.cursor = Some(Cursor::new(0, 5));
        assert_eq!(manager.normalized_cursor(), Cursor::new(0, 0));

        manager.cursor = Some(Cursor::new(3, 0));
        assert_eq!(manager.normalized_cursor(), Cursor::new(0, 0));
    }

    #[test]
    fn test_attempt_display() {
        let attempt = ConnectAttempt {
            group: 1,
            index: 0,
            address: Candidate::from("127.0.0.1:1812".parse::<SocketAddr>().unwrap()),
            pass: 2,
            outcome: AttemptOutcome::Failed("refused".to_string()),
        };
        assert_eq!(
            attempt.to_string(),
            "pass 2 group 1 index 0 127.0.0.1:1812: failed (refused)"
        );
    }
}
