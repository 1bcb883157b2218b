//! Multi-endpoint connection management
//!
//! A [`ConnectionManager`] owns at most one socket and a cursor into an
//! ordered list of [`TargetGroup`]s. `open` walks the groups in priority
//! order; `reopen` fails over from the current cursor with a hard cap of two
//! passes over every candidate, so it always terminates.
//!
//! # Example
//!
//! ```rust,no_run
//! use radius_client::connection::{ConnectOptions, ConnectionManager, TargetGroup, Transport};
//!
//! let primary = TargetGroup::new("primary", vec!["192.0.2.10:1812".parse::<std::net::SocketAddr>()?.into()]);
//! let backup = TargetGroup::new("backup", vec!["192.0.2.20:1812".parse::<std::net::SocketAddr>()?.into()]);
//!
//! let mut manager = ConnectionManager::new(ConnectOptions::new(Transport::Tcp), vec![primary, backup]);
//! manager.open()?;
//! println!("connected to {}", manager.current_target().unwrap());
//!
//! // After a transport error, fail over to the next reachable server
//! manager.reopen(true)?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod manager;
mod options;
mod socket;
mod target;

pub use manager::{AttemptOutcome, ConnectAttempt, ConnectionManager, MAX_REOPEN_PASSES};
pub use options::{ConnectOptions, Transport};
pub use socket::connect_candidate;
pub use target::{AddressFamily, Candidate, Cursor, FailoverOrder, TargetGroup};

use thiserror::Error;

/// Connection manager errors
#[derive(Error, Debug)]
pub enum ConnectionError {
    /// No candidate in scope accepted a connection
    #[error("Could not connect to any server ({attempts} attempts)")]
    ConnectFailure { attempts: usize },

    /// A server address could not be parsed or resolved
    #[error("Address resolution failed: {0}")]
    Resolution(String),

    /// Socket creation, option or connect error for a single address
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for connection operations
pub type ConnectionResult<T> = Result<T, ConnectionError>;
