//! RADIUS Client Runtime
//!
//! Connection failover and dictionary loading for RADIUS clients, built on
//! the `radius-dict` index.
//!
//! # Features
//!
//! - Ordered server tiers with bounded, cyclic failover
//! - UDP and TCP transports over IPv4, IPv6 and Unix domain sockets
//! - Per-attempt connection log
//! - JSON configuration
//!
//! # Example
//!
//! ```rust,no_run
//! use radius_client::{ClientConfig, Context, RadiusClient};
//!
//! let config = ClientConfig::from_file("radius-client.json")?;
//! let mut client = RadiusClient::from_config(Context::from_env(), &config)?;
//!
//! client.connect()?;
//! if let Some(target) = client.connection().current_target() {
//!     println!("connected to {}", target);
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod client;
pub mod config;
pub mod connection;
pub mod context;
pub mod error;
pub mod resolver;

pub use client::RadiusClient;
pub use config::{ClientConfig, ConfigError, ServerEntry};
pub use connection::{
    Candidate, ConnectOptions, ConnectionError, ConnectionManager, Cursor, TargetGroup, Transport,
};
pub use context::Context;
pub use error::{ClientError, ClientResult};
