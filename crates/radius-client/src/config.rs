use radius_dict::ImportFlags;
use serde::{Deserialize, Serialize};
use std::fs;
use std::net::{Ipv4Addr, Ipv6Addr, SocketAddrV4, SocketAddrV6};
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

use crate::connection::{ConnectOptions, Transport};

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// One server tier; its addresses are tried together before the next tier
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerEntry {
    /// Optional name/description
    #[serde(default)]
    pub name: Option<String>,
    /// `host[:port]`, `[v6addr]:port` or `unix:/path`
    pub addresses: Vec<String>,
}

impl ServerEntry {
    pub fn label(&self) -> String {
        self.name
            .clone()
            .unwrap_or_else(|| self.addresses.join(","))
    }
}

/// Client configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Server tiers in priority order
    #[serde(default)]
    pub servers: Vec<ServerEntry>,

    /// "udp" or "tcp" (default: udp)
    #[serde(default)]
    pub transport: Transport,

    /// Port used when a server address has none (default: 1812)
    #[serde(default = "default_port")]
    pub default_port: u16,

    /// Local address for IPv4 sockets (default: 0.0.0.0)
    #[serde(default = "default_bind_v4")]
    pub bind_address_v4: String,

    /// Local address for IPv6 sockets (default: ::)
    #[serde(default = "default_bind_v6")]
    pub bind_address_v6: String,

    /// Connect timeout in milliseconds; unset blocks for the OS default
    #[serde(default)]
    pub connect_timeout_ms: Option<u64>,

    /// SO_KEEPALIVE on TCP sockets (default: true)
    #[serde(default = "default_keepalive")]
    pub keepalive: bool,

    /// Load the built-in RFC attribute set (default: true)
    #[serde(default = "default_standard_dictionary")]
    pub standard_dictionary: bool,

    /// Extra dictionary file (JSON) imported after the built-in set
    #[serde(default)]
    pub dictionary_path: Option<String>,

    /// Let dictionary file entries overwrite existing ones
    #[serde(default)]
    pub replace_duplicates: bool,

    /// Skip referential checks during dictionary import
    #[serde(default)]
    pub lenient_import: bool,

    /// Enable verbose logging (same as log_level "debug")
    #[serde(default)]
    pub verbose: bool,

    /// Log level: "trace", "debug", "info", "warn", "error" (default: "info")
    #[serde(default)]
    pub log_level: Option<String>,
}

fn default_port() -> u16 {
    1812 // RADIUS authentication
}

fn default_bind_v4() -> String {
    "0.0.0.0".to_string()
}

fn default_bind_v6() -> String {
    "::".to_string()
}

fn default_keepalive() -> bool {
    true
}

fn default_standard_dictionary() -> bool {
    true
}

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

impl Default for ClientConfig {
    fn default() -> Self {
        ClientConfig {
            servers: vec![],
            transport: Transport::default(),
            default_port: default_port(),
            bind_address_v4: default_bind_v4(),
            bind_address_v6: default_bind_v6(),
            connect_timeout_ms: None,
            keepalive: default_keepalive(),
            standard_dictionary: default_standard_dictionary(),
            dictionary_path: None,
            replace_duplicates: false,
            lenient_import: false,
            verbose: false,
            log_level: None,
        }
    }
}

impl ClientConfig {
    /// Load configuration from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)?;
        let config: ClientConfig = serde_json::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a JSON file
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let contents = serde_json::to_string_pretty(self)?;
        fs::write(path, contents)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.servers.is_empty() {
            return Err(ConfigError::Invalid("No servers configured".to_string()));
        }

        for (i, server) in self.servers.iter().enumerate() {
            if server.addresses.is_empty() {
                return Err(ConfigError::Invalid(format!(
                    "Server {} ({}) has no addresses",
                    i,
                    server.label()
                )));
            }
            if server.addresses.iter().any(|a| a.trim().is_empty()) {
                return Err(ConfigError::Invalid(format!("Server {} has an empty address", i)));
            }
        }

        if self.default_port == 0 {
            return Err(ConfigError::Invalid("Default port cannot be 0".to_string()));
        }

        if self.connect_timeout_ms == Some(0) {
            return Err(ConfigError::Invalid(
                "connect_timeout_ms must be positive".to_string(),
            ));
        }

        if let Some(level) = &self.log_level {
            if !LOG_LEVELS.contains(&level.to_ascii_lowercase().as_str()) {
                return Err(ConfigError::Invalid(format!("Unknown log level: {}", level)));
            }
        }

        self.bind_v4()?;
        self.bind_v6()?;
        Ok(())
    }

    fn bind_v4(&self) -> Result<SocketAddrV4, ConfigError> {
        let ip: Ipv4Addr = self.bind_address_v4.parse().map_err(|_| {
            ConfigError::Invalid(format!("Invalid IPv4 bind address: {}", self.bind_address_v4))
        })?;
        Ok(SocketAddrV4::new(ip, 0))
    }

    fn bind_v6(&self) -> Result<SocketAddrV6, ConfigError> {
        let ip: Ipv6Addr = self.bind_address_v6.parse().map_err(|_| {
            ConfigError::Invalid(format!("Invalid IPv6 bind address: {}", self.bind_address_v6))
        })?;
        Ok(SocketAddrV6::new(ip, 0, 0, 0))
    }

    /// Socket settings for the connection manager
    pub fn connect_options(&self) -> Result<ConnectOptions, ConfigError> {
        let mut options = ConnectOptions::new(self.transport)
            .with_bind_v4(self.bind_v4()?)
            .with_bind_v6(self.bind_v6()?)
            .with_keepalive(self.keepalive);
        if let Some(ms) = self.connect_timeout_ms {
            options = options.with_connect_timeout(Duration::from_millis(ms));
        }
        Ok(options)
    }

    pub fn import_flags(&self) -> ImportFlags {
        let mut flags = ImportFlags::empty();
        flags.set(ImportFlags::REPLACE, self.replace_duplicates);
        flags.set(ImportFlags::LENIENT, self.lenient_import);
        flags
    }

    /// Configured log level, falling back to "debug" when verbose
    pub fn log_level(&self) -> Option<&str> {
        match &self.log_level {
            Some(level) => Some(level.as_str()),
            None if self.verbose => Some("debug"),
            None => None,
        }
    }

    /// Create an example configuration file
    pub fn example() -> Self {
        ClientConfig {
            servers: vec![
                ServerEntry {
                    name: Some("Primary".to_string()),
                    addresses: vec!["192.168.1.10".to_string(), "192.168.1.11:1812".to_string()],
                },
                ServerEntry {
                    name: Some("Backup".to_string()),
                    addresses: vec!["radius-backup.example.com".to_string()],
                },
            ],
            transport: Transport::Udp,
            default_port: 1812,
            bind_address_v4: default_bind_v4(),
            bind_address_v6: default_bind_v6(),
            connect_timeout_ms: Some(3000),
            keepalive: true,
            standard_dictionary: true,
            dictionary_path: None,
            replace_duplicates: false,
            lenient_import: false,
            verbose: false,
            log_level: Some("info".to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config() {
        let config = ClientConfig::default();
        assert_eq!(config.default_port, 1812);
        assert_eq!(config.transport, Transport::Udp);
        assert!(config.standard_dictionary);
    }

    #[test]
    fn test_config_validation() {
        let mut config = ClientConfig::example();
        assert!(config.validate().is_ok());

        config.servers[1].addresses.clear();
        assert!(config.validate().is_err());

        let mut config = ClientConfig::default();
        assert!(config.validate().is_err());

        config.servers.push(ServerEntry {
            name: None,
            addresses: vec!["127.0.0.1".to_string()],
        });
        assert!(config.validate().is_ok());

        config.connect_timeout_ms = Some(0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_bind_address() {
        let mut config = ClientConfig::example();
        config.bind_address_v4 = "::1".to_string();
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_invalid_log_level() {
        let mut config = ClientConfig::example();
        config.log_level = Some("loud".to_string());
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_connect_options() {
        let mut config = ClientConfig::example();
        config.transport = Transport::Tcp;
        config.bind_address_v4 = "127.0.0.1".to_string();

        let options = config.connect_options().unwrap();
        assert_eq!(options.transport, Transport::Tcp);
        assert_eq!(*options.bind_v4.ip(), Ipv4Addr::LOCALHOST);
        assert_eq!(options.connect_timeout, Some(Duration::from_secs(3)));
    }

    #[test]
    fn test_import_flags() {
        let mut config = ClientConfig::default();
        assert!(config.import_flags().is_empty());

        config.replace_duplicates = true;
        assert_eq!(config.import_flags(), ImportFlags::REPLACE);
    }

    #[test]
    fn test_log_level_from_verbose() {
        let mut config = ClientConfig::default();
        assert_eq!(config.log_level(), None);
        config.verbose = true;
        assert_eq!(config.log_level(), Some("debug"));
    }

    #[test]
    fn test_minimal_json_uses_defaults() {
        let json = r#"{ "servers": [ { "addresses": ["10.0.0.1"] } ] }"#;
        let config: ClientConfig = serde_json::from_str(json).unwrap();
        assert!(config.validate().is_ok());
        assert!(config.keepalive);
        assert_eq!(config.bind_address_v6, "::");
        assert_eq!(config.servers[0].label(), "10.0.0.1");
    }

    #[test]
    fn test_file_round_trip() {
        let file = NamedTempFile::new().unwrap();
        ClientConfig::example().to_file(file.path()).unwrap();

        let loaded = ClientConfig::from_file(file.path()).unwrap();
        assert_eq!(loaded.servers, ClientConfig::example().servers);
        assert_eq!(loaded.connect_timeout_ms, Some(3000));
    }
}
