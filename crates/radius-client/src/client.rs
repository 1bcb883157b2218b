//! Client assembly from configuration

use radius_dict::{AttributeDef, Dictionary, DictionarySource, ImportError};
use tracing::{info, warn};

use crate::config::ClientConfig;
use crate::connection::ConnectionManager;
use crate::context::Context;
use crate::error::ClientResult;
use crate::resolver::resolve_servers;

/// Dictionary plus connection manager, built from a [`ClientConfig`]
#[derive(Debug)]
pub struct RadiusClient {
    context: Context,
    dictionary: Dictionary,
    connection: ConnectionManager,
    import_diagnostics: Vec<String>,
}

impl RadiusClient {
    /// Load the dictionary and resolve the configured servers.
    ///
    /// Rejected dictionary definitions do not abort start-up; they are logged
    /// and kept in [`import_diagnostics`](Self::import_diagnostics). The
    /// connection is left closed.
    pub fn from_config(context: Context, config: &ClientConfig) -> ClientResult<Self> {
        let mut dictionary = if config.standard_dictionary {
            Dictionary::standard()
        } else {
            Dictionary::new()
        };

        let mut import_diagnostics = Vec::new();
        if let Some(path) = &config.dictionary_path {
            let source = DictionarySource::from_file(path)?;
            match dictionary.import_source(&source, config.import_flags()) {
                Ok(summary) => {
                    info!(path = %path, definitions = summary.total(), replaced = summary.replaced, "Dictionary loaded");
                }
                Err(ImportError::Rejected {
                    imported,
                    diagnostics,
                }) => {
                    warn!(path = %path, imported = imported.total(), rejected = diagnostics.len(), "Dictionary loaded with errors");
                    for message in &diagnostics {
                        warn!("{}", context.diagnostic(message));
                    }
                    import_diagnostics = diagnostics;
                }
            }
        }

        let targets = resolve_servers(&config.servers, config.default_port)?;
        let connection = ConnectionManager::new(config.connect_options()?, targets);

        Ok(RadiusClient {
            context,
            dictionary,
            connection,
            import_diagnostics,
        })
    }

    pub fn context(&self) -> &Context {
        &self.context
    }

    pub fn dictionary(&self) -> &Dictionary {
        &self.dictionary
    }

    pub fn connection(&self) -> &ConnectionManager {
        &self.connection
    }

    pub fn connection_mut(&mut self) -> &mut ConnectionManager {
        &mut self.connection
    }

    /// Messages for dictionary definitions that were rejected at load time
    pub fn import_diagnostics(&self) -> &[String] {
        &self.import_diagnostics
    }

    /// Look up a standard attribute by name (case-insensitive)
    pub fn lookup_attribute(&self, name: &str) -> Option<&AttributeDef> {
        self.dictionary.attribute_by_name(name, None)
    }

    /// Open the connection
    pub fn connect(&mut self) -> ClientResult<()> {
        self.connection.open()?;
        Ok(())
    }

    /// Fail over to the next reachable server
    pub fn reconnect(&mut self) -> ClientResult<()> {
        self.connection.reopen(true)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ServerEntry;
    use radius_dict::{AttributeKind, ValueDef};
    use tempfile::NamedTempFile;

    fn config() -> ClientConfig {
        ClientConfig {
            servers: vec![ServerEntry {
                name: Some("local".to_string()),
                addresses: vec!["127.0.0.1:1812".to_string()],
            }],
            ..ClientConfig::default()
        }
    }

    #[test]
    fn test_from_config_standard_dictionary() {
        let client = RadiusClient::from_config(Context::new("test"), &config()).unwrap();

        assert_eq!(client.lookup_attribute("user-name").unwrap().id, 1);
        assert!(client.import_diagnostics().is_empty());
        assert!(!client.connection().is_open());
        assert_eq!(client.connection().targets().len(), 1);
    }

    #[test]
    fn test_from_config_collects_import_diagnostics() {
        let source = DictionarySource {
            vendors: vec![],
            attributes: vec![AttributeDef::new("Site-Code", 200, AttributeKind::Integer)],
            values: vec![ValueDef::new("No-Such-Attribute", "X", 1)],
        };
        let file = NamedTempFile::new().unwrap();
        source.to_file(file.path()).unwrap();

        let mut config = config();
        config.dictionary_path = Some(file.path().display().to_string());

        let client = RadiusClient::from_config(Context::new("test"), &config).unwrap();
        assert!(client.lookup_attribute("Site-Code").is_some());
        assert_eq!(client.import_diagnostics().len(), 1);
    }

    #[test]
    fn test_from_config_bad_server() {
        let mut config = config();
        config.servers[0].addresses = vec!["[::1".to_string()];
        assert!(RadiusClient::from_config(Context::new("test"), &config).is_err());
    }
}
