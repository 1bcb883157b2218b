//! RADIUS dictionary index
//!
//! Vendors, attributes and named values live in three sorted tables keyed by
//! their numeric identity, each with a case-insensitive name index. Tables are
//! filled by [`Dictionary::import`], which reports every rejected definition
//! instead of stopping at the first one.
//!
//! # Example
//!
//! ```rust
//! use radius_dict::dictionary::{AttributeDef, AttributeKind, Dictionary, ImportFlags, ValueDef, Vendor};
//!
//! let mut dict = Dictionary::new();
//! dict.import(
//!     &[Vendor::new("Cisco", 9)],
//!     &[
//!         AttributeDef::new("Service-Type", 6, AttributeKind::Integer),
//!         AttributeDef::new("Cisco-AVPair", 1, AttributeKind::String).with_vendor(9),
//!     ],
//!     &[ValueDef::new("Service-Type", "Framed-User", 2)],
//!     ImportFlags::empty(),
//! )
//! .unwrap();
//!
//! assert_eq!(dict.attribute_by_name("cisco-avpair", Some(9)).unwrap().id, 1);
//! assert_eq!(dict.value_by_number("Service-Type", 2).unwrap().name, "Framed-User");
//! ```

mod entry;
mod import;
mod standard;
mod table;

pub use entry::{
    cmp_caseless, AttributeDef, AttributeKey, AttributeKind, DictionaryEntry, Encryption,
    ValueDef, ValueKey, Vendor, STANDARD_VENDOR,
};
pub use import::{DictionarySource, ImportError, ImportFlags, ImportSummary};
pub use standard::{standard_attributes, standard_values};

use crate::sorted::ArrayError;
use table::Table;
use thiserror::Error;

/// Dictionary errors
#[derive(Error, Debug)]
pub enum DictionaryError {
    /// Definition failed validation
    #[error("Invalid definition: {0}")]
    InvalidDefinition(String),

    /// Definition collides with an existing one
    #[error("Duplicate definition: {0}")]
    Duplicate(String),

    /// Table could not grow
    #[error("Out of memory: {0}")]
    OutOfMemory(String),

    /// IO error while reading a dictionary source
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed dictionary source
    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

impl From<ArrayError> for DictionaryError {
    fn from(err: ArrayError) -> Self {
        match err {
            ArrayError::Duplicate(index) => {
                DictionaryError::Duplicate(format!("entry already present at index {}", index))
            }
            ArrayError::NotFound => DictionaryError::InvalidDefinition(err.to_string()),
            ArrayError::OutOfMemory { .. } => DictionaryError::OutOfMemory(err.to_string()),
        }
    }
}

/// In-memory RADIUS dictionary
pub struct Dictionary {
    vendors: Table<Vendor>,
    attributes: Table<AttributeDef>,
    values: Table<ValueDef>,
}

impl Default for Dictionary {
    fn default() -> Self {
        Self::new()
    }
}

impl Dictionary {
    /// Create an empty dictionary
    pub fn new() -> Self {
        Dictionary {
            vendors: Table::new(),
            attributes: Table::new(),
            values: Table::new(),
        }
    }

    /// Create a dictionary preloaded with the RFC 2865/2866/2869 attributes
    pub fn standard() -> Self {
        let mut dict = Dictionary::new();
        // The built-in tables are consistent; a failure here is a bug in them
        let result = dict.import(
            &[],
            &standard_attributes(),
            &standard_values(),
            ImportFlags::empty(),
        );
        if let Err(err) = &result {
            tracing::error!(error = %err, diagnostics = ?err.diagnostics(), "Built-in dictionary failed to import");
        }
        debug_assert!(result.is_ok(), "built-in dictionary rejected: {:?}", result);
        dict
    }

    pub fn vendor_count(&self) -> usize {
        self.vendors.len()
    }

    pub fn attribute_count(&self) -> usize {
        self.attributes.len()
    }

    pub fn value_count(&self) -> usize {
        self.values.len()
    }

    pub fn vendors(&self) -> &[Vendor] {
        self.vendors.entries()
    }

    pub fn attributes(&self) -> &[AttributeDef] {
        self.attributes.entries()
    }

    pub fn vendor_by_name(&self, name: &str) -> Option<&Vendor> {
        self.vendors.by_name("", name)
    }

    pub fn vendor_by_id(&self, id: u32) -> Option<&Vendor> {
        self.vendors.by_key(&id)
    }

    /// Find an attribute by name, optionally requiring a vendor
    pub fn attribute_by_name(&self, name: &str, vendor: Option<u32>) -> Option<&AttributeDef> {
        self.attributes
            .by_name("", name)
            .filter(|attr| vendor.map_or(true, |v| attr.vendor == v))
    }

    pub fn attribute_by_id(&self, vendor: u32, id: u32) -> Option<&AttributeDef> {
        self.attributes.by_key(&AttributeKey { vendor, id })
    }

    /// All attributes defined under one vendor, in id order
    pub fn vendor_attributes(&self, vendor: u32) -> &[AttributeDef] {
        self.attributes.run(|attr| attr.vendor.cmp(&vendor))
    }

    pub fn value_by_name(&self, attribute: &str, name: &str) -> Option<&ValueDef> {
        self.values.by_name(attribute, name)
    }

    pub fn value_by_number(&self, attribute: &str, value: u64) -> Option<&ValueDef> {
        self.values.find(|def| def.cmp_parts(attribute, value))
    }

    /// All named values of one attribute, in numeric order
    pub fn values_of(&self, attribute: &str) -> &[ValueDef] {
        self.values
            .run(|def| cmp_caseless(&def.attribute, attribute))
    }
}

impl std::fmt::Debug for Dictionary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dictionary")
            .field("vendors", &self.vendor_count())
            .field("attributes", &self.attribute_count())
            .field("values", &self.value_count())
            .finish()
    }
}
