//! Bulk import of definitions into a [`Dictionary`]

use super::entry::{AttributeDef, DictionaryEntry, ValueDef, Vendor, STANDARD_VENDOR};
use super::table::Defined;
use super::{Dictionary, DictionaryError};
use bitflags::bitflags;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;
use tracing::debug;

bitflags! {
    /// Import options
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct ImportFlags: u32 {
        /// Overwrite definitions whose numeric identity already exists
        const REPLACE = 0x01;
        /// Skip referential and range checks (unknown vendor/attribute, value width)
        const LENIENT = 0x02;
    }
}

/// Counts of what an import added or changed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportSummary {
    pub vendors: usize,
    pub attributes: usize,
    pub values: usize,
    /// Definitions that overwrote an existing entry (already counted above)
    pub replaced: usize,
}

impl ImportSummary {
    pub fn total(&self) -> usize {
        self.vendors + self.attributes + self.values
    }
}

/// Import outcome when at least one definition was rejected
#[derive(Error, Debug)]
pub enum ImportError {
    #[error("{} definition(s) rejected, {} imported", .diagnostics.len(), .imported.total())]
    Rejected {
        /// What did make it in
        imported: ImportSummary,
        /// One message per rejected definition, in input order
        diagnostics: Vec<String>,
    },
}

impl ImportError {
    pub fn diagnostics(&self) -> &[String] {
        match self {
            ImportError::Rejected { diagnostics, .. } => diagnostics,
        }
    }
}

/// Serialized form of a dictionary (JSON)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DictionarySource {
    #[serde(default)]
    pub vendors: Vec<Vendor>,
    #[serde(default)]
    pub attributes: Vec<AttributeDef>,
    #[serde(default)]
    pub values: Vec<ValueDef>,
}

impl DictionarySource {
    /// Load definitions from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, DictionaryError> {
        let contents = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&contents)?)
    }

    /// Save definitions to a JSON file
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), DictionaryError> {
        let contents = serde_json::to_string_pretty(self)?;
        fs::write(path, contents)?;
        Ok(())
    }

    pub fn is_empty(&self) -> bool {
        self.vendors.is_empty() && self.attributes.is_empty() && self.values.is_empty()
    }
}

impl Dictionary {
    /// Import vendors, then attributes, then values.
    ///
    /// Every definition is attempted. Rejected ones produce one diagnostic
    /// each and the rest still go in; the call only succeeds when nothing was
    /// rejected.
    pub fn import(
        &mut self,
        vendors: &[Vendor],
        attributes: &[AttributeDef],
        values: &[ValueDef],
        flags: ImportFlags,
    ) -> Result<ImportSummary, ImportError> {
        let replace = flags.contains(ImportFlags::REPLACE);
        let strict = !flags.contains(ImportFlags::LENIENT);

        let mut summary = ImportSummary::default();
        let mut diagnostics = Vec::new();

        for vendor in vendors {
            match self.define_vendor(vendor, replace) {
                Ok(defined) => {
                    summary.vendors += 1;
                    summary.replaced += (defined == Defined::Replaced) as usize;
                }
                Err(err) => diagnostics.push(diagnostic(vendor, &err)),
            }
        }

        for attribute in attributes {
            match self.define_attribute(attribute, replace, strict) {
                Ok(defined) => {
                    summary.attributes += 1;
                    summary.replaced += (defined == Defined::Replaced) as usize;
                }
                Err(err) => diagnostics.push(diagnostic(attribute, &err)),
            }
        }

        for value in values {
            match self.define_value(value, replace, strict) {
                Ok(defined) => {
                    summary.values += 1;
                    summary.replaced += (defined == Defined::Replaced) as usize;
                }
                Err(err) => diagnostics.push(diagnostic(value, &err)),
            }
        }

        debug!(
            vendors = summary.vendors,
            attributes = summary.attributes,
            values = summary.values,
            replaced = summary.replaced,
            rejected = diagnostics.len(),
            "Dictionary import finished"
        );

        if diagnostics.is_empty() {
            Ok(summary)
        } else {
            Err(ImportError::Rejected {
                imported: summary,
                diagnostics,
            })
        }
    }

    /// Import everything in a [`DictionarySource`]
    pub fn import_source(
        &mut self,
        source: &DictionarySource,
        flags: ImportFlags,
    ) -> Result<ImportSummary, ImportError> {
        self.import(&source.vendors, &source.attributes, &source.values, flags)
    }

    fn define_vendor(&mut self, vendor: &Vendor, replace: bool) -> Result<Defined, DictionaryError> {
        validate_name(&vendor.name)?;
        if vendor.id == STANDARD_VENDOR {
            return Err(DictionaryError::InvalidDefinition(
                "vendor id 0 is reserved for standard attributes".to_string(),
            ));
        }
        self.vendors.define(vendor.clone(), replace)
    }

    fn define_attribute(
        &mut self,
        attribute: &AttributeDef,
        replace: bool,
        strict: bool,
    ) -> Result<Defined, DictionaryError> {
        validate_name(&attribute.name)?;
        if attribute.id == 0 {
            return Err(DictionaryError::InvalidDefinition(
                "attribute id 0 is not allowed".to_string(),
            ));
        }

        if strict {
            if attribute.is_vendor_specific() {
                if self.vendor_by_id(attribute.vendor).is_none() {
                    return Err(DictionaryError::InvalidDefinition(format!(
                        "unknown vendor {}",
                        attribute.vendor
                    )));
                }
                if attribute.id > u16::MAX as u32 {
                    return Err(DictionaryError::InvalidDefinition(format!(
                        "vendor attribute id {} out of range (1-65535)",
                        attribute.id
                    )));
                }
            } else if attribute.id > u8::MAX as u32 {
                return Err(DictionaryError::InvalidDefinition(format!(
                    "attribute id {} out of range (1-255)",
                    attribute.id
                )));
            }
        }

        self.attributes.define(attribute.clone(), replace)
    }

    fn define_value(
        &mut self,
        value: &ValueDef,
        replace: bool,
        strict: bool,
    ) -> Result<Defined, DictionaryError> {
        validate_name(&value.name)?;
        validate_name(&value.attribute)?;

        if strict {
            let attribute = self.attribute_by_name(&value.attribute, None).ok_or_else(|| {
                DictionaryError::InvalidDefinition(format!(
                    "unknown attribute '{}'",
                    value.attribute
                ))
            })?;

            let max = attribute.kind.max_value().ok_or_else(|| {
                DictionaryError::InvalidDefinition(format!(
                    "attribute '{}' has non-numeric type {}",
                    attribute.name, attribute.kind
                ))
            })?;

            if value.value > max {
                return Err(DictionaryError::InvalidDefinition(format!(
                    "value {} does not fit {} attribute '{}'",
                    value.value, attribute.kind, attribute.name
                )));
            }
        }

        self.values.define(value.clone(), replace)
    }
}

fn validate_name(name: &str) -> Result<(), DictionaryError> {
    if name.is_empty() {
        return Err(DictionaryError::InvalidDefinition("empty name".to_string()));
    }
    if name.chars().any(|c| c.is_whitespace() || c.is_control()) {
        return Err(DictionaryError::InvalidDefinition(format!(
            "name '{}' contains whitespace or control characters",
            name.escape_debug()
        )));
    }
    Ok(())
}

fn diagnostic<E: DictionaryEntry>(entry: &E, err: &DictionaryError) -> String {
    format!("{}: {}", entry.describe(), err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dictionary::entry::AttributeKind;
    use tempfile::NamedTempFile;

    fn cisco() -> Vendor {
        Vendor::new("Cisco", 9)
    }

    #[test]
    fn test_import_all_valid() {
        let mut dict = Dictionary::new();
        let summary = dict
            .import(
                &[cisco()],
                &[
                    AttributeDef::new("Service-Type", 6, AttributeKind::Integer),
                    AttributeDef::new("Cisco-AVPair", 1, AttributeKind::String).with_vendor(9),
                ],
                &[
                    ValueDef::new("Service-Type", "Login-User", 1),
                    ValueDef::new("Service-Type", "Framed-User", 2),
                ],
                ImportFlags::empty(),
            )
            .unwrap();

        assert_eq!(
            summary,
            ImportSummary {
                vendors: 1,
                attributes: 2,
                values: 2,
                replaced: 0
            }
        );
        assert_eq!(dict.vendor_by_name("CISCO").unwrap().id, 9);
        assert_eq!(dict.attribute_by_id(9, 1).unwrap().name, "Cisco-AVPair");
        assert_eq!(dict.value_by_name("service-type", "framed-user").unwrap().value, 2);
        assert_eq!(dict.values_of("Service-Type").len(), 2);
    }

    #[test]
    fn test_import_reports_every_failure() {
        let mut dict = Dictionary::new();
        let result = dict.import(
            &[cisco(), Vendor::new("Cisco-Again", 9), Vendor::new("", 42)],
            &[
                AttributeDef::new("User-Name", 1, AttributeKind::String),
                AttributeDef::new("User-Name", 2, AttributeKind::String),
                AttributeDef::new("Unknown-VSA", 1, AttributeKind::String).with_vendor(4242),
                AttributeDef::new("NAS-Port", 5, AttributeKind::Integer),
            ],
            &[
                ValueDef::new("Missing-Attr", "Foo", 1),
                ValueDef::new("User-Name", "Bar", 1),
            ],
            ImportFlags::empty(),
        );

        let err = result.unwrap_err();
        let ImportError::Rejected {
            imported,
            diagnostics,
        } = err;
        assert_eq!(diagnostics.len(), 6);
        assert!(diagnostics[0].contains("Cisco-Again"));
        assert!(diagnostics[2].contains("already used"));
        assert!(diagnostics[3].contains("unknown vendor 4242"));
        assert!(diagnostics[4].contains("unknown attribute"));
        assert!(diagnostics[5].contains("non-numeric"));

        // The valid definitions still went in
        assert_eq!(imported.vendors, 1);
        assert_eq!(imported.attributes, 2);
        assert!(dict.attribute_by_name("NAS-Port", None).is_some());
    }

    #[test]
    fn test_import_replace_flag() {
        let mut dict = Dictionary::new();
        dict.import(
            &[],
            &[AttributeDef::new("Filter-Id", 11, AttributeKind::String)],
            &[],
            ImportFlags::empty(),
        )
        .unwrap();

        let replacement = AttributeDef::new("Filter-Id", 11, AttributeKind::Octets);
        assert!(dict
            .import(&[], &[replacement.clone()], &[], ImportFlags::empty())
            .is_err());

        let summary = dict
            .import(&[], &[replacement], &[], ImportFlags::REPLACE)
            .unwrap();
        assert_eq!(summary.replaced, 1);
        assert_eq!(dict.attribute_count(), 1);
        assert_eq!(
            dict.attribute_by_name("Filter-Id", None).unwrap().kind,
            AttributeKind::Octets
        );
    }

    #[test]
    fn test_lenient_skips_reference_checks() {
        let mut dict = Dictionary::new();
        let result = dict.import(
            &[],
            &[AttributeDef::new("Orphan-VSA", 7, AttributeKind::String).with_vendor(99)],
            &[ValueDef::new("Not-Defined", "Thing", 3)],
            ImportFlags::LENIENT,
        );
        assert!(result.is_ok());
        assert_eq!(dict.value_by_number("not-defined", 3).unwrap().name, "Thing");
    }

    #[test]
    fn test_value_width_checked() {
        let mut dict = Dictionary::new();
        let result = dict.import(
            &[],
            &[AttributeDef::new("Small", 200, AttributeKind::Byte)],
            &[ValueDef::new("Small", "Too-Big", 256)],
            ImportFlags::empty(),
        );
        let err = result.unwrap_err();
        assert_eq!(err.diagnostics().len(), 1);
        assert!(err.diagnostics()[0].contains("does not fit"));
    }

    #[test]
    fn test_source_file_round_trip() {
        let source = DictionarySource {
            vendors: vec![cisco()],
            attributes: vec![
                AttributeDef::new("Cisco-AVPair", 1, AttributeKind::String).with_vendor(9),
            ],
            values: vec![],
        };

        let file = NamedTempFile::new().unwrap();
        source.to_file(file.path()).unwrap();
        let loaded = DictionarySource::from_file(file.path()).unwrap();

        let mut dict = Dictionary::new();
        dict.import_source(&loaded, ImportFlags::empty()).unwrap();
        assert_eq!(dict.vendor_attributes(9).len(), 1);
    }
}
