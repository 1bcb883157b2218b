use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// Vendor id of the standard (non vendor-specific) attribute space
pub const STANDARD_VENDOR: u32 = 0;

/// Compare two names ignoring ASCII case, the way dictionary names match
pub fn cmp_caseless(a: &str, b: &str) -> Ordering {
    a.bytes()
        .map(|c| c.to_ascii_lowercase())
        .cmp(b.bytes().map(|c| c.to_ascii_lowercase()))
}

/// Attribute data type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttributeKind {
    String,
    Octets,
    Integer,
    Integer64,
    Byte,
    Short,
    Date,
    IpAddr,
    Ipv6Addr,
    Ipv6Prefix,
}

impl AttributeKind {
    /// Largest value a named constant of this type may carry
    pub fn max_value(self) -> Option<u64> {
        match self {
            AttributeKind::Byte => Some(u8::MAX as u64),
            AttributeKind::Short => Some(u16::MAX as u64),
            AttributeKind::Integer | AttributeKind::Date => Some(u32::MAX as u64),
            AttributeKind::Integer64 => Some(u64::MAX),
            _ => None,
        }
    }

    pub fn is_numeric(self) -> bool {
        self.max_value().is_some()
    }
}

impl fmt::Display for AttributeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AttributeKind::String => "string",
            AttributeKind::Octets => "octets",
            AttributeKind::Integer => "integer",
            AttributeKind::Integer64 => "integer64",
            AttributeKind::Byte => "byte",
            AttributeKind::Short => "short",
            AttributeKind::Date => "date",
            AttributeKind::IpAddr => "ipaddr",
            AttributeKind::Ipv6Addr => "ipv6addr",
            AttributeKind::Ipv6Prefix => "ipv6prefix",
        };
        f.write_str(name)
    }
}

/// How an attribute value is obscured on the wire
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Encryption {
    #[default]
    None,
    /// RFC 2865 User-Password hiding
    UserPassword,
    /// RFC 2868 Tunnel-Password salting
    TunnelPassword,
}

/// Vendor definition (VENDOR line)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vendor {
    pub name: String,
    /// IANA private enterprise number
    pub id: u32,
}

impl Vendor {
    pub fn new(name: impl Into<String>, id: u32) -> Self {
        Vendor {
            name: name.into(),
            id,
        }
    }
}

/// Numeric identity of an attribute
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AttributeKey {
    pub vendor: u32,
    pub id: u32,
}

/// Attribute definition (ATTRIBUTE line)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeDef {
    pub name: String,
    pub id: u32,
    #[serde(rename = "type")]
    pub kind: AttributeKind,
    /// Owning vendor, 0 for the standard space
    #[serde(default)]
    pub vendor: u32,
    #[serde(default)]
    pub encrypt: Encryption,
    /// Carries an RFC 2868 tag byte
    #[serde(default)]
    pub has_tag: bool,
}

impl AttributeDef {
    pub fn new(name: impl Into<String>, id: u32, kind: AttributeKind) -> Self {
        AttributeDef {
            name: name.into(),
            id,
            kind,
            vendor: STANDARD_VENDOR,
            encrypt: Encryption::None,
            has_tag: false,
        }
    }

    pub fn with_vendor(mut self, vendor: u32) -> Self {
        self.vendor = vendor;
        self
    }

    pub fn with_encryption(mut self, encrypt: Encryption) -> Self {
        self.encrypt = encrypt;
        self
    }

    pub fn key(&self) -> AttributeKey {
        AttributeKey {
            vendor: self.vendor,
            id: self.id,
        }
    }

    pub fn is_vendor_specific(&self) -> bool {
        self.vendor != STANDARD_VENDOR
    }
}

/// Named constant of an integer attribute (VALUE line)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValueDef {
    /// Name of the attribute the constant belongs to
    pub attribute: String,
    pub name: String,
    pub value: u64,
}

impl ValueDef {
    pub fn new(attribute: impl Into<String>, name: impl Into<String>, value: u64) -> Self {
        ValueDef {
            attribute: attribute.into(),
            name: name.into(),
            value,
        }
    }

    /// Order against an `(attribute, value)` pair
    pub fn cmp_parts(&self, attribute: &str, value: u64) -> Ordering {
        cmp_caseless(&self.attribute, attribute).then(self.value.cmp(&value))
    }
}

/// Common behaviour of the three definition kinds stored in a [`Table`].
///
/// [`Table`]: super::table::Table
pub trait DictionaryEntry {
    /// Numeric identity; the primary array is ordered by it
    type Key: Clone + PartialEq + fmt::Debug;

    fn key(&self) -> Self::Key;

    /// Names are unique within a scope (the owning attribute for values)
    fn scope(&self) -> &str {
        ""
    }

    fn name(&self) -> &str;

    /// Total order on entries, consistent with `cmp_key`
    fn cmp_entry(a: &Self, b: &Self) -> Ordering;

    fn cmp_key(&self, key: &Self::Key) -> Ordering;

    /// Short human-readable label used in diagnostics
    fn describe(&self) -> String;
}

impl DictionaryEntry for Vendor {
    type Key = u32;

    fn key(&self) -> u32 {
        self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn cmp_entry(a: &Self, b: &Self) -> Ordering {
        a.id.cmp(&b.id)
    }

    fn cmp_key(&self, key: &u32) -> Ordering {
        self.id.cmp(key)
    }

    fn describe(&self) -> String {
        format!("vendor '{}' ({})", self.name, self.id)
    }
}

impl DictionaryEntry for AttributeDef {
    type Key = AttributeKey;

    fn key(&self) -> AttributeKey {
        AttributeDef::key(self)
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn cmp_entry(a: &Self, b: &Self) -> Ordering {
        a.key().cmp(&b.key())
    }

    fn cmp_key(&self, key: &AttributeKey) -> Ordering {
        AttributeDef::key(self).cmp(key)
    }

    fn describe(&self) -> String {
        if self.is_vendor_specific() {
            format!(
                "attribute '{}' (vendor {}, id {})",
                self.name, self.vendor, self.id
            )
        } else {
            format!("attribute '{}' ({})", self.name, self.id)
        }
    }
}

/// Numeric identity of a value constant
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValueKey {
    pub attribute: String,
    pub value: u64,
}

impl DictionaryEntry for ValueDef {
    type Key = ValueKey;

    fn key(&self) -> ValueKey {
        ValueKey {
            attribute: self.attribute.clone(),
            value: self.value,
        }
    }

    fn scope(&self) -> &str {
        &self.attribute
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn cmp_entry(a: &Self, b: &Self) -> Ordering {
        a.cmp_parts(&b.attribute, b.value)
    }

    fn cmp_key(&self, key: &ValueKey) -> Ordering {
        self.cmp_parts(&key.attribute, key.value)
    }

    fn describe(&self) -> String {
        format!("value '{}' of '{}' ({})", self.name, self.attribute, self.value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cmp_caseless() {
        assert_eq!(cmp_caseless("User-Name", "user-name"), Ordering::Equal);
        assert_eq!(cmp_caseless("Alpha", "beta"), Ordering::Less);
        assert_eq!(cmp_caseless("abc", "ab"), Ordering::Greater);
    }

    #[test]
    fn test_kind_ranges() {
        assert_eq!(AttributeKind::Byte.max_value(), Some(255));
        assert_eq!(AttributeKind::Integer.max_value(), Some(u32::MAX as u64));
        assert!(!AttributeKind::String.is_numeric());
    }

    #[test]
    fn test_attribute_order_is_vendor_then_id() {
        let standard = AttributeDef::new("Reply-Message", 18, AttributeKind::String);
        let vsa = AttributeDef::new("Cisco-AVPair", 1, AttributeKind::String).with_vendor(9);
        assert_eq!(AttributeDef::cmp_entry(&standard, &vsa), Ordering::Less);
    }

    #[test]
    fn test_attribute_json_shape() {
        let json = r#"{"name": "Cisco-AVPair", "id": 1, "type": "string", "vendor": 9}"#;
        let attr: AttributeDef = serde_json::from_str(json).unwrap();
        assert_eq!(attr.kind, AttributeKind::String);
        assert_eq!(attr.encrypt, Encryption::None);
        assert!(attr.is_vendor_specific());
    }
}
