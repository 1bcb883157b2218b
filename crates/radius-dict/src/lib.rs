//! RADIUS Dictionary Index
//!
//! This crate provides the in-memory data structures a RADIUS client uses to
//! resolve attribute, vendor and value names.
//!
//! # Features
//!
//! - Generic sorted-array engine with insert/replace/append/merge policies
//! - First/last/any selection inside runs of equal elements
//! - Vendor, attribute and value tables with numeric and name lookup
//! - Bulk import that reports every rejected definition in one pass
//! - Built-in RFC 2865/2866/2869 attribute set and JSON dictionary files
//!
//! # Example
//!
//! ```rust
//! use radius_dict::Dictionary;
//!
//! let dict = Dictionary::standard();
//! let attr = dict.attribute_by_name("Service-Type", None).unwrap();
//! assert_eq!(attr.id, 6);
//! assert_eq!(dict.value_by_number("Service-Type", 2).unwrap().name, "Framed-User");
//! ```

pub mod dictionary;
pub mod sorted;

pub use dictionary::{
    AttributeDef, AttributeKind, Dictionary, DictionaryError, DictionarySource, ImportError,
    ImportFlags, ImportSummary, ValueDef, Vendor,
};
pub use sorted::{ArrayError, LinearArray, Policy, SearchResult, Select, SortedArray};
