use super::entry::{cmp_caseless, DictionaryEntry};
use super::DictionaryError;
use crate::sorted::{Policy, SearchResult, Select, SortedArray};
use std::cmp::Ordering;

/// Name index record pointing back at a primary entry
#[derive(Debug, Clone)]
struct NameEntry<K> {
    scope: String,
    name: String,
    key: K,
}

impl<K> NameEntry<K> {
    fn cmp_name(&self, scope: &str, name: &str) -> Ordering {
        cmp_caseless(&self.scope, scope).then_with(|| cmp_caseless(&self.name, name))
    }

    fn cmp_entry(a: &Self, b: &Self) -> Ordering {
        a.cmp_name(&b.scope, &b.name)
    }
}

/// What `Table::define` did with a definition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Defined {
    Inserted,
    Replaced,
}

/// One dictionary section: entries ordered by numeric key plus a
/// case-insensitive name index over the same entries.
pub(crate) struct Table<E: DictionaryEntry> {
    entries: SortedArray<E>,
    names: SortedArray<NameEntry<E::Key>>,
}

impl<E: DictionaryEntry> Table<E> {
    pub(crate) fn new() -> Self {
        Table {
            entries: SortedArray::new(E::cmp_entry),
            names: SortedArray::new(NameEntry::cmp_entry),
        }
    }

    #[cfg(test)]
    fn with_limits(entries: usize, names: usize) -> Self {
        Table {
            entries: SortedArray::new(E::cmp_entry).with_capacity_limit(entries),
            names: SortedArray::new(NameEntry::cmp_entry).with_capacity_limit(names),
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    pub(crate) fn entries(&self) -> &[E] {
        self.entries.as_slice()
    }

    pub(crate) fn by_key(&self, key: &E::Key) -> Option<&E> {
        self.entries.get_by(|entry| entry.cmp_key(key))
    }

    /// Lookup with a probe consistent with the entry order
    pub(crate) fn find<F>(&self, probe: F) -> Option<&E>
    where
        F: FnMut(&E) -> Ordering,
    {
        self.entries.get_by(probe)
    }

    /// Contiguous run of entries the probe reports as equal
    pub(crate) fn run<F>(&self, probe: F) -> &[E]
    where
        F: FnMut(&E) -> Ordering,
    {
        self.entries.run_by(probe)
    }

    pub(crate) fn by_name(&self, scope: &str, name: &str) -> Option<&E> {
        let key = &self
            .names
            .get_by(|entry| entry.cmp_name(scope, name))?
            .key;
        self.by_key(key)
    }

    /// Add a definition. Without `replace`, a clash on either the numeric key
    /// or the name is rejected. With `replace`, an entry with the same key is
    /// overwritten, but a name owned by a different key is still a clash.
    ///
    /// Either both arrays change or neither does.
    pub(crate) fn define(&mut self, entry: E, replace: bool) -> Result<Defined, DictionaryError> {
        let key = entry.key();

        let name_slot = self
            .names
            .get_by(|n| n.cmp_name(entry.scope(), entry.name()))
            .cloned();

        let existing = match self.entries.search_by(|e| e.cmp_key(&key)) {
            SearchResult::Found(index) => self.entries.get_index(index),
            SearchResult::Vacant(_) => None,
        };

        if let Some(current) = existing {
            if !replace {
                return Err(DictionaryError::Duplicate(format!(
                    "{} already defined as {}",
                    entry.describe(),
                    current.describe()
                )));
            }
        }

        if let Some(owner) = &name_slot {
            // Ownership follows the primary order, which may ignore case
            let same_key = self
                .by_key(&owner.key)
                .is_some_and(|e| e.cmp_key(&key) == Ordering::Equal);
            if !replace || !same_key {
                let owner_label = self
                    .by_key(&owner.key)
                    .map(|e| e.describe())
                    .unwrap_or_else(|| format!("{:?}", owner.key));
                return Err(DictionaryError::Duplicate(format!(
                    "name '{}' already used by {}",
                    entry.name(),
                    owner_label
                )));
            }
        }

        let old_name = existing.map(|e| (e.scope().to_string(), e.name().to_string()));
        let name_entry = NameEntry {
            scope: entry.scope().to_string(),
            name: entry.name().to_string(),
            key: key.clone(),
        };
        let (new_scope, new_name) = (name_entry.scope.clone(), name_entry.name.clone());
        let renamed = old_name
            .as_ref()
            .is_some_and(|(scope, name)| name_entry.cmp_name(scope, name) != Ordering::Equal);

        self.names.insert(name_entry, Policy::Replace)?;

        let policy = if replace { Policy::Replace } else { Policy::Insert };
        if let Err(err) = self.entries.insert(entry, policy) {
            // Put the name index back as it was; replacing never allocates
            // and removing a present element cannot fail
            match name_slot {
                Some(previous) => {
                    let _ = self.names.insert(previous, Policy::Replace);
                }
                None => {
                    let _ = self
                        .names
                        .remove_by(|n| n.cmp_name(&new_scope, &new_name), Select::Any);
                }
            }
            return Err(err.into());
        }

        match old_name {
            Some((scope, name)) => {
                if renamed {
                    let _ = self.names.remove_by(|n| n.cmp_name(&scope, &name), Select::Any);
                }
                Ok(Defined::Replaced)
            }
            None => Ok(Defined::Inserted),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dictionary::entry::{AttributeDef, AttributeKind, ValueDef, Vendor};

    #[test]
    fn test_define_and_lookup() {
        let mut table = Table::new();
        table.define(Vendor::new("Cisco", 9), false).unwrap();
        table.define(Vendor::new("Microsoft", 311), false).unwrap();

        assert_eq!(table.by_key(&311).unwrap().name, "Microsoft");
        assert_eq!(table.by_name("", "cisco").unwrap().id, 9);
        assert!(table.by_name("", "Juniper").is_none());
    }

    #[test]
    fn test_duplicate_key_and_name_rejected() {
        let mut table = Table::new();
        table.define(Vendor::new("Cisco", 9), false).unwrap();

        assert!(matches!(
            table.define(Vendor::new("Other", 9), false),
            Err(DictionaryError::Duplicate(_))
        ));
        assert!(matches!(
            table.define(Vendor::new("CISCO", 10), false),
            Err(DictionaryError::Duplicate(_))
        ));
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_replace_renames_entry() {
        let mut table = Table::new();
        let old = AttributeDef::new("Old-Name", 200, AttributeKind::String);
        let new = AttributeDef::new("New-Name", 200, AttributeKind::Integer);

        assert_eq!(table.define(old, false).unwrap(), Defined::Inserted);
        assert_eq!(table.define(new, true).unwrap(), Defined::Replaced);

        assert_eq!(table.len(), 1);
        assert!(table.by_name("", "Old-Name").is_none());
        assert_eq!(
            table.by_name("", "new-name").unwrap().kind,
            AttributeKind::Integer
        );
    }

    #[test]
    fn test_replace_cannot_steal_name() {
        let mut table = Table::new();
        table.define(Vendor::new("Cisco", 9), false).unwrap();

        let result = table.define(Vendor::new("Cisco", 10), true);
        assert!(result.is_err());
        assert!(table.by_key(&10).is_none());
    }

    #[test]
    fn test_replace_value_with_differently_cased_attribute() {
        let mut table = Table::new();
        table
            .define(ValueDef::new("Service-Type", "Framed-User", 2), false)
            .unwrap();

        let outcome = table
            .define(ValueDef::new("service-type", "Framed-User", 2), true)
            .unwrap();
        assert_eq!(outcome, Defined::Replaced);
        assert_eq!(table.len(), 1);
        assert_eq!(table.by_name("SERVICE-TYPE", "framed-user").unwrap().value, 2);
    }

    #[test]
    fn test_value_name_clash_across_attributes_rejected() {
        let mut table = Table::new();
        table
            .define(ValueDef::new("Service-Type", "Framed-User", 2), false)
            .unwrap();

        assert!(table
            .define(ValueDef::new("Service-Type", "Framed-User", 3), true)
            .is_err());
        assert!(table.by_key(&ValueDef::new("Service-Type", "", 3).key()).is_none());
    }

    #[test]
    fn test_failed_name_insert_leaves_entries_untouched() {
        let mut table = Table::with_limits(8, 1);
        table.define(Vendor::new("Cisco", 9), false).unwrap();

        assert!(matches!(
            table.define(Vendor::new("Juniper", 2636), false),
            Err(DictionaryError::OutOfMemory(_))
        ));
        assert_eq!(table.len(), 1);
        assert!(table.by_key(&2636).is_none());

        // A rename needs a new name slot before the old one is dropped
        assert!(table.define(Vendor::new("Cisco-Systems", 9), true).is_err());
        assert_eq!(table.by_key(&9).unwrap().name, "Cisco");
        assert_eq!(table.by_name("", "cisco").unwrap().id, 9);
        assert!(table.by_name("", "Cisco-Systems").is_none());
    }

    #[test]
    fn test_failed_entry_insert_rolls_back_name() {
        let mut table = Table::with_limits(1, 8);
        table.define(Vendor::new("Cisco", 9), false).unwrap();

        assert!(table.define(Vendor::new("Juniper", 2636), false).is_err());
        assert_eq!(table.len(), 1);
        assert!(table.by_name("", "Juniper").is_none());
        assert_eq!(table.names.len(), 1);

        // Replacing in place still works at the limit
        table.define(Vendor::new("CISCO", 9), true).unwrap();
        assert_eq!(table.by_name("", "cisco").unwrap().name, "CISCO");
        assert_eq!(table.names.len(), 1);
    }
}
