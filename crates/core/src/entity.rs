//! Entities and their field collections
//!
//! [`Fields`] is an insertion-ordered field map. Field order is observable:
//! batch writes sort every row's fields by name so all rows in a batch
//! present the same order to the store. A plain hash map would lose that,
//! so the representation is an ordered list of pairs with unique names.
//!
//! [`Entity`] pairs a [`Key`] with its fields; it is the shape clients
//! store and return.

use crate::key::Key;
use crate::value::Value;
use serde::{Deserialize, Serialize};

/// Insertion-ordered collection of named field values
///
/// Names are unique: inserting an existing name replaces the value in
/// place, keeping the field's original position.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Fields(Vec<(String, Value)>);

impl Fields {
    /// Create an empty field collection
    pub fn new() -> Self {
        Fields(Vec::new())
    }

    /// Set a field value
    ///
    /// Last write wins; an existing field keeps its position.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        let name = name.into();
        let value = value.into();
        match self.0.iter_mut().find(|(existing, _)| *existing == name) {
            Some(slot) => slot.1 = value,
            None => self.0.push((name, value)),
        }
    }

    /// Get a field value by name
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0
            .iter()
            .find(|(existing, _)| existing == name)
            .map(|(_, value)| value)
    }

    /// Remove a field, returning its value if present
    pub fn remove(&mut self, name: &str) -> Option<Value> {
        let index = self.0.iter().position(|(existing, _)| existing == name)?;
        Some(self.0.remove(index).1)
    }

    /// Whether a field exists
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Number of fields
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the collection is empty
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Field names in current order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|(name, _)| name.as_str())
    }

    /// Fields in current order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.0.iter().map(|(name, value)| (name.as_str(), value))
    }

    /// Sort fields by name
    ///
    /// The normalization step applied to every row of a batch write.
    pub fn sort_by_name(&mut self) {
        self.0.sort_by(|a, b| a.0.cmp(&b.0));
    }

    /// Narrow to the fields whose names appear in `columns`
    ///
    /// Keeps this collection's order, not the order of `columns`; names
    /// absent here are simply absent from the result.
    pub fn only<S: AsRef<str>>(&self, columns: &[S]) -> Fields {
        Fields(
            self.0
                .iter()
                .filter(|(name, _)| columns.iter().any(|c| c.as_ref() == name))
                .cloned()
                .collect(),
        )
    }
}

impl<N: Into<String>, V: Into<Value>> FromIterator<(N, V)> for Fields {
    fn from_iter<T: IntoIterator<Item = (N, V)>>(iter: T) -> Self {
        let mut fields = Fields::new();
        for (name, value) in iter {
            fields.insert(name, value);
        }
        fields
    }
}

impl IntoIterator for Fields {
    type Item = (String, Value);
    type IntoIter = std::vec::IntoIter<(String, Value)>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

/// A stored record: identity plus field values
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    /// The entity's key
    pub key: Key,
    /// The entity's fields in stored order
    pub fields: Fields,
}

impl Entity {
    /// Create an entity from a key and its fields
    pub fn new(key: Key, fields: Fields) -> Self {
        Entity { key, fields }
    }
}
