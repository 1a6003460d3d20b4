//! FILENAME: core/filler/src/fields.rs
//! PURPOSE: Ordered (field name -> value) pairs fed into the fill engine.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldValue {
    pub name: String,
    pub value: String,
}

impl FieldValue {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        FieldValue { name: name.into(), value: value.into() }
    }
}

/// Insertion-ordered map of field values. Re-inserting an existing name
/// replaces its value but keeps its original position.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldValues {
    entries: Vec<FieldValue>,
}

impl FieldValues {
    pub fn new() -> Self {
        FieldValues { entries: Vec::new() }
    }

    pub fn upsert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.entries.iter_mut().find(|e| e.name == name) {
            Some(existing) => existing.value = value,
            None => self.entries.push(FieldValue { name, value }),
        }
    }

    /// Applies every entry of `other` on top of `self` (other wins on clashes).
    pub fn merge_from(&mut self, other: &FieldValues) {
        for entry in &other.entries {
            self.upsert(entry.name.clone(), entry.value.clone());
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries.iter().find(|e| e.name == name).map(|e| e.value.as_str())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.iter().any(|e| e.name == name)
    }

    pub fn names(&self) -> Vec<String> {
        self.entries.iter().map(|e| e.name.clone()).collect()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, FieldValue> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<N: Into<String>, V: Into<String>> FromIterator<(N, V)> for FieldValues {
    fn from_iter<T: IntoIterator<Item = (N, V)>>(iter: T) -> Self {
        let mut values = FieldValues::new();
        for (name, value) in iter {
            values.upsert(name, value);
        }
        values
    }
}

impl<'a> IntoIterator for &'a FieldValues {
    type Item = &'a FieldValue;
    type IntoIter = std::slice::Iter<'a, FieldValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
