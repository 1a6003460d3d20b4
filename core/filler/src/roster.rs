//! FILENAME: core/filler/src/roster.rs
//! PURPOSE: Commission roster lookup keyed by (region, condition).
//! CONTEXT: The roster is a second upstream value source. An address maps to
//! a region; (region, condition) maps to the roster's field values.

use std::collections::HashMap;

use log::warn;

use crate::fields::FieldValues;

/// Composite key for roster compositions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RosterKey {
    pub region: String,
    pub condition: bool,
}

impl RosterKey {
    pub fn new(region: impl Into<String>, condition: bool) -> Self {
        RosterKey { region: region.into(), condition }
    }
}

/// Source of roster field values for a document.
pub trait RosterSource: Sync {
    /// Roster fields for `address` under the detected `condition`, or None.
    fn composition(&self, address: &str, condition: bool) -> Option<FieldValues>;
}

/// In-memory roster tables.
#[derive(Debug, Clone, Default)]
pub struct RosterTable {
    /// address -> region
    regions: HashMap<String, String>,
    compositions: HashMap<RosterKey, FieldValues>,
}

impl RosterTable {
    pub fn new() -> Self {
        RosterTable::default()
    }

    /// Maps an address to its region. Returns the previous region, if any.
    pub fn insert_address(&mut self, address: impl Into<String>, region: impl Into<String>) -> Option<String> {
        self.regions.insert(address.into(), region.into())
    }

    /// Sets the composition for a key. Returns the previous one, if any.
    pub fn insert_composition(&mut self, key: RosterKey, fields: FieldValues) -> Option<FieldValues> {
        self.compositions.insert(key, fields)
    }

    pub fn region_for(&self, address: &str) -> Option<&str> {
        self.regions.get(address).map(String::as_str)
    }

    pub fn address_count(&self) -> usize {
        self.regions.len()
    }

    pub fn composition_count(&self) -> usize {
        self.compositions.len()
    }
}

impl RosterSource for RosterTable {
    fn composition(&self, address: &str, condition: bool) -> Option<FieldValues> {
        let Some(region) = self.region_for(address) else {
            warn!("address '{}' is not in the address map", address);
            return None;
        };
        let key = RosterKey::new(region, condition);
        match self.compositions.get(&key) {
            Some(fields) => Some(fields.clone()),
            None => {
                warn!("no roster composition for {:?} (address '{}')", key, address);
                None
            }
        }
    }
}
