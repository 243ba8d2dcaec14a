//! Name lookup for factors in the arena.

use std::collections::HashMap;
use trial_core::FactorId;

/// Name index: factor name -> FactorId
#[derive(Debug, Default, Clone)]
pub struct NameIndex {
    index: HashMap<String, FactorId>,
}

impl NameIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a name. Returns false if the name was already taken.
    pub fn insert(&mut self, name: &str, id: FactorId) -> bool {
        if self.index.contains_key(name) {
            return false;
        }
        self.index.insert(name.to_string(), id);
        true
    }

    pub fn get(&self, name: &str) -> Option<FactorId> {
        self.index.get(name).copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }
}
