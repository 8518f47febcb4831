//! Named definition registry.
//!
//! External callers address sequences by id; the registry maps ids to
//! shared immutable definitions. Pre-seeded with the built-in family.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;

use seqcalc_core::definition::RecurrenceDefinition;
use seqcalc_core::solver::SeqError;

/// Registry of named recurrence definitions.
pub struct DefinitionRegistry {
    definitions: RwLock<HashMap<String, Arc<RecurrenceDefinition>>>,
}

impl DefinitionRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            definitions: RwLock::new(HashMap::new()),
        }
    }

    /// Create a registry pre-seeded with the built-in sequences.
    #[must_use]
    pub fn with_builtins() -> Self {
        let registry = Self::new();
        registry.register("fibonacci", RecurrenceDefinition::fibonacci());
        registry.register("lucas", RecurrenceDefinition::lucas());
        registry.register("pell", RecurrenceDefinition::pell());
        registry.register("tribonacci", RecurrenceDefinition::tribonacci());
        registry
    }

    /// Register (or replace) a definition under `id`.
    pub fn register(&self, id: &str, definition: RecurrenceDefinition) {
        self.definitions
            .write()
            .insert(id.to_string(), Arc::new(definition));
    }

    /// Look up a definition by id.
    pub fn get(&self, id: &str) -> Result<Arc<RecurrenceDefinition>, SeqError> {
        self.definitions
            .read()
            .get(id)
            .map(Arc::clone)
            .ok_or_else(|| SeqError::InvalidDefinition(format!("unknown sequence: {id}")))
    }

    /// Ids currently registered, sorted.
    #[must_use]
    pub fn available(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.definitions.read().keys().cloned().collect();
        ids.sort();
        ids
    }
}

impl Default for DefinitionRegistry {
    fn default() -> Self {
        Self::with_builtins()
    }
}
