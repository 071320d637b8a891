//! The externally-supplied environment a module is checked against:
//! already-generalized bindings (primitives, imports) and type aliases.
//!
//! Grounded on the teacher's `type_env.rs` name-to-scheme map, dropped
//! down to the two tables this design needs (no type-class instance
//! table, since there are no type classes here).

use crate::alias::AliasTable;
use crate::types::Scheme;
use std::collections::HashMap;

/// Everything a module's assumptions may resolve against that isn't
/// defined inside the module itself.
#[derive(Debug, Clone, Default)]
pub struct ExternalEnv {
    bindings: HashMap<String, Scheme>,
    aliases: AliasTable,
}

impl ExternalEnv {
    /// An environment with no bindings and no aliases.
    pub fn new() -> Self {
        Self { bindings: HashMap::new(), aliases: AliasTable::new() }
    }

    /// Registers an already-generalized binding, e.g. a primitive
    /// procedure's scheme.
    pub fn bind(&mut self, name: impl Into<String>, scheme: Scheme) {
        self.bindings.insert(name.into(), scheme);
    }

    /// Looks up an external binding's scheme.
    pub fn lookup(&self, name: &str) -> Option<&Scheme> {
        self.bindings.get(name)
    }

    /// True if `name` is bound externally (used by the module driver to
    /// partition assumptions).
    pub fn contains(&self, name: &str) -> bool {
        self.bindings.contains_key(name)
    }

    /// The alias table backing this environment's type annotations.
    pub fn aliases(&self) -> &AliasTable {
        &self.aliases
    }

    /// Mutable access to the alias table, for registering `deftype`
    /// declarations before inference runs.
    pub fn aliases_mut(&mut self) -> &mut AliasTable {
        &mut self.aliases
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Monotype;

    #[test]
    fn lookup_finds_a_registered_binding() {
        let mut env = ExternalEnv::new();
        env.bind("zero?", Scheme::monomorphic(Monotype::boolean()));
        assert!(env.contains("zero?"));
        assert_eq!(env.lookup("zero?").unwrap().ty, Monotype::boolean());
    }

    #[test]
    fn unknown_names_are_absent() {
        let env = ExternalEnv::new();
        assert!(!env.contains("mystery"));
    }
}
