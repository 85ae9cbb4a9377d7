use indexmap::IndexMap;

use crate::{
    definition::{TypeDefinition, TypeId},
    expression::TypeReference,
};

/// A type name is already bound to a different registry entry.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("the type name `{0}` is already registered")]
pub struct NameCollision(pub String);

/// A symbolic reference did not match any registered type.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("the type `{0}` is not registered")]
pub struct UnresolvedReference(pub String);

/// Arena of type definitions plus the unique name index. Mutated only during
/// compilation, on a single thread; the finalized schema no longer touches
/// it.
#[derive(Default)]
pub struct TypeRegistry {
    types: Vec<TypeDefinition>,
    by_name: IndexMap<String, TypeId>,
}

impl TypeRegistry {
    /// Add a definition to the arena without binding its name yet.
    pub fn push(&mut self, definition: TypeDefinition) -> TypeId {
        let id = TypeId(self.types.len());
        self.types.push(definition);
        id
    }

    /// Bind the definition's name in the unique name index. Re-binding the
    /// same id is idempotent; binding a name owned by another id is a
    /// collision.
    pub(crate) fn bind_name(&mut self, id: TypeId) -> Result<(), NameCollision> {
        let name = self.types[id.0].name.clone();
        match self.by_name.get(&name) {
            Some(existing) if *existing == id => Ok(()),
            Some(_) => Err(NameCollision(name)),
            None => {
                self.by_name.insert(name, id);
                Ok(())
            }
        }
    }

    pub fn definition(&self, id: TypeId) -> &TypeDefinition {
        &self.types[id.0]
    }

    pub fn definition_mut(&mut self, id: TypeId) -> &mut TypeDefinition {
        &mut self.types[id.0]
    }

    pub fn lookup(&self, name: &str) -> Option<TypeId> {
        self.by_name.get(name).copied()
    }

    pub fn contains_name(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    pub fn type_ids(&self) -> impl Iterator<Item = TypeId> {
        (0..self.types.len()).map(TypeId)
    }

    /// Normalize a reference to its registry entry, memoizing the resolution
    /// in place. Idempotent: an already resolved reference keeps its target.
    pub fn resolve_reference(&self, reference: &mut TypeReference) -> Result<TypeId, UnresolvedReference> {
        match reference {
            TypeReference::Resolved(id) => Ok(*id),
            TypeReference::Unresolved(name) => {
                let id = self
                    .lookup(name)
                    .ok_or_else(|| UnresolvedReference(name.clone()))?;
                *reference = TypeReference::Resolved(id);
                Ok(id)
            }
        }
    }

    /// Non-memoizing lookup of a reference's target.
    pub fn peek_reference(&self, reference: &TypeReference) -> Option<TypeId> {
        match reference {
            TypeReference::Resolved(id) => Some(*id),
            TypeReference::Unresolved(name) => self.lookup(name),
        }
    }

    /// Take a definition out of the arena while a hook mutates it, leaving a
    /// placeholder behind.
    pub(crate) fn detach(&mut self, id: TypeId) -> TypeDefinition {
        std::mem::replace(&mut self.types[id.0], TypeDefinition::detached())
    }

    pub(crate) fn attach(&mut self, id: TypeId, definition: TypeDefinition) {
        self.types[id.0] = definition;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bind_name_is_idempotent_per_id() {
        let mut registry = TypeRegistry::default();
        let id = registry.push(TypeDefinition::object("User"));
        registry.bind_name(id).unwrap();
        registry.bind_name(id).unwrap();
        assert_eq!(registry.lookup("User"), Some(id));
    }

    #[test]
    fn bind_name_detects_collisions() {
        let mut registry = TypeRegistry::default();
        let first = registry.push(TypeDefinition::object("User"));
        let second = registry.push(TypeDefinition::object("User"));
        registry.bind_name(first).unwrap();
        assert_eq!(registry.bind_name(second), Err(NameCollision("User".to_owned())));
    }

    #[test]
    fn resolution_is_memoized_and_stable() {
        let mut registry = TypeRegistry::default();
        let id = registry.push(TypeDefinition::object("User"));
        registry.bind_name(id).unwrap();

        let mut reference = TypeReference::named("User");
        assert_eq!(registry.resolve_reference(&mut reference), Ok(id));
        assert_eq!(reference, TypeReference::Resolved(id));
        // A second resolution never rebinds the target.
        assert_eq!(registry.resolve_reference(&mut reference), Ok(id));
    }
}
