use crate::{
    definition::{TypeDefinition, TypeId},
    diagnostics::{Diagnostics, SchemaErrorCode},
    registry::{NameCollision, TypeRegistry},
};

/// The resolved root operation types of the schema under compilation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RootTypes {
    pub query: Option<TypeId>,
    pub mutation: Option<TypeId>,
    pub subscription: Option<TypeId>,
}

/// Shared compilation state threaded into every interceptor hook. Interceptor
/// instances themselves stay free of cross-run state.
pub struct PipelineContext<'a> {
    pub(crate) registry: &'a mut TypeRegistry,
    pub(crate) diagnostics: &'a mut Diagnostics,
    pub(crate) roots: RootTypes,
}

impl PipelineContext<'_> {
    pub fn registry(&self) -> &TypeRegistry {
        self.registry
    }

    pub fn registry_mut(&mut self) -> &mut TypeRegistry {
        self.registry
    }

    pub fn diagnostics(&mut self) -> &mut Diagnostics {
        self.diagnostics
    }

    pub fn roots(&self) -> RootTypes {
        self.roots
    }

    /// Register a type synthesized mid-pipeline: the definition is added to
    /// the arena and its name completed synchronously, so references to it
    /// resolve within the same phase.
    pub fn register_type(&mut self, definition: TypeDefinition) -> Result<TypeId, NameCollision> {
        let name = definition.name.clone();
        let id = self.registry.push(definition);
        match self.registry.bind_name(id) {
            Ok(()) => {
                tracing::debug!(%name, "registered synthesized type");
                Ok(id)
            }
            Err(collision) => {
                self.diagnostics
                    .push_fatal_with_code(collision.to_string(), SchemaErrorCode::TypeNameCollision);
                Err(collision)
            }
        }
    }

    pub(crate) fn detach(&mut self, id: TypeId) -> TypeDefinition {
        self.registry.detach(id)
    }

    pub(crate) fn attach(&mut self, id: TypeId, definition: TypeDefinition) {
        self.registry.attach(id, definition);
    }

    /// Report a fatal schema-build error.
    pub fn report_error(&mut self, code: SchemaErrorCode, message: impl Into<String>) {
        self.diagnostics.push_fatal_with_code(message.into(), code);
    }
}

/// Per-type compile-time context during the completion phase. The current
/// type's definition is detached from the registry while its hooks run.
pub struct CompletionContext<'a, 'b> {
    pub(crate) pipeline: &'a mut PipelineContext<'b>,
    pub(crate) current: TypeId,
    pub(crate) current_is_introspection: bool,
}

impl CompletionContext<'_, '_> {
    pub fn current_type_id(&self) -> TypeId {
        self.current
    }

    pub fn is_query_type(&self) -> bool {
        self.pipeline.roots.query == Some(self.current)
    }

    pub fn is_mutation_type(&self) -> bool {
        self.pipeline.roots.mutation == Some(self.current)
    }

    pub fn is_subscription_type(&self) -> bool {
        self.pipeline.roots.subscription == Some(self.current)
    }

    pub fn is_introspection_type(&self) -> bool {
        self.current_is_introspection
    }

    pub fn registry(&self) -> &TypeRegistry {
        self.pipeline.registry
    }

    pub fn register_type(&mut self, definition: TypeDefinition) -> Result<TypeId, NameCollision> {
        self.pipeline.register_type(definition)
    }

    pub fn report_error(&mut self, code: SchemaErrorCode, message: impl Into<String>) {
        self.pipeline.report_error(code, message);
    }
}

/// Read-only per-type context for the validation phase. Definitions may not
/// be mutated; violations are accumulated.
pub struct ValidationContext<'a> {
    pub(crate) registry: &'a TypeRegistry,
    pub(crate) diagnostics: &'a mut Diagnostics,
    pub(crate) roots: RootTypes,
    pub(crate) current: TypeId,
    pub(crate) current_is_introspection: bool,
}

impl ValidationContext<'_> {
    pub fn current_type_id(&self) -> TypeId {
        self.current
    }

    pub fn is_query_type(&self) -> bool {
        self.roots.query == Some(self.current)
    }

    pub fn is_mutation_type(&self) -> bool {
        self.roots.mutation == Some(self.current)
    }

    pub fn is_subscription_type(&self) -> bool {
        self.roots.subscription == Some(self.current)
    }

    pub fn is_introspection_type(&self) -> bool {
        self.current_is_introspection
    }

    pub fn registry(&self) -> &TypeRegistry {
        self.registry
    }

    pub fn report_error(&mut self, code: SchemaErrorCode, message: impl Into<String>) {
        self.diagnostics.push_fatal_with_code(message.into(), code);
    }
}
