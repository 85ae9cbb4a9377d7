use crate::{
    context::{CompletionContext, PipelineContext, RootTypes, ValidationContext},
    definition::{DirectiveDefinition, FieldDefinition, OperationKind, TypeId},
    diagnostics::{Diagnostics, SchemaErrorCode},
    interceptor::{Hooks, TypeInterceptor},
    registry::TypeRegistry,
    schema::Schema,
};

/// The names of the root operation types.
#[derive(Debug, Clone)]
pub struct RootTypeNames {
    pub query: String,
    pub mutation: String,
    pub subscription: String,
}

impl Default for RootTypeNames {
    fn default() -> Self {
        RootTypeNames {
            query: "Query".to_owned(),
            mutation: "Mutation".to_owned(),
            subscription: "Subscription".to_owned(),
        }
    }
}

/// Fields and directives contributed to an existing type by a separate
/// declaration, merged into the base type during phase 3.
pub struct TypeExtension {
    pub target: String,
    pub fields: Vec<FieldDefinition>,
    pub directives: Vec<DirectiveDefinition>,
}

impl TypeExtension {
    pub fn new(target: impl Into<String>) -> Self {
        TypeExtension {
            target: target.into(),
            fields: Vec::new(),
            directives: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_field(mut self, field: FieldDefinition) -> Self {
        self.fields.push(field);
        self
    }

    #[must_use]
    pub fn with_directive(mut self, directive: DirectiveDefinition) -> Self {
        self.directives.push(directive);
        self
    }
}

/// Drives type compilation through the fixed phase sequence, invoking every
/// interceptor's implemented hooks at each phase boundary. Single-threaded;
/// interceptors run strictly sequentially within each phase.
pub(crate) struct TypeInitializer {
    pub(crate) registry: TypeRegistry,
    pub(crate) extensions: Vec<TypeExtension>,
    pub(crate) interceptors: Vec<Box<dyn TypeInterceptor>>,
    pub(crate) root_names: RootTypeNames,
    pub(crate) diagnostics: Diagnostics,
}

impl TypeInitializer {
    pub(crate) fn run(mut self) -> (Option<Schema>, Diagnostics) {
        tracing::debug!(types = self.registry.len(), "completing type names");
        self.complete_type_names();
        if self.diagnostics.any_fatal() {
            return (None, self.diagnostics);
        }

        let roots = RootTypes {
            query: self.registry.lookup(&self.root_names.query),
            mutation: self.registry.lookup(&self.root_names.mutation),
            subscription: self.registry.lookup(&self.root_names.subscription),
        };

        tracing::debug!("completing types");
        self.complete_types(roots);
        if self.diagnostics.any_fatal() {
            return (None, self.diagnostics);
        }

        tracing::debug!(extensions = self.extensions.len(), "merging type extensions");
        self.merge_type_extensions(roots);
        if self.diagnostics.any_fatal() {
            return (None, self.diagnostics);
        }

        tracing::debug!("validating types");
        self.validate(roots);
        if self.diagnostics.any_fatal() {
            return (None, self.diagnostics);
        }

        tracing::debug!("finalizing schema");
        let schema = self.finalize(roots);
        (schema, self.diagnostics)
    }

    /// Phase 1: every type obtains its final name and the unique name index
    /// is built.
    fn complete_type_names(&mut self) {
        let ids: Vec<TypeId> = self.registry.type_ids().collect();
        for id in ids {
            if let Err(collision) = self.registry.bind_name(id) {
                self.diagnostics
                    .push_fatal_with_code(collision.to_string(), SchemaErrorCode::TypeNameCollision);
            }
        }

        let TypeInitializer {
            registry,
            diagnostics,
            interceptors,
            ..
        } = self;
        let mut ctx = PipelineContext {
            registry,
            diagnostics,
            roots: RootTypes::default(),
        };
        for interceptor in interceptors.iter_mut() {
            if interceptor.capabilities().contains(Hooks::AFTER_COMPLETE_TYPE_NAMES) {
                interceptor.on_after_complete_type_names(&mut ctx);
            }
        }
    }

    /// Phase 2: per-type completion, then root type announcement at the
    /// phase boundary. The current definition is detached from the arena
    /// while its hooks run.
    fn complete_types(&mut self, roots: RootTypes) {
        let ids: Vec<TypeId> = self.registry.type_ids().collect();
        let TypeInitializer {
            registry,
            diagnostics,
            interceptors,
            ..
        } = self;

        for id in ids {
            let mut definition = registry.detach(id);
            let is_introspection = definition.is_introspection || definition.name.starts_with("__");
            let mut pipeline = PipelineContext {
                registry: &mut *registry,
                diagnostics: &mut *diagnostics,
                roots,
            };
            let mut ctx = CompletionContext {
                pipeline: &mut pipeline,
                current: id,
                current_is_introspection: is_introspection,
            };
            for interceptor in interceptors.iter_mut() {
                if interceptor.capabilities().contains(Hooks::BEFORE_COMPLETE_TYPE) {
                    interceptor.on_before_complete_type(&mut ctx, &mut definition);
                }
            }
            registry.attach(id, definition);
        }

        let root_list = [
            (OperationKind::Query, roots.query),
            (OperationKind::Mutation, roots.mutation),
            (OperationKind::Subscription, roots.subscription),
        ];
        for (operation, root) in root_list {
            let Some(id) = root else { continue };
            let mut definition = registry.detach(id);
            let mut pipeline = PipelineContext {
                registry: &mut *registry,
                diagnostics: &mut *diagnostics,
                roots,
            };
            let mut ctx = CompletionContext {
                pipeline: &mut pipeline,
                current: id,
                current_is_introspection: false,
            };
            for interceptor in interceptors.iter_mut() {
                if interceptor.capabilities().contains(Hooks::AFTER_RESOLVE_ROOT_TYPE) {
                    interceptor.on_after_resolve_root_type(&mut ctx, &mut definition, operation);
                }
            }
            registry.attach(id, definition);
        }
    }

    /// Phase 3: merge extensions into their base types, then let interceptors
    /// that depend on the final field set run. An extension target that fails
    /// to normalize aborts the whole compilation, since downstream types may
    /// depend on it.
    fn merge_type_extensions(&mut self, roots: RootTypes) {
        let extensions = std::mem::take(&mut self.extensions);
        for extension in extensions {
            let Some(target) = self.registry.lookup(&extension.target) else {
                self.diagnostics.push_fatal_with_code(
                    format!(
                        "Cannot resolve the type extension target `{}`.",
                        extension.target
                    ),
                    SchemaErrorCode::UnresolvedTypeReference,
                );
                return;
            };

            let definition = self.registry.definition_mut(target);
            let mut duplicates = Vec::new();
            for field in extension.fields {
                if definition.field(&field.name).is_some() {
                    duplicates.push(field.name);
                } else {
                    definition.fields.push(field);
                }
            }
            definition.directives.extend(extension.directives);

            for duplicate in duplicates {
                self.diagnostics.push_fatal_with_code(
                    format!(
                        "The extension for type `{}` declares the already existing field `{duplicate}`.",
                        extension.target
                    ),
                    SchemaErrorCode::FieldNameCollision,
                );
            }
        }

        if self.diagnostics.any_fatal() {
            return;
        }

        let TypeInitializer {
            registry,
            diagnostics,
            interceptors,
            ..
        } = self;
        let mut ctx = PipelineContext {
            registry,
            diagnostics,
            roots,
        };
        for interceptor in interceptors.iter_mut() {
            if interceptor
                .capabilities()
                .contains(Hooks::AFTER_MERGE_TYPE_EXTENSIONS)
            {
                interceptor.on_after_merge_type_extensions(&mut ctx);
            }
        }
    }

    /// Phase 4: read-only validation. Errors are accumulated across all
    /// types and reported together; they do not abort earlier phases.
    fn validate(&mut self, roots: RootTypes) {
        let ids: Vec<TypeId> = self.registry.type_ids().collect();
        let TypeInitializer {
            registry,
            diagnostics,
            interceptors,
            ..
        } = self;
        let registry = &*registry;

        for id in ids {
            let definition = registry.definition(id);
            let is_introspection = definition.is_introspection || definition.name.starts_with("__");
            let mut ctx = ValidationContext {
                registry,
                diagnostics: &mut *diagnostics,
                roots,
                current: id,
                current_is_introspection: is_introspection,
            };
            for interceptor in interceptors.iter_mut() {
                if interceptor.capabilities().contains(Hooks::VALIDATE_TYPE) {
                    interceptor.on_validate_type(&mut ctx, definition);
                }
            }
        }
    }

    /// Phase 5: definitions are frozen into the immutable schema and each
    /// field's middleware chain is compiled. Unresolved references here are
    /// fatal.
    fn finalize(&mut self, roots: RootTypes) -> Option<Schema> {
        Schema::freeze(&self.registry, roots, &mut self.diagnostics)
    }
}
