//! A staged GraphQL schema compiler.
//!
//! Type definitions are registered with a [`SchemaBuilder`], then driven
//! through a fixed sequence of compilation phases: name completion, per-type
//! completion, extension merging, validation and finalization. At every phase
//! boundary [`TypeInterceptor`]s observe and rewrite the type graph; the
//! built-in interceptors implement the mutation input/payload convention and
//! cache-control defaulting and validation.
//!
//! The output is an immutable [`Schema`] whose fields carry compiled
//! request-time middleware chains from the `graphql-field-middleware` crate.

#![deny(unsafe_code, rust_2018_idioms)]

mod context;
mod definition;
mod diagnostics;
mod expression;
mod initializer;
mod interceptor;
mod options;
mod registry;
mod result;
mod schema;

pub mod interceptors;

pub use context::{CompletionContext, PipelineContext, RootTypes, ValidationContext};
pub use definition::{
    ArgumentDefinition, DirectiveCapability, DirectiveDefinition, DirectiveReference,
    FieldDefinition, MiddlewareDefinition, MiddlewareFactory, OperationKind, TypeDefinition,
    TypeId, TypeKind,
};
pub use diagnostics::{Diagnostics, SchemaErrorCode};
pub use expression::{InvalidTypeExpression, ListWrapping, TypeExpression, TypeReference, Wrapping};
pub use initializer::{RootTypeNames, TypeExtension};
pub use interceptor::{Hooks, TypeInterceptor};
pub use options::{
    CacheControlOptions, MutationContextData, MutationConventionOptions, MUTATION_NAME_PLACEHOLDER,
};
pub use registry::{NameCollision, TypeRegistry, UnresolvedReference};
pub use result::CompileResult;
pub use schema::{CompiledArgument, CompiledField, CompiledType, Schema};

use crate::{
    initializer::TypeInitializer,
    interceptors::{
        CacheControlTypeInterceptor, CacheControlValidationTypeInterceptor,
        MutationConventionInterceptor,
    },
};

/// Collects type definitions, extensions and interceptors, then compiles
/// them into a [`Schema`].
///
/// The built-in interceptors are arranged so that cache-control defaulting
/// runs before user interceptors, the mutation convention runs before user
/// interceptors within the same hooks, and cache-control validation runs
/// last and therefore sees every synthesized type.
#[derive(Default)]
pub struct SchemaBuilder {
    registry: TypeRegistry,
    extensions: Vec<TypeExtension>,
    interceptors: Vec<Box<dyn TypeInterceptor>>,
    root_names: RootTypeNames,
    mutation_conventions: Option<MutationConventionOptions>,
    mutation_context: Vec<MutationContextData>,
    cache_control: Option<CacheControlOptions>,
}

impl SchemaBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a type definition. Name uniqueness is enforced during the
    /// name completion phase, not here.
    #[must_use]
    pub fn with_type(mut self, definition: TypeDefinition) -> Self {
        self.registry.push(definition);
        self
    }

    #[must_use]
    pub fn with_type_extension(mut self, extension: TypeExtension) -> Self {
        self.extensions.push(extension);
        self
    }

    /// Registers an interceptor. User interceptors run after the built-in
    /// rewriting interceptors, in registration order.
    #[must_use]
    pub fn with_interceptor(mut self, interceptor: impl TypeInterceptor + 'static) -> Self {
        self.interceptors.push(Box::new(interceptor));
        self
    }

    /// Overrides the names under which the root operation types are looked
    /// up. Defaults to `Query`, `Mutation` and `Subscription`.
    #[must_use]
    pub fn root_type_names(mut self, names: RootTypeNames) -> Self {
        self.root_names = names;
        self
    }

    /// Enables the mutation input/payload convention for this schema.
    #[must_use]
    pub fn enable_mutation_conventions(mut self, options: MutationConventionOptions) -> Self {
        self.mutation_conventions = Some(options);
        self
    }

    /// Supplies per-field convention configuration. Entries only take effect
    /// when [`enable_mutation_conventions`](Self::enable_mutation_conventions)
    /// is also called.
    #[must_use]
    pub fn with_mutation_context(mut self, data: MutationContextData) -> Self {
        self.mutation_context.push(data);
        self
    }

    /// Enables the cache-control interceptors.
    #[must_use]
    pub fn enable_cache_control(mut self, options: CacheControlOptions) -> Self {
        self.cache_control = Some(options);
        self
    }

    /// Runs the compilation pipeline to completion. Phases abort on the first
    /// fatal diagnostic; validation errors accumulate across all types before
    /// aborting finalization.
    pub fn compile(self) -> CompileResult {
        let SchemaBuilder {
            registry,
            extensions,
            interceptors: user_interceptors,
            root_names,
            mutation_conventions,
            mutation_context,
            cache_control,
        } = self;

        let cache_control_enabled = cache_control.as_ref().is_some_and(|options| options.enable);

        let mut interceptors: Vec<Box<dyn TypeInterceptor>> = Vec::new();
        if let Some(options) = cache_control.clone().filter(|_| cache_control_enabled) {
            interceptors.push(Box::new(CacheControlTypeInterceptor::new(options)));
        }
        if let Some(options) = mutation_conventions {
            interceptors.push(Box::new(MutationConventionInterceptor::new(
                options,
                mutation_context,
            )));
        }
        interceptors.extend(user_interceptors);
        if cache_control_enabled {
            interceptors.push(Box::new(CacheControlValidationTypeInterceptor::default()));
        }

        let initializer = TypeInitializer {
            registry,
            extensions,
            interceptors,
            root_names,
            diagnostics: Diagnostics::default(),
        };
        let (schema, diagnostics) = initializer.run();
        CompileResult { schema, diagnostics }
    }
}
