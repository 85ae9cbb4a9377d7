use std::sync::Arc;

use graphql_field_middleware::{
    FieldContext, FieldError, FieldOutput, FieldPipeline, FieldResolver,
};
use indexmap::IndexMap;

use crate::{
    context::RootTypes,
    definition::{DirectiveDefinition, TypeKind},
    diagnostics::{Diagnostics, SchemaErrorCode},
    registry::TypeRegistry,
};

/// Resolver for fields with no explicit resolver. Reflection-based resolver
/// generation lives outside this crate, so the fallback yields null.
struct NullResolver;

#[async_trait::async_trait]
impl FieldResolver for NullResolver {
    async fn resolve(&self, _ctx: &mut FieldContext) -> Result<serde_json::Value, FieldError> {
        Ok(serde_json::Value::Null)
    }
}

/// An argument on a finalized field.
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledArgument {
    pub name: String,
    pub ty: String,
    pub default_value: Option<serde_json::Value>,
}

/// A finalized field: frozen shape plus the compiled middleware chain that
/// executes at request time.
pub struct CompiledField {
    pub name: String,
    pub ty: String,
    pub arguments: Vec<CompiledArgument>,
    pub directives: Vec<DirectiveDefinition>,
    pub is_introspection: bool,
    pipeline: FieldPipeline,
}

impl CompiledField {
    /// Run the field's chain against the given invocation context. Returns
    /// `None` when the invocation was cancelled before producing a result.
    pub async fn execute(&self, mut ctx: FieldContext) -> Option<FieldOutput> {
        self.pipeline.execute(&mut ctx).await;
        ctx.take_result()
    }

    /// The number of middleware wrapping this field's resolver.
    pub fn middleware_len(&self) -> usize {
        self.pipeline.len()
    }
}

/// A finalized type.
pub struct CompiledType {
    pub name: String,
    pub kind: TypeKind,
    pub directives: Vec<DirectiveDefinition>,
    pub is_introspection: bool,
    pub fields: Vec<CompiledField>,
}

impl CompiledType {
    pub fn field(&self, name: &str) -> Option<&CompiledField> {
        self.fields.iter().find(|field| field.name == name)
    }
}

/// The immutable, compiled schema. Shared by reference after compilation;
/// the registry it was built from is no longer reachable.
pub struct Schema {
    types: IndexMap<String, Arc<CompiledType>>,
    query_type: Option<String>,
    mutation_type: Option<String>,
    subscription_type: Option<String>,
}

impl std::fmt::Debug for Schema {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Schema")
            .field("types", &self.types.keys().collect::<Vec<_>>())
            .field("query_type", &self.query_type)
            .field("mutation_type", &self.mutation_type)
            .field("subscription_type", &self.subscription_type)
            .finish_non_exhaustive()
    }
}

impl Schema {
    pub fn get_type(&self, name: &str) -> Option<&Arc<CompiledType>> {
        self.types.get(name)
    }

    pub fn field(&self, type_name: &str, field_name: &str) -> Option<&CompiledField> {
        self.types.get(type_name)?.field(field_name)
    }

    pub fn type_names(&self) -> impl Iterator<Item = &str> {
        self.types.keys().map(String::as_str)
    }

    pub fn query_type(&self) -> Option<&Arc<CompiledType>> {
        self.types.get(self.query_type.as_deref()?)
    }

    pub fn mutation_type(&self) -> Option<&Arc<CompiledType>> {
        self.types.get(self.mutation_type.as_deref()?)
    }

    pub fn subscription_type(&self) -> Option<&Arc<CompiledType>> {
        self.types.get(self.subscription_type.as_deref()?)
    }

    /// Freeze the registry into an immutable schema, resolving every
    /// remaining type reference and compiling every field's middleware
    /// chain. Unresolved references at this point are fatal.
    pub(crate) fn freeze(
        registry: &TypeRegistry,
        roots: RootTypes,
        diagnostics: &mut Diagnostics,
    ) -> Option<Schema> {
        let mut types = IndexMap::with_capacity(registry.len());
        let mut failed = false;

        for id in registry.type_ids() {
            let definition = registry.definition(id);
            let mut fields = Vec::with_capacity(definition.fields.len());

            for field in &definition.fields {
                let Some(target) = registry.peek_reference(&field.ty.target) else {
                    report_unresolved(diagnostics, &definition.name, field);
                    failed = true;
                    continue;
                };
                let ty = field.ty.render(&registry.definition(target).name);

                let mut arguments = Vec::with_capacity(field.arguments.len());
                for argument in &field.arguments {
                    let Some(target) = registry.peek_reference(&argument.ty.target) else {
                        report_unresolved(diagnostics, &definition.name, field);
                        failed = true;
                        continue;
                    };
                    arguments.push(CompiledArgument {
                        name: argument.name.clone(),
                        ty: argument.ty.render(&registry.definition(target).name),
                        default_value: argument.default_value.clone(),
                    });
                }

                let resolver: Arc<dyn FieldResolver> = match &field.resolver {
                    Some(resolver) => resolver.clone(),
                    None => Arc::new(NullResolver),
                };
                let mut pipeline = FieldPipeline::new(resolver);
                for middleware in &field.middleware {
                    pipeline.push(middleware.factory.create());
                }

                fields.push(CompiledField {
                    name: field.name.clone(),
                    ty,
                    arguments,
                    directives: field.directives.clone(),
                    is_introspection: field.is_introspection,
                    pipeline,
                });
            }

            types.insert(
                definition.name.clone(),
                Arc::new(CompiledType {
                    name: definition.name.clone(),
                    kind: definition.kind,
                    directives: definition.directives.clone(),
                    is_introspection: definition.is_introspection,
                    fields,
                }),
            );
        }

        if failed {
            return None;
        }

        let type_name = |id| registry.definition(id).name.clone();
        Some(Schema {
            types,
            query_type: roots.query.map(type_name),
            mutation_type: roots.mutation.map(type_name),
            subscription_type: roots.subscription.map(type_name),
        })
    }
}

fn report_unresolved(
    diagnostics: &mut Diagnostics,
    type_name: &str,
    field: &crate::definition::FieldDefinition,
) {
    diagnostics.push_fatal_with_code(
        format!(
            "The field `{type_name}.{}` references a type that is not registered.",
            field.name
        ),
        SchemaErrorCode::UnresolvedTypeReference,
    );
}
