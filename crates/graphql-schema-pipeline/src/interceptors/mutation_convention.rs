use std::{collections::HashSet, sync::Arc};

use graphql_field_middleware::{
    AggregateInputValueFormatter, ErrorCode, FieldContext, FieldError, FieldMiddleware, FieldOutput,
    InputValueFormatter, Next, PassThrough,
};

use crate::{
    context::{CompletionContext, PipelineContext},
    definition::{
        ArgumentDefinition, FieldDefinition, MiddlewareDefinition, OperationKind, TypeDefinition,
        TypeId,
    },
    diagnostics::SchemaErrorCode,
    expression::TypeExpression,
    interceptor::{Hooks, TypeInterceptor},
    options::{lower_first, MutationContextData, MutationConventionOptions, ResolvedConventionOptions},
};

/// The middleware key under which the convention's input-unwrap middleware
/// is inserted at the front of a mutation field's chain.
pub const MUTATION_CONVENTION_MIDDLEWARE_KEY: &str = "mutationConvention";

/// Applies the mutation input/payload convention: wraps every matching
/// mutation field's arguments into a synthesized input type and its result
/// into a synthesized payload type.
///
/// Runs after type extensions are merged, because it needs the mutation
/// root's final field set.
pub struct MutationConventionInterceptor {
    options: MutationConventionOptions,
    context_data: Vec<MutationContextData>,
    /// Scoped to one compilation run, set when the mutation root resolves.
    mutation_type: Option<TypeId>,
}

impl MutationConventionInterceptor {
    pub fn new(options: MutationConventionOptions, context_data: Vec<MutationContextData>) -> Self {
        MutationConventionInterceptor {
            options,
            context_data,
            mutation_type: None,
        }
    }

    fn try_apply_input_convention(
        ctx: &mut PipelineContext<'_>,
        field: &mut FieldDefinition,
        options: &ResolvedConventionOptions,
    ) {
        if field.arguments.is_empty() {
            // Nothing to wrap.
            return;
        }

        let input_type_name = options.format_input_type_name(&field.name);

        if ctx.registry().contains_name(&input_type_name) {
            // An existing type with the computed name is treated as a
            // user-provided override, not an error.
            return;
        }

        let mut input_type = TypeDefinition::input_object(&input_type_name);
        for argument in &field.arguments {
            let mut input_field = FieldDefinition::new(&argument.name, argument.ty.clone());
            // Formatting rules are preserved verbatim on the input fields.
            input_field.formatters = argument.formatters.clone();
            input_field.default_value = argument.default_value.clone();
            input_type.fields.push(input_field);
        }
        if ctx.register_type(input_type).is_err() {
            return;
        }

        let arguments = field
            .arguments
            .iter()
            .map(|argument| ResolverArgument {
                name: argument.name.clone(),
                default_value: argument.default_value.clone(),
                formatter: match argument.formatters.as_slice() {
                    [] => None,
                    [single] => Some(single.clone()),
                    many => {
                        let aggregate: Arc<dyn InputValueFormatter> =
                            Arc::new(AggregateInputValueFormatter::new(many.to_vec()));
                        Some(aggregate)
                    }
                },
            })
            .collect();

        let middleware: Arc<dyn FieldMiddleware> = Arc::new(MutationConventionMiddleware {
            input_argument_name: options.input_argument_name.clone(),
            arguments,
        });

        field.arguments = vec![ArgumentDefinition::new(
            &options.input_argument_name,
            TypeExpression::non_null_named(&input_type_name),
        )];
        field.middleware.insert(
            0,
            MiddlewareDefinition::keyed(MUTATION_CONVENTION_MIDDLEWARE_KEY, move || middleware.clone()),
        );
    }

    fn try_apply_payload_convention(
        ctx: &mut PipelineContext<'_>,
        field: &mut FieldDefinition,
        payload_field_name: Option<String>,
        options: &ResolvedConventionOptions,
    ) -> Result<(), ()> {
        let payload_type_name = options.format_payload_type_name(&field.name);

        // This phase runs after extension merging, so the return type must
        // already be resolvable; failing here indicates a prior-phase bug
        // and is not recoverable.
        let Ok(return_type) = ctx.registry().resolve_reference(&mut field.ty.target) else {
            ctx.report_error(
                SchemaErrorCode::UnresolvedTypeReference,
                format!(
                    "Cannot resolve the payload type of the mutation field `{}`.",
                    field.name
                ),
            );
            return Err(());
        };

        let return_type_name = ctx.registry().definition(return_type).name.clone();
        if return_type_name == payload_type_name {
            // The return type already is the payload type.
            return Ok(());
        }

        let payload_field_name = payload_field_name.unwrap_or_else(|| lower_first(&return_type_name));
        let payload_type = TypeDefinition::object(&payload_type_name).with_field(
            FieldDefinition::new(payload_field_name, field.ty.clone())
                .with_resolver(Arc::new(PassThrough)),
        );
        let Ok(payload_type_id) = ctx.register_type(payload_type) else {
            return Err(());
        };

        field.ty = TypeExpression::non_null_resolved(payload_type_id);
        Ok(())
    }
}

impl TypeInterceptor for MutationConventionInterceptor {
    fn capabilities(&self) -> Hooks {
        Hooks::AFTER_RESOLVE_ROOT_TYPE | Hooks::AFTER_MERGE_TYPE_EXTENSIONS
    }

    fn on_after_resolve_root_type(
        &mut self,
        ctx: &mut CompletionContext<'_, '_>,
        _definition: &mut TypeDefinition,
        operation: OperationKind,
    ) {
        if operation == OperationKind::Mutation {
            self.mutation_type = Some(ctx.current_type_id());
        }
    }

    fn on_after_merge_type_extensions(&mut self, ctx: &mut PipelineContext<'_>) {
        let Some(mutation_type) = self.mutation_type else {
            return;
        };

        let mut definition = ctx.detach(mutation_type);
        let mut consumed: HashSet<&str> = HashSet::new();

        for field in &mut definition.fields {
            if field.is_introspection {
                continue;
            }

            let data = self
                .context_data
                .iter()
                .find(|data| data.field_name == field.name);
            if let Some(data) = data {
                consumed.insert(data.field_name.as_str());
            }

            let options = ResolvedConventionOptions::new(&self.options, data);
            if !options.apply {
                continue;
            }

            tracing::debug!(field = %field.name, "applying mutation conventions");
            Self::try_apply_input_convention(ctx, field, &options);
            let payload_field_name = data.and_then(|data| data.payload_field_name.clone());
            if Self::try_apply_payload_convention(ctx, field, payload_field_name, &options).is_err() {
                break;
            }
        }

        ctx.attach(mutation_type, definition);

        // Configuration is consumed at most once per mutation field; report
        // entries that never matched.
        for data in &self.context_data {
            if !consumed.contains(data.field_name.as_str()) {
                ctx.diagnostics().push_warning(format!(
                    "The mutation convention configuration for `{}` does not match any mutation field.",
                    data.field_name
                ));
            }
        }
    }
}

struct ResolverArgument {
    name: String,
    default_value: Option<serde_json::Value>,
    formatter: Option<Arc<dyn InputValueFormatter>>,
}

/// Request-time counterpart of the input convention: unwraps the single
/// input argument back into the individual named arguments the original
/// resolver expects.
struct MutationConventionMiddleware {
    input_argument_name: String,
    arguments: Vec<ResolverArgument>,
}

#[async_trait::async_trait]
impl FieldMiddleware for MutationConventionMiddleware {
    async fn invoke(&self, ctx: &mut FieldContext, next: Next<'_>) {
        let input = ctx.arguments_mut().shift_remove(&self.input_argument_name);
        let input = match input {
            Some(serde_json::Value::Object(map)) => map,
            _ => {
                let error = FieldError::new(
                    ErrorCode::InvalidInputValue,
                    format!("Expected an input object for argument `{}`.", self.input_argument_name),
                    ctx.path().clone(),
                );
                ctx.set_result(FieldOutput::Errors(vec![error]));
                return;
            }
        };

        for argument in &self.arguments {
            let value = input
                .get(&argument.name)
                .cloned()
                .or_else(|| argument.default_value.clone())
                .unwrap_or(serde_json::Value::Null);

            let value = match &argument.formatter {
                Some(formatter) => match formatter.format(value) {
                    Ok(value) => value,
                    Err(error) => {
                        let error = FieldError::new(
                            ErrorCode::InvalidInputValue,
                            error.to_string(),
                            ctx.path().clone(),
                        );
                        ctx.set_result(FieldOutput::Errors(vec![error]));
                        return;
                    }
                },
                None => value,
            };

            ctx.arguments_mut().insert(argument.name.clone(), value);
        }

        next.run(ctx).await;
    }
}
