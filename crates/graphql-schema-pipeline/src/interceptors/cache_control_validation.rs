use super::cache_control::{find_cache_control, CacheControlDirective};
use crate::{
    context::ValidationContext,
    definition::{FieldDefinition, TypeDefinition, TypeKind},
    diagnostics::SchemaErrorCode,
    interceptor::{Hooks, TypeInterceptor},
};

/// Rejects contradictory or meaningless `@cacheControl` usage during the
/// validation phase. Every violation in a type is reported, not just the
/// first; nothing is mutated.
#[derive(Default)]
pub struct CacheControlValidationTypeInterceptor;

impl TypeInterceptor for CacheControlValidationTypeInterceptor {
    fn capabilities(&self) -> Hooks {
        Hooks::VALIDATE_TYPE
    }

    fn on_validate_type(&mut self, ctx: &mut ValidationContext<'_>, definition: &TypeDefinition) {
        if ctx.is_introspection_type() {
            return;
        }

        match definition.kind {
            TypeKind::Object => {
                validate_on_type(ctx, definition);
                let is_query_type = ctx.is_query_type();
                for field in &definition.fields {
                    validate_on_field(ctx, definition, field, is_query_type, false);
                }
            }
            TypeKind::Interface => {
                validate_on_type(ctx, definition);
                for field in &definition.fields {
                    validate_on_field(ctx, definition, field, false, true);
                }
            }
            TypeKind::Union => validate_on_type(ctx, definition),
            TypeKind::InputObject => {}
        }
    }
}

fn validate_on_type(ctx: &mut ValidationContext<'_>, definition: &TypeDefinition) {
    let Some(directive) = find_cache_control(&definition.directives) else {
        return;
    };

    let parsed = match CacheControlDirective::from_directive(directive) {
        Some(Ok(parsed)) => parsed,
        Some(Err(message)) => {
            ctx.report_error(
                SchemaErrorCode::MalformedDirective,
                format!("Malformed @cacheControl on type `{}`: {message}.", definition.name),
            );
            return;
        }
        None => return,
    };

    if parsed.inherit_max_age == Some(true) {
        ctx.report_error(
            SchemaErrorCode::CacheControlInheritMaxAgeOnType,
            format!(
                "The type `{}` specifies `inheritMaxAge`, which is only valid on fields.",
                definition.name
            ),
        );
    }
}

fn validate_on_field(
    ctx: &mut ValidationContext<'_>,
    parent: &TypeDefinition,
    field: &FieldDefinition,
    is_query_type_field: bool,
    is_interface_field: bool,
) {
    let Some(directive) = find_cache_control(&field.directives) else {
        return;
    };

    if is_interface_field {
        ctx.report_error(
            SchemaErrorCode::CacheControlOnInterfaceField,
            format!(
                "@cacheControl is not allowed on the interface field `{}.{}`.",
                parent.name, field.name
            ),
        );
        return;
    }

    let parsed = match CacheControlDirective::from_directive(directive) {
        Some(Ok(parsed)) => parsed,
        Some(Err(message)) => {
            ctx.report_error(
                SchemaErrorCode::MalformedDirective,
                format!(
                    "Malformed @cacheControl on field `{}.{}`: {message}.",
                    parent.name, field.name
                ),
            );
            return;
        }
        None => return,
    };

    let inherit_max_age = parsed.inherit_max_age == Some(true);

    if is_query_type_field && inherit_max_age {
        ctx.report_error(
            SchemaErrorCode::CacheControlInheritMaxAgeOnQueryTypeField,
            format!(
                "The query root field `{}.{}` specifies `inheritMaxAge`, but it has nothing to inherit from.",
                parent.name, field.name
            ),
        );
    }

    if let Some(max_age) = parsed.max_age {
        if max_age < 0 {
            ctx.report_error(
                SchemaErrorCode::CacheControlNegativeMaxAge,
                format!(
                    "The field `{}.{}` specifies a negative `maxAge`.",
                    parent.name, field.name
                ),
            );
        }

        if inherit_max_age {
            ctx.report_error(
                SchemaErrorCode::CacheControlBothMaxAgeAndInheritMaxAge,
                format!(
                    "The field `{}.{}` specifies both `maxAge` and `inheritMaxAge`, which contradict each other.",
                    parent.name, field.name
                ),
            );
        }
    }
}
