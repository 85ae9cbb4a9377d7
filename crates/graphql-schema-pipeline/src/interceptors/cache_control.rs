use crate::{
    context::CompletionContext,
    definition::{
        DirectiveCapability, DirectiveDefinition, FieldDefinition, TypeDefinition, TypeKind,
    },
    interceptor::{Hooks, TypeInterceptor},
    options::CacheControlOptions,
    registry::TypeRegistry,
};

pub const CACHE_CONTROL_DIRECTIVE_NAME: &str = "cacheControl";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CacheControlScope {
    #[default]
    Public,
    Private,
}

/// The parsed arguments of a `@cacheControl` directive.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CacheControlDirective {
    pub max_age: Option<i64>,
    pub scope: Option<CacheControlScope>,
    pub inherit_max_age: Option<bool>,
}

impl CacheControlDirective {
    /// Returns `None` when the directive is not a cache-control directive,
    /// `Some(Err)` when it is but its arguments are malformed.
    pub fn from_directive(directive: &DirectiveDefinition) -> Option<Result<Self, String>> {
        if !directive.matches(CACHE_CONTROL_DIRECTIVE_NAME, DirectiveCapability::CacheControl) {
            return None;
        }

        let mut parsed = CacheControlDirective::default();
        for (name, value) in &directive.arguments {
            match name.as_str() {
                "maxAge" => match value.as_i64() {
                    Some(max_age) => parsed.max_age = Some(max_age),
                    None => return Some(Err("`maxAge` must be an integer".to_owned())),
                },
                "inheritMaxAge" => match value.as_bool() {
                    Some(inherit) => parsed.inherit_max_age = Some(inherit),
                    None => return Some(Err("`inheritMaxAge` must be a boolean".to_owned())),
                },
                "scope" => match value.as_str() {
                    Some("PUBLIC") => parsed.scope = Some(CacheControlScope::Public),
                    Some("PRIVATE") => parsed.scope = Some(CacheControlScope::Private),
                    _ => return Some(Err("`scope` must be PUBLIC or PRIVATE".to_owned())),
                },
                other => return Some(Err(format!("unknown argument `{other}`"))),
            }
        }
        Some(Ok(parsed))
    }
}

pub(crate) fn find_cache_control(directives: &[DirectiveDefinition]) -> Option<&DirectiveDefinition> {
    directives
        .iter()
        .find(|directive| directive.matches(CACHE_CONTROL_DIRECTIVE_NAME, DirectiveCapability::CacheControl))
}

/// Attaches a default `@cacheControl` directive to data-fetching fields
/// during the per-type completion phase. Fields with an explicit directive,
/// introspection fields and fields of non-cacheable root types are left
/// alone.
pub struct CacheControlTypeInterceptor {
    options: CacheControlOptions,
}

impl CacheControlTypeInterceptor {
    pub fn new(options: CacheControlOptions) -> Self {
        CacheControlTypeInterceptor { options }
    }

    fn default_directive(&self) -> DirectiveDefinition {
        DirectiveDefinition::by_name(CACHE_CONTROL_DIRECTIVE_NAME)
            .with_argument("maxAge", serde_json::json!(self.options.default_max_age))
    }
}

impl TypeInterceptor for CacheControlTypeInterceptor {
    fn capabilities(&self) -> Hooks {
        Hooks::BEFORE_COMPLETE_TYPE
    }

    fn on_before_complete_type(
        &mut self,
        ctx: &mut CompletionContext<'_, '_>,
        definition: &mut TypeDefinition,
    ) {
        if !self.options.enable || !self.options.apply_defaults {
            return;
        }

        if ctx.is_introspection_type() || ctx.is_mutation_type() || ctx.is_subscription_type() {
            return;
        }

        if definition.kind != TypeKind::Object {
            return;
        }

        let is_query_type = ctx.is_query_type();

        for field in &mut definition.fields {
            if field.is_introspection {
                // Introspection fields do not need to be declared as cachable.
                continue;
            }

            if find_cache_control(&field.directives).is_some() {
                // An explicit directive always wins over defaults.
                continue;
            }

            if is_query_type || is_data_resolver(ctx.registry(), field) {
                // Each field on the query type and data resolver fields are
                // treated as fields that need to be explicitly cached.
                field.directives.push(self.default_directive());
            }
        }
    }
}

/// A field that fetches data on its own: it has an attached resolver and
/// returns a list or an object type.
fn is_data_resolver(registry: &TypeRegistry, field: &FieldDefinition) -> bool {
    if field.resolver.is_none() {
        return false;
    }
    if field.ty.wrapping.is_list() {
        return true;
    }
    registry
        .peek_reference(&field.ty.target)
        .is_some_and(|id| registry.definition(id).kind == TypeKind::Object)
}
