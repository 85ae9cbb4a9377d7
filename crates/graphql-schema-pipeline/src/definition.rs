use std::sync::Arc;

use graphql_field_middleware::{FieldMiddleware, FieldResolver, InputValueFormatter};
use indexmap::IndexMap;

use crate::expression::TypeExpression;

/// Index of a type definition in the registry arena. Stable for the whole
/// compilation run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeId(pub(crate) usize);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TypeKind {
    Object,
    Interface,
    Union,
    InputObject,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OperationKind {
    Query,
    Mutation,
    Subscription,
}

/// The mutable, pre-finalization description of a type. Owned exclusively by
/// the type initializer during compilation; frozen at finalization.
#[derive(Clone)]
pub struct TypeDefinition {
    pub name: String,
    pub kind: TypeKind,
    pub fields: Vec<FieldDefinition>,
    pub directives: Vec<DirectiveDefinition>,
    pub is_introspection: bool,
}

impl TypeDefinition {
    fn new(name: impl Into<String>, kind: TypeKind) -> Self {
        TypeDefinition {
            name: name.into(),
            kind,
            fields: Vec::new(),
            directives: Vec::new(),
            is_introspection: false,
        }
    }

    pub fn object(name: impl Into<String>) -> Self {
        TypeDefinition::new(name, TypeKind::Object)
    }

    pub fn interface(name: impl Into<String>) -> Self {
        TypeDefinition::new(name, TypeKind::Interface)
    }

    pub fn union(name: impl Into<String>) -> Self {
        TypeDefinition::new(name, TypeKind::Union)
    }

    pub fn input_object(name: impl Into<String>) -> Self {
        TypeDefinition::new(name, TypeKind::InputObject)
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

    #[must_use]
    pub fn introspection(mut self) -> Self {
        self.is_introspection = true;
        self
    }

    pub fn field(&self, name: &str) -> Option<&FieldDefinition> {
        self.fields.iter().find(|field| field.name == name)
    }

    /// Placeholder occupying an arena slot while the real definition is
    /// detached for a hook invocation. Hooks must not look the current type
    /// up through the registry.
    pub(crate) fn detached() -> Self {
        TypeDefinition::new("", TypeKind::Object)
    }
}

/// The mutable, pre-finalization description of one field's shape, arguments
/// and decorator chain.
#[derive(Clone)]
pub struct FieldDefinition {
    pub name: String,
    pub ty: TypeExpression,
    pub arguments: Vec<ArgumentDefinition>,
    pub directives: Vec<DirectiveDefinition>,
    pub middleware: Vec<MiddlewareDefinition>,
    pub resolver: Option<Arc<dyn FieldResolver>>,
    /// Runtime value coercion, only populated on input object fields.
    pub formatters: Vec<Arc<dyn InputValueFormatter>>,
    /// Default value, only meaningful on input object fields.
    pub default_value: Option<serde_json::Value>,
    pub is_introspection: bool,
}

impl FieldDefinition {
    pub fn new(name: impl Into<String>, ty: TypeExpression) -> Self {
        FieldDefinition {
            name: name.into(),
            ty,
            arguments: Vec::new(),
            directives: Vec::new(),
            middleware: Vec::new(),
            resolver: None,
            formatters: Vec::new(),
            default_value: None,
            is_introspection: false,
        }
    }

    #[must_use]
    pub fn with_argument(mut self, argument: ArgumentDefinition) -> Self {
        self.arguments.push(argument);
        self
    }

    #[must_use]
    pub fn with_directive(mut self, directive: DirectiveDefinition) -> Self {
        self.directives.push(directive);
        self
    }

    #[must_use]
    pub fn with_middleware(mut self, middleware: MiddlewareDefinition) -> Self {
        self.middleware.push(middleware);
        self
    }

    #[must_use]
    pub fn with_resolver(mut self, resolver: Arc<dyn FieldResolver>) -> Self {
        self.resolver = Some(resolver);
        self
    }

    #[must_use]
    pub fn introspection(mut self) -> Self {
        self.is_introspection = true;
        self
    }
}

/// An argument on an output field.
#[derive(Clone)]
pub struct ArgumentDefinition {
    pub name: String,
    pub ty: TypeExpression,
    pub default_value: Option<serde_json::Value>,
    pub formatters: Vec<Arc<dyn InputValueFormatter>>,
}

impl ArgumentDefinition {
    pub fn new(name: impl Into<String>, ty: TypeExpression) -> Self {
        ArgumentDefinition {
            name: name.into(),
            ty,
            default_value: None,
            formatters: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_default(mut self, value: serde_json::Value) -> Self {
        self.default_value = Some(value);
        self
    }

    #[must_use]
    pub fn with_formatter(mut self, formatter: Arc<dyn InputValueFormatter>) -> Self {
        self.formatters.push(formatter);
        self
    }
}

/// Semantic tags for directives matched by capability rather than by name.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DirectiveCapability {
    CacheControl,
    Authorize,
}

/// How a directive is identified: by its schema name or by a semantic
/// capability tag. Compared structurally.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DirectiveReference {
    ByName(String),
    ByCapability(DirectiveCapability),
}

/// A directive attached to a type or field, with uniquely keyed arguments.
#[derive(Clone, Debug, PartialEq)]
pub struct DirectiveDefinition {
    pub reference: DirectiveReference,
    pub arguments: IndexMap<String, serde_json::Value>,
}

impl DirectiveDefinition {
    pub fn by_name(name: impl Into<String>) -> Self {
        DirectiveDefinition {
            reference: DirectiveReference::ByName(name.into()),
            arguments: IndexMap::new(),
        }
    }

    pub fn by_capability(capability: DirectiveCapability) -> Self {
        DirectiveDefinition {
            reference: DirectiveReference::ByCapability(capability),
            arguments: IndexMap::new(),
        }
    }

    #[must_use]
    pub fn with_argument(mut self, name: impl Into<String>, value: serde_json::Value) -> Self {
        self.arguments.insert(name.into(), value);
        self
    }

    /// Does this directive denote the given name or capability?
    pub fn matches(&self, name: &str, capability: DirectiveCapability) -> bool {
        match &self.reference {
            DirectiveReference::ByName(directive_name) => directive_name == name,
            DirectiveReference::ByCapability(tag) => *tag == capability,
        }
    }
}

/// Creates the request-time middleware instance for one field. Factories run
/// once per field at schema finalization.
pub trait MiddlewareFactory: Send + Sync {
    fn create(&self) -> Arc<dyn FieldMiddleware>;
}

impl<F> MiddlewareFactory for F
where
    F: Fn() -> Arc<dyn FieldMiddleware> + Send + Sync,
{
    fn create(&self) -> Arc<dyn FieldMiddleware> {
        self()
    }
}

/// One entry in a field's middleware definition list: a factory plus an
/// optional key identifying the middleware's origin.
#[derive(Clone)]
pub struct MiddlewareDefinition {
    pub factory: Arc<dyn MiddlewareFactory>,
    pub key: Option<String>,
}

impl MiddlewareDefinition {
    pub fn new(factory: impl MiddlewareFactory + 'static) -> Self {
        MiddlewareDefinition {
            factory: Arc::new(factory),
            key: None,
        }
    }

    pub fn keyed(key: impl Into<String>, factory: impl MiddlewareFactory + 'static) -> Self {
        MiddlewareDefinition {
            factory: Arc::new(factory),
            key: Some(key.into()),
        }
    }
}
