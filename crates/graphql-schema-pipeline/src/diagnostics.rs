use std::fmt;

/// Warnings and errors produced by schema compilation.
#[derive(Default, Debug)]
pub struct Diagnostics(Vec<Diagnostic>);

impl Diagnostics {
    /// Is any of the diagnostics fatal, i.e. a hard error?
    pub fn any_fatal(&self) -> bool {
        self.0.iter().any(|diagnostic| diagnostic.is_fatal)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate fatal diagnostics.
    pub fn iter_errors(&self) -> impl Iterator<Item = &str> {
        self.0
            .iter()
            .filter(|diagnostic| diagnostic.is_fatal)
            .map(|diagnostic| diagnostic.message.as_str())
    }

    /// Iterate non-fatal diagnostics.
    pub fn iter_warnings(&self) -> impl Iterator<Item = &str> {
        self.0
            .iter()
            .filter(|diagnostic| !diagnostic.is_fatal)
            .map(|diagnostic| diagnostic.message.as_str())
    }

    /// Iterate over all diagnostic messages.
    pub fn iter_messages(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|diagnostic| diagnostic.message.as_str())
    }

    /// Iterate the structured codes of fatal diagnostics that carry one.
    pub fn iter_codes(&self) -> impl Iterator<Item = SchemaErrorCode> + '_ {
        self.0.iter().filter_map(|diagnostic| diagnostic.code)
    }

    pub(crate) fn push_fatal_with_code(&mut self, message: String, code: SchemaErrorCode) {
        self.0.push(Diagnostic {
            message,
            is_fatal: true,
            code: Some(code),
        });
    }

    pub(crate) fn push_warning(&mut self, message: String) {
        self.0.push(Diagnostic {
            message,
            is_fatal: false,
            code: None,
        });
    }
}

impl fmt::Display for Diagnostics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use itertools::Itertools as _;

        write!(f, "{}", self.iter_messages().format("\n"))
    }
}

/// A single compilation diagnostic.
#[derive(Debug, Clone)]
pub(crate) struct Diagnostic {
    message: String,
    /// Should this diagnostic be interpreted as a compilation failure?
    is_fatal: bool,
    code: Option<SchemaErrorCode>,
}

/// Structured codes for schema-build errors, stable across releases for
/// programmatic handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SchemaErrorCode {
    /// A type reference could not be normalized to a registered type.
    UnresolvedTypeReference,
    /// Two registered types share a name.
    TypeNameCollision,
    /// A type extension contributes a field the base type already declares.
    FieldNameCollision,
    /// A directive's arguments could not be read.
    MalformedDirective,
    /// `inheritMaxAge` on a type itself; it is only meaningful on fields.
    CacheControlInheritMaxAgeOnType,
    /// `@cacheControl` on an interface field, where there is no
    /// per-implementation override point.
    CacheControlOnInterfaceField,
    /// `inheritMaxAge` on a query-root field, which has nothing to inherit
    /// from.
    CacheControlInheritMaxAgeOnQueryTypeField,
    /// A negative `maxAge` value.
    CacheControlNegativeMaxAge,
    /// `inheritMaxAge` combined with an explicit `maxAge` on one field.
    CacheControlBothMaxAgeAndInheritMaxAge,
}
