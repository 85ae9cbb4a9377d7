use crate::definition::TypeId;

/// A reference to a type, either still symbolic or normalized to a registry
/// entry. Resolution is idempotent: a `Resolved` reference is never rebound
/// to a different target.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TypeReference {
    Unresolved(String),
    Resolved(TypeId),
}

impl TypeReference {
    pub fn named(name: impl Into<String>) -> Self {
        TypeReference::Unresolved(name.into())
    }

    pub fn resolved_id(&self) -> Option<TypeId> {
        match self {
            TypeReference::Resolved(id) => Some(*id),
            TypeReference::Unresolved(_) => None,
        }
    }
}

/// List and non-null nesting around a type reference.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct Wrapping {
    /// Outermost non-null marker.
    pub non_null: bool,
    /// At most one list layer; `Some(true)` means the list items are
    /// non-null.
    pub list: Option<ListWrapping>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ListWrapping {
    pub inner_non_null: bool,
}

impl Wrapping {
    pub fn nullable() -> Self {
        Wrapping::default()
    }

    pub fn required() -> Self {
        Wrapping {
            non_null: true,
            list: None,
        }
    }

    pub fn is_list(self) -> bool {
        self.list.is_some()
    }
}

/// A field or argument type as written in a type expression, e.g.
/// `[User!]!`: a target reference plus wrapping.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TypeExpression {
    pub target: TypeReference,
    pub wrapping: Wrapping,
}

/// A type expression string could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid type expression: `{0}`")]
pub struct InvalidTypeExpression(pub String);

impl TypeExpression {
    pub fn named(name: impl Into<String>) -> Self {
        TypeExpression {
            target: TypeReference::named(name),
            wrapping: Wrapping::nullable(),
        }
    }

    pub fn non_null_named(name: impl Into<String>) -> Self {
        TypeExpression {
            target: TypeReference::named(name),
            wrapping: Wrapping::required(),
        }
    }

    pub(crate) fn non_null_resolved(id: TypeId) -> Self {
        TypeExpression {
            target: TypeReference::Resolved(id),
            wrapping: Wrapping::required(),
        }
    }

    /// Parse expressions of the forms `Name`, `Name!`, `[Name]`, `[Name!]`
    /// and their non-null list variants.
    pub fn parse(input: &str) -> Result<Self, InvalidTypeExpression> {
        let original = input;
        let mut rest = input.trim();
        let mut wrapping = Wrapping::nullable();

        if let Some(stripped) = rest.strip_suffix('!') {
            wrapping.non_null = true;
            rest = stripped;
        }

        if let Some(inner) = rest.strip_prefix('[') {
            let inner = inner
                .strip_suffix(']')
                .ok_or_else(|| InvalidTypeExpression(original.to_owned()))?;
            let mut inner = inner.trim();
            let mut inner_non_null = false;
            if let Some(stripped) = inner.strip_suffix('!') {
                inner_non_null = true;
                inner = stripped;
            }
            wrapping.list = Some(ListWrapping { inner_non_null });
            rest = inner;
        }

        if rest.is_empty() || !rest.chars().all(|c| c.is_alphanumeric() || c == '_') {
            return Err(InvalidTypeExpression(original.to_owned()));
        }

        Ok(TypeExpression {
            target: TypeReference::named(rest),
            wrapping,
        })
    }

    /// Render the expression with the given target name, re-applying the
    /// wrapping.
    pub fn render(&self, target_name: &str) -> String {
        let mut out = String::new();
        match self.wrapping.list {
            Some(ListWrapping { inner_non_null }) => {
                out.push('[');
                out.push_str(target_name);
                if inner_non_null {
                    out.push('!');
                }
                out.push(']');
            }
            None => out.push_str(target_name),
        }
        if self.wrapping.non_null {
            out.push('!');
        }
        out
    }
}
