use std::{
    fmt,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
};

use indexmap::IndexMap;

use crate::error::FieldError;

/// The outcome of a field invocation. Middleware inspect this by pattern
/// match; the shape of the value is never probed at runtime.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldOutput {
    Value(serde_json::Value),
    Errors(Vec<FieldError>),
}

impl FieldOutput {
    pub fn is_errors(&self) -> bool {
        matches!(self, FieldOutput::Errors(_))
    }

    pub fn as_value(&self) -> Option<&serde_json::Value> {
        match self {
            FieldOutput::Value(value) => Some(value),
            FieldOutput::Errors(_) => None,
        }
    }
}

/// One step in a response path.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathSegment {
    Field(String),
    Index(usize),
}

/// The position of a field in the response tree, used for error attribution.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct ResponsePath(Vec<PathSegment>);

impl ResponsePath {
    pub fn root() -> Self {
        ResponsePath::default()
    }

    #[must_use]
    pub fn field(&self, name: impl Into<String>) -> Self {
        let mut segments = self.0.clone();
        segments.push(PathSegment::Field(name.into()));
        ResponsePath(segments)
    }

    #[must_use]
    pub fn index(&self, index: usize) -> Self {
        let mut segments = self.0.clone();
        segments.push(PathSegment::Index(index));
        ResponsePath(segments)
    }

    pub fn segments(&self) -> &[PathSegment] {
        &self.0
    }
}

impl fmt::Display for ResponsePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.0.iter().enumerate() {
            match segment {
                PathSegment::Field(name) => {
                    if i > 0 {
                        f.write_str(".")?;
                    }
                    f.write_str(name)?;
                }
                PathSegment::Index(index) => write!(f, "[{index}]")?,
            }
        }
        Ok(())
    }
}

/// Cooperative cancellation shared between the caller and one field
/// invocation. The chain checks it between steps; a cancelled invocation
/// calls no further middleware and leaves the result unset.
#[derive(Debug, Clone, Default)]
pub struct CancellationFlag(Arc<AtomicBool>);

impl CancellationFlag {
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Per-invocation state threaded through a field's middleware chain.
///
/// Exclusively owned by the single logical field invocation that created it;
/// sibling fields never share a context.
pub struct FieldContext {
    parent: serde_json::Value,
    arguments: IndexMap<String, serde_json::Value>,
    path: ResponsePath,
    selection: String,
    result: Option<FieldOutput>,
    cancellation: CancellationFlag,
}

impl FieldContext {
    pub fn new(selection: impl Into<String>, path: ResponsePath) -> Self {
        FieldContext {
            parent: serde_json::Value::Null,
            arguments: IndexMap::new(),
            path,
            selection: selection.into(),
            result: None,
            cancellation: CancellationFlag::default(),
        }
    }

    #[must_use]
    pub fn with_parent(mut self, parent: serde_json::Value) -> Self {
        self.parent = parent;
        self
    }

    #[must_use]
    pub fn with_argument(mut self, name: impl Into<String>, value: serde_json::Value) -> Self {
        self.arguments.insert(name.into(), value);
        self
    }

    #[must_use]
    pub fn with_cancellation(mut self, flag: CancellationFlag) -> Self {
        self.cancellation = flag;
        self
    }

    /// The parent object value the field is resolved on.
    pub fn parent(&self) -> &serde_json::Value {
        &self.parent
    }

    /// The coerced arguments for this invocation.
    pub fn arguments(&self) -> &IndexMap<String, serde_json::Value> {
        &self.arguments
    }

    pub fn arguments_mut(&mut self) -> &mut IndexMap<String, serde_json::Value> {
        &mut self.arguments
    }

    /// The field's position in the response tree.
    pub fn path(&self) -> &ResponsePath {
        &self.path
    }

    /// The name of the selection being resolved.
    pub fn selection(&self) -> &str {
        &self.selection
    }

    pub fn result(&self) -> Option<&FieldOutput> {
        self.result.as_ref()
    }

    pub fn set_result(&mut self, output: FieldOutput) {
        self.result = Some(output);
    }

    pub fn take_result(&mut self) -> Option<FieldOutput> {
        self.result.take()
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancellation.is_cancelled()
    }

    pub fn cancellation(&self) -> &CancellationFlag {
        &self.cancellation
    }
}
