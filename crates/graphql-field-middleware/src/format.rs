use std::sync::Arc;

/// A runtime input value failed coercion.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid input value: {0}")]
pub struct InputFormatError(pub String);

/// Runtime value coercion attached to an argument or input field. Formatters
/// declared on an argument are preserved verbatim when the argument is turned
/// into an input field by the mutation convention.
pub trait InputValueFormatter: Send + Sync {
    fn format(&self, value: serde_json::Value) -> Result<serde_json::Value, InputFormatError>;
}

/// Composes several formatters into one, executed in attachment order.
pub struct AggregateInputValueFormatter(Vec<Arc<dyn InputValueFormatter>>);

impl AggregateInputValueFormatter {
    pub fn new(formatters: Vec<Arc<dyn InputValueFormatter>>) -> Self {
        AggregateInputValueFormatter(formatters)
    }
}

impl InputValueFormatter for AggregateInputValueFormatter {
    fn format(&self, value: serde_json::Value) -> Result<serde_json::Value, InputFormatError> {
        self.0
            .iter()
            .try_fold(value, |value, formatter| formatter.format(value))
    }
}
