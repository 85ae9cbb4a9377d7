use crate::{diagnostics::Diagnostics, schema::Schema};

/// The result of a [`SchemaBuilder::compile()`](crate::SchemaBuilder::compile)
/// invocation.
pub struct CompileResult {
    pub(crate) schema: Option<Schema>,
    pub(crate) diagnostics: Diagnostics,
}

impl CompileResult {
    /// Simplify the result data to a yes-no answer: did compilation succeed?
    ///
    /// `Ok()` contains the usable [`Schema`]. `Err()` contains all
    /// [`Diagnostics`], including accumulated validation errors.
    pub fn into_result(self) -> Result<Schema, Diagnostics> {
        match self.schema {
            Some(schema) => Ok(schema),
            None => Err(self.diagnostics),
        }
    }

    /// Compilation warnings and errors.
    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }
}
