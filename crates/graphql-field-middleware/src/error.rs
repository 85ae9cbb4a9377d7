use std::fmt;

use crate::context::ResponsePath;

/// Stable, programmatically matchable error codes for request-time field
/// errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    /// Authorization was requested without a policy and no default policy is
    /// configured.
    NoDefaultPolicy,
    /// The named authorization policy does not exist.
    PolicyNotFound,
    /// The caller is not authenticated.
    NotAuthenticated,
    /// The caller is authenticated but not allowed.
    NotAuthorized,
    /// The input value did not pass an argument formatter.
    InvalidInputValue,
    /// The resolver itself failed.
    ResolverError,
}

impl ErrorCode {
    /// The wire representation of the code.
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorCode::NoDefaultPolicy => "AUTH_NO_DEFAULT_POLICY",
            ErrorCode::PolicyNotFound => "AUTH_POLICY_NOT_FOUND",
            ErrorCode::NotAuthenticated => "AUTH_NOT_AUTHENTICATED",
            ErrorCode::NotAuthorized => "AUTH_NOT_AUTHORIZED",
            ErrorCode::InvalidInputValue => "INVALID_INPUT_VALUE",
            ErrorCode::ResolverError => "RESOLVER_ERROR",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An error attached to one field's position in the result tree. It never
/// aborts sibling fields.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{code}: {message} (at {path})")]
pub struct FieldError {
    pub message: String,
    pub code: ErrorCode,
    pub path: ResponsePath,
}

impl FieldError {
    pub fn new(code: ErrorCode, message: impl Into<String>, path: ResponsePath) -> Self {
        FieldError {
            message: message.into(),
            code,
            path,
        }
    }
}
