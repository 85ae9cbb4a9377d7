#![deny(unsafe_code, rust_2018_idioms)]

//! Request-time field execution: per-field middleware chains wrapping a
//! resolver, with cooperative cancellation and structured field errors.
//!
//! A field's middleware list is compiled once into a [`FieldPipeline`]. At
//! request time every logical field invocation gets its own [`FieldContext`];
//! the chain runs outermost-first, each middleware deciding whether to invoke
//! the rest of the chain through [`Next`].

mod authorize;
mod chain;
mod context;
mod error;
mod format;

pub use authorize::{ApplyPolicy, AuthorizationHandler, AuthorizeDecision, AuthorizeDirective, AuthorizeMiddleware};
pub use chain::{FieldMiddleware, FieldPipeline, FieldResolver, Next, PassThrough};
pub use context::{CancellationFlag, FieldContext, FieldOutput, PathSegment, ResponsePath};
pub use error::{ErrorCode, FieldError};
pub use format::{AggregateInputValueFormatter, InputFormatError, InputValueFormatter};
