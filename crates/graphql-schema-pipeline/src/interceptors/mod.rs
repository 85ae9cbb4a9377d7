//! The built-in type interceptors: mutation input/payload conventions and
//! cache-control defaulting and validation.

mod cache_control;
mod cache_control_validation;
mod mutation_convention;

pub use cache_control::{
    CacheControlDirective, CacheControlScope, CacheControlTypeInterceptor, CACHE_CONTROL_DIRECTIVE_NAME,
};
pub use cache_control_validation::CacheControlValidationTypeInterceptor;
pub use mutation_convention::{MutationConventionInterceptor, MUTATION_CONVENTION_MIDDLEWARE_KEY};
