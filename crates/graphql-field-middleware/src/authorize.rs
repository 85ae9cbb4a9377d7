use std::sync::Arc;

use crate::{
    chain::{FieldMiddleware, Next},
    context::{FieldContext, FieldOutput},
    error::{ErrorCode, FieldError},
};

/// When the authorization decision is evaluated relative to the resolver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ApplyPolicy {
    /// Evaluate first; the inner chain only runs when allowed. A denial fully
    /// short-circuits, so no resolver side effects occur.
    #[default]
    BeforeResolver,
    /// Run the inner chain unconditionally, then evaluate. A denial overwrites
    /// the result unless the inner chain already produced an error result.
    AfterResolver,
}

/// The authorization requirements attached to a field.
#[derive(Debug, Clone, Default)]
pub struct AuthorizeDirective {
    pub policy: Option<String>,
    pub roles: Vec<String>,
    pub apply: ApplyPolicy,
}

/// The outcome of evaluating an authorization decision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthorizeDecision {
    Allowed,
    NoDefaultPolicy,
    PolicyNotFound(String),
    NotAuthenticated,
    NotAuthorized,
}

/// Evaluates authorization decisions for field invocations.
#[async_trait::async_trait]
pub trait AuthorizationHandler: Send + Sync {
    async fn authorize(&self, ctx: &FieldContext, directive: &AuthorizeDirective) -> AuthorizeDecision;
}

/// Field middleware enforcing an [`AuthorizeDirective`] through an
/// [`AuthorizationHandler`], in either before- or after-resolver mode.
pub struct AuthorizeMiddleware {
    handler: Arc<dyn AuthorizationHandler>,
    directive: AuthorizeDirective,
}

impl AuthorizeMiddleware {
    pub fn new(handler: Arc<dyn AuthorizationHandler>, directive: AuthorizeDirective) -> Self {
        AuthorizeMiddleware { handler, directive }
    }

    fn set_error(&self, ctx: &mut FieldContext, decision: AuthorizeDecision) {
        let path = ctx.path().clone();
        let error = match decision {
            AuthorizeDecision::Allowed => return,
            AuthorizeDecision::NoDefaultPolicy => FieldError::new(
                ErrorCode::NoDefaultPolicy,
                "The authorization policy provider has no default policy configured.",
                path,
            ),
            AuthorizeDecision::PolicyNotFound(policy) => FieldError::new(
                ErrorCode::PolicyNotFound,
                format!("The authorization policy `{policy}` was not found."),
                path,
            ),
            AuthorizeDecision::NotAuthenticated => FieldError::new(
                ErrorCode::NotAuthenticated,
                "The current user is not authenticated.",
                path,
            ),
            AuthorizeDecision::NotAuthorized => FieldError::new(
                ErrorCode::NotAuthorized,
                "The current user is not authorized to access this resource.",
                path,
            ),
        };
        tracing::debug!(selection = ctx.selection(), code = %error.code, "authorization denied");
        ctx.set_result(FieldOutput::Errors(vec![error]));
    }
}

#[async_trait::async_trait]
impl FieldMiddleware for AuthorizeMiddleware {
    async fn invoke(&self, ctx: &mut FieldContext, next: Next<'_>) {
        match self.directive.apply {
            ApplyPolicy::AfterResolver => {
                next.run(ctx).await;

                let decision = self.handler.authorize(ctx, &self.directive).await;

                if decision != AuthorizeDecision::Allowed
                    && !ctx.result().is_some_and(FieldOutput::is_errors)
                {
                    // An existing error result is never clobbered.
                    self.set_error(ctx, decision);
                }
            }
            ApplyPolicy::BeforeResolver => {
                let decision = self.handler.authorize(ctx, &self.directive).await;

                if decision == AuthorizeDecision::Allowed {
                    next.run(ctx).await;
                } else {
                    self.set_error(ctx, decision);
                }
            }
        }
    }
}
