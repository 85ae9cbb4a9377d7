use std::sync::Arc;

use crate::{
    context::{FieldContext, FieldOutput},
    error::FieldError,
};

/// The innermost element of a field's chain: produces the field value.
#[async_trait::async_trait]
pub trait FieldResolver: Send + Sync {
    async fn resolve(&self, ctx: &mut FieldContext) -> Result<serde_json::Value, FieldError>;
}

/// A resolver that returns the parent value unchanged. Used for fields that
/// merely re-expose the value they were resolved on, like the generated
/// payload wrapper fields.
pub struct PassThrough;

#[async_trait::async_trait]
impl FieldResolver for PassThrough {
    async fn resolve(&self, ctx: &mut FieldContext) -> Result<serde_json::Value, FieldError> {
        Ok(ctx.parent().clone())
    }
}

/// A decorator in a field's chain. Middleware communicate solely by mutating
/// the context result or by declining to invoke `next`.
#[async_trait::async_trait]
pub trait FieldMiddleware: Send + Sync {
    async fn invoke(&self, ctx: &mut FieldContext, next: Next<'_>);
}

/// The remainder of the chain, down to and including the resolver.
pub struct Next<'a> {
    chain: &'a [Arc<dyn FieldMiddleware>],
    resolver: &'a dyn FieldResolver,
}

impl Next<'_> {
    /// Invoke the rest of the chain. Checks cancellation first: a cancelled
    /// invocation runs nothing further and leaves the result unset.
    pub async fn run(self, ctx: &mut FieldContext) {
        if ctx.is_cancelled() {
            tracing::trace!(selection = ctx.selection(), "field invocation cancelled");
            return;
        }

        match self.chain.split_first() {
            Some((middleware, rest)) => {
                let next = Next {
                    chain: rest,
                    resolver: self.resolver,
                };
                middleware.invoke(ctx, next).await;
            }
            None => match self.resolver.resolve(ctx).await {
                Ok(value) => ctx.set_result(FieldOutput::Value(value)),
                Err(error) => ctx.set_result(FieldOutput::Errors(vec![error])),
            },
        }
    }
}

/// A field's compiled decorator chain. Built once at schema finalization,
/// executed per invocation. Middleware run outermost-first in insertion
/// order, so the element at index 0 observes everything below it.
pub struct FieldPipeline {
    middleware: Vec<Arc<dyn FieldMiddleware>>,
    resolver: Arc<dyn FieldResolver>,
}

impl FieldPipeline {
    pub fn new(resolver: Arc<dyn FieldResolver>) -> Self {
        FieldPipeline {
            middleware: Vec::new(),
            resolver,
        }
    }

    /// Append a middleware at the end of the chain (closest to the resolver
    /// so far).
    pub fn push(&mut self, middleware: Arc<dyn FieldMiddleware>) {
        self.middleware.push(middleware);
    }

    /// Insert a middleware at the front of the chain, wrapping everything
    /// already present.
    pub fn insert_front(&mut self, middleware: Arc<dyn FieldMiddleware>) {
        self.middleware.insert(0, middleware);
    }

    pub fn len(&self) -> usize {
        self.middleware.len()
    }

    pub fn is_empty(&self) -> bool {
        self.middleware.is_empty()
    }

    /// Run the chain against the given context. The result, if any, is left
    /// in the context.
    pub async fn execute(&self, ctx: &mut FieldContext) {
        Next {
            chain: &self.middleware,
            resolver: self.resolver.as_ref(),
        }
        .run(ctx)
        .await;
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;
    use crate::context::ResponsePath;

    struct ValueResolver(serde_json::Value);

    #[async_trait::async_trait]
    impl FieldResolver for ValueResolver {
        async fn resolve(&self, _ctx: &mut FieldContext) -> Result<serde_json::Value, FieldError> {
            Ok(self.0.clone())
        }
    }

    struct Recorder {
        label: &'static str,
        log: Arc<Mutex<Vec<&'static str>>>,
    }

    #[async_trait::async_trait]
    impl FieldMiddleware for Recorder {
        async fn invoke(&self, ctx: &mut FieldContext, next: Next<'_>) {
            self.log.lock().unwrap().push(self.label);
            next.run(ctx).await;
        }
    }

    #[tokio::test]
    async fn chain_runs_in_insertion_order_with_front_insert_first() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut pipeline = FieldPipeline::new(Arc::new(ValueResolver(serde_json::json!(1))));
        pipeline.push(Arc::new(Recorder {
            label: "A",
            log: log.clone(),
        }));
        pipeline.push(Arc::new(Recorder {
            label: "B",
            log: log.clone(),
        }));
        pipeline.insert_front(Arc::new(Recorder {
            label: "C",
            log: log.clone(),
        }));

        let mut ctx = FieldContext::new("value", ResponsePath::root());
        pipeline.execute(&mut ctx).await;

        assert_eq!(*log.lock().unwrap(), vec!["C", "A", "B"]);
        assert_eq!(ctx.take_result(), Some(FieldOutput::Value(serde_json::json!(1))));
    }

    #[tokio::test]
    async fn cancelled_context_runs_nothing() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut pipeline = FieldPipeline::new(Arc::new(ValueResolver(serde_json::json!(1))));
        pipeline.push(Arc::new(Recorder {
            label: "A",
            log: log.clone(),
        }));

        let mut ctx = FieldContext::new("value", ResponsePath::root());
        ctx.cancellation().cancel();
        pipeline.execute(&mut ctx).await;

        assert!(log.lock().unwrap().is_empty());
        assert_eq!(ctx.result(), None);
    }

    #[tokio::test]
    async fn pass_through_returns_parent() {
        let pipeline = FieldPipeline::new(Arc::new(PassThrough));
        let mut ctx =
            FieldContext::new("result", ResponsePath::root()).with_parent(serde_json::json!({"id": 7}));
        pipeline.execute(&mut ctx).await;
        assert_eq!(
            ctx.take_result(),
            Some(FieldOutput::Value(serde_json::json!({"id": 7})))
        );
    }
}
