use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc, Mutex,
};

use graphql_field_middleware::{FieldContext, FieldMiddleware, Next, ResponsePath};
use graphql_schema_pipeline::{
    CompletionContext, FieldDefinition, Hooks, MiddlewareDefinition, RootTypeNames, SchemaBuilder,
    SchemaErrorCode, TypeDefinition, TypeExpression, TypeExtension, TypeInterceptor,
};
use pretty_assertions::assert_eq;

fn query_with_ping() -> TypeDefinition {
    TypeDefinition::object("Query").with_field(FieldDefinition::new(
        "ping",
        TypeExpression::named("String"),
    ))
}

fn string_type() -> TypeDefinition {
    TypeDefinition::object("String")
}

#[test]
fn a_type_name_collision_aborts_compilation() {
    let result = SchemaBuilder::new()
        .with_type(query_with_ping())
        .with_type(string_type())
        .with_type(TypeDefinition::object("String"))
        .compile();

    let diagnostics = result.into_result().unwrap_err();
    assert_eq!(
        diagnostics.iter_codes().collect::<Vec<_>>(),
        vec![SchemaErrorCode::TypeNameCollision]
    );
}

#[test]
fn extensions_contribute_fields_to_their_target() {
    let schema = SchemaBuilder::new()
        .with_type(query_with_ping())
        .with_type(string_type())
        .with_type_extension(TypeExtension::new("Query").with_field(FieldDefinition::new(
            "pong",
            TypeExpression::named("String"),
        )))
        .compile()
        .into_result()
        .unwrap();

    let query = schema.get_type("Query").unwrap();
    assert_eq!(
        query.fields.iter().map(|f| f.name.as_str()).collect::<Vec<_>>(),
        vec!["ping", "pong"]
    );
}

#[test]
fn an_extension_with_an_unknown_target_is_fatal() {
    let result = SchemaBuilder::new()
        .with_type(query_with_ping())
        .with_type(string_type())
        .with_type_extension(TypeExtension::new("Missing").with_field(FieldDefinition::new(
            "pong",
            TypeExpression::named("String"),
        )))
        .compile();

    let diagnostics = result.into_result().unwrap_err();
    assert_eq!(
        diagnostics.iter_codes().collect::<Vec<_>>(),
        vec![SchemaErrorCode::UnresolvedTypeReference]
    );
}

#[test]
fn an_extension_redeclaring_a_field_is_fatal() {
    let result = SchemaBuilder::new()
        .with_type(query_with_ping())
        .with_type(string_type())
        .with_type_extension(TypeExtension::new("Query").with_field(FieldDefinition::new(
            "ping",
            TypeExpression::named("String"),
        )))
        .compile();

    let diagnostics = result.into_result().unwrap_err();
    assert_eq!(
        diagnostics.iter_codes().collect::<Vec<_>>(),
        vec![SchemaErrorCode::FieldNameCollision]
    );
}

#[test]
fn an_unresolvable_field_type_is_fatal_at_finalization() {
    let result = SchemaBuilder::new()
        .with_type(TypeDefinition::object("Query").with_field(FieldDefinition::new(
            "ghost",
            TypeExpression::named("Missing"),
        )))
        .compile();

    let diagnostics = result.into_result().unwrap_err();
    assert!(diagnostics
        .iter_codes()
        .any(|code| code == SchemaErrorCode::UnresolvedTypeReference));
}

#[test]
fn root_type_names_can_be_overridden() {
    let schema = SchemaBuilder::new()
        .with_type(
            TypeDefinition::object("QueryRoot").with_field(FieldDefinition::new(
                "ping",
                TypeExpression::named("String"),
            )),
        )
        .with_type(string_type())
        .root_type_names(RootTypeNames {
            query: "QueryRoot".to_owned(),
            ..Default::default()
        })
        .compile()
        .into_result()
        .unwrap();

    assert_eq!(schema.query_type().unwrap().name, "QueryRoot");
    assert!(schema.mutation_type().is_none());

    let rendered = format!("{schema:?}");
    assert!(rendered.contains("query_type: Some(\"QueryRoot\")"), "{rendered}");
}

struct Tag {
    label: &'static str,
    log: Arc<Mutex<Vec<&'static str>>>,
}

#[async_trait::async_trait]
impl FieldMiddleware for Tag {
    async fn invoke(&self, ctx: &mut FieldContext, next: Next<'_>) {
        self.log.lock().unwrap().push(self.label);
        next.run(ctx).await;
    }
}

fn tag(label: &'static str, log: &Arc<Mutex<Vec<&'static str>>>) -> MiddlewareDefinition {
    let log = Arc::clone(log);
    MiddlewareDefinition::new(move || -> Arc<dyn FieldMiddleware> {
        Arc::new(Tag {
            label,
            log: Arc::clone(&log),
        })
    })
}

struct FrontInserter {
    middleware: Option<MiddlewareDefinition>,
}

impl TypeInterceptor for FrontInserter {
    fn capabilities(&self) -> Hooks {
        Hooks::BEFORE_COMPLETE_TYPE
    }

    fn on_before_complete_type(
        &mut self,
        ctx: &mut CompletionContext<'_, '_>,
        definition: &mut TypeDefinition,
    ) {
        if !ctx.is_query_type() {
            return;
        }
        if let Some(middleware) = self.middleware.take() {
            definition.fields[0].middleware.insert(0, middleware);
        }
    }
}

#[tokio::test]
async fn interceptor_inserted_middleware_wraps_the_existing_chain() {
    let log = Arc::new(Mutex::new(Vec::new()));

    let field = FieldDefinition::new("ping", TypeExpression::named("String"))
        .with_middleware(tag("a", &log))
        .with_middleware(tag("b", &log));

    let schema = SchemaBuilder::new()
        .with_type(TypeDefinition::object("Query").with_field(field))
        .with_type(string_type())
        .with_interceptor(FrontInserter {
            middleware: Some(tag("c", &log)),
        })
        .compile()
        .into_result()
        .unwrap();

    let ping = schema.field("Query", "ping").unwrap();
    assert_eq!(ping.middleware_len(), 3);

    let ctx = FieldContext::new("ping", ResponsePath::root().field("ping"));
    ping.execute(ctx).await;

    assert_eq!(*log.lock().unwrap(), vec!["c", "a", "b"]);
}

struct Recorder {
    hooks: Hooks,
    called: Arc<AtomicBool>,
}

impl TypeInterceptor for Recorder {
    fn capabilities(&self) -> Hooks {
        self.hooks
    }

    fn on_before_complete_type(
        &mut self,
        _ctx: &mut CompletionContext<'_, '_>,
        _definition: &mut TypeDefinition,
    ) {
        self.called.store(true, Ordering::Relaxed);
    }
}

#[test]
fn hooks_outside_the_declared_capabilities_never_run() {
    let called = Arc::new(AtomicBool::new(false));
    SchemaBuilder::new()
        .with_type(query_with_ping())
        .with_type(string_type())
        .with_interceptor(Recorder {
            hooks: Hooks::empty(),
            called: Arc::clone(&called),
        })
        .compile()
        .into_result()
        .unwrap();
    assert!(!called.load(Ordering::Relaxed));

    let called = Arc::new(AtomicBool::new(false));
    SchemaBuilder::new()
        .with_type(query_with_ping())
        .with_type(string_type())
        .with_interceptor(Recorder {
            hooks: Hooks::BEFORE_COMPLETE_TYPE,
            called: Arc::clone(&called),
        })
        .compile()
        .into_result()
        .unwrap();
    assert!(called.load(Ordering::Relaxed));
}
