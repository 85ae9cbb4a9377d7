use std::sync::Arc;

use graphql_field_middleware::{FieldContext, FieldError, FieldResolver};
use graphql_schema_pipeline::{
    interceptors::CACHE_CONTROL_DIRECTIVE_NAME, CacheControlOptions, DirectiveDefinition,
    FieldDefinition, SchemaBuilder, SchemaErrorCode, TypeDefinition, TypeExpression,
};
use pretty_assertions::assert_eq;

struct FetchUsers;

#[async_trait::async_trait]
impl FieldResolver for FetchUsers {
    async fn resolve(&self, _ctx: &mut FieldContext) -> Result<serde_json::Value, FieldError> {
        Ok(serde_json::json!([]))
    }
}

fn cache_control(max_age: i64) -> DirectiveDefinition {
    DirectiveDefinition::by_name(CACHE_CONTROL_DIRECTIVE_NAME)
        .with_argument("maxAge", serde_json::json!(max_age))
}

fn base_builder() -> SchemaBuilder {
    SchemaBuilder::new()
        .with_type(TypeDefinition::object("String"))
        .with_type(
            TypeDefinition::object("User")
                .with_field(FieldDefinition::new("name", TypeExpression::named("String")))
                .with_field(
                    FieldDefinition::new("friends", TypeExpression::parse("[User]").unwrap())
                        .with_resolver(Arc::new(FetchUsers)),
                ),
        )
}

fn max_age_of(directives: &[DirectiveDefinition]) -> Option<i64> {
    directives
        .iter()
        .find(|d| d.matches(CACHE_CONTROL_DIRECTIVE_NAME, graphql_schema_pipeline::DirectiveCapability::CacheControl))
        .and_then(|d| d.arguments.get("maxAge"))
        .and_then(serde_json::Value::as_i64)
}

#[test]
fn query_type_fields_get_the_default_directive() {
    let schema = base_builder()
        .with_type(TypeDefinition::object("Query").with_field(FieldDefinition::new(
            "users",
            TypeExpression::parse("[User]").unwrap(),
        )))
        .enable_cache_control(CacheControlOptions::default())
        .compile()
        .into_result()
        .unwrap();

    let users = schema.field("Query", "users").unwrap();
    assert_eq!(max_age_of(&users.directives), Some(0));
}

#[test]
fn data_resolver_fields_get_the_default_directive() {
    let schema = base_builder()
        .with_type(TypeDefinition::object("Query").with_field(FieldDefinition::new(
            "me",
            TypeExpression::named("User"),
        )))
        .enable_cache_control(CacheControlOptions {
            default_max_age: 30,
            ..Default::default()
        })
        .compile()
        .into_result()
        .unwrap();

    // `friends` carries its own resolver and returns a list, so it defaults;
    // `name` is a plain projection and stays bare.
    let friends = schema.field("User", "friends").unwrap();
    assert_eq!(max_age_of(&friends.directives), Some(30));
    let name = schema.field("User", "name").unwrap();
    assert_eq!(max_age_of(&name.directives), None);
}

#[test]
fn explicit_directives_are_never_overwritten() {
    let schema = base_builder()
        .with_type(
            TypeDefinition::object("Query").with_field(
                FieldDefinition::new("users", TypeExpression::parse("[User]").unwrap())
                    .with_directive(cache_control(120)),
            ),
        )
        .enable_cache_control(CacheControlOptions::default())
        .compile()
        .into_result()
        .unwrap();

    let users = schema.field("Query", "users").unwrap();
    assert_eq!(users.directives.len(), 1);
    assert_eq!(max_age_of(&users.directives), Some(120));
}

#[test]
fn mutation_fields_are_not_defaulted() {
    let schema = base_builder()
        .with_type(TypeDefinition::object("Query"))
        .with_type(TypeDefinition::object("Mutation").with_field(
            FieldDefinition::new("addUser", TypeExpression::named("User"))
                .with_resolver(Arc::new(FetchUsers)),
        ))
        .enable_cache_control(CacheControlOptions::default())
        .compile()
        .into_result()
        .unwrap();

    let add_user = schema.field("Mutation", "addUser").unwrap();
    assert_eq!(max_age_of(&add_user.directives), None);
}

#[test]
fn defaults_can_be_disabled_independently() {
    let schema = base_builder()
        .with_type(TypeDefinition::object("Query").with_field(FieldDefinition::new(
            "users",
            TypeExpression::parse("[User]").unwrap(),
        )))
        .enable_cache_control(CacheControlOptions {
            apply_defaults: false,
            ..Default::default()
        })
        .compile()
        .into_result()
        .unwrap();

    let users = schema.field("Query", "users").unwrap();
    assert!(users.directives.is_empty());
}

fn expect_validation_codes(builder: SchemaBuilder, expected: &[SchemaErrorCode]) {
    let result = builder
        .enable_cache_control(CacheControlOptions {
            apply_defaults: false,
            ..Default::default()
        })
        .compile();
    let diagnostics = result.into_result().unwrap_err();
    let codes: Vec<SchemaErrorCode> = diagnostics.iter_codes().collect();
    assert_eq!(codes, expected);
}

#[test]
fn inherit_max_age_is_rejected_on_types() {
    expect_validation_codes(
        base_builder().with_type(
            TypeDefinition::object("Query")
                .with_directive(
                    DirectiveDefinition::by_name(CACHE_CONTROL_DIRECTIVE_NAME)
                        .with_argument("inheritMaxAge", serde_json::json!(true)),
                )
                .with_field(FieldDefinition::new("users", TypeExpression::parse("[User]").unwrap())),
        ),
        &[SchemaErrorCode::CacheControlInheritMaxAgeOnType],
    );
}

#[test]
fn the_directive_is_rejected_on_interface_fields() {
    expect_validation_codes(
        base_builder()
            .with_type(TypeDefinition::object("Query"))
            .with_type(TypeDefinition::interface("Node").with_field(
                FieldDefinition::new("id", TypeExpression::named("String"))
                    .with_directive(cache_control(60)),
            )),
        &[SchemaErrorCode::CacheControlOnInterfaceField],
    );
}

#[test]
fn inherit_max_age_is_rejected_on_query_root_fields() {
    expect_validation_codes(
        base_builder().with_type(
            TypeDefinition::object("Query").with_field(
                FieldDefinition::new("users", TypeExpression::parse("[User]").unwrap())
                    .with_directive(
                        DirectiveDefinition::by_name(CACHE_CONTROL_DIRECTIVE_NAME)
                            .with_argument("inheritMaxAge", serde_json::json!(true)),
                    ),
            ),
        ),
        &[SchemaErrorCode::CacheControlInheritMaxAgeOnQueryTypeField],
    );
}

#[test]
fn a_negative_max_age_is_rejected() {
    expect_validation_codes(
        base_builder().with_type(
            TypeDefinition::object("Query").with_field(
                FieldDefinition::new("users", TypeExpression::parse("[User]").unwrap())
                    .with_directive(cache_control(-5)),
            ),
        ),
        &[SchemaErrorCode::CacheControlNegativeMaxAge],
    );
}

#[test]
fn contradictory_arguments_are_all_reported() {
    // A negative maxAge combined with inheritMaxAge yields both violations,
    // not just the first.
    expect_validation_codes(
        base_builder().with_type(
            TypeDefinition::object("Query").with_field(
                FieldDefinition::new("users", TypeExpression::parse("[User]").unwrap())
                    .with_directive(cache_control(-5).with_argument("inheritMaxAge", serde_json::json!(true))),
            ),
        ),
        &[
            SchemaErrorCode::CacheControlInheritMaxAgeOnQueryTypeField,
            SchemaErrorCode::CacheControlNegativeMaxAge,
            SchemaErrorCode::CacheControlBothMaxAgeAndInheritMaxAge,
        ],
    );
}

#[test]
fn a_zero_max_age_with_inherit_is_still_contradictory() {
    // `maxAge: 0` is a valid age, so combining it with `inheritMaxAge` is the
    // contradiction alone; off the query root no other violation applies.
    expect_validation_codes(
        base_builder().with_type(
            TypeDefinition::object("Query").with_field(FieldDefinition::new(
                "profile",
                TypeExpression::named("Profile"),
            )),
        )
        .with_type(
            TypeDefinition::object("Profile").with_field(
                FieldDefinition::new("avatar", TypeExpression::named("String"))
                    .with_directive(cache_control(0).with_argument("inheritMaxAge", serde_json::json!(true))),
            ),
        ),
        &[SchemaErrorCode::CacheControlBothMaxAgeAndInheritMaxAge],
    );
}

#[test]
fn malformed_arguments_are_rejected() {
    expect_validation_codes(
        base_builder().with_type(
            TypeDefinition::object("Query").with_field(
                FieldDefinition::new("users", TypeExpression::parse("[User]").unwrap())
                    .with_directive(
                        DirectiveDefinition::by_name(CACHE_CONTROL_DIRECTIVE_NAME)
                            .with_argument("maxAge", serde_json::json!("soon")),
                    ),
            ),
        ),
        &[SchemaErrorCode::MalformedDirective],
    );
}

#[test]
fn disabling_the_feature_skips_validation_too() {
    let result = base_builder()
        .with_type(
            TypeDefinition::object("Query").with_field(
                FieldDefinition::new("users", TypeExpression::parse("[User]").unwrap())
                    .with_directive(cache_control(-5)),
            ),
        )
        .enable_cache_control(CacheControlOptions {
            enable: false,
            ..Default::default()
        })
        .compile();

    assert!(result.diagnostics().is_empty());
    assert!(result.into_result().is_ok());
}
