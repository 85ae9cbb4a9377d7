/// The placeholder substituted with the upper-camel mutation name in type
/// name patterns.
pub const MUTATION_NAME_PLACEHOLDER: &str = "{MutationName}";

/// Global defaults for the mutation input/payload convention.
#[derive(Debug, Clone, serde::Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MutationConventionOptions {
    /// Pattern for synthesized input type names.
    pub input_type_name_pattern: String,
    /// Name of the single input argument replacing the original arguments.
    pub input_argument_name: String,
    /// Pattern for synthesized payload type names.
    pub payload_type_name_pattern: String,
    /// Whether the convention applies to mutation fields that carry no
    /// per-field configuration.
    pub apply_to_all_mutations: bool,
}

impl Default for MutationConventionOptions {
    fn default() -> Self {
        MutationConventionOptions {
            input_type_name_pattern: format!("{MUTATION_NAME_PLACEHOLDER}Input"),
            input_argument_name: "input".to_owned(),
            payload_type_name_pattern: format!("{MUTATION_NAME_PLACEHOLDER}Payload"),
            apply_to_all_mutations: true,
        }
    }
}

/// Per-mutation-field convention configuration supplied before the pipeline
/// runs, keyed by field name. Consumed at most once per mutation field.
#[derive(Debug, Clone, Default)]
pub struct MutationContextData {
    pub field_name: String,
    pub input_type_name: Option<String>,
    pub input_argument_name: Option<String>,
    pub payload_type_name: Option<String>,
    pub payload_field_name: Option<String>,
    pub enabled: Option<bool>,
}

impl MutationContextData {
    pub fn new(field_name: impl Into<String>) -> Self {
        MutationContextData {
            field_name: field_name.into(),
            ..Default::default()
        }
    }
}

/// Resolved convention configuration for one mutation field: global defaults
/// merged with the per-field override. Immutable value, recomputed per field.
#[derive(Debug, Clone)]
pub(crate) struct ResolvedConventionOptions {
    pub(crate) input_type_name_pattern: String,
    pub(crate) input_argument_name: String,
    pub(crate) payload_type_name_pattern: String,
    pub(crate) apply: bool,
}

impl ResolvedConventionOptions {
    pub(crate) fn new(global: &MutationConventionOptions, field: Option<&MutationContextData>) -> Self {
        let field_enabled = field.and_then(|data| data.enabled);
        ResolvedConventionOptions {
            input_type_name_pattern: field
                .and_then(|data| data.input_type_name.clone())
                .unwrap_or_else(|| global.input_type_name_pattern.clone()),
            input_argument_name: field
                .and_then(|data| data.input_argument_name.clone())
                .unwrap_or_else(|| global.input_argument_name.clone()),
            payload_type_name_pattern: field
                .and_then(|data| data.payload_type_name.clone())
                .unwrap_or_else(|| global.payload_type_name_pattern.clone()),
            // A field-level setting always wins over the global default.
            apply: field_enabled.unwrap_or(global.apply_to_all_mutations),
        }
    }

    pub(crate) fn format_input_type_name(&self, mutation_name: &str) -> String {
        self.input_type_name_pattern
            .replace(MUTATION_NAME_PLACEHOLDER, &upper_first(mutation_name))
    }

    pub(crate) fn format_payload_type_name(&self, mutation_name: &str) -> String {
        self.payload_type_name_pattern
            .replace(MUTATION_NAME_PLACEHOLDER, &upper_first(mutation_name))
    }
}

/// Cache-control feature configuration.
#[derive(Debug, Clone, serde::Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CacheControlOptions {
    /// Whether the cache-control interceptors participate at all.
    pub enable: bool,
    /// Whether data-fetching fields without an explicit directive get a
    /// default one.
    pub apply_defaults: bool,
    /// The `maxAge` attached by the defaulting interceptor.
    pub default_max_age: i64,
}

impl Default for CacheControlOptions {
    fn default() -> Self {
        CacheControlOptions {
            enable: true,
            apply_defaults: true,
            default_max_age: 0,
        }
    }
}

pub(crate) fn upper_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

pub(crate) fn lower_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn placeholder_substitution_upper_cases_the_first_char() {
        let options = ResolvedConventionOptions::new(&MutationConventionOptions::default(), None);
        assert_eq!(options.format_input_type_name("doThing"), "DoThingInput");
        assert_eq!(options.format_payload_type_name("doThing"), "DoThingPayload");
    }

    #[test]
    fn field_level_disable_always_wins() {
        let mut data = MutationContextData::new("doThing");
        data.enabled = Some(false);
        let options = ResolvedConventionOptions::new(&MutationConventionOptions::default(), Some(&data));
        assert!(!options.apply);
    }

    #[test]
    fn per_field_type_name_override_passes_through_unchanged() {
        let mut data = MutationContextData::new("doThing");
        data.input_type_name = Some("CustomInput".to_owned());
        let options = ResolvedConventionOptions::new(&MutationConventionOptions::default(), Some(&data));
        // A literal name without the placeholder is used as-is.
        assert_eq!(options.format_input_type_name("doThing"), "CustomInput");
        assert_eq!(options.format_payload_type_name("doThing"), "DoThingPayload");
    }

    #[test]
    fn options_deserialize_with_defaults() {
        let options: CacheControlOptions = serde_json::from_str(r#"{"defaultMaxAge": 30}"#).unwrap();
        assert!(options.enable);
        assert!(options.apply_defaults);
        assert_eq!(options.default_max_age, 30);
    }
}
