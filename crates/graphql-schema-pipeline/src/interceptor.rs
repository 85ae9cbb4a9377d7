use crate::{
    context::{CompletionContext, PipelineContext, ValidationContext},
    definition::{OperationKind, TypeDefinition},
};

bitflags::bitflags! {
    /// The pipeline hooks an interceptor participates in. The initializer
    /// only invokes a hook when its bit is set, so an interceptor declares
    /// its capabilities instead of relying on no-op overrides.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
    pub struct Hooks: u8 {
        const AFTER_COMPLETE_TYPE_NAMES = 1;
        const BEFORE_COMPLETE_TYPE = 1 << 1;
        const AFTER_RESOLVE_ROOT_TYPE = 1 << 2;
        const AFTER_MERGE_TYPE_EXTENSIONS = 1 << 3;
        const VALIDATE_TYPE = 1 << 4;
    }
}

/// A plugin invoked at fixed compilation checkpoints to observe or mutate
/// type definitions. Instances are consumed by a single compilation run; any
/// state they keep is scoped to that run.
pub trait TypeInterceptor {
    /// Which hooks this interceptor implements.
    fn capabilities(&self) -> Hooks;

    /// Runs once after every type and field has its final name.
    fn on_after_complete_type_names(&mut self, _ctx: &mut PipelineContext<'_>) {}

    /// Runs per type during the completion phase. The definition may be
    /// mutated freely: fields added or removed, directives attached,
    /// middleware lists rewritten.
    fn on_before_complete_type(
        &mut self,
        _ctx: &mut CompletionContext<'_, '_>,
        _definition: &mut TypeDefinition,
    ) {
    }

    /// Runs once per resolved root operation type.
    fn on_after_resolve_root_type(
        &mut self,
        _ctx: &mut CompletionContext<'_, '_>,
        _definition: &mut TypeDefinition,
        _operation: OperationKind,
    ) {
    }

    /// Runs once after type extensions are merged into their base types.
    /// This is the first point where the final field set of every type is
    /// known.
    fn on_after_merge_type_extensions(&mut self, _ctx: &mut PipelineContext<'_>) {}

    /// Read-only validation pass; report violations, never mutate.
    fn on_validate_type(&mut self, _ctx: &mut ValidationContext<'_>, _definition: &TypeDefinition) {}
}
