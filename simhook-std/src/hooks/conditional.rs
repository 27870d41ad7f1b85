//! Conditional Hook - Execute hooks based on the firing context.

use simhook_core::{BoxError, Context, Hook};
use std::any::Any;

/// A Hook that conditionally executes an inner Hook.
///
/// The inner hook is only executed if the condition returns `true` for the
/// dispatch context; otherwise the dispatch continues with the next hook.
///
/// # Example
///
/// ```rust
/// use simhook_std::hooks::{ConditionalHook, LoggingHook};
///
/// // Only log firings of satellite `sat1`
/// let sat1_only = ConditionalHook::metadata_eq("sat", "sat1", LoggingHook::new());
/// # let _ = sat1_only;
/// ```
pub struct ConditionalHook<C, H> {
    condition: C,
    inner: H,
}

impl<C, H> ConditionalHook<C, H> {
    /// Create a new `ConditionalHook`.
    ///
    /// The inner hook will only be executed when `condition(ctx)` returns `true`.
    pub fn new(condition: C, inner: H) -> Self {
        Self { condition, inner }
    }
}

impl<H> ConditionalHook<Box<dyn Fn(&Context) -> bool + Send + Sync>, H> {
    /// Run `inner` only for events whose metadata maps `key` to `value`.
    pub fn metadata_eq(key: impl Into<String>, value: impl Into<String>, inner: H) -> Self {
        let key = key.into();
        let value = value.into();
        Self::new(
            Box::new(move |ctx: &Context| ctx.metadata().get(&key) == Some(value.as_str())),
            inner,
        )
    }
}

impl<C, H> Hook for ConditionalHook<C, H>
where
    C: Fn(&Context) -> bool + Send + Sync + 'static,
    H: Hook,
{
    fn on_event(&self, ctx: &Context, data: &dyn Any) -> Result<(), BoxError> {
        if (self.condition)(ctx) {
            self.inner.on_event(ctx, data)
        } else {
            Ok(())
        }
    }
}

/// A Hook that executes one of two inner hooks based on a condition.
///
/// When the condition is `true`, the `then_hook` is executed.
/// When the condition is `false`, the `else_hook` is executed.
pub struct BranchHook<C, T, E> {
    condition: C,
    then_hook: T,
    else_hook: E,
}

impl<C, T, E> BranchHook<C, T, E> {
    /// Create a new `BranchHook`.
    pub fn new(condition: C, then_hook: T, else_hook: E) -> Self {
        Self {
            condition,
            then_hook,
            else_hook,
        }
    }
}

impl<C, T, E> Hook for BranchHook<C, T, E>
where
    C: Fn(&Context) -> bool + Send + Sync + 'static,
    T: Hook,
    E: Hook,
{
    fn on_event(&self, ctx: &Context, data: &dyn Any) -> Result<(), BoxError> {
        if (self.condition)(ctx) {
            self.then_hook.on_event(ctx, data)
        } else {
            self.else_hook.on_event(ctx, data)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::CountingHook;
    use simhook_core::{EventInfo, HookKind, Metadata, Path};
    use std::sync::Arc;

    fn ctx(sat: &str) -> Context {
        let ns = Path::parse("::satellite").unwrap();
        let info = EventInfo::new(ns, "signal", Metadata::new().with("sat", sat)).unwrap();
        Context::new(Arc::new(info), HookKind::After, None)
    }

    #[test]
    fn test_conditional_hook_true() {
        let count = CountingHook::new();
        let hook = ConditionalHook::new(|ctx: &Context| ctx.event_name() == "signal", count.clone());

        hook.on_event(&ctx("sat1"), &()).unwrap();

        assert_eq!(count.count(), 1);
    }

    #[test]
    fn test_conditional_hook_false() {
        let count = CountingHook::new();
        let hook = ConditionalHook::new(|ctx: &Context| ctx.event_name() == "other", count.clone());

        hook.on_event(&ctx("sat1"), &()).unwrap();

        assert_eq!(count.count(), 0);
    }

    #[test]
    fn test_conditional_metadata_eq() {
        let count = CountingHook::new();
        let hook = ConditionalHook::metadata_eq("sat", "sat2", count.clone());

        hook.on_event(&ctx("sat1"), &()).unwrap();
        hook.on_event(&ctx("sat2"), &()).unwrap();

        assert_eq!(count.count(), 1);
    }

    #[test]
    fn test_branch_hook() {
        let then_count = CountingHook::new();
        let else_count = CountingHook::new();
        let hook = BranchHook::new(
            |ctx: &Context| ctx.metadata().get("sat") == Some("sat1"),
            then_count.clone(),
            else_count.clone(),
        );

        hook.on_event(&ctx("sat1"), &()).unwrap();
        hook.on_event(&ctx("sat2"), &()).unwrap();
        hook.on_event(&ctx("sat3"), &()).unwrap();

        assert_eq!(then_count.count(), 1);
        assert_eq!(else_count.count(), 2);
    }
}
