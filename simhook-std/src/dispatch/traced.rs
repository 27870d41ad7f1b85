//! `tracing` instrumentation around another dispatcher.

use simhook_core::{Context, Dispatcher, HookError, HookSet};
use std::any::Any;

/// A dispatcher wrapper that instruments each dispatch with a `tracing` span.
///
/// The span carries the hook kind, the event path and the number of matched
/// topics. Hook failures are recorded at `debug` level and still returned.
/// Without the `tracing` feature this is a plain pass-through.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingDispatcher<D> {
    inner: D,
}

impl<D> TracingDispatcher<D> {
    /// Wrap `inner`.
    pub const fn new(inner: D) -> Self {
        Self { inner }
    }

    /// The wrapped dispatcher.
    pub fn inner(&self) -> &D {
        &self.inner
    }
}

impl<D: Dispatcher> Dispatcher for TracingDispatcher<D> {
    #[cfg(feature = "tracing")]
    fn dispatch(&self, ctx: &Context, data: &dyn Any, sets: &[HookSet]) -> Result<(), HookError> {
        let span = tracing::info_span!(
            "dispatch",
            hook = %ctx.hook(),
            event = %ctx.event_path(),
            topics = sets.len(),
            firing = ctx.raw_event().map(|raw| raw.id()),
        );
        let _guard = span.enter();
        let result = self.inner.dispatch(ctx, data, sets);
        if let Err(err) = &result {
            tracing::debug!(topic = %err.topic, error = %err.source, "hook failed");
        }
        result
    }

    #[cfg(not(feature = "tracing"))]
    fn dispatch(&self, ctx: &Context, data: &dyn Any, sets: &[HookSet]) -> Result<(), HookError> {
        self.inner.dispatch(ctx, data, sets)
    }
}
