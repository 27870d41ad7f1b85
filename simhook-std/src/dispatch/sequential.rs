//! Sequential dispatch: hook sets in order, first error wins.

use simhook_core::{Context, Dispatcher, HookError, HookSet};
use std::any::Any;

/// A sequential dispatcher.
///
/// Runs the hook sets in the order given and the hooks of each set in
/// registration order. The first hook error aborts the dispatch.
#[derive(Debug, Default, Clone, Copy)]
pub struct SequentialDispatcher;

impl Dispatcher for SequentialDispatcher {
    fn dispatch(&self, ctx: &Context, data: &dyn Any, sets: &[HookSet]) -> Result<(), HookError> {
        for set in sets {
            for hook in set.hooks() {
                hook.on_event(ctx, data).map_err(|source| HookError {
                    kind: ctx.hook().clone(),
                    topic: set.topic().clone(),
                    event: ctx.event_path().clone(),
                    source,
                })?;
            }
        }
        Ok(())
    }
}
