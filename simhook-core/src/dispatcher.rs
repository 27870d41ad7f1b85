//! Dispatcher core traits.
//!
//! A dispatcher delivers one hook kind for one event to the hooks of every
//! matched topic. The namespace tree resolves *which* hooks apply and takes a
//! snapshot of them ([`HookSet`]); the dispatcher decides *how* they are run.

use crate::{context::Context, error::HookError, hook::SharedHook, path::Path};
use std::any::Any;
use std::sync::Arc;

/// Snapshot of the hooks of one topic for one hook kind.
///
/// Taken before any hook runs so that hooks may register or remove hooks
/// without affecting the dispatch in progress.
#[derive(Clone)]
pub struct HookSet {
    topic: Path,
    hooks: Vec<SharedHook>,
}

impl HookSet {
    /// Snapshot `hooks` registered on `topic`.
    pub fn new(topic: Path, hooks: Vec<SharedHook>) -> Self {
        Self { topic, hooks }
    }

    /// Path of the owning topic.
    pub fn topic(&self) -> &Path {
        &self.topic
    }

    /// The hooks, in registration order.
    pub fn hooks(&self) -> &[SharedHook] {
        &self.hooks
    }

    /// Number of hooks.
    pub fn len(&self) -> usize {
        self.hooks.len()
    }

    /// True if the topic has no hook of this kind.
    pub fn is_empty(&self) -> bool {
        self.hooks.is_empty()
    }
}

impl std::fmt::Debug for HookSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HookSet")
            .field("topic", &self.topic)
            .field("hooks", &self.hooks.len())
            .finish()
    }
}

/// Delivers a dispatch to the resolved hook sets.
#[diagnostic::on_unimplemented(
    message = "`{Self}` cannot dispatch hooks",
    label = "missing `Dispatcher` implementation",
    note = "Implement `Dispatcher::dispatch` to deliver a context to hook sets."
)]
pub trait Dispatcher: Send + Sync + 'static {
    /// Run the hooks of `sets`, in order, for `ctx`.
    ///
    /// The first failing hook aborts the dispatch.
    fn dispatch(&self, ctx: &Context, data: &dyn Any, sets: &[HookSet]) -> Result<(), HookError>;
}

/// Shared, type-erased dispatcher.
pub type SharedDispatcher = Arc<dyn Dispatcher>;

impl<D: Dispatcher + ?Sized> Dispatcher for Arc<D> {
    fn dispatch(&self, ctx: &Context, data: &dyn Any, sets: &[HookSet]) -> Result<(), HookError> {
        (**self).dispatch(ctx, data, sets)
    }
}
