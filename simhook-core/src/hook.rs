//! # Hooks
//!
//! A hook is a synchronous callable run inside a firing. It receives the
//! [`Context`] of the dispatch and a type-erased payload:
//!
//! | kind                  | payload                                  |
//! |-----------------------|------------------------------------------|
//! | `Before`              | the host primitive, before it is awaited |
//! | `After`               | the resolved value of the event          |
//! | `Enable` / `Disable`  | `()`                                     |
//! | `Custom(_)`           | whatever the caller dispatched           |
//!
//! The [`RawEvent`] of a firing, its id and primitive type, is available
//! from [`Context::raw_event`] in both `Before` and `After` hooks.
//!
//! Hooks run in registration order and must not block. A hook may schedule
//! new work in the host kernel (spawn a task, start a process) before it
//! returns. Returning an error aborts the remaining hooks of the phase and
//! the firing itself.
//!
//! Closures are the usual way to write hooks; see [`FnHook`] and [`Typed`].
//!
//! [`RawEvent`]: crate::RawEvent

use crate::{context::Context, error::BoxError, response::IntoHookOutcome};
use std::any::Any;
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

/// A callable invoked before or after an event's host primitive resolves.
#[diagnostic::on_unimplemented(
    message = "`{Self}` does not implement `Hook`",
    label = "missing `Hook` implementation",
    note = "Hooks must implement `on_event(&self, &Context, &dyn Any)`; closures can be wrapped in `FnHook`."
)]
pub trait Hook: Send + Sync + 'static {
    /// Called when the hook's kind is dispatched for a matching event.
    fn on_event(&self, ctx: &Context, data: &dyn Any) -> Result<(), BoxError>;
}

/// Shared, type-erased hook as stored in registries.
pub type SharedHook = Arc<dyn Hook>;

impl<H: Hook + ?Sized> Hook for Arc<H> {
    fn on_event(&self, ctx: &Context, data: &dyn Any) -> Result<(), BoxError> {
        (**self).on_event(ctx, data)
    }
}

impl<H: Hook + ?Sized> Hook for Box<H> {
    fn on_event(&self, ctx: &Context, data: &dyn Any) -> Result<(), BoxError> {
        (**self).on_event(ctx, data)
    }
}

/// Adapter turning a closure `Fn(&Context, &dyn Any) -> R` into a [`Hook`].
///
/// `R` is `()` or `Result<(), E>`, see [`IntoHookOutcome`].
pub struct FnHook<F, R> {
    func: F,
    _marker: PhantomData<fn() -> R>,
}

impl<F, R> FnHook<F, R>
where
    F: Fn(&Context, &dyn Any) -> R + Send + Sync + 'static,
    R: IntoHookOutcome + 'static,
{
    /// Wrap a closure.
    pub fn new(func: F) -> Self {
        Self {
            func,
            _marker: PhantomData,
        }
    }
}

impl<F, R> Hook for FnHook<F, R>
where
    F: Fn(&Context, &dyn Any) -> R + Send + Sync + 'static,
    R: IntoHookOutcome + 'static,
{
    fn on_event(&self, ctx: &Context, data: &dyn Any) -> Result<(), BoxError> {
        (self.func)(ctx, data).into_outcome()
    }
}

impl<F, R> fmt::Debug for FnHook<F, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnHook").finish_non_exhaustive()
    }
}

/// A hook that only runs when the payload is a `T`.
///
/// Payloads of any other type are ignored. Useful for after hooks on topics
/// that aggregate events resolving to different types.
///
/// # Example
///
/// ```rust
/// use simhook_core::{Context, Typed};
///
/// let hook = Typed::new(|ctx: &Context, value: &u32| {
///     println!("{} resolved to {value}", ctx.event_path());
/// });
/// # let _ = hook;
/// ```
pub struct Typed<T, F, R> {
    func: F,
    _marker: PhantomData<fn(&T) -> R>,
}

impl<T, F, R> Typed<T, F, R>
where
    T: Any,
    F: Fn(&Context, &T) -> R + Send + Sync + 'static,
    R: IntoHookOutcome + 'static,
{
    /// Wrap a closure taking the payload as `&T`.
    pub fn new(func: F) -> Self {
        Self {
            func,
            _marker: PhantomData,
        }
    }
}

impl<T, F, R> Hook for Typed<T, F, R>
where
    T: Any,
    F: Fn(&Context, &T) -> R + Send + Sync + 'static,
    R: IntoHookOutcome + 'static,
{
    fn on_event(&self, ctx: &Context, data: &dyn Any) -> Result<(), BoxError> {
        match data.downcast_ref::<T>() {
            Some(value) => (self.func)(ctx, value).into_outcome(),
            None => Ok(()),
        }
    }
}
