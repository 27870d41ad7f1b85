//! Message trait for resolved values.

use std::any::Any;

/// A marker trait for values that flow through hooks.
///
/// The resolved value of a host primitive is handed to after hooks as
/// `&dyn Any`, so it must be `'static`; it must also be `Send + Sync` so a
/// firing can move between threads of a multi-threaded host.
///
/// # Example
///
/// ```rust
/// use simhook_core::Message;
///
/// fn assert_message<T: Message>() {}
/// assert_message::<u64>();
/// assert_message::<String>();
/// ```
#[diagnostic::on_unimplemented(
    message = "`{Self}` is not a valid Message",
    label = "must be `Any + Send + Sync`",
    note = "Values resolved by a fired event are shared with hooks as `&dyn Any`."
)]
pub trait Message: Any + Send + Sync {}

impl<T: Any + Send + Sync> Message for T {}
