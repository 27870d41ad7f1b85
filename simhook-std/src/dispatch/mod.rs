//! Standard dispatchers.
//!
//! - [`SequentialDispatcher`] - runs every hook in order, stops at the first error
//! - [`TracingDispatcher`] - wraps another dispatcher in a `tracing` span

pub mod sequential;
pub mod traced;

pub use self::sequential::SequentialDispatcher;
pub use self::traced::TracingDispatcher;
