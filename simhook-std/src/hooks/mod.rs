//! Standard hooks.

pub mod conditional;
pub mod logging;

pub use conditional::{BranchHook, ConditionalHook};
pub use logging::LoggingHook;
