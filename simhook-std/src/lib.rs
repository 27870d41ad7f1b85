//! # simhook-std
//!
//! Standard implementations for the simhook instrumentation layer.
//!
//! This crate provides:
//! - **Dispatchers**: [`SequentialDispatcher`], [`TracingDispatcher`]
//! - **Standard hooks**: [`LoggingHook`], [`ConditionalHook`], [`BranchHook`]
//! - **Testing utilities**: recording, counting and failing hooks
//!
//! [`SequentialDispatcher`]: dispatch::SequentialDispatcher
//! [`TracingDispatcher`]: dispatch::TracingDispatcher
//! [`LoggingHook`]: hooks::LoggingHook
//! [`ConditionalHook`]: hooks::ConditionalHook
//! [`BranchHook`]: hooks::BranchHook

#![deny(clippy::wildcard_imports)]
#![warn(missing_docs)]

// Re-export core traits
pub use simhook_core;

// Modules
pub mod dispatch;
pub mod hooks;
pub mod testing;
