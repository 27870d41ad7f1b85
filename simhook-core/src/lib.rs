//! # simhook-core
//!
//! Core types and traits for the simhook simulation instrumentation layer.
//!
//! This crate has minimal dependencies and is designed to be imported by
//! hook and dispatcher implementations that don't need the namespace tree.
//!
//! # Layers
//!
//! ## Names ([`Path`])
//!
//! `::`-separated namespace paths, their resolution against a base and the
//! prefix test used to match subscription patterns against fired events.
//!
//! ## Observation ([`Hook`], [`Context`])
//!
//! Hooks are synchronous callables run before and after the host primitive
//! of a firing resolves. Each invocation receives the [`Context`] of the
//! firing and a type-erased payload.
//!
//! ## Delivery ([`Dispatcher`])
//!
//! A dispatcher runs the resolved [`HookSet`]s of one dispatch. The default
//! sequential implementation lives in `simhook-std`.
//!
//! # Error Types
//!
//! - [`SimhookError`] - Declaration errors (malformed paths, duplicates)
//! - [`HookError`] - Hook execution errors
//! - [`FireError`] - Firing errors (host failure or hook failure)

#![deny(clippy::wildcard_imports)]
#![warn(missing_docs)]

mod context;
mod dispatcher;
mod error;
mod hook;
mod message;
mod metadata;
pub mod path;
mod response;

// Re-exports
pub use context::{Context, EventInfo, HookKind, RawEvent};
pub use dispatcher::{Dispatcher, HookSet, SharedDispatcher};
pub use error::{BoxError, FireError, HookError, SimhookError};
pub use hook::{FnHook, Hook, SharedHook, Typed};
pub use message::Message;
pub use metadata::Metadata;
pub use path::{Path, PathError};
pub use response::IntoHookOutcome;
