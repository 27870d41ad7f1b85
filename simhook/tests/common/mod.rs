#![allow(dead_code)]

use simhook::Root;
use std::future::{Ready, ready};

// ============================================================================
// Host primitives
// ============================================================================

/// Failure of a test host primitive.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("interrupted: {0}")]
pub struct Interrupted(pub &'static str);

/// A primitive that resolves immediately to `value`.
pub fn resolved<T>(value: T) -> Ready<Result<T, Interrupted>> {
    ready(Ok(value))
}

/// A primitive that fails immediately with `reason`.
pub fn failed<T>(reason: &'static str) -> Ready<Result<T, Interrupted>> {
    ready(Err(Interrupted(reason)))
}

// ============================================================================
// Trees
// ============================================================================

/// A root with the master switch already on.
pub fn enabled_root() -> Root {
    Root::builder().enabled(true).build()
}
