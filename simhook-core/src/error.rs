//! Error types for simhook.
//!
//! This module provides a structured error hierarchy using `thiserror`:
//!
//! - [`SimhookError`] - Top-level error type for declarations: malformed
//!   paths, duplicate events, failing enable hooks
//! - [`HookError`] - A hook failed while running
//! - [`FireError`] - Result error of firing an event around a host primitive
//!
//! Path errors live next to the resolver in [`crate::path::PathError`].

use crate::{context::HookKind, path::Path, path::PathError};
use thiserror::Error;

/// A boxed error type for dynamic error handling.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Top-level error type for declarations and immediate dispatches.
#[derive(Error, Debug)]
pub enum SimhookError {
    /// A name or pattern could not be parsed.
    #[error(transparent)]
    Path(#[from] PathError),

    /// An event with this path was already declared.
    #[error("event `{0}` is already declared")]
    Duplicate(Path),

    /// A hook failed while the operation dispatched enable/disable hooks.
    #[error(transparent)]
    Hook(#[from] HookError),

    /// The root namespace of the tree this node belongs to was dropped.
    #[error("namespace `{0}` is detached from its root")]
    Detached(Path),
}

impl SimhookError {
    /// True for a duplicate declaration.
    pub fn is_duplicate(&self) -> bool {
        matches!(self, SimhookError::Duplicate(_))
    }

    /// True for a malformed path.
    pub fn is_malformed(&self) -> bool {
        matches!(self, SimhookError::Path(PathError::Malformed { .. }))
    }
}

/// A hook returned an error.
///
/// The remaining hooks of the phase are not run.
#[derive(Error, Debug)]
#[error("{kind} hook of topic `{topic}` failed for event `{event}`")]
pub struct HookError {
    /// Which phase was being dispatched.
    pub kind: HookKind,
    /// The topic that owns the failing hook.
    pub topic: Path,
    /// The fired event.
    pub event: Path,
    /// The error returned by the hook.
    #[source]
    pub source: BoxError,
}

/// Error of a firing.
///
/// `Host` carries the wrapped primitive's own failure untouched.
#[derive(Error, Debug)]
pub enum FireError<E> {
    /// The host primitive failed; after hooks were skipped.
    #[error("host primitive failed: {0}")]
    Host(E),

    /// A hook failed; the firing was aborted.
    #[error(transparent)]
    Hook(#[from] HookError),
}

impl<E> FireError<E> {
    /// Return the host failure, if that is what this is.
    pub fn into_host(self) -> Option<E> {
        match self {
            FireError::Host(err) => Some(err),
            FireError::Hook(_) => None,
        }
    }

    /// True if the host primitive failed.
    pub fn is_host(&self) -> bool {
        matches!(self, FireError::Host(_))
    }

    /// The hook failure, if any.
    pub fn as_hook(&self) -> Option<&HookError> {
        match self {
            FireError::Hook(err) => Some(err),
            FireError::Host(_) => None,
        }
    }
}
