//! Testing utilities for simhook.
//!
//! This module provides utilities to make testing hooks and topics easier.
//!
//! # Features
//!
//! - [`RecordingHook`]: A hook that records every dispatch it receives
//! - [`CountingHook`]: A hook that counts invocations
//! - [`FailingHook`]: A hook that always fails
//! - [`OrderLog`]: A shared log for asserting hook ordering across topics

use parking_lot::Mutex;
use simhook_core::{BoxError, Context, Hook, HookKind, Path, SharedHook};
use std::{
    any::Any,
    sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    },
};

// ============================================================================
// Recording Hook
// ============================================================================

/// One dispatch seen by a [`RecordingHook`].
#[derive(Debug, Clone)]
pub struct Record<T> {
    /// The context of the dispatch.
    pub context: Context,
    /// The payload, if it was a `T`.
    pub value: Option<T>,
}

impl<T> Record<T> {
    /// Path of the fired event.
    pub fn event_path(&self) -> &Path {
        self.context.event_path()
    }

    /// Kind of the dispatched hook.
    pub fn hook(&self) -> &HookKind {
        self.context.hook()
    }
}

/// A hook that records all dispatches it receives.
///
/// Payloads that downcast to `T` are cloned into the record.
///
/// # Example
///
/// ```rust,ignore
/// let recorder = RecordingHook::<u32>::new();
/// topic.register(HookKind::After, recorder.clone());
///
/// // fire events...
///
/// let records = recorder.records();
/// assert_eq!(records[0].value, Some(42));
/// ```
pub struct RecordingHook<T = ()> {
    records: Arc<Mutex<Vec<Record<T>>>>,
}

impl<T: Clone + Any> RecordingHook<T> {
    /// Create a new recording hook.
    pub fn new() -> Self {
        Self {
            records: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Get a clone of the recorded dispatches.
    pub fn records(&self) -> Vec<Record<T>> {
        self.records.lock().clone()
    }

    /// The recorded payloads that were a `T`.
    pub fn values(&self) -> Vec<T> {
        self.records
            .lock()
            .iter()
            .filter_map(|record| record.value.clone())
            .collect()
    }

    /// Get the number of recorded dispatches.
    pub fn count(&self) -> usize {
        self.records.lock().len()
    }

    /// Clear all records.
    pub fn clear(&self) {
        self.records.lock().clear();
    }
}

impl<T: Clone + Any> Default for RecordingHook<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for RecordingHook<T> {
    fn clone(&self) -> Self {
        Self {
            records: Arc::clone(&self.records),
        }
    }
}

impl<T: Clone + Any + Send + Sync> Hook for RecordingHook<T> {
    fn on_event(&self, ctx: &Context, data: &dyn Any) -> Result<(), BoxError> {
        self.records.lock().push(Record {
            context: ctx.clone(),
            value: data.downcast_ref::<T>().cloned(),
        });
        Ok(())
    }
}

// ============================================================================
// Counting Hook
// ============================================================================

/// A hook that counts invocations.
#[derive(Clone, Default)]
pub struct CountingHook {
    count: Arc<AtomicUsize>,
}

impl CountingHook {
    /// Create a new counting hook.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the current count.
    pub fn count(&self) -> usize {
        self.count.load(Ordering::SeqCst)
    }

    /// Reset the counter.
    pub fn reset(&self) {
        self.count.store(0, Ordering::SeqCst);
    }
}

impl Hook for CountingHook {
    fn on_event(&self, _ctx: &Context, _data: &dyn Any) -> Result<(), BoxError> {
        self.count.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

// ============================================================================
// Failing Hook
// ============================================================================

/// A hook that always returns an error with the given message.
#[derive(Debug, Clone)]
pub struct FailingHook {
    message: String,
}

impl FailingHook {
    /// Create a failing hook.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl Hook for FailingHook {
    fn on_event(&self, _ctx: &Context, _data: &dyn Any) -> Result<(), BoxError> {
        Err(self.message.clone().into())
    }
}

// ============================================================================
// Order Log
// ============================================================================

/// A shared, ordered log of labels.
///
/// Hooks created with [`OrderLog::hook`] push their label when run, which
/// makes it easy to assert ordering across topics and phases.
#[derive(Clone, Default)]
pub struct OrderLog {
    entries: Arc<Mutex<Vec<String>>>,
}

impl OrderLog {
    /// Create an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Push a label directly.
    pub fn push(&self, label: impl Into<String>) {
        self.entries.lock().push(label.into());
    }

    /// A hook pushing `label` every time it runs.
    pub fn hook(&self, label: impl Into<String>) -> SharedHook {
        Arc::new(LabelHook {
            label: label.into(),
            log: self.clone(),
        })
    }

    /// Snapshot of the entries.
    pub fn entries(&self) -> Vec<String> {
        self.entries.lock().clone()
    }

    /// Clear the log.
    pub fn clear(&self) {
        self.entries.lock().clear();
    }
}

struct LabelHook {
    label: String,
    log: OrderLog,
}

impl Hook for LabelHook {
    fn on_event(&self, _ctx: &Context, _data: &dyn Any) -> Result<(), BoxError> {
        self.log.push(self.label.clone());
        Ok(())
    }
}
