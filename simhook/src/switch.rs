//! Enable switches and hierarchical overrides.
//!
//! Two kinds of switch gate hook execution:
//!
//! - [`EnabledHandle`]: a plain boolean, used for the root master switch and
//!   for each topic's own flag.
//! - [`Override`]: a tri-state (`None` = inherit) carried by every namespace
//!   and every event descriptor. A descriptor's local state is the first
//!   explicit value found walking from the descriptor up to the root
//!   namespace, `true` if none is set.
//!
//! The dispatcher is inherited the same way: [`DispatcherOverride`] holds an
//! optional dispatcher per node and the root's default applies when no node
//! on the chain sets one.

use parking_lot::RwLock;
use simhook_core::SharedDispatcher;
use std::fmt;
use std::sync::{
    Arc,
    atomic::{AtomicBool, AtomicU8, Ordering},
};

/// A handle for toggling an enabled state at runtime.
///
/// Clones share the same state.
#[derive(Debug, Clone)]
pub struct EnabledHandle(Arc<AtomicBool>);

impl EnabledHandle {
    /// Create a new enabled handle with the given initial state.
    pub fn new(enabled: bool) -> Self {
        Self(Arc::new(AtomicBool::new(enabled)))
    }

    /// Check if the switch is currently on.
    pub fn is_enabled(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }

    /// Turn the switch on.
    pub fn enable(&self) {
        self.0.store(true, Ordering::Release);
    }

    /// Turn the switch off.
    pub fn disable(&self) {
        self.0.store(false, Ordering::Release);
    }

    /// Set the state, returning the previous one.
    pub fn set(&self, enabled: bool) -> bool {
        self.0.swap(enabled, Ordering::AcqRel)
    }
}

impl Default for EnabledHandle {
    fn default() -> Self {
        Self::new(true)
    }
}

const INHERIT: u8 = 0;
const OFF: u8 = 1;
const ON: u8 = 2;

/// A tri-state enable override.
#[derive(Debug, Default)]
pub(crate) struct Override(AtomicU8);

impl Override {
    /// An override that inherits from its parent.
    pub(crate) const fn inherit() -> Self {
        Self(AtomicU8::new(INHERIT))
    }

    /// Current explicit value, `None` when inheriting.
    pub(crate) fn get(&self) -> Option<bool> {
        match self.0.load(Ordering::Acquire) {
            OFF => Some(false),
            ON => Some(true),
            _ => None,
        }
    }

    /// Set or clear the explicit value.
    pub(crate) fn set(&self, value: Option<bool>) {
        let raw = match value {
            None => INHERIT,
            Some(false) => OFF,
            Some(true) => ON,
        };
        self.0.store(raw, Ordering::Release);
    }
}

/// Resolve a chain of overrides, nearest first.
pub(crate) fn resolve(chain: &[Arc<Override>]) -> bool {
    chain.iter().find_map(|o| o.get()).unwrap_or(true)
}

/// An optional dispatcher (`None` = inherit).
#[derive(Default)]
pub(crate) struct DispatcherOverride(RwLock<Option<SharedDispatcher>>);

impl DispatcherOverride {
    pub(crate) fn get(&self) -> Option<SharedDispatcher> {
        self.0.read().clone()
    }

    pub(crate) fn set(&self, dispatcher: Option<SharedDispatcher>) {
        *self.0.write() = dispatcher;
    }
}

impl fmt::Debug for DispatcherOverride {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("DispatcherOverride")
            .field(&self.0.read().is_some())
            .finish()
    }
}

/// The nearest dispatcher set on `chain`, else `default`.
pub(crate) fn dispatcher(
    chain: &[Arc<DispatcherOverride>],
    default: &SharedDispatcher,
) -> SharedDispatcher {
    chain
        .iter()
        .find_map(|slot| slot.get())
        .unwrap_or_else(|| Arc::clone(default))
}
