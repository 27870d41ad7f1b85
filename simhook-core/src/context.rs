//! # Firing Context
//!
//! Every hook invocation receives a [`Context`]: the identity of the fired
//! event, its namespace, its static metadata, which hook kind is being
//! dispatched and, for firings, a handle on the wrapped host primitive.
//!
//! The event part ([`EventInfo`]) is built once per descriptor and shared
//! behind an `Arc`; a `Context` is a cheap value created per dispatch and
//! dropped once the hooks of that dispatch have run.

use crate::{
    metadata::Metadata,
    path::{Path, PathError},
};
use std::fmt;
use std::sync::Arc;

/// The hook being dispatched.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum HookKind {
    /// Just before the host primitive is awaited.
    Before,
    /// After the host primitive resolved successfully.
    After,
    /// The event became enabled.
    Enable,
    /// The event is about to be disabled.
    Disable,
    /// Any other name, dispatched explicitly.
    Custom(String),
}

impl HookKind {
    /// Name of the hook kind.
    pub fn as_str(&self) -> &str {
        match self {
            HookKind::Before => "before",
            HookKind::After => "after",
            HookKind::Enable => "enable",
            HookKind::Disable => "disable",
            HookKind::Custom(name) => name,
        }
    }
}

impl fmt::Display for HookKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for HookKind {
    fn from(name: &str) -> Self {
        match name {
            "before" => HookKind::Before,
            "after" => HookKind::After,
            "enable" => HookKind::Enable,
            "disable" => HookKind::Disable,
            other => HookKind::Custom(other.to_owned()),
        }
    }
}

/// Identity of one firing of an event.
///
/// `Before` hooks receive the primitive itself as their payload; this
/// handle stays on the [`Context`] for the whole firing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RawEvent {
    id: u64,
    primitive: &'static str,
}

impl RawEvent {
    /// Create a handle for firing `id` of a primitive of type `primitive`.
    pub const fn new(id: u64, primitive: &'static str) -> Self {
        Self { id, primitive }
    }

    /// Firing id, unique and increasing within a root.
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Rust type name of the wrapped primitive.
    pub fn primitive(&self) -> &'static str {
        self.primitive
    }
}

/// Identity and static metadata of a declared event.
#[derive(Debug, PartialEq, Eq)]
pub struct EventInfo {
    namespace: Path,
    path: Path,
    name: String,
    metadata: Metadata,
}

impl EventInfo {
    /// Describe event `name` declared in `namespace`.
    ///
    /// Fails if `name` is empty.
    pub fn new(
        namespace: Path,
        name: impl Into<String>,
        metadata: Metadata,
    ) -> Result<Self, PathError> {
        let name = name.into();
        let path = namespace.child(&name)?;
        Ok(Self {
            namespace,
            path,
            name,
            metadata,
        })
    }

    /// Absolute path of the declaring namespace.
    pub fn namespace(&self) -> &Path {
        &self.namespace
    }

    /// Absolute path of the event (namespace path + name).
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Event name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Static metadata.
    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }
}

/// The per-dispatch record handed to hooks.
#[derive(Debug, Clone)]
pub struct Context {
    event: Arc<EventInfo>,
    hook: HookKind,
    raw: Option<RawEvent>,
}

impl Context {
    /// Build a context for dispatching `hook` for `event`.
    pub fn new(event: Arc<EventInfo>, hook: HookKind, raw: Option<RawEvent>) -> Self {
        Self { event, hook, raw }
    }

    /// The same context for another hook kind.
    pub fn with_hook(&self, hook: HookKind) -> Self {
        Self {
            event: Arc::clone(&self.event),
            hook,
            raw: self.raw,
        }
    }

    /// The fired event.
    pub fn event(&self) -> &EventInfo {
        &self.event
    }

    /// Absolute path of the fired event.
    pub fn event_path(&self) -> &Path {
        self.event.path()
    }

    /// Name of the fired event.
    pub fn event_name(&self) -> &str {
        self.event.name()
    }

    /// Absolute path of the namespace that declared the event.
    pub fn namespace(&self) -> &Path {
        self.event.namespace()
    }

    /// Metadata of the fired event.
    pub fn metadata(&self) -> &Metadata {
        self.event.metadata()
    }

    /// The hook kind being dispatched.
    pub fn hook(&self) -> &HookKind {
        &self.hook
    }

    /// Handle on the wrapped host primitive; `None` outside a firing.
    pub fn raw_event(&self) -> Option<&RawEvent> {
        self.raw.as_ref()
    }
}
