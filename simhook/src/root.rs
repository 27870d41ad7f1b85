//! The root namespace.
//!
//! A [`Root`] is built once per simulation run and handed to the setup code
//! of every actor and observer. It dereferences to the root [`NameSpace`]
//! and adds:
//!
//! - the master switch, off by default: instrumentation is assembled first
//!   and observation starts when [`Root::set_enabled`] turns it on;
//! - root-level named hook groups ([`Root::enable`], [`Root::before`],
//!   [`Root::after`]), which are topics declared on the root namespace;
//! - the [`Dispatcher`] used by every event of the tree.
//!
//! # Example
//!
//! ```rust
//! use simhook::{Context, Root};
//! use std::any::Any;
//!
//! let root = Root::new();
//! root.after("analyse", |ctx: &Context, _value: &dyn Any| {
//!     println!("{} resolved", ctx.event_path());
//! })
//! .unwrap();
//! root.topic("analyse").unwrap().extend(["::satellite"]).unwrap();
//! root.set_enabled(true).unwrap();
//! ```

use crate::{
    event::EventDescriptor, namespace::NameSpace, shared::Shared, topic::HookHandle,
    topic::Topic,
};
use simhook_core::{
    Context, Dispatcher, HookError, IntoHookOutcome, SharedDispatcher, SimhookError,
};
use simhook_std::dispatch::SequentialDispatcher;
use std::any::Any;
use std::fmt;
use std::ops::Deref;
use std::sync::Arc;

#[cfg(feature = "tracing")]
use tracing::debug;

/// Builder for a [`Root`].
///
/// # Example
///
/// ```rust
/// use simhook::{Root, TracingDispatcher, SequentialDispatcher};
///
/// let root = Root::builder()
///     .enabled(true)
///     .dispatcher(TracingDispatcher::new(SequentialDispatcher))
///     .build();
/// assert!(root.enabled());
/// ```
pub struct RootBuilder {
    enabled: bool,
    dispatcher: Option<SharedDispatcher>,
}

impl RootBuilder {
    /// Create a builder with the master switch off and the sequential
    /// dispatcher.
    pub fn new() -> Self {
        Self {
            enabled: false,
            dispatcher: None,
        }
    }

    /// Initial state of the master switch.
    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Dispatcher used by every event of the tree.
    pub fn dispatcher(mut self, dispatcher: impl Dispatcher) -> Self {
        self.dispatcher = Some(Arc::new(dispatcher));
        self
    }

    /// Build the root.
    pub fn build(self) -> Root {
        let dispatcher = self
            .dispatcher
            .unwrap_or_else(|| Arc::new(SequentialDispatcher));
        let shared = Arc::new(Shared::new(self.enabled, dispatcher));
        Root {
            ns: NameSpace::new_root(Arc::clone(&shared)),
            shared,
        }
    }
}

impl Default for RootBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Top of the namespace tree, master switch and named hook groups.
pub struct Root {
    ns: Arc<NameSpace>,
    shared: Arc<Shared>,
}

impl Root {
    /// A root with the master switch off and the sequential dispatcher.
    pub fn new() -> Self {
        Self::builder().build()
    }

    /// Configure a root.
    pub fn builder() -> RootBuilder {
        RootBuilder::new()
    }

    /// The root namespace node.
    pub fn namespace(&self) -> &Arc<NameSpace> {
        &self.ns
    }

    /// The default dispatcher of the tree.
    ///
    /// Namespaces and descriptors may override it with `set_dispatcher`.
    pub fn dispatcher(&self) -> &SharedDispatcher {
        &self.shared.dispatcher
    }

    // ------------------------------------------------------------------
    // Master switch
    // ------------------------------------------------------------------

    /// State of the master switch.
    pub fn enabled(&self) -> bool {
        self.shared.master.is_enabled()
    }

    /// Flip the master switch.
    ///
    /// Turning it off first dispatches `Disable` for every event that was
    /// enabled, then stores the new state; turning it on stores the state
    /// then dispatches `Enable` for every event that becomes enabled. The
    /// switch is stored even if a hook fails; the first failure is returned.
    pub fn set_enabled(&self, enabled: bool) -> Result<(), HookError> {
        #[cfg(feature = "tracing")]
        debug!(enabled, "master switch");

        let mut events = Vec::new();
        self.ns.collect_events(&mut events);

        if enabled {
            self.shared.master.enable();
            events.iter().try_for_each(EventDescriptor::refresh)
        } else {
            let result = events.iter().try_for_each(EventDescriptor::deactivate);
            self.shared.master.disable();
            result
        }
    }

    // ------------------------------------------------------------------
    // Named groups
    // ------------------------------------------------------------------

    /// The root-level named group `name`.
    pub fn group(&self, name: &str) -> Result<Arc<Topic>, SimhookError> {
        self.ns.topic(name)
    }

    /// Register an `enable` hook on the group `name`.
    pub fn enable<F, R>(&self, name: &str, f: F) -> Result<HookHandle, SimhookError>
    where
        F: Fn(&Context, &dyn Any) -> R + Send + Sync + 'static,
        R: IntoHookOutcome + 'static,
    {
        self.ns.on_enable(name, f)
    }

    /// Register a `disable` hook on the group `name`.
    pub fn disable<F, R>(&self, name: &str, f: F) -> Result<HookHandle, SimhookError>
    where
        F: Fn(&Context, &dyn Any) -> R + Send + Sync + 'static,
        R: IntoHookOutcome + 'static,
    {
        self.ns.on_disable(name, f)
    }

    /// Register a `before` hook on the group `name`.
    pub fn before<F, R>(&self, name: &str, f: F) -> Result<HookHandle, SimhookError>
    where
        F: Fn(&Context, &dyn Any) -> R + Send + Sync + 'static,
        R: IntoHookOutcome + 'static,
    {
        self.ns.before(name, f)
    }

    /// Register an `after` hook on the group `name`.
    pub fn after<F, R>(&self, name: &str, f: F) -> Result<HookHandle, SimhookError>
    where
        F: Fn(&Context, &dyn Any) -> R + Send + Sync + 'static,
        R: IntoHookOutcome + 'static,
    {
        self.ns.after(name, f)
    }
}

impl Default for Root {
    fn default() -> Self {
        Self::new()
    }
}

impl Deref for Root {
    type Target = NameSpace;

    fn deref(&self) -> &NameSpace {
        &self.ns
    }
}

impl fmt::Debug for Root {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Root")
            .field("enabled", &self.enabled())
            .field("namespace", &self.ns)
            .finish_non_exhaustive()
    }
}
