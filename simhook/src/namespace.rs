//! The namespace tree.
//!
//! Every [`NameSpace`] is identified by its absolute path and owns three
//! independent maps: child namespaces, event descriptors and topics. A child
//! namespace, an event and a topic may therefore share a name.
//!
//! Names given to [`NameSpace::ns`], [`NameSpace::event`] and
//! [`NameSpace::topic`] are paths: relative ones are resolved from the node
//! they are passed to, absolute ones from the root. For `event` and `topic`
//! the last segment is the declared name and the rest selects (creating as
//! needed) the owning namespace.
//!
//! ```rust
//! use simhook::Root;
//!
//! let root = Root::new();
//! let sat = root.ns("satellite").unwrap();
//! let signal = sat.event("signal", [("sat", "s1")]).unwrap();
//! assert_eq!(signal.path().to_string(), "::satellite::signal");
//! assert!(std::sync::Arc::ptr_eq(&sat, &root.ns("::satellite").unwrap()));
//! ```

use crate::{
    event::EventDescriptor,
    shared::Shared,
    switch::{DispatcherOverride, Override},
    topic::{Handlers, HookHandle, Topic},
};
use parking_lot::RwLock;
use simhook_core::{
    Context, EventInfo, HookError, HookKind, IntoHookOutcome, Metadata, Path, PathError,
    SharedDispatcher, SimhookError,
};
use std::any::Any;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::{Arc, Weak};

#[cfg(feature = "tracing")]
use tracing::debug;

/// A node of the naming tree.
///
/// Nodes are always handled through `Arc` and live as long as their root.
pub struct NameSpace {
    path: Path,
    this: Weak<NameSpace>,
    parent: Option<Weak<NameSpace>>,
    root: Weak<NameSpace>,
    shared: Arc<Shared>,
    /// Own override first, then the ancestors' up to the root.
    chain: Vec<Arc<Override>>,
    /// Same order as `chain`.
    dispatchers: Vec<Arc<DispatcherOverride>>,
    children: RwLock<BTreeMap<String, Arc<NameSpace>>>,
    events: RwLock<BTreeMap<String, EventDescriptor>>,
    topics: RwLock<BTreeMap<String, Arc<Topic>>>,
}

impl NameSpace {
    pub(crate) fn new_root(shared: Arc<Shared>) -> Arc<Self> {
        Arc::new_cyclic(|this| Self {
            path: Path::root(),
            this: this.clone(),
            parent: None,
            root: this.clone(),
            shared,
            chain: vec![Arc::new(Override::inherit())],
            dispatchers: vec![Arc::default()],
            children: RwLock::new(BTreeMap::new()),
            events: RwLock::new(BTreeMap::new()),
            topics: RwLock::new(BTreeMap::new()),
        })
    }

    fn new_child(parent: &NameSpace, path: Path) -> Arc<Self> {
        let mut chain = Vec::with_capacity(parent.chain.len() + 1);
        chain.push(Arc::new(Override::inherit()));
        chain.extend(parent.chain.iter().cloned());
        let mut dispatchers = Vec::with_capacity(parent.dispatchers.len() + 1);
        dispatchers.push(Arc::default());
        dispatchers.extend(parent.dispatchers.iter().cloned());

        Arc::new_cyclic(|this| Self {
            path,
            this: this.clone(),
            parent: Some(parent.this.clone()),
            root: parent.root.clone(),
            shared: Arc::clone(&parent.shared),
            chain,
            dispatchers,
            children: RwLock::new(BTreeMap::new()),
            events: RwLock::new(BTreeMap::new()),
            topics: RwLock::new(BTreeMap::new()),
        })
    }

    /// Absolute path of the namespace.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Name of the namespace, `None` for the root.
    pub fn name(&self) -> Option<&str> {
        self.path.name()
    }

    /// The parent namespace, `None` for the root.
    pub fn parent(&self) -> Option<Arc<NameSpace>> {
        self.parent.as_ref().and_then(Weak::upgrade)
    }

    // ------------------------------------------------------------------
    // Resolution
    // ------------------------------------------------------------------

    fn arc(&self) -> Result<Arc<NameSpace>, SimhookError> {
        self.this
            .upgrade()
            .ok_or_else(|| SimhookError::Detached(self.path.clone()))
    }

    fn root_node(&self) -> Result<Arc<NameSpace>, SimhookError> {
        self.root
            .upgrade()
            .ok_or_else(|| SimhookError::Detached(self.path.clone()))
    }

    /// Get or create the direct child `name`.
    fn child(&self, name: &str) -> Result<Arc<NameSpace>, PathError> {
        if let Some(child) = self.children.read().get(name) {
            return Ok(Arc::clone(child));
        }
        let path = self.path.child(name)?;
        let mut children = self.children.write();
        let child = children
            .entry(name.to_owned())
            .or_insert_with(|| {
                #[cfg(feature = "tracing")]
                debug!(namespace = %path, "namespace created");
                NameSpace::new_child(self, path)
            });
        Ok(Arc::clone(child))
    }

    /// Walk `path` from this node (or from the root if `path` is absolute),
    /// creating missing nodes.
    fn descend(&self, path: &Path) -> Result<Arc<NameSpace>, SimhookError> {
        let mut node = if path.is_absolute() {
            self.root_node()?
        } else {
            self.arc()?
        };
        for segment in path.segments() {
            node = node.child(segment)?;
        }
        Ok(node)
    }

    /// Split `raw` into its owning namespace and its last segment.
    fn split(&self, raw: &str) -> Result<(Arc<NameSpace>, String), SimhookError> {
        let path = Path::parse(raw)?;
        let (Some(parent), Some(name)) = (path.parent(), path.name()) else {
            return Err(PathError::Malformed {
                raw: raw.to_owned(),
                reason: "expected a name, not the root",
            }
            .into());
        };
        Ok((self.descend(&parent)?, name.to_owned()))
    }

    /// Get or create the namespace at `name`.
    ///
    /// `name` may be a single segment, a relative path (`a::b`) or an
    /// absolute path (`::a::b`, resolved from the root). `"::"` returns the
    /// root. Repeated calls return the same node.
    pub fn ns(&self, name: &str) -> Result<Arc<NameSpace>, SimhookError> {
        let path = Path::parse(name)?;
        self.descend(&path)
    }

    // ------------------------------------------------------------------
    // Declarations
    // ------------------------------------------------------------------

    /// Declare the event `name` with static `metadata`.
    ///
    /// Fails with [`SimhookError::Duplicate`] if the target namespace
    /// already declares an event with that name. If the new event is
    /// enabled, its `Enable` hooks run before this returns; a failing hook
    /// is reported as [`SimhookError::Hook`] and leaves the event declared.
    pub fn event(
        &self,
        name: &str,
        metadata: impl Into<Metadata>,
    ) -> Result<EventDescriptor, SimhookError> {
        let (owner, name) = self.split(name)?;
        owner.declare_event(name, metadata.into())
    }

    fn declare_event(
        &self,
        name: String,
        metadata: Metadata,
    ) -> Result<EventDescriptor, SimhookError> {
        let info = EventInfo::new(self.path.clone(), name.clone(), metadata)?;
        let descriptor = {
            let mut events = self.events.write();
            if events.contains_key(&name) {
                return Err(SimhookError::Duplicate(info.path().clone()));
            }
            let descriptor = EventDescriptor::new(
                info,
                Arc::clone(&self.shared),
                &self.chain,
                &self.dispatchers,
            );
            events.insert(name, descriptor.clone());
            descriptor
        };

        #[cfg(feature = "tracing")]
        debug!(event = %descriptor.path(), metadata = %descriptor.metadata(), "event declared");

        descriptor.refresh()?;
        Ok(descriptor)
    }

    /// Look up a declared event without declaring it.
    pub fn get_event(&self, name: &str) -> Result<Option<EventDescriptor>, SimhookError> {
        let (owner, name) = self.split(name)?;
        Ok(owner.events.read().get(&name).cloned())
    }

    /// Get or create the topic `name`.
    ///
    /// Repeated calls return the same topic, so subscriptions can be added
    /// incrementally.
    pub fn topic(&self, name: &str) -> Result<Arc<Topic>, SimhookError> {
        let (owner, name) = self.split(name)?;
        Ok(owner.declare_topic(&name)?)
    }

    fn declare_topic(&self, name: &str) -> Result<Arc<Topic>, PathError> {
        if let Some(topic) = self.topics.read().get(name) {
            return Ok(Arc::clone(topic));
        }
        let path = self.path.child(name)?;
        let mut topics = self.topics.write();
        if let Some(topic) = topics.get(name) {
            return Ok(Arc::clone(topic));
        }

        #[cfg(feature = "tracing")]
        debug!(topic = %path, "topic declared");

        let topic = Arc::new(Topic::new(self.path.clone(), path));
        topics.insert(name.to_owned(), Arc::clone(&topic));
        self.shared.add_topic(Arc::clone(&topic));
        Ok(topic)
    }

    // ------------------------------------------------------------------
    // Shorthands
    // ------------------------------------------------------------------

    /// Registration view for hooks of `kind` on the topic `topic`.
    pub fn handlers(
        &self,
        topic: &str,
        kind: impl Into<HookKind>,
    ) -> Result<Handlers, SimhookError> {
        Ok(self.topic(topic)?.handlers(kind))
    }

    /// Register a `before` hook on the topic `topic`.
    pub fn before<F, R>(&self, topic: &str, f: F) -> Result<HookHandle, SimhookError>
    where
        F: Fn(&Context, &dyn Any) -> R + Send + Sync + 'static,
        R: IntoHookOutcome + 'static,
    {
        Ok(self.topic(topic)?.before(f))
    }

    /// Register an `after` hook on the topic `topic`.
    pub fn after<F, R>(&self, topic: &str, f: F) -> Result<HookHandle, SimhookError>
    where
        F: Fn(&Context, &dyn Any) -> R + Send + Sync + 'static,
        R: IntoHookOutcome + 'static,
    {
        Ok(self.topic(topic)?.after(f))
    }

    /// Register an `enable` hook on the topic `topic`.
    pub fn on_enable<F, R>(&self, topic: &str, f: F) -> Result<HookHandle, SimhookError>
    where
        F: Fn(&Context, &dyn Any) -> R + Send + Sync + 'static,
        R: IntoHookOutcome + 'static,
    {
        Ok(self.topic(topic)?.on_enable(f))
    }

    /// Register a `disable` hook on the topic `topic`.
    pub fn on_disable<F, R>(&self, topic: &str, f: F) -> Result<HookHandle, SimhookError>
    where
        F: Fn(&Context, &dyn Any) -> R + Send + Sync + 'static,
        R: IntoHookOutcome + 'static,
    {
        Ok(self.topic(topic)?.on_disable(f))
    }

    // ------------------------------------------------------------------
    // Introspection
    // ------------------------------------------------------------------

    /// Direct children, by name.
    pub fn children(&self) -> Vec<Arc<NameSpace>> {
        self.children.read().values().cloned().collect()
    }

    /// Events declared directly in this namespace, by name.
    pub fn events(&self) -> Vec<EventDescriptor> {
        self.events.read().values().cloned().collect()
    }

    /// Topics declared directly in this namespace, by name.
    pub fn topics(&self) -> Vec<Arc<Topic>> {
        self.topics.read().values().cloned().collect()
    }

    /// Every event of this subtree, depth first.
    pub(crate) fn collect_events(&self, out: &mut Vec<EventDescriptor>) {
        out.extend(self.events());
        for child in self.children() {
            child.collect_events(out);
        }
    }

    // ------------------------------------------------------------------
    // Enable override
    // ------------------------------------------------------------------

    /// This namespace's own override, `None` when inherited.
    pub fn enabled(&self) -> Option<bool> {
        self.chain.first().and_then(|own| own.get())
    }

    /// Set or clear the override for this subtree.
    ///
    /// Every event of the subtree whose effective state changes dispatches
    /// `Enable` or `Disable`. The first failing hook stops the walk; the
    /// override itself stays set.
    pub fn set_enabled(&self, enabled: Option<bool>) -> Result<(), HookError> {
        if let Some(own) = self.chain.first() {
            own.set(enabled);
        }

        #[cfg(feature = "tracing")]
        debug!(namespace = %self.path, enabled = ?enabled, "override changed");

        let mut events = Vec::new();
        self.collect_events(&mut events);
        events.iter().try_for_each(EventDescriptor::refresh)
    }

    // ------------------------------------------------------------------
    // Dispatcher override
    // ------------------------------------------------------------------

    /// The dispatcher set on this namespace, `None` when inherited.
    pub fn dispatcher(&self) -> Option<SharedDispatcher> {
        self.dispatchers.first().and_then(|own| own.get())
    }

    /// Set or clear the dispatcher used by the events of this subtree.
    ///
    /// Nearer settings win: an event's own dispatcher, then its namespace's
    /// and its ancestors', then the root's default. Takes effect on the next
    /// dispatch.
    pub fn set_dispatcher(&self, dispatcher: Option<SharedDispatcher>) {
        #[cfg(feature = "tracing")]
        debug!(namespace = %self.path, set = dispatcher.is_some(), "dispatcher changed");

        if let Some(own) = self.dispatchers.first() {
            own.set(dispatcher);
        }
    }
}

impl fmt::Debug for NameSpace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NameSpace")
            .field("path", &self.path)
            .field("children", &self.children.read().keys().collect::<Vec<_>>())
            .field("events", &self.events.read().keys().collect::<Vec<_>>())
            .field("topics", &self.topics.read().keys().collect::<Vec<_>>())
            .finish()
    }
}
