//! Topics: named subscription sets carrying hooks.
//!
//! A topic holds an ordered, duplicate-free list of absolute path patterns
//! and, per [`HookKind`], an ordered list of hooks. Whenever an event whose
//! path matches one of the patterns is fired, the topic's hooks for the
//! dispatched kind run in registration order.
//!
//! Topics are declared with [`NameSpace::topic`](crate::NameSpace::topic)
//! and live as long as the tree. Root-level topics double as the named hook
//! groups of [`Root`](crate::Root).

use crate::switch::EnabledHandle;
use parking_lot::RwLock;
use simhook_core::{
    Context, FnHook, Hook, HookKind, HookSet, IntoHookOutcome, Path, PathError, SharedHook,
};
use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::sync::{
    Arc,
    atomic::{AtomicU64, Ordering},
};

#[cfg(feature = "tracing")]
use tracing::debug;

/// Hook ids are unique across every topic of every tree.
static NEXT_HOOK: AtomicU64 = AtomicU64::new(0);

/// Handle returned by hook registration, used for explicit removal.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct HookHandle {
    topic: Path,
    kind: HookKind,
    id: u64,
}

impl HookHandle {
    /// Path of the topic the hook was registered on.
    pub fn topic(&self) -> &Path {
        &self.topic
    }

    /// Kind the hook was registered for.
    pub fn kind(&self) -> &HookKind {
        &self.kind
    }
}

/// A named subscription set with its own hooks and enable flag.
pub struct Topic {
    path: Path,
    namespace: Path,
    enabled: EnabledHandle,
    patterns: RwLock<Vec<Path>>,
    hooks: RwLock<HashMap<HookKind, Vec<(u64, SharedHook)>>>,
}

impl Topic {
    pub(crate) fn new(namespace: Path, path: Path) -> Self {
        Self {
            path,
            namespace,
            enabled: EnabledHandle::default(),
            patterns: RwLock::new(Vec::new()),
            hooks: RwLock::new(HashMap::new()),
        }
    }

    /// Absolute path of the topic.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Name of the topic.
    pub fn name(&self) -> &str {
        self.path.name().unwrap_or_default()
    }

    /// Absolute path of the namespace that declared the topic.
    pub fn namespace(&self) -> &Path {
        &self.namespace
    }

    // ------------------------------------------------------------------
    // Subscriptions
    // ------------------------------------------------------------------

    /// Subscribe to `patterns`.
    ///
    /// Relative patterns are resolved against the topic's namespace. Every
    /// pattern is validated before any is added; patterns already present
    /// are skipped. Patterns that name nothing are accepted and stay inert.
    pub fn extend<I, S>(&self, patterns: I) -> Result<(), PathError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let resolved = patterns
            .into_iter()
            .map(|raw| Path::resolve(&self.namespace, raw.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;

        let mut current = self.patterns.write();
        for pattern in resolved {
            if !current.contains(&pattern) {
                #[cfg(feature = "tracing")]
                debug!(topic = %self.path, pattern = %pattern, "subscribed");
                current.push(pattern);
            }
        }
        Ok(())
    }

    /// Subscribe to a single pattern.
    pub fn subscribe(&self, pattern: &str) -> Result<(), PathError> {
        self.extend([pattern])
    }

    /// Unsubscribe from `pattern`, returning whether it was subscribed.
    pub fn remove(&self, pattern: &str) -> Result<bool, PathError> {
        let pattern = Path::resolve(&self.namespace, pattern)?;
        let mut current = self.patterns.write();
        let before = current.len();
        current.retain(|p| *p != pattern);
        Ok(current.len() != before)
    }

    /// The subscribed patterns, in subscription order.
    pub fn patterns(&self) -> Vec<Path> {
        self.patterns.read().clone()
    }

    /// Whether an event at `event` is covered by one of the patterns.
    ///
    /// The parent of `event` is taken as the declaring namespace.
    pub fn matches(&self, event: &Path) -> bool {
        let (Some(namespace), Some(name)) = (event.parent(), event.name()) else {
            return false;
        };
        self.patterns
            .read()
            .iter()
            .any(|pattern| pattern.matches_event(&namespace, name))
    }

    // ------------------------------------------------------------------
    // Hooks
    // ------------------------------------------------------------------

    /// Register `hook` for `kind`, after the hooks already registered.
    pub fn register(&self, kind: impl Into<HookKind>, hook: impl Hook) -> HookHandle {
        let kind = kind.into();
        let id = NEXT_HOOK.fetch_add(1, Ordering::Relaxed);
        let hook: SharedHook = Arc::new(hook);
        self.hooks
            .write()
            .entry(kind.clone())
            .or_default()
            .push((id, hook));

        #[cfg(feature = "tracing")]
        debug!(topic = %self.path, hook = %kind, id, "hook registered");

        HookHandle {
            topic: self.path.clone(),
            kind,
            id,
        }
    }

    /// Register a closure run before the host primitive is awaited.
    ///
    /// The payload is the host primitive itself; the firing's
    /// [`RawEvent`](simhook_core::RawEvent) is on the context.
    pub fn before<F, R>(&self, f: F) -> HookHandle
    where
        F: Fn(&Context, &dyn Any) -> R + Send + Sync + 'static,
        R: IntoHookOutcome + 'static,
    {
        self.register(HookKind::Before, FnHook::new(f))
    }

    /// Register a closure run after the host primitive resolved.
    ///
    /// The payload is the resolved value.
    pub fn after<F, R>(&self, f: F) -> HookHandle
    where
        F: Fn(&Context, &dyn Any) -> R + Send + Sync + 'static,
        R: IntoHookOutcome + 'static,
    {
        self.register(HookKind::After, FnHook::new(f))
    }

    /// Register a closure run when a matched event becomes enabled.
    pub fn on_enable<F, R>(&self, f: F) -> HookHandle
    where
        F: Fn(&Context, &dyn Any) -> R + Send + Sync + 'static,
        R: IntoHookOutcome + 'static,
    {
        self.register(HookKind::Enable, FnHook::new(f))
    }

    /// Register a closure run when a matched event becomes disabled.
    pub fn on_disable<F, R>(&self, f: F) -> HookHandle
    where
        F: Fn(&Context, &dyn Any) -> R + Send + Sync + 'static,
        R: IntoHookOutcome + 'static,
    {
        self.register(HookKind::Disable, FnHook::new(f))
    }

    /// Registration view for one hook kind.
    pub fn handlers(self: &Arc<Self>, kind: impl Into<HookKind>) -> Handlers {
        Handlers {
            topic: Arc::clone(self),
            kind: kind.into(),
        }
    }

    /// Remove a hook, returning whether it was still registered here.
    pub fn remove_hook(&self, handle: &HookHandle) -> bool {
        if handle.topic != self.path {
            return false;
        }
        let mut hooks = self.hooks.write();
        let Some(list) = hooks.get_mut(&handle.kind) else {
            return false;
        };
        let before = list.len();
        list.retain(|(id, _)| *id != handle.id);
        list.len() != before
    }

    /// Number of hooks registered for `kind`.
    pub fn hook_count(&self, kind: impl Into<HookKind>) -> usize {
        self.hooks.read().get(&kind.into()).map_or(0, Vec::len)
    }

    /// Snapshot of the hooks for `kind`, `None` if there are none.
    pub(crate) fn snapshot(&self, kind: &HookKind) -> Option<HookSet> {
        let hooks = self.hooks.read();
        let list = hooks.get(kind).filter(|list| !list.is_empty())?;
        Some(HookSet::new(
            self.path.clone(),
            list.iter().map(|(_, hook)| Arc::clone(hook)).collect(),
        ))
    }

    // ------------------------------------------------------------------
    // Enable switch
    // ------------------------------------------------------------------

    /// Whether the topic's hooks may run.
    pub fn enabled(&self) -> bool {
        self.enabled.is_enabled()
    }

    /// Turn the topic's hooks on or off without unregistering them.
    pub fn set_enabled(&self, enabled: bool) {
        self.enabled.set(enabled);
    }

    /// A handle sharing the topic's enable flag.
    pub fn enabled_handle(&self) -> EnabledHandle {
        self.enabled.clone()
    }
}

impl fmt::Debug for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Topic")
            .field("path", &self.path)
            .field("enabled", &self.enabled())
            .field("patterns", &*self.patterns.read())
            .finish_non_exhaustive()
    }
}

/// Registration view on the hooks of one kind of a topic.
///
/// Returned by [`Topic::handlers`] and
/// [`NameSpace::handlers`](crate::NameSpace::handlers).
#[derive(Clone)]
pub struct Handlers {
    topic: Arc<Topic>,
    kind: HookKind,
}

impl Handlers {
    /// Append a closure.
    pub fn add<F, R>(&self, f: F) -> HookHandle
    where
        F: Fn(&Context, &dyn Any) -> R + Send + Sync + 'static,
        R: IntoHookOutcome + 'static,
    {
        self.topic.register(self.kind.clone(), FnHook::new(f))
    }

    /// Append a hook value.
    pub fn register(&self, hook: impl Hook) -> HookHandle {
        self.topic.register(self.kind.clone(), hook)
    }

    /// The owning topic.
    pub fn topic(&self) -> &Arc<Topic> {
        &self.topic
    }

    /// The hook kind.
    pub fn kind(&self) -> &HookKind {
        &self.kind
    }

    /// Number of hooks of this kind.
    pub fn len(&self) -> usize {
        self.topic.hook_count(self.kind.clone())
    }

    /// True if no hook of this kind is registered.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl fmt::Debug for Handlers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Handlers")
            .field("topic", self.topic.path())
            .field("kind", &self.kind)
            .field("len", &self.len())
            .finish()
    }
}
