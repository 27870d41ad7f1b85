//! Event descriptors and the firing protocol.
//!
//! An [`EventDescriptor`] is declared once per (namespace, name) and reused
//! for every firing. [`EventDescriptor::fire`] wraps a host suspension
//! primitive, any [`IntoFuture`] resolving to a `Result`:
//!
//! 1. when first polled, resolve the topics whose patterns cover the event
//!    and run their `before` hooks with the primitive itself as payload;
//! 2. await the primitive, the only suspension point;
//! 3. on `Ok(value)` run the `after` hooks with `&value` and return it;
//!    on `Err(e)` skip the `after` hooks and return `e` untouched.
//!
//! Hooks of a phase only run while the root master switch and the
//! descriptor's effective override are both on, and only for topics whose
//! own flag is on. The flags are read at the start of each phase.
//!
//! Dropping the returned future before the primitive resolves skips the
//! `after` hooks.
//!
//! Hooks are delivered through the nearest dispatcher set on the
//! descriptor or its namespaces, else the root's.

use crate::{
    shared::Shared,
    switch::{self, DispatcherOverride, Override},
    topic::Topic,
};
use simhook_core::{
    Context, Dispatcher, EventInfo, FireError, HookError, HookKind, HookSet, Message, Metadata,
    Path, RawEvent, SharedDispatcher,
};
use std::any::{Any, type_name};
use std::convert::Infallible;
use std::fmt;
use std::future::{Future, IntoFuture};
use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

#[cfg(feature = "tracing")]
use tracing::{debug, trace};

/// A declared event: identity, static metadata and enable override.
///
/// Cloning is cheap; clones share state.
#[derive(Clone)]
pub struct EventDescriptor {
    inner: Arc<Inner>,
}

struct Inner {
    info: Arc<EventInfo>,
    shared: Arc<Shared>,
    /// Own override first, then the declaring namespace's and its ancestors'.
    chain: Vec<Arc<Override>>,
    /// Own dispatcher first, then the namespaces', in `chain` order.
    dispatchers: Vec<Arc<DispatcherOverride>>,
    /// Last effective state seen, used to detect enable/disable transitions.
    active: AtomicBool,
}

impl EventDescriptor {
    pub(crate) fn new(
        info: EventInfo,
        shared: Arc<Shared>,
        namespace: &[Arc<Override>],
        namespace_dispatchers: &[Arc<DispatcherOverride>],
    ) -> Self {
        let mut chain = Vec::with_capacity(namespace.len() + 1);
        chain.push(Arc::new(Override::inherit()));
        chain.extend(namespace.iter().cloned());
        let mut dispatchers = Vec::with_capacity(namespace_dispatchers.len() + 1);
        dispatchers.push(Arc::default());
        dispatchers.extend(namespace_dispatchers.iter().cloned());
        Self {
            inner: Arc::new(Inner {
                info: Arc::new(info),
                shared,
                chain,
                dispatchers,
                active: AtomicBool::new(false),
            }),
        }
    }

    /// Identity and metadata of the event.
    pub fn info(&self) -> &EventInfo {
        &self.inner.info
    }

    /// Absolute path of the event.
    pub fn path(&self) -> &Path {
        self.inner.info.path()
    }

    /// Name of the event.
    pub fn name(&self) -> &str {
        self.inner.info.name()
    }

    /// Absolute path of the declaring namespace.
    pub fn namespace(&self) -> &Path {
        self.inner.info.namespace()
    }

    /// Static metadata given at declaration.
    pub fn metadata(&self) -> &Metadata {
        self.inner.info.metadata()
    }

    /// True if both handles refer to the same declaration.
    pub fn same(&self, other: &EventDescriptor) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    // ------------------------------------------------------------------
    // Enable state
    // ------------------------------------------------------------------

    /// Whether hooks currently run for this event.
    ///
    /// True when the root master switch is on and the nearest explicit
    /// override (descriptor, then namespaces up to the root) is not `false`.
    pub fn enabled(&self) -> bool {
        self.inner.shared.master.is_enabled() && switch::resolve(&self.inner.chain)
    }

    /// The descriptor's own override, `None` when inherited.
    pub fn enabled_override(&self) -> Option<bool> {
        self.inner.chain.first().and_then(|own| own.get())
    }

    /// Set or clear the descriptor's own override.
    ///
    /// Dispatches `Enable` or `Disable` if the effective state changed.
    pub fn set_enabled(&self, enabled: Option<bool>) -> Result<(), HookError> {
        if let Some(own) = self.inner.chain.first() {
            own.set(enabled);
        }
        self.refresh()
    }

    /// Re-evaluate the effective state, notifying on a transition.
    pub(crate) fn refresh(&self) -> Result<(), HookError> {
        let now = self.enabled();
        if self.inner.active.swap(now, Ordering::AcqRel) == now {
            return Ok(());
        }
        self.notify(if now { HookKind::Enable } else { HookKind::Disable })
    }

    /// Mark the descriptor inactive, notifying `Disable` if it was active.
    ///
    /// Used before the master switch goes off, so the hooks still observe
    /// the switch on.
    pub(crate) fn deactivate(&self) -> Result<(), HookError> {
        if !self.inner.active.swap(false, Ordering::AcqRel) {
            return Ok(());
        }
        self.notify(HookKind::Disable)
    }

    fn notify(&self, kind: HookKind) -> Result<(), HookError> {
        #[cfg(feature = "tracing")]
        debug!(event = %self.path(), hook = %kind, "enable state changed");

        let ctx = Context::new(Arc::clone(&self.inner.info), kind, None);
        let topics = self.inner.shared.matching(self.path());
        self.deliver(&ctx, &(), &topics, false)
    }

    // ------------------------------------------------------------------
    // Dispatcher
    // ------------------------------------------------------------------

    /// The dispatcher this event's hooks run through.
    pub fn dispatcher(&self) -> SharedDispatcher {
        switch::dispatcher(&self.inner.dispatchers, &self.inner.shared.dispatcher)
    }

    /// Set or clear the descriptor's own dispatcher.
    pub fn set_dispatcher(&self, dispatcher: Option<SharedDispatcher>) {
        if let Some(own) = self.inner.dispatchers.first() {
            own.set(dispatcher);
        }
    }

    // ------------------------------------------------------------------
    // Dispatch
    // ------------------------------------------------------------------

    /// Run the hooks of `ctx.hook()` of the enabled topics among `topics`.
    fn deliver(
        &self,
        ctx: &Context,
        data: &dyn Any,
        topics: &[Arc<Topic>],
        gated: bool,
    ) -> Result<(), HookError> {
        if gated && !self.enabled() {
            return Ok(());
        }
        let sets: Vec<HookSet> = topics
            .iter()
            .filter(|topic| topic.enabled())
            .filter_map(|topic| topic.snapshot(ctx.hook()))
            .collect();
        if sets.is_empty() {
            return Ok(());
        }
        self.dispatcher().dispatch(ctx, data, &sets)
    }

    /// Immediately dispatch `kind` with `data` to the matching topics.
    ///
    /// Honours the same switches as a firing. The context carries no
    /// [`RawEvent`].
    pub fn dispatch(&self, kind: impl Into<HookKind>, data: &dyn Any) -> Result<(), HookError> {
        let ctx = Context::new(Arc::clone(&self.inner.info), kind.into(), None);
        let topics = self.inner.shared.matching(self.path());
        self.deliver(&ctx, data, &topics, true)
    }

    /// Wrap a host primitive.
    ///
    /// The returned future resolves exactly like `primitive`, with host
    /// failures wrapped in [`FireError::Host`]. A failing hook aborts the
    /// firing with [`FireError::Hook`]; if it was a `before` hook the
    /// primitive is never awaited.
    ///
    /// `before` hooks receive `&primitive` as their payload and can
    /// downcast it to `P`; it is turned into a future only afterwards.
    ///
    /// # Example
    ///
    /// ```rust
    /// use simhook::{Metadata, Root};
    /// use std::future::ready;
    ///
    /// let root = Root::builder().enabled(true).build();
    /// let tick = root.event("tick", Metadata::new()).unwrap();
    /// let value = futures::executor::block_on(tick.fire(ready(Ok::<_, ()>(7))));
    /// assert_eq!(value.unwrap(), 7);
    /// ```
    pub fn fire<P, T, E>(
        &self,
        primitive: P,
    ) -> impl Future<Output = Result<T, FireError<E>>> + use<P, T, E>
    where
        P: IntoFuture<Output = Result<T, E>> + Any,
        T: Message,
    {
        self.clone().firing(primitive, P::into_future)
    }

    /// Wrap a host primitive that cannot fail.
    pub fn fire_ok<P>(
        &self,
        primitive: P,
    ) -> impl Future<Output = Result<P::Output, HookError>> + use<P>
    where
        P: IntoFuture + Any,
        P::Output: Message,
    {
        let firing = self.clone().firing(primitive, |primitive: P| async move {
            Ok::<_, Infallible>(primitive.await)
        });
        async move {
            match firing.await {
                Ok(value) => Ok(value),
                Err(FireError::Hook(err)) => Err(err),
                Err(FireError::Host(never)) => match never {},
            }
        }
    }

    async fn firing<P, F, T, E>(
        self,
        primitive: P,
        start: impl FnOnce(P) -> F,
    ) -> Result<T, FireError<E>>
    where
        P: Any,
        F: Future<Output = Result<T, E>>,
        T: Message,
    {
        let raw = RawEvent::new(self.inner.shared.next_firing(), type_name::<P>());
        let topics = self.inner.shared.matching(self.path());

        #[cfg(feature = "tracing")]
        trace!(
            event = %self.path(),
            firing = raw.id(),
            topics = topics.len(),
            "firing"
        );

        let ctx = Context::new(Arc::clone(&self.inner.info), HookKind::Before, Some(raw));
        self.deliver(&ctx, &primitive, &topics, true)?;

        let value = match start(primitive).await {
            Ok(value) => value,
            Err(err) => {
                #[cfg(feature = "tracing")]
                trace!(event = %self.path(), firing = raw.id(), "host primitive failed");
                return Err(FireError::Host(err));
            }
        };

        let ctx = ctx.with_hook(HookKind::After);
        self.deliver(&ctx, &value, &topics, true)?;
        Ok(value)
    }
}

impl fmt::Debug for EventDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventDescriptor")
            .field("path", self.path())
            .field("metadata", self.metadata())
            .field("enabled", &self.enabled())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::executor::block_on;
    use simhook_std::dispatch::SequentialDispatcher;
    use simhook_std::testing::{CountingHook, OrderLog, RecordingHook};
    use std::future::{Ready, ready};

    fn shared(enabled: bool) -> Arc<Shared> {
        Arc::new(Shared::new(enabled, Arc::new(SequentialDispatcher)))
    }

    fn descriptor(shared: &Arc<Shared>, ns: &str, name: &str) -> EventDescriptor {
        let info = EventInfo::new(Path::parse(ns).unwrap(), name, Metadata::new()).unwrap();
        EventDescriptor::new(info, Arc::clone(shared), &[], &[])
    }

    fn topic(shared: &Arc<Shared>, pattern: &str) -> Arc<Topic> {
        let t = Arc::new(Topic::new(Path::root(), Path::parse("::t").unwrap()));
        t.subscribe(pattern).unwrap();
        shared.add_topic(Arc::clone(&t));
        t
    }

    #[test]
    fn test_fire_runs_before_then_after() {
        let shared = shared(true);
        let event = descriptor(&shared, "::a", "x");
        let t = topic(&shared, "::a::x");
        let log = OrderLog::new();
        t.register(HookKind::Before, log.hook("before"));
        t.register(HookKind::After, log.hook("after"));

        let inner = log.clone();
        let value = block_on(event.fire(async move {
            inner.push("primitive");
            Ok::<_, ()>(42)
        }))
        .unwrap();

        assert_eq!(value, 42);
        assert_eq!(log.entries(), ["before", "primitive", "after"]);
    }

    #[test]
    fn test_after_hook_receives_value() {
        let shared = shared(true);
        let event = descriptor(&shared, "::a", "x");
        let t = topic(&shared, "::a");
        let recorder = RecordingHook::<u32>::new();
        t.register(HookKind::After, recorder.clone());

        block_on(event.fire(ready(Ok::<u32, ()>(42)))).unwrap();

        assert_eq!(recorder.values(), [42]);
        assert_eq!(recorder.records()[0].context.event_name(), "x");
    }

    #[test]
    fn test_before_hook_receives_primitive() {
        let shared = shared(true);
        let event = descriptor(&shared, "::a", "x");
        let t = topic(&shared, "::a::x");
        let recorder = RecordingHook::<Ready<Result<u32, ()>>>::new();
        t.register(HookKind::Before, recorder.clone());

        block_on(event.fire(ready(Ok::<u32, ()>(42)))).unwrap();
        block_on(event.fire(ready(Ok::<u32, ()>(7)))).unwrap();

        let primitives: Vec<_> = recorder
            .values()
            .into_iter()
            .map(Ready::into_inner)
            .collect();
        assert_eq!(primitives, [Ok(42), Ok(7)]);

        let raws: Vec<RawEvent> = recorder
            .records()
            .iter()
            .filter_map(|record| record.context.raw_event().copied())
            .collect();
        assert_eq!(raws.iter().map(RawEvent::id).collect::<Vec<_>>(), [1, 2]);
        assert!(raws[0].primitive().contains("Ready"));
    }

    #[test]
    fn test_own_dispatcher_wins() {
        let shared = shared(true);
        let event = descriptor(&shared, "::a", "x");
        assert!(Arc::ptr_eq(&event.dispatcher(), &shared.dispatcher));

        let own: SharedDispatcher = Arc::new(SequentialDispatcher);
        event.set_dispatcher(Some(Arc::clone(&own)));
        assert!(Arc::ptr_eq(&event.dispatcher(), &own));
        event.set_dispatcher(None);
        assert!(Arc::ptr_eq(&event.dispatcher(), &shared.dispatcher));
    }

    #[test]
    fn test_master_switch_gates_firing() {
        let shared = shared(false);
        let event = descriptor(&shared, "::a", "x");
        let counter = CountingHook::new();
        topic(&shared, "::a").register(HookKind::After, counter.clone());

        block_on(event.fire(ready(Ok::<_, ()>(1)))).unwrap();
        assert_eq!(counter.count(), 0);

        shared.master.enable();
        block_on(event.fire(ready(Ok::<_, ()>(1)))).unwrap();
        assert_eq!(counter.count(), 1);
    }

    #[test]
    fn test_override_gates_firing() {
        let shared = shared(true);
        let event = descriptor(&shared, "::a", "x");
        let counter = CountingHook::new();
        topic(&shared, "::a").register(HookKind::After, counter.clone());

        event.set_enabled(Some(false)).unwrap();
        assert_eq!(event.enabled_override(), Some(false));
        assert!(!event.enabled());
        block_on(event.fire(ready(Ok::<_, ()>(1)))).unwrap();
        assert_eq!(counter.count(), 0);

        event.set_enabled(None).unwrap();
        block_on(event.fire(ready(Ok::<_, ()>(1)))).unwrap();
        assert_eq!(counter.count(), 1);
    }

    #[test]
    fn test_host_failure_skips_after() {
        let shared = shared(true);
        let event = descriptor(&shared, "::a", "x");
        let t = topic(&shared, "::a");
        let before = CountingHook::new();
        let after = CountingHook::new();
        t.register(HookKind::Before, before.clone());
        t.register(HookKind::After, after.clone());

        let err = block_on(event.fire(ready(Err::<u32, _>("link lost")))).unwrap_err();

        assert!(err.is_host());
        assert_eq!(err.into_host(), Some("link lost"));
        assert_eq!(before.count(), 1);
        assert_eq!(after.count(), 0);
    }

    #[test]
    fn test_fire_ok() {
        let shared = shared(true);
        let event = descriptor(&shared, "::a", "x");
        let recorder = RecordingHook::<&'static str>::new();
        topic(&shared, "::a").register(HookKind::After, recorder.clone());

        let value = block_on(event.fire_ok(ready("done"))).unwrap();
        assert_eq!(value, "done");
        assert_eq!(recorder.values(), ["done"]);
    }

    #[test]
    fn test_dispatch_custom_kind() {
        let shared = shared(true);
        let event = descriptor(&shared, "::a", "x");
        let recorder = RecordingHook::<String>::new();
        topic(&shared, "::a")
            .handlers("checkpoint")
            .register(recorder.clone());

        event.dispatch("checkpoint", &"saved".to_owned()).unwrap();

        let records = recorder.records();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].hook(), &HookKind::Custom("checkpoint".into()));
        assert!(records[0].context.raw_event().is_none());
        assert_eq!(recorder.values(), ["saved"]);
    }

    #[test]
    fn test_refresh_notifies_transitions() {
        let shared = shared(true);
        let event = descriptor(&shared, "::a", "x");
        let log = OrderLog::new();
        let t = topic(&shared, "::a");
        t.register(HookKind::Enable, log.hook("enable"));
        t.register(HookKind::Disable, log.hook("disable"));

        event.refresh().unwrap();
        event.refresh().unwrap();
        event.set_enabled(Some(false)).unwrap();
        event.set_enabled(Some(false)).unwrap();
        event.set_enabled(Some(true)).unwrap();
        event.deactivate().unwrap();

        assert_eq!(log.entries(), ["enable", "disable", "enable", "disable"]);
    }

    #[test]
    fn test_same_identity() {
        let shared = shared(true);
        let a = descriptor(&shared, "::a", "x");
        let b = descriptor(&shared, "::a", "x");
        assert!(a.same(&a.clone()));
        assert!(!a.same(&b));
    }
}
