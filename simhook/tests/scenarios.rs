use simhook::{
    Context, Dispatcher, HookError, HookKind, HookSet, Metadata, Root, SequentialDispatcher,
    SharedDispatcher, TracingDispatcher, Typed,
    hooks::LoggingHook,
    testing::{CountingHook, OrderLog, RecordingHook},
};
use std::any::Any;
use std::future::{IntoFuture, Ready, ready};
use std::sync::{
    Arc,
    atomic::{AtomicUsize, Ordering},
};

mod common;
use common::{Interrupted, enabled_root, resolved};

/// A host timeout: waits `delay` ticks, then resolves to it.
struct Timeout {
    delay: u64,
}

impl IntoFuture for Timeout {
    type Output = Result<u64, Interrupted>;
    type IntoFuture = Ready<Self::Output>;

    fn into_future(self) -> Self::IntoFuture {
        ready(Ok(self.delay))
    }
}

/// Sequential dispatch that counts its calls.
#[derive(Default)]
struct CountingDispatcher {
    calls: AtomicUsize,
}

impl Dispatcher for CountingDispatcher {
    fn dispatch(&self, ctx: &Context, data: &dyn Any, sets: &[HookSet]) -> Result<(), HookError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        SequentialDispatcher.dispatch(ctx, data, sets)
    }
}

#[tokio::test]
async fn test_event_without_subscribers_runs_no_hook() {
    let root = enabled_root();
    let x = root.ns("a").unwrap().event("x", Metadata::new()).unwrap();

    // a topic elsewhere in the tree
    let counter = CountingHook::new();
    let other = root.topic("other").unwrap();
    other.extend(["::b"]).unwrap();
    other.register(HookKind::Before, counter.clone());
    other.register(HookKind::After, counter.clone());

    let value = x.fire(resolved(1)).await.unwrap();

    assert_eq!(value, 1);
    assert_eq!(counter.count(), 0);
}

#[tokio::test]
async fn test_after_hook_sees_event_name_and_value() {
    let root = enabled_root();
    let x = root.ns("a").unwrap().event("x", Metadata::new()).unwrap();

    let t = root.topic("t").unwrap();
    t.extend(["::a::x"]).unwrap();
    let recorder = RecordingHook::<u32>::new();
    t.register(HookKind::After, recorder.clone());

    x.fire(resolved(42_u32)).await.unwrap();

    let records = recorder.records();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].context.event_name(), "x");
    assert_eq!(records[0].event_path().to_string(), "::a::x");
    assert_eq!(records[0].value, Some(42));
}

#[tokio::test]
async fn test_master_switch_off_runs_no_hook() {
    let root = Root::new();
    let x = root.ns("a").unwrap().event("x", Metadata::new()).unwrap();

    let t = root.topic("t").unwrap();
    t.extend(["::a::x"]).unwrap();
    let counter = CountingHook::new();
    t.register(HookKind::Before, counter.clone());
    t.register(HookKind::After, counter.clone());
    assert!(t.enabled());

    x.fire(resolved(42)).await.unwrap();
    assert_eq!(counter.count(), 0);

    root.set_enabled(true).unwrap();
    x.fire(resolved(42)).await.unwrap();
    assert_eq!(counter.count(), 2);

    root.set_enabled(false).unwrap();
    x.fire(resolved(42)).await.unwrap();
    assert_eq!(counter.count(), 2);
}

#[tokio::test]
async fn test_namespace_pattern_covers_subtree() {
    let root = enabled_root();
    let a = root.ns("a").unwrap();
    let x = a.event("x", Metadata::new()).unwrap();
    let y = a.ns("b").unwrap().event("y", Metadata::new()).unwrap();
    let outside = root.ns("ab").unwrap().event("z", Metadata::new()).unwrap();

    let t = root.topic("t").unwrap();
    t.extend(["::a"]).unwrap();
    let recorder = RecordingHook::<()>::new();
    t.register(HookKind::After, recorder.clone());

    x.fire(resolved(())).await.unwrap();
    y.fire(resolved(())).await.unwrap();
    y.fire(resolved(())).await.unwrap();
    outside.fire(resolved(())).await.unwrap();

    let paths: Vec<String> = recorder
        .records()
        .iter()
        .map(|record| record.event_path().to_string())
        .collect();
    assert_eq!(paths, ["::a::x", "::a::b::y", "::a::b::y"]);
}

#[tokio::test]
async fn test_hooks_run_once_in_registration_order() {
    let root = enabled_root();
    let x = root.event("a::x", Metadata::new()).unwrap();
    let log = OrderLog::new();

    let t = root.topic("t").unwrap();
    // duplicates must not duplicate the hooks
    t.extend(["::a::x", "::a::x"]).unwrap();
    t.register(HookKind::Before, log.hook("before 1"));
    t.register(HookKind::After, log.hook("after 1"));
    t.register(HookKind::Before, log.hook("before 2"));
    t.register(HookKind::After, log.hook("after 2"));

    let inner = log.clone();
    x.fire(async move {
        inner.push("primitive");
        Ok::<_, common::Interrupted>(())
    })
    .await
    .unwrap();

    assert_eq!(
        log.entries(),
        ["before 1", "before 2", "primitive", "after 1", "after 2"]
    );
}

#[tokio::test]
async fn test_topics_run_in_declaration_order() {
    let root = enabled_root();
    let x = root.event("a::x", Metadata::new()).unwrap();
    let log = OrderLog::new();

    // declared in this order, in different namespaces
    let first = root.ns("z").unwrap().topic("first").unwrap();
    let second = root.topic("second").unwrap();
    let third = root.ns("a").unwrap().topic("third").unwrap();

    third.extend(["x"]).unwrap();
    second.extend(["::a"]).unwrap();
    first.extend(["::"]).unwrap();
    for (topic, label) in [(&first, "first"), (&second, "second"), (&third, "third")] {
        topic.register(HookKind::After, log.hook(label));
    }

    x.fire(resolved(())).await.unwrap();
    assert_eq!(log.entries(), ["first", "second", "third"]);
}

#[tokio::test]
async fn test_subscription_added_later_applies_to_next_firing() {
    let root = enabled_root();
    let x = root.event("a::x", Metadata::new()).unwrap();
    let t = root.topic("t").unwrap();
    let counter = CountingHook::new();
    t.register(HookKind::After, counter.clone());

    x.fire(resolved(())).await.unwrap();
    assert_eq!(counter.count(), 0);

    root.topic("t").unwrap().extend(["::a::x"]).unwrap();
    x.fire(resolved(())).await.unwrap();
    assert_eq!(counter.count(), 1);

    assert!(t.remove("::a::x").unwrap());
    x.fire(resolved(())).await.unwrap();
    assert_eq!(counter.count(), 1);
}

#[tokio::test]
async fn test_pattern_declared_before_event_is_inert_until_declared() {
    let root = enabled_root();
    let t = root.topic("t").unwrap();
    t.extend(["::later::x", "::never::declared"]).unwrap();
    let counter = CountingHook::new();
    t.register(HookKind::After, counter.clone());

    let x = root.event("::later::x", Metadata::new()).unwrap();
    x.fire(resolved(())).await.unwrap();
    assert_eq!(counter.count(), 1);
}

#[tokio::test]
async fn test_removed_hook_no_longer_runs() {
    let root = enabled_root();
    let x = root.event("x", Metadata::new()).unwrap();
    let log = OrderLog::new();
    let t = root.topic("t").unwrap();
    t.subscribe("::x").unwrap();

    let first = t.register(HookKind::After, log.hook("first"));
    t.register(HookKind::After, log.hook("second"));
    assert!(t.remove_hook(&first));

    x.fire(resolved(())).await.unwrap();
    assert_eq!(log.entries(), ["second"]);
}

#[tokio::test]
async fn test_context_carries_metadata_and_namespace() {
    let root = enabled_root();
    let signal = root
        .ns("satellite")
        .unwrap()
        .event("signal", [("sat", "sat1"), ("band", "ku")])
        .unwrap();

    let seen = Arc::new(parking_lot::Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    root.before("analyse", move |ctx: &Context, _: &dyn Any| {
        sink.lock().push(format!(
            "{} {} {} {}",
            ctx.hook(),
            ctx.namespace(),
            ctx.event_name(),
            ctx.metadata()
        ));
    })
    .unwrap();
    root.group("analyse").unwrap().subscribe("::satellite").unwrap();

    signal.fire(resolved("0,1,2,3")).await.unwrap();

    assert_eq!(
        *seen.lock(),
        ["before ::satellite signal {band: ku, sat: sat1}"]
    );
}

#[tokio::test]
async fn test_custom_dispatch_reaches_custom_hooks() {
    let root = enabled_root();
    let x = root.event("x", Metadata::new()).unwrap();
    let recorder = RecordingHook::<u64>::new();
    root.handlers("t", "checkpoint")
        .unwrap()
        .register(recorder.clone());
    root.topic("t").unwrap().subscribe("::").unwrap();

    x.dispatch("checkpoint", &7_u64).unwrap();
    x.dispatch("other", &8_u64).unwrap();

    assert_eq!(recorder.values(), [7]);
}

#[tokio::test]
async fn test_custom_dispatcher_is_used_for_every_event() {
    let root = Root::builder()
        .enabled(true)
        .dispatcher(TracingDispatcher::new(SequentialDispatcher))
        .build();
    let x = root.event("a::x", Metadata::new()).unwrap();
    let log = OrderLog::new();
    let t = root.topic("t").unwrap();
    t.subscribe("::a").unwrap();
    t.register(HookKind::Before, log.hook("before"));
    t.register(HookKind::After, LoggingHook::named("analyse"));
    t.register(HookKind::After, log.hook("after"));

    x.fire(resolved(3)).await.unwrap();
    assert_eq!(log.entries(), ["before", "after"]);
}

#[tokio::test]
async fn test_before_hook_inspects_primitive() {
    let root = enabled_root();
    let wait = root.event("satellite::wait", Metadata::new()).unwrap();
    let log = OrderLog::new();
    let t = root.topic("t").unwrap();
    t.subscribe("::satellite").unwrap();

    let sink = log.clone();
    t.register(
        HookKind::Before,
        Typed::new(move |ctx: &Context, timeout: &Timeout| {
            let raw = ctx.raw_event().map(|raw| raw.primitive()).unwrap_or("?");
            assert!(raw.ends_with("Timeout"), "{raw}");
            sink.push(format!("waiting {}", timeout.delay));
        }),
    );
    let sink = log.clone();
    t.register(
        HookKind::After,
        Typed::new(move |_: &Context, delay: &u64| sink.push(format!("waited {delay}"))),
    );

    assert_eq!(wait.fire(Timeout { delay: 5 }).await.unwrap(), 5);
    assert_eq!(log.entries(), ["waiting 5", "waited 5"]);
}

#[tokio::test]
async fn test_subtree_dispatcher_leaves_siblings_on_default() {
    let root = enabled_root();
    let inside = root.event("a::b::x", Metadata::new()).unwrap();
    let sibling = root.event("c::y", Metadata::new()).unwrap();
    let counter = CountingHook::new();
    let t = root.topic("t").unwrap();
    t.subscribe("::").unwrap();
    t.register(HookKind::After, counter.clone());

    let counting = Arc::new(CountingDispatcher::default());
    let shared: SharedDispatcher = counting.clone();
    root.ns("a").unwrap().set_dispatcher(Some(shared));

    inside.fire(resolved(1)).await.unwrap();
    sibling.fire(resolved(2)).await.unwrap();

    // phases without hooks never reach a dispatcher
    assert_eq!(counting.calls.load(Ordering::SeqCst), 1);
    assert_eq!(counter.count(), 2);

    // the descriptor's own setting beats its namespace
    inside.set_dispatcher(Some(Arc::new(SequentialDispatcher)));
    inside.fire(resolved(3)).await.unwrap();
    assert_eq!(counting.calls.load(Ordering::SeqCst), 1);

    inside.set_dispatcher(None);
    inside.fire(resolved(4)).await.unwrap();
    assert_eq!(counting.calls.load(Ordering::SeqCst), 2);
    assert_eq!(counter.count(), 4);
}
