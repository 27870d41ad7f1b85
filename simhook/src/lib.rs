//! # simhook - Namespaced Hooks for Discrete-Event Simulations
//!
//! `simhook` decouples simulation actors from the observers reacting to
//! their activity. Actors fire named, namespaced events around the
//! suspension primitives of their host kernel; observers subscribe to sets
//! of events through path patterns (topics) and run hooks before and after
//! each primitive resolves, without the actor knowing who is listening.
//!
//! ## Quick Start
//!
//! ```rust
//! use simhook::prelude::*;
//! use std::any::Any;
//! use std::future::ready;
//!
//! let root = Root::new();
//!
//! // actor side
//! let signal = root.ns("satellite").unwrap().event("signal", [("sat", "s1")]).unwrap();
//!
//! // observer side
//! let signals = root.topic("receiver::signals").unwrap();
//! signals.extend(["::satellite::signal"]).unwrap();
//! signals.after(|ctx: &Context, value: &dyn Any| {
//!     if let Some(chunk) = value.downcast_ref::<&str>() {
//!         println!("{} from {:?}: {chunk}", ctx.event_path(), ctx.metadata().get("sat"));
//!     }
//! });
//!
//! // start observing, then drive the simulation
//! root.set_enabled(true).unwrap();
//! let chunk = futures::executor::block_on(signal.fire(ready(Ok::<_, ()>("0,1,2,3")))).unwrap();
//! assert_eq!(chunk, "0,1,2,3");
//! ```
//!
//! ## Matching
//!
//! A topic pattern is an absolute path. It matches an event when it names
//! the event itself (`::satellite::signal`) or the event's namespace or one
//! of its ancestors (`::satellite`, `::`). Matching is global: a topic
//! anywhere in the tree sees every event its patterns cover.
//!
//! ## Switches
//!
//! Hooks of a topic run only while the root master switch, the event's
//! effective override and the topic's own flag are all on. Flipping a switch
//! never unregisters anything.
//!
//! ## Crates
//!
//! - `simhook-core`: paths, context, hook and dispatcher traits, errors
//! - `simhook-std`: dispatchers, standard hooks, testing utilities
//! - `simhook`: the namespace tree, topics, event descriptors and the root

#![deny(clippy::wildcard_imports)]
#![warn(missing_docs)]

mod event;
mod namespace;
mod root;
mod shared;
mod switch;
mod topic;

pub use event::EventDescriptor;
pub use namespace::NameSpace;
pub use root::{Root, RootBuilder};
pub use switch::EnabledHandle;
pub use topic::{Handlers, HookHandle, Topic};

pub use simhook_core::{
    BoxError, Context, Dispatcher, EventInfo, FireError, FnHook, Hook, HookError, HookKind,
    HookSet, IntoHookOutcome, Message, Metadata, Path, PathError, RawEvent, SharedDispatcher,
    SharedHook, SimhookError, Typed, path,
};

pub use simhook_std::dispatch::{SequentialDispatcher, TracingDispatcher};

/// Standard hook implementations.
pub mod hooks {
    pub use simhook_std::hooks::{BranchHook, ConditionalHook, LoggingHook};
}

/// Testing utilities.
pub mod testing {
    pub use simhook_std::testing::{CountingHook, FailingHook, OrderLog, Record, RecordingHook};
}

/// Prelude module - common imports for simhook.
///
/// # Usage
///
/// ```rust
/// use simhook::prelude::*;
/// ```
pub mod prelude {
    pub use crate::{
        // Tree
        EventDescriptor,
        Metadata,
        NameSpace,
        Root,
        Topic,
        // Hooks
        Context,
        Hook,
        HookHandle,
        HookKind,
        Typed,
        // Errors
        BoxError,
        FireError,
        HookError,
        SimhookError,
    };
}
