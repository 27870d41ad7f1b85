//! State shared by every node of one tree.

use crate::{switch::EnabledHandle, topic::Topic};
use parking_lot::RwLock;
use simhook_core::{Path, SharedDispatcher};
use std::sync::{
    Arc,
    atomic::{AtomicU64, Ordering},
};

pub(crate) struct Shared {
    pub(crate) master: EnabledHandle,
    /// Used where no namespace or descriptor sets its own.
    pub(crate) dispatcher: SharedDispatcher,
    /// Every topic of the tree, in declaration order.
    topics: RwLock<Vec<Arc<Topic>>>,
    firings: AtomicU64,
}

impl Shared {
    pub(crate) fn new(enabled: bool, dispatcher: SharedDispatcher) -> Self {
        Self {
            master: EnabledHandle::new(enabled),
            dispatcher,
            topics: RwLock::new(Vec::new()),
            firings: AtomicU64::new(0),
        }
    }

    /// Allocate a firing id; ids start at 1.
    pub(crate) fn next_firing(&self) -> u64 {
        self.firings.fetch_add(1, Ordering::Relaxed) + 1
    }

    pub(crate) fn add_topic(&self, topic: Arc<Topic>) {
        self.topics.write().push(topic);
    }

    /// Topics with a pattern covering `event`, in declaration order.
    pub(crate) fn matching(&self, event: &Path) -> Vec<Arc<Topic>> {
        self.topics
            .read()
            .iter()
            .filter(|topic| topic.matches(event))
            .cloned()
            .collect()
    }
}
