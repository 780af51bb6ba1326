// Copyright (c) The runstats Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use super::StatsHandle;
use crate::reporter::{EventKind, RunEvent};
use debug_ignore::DebugIgnore;
use std::collections::BTreeMap;
use tracing::trace;

/// A handler invoked with each event of the kind it was subscribed to.
pub type EventHandler = Box<dyn FnMut(&RunEvent)>;

/// A publish/subscribe facility for test lifecycle events.
///
/// Handlers are invoked strictly one at a time, in the order the source delivers events. A source
/// also carries the live [`StatsHandle`] installed by a
/// [`StatsCollector`](crate::reporter::StatsCollector), so that any collaborator holding the
/// source can read the current statistics.
pub trait EventSource {
    /// Subscribes `handler` to every event of the given kind.
    fn on(&mut self, kind: EventKind, handler: EventHandler);

    /// Subscribes `handler` to the first event of the given kind only.
    fn once(&mut self, kind: EventKind, handler: EventHandler);

    /// Installs the live statistics for this source, replacing any previous ones.
    fn set_stats(&mut self, stats: StatsHandle);

    /// Returns the live statistics for this source, if a collector has been attached.
    fn stats(&self) -> Option<&StatsHandle>;
}

/// Whether a subscription survives its first invocation.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SubscriptionMode {
    /// The handler is invoked at most once, then dropped.
    Once,

    /// The handler is invoked for every matching event.
    Repeating,
}

#[derive(Debug)]
struct Subscription {
    mode: SubscriptionMode,
    handler: DebugIgnore<EventHandler>,
}

/// An in-memory event source.
///
/// Events are dispatched synchronously by [`Runner::emit`]: every handler subscribed to the
/// event's kind runs to completion, in subscription order, before `emit` returns.
#[derive(Debug, Default)]
pub struct Runner {
    handlers: BTreeMap<EventKind, Vec<Subscription>>,
    stats: Option<StatsHandle>,
}

impl Runner {
    /// Creates a new runner with no subscriptions.
    pub fn new() -> Self {
        Self::default()
    }

    /// Delivers `event` to the handlers subscribed to its kind.
    ///
    /// Handlers subscribed with [`SubscriptionMode::Once`] are dropped after this call.
    pub fn emit(&mut self, event: &RunEvent) {
        let kind = event.kind();
        let Some(subscriptions) = self.handlers.get_mut(&kind) else {
            trace!(%kind, "no handlers subscribed");
            return;
        };

        trace!(%kind, handlers = subscriptions.len(), "dispatching event");
        subscriptions.retain_mut(|subscription| {
            (subscription.handler.0)(event);
            subscription.mode == SubscriptionMode::Repeating
        });
    }

    /// Returns the number of live handlers subscribed to the given kind.
    pub fn handler_count(&self, kind: EventKind) -> usize {
        self.handlers.get(&kind).map_or(0, Vec::len)
    }

    fn subscribe(&mut self, kind: EventKind, mode: SubscriptionMode, handler: EventHandler) {
        self.handlers.entry(kind).or_default().push(Subscription {
            mode,
            handler: DebugIgnore(handler),
        });
    }
}

impl EventSource for Runner {
    fn on(&mut self, kind: EventKind, handler: EventHandler) {
        self.subscribe(kind, SubscriptionMode::Repeating, handler);
    }

    fn once(&mut self, kind: EventKind, handler: EventHandler) {
        self.subscribe(kind, SubscriptionMode::Once, handler);
    }

    fn set_stats(&mut self, stats: StatsHandle) {
        self.stats = Some(stats);
    }

    fn stats(&self) -> Option<&StatsHandle> {
        self.stats.as_ref()
    }
}
