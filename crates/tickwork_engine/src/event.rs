//! Named publish/subscribe channels.

use std::collections::HashMap;
use std::fmt;

/// Handle returned by [`EventBus::subscribe`], used to unsubscribe.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Callback<E> = Box<dyn FnMut(&E)>;

/// Synchronous event channels keyed by name.
///
/// Publishing invokes every subscriber of the channel immediately, in
/// subscription order.
pub struct EventBus<E> {
    channels: HashMap<String, Vec<(SubscriptionId, Callback<E>)>>,
    next_id: u64,
}

impl<E> Default for EventBus<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> fmt::Debug for EventBus<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let counts: HashMap<&str, usize> = self
            .channels
            .iter()
            .map(|(name, subs)| (name.as_str(), subs.len()))
            .collect();
        f.debug_struct("EventBus").field("channels", &counts).finish()
    }
}

impl<E> EventBus<E> {
    /// Creates a bus with no channels.
    #[must_use]
    pub fn new() -> Self {
        Self {
            channels: HashMap::new(),
            next_id: 0,
        }
    }

    /// Subscribes a callback to a channel.
    pub fn subscribe<F>(&mut self, channel: impl Into<String>, callback: F) -> SubscriptionId
    where
        F: FnMut(&E) + 'static,
    {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.channels
            .entry(channel.into())
            .or_default()
            .push((id, Box::new(callback)));
        id
    }

    /// Removes a subscription. Returns false if it was not subscribed to `channel`.
    pub fn unsubscribe(&mut self, channel: &str, id: SubscriptionId) -> bool {
        let Some(subs) = self.channels.get_mut(channel) else {
            return false;
        };
        let before = subs.len();
        subs.retain(|(sub, _)| *sub != id);
        before != subs.len()
    }

    /// Delivers `event` to every subscriber of `channel`.
    ///
    /// Returns the number of callbacks invoked; zero for unknown channels.
    pub fn publish(&mut self, channel: &str, event: &E) -> usize {
        let Some(subs) = self.channels.get_mut(channel) else {
            return 0;
        };
        for (_, callback) in subs.iter_mut() {
            callback(event);
        }
        subs.len()
    }

    /// Number of subscribers on a channel.
    #[must_use]
    pub fn subscriber_count(&self, channel: &str) -> usize {
        self.channels.get(channel).map_or(0, Vec::len)
    }
}
