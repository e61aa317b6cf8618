//! Channel-backed listeners for streaming transports.
//!
//! A streaming connection subscribes through [`ProgressHub::subscribe_channel`]
//! and reads events from the returned receiver. Dropping the
//! [`SubscriptionGuard`] (for example when the HTTP response stream is dropped
//! because the client went away) unsubscribes the listener.

use std::sync::Arc;

use futures_util::stream::{self, Stream};
use tokio::sync::mpsc::{self, error::TrySendError};

use super::progress_hub::{DeliveryError, HubEvent, ProgressHub, ProgressListener, Subscription};

/// Listener that forwards events into a bounded mpsc channel.
///
/// A full buffer counts as a failed delivery: the reader is too slow to keep
/// up and gets disconnected; on reconnect it resynchronizes from `init`.
#[derive(Debug)]
pub struct ChannelListener {
    sender: mpsc::Sender<HubEvent>,
}

impl ChannelListener {
    /// Creates a listener and its receiving end. A zero capacity is raised to 1.
    pub fn new(capacity: usize) -> (Self, mpsc::Receiver<HubEvent>) {
        let (sender, receiver) = mpsc::channel(capacity.max(1));
        (Self { sender }, receiver)
    }
}

impl ProgressListener for ChannelListener {
    fn deliver(&self, event: &HubEvent) -> Result<(), DeliveryError> {
        self.sender.try_send(event.clone()).map_err(|e| match e {
            TrySendError::Full(_) => DeliveryError::Full,
            TrySendError::Closed(_) => DeliveryError::Closed,
        })
    }

    fn is_closed(&self) -> bool {
        self.sender.is_closed()
    }
}

/// Unsubscribes from the hub when dropped.
#[derive(Debug)]
pub struct SubscriptionGuard {
    hub: Arc<ProgressHub>,
    subscription: Subscription,
}

impl SubscriptionGuard {
    pub fn new(hub: Arc<ProgressHub>, subscription: Subscription) -> Self {
        Self { hub, subscription }
    }

    pub fn subscription(&self) -> Subscription {
        self.subscription
    }
}

impl Drop for SubscriptionGuard {
    fn drop(&mut self) {
        self.hub.unsubscribe(&self.subscription);
    }
}

impl ProgressHub {
    /// Subscribes a [`ChannelListener`] with the given buffer size.
    ///
    /// The receiver already holds the `init` event when this returns.
    pub fn subscribe_channel(
        self: &Arc<Self>,
        capacity: usize,
    ) -> (SubscriptionGuard, mpsc::Receiver<HubEvent>) {
        let (listener, receiver) = ChannelListener::new(capacity);
        let subscription = self.subscribe(Arc::new(listener));
        (SubscriptionGuard::new(Arc::clone(self), subscription), receiver)
    }

    /// Subscribes and exposes the events as a stream.
    ///
    /// The stream ends when the hub drops the listener. Dropping the stream
    /// unsubscribes.
    pub fn event_stream(
        self: &Arc<Self>,
        capacity: usize,
    ) -> impl Stream<Item = HubEvent> + Send + 'static {
        let (guard, receiver) = self.subscribe_channel(capacity);
        stream::unfold((guard, receiver), |(guard, mut receiver)| async move {
            receiver
                .recv()
                .await
                .map(|event| (event, (guard, receiver)))
        })
    }
}
