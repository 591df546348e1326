// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Sensor fan-in with a cancellable subscription.
//!
//! Devices push readings into the hub. At most one subscriber (the active
//! tracking session) receives them through a bounded channel; readings
//! published while nobody is subscribed are dropped.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;

use crate::models::{AccelerationSample, LocationFix};

/// A reading delivered to the subscriber.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SensorEvent {
    Acceleration(AccelerationSample),
    Location(LocationFix),
}

/// Outcome of publishing one reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    Delivered,
    NoSubscriber,
    BufferFull,
}

struct ActiveSubscriber {
    id: u64,
    tx: mpsc::Sender<SensorEvent>,
}

/// Shared sensor hub. Cheap to clone.
#[derive(Clone)]
pub struct SensorHub {
    buffer: usize,
    next_id: Arc<AtomicU64>,
    active: Arc<Mutex<Option<ActiveSubscriber>>>,
}

impl SensorHub {
    /// Create a hub whose subscriptions buffer up to `buffer` readings.
    pub fn new(buffer: usize) -> Self {
        Self {
            buffer: buffer.max(1),
            next_id: Arc::new(AtomicU64::new(1)),
            active: Arc::new(Mutex::new(None)),
        }
    }

    /// Start receiving readings. Replaces any existing subscription.
    pub fn subscribe(&self) -> SensorSubscription {
        let (tx, rx) = mpsc::channel(self.buffer);
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);

        let mut active = self.active.lock().unwrap_or_else(|e| e.into_inner());
        if active.replace(ActiveSubscriber { id, tx }).is_some() {
            tracing::warn!("Replacing existing sensor subscription");
        }

        SensorSubscription {
            id,
            rx,
            hub: self.clone(),
            detached: false,
        }
    }

    /// Forward a reading to the active subscriber, if any.
    pub fn publish(&self, event: SensorEvent) -> Delivery {
        let active = self.active.lock().unwrap_or_else(|e| e.into_inner());
        let Some(subscriber) = active.as_ref() else {
            return Delivery::NoSubscriber;
        };

        match subscriber.tx.try_send(event) {
            Ok(()) => Delivery::Delivered,
            Err(mpsc::error::TrySendError::Full(_)) => {
                tracing::warn!("Sensor buffer full, dropping reading");
                Delivery::BufferFull
            }
            Err(mpsc::error::TrySendError::Closed(_)) => Delivery::NoSubscriber,
        }
    }

    /// Whether a subscription is currently active.
    pub fn has_subscriber(&self) -> bool {
        self.active
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .is_some()
    }

    fn detach(&self, id: u64) {
        let mut active = self.active.lock().unwrap_or_else(|e| e.into_inner());
        if active.as_ref().is_some_and(|s| s.id == id) {
            *active = None;
        }
    }
}

/// Receiving end of a sensor subscription.
///
/// Dropping the subscription unsubscribes it.
pub struct SensorSubscription {
    id: u64,
    rx: mpsc::Receiver<SensorEvent>,
    hub: SensorHub,
    detached: bool,
}

impl SensorSubscription {
    /// Wait for the next reading. Returns `None` once detached and drained,
    /// or when replaced by a newer subscription.
    pub async fn recv(&mut self) -> Option<SensorEvent> {
        self.rx.recv().await
    }

    /// Take a reading that is already queued, without waiting.
    pub fn try_recv(&mut self) -> Option<SensorEvent> {
        self.rx.try_recv().ok()
    }

    /// Stop receiving new readings. Already queued readings stay readable.
    pub fn unsubscribe(&mut self) {
        if !self.detached {
            self.hub.detach(self.id);
            self.detached = true;
        }
    }
}

impl Drop for SensorSubscription {
    fn drop(&mut self) {
        self.unsubscribe();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn accel(ts: u64) -> SensorEvent {
        SensorEvent::Acceleration(AccelerationSample::new(ts, 0.0, 0.0, 9.8))
    }

    #[tokio::test]
    async fn test_publish_without_subscriber() {
        let hub = SensorHub::new(8);
        assert_eq!(hub.publish(accel(0)), Delivery::NoSubscriber);
    }

    #[tokio::test]
    async fn test_subscribe_and_receive_in_order() {
        let hub = SensorHub::new(8);
        let mut sub = hub.subscribe();

        assert_eq!(hub.publish(accel(1)), Delivery::Delivered);
        assert_eq!(hub.publish(accel(2)), Delivery::Delivered);

        assert_eq!(sub.recv().await, Some(accel(1)));
        assert_eq!(sub.try_recv(), Some(accel(2)));
        assert_eq!(sub.try_recv(), None);
    }

    #[tokio::test]
    async fn test_unsubscribe_stops_delivery() {
        let hub = SensorHub::new(8);
        let mut sub = hub.subscribe();
        hub.publish(accel(1));

        sub.unsubscribe();
        assert!(!hub.has_subscriber());
        assert_eq!(hub.publish(accel(2)), Delivery::NoSubscriber);

        // Queued reading still drains, then the channel reports closed
        assert_eq!(sub.recv().await, Some(accel(1)));
        assert_eq!(sub.recv().await, None);
    }

    #[tokio::test]
    async fn test_drop_unsubscribes() {
        let hub = SensorHub::new(8);
        {
            let _sub = hub.subscribe();
            assert!(hub.has_subscriber());
        }
        assert!(!hub.has_subscriber());
    }

    #[tokio::test]
    async fn test_stale_subscription_does_not_detach_newer() {
        let hub = SensorHub::new(8);
        let mut old = hub.subscribe();
        let mut new = hub.subscribe();

        old.unsubscribe();
        assert!(hub.has_subscriber());
        assert_eq!(hub.publish(accel(7)), Delivery::Delivered);
        assert_eq!(new.try_recv(), Some(accel(7)));
    }

    #[tokio::test]
    async fn test_full_buffer_drops() {
        let hub = SensorHub::new(1);
        let _sub = hub.subscribe();
        assert_eq!(hub.publish(accel(1)), Delivery::Delivered);
        assert_eq!(hub.publish(accel(2)), Delivery::BufferFull);
    }
}
