//! Collision event subscriptions and the bounded queue drained once per tick
//!
//! A body only produces events while it is subscribed. Events are buffered
//! between the physics step and the frame loop's drain so listeners always
//! run in a fixed place inside the tick.

use std::collections::{HashSet, VecDeque};

use super::ContactImpact;
use crate::foundation::collections::BodyHandle;

/// A subscribed body started touching another body
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollisionEvent {
    /// The subscribed body receiving the event
    pub body: BodyHandle,
    /// The body it collided with
    pub other: BodyHandle,
    /// Relative approach speed along the contact normal
    pub impact_velocity: f32,
}

/// Per-body collision subscriptions plus a bounded FIFO of pending events
#[derive(Debug)]
pub struct CollisionEvents {
    subscriptions: HashSet<BodyHandle>,
    queue: VecDeque<CollisionEvent>,
    capacity: usize,
    dropped: u64,
}

impl CollisionEvents {
    /// Create a queue holding at most `capacity` undelivered events
    pub fn new(capacity: usize) -> Self {
        Self {
            subscriptions: HashSet::new(),
            queue: VecDeque::with_capacity(capacity),
            capacity: capacity.max(1),
            dropped: 0,
        }
    }

    /// Start delivering collision events for `body`
    pub fn subscribe(&mut self, body: BodyHandle) {
        self.subscriptions.insert(body);
    }

    /// Stop delivering events for `body` and discard any it still has queued.
    /// Returns whether the body was subscribed.
    pub fn unsubscribe(&mut self, body: BodyHandle) -> bool {
        self.queue.retain(|event| event.body != body);
        self.subscriptions.remove(&body)
    }

    /// Whether `body` is subscribed
    pub fn is_subscribed(&self, body: BodyHandle) -> bool {
        self.subscriptions.contains(&body)
    }

    /// Number of subscribed bodies
    pub fn subscription_count(&self) -> usize {
        self.subscriptions.len()
    }

    /// Turn contact starts into events for every subscribed participant
    pub fn post(&mut self, impacts: impl IntoIterator<Item = ContactImpact>) {
        for impact in impacts {
            if self.is_subscribed(impact.body_a) {
                self.push(CollisionEvent {
                    body: impact.body_a,
                    other: impact.body_b,
                    impact_velocity: impact.impact_velocity,
                });
            }
            if self.is_subscribed(impact.body_b) {
                self.push(CollisionEvent {
                    body: impact.body_b,
                    other: impact.body_a,
                    impact_velocity: impact.impact_velocity,
                });
            }
        }
    }

    fn push(&mut self, event: CollisionEvent) {
        if self.queue.len() == self.capacity {
            self.queue.pop_front();
            self.dropped += 1;
            log::warn!(
                "Collision event queue full ({} events), dropped oldest ({} dropped so far)",
                self.capacity,
                self.dropped
            );
        }
        self.queue.push_back(event);
    }

    /// Take every pending event in arrival order
    pub fn drain(&mut self) -> Vec<CollisionEvent> {
        self.queue.drain(..).collect()
    }

    /// Number of pending events
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// Events discarded because the queue was full
    pub fn dropped(&self) -> u64 {
        self.dropped
    }
}
