//! In-process order event notifier.
//!
//! Publishing is synchronous: every handler registered for the event's kind
//! runs on the caller's thread, in registration order, before `publish`
//! returns. Delivery is at most once. An event published while nobody is
//! subscribed is gone; late subscribers never see it.

use std::{
    collections::HashMap,
    panic::{AssertUnwindSafe, catch_unwind},
    sync::{Arc, PoisonError, RwLock},
};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::Order;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum OrderEventKind {
    OrderCreated,
    OrderUpdated,
    OrderAssigned,
    OrderDelivered,
}

impl OrderEventKind {
    pub const ALL: [OrderEventKind; 4] = [
        OrderEventKind::OrderCreated,
        OrderEventKind::OrderUpdated,
        OrderEventKind::OrderAssigned,
        OrderEventKind::OrderDelivered,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            OrderEventKind::OrderCreated => "order_created",
            OrderEventKind::OrderUpdated => "order_updated",
            OrderEventKind::OrderAssigned => "order_assigned",
            OrderEventKind::OrderDelivered => "order_delivered",
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct OrderEvent {
    pub kind: OrderEventKind,
    pub order: Order,
    pub driver_id: Option<Uuid>,
    pub timestamp: DateTime<Utc>,
}

impl OrderEvent {
    pub fn new(kind: OrderEventKind, order: Order) -> Self {
        Self {
            kind,
            driver_id: order.driver_id,
            order,
            timestamp: Utc::now(),
        }
    }
}

pub type SubscriptionId = u64;

type Handler = Arc<dyn Fn(&OrderEvent) -> anyhow::Result<()> + Send + Sync>;

#[derive(Default)]
struct Subscribers {
    next_id: SubscriptionId,
    by_kind: HashMap<OrderEventKind, Vec<(SubscriptionId, Handler)>>,
}

/// Cheap to clone; clones share the same subscriber table.
#[derive(Clone, Default)]
pub struct EventNotifier {
    inner: Arc<RwLock<Subscribers>>,
}

impl EventNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe<F>(&self, kind: OrderEventKind, handler: F) -> SubscriptionId
    where
        F: Fn(&OrderEvent) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        let mut subs = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        subs.next_id += 1;
        let id = subs.next_id;
        subs.by_kind
            .entry(kind)
            .or_default()
            .push((id, Arc::new(handler)));
        tracing::debug!(kind = kind.as_str(), subscription = id, "subscriber added");
        id
    }

    /// Register the same handler for every event kind.
    pub fn subscribe_all<F>(&self, handler: F) -> Vec<SubscriptionId>
    where
        F: Fn(&OrderEvent) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        let handler: Handler = Arc::new(handler);
        OrderEventKind::ALL
            .iter()
            .map(|kind| {
                let handler = Arc::clone(&handler);
                self.subscribe(*kind, move |event| handler(event))
            })
            .collect()
    }

    /// Returns `false` when no such subscription exists.
    pub fn unsubscribe(&self, kind: OrderEventKind, id: SubscriptionId) -> bool {
        let mut subs = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        let Some(handlers) = subs.by_kind.get_mut(&kind) else {
            return false;
        };
        let before = handlers.len();
        handlers.retain(|(sub_id, _)| *sub_id != id);
        before != handlers.len()
    }

    /// Drop the subscribers of one kind, or of every kind when `kind` is `None`.
    pub fn clear(&self, kind: Option<OrderEventKind>) {
        let mut subs = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        match kind {
            Some(kind) => {
                subs.by_kind.remove(&kind);
            }
            None => subs.by_kind.clear(),
        }
    }

    pub fn subscriber_count(&self, kind: OrderEventKind) -> usize {
        let subs = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        subs.by_kind.get(&kind).map_or(0, Vec::len)
    }

    /// Run every current subscriber of `event.kind`; returns how many succeeded.
    ///
    /// A handler that errors or panics is logged and skipped.
    pub fn publish(&self, event: &OrderEvent) -> usize {
        // Snapshot so handlers can subscribe or unsubscribe without deadlocking.
        let handlers: Vec<(SubscriptionId, Handler)> = {
            let subs = self.inner.read().unwrap_or_else(PoisonError::into_inner);
            subs.by_kind.get(&event.kind).cloned().unwrap_or_default()
        };

        let mut delivered = 0;
        for (id, handler) in handlers {
            match catch_unwind(AssertUnwindSafe(|| handler(event))) {
                Ok(Ok(())) => delivered += 1,
                Ok(Err(err)) => tracing::warn!(
                    kind = event.kind.as_str(),
                    subscription = id,
                    error = %err,
                    "event handler failed"
                ),
                Err(_) => tracing::warn!(
                    kind = event.kind.as_str(),
                    subscription = id,
                    "event handler panicked"
                ),
            }
        }

        tracing::debug!(
            kind = event.kind.as_str(),
            order_id = %event.order.id,
            delivered,
            "event published"
        );
        delivered
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{
        Mutex,
        atomic::{AtomicUsize, Ordering},
    };

    use super::*;
    use crate::models::{OrderStatus, PaymentMethod};

    fn event(kind: OrderEventKind) -> OrderEvent {
        let now = Utc::now();
        OrderEvent::new(
            kind,
            Order {
                id: Uuid::new_v4(),
                customer_id: Uuid::new_v4(),
                store_id: Uuid::new_v4(),
                driver_id: None,
                items: vec![],
                subtotal: 0,
                delivery_fee: 0,
                total: 0,
                status: OrderStatus::Pending,
                payment_method: PaymentMethod::Cash,
                delivery_address: "a".into(),
                city: "Oran".into(),
                customer_phone: "0".into(),
                created_at: now,
                updated_at: now,
                accepted_at: None,
                preparing_at: None,
                ready_at: None,
                assigned_at: None,
                delivered_at: None,
            },
        )
    }

    #[test]
    fn handlers_run_in_registration_order() {
        let notifier = EventNotifier::new();
        let seen = Arc::new(Mutex::new(Vec::new()));
        for n in 0..3 {
            let seen = Arc::clone(&seen);
            notifier.subscribe(OrderEventKind::OrderCreated, move |_| {
                seen.lock().unwrap().push(n);
                Ok(())
            });
        }

        assert_eq!(notifier.publish(&event(OrderEventKind::OrderCreated)), 3);
        assert_eq!(*seen.lock().unwrap(), vec![0, 1, 2]);
    }

    #[test]
    fn failing_and_panicking_handlers_do_not_block_others() {
        let notifier = EventNotifier::new();
        let hits = Arc::new(AtomicUsize::new(0));

        notifier.subscribe(OrderEventKind::OrderUpdated, |_| anyhow::bail!("boom"));
        notifier.subscribe(OrderEventKind::OrderUpdated, |_| panic!("handler panic"));
        let counter = Arc::clone(&hits);
        notifier.subscribe(OrderEventKind::OrderUpdated, move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(())
        });

        assert_eq!(notifier.publish(&event(OrderEventKind::OrderUpdated)), 1);
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn late_subscribers_miss_earlier_events() {
        let notifier = EventNotifier::new();
        assert_eq!(notifier.publish(&event(OrderEventKind::OrderAssigned)), 0);

        let hits = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&hits);
        notifier.subscribe(OrderEventKind::OrderAssigned, move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(())
        });
        assert_eq!(hits.load(Ordering::SeqCst), 0);

        notifier.publish(&event(OrderEventKind::OrderAssigned));
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn unsubscribe_and_clear() {
        let notifier = EventNotifier::new();
        let id = notifier.subscribe(OrderEventKind::OrderDelivered, |_| Ok(()));
        notifier.subscribe(OrderEventKind::OrderDelivered, |_| Ok(()));
        notifier.subscribe_all(|_| Ok(()));

        assert!(notifier.unsubscribe(OrderEventKind::OrderDelivered, id));
        assert!(!notifier.unsubscribe(OrderEventKind::OrderDelivered, id));
        assert_eq!(notifier.subscriber_count(OrderEventKind::OrderDelivered), 2);

        notifier.clear(Some(OrderEventKind::OrderDelivered));
        assert_eq!(notifier.subscriber_count(OrderEventKind::OrderDelivered), 0);
        assert_eq!(notifier.subscriber_count(OrderEventKind::OrderCreated), 1);

        notifier.clear(None);
        assert_eq!(notifier.publish(&event(OrderEventKind::OrderCreated)), 0);
    }

    #[test]
    fn other_kinds_are_not_invoked() {
        let notifier = EventNotifier::new();
        notifier.subscribe(OrderEventKind::OrderCreated, |_| Ok(()));
        assert_eq!(notifier.publish(&event(OrderEventKind::OrderDelivered)), 0);
    }
}
