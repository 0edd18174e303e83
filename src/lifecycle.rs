//! Order status state machine.

use chrono::{DateTime, Utc};
use thiserror::Error;
use uuid::Uuid;

use crate::models::{Order, OrderStatus};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransitionError {
    #[error("Illegal status transition from {from} to {to}")]
    Illegal { from: OrderStatus, to: OrderStatus },

    #[error("Order must have a driver to become assigned")]
    MissingDriver,

    #[error("Order already assigned to a driver")]
    AlreadyAssigned,
}

impl OrderStatus {
    pub fn next_states(&self) -> &'static [OrderStatus] {
        use OrderStatus::*;
        match self {
            Pending => &[Accepted, Cancelled],
            Accepted => &[Preparing, Ready, Cancelled],
            Preparing => &[Ready, Cancelled],
            Ready => &[Assigned, Cancelled],
            Assigned => &[InDelivery, Delivered, Cancelled],
            InDelivery => &[Delivered],
            Delivered | Cancelled => &[],
        }
    }

    pub fn can_transition_to(&self, next: OrderStatus) -> bool {
        self.next_states().contains(&next)
    }

    pub fn is_terminal(&self) -> bool {
        self.next_states().is_empty()
    }
}

/// Move `order` to `next`, stamping `updated_at` and the milestone for `next`.
///
/// The order is left untouched when the transition is rejected.
pub fn update_status(
    order: &mut Order,
    next: OrderStatus,
    driver_id: Option<Uuid>,
    now: DateTime<Utc>,
) -> Result<(), TransitionError> {
    let from = order.status;
    if !from.can_transition_to(next) {
        return Err(TransitionError::Illegal { from, to: next });
    }
    if next == OrderStatus::Assigned && driver_id.or(order.driver_id).is_none() {
        return Err(TransitionError::MissingDriver);
    }

    let now = now.max(order.updated_at);
    order.status = next;
    order.updated_at = now;

    match next {
        OrderStatus::Accepted => order.accepted_at = Some(now),
        OrderStatus::Preparing => order.preparing_at = Some(now),
        OrderStatus::Ready => order.ready_at = Some(now),
        OrderStatus::Assigned => {
            order.assigned_at = Some(now);
            if let Some(driver_id) = driver_id {
                order.driver_id = Some(driver_id);
            }
        }
        OrderStatus::Delivered => order.delivered_at = Some(now),
        OrderStatus::Pending | OrderStatus::InDelivery | OrderStatus::Cancelled => {}
    }

    Ok(())
}

/// Hand a ready, unclaimed order to `driver_id`.
pub fn assign_driver(
    order: &mut Order,
    driver_id: Uuid,
    now: DateTime<Utc>,
) -> Result<(), TransitionError> {
    if order.driver_id.is_some() {
        return Err(TransitionError::AlreadyAssigned);
    }
    update_status(order, OrderStatus::Assigned, Some(driver_id), now)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PaymentMethod;
    use chrono::Duration;

    fn order(status: OrderStatus) -> Order {
        let now = Utc::now();
        Order {
            id: Uuid::new_v4(),
            customer_id: Uuid::new_v4(),
            store_id: Uuid::new_v4(),
            driver_id: None,
            items: vec![],
            subtotal: 0,
            delivery_fee: 0,
            total: 0,
            status,
            payment_method: PaymentMethod::Cash,
            delivery_address: "1 Main St".into(),
            city: "Alger".into(),
            customer_phone: "+213000".into(),
            created_at: now,
            updated_at: now,
            accepted_at: None,
            preparing_at: None,
            ready_at: None,
            assigned_at: None,
            delivered_at: None,
        }
    }

    #[test]
    fn pending_cannot_jump_to_delivered() {
        let mut o = order(OrderStatus::Pending);
        let before = o.updated_at;
        let err = update_status(&mut o, OrderStatus::Delivered, None, Utc::now()).unwrap_err();
        assert_eq!(
            err,
            TransitionError::Illegal {
                from: OrderStatus::Pending,
                to: OrderStatus::Delivered
            }
        );
        assert_eq!(o.status, OrderStatus::Pending);
        assert_eq!(o.updated_at, before);
        assert!(o.delivered_at.is_none());
    }

    #[test]
    fn milestones_follow_the_happy_path() {
        let mut o = order(OrderStatus::Pending);
        let t = Utc::now();
        update_status(&mut o, OrderStatus::Accepted, None, t).unwrap();
        assert_eq!(o.accepted_at, Some(t));
        update_status(&mut o, OrderStatus::Preparing, None, t).unwrap();
        assert!(o.preparing_at.is_some());
        update_status(&mut o, OrderStatus::Ready, None, t).unwrap();
        assert!(o.ready_at.is_some());
        assign_driver(&mut o, Uuid::new_v4(), t).unwrap();
        assert!(o.assigned_at.is_some());
        update_status(&mut o, OrderStatus::InDelivery, None, t).unwrap();
        update_status(&mut o, OrderStatus::Delivered, None, t).unwrap();
        assert!(o.delivered_at.is_some());
        assert!(o.status.is_terminal());
    }

    #[test]
    fn updated_at_never_moves_backwards() {
        let mut o = order(OrderStatus::Pending);
        let later = o.updated_at + Duration::seconds(30);
        o.updated_at = later;
        update_status(&mut o, OrderStatus::Accepted, None, later - Duration::seconds(10)).unwrap();
        assert_eq!(o.updated_at, later);
    }

    #[test]
    fn cancel_stamps_no_milestone() {
        let mut o = order(OrderStatus::Accepted);
        update_status(&mut o, OrderStatus::Cancelled, None, Utc::now()).unwrap();
        assert_eq!(o.status, OrderStatus::Cancelled);
        assert!(o.delivered_at.is_none());
        assert!(update_status(&mut o, OrderStatus::Ready, None, Utc::now()).is_err());
    }

    #[test]
    fn assignment_requires_a_driver_and_a_free_order() {
        let mut o = order(OrderStatus::Ready);
        assert_eq!(
            update_status(&mut o, OrderStatus::Assigned, None, Utc::now()),
            Err(TransitionError::MissingDriver)
        );

        let driver = Uuid::new_v4();
        assign_driver(&mut o, driver, Utc::now()).unwrap();
        assert_eq!(o.status, OrderStatus::Assigned);
        assert_eq!(o.driver_id, Some(driver));

        assert_eq!(
            assign_driver(&mut o, Uuid::new_v4(), Utc::now()),
            Err(TransitionError::AlreadyAssigned)
        );
        assert_eq!(o.driver_id, Some(driver));
    }
}
