use uuid::Uuid;

use crate::{
    db::{Database, Repository},
    dto::notifications::NotificationList,
    error::{AppError, AppResult},
    events::{OrderEvent, OrderEventKind},
    models::Notification,
    response::{ApiResponse, Meta},
    state::AppState,
};

fn push(db: &Database, user_id: Uuid, event: &OrderEvent, title: &str, message: String) -> AppResult<()> {
    db.notifications.insert(Notification {
        id: Uuid::new_v4(),
        user_id,
        kind: event.kind.as_str().to_string(),
        title: title.to_string(),
        message,
        order_id: Some(event.order.id),
        is_read: false,
        created_at: event.timestamp,
    })?;
    Ok(())
}

/// Turn an order event into inbox entries for the parties involved.
///
/// New orders go to the store's vendor; every later change goes to the
/// customer, and assignments also go to the driver.
pub fn notify_order_event(db: &Database, event: &OrderEvent) -> AppResult<()> {
    let order = &event.order;
    match event.kind {
        OrderEventKind::OrderCreated => {
            if let Some(store) = db.stores.get(&order.store_id)? {
                push(
                    db,
                    store.vendor_id,
                    event,
                    "New order",
                    format!("Order {} was placed at {}", order.id, store.name),
                )?;
            }
        }
        OrderEventKind::OrderUpdated => {
            push(
                db,
                order.customer_id,
                event,
                "Order updated",
                format!("Your order is now {}", order.status),
            )?;
        }
        OrderEventKind::OrderAssigned => {
            push(
                db,
                order.customer_id,
                event,
                "Driver assigned",
                "A driver is on the way to pick up your order".to_string(),
            )?;
            if let Some(driver_id) = event.driver_id {
                push(
                    db,
                    driver_id,
                    event,
                    "New delivery",
                    format!("Deliver order {} to {}", order.id, order.delivery_address),
                )?;
            }
        }
        OrderEventKind::OrderDelivered => {
            push(
                db,
                order.customer_id,
                event,
                "Order delivered",
                "Your order has been delivered".to_string(),
            )?;
        }
    }
    Ok(())
}

pub async fn list_notifications(
    state: &AppState,
    user_id: Uuid,
) -> AppResult<ApiResponse<NotificationList>> {
    let mut items = state.db.notifications.filter(|n| n.user_id == user_id)?;
    items.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    let unread = items.iter().filter(|n| !n.is_read).count();
    let meta = Meta::total(items.len());
    Ok(ApiResponse::success(
        "Notifications",
        NotificationList { items, unread },
        Some(meta),
    ))
}

pub async fn mark_read(state: &AppState, id: Uuid) -> AppResult<ApiResponse<Notification>> {
    let notification = state
        .db
        .notifications
        .update(&id, |n| {
            n.is_read = true;
            Ok(n.clone())
        })?
        .ok_or_else(|| AppError::not_found("Notification"))?;
    Ok(ApiResponse::success(
        "Notification marked as read",
        notification,
        Some(Meta::empty()),
    ))
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::models::{Order, OrderStatus, PaymentMethod, Store};

    fn order(store_id: Uuid, status: OrderStatus, driver_id: Option<Uuid>) -> Order {
        let now = Utc::now();
        Order {
            id: Uuid::new_v4(),
            customer_id: Uuid::new_v4(),
            store_id,
            driver_id,
            items: Vec::new(),
            subtotal: 1000,
            delivery_fee: 200,
            total: 1200,
            status,
            payment_method: PaymentMethod::Cash,
            delivery_address: "1 Rue Didouche".into(),
            city: "Alger".into(),
            customer_phone: "0555".into(),
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
    fn created_order_notifies_vendor() {
        let db = Database::new();
        let vendor_id = Uuid::new_v4();
        let store = db
            .stores
            .insert(Store {
                id: Uuid::new_v4(),
                vendor_id,
                name: "Napoli".into(),
                kind: "restaurant".into(),
                rating: 4.5,
                delivery_time: "30 min".into(),
                address: "Hydra".into(),
                city: "Alger".into(),
            })
            .unwrap();

        let event = OrderEvent::new(
            OrderEventKind::OrderCreated,
            order(store.id, OrderStatus::Pending, None),
        );
        notify_order_event(&db, &event).unwrap();

        let inbox = db.notifications.filter(|n| n.user_id == vendor_id).unwrap();
        assert_eq!(inbox.len(), 1);
        assert_eq!(inbox[0].kind, "order_created");
    }

    #[test]
    fn assignment_notifies_customer_and_driver() {
        let db = Database::new();
        let driver_id = Uuid::new_v4();
        let order = order(Uuid::new_v4(), OrderStatus::Assigned, Some(driver_id));
        let customer_id = order.customer_id;

        notify_order_event(&db, &OrderEvent::new(OrderEventKind::OrderAssigned, order)).unwrap();

        assert_eq!(db.notifications.filter(|n| n.user_id == customer_id).unwrap().len(), 1);
        assert_eq!(db.notifications.filter(|n| n.user_id == driver_id).unwrap().len(), 1);
    }
}
