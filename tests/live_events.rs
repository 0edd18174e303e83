mod common;

use std::time::Duration;

use axum::{
    body::BodyDataStream,
    extract::{Query, State},
    response::IntoResponse,
};
use common::{add_shop, add_user, place_order, test_state};
use delivery_marketplace_api::{
    dto::vendors::VendorStatusRequest,
    events::OrderEventKind,
    models::{OrderStatus, UserRole},
    routes::events::{EventStreamQuery, stream_events},
    services::vendor_service,
    state::AppState,
};
use tokio_stream::StreamExt;

async fn open_stream(state: &AppState, kind: Option<OrderEventKind>) -> BodyDataStream {
    stream_events(State(state.clone()), Query(EventStreamQuery { kind }))
        .await
        .into_response()
        .into_body()
        .into_data_stream()
}

async fn next_frame(stream: &mut BodyDataStream) -> anyhow::Result<String> {
    let chunk = tokio::time::timeout(Duration::from_secs(2), stream.next())
        .await?
        .ok_or_else(|| anyhow::anyhow!("stream ended"))??;
    Ok(String::from_utf8(chunk.to_vec())?)
}

#[tokio::test]
async fn subscribers_receive_named_order_events() -> anyhow::Result<()> {
    let state = test_state();
    let customer = add_user(&state, UserRole::Customer, "live@example.com");
    let shop = add_shop(&state, "livevendor@example.com");
    let mut stream = open_stream(&state, None).await;

    let order = place_order(&state, &customer, &shop, 1).await;
    let frame = next_frame(&mut stream).await?;
    assert!(frame.starts_with("event: order_created\n"), "{frame}");
    assert!(frame.contains(&order.id.to_string()));

    vendor_service::update_order_status(
        &state,
        VendorStatusRequest {
            order_id: order.id,
            vendor_id: Some(shop.vendor.id),
            status: OrderStatus::Accepted,
        },
    )
    .await?;
    let frame = next_frame(&mut stream).await?;
    assert!(frame.starts_with("event: order_updated\n"), "{frame}");
    assert!(frame.contains("\"status\":\"accepted\""));
    Ok(())
}

#[tokio::test]
async fn kind_filter_skips_other_events() -> anyhow::Result<()> {
    let state = test_state();
    let customer = add_user(&state, UserRole::Customer, "filter@example.com");
    let shop = add_shop(&state, "filtervendor@example.com");
    let first = place_order(&state, &customer, &shop, 1).await;
    let mut stream = open_stream(&state, Some(OrderEventKind::OrderCreated)).await;

    // published before the second order, but filtered out
    vendor_service::update_order_status(
        &state,
        VendorStatusRequest {
            order_id: first.id,
            vendor_id: Some(shop.vendor.id),
            status: OrderStatus::Accepted,
        },
    )
    .await?;
    let second = place_order(&state, &customer, &shop, 2).await;

    let frame = next_frame(&mut stream).await?;
    assert!(frame.starts_with("event: order_created\n"), "{frame}");
    assert!(frame.contains(&second.id.to_string()));
    assert!(!frame.contains(&first.id.to_string()));
    Ok(())
}

#[test]
fn event_names_match_the_wire_format() {
    let names: Vec<&str> = OrderEventKind::ALL.iter().map(OrderEventKind::as_str).collect();
    assert_eq!(
        names,
        ["order_created", "order_updated", "order_assigned", "order_delivered"]
    );
}
