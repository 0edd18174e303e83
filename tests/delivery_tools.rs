mod common;

use common::{CITY, add_shop, add_user, place_driver, place_order, ready_order, test_state};
use delivery_marketplace_api::{
    db::Repository,
    dispatch::KM_PER_DEGREE,
    dto::{
        catalog::UpdateAvailabilityRequest,
        delivery::{
            CreateZoneRequest, DriverFilter, OptimizeRouteRequest, PredictionRequest,
            RecordPerformanceRequest, ZoneQuery,
        },
        drivers::{LocationUpdateRequest, NearbyQuery},
    },
    models::{Coordinate, UserRole},
    services::{catalog_service, delivery_service, driver_service},
};
use uuid::Uuid;

const ORIGIN: (f64, f64) = (35.6971, -0.6308);

#[tokio::test]
async fn route_visits_stops_by_delivery_address() -> anyhow::Result<()> {
    let state = test_state();
    let customer = add_user(&state, UserRole::Customer, "c@example.com");
    let shop = add_shop(&state, "v@example.com");
    let driver = add_user(&state, UserRole::Driver, "d@example.com");

    let mut ids = Vec::new();
    for address in ["9 Rue Zabana", "1 Avenue Loubet", "4 Place du 1er Novembre"] {
        let order = ready_order(&state, customer.id, shop.store.id, CITY);
        state.db.orders.update(&order.id, |o| {
            o.delivery_address = address.into();
            Ok(())
        })?;
        ids.push(order.id);
    }
    // unknown ids are skipped rather than failing the route
    let mut requested = ids.clone();
    requested.push(Uuid::new_v4());

    let route = delivery_service::optimize_route(
        &state,
        OptimizeRouteRequest {
            driver_id: driver.id,
            order_ids: requested,
        },
    )
    .await?
    .data
    .expect("route");

    assert_eq!(route.deliveries, ids);
    assert_eq!(route.optimized_sequence, vec![ids[1], ids[2], ids[0]]);
    assert_eq!(route.driver_id, driver.id);

    let stored = delivery_service::list_routes(
        &state,
        DriverFilter {
            driver_id: Some(driver.id),
        },
    )
    .await?
    .data
    .expect("routes");
    assert_eq!(stored.items.len(), 1);
    Ok(())
}

#[tokio::test]
async fn route_needs_at_least_one_known_order() {
    let state = test_state();
    let driver = Uuid::new_v4();

    let empty = delivery_service::optimize_route(
        &state,
        OptimizeRouteRequest {
            driver_id: driver,
            order_ids: vec![],
        },
    )
    .await
    .expect_err("no orders");
    assert_eq!(empty.status().as_u16(), 400);

    let unknown = delivery_service::optimize_route(
        &state,
        OptimizeRouteRequest {
            driver_id: driver,
            order_ids: vec![Uuid::new_v4(), Uuid::new_v4()],
        },
    )
    .await
    .expect_err("nothing found");
    assert_eq!(unknown.status().as_u16(), 404);
}

#[tokio::test]
async fn nearby_lists_only_available_drivers_inside_the_radius() -> anyhow::Result<()> {
    let state = test_state();
    let close = add_user(&state, UserRole::Driver, "close@example.com");
    let resting = add_user(&state, UserRole::Driver, "resting@example.com");
    let distant = add_user(&state, UserRole::Driver, "distant@example.com");
    place_driver(&state, close.id, ORIGIN.0 + 1.0 / KM_PER_DEGREE, ORIGIN.1, 4.0);
    place_driver(&state, distant.id, ORIGIN.0 + 8.0 / KM_PER_DEGREE, ORIGIN.1, 4.0);
    driver_service::update_location(
        &state,
        LocationUpdateRequest {
            driver_id: resting.id,
            latitude: ORIGIN.0,
            longitude: ORIGIN.1,
            is_available: Some(false),
        },
    )
    .await?;

    let within_default = driver_service::nearby_drivers(
        &state,
        NearbyQuery {
            lat: ORIGIN.0,
            lng: ORIGIN.1,
            radius: None,
        },
    )
    .await?
    .data
    .expect("drivers");
    assert_eq!(within_default.len(), 1);
    assert_eq!(within_default[0].driver_id, close.id);
    assert!((within_default[0].distance_km - 1.0).abs() < 1e-6);

    let wider = driver_service::nearby_drivers(
        &state,
        NearbyQuery {
            lat: ORIGIN.0,
            lng: ORIGIN.1,
            radius: Some(10.0),
        },
    )
    .await?
    .data
    .expect("drivers");
    let found: Vec<Uuid> = wider.iter().map(|d| d.driver_id).collect();
    assert_eq!(found, vec![close.id, distant.id]);
    Ok(())
}

#[tokio::test]
async fn location_updates_check_range_and_role() -> anyhow::Result<()> {
    let state = test_state();
    let driver = add_user(&state, UserRole::Driver, "d@example.com");
    let customer = add_user(&state, UserRole::Customer, "c@example.com");

    let err = driver_service::update_location(
        &state,
        LocationUpdateRequest {
            driver_id: driver.id,
            latitude: 91.0,
            longitude: 0.0,
            is_available: None,
        },
    )
    .await
    .expect_err("latitude out of range");
    assert_eq!(err.status().as_u16(), 400);

    let err = driver_service::update_location(
        &state,
        LocationUpdateRequest {
            driver_id: customer.id,
            latitude: ORIGIN.0,
            longitude: ORIGIN.1,
            is_available: None,
        },
    )
    .await
    .expect_err("not a driver");
    assert_eq!(err.status().as_u16(), 403);
    assert_eq!(state.db.driver_locations.count()?, 0);
    Ok(())
}

#[tokio::test]
async fn zone_estimate_feeds_the_prediction() -> anyhow::Result<()> {
    let state = test_state();
    let customer = add_user(&state, UserRole::Customer, "c@example.com");
    let shop = add_shop(&state, "v@example.com");

    let zone = delivery_service::create_zone(
        &state,
        CreateZoneRequest {
            name: "Centre".into(),
            city: CITY.into(),
            coordinates: vec![Coordinate {
                latitude: ORIGIN.0,
                longitude: ORIGIN.1,
            }],
            delivery_fee: 250,
            estimated_time: Some(40),
        },
    )
    .await?
    .data
    .expect("zone");
    assert_eq!(zone.active_drivers, 0);

    let elsewhere = delivery_service::list_zones(
        &state,
        ZoneQuery {
            city: Some("Alger".into()),
        },
    )
    .await?
    .data
    .expect("zones");
    assert!(elsewhere.is_empty());

    let order = place_order(&state, &customer, &shop, 1).await;
    let prediction = delivery_service::predict_delivery(&state, PredictionRequest { order_id: order.id })
        .await?
        .data
        .expect("prediction");
    assert_eq!(prediction.estimated_pickup_time, 15);
    assert_eq!(prediction.estimated_delivery_time, 40);
    assert!((prediction.confidence - 0.75).abs() < 1e-9);
    assert!(prediction.factors.contains(&format!("Store: {}", shop.store.name)));

    let missing = delivery_service::predict_delivery(
        &state,
        PredictionRequest {
            order_id: Uuid::new_v4(),
        },
    )
    .await
    .expect_err("no such order");
    assert_eq!(missing.status().as_u16(), 404);
    Ok(())
}

#[tokio::test]
async fn zone_fee_cannot_be_negative() {
    let state = test_state();
    let err = delivery_service::create_zone(
        &state,
        CreateZoneRequest {
            name: "Port".into(),
            city: CITY.into(),
            coordinates: vec![Coordinate {
                latitude: ORIGIN.0,
                longitude: ORIGIN.1,
            }],
            delivery_fee: -1,
            estimated_time: None,
        },
    )
    .await
    .expect_err("negative fee");
    assert_eq!(err.status().as_u16(), 400);
}

#[tokio::test]
async fn recorded_performance_keeps_its_creation_time() -> anyhow::Result<()> {
    let state = test_state();
    let driver = Uuid::new_v4();
    let request = |rating| RecordPerformanceRequest {
        driver_id: driver,
        total_deliveries: Some(12),
        average_delivery_time: Some(24.5),
        on_time_percentage: Some(91.0),
        rating: Some(rating),
        earnings: Some(2400),
    };

    let first = delivery_service::record_performance(&state, request(4.2))
        .await?
        .data
        .expect("performance");
    let second = delivery_service::record_performance(&state, request(4.6))
        .await?
        .data
        .expect("performance");
    assert_eq!(second.created_at, first.created_at);
    assert_eq!(second.rating, 4.6);

    let err = delivery_service::record_performance(&state, request(5.5))
        .await
        .expect_err("rating above five");
    assert_eq!(err.status().as_u16(), 400);

    let listed = delivery_service::driver_performance(
        &state,
        DriverFilter {
            driver_id: Some(driver),
        },
    )
    .await?
    .data
    .expect("performance");
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].total_deliveries, 12);
    Ok(())
}

#[tokio::test]
async fn availability_toggle_sticks_and_needs_a_product() -> anyhow::Result<()> {
    let state = test_state();
    let shop = add_shop(&state, "v@example.com");

    let product = catalog_service::update_availability(
        &state,
        UpdateAvailabilityRequest {
            product_id: shop.product.id,
            available: false,
        },
    )
    .await?
    .data
    .expect("product");
    assert!(!product.available);
    assert!(!state.db.products.get(&shop.product.id)?.expect("product").available);

    let missing = catalog_service::update_availability(
        &state,
        UpdateAvailabilityRequest {
            product_id: Uuid::new_v4(),
            available: true,
        },
    )
    .await
    .expect_err("no such product");
    assert_eq!(missing.status().as_u16(), 404);
    Ok(())
}
