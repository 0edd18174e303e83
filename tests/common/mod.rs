#![allow(dead_code)]

use chrono::Utc;
use delivery_marketplace_api::{
    config::AppConfig,
    db::Repository,
    dto::orders::{CreateOrderRequest, OrderItemInput},
    models::{
        DriverLocation, DriverPerformance, Order, OrderStatus, PaymentMethod, Product, Store,
        User, UserRole,
    },
    services::order_service,
    state::AppState,
};
use uuid::Uuid;

pub const CITY: &str = "Oran";

/// State without demo data; hashing seed passwords makes tests slow.
pub fn test_state() -> AppState {
    AppState::new(AppConfig {
        seed_demo_data: false,
        ..Default::default()
    })
    .expect("state")
}

pub fn add_user(state: &AppState, role: UserRole, email: &str) -> User {
    state
        .db
        .users
        .insert(User {
            id: Uuid::new_v4(),
            name: email.split('@').next().unwrap_or(email).to_string(),
            email: email.to_string(),
            phone: "0555000000".into(),
            role,
            created_at: Utc::now(),
            approval_status: None,
            license_number: None,
            shop_type: None,
            password_hash: None,
        })
        .expect("insert user")
}

pub struct Shop {
    pub vendor: User,
    pub store: Store,
    pub product: Product,
}

pub fn add_shop(state: &AppState, email: &str) -> Shop {
    let vendor = add_user(state, UserRole::Vendor, email);
    let store = state
        .db
        .stores
        .insert(Store {
            id: Uuid::new_v4(),
            vendor_id: vendor.id,
            name: format!("{} kitchen", vendor.name),
            kind: "restaurant".into(),
            rating: 4.0,
            delivery_time: "30 min".into(),
            address: "1 Rue Larbi Ben M'hidi".into(),
            city: CITY.into(),
        })
        .expect("insert store");
    let product = state
        .db
        .products
        .insert(Product {
            id: Uuid::new_v4(),
            store_id: store.id,
            name: "Couscous".into(),
            description: None,
            price: 800,
            rating: 4.5,
            available: true,
        })
        .expect("insert product");
    Shop {
        vendor,
        store,
        product,
    }
}

pub async fn place_order(state: &AppState, customer: &User, shop: &Shop, quantity: i32) -> Order {
    order_service::create_order(
        state,
        CreateOrderRequest {
            customer_id: customer.id,
            store_id: shop.store.id,
            items: vec![OrderItemInput {
                product_id: shop.product.id,
                quantity,
            }],
            delivery_fee: Some(200),
            payment_method: Some(PaymentMethod::Cash),
            delivery_address: "12 Boulevard de la Soummam".into(),
            city: CITY.into(),
            customer_phone: "0555111111".into(),
        },
    )
    .await
    .expect("create order")
    .data
    .expect("order data")
}

/// A ready, unclaimed order written straight into the store.
pub fn ready_order(state: &AppState, customer_id: Uuid, store_id: Uuid, city: &str) -> Order {
    let now = Utc::now();
    state
        .db
        .orders
        .insert(Order {
            id: Uuid::new_v4(),
            customer_id,
            store_id,
            driver_id: None,
            items: vec![],
            subtotal: 1000,
            delivery_fee: 200,
            total: 1200,
            status: OrderStatus::Ready,
            payment_method: PaymentMethod::Cash,
            delivery_address: "5 Rue Khemisti".into(),
            city: city.into(),
            customer_phone: "0555222222".into(),
            created_at: now,
            updated_at: now,
            accepted_at: Some(now),
            preparing_at: Some(now),
            ready_at: Some(now),
            assigned_at: None,
            delivered_at: None,
        })
        .expect("insert order")
}

pub fn place_driver(state: &AppState, driver_id: Uuid, latitude: f64, longitude: f64, rating: f64) {
    let now = Utc::now();
    state
        .db
        .driver_locations
        .insert(DriverLocation {
            driver_id,
            latitude,
            longitude,
            is_available: true,
            updated_at: now,
        })
        .expect("insert location");
    state
        .db
        .driver_performance
        .insert(DriverPerformance {
            driver_id,
            total_deliveries: 0,
            average_delivery_time: 0.0,
            on_time_percentage: 0.0,
            rating,
            earnings: 0,
            created_at: now,
            updated_at: now,
        })
        .expect("insert performance");
}
