//! Demo data loaded at startup when `SEED_DEMO_DATA` is on.

use chrono::Utc;
use uuid::Uuid;

use super::{Database, Repository};
use crate::{
    error::AppResult,
    models::{
        ApprovalStatus, Coordinate, DeliveryZone, DriverLocation, DriverPerformance,
        LoyaltyReward, Product, RewardType, Store, User, UserRole,
    },
    services::auth_service::hash_password,
};

pub const DEMO_CITY: &str = "Alger";
pub const DEMO_CENTER: Coordinate = Coordinate {
    latitude: 36.7538,
    longitude: 3.0588,
};

pub fn seed_demo_data(db: &Database) -> AppResult<()> {
    let now = Utc::now();

    ensure_user(db, "Platform Admin", "admin@example.com", "admin123", UserRole::Admin, None)?;
    let vendor_taj = ensure_user(
        db,
        "Le Taj Mahal Owner",
        "vendor1@tajmahal.dz",
        "vendor123",
        UserRole::Vendor,
        Some("restaurant"),
    )?;
    let vendor_napoli = ensure_user(
        db,
        "Pizza Napoli Owner",
        "vendor2@napoli.dz",
        "vendor123",
        UserRole::Vendor,
        Some("restaurant"),
    )?;
    let driver_ahmed = ensure_user(db, "Ahmed Benali", "ahmed@albaz.dz", "driver123", UserRole::Driver, None)?;
    let driver_fatima =
        ensure_user(db, "Fatima Khelifi", "fatima@albaz.dz", "driver123", UserRole::Driver, None)?;
    ensure_user(db, "Demo Customer", "customer@example.com", "customer123", UserRole::Customer, None)?;

    let taj = db.stores.insert(Store {
        id: Uuid::new_v4(),
        vendor_id: vendor_taj,
        name: "Le Taj Mahal".into(),
        kind: "Cuisine Indienne".into(),
        rating: 4.5,
        delivery_time: "30-45 min".into(),
        address: "123 Rue Didouche Mourad, Alger".into(),
        city: DEMO_CITY.into(),
    })?;
    let napoli = db.stores.insert(Store {
        id: Uuid::new_v4(),
        vendor_id: vendor_napoli,
        name: "Pizza Napoli".into(),
        kind: "Pizzeria".into(),
        rating: 4.6,
        delivery_time: "25-35 min".into(),
        address: "456 Boulevard Mohamed V, Alger".into(),
        city: DEMO_CITY.into(),
    })?;

    for (store_id, name, description, price, rating) in [
        (taj.id, "Poulet Tikka Masala", "Chicken in a creamy spiced sauce", 1200, 4.5),
        (taj.id, "Biryani aux Legumes", "Basmati rice with vegetables and spices", 900, 4.7),
        (napoli.id, "Pizza Margherita", "Tomato, mozzarella, fresh basil", 1100, 4.8),
        (napoli.id, "Pizza 4 Fromages", "Mozzarella, gorgonzola, parmesan, goat cheese", 1300, 4.6),
    ] {
        db.products.insert(Product {
            id: Uuid::new_v4(),
            store_id,
            name: name.into(),
            description: Some(description.into()),
            price,
            rating,
            available: true,
        })?;
    }

    for (driver_id, offset, rating) in [(driver_ahmed, 0.01, 4.8), (driver_fatima, 0.02, 4.5)] {
        db.driver_locations.insert(DriverLocation {
            driver_id,
            latitude: DEMO_CENTER.latitude + offset,
            longitude: DEMO_CENTER.longitude,
            is_available: true,
            updated_at: now,
        })?;
        db.driver_performance.insert(DriverPerformance {
            driver_id,
            total_deliveries: 0,
            average_delivery_time: 0.0,
            on_time_percentage: 0.0,
            rating,
            earnings: 0,
            created_at: now,
            updated_at: now,
        })?;
    }

    db.delivery_zones.insert(DeliveryZone {
        id: Uuid::new_v4(),
        name: "Alger Centre".into(),
        city: DEMO_CITY.into(),
        coordinates: vec![DEMO_CENTER],
        delivery_fee: 200,
        estimated_time: 25,
        active_drivers: 2,
        created_at: now,
    })?;

    for (name, description, points_cost, reward_type, value) in [
        ("Free delivery", "No delivery fee on your next order", 200, RewardType::FreeDelivery, 0),
        ("10% off", "Ten percent off your next order", 500, RewardType::Discount, 10),
        ("Free dessert", "A dessert of your choice", 800, RewardType::FreeItem, 1),
    ] {
        db.loyalty_rewards.insert(LoyaltyReward {
            id: Uuid::new_v4(),
            name: name.into(),
            description: description.into(),
            points_cost,
            reward_type,
            value,
            active: true,
        })?;
    }

    tracing::info!(
        users = db.users.count()?,
        stores = db.stores.count()?,
        products = db.products.count()?,
        "demo data seeded"
    );
    Ok(())
}

fn ensure_user(
    db: &Database,
    name: &str,
    email: &str,
    password: &str,
    role: UserRole,
    shop_type: Option<&str>,
) -> AppResult<Uuid> {
    if let Some(existing) = db.users.by_email(email)? {
        return Ok(existing.id);
    }

    let approval_status = match role {
        UserRole::Vendor | UserRole::Driver => Some(ApprovalStatus::Approved),
        UserRole::Customer | UserRole::Admin => None,
    };
    let user = db.users.insert(User {
        id: Uuid::new_v4(),
        name: name.into(),
        email: email.into(),
        phone: "+213555000000".into(),
        role,
        created_at: Utc::now(),
        approval_status,
        license_number: (role == UserRole::Driver).then(|| "DZ-DEMO".to_string()),
        shop_type: shop_type.map(str::to_string),
        password_hash: Some(hash_password(password)?),
    })?;
    tracing::debug!(email, role = role.as_str(), "seeded user");
    Ok(user.id)
}
