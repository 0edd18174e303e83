use uuid::Uuid;

use super::{OrderRepository, Repository, StoreRepository, UserRepository};
use crate::{
    error::AppResult,
    models::{Order, OrderStatus, Store, User, UserRole},
};

impl OrderRepository {
    pub fn by_customer(&self, customer_id: Uuid) -> AppResult<Vec<Order>> {
        self.filter(|o| o.customer_id == customer_id)
    }

    pub fn by_stores(&self, store_ids: &[Uuid]) -> AppResult<Vec<Order>> {
        self.filter(|o| store_ids.contains(&o.store_id))
    }

    pub fn by_driver(&self, driver_id: Uuid) -> AppResult<Vec<Order>> {
        self.filter(|o| o.driver_id == Some(driver_id))
    }

    /// Ready orders no driver has picked yet.
    pub fn available_deliveries(&self) -> AppResult<Vec<Order>> {
        self.filter(|o| o.status == OrderStatus::Ready && o.driver_id.is_none())
    }

    pub fn available_in_city(&self, city: &str) -> AppResult<Vec<Order>> {
        self.filter(|o| o.status == OrderStatus::Ready && o.driver_id.is_none() && o.city == city)
    }
}

impl UserRepository {
    pub fn by_role(&self, role: UserRole) -> AppResult<Vec<User>> {
        self.filter(|u| u.role == role)
    }

    pub fn by_email(&self, email: &str) -> AppResult<Option<User>> {
        Ok(self
            .filter(|u| u.email.eq_ignore_ascii_case(email))?
            .into_iter()
            .next())
    }
}

impl StoreRepository {
    pub fn by_vendor(&self, vendor_id: Uuid) -> AppResult<Vec<Store>> {
        self.filter(|s| s.vendor_id == vendor_id)
    }

    pub fn ids_for_vendor(&self, vendor_id: Uuid) -> AppResult<Vec<Uuid>> {
        Ok(self.by_vendor(vendor_id)?.into_iter().map(|s| s.id).collect())
    }
}
