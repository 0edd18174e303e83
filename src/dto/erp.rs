use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    analytics::{ErpForecast, RestockRecommendation, SalesTotals, TopSellingProduct},
    models::{Customer, InventoryProduct, PaymentMethod, Sale, Supplier},
};

// Inventory

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateInventoryRequest {
    pub sku: String,
    pub name: String,
    pub category: String,
    pub supplier_id: Option<Uuid>,
    pub cost_price: i64,
    pub selling_price: i64,
    #[serde(default)]
    pub stock: i64,
    pub low_stock_threshold: i64,
    pub barcode: Option<String>,
}

/// Fields left out keep their current value.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdateInventoryRequest {
    pub sku: Option<String>,
    pub name: Option<String>,
    pub category: Option<String>,
    pub supplier_id: Option<Uuid>,
    pub cost_price: Option<i64>,
    pub selling_price: Option<i64>,
    pub low_stock_threshold: Option<i64>,
    pub barcode: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct StockAdjustRequest {
    /// Added to the current stock; negative values remove units.
    pub delta: i64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct InventoryList {
    pub items: Vec<InventoryProduct>,
}

// Customers

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateCustomerRequest {
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdateCustomerRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct TopCustomersQuery {
    pub limit: Option<usize>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CustomerList {
    pub items: Vec<Customer>,
}

// Suppliers

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateSupplierRequest {
    pub name: String,
    pub contact_person: String,
    pub phone: String,
    pub email: String,
    pub address: String,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdateSupplierRequest {
    pub name: Option<String>,
    pub contact_person: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub products_supplied: Option<Vec<Uuid>>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SupplierList {
    pub items: Vec<Supplier>,
}

// Sales

#[derive(Debug, Deserialize, ToSchema)]
pub struct SaleItemInput {
    pub product_id: Uuid,
    pub quantity: i64,
    /// Defaults to the product's selling price.
    pub unit_price: Option<i64>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateSaleRequest {
    pub customer_id: Option<Uuid>,
    pub items: Vec<SaleItemInput>,
    #[serde(default)]
    pub discount: i64,
    pub payment_method: PaymentMethod,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SaleList {
    pub items: Vec<Sale>,
}

// Reports

#[derive(Debug, Serialize, ToSchema)]
pub struct ErpDashboard {
    pub sales: SalesTotals,
    pub top_products: Vec<TopSellingProduct>,
    pub low_stock: Vec<InventoryProduct>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ErpInsights {
    pub forecast: ErpForecast,
    pub recommendations: Vec<RestockRecommendation>,
}
