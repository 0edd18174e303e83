use chrono::Utc;
use uuid::Uuid;

use crate::{
    analytics,
    db::Repository,
    dto::erp::{
        CreateCustomerRequest, CreateInventoryRequest, CreateSaleRequest, CreateSupplierRequest,
        CustomerList, ErpDashboard, ErpInsights, InventoryList, SaleList, StockAdjustRequest,
        SupplierList, UpdateCustomerRequest, UpdateInventoryRequest, UpdateSupplierRequest,
    },
    error::{AppError, AppResult},
    models::{Customer, InventoryProduct, Sale, SaleItem, Supplier},
    response::{ApiResponse, Meta},
    state::AppState,
};

const TOP_SELLING: usize = 5;
const DEFAULT_TOP_CUSTOMERS: usize = 10;
pub const MAX_QUANTITY: i64 = 1_000_000_000;

fn out_of_range(what: &str) -> AppError {
    AppError::bad_request(format!("{what} out of range"))
}

fn require(fields: &[&str]) -> AppResult<()> {
    if fields.iter().any(|f| f.trim().is_empty()) {
        return Err(AppError::bad_request("Missing required fields"));
    }
    Ok(())
}

fn check_prices(cost_price: i64, selling_price: i64, threshold: i64) -> AppResult<()> {
    if cost_price < 0 || selling_price < 0 || threshold < 0 {
        return Err(AppError::bad_request("Prices and thresholds must not be negative"));
    }
    Ok(())
}

fn sku_taken(state: &AppState, sku: &str, except: Option<Uuid>) -> AppResult<bool> {
    Ok(!state
        .db
        .inventory
        .filter(|p| p.sku.eq_ignore_ascii_case(sku) && Some(p.id) != except)?
        .is_empty())
}

// ---------------------------------------------------------------------------
// Inventory
// ---------------------------------------------------------------------------

pub async fn list_inventory(state: &AppState) -> AppResult<ApiResponse<InventoryList>> {
    let items = state.db.inventory.list()?;
    let meta = Meta::total(items.len());
    Ok(ApiResponse::success("Inventory", InventoryList { items }, Some(meta)))
}

pub async fn create_inventory_product(
    state: &AppState,
    payload: CreateInventoryRequest,
) -> AppResult<ApiResponse<InventoryProduct>> {
    require(&[&payload.sku, &payload.name, &payload.category])?;
    check_prices(payload.cost_price, payload.selling_price, payload.low_stock_threshold)?;
    if payload.stock < 0 {
        return Err(AppError::bad_request("Stock must not be negative"));
    }
    if sku_taken(state, &payload.sku, None)? {
        return Err(AppError::bad_request("SKU already exists"));
    }

    let now = Utc::now();
    let product = state.db.inventory.insert(InventoryProduct {
        id: Uuid::new_v4(),
        sku: payload.sku,
        name: payload.name,
        category: payload.category,
        supplier_id: payload.supplier_id,
        cost_price: payload.cost_price,
        selling_price: payload.selling_price,
        stock: payload.stock,
        low_stock_threshold: payload.low_stock_threshold,
        barcode: payload.barcode,
        created_at: now,
        updated_at: now,
    })?;
    Ok(ApiResponse::success("Product created", product, Some(Meta::empty())))
}

pub async fn update_inventory_product(
    state: &AppState,
    id: Uuid,
    payload: UpdateInventoryRequest,
) -> AppResult<ApiResponse<InventoryProduct>> {
    if let Some(sku) = payload.sku.as_deref() {
        require(&[sku])?;
        if sku_taken(state, sku, Some(id))? {
            return Err(AppError::bad_request("SKU already exists"));
        }
    }

    let product = state
        .db
        .inventory
        .update(&id, |p| {
            check_prices(
                payload.cost_price.unwrap_or(p.cost_price),
                payload.selling_price.unwrap_or(p.selling_price),
                payload.low_stock_threshold.unwrap_or(p.low_stock_threshold),
            )?;
            if let Some(sku) = payload.sku {
                p.sku = sku;
            }
            if let Some(name) = payload.name {
                p.name = name;
            }
            if let Some(category) = payload.category {
                p.category = category;
            }
            if payload.supplier_id.is_some() {
                p.supplier_id = payload.supplier_id;
            }
            if let Some(cost_price) = payload.cost_price {
                p.cost_price = cost_price;
            }
            if let Some(selling_price) = payload.selling_price {
                p.selling_price = selling_price;
            }
            if let Some(threshold) = payload.low_stock_threshold {
                p.low_stock_threshold = threshold;
            }
            if payload.barcode.is_some() {
                p.barcode = payload.barcode;
            }
            p.updated_at = Utc::now();
            Ok(p.clone())
        })?
        .ok_or_else(|| AppError::not_found("Product"))?;
    Ok(ApiResponse::success("Product updated", product, Some(Meta::empty())))
}

pub async fn delete_inventory_product(
    state: &AppState,
    id: Uuid,
) -> AppResult<ApiResponse<serde_json::Value>> {
    if !state.db.inventory.remove(&id)? {
        return Err(AppError::not_found("Product"));
    }
    Ok(ApiResponse::success(
        "Deleted",
        serde_json::json!({ "id": id }),
        Some(Meta::empty()),
    ))
}

/// Stock never goes below zero.
pub async fn adjust_stock(
    state: &AppState,
    id: Uuid,
    payload: StockAdjustRequest,
) -> AppResult<ApiResponse<InventoryProduct>> {
    if payload.delta.unsigned_abs() > MAX_QUANTITY.unsigned_abs() {
        return Err(out_of_range("Stock change"));
    }
    let product = state
        .db
        .inventory
        .update(&id, |p| {
            let stock = p.stock.checked_add(payload.delta).ok_or_else(|| out_of_range("Stock"))?;
            if stock < 0 {
                return Err(AppError::bad_request(format!(
                    "Insufficient stock for {}: {} available",
                    p.name, p.stock
                )));
            }
            p.stock = stock;
            p.updated_at = Utc::now();
            Ok(p.clone())
        })?
        .ok_or_else(|| AppError::not_found("Product"))?;

    if product.is_low_stock() {
        tracing::warn!(product_id = %product.id, stock = product.stock, "stock below threshold");
    }
    Ok(ApiResponse::success("Stock updated", product, Some(Meta::empty())))
}

pub async fn low_stock(state: &AppState) -> AppResult<ApiResponse<InventoryList>> {
    let items = state.db.inventory.filter(InventoryProduct::is_low_stock)?;
    let meta = Meta::total(items.len());
    Ok(ApiResponse::success("Low stock", InventoryList { items }, Some(meta)))
}

// ---------------------------------------------------------------------------
// Customers
// ---------------------------------------------------------------------------

pub async fn list_customers(state: &AppState) -> AppResult<ApiResponse<CustomerList>> {
    let items = state.db.customers.list()?;
    let meta = Meta::total(items.len());
    Ok(ApiResponse::success("Customers", CustomerList { items }, Some(meta)))
}

pub async fn create_customer(
    state: &AppState,
    payload: CreateCustomerRequest,
) -> AppResult<ApiResponse<Customer>> {
    require(&[&payload.name])?;
    let customer = state.db.customers.insert(Customer {
        id: Uuid::new_v4(),
        name: payload.name,
        email: payload.email,
        phone: payload.phone,
        total_purchases: 0,
        last_purchase_date: None,
        created_at: Utc::now(),
    })?;
    Ok(ApiResponse::success("Customer created", customer, Some(Meta::empty())))
}

pub async fn update_customer(
    state: &AppState,
    id: Uuid,
    payload: UpdateCustomerRequest,
) -> AppResult<ApiResponse<Customer>> {
    if let Some(name) = payload.name.as_deref() {
        require(&[name])?;
    }
    let customer = state
        .db
        .customers
        .update(&id, |c| {
            if let Some(name) = payload.name {
                c.name = name;
            }
            if payload.email.is_some() {
                c.email = payload.email;
            }
            if payload.phone.is_some() {
                c.phone = payload.phone;
            }
            Ok(c.clone())
        })?
        .ok_or_else(|| AppError::not_found("Customer"))?;
    Ok(ApiResponse::success("Customer updated", customer, Some(Meta::empty())))
}

/// Customers by lifetime purchases, highest first.
pub async fn top_customers(
    state: &AppState,
    limit: Option<usize>,
) -> AppResult<ApiResponse<CustomerList>> {
    let mut items = state.db.customers.list()?;
    items.sort_by(|a, b| b.total_purchases.cmp(&a.total_purchases));
    items.truncate(limit.filter(|n| *n > 0).unwrap_or(DEFAULT_TOP_CUSTOMERS));
    let meta = Meta::total(items.len());
    Ok(ApiResponse::success("Top customers", CustomerList { items }, Some(meta)))
}

// ---------------------------------------------------------------------------
// Suppliers
// ---------------------------------------------------------------------------

pub async fn list_suppliers(state: &AppState) -> AppResult<ApiResponse<SupplierList>> {
    let items = state.db.suppliers.list()?;
    let meta = Meta::total(items.len());
    Ok(ApiResponse::success("Suppliers", SupplierList { items }, Some(meta)))
}

pub async fn create_supplier(
    state: &AppState,
    payload: CreateSupplierRequest,
) -> AppResult<ApiResponse<Supplier>> {
    require(&[&payload.name, &payload.contact_person, &payload.phone])?;
    let supplier = state.db.suppliers.insert(Supplier {
        id: Uuid::new_v4(),
        name: payload.name,
        contact_person: payload.contact_person,
        phone: payload.phone,
        email: payload.email,
        address: payload.address,
        products_supplied: Vec::new(),
        created_at: Utc::now(),
    })?;
    Ok(ApiResponse::success("Supplier created", supplier, Some(Meta::empty())))
}

pub async fn update_supplier(
    state: &AppState,
    id: Uuid,
    payload: UpdateSupplierRequest,
) -> AppResult<ApiResponse<Supplier>> {
    let supplier = state
        .db
        .suppliers
        .update(&id, |s| {
            if let Some(name) = payload.name {
                s.name = name;
            }
            if let Some(contact_person) = payload.contact_person {
                s.contact_person = contact_person;
            }
            if let Some(phone) = payload.phone {
                s.phone = phone;
            }
            if let Some(email) = payload.email {
                s.email = email;
            }
            if let Some(address) = payload.address {
                s.address = address;
            }
            if let Some(products) = payload.products_supplied {
                s.products_supplied = products;
            }
            Ok(s.clone())
        })?
        .ok_or_else(|| AppError::not_found("Supplier"))?;
    Ok(ApiResponse::success("Supplier updated", supplier, Some(Meta::empty())))
}

pub async fn delete_supplier(
    state: &AppState,
    id: Uuid,
) -> AppResult<ApiResponse<serde_json::Value>> {
    if !state.db.suppliers.remove(&id)? {
        return Err(AppError::not_found("Supplier"));
    }
    Ok(ApiResponse::success(
        "Deleted",
        serde_json::json!({ "id": id }),
        Some(Meta::empty()),
    ))
}

// ---------------------------------------------------------------------------
// Sales
// ---------------------------------------------------------------------------

pub async fn list_sales(state: &AppState) -> AppResult<ApiResponse<SaleList>> {
    let mut items = state.db.sales.list()?;
    items.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    let meta = Meta::total(items.len());
    Ok(ApiResponse::success("Sales", SaleList { items }, Some(meta)))
}

/// Record a sale, take the sold units out of stock and credit the customer.
///
/// Every line is checked against current stock before anything is written.
/// The stock decrements and the customer update that follow are separate
/// writes.
pub async fn create_sale(
    state: &AppState,
    payload: CreateSaleRequest,
) -> AppResult<ApiResponse<Sale>> {
    if payload.items.is_empty() {
        return Err(AppError::bad_request("Sale has no items"));
    }
    if payload.discount < 0 {
        return Err(AppError::bad_request("Discount must not be negative"));
    }
    if let Some(customer_id) = payload.customer_id {
        if state.db.customers.get(&customer_id)?.is_none() {
            return Err(AppError::not_found("Customer"));
        }
    }

    let mut items = Vec::with_capacity(payload.items.len());
    for line in &payload.items {
        if line.quantity <= 0 {
            return Err(AppError::bad_request("Quantity must be positive"));
        }
        if line.quantity > MAX_QUANTITY {
            return Err(out_of_range("Quantity"));
        }
        if line.unit_price.is_some_and(|price| price < 0) {
            return Err(AppError::bad_request("Unit price must not be negative"));
        }
        let product = state
            .db
            .inventory
            .get(&line.product_id)?
            .ok_or_else(|| AppError::not_found("Product"))?;
        let wanted = payload
            .items
            .iter()
            .filter(|l| l.product_id == product.id)
            .try_fold(0i64, |acc, l| acc.checked_add(l.quantity))
            .ok_or_else(|| out_of_range("Quantity"))?;
        if wanted > product.stock {
            return Err(AppError::bad_request(format!(
                "Insufficient stock for {}: {} available",
                product.name, product.stock
            )));
        }
        items.push(SaleItem {
            product_id: product.id,
            product_name: product.name,
            quantity: line.quantity,
            unit_price: line.unit_price.unwrap_or(product.selling_price),
        });
    }

    let subtotal = items
        .iter()
        .try_fold(0i64, |acc, i| i.unit_price.checked_mul(i.quantity)?.checked_add(acc))
        .ok_or_else(|| out_of_range("Sale total"))?;
    if payload.discount > subtotal {
        return Err(AppError::bad_request("Discount exceeds the subtotal"));
    }

    let sale = state.db.sales.insert(Sale {
        id: Uuid::new_v4(),
        customer_id: payload.customer_id,
        items,
        subtotal,
        discount: payload.discount,
        total: subtotal - payload.discount,
        payment_method: payload.payment_method,
        created_at: Utc::now(),
    })?;

    for item in &sale.items {
        state.db.inventory.update(&item.product_id, |p| {
            p.stock -= item.quantity;
            p.updated_at = sale.created_at;
            Ok(())
        })?;
    }
    if let Some(customer_id) = sale.customer_id {
        state.db.customers.update(&customer_id, |c| {
            c.total_purchases = c.total_purchases.saturating_add(sale.total);
            c.last_purchase_date = Some(sale.created_at);
            Ok(())
        })?;
    }

    tracing::info!(sale_id = %sale.id, total = sale.total, lines = sale.items.len(), "sale recorded");
    Ok(ApiResponse::success("Sale recorded", sale, Some(Meta::empty())))
}

// ---------------------------------------------------------------------------
// Reports
// ---------------------------------------------------------------------------

pub async fn dashboard(state: &AppState) -> AppResult<ApiResponse<ErpDashboard>> {
    let sales = state.db.sales.list()?;
    let dashboard = ErpDashboard {
        sales: analytics::sales_totals(&sales, Utc::now()),
        top_products: analytics::top_selling_products(&sales, TOP_SELLING),
        low_stock: state.db.inventory.filter(InventoryProduct::is_low_stock)?,
    };
    Ok(ApiResponse::success("ERP dashboard", dashboard, Some(Meta::empty())))
}

pub async fn insights(state: &AppState) -> AppResult<ApiResponse<ErpInsights>> {
    let sales = state.db.sales.list()?;
    let totals = analytics::sales_totals(&sales, Utc::now());
    let products = state.db.inventory.list()?;
    let insights = ErpInsights {
        forecast: analytics::erp_forecast(&totals),
        recommendations: analytics::restock_recommendations(&products),
    };
    Ok(ApiResponse::success("ERP insights", insights, Some(Meta::empty())))
}
