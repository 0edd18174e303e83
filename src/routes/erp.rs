use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::{get, patch, put},
};
use uuid::Uuid;

use crate::{
    dto::erp::{
        CreateCustomerRequest, CreateInventoryRequest, CreateSaleRequest, CreateSupplierRequest,
        CustomerList, ErpDashboard, ErpInsights, InventoryList, SaleList, StockAdjustRequest,
        SupplierList, TopCustomersQuery, UpdateCustomerRequest, UpdateInventoryRequest,
        UpdateSupplierRequest,
    },
    error::AppResult,
    models::{Customer, InventoryProduct, Sale, Supplier},
    response::ApiResponse,
    services::erp_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/inventory", get(list_inventory).post(create_inventory_product))
        .route("/inventory/low-stock", get(low_stock))
        .route(
            "/inventory/{id}",
            put(update_inventory_product).delete(delete_inventory_product),
        )
        .route("/inventory/{id}/stock", patch(adjust_stock))
        .route("/customers", get(list_customers).post(create_customer))
        .route("/customers/top", get(top_customers))
        .route("/customers/{id}", put(update_customer))
        .route("/suppliers", get(list_suppliers).post(create_supplier))
        .route("/suppliers/{id}", put(update_supplier).delete(delete_supplier))
        .route("/sales", get(list_sales).post(create_sale))
        .route("/dashboard", get(dashboard))
        .route("/insights", get(insights))
}

#[utoipa::path(
    get,
    path = "/api/erp/inventory",
    responses(
        (status = 200, description = "Inventory", body = ApiResponse<InventoryList>)
    ),
    tag = "ERP"
)]
pub async fn list_inventory(
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<InventoryList>>> {
    let resp = erp_service::list_inventory(&state).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/erp/inventory",
    request_body = CreateInventoryRequest,
    responses(
        (status = 200, description = "Product created", body = ApiResponse<InventoryProduct>),
        (status = 400, description = "Missing fields, negative values or duplicate SKU")
    ),
    tag = "ERP"
)]
pub async fn create_inventory_product(
    State(state): State<AppState>,
    Json(payload): Json<CreateInventoryRequest>,
) -> AppResult<Json<ApiResponse<InventoryProduct>>> {
    let resp = erp_service::create_inventory_product(&state, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    put,
    path = "/api/erp/inventory/{id}",
    params(
        ("id" = Uuid, Path, description = "Inventory product ID")
    ),
    request_body = UpdateInventoryRequest,
    responses(
        (status = 200, description = "Product updated", body = ApiResponse<InventoryProduct>),
        (status = 404, description = "Product not found")
    ),
    tag = "ERP"
)]
pub async fn update_inventory_product(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateInventoryRequest>,
) -> AppResult<Json<ApiResponse<InventoryProduct>>> {
    let resp = erp_service::update_inventory_product(&state, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/erp/inventory/{id}",
    params(
        ("id" = Uuid, Path, description = "Inventory product ID")
    ),
    responses(
        (status = 200, description = "Deleted"),
        (status = 404, description = "Product not found")
    ),
    tag = "ERP"
)]
pub async fn delete_inventory_product(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let resp = erp_service::delete_inventory_product(&state, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    patch,
    path = "/api/erp/inventory/{id}/stock",
    params(
        ("id" = Uuid, Path, description = "Inventory product ID")
    ),
    request_body = StockAdjustRequest,
    responses(
        (status = 200, description = "Stock adjusted", body = ApiResponse<InventoryProduct>),
        (status = 400, description = "Stock would go negative"),
        (status = 404, description = "Product not found")
    ),
    tag = "ERP"
)]
pub async fn adjust_stock(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<StockAdjustRequest>,
) -> AppResult<Json<ApiResponse<InventoryProduct>>> {
    let resp = erp_service::adjust_stock(&state, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/erp/inventory/low-stock",
    responses(
        (status = 200, description = "Products at or below their threshold", body = ApiResponse<InventoryList>)
    ),
    tag = "ERP"
)]
pub async fn low_stock(State(state): State<AppState>) -> AppResult<Json<ApiResponse<InventoryList>>> {
    let resp = erp_service::low_stock(&state).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/erp/customers",
    responses(
        (status = 200, description = "Customers", body = ApiResponse<CustomerList>)
    ),
    tag = "ERP"
)]
pub async fn list_customers(
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<CustomerList>>> {
    let resp = erp_service::list_customers(&state).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/erp/customers",
    request_body = CreateCustomerRequest,
    responses(
        (status = 200, description = "Customer created", body = ApiResponse<Customer>),
        (status = 400, description = "Missing name")
    ),
    tag = "ERP"
)]
pub async fn create_customer(
    State(state): State<AppState>,
    Json(payload): Json<CreateCustomerRequest>,
) -> AppResult<Json<ApiResponse<Customer>>> {
    let resp = erp_service::create_customer(&state, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    put,
    path = "/api/erp/customers/{id}",
    params(
        ("id" = Uuid, Path, description = "Customer ID")
    ),
    request_body = UpdateCustomerRequest,
    responses(
        (status = 200, description = "Customer updated", body = ApiResponse<Customer>),
        (status = 404, description = "Customer not found")
    ),
    tag = "ERP"
)]
pub async fn update_customer(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateCustomerRequest>,
) -> AppResult<Json<ApiResponse<Customer>>> {
    let resp = erp_service::update_customer(&state, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/erp/customers/top",
    params(
        ("limit" = Option<usize>, Query, description = "Customers to return, default 10")
    ),
    responses(
        (status = 200, description = "Customers by lifetime purchases", body = ApiResponse<CustomerList>)
    ),
    tag = "ERP"
)]
pub async fn top_customers(
    State(state): State<AppState>,
    Query(query): Query<TopCustomersQuery>,
) -> AppResult<Json<ApiResponse<CustomerList>>> {
    let resp = erp_service::top_customers(&state, query.limit).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/erp/suppliers",
    responses(
        (status = 200, description = "Suppliers", body = ApiResponse<SupplierList>)
    ),
    tag = "ERP"
)]
pub async fn list_suppliers(
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<SupplierList>>> {
    let resp = erp_service::list_suppliers(&state).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/erp/suppliers",
    request_body = CreateSupplierRequest,
    responses(
        (status = 200, description = "Supplier created", body = ApiResponse<Supplier>),
        (status = 400, description = "Missing fields")
    ),
    tag = "ERP"
)]
pub async fn create_supplier(
    State(state): State<AppState>,
    Json(payload): Json<CreateSupplierRequest>,
) -> AppResult<Json<ApiResponse<Supplier>>> {
    let resp = erp_service::create_supplier(&state, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    put,
    path = "/api/erp/suppliers/{id}",
    params(
        ("id" = Uuid, Path, description = "Supplier ID")
    ),
    request_body = UpdateSupplierRequest,
    responses(
        (status = 200, description = "Supplier updated", body = ApiResponse<Supplier>),
        (status = 404, description = "Supplier not found")
    ),
    tag = "ERP"
)]
pub async fn update_supplier(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateSupplierRequest>,
) -> AppResult<Json<ApiResponse<Supplier>>> {
    let resp = erp_service::update_supplier(&state, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/erp/suppliers/{id}",
    params(
        ("id" = Uuid, Path, description = "Supplier ID")
    ),
    responses(
        (status = 200, description = "Deleted"),
        (status = 404, description = "Supplier not found")
    ),
    tag = "ERP"
)]
pub async fn delete_supplier(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let resp = erp_service::delete_supplier(&state, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/erp/sales",
    responses(
        (status = 200, description = "Sales, newest first", body = ApiResponse<SaleList>)
    ),
    tag = "ERP"
)]
pub async fn list_sales(State(state): State<AppState>) -> AppResult<Json<ApiResponse<SaleList>>> {
    let resp = erp_service::list_sales(&state).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/erp/sales",
    request_body = CreateSaleRequest,
    responses(
        (status = 200, description = "Sale recorded; stock and customer totals updated", body = ApiResponse<Sale>),
        (status = 400, description = "Empty sale, bad quantity or insufficient stock"),
        (status = 404, description = "Product or customer not found")
    ),
    tag = "ERP"
)]
pub async fn create_sale(
    State(state): State<AppState>,
    Json(payload): Json<CreateSaleRequest>,
) -> AppResult<Json<ApiResponse<Sale>>> {
    let resp = erp_service::create_sale(&state, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/erp/dashboard",
    responses(
        (status = 200, description = "Sales totals, best sellers and low stock", body = ApiResponse<ErpDashboard>)
    ),
    tag = "ERP"
)]
pub async fn dashboard(State(state): State<AppState>) -> AppResult<Json<ApiResponse<ErpDashboard>>> {
    let resp = erp_service::dashboard(&state).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/erp/insights",
    responses(
        (status = 200, description = "Sales projection and restock advice", body = ApiResponse<ErpInsights>)
    ),
    tag = "ERP"
)]
pub async fn insights(State(state): State<AppState>) -> AppResult<Json<ApiResponse<ErpInsights>>> {
    let resp = erp_service::insights(&state).await?;
    Ok(Json(resp))
}
