use std::collections::HashMap;

use chrono::Utc;
use uuid::Uuid;

use crate::{
    analytics::{self, CustomerInsights, ForecastPeriod, SalesForecast, VendorMetrics},
    db::Repository,
    error::AppResult,
    models::Order,
    response::{ApiResponse, Meta},
    state::AppState,
};

fn vendor_orders(state: &AppState, vendor_id: Uuid) -> AppResult<Vec<Order>> {
    let store_ids = state.db.stores.ids_for_vendor(vendor_id)?;
    state.db.orders.by_stores(&store_ids)
}

pub async fn dashboard(state: &AppState, vendor_id: Uuid) -> AppResult<ApiResponse<VendorMetrics>> {
    let orders = vendor_orders(state, vendor_id)?;
    let names: HashMap<Uuid, String> = state
        .db
        .products
        .list()?
        .into_iter()
        .map(|p| (p.id, p.name))
        .collect();

    let metrics = analytics::vendor_metrics(&orders, |id| names.get(&id).cloned(), Utc::now());
    Ok(ApiResponse::success("Vendor dashboard", metrics, Some(Meta::empty())))
}

pub async fn customer_insights(
    state: &AppState,
    vendor_id: Uuid,
) -> AppResult<ApiResponse<CustomerInsights>> {
    let orders = vendor_orders(state, vendor_id)?;
    let insights = analytics::customer_insights(&orders);
    Ok(ApiResponse::success("Customer insights", insights, Some(Meta::empty())))
}

pub async fn sales_forecast(
    state: &AppState,
    vendor_id: Uuid,
    period: ForecastPeriod,
) -> AppResult<ApiResponse<SalesForecast>> {
    let orders = vendor_orders(state, vendor_id)?;
    let forecast = analytics::sales_forecast(&orders, period, Utc::now());
    Ok(ApiResponse::success("Sales forecast", forecast, Some(Meta::empty())))
}
