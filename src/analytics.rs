//! Dashboard reducers over orders, sales and reviews.
//!
//! Every function here is pure: callers load the rows and pass `now`.
//! The forecasts are flat projections of recent revenue, not predictions.

use chrono::{DateTime, Duration, Months, NaiveTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::{InventoryProduct, Order, OrderStatus, Sale, VendorReview};

const TOP_PRODUCTS: usize = 5;
const TOP_CUSTOMERS: usize = 10;
const FORECAST_CONFIDENCE: f64 = 0.75;
const ERP_WEEK_GROWTH: f64 = 1.1;
const ERP_MONTH_GROWTH: f64 = 1.15;
const RESTOCK_MULTIPLIER: i64 = 3;

/// Start of the "today", "last 7 days" and "last month" windows.
#[derive(Debug, Clone, Copy)]
pub struct Cutoffs {
    pub today: DateTime<Utc>,
    pub week: DateTime<Utc>,
    pub month: DateTime<Utc>,
}

impl Cutoffs {
    pub fn at(now: DateTime<Utc>) -> Self {
        Self {
            today: now.date_naive().and_time(NaiveTime::MIN).and_utc(),
            week: now - Duration::days(7),
            month: now
                .checked_sub_months(Months::new(1))
                .unwrap_or(now - Duration::days(30)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Trend {
    Up,
    Down,
    Stable,
}

// ---------------------------------------------------------------------------
// Vendor order analytics
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ProductRevenue {
    pub product_id: Uuid,
    pub name: String,
    pub quantity: i64,
    pub revenue: i64,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct VendorMetrics {
    pub today_revenue: i64,
    pub week_revenue: i64,
    pub month_revenue: i64,
    pub total_orders: usize,
    pub pending_orders: usize,
    pub completed_orders: usize,
    pub cancelled_orders: usize,
    pub avg_order_value: f64,
    pub top_products: Vec<ProductRevenue>,
}

pub fn revenue_since(orders: &[Order], since: DateTime<Utc>) -> i64 {
    orders
        .iter()
        .filter(|o| o.created_at >= since)
        .map(|o| o.total)
        .sum()
}

fn count_status(orders: &[Order], status: OrderStatus) -> usize {
    orders.iter().filter(|o| o.status == status).count()
}

/// Products ranked by revenue across `orders`, best first.
pub fn top_products_by_revenue<F>(orders: &[Order], limit: usize, product_name: F) -> Vec<ProductRevenue>
where
    F: Fn(Uuid) -> Option<String>,
{
    let mut by_product: IndexMap<Uuid, ProductRevenue> = IndexMap::new();
    for item in orders.iter().flat_map(|o| o.items.iter()) {
        let line_revenue = item.price * i64::from(item.quantity);
        by_product
            .entry(item.product_id)
            .and_modify(|p| {
                p.quantity += i64::from(item.quantity);
                p.revenue += line_revenue;
            })
            .or_insert_with(|| ProductRevenue {
                product_id: item.product_id,
                name: product_name(item.product_id).unwrap_or_else(|| "Unknown".to_string()),
                quantity: i64::from(item.quantity),
                revenue: line_revenue,
            });
    }

    let mut ranked: Vec<ProductRevenue> = by_product.into_values().collect();
    ranked.sort_by(|a, b| b.revenue.cmp(&a.revenue));
    ranked.truncate(limit);
    ranked
}

pub fn vendor_metrics<F>(orders: &[Order], product_name: F, now: DateTime<Utc>) -> VendorMetrics
where
    F: Fn(Uuid) -> Option<String>,
{
    let cutoffs = Cutoffs::at(now);
    let total: i64 = orders.iter().map(|o| o.total).sum();
    let avg_order_value = if orders.is_empty() {
        0.0
    } else {
        total as f64 / orders.len() as f64
    };

    VendorMetrics {
        today_revenue: revenue_since(orders, cutoffs.today),
        week_revenue: revenue_since(orders, cutoffs.week),
        month_revenue: revenue_since(orders, cutoffs.month),
        total_orders: orders.len(),
        pending_orders: count_status(orders, OrderStatus::Pending),
        completed_orders: count_status(orders, OrderStatus::Delivered),
        cancelled_orders: count_status(orders, OrderStatus::Cancelled),
        avg_order_value,
        top_products: top_products_by_revenue(orders, TOP_PRODUCTS, product_name),
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CustomerSummary {
    pub customer_id: Uuid,
    pub order_count: usize,
    pub total_spent: i64,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CustomerInsights {
    pub total_customers: usize,
    pub repeat_customers: usize,
    /// Whole percent.
    pub repeat_rate: i64,
    pub top_customers: Vec<CustomerSummary>,
}

pub fn customer_insights(orders: &[Order]) -> CustomerInsights {
    let mut per_customer: IndexMap<Uuid, CustomerSummary> = IndexMap::new();
    for order in orders {
        let entry = per_customer
            .entry(order.customer_id)
            .or_insert_with(|| CustomerSummary {
                customer_id: order.customer_id,
                order_count: 0,
                total_spent: 0,
            });
        entry.order_count += 1;
        entry.total_spent += order.total;
    }

    let total_customers = per_customer.len();
    let repeat_customers = per_customer.values().filter(|c| c.order_count > 1).count();
    let repeat_rate = if total_customers > 0 {
        (repeat_customers as f64 / total_customers as f64 * 100.0).round() as i64
    } else {
        0
    };

    let mut top_customers: Vec<CustomerSummary> = per_customer.into_values().collect();
    top_customers.sort_by(|a, b| b.order_count.cmp(&a.order_count));
    top_customers.truncate(TOP_CUSTOMERS);

    CustomerInsights {
        total_customers,
        repeat_customers,
        repeat_rate,
        top_customers,
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ForecastPeriod {
    #[default]
    Week,
    Month,
}

impl ForecastPeriod {
    pub fn days(&self) -> i64 {
        match self {
            ForecastPeriod::Week => 7,
            ForecastPeriod::Month => 30,
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct SalesForecast {
    pub period: ForecastPeriod,
    pub predicted_sales: i64,
    pub confidence: f64,
    pub trend: Trend,
    pub avg_daily_revenue: i64,
}

/// Revenue of the trailing window projected flat over the next one.
pub fn sales_forecast(orders: &[Order], period: ForecastPeriod, now: DateTime<Utc>) -> SalesForecast {
    let days = period.days();
    let since = now - Duration::days(days);
    let window: Vec<&Order> = orders.iter().filter(|o| o.created_at >= since).collect();
    let revenue: i64 = window.iter().map(|o| o.total).sum();
    let avg_daily = revenue as f64 / days as f64;

    SalesForecast {
        period,
        predicted_sales: (avg_daily * days as f64).round() as i64,
        confidence: FORECAST_CONFIDENCE,
        trend: if window.is_empty() {
            Trend::Down
        } else {
            Trend::Stable
        },
        avg_daily_revenue: avg_daily.round() as i64,
    }
}

// ---------------------------------------------------------------------------
// ERP sales analytics
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct SalesTotals {
    pub today: i64,
    pub week: i64,
    pub month: i64,
}

pub fn sales_totals(sales: &[Sale], now: DateTime<Utc>) -> SalesTotals {
    let cutoffs = Cutoffs::at(now);
    let since = |cutoff: DateTime<Utc>| -> i64 {
        sales
            .iter()
            .filter(|s| s.created_at >= cutoff)
            .map(|s| s.total)
            .sum()
    };
    SalesTotals {
        today: since(cutoffs.today),
        week: since(cutoffs.week),
        month: since(cutoffs.month),
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct TopSellingProduct {
    pub product_id: Uuid,
    pub product_name: String,
    pub total_sold: i64,
}

pub fn top_selling_products(sales: &[Sale], limit: usize) -> Vec<TopSellingProduct> {
    let mut by_product: IndexMap<Uuid, TopSellingProduct> = IndexMap::new();
    for item in sales.iter().flat_map(|s| s.items.iter()) {
        by_product
            .entry(item.product_id)
            .and_modify(|p| p.total_sold += item.quantity)
            .or_insert_with(|| TopSellingProduct {
                product_id: item.product_id,
                product_name: item.product_name.clone(),
                total_sold: item.quantity,
            });
    }
    let mut ranked: Vec<TopSellingProduct> = by_product.into_values().collect();
    ranked.sort_by(|a, b| b.total_sold.cmp(&a.total_sold));
    ranked.truncate(limit);
    ranked
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ErpForecast {
    pub week: f64,
    pub month: f64,
    pub trend: Trend,
}

pub fn erp_forecast(totals: &SalesTotals) -> ErpForecast {
    let weekly_share = totals.month as f64 / 4.0;
    let week = totals.week as f64;
    let trend = if week > weekly_share {
        Trend::Up
    } else if week < weekly_share {
        Trend::Down
    } else {
        Trend::Stable
    };
    ErpForecast {
        week: week * ERP_WEEK_GROWTH,
        month: totals.month as f64 * ERP_MONTH_GROWTH,
        trend,
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct RestockRecommendation {
    pub product_id: Uuid,
    pub product_name: String,
    pub current_stock: i64,
    pub recommended_quantity: i64,
    pub reason: String,
}

pub fn restock_recommendations(products: &[InventoryProduct]) -> Vec<RestockRecommendation> {
    products
        .iter()
        .filter(|p| p.is_low_stock())
        .map(|p| RestockRecommendation {
            product_id: p.id,
            product_name: p.name.clone(),
            current_stock: p.stock,
            recommended_quantity: p.low_stock_threshold * RESTOCK_MULTIPLIER,
            reason: "Low stock, restock recommended".to_string(),
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Reviews
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct VendorPerformance {
    pub vendor_id: Uuid,
    pub total_reviews: usize,
    pub average_rating: f64,
    pub average_food_quality: f64,
    pub average_delivery_time: f64,
    pub average_customer_service: f64,
    /// Review counts for 1 through 5 stars.
    pub rating_distribution: Vec<usize>,
}

pub fn vendor_performance(vendor_id: Uuid, reviews: &[VendorReview]) -> Option<VendorPerformance> {
    let mine: Vec<&VendorReview> = reviews.iter().filter(|r| r.vendor_id == vendor_id).collect();
    if mine.is_empty() {
        return None;
    }
    let n = mine.len() as f64;
    let avg = |f: fn(&VendorReview) -> u8| mine.iter().map(|r| f64::from(f(r))).sum::<f64>() / n;

    let mut rating_distribution = vec![0usize; 5];
    for review in &mine {
        if (1..=5).contains(&review.rating) {
            rating_distribution[usize::from(review.rating) - 1] += 1;
        }
    }

    Some(VendorPerformance {
        vendor_id,
        total_reviews: mine.len(),
        average_rating: avg(|r| r.rating),
        average_food_quality: avg(|r| r.food_quality),
        average_delivery_time: avg(|r| r.delivery_time),
        average_customer_service: avg(|r| r.customer_service),
        rating_distribution,
    })
}

/// Vendors by average rating, then by review count.
pub fn vendor_leaderboard(reviews: &[VendorReview], limit: usize) -> Vec<VendorPerformance> {
    let mut vendor_ids: Vec<Uuid> = Vec::new();
    for review in reviews {
        if !vendor_ids.contains(&review.vendor_id) {
            vendor_ids.push(review.vendor_id);
        }
    }
    let mut board: Vec<VendorPerformance> = vendor_ids
        .into_iter()
        .filter_map(|id| vendor_performance(id, reviews))
        .collect();
    board.sort_by(|a, b| {
        b.average_rating
            .total_cmp(&a.average_rating)
            .then(b.total_reviews.cmp(&a.total_reviews))
    });
    board.truncate(limit);
    board
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{OrderItem, PaymentMethod, SaleItem};

    fn order(customer_id: Uuid, total: i64, created_at: DateTime<Utc>, items: Vec<OrderItem>) -> Order {
        Order {
            id: Uuid::new_v4(),
            customer_id,
            store_id: Uuid::new_v4(),
            driver_id: None,
            items,
            subtotal: total,
            delivery_fee: 0,
            total,
            status: OrderStatus::Pending,
            payment_method: PaymentMethod::Cash,
            delivery_address: "x".into(),
            city: "Alger".into(),
            customer_phone: "0".into(),
            created_at,
            updated_at: created_at,
            accepted_at: None,
            preparing_at: None,
            ready_at: None,
            assigned_at: None,
            delivered_at: None,
        }
    }

    #[test]
    fn revenue_buckets_respect_cutoffs() {
        let now = Utc::now();
        let c = Uuid::new_v4();
        let orders = vec![
            order(c, 100, now, vec![]),
            order(c, 200, now - Duration::days(3), vec![]),
            order(c, 400, now - Duration::days(20), vec![]),
            order(c, 800, now - Duration::days(60), vec![]),
        ];
        let m = vendor_metrics(&orders, |_| None, now);
        assert_eq!(m.today_revenue, 100);
        assert_eq!(m.week_revenue, 300);
        assert_eq!(m.month_revenue, 700);
        assert_eq!(m.total_orders, 4);
        assert_eq!(m.avg_order_value, 375.0);
    }

    #[test]
    fn top_products_ranked_by_revenue() {
        let now = Utc::now();
        let (a, b) = (Uuid::new_v4(), Uuid::new_v4());
        let orders = vec![
            order(
                Uuid::new_v4(),
                0,
                now,
                vec![
                    OrderItem { product_id: a, quantity: 10, price: 10 },
                    OrderItem { product_id: b, quantity: 1, price: 500 },
                ],
            ),
            order(Uuid::new_v4(), 0, now, vec![OrderItem { product_id: a, quantity: 5, price: 10 }]),
        ];
        let names = move |id: Uuid| (id == b).then(|| "Pizza".to_string());
        let top = top_products_by_revenue(&orders, 5, names);
        assert_eq!(top[0].product_id, b);
        assert_eq!(top[0].name, "Pizza");
        assert_eq!(top[1].revenue, 150);
        assert_eq!(top[1].quantity, 15);
        assert_eq!(top[1].name, "Unknown");
    }

    #[test]
    fn repeat_rate_is_rounded_percent() {
        let now = Utc::now();
        let (x, y, z) = (Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4());
        let orders = vec![
            order(x, 10, now, vec![]),
            order(x, 10, now, vec![]),
            order(y, 10, now, vec![]),
            order(z, 10, now, vec![]),
        ];
        let insights = customer_insights(&orders);
        assert_eq!(insights.total_customers, 3);
        assert_eq!(insights.repeat_customers, 1);
        assert_eq!(insights.repeat_rate, 33);
        assert_eq!(insights.top_customers[0].customer_id, x);
        assert_eq!(insights.top_customers[0].total_spent, 20);
    }

    #[test]
    fn forecast_is_flat_projection() {
        let now = Utc::now();
        let c = Uuid::new_v4();
        let orders = vec![
            order(c, 700, now - Duration::days(1), vec![]),
            order(c, 9999, now - Duration::days(10), vec![]),
        ];
        let f = sales_forecast(&orders, ForecastPeriod::Week, now);
        assert_eq!(f.predicted_sales, 700);
        assert_eq!(f.avg_daily_revenue, 100);
        assert_eq!(f.trend, Trend::Stable);
        assert_eq!(f.confidence, 0.75);

        let empty = sales_forecast(&[], ForecastPeriod::Month, now);
        assert_eq!(empty.predicted_sales, 0);
        assert_eq!(empty.trend, Trend::Down);
    }

    #[test]
    fn erp_trend_compares_week_with_quarter_month() {
        let up = erp_forecast(&SalesTotals { today: 0, week: 300, month: 800 });
        assert_eq!(up.trend, Trend::Up);
        let stable = erp_forecast(&SalesTotals { today: 0, week: 200, month: 800 });
        assert_eq!(stable.trend, Trend::Stable);
        assert!((stable.week - 220.0).abs() < 1e-9);
        assert!((stable.month - 920.0).abs() < 1e-9);
    }

    #[test]
    fn top_selling_by_quantity() {
        let (a, b) = (Uuid::new_v4(), Uuid::new_v4());
        let sale = |items: Vec<SaleItem>| Sale {
            id: Uuid::new_v4(),
            customer_id: None,
            items,
            subtotal: 0,
            discount: 0,
            total: 0,
            payment_method: PaymentMethod::Cash,
            created_at: Utc::now(),
        };
        let item = |id: Uuid, name: &str, quantity: i64| SaleItem {
            product_id: id,
            product_name: name.into(),
            quantity,
            unit_price: 1,
        };
        let sales = vec![
            sale(vec![item(a, "Milk", 2), item(b, "Bread", 3)]),
            sale(vec![item(a, "Milk", 4)]),
        ];
        let top = top_selling_products(&sales, 5);
        assert_eq!(top[0].product_name, "Milk");
        assert_eq!(top[0].total_sold, 6);
        assert_eq!(top[1].total_sold, 3);
    }
}
