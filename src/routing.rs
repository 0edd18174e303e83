//! Route batching.
//!
//! Orders are chunked in the order they are given; nothing here looks at
//! geography. Distance and duration are synthetic per-stop estimates.

use uuid::Uuid;

use crate::models::Order;

const KM_PER_STOP: f64 = 2.0;
const MINUTES_PER_STOP: i64 = 5;
const MINUTES_BETWEEN_STOPS: i64 = 2;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedRoute {
    pub driver_id: Uuid,
    pub order_ids: Vec<Uuid>,
}

/// Give each driver, in turn, the next `max_stops` orders.
///
/// Stops as soon as either orders or drivers run out, so some drivers may get
/// nothing and some orders may stay unplanned.
pub fn plan_batches(order_ids: &[Uuid], driver_ids: &[Uuid], max_stops: usize) -> Vec<PlannedRoute> {
    if max_stops == 0 {
        return Vec::new();
    }
    order_ids
        .chunks(max_stops)
        .zip(driver_ids)
        .map(|(chunk, driver_id)| PlannedRoute {
            driver_id: *driver_id,
            order_ids: chunk.to_vec(),
        })
        .collect()
}

pub fn estimated_distance_km(stops: usize) -> f64 {
    stops as f64 * KM_PER_STOP
}

pub fn estimated_minutes(stops: usize) -> i64 {
    let stops = stops as i64;
    stops * MINUTES_PER_STOP + (stops - 1).max(0) * MINUTES_BETWEEN_STOPS
}

/// Visit order for a single driver: alphabetical by delivery address.
pub fn sequence_by_address(orders: &[Order]) -> Vec<Uuid> {
    let mut sorted: Vec<&Order> = orders.iter().collect();
    sorted.sort_by(|a, b| a.delivery_address.cmp(&b.delivery_address));
    sorted.into_iter().map(|o| o.id).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(n: usize) -> Vec<Uuid> {
        (0..n).map(|_| Uuid::new_v4()).collect()
    }

    #[test]
    fn twelve_orders_three_drivers_limit_five() {
        let orders = ids(12);
        let drivers = ids(3);
        let routes = plan_batches(&orders, &drivers, 5);

        let sizes: Vec<usize> = routes.iter().map(|r| r.order_ids.len()).collect();
        assert_eq!(sizes, vec![5, 5, 2]);
        assert_eq!(routes[0].order_ids, orders[0..5].to_vec());
        assert_eq!(routes[2].order_ids, orders[10..12].to_vec());
        let route_drivers: Vec<Uuid> = routes.iter().map(|r| r.driver_id).collect();
        assert_eq!(route_drivers, drivers);
    }

    #[test]
    fn runs_out_of_drivers_first() {
        let routes = plan_batches(&ids(12), &ids(2), 5);
        assert_eq!(routes.len(), 2);
        assert_eq!(routes.iter().map(|r| r.order_ids.len()).sum::<usize>(), 10);
    }

    #[test]
    fn synthetic_estimates() {
        assert_eq!(estimated_distance_km(5), 10.0);
        assert_eq!(estimated_minutes(5), 33);
        assert_eq!(estimated_minutes(1), 5);
        assert_eq!(estimated_minutes(0), 0);
    }
}
