//! Nearest-driver scoring.
//!
//! Distances use a flat-earth approximation (degrees scaled by 111 km), not
//! great-circle distance. It is only meant for ranking drivers a few
//! kilometres apart.

use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::{Coordinate, DriverLocation};

pub const KM_PER_DEGREE: f64 = 111.0;
pub const DEFAULT_DRIVER_RATING: f64 = 3.0;
const DISTANCE_WEIGHT: f64 = 0.6;
const RATING_WEIGHT: f64 = 0.4;

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct DriverCandidate {
    pub driver_id: Uuid,
    pub distance_km: f64,
    pub rating: f64,
    pub score: f64,
}

pub fn approx_distance_km(a: Coordinate, b: Coordinate) -> f64 {
    let d_lat = a.latitude - b.latitude;
    let d_lng = a.longitude - b.longitude;
    (d_lat * d_lat + d_lng * d_lng).sqrt() * KM_PER_DEGREE
}

/// Lower is better.
pub fn score(distance_km: f64, rating: f64) -> f64 {
    distance_km * DISTANCE_WEIGHT - rating * RATING_WEIGHT
}

/// Available drivers within `radius_km` of `origin`, in storage order.
pub fn nearby<'a>(
    origin: Coordinate,
    locations: &'a [DriverLocation],
    radius_km: f64,
) -> impl Iterator<Item = (&'a DriverLocation, f64)> + 'a {
    locations
        .iter()
        .filter(|loc| loc.is_available)
        .map(move |loc| (loc, approx_distance_km(origin, loc.coordinate())))
        .filter(move |(_, distance)| *distance <= radius_km)
}

/// Score every nearby driver, best first. Ties keep storage order.
///
/// `rating_of` returns the driver's recorded rating; a missing or zero
/// rating counts as [`DEFAULT_DRIVER_RATING`].
pub fn rank_candidates<F>(
    origin: Coordinate,
    locations: &[DriverLocation],
    radius_km: f64,
    rating_of: F,
) -> Vec<DriverCandidate>
where
    F: Fn(Uuid) -> Option<f64>,
{
    let mut candidates: Vec<DriverCandidate> = nearby(origin, locations, radius_km)
        .map(|(loc, distance_km)| {
            let rating = rating_of(loc.driver_id)
                .filter(|r| *r > 0.0)
                .unwrap_or(DEFAULT_DRIVER_RATING);
            DriverCandidate {
                driver_id: loc.driver_id,
                distance_km,
                rating,
                score: score(distance_km, rating),
            }
        })
        .collect();
    candidates.sort_by(|a, b| a.score.total_cmp(&b.score));
    candidates
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    const ORIGIN: Coordinate = Coordinate {
        latitude: 36.75,
        longitude: 3.05,
    };

    fn location_at_km(km: f64) -> DriverLocation {
        DriverLocation {
            driver_id: Uuid::new_v4(),
            latitude: ORIGIN.latitude + km / KM_PER_DEGREE,
            longitude: ORIGIN.longitude,
            is_available: true,
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn closer_better_rated_driver_wins() {
        let near = location_at_km(1.0);
        let far = location_at_km(2.0);
        let (near_id, far_id) = (near.driver_id, far.driver_id);
        let ratings = move |id: Uuid| {
            if id == near_id {
                Some(5.0)
            } else if id == far_id {
                Some(3.0)
            } else {
                None
            }
        };

        let ranked = rank_candidates(ORIGIN, &[far, near], 5.0, ratings);
        assert_eq!(ranked.len(), 2);
        assert_eq!(ranked[0].driver_id, near_id);
        assert!(ranked[0].score < ranked[1].score);
        assert!((ranked[0].score - (-1.4)).abs() < 1e-9);
        assert!(ranked[1].score.abs() < 1e-9);
    }

    #[test]
    fn drivers_outside_radius_or_unavailable_are_skipped() {
        let inside = location_at_km(4.0);
        let outside = location_at_km(6.0);
        let mut busy = location_at_km(0.5);
        busy.is_available = false;
        let inside_id = inside.driver_id;

        let ranked = rank_candidates(ORIGIN, &[inside, outside, busy], 5.0, |_| None);
        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].driver_id, inside_id);
        assert_eq!(ranked[0].rating, DEFAULT_DRIVER_RATING);
    }

    #[test]
    fn zero_rating_falls_back_to_default() {
        let loc = location_at_km(1.0);
        let ranked = rank_candidates(ORIGIN, &[loc], 5.0, |_| Some(0.0));
        assert_eq!(ranked[0].rating, DEFAULT_DRIVER_RATING);
    }
}
