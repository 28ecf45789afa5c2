use serde::{Deserialize, Serialize};

use crate::SeededRng;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint { pub lat: f64, pub lng: f64 }

/// Boston, MA. Used when the caller has no better location hint.
pub const DEFAULT_CENTER: GeoPoint = GeoPoint { lat: 42.3601, lng: -71.0589 };
/// Half-width of the square (in degrees) unlocated candidates are scattered over.
pub const DEFAULT_JITTER_DEG: f64 = 0.02;

/// Returns the candidate's own coordinates when both are present and finite,
/// otherwise a point within `jitter_deg` of `center` drawn from `rng`.
pub fn resolve_position(lat: Option<f64>, lng: Option<f64>, center: GeoPoint, jitter_deg: f64, rng: &mut SeededRng) -> GeoPoint {
    match (lat, lng) {
        (Some(lat), Some(lng)) if lat.is_finite() && lng.is_finite() => GeoPoint { lat, lng },
        _ => {
            let j = jitter_deg.abs();
            GeoPoint { lat: center.lat + rng.range(-j, j), lng: center.lng + rng.range(-j, j) }
        }
    }
}

#[cfg(test)]
mod tests { use super::*;
    #[test] fn known_coordinates_pass_through() { let mut r = SeededRng::new(1); let p = resolve_position(Some(42.38), Some(-71.09), DEFAULT_CENTER, DEFAULT_JITTER_DEG, &mut r); assert_eq!(p, GeoPoint { lat: 42.38, lng: -71.09 }); }
    #[test] fn missing_or_nan_coordinates_jitter_near_center() { let mut r = SeededRng::new(9); for (lat, lng) in [(None, None), (Some(42.0), None), (Some(f64::NAN), Some(-71.0))] { let p = resolve_position(lat, lng, DEFAULT_CENTER, DEFAULT_JITTER_DEG, &mut r); assert!((p.lat - DEFAULT_CENTER.lat).abs() <= DEFAULT_JITTER_DEG); assert!((p.lng - DEFAULT_CENTER.lng).abs() <= DEFAULT_JITTER_DEG); } }
    #[test] fn pinned_seed_reproduces_placement() { let place = |seed| { let mut r = SeededRng::new(seed); (0..4).map(|_| resolve_position(None, None, DEFAULT_CENTER, 0.05, &mut r)).collect::<Vec<_>>() }; assert_eq!(place(77), place(77)); assert_ne!(place(77), place(78)); }
}
