//! Coordinates, city bounds and great-circle distance.

use serde::{Deserialize, Serialize};

use crate::error::{EvError, Result};

/// Mean Earth radius used by the Haversine formula.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// A (latitude, longitude) pair in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinate {
    #[must_use]
    pub const fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Great-circle distance to `other` in kilometers.
    #[must_use]
    pub fn distance_km(&self, other: &Self) -> f64 {
        haversine_km(*self, *other)
    }
}

/// Haversine great-circle distance between two coordinates, in kilometers.
///
/// The operating region never crosses the antimeridian or a pole, so no
/// special handling is done for either.
#[must_use]
pub fn haversine_km(a: Coordinate, b: Coordinate) -> f64 {
    let lat1 = a.lat.to_radians();
    let lat2 = b.lat.to_radians();
    let dlat = (b.lat - a.lat).to_radians();
    let dlon = (b.lon - a.lon).to_radians();

    let h = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
    let h = h.min(1.0);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());
    EARTH_RADIUS_KM * c
}

/// Axis-aligned city bounding box in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lon: f64,
    pub max_lon: f64,
}

impl BoundingBox {
    /// Build a bounding box, rejecting empty or non-finite extents.
    pub fn new(min_lat: f64, max_lat: f64, min_lon: f64, max_lon: f64) -> Result<Self> {
        let bounds = Self {
            min_lat,
            max_lat,
            min_lon,
            max_lon,
        };
        bounds.validate()?;
        Ok(bounds)
    }

    pub fn validate(&self) -> Result<()> {
        let fields = [self.min_lat, self.max_lat, self.min_lon, self.max_lon];
        if fields.iter().any(|value| !value.is_finite()) {
            return Err(EvError::Config(format!(
                "city bounds must be finite: {self:?}"
            )));
        }
        if self.min_lat >= self.max_lat || self.min_lon >= self.max_lon {
            return Err(EvError::Config(format!(
                "city bounds are empty (min must be below max): {self:?}"
            )));
        }
        Ok(())
    }

    #[must_use]
    pub fn lat_span(&self) -> f64 {
        self.max_lat - self.min_lat
    }

    #[must_use]
    pub fn lon_span(&self) -> f64 {
        self.max_lon - self.min_lon
    }

    #[must_use]
    pub fn contains(&self, point: Coordinate) -> bool {
        (self.min_lat..=self.max_lat).contains(&point.lat)
            && (self.min_lon..=self.max_lon).contains(&point.lon)
    }

    /// Pull `point` back inside the box on each axis independently.
    #[must_use]
    pub fn clamp(&self, point: Coordinate) -> Coordinate {
        Coordinate {
            lat: point.lat.clamp(self.min_lat, self.max_lat),
            lon: point.lon.clamp(self.min_lon, self.max_lon),
        }
    }
}
