//! Great-circle distance kernel and unit handling.
//!
//! All internal distances are kilometres; conversion to other units happens
//! once, at output formatting time, through a fixed factor table.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Earth mean radius in kilometres (IUGG mean radius).
pub const EARTH_RADIUS_KM: f64 = 6371.0088;

/// A point on the earth in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Construct a coordinate, rejecting out-of-range values.
    pub fn checked(latitude: f64, longitude: f64) -> Result<Self> {
        let coordinate = Self::new(latitude, longitude);
        coordinate.check()?;
        Ok(coordinate)
    }

    /// Validate the latitude/longitude ranges.
    pub fn check(&self) -> Result<()> {
        if !(-90.0..=90.0).contains(&self.latitude) || !(-180.0..=180.0).contains(&self.longitude)
        {
            return Err(Error::InvalidCoordinate {
                latitude: self.latitude,
                longitude: self.longitude,
            });
        }
        Ok(())
    }

    /// Project onto the unit sphere. Chord distances between unit vectors are
    /// monotone in angular separation, which makes them safe for
    /// nearest-neighbour comparisons across the antimeridian and at the poles.
    pub(crate) fn to_unit_xyz(self) -> [f64; 3] {
        let lat = self.latitude.to_radians();
        let lon = self.longitude.to_radians();
        let cos_lat = lat.cos();
        [cos_lat * lon.cos(), cos_lat * lon.sin(), lat.sin()]
    }
}

/// Output units supported by the distance converter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum DistanceUnit {
    #[default]
    Km,
    M,
    Mi,
    Ft,
}

impl DistanceUnit {
    /// Units per kilometre.
    pub fn per_km(self) -> f64 {
        match self {
            DistanceUnit::Km => 1.0,
            DistanceUnit::M => 1000.0,
            DistanceUnit::Mi => 0.621371,
            DistanceUnit::Ft => 3280.84,
        }
    }
}

impl fmt::Display for DistanceUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value = match self {
            DistanceUnit::Km => "km",
            DistanceUnit::M => "m",
            DistanceUnit::Mi => "mi",
            DistanceUnit::Ft => "ft",
        };
        f.write_str(value)
    }
}

impl FromStr for DistanceUnit {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "km" => Ok(DistanceUnit::Km),
            "m" => Ok(DistanceUnit::M),
            "mi" => Ok(DistanceUnit::Mi),
            "ft" => Ok(DistanceUnit::Ft),
            other => Err(Error::InvalidRequest {
                reason: format!("unknown distance unit {other:?}; expected km, m, mi, or ft"),
            }),
        }
    }
}

/// Great-circle distance between two points in kilometres.
///
/// Identical inputs return exactly 0. The half-angle form is periodic in the
/// longitude delta, so crossings of the antimeridian need no special casing.
pub fn haversine(origin: Coordinate, destination: Coordinate) -> f64 {
    if origin == destination {
        return 0.0;
    }
    let lat1 = origin.latitude.to_radians();
    let lat2 = destination.latitude.to_radians();
    let dlat = lat2 - lat1;
    let dlon = (destination.longitude - origin.longitude).to_radians();

    let a = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
    // Clamp before asin: rounding can push antipodal inputs a hair above 1.
    2.0 * a.sqrt().min(1.0).asin() * EARTH_RADIUS_KM
}

/// Convert a distance between units through the kilometre factor table.
pub fn convert_distance(distance: f64, input: DistanceUnit, output: DistanceUnit) -> f64 {
    distance / input.per_km() * output.per_km()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_points_have_zero_distance() {
        let point = Coordinate::new(48.8566, 2.3522);
        assert_eq!(haversine(point, point), 0.0);
    }

    #[test]
    fn london_to_paris_is_about_344_km() {
        let london = Coordinate::new(51.5074, -0.1278);
        let paris = Coordinate::new(48.8566, 2.3522);
        let distance = haversine(london, paris);
        assert!((distance - 343.9).abs() < 1.0, "got {distance}");
    }

    #[test]
    fn antipodal_points_are_finite_and_near_half_circumference() {
        let a = Coordinate::new(0.0, 0.0);
        let b = Coordinate::new(0.0, 180.0);
        let distance = haversine(a, b);
        assert!(distance.is_finite());
        assert!((distance - std::f64::consts::PI * EARTH_RADIUS_KM).abs() < 1.0);
    }

    #[test]
    fn antimeridian_delta_uses_the_short_wrap() {
        let east = Coordinate::new(0.0, 179.0);
        let west = Coordinate::new(0.0, -179.0);
        let wrapped = haversine(east, west);
        let reference = haversine(Coordinate::new(0.0, 0.0), Coordinate::new(0.0, 2.0));
        assert!((wrapped - reference).abs() < 1e-9);
    }

    #[test]
    fn unit_conversion_round_trips() {
        let km = 123.456;
        let miles = convert_distance(km, DistanceUnit::Km, DistanceUnit::Mi);
        assert!((miles - km * 0.621371).abs() < 1e-9);
        let back = convert_distance(miles, DistanceUnit::Mi, DistanceUnit::Km);
        assert!((back - km).abs() < 1e-9);
    }

    #[test]
    fn coordinate_range_is_enforced() {
        assert!(Coordinate::checked(91.0, 0.0).is_err());
        assert!(Coordinate::checked(0.0, -180.5).is_err());
        assert!(Coordinate::checked(-90.0, 180.0).is_ok());
    }

    #[test]
    fn unit_parsing() {
        assert_eq!("mi".parse::<DistanceUnit>().unwrap(), DistanceUnit::Mi);
        assert!("parsec".parse::<DistanceUnit>().is_err());
    }
}
