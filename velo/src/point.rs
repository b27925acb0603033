//! Planar points inside the region covered by the graph.

use std::fmt;

use crate::ch1903;
use crate::error::{Result, VeloError};

/// Extent of the region covered by the graph, in CH1903+ grid meters.
pub mod bounds {
    /// Smallest east coordinate.
    pub const MIN_E: f64 = 2_485_000.0;
    /// Largest east coordinate.
    pub const MAX_E: f64 = 2_834_000.0;
    /// Smallest north coordinate.
    pub const MIN_N: f64 = 1_075_000.0;
    /// Largest north coordinate.
    pub const MAX_N: f64 = 1_296_000.0;
    /// East-west extent in meters.
    pub const WIDTH: f64 = MAX_E - MIN_E;
    /// North-south extent in meters.
    pub const HEIGHT: f64 = MAX_N - MIN_N;

    /// Whether `(e, n)` lies inside the region, borders included.
    pub fn contains(e: f64, n: f64) -> bool {
        (MIN_E..=MAX_E).contains(&e) && (MIN_N..=MAX_N).contains(&n)
    }
}

/// An `(east, north)` coordinate pair inside [`bounds`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    e: f64,
    n: f64,
}

impl Point {
    /// Create a point.
    ///
    /// # Errors
    ///
    /// Returns [`VeloError::OutOfBounds`] if the coordinates lie outside the
    /// covered region.
    pub fn new(e: f64, n: f64) -> Result<Self> {
        if bounds::contains(e, n) {
            Ok(Self { e, n })
        } else {
            Err(VeloError::OutOfBounds { e, n })
        }
    }

    /// Create a point from WGS84 coordinates given in degrees.
    pub fn from_wgs84(lon_deg: f64, lat_deg: f64) -> Result<Self> {
        let (lon, lat) = (lon_deg.to_radians(), lat_deg.to_radians());
        Self::new(ch1903::e(lon, lat), ch1903::n(lon, lat))
    }

    /// Create a point from coordinates already known to be in bounds, such as
    /// decoded node positions or interpolations between two valid points.
    pub(crate) fn from_trusted(e: f64, n: f64) -> Self {
        debug_assert!(bounds::contains(e, n), "point ({e}, {n}) out of bounds");
        Self { e, n }
    }

    /// East coordinate in meters.
    pub fn e(&self) -> f64 {
        self.e
    }

    /// North coordinate in meters.
    pub fn n(&self) -> f64 {
        self.n
    }

    pub fn squared_distance_to(&self, that: &Point) -> f64 {
        let (de, dn) = (that.e - self.e, that.n - self.n);
        de.mul_add(de, dn * dn)
    }

    pub fn distance_to(&self, that: &Point) -> f64 {
        self.squared_distance_to(that).sqrt()
    }

    /// WGS84 longitude in radians.
    pub fn lon(&self) -> f64 {
        ch1903::lon(self.e, self.n)
    }

    /// WGS84 latitude in radians.
    pub fn lat(&self) -> f64 {
        ch1903::lat(self.e, self.n)
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.1}, {:.1})", self.e, self.n)
    }
}

#[cfg(test)]
mod tests {
    use super::bounds::*;
    use super::*;

    #[test]
    fn test_point_in_bounds() {
        let p = Point::new(MIN_E + 100.0, MIN_N + 50.0).unwrap();
        assert_eq!(p.e(), MIN_E + 100.0);
        assert_eq!(p.n(), MIN_N + 50.0);

        assert!(Point::new(MIN_E, MIN_N).is_ok());
        assert!(Point::new(MAX_E, MAX_N).is_ok());
    }

    #[test]
    fn test_point_out_of_bounds() {
        let result = Point::new(MIN_E - 1.0, MIN_N);
        match result {
            Err(VeloError::OutOfBounds { e, n }) => {
                assert_eq!(e, MIN_E - 1.0);
                assert_eq!(n, MIN_N);
            }
            other => panic!("Expected OutOfBounds, got {other:?}"),
        }
        assert!(Point::new(MIN_E, MAX_N + 0.5).is_err());
        assert!(Point::new(f64::NAN, MIN_N).is_err());
    }

    #[test]
    fn test_distances() {
        let a = Point::new(MIN_E, MIN_N).unwrap();
        let b = Point::new(MIN_E + 3.0, MIN_N + 4.0).unwrap();
        assert_eq!(a.squared_distance_to(&b), 25.0);
        assert_eq!(a.distance_to(&b), 5.0);
        assert_eq!(b.distance_to(&a), 5.0);
    }

    #[test]
    fn test_wgs84_round_trip() {
        let p = Point::from_wgs84(7.4474, 46.9480).unwrap(); // Bern
        assert!((p.lon().to_degrees() - 7.4474).abs() < 1e-4);
        assert!((p.lat().to_degrees() - 46.9480).abs() < 1e-4);
    }

    #[test]
    fn test_wgs84_outside_region() {
        assert!(Point::from_wgs84(2.35, 48.85).is_err()); // Paris
    }
}
