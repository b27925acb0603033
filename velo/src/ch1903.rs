//! Approximate conversions between WGS84 and the Swiss CH1903+ (LV95) grid.
//!
//! Angles are in radians, grid coordinates in meters.

/// East coordinate of the point at `(lon, lat)`.
pub fn e(lon: f64, lat: f64) -> f64 {
    let (lambda, phi) = auxiliary_angles(lon, lat);
    2_600_072.37 + 211_455.93 * lambda
        - 10_938.51 * lambda * phi
        - 0.36 * lambda * phi * phi
        - 44.54 * lambda.powi(3)
}

/// North coordinate of the point at `(lon, lat)`.
pub fn n(lon: f64, lat: f64) -> f64 {
    let (lambda, phi) = auxiliary_angles(lon, lat);
    1_200_147.07 + 308_807.95 * phi + 3_745.25 * lambda * lambda + 76.63 * phi * phi
        - 194.56 * lambda * lambda * phi
        + 119.79 * phi.powi(3)
}

/// Longitude of the point at `(e, n)`.
pub fn lon(e: f64, n: f64) -> f64 {
    let (x, y) = auxiliary_grid(e, n);
    let lambda =
        2.677_909_4 + 4.728_982 * x + 0.791_484 * x * y + 0.130_6 * x * y * y - 0.043_6 * x.powi(3);
    (lambda * 100.0 / 36.0).to_radians()
}

/// Latitude of the point at `(e, n)`.
pub fn lat(e: f64, n: f64) -> f64 {
    let (x, y) = auxiliary_grid(e, n);
    let phi = 16.902_389_2 + 3.238_272 * y
        - 0.270_978 * x * x
        - 0.002_528 * y * y
        - 0.044_7 * x * x * y
        - 0.014_0 * y.powi(3);
    (phi * 100.0 / 36.0).to_radians()
}

fn auxiliary_angles(lon: f64, lat: f64) -> (f64, f64) {
    let lambda = 1e-4 * (3_600.0 * lon.to_degrees() - 26_782.5);
    let phi = 1e-4 * (3_600.0 * lat.to_degrees() - 169_028.66);
    (lambda, phi)
}

fn auxiliary_grid(e: f64, n: f64) -> (f64, f64) {
    (1e-6 * (e - 2_600_000.0), 1e-6 * (n - 1_200_000.0))
}
