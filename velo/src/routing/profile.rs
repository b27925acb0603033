//! Elevation profiles of routes.

use crate::math::{interpolate, Sampled};
use crate::routing::route::Route;

/// Elevation along a route, sampled at regular intervals.
#[derive(Debug, Clone)]
pub struct ElevationProfile {
    length: f64,
    samples: Sampled,
    min_elevation: f64,
    max_elevation: f64,
    total_ascent: f64,
    total_descent: f64,
}

impl ElevationProfile {
    /// A profile of `length` meters through evenly spaced `samples`.
    ///
    /// # Panics
    ///
    /// Panics if `length` is not positive or fewer than two samples are
    /// given.
    pub fn new(length: f64, samples: Vec<f32>) -> Self {
        assert!(length > 0.0, "profile length must be positive");
        assert!(samples.len() >= 2, "a profile needs at least 2 samples");

        let (mut total_ascent, mut total_descent) = (0.0, 0.0);
        for pair in samples.windows(2) {
            let delta = (pair[1] - pair[0]) as f64;
            if delta > 0.0 {
                total_ascent += delta;
            } else {
                total_descent -= delta;
            }
        }
        let min_elevation = samples.iter().copied().fold(f32::INFINITY, f32::min) as f64;
        let max_elevation = samples.iter().copied().fold(f32::NEG_INFINITY, f32::max) as f64;

        Self {
            length,
            samples: Sampled::new(samples, length),
            min_elevation,
            max_elevation,
            total_ascent,
            total_descent,
        }
    }

    pub fn length(&self) -> f64 {
        self.length
    }

    pub fn min_elevation(&self) -> f64 {
        self.min_elevation
    }

    pub fn max_elevation(&self) -> f64 {
        self.max_elevation
    }

    /// Sum of all positive elevation differences, in meters.
    pub fn total_ascent(&self) -> f64 {
        self.total_ascent
    }

    /// Sum of all negative elevation differences, as a positive number of
    /// meters.
    pub fn total_descent(&self) -> f64 {
        self.total_descent
    }

    /// Elevation at `position`, constant beyond either end of the profile.
    pub fn elevation_at(&self, position: f64) -> f64 {
        self.samples.at(position)
    }

    pub fn samples(&self) -> &[f32] {
        self.samples.samples()
    }
}

/// Sample the elevation of `route` at most every `max_step_length` meters.
///
/// Stretches where the route has no elevation data take the value of the
/// nearest sample before the first known one and after the last, and are
/// interpolated linearly in between. A route without any elevation data gets
/// a flat profile at 0 m.
///
/// # Panics
///
/// Panics if `max_step_length` is not positive, or if the route has zero
/// length.
pub fn elevation_profile(route: &Route, max_step_length: f64) -> ElevationProfile {
    assert!(max_step_length > 0.0, "step length must be positive");

    let length = route.length();
    let intervals = (length / max_step_length).ceil();
    let step = length.ceil() / intervals;
    let sample_count = intervals as usize + 1;

    let mut samples: Vec<Option<f32>> = (0..sample_count)
        .map(|i| route.elevation_at(i as f64 * step).map(|e| e as f32))
        .collect();
    fill_gaps(&mut samples);

    ElevationProfile::new(
        length,
        samples.into_iter().map(|s| s.unwrap_or(0.0)).collect(),
    )
}

fn fill_gaps(samples: &mut [Option<f32>]) {
    let known = |(i, sample): (usize, &Option<f32>)| sample.map(|e| (i, e));
    let Some((first, head)) = samples.iter().enumerate().find_map(known) else {
        return;
    };
    let (last, tail) = samples
        .iter()
        .enumerate()
        .rev()
        .find_map(known)
        .unwrap_or((first, head));

    samples[..first].fill(Some(head));
    samples[last + 1..].fill(Some(tail));

    let (mut previous, mut from) = (first, head);
    for i in first + 1..=last {
        let Some(to) = samples[i] else {
            continue;
        };
        let gap = i - previous;
        for j in 1..gap {
            let x = j as f64 / gap as f64;
            samples[previous + j] = Some(interpolate(from as f64, to as f64, x) as f32);
        }
        (previous, from) = (i, to);
    }
}
