//! Points on a route matched to a reference point.

use crate::point::Point;

/// The point of a route closest to some reference point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RoutePoint {
    /// The closest point, `None` only for [`RoutePoint::NONE`].
    pub point: Option<Point>,
    /// Position of the point along the route, in meters.
    pub position: f64,
    /// Distance between the point and the reference, in meters.
    pub distance_to_reference: f64,
}

impl RoutePoint {
    /// Identity of [`RoutePoint::min`]: no point, infinitely far away.
    pub const NONE: RoutePoint = RoutePoint {
        point: None,
        position: f64::NAN,
        distance_to_reference: f64::INFINITY,
    };

    pub fn new(point: Point, position: f64, distance_to_reference: f64) -> Self {
        Self {
            point: Some(point),
            position,
            distance_to_reference,
        }
    }

    pub fn is_none(&self) -> bool {
        self.point.is_none()
    }

    pub fn with_position_shifted_by(self, offset: f64) -> Self {
        Self {
            position: self.position + offset,
            ..self
        }
    }

    /// The closer of the two points, `self` on a tie.
    pub fn min(self, that: RoutePoint) -> Self {
        if self.distance_to_reference <= that.distance_to_reference {
            self
        } else {
            that
        }
    }

    /// Like [`min`](Self::min), building the other point only if it wins.
    pub fn min_with(self, point: Point, position: f64, distance_to_reference: f64) -> Self {
        if self.distance_to_reference <= distance_to_reference {
            self
        } else {
            RoutePoint::new(point, position, distance_to_reference)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::point::bounds;

    fn point(de: f64) -> Point {
        Point::new(bounds::MIN_E + de, bounds::MIN_N).unwrap()
    }

    #[test]
    fn test_none_is_identity() {
        let p = RoutePoint::new(point(1.0), 5.0, 12.0);
        assert_eq!(RoutePoint::NONE.min(p), p);
        assert_eq!(p.min(RoutePoint::NONE), p);
        assert!(RoutePoint::NONE.is_none());
        assert!(RoutePoint::NONE.with_position_shifted_by(3.0).is_none());
    }

    #[test]
    fn test_min_keeps_self_on_tie() {
        let a = RoutePoint::new(point(1.0), 5.0, 12.0);
        let b = RoutePoint::new(point(2.0), 6.0, 12.0);
        assert_eq!(a.min(b), a);
        assert_eq!(b.min(a), b);
        assert_eq!(a.min_with(point(3.0), 1.0, 12.0), a);
        assert_eq!(
            a.min_with(point(3.0), 1.0, 11.0),
            RoutePoint::new(point(3.0), 1.0, 11.0)
        );
    }

    #[test]
    fn test_shift() {
        let p = RoutePoint::new(point(1.0), 5.0, 12.0).with_position_shifted_by(100.0);
        assert_eq!(p.position, 105.0);
        assert_eq!(p.distance_to_reference, 12.0);
    }
}
