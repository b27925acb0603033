//! Edge cost functions.

use crate::attribute::{Attribute, AttributeSet};
use crate::graph::{EdgeId, Graph, NodeId};

/// Weighs edges during a route search.
///
/// The cost of taking `edge_id` out of `node_id` is the edge length times
/// the returned factor. An infinite factor forbids the edge.
///
/// [`RouteComputer`](crate::routing::RouteComputer) guides its search by the
/// straight-line distance to the destination, which never overestimates the
/// remaining cost only while every factor is at least 1. Factors below 1 are
/// accepted but may produce routes that are not of minimum cost.
pub trait CostFunction {
    fn cost_factor(&self, node_id: NodeId, edge_id: EdgeId) -> f64;
}

impl<F> CostFunction for F
where
    F: Fn(NodeId, EdgeId) -> f64,
{
    fn cost_factor(&self, node_id: NodeId, edge_id: EdgeId) -> f64 {
        self(node_id, edge_id)
    }
}

/// Every edge costs its length: plain shortest path.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnitCost;

impl CostFunction for UnitCost {
    fn cost_factor(&self, _node_id: NodeId, _edge_id: EdgeId) -> f64 {
        1.0
    }
}

const NEVER: AttributeSet = AttributeSet::of(&[
    Attribute::HighwayMotorway,
    Attribute::HighwayMotorwayLink,
    Attribute::HighwaySteps,
    Attribute::BicycleNo,
    Attribute::BicyclePrivate,
]);

const RESTRICTED: AttributeSet = AttributeSet::of(&[
    Attribute::AccessNo,
    Attribute::AccessPrivate,
    Attribute::VehicleNo,
    Attribute::VehiclePrivate,
]);

const BICYCLE_ALLOWED: AttributeSet = AttributeSet::of(&[
    Attribute::BicycleYes,
    Attribute::BicycleDesignated,
    Attribute::BicyclePermissive,
]);

const ONEWAY: AttributeSet = AttributeSet::of(&[Attribute::OnewayYes, Attribute::OnewayBicycleYes]);

const CONTRAFLOW_ALLOWED: AttributeSet = AttributeSet::of(&[
    Attribute::OnewayBicycleNo,
    Attribute::CyclewayOpposite,
    Attribute::CyclewayOppositeLane,
    Attribute::CyclewayOppositeTrack,
]);

const CYCLE_FRIENDLY: AttributeSet = AttributeSet::of(&[
    Attribute::HighwayCycleway,
    Attribute::BicycleDesignated,
    Attribute::IcnYes,
    Attribute::NcnYes,
    Attribute::RcnYes,
    Attribute::LcnYes,
]);

const BUSY_ROADS: AttributeSet = AttributeSet::of(&[
    Attribute::HighwayTrunk,
    Attribute::HighwayTrunkLink,
    Attribute::HighwayPrimary,
    Attribute::HighwayPrimaryLink,
]);

const SHARED_ROADS: AttributeSet = AttributeSet::of(&[
    Attribute::HighwaySecondary,
    Attribute::HighwaySecondaryLink,
]);

const ROUGH: AttributeSet = AttributeSet::of(&[
    Attribute::TracktypeGrade4,
    Attribute::TracktypeGrade5,
    Attribute::SurfaceSand,
    Attribute::SurfaceGrass,
    Attribute::SurfaceDirt,
    Attribute::SurfaceGround,
    Attribute::SurfaceCobblestone,
    Attribute::SurfaceSett,
]);

const PEDESTRIAN: AttributeSet = AttributeSet::of(&[
    Attribute::HighwayFootway,
    Attribute::HighwayPedestrian,
    Attribute::BicycleDismount,
]);

/// Cost model for a city bike.
///
/// Forbids motorways, steps, ways closed to bicycles and riding against
/// one-way traffic. Cycleways and signposted cycle routes cost their length;
/// busy roads, rough surfaces and pedestrian areas cost more. No factor is
/// below one, so the straight-line search heuristic stays admissible.
#[derive(Debug, Clone, Copy)]
pub struct CityBikeCost<'g> {
    graph: &'g Graph,
}

impl<'g> CityBikeCost<'g> {
    pub fn new(graph: &'g Graph) -> Self {
        Self { graph }
    }

    /// Cost factor of an edge with the given attributes.
    pub fn factor_for(attributes: AttributeSet, inverted: bool) -> f64 {
        if attributes.intersects(&NEVER) {
            return f64::INFINITY;
        }
        if attributes.intersects(&RESTRICTED) && !attributes.intersects(&BICYCLE_ALLOWED) {
            return f64::INFINITY;
        }
        if !attributes.intersects(&CONTRAFLOW_ALLOWED) {
            let against_oneway = if inverted {
                attributes.intersects(&ONEWAY)
            } else {
                attributes.contains(Attribute::OnewayMinusOne)
            };
            if against_oneway {
                return f64::INFINITY;
            }
        }

        if attributes.intersects(&CYCLE_FRIENDLY) {
            return 1.0;
        }

        let mut factor = 1.0;
        if attributes.intersects(&BUSY_ROADS) {
            factor *= 3.0;
        } else if attributes.intersects(&SHARED_ROADS) {
            factor *= 1.5;
        }
        if attributes.intersects(&ROUGH) {
            factor *= 2.0;
        }
        if attributes.intersects(&PEDESTRIAN) && !attributes.intersects(&BICYCLE_ALLOWED) {
            factor *= 2.0;
        }
        factor
    }
}

impl CostFunction for CityBikeCost<'_> {
    fn cost_factor(&self, _node_id: NodeId, edge_id: EdgeId) -> f64 {
        Self::factor_for(
            self.graph.edge_attributes(edge_id),
            self.graph.edge_is_inverted(edge_id),
        )
    }
}
