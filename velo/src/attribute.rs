//! OpenStreetMap attributes attached to graph edges.
//!
//! Each edge references an [`AttributeSet`]: a 64-bit mask with one bit per
//! [`Attribute`], indexed by the attribute's position in [`Attribute::ALL`].

use std::fmt;

use crate::error::{Result, VeloError};

macro_rules! attributes {
    ($($variant:ident => ($key:literal, $value:literal)),+ $(,)?) => {
        /// An OSM `key=value` tag known to the graph.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        #[repr(u8)]
        pub enum Attribute {
            $($variant),+
        }

        impl Attribute {
            /// All attributes, ordered by bit position.
            pub const ALL: &'static [Attribute] = &[$(Attribute::$variant),+];

            /// Number of known attributes.
            pub const COUNT: usize = Self::ALL.len();

            /// The OSM key, e.g. `highway`.
            pub fn key(self) -> &'static str {
                match self {
                    $(Attribute::$variant => $key),+
                }
            }

            /// The OSM value, e.g. `cycleway`.
            pub fn value(self) -> &'static str {
                match self {
                    $(Attribute::$variant => $value),+
                }
            }
        }
    };
}

attributes! {
    HighwayService => ("highway", "service"),
    HighwayTrack => ("highway", "track"),
    HighwayResidential => ("highway", "residential"),
    HighwayFootway => ("highway", "footway"),
    HighwayPath => ("highway", "path"),
    HighwayUnclassified => ("highway", "unclassified"),
    HighwayTertiary => ("highway", "tertiary"),
    HighwaySecondary => ("highway", "secondary"),
    HighwaySteps => ("highway", "steps"),
    HighwayPrimary => ("highway", "primary"),
    HighwayCycleway => ("highway", "cycleway"),
    HighwayMotorway => ("highway", "motorway"),
    HighwayTrunk => ("highway", "trunk"),
    HighwayMotorwayLink => ("highway", "motorway_link"),
    HighwayTertiaryLink => ("highway", "tertiary_link"),
    HighwaySecondaryLink => ("highway", "secondary_link"),
    HighwayPrimaryLink => ("highway", "primary_link"),
    HighwayLivingStreet => ("highway", "living_street"),
    HighwayTrunkLink => ("highway", "trunk_link"),
    HighwayPedestrian => ("highway", "pedestrian"),
    TracktypeGrade1 => ("tracktype", "grade1"),
    TracktypeGrade2 => ("tracktype", "grade2"),
    TracktypeGrade3 => ("tracktype", "grade3"),
    TracktypeGrade4 => ("tracktype", "grade4"),
    TracktypeGrade5 => ("tracktype", "grade5"),
    SurfaceAsphalt => ("surface", "asphalt"),
    SurfaceUnpaved => ("surface", "unpaved"),
    SurfaceGravel => ("surface", "gravel"),
    SurfacePaved => ("surface", "paved"),
    SurfaceGround => ("surface", "ground"),
    SurfaceCompacted => ("surface", "compacted"),
    SurfaceGrass => ("surface", "grass"),
    SurfaceDirt => ("surface", "dirt"),
    SurfaceFineGravel => ("surface", "fine_gravel"),
    SurfacePavingStones => ("surface", "paving_stones"),
    SurfaceSett => ("surface", "sett"),
    SurfaceConcrete => ("surface", "concrete"),
    SurfaceWood => ("surface", "wood"),
    SurfaceSand => ("surface", "sand"),
    SurfaceCobblestone => ("surface", "cobblestone"),
    OnewayYes => ("oneway", "yes"),
    OnewayMinusOne => ("oneway", "-1"),
    OnewayBicycleYes => ("oneway:bicycle", "yes"),
    OnewayBicycleNo => ("oneway:bicycle", "no"),
    VehicleNo => ("vehicle", "no"),
    VehiclePrivate => ("vehicle", "private"),
    AccessNo => ("access", "no"),
    AccessPrivate => ("access", "private"),
    BicycleYes => ("bicycle", "yes"),
    BicycleNo => ("bicycle", "no"),
    BicycleDesignated => ("bicycle", "designated"),
    BicycleDismount => ("bicycle", "dismount"),
    BicycleUseSidepath => ("bicycle", "use_sidepath"),
    BicyclePermissive => ("bicycle", "permissive"),
    BicyclePrivate => ("bicycle", "private"),
    CyclewayOpposite => ("cycleway", "opposite"),
    CyclewayOppositeLane => ("cycleway", "opposite_lane"),
    CyclewayOppositeTrack => ("cycleway", "opposite_track"),
    IcnYes => ("icn", "yes"),
    NcnYes => ("ncn", "yes"),
    RcnYes => ("rcn", "yes"),
    LcnYes => ("lcn", "yes"),
}

impl Attribute {
    /// The `key=value` form of the attribute.
    pub fn key_value(self) -> String {
        format!("{}={}", self.key(), self.value())
    }

    fn mask(self) -> u64 {
        1 << self as u8
    }
}

/// A set of [`Attribute`]s packed into a 64-bit mask.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct AttributeSet {
    bits: u64,
}

impl AttributeSet {
    /// The empty set.
    pub const EMPTY: AttributeSet = AttributeSet { bits: 0 };

    /// Wrap a raw mask.
    ///
    /// # Errors
    ///
    /// Returns [`VeloError::InvalidAttributeSet`] if a bit at or above
    /// [`Attribute::COUNT`] is set.
    pub fn new(bits: u64) -> Result<Self> {
        if bits >> Attribute::COUNT != 0 {
            return Err(VeloError::InvalidAttributeSet { bits });
        }
        Ok(Self { bits })
    }

    /// The set containing exactly the given attributes.
    pub const fn of(attributes: &[Attribute]) -> Self {
        let mut bits = 0;
        let mut i = 0;
        while i < attributes.len() {
            bits |= 1 << attributes[i] as u8;
            i += 1;
        }
        Self { bits }
    }

    pub fn bits(&self) -> u64 {
        self.bits
    }

    pub fn contains(&self, attribute: Attribute) -> bool {
        self.bits & attribute.mask() != 0
    }

    /// Whether the two sets share at least one attribute.
    pub fn intersects(&self, that: &AttributeSet) -> bool {
        self.bits & that.bits != 0
    }

    /// Iterate over the attributes in the set, in bit order.
    pub fn iter(&self) -> impl Iterator<Item = Attribute> + '_ {
        Attribute::ALL.iter().copied().filter(|a| self.contains(*a))
    }
}

impl fmt::Display for AttributeSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (i, attribute) in self.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{}={}", attribute.key(), attribute.value())?;
        }
        f.write_str("}")
    }
}
