use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumIter, EnumString, FromRepr};

// The tags are the ones used by the directions service and the order is the
// code the display device understands, so neither should be changed.
#[derive(
    Copy,
    Clone,
    Debug,
    PartialEq,
    Eq,
    Hash,
    Display,
    EnumString,
    AsRefStr,
    EnumIter,
    FromRepr,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
#[repr(u8)]
pub enum Maneuver {
    NoDirection = 0,
    TurnSharpLeft = 1,
    UturnRight = 2,
    TurnSlightRight = 3,
    Merge = 4,
    RoundaboutLeft = 5,
    RoundaboutRight = 6,
    UturnLeft = 7,
    TurnSlightLeft = 8,
    TurnLeft = 9,
    RampRight = 10,
    TurnRight = 11,
    ForkRight = 12,
    Straight = 13,
    ForkLeft = 14,
    FerryTrain = 15,
    TurnSharpRight = 16,
    RampLeft = 17,
    Ferry = 18,
    Finish = 19,
}

impl Maneuver {
    /// Decodes the optional maneuver tag of a step. Steps without a tag are
    /// plain "keep going" steps; unknown tags are logged and dropped.
    pub fn from_tag(tag: Option<&str>) -> Maneuver {
        match tag {
            None => Maneuver::NoDirection,
            Some(tag) => tag.parse().unwrap_or_else(|_| {
                warn!("unknown maneuver tag `{tag}`");
                Maneuver::NoDirection
            }),
        }
    }

    pub fn to_int(&self) -> u8 {
        *self as u8
    }

    pub fn from_int(i: u8) -> Option<Maneuver> {
        Maneuver::from_repr(i)
    }

    pub fn is_roundabout(&self) -> bool {
        matches!(self, Maneuver::RoundaboutLeft | Maneuver::RoundaboutRight)
    }
}
