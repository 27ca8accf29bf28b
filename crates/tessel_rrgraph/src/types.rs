//! Closed enumerations describing routing nodes and tile geometry.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The kind of a routing-resource node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RrNodeType {
    /// A horizontal channel segment.
    ChanX,
    /// A vertical channel segment.
    ChanY,
    /// A logic-tile output pin.
    Opin,
    /// A logic-tile input pin.
    Ipin,
}

impl RrNodeType {
    /// Returns whether this is a channel (wire) node.
    pub fn is_channel(self) -> bool {
        matches!(self, RrNodeType::ChanX | RrNodeType::ChanY)
    }

    /// Returns whether this is a pin node.
    pub fn is_pin(self) -> bool {
        matches!(self, RrNodeType::Opin | RrNodeType::Ipin)
    }

    /// Stable numeric code, used when hashing structure.
    pub fn code(self) -> usize {
        match self {
            RrNodeType::ChanX => 0,
            RrNodeType::ChanY => 1,
            RrNodeType::Opin => 2,
            RrNodeType::Ipin => 3,
        }
    }
}

impl fmt::Display for RrNodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RrNodeType::ChanX => write!(f, "CHANX"),
            RrNodeType::ChanY => write!(f, "CHANY"),
            RrNodeType::Opin => write!(f, "OPIN"),
            RrNodeType::Ipin => write!(f, "IPIN"),
        }
    }
}

/// The signal direction of a channel track along its axis.
///
/// Pins have no direction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Signal travels towards increasing coordinates.
    Increasing,
    /// Signal travels towards decreasing coordinates.
    Decreasing,
    /// Not a directed track.
    #[default]
    None,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Increasing => write!(f, "inc"),
            Direction::Decreasing => write!(f, "dec"),
            Direction::None => write!(f, "none"),
        }
    }
}

/// One of the four sides of a tile, in canonical processing order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    /// Towards increasing `y`.
    Top,
    /// Towards increasing `x`.
    Right,
    /// Towards decreasing `y`.
    Bottom,
    /// Towards decreasing `x`.
    Left,
}

impl Side {
    /// All sides in canonical order: top, right, bottom, left.
    pub const ALL: [Side; 4] = [Side::Top, Side::Right, Side::Bottom, Side::Left];

    /// Position of this side in [`Side::ALL`].
    pub fn index(self) -> usize {
        match self {
            Side::Top => 0,
            Side::Right => 1,
            Side::Bottom => 2,
            Side::Left => 3,
        }
    }

    /// The side facing this one.
    pub fn opposite(self) -> Side {
        match self {
            Side::Top => Side::Bottom,
            Side::Right => Side::Left,
            Side::Bottom => Side::Top,
            Side::Left => Side::Right,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Top => write!(f, "top"),
            Side::Right => write!(f, "right"),
            Side::Bottom => write!(f, "bottom"),
            Side::Left => write!(f, "left"),
        }
    }
}
