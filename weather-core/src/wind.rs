use std::fmt;

use serde::{Serialize, Serializer};

/// One of the eight principal compass points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cardinal {
    North,
    NorthEast,
    East,
    SouthEast,
    South,
    SouthWest,
    West,
    NorthWest,
}

impl Cardinal {
    /// Clockwise from north, 45° apart.
    pub const ALL: [Cardinal; 8] = [
        Cardinal::North,
        Cardinal::NorthEast,
        Cardinal::East,
        Cardinal::SouthEast,
        Cardinal::South,
        Cardinal::SouthWest,
        Cardinal::West,
        Cardinal::NorthWest,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Cardinal::North => "North",
            Cardinal::NorthEast => "North-East",
            Cardinal::East => "East",
            Cardinal::SouthEast => "South-East",
            Cardinal::South => "South",
            Cardinal::SouthWest => "South-West",
            Cardinal::West => "West",
            Cardinal::NorthWest => "North-West",
        }
    }
}

impl fmt::Display for Cardinal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Cardinal {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Map a compass bearing to the nearest of the eight cardinal points.
///
/// Any real bearing is accepted; values outside `[0, 360)` wrap around.
pub fn cardinal_for(degrees: f64) -> Cardinal {
    let sector = ((degrees + 22.5) / 45.0).floor() as i64;
    Cardinal::ALL[sector.rem_euclid(8) as usize]
}
