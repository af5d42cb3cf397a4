use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of factions fixed at contract deploy time
pub const FACTION_COUNT: usize = 5;

/// The five competing factions. On chain, id 0 means "unaffiliated";
/// here that is modeled as `Option<FactionId>::None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum FactionId {
    Shadow,
    Blade,
    Spirit,
    Pillar,
    Wind,
}

impl FactionId {
    /// Returns all factions in canonical order
    pub fn all() -> &'static [FactionId] {
        &[
            FactionId::Shadow,
            FactionId::Blade,
            FactionId::Spirit,
            FactionId::Pillar,
            FactionId::Wind,
        ]
    }

    /// Returns the faction as a string slice
    pub fn as_str(&self) -> &'static str {
        match self {
            FactionId::Shadow => "SHADOW",
            FactionId::Blade => "BLADE",
            FactionId::Spirit => "SPIRIT",
            FactionId::Pillar => "PILLAR",
            FactionId::Wind => "WIND",
        }
    }

    /// Parse a faction from a string
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_uppercase().as_str() {
            "SHADOW" => Some(FactionId::Shadow),
            "BLADE" => Some(FactionId::Blade),
            "SPIRIT" => Some(FactionId::Spirit),
            "PILLAR" => Some(FactionId::Pillar),
            "WIND" => Some(FactionId::Wind),
            _ => None,
        }
    }

    /// Returns the index of this faction in the canonical ordering
    /// (aggregate arrays are indexed this way)
    pub fn index(&self) -> usize {
        match self {
            FactionId::Shadow => 0,
            FactionId::Blade => 1,
            FactionId::Spirit => 2,
            FactionId::Pillar => 3,
            FactionId::Wind => 4,
        }
    }

    /// Returns the faction at the given index
    pub fn from_index(idx: usize) -> Option<Self> {
        match idx {
            0 => Some(FactionId::Shadow),
            1 => Some(FactionId::Blade),
            2 => Some(FactionId::Spirit),
            3 => Some(FactionId::Pillar),
            4 => Some(FactionId::Wind),
            _ => None,
        }
    }

    /// On-chain encoding: 0 is reserved for "unaffiliated", factions
    /// start at 1.
    pub fn to_chain_id(&self) -> u8 {
        (self.index() + 1) as u8
    }

    /// Decode the on-chain faction id; 0 maps to `None`.
    pub fn from_chain_id(id: u8) -> Option<Self> {
        if id == 0 {
            None
        } else {
            Self::from_index((id - 1) as usize)
        }
    }

    /// The two factions this one has an advantage over. Informational
    /// only; nothing in the client enforces the relation.
    pub fn defeats(&self) -> [FactionId; 2] {
        match self {
            FactionId::Shadow => [FactionId::Spirit, FactionId::Wind],
            FactionId::Blade => [FactionId::Shadow, FactionId::Pillar],
            FactionId::Spirit => [FactionId::Blade, FactionId::Pillar],
            FactionId::Pillar => [FactionId::Wind, FactionId::Shadow],
            FactionId::Wind => [FactionId::Spirit, FactionId::Blade],
        }
    }

    /// The two factions holding an advantage over this one
    pub fn defeated_by(&self) -> [FactionId; 2] {
        match self {
            FactionId::Shadow => [FactionId::Blade, FactionId::Pillar],
            FactionId::Blade => [FactionId::Spirit, FactionId::Wind],
            FactionId::Spirit => [FactionId::Shadow, FactionId::Wind],
            FactionId::Pillar => [FactionId::Blade, FactionId::Spirit],
            FactionId::Wind => [FactionId::Pillar, FactionId::Shadow],
        }
    }
}

impl fmt::Display for FactionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
