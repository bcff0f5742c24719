//! Battery chemistry families.

use serde::Serialize;
use std::fmt;

/// A battery technology family with its own models and presets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Chemistry {
    LithiumIon,
    LeadAcid,
    SodiumIon,
    LithiumMetal,
}

impl Chemistry {
    pub const ALL: [Chemistry; 4] = [
        Chemistry::LithiumIon,
        Chemistry::LeadAcid,
        Chemistry::SodiumIon,
        Chemistry::LithiumMetal,
    ];

    /// Wire identifier, e.g. `"lithium-ion"`.
    pub fn id(self) -> &'static str {
        match self {
            Chemistry::LithiumIon => "lithium-ion",
            Chemistry::LeadAcid => "lead-acid",
            Chemistry::SodiumIon => "sodium-ion",
            Chemistry::LithiumMetal => "lithium-metal",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Chemistry::LithiumIon => "Lithium-Ion",
            Chemistry::LeadAcid => "Lead-Acid",
            Chemistry::SodiumIon => "Sodium-Ion",
            Chemistry::LithiumMetal => "Lithium-Metal",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Chemistry::LithiumIon => "Standard lithium-ion battery chemistry",
            Chemistry::LeadAcid => "Traditional lead-acid battery chemistry",
            Chemistry::SodiumIon => "Emerging sodium-ion battery technology",
            Chemistry::LithiumMetal => "Next-generation lithium-metal batteries",
        }
    }

    /// Parse a wire identifier. Matching is exact.
    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.id() == id)
    }
}

impl fmt::Display for Chemistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_round_trip() {
        for chemistry in Chemistry::ALL {
            assert_eq!(Chemistry::from_id(chemistry.id()), Some(chemistry));
        }
    }

    #[test]
    fn unknown_and_miscased_ids_are_rejected() {
        assert_eq!(Chemistry::from_id("zinc-air"), None);
        assert_eq!(Chemistry::from_id("Lithium-Ion"), None);
        assert_eq!(Chemistry::from_id(""), None);
    }
}
