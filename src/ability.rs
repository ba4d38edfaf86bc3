use crate::battle::weather::Weather;
use crate::stats::StatType;
use crate::types::PokemonType;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Battlefield terrain. At most one terrain is active at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Terrain {
    Grassy,
    Electric,
    Psychic,
    Misty,
}

impl Terrain {
    /// Damage modifier the terrain applies to a move of the given type.
    pub fn damage_multiplier(&self, move_type: PokemonType) -> f64 {
        match (self, move_type) {
            (Terrain::Grassy, PokemonType::Grass) => 1.3,
            (Terrain::Electric, PokemonType::Electric) => 1.3,
            (Terrain::Psychic, PokemonType::Psychic) => 1.3,
            (Terrain::Misty, PokemonType::Dragon) => 0.5,
            _ => 1.0,
        }
    }
}

impl fmt::Display for Terrain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Terrain::Grassy => "Grassy Terrain",
            Terrain::Electric => "Electric Terrain",
            Terrain::Psychic => "Psychic Terrain",
            Terrain::Misty => "Misty Terrain",
        };
        write!(f, "{}", name)
    }
}

/// Field auras projected by an ability for the whole battle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AuraKind {
    Fairy,
    Dark,
    /// Inverts the other auras' boost into a penalty.
    Break,
}

/// Which hits a disguise can absorb.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DisguiseCoverage {
    All,
    PhysicalOnly,
    NonSuperEffectiveOnly,
}

/// Every ability behavior the engine understands. Data-driven: an ability is
/// a name wrapped around one of these variants, not a trait object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AbilityKind {
    /// Blocks all status conditions (unless the attacker ignores abilities).
    StatusImmunity,
    /// Scales the chance of status conditions landing.
    StatusResistance { multiplier: f64 },
    /// No chip damage from weather.
    WeatherImmunity,
    /// Scales chip damage from weather.
    WeatherResistance { multiplier: f64 },
    /// Conditional stat multiplier, gated on weather and/or having a status.
    StatBoost {
        stat: StatType,
        multiplier: f64,
        required_weather: Option<Weather>,
        requires_status: bool,
    },
    /// Multiplies the bearer's effective accuracy when attacking.
    AccuracyBoost { multiplier: f64 },
    /// Divides incoming effective accuracy when defending.
    EvasionBoost { multiplier: f64 },
    /// Sets the weather when the battle starts, indefinitely.
    WeatherSetter { weather: Weather },
    /// Sets the terrain when the battle starts, for five turns.
    TerrainSetter { terrain: Terrain },
    /// Projects a field aura for the whole battle.
    AuraBearer { aura: AuraKind },
    /// One-way form shift when HP falls to or below the fraction.
    /// Non-HP stats are scaled by the multiplier.
    FormChange {
        hp_fraction: f64,
        form: String,
        stat_multiplier: f64,
    },
    /// Negates the first qualifying hit entirely. One-shot.
    Disguise { coverage: DisguiseCoverage },
    /// Copies the opponent's types, non-HP stats, and moves at battle start.
    Transform,
    /// Copies the opponent's ability at battle start; restored on faint.
    Trace,
    /// The bearer's type becomes the type of the last move that damaged it.
    ColorChange,
    /// The bearer's moves ignore the target's status immunity.
    MoldBreaker,
    /// The bearer's type becomes the type of the move it is about to use.
    Protean,
    /// Stage changes applied to the bearer are doubled.
    Simple,
    /// The opponent's stat stages are ignored against the bearer.
    Unaware,
    /// Same-type attack bonus is 2.0 instead of 1.5.
    Adaptability,
}

/// A named ability.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ability {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub kind: AbilityKind,
}

impl Ability {
    pub fn new(name: impl Into<String>, kind: AbilityKind) -> Self {
        Ability {
            name: name.into(),
            description: String::new(),
            kind,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case(Terrain::Grassy, PokemonType::Grass, 1.3)]
    #[case(Terrain::Electric, PokemonType::Electric, 1.3)]
    #[case(Terrain::Psychic, PokemonType::Psychic, 1.3)]
    #[case(Terrain::Misty, PokemonType::Dragon, 0.5)]
    #[case(Terrain::Grassy, PokemonType::Fire, 1.0)]
    #[case(Terrain::Misty, PokemonType::Fairy, 1.0)]
    fn terrain_damage_multipliers(
        #[case] terrain: Terrain,
        #[case] move_type: PokemonType,
        #[case] expected: f64,
    ) {
        assert_eq!(terrain.damage_multiplier(move_type), expected);
    }
}
