use crate::errors::{DataError, DataResult};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

/// Pokemon and move types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PokemonType {
    Normal,
    Fire,
    Water,
    Electric,
    Grass,
    Ice,
    Fighting,
    Poison,
    Ground,
    Flying,
    Psychic,
    Bug,
    Rock,
    Ghost,
    Dragon,
    Dark,
    Steel,
    Fairy,
}

impl PokemonType {
    pub const ALL: [PokemonType; 18] = [
        PokemonType::Normal,
        PokemonType::Fire,
        PokemonType::Water,
        PokemonType::Electric,
        PokemonType::Grass,
        PokemonType::Ice,
        PokemonType::Fighting,
        PokemonType::Poison,
        PokemonType::Ground,
        PokemonType::Flying,
        PokemonType::Psychic,
        PokemonType::Bug,
        PokemonType::Rock,
        PokemonType::Ghost,
        PokemonType::Dragon,
        PokemonType::Dark,
        PokemonType::Steel,
        PokemonType::Fairy,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            PokemonType::Normal => "Normal",
            PokemonType::Fire => "Fire",
            PokemonType::Water => "Water",
            PokemonType::Electric => "Electric",
            PokemonType::Grass => "Grass",
            PokemonType::Ice => "Ice",
            PokemonType::Fighting => "Fighting",
            PokemonType::Poison => "Poison",
            PokemonType::Ground => "Ground",
            PokemonType::Flying => "Flying",
            PokemonType::Psychic => "Psychic",
            PokemonType::Bug => "Bug",
            PokemonType::Rock => "Rock",
            PokemonType::Ghost => "Ghost",
            PokemonType::Dragon => "Dragon",
            PokemonType::Dark => "Dark",
            PokemonType::Steel => "Steel",
            PokemonType::Fairy => "Fairy",
        }
    }
}

impl fmt::Display for PokemonType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for PokemonType {
    type Err = DataError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PokemonType::ALL
            .iter()
            .find(|t| t.name().eq_ignore_ascii_case(s))
            .copied()
            .ok_or_else(|| DataError::UnknownType(s.to_string()))
    }
}

/// Type effectiveness chart, loaded from a JSON document mapping
/// attacker type name -> defender type name -> multiplier.
///
/// Pairs absent from the chart contribute a neutral 1.0.
#[derive(Debug, Clone, Default)]
pub struct TypeChart {
    chart: HashMap<PokemonType, HashMap<PokemonType, f64>>,
}

impl TypeChart {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a chart from JSON. Type names are matched case-insensitively.
    pub fn from_json_str(json: &str) -> DataResult<Self> {
        let mut chart = TypeChart::new();
        chart.load_from_json(json)?;
        Ok(chart)
    }

    /// Loads chart entries from a JSON document, replacing any prior entries.
    pub fn load_from_json(&mut self, json: &str) -> DataResult<()> {
        let raw: HashMap<String, HashMap<String, f64>> = serde_json::from_str(json)?;
        self.chart.clear();
        for (attacker_name, defenders) in raw {
            let attacker = PokemonType::from_str(&attacker_name)?;
            let entry = self.chart.entry(attacker).or_default();
            for (defender_name, multiplier) in defenders {
                let defender = PokemonType::from_str(&defender_name)?;
                entry.insert(defender, multiplier);
            }
        }
        Ok(())
    }

    /// Combined effectiveness of an attack type against a set of defender
    /// types. Multiplicative across defender types; an empty set is 1.0.
    pub fn multiplier(&self, attack_type: PokemonType, defender_types: &[PokemonType]) -> f64 {
        let mut multiplier = 1.0;
        if let Some(row) = self.chart.get(&attack_type) {
            for defender in defender_types {
                if let Some(value) = row.get(defender) {
                    multiplier *= value;
                }
            }
        }
        multiplier
    }
}
