use crate::battle::weather::Weather;
use crate::pokemon::StatusCondition;
use crate::stats::StatType;
use crate::types::PokemonType;
use serde::{Deserialize, Serialize};

/// Damage category of a move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MoveCategory {
    Physical,
    Special,
    Status,
}

/// A secondary effect attached to a move: an optional status application
/// and/or an ordered list of stat stage changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Effect {
    #[serde(default)]
    pub status: Option<StatusCondition>,
    /// Percent chance for the status application.
    #[serde(default)]
    pub status_chance: u8,
    /// Turns the status lasts; None uses the condition's default.
    #[serde(default)]
    pub status_duration: Option<u8>,
    /// Stage deltas, applied in order. Each is rolled independently.
    #[serde(default)]
    pub stat_changes: Vec<(StatType, i8)>,
    /// Percent chance for each stat change.
    #[serde(default = "default_stat_chance")]
    pub stat_chance: u8,
}

fn default_stat_chance() -> u8 {
    100
}

impl Default for Effect {
    fn default() -> Self {
        Effect {
            status: None,
            status_chance: 0,
            status_duration: None,
            stat_changes: Vec::new(),
            stat_chance: 100,
        }
    }
}

impl Effect {
    pub fn status(status: StatusCondition, chance: u8) -> Self {
        Effect {
            status: Some(status),
            status_chance: chance,
            ..Effect::default()
        }
    }

    pub fn stat_change(stat: StatType, delta: i8) -> Self {
        Effect {
            stat_changes: vec![(stat, delta)],
            ..Effect::default()
        }
    }
}

/// A battle move with PP bookkeeping.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Move {
    pub name: String,
    pub move_type: PokemonType,
    pub category: MoveCategory,
    pub power: u16,
    /// Percent accuracy. None means the move never misses.
    pub accuracy: Option<u8>,
    pub pp: u8,
    pub max_pp: u8,
    #[serde(default)]
    pub effects: Vec<Effect>,
}

impl Move {
    pub fn new(
        name: impl Into<String>,
        move_type: PokemonType,
        category: MoveCategory,
        power: u16,
        accuracy: Option<u8>,
        pp: u8,
    ) -> Self {
        Move {
            name: name.into(),
            move_type,
            category,
            power,
            accuracy,
            pp,
            max_pp: pp,
            effects: Vec::new(),
        }
    }

    pub fn with_effects(mut self, effects: Vec<Effect>) -> Self {
        self.effects = effects;
        self
    }

    /// Spends one PP. Returns false (and spends nothing) when empty.
    pub fn use_move(&mut self) -> bool {
        if self.pp == 0 {
            return false;
        }
        self.pp -= 1;
        true
    }

    /// Restores PP, up to the maximum. None restores fully.
    /// Returns the PP actually restored.
    pub fn restore_pp(&mut self, amount: Option<u8>) -> u8 {
        let missing = self.max_pp - self.pp;
        let restored = match amount {
            Some(amount) => amount.min(missing),
            None => missing,
        };
        self.pp += restored;
        restored
    }

    /// Whether the move deals direct damage.
    pub fn is_damaging(&self) -> bool {
        self.category != MoveCategory::Status && self.power > 0
    }

    /// Weather modifier applied to this move's damage. Fire moves are
    /// boosted in sun and dampened in rain; Water moves the inverse.
    pub fn weather_multiplier(&self, weather: Weather) -> f64 {
        match (self.move_type, weather) {
            (PokemonType::Fire, Weather::Sun) => 1.5,
            (PokemonType::Fire, Weather::Rain) => 0.5,
            (PokemonType::Water, Weather::Rain) => 1.5,
            (PokemonType::Water, Weather::Sun) => 0.5,
            _ => 1.0,
        }
    }
}
