use serde::{Deserialize, Serialize};
use std::fmt;

/// The minimum and maximum stage a battle stat can be moved to.
pub const MIN_STAGE: i8 = -6;
pub const MAX_STAGE: i8 = 6;

/// A full set of base or calculated stats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stats {
    pub hp: u16,
    pub attack: u16,
    pub defense: u16,
    pub special_attack: u16,
    pub special_defense: u16,
    pub speed: u16,
}

impl Stats {
    /// Calculated stats for a set of base stats at a level.
    ///
    /// HP: (2 * base * level) / 100 + level + 10
    /// Others: (2 * base * level) / 100 + 5
    pub fn at_level(base: &Stats, level: u8) -> Stats {
        let level = level as u32;
        let calc = |b: u16| ((2 * b as u32 * level) / 100 + 5) as u16;
        Stats {
            hp: ((2 * base.hp as u32 * level) / 100 + level + 10) as u16,
            attack: calc(base.attack),
            defense: calc(base.defense),
            special_attack: calc(base.special_attack),
            special_defense: calc(base.special_defense),
            speed: calc(base.speed),
        }
    }

    pub fn get(&self, stat: StatType) -> u16 {
        match stat {
            StatType::Attack => self.attack,
            StatType::Defense => self.defense,
            StatType::SpecialAttack => self.special_attack,
            StatType::SpecialDefense => self.special_defense,
            StatType::Speed => self.speed,
            // Accuracy and evasion have no base stat; they exist only as stages.
            StatType::Accuracy | StatType::Evasion => 0,
        }
    }
}

/// Stats that can be referenced by moves, abilities, and items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StatType {
    Attack,
    Defense,
    SpecialAttack,
    SpecialDefense,
    Speed,
    Accuracy,
    Evasion,
}

impl fmt::Display for StatType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            StatType::Attack => "Attack",
            StatType::Defense => "Defense",
            StatType::SpecialAttack => "Special Attack",
            StatType::SpecialDefense => "Special Defense",
            StatType::Speed => "Speed",
            StatType::Accuracy => "accuracy",
            StatType::Evasion => "evasiveness",
        };
        write!(f, "{}", name)
    }
}

/// In-battle stat stages. Every stat is tracked explicitly so resetting is a
/// single well-defined operation rather than a map wipe.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatStages {
    pub attack: i8,
    pub defense: i8,
    pub special_attack: i8,
    pub special_defense: i8,
    pub speed: i8,
    pub accuracy: i8,
    pub evasion: i8,
}

impl StatStages {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, stat: StatType) -> i8 {
        match stat {
            StatType::Attack => self.attack,
            StatType::Defense => self.defense,
            StatType::SpecialAttack => self.special_attack,
            StatType::SpecialDefense => self.special_defense,
            StatType::Speed => self.speed,
            StatType::Accuracy => self.accuracy,
            StatType::Evasion => self.evasion,
        }
    }

    pub fn set(&mut self, stat: StatType, stage: i8) {
        let slot = match stat {
            StatType::Attack => &mut self.attack,
            StatType::Defense => &mut self.defense,
            StatType::SpecialAttack => &mut self.special_attack,
            StatType::SpecialDefense => &mut self.special_defense,
            StatType::Speed => &mut self.speed,
            StatType::Accuracy => &mut self.accuracy,
            StatType::Evasion => &mut self.evasion,
        };
        *slot = stage;
    }

    /// Clamps the requested change to [-6, +6] and reports whether the
    /// stage actually moved.
    pub fn modify(&mut self, stat: StatType, delta: i8) -> bool {
        let current = self.get(stat);
        let new = (current as i16 + delta as i16).clamp(MIN_STAGE as i16, MAX_STAGE as i16) as i8;
        if new == current {
            return false;
        }
        self.set(stat, new);
        true
    }

    /// Returns every stage to 0. The only reset path in the engine.
    pub fn reset(&mut self) {
        *self = StatStages::new();
    }
}

/// Stage multiplier for Attack/Defense/Sp. Atk/Sp. Def/Speed:
/// max(2, 2 + stage) / max(2, 2 - stage).
pub fn stat_stage_multiplier(stage: i8) -> f64 {
    let numerator = std::cmp::max(2, 2 + stage as i32) as f64;
    let denominator = std::cmp::max(2, 2 - stage as i32) as f64;
    numerator / denominator
}

/// Stage multiplier for accuracy and evasion:
/// (3 + clamp(stage, -3, 3)) / 3.
pub fn accuracy_stage_multiplier(stage: i8) -> f64 {
    let clamped = stage.clamp(-3, 3) as f64;
    (3.0 + clamped) / 3.0
}

/// Which multiplier family a stat uses.
pub fn stage_multiplier(stat: StatType, stage: i8) -> f64 {
    match stat {
        StatType::Accuracy | StatType::Evasion => accuracy_stage_multiplier(stage),
        _ => stat_stage_multiplier(stage),
    }
}
