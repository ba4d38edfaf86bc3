// In: src/lib.rs

//! Turn-based Pokemon battle engine.
//!
//! A single-threaded, fully synchronous battle simulator: two Pokemon, one
//! move per turn, with type effectiveness, stat stages, status conditions,
//! weather, terrain, abilities, and held items. All randomness flows
//! through a seedable [`BattleRng`], so every battle is reproducible.

// --- MODULE DECLARATIONS ---
pub mod ability;
pub mod battle;
pub mod data;
pub mod errors;
pub mod item;
pub mod moves;
pub mod pokemon;
pub mod stats;
pub mod types;

// --- PUBLIC API RE-EXPORTS ---

// Core battle engine types.
pub use battle::engine::{Battle, Side, TurnResult};
pub use battle::rng::BattleRng;
pub use battle::weather::Weather;

// Core runtime types for a battle.
pub use ability::{Ability, AbilityKind, AuraKind, DisguiseCoverage, Terrain};
pub use item::{BerryEffect, EquippedItem, HeldEffect, HeldItemTrigger, Item, ItemKind};
pub use moves::{Effect, Move, MoveCategory};
pub use pokemon::{ActiveStatus, DamageContext, DamageOutcome, Pokemon, StatusCondition};
pub use stats::{StatStages, StatType, Stats};
pub use types::{PokemonType, TypeChart};

// Definition loading.
pub use data::{Dex, MoveDef, SpeciesDef};

// Crate-specific error and result types.
pub use errors::{
    ActionError, BattleError, BattleResult, ConstructionError, DataError, DataResult,
};
