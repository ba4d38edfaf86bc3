use crate::ability::Ability;
use crate::battle::engine::Battle;
use crate::battle::rng::BattleRng;
use crate::item::Item;
use crate::moves::{Effect, Move, MoveCategory};
use crate::pokemon::{ActiveStatus, Pokemon, StatusCondition};
use crate::stats::Stats;
use crate::types::{PokemonType, TypeChart};
use std::sync::Arc;

/// Fixture type chart covering the matchups the test suite relies on.
const TEST_CHART_JSON: &str = r#"{
    "fire": {"grass": 2.0, "water": 0.5, "fire": 0.5, "ice": 2.0, "rock": 0.5},
    "water": {"fire": 2.0, "grass": 0.5, "rock": 2.0},
    "grass": {"water": 2.0, "fire": 0.5, "ground": 2.0},
    "electric": {"water": 2.0, "ground": 0.0, "flying": 2.0},
    "normal": {"ghost": 0.0, "rock": 0.5},
    "ice": {"grass": 2.0, "dragon": 2.0},
    "fighting": {"normal": 2.0, "ghost": 0.0}
}"#;

pub fn test_chart() -> Arc<TypeChart> {
    Arc::new(TypeChart::from_json_str(TEST_CHART_JSON).expect("fixture chart parses"))
}

/// Flat base stats so damage numbers are easy to reason about.
pub fn flat_stats(value: u16) -> Stats {
    Stats {
        hp: value,
        attack: value,
        defense: value,
        special_attack: value,
        special_defense: value,
        speed: value,
    }
}

/// A builder for test Pokemon with common defaults: level 50, flat 100
/// base stats.
///
/// # Example
/// ```ignore
/// let pokemon = TestPokemonBuilder::new("Charmander", PokemonType::Fire)
///     .with_moves(vec![physical_move("Scratch", PokemonType::Normal, 40)])
///     .with_status(StatusCondition::Paralysis, Some(5))
///     .build();
/// ```
pub struct TestPokemonBuilder {
    name: String,
    types: Vec<PokemonType>,
    level: u8,
    base_stats: Stats,
    moves: Vec<Move>,
    status: Option<ActiveStatus>,
    current_hp: Option<u16>,
    ability: Option<Ability>,
    held_item: Option<Item>,
}

impl TestPokemonBuilder {
    pub fn new(name: &str, primary_type: PokemonType) -> Self {
        Self {
            name: name.to_string(),
            types: vec![primary_type],
            level: 50,
            base_stats: flat_stats(100),
            moves: Vec::new(),
            status: None,
            current_hp: None,
            ability: None,
            held_item: None,
        }
    }

    pub fn with_types(mut self, types: Vec<PokemonType>) -> Self {
        self.types = types;
        self
    }

    pub fn with_level(mut self, level: u8) -> Self {
        self.level = level;
        self
    }

    pub fn with_base_stats(mut self, base_stats: Stats) -> Self {
        self.base_stats = base_stats;
        self
    }

    pub fn with_moves(mut self, moves: Vec<Move>) -> Self {
        self.moves = moves;
        self
    }

    pub fn with_status(mut self, condition: StatusCondition, turns_remaining: Option<u8>) -> Self {
        self.status = Some(ActiveStatus {
            condition,
            turns_remaining,
        });
        self
    }

    /// Sets current HP. If not set, HP starts at max.
    pub fn with_hp(mut self, hp: u16) -> Self {
        self.current_hp = Some(hp);
        self
    }

    pub fn with_ability(mut self, ability: Ability) -> Self {
        self.ability = Some(ability);
        self
    }

    pub fn with_held_item(mut self, item: Item) -> Self {
        self.held_item = Some(item);
        self
    }

    pub fn build(self) -> Pokemon {
        let mut pokemon = Pokemon::new(
            self.name,
            self.types,
            self.base_stats,
            self.level,
            self.moves,
        )
        .expect("test Pokemon is valid");
        if let Some(ability) = self.ability {
            pokemon = pokemon.with_ability(ability);
        }
        if let Some(item) = self.held_item {
            pokemon = pokemon.with_held_item(item);
        }
        pokemon.status = self.status;
        if let Some(hp) = self.current_hp {
            pokemon.current_hp = hp;
        }
        pokemon
    }
}

pub fn physical_move(name: &str, move_type: PokemonType, power: u16) -> Move {
    Move::new(name, move_type, MoveCategory::Physical, power, Some(100), 20)
}

pub fn special_move(name: &str, move_type: PokemonType, power: u16) -> Move {
    Move::new(name, move_type, MoveCategory::Special, power, Some(100), 20)
}

pub fn status_move(name: &str, move_type: PokemonType, effects: Vec<Effect>) -> Move {
    Move::new(name, move_type, MoveCategory::Status, 0, Some(100), 20).with_effects(effects)
}

/// Creates a standard battle with a fixed seed.
pub fn create_test_battle(player: Pokemon, enemy: Pokemon) -> Battle {
    Battle::with_rng(player, enemy, test_chart(), BattleRng::seeded(42))
}

/// Creates a battle with a specific seed, for trial loops.
pub fn create_seeded_battle(player: Pokemon, enemy: Pokemon, seed: u64) -> Battle {
    Battle::with_rng(player, enemy, test_chart(), BattleRng::seeded(seed))
}

/// Index of the first message containing `needle`, panicking with the full
/// message list when absent.
pub fn message_index(messages: &[String], needle: &str) -> usize {
    messages
        .iter()
        .position(|m| m.contains(needle))
        .unwrap_or_else(|| panic!("no message containing {:?} in {:?}", needle, messages))
}

pub fn has_message(messages: &[String], needle: &str) -> bool {
    messages.iter().any(|m| m.contains(needle))
}
