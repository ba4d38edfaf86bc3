use crate::errors::{BattleResult, DataError, DataResult};
use crate::item::Item;
use crate::moves::{Effect, Move, MoveCategory};
use crate::pokemon::Pokemon;
use crate::stats::Stats;
use crate::types::{PokemonType, TypeChart};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A species definition as it appears in data documents.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpeciesDef {
    pub name: String,
    pub types: Vec<String>,
    pub base_stats: Stats,
    #[serde(default)]
    pub starting_moves: Vec<String>,
    #[serde(default)]
    pub possible_moves: Vec<String>,
}

/// A move definition as it appears in data documents.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MoveDef {
    pub name: String,
    pub move_type: String,
    pub category: MoveCategory,
    pub power: u16,
    pub accuracy: Option<u8>,
    pub pp: u8,
    #[serde(default)]
    pub effects: Vec<Effect>,
}

/// Definition registry: species, moves, items, and the type chart, loaded
/// from id-keyed JSON or RON documents. Read-only once loaded; a single
/// `Dex` can back any number of battles.
#[derive(Debug, Clone, Default)]
pub struct Dex {
    species: HashMap<String, SpeciesDef>,
    moves: HashMap<String, MoveDef>,
    items: HashMap<String, Item>,
    type_chart: TypeChart,
}

impl Dex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load_type_chart(&mut self, json: &str) -> DataResult<()> {
        self.type_chart.load_from_json(json)
    }

    pub fn load_species_json(&mut self, doc: &str) -> DataResult<()> {
        let defs: HashMap<String, SpeciesDef> = serde_json::from_str(doc)?;
        self.species.extend(defs);
        Ok(())
    }

    pub fn load_species_ron(&mut self, doc: &str) -> DataResult<()> {
        let defs: HashMap<String, SpeciesDef> = ron::from_str(doc)?;
        self.species.extend(defs);
        Ok(())
    }

    pub fn load_moves_json(&mut self, doc: &str) -> DataResult<()> {
        let defs: HashMap<String, MoveDef> = serde_json::from_str(doc)?;
        self.moves.extend(defs);
        Ok(())
    }

    pub fn load_moves_ron(&mut self, doc: &str) -> DataResult<()> {
        let defs: HashMap<String, MoveDef> = ron::from_str(doc)?;
        self.moves.extend(defs);
        Ok(())
    }

    pub fn load_items_json(&mut self, doc: &str) -> DataResult<()> {
        let defs: HashMap<String, Item> = serde_json::from_str(doc)?;
        self.items.extend(defs);
        Ok(())
    }

    pub fn load_items_ron(&mut self, doc: &str) -> DataResult<()> {
        let defs: HashMap<String, Item> = ron::from_str(doc)?;
        self.items.extend(defs);
        Ok(())
    }

    pub fn type_chart(&self) -> &TypeChart {
        &self.type_chart
    }

    /// Builds a battle-ready move from its id.
    pub fn move_def(&self, id: &str) -> DataResult<Move> {
        let def = self
            .moves
            .get(id)
            .ok_or_else(|| DataError::MoveNotFound(id.to_string()))?;
        let move_type: PokemonType = def.move_type.parse()?;
        Ok(Move {
            name: def.name.clone(),
            move_type,
            category: def.category,
            power: def.power,
            accuracy: def.accuracy,
            pp: def.pp,
            max_pp: def.pp,
            effects: def.effects.clone(),
        })
    }

    /// Builds an item from its id.
    pub fn item(&self, id: &str) -> DataResult<Item> {
        self.items
            .get(id)
            .cloned()
            .ok_or_else(|| DataError::ItemNotFound(id.to_string()))
    }

    /// Builds a Pokemon at the given level with its starting moves.
    pub fn pokemon(&self, id: &str, level: u8) -> BattleResult<Pokemon> {
        let def = self.species_def(id)?;
        let move_ids: Vec<&str> = def.starting_moves.iter().map(String::as_str).collect();
        self.build_pokemon(def, level, &move_ids)
    }

    /// Builds a Pokemon with an explicit move list. At most four move ids
    /// are used.
    pub fn pokemon_with_moves(
        &self,
        id: &str,
        level: u8,
        move_ids: &[&str],
    ) -> BattleResult<Pokemon> {
        let def = self.species_def(id)?;
        self.build_pokemon(def, level, move_ids)
    }

    fn species_def(&self, id: &str) -> DataResult<&SpeciesDef> {
        self.species
            .get(id)
            .ok_or_else(|| DataError::SpeciesNotFound(id.to_string()))
    }

    fn build_pokemon(
        &self,
        def: &SpeciesDef,
        level: u8,
        move_ids: &[&str],
    ) -> BattleResult<Pokemon> {
        let mut types = Vec::with_capacity(def.types.len());
        for name in &def.types {
            types.push(name.parse::<PokemonType>().map_err(DataError::from)?);
        }
        let mut moves = Vec::new();
        for move_id in move_ids.iter().take(4) {
            moves.push(self.move_def(move_id)?);
        }
        Ok(Pokemon::new(
            def.name.clone(),
            types,
            def.base_stats,
            level,
            moves,
        )?)
    }
}
