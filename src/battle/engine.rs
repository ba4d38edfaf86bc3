use crate::ability::{AbilityKind, AuraKind, Terrain};
use crate::battle::rng::BattleRng;
use crate::battle::weather::Weather;
use crate::errors::{ActionError, BattleResult};
use crate::item::{BerryEffect, HeldEffect, HeldItemTrigger, Item, ItemKind};
use crate::moves::{Move, MoveCategory};
use crate::pokemon::{DamageContext, Pokemon, StatusCondition};
use crate::stats::{accuracy_stage_multiplier, StatType};
use crate::types::{PokemonType, TypeChart};
use std::collections::HashSet;
use std::sync::Arc;

/// Chance a paralyzed Pokemon forfeits its turn.
const PARALYSIS_FORFEIT_CHANCE: f64 = 0.25;
/// Per-turn chance a frozen Pokemon thaws at end of turn.
const THAW_CHANCE: f64 = 0.20;
/// Weather chip damage denominator (1/16 max HP).
const WEATHER_CHIP_DIVISOR: u16 = 16;
/// Poison and burn chip damage denominator (1/8 max HP).
const STATUS_CHIP_DIVISOR: u16 = 8;
/// Terrain set by an ability at battle start lasts this many turns.
const ABILITY_TERRAIN_TURNS: u8 = 5;

/// One of the two combatants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Player,
    Enemy,
}

impl Side {
    pub fn opponent(&self) -> Side {
        match self {
            Side::Player => Side::Enemy,
            Side::Enemy => Side::Player,
        }
    }
}

/// Everything that happened during one action or end-of-turn phase.
/// Message order is part of the contract; tests assert on it.
#[derive(Debug, Clone, PartialEq)]
pub struct TurnResult {
    pub damage_dealt: u16,
    pub move_missed: bool,
    pub critical_hit: bool,
    pub effectiveness: f64,
    pub status_applied: Option<StatusCondition>,
    pub stat_changes: Vec<(StatType, i8)>,
    pub messages: Vec<String>,
}

impl Default for TurnResult {
    fn default() -> Self {
        TurnResult {
            damage_dealt: 0,
            move_missed: false,
            critical_hit: false,
            effectiveness: 1.0,
            status_applied: None,
            stat_changes: Vec::new(),
            messages: Vec::new(),
        }
    }
}

/// A battle between two Pokemon.
#[derive(Debug, Clone)]
pub struct Battle {
    pub player: Pokemon,
    pub enemy: Pokemon,
    type_chart: Arc<TypeChart>,
    pub weather: Weather,
    pub weather_duration: Option<u8>,
    pub terrain: Option<Terrain>,
    pub terrain_duration: Option<u8>,
    active_auras: HashSet<AuraKind>,
    aura_break_active: bool,
    pub turn_count: u32,
    pub is_over: bool,
    pub winner: Option<Side>,
    rng: BattleRng,
}

impl Battle {
    /// Starts a battle with OS-entropy randomness.
    pub fn new(player: Pokemon, enemy: Pokemon, type_chart: Arc<TypeChart>) -> Self {
        Self::with_rng(player, enemy, type_chart, BattleRng::new())
    }

    /// Starts a battle with an injected RNG, applying battle-start
    /// abilities: weather and terrain setters, auras, trace, transform.
    pub fn with_rng(
        mut player: Pokemon,
        mut enemy: Pokemon,
        type_chart: Arc<TypeChart>,
        rng: BattleRng,
    ) -> Self {
        let mut weather = Weather::Clear;
        let mut weather_duration = None;
        for pokemon in [&player, &enemy] {
            if let Some(AbilityKind::WeatherSetter { weather: set }) = pokemon.ability_kind() {
                weather = *set;
                // Ability weather lasts the whole battle.
                weather_duration = None;
                break;
            }
        }

        let mut terrain = None;
        let mut terrain_duration = None;
        for pokemon in [&player, &enemy] {
            if let Some(AbilityKind::TerrainSetter { terrain: set }) = pokemon.ability_kind() {
                terrain = Some(*set);
                terrain_duration = Some(ABILITY_TERRAIN_TURNS);
                break;
            }
        }

        let mut active_auras = HashSet::new();
        let mut aura_break_active = false;
        for pokemon in [&player, &enemy] {
            if let Some(AbilityKind::AuraBearer { aura }) = pokemon.ability_kind() {
                if *aura == AuraKind::Break {
                    aura_break_active = true;
                } else {
                    active_auras.insert(*aura);
                }
            }
        }

        if matches!(player.ability_kind(), Some(AbilityKind::Trace)) {
            player.trace_ability(&enemy);
        }
        if matches!(enemy.ability_kind(), Some(AbilityKind::Trace)) {
            enemy.trace_ability(&player);
        }
        if matches!(player.ability_kind(), Some(AbilityKind::Transform)) {
            player.transform_into(&enemy);
        }
        if matches!(enemy.ability_kind(), Some(AbilityKind::Transform)) {
            enemy.transform_into(&player);
        }

        Battle {
            player,
            enemy,
            type_chart,
            weather,
            weather_duration,
            terrain,
            terrain_duration,
            active_auras,
            aura_break_active,
            turn_count: 0,
            is_over: false,
            winner: None,
            rng,
        }
    }

    pub fn pokemon(&self, side: Side) -> &Pokemon {
        match side {
            Side::Player => &self.player,
            Side::Enemy => &self.enemy,
        }
    }

    pub fn pokemon_mut(&mut self, side: Side) -> &mut Pokemon {
        match side {
            Side::Player => &mut self.player,
            Side::Enemy => &mut self.enemy,
        }
    }

    fn pokemon_and_rng_mut(&mut self, side: Side) -> (&mut Pokemon, &mut BattleRng) {
        match side {
            Side::Player => (&mut self.player, &mut self.rng),
            Side::Enemy => (&mut self.enemy, &mut self.rng),
        }
    }

    /// Overrides the weather. A duration of None lasts indefinitely.
    pub fn set_weather(&mut self, weather: Weather, duration: Option<u8>) {
        self.weather = weather;
        self.weather_duration = duration;
    }

    /// Overrides the terrain. A duration of None lasts indefinitely.
    pub fn set_terrain(&mut self, terrain: Option<Terrain>, duration: Option<u8>) {
        self.terrain = terrain;
        self.terrain_duration = duration;
    }

    /// Resolves one action: `user` uses its move at `move_index` on
    /// `target`. Misses, empty PP, and status-prevented turns are normal
    /// outcomes carried in the result, not errors.
    pub fn execute_turn(
        &mut self,
        user: Side,
        move_index: usize,
        target: Side,
    ) -> BattleResult<TurnResult> {
        if self.is_over {
            return Err(ActionError::BattleOver.into());
        }
        if move_index >= self.pokemon(user).moves.len() {
            return Err(ActionError::InvalidMoveIndex(move_index).into());
        }

        let mut result = TurnResult::default();
        let move_type = self.pokemon(user).moves[move_index].move_type;

        // Fire moves thaw the user before the legality check. The thaw does
        // not reset stat stages.
        if move_type == PokemonType::Fire
            && self.pokemon(user).status() == Some(StatusCondition::Freeze)
        {
            let attacker = self.pokemon_mut(user);
            attacker.clear_status_naturally();
            result.messages.push(format!("{} thawed out!", attacker.name));
        } else {
            match self.pokemon(user).status() {
                Some(StatusCondition::Sleep) => {
                    result
                        .messages
                        .push(format!("{} is fast asleep!", self.pokemon(user).name));
                    return Ok(result);
                }
                Some(StatusCondition::Freeze) => {
                    result
                        .messages
                        .push(format!("{} is frozen solid!", self.pokemon(user).name));
                    return Ok(result);
                }
                Some(StatusCondition::Paralysis) => {
                    if self.rng.chance(PARALYSIS_FORFEIT_CHANCE) {
                        result
                            .messages
                            .push(format!("{} is fully paralyzed!", self.pokemon(user).name));
                        return Ok(result);
                    }
                }
                _ => {}
            }
        }

        {
            let attacker = self.pokemon_mut(user);
            if !attacker.moves[move_index].use_move() {
                let move_name = attacker.moves[move_index].name.clone();
                result
                    .messages
                    .push(format!("{} has no PP left for {}!", attacker.name, move_name));
                return Ok(result);
            }
        }
        let mv = self.pokemon(user).moves[move_index].clone();

        if let Some(message) = self.pokemon_mut(user).protean_shift(mv.move_type) {
            result.messages.push(message);
        }

        // Accuracy. Status moves and always-hit moves skip the roll.
        if mv.category != MoveCategory::Status {
            if let Some(base_accuracy) = mv.accuracy {
                let effective = self.effective_accuracy(base_accuracy, user, target);
                if self.rng.unit() >= effective {
                    result.move_missed = true;
                    result
                        .messages
                        .push(format!("{}'s attack missed!", self.pokemon(user).name));
                }
            }
        }

        if !result.move_missed && mv.is_damaging() {
            let effectiveness = self
                .type_chart
                .multiplier(mv.move_type, self.pokemon(target).current_types());
            result.effectiveness = effectiveness;

            if effectiveness == 0.0 {
                result.messages.push("It had no effect!".to_string());
            } else {
                let crit = self.rng.crit();
                result.critical_hit = crit;
                let damage = self.compute_damage(&mv, user, target, crit, effectiveness);

                let ctx = DamageContext {
                    category: mv.category,
                    move_type: mv.move_type,
                    effectiveness,
                };
                let outcome = self.pokemon_mut(target).take_damage(damage, &ctx);
                result.damage_dealt = outcome.dealt;
                result.messages.push(format!(
                    "{} took {} damage!",
                    self.pokemon(target).name,
                    outcome.dealt
                ));
                result.messages.extend(outcome.messages);

                if crit {
                    result.messages.push("A critical hit!".to_string());
                }
                if effectiveness > 1.0 {
                    result.messages.push("It's super effective!".to_string());
                } else if effectiveness < 1.0 {
                    result
                        .messages
                        .push("It's not very effective...".to_string());
                }

                if let Some(message) = self.pokemon_mut(target).check_low_hp_berry() {
                    result.messages.push(message);
                }
                if effectiveness > 1.0 {
                    if let Some(message) = self.pokemon_mut(target).check_super_effective_berry() {
                        result.messages.push(message);
                    }
                }
            }
        }

        if !result.move_missed {
            self.apply_move_effects(&mv, user, target, &mut result);
        }

        self.turn_count += 1;
        if self.pokemon(target).is_fainted() {
            result
                .messages
                .push(format!("{} fainted!", self.pokemon(target).name));
            if let Some(message) = self.pokemon_mut(target).restore_ability() {
                result.messages.push(message);
            }
            self.is_over = true;
            self.winner = Some(target.opponent());
        }

        Ok(result)
    }

    fn effective_accuracy(&self, base_accuracy: u8, user: Side, target: Side) -> f64 {
        let attacker = self.pokemon(user);
        let defender = self.pokemon(target);

        let mut accuracy = base_accuracy as f64 / 100.0;
        accuracy *= accuracy_stage_multiplier(attacker.stages.accuracy);
        accuracy *= accuracy_stage_multiplier(defender.stages.evasion);
        if let Some(AbilityKind::AccuracyBoost { multiplier }) = attacker.ability_kind() {
            accuracy *= multiplier;
        }
        if let Some(AbilityKind::EvasionBoost { multiplier }) = defender.ability_kind() {
            accuracy /= multiplier;
        }
        accuracy
    }

    fn compute_damage(
        &mut self,
        mv: &Move,
        user: Side,
        target: Side,
        crit: bool,
        effectiveness: f64,
    ) -> u16 {
        let variance = self.rng.variance();
        let attacker = self.pokemon(user);
        let defender = self.pokemon(target);

        let (attack_stat, defense_stat) = match mv.category {
            MoveCategory::Special => (StatType::SpecialAttack, StatType::SpecialDefense),
            _ => (StatType::Attack, StatType::Defense),
        };

        let attack_base = attacker.stats().get(attack_stat) as f64;
        let defense_base = defender.stats().get(defense_stat) as f64;
        let attack_modified =
            attack_base * attacker.stat_multiplier(attack_stat, self.weather, Some(defender));
        let defense_modified =
            defense_base * defender.stat_multiplier(defense_stat, self.weather, Some(attacker));

        // Critical hits keep favorable attack boosts and ignore all defense
        // modifiers.
        let (attack, defense) = if crit {
            (attack_modified.max(attack_base), defense_base)
        } else {
            (attack_modified, defense_modified)
        };

        let base = (2.0 * attacker.level as f64 / 5.0 + 2.0) * mv.power as f64 * attack
            / defense
            / 50.0
            + 2.0;

        let mut multiplier = 1.0;

        if attacker.current_types().contains(&mv.move_type) {
            let stab = if matches!(attacker.ability_kind(), Some(AbilityKind::Adaptability)) {
                2.0
            } else {
                1.5
            };
            multiplier *= stab;
        }

        multiplier *= effectiveness;
        multiplier *= mv.weather_multiplier(self.weather);

        if let Some(item) = attacker.held_item_on(HeldItemTrigger::Passive) {
            match &item.kind {
                ItemKind::Held {
                    effect: HeldEffect::TypeBoost { boost_type, percent },
                } if *boost_type == mv.move_type => {
                    multiplier *= 1.0 + *percent as f64 / 100.0;
                }
                ItemKind::Held {
                    effect: HeldEffect::DamageBoost { category, multiplier: boost },
                } if *category == mv.category => {
                    multiplier *= boost;
                }
                _ => {}
            }
        }

        if let Some(terrain) = self.terrain {
            multiplier *= terrain.damage_multiplier(mv.move_type);
        }

        multiplier *= self.aura_multiplier(mv.move_type);

        if crit {
            multiplier *= 2.0;
        }
        multiplier *= variance;

        let damage = (base * multiplier).floor();
        (damage.max(1.0)) as u16
    }

    fn aura_multiplier(&self, move_type: PokemonType) -> f64 {
        let aura = match move_type {
            PokemonType::Fairy => AuraKind::Fairy,
            PokemonType::Dark => AuraKind::Dark,
            _ => return 1.0,
        };
        if !self.active_auras.contains(&aura) {
            return 1.0;
        }
        if self.aura_break_active {
            0.75
        } else {
            1.33
        }
    }

    fn apply_move_effects(&mut self, mv: &Move, user: Side, target: Side, result: &mut TurnResult) {
        let terrain = self.terrain;
        let bypass_ability = self.pokemon(user).ignores_abilities();

        for effect in &mv.effects {
            if let Some(condition) = effect.status {
                if effect.status_chance > 0 {
                    let resistance = self.pokemon(target).status_chance_multiplier();
                    let chance = effect.status_chance as f64 / 100.0 * resistance;
                    if self.rng.chance(chance) {
                        let duration = effect.status_duration;
                        let (pokemon, rng) = self.pokemon_and_rng_mut(target);
                        if pokemon.set_status(
                            Some(condition),
                            duration,
                            bypass_ability,
                            terrain,
                            rng,
                        ) {
                            result.status_applied = Some(condition);
                            result
                                .messages
                                .push(format!("{} {}!", pokemon.name, condition.applied_text()));
                            if let Some(message) = pokemon.check_cure_berry() {
                                result.messages.push(message);
                            }
                        }
                    }
                }
            }

            for (stat, delta) in &effect.stat_changes {
                let chance = effect.stat_chance as f64 / 100.0;
                if !self.rng.chance(chance) {
                    continue;
                }
                if self.pokemon_mut(target).modify_stat(*stat, *delta) {
                    result.stat_changes.push((*stat, *delta));
                    let direction = if *delta > 0 { "rose" } else { "fell" };
                    result.messages.push(format!(
                        "{}'s {} {}!",
                        self.pokemon(target).name,
                        stat,
                        direction
                    ));
                }
            }
        }
    }

    /// End-of-turn resolution: weather chip then flavor, per-Pokemon status
    /// and held-item effects, then weather and terrain countdowns.
    pub fn end_turn(&mut self) -> TurnResult {
        let mut result = TurnResult::default();
        if self.is_over {
            return result;
        }

        // 1. Weather chip damage, buffet messages first, one flavor line after.
        if self.weather.is_damaging() {
            let buffet_name = self.weather.buffet_name().unwrap_or_default();
            for side in [Side::Player, Side::Enemy] {
                let weather = self.weather;
                let pokemon = self.pokemon_mut(side);
                if pokemon.is_fainted() {
                    continue;
                }
                let scale = pokemon.weather_damage_multiplier(weather);
                let chip = (pokemon.max_hp() / WEATHER_CHIP_DIVISOR) as f64 * scale;
                let chip = chip.floor() as u16;
                if chip > 0 {
                    let dealt = pokemon.take_raw_damage(chip);
                    result.messages.push(format!(
                        "{} is buffeted by the {}!",
                        pokemon.name, buffet_name
                    ));
                    result.messages.push(format!("{} took {} damage!", pokemon.name, dealt));
                }
            }
        }
        if let Some(flavor) = self.weather.flavor_text() {
            result.messages.push(flavor.to_string());
        }

        // 2. Per-Pokemon status and held-item resolution.
        for side in [Side::Player, Side::Enemy] {
            if self.pokemon(side).is_fainted() {
                continue;
            }

            if self.terrain == Some(Terrain::Grassy)
                && !self.pokemon(side).current_types().contains(&PokemonType::Flying)
            {
                let pokemon = self.pokemon_mut(side);
                let healed = pokemon.heal(pokemon.max_hp() / WEATHER_CHIP_DIVISOR);
                if healed > 0 {
                    result.messages.push(format!(
                        "{} restored {} HP from the grassy terrain!",
                        pokemon.name, healed
                    ));
                }
            }

            if let Some(message) = self.pokemon_mut(side).check_cure_berry() {
                result.messages.push(message);
            }

            // Freeze thaws 20% of the time, before duration bookkeeping.
            if self.pokemon(side).status() == Some(StatusCondition::Freeze)
                && self.rng.chance(THAW_CHANCE)
            {
                let pokemon = self.pokemon_mut(side);
                pokemon.clear_status_naturally();
                result.messages.push(format!("{} thawed out!", pokemon.name));
            } else {
                if let Some(message) = self.pokemon_mut(side).update_status() {
                    result.messages.push(message);
                }
                let pokemon = self.pokemon_mut(side);
                match pokemon.status() {
                    Some(StatusCondition::Poison) => {
                        pokemon.take_raw_damage(pokemon.max_hp() / STATUS_CHIP_DIVISOR);
                        result
                            .messages
                            .push(format!("{} is hurt by poison!", pokemon.name));
                    }
                    Some(StatusCondition::Burn) => {
                        pokemon.take_raw_damage(pokemon.max_hp() / STATUS_CHIP_DIVISOR);
                        result
                            .messages
                            .push(format!("{} is hurt by its burn!", pokemon.name));
                    }
                    _ => {}
                }
            }

            let pokemon = self.pokemon_mut(side);
            if !pokemon.is_fainted() {
                if let Some(item) = pokemon.held_item_on(HeldItemTrigger::EndOfTurn) {
                    if let ItemKind::Held {
                        effect: HeldEffect::EndOfTurnHeal { hp_fraction },
                    } = &item.kind
                    {
                        let item_name = item.name.clone();
                        let amount = (pokemon.max_hp() as f64 * hp_fraction) as u16;
                        let healed = pokemon.heal(amount);
                        if healed > 0 {
                            result.messages.push(format!(
                                "{} restored {} HP with its {}!",
                                pokemon.name, healed, item_name
                            ));
                        }
                    }
                }
            }
        }

        // 3. Weather and terrain countdowns.
        if self.weather != Weather::Clear {
            if let Some(turns) = self.weather_duration {
                if turns <= 1 {
                    if let Some(subsided) = self.weather.subsided_text() {
                        result.messages.push(subsided.to_string());
                    }
                    self.weather = Weather::Clear;
                    self.weather_duration = None;
                } else {
                    self.weather_duration = Some(turns - 1);
                }
            }
        }
        if self.terrain.is_some() {
            if let Some(turns) = self.terrain_duration {
                if turns <= 1 {
                    self.terrain = None;
                    self.terrain_duration = None;
                    result.messages.push("The terrain faded!".to_string());
                } else {
                    self.terrain_duration = Some(turns - 1);
                }
            }
        }

        // Chip damage can decide the battle.
        let player_down = self.player.is_fainted();
        let enemy_down = self.enemy.is_fainted();
        if player_down || enemy_down {
            for side in [Side::Player, Side::Enemy] {
                if self.pokemon(side).is_fainted() {
                    result
                        .messages
                        .push(format!("{} fainted!", self.pokemon(side).name));
                    if let Some(message) = self.pokemon_mut(side).restore_ability() {
                        result.messages.push(message);
                    }
                }
            }
            self.is_over = true;
            self.winner = match (player_down, enemy_down) {
                (true, false) => Some(Side::Enemy),
                (false, true) => Some(Side::Player),
                _ => None,
            };
        }

        result
    }

    /// Uses a bag item on one side's Pokemon. Usability failures are
    /// normal outcomes with a specific message, not errors.
    pub fn use_item(&mut self, item: &Item, target: Side) -> TurnResult {
        let mut result = TurnResult::default();
        let name = self.pokemon(target).name.clone();

        if self.pokemon(target).is_fainted() {
            result.messages.push(format!("{} has already fainted!", name));
            return result;
        }

        if !item.can_use(self.pokemon(target)) {
            let message = match &item.kind {
                ItemKind::Healing { .. } => format!("{} is already at full HP!", name),
                ItemKind::PpRestore { .. } => format!("{}'s moves are all at full PP!", name),
                ItemKind::StatusCure => format!("{} has no status condition!", name),
                ItemKind::Pokeball { .. } => {
                    "Can't use Poke Ball in a trainer battle!".to_string()
                }
                ItemKind::Berry { effect } => match effect {
                    BerryEffect::CureStatus => format!("{} has no status condition!", name),
                    _ => format!("{} is already at full HP!", name),
                },
                ItemKind::Held { .. } => "It would have no effect.".to_string(),
                _ => "It would have no effect.".to_string(),
            };
            result.messages.push(message);
            return result;
        }

        match &item.kind {
            ItemKind::Healing { amount } => {
                let healed = self.pokemon_mut(target).heal(*amount);
                result.messages.push(format!("{} restored {} HP!", name, healed));
            }
            ItemKind::PpRestore { amount } => {
                let pokemon = self.pokemon_mut(target);
                for mv in &mut pokemon.moves {
                    mv.restore_pp(*amount);
                }
                result
                    .messages
                    .push(format!("{}'s moves had their PP restored!", name));
            }
            ItemKind::StatusCure => {
                // The status name is captured before the cure for the message.
                let condition = self.pokemon(target).status();
                let (pokemon, rng) = self.pokemon_and_rng_mut(target);
                pokemon.set_status(None, None, false, None, rng);
                if let Some(condition) = condition {
                    result
                        .messages
                        .push(format!("{} was cured of its {}!", name, condition));
                }
            }
            ItemKind::StatBoost { stat, stages } => {
                if self.pokemon_mut(target).modify_stat(*stat, *stages) {
                    result.stat_changes.push((*stat, *stages));
                    let direction = if *stages > 0 { "rose" } else { "fell" };
                    result
                        .messages
                        .push(format!("{}'s {} {}!", name, stat, direction));
                } else {
                    result
                        .messages
                        .push(format!("{}'s {} won't go any higher!", name, stat));
                }
            }
            ItemKind::Vitamin { stat, amount } => {
                self.pokemon_mut(target).raise_stat_permanently(*stat, *amount);
                result
                    .messages
                    .push(format!("{}'s {} was permanently raised!", name, stat));
            }
            ItemKind::Pokeball { .. } => {
                // Capture resolution happens outside the engine.
                result.messages.push(format!("Used the {}!", item.name));
            }
            ItemKind::Berry { effect } => match effect {
                BerryEffect::HealOnLowHp { amount, .. }
                | BerryEffect::HealOnSuperEffectiveHit { amount } => {
                    let healed = self.pokemon_mut(target).heal(*amount);
                    result.messages.push(format!("{} restored {} HP!", name, healed));
                }
                BerryEffect::CureStatus => {
                    let condition = self.pokemon(target).status();
                    let (pokemon, rng) = self.pokemon_and_rng_mut(target);
                    pokemon.set_status(None, None, false, None, rng);
                    if let Some(condition) = condition {
                        result
                            .messages
                            .push(format!("{} was cured of its {}!", name, condition));
                    }
                }
            },
            ItemKind::Held { .. } => unreachable!("held items fail the usability check"),
        }

        result
    }
}
