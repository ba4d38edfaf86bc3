use crate::ability::{Ability, AbilityKind, DisguiseCoverage};
use crate::ability::Terrain;
use crate::battle::rng::BattleRng;
use crate::battle::weather::Weather;
use crate::errors::ConstructionError;
use crate::item::{BerryEffect, EquippedItem, HeldEffect, HeldItemTrigger, Item, ItemKind};
use crate::moves::{Move, MoveCategory};
use crate::stats::{stage_multiplier, StatStages, StatType, Stats};
use crate::types::PokemonType;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Default duration, in turns, for poison, burn, and paralysis.
const TIMED_STATUS_TURNS: u8 = 5;

/// Major status conditions. A Pokemon holds at most one at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StatusCondition {
    Sleep,
    Poison,
    Burn,
    Paralysis,
    Freeze,
}

impl StatusCondition {
    /// Types that cannot receive this condition.
    fn blocked_by_type(&self, types: &[PokemonType]) -> bool {
        let immune = |t: PokemonType| types.contains(&t);
        match self {
            StatusCondition::Burn => immune(PokemonType::Fire),
            StatusCondition::Poison => immune(PokemonType::Poison) || immune(PokemonType::Steel),
            StatusCondition::Paralysis => immune(PokemonType::Electric),
            StatusCondition::Freeze => immune(PokemonType::Ice),
            StatusCondition::Sleep => false,
        }
    }

    /// Message fragment when the condition lands, e.g. "{name} was poisoned!".
    pub fn applied_text(&self) -> &'static str {
        match self {
            StatusCondition::Sleep => "fell asleep",
            StatusCondition::Poison => "was poisoned",
            StatusCondition::Burn => "was badly burned",
            StatusCondition::Paralysis => "was paralyzed",
            StatusCondition::Freeze => "was frozen solid",
        }
    }
}

impl fmt::Display for StatusCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            StatusCondition::Sleep => "sleep",
            StatusCondition::Poison => "poison",
            StatusCondition::Burn => "burn",
            StatusCondition::Paralysis => "paralysis",
            StatusCondition::Freeze => "freeze",
        };
        write!(f, "{}", name)
    }
}

/// A condition currently afflicting a Pokemon. `turns_remaining` of None
/// means the condition does not expire on its own (freeze).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActiveStatus {
    pub condition: StatusCondition,
    pub turns_remaining: Option<u8>,
}

/// Context for a damaging hit, used by reactive abilities and held items.
#[derive(Debug, Clone, Copy)]
pub struct DamageContext {
    pub category: MoveCategory,
    pub move_type: PokemonType,
    pub effectiveness: f64,
}

/// What actually happened when damage was applied.
#[derive(Debug, Clone, Default)]
pub struct DamageOutcome {
    pub dealt: u16,
    pub messages: Vec<String>,
}

/// A battle-ready Pokemon.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pokemon {
    pub name: String,
    types: Vec<PokemonType>,
    base_stats: Stats,
    pub level: u8,
    stats: Stats,
    pub current_hp: u16,
    pub moves: Vec<Move>,
    pub stages: StatStages,
    pub status: Option<ActiveStatus>,
    pub ability: Option<Ability>,
    traced_ability: Option<Ability>,
    pub held_item: Option<EquippedItem>,
    override_types: Option<Vec<PokemonType>>,
    override_stats: Option<Stats>,
    pub active_form: Option<String>,
    disguise_spent: bool,
}

impl Pokemon {
    /// Creates a Pokemon with stats calculated from its base stats and
    /// level. Levels outside [1, 100] are clamped.
    pub fn new(
        name: impl Into<String>,
        types: Vec<PokemonType>,
        base_stats: Stats,
        level: u8,
        moves: Vec<Move>,
    ) -> Result<Self, ConstructionError> {
        if types.is_empty() || types.len() > 2 {
            return Err(ConstructionError::InvalidTypeCount(types.len()));
        }
        if moves.len() > 4 {
            return Err(ConstructionError::TooManyMoves(moves.len()));
        }
        let level = level.clamp(1, 100);
        let stats = Stats::at_level(&base_stats, level);
        Ok(Pokemon {
            name: name.into(),
            types,
            base_stats,
            level,
            stats,
            current_hp: stats.hp,
            moves,
            stages: StatStages::new(),
            status: None,
            ability: None,
            traced_ability: None,
            held_item: None,
            override_types: None,
            override_stats: None,
            active_form: None,
            disguise_spent: false,
        })
    }

    pub fn with_ability(mut self, ability: Ability) -> Self {
        self.ability = Some(ability);
        self
    }

    pub fn with_held_item(mut self, item: Item) -> Self {
        self.held_item = Some(EquippedItem::new(item));
        self
    }

    /// The Pokemon's types, honoring any in-battle type change.
    pub fn current_types(&self) -> &[PokemonType] {
        self.override_types.as_deref().unwrap_or(&self.types)
    }

    /// Calculated stats, honoring any form or transform override.
    pub fn stats(&self) -> &Stats {
        self.override_stats.as_ref().unwrap_or(&self.stats)
    }

    pub fn max_hp(&self) -> u16 {
        self.stats().hp
    }

    pub fn is_fainted(&self) -> bool {
        self.current_hp == 0
    }

    pub fn status(&self) -> Option<StatusCondition> {
        self.status.map(|s| s.condition)
    }

    pub fn ability_kind(&self) -> Option<&AbilityKind> {
        self.ability.as_ref().map(|a| &a.kind)
    }

    /// Whether this Pokemon's moves punch through the target's ability
    /// based status immunity.
    pub fn ignores_abilities(&self) -> bool {
        matches!(self.ability_kind(), Some(AbilityKind::MoldBreaker))
    }

    fn ignores_opponent_stages(&self) -> bool {
        matches!(self.ability_kind(), Some(AbilityKind::Unaware))
    }

    fn stage_delta_scale(&self) -> i8 {
        if matches!(self.ability_kind(), Some(AbilityKind::Simple)) {
            2
        } else {
            1
        }
    }

    /// Scaling applied to incoming status chances by the ability.
    pub fn status_chance_multiplier(&self) -> f64 {
        match self.ability_kind() {
            Some(AbilityKind::StatusResistance { multiplier }) => *multiplier,
            _ => 1.0,
        }
    }

    /// Scaling applied to weather chip damage: 0.0 when the Pokemon is
    /// spared by type or immune by ability.
    pub fn weather_damage_multiplier(&self, weather: Weather) -> f64 {
        let spared_by_type = match weather {
            Weather::Sandstorm => self.current_types().iter().any(|t| {
                matches!(t, PokemonType::Rock | PokemonType::Ground | PokemonType::Steel)
            }),
            Weather::Hail => self.current_types().contains(&PokemonType::Ice),
            _ => false,
        };
        if spared_by_type {
            return 0.0;
        }
        match self.ability_kind() {
            Some(AbilityKind::WeatherImmunity) => 0.0,
            Some(AbilityKind::WeatherResistance { multiplier }) => *multiplier,
            _ => 1.0,
        }
    }

    /// Combined multiplier for a stat: stage modifier (unless the opponent
    /// ignores stages), status penalties, and conditional ability boosts.
    pub fn stat_multiplier(
        &self,
        stat: StatType,
        weather: Weather,
        opponent: Option<&Pokemon>,
    ) -> f64 {
        let mut multiplier = 1.0;

        let stages_ignored = opponent.is_some_and(|o| o.ignores_opponent_stages());
        if !stages_ignored {
            multiplier *= stage_multiplier(stat, self.stages.get(stat));
        }

        match self.status() {
            Some(StatusCondition::Paralysis) if stat == StatType::Speed => multiplier *= 0.25,
            Some(StatusCondition::Burn) if stat == StatType::Attack => multiplier *= 0.5,
            _ => {}
        }

        if let Some(AbilityKind::StatBoost {
            stat: boosted,
            multiplier: boost,
            required_weather,
            requires_status,
        }) = self.ability_kind()
        {
            let weather_ok = required_weather.map_or(true, |w| w == weather);
            let status_ok = !requires_status || self.status.is_some();
            if *boosted == stat && weather_ok && status_ok {
                multiplier *= boost;
            }
        }

        multiplier
    }

    /// Applies a stage change, doubled by Simple, clamped to [-6, +6].
    /// Returns whether the stage actually moved.
    pub fn modify_stat(&mut self, stat: StatType, delta: i8) -> bool {
        let scaled = delta.saturating_mul(self.stage_delta_scale());
        self.stages.modify(stat, scaled)
    }

    /// Applies or clears a status condition.
    ///
    /// Clearing (`None`) always succeeds and resets every stat stage.
    /// Applying fails against an existing condition, under Misty terrain,
    /// against an ability immunity (unless bypassed), or against a type
    /// immunity. Durations default per condition; sleep rolls 1-3 turns.
    pub fn set_status(
        &mut self,
        status: Option<StatusCondition>,
        duration: Option<u8>,
        bypass_ability: bool,
        terrain: Option<Terrain>,
        rng: &mut BattleRng,
    ) -> bool {
        let condition = match status {
            Some(condition) => condition,
            None => {
                self.status = None;
                self.stages.reset();
                return true;
            }
        };

        if self.status.is_some() {
            return false;
        }
        if terrain == Some(Terrain::Misty) {
            return false;
        }
        if !bypass_ability && matches!(self.ability_kind(), Some(AbilityKind::StatusImmunity)) {
            return false;
        }
        if condition.blocked_by_type(self.current_types()) {
            return false;
        }

        let turns_remaining = match duration {
            Some(turns) => Some(turns),
            None => match condition {
                StatusCondition::Sleep => Some(rng.sleep_turns()),
                StatusCondition::Poison | StatusCondition::Burn | StatusCondition::Paralysis => {
                    Some(TIMED_STATUS_TURNS)
                }
                StatusCondition::Freeze => None,
            },
        };

        self.status = Some(ActiveStatus {
            condition,
            turns_remaining,
        });
        true
    }

    /// Ticks down the status duration. When it runs out the condition is
    /// cleared WITHOUT resetting stat stages, and the expiry message is
    /// returned.
    pub fn update_status(&mut self) -> Option<String> {
        let active = self.status.as_mut()?;
        let turns = active.turns_remaining?;
        if turns > 1 {
            active.turns_remaining = Some(turns - 1);
            return None;
        }
        let condition = active.condition;
        self.status = None;
        Some(match condition {
            StatusCondition::Sleep => format!("{} woke up!", self.name),
            StatusCondition::Poison => format!("{}'s poison wore off!", self.name),
            StatusCondition::Burn => format!("{}'s burn faded!", self.name),
            StatusCondition::Paralysis => format!("{} is no longer paralyzed!", self.name),
            StatusCondition::Freeze => format!("{} thawed out!", self.name),
        })
    }

    /// Clears the status without touching stat stages. Used for thawing
    /// and berry cures, where the clear is not a full cleanse.
    pub fn clear_status_naturally(&mut self) -> Option<StatusCondition> {
        self.status.take().map(|s| s.condition)
    }

    /// Applies damage, letting the disguise, a Focus Sash style item, and
    /// reactive abilities intervene.
    pub fn take_damage(&mut self, amount: u16, ctx: &DamageContext) -> DamageOutcome {
        let mut outcome = DamageOutcome::default();

        if self.disguise_absorbs(ctx) {
            self.disguise_spent = true;
            outcome
                .messages
                .push(format!("{}'s disguise absorbed the hit!", self.name));
            return outcome;
        }

        let mut amount = amount;
        if amount >= self.current_hp && self.current_hp == self.max_hp() {
            if let Some(item_name) = self.prevent_ko_item_name() {
                amount = self.current_hp - 1;
                self.consume_held_item();
                outcome
                    .messages
                    .push(format!("{} hung on using its {}!", self.name, item_name));
            }
        }

        let dealt = amount.min(self.current_hp);
        self.current_hp -= dealt;
        outcome.dealt = dealt;

        if !self.is_fainted() && dealt > 0 {
            if let Some(message) = self.check_form_change() {
                outcome.messages.push(message);
            }
            if let Some(message) = self.check_color_change(ctx.move_type) {
                outcome.messages.push(message);
            }
        }

        outcome
    }

    fn disguise_absorbs(&self, ctx: &DamageContext) -> bool {
        if self.disguise_spent {
            return false;
        }
        let coverage = match self.ability_kind() {
            Some(AbilityKind::Disguise { coverage }) => *coverage,
            _ => return false,
        };
        match coverage {
            DisguiseCoverage::All => true,
            DisguiseCoverage::PhysicalOnly => ctx.category == MoveCategory::Physical,
            DisguiseCoverage::NonSuperEffectiveOnly => ctx.effectiveness <= 1.0,
        }
    }

    fn prevent_ko_item_name(&self) -> Option<String> {
        let item = self.held_item_on(HeldItemTrigger::OnLethalDamage)?;
        match &item.kind {
            ItemKind::Held {
                effect: HeldEffect::PreventKo,
            } => Some(item.name.clone()),
            _ => None,
        }
    }

    fn check_form_change(&mut self) -> Option<String> {
        if self.active_form.is_some() {
            return None;
        }
        let (hp_fraction, form, stat_multiplier) = match self.ability_kind() {
            Some(AbilityKind::FormChange {
                hp_fraction,
                form,
                stat_multiplier,
            }) => (*hp_fraction, form.clone(), *stat_multiplier),
            _ => return None,
        };
        if self.current_hp as f64 / self.max_hp() as f64 > hp_fraction {
            return None;
        }
        let scale = |value: u16| (value as f64 * stat_multiplier) as u16;
        let current = *self.stats();
        self.override_stats = Some(Stats {
            hp: current.hp,
            attack: scale(current.attack),
            defense: scale(current.defense),
            special_attack: scale(current.special_attack),
            special_defense: scale(current.special_defense),
            speed: scale(current.speed),
        });
        self.active_form = Some(form.clone());
        Some(format!("{} changed into its {} form!", self.name, form))
    }

    fn check_color_change(&mut self, move_type: PokemonType) -> Option<String> {
        if !matches!(self.ability_kind(), Some(AbilityKind::ColorChange)) {
            return None;
        }
        if self.current_types() == [move_type] {
            return None;
        }
        self.override_types = Some(vec![move_type]);
        Some(format!("{} became the {} type!", self.name, move_type))
    }

    /// Shifts the Pokemon's type to the move it is about to use.
    pub fn protean_shift(&mut self, move_type: PokemonType) -> Option<String> {
        if !matches!(self.ability_kind(), Some(AbilityKind::Protean)) {
            return None;
        }
        if self.current_types() == [move_type] {
            return None;
        }
        self.override_types = Some(vec![move_type]);
        Some(format!("{} became the {} type!", self.name, move_type))
    }

    /// Restores HP, capped at max. Returns the amount actually restored.
    pub fn heal(&mut self, amount: u16) -> u16 {
        let healed = amount.min(self.max_hp() - self.current_hp);
        self.current_hp += healed;
        healed
    }

    /// The held item, if unconsumed and checked on the given trigger.
    pub fn held_item_on(&self, trigger: HeldItemTrigger) -> Option<&Item> {
        let item = self.held_item.as_ref()?.active()?;
        if item.trigger() == Some(trigger) {
            Some(item)
        } else {
            None
        }
    }

    pub fn consume_held_item(&mut self) {
        if let Some(equipped) = self.held_item.as_mut() {
            equipped.consumed = true;
        }
    }

    /// Applies chip damage (weather, poison, burn) with no held item or
    /// ability intervention. Returns HP actually lost.
    pub fn take_raw_damage(&mut self, amount: u16) -> u16 {
        let dealt = amount.min(self.current_hp);
        self.current_hp -= dealt;
        dealt
    }

    /// Post-damage berry check: heals once at or below the berry's HP
    /// fraction.
    pub fn check_low_hp_berry(&mut self) -> Option<String> {
        let item = self.held_item_on(HeldItemTrigger::LowHp)?;
        let (hp_fraction, amount, item_name) = match &item.kind {
            ItemKind::Berry {
                effect: BerryEffect::HealOnLowHp { hp_fraction, amount },
            } => (*hp_fraction, *amount, item.name.clone()),
            _ => return None,
        };
        if self.is_fainted() || self.current_hp as f64 / self.max_hp() as f64 > hp_fraction {
            return None;
        }
        self.consume_held_item();
        let healed = self.heal(amount);
        Some(format!(
            "{} restored {} HP using its {}!",
            self.name, healed, item_name
        ))
    }

    /// Post-hit berry check after a super effective hit.
    pub fn check_super_effective_berry(&mut self) -> Option<String> {
        let item = self.held_item_on(HeldItemTrigger::OnSuperEffectiveHit)?;
        let (amount, item_name) = match &item.kind {
            ItemKind::Berry {
                effect: BerryEffect::HealOnSuperEffectiveHit { amount },
            } => (*amount, item.name.clone()),
            _ => return None,
        };
        if self.is_fainted() || self.current_hp == self.max_hp() {
            return None;
        }
        self.consume_held_item();
        let healed = self.heal(amount);
        Some(format!(
            "{} restored {} HP using its {}!",
            self.name, healed, item_name
        ))
    }

    /// Status-cure berry check: cures the current condition, consuming the
    /// berry. The clear does not reset stat stages.
    pub fn check_cure_berry(&mut self) -> Option<String> {
        let condition = self.status()?;
        let item = self.held_item_on(HeldItemTrigger::OnStatusApplied)?;
        let item_name = match &item.kind {
            ItemKind::Berry {
                effect: BerryEffect::CureStatus,
            } => item.name.clone(),
            _ => return None,
        };
        self.consume_held_item();
        self.clear_status_naturally();
        Some(format!(
            "{} cured its {} using its {}!",
            self.name, condition, item_name
        ))
    }

    /// Copies the target's types, non-HP stats, and moves. Own HP pool is
    /// kept.
    pub fn transform_into(&mut self, other: &Pokemon) {
        self.override_types = Some(other.current_types().to_vec());
        let theirs = *other.stats();
        self.override_stats = Some(Stats {
            hp: self.stats().hp,
            ..theirs
        });
        self.moves = other.moves.clone();
    }

    /// Copies the target's ability, backing up the original.
    pub fn trace_ability(&mut self, other: &Pokemon) {
        if let Some(theirs) = other.ability.clone() {
            self.traced_ability = self.ability.take();
            self.ability = Some(theirs);
        }
    }

    /// Puts the pre-trace ability back, if one was stored.
    pub fn restore_ability(&mut self) -> Option<String> {
        let original = self.traced_ability.take()?;
        self.ability = Some(original);
        Some(format!("{}'s ability returned to normal!", self.name))
    }

    /// Permanently raises a raw stat (vitamins). Recalculates nothing else;
    /// the boost lands on the calculated stat directly.
    pub fn raise_stat_permanently(&mut self, stat: StatType, amount: u16) {
        let stats = self.override_stats.as_mut().unwrap_or(&mut self.stats);
        match stat {
            StatType::Attack => stats.attack += amount,
            StatType::Defense => stats.defense += amount,
            StatType::SpecialAttack => stats.special_attack += amount,
            StatType::SpecialDefense => stats.special_defense += amount,
            StatType::Speed => stats.speed += amount,
            StatType::Accuracy | StatType::Evasion => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ability::Ability;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn base_stats() -> Stats {
        Stats {
            hp: 100,
            attack: 80,
            defense: 70,
            special_attack: 90,
            special_defense: 60,
            speed: 110,
        }
    }

    fn make(name: &str, types: Vec<PokemonType>) -> Pokemon {
        Pokemon::new(name, types, base_stats(), 50, vec![]).unwrap()
    }

    #[test]
    fn construction_validates_types_and_moves() {
        let err = Pokemon::new("Missingno", vec![], base_stats(), 50, vec![]);
        assert_eq!(err.unwrap_err(), ConstructionError::InvalidTypeCount(0));

        let too_many = Pokemon::new(
            "Missingno",
            vec![PokemonType::Normal, PokemonType::Flying, PokemonType::Fire],
            base_stats(),
            50,
            vec![],
        );
        assert_eq!(too_many.unwrap_err(), ConstructionError::InvalidTypeCount(3));

        let tackle = Move::new("Tackle", PokemonType::Normal, MoveCategory::Physical, 40, Some(100), 35);
        let five_moves = Pokemon::new(
            "Missingno",
            vec![PokemonType::Normal],
            base_stats(),
            50,
            vec![tackle.clone(); 5],
        );
        assert_eq!(five_moves.unwrap_err(), ConstructionError::TooManyMoves(5));
    }

    #[test]
    fn level_is_clamped() {
        let p = Pokemon::new("Mew", vec![PokemonType::Psychic], base_stats(), 0, vec![]).unwrap();
        assert_eq!(p.level, 1);
        let p = Pokemon::new("Mew", vec![PokemonType::Psychic], base_stats(), 255, vec![]).unwrap();
        assert_eq!(p.level, 100);
    }

    #[rstest]
    #[case(StatusCondition::Burn, vec![PokemonType::Fire], false)]
    #[case(StatusCondition::Poison, vec![PokemonType::Poison], false)]
    #[case(StatusCondition::Poison, vec![PokemonType::Steel], false)]
    #[case(StatusCondition::Paralysis, vec![PokemonType::Electric], false)]
    #[case(StatusCondition::Freeze, vec![PokemonType::Ice], false)]
    #[case(StatusCondition::Burn, vec![PokemonType::Grass], true)]
    #[case(StatusCondition::Sleep, vec![PokemonType::Fire], true)]
    fn type_immunities_block_status(
        #[case] condition: StatusCondition,
        #[case] types: Vec<PokemonType>,
        #[case] expected: bool,
    ) {
        let mut p = make("Target", types);
        let mut rng = BattleRng::seeded(1);
        assert_eq!(p.set_status(Some(condition), None, false, None, &mut rng), expected);
    }

    #[test]
    fn misty_terrain_blocks_all_status() {
        let mut p = make("Target", vec![PokemonType::Normal]);
        let mut rng = BattleRng::seeded(1);
        assert!(!p.set_status(
            Some(StatusCondition::Sleep),
            None,
            false,
            Some(Terrain::Misty),
            &mut rng
        ));
        assert!(p.status.is_none());
    }

    #[test]
    fn ability_immunity_yields_to_mold_breaker() {
        let mut p = make("Target", vec![PokemonType::Normal])
            .with_ability(Ability::new("Immunity", AbilityKind::StatusImmunity));
        let mut rng = BattleRng::seeded(1);
        assert!(!p.set_status(Some(StatusCondition::Poison), None, false, None, &mut rng));
        assert!(p.set_status(Some(StatusCondition::Poison), None, true, None, &mut rng));
    }

    #[test]
    fn default_durations() {
        let mut rng = BattleRng::seeded(7);
        let mut p = make("Target", vec![PokemonType::Normal]);
        p.set_status(Some(StatusCondition::Poison), None, false, None, &mut rng);
        assert_eq!(p.status.unwrap().turns_remaining, Some(5));

        let mut p = make("Target", vec![PokemonType::Normal]);
        p.set_status(Some(StatusCondition::Freeze), None, false, None, &mut rng);
        assert_eq!(p.status.unwrap().turns_remaining, None);

        let mut p = make("Target", vec![PokemonType::Normal]);
        p.set_status(Some(StatusCondition::Sleep), None, false, None, &mut rng);
        let turns = p.status.unwrap().turns_remaining.unwrap();
        assert!((1..=3).contains(&turns));
    }

    #[test]
    fn clearing_status_resets_stages_but_expiry_does_not() {
        let mut rng = BattleRng::seeded(1);
        let mut p = make("Target", vec![PokemonType::Normal]);
        p.modify_stat(StatType::Attack, 2);
        p.set_status(Some(StatusCondition::Burn), Some(1), false, None, &mut rng);

        // Natural expiry keeps the stages.
        let message = p.update_status();
        assert_eq!(message, Some("Target's burn faded!".to_string()));
        assert_eq!(p.stages.attack, 2);

        // A full clear resets them.
        p.set_status(Some(StatusCondition::Burn), Some(3), false, None, &mut rng);
        p.set_status(None, None, false, None, &mut rng);
        assert_eq!(p.stages.attack, 0);
    }

    #[test]
    fn update_status_decrements_without_clearing_early() {
        let mut rng = BattleRng::seeded(1);
        let mut p = make("Target", vec![PokemonType::Normal]);
        p.set_status(Some(StatusCondition::Poison), Some(2), false, None, &mut rng);
        assert_eq!(p.update_status(), None);
        assert_eq!(p.status.unwrap().turns_remaining, Some(1));
        assert!(p.update_status().is_some());
        assert!(p.status.is_none());
    }

    #[test]
    fn burn_halves_attack_and_paralysis_quarters_speed() {
        let mut rng = BattleRng::seeded(1);
        let mut p = make("Target", vec![PokemonType::Normal]);
        p.set_status(Some(StatusCondition::Burn), None, false, None, &mut rng);
        assert_eq!(p.stat_multiplier(StatType::Attack, Weather::Clear, None), 0.5);
        assert_eq!(p.stat_multiplier(StatType::SpecialAttack, Weather::Clear, None), 1.0);

        let mut p = make("Target", vec![PokemonType::Normal]);
        p.set_status(Some(StatusCondition::Paralysis), None, false, None, &mut rng);
        assert_eq!(p.stat_multiplier(StatType::Speed, Weather::Clear, None), 0.25);
    }

    #[test]
    fn unaware_opponent_ignores_stages() {
        let mut p = make("Booster", vec![PokemonType::Normal]);
        p.modify_stat(StatType::Attack, 6);
        let unaware = make("Wall", vec![PokemonType::Normal])
            .with_ability(Ability::new("Unaware", AbilityKind::Unaware));
        assert_eq!(p.stat_multiplier(StatType::Attack, Weather::Clear, Some(&unaware)), 1.0);
        let plain = make("Wall", vec![PokemonType::Normal]);
        assert_eq!(p.stat_multiplier(StatType::Attack, Weather::Clear, Some(&plain)), 4.0);
    }

    #[test]
    fn simple_doubles_stage_deltas() {
        let mut p = make("Target", vec![PokemonType::Normal])
            .with_ability(Ability::new("Simple", AbilityKind::Simple));
        assert!(p.modify_stat(StatType::Speed, 1));
        assert_eq!(p.stages.speed, 2);
    }

    #[test]
    fn conditional_stat_boost_gates_on_weather() {
        let p = make("Swimmer", vec![PokemonType::Water]).with_ability(Ability::new(
            "Swift Swim",
            AbilityKind::StatBoost {
                stat: StatType::Speed,
                multiplier: 2.0,
                required_weather: Some(Weather::Rain),
                requires_status: false,
            },
        ));
        assert_eq!(p.stat_multiplier(StatType::Speed, Weather::Rain, None), 2.0);
        assert_eq!(p.stat_multiplier(StatType::Speed, Weather::Clear, None), 1.0);
    }

    #[test]
    fn focus_sash_leaves_one_hp_from_full() {
        let sash = Item::new(
            "Focus Sash",
            "Endures a lethal hit.",
            ItemKind::Held { effect: HeldEffect::PreventKo },
            2000,
            true,
        );
        let mut p = make("Holder", vec![PokemonType::Normal]).with_held_item(sash);
        let ctx = DamageContext {
            category: MoveCategory::Physical,
            move_type: PokemonType::Normal,
            effectiveness: 1.0,
        };
        let outcome = p.take_damage(9999, &ctx);
        assert_eq!(p.current_hp, 1);
        assert_eq!(outcome.dealt, p.max_hp() - 1);
        assert_eq!(
            outcome.messages,
            vec!["Holder hung on using its Focus Sash!".to_string()]
        );

        // Consumed: the next lethal hit goes through.
        let outcome = p.take_damage(9999, &ctx);
        assert!(p.is_fainted());
        assert_eq!(outcome.dealt, 1);
    }

    #[test]
    fn sash_does_not_trigger_below_full_hp() {
        let sash = Item::new(
            "Focus Sash",
            "Endures a lethal hit.",
            ItemKind::Held { effect: HeldEffect::PreventKo },
            2000,
            true,
        );
        let mut p = make("Holder", vec![PokemonType::Normal]).with_held_item(sash);
        p.current_hp -= 1;
        let ctx = DamageContext {
            category: MoveCategory::Physical,
            move_type: PokemonType::Normal,
            effectiveness: 1.0,
        };
        p.take_damage(9999, &ctx);
        assert!(p.is_fainted());
    }

    #[rstest]
    #[case(DisguiseCoverage::All, MoveCategory::Special, 2.0, true)]
    #[case(DisguiseCoverage::PhysicalOnly, MoveCategory::Physical, 2.0, true)]
    #[case(DisguiseCoverage::PhysicalOnly, MoveCategory::Special, 1.0, false)]
    #[case(DisguiseCoverage::NonSuperEffectiveOnly, MoveCategory::Special, 1.0, true)]
    #[case(DisguiseCoverage::NonSuperEffectiveOnly, MoveCategory::Special, 2.0, false)]
    fn disguise_coverage(
        #[case] coverage: DisguiseCoverage,
        #[case] category: MoveCategory,
        #[case] effectiveness: f64,
        #[case] absorbed: bool,
    ) {
        let mut p = make("Mimic", vec![PokemonType::Ghost])
            .with_ability(Ability::new("Disguise", AbilityKind::Disguise { coverage }));
        let ctx = DamageContext {
            category,
            move_type: PokemonType::Normal,
            effectiveness,
        };
        let outcome = p.take_damage(30, &ctx);
        if absorbed {
            assert_eq!(outcome.dealt, 0);
            assert_eq!(p.current_hp, p.max_hp());
            // One-shot: a second identical hit lands.
            let outcome = p.take_damage(30, &ctx);
            assert_eq!(outcome.dealt, 30);
        } else {
            assert_eq!(outcome.dealt, 30);
        }
    }

    #[test]
    fn form_change_fires_once_at_threshold() {
        let mut p = make("Shifter", vec![PokemonType::Normal]).with_ability(Ability::new(
            "Stance Shift",
            AbilityKind::FormChange {
                hp_fraction: 0.5,
                form: "Blade".to_string(),
                stat_multiplier: 1.5,
            },
        ));
        let before_attack = p.stats().attack;
        let ctx = DamageContext {
            category: MoveCategory::Physical,
            move_type: PokemonType::Normal,
            effectiveness: 1.0,
        };
        let half = p.max_hp() / 2;
        let outcome = p.take_damage(half, &ctx);
        assert_eq!(outcome.messages, vec!["Shifter changed into its Blade form!".to_string()]);
        assert_eq!(p.active_form.as_deref(), Some("Blade"));
        assert_eq!(p.stats().attack, (before_attack as f64 * 1.5) as u16);
        assert_eq!(p.max_hp(), p.stats.hp);

        // Already shifted: no second change.
        let outcome = p.take_damage(5, &ctx);
        assert!(outcome.messages.is_empty());
    }

    #[test]
    fn color_change_follows_the_last_hit() {
        let mut p = make("Chameleon", vec![PokemonType::Normal])
            .with_ability(Ability::new("Color Change", AbilityKind::ColorChange));
        let ctx = DamageContext {
            category: MoveCategory::Special,
            move_type: PokemonType::Water,
            effectiveness: 1.0,
        };
        let outcome = p.take_damage(10, &ctx);
        assert_eq!(outcome.messages, vec!["Chameleon became the Water type!".to_string()]);
        assert_eq!(p.current_types(), [PokemonType::Water]);
    }

    #[test]
    fn transform_copies_everything_but_hp() {
        let tackle = Move::new("Tackle", PokemonType::Normal, MoveCategory::Physical, 40, Some(100), 35);
        let target = Pokemon::new(
            "Target",
            vec![PokemonType::Dragon],
            Stats { hp: 200, attack: 150, defense: 150, special_attack: 150, special_defense: 150, speed: 150 },
            50,
            vec![tackle],
        )
        .unwrap();
        let mut p = make("Ditto", vec![PokemonType::Normal]);
        let own_hp = p.max_hp();
        p.transform_into(&target);
        assert_eq!(p.current_types(), [PokemonType::Dragon]);
        assert_eq!(p.stats().attack, target.stats().attack);
        assert_eq!(p.max_hp(), own_hp);
        assert_eq!(p.moves.len(), 1);
    }

    #[test]
    fn trace_restores_on_demand() {
        let mut p = make("Tracer", vec![PokemonType::Normal])
            .with_ability(Ability::new("Trace", AbilityKind::Trace));
        let other = make("Source", vec![PokemonType::Normal])
            .with_ability(Ability::new("Simple", AbilityKind::Simple));
        p.trace_ability(&other);
        assert_eq!(p.ability.as_ref().unwrap().name, "Simple");
        let message = p.restore_ability();
        assert_eq!(message, Some("Tracer's ability returned to normal!".to_string()));
        assert_eq!(p.ability.as_ref().unwrap().name, "Trace");
    }
}
