use crate::moves::MoveCategory;
use crate::pokemon::Pokemon;
use crate::stats::StatType;
use crate::types::PokemonType;
use serde::{Deserialize, Serialize};
use std::fmt;

/// When a held item's effect is checked by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HeldItemTrigger {
    /// Always in effect (damage boosts).
    Passive,
    /// After taking damage, while at or below an HP fraction.
    LowHp,
    /// Right after a status condition lands on the holder.
    OnStatusApplied,
    /// After being hit super effectively.
    OnSuperEffectiveHit,
    /// During the end-of-turn phase.
    EndOfTurn,
    /// When a hit would reduce the holder to 0 HP.
    OnLethalDamage,
}

/// Effects carried by held berries. Single-use.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum BerryEffect {
    /// Restores HP once the holder drops to or below the fraction.
    HealOnLowHp { hp_fraction: f64, amount: u16 },
    /// Restores HP after the holder is hit super effectively.
    HealOnSuperEffectiveHit { amount: u16 },
    /// Cures any status condition as soon as one lands.
    CureStatus,
}

/// Effects carried by non-berry held items.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum HeldEffect {
    /// Restores a fraction of max HP each turn.
    EndOfTurnHeal { hp_fraction: f64 },
    /// Survive a lethal hit from full HP at 1 HP. Consumed.
    PreventKo,
    /// Boosts damage dealt by one move category.
    DamageBoost { category: MoveCategory, multiplier: f64 },
    /// Boosts damage of moves matching a type by a percentage.
    TypeBoost { boost_type: PokemonType, percent: u16 },
}

/// What an item does when used or held.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ItemKind {
    /// Restores a flat amount of HP.
    Healing { amount: u16 },
    /// Restores PP to every move. None restores fully.
    PpRestore { amount: Option<u8> },
    /// Clears the target's status condition.
    StatusCure,
    /// Raises a stat by some stages for the battle.
    StatBoost { stat: StatType, stages: i8 },
    /// Permanently raises a raw stat.
    Vitamin { stat: StatType, amount: u16 },
    /// Capture device. The block flag is baked in when the item is made
    /// for a trainer battle.
    Pokeball { trainer_only_block: bool },
    Berry { effect: BerryEffect },
    Held { effect: HeldEffect },
}

/// An item definition. Consumption state for held items lives on the
/// equip (`EquippedItem`), not here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub name: String,
    pub description: String,
    pub kind: ItemKind,
    pub price: u32,
    pub single_use: bool,
}

impl Item {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        kind: ItemKind,
        price: u32,
        single_use: bool,
    ) -> Self {
        Item {
            name: name.into(),
            description: description.into(),
            kind,
            price,
            single_use,
        }
    }

    /// The trigger the engine should check this item on, for held items.
    pub fn trigger(&self) -> Option<HeldItemTrigger> {
        match &self.kind {
            ItemKind::Berry { effect } => Some(match effect {
                BerryEffect::HealOnLowHp { .. } => HeldItemTrigger::LowHp,
                BerryEffect::HealOnSuperEffectiveHit { .. } => {
                    HeldItemTrigger::OnSuperEffectiveHit
                }
                BerryEffect::CureStatus => HeldItemTrigger::OnStatusApplied,
            }),
            ItemKind::Held { effect } => Some(match effect {
                HeldEffect::EndOfTurnHeal { .. } => HeldItemTrigger::EndOfTurn,
                HeldEffect::PreventKo => HeldItemTrigger::OnLethalDamage,
                HeldEffect::DamageBoost { .. } => HeldItemTrigger::Passive,
                HeldEffect::TypeBoost { .. } => HeldItemTrigger::Passive,
            }),
            _ => None,
        }
    }

    /// Whether the item would do anything if used on the target right now.
    pub fn can_use(&self, target: &Pokemon) -> bool {
        match &self.kind {
            ItemKind::Healing { .. } => target.current_hp < target.stats().hp,
            ItemKind::PpRestore { .. } => target.moves.iter().any(|m| m.pp < m.max_pp),
            ItemKind::StatusCure => target.status().is_some(),
            ItemKind::Pokeball { trainer_only_block } => !trainer_only_block,
            ItemKind::Berry { effect } => match effect {
                BerryEffect::HealOnLowHp { .. } | BerryEffect::HealOnSuperEffectiveHit { .. } => {
                    target.current_hp < target.stats().hp
                }
                BerryEffect::CureStatus => target.status().is_some(),
            },
            // Held items only do something while equipped.
            ItemKind::Held { .. } => false,
            ItemKind::StatBoost { .. } | ItemKind::Vitamin { .. } => true,
        }
    }
}

impl fmt::Display for Item {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.name, self.description)
    }
}

/// An item held by a Pokemon, with its in-battle consumption state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EquippedItem {
    pub item: Item,
    pub consumed: bool,
}

impl EquippedItem {
    pub fn new(item: Item) -> Self {
        EquippedItem {
            item,
            consumed: false,
        }
    }

    /// The item, if it has not been consumed this battle.
    pub fn active(&self) -> Option<&Item> {
        if self.consumed {
            None
        } else {
            Some(&self.item)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn potion() -> Item {
        Item::new("Potion", "Restores 20 HP.", ItemKind::Healing { amount: 20 }, 300, true)
    }

    #[test]
    fn pokeball_gate_follows_baked_in_flag() {
        let wild_ball = Item::new(
            "Poke Ball",
            "Catches wild Pokemon.",
            ItemKind::Pokeball { trainer_only_block: false },
            200,
            true,
        );
        let trainer_ball = Item::new(
            "Poke Ball",
            "Catches wild Pokemon.",
            ItemKind::Pokeball { trainer_only_block: true },
            200,
            true,
        );
        let target = Pokemon::new(
            "Rattata",
            vec![PokemonType::Normal],
            crate::stats::Stats {
                hp: 30,
                attack: 56,
                defense: 35,
                special_attack: 25,
                special_defense: 35,
                speed: 72,
            },
            10,
            vec![],
        )
        .unwrap();
        assert!(wild_ball.can_use(&target));
        assert!(!trainer_ball.can_use(&target));
    }

    #[test]
    fn held_item_triggers() {
        let sash = Item::new(
            "Focus Sash",
            "Endures a lethal hit.",
            ItemKind::Held { effect: HeldEffect::PreventKo },
            2000,
            true,
        );
        assert_eq!(sash.trigger(), Some(HeldItemTrigger::OnLethalDamage));

        let oran = Item::new(
            "Oran Berry",
            "Restores HP in a pinch.",
            ItemKind::Berry {
                effect: BerryEffect::HealOnLowHp { hp_fraction: 0.25, amount: 10 },
            },
            100,
            true,
        );
        assert_eq!(oran.trigger(), Some(HeldItemTrigger::LowHp));
        assert_eq!(potion().trigger(), None);
    }

    #[test]
    fn equipped_item_tracks_consumption() {
        let mut equipped = EquippedItem::new(potion());
        assert!(equipped.active().is_some());
        equipped.consumed = true;
        assert!(equipped.active().is_none());
    }
}
