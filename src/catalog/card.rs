//! Card definitions - static card data.
//!
//! A `Card` is an immutable definition: kind, cost, and an ordered list of
//! effects, each tagged with the trigger that resolves it. Skill and boost
//! cards resolve their `OnPlay` effects and go to the discard; install cards
//! stay in front of their owner and react to later events.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::core::Stat;
use crate::effects::Amount;

/// Identifier of a card definition in the external catalog.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CardId(pub String);

impl CardId {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for CardId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for CardId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for CardId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Card kind.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CardKind {
    Skill,
    Install,
    Boost,
}

/// Who a card effect applies to.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CardTarget {
    /// The acting player.
    Self_,
    /// Every seated player.
    AllPlayers,
    /// Exactly one caller-chosen player, never the actor.
    ChosenEnemy,
    /// The caller-chosen players, as given.
    ChosenPlayers,
}

/// When a card effect resolves.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EffectTrigger {
    /// On playing a skill/boost card.
    OnPlay,
    /// On equipping an install card.
    OnEquip,
    /// Install reaction inside the damage funnel.
    BeforeDamageTaken,
    /// Install reaction after the owner's role attack.
    AfterRoleAttack,
}

/// What a card effect does.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EffectKind {
    /// Deal damage to the resolved targets.
    DealDamage {
        amount: Amount,
        /// Subtract each target's effective def before applying.
        #[serde(default)]
        subtract_def: bool,
        target: CardTarget,
    },

    /// Grant persistent stat tokens.
    AddStatToken {
        stat: Stat,
        amount: Amount,
        target: CardTarget,
    },

    /// Move a target's whole hand to the shared discard.
    DiscardAllHand { target: CardTarget },

    /// The actor picks a stat and gains tokens equal to its current base
    /// value, doubling it via tokens rather than mutating the base.
    DoubleBaseStat {
        /// Permitted choices; empty means any combat stat.
        #[serde(default)]
        allowed: Vec<Stat>,
        #[serde(default)]
        excluded: Vec<Stat>,
    },

    /// Install reaction: zero incoming damage at or above a threshold.
    ThresholdPrevent {
        min_damage: i64,
        /// Destroy the install after it fires.
        #[serde(default)]
        consume: bool,
    },

    /// Install reaction: at full hp, survive a lethal hit at `reset_to` hp.
    /// Always consumes the install.
    CheatDeathAtFull { reset_to: i64 },
}

/// One effect on a card, tagged with its trigger.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CardEffect {
    pub trigger: EffectTrigger,

    /// Skipped unless the player opts in by effect index.
    #[serde(default)]
    pub optional: bool,

    pub kind: EffectKind,
}

/// Static card definition.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Card {
    pub id: CardId,
    pub name: String,
    pub kind: CardKind,
    pub cost: i64,

    /// Resolved in declaration order.
    pub effects: SmallVec<[CardEffect; 2]>,

    /// At most one copy may be installed per player.
    #[serde(default)]
    pub unique: bool,
}

impl Card {
    /// Create a card definition.
    #[must_use]
    pub fn new(id: impl Into<CardId>, name: impl Into<String>, kind: CardKind, cost: i64) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            kind,
            cost,
            effects: SmallVec::new(),
            unique: false,
        }
    }

    /// Add an effect (builder pattern).
    #[must_use]
    pub fn with_effect(mut self, trigger: EffectTrigger, kind: EffectKind) -> Self {
        self.effects.push(CardEffect {
            trigger,
            optional: false,
            kind,
        });
        self
    }

    /// Add an opt-in effect (builder pattern).
    #[must_use]
    pub fn with_optional_effect(mut self, trigger: EffectTrigger, kind: EffectKind) -> Self {
        self.effects.push(CardEffect {
            trigger,
            optional: true,
            kind,
        });
        self
    }

    /// Mark the card unique (builder pattern).
    #[must_use]
    pub fn unique(mut self) -> Self {
        self.unique = true;
        self
    }

    /// Iterate effects of one trigger with their declaration indices.
    pub fn effects_for(
        &self,
        trigger: EffectTrigger,
    ) -> impl Iterator<Item = (usize, &CardEffect)> {
        self.effects
            .iter()
            .enumerate()
            .filter(move |(_, e)| e.trigger == trigger)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_card_builder() {
        let card = Card::new("surge", "Surge", CardKind::Skill, 1)
            .with_effect(
                EffectTrigger::OnPlay,
                EffectKind::DealDamage {
                    amount: Amount::Fixed(3),
                    subtract_def: true,
                    target: CardTarget::ChosenEnemy,
                },
            )
            .with_optional_effect(
                EffectTrigger::OnPlay,
                EffectKind::DiscardAllHand {
                    target: CardTarget::Self_,
                },
            );

        assert_eq!(card.effects.len(), 2);
        assert!(!card.effects[0].optional);
        assert!(card.effects[1].optional);
        assert!(!card.unique);
    }

    #[test]
    fn test_effects_for_keeps_declaration_indices() {
        let card = Card::new("ward", "Ward", CardKind::Install, 1)
            .with_effect(
                EffectTrigger::OnEquip,
                EffectKind::AddStatToken {
                    stat: Stat::Def,
                    amount: Amount::Fixed(1),
                    target: CardTarget::Self_,
                },
            )
            .with_effect(
                EffectTrigger::BeforeDamageTaken,
                EffectKind::ThresholdPrevent {
                    min_damage: 5,
                    consume: true,
                },
            );

        let before: Vec<_> = card.effects_for(EffectTrigger::BeforeDamageTaken).collect();
        assert_eq!(before.len(), 1);
        assert_eq!(before[0].0, 1);
    }

    #[test]
    fn test_card_serde_round_trip() {
        let card = Card::new("relic", "Relic", CardKind::Install, 2)
            .with_effect(
                EffectTrigger::BeforeDamageTaken,
                EffectKind::CheatDeathAtFull { reset_to: 5 },
            )
            .unique();

        let json = serde_json::to_string(&card).unwrap();
        let back: Card = serde_json::from_str(&json).unwrap();
        assert_eq!(card, back);
    }
}
