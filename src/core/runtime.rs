//! Per-player combat runtime.
//!
//! `PlayerRuntime` is the mutable combat record created when a role is
//! assigned: current/max/temp hp, a mutable copy of the role's base stats,
//! persistent stat tokens, per-turn boosts, equipped installs, and the
//! typed role counters.
//!
//! Invariant: for combat stats, `effective = base + token + boost`. Hp is
//! never computed that way - it is tracked directly and clamped to
//! `[0, max_hp]`, with `max_hp` resynced whenever the base hp changes.

use serde::{Deserialize, Serialize};

use super::ids::InstanceId;
use crate::catalog::{CardId, RoleParams};

/// A combat stat. Hp is tracked directly on the runtime; the other four
/// participate in the token/boost arithmetic.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stat {
    Hp,
    Atk,
    Def,
    Spe,
    Bra,
}

impl Stat {
    /// The four stats that carry tokens and boosts.
    pub const COMBAT: [Stat; 4] = [Stat::Atk, Stat::Def, Stat::Spe, Stat::Bra];

    /// Whether this stat participates in token/boost arithmetic.
    #[must_use]
    pub fn is_combat(self) -> bool {
        !matches!(self, Stat::Hp)
    }
}

impl std::fmt::Display for Stat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Stat::Hp => "hp",
            Stat::Atk => "atk",
            Stat::Def => "def",
            Stat::Spe => "spe",
            Stat::Bra => "bra",
        };
        f.write_str(name)
    }
}

/// Additive modifiers for the four combat stats.
///
/// Used twice: once for persistent stat tokens and once for per-turn boosts.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatDeltas {
    pub atk: i64,
    pub def: i64,
    pub spe: i64,
    pub bra: i64,
}

impl StatDeltas {
    /// Get the delta for a stat. Hp carries no deltas and reads as 0.
    #[must_use]
    pub fn get(&self, stat: Stat) -> i64 {
        match stat {
            Stat::Hp => 0,
            Stat::Atk => self.atk,
            Stat::Def => self.def,
            Stat::Spe => self.spe,
            Stat::Bra => self.bra,
        }
    }

    /// Add a delta to a stat. Hp is ignored.
    pub fn add(&mut self, stat: Stat, delta: i64) {
        match stat {
            Stat::Hp => {}
            Stat::Atk => self.atk += delta,
            Stat::Def => self.def += delta,
            Stat::Spe => self.spe += delta,
            Stat::Bra => self.bra += delta,
        }
    }
}

/// Phase of the two-turn surgery status.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SurgeryPhase {
    /// The patient skips their next turn, then moves to `Heal`.
    Immobilize,
    /// The scheduled amount is healed and the status clears.
    Heal,
}

/// The surgery status applied by the doctor role.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Surgery {
    pub phase: SurgeryPhase,
    pub heal_amount: i64,
}

fn is_zero(v: &i64) -> bool {
    *v == 0
}

/// Role-specific counters.
///
/// A sparse struct where zero means absent: counters prune to zero when
/// they decay, and zero-valued fields are skipped in serialization.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RoleCounters {
    /// Unused bra banked by discharge-family players at end of turn.
    #[serde(default, skip_serializing_if = "is_zero")]
    pub charge_tokens: i64,

    /// Every full group of 5 drains 1 bra at the victim's turn start.
    #[serde(default, skip_serializing_if = "is_zero")]
    pub shock_tokens: i64,

    /// Bra deducted at the victim's next turn start, after shock decay.
    #[serde(default, skip_serializing_if = "is_zero")]
    pub pending_bra_penalty: i64,

    /// End-of-turn damage (or healing, for flame) equal to the stack count.
    #[serde(default, skip_serializing_if = "is_zero")]
    pub burn_stacks: i64,

    /// Two-phase surgery status.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub surgery: Option<Surgery>,
}

impl RoleCounters {
    /// Whether every counter has decayed to its absent value.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.charge_tokens == 0
            && self.shock_tokens == 0
            && self.pending_bra_penalty == 0
            && self.burn_stacks == 0
            && self.surgery.is_none()
    }
}

/// An equipped install card: an opaque instance/definition pair.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Install {
    pub instance_id: InstanceId,
    pub card_id: CardId,
}

/// The mutable combat record for one player.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlayerRuntime {
    /// Current hp, clamped to `[0, max_hp]`.
    pub hp: i64,

    /// Tracks `base_stats.hp` whenever that base value changes.
    pub max_hp: i64,

    /// Absorbs damage before hp.
    pub temp_hp: i64,

    /// Mutable copy of the role's params; some effects alter it permanently.
    pub base_stats: RoleParams,

    /// Persistent additive stat modifiers.
    pub stat_tokens: StatDeltas,

    /// Additive modifiers scoped to the current turn.
    pub turn_boosts: StatDeltas,

    /// Equipped installs, in play order.
    pub installs: Vec<Install>,

    pub defeated: bool,

    #[serde(default)]
    pub counters: RoleCounters,
}

impl PlayerRuntime {
    /// Create a fresh runtime from a role's base params.
    #[must_use]
    pub fn from_params(params: &RoleParams) -> Self {
        Self {
            hp: params.hp,
            max_hp: params.hp,
            temp_hp: 0,
            base_stats: *params,
            stat_tokens: StatDeltas::default(),
            turn_boosts: StatDeltas::default(),
            installs: Vec::new(),
            defeated: false,
            counters: RoleCounters::default(),
        }
    }

    /// Heal up to `amount`, clamped at `max_hp`. Returns the hp gained.
    pub fn heal(&mut self, amount: i64) -> i64 {
        let before = self.hp;
        self.hp = (self.hp + amount.max(0)).min(self.max_hp);
        self.hp - before
    }

    /// Find the position of an install by instance id.
    #[must_use]
    pub fn install_position(&self, instance_id: InstanceId) -> Option<usize> {
        self.installs
            .iter()
            .position(|i| i.instance_id == instance_id)
    }

    /// Whether an install of the given card is already equipped.
    #[must_use]
    pub fn has_install_of(&self, card_id: &CardId) -> bool {
        self.installs.iter().any(|i| &i.card_id == card_id)
    }
}
