//! Role abilities - declarative trigger-based passives.
//!
//! An ability watches for a trigger (damage dealt, damage taken, kills,
//! stat-total changes, ...), filters through an optional condition, and runs
//! a list of actions. Values can be literals, fields of the triggering
//! context, or rounded ratios of such fields.
//!
//! `OnStatTotalChanged` is special: it is evaluated synchronously inside
//! every stat-token/base-stat mutation and supports threshold-crossing
//! counting (a jump across several step boundaries fires once per boundary).

use serde::{Deserialize, Serialize};

use crate::core::Stat;
use crate::effects::Rounding;

/// When an ability fires.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AbilityTrigger {
    AfterRoleAttack,
    AfterDealingDamage,
    AfterDamageTaken,
    BeforeDamageTaken,
    OnStatTotalChanged,
    OnAlivePlayersChanged,
    OnKill,
}

/// Direction of a stat-total change.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Up,
    Down,
}

/// Threshold window for `OnStatTotalChanged`.
///
/// Boundaries sit at `from + k * step` for `k >= 1`; the ability fires once
/// per boundary crossed by a single mutation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThresholdWindow {
    pub from: i64,
    pub step: i64,
}

impl ThresholdWindow {
    /// Count boundaries crossed moving from `prev` to `new`.
    #[must_use]
    pub fn crossings(&self, prev: i64, new: i64) -> u32 {
        if self.step <= 0 || prev == new {
            return 0;
        }
        let (lo, hi) = if prev < new { (prev, new) } else { (new, prev) };
        // boundaries b = from + k*step with lo < b <= hi
        let k_hi = (hi - self.from).div_euclid(self.step);
        let k_lo = (lo - self.from).div_euclid(self.step);
        (k_hi - k_lo).max(0) as u32
    }
}

/// Extra filters on top of the trigger.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct AbilityCondition {
    /// Stat whose total this ability watches (`OnStatTotalChanged` only;
    /// `None` watches every stat).
    #[serde(default)]
    pub stat: Option<Stat>,

    /// Required direction of the change (`OnStatTotalChanged`).
    #[serde(default)]
    pub direction: Option<Direction>,

    /// Threshold window (`OnStatTotalChanged`).
    #[serde(default)]
    pub threshold: Option<ThresholdWindow>,

    /// Fires only while at most this many players are alive.
    #[serde(default)]
    pub alive_players_at_most: Option<usize>,
}

/// Context field an ability value can derive from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContextField {
    DamageAmount,
    DamageTaken,
    DamageDealt,
    SpentStatTokens,
}

/// How an ability action computes its magnitude.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AbilityValue {
    Literal(i64),
    FromContext(ContextField),
    Ratio {
        field: ContextField,
        divisor: i64,
        round: Rounding,
    },
}

/// Stat-token spend the owner may make when the ability fires.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenSpend {
    pub stat: Stat,
    pub min: i64,
    pub max: i64,
}

/// One effect of a fired ability.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AbilityAction {
    /// Grant stat tokens to the ability's owner.
    AddStatToken { stat: Stat, value: AbilityValue },

    /// Reduce damage currently being applied (`BeforeDamageTaken` only).
    ReduceIncomingDamage { value: AbilityValue },

    /// Set the owner's max hp (current hp clamped down if needed).
    SetMaxHp { value: AbilityValue },

    /// Set the owner's hp, optionally clamped to `[min, max]`.
    SetHp {
        value: AbilityValue,
        #[serde(default)]
        min: Option<i64>,
        #[serde(default)]
        max: Option<i64>,
    },

    /// The owner damages themselves.
    SelfDamage { value: AbilityValue },

    /// Deal damage back to the attacking source.
    DamageSource { value: AbilityValue },
}

/// A declarative role passive.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RoleAbility {
    pub name: String,
    pub trigger: AbilityTrigger,

    #[serde(default)]
    pub condition: AbilityCondition,

    /// Optional token spend offered to the owner when the ability fires.
    #[serde(default)]
    pub spend: Option<TokenSpend>,

    pub actions: Vec<AbilityAction>,
}

impl RoleAbility {
    /// Create an ability with no condition and no actions.
    #[must_use]
    pub fn new(name: impl Into<String>, trigger: AbilityTrigger) -> Self {
        Self {
            name: name.into(),
            trigger,
            condition: AbilityCondition::default(),
            spend: None,
            actions: Vec::new(),
        }
    }

    /// Set the condition (builder pattern).
    #[must_use]
    pub fn with_condition(mut self, condition: AbilityCondition) -> Self {
        self.condition = condition;
        self
    }

    /// Offer a token spend (builder pattern).
    #[must_use]
    pub fn with_spend(mut self, spend: TokenSpend) -> Self {
        self.spend = Some(spend);
        self
    }

    /// Add an action (builder pattern).
    #[must_use]
    pub fn with_action(mut self, action: AbilityAction) -> Self {
        self.actions.push(action);
        self
    }
}
