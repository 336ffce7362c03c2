//! Static definitions: roles, cards, abilities, role actions, and the
//! catalog that indexes them. Everything here is immutable once loaded.

pub mod ability;
pub mod actions;
pub mod card;
pub mod registry;
pub mod role;

pub use ability::{
    AbilityAction, AbilityCondition, AbilityTrigger, AbilityValue, ContextField, Direction,
    RoleAbility, ThresholdWindow, TokenSpend,
};
pub use actions::{actions_for, find_action, RoleActionDef, TargetRule};
pub use card::{Card, CardEffect, CardId, CardKind, CardTarget, EffectKind, EffectTrigger};
pub use registry::Catalog;
pub use role::{Role, RoleFamily, RoleId, RoleParams};
