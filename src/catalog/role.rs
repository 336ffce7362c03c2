//! Role definitions - static role data.
//!
//! A `Role` is an immutable stat block plus its passive abilities, loaded
//! once from the external catalog. Per-match combat state derived from it
//! lives in `core::runtime::PlayerRuntime`.

use serde::{Deserialize, Serialize};

use super::ability::RoleAbility;
use crate::core::Stat;

/// Identifier of a role definition in the external catalog.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoleId(pub String);

impl RoleId {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for RoleId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RoleId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// Base stat block of a role.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleParams {
    pub hp: i64,
    pub atk: i64,
    pub def: i64,
    pub spe: i64,
    pub bra: i64,
}

impl RoleParams {
    #[must_use]
    pub fn get(&self, stat: Stat) -> i64 {
        match stat {
            Stat::Hp => self.hp,
            Stat::Atk => self.atk,
            Stat::Def => self.def,
            Stat::Spe => self.spe,
            Stat::Bra => self.bra,
        }
    }

    pub fn set(&mut self, stat: Stat, value: i64) {
        match stat {
            Stat::Hp => self.hp = value,
            Stat::Atk => self.atk = value,
            Stat::Def => self.def = value,
            Stat::Spe => self.spe = value,
            Stat::Bra => self.bra = value,
        }
    }
}

/// Mechanical family of a role.
///
/// Families carry the scripted behavior that cannot be expressed as plain
/// ability data: the resonate attack cascade, discharge charge banking,
/// doctor surgery, and flame burn affinity. Roles outside those families
/// are `Generic`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoleFamily {
    #[default]
    Generic,
    Resonate,
    Discharge,
    Doctor,
    Flame,
}

/// Static role definition.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Role {
    pub id: RoleId,
    pub name: String,

    #[serde(default)]
    pub family: RoleFamily,

    pub params: RoleParams,

    #[serde(default)]
    pub abilities: Vec<RoleAbility>,

    #[serde(default)]
    pub text: Option<String>,
}

impl Role {
    /// Create a role definition.
    #[must_use]
    pub fn new(
        id: impl Into<RoleId>,
        name: impl Into<String>,
        family: RoleFamily,
        params: RoleParams,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            family,
            params,
            abilities: Vec::new(),
            text: None,
        }
    }

    /// Add a passive ability (builder pattern).
    #[must_use]
    pub fn with_ability(mut self, ability: RoleAbility) -> Self {
        self.abilities.push(ability);
        self
    }

    /// Set the flavor text (builder pattern).
    #[must_use]
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }
}

impl From<String> for RoleId {
    fn from(id: String) -> Self {
        Self(id)
    }
}
