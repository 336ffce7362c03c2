//! Role action catalog.
//!
//! Each role family has a static list of explicit, player-invoked actions
//! (distinct from the generic role attack): id, bra cost, and targeting
//! rule. The engine consults this table when resolving `role_action`; the
//! scripted behavior itself lives in `engine::actions`.

use serde::{Deserialize, Serialize};

use super::role::RoleFamily;

/// Who a role action may target.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetRule {
    /// Always targets the actor; any supplied target is ignored.
    Self_,
    /// Requires a target other than the actor.
    Others,
    /// Requires a target; the actor is allowed.
    Any,
}

/// Static definition of one role action.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct RoleActionDef {
    pub id: &'static str,
    pub name: &'static str,
    pub cost: i64,
    pub target: TargetRule,
}

const DISCHARGE_ACTIONS: &[RoleActionDef] = &[
    RoleActionDef {
        id: "release_charge",
        name: "Release Charge",
        cost: 1,
        target: TargetRule::Others,
    },
    RoleActionDef {
        id: "static_jolt",
        name: "Static Jolt",
        cost: 1,
        target: TargetRule::Others,
    },
];

const DOCTOR_ACTIONS: &[RoleActionDef] = &[
    RoleActionDef {
        id: "surgery",
        name: "Surgery",
        cost: 2,
        target: TargetRule::Any,
    },
    RoleActionDef {
        id: "first_aid",
        name: "First Aid",
        cost: 1,
        target: TargetRule::Any,
    },
];

const FLAME_ACTIONS: &[RoleActionDef] = &[RoleActionDef {
    id: "ignite",
    name: "Ignite",
    cost: 1,
    target: TargetRule::Others,
}];

const RESONATE_ACTIONS: &[RoleActionDef] = &[RoleActionDef {
    id: "overwhelm",
    name: "Overwhelm",
    cost: 2,
    target: TargetRule::Others,
}];

/// The actions available to a role family.
#[must_use]
pub fn actions_for(family: RoleFamily) -> &'static [RoleActionDef] {
    match family {
        RoleFamily::Generic => &[],
        RoleFamily::Discharge => DISCHARGE_ACTIONS,
        RoleFamily::Doctor => DOCTOR_ACTIONS,
        RoleFamily::Flame => FLAME_ACTIONS,
        RoleFamily::Resonate => RESONATE_ACTIONS,
    }
}

/// Look up one action by id within a family.
#[must_use]
pub fn find_action(family: RoleFamily, id: &str) -> Option<&'static RoleActionDef> {
    actions_for(family).iter().find(|a| a.id == id)
}
