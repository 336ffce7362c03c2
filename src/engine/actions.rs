//! Role actions - the per-family scripted moves.
//!
//! `role_action` validates ownership, cost, and targeting against the static
//! action table, then dispatches to the family handler. The bra cost is
//! deducted only after the handler succeeds, so a rejected action never
//! costs anything.

use tracing::debug;

use super::GameEngine;
use crate::catalog::{find_action, RoleFamily, TargetRule};
use crate::core::{
    transitions, GameState, LogEvent, MatchStatus, PlayerId, Stat, Surgery, SurgeryPhase,
};
use crate::effects::effective_stat;
use crate::error::EngineError;

impl GameEngine {
    /// Invoke a role-exclusive action.
    pub fn role_action(
        &mut self,
        player: PlayerId,
        action_id: &str,
        target: Option<PlayerId>,
    ) -> Result<(), EngineError> {
        self.ensure_turn(&self.state, player)?;
        let family = self
            .role_of(&self.state, player)
            .map_or(RoleFamily::Generic, |r| r.family);
        let def = find_action(family, action_id)
            .ok_or_else(|| EngineError::UnknownAction(action_id.to_string()))?;

        let resolved = match def.target {
            TargetRule::Self_ => player,
            TargetRule::Others => {
                let t = target.ok_or(EngineError::TargetRequired)?;
                if t == player {
                    return Err(EngineError::SelfTargetNotAllowed);
                }
                t
            }
            TargetRule::Any => target.ok_or(EngineError::TargetRequired)?,
        };
        if !self.state.is_seated(resolved) {
            return Err(EngineError::UnknownPlayer(resolved));
        }
        if self.state.is_defeated(resolved) {
            return Err(EngineError::TargetDefeated);
        }

        let bra = self.state.bra(player);
        if bra < def.cost {
            return Err(EngineError::InsufficientBra {
                need: def.cost,
                have: bra,
            });
        }

        let mut next = self.state.clone();
        match (family, action_id) {
            (RoleFamily::Discharge, "release_charge") => {
                self.release_charge(&mut next, player, resolved)?
            }
            (RoleFamily::Discharge, "static_jolt") => self.static_jolt(&mut next, resolved),
            (RoleFamily::Doctor, "surgery") => self.surgery(&mut next, resolved)?,
            (RoleFamily::Doctor, "first_aid") => self.first_aid(&mut next, player, resolved),
            (RoleFamily::Flame, "ignite") => self.ignite(&mut next, resolved),
            (RoleFamily::Resonate, "overwhelm") => self.overwhelm(&mut next, resolved),
            _ => return Err(EngineError::UnknownAction(action_id.to_string())),
        }

        next = transitions::consume_bra(&next, player, def.cost);
        next.push_log(LogEvent::RoleAction {
            player,
            action: action_id.to_string(),
            target: Some(resolved),
        });
        if next.status == MatchStatus::InProgress && next.is_defeated(player) {
            // a retaliation ability can defeat the actor mid-action; defeat
            // handling already repointed the match at the successor
            if let Some(p) = next.current_player_id {
                self.begin_turn_at(&mut next, p);
            }
        }
        next.touch();
        debug!(player = %player, action = action_id, target = %resolved, "role action");
        self.state = next;
        Ok(())
    }

    /// Discharge: convert every banked charge token into damage, at 2 per
    /// token, in a single burst.
    fn release_charge(
        &self,
        state: &mut GameState,
        player: PlayerId,
        target: PlayerId,
    ) -> Result<(), EngineError> {
        let charge = state
            .runtime(player)
            .map_or(0, |rt| rt.counters.charge_tokens);
        if charge <= 0 {
            return Err(EngineError::NothingToRelease);
        }
        if let Some(rt) = state.runtime_mut(player) {
            rt.counters.charge_tokens = 0;
        }
        self.apply_damage(state, target, Some(player), charge * 2);
        Ok(())
    }

    /// Discharge: load shock tokens onto the target. Every full group of 5
    /// drains 1 bra at the target's turn start.
    fn static_jolt(&self, state: &mut GameState, target: PlayerId) {
        if let Some(rt) = state.runtime_mut(target) {
            rt.counters.shock_tokens += 3;
        }
        state.push_log(LogEvent::StatusEffect {
            player: target,
            status: "shock".into(),
            amount: 3,
        });
    }

    /// Doctor: immobilize the patient for one turn, then heal a third of
    /// their max hp at their next turn start.
    fn surgery(&self, state: &mut GameState, target: PlayerId) -> Result<(), EngineError> {
        let Some(rt) = state.runtime(target) else {
            return Err(EngineError::UnknownPlayer(target));
        };
        if rt.counters.surgery.is_some() {
            return Err(EngineError::DuplicateStatus);
        }
        let heal_amount = rt.max_hp / 3;
        if let Some(rt) = state.runtime_mut(target) {
            rt.counters.surgery = Some(Surgery {
                phase: SurgeryPhase::Immobilize,
                heal_amount,
            });
        }
        state.push_log(LogEvent::StatusEffect {
            player: target,
            status: "surgery".into(),
            amount: heal_amount,
        });
        Ok(())
    }

    /// Doctor: immediate heal scaling with the doctor's speed.
    fn first_aid(&self, state: &mut GameState, player: PlayerId, target: PlayerId) {
        let amount = (effective_stat(state.runtime(player), Stat::Spe) / 2).max(1);
        let mut healed = 0;
        if let Some(rt) = state.runtime_mut(target) {
            healed = rt.heal(amount);
        }
        state.push_log(LogEvent::StatusEffect {
            player: target,
            status: "first_aid".into(),
            amount: healed,
        });
    }

    /// Flame: stack burn on the target; it ticks at their end of turn.
    fn ignite(&self, state: &mut GameState, target: PlayerId) {
        if let Some(rt) = state.runtime_mut(target) {
            rt.counters.burn_stacks += 2;
        }
        state.push_log(LogEvent::StatusEffect {
            player: target,
            status: "burn".into(),
            amount: 2,
        });
    }

    /// Resonate: saddle the target with a bra penalty at their next turn
    /// start.
    fn overwhelm(&self, state: &mut GameState, target: PlayerId) {
        if let Some(rt) = state.runtime_mut(target) {
            rt.counters.pending_bra_penalty += 2;
        }
        state.push_log(LogEvent::StatusEffect {
            player: target,
            status: "bra_penalty".into(),
            amount: 2,
        });
    }
}
