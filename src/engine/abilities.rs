//! Role-ability trigger dispatch.
//!
//! Generic triggers (`AfterRoleAttack`, `AfterDamageTaken`, `OnKill`, ...)
//! go through `dispatch_abilities`. Two paths are special-cased:
//! `BeforeDamageTaken` runs inside the damage funnel so it can shrink the
//! pending amount, and `OnStatTotalChanged` is dispatched synchronously from
//! the stat mutation funnel with threshold-crossing counting.
//!
//! Ability actions that grant stat tokens apply them raw, without re-entering
//! the stat-changed dispatch; that keeps trigger chains acyclic.

use super::GameEngine;
use crate::catalog::{
    AbilityAction, AbilityTrigger, AbilityValue, ContextField, Direction,
};
use crate::core::{GameState, PlayerId, Stat};
use crate::effects::{effective_stat, mutate_base_stat};

/// The triggering event's numeric context.
#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct TriggerCtx {
    pub damage_amount: i64,
    pub damage_taken: i64,
    pub damage_dealt: i64,
    pub spent_stat_tokens: i64,
}

impl TriggerCtx {
    fn field(&self, field: ContextField) -> i64 {
        match field {
            ContextField::DamageAmount => self.damage_amount,
            ContextField::DamageTaken => self.damage_taken,
            ContextField::DamageDealt => self.damage_dealt,
            ContextField::SpentStatTokens => self.spent_stat_tokens,
        }
    }
}

/// Evaluate an ability value against the trigger context.
pub(crate) fn eval_value(value: &AbilityValue, ctx: &TriggerCtx) -> i64 {
    match value {
        AbilityValue::Literal(v) => *v,
        AbilityValue::FromContext(field) => ctx.field(*field),
        AbilityValue::Ratio {
            field,
            divisor,
            round,
        } => {
            if *divisor <= 0 {
                0
            } else {
                round.div(ctx.field(*field), *divisor)
            }
        }
    }
}

impl GameEngine {
    /// Fire every ability of `owner` bound to `trigger`.
    ///
    /// `source` is the other party of the event when there is one (the
    /// attacker for damage-taken triggers), used by `DamageSource` actions.
    pub(crate) fn dispatch_abilities(
        &self,
        state: &mut GameState,
        owner: PlayerId,
        trigger: AbilityTrigger,
        ctx: &TriggerCtx,
        source: Option<PlayerId>,
    ) {
        let Some(role) = self.role_of(state, owner) else {
            return;
        };
        for ability in role.abilities.iter().filter(|a| a.trigger == trigger) {
            if !self.condition_met(state, &ability.condition) {
                continue;
            }
            let mut ctx = *ctx;
            if let Some(spend) = ability.spend {
                let available = state
                    .runtime(owner)
                    .map_or(0, |rt| rt.stat_tokens.get(spend.stat));
                let spendable = spend.max.min(available);
                if spendable < spend.min {
                    continue;
                }
                if let Some(rt) = state.runtime_mut(owner) {
                    rt.stat_tokens.add(spend.stat, -spendable);
                }
                ctx.spent_stat_tokens = spendable;
            }
            for action in &ability.actions {
                self.apply_ability_action(state, owner, action, &ctx, source);
            }
        }
    }

    /// `BeforeDamageTaken` pass: lets the target's abilities shrink the
    /// pending damage, spending stat tokens where the ability allows it.
    /// Returns the amount that survives.
    pub(crate) fn run_before_damage_abilities(
        &self,
        state: &mut GameState,
        target: PlayerId,
        amount: i64,
    ) -> i64 {
        let Some(role) = self.role_of(state, target) else {
            return amount;
        };
        let mut remaining = amount;
        for ability in role
            .abilities
            .iter()
            .filter(|a| a.trigger == AbilityTrigger::BeforeDamageTaken)
        {
            if remaining <= 0 {
                break;
            }
            if !self.condition_met(state, &ability.condition) {
                continue;
            }
            let mut ctx = TriggerCtx {
                damage_amount: remaining,
                ..TriggerCtx::default()
            };
            if let Some(spend) = ability.spend {
                let available = state
                    .runtime(target)
                    .map_or(0, |rt| rt.stat_tokens.get(spend.stat));
                let spendable = spend.max.min(available).min(remaining);
                if spendable < spend.min {
                    continue;
                }
                if let Some(rt) = state.runtime_mut(target) {
                    rt.stat_tokens.add(spend.stat, -spendable);
                }
                ctx.spent_stat_tokens = spendable;
            }
            for action in &ability.actions {
                if let AbilityAction::ReduceIncomingDamage { value } = action {
                    remaining = (remaining - eval_value(value, &ctx).max(0)).max(0);
                } else {
                    self.apply_ability_action(state, target, action, &ctx, None);
                }
            }
        }
        remaining
    }

    // === Stat mutation funnel ===

    /// Grant stat tokens through the full funnel, dispatching
    /// `OnStatTotalChanged` for the effective-total change.
    pub(crate) fn add_stat_tokens(
        &self,
        state: &mut GameState,
        player: PlayerId,
        stat: Stat,
        delta: i64,
    ) {
        if delta == 0 || !stat.is_combat() {
            return;
        }
        if state.runtime(player).is_none() {
            return;
        }
        let prev = effective_stat(state.runtime(player), stat);
        if let Some(rt) = state.runtime_mut(player) {
            rt.stat_tokens.add(stat, delta);
        }
        let new = effective_stat(state.runtime(player), stat);
        self.dispatch_stat_changed(state, player, stat, prev, new);
    }

    /// Permanently alter a base stat through the full funnel.
    pub(crate) fn change_base_stat(
        &self,
        state: &mut GameState,
        player: PlayerId,
        stat: Stat,
        mutate: impl FnOnce(i64) -> i64,
    ) {
        let Some(rt) = state.runtime(player) else {
            return;
        };
        let prev = effective_stat(Some(rt), stat);
        let next_rt = mutate_base_stat(rt, stat, mutate);
        state.player_states.insert(player, next_rt);
        let new = effective_stat(state.runtime(player), stat);
        self.dispatch_stat_changed(state, player, stat, prev, new);
    }

    /// `OnStatTotalChanged` dispatch with threshold-crossing counting: a
    /// single mutation that jumps several step boundaries fires once per
    /// boundary, gated by the configured direction.
    fn dispatch_stat_changed(
        &self,
        state: &mut GameState,
        player: PlayerId,
        stat: Stat,
        prev: i64,
        new: i64,
    ) {
        if prev == new {
            return;
        }
        let Some(role) = self.role_of(state, player) else {
            return;
        };
        let went_up = new > prev;
        for ability in role
            .abilities
            .iter()
            .filter(|a| a.trigger == AbilityTrigger::OnStatTotalChanged)
        {
            let cond = &ability.condition;
            if let Some(watched) = cond.stat {
                if watched != stat {
                    continue;
                }
            }
            match cond.direction {
                Some(Direction::Up) if !went_up => continue,
                Some(Direction::Down) if went_up => continue,
                _ => {}
            }
            if !self.condition_met(state, cond) {
                continue;
            }
            let fires = match cond.threshold {
                Some(window) => window.crossings(prev, new),
                None => 1,
            };
            for _ in 0..fires {
                for action in &ability.actions {
                    self.apply_ability_action(state, player, action, &TriggerCtx::default(), None);
                }
            }
        }
    }

    fn condition_met(&self, state: &GameState, cond: &crate::catalog::AbilityCondition) -> bool {
        if let Some(cap) = cond.alive_players_at_most {
            if state.alive_players().len() > cap {
                return false;
            }
        }
        true
    }

    fn apply_ability_action(
        &self,
        state: &mut GameState,
        owner: PlayerId,
        action: &AbilityAction,
        ctx: &TriggerCtx,
        source: Option<PlayerId>,
    ) {
        match action {
            AbilityAction::AddStatToken { stat, value } => {
                let delta = eval_value(value, ctx);
                // raw apply: no stat-changed re-dispatch from ability actions
                if let Some(rt) = state.runtime_mut(owner) {
                    rt.stat_tokens.add(*stat, delta);
                }
            }
            AbilityAction::ReduceIncomingDamage { .. } => {
                // only meaningful inside the damage funnel; see
                // run_before_damage_abilities
            }
            AbilityAction::SetMaxHp { value } => {
                // max hp tracks base hp, so this goes through the base-stat
                // funnel (which also clamps current hp down)
                let v = eval_value(value, ctx).max(0);
                self.change_base_stat(state, owner, Stat::Hp, |_| v);
            }
            AbilityAction::SetHp { value, min, max } => {
                let mut v = eval_value(value, ctx);
                if let Some(lo) = min {
                    v = v.max(*lo);
                }
                if let Some(hi) = max {
                    v = v.min(*hi);
                }
                let mut at_zero = false;
                if let Some(rt) = state.runtime_mut(owner) {
                    rt.hp = v.clamp(0, rt.max_hp);
                    at_zero = rt.hp == 0;
                }
                if at_zero {
                    self.handle_defeat(state, owner, None);
                }
            }
            AbilityAction::SelfDamage { value } => {
                let v = eval_value(value, ctx);
                self.apply_damage(state, owner, None, v);
            }
            AbilityAction::DamageSource { value } => {
                if let Some(src) = source {
                    if src != owner {
                        let v = eval_value(value, ctx);
                        self.apply_damage(state, src, Some(owner), v);
                    }
                }
            }
        }
    }
}
