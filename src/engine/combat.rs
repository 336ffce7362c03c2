//! Role attacks, the damage funnel, and defeat handling.

use tracing::debug;

use super::abilities::TriggerCtx;
use super::cards::PlayOptions;
use super::GameEngine;
use crate::catalog::{AbilityTrigger, EffectTrigger, EffectKind, RoleFamily};
use crate::core::{
    transitions, GameState, InstanceId, LogEvent, MatchStatus, PlayerId, Stat,
};
use crate::effects::effective_stat;
use crate::error::EngineError;

impl GameEngine {
    /// Perform the once-per-turn role attack.
    ///
    /// `struggle` is the caller's declaration, cross-checked against actual
    /// bra: a normal attack needs bra and consumes 1, a struggle is only
    /// legal at zero bra and costs recoil instead. A survived struggle ends
    /// the attacker's turn.
    pub fn role_attack(
        &mut self,
        player: PlayerId,
        target: PlayerId,
        struggle: bool,
    ) -> Result<(), EngineError> {
        self.ensure_turn(&self.state, player)?;
        if !self.state.is_seated(target) {
            return Err(EngineError::UnknownPlayer(target));
        }
        if target == player {
            return Err(EngineError::SelfTargetNotAllowed);
        }
        if self.state.is_defeated(target) {
            return Err(EngineError::TargetDefeated);
        }
        if self
            .state
            .role_attack_used
            .get(&player)
            .copied()
            .unwrap_or(false)
        {
            return Err(EngineError::RoleAttackUsed);
        }
        let bra = self.state.bra(player);
        if struggle && bra != 0 {
            return Err(EngineError::StruggleWithBra);
        }
        if !struggle && bra <= 0 {
            return Err(EngineError::AttackWithoutBra);
        }

        let mut next = self.state.clone();
        next.role_attack_used.insert(player, true);
        if !struggle {
            next = transitions::consume_bra(&next, player, 1);
        }

        let atk = effective_stat(next.runtime(player), Stat::Atk);
        let def = effective_stat(next.runtime(target), Stat::Def);
        let base = (atk - def).max(1);
        let family = self
            .role_of(&next, player)
            .map_or(RoleFamily::Generic, |r| r.family);

        let mut recoil: i64 = 0;
        let mut dealt_total: i64 = 0;

        if family == RoleFamily::Resonate {
            // cascading multi-hit: start at half the base damage and keep
            // halving (floor) until the hit reaches zero
            let mut hits = Vec::new();
            let mut hit = (base / 2).max(1);
            while hit > 0 {
                hits.push(hit);
                hit /= 2;
            }
            let mut delivered: u32 = 0;
            for (i, &amount) in hits.iter().enumerate() {
                if next.is_defeated(target) {
                    break;
                }
                next.push_log(LogEvent::RoleAttackHit {
                    attacker: player,
                    target,
                    amount,
                    hit_index: i as u32 + 1,
                    total_hits: hits.len() as u32,
                });
                dealt_total += self.apply_damage(&mut next, target, Some(player), amount);
                delivered += 1;
            }
            // a defeat cuts the cascade short; retrofit the real length onto
            // the entries logged with the planned one
            if (delivered as usize) < hits.len() {
                let mut to_patch = delivered;
                for i in (0..next.logs.len()).rev() {
                    if to_patch == 0 {
                        break;
                    }
                    if let Some(entry) = next.logs.get_mut(i) {
                        if let LogEvent::RoleAttackHit {
                            attacker,
                            target: hit_target,
                            total_hits,
                            ..
                        } = &mut entry.event
                        {
                            if *attacker == player && *hit_target == target {
                                *total_hits = delivered;
                                to_patch -= 1;
                            }
                        }
                    }
                }
            }
            // the cascade bites back: one recoil point per hit delivered
            recoil += i64::from(delivered);
        } else {
            next.push_log(LogEvent::RoleAttackHit {
                attacker: player,
                target,
                amount: base,
                hit_index: 1,
                total_hits: 1,
            });
            dealt_total += self.apply_damage(&mut next, target, Some(player), base);
        }

        if struggle {
            let max_hp = next.runtime(player).map_or(0, |rt| rt.max_hp);
            recoil += (max_hp / 4).max(1);
            debug!(player = %player, recoil, "struggle attack");
        }

        let ctx = TriggerCtx {
            damage_amount: dealt_total,
            damage_dealt: dealt_total,
            ..TriggerCtx::default()
        };
        self.dispatch_abilities(&mut next, player, AbilityTrigger::AfterRoleAttack, &ctx, None);
        self.resolve_install_reactions_after_attack(&mut next, player, target);

        if recoil > 0 {
            self.apply_damage(&mut next, player, None, recoil);
        }

        if next.status == MatchStatus::InProgress {
            if next.is_defeated(player) {
                // recoil death already repointed the match at the successor
                if let Some(p) = next.current_player_id {
                    self.begin_turn_at(&mut next, p);
                }
            } else if struggle {
                self.end_turn_in(&mut next, player);
            }
        }

        next.touch();
        self.state = next;
        Ok(())
    }

    /// The single funnel for all hp loss. Returns the net hp actually lost
    /// (0 when fully prevented or absorbed).
    pub(crate) fn apply_damage(
        &self,
        state: &mut GameState,
        target: PlayerId,
        source: Option<PlayerId>,
        amount: i64,
    ) -> i64 {
        if amount <= 0 || state.is_defeated(target) || state.runtime(target).is_none() {
            return 0;
        }

        let mut remaining = amount;

        // install reactions in play order; the first qualifying effect wins
        let installs = state
            .runtime(target)
            .map(|rt| rt.installs.clone())
            .unwrap_or_default();
        'scan: for install in &installs {
            let Some(card) = self.catalog.card(&install.card_id) else {
                continue;
            };
            for (_, effect) in card.effects_for(EffectTrigger::BeforeDamageTaken) {
                match effect.kind {
                    EffectKind::ThresholdPrevent {
                        min_damage,
                        consume,
                    } => {
                        if remaining >= min_damage {
                            debug!(target = %target, card = %install.card_id, "damage prevented by install");
                            remaining = 0;
                            if consume {
                                self.destroy_install(state, target, install.instance_id);
                            }
                            break 'scan;
                        }
                    }
                    EffectKind::CheatDeathAtFull { reset_to } => {
                        let (hp, max_hp, temp) = state
                            .runtime(target)
                            .map_or((0, 0, 0), |rt| (rt.hp, rt.max_hp, rt.temp_hp));
                        if hp == max_hp && remaining >= hp + temp {
                            if let Some(rt) = state.runtime_mut(target) {
                                rt.hp = reset_to.clamp(0, rt.max_hp);
                            }
                            remaining = 0;
                            self.destroy_install(state, target, install.instance_id);
                            break 'scan;
                        }
                    }
                    _ => {}
                }
            }
        }

        if remaining > 0 {
            remaining = self.run_before_damage_abilities(state, target, remaining);
        }
        if remaining <= 0 {
            return 0;
        }

        let mut net = 0;
        if let Some(rt) = state.runtime_mut(target) {
            let absorbed = remaining.min(rt.temp_hp);
            rt.temp_hp -= absorbed;
            let rest = remaining - absorbed;
            let before = rt.hp;
            rt.hp = (rt.hp - rest).max(0);
            net = before - rt.hp;
        }

        if net > 0 {
            let ctx = TriggerCtx {
                damage_amount: net,
                damage_taken: net,
                ..TriggerCtx::default()
            };
            self.dispatch_abilities(state, target, AbilityTrigger::AfterDamageTaken, &ctx, source);
            if let Some(src) = source {
                if src != target {
                    let ctx = TriggerCtx {
                        damage_amount: net,
                        damage_dealt: net,
                        ..TriggerCtx::default()
                    };
                    self.dispatch_abilities(
                        state,
                        src,
                        AbilityTrigger::AfterDealingDamage,
                        &ctx,
                        Some(target),
                    );
                }
            }
        }

        if state.runtime(target).is_some_and(|rt| rt.hp <= 0) {
            self.handle_defeat(state, target, source);
        }
        net
    }

    /// Idempotent defeat handling: zero the runtime, fix up the turn order,
    /// notify survivors, and detect the single-survivor win.
    pub(crate) fn handle_defeat(
        &self,
        state: &mut GameState,
        player: PlayerId,
        killer: Option<PlayerId>,
    ) {
        if state.is_defeated(player) {
            return;
        }
        if let Some(rt) = state.runtime_mut(player) {
            rt.hp = 0;
            rt.temp_hp = 0;
            rt.defeated = true;
        } else {
            return;
        }
        state.push_log(LogEvent::PlayerDefeated {
            player,
            by: killer,
        });
        debug!(player = %player, by = ?killer, "player defeated");

        if let Some(k) = killer {
            if k != player && !state.is_defeated(k) {
                self.dispatch_abilities(state, k, AbilityTrigger::OnKill, &TriggerCtx::default(), None);
            }
        }

        if let Some(pos) = state.turn_order.iter().position(|&p| p == player) {
            state.turn_order.remove(pos);
            if state.turn_order.is_empty() {
                state.current_turn = 0;
                state.current_player_id = None;
            } else if pos < state.current_turn {
                state.current_turn -= 1;
            } else if pos == state.current_turn {
                state.current_turn %= state.turn_order.len();
                state.current_player_id = Some(state.turn_order[state.current_turn]);
            }
        }

        let alive = state.alive_players();
        for id in &alive {
            self.dispatch_abilities(
                state,
                *id,
                AbilityTrigger::OnAlivePlayersChanged,
                &TriggerCtx::default(),
                None,
            );
        }

        if state.status == MatchStatus::InProgress && alive.len() <= 1 {
            let winner = alive.first().copied();
            state.status = MatchStatus::Finished;
            state.winner_id = winner;
            state.push_log(LogEvent::MatchEnded { winner });
            debug!(winner = ?winner, "match ended");
        }
    }

    /// Remove an install from play and send its card to the shared discard,
    /// preserving the card multiset.
    pub(crate) fn destroy_install(
        &self,
        state: &mut GameState,
        owner: PlayerId,
        instance: InstanceId,
    ) {
        let mut card_id = None;
        if let Some(rt) = state.runtime_mut(owner) {
            if let Some(pos) = rt.install_position(instance) {
                card_id = Some(rt.installs.remove(pos).card_id);
            }
        }
        if let Some(card_id) = card_id {
            state.shared_discard.push_back(card_id);
        }
    }

    /// Resolve the attacker's install effects bound to `AfterRoleAttack`.
    fn resolve_install_reactions_after_attack(
        &self,
        state: &mut GameState,
        attacker: PlayerId,
        target: PlayerId,
    ) {
        let installs = state
            .runtime(attacker)
            .map(|rt| rt.installs.clone())
            .unwrap_or_default();
        let opts = PlayOptions {
            targets: vec![target],
            ..PlayOptions::default()
        };
        for install in installs {
            let Some(card) = self.catalog.card(&install.card_id) else {
                continue;
            };
            let card = card.clone();
            for (_, effect) in card.effects_for(EffectTrigger::AfterRoleAttack) {
                if effect.optional {
                    continue;
                }
                // a reaction whose target has become invalid simply fizzles
                let _ = self.apply_card_effect(state, attacker, &effect.kind, &opts);
            }
        }
    }
}
