//! Match start and the turn lifecycle.

use tracing::debug;

use super::GameEngine;
use crate::catalog::RoleFamily;
use crate::core::{
    transitions, GameState, LogEvent, MatchStatus, PlayerId, PlayerRuntime, Surgery,
    SurgeryPhase,
};
use crate::error::EngineError;

impl GameEngine {
    /// Begin the match: the only `Waiting -> InProgress` transition.
    ///
    /// Requires at least one player, everyone ready, and an assigned deck.
    /// Players who never picked a role get a random one. Turn order is a
    /// stable sort by role spe descending, ties keeping join order. Everyone
    /// gets a fresh runtime, full bra, and an opening hand of 3; the first
    /// player's turn begins immediately.
    pub fn start(&mut self) -> Result<(), EngineError> {
        if self.state.status != MatchStatus::Waiting {
            return Err(EngineError::MatchAlreadyStarted);
        }
        if self.state.players.is_empty() {
            return Err(EngineError::NoPlayers);
        }
        if !self.state.players.iter().all(|p| p.ready) {
            return Err(EngineError::PlayersNotReady);
        }
        if self.state.deck_id.is_none() {
            return Err(EngineError::NoDeckAssigned);
        }

        let mut next = self.state.clone();

        let unassigned: Vec<PlayerId> = next
            .players
            .iter()
            .filter(|p| p.role_id.is_none())
            .map(|p| p.id)
            .collect();
        if !unassigned.is_empty() && !self.catalog.has_roles() {
            return Err(EngineError::NoRolesAvailable);
        }
        for id in unassigned {
            let role_id = self
                .rng
                .choose(self.catalog.role_ids())
                .cloned()
                .ok_or(EngineError::NoRolesAvailable)?;
            if let Some(player) = next.player_mut(id) {
                player.role_id = Some(role_id);
            }
        }

        let mut setups = Vec::with_capacity(next.players.len());
        for player in &next.players {
            let Some(role_id) = player.role_id.clone() else {
                return Err(EngineError::NoRolesAvailable);
            };
            let role = self
                .catalog
                .role(&role_id)
                .ok_or(EngineError::UnknownRole(role_id))?;
            setups.push((player.id, role.params));
        }
        for (id, params) in &setups {
            next.player_states
                .insert(*id, PlayerRuntime::from_params(params));
            next.bra_tokens.insert(*id, params.bra.max(0));
            next.role_attack_used.insert(*id, false);
        }

        // stable sort: spe ties keep join order
        let mut order: Vec<PlayerId> = next.players.iter().map(|p| p.id).collect();
        let spe_of = |id: &PlayerId| {
            next.player_states
                .get(id)
                .map_or(0, |rt| rt.base_stats.spe)
        };
        order.sort_by(|a, b| spe_of(b).cmp(&spe_of(a)));

        next = transitions::set_turn_order(&next, order);
        for (id, _) in &setups {
            next = transitions::draw_from_shared_deck(&next, *id, 3);
        }

        next.status = MatchStatus::InProgress;
        next.push_log(LogEvent::MatchStarted);
        debug!(players = next.players.len(), "match started");

        if let Some(first) = next.current_player_id {
            self.begin_turn_at(&mut next, first);
        }
        next.touch();
        self.state = next;
        Ok(())
    }

    /// End the current player's turn and begin the next one.
    pub fn end_turn(&mut self, player: PlayerId) -> Result<(), EngineError> {
        self.ensure_turn(&self.state, player)?;
        let mut next = self.state.clone();
        self.end_turn_in(&mut next, player);
        next.touch();
        self.state = next;
        Ok(())
    }

    /// Begin the turn of `player`, skipping forward through the turn order
    /// past defeated players. A full cycle with nobody alive does nothing.
    pub(crate) fn begin_turn_at(&self, state: &mut GameState, player: PlayerId) {
        if state.status != MatchStatus::InProgress || state.turn_order.is_empty() {
            return;
        }
        let len = state.turn_order.len();
        let Some(start) = state.turn_order.iter().position(|&p| p == player) else {
            return;
        };
        let mut chosen = None;
        for step in 0..len {
            let idx = (start + step) % len;
            if !state.is_defeated(state.turn_order[idx]) {
                chosen = Some(idx);
                break;
            }
        }
        let Some(idx) = chosen else {
            debug!("no live players left in turn order");
            return;
        };

        let current = state.turn_order[idx];
        state.current_turn = idx;
        state.current_player_id = Some(current);

        let base_bra = state
            .runtime(current)
            .map_or(0, |rt| rt.base_stats.bra)
            .max(0);
        state.bra_tokens.insert(current, base_bra);
        state.role_attack_used.insert(current, false);
        *state = transitions::draw_from_shared_deck(state, current, 1);
        state.push_log(LogEvent::TurnStart { player: current });

        let skip = self.start_of_turn_effects(state, current);
        if skip {
            debug!(player = %current, "turn skipped");
            self.end_turn_in(state, current);
        }
    }

    /// Shared tail of `end_turn`, the struggle auto-end, and skipped turns.
    pub(crate) fn end_turn_in(&self, state: &mut GameState, player: PlayerId) {
        self.end_of_turn_effects(state, player);
        if state.status != MatchStatus::InProgress {
            return;
        }
        if state.is_defeated(player) {
            // an end-of-turn tick killed the ending player; defeat handling
            // already pointed the match at the successor
            if let Some(next_player) = state.current_player_id {
                self.begin_turn_at(state, next_player);
            }
            return;
        }
        *state = transitions::advance_turn_state(state);
        if let Some(next_player) = state.current_player_id {
            self.begin_turn_at(state, next_player);
        }
    }

    /// Shock decay, pending bra penalty, and the two-phase surgery status.
    /// Returns whether the turn must be skipped.
    fn start_of_turn_effects(&self, state: &mut GameState, player: PlayerId) -> bool {
        let mut skip = false;

        let mut shock = state
            .runtime(player)
            .map_or(0, |rt| rt.counters.shock_tokens);
        let mut bra = state.bra(player);
        let mut drained = 0;
        while shock >= 5 && bra > 0 {
            shock -= 5;
            bra -= 1;
            drained += 1;
        }
        if drained > 0 {
            if let Some(rt) = state.runtime_mut(player) {
                rt.counters.shock_tokens = shock;
            }
            state.bra_tokens.insert(player, bra);
            state.push_log(LogEvent::StatusEffect {
                player,
                status: "shock".into(),
                amount: drained,
            });
        }

        let penalty = state
            .runtime(player)
            .map_or(0, |rt| rt.counters.pending_bra_penalty);
        if penalty > 0 {
            if let Some(rt) = state.runtime_mut(player) {
                rt.counters.pending_bra_penalty = 0;
            }
            *state = transitions::consume_bra(state, player, penalty);
            state.push_log(LogEvent::StatusEffect {
                player,
                status: "bra_penalty".into(),
                amount: penalty,
            });
        }

        let surgery = state.runtime(player).and_then(|rt| rt.counters.surgery);
        if let Some(s) = surgery {
            match s.phase {
                SurgeryPhase::Immobilize => {
                    if let Some(rt) = state.runtime_mut(player) {
                        rt.counters.surgery = Some(Surgery {
                            phase: SurgeryPhase::Heal,
                            heal_amount: s.heal_amount,
                        });
                    }
                    state.push_log(LogEvent::StatusEffect {
                        player,
                        status: "surgery_immobilized".into(),
                        amount: 0,
                    });
                    skip = true;
                }
                SurgeryPhase::Heal => {
                    let mut healed = 0;
                    if let Some(rt) = state.runtime_mut(player) {
                        healed = rt.heal(s.heal_amount);
                        rt.counters.surgery = None;
                    }
                    state.push_log(LogEvent::StatusEffect {
                        player,
                        status: "surgery_healed".into(),
                        amount: healed,
                    });
                }
            }
        }
        skip
    }

    /// Discharge charge banking and the burn tick.
    fn end_of_turn_effects(&self, state: &mut GameState, player: PlayerId) {
        let family = self
            .role_of(state, player)
            .map_or(RoleFamily::Generic, |r| r.family);

        if family == RoleFamily::Discharge {
            let unused = state.bra(player);
            if unused > 0 {
                if let Some(rt) = state.runtime_mut(player) {
                    rt.counters.charge_tokens += unused;
                }
                state.bra_tokens.insert(player, 0);
                state.push_log(LogEvent::StatusEffect {
                    player,
                    status: "charge".into(),
                    amount: unused,
                });
            }
        }

        let stacks = state
            .runtime(player)
            .map_or(0, |rt| rt.counters.burn_stacks);
        if stacks > 0 {
            if family == RoleFamily::Flame {
                // flame roles bathe in it
                let mut healed = 0;
                if let Some(rt) = state.runtime_mut(player) {
                    healed = rt.heal(stacks);
                }
                state.push_log(LogEvent::StatusEffect {
                    player,
                    status: "burn_heal".into(),
                    amount: healed,
                });
            } else {
                state.push_log(LogEvent::StatusEffect {
                    player,
                    status: "burn".into(),
                    amount: stacks,
                });
                self.apply_damage(state, player, None, stacks);
            }
            if let Some(rt) = state.runtime_mut(player) {
                rt.counters.burn_stacks = (rt.counters.burn_stacks - 1).max(0);
            }
        }
    }
}
