//! Playing cards and resolving their effects.
//!
//! Skill and boost cards resolve their `OnPlay` effects and go to the
//! shared discard; install cards leave the hand and sit in front of their
//! owner, resolving `OnEquip` now and reacting to damage later. Every play
//! costs exactly 1 bra.

use tracing::debug;

use super::GameEngine;
use crate::catalog::{Card, CardId, CardKind, EffectKind, EffectTrigger};
use crate::core::{
    transitions, GameState, Install, InstanceId, LogEvent, MatchStatus, PlayerId, Stat,
};
use crate::effects::{effective_stat, eval_amount, resolve_targets};
use crate::error::EngineError;

/// Caller-supplied choices for a card play.
#[derive(Clone, Debug, Default)]
pub struct PlayOptions {
    /// Chosen targets, consumed by `ChosenEnemy`/`ChosenPlayers` rules.
    pub targets: Vec<PlayerId>,

    /// Indices (declaration order) of optional effects to opt into.
    pub optional_effects: Vec<usize>,

    /// Stat pick for effects that require one.
    pub stat_choice: Option<Stat>,
}

impl GameEngine {
    /// Play a card from hand.
    pub fn play_card(
        &mut self,
        player: PlayerId,
        card_id: &CardId,
        opts: &PlayOptions,
    ) -> Result<(), EngineError> {
        self.ensure_turn(&self.state, player)?;
        let bra = self.state.bra(player);
        if bra < 1 {
            return Err(EngineError::InsufficientBra { need: 1, have: bra });
        }
        if !self.state.hand(player).iter().any(|c| c == card_id) {
            return Err(EngineError::CardNotInHand(card_id.clone()));
        }
        let card = self
            .catalog
            .card(card_id)
            .ok_or_else(|| EngineError::UnknownCard(card_id.clone()))?
            .clone();

        let mut next = transitions::consume_bra(&self.state, player, 1);

        match card.kind {
            CardKind::Install => {
                if card.unique
                    && next
                        .runtime(player)
                        .is_some_and(|rt| rt.has_install_of(card_id))
                {
                    return Err(EngineError::DuplicateInstall(card_id.clone()));
                }
                // out of hand and into play; installs skip the discard pile
                if let Some(hand) = next.hands.get_mut(&player) {
                    if let Some(pos) = hand.iter().position(|c| c == card_id) {
                        hand.remove(pos);
                    }
                }
                if let Some(rt) = next.runtime_mut(player) {
                    rt.installs.push(Install {
                        instance_id: InstanceId::new(),
                        card_id: card_id.clone(),
                    });
                }
                self.resolve_card_effects(&mut next, player, &card, EffectTrigger::OnEquip, opts)?;
            }
            CardKind::Skill | CardKind::Boost => {
                next = transitions::play_card_from_hand(&next, player, card_id);
                self.resolve_card_effects(&mut next, player, &card, EffectTrigger::OnPlay, opts)?;
            }
        }

        next.push_log(LogEvent::CardPlay {
            player,
            card: card_id.clone(),
        });
        if next.status == MatchStatus::InProgress && next.is_defeated(player) {
            // the card defeated its own actor; defeat handling already
            // repointed the match at the successor
            if let Some(p) = next.current_player_id {
                self.begin_turn_at(&mut next, p);
            }
        }
        next.touch();
        debug!(player = %player, card = %card_id, "card played");
        self.state = next;
        Ok(())
    }

    /// Apply a card's effects for one trigger, in declaration order.
    /// Optional effects run only when opted into by index.
    pub(crate) fn resolve_card_effects(
        &self,
        state: &mut GameState,
        actor: PlayerId,
        card: &Card,
        trigger: EffectTrigger,
        opts: &PlayOptions,
    ) -> Result<(), EngineError> {
        for (idx, effect) in card.effects_for(trigger) {
            if effect.optional && !opts.optional_effects.contains(&idx) {
                continue;
            }
            self.apply_card_effect(state, actor, &effect.kind, opts)?;
        }
        Ok(())
    }

    pub(crate) fn apply_card_effect(
        &self,
        state: &mut GameState,
        actor: PlayerId,
        kind: &EffectKind,
        opts: &PlayOptions,
    ) -> Result<(), EngineError> {
        match kind {
            EffectKind::DealDamage {
                amount,
                subtract_def,
                target,
            } => {
                let targets = resolve_targets(state, actor, target, &opts.targets)?;
                let base = eval_amount(amount, state.runtime(actor));
                for t in targets {
                    let mut damage = base;
                    if *subtract_def {
                        damage -= effective_stat(state.runtime(t), Stat::Def);
                    }
                    self.apply_damage(state, t, Some(actor), damage.max(0));
                }
            }
            EffectKind::AddStatToken {
                stat,
                amount,
                target,
            } => {
                let targets = resolve_targets(state, actor, target, &opts.targets)?;
                let delta = eval_amount(amount, state.runtime(actor));
                for t in targets {
                    self.add_stat_tokens(state, t, *stat, delta);
                }
            }
            EffectKind::DiscardAllHand { target } => {
                let targets = resolve_targets(state, actor, target, &opts.targets)?;
                for t in targets {
                    let hand = std::mem::take(state.hands.entry(t).or_default());
                    for card in hand {
                        state.shared_discard.push_back(card);
                    }
                }
            }
            EffectKind::DoubleBaseStat { allowed, excluded } => {
                let stat = opts.stat_choice.ok_or(EngineError::InvalidStatChoice)?;
                if !stat.is_combat()
                    || (!allowed.is_empty() && !allowed.contains(&stat))
                    || excluded.contains(&stat)
                {
                    return Err(EngineError::InvalidStatChoice);
                }
                let base = state.runtime(actor).map_or(0, |rt| rt.base_stats.get(stat));
                self.add_stat_tokens(state, actor, stat, base);
            }
            EffectKind::ThresholdPrevent { .. } | EffectKind::CheatDeathAtFull { .. } => {
                // install reactions, resolved inside the damage funnel
            }
        }
        Ok(())
    }
}
