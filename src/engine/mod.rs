//! The game engine - the stateful orchestrator for one match.
//!
//! `GameEngine` owns a single `GameState` snapshot plus the immutable
//! catalog. Every mutating operation clones the snapshot, works on the
//! clone, and commits it wholesale on success; a returned error always
//! leaves the observable state exactly as it was. The engine is synchronous
//! and single-threaded - concurrent callers on the same match must be
//! serialized by the transport layer.

mod abilities;
mod actions;
mod cards;
mod combat;
mod turn;

pub use cards::PlayOptions;

use tracing::debug;

use crate::catalog::{Catalog, CardId, Role};
use crate::core::{
    transitions, DeckId, GameRng, GameState, GameSummary, LogEvent, MatchStatus, Player,
    PlayerId, PlayerRuntime,
};
use crate::error::EngineError;

/// The rule-resolution core for one match.
pub struct GameEngine {
    catalog: Catalog,
    rng: GameRng,
    state: GameState,
}

impl GameEngine {
    /// Create an engine with an OS-seeded RNG.
    #[must_use]
    pub fn new(catalog: Catalog) -> Self {
        Self::with_rng(catalog, GameRng::from_entropy())
    }

    /// Create an engine with a fixed seed, for reproducible matches.
    #[must_use]
    pub fn with_seed(catalog: Catalog, seed: u64) -> Self {
        Self::with_rng(catalog, GameRng::new(seed))
    }

    fn with_rng(catalog: Catalog, rng: GameRng) -> Self {
        Self {
            catalog,
            rng,
            state: GameState::new(),
        }
    }

    /// Read-only view of the current snapshot.
    #[must_use]
    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Lightweight summary for lobby listings.
    #[must_use]
    pub fn summary(&self) -> GameSummary {
        GameSummary::of(&self.state)
    }

    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    // === Lobby operations ===

    /// Seat a new player, minting an id unless the caller supplies one.
    pub fn add_player(&mut self, name: impl Into<String>, id: Option<PlayerId>) -> Player {
        let player = Player::new(name, id);
        debug!(player = %player.id, "player joined");
        self.state = transitions::add_player(&self.state, player.clone());
        player
    }

    /// Set a player's ready flag.
    pub fn mark_player_ready(&mut self, id: PlayerId, ready: bool) -> Result<(), EngineError> {
        if !self.state.is_seated(id) {
            return Err(EngineError::UnknownPlayer(id));
        }
        self.state = transitions::set_ready(&self.state, id, ready);
        Ok(())
    }

    /// Assign a role and (re)initialize the player's combat runtime.
    pub fn set_player_role(
        &mut self,
        id: PlayerId,
        role_id: impl Into<crate::catalog::RoleId>,
    ) -> Result<(), EngineError> {
        let role_id = role_id.into();
        if !self.state.is_seated(id) {
            return Err(EngineError::UnknownPlayer(id));
        }
        let role = self
            .catalog
            .role(&role_id)
            .ok_or_else(|| EngineError::UnknownRole(role_id.clone()))?;
        let runtime = PlayerRuntime::from_params(&role.params);

        let next = transitions::set_role(&self.state, id, role_id);
        self.state = transitions::set_runtime(&next, id, runtime);
        Ok(())
    }

    /// Replace the shared deck, shuffling it, and clear the discard pile.
    pub fn assign_shared_deck(&mut self, deck_id: DeckId, mut cards: Vec<CardId>) {
        self.rng.shuffle(&mut cards);
        self.state = transitions::assign_shared_deck(&self.state, deck_id, cards);
    }

    /// Draw cards into a player's hand.
    ///
    /// Turn ownership is enforced only once the match is in progress;
    /// pre-game draws are the transport layer's business. Returns the
    /// number actually drawn (the pool may run dry).
    pub fn draw_cards(&mut self, id: PlayerId, count: usize) -> Result<usize, EngineError> {
        if !self.state.is_seated(id) {
            return Err(EngineError::UnknownPlayer(id));
        }
        match self.state.status {
            MatchStatus::Finished => return Err(EngineError::MatchNotInProgress),
            MatchStatus::InProgress if !self.state.is_current(id) => {
                return Err(EngineError::NotYourTurn)
            }
            _ => {}
        }
        let before = self.state.hand(id).len();
        self.state = transitions::draw_from_shared_deck(&self.state, id, count);
        Ok(self.state.hand(id).len() - before)
    }

    /// Additive score change.
    pub fn apply_score(&mut self, id: PlayerId, delta: i64) -> Result<(), EngineError> {
        if !self.state.is_seated(id) {
            return Err(EngineError::UnknownPlayer(id));
        }
        self.state = transitions::apply_score(&self.state, id, delta);
        Ok(())
    }

    /// Force-finish the match, with an optional winner.
    pub fn end(&mut self, winner: Option<PlayerId>) -> Result<(), EngineError> {
        if let Some(w) = winner {
            if !self.state.is_seated(w) {
                return Err(EngineError::UnknownPlayer(w));
            }
        }
        let mut next = self.state.clone();
        next.status = MatchStatus::Finished;
        next.winner_id = winner;
        next.push_log(LogEvent::MatchEnded { winner });
        next.touch();
        debug!(winner = ?winner, "match force-finished");
        self.state = next;
        Ok(())
    }

    // === Shared guards and lookups ===

    /// The catalog role a player is locked to, if any.
    pub(crate) fn role_of<'a>(&'a self, state: &GameState, player: PlayerId) -> Option<&'a Role> {
        let role_id = state.player(player).and_then(|p| p.role_id.clone())?;
        self.catalog.role(&role_id)
    }

    /// Entry guard for every turn-scoped operation.
    pub(crate) fn ensure_turn(
        &self,
        state: &GameState,
        player: PlayerId,
    ) -> Result<(), EngineError> {
        if state.status != MatchStatus::InProgress {
            return Err(EngineError::MatchNotInProgress);
        }
        if !state.is_seated(player) {
            return Err(EngineError::UnknownPlayer(player));
        }
        if !state.is_current(player) {
            return Err(EngineError::NotYourTurn);
        }
        if state.is_defeated(player) {
            return Err(EngineError::ActorDefeated);
        }
        Ok(())
    }
}
