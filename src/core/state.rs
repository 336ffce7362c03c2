//! The match state aggregate.
//!
//! `GameState` is the single root value owned by the engine. It is never
//! mutated in place across calls: every engine operation clones the current
//! snapshot, applies its changes, and commits the clone wholesale. Ordered
//! sequences use `im::Vector` so those clones stay cheap.

use chrono::{DateTime, Utc};
use im::Vector;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use super::ids::{DeckId, GameId, PlayerId};
use super::log::{LogEntry, LogEvent, LOG_CAPACITY};
use super::player::Player;
use super::runtime::PlayerRuntime;
use crate::catalog::CardId;

/// Match lifecycle. One-way: `Waiting -> InProgress -> Finished`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchStatus {
    Waiting,
    InProgress,
    Finished,
}

/// Complete match state.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameState {
    pub id: GameId,

    /// Seated players, in join order.
    pub players: Vec<Player>,

    pub status: MatchStatus,
    pub winner_id: Option<PlayerId>,

    /// Combat runtimes, created when a role is assigned.
    pub player_states: FxHashMap<PlayerId, PlayerRuntime>,

    pub deck_id: Option<DeckId>,

    /// Shared draw pile; head = next draw.
    pub shared_deck: Vector<CardId>,

    /// Shared discard pile, append-only until recycled into the deck.
    pub shared_discard: Vector<CardId>,

    /// Cards held, per player.
    pub hands: FxHashMap<PlayerId, Vector<CardId>>,

    /// Per-turn resource, reset to the role's base bra each turn.
    pub bra_tokens: FxHashMap<PlayerId, i64>,

    /// Whether the role attack was spent this turn.
    pub role_attack_used: FxHashMap<PlayerId, bool>,

    /// Bounded ring of the last `LOG_CAPACITY` events.
    pub logs: Vector<LogEntry>,

    pub current_player_id: Option<PlayerId>,

    /// Alive players in speed order; shrinks as players are eliminated.
    pub turn_order: Vec<PlayerId>,

    /// Index into `turn_order`.
    pub current_turn: usize,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl GameState {
    /// Create an empty waiting match.
    #[must_use]
    pub fn new() -> Self {
        let now = Utc::now();
        Self {
            id: GameId::new(),
            players: Vec::new(),
            status: MatchStatus::Waiting,
            winner_id: None,
            player_states: FxHashMap::default(),
            deck_id: None,
            shared_deck: Vector::new(),
            shared_discard: Vector::new(),
            hands: FxHashMap::default(),
            bra_tokens: FxHashMap::default(),
            role_attack_used: FxHashMap::default(),
            logs: Vector::new(),
            current_player_id: None,
            turn_order: Vec::new(),
            current_turn: 0,
            created_at: now,
            updated_at: now,
        }
    }

    /// Bump the snapshot timestamp.
    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    // === Players ===

    #[must_use]
    pub fn player(&self, id: PlayerId) -> Option<&Player> {
        self.players.iter().find(|p| p.id == id)
    }

    pub fn player_mut(&mut self, id: PlayerId) -> Option<&mut Player> {
        self.players.iter_mut().find(|p| p.id == id)
    }

    /// Whether a player is seated in this match.
    #[must_use]
    pub fn is_seated(&self, id: PlayerId) -> bool {
        self.player(id).is_some()
    }

    #[must_use]
    pub fn runtime(&self, id: PlayerId) -> Option<&PlayerRuntime> {
        self.player_states.get(&id)
    }

    pub fn runtime_mut(&mut self, id: PlayerId) -> Option<&mut PlayerRuntime> {
        self.player_states.get_mut(&id)
    }

    /// Players whose runtime exists and is not defeated.
    #[must_use]
    pub fn alive_players(&self) -> Vec<PlayerId> {
        self.players
            .iter()
            .filter(|p| {
                self.player_states
                    .get(&p.id)
                    .is_some_and(|rt| !rt.defeated)
            })
            .map(|p| p.id)
            .collect()
    }

    #[must_use]
    pub fn is_defeated(&self, id: PlayerId) -> bool {
        self.runtime(id).is_some_and(|rt| rt.defeated)
    }

    // === Turn bookkeeping ===

    #[must_use]
    pub fn is_current(&self, id: PlayerId) -> bool {
        self.current_player_id == Some(id)
    }

    #[must_use]
    pub fn bra(&self, id: PlayerId) -> i64 {
        self.bra_tokens.get(&id).copied().unwrap_or(0)
    }

    #[must_use]
    pub fn hand(&self, id: PlayerId) -> Vector<CardId> {
        self.hands.get(&id).cloned().unwrap_or_default()
    }

    // === Logging ===

    /// Append an event, evicting the oldest past `LOG_CAPACITY`.
    pub fn push_log(&mut self, event: LogEvent) {
        if self.logs.len() == LOG_CAPACITY {
            self.logs.pop_front();
        }
        self.logs.push_back(LogEntry::now(event));
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}

/// Per-player slice of the summary.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlayerSummary {
    pub id: PlayerId,
    pub name: String,
    pub score: i64,
    pub ready: bool,
    pub hp: Option<i64>,
    pub defeated: bool,
}

/// Lightweight view of a match for lobby listings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameSummary {
    pub id: GameId,
    pub status: MatchStatus,
    pub players: Vec<PlayerSummary>,
    pub current_player_id: Option<PlayerId>,
    pub winner_id: Option<PlayerId>,
    pub updated_at: DateTime<Utc>,
}

impl GameSummary {
    /// Build the summary from a full snapshot.
    #[must_use]
    pub fn of(state: &GameState) -> Self {
        Self {
            id: state.id,
            status: state.status,
            players: state
                .players
                .iter()
                .map(|p| PlayerSummary {
                    id: p.id,
                    name: p.name.clone(),
                    score: p.score,
                    ready: p.ready,
                    hp: state.runtime(p.id).map(|rt| rt.hp),
                    defeated: state.is_defeated(p.id),
                })
                .collect(),
            current_player_id: state.current_player_id,
            winner_id: state.winner_id,
            updated_at: state.updated_at,
        }
    }
}
