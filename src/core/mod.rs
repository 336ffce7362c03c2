//! Core state: identifiers, players, combat runtimes, the match aggregate,
//! pure transitions, and deterministic RNG.

pub mod ids;
pub mod log;
pub mod player;
pub mod rng;
pub mod runtime;
pub mod state;
pub mod transitions;

pub use ids::{DeckId, GameId, InstanceId, PlayerId};
pub use log::{LogEntry, LogEvent, LOG_CAPACITY};
pub use player::Player;
pub use rng::GameRng;
pub use runtime::{Install, PlayerRuntime, RoleCounters, Stat, StatDeltas, Surgery, SurgeryPhase};
pub use state::{GameState, GameSummary, MatchStatus, PlayerSummary};
