//! In-state event log.
//!
//! A bounded ring of the last 100 structured events, carried inside the
//! game-state snapshot so transport layers can replay recent history to
//! clients. Process diagnostics go through `tracing` instead.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ids::PlayerId;
use crate::catalog::CardId;

/// Maximum number of retained log entries.
pub const LOG_CAPACITY: usize = 100;

/// A structured game event.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LogEvent {
    MatchStarted,
    TurnStart {
        player: PlayerId,
    },
    CardPlay {
        player: PlayerId,
        card: CardId,
    },
    /// One entry per hit; multi-hit attacks share `total_hits`.
    RoleAttackHit {
        attacker: PlayerId,
        target: PlayerId,
        amount: i64,
        hit_index: u32,
        total_hits: u32,
    },
    RoleAction {
        player: PlayerId,
        action: String,
        target: Option<PlayerId>,
    },
    StatusEffect {
        player: PlayerId,
        status: String,
        amount: i64,
    },
    PlayerDefeated {
        player: PlayerId,
        by: Option<PlayerId>,
    },
    MatchEnded {
        winner: Option<PlayerId>,
    },
}

/// A timestamped log entry.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    pub at: DateTime<Utc>,
    #[serde(flatten)]
    pub event: LogEvent,
}

impl LogEntry {
    #[must_use]
    pub fn now(event: LogEvent) -> Self {
        Self {
            at: Utc::now(),
            event,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_event_serde_tag() {
        let entry = LogEntry::now(LogEvent::TurnStart {
            player: PlayerId::new(),
        });
        let json = serde_json::to_string(&entry).unwrap();
        assert!(json.contains("\"type\":\"turn_start\""));
    }
}
