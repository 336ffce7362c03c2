//! Lobby-side player record.
//!
//! `Player` is what the matchmaking layer sees: identity, ready flag,
//! score, and the chosen role. Combat state lives in `PlayerRuntime`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ids::PlayerId;
use crate::catalog::RoleId;

/// A seated player.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    pub score: i64,
    pub ready: bool,
    pub joined_at: DateTime<Utc>,

    /// Chosen role, if any. Players without one get a random role at start.
    pub role_id: Option<RoleId>,
}

impl Player {
    /// Create a player, minting an id unless the caller supplies one.
    #[must_use]
    pub fn new(name: impl Into<String>, id: Option<PlayerId>) -> Self {
        Self {
            id: id.unwrap_or_default(),
            name: name.into(),
            score: 0,
            ready: false,
            joined_at: Utc::now(),
            role_id: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_player_defaults() {
        let p = Player::new("ada", None);
        assert_eq!(p.name, "ada");
        assert_eq!(p.score, 0);
        assert!(!p.ready);
        assert!(p.role_id.is_none());
    }

    #[test]
    fn test_new_player_keeps_supplied_id() {
        let id = PlayerId::new();
        let p = Player::new("ada", Some(id));
        assert_eq!(p.id, id);
    }
}
