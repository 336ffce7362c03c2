//! Engine errors.
//!
//! Every engine-detected rule violation is reported through `EngineError`.
//! Errors are returned before the call's snapshot is committed, so a failed
//! operation always leaves the observable game state unchanged.

use crate::catalog::{CardId, RoleId};
use crate::core::PlayerId;

/// A rejected engine operation.
///
/// There is no fatal/recoverable distinction: every variant is a single
/// rejected call and the match state is never corrupted by it.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EngineError {
    // === Turn ownership ===
    #[error("not your turn")]
    NotYourTurn,

    // === Match status ===
    #[error("match is not in progress")]
    MatchNotInProgress,

    #[error("match has already started")]
    MatchAlreadyStarted,

    // === Start preconditions ===
    #[error("no players have joined")]
    NoPlayers,

    #[error("all players must be ready")]
    PlayersNotReady,

    #[error("no deck has been assigned")]
    NoDeckAssigned,

    #[error("catalog has no roles available to assign")]
    NoRolesAvailable,

    // === Configuration ===
    #[error("unknown player: {0}")]
    UnknownPlayer(PlayerId),

    #[error("unknown role: {0}")]
    UnknownRole(RoleId),

    #[error("unknown card: {0}")]
    UnknownCard(CardId),

    #[error("unknown role action: {0}")]
    UnknownAction(String),

    // === Resources ===
    #[error("insufficient bra: need {need}, have {have}")]
    InsufficientBra { need: i64, have: i64 },

    #[error("card not in hand: {0}")]
    CardNotInHand(CardId),

    #[error("player is defeated")]
    ActorDefeated,

    #[error("target is already defeated")]
    TargetDefeated,

    #[error("role attack already used this turn")]
    RoleAttackUsed,

    #[error("struggle requires zero bra")]
    StruggleWithBra,

    #[error("a normal role attack requires bra; declare a struggle")]
    AttackWithoutBra,

    // === Targeting ===
    #[error("a target is required")]
    TargetRequired,

    #[error("cannot target yourself")]
    SelfTargetNotAllowed,

    // === Action-specific domain errors ===
    #[error("invalid stat choice")]
    InvalidStatChoice,

    #[error("duplicate unique install: {0}")]
    DuplicateInstall(CardId),

    #[error("target is already under surgery")]
    DuplicateStatus,

    #[error("no charge tokens to release")]
    NothingToRelease,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        assert_eq!(EngineError::NotYourTurn.to_string(), "not your turn");
        assert_eq!(
            EngineError::InsufficientBra { need: 2, have: 0 }.to_string(),
            "insufficient bra: need 2, have 0"
        );
        assert_eq!(
            EngineError::CardNotInHand(CardId::new("surge")).to_string(),
            "card not in hand: surge"
        );
    }
}
