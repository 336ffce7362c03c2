//! Target resolution for card effects.
//!
//! Turns a declarative `CardTarget` plus the caller-provided target list
//! into a concrete list of seated players, or an error when the request
//! does not satisfy the rule.

use smallvec::SmallVec;

use crate::catalog::CardTarget;
use crate::core::{GameState, PlayerId};
use crate::error::EngineError;

/// Resolved target list. Four inline slots covers every realistic match.
pub type Targets = SmallVec<[PlayerId; 4]>;

/// Resolve a card target rule against the match.
///
/// `provided` is the caller's chosen target list; rules that pick their own
/// targets ignore it. Ids that are not currently seated are dropped before
/// the rule applies, so every resolved player is guaranteed seated.
pub fn resolve_targets(
    state: &GameState,
    actor: PlayerId,
    target: &CardTarget,
    provided: &[PlayerId],
) -> Result<Targets, EngineError> {
    match target {
        CardTarget::Self_ => Ok(SmallVec::from_slice(&[actor])),

        CardTarget::AllPlayers => Ok(state.players.iter().map(|p| p.id).collect()),

        CardTarget::ChosenEnemy => {
            let chosen = provided
                .iter()
                .copied()
                .find(|&p| state.is_seated(p))
                .ok_or(EngineError::TargetRequired)?;
            if chosen == actor {
                return Err(EngineError::SelfTargetNotAllowed);
            }
            Ok(SmallVec::from_slice(&[chosen]))
        }

        CardTarget::ChosenPlayers => {
            let seated: Targets = provided
                .iter()
                .copied()
                .filter(|&p| state.is_seated(p))
                .collect();
            if seated.is_empty() {
                return Err(EngineError::TargetRequired);
            }
            Ok(seated)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{transitions, Player};

    fn match_of_two() -> (GameState, PlayerId, PlayerId) {
        let a = Player::new("ada", None);
        let b = Player::new("bob", None);
        let (a_id, b_id) = (a.id, b.id);
        let state = transitions::add_player(&GameState::new(), a);
        let state = transitions::add_player(&state, b);
        (state, a_id, b_id)
    }

    #[test]
    fn test_self_ignores_provided() {
        let (state, a, b) = match_of_two();
        let targets = resolve_targets(&state, a, &CardTarget::Self_, &[b]).unwrap();
        assert_eq!(targets.as_slice(), &[a]);
    }

    #[test]
    fn test_all_players_in_join_order() {
        let (state, a, b) = match_of_two();
        let targets = resolve_targets(&state, a, &CardTarget::AllPlayers, &[]).unwrap();
        assert_eq!(targets.as_slice(), &[a, b]);
    }

    #[test]
    fn test_chosen_enemy_rejects_actor_and_empty_choices() {
        let (state, a, b) = match_of_two();

        assert!(matches!(
            resolve_targets(&state, a, &CardTarget::ChosenEnemy, &[]),
            Err(EngineError::TargetRequired)
        ));
        assert!(matches!(
            resolve_targets(&state, a, &CardTarget::ChosenEnemy, &[a]),
            Err(EngineError::SelfTargetNotAllowed)
        ));
        // a list of nothing but unseated ids is as good as no list
        assert!(matches!(
            resolve_targets(&state, a, &CardTarget::ChosenEnemy, &[PlayerId::new()]),
            Err(EngineError::TargetRequired)
        ));

        let targets = resolve_targets(&state, a, &CardTarget::ChosenEnemy, &[b]).unwrap();
        assert_eq!(targets.as_slice(), &[b]);
    }

    #[test]
    fn test_chosen_enemy_skips_unseated_ids() {
        let (state, a, b) = match_of_two();
        let targets =
            resolve_targets(&state, a, &CardTarget::ChosenEnemy, &[PlayerId::new(), b]).unwrap();
        assert_eq!(targets.as_slice(), &[b]);
    }

    #[test]
    fn test_chosen_players_keeps_only_seated_ids() {
        let (state, a, b) = match_of_two();
        let targets = resolve_targets(&state, a, &CardTarget::ChosenPlayers, &[b, a]).unwrap();
        assert_eq!(targets.as_slice(), &[b, a]);

        let stale = PlayerId::new();
        let targets =
            resolve_targets(&state, a, &CardTarget::ChosenPlayers, &[stale, b]).unwrap();
        assert_eq!(targets.as_slice(), &[b]);

        assert!(matches!(
            resolve_targets(&state, a, &CardTarget::ChosenPlayers, &[]),
            Err(EngineError::TargetRequired)
        ));
        assert!(matches!(
            resolve_targets(&state, a, &CardTarget::ChosenPlayers, &[stale]),
            Err(EngineError::TargetRequired)
        ));
    }
}
