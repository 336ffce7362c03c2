//! Pure state transitions.
//!
//! Every function takes the current snapshot and returns a new one, bumping
//! `updated_at`. Rule checking lives in the engine; these primitives only
//! reshape state and never fail - impossible requests (drawing from an empty
//! pool, discarding a card not held) degrade to partial work or a no-op.

use super::ids::{DeckId, PlayerId};
use super::player::Player;
use super::runtime::PlayerRuntime;
use super::state::GameState;
use crate::catalog::{CardId, RoleId};

/// Seat a new player.
#[must_use]
pub fn add_player(state: &GameState, player: Player) -> GameState {
    let mut next = state.clone();
    next.players.push(player);
    next.touch();
    next
}

/// Set a player's ready flag.
#[must_use]
pub fn set_ready(state: &GameState, id: PlayerId, ready: bool) -> GameState {
    let mut next = state.clone();
    if let Some(player) = next.player_mut(id) {
        player.ready = ready;
    }
    next.touch();
    next
}

/// Record a player's chosen role.
#[must_use]
pub fn set_role(state: &GameState, id: PlayerId, role_id: RoleId) -> GameState {
    let mut next = state.clone();
    if let Some(player) = next.player_mut(id) {
        player.role_id = Some(role_id);
    }
    next.touch();
    next
}

/// Install or replace a player's combat runtime.
#[must_use]
pub fn set_runtime(state: &GameState, id: PlayerId, runtime: PlayerRuntime) -> GameState {
    let mut next = state.clone();
    next.player_states.insert(id, runtime);
    next.touch();
    next
}

/// Replace the shared deck and clear the discard pile.
///
/// The card order is taken as given; the engine shuffles before calling.
#[must_use]
pub fn assign_shared_deck(state: &GameState, deck_id: DeckId, cards: Vec<CardId>) -> GameState {
    let mut next = state.clone();
    next.deck_id = Some(deck_id);
    next.shared_deck = cards.into_iter().collect();
    next.shared_discard.clear();
    next.touch();
    next
}

/// Draw up to `count` cards from the head of the shared deck into a hand.
///
/// When the deck empties mid-draw the whole discard pile becomes the new
/// deck (unshuffled) and drawing continues. When both are empty the draw
/// stops early. Returns the state untouched if zero cards were drawn.
#[must_use]
pub fn draw_from_shared_deck(state: &GameState, id: PlayerId, count: usize) -> GameState {
    let mut next = state.clone();
    let mut drawn = 0;

    for _ in 0..count {
        if next.shared_deck.is_empty() {
            if next.shared_discard.is_empty() {
                break;
            }
            next.shared_deck = std::mem::take(&mut next.shared_discard);
        }
        let card = next.shared_deck.pop_front().expect("deck refilled above");
        next.hands.entry(id).or_default().push_back(card);
        drawn += 1;
    }

    if drawn == 0 {
        return state.clone();
    }
    next.touch();
    next
}

/// Move the first copy of `card` from a hand to the shared discard.
///
/// No-op if the player does not hold the card.
#[must_use]
pub fn play_card_from_hand(state: &GameState, id: PlayerId, card: &CardId) -> GameState {
    let mut next = state.clone();
    let Some(hand) = next.hands.get_mut(&id) else {
        return state.clone();
    };
    let Some(pos) = hand.iter().position(|c| c == card) else {
        return state.clone();
    };
    let removed = hand.remove(pos);
    next.shared_discard.push_back(removed);
    next.touch();
    next
}

/// Set the turn order, pointing the match at its first entry.
#[must_use]
pub fn set_turn_order(state: &GameState, order: Vec<PlayerId>) -> GameState {
    let mut next = state.clone();
    next.current_turn = 0;
    next.current_player_id = order.first().copied();
    next.turn_order = order;
    next.touch();
    next
}

/// Rotate to the next turn index, modulo the turn order length.
///
/// Pure index rotation: skipping defeated players is the engine's job.
#[must_use]
pub fn advance_turn_state(state: &GameState) -> GameState {
    if state.turn_order.is_empty() {
        return state.clone();
    }
    let mut next = state.clone();
    next.current_turn = (next.current_turn + 1) % next.turn_order.len();
    next.current_player_id = Some(next.turn_order[next.current_turn]);
    next.touch();
    next
}

/// Spend bra, clamped at zero.
#[must_use]
pub fn consume_bra(state: &GameState, id: PlayerId, amount: i64) -> GameState {
    let mut next = state.clone();
    let entry = next.bra_tokens.entry(id).or_insert(0);
    *entry = (*entry - amount.max(0)).max(0);
    next.touch();
    next
}

/// Set a player's bra to an exact value.
#[must_use]
pub fn set_bra(state: &GameState, id: PlayerId, amount: i64) -> GameState {
    let mut next = state.clone();
    next.bra_tokens.insert(id, amount.max(0));
    next.touch();
    next
}

/// Additive score change.
#[must_use]
pub fn apply_score(state: &GameState, id: PlayerId, delta: i64) -> GameState {
    let mut next = state.clone();
    if let Some(player) = next.player_mut(id) {
        player.score += delta;
    }
    next.touch();
    next
}

#[cfg(test)]
mod tests {
    use super::*;

    fn card(id: &str) -> CardId {
        CardId::new(id)
    }

    fn seeded_state() -> (GameState, PlayerId) {
        let player = Player::new("ada", None);
        let id = player.id;
        let state = add_player(&GameState::new(), player);
        (state, id)
    }

    #[test]
    fn test_draw_from_head() {
        let (state, id) = seeded_state();
        let state = assign_shared_deck(
            &state,
            DeckId::new("d"),
            vec![card("a"), card("b"), card("c")],
        );

        let state = draw_from_shared_deck(&state, id, 2);

        let hand: Vec<_> = state.hand(id).iter().cloned().collect();
        assert_eq!(hand, vec![card("a"), card("b")]);
        assert_eq!(state.shared_deck.len(), 1);
    }

    #[test]
    fn test_draw_recycles_discard_without_losing_cards() {
        let (state, id) = seeded_state();
        let mut state = assign_shared_deck(&state, DeckId::new("d"), vec![card("a")]);
        state.shared_discard.push_back(card("b"));
        state.shared_discard.push_back(card("c"));

        let state = draw_from_shared_deck(&state, id, 3);

        assert_eq!(state.hand(id).len(), 3);
        assert!(state.shared_deck.is_empty());
        assert!(state.shared_discard.is_empty());
    }

    #[test]
    fn test_draw_stops_early_when_everything_is_empty() {
        let (state, id) = seeded_state();
        let state = assign_shared_deck(&state, DeckId::new("d"), vec![card("a")]);

        let state = draw_from_shared_deck(&state, id, 5);

        assert_eq!(state.hand(id).len(), 1);
    }

    #[test]
    fn test_zero_draw_leaves_state_unchanged() {
        let (state, id) = seeded_state();
        let after = draw_from_shared_deck(&state, id, 3);
        assert_eq!(state, after);
    }

    #[test]
    fn test_play_card_moves_first_copy_to_discard() {
        let (state, id) = seeded_state();
        let state = assign_shared_deck(
            &state,
            DeckId::new("d"),
            vec![card("a"), card("a"), card("b")],
        );
        let state = draw_from_shared_deck(&state, id, 3);

        let state = play_card_from_hand(&state, id, &card("a"));

        let hand: Vec<_> = state.hand(id).iter().cloned().collect();
        assert_eq!(hand, vec![card("a"), card("b")]);
        assert_eq!(state.shared_discard.len(), 1);
    }

    #[test]
    fn test_play_card_absent_is_noop() {
        let (state, id) = seeded_state();
        let after = play_card_from_hand(&state, id, &card("missing"));
        assert_eq!(state, after);
    }

    #[test]
    fn test_turn_rotation_wraps() {
        let (state, a) = seeded_state();
        let b = Player::new("bob", None);
        let b_id = b.id;
        let state = add_player(&state, b);

        let state = set_turn_order(&state, vec![a, b_id]);
        assert_eq!(state.current_player_id, Some(a));

        let state = advance_turn_state(&state);
        assert_eq!(state.current_player_id, Some(b_id));
        let state = advance_turn_state(&state);
        assert_eq!(state.current_player_id, Some(a));
    }

    #[test]
    fn test_advance_with_empty_order_is_noop() {
        let state = GameState::new();
        let after = advance_turn_state(&state);
        assert_eq!(state, after);
    }

    #[test]
    fn test_consume_bra_clamps_at_zero() {
        let (state, id) = seeded_state();
        let state = set_bra(&state, id, 2);

        let state = consume_bra(&state, id, 5);
        assert_eq!(state.bra(id), 0);
    }
}
