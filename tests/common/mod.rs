#![allow(dead_code)]

use rolebrawl::catalog::{Card, CardId, Catalog, Role, RoleFamily, RoleParams};
use rolebrawl::core::{DeckId, PlayerId};
use rolebrawl::GameEngine;

pub fn params(hp: i64, atk: i64, def: i64, spe: i64, bra: i64) -> RoleParams {
    RoleParams {
        hp,
        atk,
        def,
        spe,
        bra,
    }
}

pub fn role(id: &str, family: RoleFamily, params: RoleParams) -> Role {
    Role::new(id, id, family, params)
}

pub fn filler_deck(n: usize) -> Vec<CardId> {
    (0..n).map(|i| CardId::new(format!("filler-{i}"))).collect()
}

/// Build and start a match: one player per entry of `assignments`, each
/// locked to the named role, everyone readied, the given deck assigned.
pub fn start_match(
    roles: Vec<Role>,
    assignments: &[&str],
    cards: Vec<Card>,
    deck: Vec<CardId>,
) -> (GameEngine, Vec<PlayerId>) {
    let mut engine = GameEngine::with_seed(Catalog::new(roles, cards), 7);
    let mut ids = Vec::new();
    for (i, role_id) in assignments.iter().enumerate() {
        let id = engine.add_player(format!("player-{i}"), None).id;
        engine.set_player_role(id, *role_id).unwrap();
        engine.mark_player_ready(id, true).unwrap();
        ids.push(id);
    }
    engine.assign_shared_deck(DeckId::new("test"), deck);
    engine.start().unwrap();
    (engine, ids)
}

/// Two-player match on generic roles; the first player is faster and acts
/// first.
pub fn duel() -> (GameEngine, PlayerId, PlayerId) {
    let roles = vec![
        role("striker", RoleFamily::Generic, params(20, 10, 2, 9, 3)),
        role("anvil", RoleFamily::Generic, params(20, 10, 2, 1, 3)),
    ];
    let (engine, ids) = start_match(roles, &["striker", "anvil"], vec![], filler_deck(40));
    (engine, ids[0], ids[1])
}
