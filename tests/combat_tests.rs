//! Role attacks, struggle mode, installs in the damage funnel, and the
//! before-damage ability hooks.

mod common;

use common::*;
use rolebrawl::catalog::{
    AbilityAction, AbilityTrigger, AbilityValue, Card, CardId, CardKind, CardTarget,
    ContextField, EffectKind, EffectTrigger, RoleAbility, RoleFamily, TokenSpend,
};
use rolebrawl::core::Stat;
use rolebrawl::effects::{Amount, Rounding};
use rolebrawl::{EngineError, PlayOptions};

#[test]
fn test_bra_conservation_across_attacks() {
    // one bra per turn: the attack spends exactly that one
    let roles = vec![
        role("jab", RoleFamily::Generic, params(20, 4, 2, 9, 1)),
        role("wall", RoleFamily::Generic, params(20, 4, 2, 1, 1)),
    ];
    let (mut engine, ids) = start_match(roles, &["jab", "wall"], vec![], filler_deck(40));
    let (a, b) = (ids[0], ids[1]);

    assert_eq!(engine.state().bra(a), 1);
    engine.role_attack(a, b, false).unwrap();
    assert_eq!(engine.state().bra(a), 0);

    engine.end_turn(a).unwrap();
    engine.end_turn(b).unwrap();

    // reset, spend again; never negative
    assert_eq!(engine.state().bra(a), 1);
    engine.role_attack(a, b, false).unwrap();
    assert_eq!(engine.state().bra(a), 0);
}

#[test]
fn test_zero_bra_forces_struggle() {
    let roles = vec![
        role("spent", RoleFamily::Generic, params(20, 10, 2, 9, 0)),
        role("wall", RoleFamily::Generic, params(20, 4, 2, 1, 3)),
    ];
    let (mut engine, ids) = start_match(roles, &["spent", "wall"], vec![], filler_deck(40));
    let (a, b) = (ids[0], ids[1]);

    assert!(matches!(
        engine.role_attack(a, b, false),
        Err(EngineError::AttackWithoutBra)
    ));

    engine.role_attack(a, b, true).unwrap();

    // base 8 landed, recoil max(1, 20/4) = 5, turn auto-ended
    assert_eq!(engine.state().runtime(b).unwrap().hp, 12);
    assert_eq!(engine.state().runtime(a).unwrap().hp, 15);
    assert_eq!(engine.state().current_player_id, Some(b));
}

#[test]
fn test_resonate_struggle_stacks_both_recoils() {
    let roles = vec![
        role("hum", RoleFamily::Resonate, params(20, 10, 2, 9, 0)),
        role("wall", RoleFamily::Generic, params(20, 4, 2, 1, 3)),
    ];
    let (mut engine, ids) = start_match(roles, &["hum", "wall"], vec![], filler_deck(40));
    let (a, b) = (ids[0], ids[1]);

    engine.role_attack(a, b, true).unwrap();

    // cascade 4, 2, 1 on the target
    assert_eq!(engine.state().runtime(b).unwrap().hp, 13);
    // 3 cascade recoil + 5 struggle recoil, additively
    assert_eq!(engine.state().runtime(a).unwrap().hp, 12);
    assert_eq!(engine.state().current_player_id, Some(b));
}

#[test]
fn test_cheat_death_install_survives_one_lethal_hit() {
    let guardian = Card::new("guardian", "Guardian", CardKind::Install, 1).with_effect(
        EffectTrigger::BeforeDamageTaken,
        EffectKind::CheatDeathAtFull { reset_to: 5 },
    );
    let roles = vec![
        role("keeper", RoleFamily::Generic, params(20, 4, 2, 9, 3)),
        role("ogre", RoleFamily::Generic, params(30, 30, 2, 1, 3)),
    ];
    let deck = vec![CardId::new("guardian"); 20];
    let (mut engine, ids) = start_match(roles, &["keeper", "ogre"], vec![guardian], deck);
    let (keeper, ogre) = (ids[0], ids[1]);

    engine
        .play_card(keeper, &CardId::new("guardian"), &PlayOptions::default())
        .unwrap();
    engine.end_turn(keeper).unwrap();

    // 30 atk - 2 def = 28, lethal against 20 hp at full health
    engine.role_attack(ogre, keeper, false).unwrap();

    let rt = engine.state().runtime(keeper).unwrap();
    assert_eq!(rt.hp, 5);
    assert!(!rt.defeated);
    assert!(rt.installs.is_empty());
    assert!(engine
        .state()
        .shared_discard
        .iter()
        .any(|c| c.as_str() == "guardian"));

    // no second miracle
    engine.end_turn(ogre).unwrap();
    engine.end_turn(keeper).unwrap();
    engine.role_attack(ogre, keeper, false).unwrap();
    assert!(engine.state().is_defeated(keeper));
}

#[test]
fn test_before_damage_ability_spends_tokens_to_reduce() {
    let bulwark_role = role("bulwark", RoleFamily::Generic, params(20, 4, 2, 1, 3))
        .with_ability(
            RoleAbility::new("Brace", AbilityTrigger::BeforeDamageTaken)
                .with_spend(TokenSpend {
                    stat: Stat::Def,
                    min: 1,
                    max: 3,
                })
                .with_action(AbilityAction::ReduceIncomingDamage {
                    value: AbilityValue::FromContext(ContextField::SpentStatTokens),
                }),
        );
    let fortify = Card::new("fortify", "Fortify", CardKind::Boost, 1).with_effect(
        EffectTrigger::OnPlay,
        EffectKind::AddStatToken {
            stat: Stat::Def,
            amount: Amount::Fixed(3),
            target: CardTarget::Self_,
        },
    );
    let roles = vec![
        bulwark_role,
        role("striker", RoleFamily::Generic, params(20, 10, 2, 9, 3)),
    ];
    let deck = vec![CardId::new("fortify"); 20];
    let (mut engine, ids) = start_match(roles, &["bulwark", "striker"], vec![fortify], deck);
    let (bulwark, striker) = (ids[0], ids[1]);

    // striker is faster; first give the bulwark its def tokens
    engine.end_turn(striker).unwrap();
    engine
        .play_card(bulwark, &CardId::new("fortify"), &PlayOptions::default())
        .unwrap();
    engine.end_turn(bulwark).unwrap();

    engine.role_attack(striker, bulwark, false).unwrap();

    // 10 atk - (2 base + 3 token) def = 5 base damage, then 3 spent
    // tokens shave it to 2
    let rt = engine.state().runtime(bulwark).unwrap();
    assert_eq!(rt.hp, 18);
    assert_eq!(rt.stat_tokens.def, 0);
}

#[test]
fn test_retaliation_ability_damages_the_source() {
    let thorns = role("thorns", RoleFamily::Generic, params(20, 4, 2, 1, 3)).with_ability(
        RoleAbility::new("Thorns", AbilityTrigger::AfterDamageTaken).with_action(
            AbilityAction::DamageSource {
                value: AbilityValue::Ratio {
                    field: ContextField::DamageTaken,
                    divisor: 2,
                    round: Rounding::Ceil,
                },
            },
        ),
    );
    let roles = vec![
        thorns,
        role("striker", RoleFamily::Generic, params(20, 10, 2, 9, 3)),
    ];
    let (mut engine, ids) = start_match(roles, &["thorns", "striker"], vec![], filler_deck(40));
    let (thorns_id, striker) = (ids[0], ids[1]);

    engine.role_attack(striker, thorns_id, false).unwrap();

    // 8 taken, ceil(8/2) = 4 reflected
    assert_eq!(engine.state().runtime(thorns_id).unwrap().hp, 12);
    assert_eq!(engine.state().runtime(striker).unwrap().hp, 16);
}

#[test]
fn test_after_damage_taken_grants_scaling_tokens() {
    let grit = role("grit", RoleFamily::Generic, params(20, 4, 2, 1, 3)).with_ability(
        RoleAbility::new("Grit", AbilityTrigger::AfterDamageTaken).with_action(
            AbilityAction::AddStatToken {
                stat: Stat::Atk,
                value: AbilityValue::FromContext(ContextField::DamageTaken),
            },
        ),
    );
    let roles = vec![
        grit,
        role("striker", RoleFamily::Generic, params(20, 10, 2, 9, 3)),
    ];
    let (mut engine, ids) = start_match(roles, &["grit", "striker"], vec![], filler_deck(40));
    let (grit_id, striker) = (ids[0], ids[1]);

    engine.role_attack(striker, grit_id, false).unwrap();

    assert_eq!(engine.state().runtime(grit_id).unwrap().stat_tokens.atk, 8);
}
