//! Effect math: effective stats, value formulas, base-stat mutation.
//!
//! Pure and stateless. Everything is integer arithmetic; division goes
//! through `Rounding` so formulas state their rounding mode explicitly.

use serde::{Deserialize, Serialize};

use crate::core::{PlayerRuntime, Stat};

/// Rounding mode for integer division.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rounding {
    Floor,
    Ceil,
    Nearest,
}

impl Rounding {
    /// Divide `num / den` with this rounding. `den` must be positive.
    #[must_use]
    pub fn div(self, num: i64, den: i64) -> i64 {
        debug_assert!(den > 0);
        match self {
            Rounding::Floor => num.div_euclid(den),
            Rounding::Ceil => -((-num).div_euclid(den)),
            Rounding::Nearest => (2 * num + den).div_euclid(2 * den),
        }
    }
}

/// A value derived from a player's runtime.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Formula {
    /// Rounded half of the actor's effective stat.
    SelfStatHalf { stat: Stat, round: Rounding },

    /// Effective stat divided by `n`; for hp the base value is used,
    /// ignoring tokens. Evaluates to 0 when `n <= 0`.
    PerN { stat: Stat, n: i64, round: Rounding },
}

/// A fixed or formula-derived magnitude.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Amount {
    Fixed(i64),
    Derived(Formula),
}

/// Effective value of a stat: base + token + turn boost.
///
/// Returns 0 for a missing runtime. For hp this degenerates to the base
/// value, since hp carries no tokens or boosts.
#[must_use]
pub fn effective_stat(runtime: Option<&PlayerRuntime>, stat: Stat) -> i64 {
    let Some(rt) = runtime else {
        return 0;
    };
    rt.base_stats.get(stat) + rt.stat_tokens.get(stat) + rt.turn_boosts.get(stat)
}

/// Evaluate a formula against a runtime.
#[must_use]
pub fn eval_formula(formula: &Formula, runtime: Option<&PlayerRuntime>) -> i64 {
    match *formula {
        Formula::SelfStatHalf { stat, round } => round.div(effective_stat(runtime, stat), 2),
        Formula::PerN { stat, n, round } => {
            if n <= 0 {
                return 0;
            }
            let value = match stat {
                Stat::Hp => runtime.map_or(0, |rt| rt.base_stats.hp),
                other => effective_stat(runtime, other),
            };
            round.div(value, n)
        }
    }
}

/// Evaluate an amount against a runtime.
#[must_use]
pub fn eval_amount(amount: &Amount, runtime: Option<&PlayerRuntime>) -> i64 {
    match amount {
        Amount::Fixed(value) => *value,
        Amount::Derived(formula) => eval_formula(formula, runtime),
    }
}

/// Replace a base stat via `mutate`, returning the new runtime.
///
/// Mutating base hp resyncs `max_hp` and clamps current hp down to the new
/// maximum; current hp is never raised by this.
#[must_use]
pub fn mutate_base_stat(
    runtime: &PlayerRuntime,
    stat: Stat,
    mutate: impl FnOnce(i64) -> i64,
) -> PlayerRuntime {
    let mut next = runtime.clone();
    let old = next.base_stats.get(stat);
    next.base_stats.set(stat, mutate(old));

    if stat == Stat::Hp {
        next.max_hp = next.base_stats.hp;
        next.hp = next.hp.min(next.max_hp).max(0);
    }
    next
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::RoleParams;

    fn runtime() -> PlayerRuntime {
        PlayerRuntime::from_params(&RoleParams {
            hp: 21,
            atk: 9,
            def: 4,
            spe: 6,
            bra: 3,
        })
    }

    #[test]
    fn test_rounding_modes() {
        assert_eq!(Rounding::Floor.div(7, 2), 3);
        assert_eq!(Rounding::Ceil.div(7, 2), 4);
        assert_eq!(Rounding::Nearest.div(7, 2), 4);
        assert_eq!(Rounding::Nearest.div(5, 2), 3);
        assert_eq!(Rounding::Floor.div(-7, 2), -4);
        assert_eq!(Rounding::Ceil.div(-7, 2), -3);
    }

    #[test]
    fn test_effective_stat_sums_layers() {
        let mut rt = runtime();
        rt.stat_tokens.add(Stat::Atk, 3);
        rt.turn_boosts.add(Stat::Atk, 1);

        assert_eq!(effective_stat(Some(&rt), Stat::Atk), 13);
        assert_eq!(effective_stat(None, Stat::Atk), 0);
    }

    #[test]
    fn test_self_stat_half() {
        let rt = runtime();
        let formula = Formula::SelfStatHalf {
            stat: Stat::Atk,
            round: Rounding::Floor,
        };
        assert_eq!(eval_formula(&formula, Some(&rt)), 4);

        let formula = Formula::SelfStatHalf {
            stat: Stat::Atk,
            round: Rounding::Ceil,
        };
        assert_eq!(eval_formula(&formula, Some(&rt)), 5);
    }

    #[test]
    fn test_per_n_hp_ignores_tokens() {
        let mut rt = runtime();
        // hp has no tokens, but prove the base is read even if turn boosts
        // exist on other stats
        rt.stat_tokens.add(Stat::Atk, 100);

        let formula = Formula::PerN {
            stat: Stat::Hp,
            n: 4,
            round: Rounding::Floor,
        };
        assert_eq!(eval_formula(&formula, Some(&rt)), 5);
    }

    #[test]
    fn test_per_n_bad_divisor_is_zero() {
        let rt = runtime();
        let formula = Formula::PerN {
            stat: Stat::Atk,
            n: 0,
            round: Rounding::Floor,
        };
        assert_eq!(eval_formula(&formula, Some(&rt)), 0);
    }

    #[test]
    fn test_mutate_base_hp_resyncs_max_and_clamps_down() {
        let rt = runtime();
        assert_eq!(rt.hp, 21);

        let smaller = mutate_base_stat(&rt, Stat::Hp, |hp| hp - 6);
        assert_eq!(smaller.base_stats.hp, 15);
        assert_eq!(smaller.max_hp, 15);
        assert_eq!(smaller.hp, 15);

        // raising base hp raises the cap but never current hp
        let bigger = mutate_base_stat(&smaller, Stat::Hp, |hp| hp + 10);
        assert_eq!(bigger.max_hp, 25);
        assert_eq!(bigger.hp, 15);
    }

    #[test]
    fn test_mutate_non_hp_stat_leaves_hp_alone() {
        let rt = runtime();
        let next = mutate_base_stat(&rt, Stat::Atk, |atk| atk * 2);
        assert_eq!(next.base_stats.atk, 18);
        assert_eq!(next.hp, rt.hp);
        assert_eq!(next.max_hp, rt.max_hp);
    }
}
