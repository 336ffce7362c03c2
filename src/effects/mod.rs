//! Effect math and targeting, shared by cards, abilities, and role actions.

pub mod math;
pub mod targeting;

pub use math::{
    effective_stat, eval_amount, eval_formula, mutate_base_stat, Amount, Formula, Rounding,
};
pub use targeting::{resolve_targets, Targets};
