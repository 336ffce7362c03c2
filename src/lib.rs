//! rolebrawl - the rule-resolution core of a turn-based role-battle game.
//!
//! Players join a match, lock in roles with distinct stat blocks and passive
//! abilities, draw from a shared deck, play cards with targeted effects, and
//! trade role attacks until one player remains. This crate is only the core:
//! the turn state machine, the card/ability effect pipeline, and the damage
//! model. Transport, matchmaking, and catalog loading live in the layers
//! above; they construct a [`GameEngine`] from a [`catalog::Catalog`], drive
//! it one synchronous call at a time, and read back a serializable
//! [`core::GameState`] snapshot after every mutation.
//!
//! ```
//! use rolebrawl::catalog::{Catalog, Role, RoleFamily, RoleParams};
//! use rolebrawl::core::DeckId;
//! use rolebrawl::GameEngine;
//!
//! let params = RoleParams { hp: 20, atk: 8, def: 3, spe: 5, bra: 3 };
//! let catalog = Catalog::new(
//!     vec![Role::new("brawler", "Brawler", RoleFamily::Generic, params)],
//!     vec![],
//! );
//!
//! let mut engine = GameEngine::with_seed(catalog, 42);
//! let ada = engine.add_player("ada", None).id;
//! let bob = engine.add_player("bob", None).id;
//! engine.mark_player_ready(ada, true).unwrap();
//! engine.mark_player_ready(bob, true).unwrap();
//! engine.assign_shared_deck(DeckId::new("starter"), vec![]);
//! engine.start().unwrap();
//!
//! assert!(engine.state().current_player_id.is_some());
//! ```

pub mod catalog;
pub mod core;
pub mod effects;
pub mod engine;
pub mod error;

pub use engine::{GameEngine, PlayOptions};
pub use error::EngineError;
