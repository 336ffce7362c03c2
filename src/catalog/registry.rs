//! The definition catalog.
//!
//! Immutable lookup tables mapping role ids and card ids to definitions.
//! Supplied at engine construction by whatever loads the external JSON;
//! the engine treats it as read-only for its lifetime.

use rustc_hash::FxHashMap;

use super::card::{Card, CardId};
use super::role::{Role, RoleId};

/// Immutable role and card lookup.
#[derive(Clone, Debug, Default)]
pub struct Catalog {
    roles: FxHashMap<RoleId, Role>,
    cards: FxHashMap<CardId, Card>,

    /// Insertion order of roles, for deterministic random assignment.
    role_order: Vec<RoleId>,
}

impl Catalog {
    /// Build a catalog from definition lists. Later duplicates win.
    #[must_use]
    pub fn new(roles: Vec<Role>, cards: Vec<Card>) -> Self {
        let mut catalog = Self::default();
        for role in roles {
            if !catalog.roles.contains_key(&role.id) {
                catalog.role_order.push(role.id.clone());
            }
            catalog.roles.insert(role.id.clone(), role);
        }
        for card in cards {
            catalog.cards.insert(card.id.clone(), card);
        }
        catalog
    }

    #[must_use]
    pub fn role(&self, id: &RoleId) -> Option<&Role> {
        self.roles.get(id)
    }

    #[must_use]
    pub fn card(&self, id: &CardId) -> Option<&Card> {
        self.cards.get(id)
    }

    /// Role ids in registration order.
    #[must_use]
    pub fn role_ids(&self) -> &[RoleId] {
        &self.role_order
    }

    #[must_use]
    pub fn has_roles(&self) -> bool {
        !self.roles.is_empty()
    }

    #[must_use]
    pub fn role_count(&self) -> usize {
        self.roles.len()
    }

    #[must_use]
    pub fn card_count(&self) -> usize {
        self.cards.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{CardKind, RoleFamily, RoleParams};

    fn params() -> RoleParams {
        RoleParams {
            hp: 20,
            atk: 8,
            def: 3,
            spe: 5,
            bra: 3,
        }
    }

    #[test]
    fn test_lookup() {
        let catalog = Catalog::new(
            vec![Role::new("ember", "Ember", RoleFamily::Flame, params())],
            vec![Card::new("surge", "Surge", CardKind::Skill, 1)],
        );

        assert!(catalog.role(&RoleId::new("ember")).is_some());
        assert!(catalog.role(&RoleId::new("missing")).is_none());
        assert!(catalog.card(&CardId::new("surge")).is_some());
        assert_eq!(catalog.role_count(), 1);
        assert_eq!(catalog.card_count(), 1);
    }

    #[test]
    fn test_role_order_is_stable() {
        let catalog = Catalog::new(
            vec![
                Role::new("b", "B", RoleFamily::Generic, params()),
                Role::new("a", "A", RoleFamily::Generic, params()),
            ],
            vec![],
        );

        let ids: Vec<_> = catalog.role_ids().iter().map(RoleId::as_str).collect();
        assert_eq!(ids, vec!["b", "a"]);
    }

    #[test]
    fn test_empty_catalog_has_no_roles() {
        let catalog = Catalog::default();
        assert!(!catalog.has_roles());
    }
}
