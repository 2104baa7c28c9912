use crate::{Abilities, Ability, Identity};

/// Predicate deciding whether an identity holds an ability.
pub type Rule = fn(&Identity) -> bool;

/// The ability rule table.
///
/// Predicates are total and independent of one another, so the order of
/// evaluation does not affect the result.
pub const RULES: [(Ability, Rule); 6] = [
    (Ability::ReadPublic, |_| true),
    (Ability::ReadPublished, |_| true),
    (Ability::ReadInstitution, |identity| {
        identity.super_user || identity.institution || identity.reading_room
    }),
    (Ability::ReadPrivate, |identity| {
        identity.super_user || identity.reading_room
    }),
    (Ability::ReadUnpublished, |identity| identity.super_user),
    (Ability::Chat, |identity| identity.logged_in),
];

/// Compute the abilities granted to `identity`.
pub fn resolve(identity: &Identity) -> Abilities {
    Abilities::granted(
        RULES
            .iter()
            .filter(|(_, rule)| rule(identity))
            .map(|(ability, _)| *ability),
    )
}
