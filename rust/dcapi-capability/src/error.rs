/// An ability name outside the rule table.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown ability: {0:?}")]
pub struct UnknownAbility(pub String);
