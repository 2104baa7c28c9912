use crate::Ability;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeSet;

/// An immutable set of granted abilities.
///
/// Only [`resolve`](crate::resolve) builds a set from scratch. Decoding a
/// previously issued set is the other way to obtain one; there is no way to
/// add to a set after the fact.
///
/// Decoding skips names this build does not know, so sets issued by a newer
/// rule table still load.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Abilities(BTreeSet<Ability>);

impl Abilities {
    pub(crate) fn granted(abilities: impl IntoIterator<Item = Ability>) -> Self {
        Self(abilities.into_iter().collect())
    }

    /// Whether `ability` was granted.
    pub fn contains(&self, ability: Ability) -> bool {
        self.0.contains(&ability)
    }

    /// Granted abilities in a stable order.
    pub fn iter(&self) -> impl Iterator<Item = Ability> + '_ {
        self.0.iter().copied()
    }

    /// Number of granted abilities.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether nothing was granted.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<'de> Deserialize<'de> for Abilities {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let names = Vec::<String>::deserialize(deserializer)?;
        Ok(Self::granted(
            names.iter().filter_map(|name| name.parse::<Ability>().ok()),
        ))
    }
}

impl<'a> IntoIterator for &'a Abilities {
    type Item = Ability;
    type IntoIter = std::iter::Copied<std::collections::btree_set::Iter<'a, Ability>>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter().copied()
    }
}
