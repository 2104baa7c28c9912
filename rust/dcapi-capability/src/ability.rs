use crate::UnknownAbility;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// A named permission carried by a token.
///
/// Read abilities are expressed as `read:<Tier>` where the tier is either a
/// document visibility or a publication state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Ability {
    /// `read:Public`
    ReadPublic,
    /// `read:Published`
    ReadPublished,
    /// `read:Institution`
    ReadInstitution,
    /// `read:Private`
    ReadPrivate,
    /// `read:Unpublished`
    ReadUnpublished,
    /// `chat`
    Chat,
}

impl Ability {
    /// Every ability, in rule table order.
    pub const ALL: [Ability; 6] = [
        Ability::ReadPublic,
        Ability::ReadPublished,
        Ability::ReadInstitution,
        Ability::ReadPrivate,
        Ability::ReadUnpublished,
        Ability::Chat,
    ];

    /// Wire name of the ability.
    pub fn as_str(&self) -> &'static str {
        match self {
            Ability::ReadPublic => "read:Public",
            Ability::ReadPublished => "read:Published",
            Ability::ReadInstitution => "read:Institution",
            Ability::ReadPrivate => "read:Private",
            Ability::ReadUnpublished => "read:Unpublished",
            Ability::Chat => "chat",
        }
    }
}

impl FromStr for Ability {
    type Err = UnknownAbility;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        Ability::ALL
            .into_iter()
            .find(|ability| ability.as_str() == name)
            .ok_or_else(|| UnknownAbility(name.to_string()))
    }
}

impl Display for Ability {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Ability {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Ability {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let name = String::deserialize(deserializer)?;
        name.parse().map_err(serde::de::Error::custom)
    }
}
