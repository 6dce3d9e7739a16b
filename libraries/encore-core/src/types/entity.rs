//! Entity types and the identity used to match catalog items to favorites

use crate::error::EncoreError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Length of a catalog id (base-62).
pub const EXTERNAL_ID_LEN: usize = 22;

/// Whether `id` has the shape of a catalog id.
pub fn is_valid_external_id(id: &str) -> bool {
    id.len() == EXTERNAL_ID_LEN && id.bytes().all(|b| b.is_ascii_alphanumeric())
}

/// Kind of catalog object a favorite points to.
///
/// Serialized as its integer discriminant, which is what the account-data
/// API stores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum EntityType {
    Track = 0,
    Artist = 1,
    Album = 2,
}

impl EntityType {
    /// Catalog type string (`"track"`, `"artist"`, `"album"`)
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Track => "track",
            Self::Artist => "artist",
            Self::Album => "album",
        }
    }
}

impl From<EntityType> for u8 {
    fn from(value: EntityType) -> Self {
        value as u8
    }
}

impl TryFrom<u8> for EntityType {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Track),
            1 => Ok(Self::Artist),
            2 => Ok(Self::Album),
            other => Err(format!("invalid entity type discriminant {other}")),
        }
    }
}

impl FromStr for EntityType {
    type Err = EncoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "track" => Ok(Self::Track),
            "artist" => Ok(Self::Artist),
            "album" => Ok(Self::Album),
            other => Err(EncoreError::UnknownEntityType(other.to_string())),
        }
    }
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// Identity of a catalog entity: `(external_id, entity_type)`.
///
/// At most one favorite per user should exist for a key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EntityKey {
    pub external_id: String,
    pub entity_type: EntityType,
}

impl EntityKey {
    pub fn new(external_id: impl Into<String>, entity_type: EntityType) -> Self {
        Self {
            external_id: external_id.into(),
            entity_type,
        }
    }

    /// Entity referenced by a share or embed link
    /// (`https://open.spotify.com/track/<id>?si=..`) or a URI
    /// (`spotify:album:<id>`).
    ///
    /// Types are tried in the order track, album, artist.
    pub fn from_link(link: &str) -> Option<Self> {
        [EntityType::Track, EntityType::Album, EntityType::Artist]
            .into_iter()
            .find_map(|entity_type| {
                ['/', ':'].into_iter().find_map(|separator| {
                    let marker = format!("{}{}", entity_type.as_str(), separator);
                    link.match_indices(&marker).find_map(|(pos, _)| {
                        link.get(pos + marker.len()..)
                            .and_then(|rest| rest.get(..EXTERNAL_ID_LEN))
                            .filter(|id| is_valid_external_id(id))
                            .map(|id| Self::new(id, entity_type))
                    })
                })
            })
    }
}

impl fmt::Display for EntityKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.entity_type, self.external_id)
    }
}
