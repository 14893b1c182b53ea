use serde::{Deserialize, Serialize};

use crate::entity::{Entity, EntityId};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Entity)]
#[entity(kind = "author", collection = "authors")]
#[serde(default)]
pub struct Author {
    pub id: EntityId,
    #[entity(required)]
    pub first_name: String,
    #[entity(required)]
    pub last_name: String,
    pub bio: String,
}

impl Author {
    /// "First Last", as matched by author searches.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}
