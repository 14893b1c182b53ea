use serde::{Deserialize, Serialize};

use crate::entity::{Entity, EntityId, Timestamp};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Address {
    pub street: String,
    pub city: String,
    pub state: String,
    pub postal_code: String,
    pub country: String,
}

/// A registered customer. `created_at` is stamped by the store and survives updates.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Entity)]
#[entity(kind = "customer", collection = "customers")]
#[serde(default)]
pub struct Customer {
    pub id: EntityId,
    #[entity(required)]
    pub name: String,
    #[entity(required)]
    pub email: String,
    pub address: Address,
    #[entity(created_at)]
    pub created_at: Timestamp,
}
