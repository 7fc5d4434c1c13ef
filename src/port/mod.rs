mod client;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::Result;
pub use client::PortClient;

pub type Properties = Map<String, Value>;

/// A catalog entity. Relations are carried through untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    pub identifier: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default)]
    pub properties: Properties,
    #[serde(default)]
    pub relations: Map<String, Value>,
}

/// Read/write access to the developer-portal catalog.
#[async_trait]
pub trait Catalog: Sync {
    async fn get_entities(&self, kind: &str) -> Result<Vec<Entity>>;

    /// Create or fully replace an entity.
    async fn upsert_entity(&self, kind: &str, entity: &Entity) -> Result<Entity>;

    /// Patch only the given properties of an existing entity.
    async fn upsert_properties(
        &self,
        kind: &str,
        identifier: &str,
        properties: &Properties,
    ) -> Result<()>;
}
