use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::internal::StoneError;
use crate::types::internal::chakra::Chakra;

/// A jewelry form a stone is owned in, with how many pieces
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JewelryItem {
    #[serde(rename = "type")]
    pub kind: String,
    pub quantity: u32,
}

impl JewelryItem {
    /// Quantities below one are coerced to one
    pub fn new(kind: impl Into<String>, quantity: Option<i64>) -> Self {
        let quantity = quantity
            .filter(|q| *q >= 1)
            .map(|q| u32::try_from(q).unwrap_or(u32::MAX))
            .unwrap_or(1);
        Self {
            kind: kind.into(),
            quantity,
        }
    }
}

/// Every mutable field of a stone.
///
/// Create and update both take a full set of fields: update replaces the
/// stored record wholesale, so an optional left as `None` is cleared.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoneFields {
    pub name: String,
    pub virtues: String,
    pub chakra: Chakra,
    pub image: Option<String>,
    pub description: Option<String>,
    pub purification: Option<String>,
    pub recharge: Option<String>,
    pub jewelry_types: Vec<JewelryItem>,
}

/// A persisted stone as returned by a repository
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoneRecord {
    pub id: String,
    pub name: String,
    pub virtues: String,
    /// Stored category; may be missing or invalid for legacy rows
    pub chakra_id: Option<String>,
    pub image: Option<String>,
    pub description: Option<String>,
    pub purification: Option<String>,
    pub recharge: Option<String>,
    pub jewelry_types: Vec<JewelryItem>,
}

impl StoneRecord {
    pub fn from_fields(id: String, fields: StoneFields) -> Self {
        Self {
            id,
            name: fields.name,
            virtues: fields.virtues,
            chakra_id: Some(fields.chakra.as_str().to_string()),
            image: fields.image,
            description: fields.description,
            purification: fields.purification,
            recharge: fields.recharge,
            jewelry_types: fields.jewelry_types,
        }
    }

    pub fn group_key(&self) -> String {
        Chakra::group_key(self.chakra_id.as_deref())
    }
}

/// Validate a stone id and return its canonical text form
pub fn parse_stone_id(id: &str) -> Result<String, StoneError> {
    Uuid::parse_str(id.trim())
        .map(|uuid| uuid.to_string())
        .map_err(|_| StoneError::InvalidId(id.to_string()))
}

/// Group records by chakra, each record under exactly one key
pub fn group_by_chakra(records: Vec<StoneRecord>) -> BTreeMap<String, Vec<StoneRecord>> {
    records.into_iter().fold(BTreeMap::new(), |mut groups, record| {
        groups.entry(record.group_key()).or_insert_with(Vec::new).push(record);
        groups
    })
}
