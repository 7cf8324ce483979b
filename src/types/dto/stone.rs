use std::collections::BTreeMap;

use poem_openapi::{payload::Json, ApiResponse, Object};
use serde::{Deserialize, Serialize};

use crate::errors::internal::StoneError;
use crate::types::internal::chakra::Chakra;
use crate::types::internal::stone::{group_by_chakra, JewelryItem, StoneFields, StoneRecord};

/// A jewelry form the stone is owned in
#[derive(Object, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JewelryType {
    /// Jewelry type label (e.g. "Collier")
    #[oai(rename = "type")]
    #[serde(rename = "type")]
    pub kind: String,

    /// Number of pieces, at least 1
    pub quantity: u32,
}

/// A jewelry selection as submitted by a client
#[derive(Object, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JewelryTypeInput {
    #[oai(rename = "type")]
    #[serde(rename = "type")]
    pub kind: String,

    /// Defaults to 1 when absent or below 1
    pub quantity: Option<i64>,
}

/// Response model representing a stone
#[derive(Object, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[oai(rename_all = "camelCase")]
#[serde(rename_all = "camelCase")]
pub struct Stone {
    /// Unique identifier, assigned on creation
    pub id: String,

    pub name: String,

    pub virtues: String,

    /// Chakra zone id (`svg-crown`, ...); null for legacy records without one
    pub chakra_id: Option<String>,

    /// Data URI or external image URL
    pub image: Option<String>,

    pub description: Option<String>,

    pub purification: Option<String>,

    pub recharge: Option<String>,

    #[serde(default)]
    pub jewelry_types: Vec<JewelryType>,
}

/// Request body for creating or replacing a stone
///
/// Every field is optional at the parsing level so missing required fields
/// produce the API's own error shape instead of a schema failure.
#[derive(Object, Debug, Clone, Default, Serialize, Deserialize)]
#[oai(rename_all = "camelCase")]
#[serde(rename_all = "camelCase")]
pub struct StoneInput {
    /// Ignored; ids are assigned by storage
    pub id: Option<String>,

    pub name: Option<String>,

    pub virtues: Option<String>,

    pub chakra_id: Option<String>,

    pub image: Option<String>,

    pub description: Option<String>,

    pub purification: Option<String>,

    pub recharge: Option<String>,

    pub jewelry_types: Option<Vec<JewelryTypeInput>>,
}

impl StoneInput {
    /// Validate required fields and build the full field set.
    ///
    /// Any client-supplied id is dropped here.
    pub fn into_fields(self) -> Result<StoneFields, StoneError> {
        let name = non_blank(self.name);
        let virtues = non_blank(self.virtues);
        let chakra_raw = non_blank(self.chakra_id);

        let mut missing = Vec::new();
        if name.is_none() {
            missing.push("name");
        }
        if virtues.is_none() {
            missing.push("virtues");
        }
        if chakra_raw.is_none() {
            missing.push("chakraId");
        }
        let (Some(name), Some(virtues), Some(chakra_raw)) = (name, virtues, chakra_raw) else {
            return Err(StoneError::MissingFields(missing));
        };

        let chakra = Chakra::parse(&chakra_raw).ok_or(StoneError::UnknownChakra(chakra_raw))?;

        let jewelry_types = self
            .jewelry_types
            .unwrap_or_default()
            .into_iter()
            .map(|input| JewelryItem::new(input.kind, input.quantity))
            .collect();

        Ok(StoneFields {
            name,
            virtues,
            chakra,
            image: non_blank(self.image),
            description: non_blank(self.description),
            purification: non_blank(self.purification),
            recharge: non_blank(self.recharge),
            jewelry_types,
        })
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

impl From<JewelryItem> for JewelryType {
    fn from(item: JewelryItem) -> Self {
        Self {
            kind: item.kind,
            quantity: item.quantity,
        }
    }
}

impl From<StoneRecord> for Stone {
    fn from(record: StoneRecord) -> Self {
        Self {
            id: record.id,
            name: record.name,
            virtues: record.virtues,
            chakra_id: record.chakra_id,
            image: record.image,
            description: record.description,
            purification: record.purification,
            recharge: record.recharge,
            jewelry_types: record.jewelry_types.into_iter().map(JewelryType::from).collect(),
        }
    }
}

/// Shape list results as `{chakraId: [Stone...]}`
pub fn group_stones(records: Vec<StoneRecord>) -> BTreeMap<String, Vec<Stone>> {
    group_by_chakra(records)
        .into_iter()
        .map(|(key, records)| (key, records.into_iter().map(Stone::from).collect()))
        .collect()
}

/// Response for stone creation
#[derive(ApiResponse, Debug)]
pub enum CreateStoneResponse {
    /// Stone created
    #[oai(status = 201)]
    Created(Json<Stone>),
}

/// Response for stone deletion
#[derive(ApiResponse, Debug)]
pub enum DeleteStoneResponse {
    /// Stone removed, or was already absent
    #[oai(status = 204)]
    NoContent,
}
