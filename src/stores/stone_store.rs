use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{ActiveModelTrait, EntityTrait, QueryOrder, Set};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::DatabaseConnections;
use crate::errors::internal::StoneError;
use crate::errors::InternalError;
use crate::stores::StoneRepository;
use crate::types::db::stone::{self, ActiveModel, Entity as Stones};
use crate::types::internal::stone::parse_stone_id;
use crate::types::internal::{JewelryItem, StoneFields, StoneRecord};

/// Jewelry entry as stored in the `jewelry_types` JSON column
///
/// Older rows may omit `quantity`; it is coerced to 1 on read.
#[derive(Serialize, Deserialize)]
struct StoredJewelry {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    quantity: Option<i64>,
}

/// sea-orm backed stone repository (SQLite or Postgres)
pub struct StoneStore {
    connections: Arc<DatabaseConnections>,
}

impl StoneStore {
    pub fn new(connections: Arc<DatabaseConnections>) -> Self {
        Self { connections }
    }

    fn encode_jewelry(items: &[JewelryItem]) -> Result<String, InternalError> {
        let stored: Vec<StoredJewelry> = items
            .iter()
            .map(|item| StoredJewelry {
                kind: item.kind.clone(),
                quantity: Some(i64::from(item.quantity)),
            })
            .collect();

        serde_json::to_string(&stored).map_err(|e| InternalError::parse("jewelry_types", e.to_string()))
    }

    fn decode_jewelry(raw: &str) -> Result<Vec<JewelryItem>, InternalError> {
        if raw.trim().is_empty() {
            return Ok(Vec::new());
        }

        let stored: Vec<StoredJewelry> =
            serde_json::from_str(raw).map_err(|e| InternalError::parse("jewelry_types", e.to_string()))?;

        Ok(stored
            .into_iter()
            .map(|entry| JewelryItem::new(entry.kind, entry.quantity))
            .collect())
    }

    fn to_record(model: stone::Model) -> Result<StoneRecord, InternalError> {
        let jewelry_types = Self::decode_jewelry(&model.jewelry_types)?;

        Ok(StoneRecord {
            id: model.id,
            name: model.name,
            virtues: model.virtues,
            chakra_id: model.chakra_id,
            image: model.image,
            description: model.description,
            purification: model.purification,
            recharge: model.recharge,
            jewelry_types,
        })
    }

    /// Overwrite every mutable column of `active_model` from `fields`
    fn apply_fields(active_model: &mut ActiveModel, fields: &StoneFields) -> Result<(), InternalError> {
        active_model.name = Set(fields.name.clone());
        active_model.virtues = Set(fields.virtues.clone());
        active_model.chakra_id = Set(Some(fields.chakra.as_str().to_string()));
        active_model.image = Set(fields.image.clone());
        active_model.description = Set(fields.description.clone());
        active_model.purification = Set(fields.purification.clone());
        active_model.recharge = Set(fields.recharge.clone());
        active_model.jewelry_types = Set(Self::encode_jewelry(&fields.jewelry_types)?);
        active_model.updated_at = Set(Utc::now().timestamp());
        Ok(())
    }
}

#[async_trait]
impl StoneRepository for StoneStore {
    async fn list_all(&self) -> Result<Vec<StoneRecord>, InternalError> {
        let db = self.connections.get().await?;

        let models = Stones::find()
            .order_by_asc(stone::Column::CreatedAt)
            .order_by_asc(stone::Column::Id)
            .all(&db)
            .await
            .map_err(|e| InternalError::database("list_stones", e))?;

        models.into_iter().map(Self::to_record).collect()
    }

    async fn get_by_id(&self, id: &str) -> Result<StoneRecord, InternalError> {
        let id = parse_stone_id(id)?;
        let db = self.connections.get().await?;

        let model = Stones::find_by_id(id.clone())
            .one(&db)
            .await
            .map_err(|e| InternalError::database("get_stone", e))?
            .ok_or(StoneError::NotFound(id))?;

        Self::to_record(model)
    }

    async fn create(&self, fields: StoneFields) -> Result<StoneRecord, InternalError> {
        let db = self.connections.get().await?;
        let now = Utc::now().timestamp();

        let mut active_model = ActiveModel {
            id: Set(Uuid::new_v4().to_string()),
            created_at: Set(now),
            ..Default::default()
        };
        Self::apply_fields(&mut active_model, &fields)?;

        let model = active_model
            .insert(&db)
            .await
            .map_err(|e| InternalError::database("create_stone", e))?;

        tracing::info!(stone_id = %model.id, chakra = %fields.chakra, "Stone created");

        Self::to_record(model)
    }

    async fn update(&self, id: &str, fields: StoneFields) -> Result<StoneRecord, InternalError> {
        let id = parse_stone_id(id)?;
        let db = self.connections.get().await?;

        let existing = Stones::find_by_id(id.clone())
            .one(&db)
            .await
            .map_err(|e| InternalError::database("get_stone_for_update", e))?
            .ok_or(StoneError::NotFound(id))?;

        let mut active_model: ActiveModel = existing.into();
        Self::apply_fields(&mut active_model, &fields)?;

        let model = active_model
            .update(&db)
            .await
            .map_err(|e| InternalError::database("update_stone", e))?;

        tracing::info!(stone_id = %model.id, chakra = %fields.chakra, "Stone updated");

        Self::to_record(model)
    }

    async fn delete(&self, id: &str) -> Result<(), InternalError> {
        let id = parse_stone_id(id)?;
        let db = self.connections.get().await?;

        let result = Stones::delete_by_id(id.clone())
            .exec(&db)
            .await
            .map_err(|e| InternalError::database("delete_stone", e))?;

        if result.rows_affected == 0 {
            tracing::debug!(stone_id = %id, "Delete of absent stone treated as success");
        } else {
            tracing::info!(stone_id = %id, "Stone deleted");
        }

        Ok(())
    }
}

impl std::fmt::Debug for StoneStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoneStore")
            .field("connections", &"<connections>")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::utils::{sample_fields, setup_test_db};
    use crate::types::internal::Chakra;
    use sea_orm::{ConnectionTrait, Statement};

    async fn setup_store() -> (sea_orm::DatabaseConnection, StoneStore) {
        let db = setup_test_db().await;
        let store = StoneStore::new(Arc::new(DatabaseConnections::from_connection(db.clone())));
        (db, store)
    }

    #[tokio::test]
    async fn test_create_assigns_distinct_ids() {
        let (_db, store) = setup_store().await;

        let first = store.create(sample_fields("Amethyst", Chakra::Crown)).await.unwrap();
        let second = store.create(sample_fields("Amethyst", Chakra::Crown)).await.unwrap();

        assert!(!first.id.is_empty());
        assert_ne!(first.id, second.id);
    }

    #[tokio::test]
    async fn test_create_then_get_round_trips_all_fields() {
        let (_db, store) = setup_store().await;
        let mut fields = sample_fields("Rose Quartz", Chakra::Heart);
        fields.image = Some("data:image/jpeg;base64,AAAA".to_string());
        fields.purification = Some("Running water".to_string());
        fields.jewelry_types = vec![JewelryItem::new("Bracelet", Some(2))];

        let created = store.create(fields.clone()).await.unwrap();
        let fetched = store.get_by_id(&created.id).await.unwrap();

        assert_eq!(fetched, created);
        assert_eq!(fetched, StoneRecord::from_fields(created.id.clone(), fields));
    }

    #[tokio::test]
    async fn test_get_unknown_id_is_not_found() {
        let (_db, store) = setup_store().await;

        let result = store.get_by_id(&Uuid::new_v4().to_string()).await;

        assert!(matches!(result, Err(InternalError::Stone(StoneError::NotFound(_)))));
    }

    #[tokio::test]
    async fn test_malformed_id_is_rejected() {
        let (_db, store) = setup_store().await;

        let get = store.get_by_id("42").await;
        let delete = store.delete("not a uuid").await;

        assert!(matches!(get, Err(InternalError::Stone(StoneError::InvalidId(_)))));
        assert!(matches!(delete, Err(InternalError::Stone(StoneError::InvalidId(_)))));
    }

    #[tokio::test]
    async fn test_update_replaces_every_field() {
        let (_db, store) = setup_store().await;
        let mut original = sample_fields("Citrine", Chakra::SolarPlexus);
        original.purification = Some("Sunlight".to_string());
        let created = store.create(original).await.unwrap();

        let replacement = sample_fields("Citrine", Chakra::Sacral);
        let updated = store.update(&created.id, replacement).await.unwrap();

        assert_eq!(updated.id, created.id);
        assert_eq!(updated.chakra_id.as_deref(), Some("svg-sacral"));
        assert_eq!(updated.purification, None);
        assert_eq!(store.get_by_id(&created.id).await.unwrap(), updated);
    }

    #[tokio::test]
    async fn test_update_unknown_id_is_not_found() {
        let (_db, store) = setup_store().await;

        let result = store
            .update(&Uuid::new_v4().to_string(), sample_fields("Onyx", Chakra::Root))
            .await;

        assert!(matches!(result, Err(InternalError::Stone(StoneError::NotFound(_)))));
    }

    #[tokio::test]
    async fn test_delete_is_idempotent() {
        let (_db, store) = setup_store().await;
        let created = store.create(sample_fields("Jade", Chakra::Heart)).await.unwrap();

        store.delete(&created.id).await.unwrap();
        store.delete(&created.id).await.unwrap();

        let result = store.get_by_id(&created.id).await;
        assert!(matches!(result, Err(InternalError::Stone(StoneError::NotFound(_)))));
    }

    #[tokio::test]
    async fn test_list_all_includes_legacy_rows() {
        let (db, store) = setup_store().await;
        store.create(sample_fields("Lapis", Chakra::ThirdEye)).await.unwrap();

        let legacy_id = Uuid::new_v4().to_string();
        db.execute(Statement::from_sql_and_values(
            db.get_database_backend(),
            "INSERT INTO stones (id, name, virtues, chakra_id, jewelry_types, created_at, updated_at) \
             VALUES (?, 'Old stone', 'unknown', NULL, '[{\"type\":\"Collier\"}]', 0, 0)",
            [legacy_id.clone().into()],
        ))
        .await
        .unwrap();

        let stones = store.list_all().await.unwrap();

        assert_eq!(stones.len(), 2);
        let legacy = stones.iter().find(|s| s.id == legacy_id).unwrap();
        assert_eq!(legacy.group_key(), "unknown");
        assert_eq!(legacy.jewelry_types, vec![JewelryItem::new("Collier", None)]);
    }

    #[tokio::test]
    async fn test_missing_database_url_is_unavailable() {
        let store = StoneStore::new(Arc::new(DatabaseConnections::new(None)));

        let err = store.list_all().await.unwrap_err();

        assert!(err.is_unavailable());
    }
}
