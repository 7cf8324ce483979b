use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::errors::internal::StoneError;
use crate::errors::InternalError;
use crate::stores::StoneRepository;
use crate::types::internal::stone::parse_stone_id;
use crate::types::internal::{StoneFields, StoneRecord};

#[derive(Default)]
struct MemoryState {
    next_sequence: u64,
    /// Keyed by insertion sequence so listing keeps creation order
    stones: BTreeMap<u64, StoneRecord>,
}

impl MemoryState {
    fn sequence_of(&self, id: &str) -> Option<u64> {
        self.stones
            .iter()
            .find_map(|(sequence, record)| (record.id == id).then_some(*sequence))
    }
}

/// In-process stone repository; contents are lost on restart
#[derive(Default)]
pub struct MemoryStoneStore {
    state: RwLock<MemoryState>,
}

impl MemoryStoneStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl StoneRepository for MemoryStoneStore {
    async fn list_all(&self) -> Result<Vec<StoneRecord>, InternalError> {
        let state = self.state.read().await;
        Ok(state.stones.values().cloned().collect())
    }

    async fn get_by_id(&self, id: &str) -> Result<StoneRecord, InternalError> {
        let id = parse_stone_id(id)?;
        let state = self.state.read().await;

        state
            .stones
            .values()
            .find(|record| record.id == id)
            .cloned()
            .ok_or_else(|| StoneError::NotFound(id).into())
    }

    async fn create(&self, fields: StoneFields) -> Result<StoneRecord, InternalError> {
        let record = StoneRecord::from_fields(Uuid::new_v4().to_string(), fields);

        let mut state = self.state.write().await;
        let sequence = state.next_sequence;
        state.next_sequence += 1;
        state.stones.insert(sequence, record.clone());

        tracing::info!(stone_id = %record.id, "Stone created in memory store");

        Ok(record)
    }

    async fn update(&self, id: &str, fields: StoneFields) -> Result<StoneRecord, InternalError> {
        let id = parse_stone_id(id)?;
        let mut state = self.state.write().await;

        let sequence = state.sequence_of(&id).ok_or_else(|| StoneError::NotFound(id.clone()))?;
        let record = StoneRecord::from_fields(id, fields);
        state.stones.insert(sequence, record.clone());

        Ok(record)
    }

    async fn delete(&self, id: &str) -> Result<(), InternalError> {
        let id = parse_stone_id(id)?;
        let mut state = self.state.write().await;

        if let Some(sequence) = state.sequence_of(&id) {
            state.stones.remove(&sequence);
        }

        Ok(())
    }
}

impl std::fmt::Debug for MemoryStoneStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryStoneStore").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::utils::sample_fields;
    use crate::types::internal::Chakra;

    #[tokio::test]
    async fn test_list_keeps_creation_order() {
        let store = MemoryStoneStore::new();
        let names = ["Onyx", "Amber", "Malachite"];
        for name in names {
            store.create(sample_fields(name, Chakra::Root)).await.unwrap();
        }

        let listed: Vec<String> = store.list_all().await.unwrap().into_iter().map(|s| s.name).collect();

        assert_eq!(listed, names);
    }

    #[tokio::test]
    async fn test_update_keeps_position_and_id() {
        let store = MemoryStoneStore::new();
        let first = store.create(sample_fields("Onyx", Chakra::Root)).await.unwrap();
        store.create(sample_fields("Amber", Chakra::Sacral)).await.unwrap();

        let updated = store.update(&first.id, sample_fields("Black Onyx", Chakra::Root)).await.unwrap();

        let listed = store.list_all().await.unwrap();
        assert_eq!(updated.id, first.id);
        assert_eq!(listed[0], updated);
    }

    #[tokio::test]
    async fn test_update_and_get_unknown_id_are_not_found() {
        let store = MemoryStoneStore::new();
        let id = Uuid::new_v4().to_string();

        let get = store.get_by_id(&id).await;
        let update = store.update(&id, sample_fields("Onyx", Chakra::Root)).await;

        assert!(matches!(get, Err(InternalError::Stone(StoneError::NotFound(_)))));
        assert!(matches!(update, Err(InternalError::Stone(StoneError::NotFound(_)))));
    }

    #[tokio::test]
    async fn test_delete_twice_succeeds() {
        let store = MemoryStoneStore::new();
        let created = store.create(sample_fields("Jade", Chakra::Heart)).await.unwrap();

        store.delete(&created.id).await.unwrap();
        store.delete(&created.id).await.unwrap();

        assert!(store.list_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_malformed_id_is_rejected() {
        let store = MemoryStoneStore::new();

        let result = store.delete("abc").await;

        assert!(matches!(result, Err(InternalError::Stone(StoneError::InvalidId(_)))));
    }
}
