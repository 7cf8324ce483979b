use async_trait::async_trait;

use crate::errors::InternalError;
use crate::types::internal::{StoneFields, StoneRecord};

/// Persistence seam for stones
///
/// Ids passed in are raw path segments; implementations reject malformed
/// ones with `StoneError::InvalidId` before touching storage.
#[async_trait]
pub trait StoneRepository: Send + Sync {
    /// Every stored stone, in storage (creation) order
    async fn list_all(&self) -> Result<Vec<StoneRecord>, InternalError>;

    /// Fails with `StoneError::NotFound` when no stone has this id
    async fn get_by_id(&self, id: &str) -> Result<StoneRecord, InternalError>;

    /// Persist a new stone under a freshly generated id
    async fn create(&self, fields: StoneFields) -> Result<StoneRecord, InternalError>;

    /// Replace every mutable field of an existing stone
    async fn update(&self, id: &str, fields: StoneFields) -> Result<StoneRecord, InternalError>;

    /// Remove a stone; removing an absent stone succeeds
    async fn delete(&self, id: &str) -> Result<(), InternalError>;
}
