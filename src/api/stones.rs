use std::collections::BTreeMap;
use std::sync::Arc;

use poem::Request;
use poem_openapi::{param::Path, payload::Json, OpenApi, Tags};

use crate::api::helpers::{authorize_admin, create_request_context};
use crate::errors::StoneApiError;
use crate::services::AdminGate;
use crate::stores::StoneRepository;
use crate::types::dto::stone::{group_stones, CreateStoneResponse, DeleteStoneResponse, Stone, StoneInput};

/// Stone CRUD endpoints
pub struct StonesApi {
    repository: Arc<dyn StoneRepository>,
    admin_gate: Arc<AdminGate>,
}

impl StonesApi {
    pub fn new(repository: Arc<dyn StoneRepository>, admin_gate: Arc<AdminGate>) -> Self {
        Self {
            repository,
            admin_gate,
        }
    }
}

#[derive(Tags)]
enum StoneTags {
    /// Stone catalog
    Stones,
}

#[OpenApi]
impl StonesApi {
    /// List every stone grouped by chakra id
    ///
    /// Stones without a recognised chakra are grouped under `unknown`.
    #[oai(path = "/stones", method = "get", tag = "StoneTags::Stones")]
    async fn list_stones(&self, req: &Request) -> Result<Json<BTreeMap<String, Vec<Stone>>>, StoneApiError> {
        let ctx = create_request_context(req);
        let records = self.repository.list_all().await?;

        tracing::debug!(request_id = %ctx.request_id, count = records.len(), "Listed stones");

        Ok(Json(group_stones(records)))
    }

    /// Get one stone by id
    #[oai(path = "/stones/:id", method = "get", tag = "StoneTags::Stones")]
    async fn get_stone(&self, id: Path<String>) -> Result<Json<Stone>, StoneApiError> {
        let record = self.repository.get_by_id(&id.0).await?;
        Ok(Json(record.into()))
    }

    /// Create a stone
    ///
    /// Requires `name`, `virtues` and `chakraId`. Any `id` in the body is
    /// ignored; storage assigns a new one.
    #[oai(path = "/stones", method = "post", tag = "StoneTags::Stones")]
    async fn create_stone(&self, req: &Request, body: Json<StoneInput>) -> Result<CreateStoneResponse, StoneApiError> {
        let ctx = authorize_admin(req, &self.admin_gate)?;
        let fields = body.0.into_fields()?;

        let record = self.repository.create(fields).await?;

        tracing::info!(request_id = %ctx.request_id, stone_id = %record.id, "Stone created via API");

        Ok(CreateStoneResponse::Created(Json(record.into())))
    }

    /// Replace a stone
    ///
    /// Every mutable field is overwritten from the body; optional fields left
    /// out are cleared.
    #[oai(path = "/stones/:id", method = "put", tag = "StoneTags::Stones")]
    async fn update_stone(
        &self,
        req: &Request,
        id: Path<String>,
        body: Json<StoneInput>,
    ) -> Result<Json<Stone>, StoneApiError> {
        let ctx = authorize_admin(req, &self.admin_gate)?;
        let fields = body.0.into_fields()?;

        let record = self.repository.update(&id.0, fields).await?;

        tracing::info!(request_id = %ctx.request_id, stone_id = %record.id, "Stone updated via API");

        Ok(Json(record.into()))
    }

    /// Delete a stone
    ///
    /// Succeeds whether or not the stone existed.
    #[oai(path = "/stones/:id", method = "delete", tag = "StoneTags::Stones")]
    async fn delete_stone(&self, req: &Request, id: Path<String>) -> Result<DeleteStoneResponse, StoneApiError> {
        let ctx = authorize_admin(req, &self.admin_gate)?;

        self.repository.delete(&id.0).await?;

        tracing::info!(request_id = %ctx.request_id, stone_id = %id.0, "Stone delete handled");

        Ok(DeleteStoneResponse::NoContent)
    }
}
