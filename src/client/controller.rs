use chrono::{DateTime, Utc};

use crate::client::backend::{BackendError, StonesBackend};
use crate::client::catalog::{EmptyCategory, StoneCatalog};
use crate::client::image::ImagePayload;
use crate::client::session::{AdminSession, SessionCheck, SessionStorage};
use crate::types::dto::stone::{JewelryTypeInput, Stone, StoneInput};
use crate::types::internal::Chakra;

pub const NOTICE_ADMIN_ONLY: &str = "Action reserved for administrators";
pub const NOTICE_SELECT_CHAKRA: &str = "Please select a chakra first";
pub const NOTICE_BUSY: &str = "Please wait for the current operation to finish";
pub const NOTICE_REQUIRED_FIELDS: &str = "Name and virtues are required";
pub const NOTICE_STONE_NOT_FOUND: &str = "Could not find this stone's data";
pub const NOTICE_LOAD_FAILED: &str = "Could not load the stones";
pub const NOTICE_ADD_FAILED: &str = "Could not add the stone";
pub const NOTICE_MODIFY_FAILED: &str = "Could not modify the stone";
pub const NOTICE_DELETE_FAILED: &str = "Could not delete the stone";
pub const NOTICE_SESSION_EXPIRED: &str = "Admin session expired, please log in again";

pub const LOGIN_EMPTY_PASSWORD: &str = "Please enter a password";
pub const LOGIN_INCORRECT_PASSWORD: &str = "Incorrect password";
pub const LOGIN_COMMUNICATION_ERROR: &str = "Communication error with server";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Info,
    Warning,
    Error,
}

/// A message for the user; errors are meant to block until dismissed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
}

impl Notice {
    fn new(kind: NoticeKind, message: &str) -> Self {
        Self {
            kind,
            message: message.to_string(),
        }
    }
}

/// One checked jewelry type in the form
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JewelrySelection {
    pub kind: String,
    /// Raw quantity input; anything missing or below 1 is sent as 1
    pub quantity: Option<i64>,
}

/// Add/edit form contents
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormState {
    /// Set while editing an existing stone
    pub editing_id: Option<String>,
    pub name: String,
    pub virtues: String,
    pub description: String,
    pub purification: String,
    pub recharge: String,
    pub image: Option<String>,
    pub jewelry: Vec<JewelrySelection>,
}

impl FormState {
    pub fn from_stone(stone: &Stone) -> Self {
        Self {
            editing_id: Some(stone.id.clone()),
            name: stone.name.clone(),
            virtues: stone.virtues.clone(),
            description: stone.description.clone().unwrap_or_default(),
            purification: stone.purification.clone().unwrap_or_default(),
            recharge: stone.recharge.clone().unwrap_or_default(),
            image: stone.image.clone(),
            jewelry: stone
                .jewelry_types
                .iter()
                .map(|item| JewelrySelection {
                    kind: item.kind.clone(),
                    quantity: Some(i64::from(item.quantity)),
                })
                .collect(),
        }
    }

    pub fn is_editing(&self) -> bool {
        self.editing_id.is_some()
    }

    /// Request body for the current form; blank optional fields become null
    pub fn to_input(&self, chakra: &str) -> StoneInput {
        StoneInput {
            id: self.editing_id.clone(),
            name: Some(self.name.trim().to_string()),
            virtues: Some(self.virtues.trim().to_string()),
            chakra_id: Some(chakra.to_string()),
            image: self.image.clone(),
            description: optional_text(&self.description),
            purification: optional_text(&self.purification),
            recharge: optional_text(&self.recharge),
            jewelry_types: Some(
                self.jewelry
                    .iter()
                    .map(|selection| JewelryTypeInput {
                        kind: selection.kind.clone(),
                        quantity: Some(selection.quantity.filter(|q| *q >= 1).unwrap_or(1)),
                    })
                    .collect(),
            ),
        }
    }
}

fn optional_text(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// A delete awaiting confirmation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingDelete {
    pub chakra: String,
    pub id: String,
}

/// Everything the UI renders from
#[derive(Debug)]
pub struct AppState<S: SessionStorage> {
    pub current_chakra: Option<String>,
    pub catalog: StoneCatalog,
    pub form: FormState,
    pub pending_delete: Option<PendingDelete>,
    pub session: AdminSession<S>,
    pub in_flight: bool,
    pub notices: Vec<Notice>,
    /// Message shown inside the login dialog
    pub login_error: Option<String>,
}

/// Marks a backend call as in flight until dropped, even when the call's
/// future is cancelled part way
struct InFlight<'a>(&'a mut bool);

impl<'a> InFlight<'a> {
    fn enter(flag: &'a mut bool) -> Self {
        *flag = true;
        Self(flag)
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        *self.0 = false;
    }
}

/// Drives the stones UI: user actions in, state transitions and API calls out
pub struct UiController<B: StonesBackend, S: SessionStorage> {
    backend: B,
    state: AppState<S>,
    empty_category: EmptyCategory,
}

impl<B: StonesBackend, S: SessionStorage> UiController<B, S> {
    /// Create a controller, restoring any admin session kept in `storage`
    pub fn new(backend: B, storage: S, now: DateTime<Utc>) -> Self {
        Self {
            backend,
            state: AppState {
                current_chakra: None,
                catalog: StoneCatalog::new(),
                form: FormState::default(),
                pending_delete: None,
                session: AdminSession::restore(storage, now),
                in_flight: false,
                notices: Vec::new(),
                login_error: None,
            },
            empty_category: EmptyCategory::default(),
        }
    }

    pub fn with_empty_category(mut self, empty_category: EmptyCategory) -> Self {
        self.empty_category = empty_category;
        self
    }

    pub fn state(&self) -> &AppState<S> {
        &self.state
    }

    /// Form fields for the host to edit in place
    pub fn form_mut(&mut self) -> &mut FormState {
        &mut self.state.form
    }

    /// Drain notices once the host has shown them
    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.state.notices)
    }

    pub fn is_admin(&self) -> bool {
        self.state.session.is_admin()
    }

    /// Fetch the full stone list; a failure leaves an empty catalog
    pub async fn load(&mut self) {
        match self.backend.list().await {
            Ok(catalog) => {
                tracing::debug!(count = catalog.len(), "Stone catalog loaded");
                self.state.catalog = catalog;
            }
            Err(e) => {
                tracing::error!("Failed to load stones: {}", e);
                self.state.catalog = StoneCatalog::new();
                self.notify(NoticeKind::Error, NOTICE_LOAD_FAILED);
            }
        }
    }

    /// Open a chakra's panel; bare names such as `crown` select `svg-crown`
    pub fn select_chakra(&mut self, chakra: &str) {
        let chakra = Chakra::parse(chakra).map(|c| c.as_str()).unwrap_or(chakra);
        if self.state.current_chakra.as_deref() == Some(chakra) {
            return;
        }
        if self.state.form.is_editing() {
            self.state.form = FormState::default();
        }
        self.state.pending_delete = None;
        self.state.current_chakra = Some(chakra.to_string());
    }

    pub fn close_panel(&mut self) {
        self.state.current_chakra = None;
        self.state.pending_delete = None;
        if self.state.form.is_editing() {
            self.state.form = FormState::default();
        }
    }

    /// Fill the form from a stone of the current chakra
    pub fn begin_edit(&mut self, id: &str, now: DateTime<Utc>) -> bool {
        let Some(chakra) = self.writable_chakra() else {
            return false;
        };

        let Some(stone) = self.state.catalog.find(&chakra, id) else {
            tracing::warn!(stone_id = %id, "Stone to edit is missing from the catalog");
            self.notify(NoticeKind::Error, NOTICE_STONE_NOT_FOUND);
            return false;
        };

        self.state.form = FormState::from_stone(stone);
        self.state.session.touch(now);
        true
    }

    pub fn reset_form(&mut self) {
        self.state.form = FormState::default();
    }

    pub fn attach_image(&mut self, image: ImagePayload) {
        self.state.form.image = Some(image.data_uri);
    }

    pub fn clear_image(&mut self) {
        self.state.form.image = None;
    }

    /// Save the form as a new stone, or as an update while editing
    pub async fn submit_form(&mut self, now: DateTime<Utc>) -> bool {
        if self.revalidate_session(now) {
            return false;
        }
        let Some(chakra) = self.writable_chakra() else {
            return false;
        };
        if self.refuse_if_busy() {
            return false;
        }

        let form = &self.state.form;
        if form.name.trim().is_empty() || form.virtues.trim().is_empty() {
            self.notify(NoticeKind::Warning, NOTICE_REQUIRED_FIELDS);
            return false;
        }

        let input = form.to_input(&chakra);
        let editing_id = form.editing_id.clone();
        let token = self.state.session.token().map(str::to_string);

        let busy = InFlight::enter(&mut self.state.in_flight);
        let result = match &editing_id {
            Some(id) => self.backend.update(id, &input, token.as_deref()).await,
            None => self.backend.create(&input, token.as_deref()).await,
        };
        drop(busy);

        match result {
            Ok(saved) => {
                let key = match saved.chakra_id.as_deref() {
                    Some(stored) => Chakra::group_key(Some(stored)),
                    None => chakra,
                };
                let (catalog, outcome) = self.state.catalog.upsert(&key, saved);
                tracing::debug!(?outcome, chakra = %key, "Saved stone merged into catalog");
                self.state.catalog = catalog;
                self.state.form = FormState::default();
                self.renew_session(now).await;
                true
            }
            Err(e) => {
                tracing::error!("Failed to save stone: {}", e);
                let notice = if editing_id.is_some() {
                    NOTICE_MODIFY_FAILED
                } else {
                    NOTICE_ADD_FAILED
                };
                self.handle_write_failure(&e, notice);
                false
            }
        }
    }

    /// Ask for confirmation before deleting a stone of the current chakra
    pub fn request_delete(&mut self, id: &str) -> bool {
        let Some(chakra) = self.writable_chakra() else {
            return false;
        };
        self.state.pending_delete = Some(PendingDelete {
            chakra,
            id: id.to_string(),
        });
        true
    }

    pub fn cancel_delete(&mut self) {
        self.state.pending_delete = None;
    }

    /// Delete the stone awaiting confirmation
    ///
    /// A stone the server no longer has counts as deleted.
    pub async fn confirm_delete(&mut self, now: DateTime<Utc>) -> bool {
        if self.revalidate_session(now) {
            return false;
        }
        if !self.state.session.is_admin() {
            self.state.pending_delete = None;
            self.notify(NoticeKind::Error, NOTICE_ADMIN_ONLY);
            return false;
        }
        if self.refuse_if_busy() {
            return false;
        }
        let Some(pending) = self.state.pending_delete.take() else {
            return false;
        };

        let token = self.state.session.token().map(str::to_string);

        let busy = InFlight::enter(&mut self.state.in_flight);
        let result = self.backend.delete(&pending.id, token.as_deref()).await;
        drop(busy);

        match result {
            Ok(()) => {}
            Err(e) if e.is_not_found() => {
                tracing::debug!(stone_id = %pending.id, "Stone already gone on the server");
            }
            Err(e) => {
                tracing::error!("Failed to delete stone: {}", e);
                self.handle_write_failure(&e, NOTICE_DELETE_FAILED);
                return false;
            }
        }

        self.state.catalog = self
            .state
            .catalog
            .remove(&pending.chakra, &pending.id, self.empty_category);
        if self.state.form.editing_id.as_deref() == Some(pending.id.as_str()) {
            self.state.form = FormState::default();
        }
        self.renew_session(now).await;
        true
    }

    /// Check the admin password and enter admin mode on success
    pub async fn login(&mut self, password: &str, now: DateTime<Utc>) -> bool {
        if password.is_empty() {
            self.state.login_error = Some(LOGIN_EMPTY_PASSWORD.to_string());
            return false;
        }
        if self.refuse_if_busy() {
            return false;
        }

        self.state.login_error = None;
        let busy = InFlight::enter(&mut self.state.in_flight);
        let result = self.backend.login(password).await;
        drop(busy);

        match result {
            Ok(grant) => {
                tracing::info!("Admin mode enabled");
                self.state.session.start(grant.token, grant.expires_in, now);
                true
            }
            Err(BackendError::Status { status }) => {
                tracing::warn!(status, "Admin login refused");
                self.state.login_error = Some(LOGIN_INCORRECT_PASSWORD.to_string());
                false
            }
            Err(e) => {
                tracing::error!("Admin login failed: {}", e);
                self.state.login_error = Some(LOGIN_COMMUNICATION_ERROR.to_string());
                false
            }
        }
    }

    pub fn logout(&mut self) {
        self.state.session.end();
        self.leave_admin_mode();
        tracing::info!("Admin mode disabled");
    }

    /// Periodic session check
    pub fn tick(&mut self, now: DateTime<Utc>) {
        self.revalidate_session(now);
    }

    /// Session check when the window regains focus
    pub fn on_focus(&mut self, now: DateTime<Utc>) {
        self.revalidate_session(now);
    }

    /// Returns true when the session has just expired
    fn revalidate_session(&mut self, now: DateTime<Utc>) -> bool {
        if self.state.session.revalidate(now) == SessionCheck::Expired {
            self.leave_admin_mode();
            self.notify(NoticeKind::Info, NOTICE_SESSION_EXPIRED);
            return true;
        }
        false
    }

    /// Count a successful write as activity and renew the admin token
    ///
    /// A failed renewal keeps the current token; the session then ends at
    /// that token's expiry.
    async fn renew_session(&mut self, now: DateTime<Utc>) {
        let Some(token) = self.state.session.token().map(str::to_string) else {
            self.state.session.touch(now);
            return;
        };

        match self.backend.refresh(&token).await {
            Ok(grant) => {
                tracing::debug!("Admin token renewed");
                self.state.session.renew_token(grant.token, grant.expires_in, now);
            }
            Err(e) => {
                tracing::warn!("Failed to renew admin token: {}", e);
                self.state.session.touch(now);
            }
        }
    }

    fn leave_admin_mode(&mut self) {
        self.state.pending_delete = None;
        if self.state.form.is_editing() {
            self.state.form = FormState::default();
        }
    }

    /// Current chakra if writes are allowed; otherwise pushes the refusal
    fn writable_chakra(&mut self) -> Option<String> {
        if !self.state.session.is_admin() {
            self.notify(NoticeKind::Error, NOTICE_ADMIN_ONLY);
            return None;
        }
        let chakra = self.state.current_chakra.clone();
        if chakra.is_none() {
            self.notify(NoticeKind::Warning, NOTICE_SELECT_CHAKRA);
        }
        chakra
    }

    fn refuse_if_busy(&mut self) -> bool {
        if self.state.in_flight {
            self.notify(NoticeKind::Warning, NOTICE_BUSY);
        }
        self.state.in_flight
    }

    fn handle_write_failure(&mut self, error: &BackendError, notice: &str) {
        if error.status() == Some(401) {
            self.state.session.end();
            self.leave_admin_mode();
            self.notify(NoticeKind::Error, NOTICE_SESSION_EXPIRED);
        } else {
            self.notify(NoticeKind::Error, notice);
        }
    }

    fn notify(&mut self, kind: NoticeKind, message: &str) {
        self.state.notices.push(Notice::new(kind, message));
    }
}
