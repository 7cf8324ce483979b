// Client layer - catalog state, admin session and UI controller
pub mod backend;
pub mod catalog;
pub mod controller;
pub mod image;
pub mod session;

pub use backend::{BackendError, HttpStonesBackend, LoginGrant, StonesBackend};
pub use catalog::{EmptyCategory, Reconciled, StoneCatalog, StoneSort};
pub use controller::{AppState, FormState, JewelrySelection, Notice, NoticeKind, PendingDelete, UiController};
pub use image::{fit_within, prepare_image, to_data_uri, ImageError, ImagePayload};
pub use session::{AdminSession, MemorySessionStorage, SessionCheck, SessionStorage};
