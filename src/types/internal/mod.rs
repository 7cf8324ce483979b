// Internal types - never exposed over the API directly
pub mod auth;
pub mod chakra;
pub mod context;
pub mod stone;

pub use auth::{AdminClaims, IssuedToken};
pub use chakra::{Chakra, UNKNOWN_CHAKRA};
pub use context::RequestContext;
pub use stone::{JewelryItem, StoneFields, StoneRecord};
