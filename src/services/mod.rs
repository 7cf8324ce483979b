// Services layer - admin gate and token handling
pub mod admin_gate;
pub mod crypto;
pub mod token_service;

pub use admin_gate::AdminGate;
pub use token_service::{TokenService, ADMIN_TOKEN_TTL_MINUTES};
