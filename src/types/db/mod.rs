// Database entities - SeaORM models
pub mod stone;
