// Test utilities shared across unit tests
// Only compiled when running tests

use migration::{Migrator, MigratorTrait};
use sea_orm::{Database, DatabaseConnection};

use crate::types::internal::{Chakra, StoneFields};

/// Creates an in-memory SQLite database with the stones schema applied
pub async fn setup_test_db() -> DatabaseConnection {
    let db = Database::connect("sqlite::memory:")
        .await
        .expect("Failed to create test database");

    Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations");

    db
}

/// Minimal valid field set for a stone
pub fn sample_fields(name: &str, chakra: Chakra) -> StoneFields {
    StoneFields {
        name: name.to_string(),
        virtues: "calm".to_string(),
        chakra,
        image: None,
        description: None,
        purification: None,
        recharge: None,
        jewelry_types: vec![],
    }
}
