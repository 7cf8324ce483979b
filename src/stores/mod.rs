// Stores layer - stone persistence backends
pub mod memory_stone_store;
pub mod stone_repository;
pub mod stone_store;

pub use memory_stone_store::MemoryStoneStore;
pub use stone_repository::StoneRepository;
pub use stone_store::StoneStore;
