// API data transfer objects
pub mod common;
pub mod login;
pub mod stone;
