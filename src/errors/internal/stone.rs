use thiserror::Error;

/// Stone repository specific errors
#[derive(Error, Debug)]
pub enum StoneError {
    /// The id is not a well-formed stone identifier
    #[error("Invalid stone ID format: {0}")]
    InvalidId(String),

    /// Well-formed id with no matching record
    #[error("Stone not found: {0}")]
    NotFound(String),

    /// One or more required fields are missing or blank
    #[error("Missing required fields ({})", .0.join(", "))]
    MissingFields(Vec<&'static str>),

    /// Category tag outside the fixed chakra set
    #[error("Unknown chakra: {0}")]
    UnknownChakra(String),
}
