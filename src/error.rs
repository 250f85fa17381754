//! Error types for the deckforge crate.

use std::path::PathBuf;

/// Deckforge-specific error types.
///
/// The matching and statistics engines themselves are total; these errors
/// only come out of the boundary adapters and configuration loading.
#[derive(Debug, thiserror::Error)]
pub enum DeckforgeError {
    /// A deck entry carried a zero or negative copy count.
    #[error("invalid quantity {quantity} for {name}: must be at least 1")]
    InvalidQuantity { name: String, quantity: i64 },

    /// A card record arrived without a usable name.
    #[error("card record has an empty name")]
    EmptyCardName,

    /// Configuration file could not be read.
    #[error("failed to read config {path}: {source}")]
    Config {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience result type for deckforge operations.
pub type DeckforgeResult<T> = Result<T, DeckforgeError>;
