use serde::{Deserialize, Serialize};

/// Result of the plot-oriented provider (OMDb).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PrimaryMetadata {
    pub title: String,
    pub year: String,
    /// `None` when the provider omitted the field
    pub plot: Option<String>,
}

/// First candidate returned by the canonical-title provider (TMDB).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SecondaryMetadata {
    pub title: String,
    pub original_title: String,
    pub overview: Option<String>,
}
