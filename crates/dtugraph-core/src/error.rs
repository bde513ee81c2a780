//! Error types for dtugraph
//!
//! View computations are total and never return these. Errors only arise at
//! the boundaries: graph data entering the core and tier or layout names
//! parsed from user input. Configuration files report through `anyhow`.

use thiserror::Error;

/// Result type alias using dtugraph's Error
pub type Result<T> = std::result::Result<T, Error>;

/// Dtugraph error types with helpful messages and suggestions
#[derive(Error, Debug)]
pub enum Error {
    // Graph data errors (E001-E099)
    #[error("Graph data could not be parsed: {0}. Expected a JSON object with `nodes` and `edges` arrays.")]
    InvalidGraphData(#[from] serde_json::Error),

    // View errors (E100-E199)
    #[error("Unknown tier '{0}'. Valid tiers: regular, mega, hyper, shadow.")]
    UnknownTier(String),

    #[error("Unknown layout '{0}'. Valid layouts: force, circle, grid, hierarchy, concentric.")]
    UnknownLayout(String),
}

impl Error {
    /// Get error code for this error type
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidGraphData(_) => "E001",
            Self::UnknownTier(_) => "E100",
            Self::UnknownLayout(_) => "E101",
        }
    }

    /// Get suggestion for how to fix this error
    pub fn suggestion(&self) -> Option<String> {
        match self {
            Self::InvalidGraphData(_) => {
                Some("dtugraph stats <file> validates a graph file".to_string())
            }
            Self::UnknownTier(_) => Some("use one of: regular, mega, hyper, shadow".to_string()),
            Self::UnknownLayout(_) => {
                Some("use one of: force, circle, grid, hierarchy, concentric".to_string())
            }
        }
    }
}
