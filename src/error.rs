use thiserror::Error;

/// The error taxonomy of §7. `Cancelled` is deliberately absent: per §7, caller
/// cancellation between layers is not an error and is represented instead by
/// a `cancelled` flag on an otherwise-`Ok` partial [`crate::manifest::Manifest`].
#[derive(Debug, Error)]
pub enum PackError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("catalogue cannot tile layer {z} at ({x}, {y}): no part fits and no 1x1 unit is available")]
    CatalogueFailure { x: i32, y: i32, z: i32 },

    #[error("availability oracle failed for every query in this run: {0}")]
    OracleFailure(String),

    #[error("palette failure: colour table is empty")]
    PaletteFailure,
}

impl PackError {
    /// The CLI exit code this taxon maps to (§6).
    pub fn exit_code(&self) -> i32 {
        match self {
            PackError::InvalidInput(_) => 2,
            PackError::CatalogueFailure { .. } => 3,
            PackError::OracleFailure(_) => 4,
            PackError::PaletteFailure => 2,
        }
    }
}

impl From<serde_json::Error> for PackError {
    fn from(err: serde_json::Error) -> Self {
        PackError::InvalidInput(err.to_string())
    }
}
