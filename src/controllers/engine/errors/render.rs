use thiserror::Error;

use crate::controllers::engine::ports::execution_fabric::FabricError;
use crate::core::actions::cancellation::Cancelled;

/// Errors that end a render cycle. Per-column failures are not errors at this
/// level; they travel in the completion report.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RenderError {
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),
    #[error("render {generation} could not be submitted: {source}")]
    JobSubmission {
        generation: u64,
        #[source]
        source: FabricError,
    },
    #[error("render {generation} results could not be collected: {source}")]
    ResultCollection {
        generation: u64,
        #[source]
        source: FabricError,
    },
}

impl RenderError {
    #[must_use]
    pub fn generation(&self) -> Option<u64> {
        match self {
            Self::InvalidParameter(_) => None,
            Self::JobSubmission { generation, .. } | Self::ResultCollection { generation, .. } => {
                Some(*generation)
            }
        }
    }
}

/// Why `await_completion` returned without results.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AwaitError {
    #[error(transparent)]
    Cancelled(#[from] Cancelled),
    #[error(transparent)]
    Fabric(#[from] FabricError),
}
