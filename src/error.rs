//! @ai:module:intent Unified error type for harness runs
//! @ai:module:layer domain
//! @ai:module:public_api HarnessError
//! @ai:module:stateless true

use crate::build::BuildFailure;
use crate::workspace::SetupError;
use thiserror::Error;

/// @ai:intent Everything that can end a harness run early
#[derive(Debug, Error)]
pub enum HarnessError {
    #[error(transparent)]
    Setup(#[from] SetupError),

    #[error(transparent)]
    Build(#[from] BuildFailure),

    #[error("interrupted")]
    Interrupted,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
