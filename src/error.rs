//! Failure kinds reported by the refresh routines

use display_interface::DisplayError;
use thiserror::Error;

use crate::board::Panel;

/// Why a refresh did not happen, or did not complete
#[derive(Debug, Error)]
pub enum RefreshError {
    /// The display has no framebuffer yet, `EPaper::begin` has not run
    #[error("display not ready, no framebuffer")]
    NotReady,
    /// The framebuffer does not hold exactly one packed frame for the panel
    #[error("framebuffer holds {actual} bytes, panel needs {expected}")]
    BufferSize { expected: usize, actual: usize },
    /// The panel did not become ready within the configured timeout
    #[error("panel did not become ready")]
    BusyTimeout,
    /// The busy line could not be read
    #[error("could not read busy pin")]
    BusyPin,
    /// The board carries a panel this driver does not speak to
    #[error("{0} is not supported")]
    Unsupported(Panel),
    /// SPI or data/command pin failure
    // DisplayError has no std::error::Error impl, so it cannot be a #[from] source
    #[error("display interface error: {0:?}")]
    Interface(DisplayError),
}

impl From<DisplayError> for RefreshError {
    fn from(error: DisplayError) -> Self {
        RefreshError::Interface(error)
    }
}
