//! Fast partial refresh for the UC8179 panels
//!
//! The UC8179 can refresh with a faster waveform when the temperature it looks the waveform up
//! with is fixed instead of measured:
//! - Updates faster (~1-2 seconds vs 4-6 seconds)
//! - Less flashing during update
//! - Good for frequent content updates
//!
//! Trade-off: ghosting accumulates over many updates, so a full refresh is needed every now and
//! then (e.g. after deep sleep). [`EPaper::refresh`] does that bookkeeping.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{InputPin, OutputPin};
use embedded_hal::spi::SpiDevice;

use crate::epaper::EPaper;
use crate::error::RefreshError;

/// Which kind of refresh [`EPaper::refresh`] ran
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshKind {
    Full,
    Partial,
}

/// Perform a partial (fast) refresh of `display` with its current framebuffer.
///
/// Call this instead of [`EPaper::update`] for faster, less flashy updates.
pub fn update_partial<SPI, BSY, DC, RST, DELAY>(
    display: &mut EPaper<SPI, BSY, DC, RST, DELAY>,
) -> Result<(), RefreshError>
where
    SPI: SpiDevice,
    BSY: InputPin,
    DC: OutputPin,
    RST: OutputPin,
    DELAY: DelayNs,
{
    display.update_partial()
}

impl<SPI, BSY, DC, RST, DELAY> EPaper<SPI, BSY, DC, RST, DELAY>
where
    SPI: SpiDevice,
    BSY: InputPin,
    DC: OutputPin,
    RST: OutputPin,
    DELAY: DelayNs,
{
    /// Partial refresh with the framebuffer content.
    ///
    /// Returns [`RefreshError::NotReady`] without touching the bus before [`EPaper::begin`].
    pub fn update_partial(&mut self) -> Result<(), RefreshError> {
        let Some(framebuffer) = self.framebuffer.as_ref() else {
            log::warn!("Partial refresh skipped, display not ready");
            return Err(RefreshError::NotReady);
        };
        self.driver.update_partial(framebuffer.buffer())?;
        self.partial_count = self.partial_count.saturating_add(1);
        Ok(())
    }

    /// Whether the next [`EPaper::refresh`] will be a full one
    pub fn needs_full_refresh(&self) -> bool {
        let interval = self.config().full_refresh_interval;
        self.needs_full || interval == 0 || self.partial_count >= interval
    }

    /// Refresh with the framebuffer content, partial unless ghosting needs clearing
    pub fn refresh(&mut self) -> Result<RefreshKind, RefreshError> {
        if self.needs_full_refresh() {
            log::info!(
                "Full refresh after {} partial refreshes",
                self.partial_count
            );
            self.update()?;
            Ok(RefreshKind::Full)
        } else {
            self.update_partial()?;
            Ok(RefreshKind::Partial)
        }
    }
}
