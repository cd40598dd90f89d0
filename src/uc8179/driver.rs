//! UC8179 Display Driver Implementation
//!
//! This module contains the driver for the UC8179 e-paper controller. It provides
//! initialization, full and partial refresh, and power management.
//!
//! ## Refresh modes
//!
//! ### Full refresh
//! `update_full()` writes the frame to both the old (0x10) and new (0x13) image RAM and
//! refreshes with the OTP waveform. It takes 4-6 seconds, flashes the panel, and clears ghosting.
//!
//! ### Partial refresh
//! `update_partial()` switches the controller to the fast waveform by fixing the temperature
//! (Cascade Setting 0x02 + Force Temperature 0x5A), then writes only the new image RAM.
//! It takes 1-2 seconds with little flashing, but ghosting builds up, so a full refresh is needed
//! every now and then.
//!
//! ### Polarity Inversion
//!
//! Frames use 1 for black, with the data polarity written to register 0x50 the controller
//! takes 1 for white. Every byte is inverted while streaming, the caller's frame is not touched.
//!
//! ### BUSY Pin Wait
//!
//! After `DISPLAY_REFRESH` the BUSY pin stays LOW until the panel is done. The wait is bounded
//! by [`RefreshConfig::busy_timeout_ms`].

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{InputPin, OutputPin};
use embedded_hal::spi::SpiDevice;

use crate::config::RefreshConfig;
use crate::error::RefreshError;
use crate::uc8179::interface::{DisplayInterface, WriteSession};
use crate::uc8179::{buffer_size, cmd::Cmd, flag::Flag, HEIGHT, WIDTH};

/// Delay after Power On before the busy line is meaningful
const POWER_ON_DELAY_MS: u32 = 100;

/// UC8179 E-Paper Display Driver
///
/// ## Type Parameters
///
/// - `SPI` - SPI device for communication
/// - `BSY` - BUSY input pin (LOW when display is busy)
/// - `DC` - Data/Command output pin
/// - `RST` - Reset output pin
/// - `DELAY` - Delay provider for timing
pub struct Uc8179<SPI, BSY, DC, RST, DELAY> {
    /// The display interface
    pub interface: DisplayInterface<SPI, BSY, DC, RST, DELAY>,
    pub config: RefreshConfig,
    width: u16,
    height: u16,
}

impl<SPI, BSY, DC, RST, DELAY> Uc8179<SPI, BSY, DC, RST, DELAY> {
    /// Create the driver for the 800x480 panel, nothing is sent until [`Self::init`]
    pub fn new(spi: SPI, busy: BSY, dc: DC, rst: RST, delay: DELAY, config: RefreshConfig) -> Self {
        Uc8179 {
            interface: DisplayInterface::new(spi, busy, dc, rst, delay),
            config,
            width: WIDTH,
            height: HEIGHT,
        }
    }

    /// Override the panel resolution written during init
    pub fn with_resolution(mut self, width: u16, height: u16) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    pub fn height(&self) -> u16 {
        self.height
    }

    /// Bytes in one packed frame
    pub fn frame_size(&self) -> usize {
        buffer_size(self.width, self.height)
    }

    fn check_frame(&self, frame: &[u8]) -> Result<(), RefreshError> {
        let expected = self.frame_size();
        if frame.len() != expected {
            log::error!(
                "Frame holds {} bytes, expected {} for {}x{}",
                frame.len(),
                expected,
                self.width,
                self.height
            );
            return Err(RefreshError::BufferSize {
                expected,
                actual: frame.len(),
            });
        }
        Ok(())
    }
}

impl<SPI, BSY, DC, RST, DELAY> Uc8179<SPI, BSY, DC, RST, DELAY>
where
    SPI: SpiDevice,
    BSY: InputPin,
    DC: OutputPin,
    RST: OutputPin,
    DELAY: DelayNs,
{
    /// Reset the controller and load the full refresh configuration
    pub fn init(&mut self) -> Result<(), RefreshError> {
        log::info!("Initializing UC8179 for {}x{}", self.width, self.height);
        let config = self.config;
        let [width_hi, width_lo] = self.width.to_be_bytes();
        let [height_hi, height_lo] = self.height.to_be_bytes();

        self.interface.reset()?;

        let mut session = self.interface.start_write();
        session.cmd_with_data(
            Cmd::POWER_SETTING,
            &[
                Flag::POWER_BORDER_LDO_INTERNAL,
                Flag::POWER_VGH_VGL_20V,
                Flag::POWER_VDH_15V,
                Flag::POWER_VDL_15V,
            ],
        )?;
        session.cmd(Cmd::POWER_ON)?;
        session.delay_ms(POWER_ON_DELAY_MS);
        session.wait_until_idle(&config)?;

        session.cmd_with_data(Cmd::PANEL_SETTING, &[Flag::PANEL_KW_OTP_LUT])?;
        session.cmd_with_data(
            Cmd::RESOLUTION_SETTING,
            &[width_hi, width_lo, height_hi, height_lo],
        )?;
        session.cmd_with_data(Cmd::DUAL_SPI, &[Flag::DUAL_SPI_DISABLED])?;
        session.cmd_with_data(
            Cmd::VCOM_DATA_INTERVAL,
            &[Flag::BORDER_FOLLOW_LUT, Flag::DATA_INTERVAL_10_HSYNC],
        )?;
        session.cmd_with_data(Cmd::TCON_SETTING, &[Flag::TCON_S2G_G2S_12])?;

        log::info!("UC8179 initialized");
        Ok(())
    }

    /// Write `frame` to both image RAMs and run a full refresh
    pub fn update_full(&mut self, frame: &[u8]) -> Result<(), RefreshError> {
        self.check_frame(frame)?;
        log::info!("Full refresh of {} bytes", frame.len());
        let config = self.config;

        let mut session = self.interface.start_write();
        session.cmd_with_data(Cmd::PANEL_SETTING, &[Flag::PANEL_KW_OTP_LUT])?;
        // Back to the measured temperature, a partial refresh leaves the fast waveform forced
        session.cmd_with_data(Cmd::CASCADE_SETTING, &[Flag::CASCADE_TEMPERATURE_SENSOR])?;
        session.cmd(Cmd::DATA_START_TRANSMISSION_OLD)?;
        session.data_inverted(frame)?;
        session.cmd(Cmd::DATA_START_TRANSMISSION_NEW)?;
        session.data_inverted(frame)?;
        Self::refresh_and_wait(&mut session, &config)
    }

    /// Switch the controller to the fast waveform, write `frame` as the new image and refresh
    ///
    /// Nothing is sent when `frame` is not exactly one frame long.
    pub fn update_partial(&mut self, frame: &[u8]) -> Result<(), RefreshError> {
        self.check_frame(frame)?;
        log::info!("Partial refresh of {} bytes", frame.len());
        let config = self.config;

        let mut session = self.interface.start_write();

        // Internal temperature sensor, OTP LUT
        session.cmd_with_data(Cmd::PANEL_SETTING, &[Flag::PANEL_KW_OTP_LUT])?;
        // Border follows LUT, data polarity
        session.cmd_with_data(
            Cmd::VCOM_DATA_INTERVAL,
            &[Flag::BORDER_FOLLOW_LUT, Flag::DATA_INTERVAL_10_HSYNC],
        )?;
        // Temperature from the register below, which selects the fast waveform
        session.cmd_with_data(Cmd::CASCADE_SETTING, &[Flag::CASCADE_TEMPERATURE_FIXED])?;
        session.cmd_with_data(Cmd::FORCE_TEMPERATURE, &[Flag::FORCE_TEMPERATURE_PARTIAL])?;

        session.cmd(Cmd::DATA_START_TRANSMISSION_NEW)?;
        session.data_inverted(frame)?;

        Self::refresh_and_wait(&mut session, &config)
    }

    /// Trigger Display Refresh and wait for the busy line to clear
    fn refresh_and_wait(
        session: &mut WriteSession<'_, SPI, BSY, DC, RST, DELAY>,
        config: &RefreshConfig,
    ) -> Result<(), RefreshError> {
        session.cmd(Cmd::DISPLAY_REFRESH)?;
        session.delay_ms(config.settle_delay_ms);
        session.wait_until_idle(config)?;
        log::info!("Display refresh completed");
        Ok(())
    }

    /// Power off and enter deep sleep, only a hardware reset wakes the controller
    pub fn sleep(&mut self) -> Result<(), RefreshError> {
        log::info!("Putting display to deep sleep");
        let config = self.config;

        let mut session = self.interface.start_write();
        session.cmd(Cmd::POWER_OFF)?;
        session.wait_until_idle(&config)?;
        session.cmd_with_data(Cmd::DEEP_SLEEP, &[Flag::DEEP_SLEEP_CHECK_CODE])?;
        Ok(())
    }

    /// Wake from deep sleep, the configuration is lost so init runs again
    pub fn wake_up(&mut self) -> Result<(), RefreshError> {
        log::info!("Waking up the display");
        self.init()
    }
}
