//! Display interface using SPI
use core::ops::{Deref, DerefMut};

use display_interface::DisplayError;
use embedded_hal::{
    delay::DelayNs,
    digital::{InputPin, OutputPin},
    spi::SpiDevice,
};

use crate::config::RefreshConfig;
use crate::error::RefreshError;

const RESET_DELAY_MS: u32 = 20;

/// Bytes inverted and written per SPI transfer while streaming a frame
pub const STREAM_CHUNK_SIZE: usize = 64;

/// The connection interface of the UC8179 panels
pub struct DisplayInterface<SPI, BSY, DC, RST, DELAY> {
    /// SPI device
    spi: SPI,
    /// Low while the controller is busy, high once it is ready
    busy: BSY,
    /// Data/Command Control Pin (High for data, Low for command)
    dc: DC,
    /// Pin for Reseting
    rst: RST,
    /// Delay provider for timing
    pub(crate) delay: DELAY,
}

impl<SPI, BSY, DC, RST, DELAY> DisplayInterface<SPI, BSY, DC, RST, DELAY> {
    /// Create the interface, nothing is sent to the display
    pub fn new(spi: SPI, busy: BSY, dc: DC, rst: RST, delay: DELAY) -> Self {
        DisplayInterface {
            spi,
            busy,
            dc,
            rst,
            delay,
        }
    }

    /// Open a write session. The session holds the interface exclusively until it is dropped.
    pub fn start_write(&mut self) -> WriteSession<'_, SPI, BSY, DC, RST, DELAY> {
        log::trace!("Write session opened");
        WriteSession { interface: self }
    }
}

impl<SPI, BSY, DC, RST, DELAY> DisplayInterface<SPI, BSY, DC, RST, DELAY>
where
    SPI: SpiDevice,
    BSY: InputPin,
    DC: OutputPin,
    RST: OutputPin,
    DELAY: DelayNs,
{
    /// Basic function for sending commands
    pub fn cmd(&mut self, command: u8) -> Result<(), DisplayError> {
        log::trace!("Command 0x{:02X}", command);
        // low for commands
        self.dc.set_low().map_err(|_| DisplayError::DCError)?;

        match self.spi.write(&[command]) {
            Ok(_) => Ok(()),
            Err(e) => {
                log::error!("SPI write error for command 0x{:02X}: {:?}", command, e);
                Err(DisplayError::BusWriteError)
            }
        }
    }

    /// Basic function for sending an array of u8-values of data over spi
    pub fn data(&mut self, data: &[u8]) -> Result<(), DisplayError> {
        // high for data
        self.dc.set_high().map_err(|_| DisplayError::DCError)?;
        self.spi
            .write(data)
            .map_err(|_| DisplayError::BusWriteError)
    }

    /// Basic function for sending a command and the data belonging to it.
    pub fn cmd_with_data(&mut self, command: u8, data: &[u8]) -> Result<(), DisplayError> {
        self.cmd(command)?;
        self.data(data)
    }

    /// Send every byte of `data` with its bits inverted, `data` itself is left untouched
    pub fn data_inverted(&mut self, data: &[u8]) -> Result<(), DisplayError> {
        self.dc.set_high().map_err(|_| DisplayError::DCError)?;

        let total_chunks = data.len().div_ceil(STREAM_CHUNK_SIZE);
        // Log ~10 times during a frame
        let log_interval = (total_chunks / 10).max(1);
        let mut buffer = [0u8; STREAM_CHUNK_SIZE];

        for (i, chunk) in data.chunks(STREAM_CHUNK_SIZE).enumerate() {
            if i % log_interval == 0 && total_chunks > 10 {
                log::debug!(
                    "Progress: {}/{} chunks ({:.1}%)",
                    i,
                    total_chunks,
                    100.0 * i as f32 / total_chunks as f32
                );
            }

            let out = &mut buffer[..chunk.len()];
            for (dst, src) in out.iter_mut().zip(chunk) {
                *dst = !*src;
            }
            self.spi
                .write(out)
                .map_err(|_| DisplayError::BusWriteError)?;
        }

        log::debug!("Completed sending {} inverted bytes", data.len());
        Ok(())
    }

    /// Poll the busy line until the controller is idle (line high), bounded by
    /// `config.busy_timeout_ms`
    pub fn wait_until_idle(&mut self, config: &RefreshConfig) -> Result<(), RefreshError> {
        let max_polls = config.max_polls();

        for _ in 0..max_polls {
            if self.busy.is_high().map_err(|_| RefreshError::BusyPin)? {
                return Ok(());
            }
            self.delay.delay_ms(config.poll_interval_ms);
        }

        log::error!(
            "Busy line still low after {} ms ({} polls)",
            config.busy_timeout_ms,
            max_polls
        );
        Err(RefreshError::BusyTimeout)
    }

    /// Hardware reset: high, low pulse, high
    pub fn reset(&mut self) -> Result<(), DisplayError> {
        self.rst.set_high().map_err(|_| DisplayError::RSError)?;
        self.delay.delay_ms(RESET_DELAY_MS);
        self.rst.set_low().map_err(|_| DisplayError::RSError)?;
        self.delay.delay_ms(2);
        self.rst.set_high().map_err(|_| DisplayError::RSError)?;
        self.delay.delay_ms(RESET_DELAY_MS);
        Ok(())
    }

    pub fn delay_ms(&mut self, ms: u32) {
        self.delay.delay_ms(ms);
    }
}

/// Exclusive access to the display interface for one update.
///
/// The session is a `&mut` borrow of the interface, so nothing else in this program can drive the
/// display while it is open. It does not hold the SPI bus: chip select still rises and falls
/// around every `SpiDevice` write, and other devices on a shared bus may transfer in between.
/// Dropping the session ends it, on success and error paths alike.
pub struct WriteSession<'a, SPI, BSY, DC, RST, DELAY> {
    interface: &'a mut DisplayInterface<SPI, BSY, DC, RST, DELAY>,
}

impl<SPI, BSY, DC, RST, DELAY> Deref for WriteSession<'_, SPI, BSY, DC, RST, DELAY> {
    type Target = DisplayInterface<SPI, BSY, DC, RST, DELAY>;

    fn deref(&self) -> &Self::Target {
        self.interface
    }
}

impl<SPI, BSY, DC, RST, DELAY> DerefMut for WriteSession<'_, SPI, BSY, DC, RST, DELAY> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.interface
    }
}

impl<SPI, BSY, DC, RST, DELAY> Drop for WriteSession<'_, SPI, BSY, DC, RST, DELAY> {
    fn drop(&mut self) {
        log::trace!("Write session closed");
    }
}
