//! The display handle: controller driver plus the framebuffer drawn into

use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{InputPin, OutputPin};
use embedded_hal::spi::SpiDevice;

use crate::board::{Board, Panel};
use crate::config::RefreshConfig;
use crate::error::RefreshError;
use crate::framebuffer::Framebuffer;
use crate::uc8179::driver::Uc8179;
use crate::uc8179::interface::WriteSession;

/// E-paper display on one of the supported boards
///
/// Created without a framebuffer. [`EPaper::begin`] initializes the controller and allocates
/// the framebuffer; until then every refresh returns [`RefreshError::NotReady`] and drawing
/// is a no-op.
pub struct EPaper<SPI, BSY, DC, RST, DELAY> {
    board: Board,
    pub(crate) driver: Uc8179<SPI, BSY, DC, RST, DELAY>,
    pub(crate) framebuffer: Option<Framebuffer>,
    /// Partial refreshes since the last full one
    pub(crate) partial_count: u16,
    /// Set after begin and wake, the panel content is unknown
    pub(crate) needs_full: bool,
}

impl<SPI, BSY, DC, RST, DELAY> EPaper<SPI, BSY, DC, RST, DELAY> {
    pub fn new(
        board: Board,
        spi: SPI,
        busy: BSY,
        dc: DC,
        rst: RST,
        delay: DELAY,
        config: RefreshConfig,
    ) -> Self {
        let panel = board.panel();
        EPaper {
            board,
            driver: Uc8179::new(spi, busy, dc, rst, delay, config)
                .with_resolution(panel.width(), panel.height()),
            framebuffer: None,
            partial_count: 0,
            needs_full: true,
        }
    }

    pub fn board(&self) -> Board {
        self.board
    }

    pub fn panel(&self) -> Panel {
        self.board.panel()
    }

    pub fn width(&self) -> u16 {
        self.driver.width()
    }

    pub fn height(&self) -> u16 {
        self.driver.height()
    }

    pub fn config(&self) -> &RefreshConfig {
        &self.driver.config
    }

    /// Packed frame that the next refresh sends, `None` before [`EPaper::begin`]
    pub fn frame_buffer(&self) -> Option<&[u8]> {
        self.framebuffer.as_ref().map(Framebuffer::buffer)
    }

    pub fn frame_buffer_mut(&mut self) -> Option<&mut Framebuffer> {
        self.framebuffer.as_mut()
    }

    /// Partial refreshes done since the last full refresh
    pub fn partial_count(&self) -> u16 {
        self.partial_count
    }

    /// Raw access to the controller for the duration of the returned session
    pub fn start_write(&mut self) -> WriteSession<'_, SPI, BSY, DC, RST, DELAY> {
        self.driver.interface.start_write()
    }

    fn ensure_supported(&self) -> Result<(), RefreshError> {
        let panel = self.panel();
        if !panel.is_uc8179() {
            log::error!("{} has a {} panel, no UC8179 driver for it", self.board, panel);
            return Err(RefreshError::Unsupported(panel));
        }
        Ok(())
    }
}

impl<SPI, BSY, DC, RST, DELAY> EPaper<SPI, BSY, DC, RST, DELAY>
where
    SPI: SpiDevice,
    BSY: InputPin,
    DC: OutputPin,
    RST: OutputPin,
    DELAY: DelayNs,
{
    /// Initialize the controller and allocate a white framebuffer
    pub fn begin(&mut self) -> Result<(), RefreshError> {
        log::info!("Starting {} (combo {})", self.board, self.board.combo());
        self.ensure_supported()?;
        self.driver.init()?;

        if self.framebuffer.is_none() {
            self.framebuffer = Some(Framebuffer::new(self.width(), self.height()));
        }
        self.needs_full = true;
        Ok(())
    }

    /// Full refresh with the framebuffer content, clears ghosting
    pub fn update(&mut self) -> Result<(), RefreshError> {
        let Some(framebuffer) = self.framebuffer.as_ref() else {
            log::warn!("Full refresh skipped, display not ready");
            return Err(RefreshError::NotReady);
        };
        self.driver.update_full(framebuffer.buffer())?;
        self.partial_count = 0;
        self.needs_full = false;
        Ok(())
    }

    /// Whiten the framebuffer and run a full refresh
    pub fn clear_frame(&mut self) -> Result<(), RefreshError> {
        match self.framebuffer.as_mut() {
            Some(framebuffer) => framebuffer.fill(BinaryColor::Off),
            None => return Err(RefreshError::NotReady),
        }
        self.update()
    }

    /// Power the panel down, it keeps showing the last image
    pub fn sleep(&mut self) -> Result<(), RefreshError> {
        self.ensure_supported()?;
        self.driver.sleep()?;
        self.needs_full = true;
        Ok(())
    }

    /// Reset and re-initialize after [`EPaper::sleep`], the next [`EPaper::refresh`] is full
    pub fn wake(&mut self) -> Result<(), RefreshError> {
        self.ensure_supported()?;
        self.driver.wake_up()?;
        self.needs_full = true;
        Ok(())
    }
}

impl<SPI, BSY, DC, RST, DELAY> DrawTarget for EPaper<SPI, BSY, DC, RST, DELAY> {
    type Color = BinaryColor;
    type Error = core::convert::Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        match self.framebuffer.as_mut() {
            Some(framebuffer) => framebuffer.draw_iter(pixels),
            None => Ok(()),
        }
    }

    fn clear(&mut self, color: Self::Color) -> Result<(), Self::Error> {
        if let Some(framebuffer) = self.framebuffer.as_mut() {
            framebuffer.fill(color);
        }
        Ok(())
    }
}

impl<SPI, BSY, DC, RST, DELAY> OriginDimensions for EPaper<SPI, BSY, DC, RST, DELAY> {
    fn size(&self) -> Size {
        Size::new(self.width() as u32, self.height() as u32)
    }
}
