//! UC8179 ePaper Display Driver
//!
//! Used in the Seeed Studio [XIAO 7.5" ePaper Panel](https://wiki.seeedstudio.com/xiao_075inch_epaper_panel_arduino/)
//! and the reTerminal E1001, both 800x480 monochrome.
//!
//! This driver is losely modeled after the
//! [epd-waveshare](https://github.com/caemor/epd-waveshare) `epd7in5_v2` driver, which talks to
//! the same controller, but adds the fast partial refresh sequence used by the Seeed examples.
//!
//! ### Usage
//! Most code should go through [`crate::EPaper`], which owns the framebuffer. When driving the
//! controller directly:
//!
//! 1. create the driver with [`driver::Uc8179::new`] and call [`driver::Uc8179::init`]
//! 1. send a packed 1bpp frame with [`driver::Uc8179::update_full`] (slow, clears ghosting)
//! 1. or with [`driver::Uc8179::update_partial`] (fast, accumulates ghosting)
//!
//! Frames use 1 for black. The controller expects the opposite polarity, so every byte is
//! inverted on its way over the bus.

pub mod cmd;
pub mod driver;
pub mod flag;
pub mod interface;

/// Display width, pixels horizontally
pub const WIDTH: u16 = epd_waveshare::epd7in5_v2::WIDTH as u16;

/// Display height, pixels vertically
pub const HEIGHT: u16 = epd_waveshare::epd7in5_v2::HEIGHT as u16;

/// Bytes in one packed 1bpp frame of the 7.5" panel
pub const FRAME_SIZE: usize = buffer_size(WIDTH, HEIGHT);

/// Bytes needed for a packed 1bpp frame of `width` x `height` pixels.
///
/// Every supported panel has a pixel count divisible by 8, so this is exact.
pub const fn buffer_size(width: u16, height: u16) -> usize {
    (width as usize * height as usize) / 8
}
