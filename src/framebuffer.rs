//! Packed 1 bit per pixel framebuffer
//!
//! Row-major, MSB first: pixel 0 of a row is bit 7 of the row's first byte.
//! A set bit is a black pixel ([`BinaryColor::On`]).

use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;

use crate::uc8179::buffer_size;

/// Owned frame you can draw into with `embedded-graphics`
pub struct Framebuffer {
    width: u16,
    height: u16,
    buffer: Vec<u8>,
}

impl Framebuffer {
    /// White frame of `width` x `height` pixels
    pub fn new(width: u16, height: u16) -> Self {
        Framebuffer {
            width,
            height,
            buffer: vec![0x00; buffer_size(width, height)],
        }
    }

    pub fn buffer(&self) -> &[u8] {
        &self.buffer
    }

    pub fn buffer_mut(&mut self) -> &mut [u8] {
        &mut self.buffer
    }

    /// Fill every pixel with `color`
    pub fn fill(&mut self, color: BinaryColor) {
        let byte = match color {
            BinaryColor::On => 0xFF,
            BinaryColor::Off => 0x00,
        };
        self.buffer.fill(byte);
    }

    fn locate(&self, point: Point) -> Option<(usize, u8)> {
        if point.x < 0
            || point.y < 0
            || point.x >= self.width as i32
            || point.y >= self.height as i32
        {
            return None;
        }
        let pixel_index = point.y as usize * self.width as usize + point.x as usize;
        Some((pixel_index / 8, 0x80 >> (pixel_index % 8)))
    }
}

impl DrawTarget for Framebuffer {
    type Color = BinaryColor;
    type Error = core::convert::Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(point, color) in pixels {
            if let Some((index, bit)) = self.locate(point) {
                match color {
                    BinaryColor::On => self.buffer[index] |= bit,
                    BinaryColor::Off => self.buffer[index] &= !bit,
                }
            }
        }
        Ok(())
    }

    fn clear(&mut self, color: Self::Color) -> Result<(), Self::Error> {
        self.fill(color);
        Ok(())
    }
}

impl OriginDimensions for Framebuffer {
    fn size(&self) -> Size {
        Size::new(self.width as u32, self.height as u32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_graphics::primitives::{PrimitiveStyle, Rectangle};

    #[test]
    fn new_frame_is_white_and_sized() {
        let frame = Framebuffer::new(800, 480);
        assert_eq!(frame.buffer().len(), 48_000);
        assert!(frame.buffer().iter().all(|&b| b == 0));
    }

    #[test]
    fn pixels_pack_msb_first() {
        let mut frame = Framebuffer::new(16, 2);
        Pixel(Point::new(0, 0), BinaryColor::On)
            .draw(&mut frame)
            .unwrap();
        Pixel(Point::new(9, 1), BinaryColor::On)
            .draw(&mut frame)
            .unwrap();
        assert_eq!(frame.buffer(), &[0x80, 0x00, 0x00, 0x40]);

        Pixel(Point::new(0, 0), BinaryColor::Off)
            .draw(&mut frame)
            .unwrap();
        assert_eq!(frame.buffer(), &[0x00, 0x00, 0x00, 0x40]);
    }

    #[test]
    fn out_of_bounds_pixels_are_dropped() {
        let mut frame = Framebuffer::new(8, 1);
        Rectangle::new(Point::new(-4, -4), Size::new(20, 20))
            .into_styled(PrimitiveStyle::with_fill(BinaryColor::On))
            .draw(&mut frame)
            .unwrap();
        assert_eq!(frame.buffer(), &[0xFF]);
        assert_eq!(frame.size(), Size::new(8, 1));
    }

    #[test]
    fn clearing_to_off_whitens() {
        let mut frame = Framebuffer::new(8, 2);
        frame.clear(BinaryColor::On).unwrap();
        assert_eq!(frame.buffer(), &[0xFF, 0xFF]);
        frame.clear(BinaryColor::Off).unwrap();
        assert_eq!(frame.buffer(), &[0x00, 0x00]);
    }
}
