//! E-paper client for Seeed Studio UC8179 panels
//!
//! Drives the 7.5" 800x480 monochrome panel of the XIAO ePaper boards and the reTerminal E1001,
//! with a fast partial refresh next to the regular full refresh.
//!
//! ### Usage
//!
//! 1. pick the [`Board`] and create an [`EPaper`] from its SPI device and pins
//! 1. call [`EPaper::begin`] to initialize the panel and allocate the framebuffer
//! 1. draw into the display with [`embedded_graphics`]
//! 1. call [`EPaper::update`] for a full refresh, [`update_partial`] for a fast one, or
//!    [`EPaper::refresh`] to let the ghosting policy decide
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::must_use_candidate)]

pub mod board;
pub mod config;
pub mod epaper;
pub mod error;
pub mod framebuffer;
pub mod partial;
pub mod uc8179;

pub use crate::board::{Board, Chip, Panel, Pins};
pub use crate::config::RefreshConfig;
pub use crate::epaper::EPaper;
pub use crate::error::RefreshError;
pub use crate::framebuffer::Framebuffer;
pub use crate::partial::{update_partial, RefreshKind};
pub use crate::uc8179::driver::Uc8179;
