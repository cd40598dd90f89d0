//! Supported board and display combinations
//!
//! The Seeed examples pick a combination with a `BOARD_SCREEN_COMBO` number and a board define.
//! Here the set is a closed enum, and the firmware target picks the default one at build time.

use crate::uc8179;

/// Microcontroller the board is built around
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Chip {
    Esp32C3,
    Esp32S3,
}

/// Panel model mounted on the board
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Panel {
    /// 7.5" 800x480 monochrome, UC8179 controller (combo 502 and 520)
    Uc8179Mono7in5,
    /// 7.3" 800x480 full color (combo 521)
    Spectra7in3,
}

impl Panel {
    pub const fn width(&self) -> u16 {
        match self {
            Panel::Uc8179Mono7in5 => uc8179::WIDTH,
            Panel::Spectra7in3 => 800,
        }
    }

    pub const fn height(&self) -> u16 {
        match self {
            Panel::Uc8179Mono7in5 => uc8179::HEIGHT,
            Panel::Spectra7in3 => 480,
        }
    }

    /// Whether this panel has the UC8179 controller the driver talks to
    pub const fn is_uc8179(&self) -> bool {
        matches!(self, Panel::Uc8179Mono7in5)
    }
}

impl std::fmt::Display for Panel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Panel::Uc8179Mono7in5 => write!(f, "7.5\" monochrome (UC8179)"),
            Panel::Spectra7in3 => write!(f, "7.3\" full color"),
        }
    }
}

/// GPIO numbers wired to the display
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pins {
    /// SPI Clock pin
    pub sck: u8,
    /// SPI Master Out Slave In
    pub mosi: u8,
    /// Chip Select pin for SPI display
    pub cs: u8,
    /// Data/Command control pin (High for data, Low for command)
    pub dc: u8,
    /// Reset pin for display
    pub rst: u8,
    /// Busy status pin (Low while the display is busy)
    pub busy: u8,
}

/// XIAO ESP32-C3, D8/D10/D1/D3/D0/D2
const XIAO_ESP32C3_PINS: Pins = Pins {
    sck: 8,
    mosi: 10,
    cs: 3,
    dc: 5,
    rst: 2,
    busy: 4,
};

const RETERMINAL_PINS: Pins = Pins {
    sck: 7,
    mosi: 9,
    cs: 10,
    dc: 11,
    rst: 12,
    busy: 13,
};

/// Board and display combination
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Board {
    /// XIAO 7.5" ePaper Panel (EE04) with a XIAO ESP32-C3
    XiaoEpaperPanel,
    /// XIAO ePaper driver board with a XIAO ESP32-C3 and the 7.5" panel
    XiaoDriverBoard,
    /// reTerminal E1001, ESP32-S3 with the 7.5" monochrome panel
    ReTerminalE1001,
    /// reTerminal E1002, ESP32-S3 with the 7.3" full color panel
    ReTerminalE1002,
}

impl Board {
    pub const ALL: [Board; 4] = [
        Board::XiaoEpaperPanel,
        Board::XiaoDriverBoard,
        Board::ReTerminalE1001,
        Board::ReTerminalE1002,
    ];

    pub const fn chip(&self) -> Chip {
        match self {
            Board::XiaoEpaperPanel | Board::XiaoDriverBoard => Chip::Esp32C3,
            Board::ReTerminalE1001 | Board::ReTerminalE1002 => Chip::Esp32S3,
        }
    }

    pub const fn panel(&self) -> Panel {
        match self {
            Board::ReTerminalE1002 => Panel::Spectra7in3,
            _ => Panel::Uc8179Mono7in5,
        }
    }

    pub const fn pins(&self) -> Pins {
        match self.chip() {
            Chip::Esp32C3 => XIAO_ESP32C3_PINS,
            Chip::Esp32S3 => RETERMINAL_PINS,
        }
    }

    /// Vendor `BOARD_SCREEN_COMBO` number
    pub const fn combo(&self) -> u16 {
        match self {
            Board::XiaoEpaperPanel | Board::XiaoDriverBoard => 502,
            Board::ReTerminalE1001 => 520,
            Board::ReTerminalE1002 => 521,
        }
    }

    /// Map a vendor combo number to a board, XIAO combos map to the driver board
    pub const fn from_combo(combo: u16) -> Option<Board> {
        match combo {
            502 => Some(Board::XiaoDriverBoard),
            520 => Some(Board::ReTerminalE1001),
            521 => Some(Board::ReTerminalE1002),
            _ => None,
        }
    }

    /// Board the firmware is built for, resolved from the compile target
    #[cfg(all(target_os = "espidf", target_arch = "riscv32"))]
    pub const fn selected() -> Board {
        Board::XiaoDriverBoard
    }

    /// Board the firmware is built for, resolved from the compile target
    #[cfg(all(target_os = "espidf", target_arch = "xtensa"))]
    pub const fn selected() -> Board {
        Board::ReTerminalE1001
    }
}

#[cfg(all(
    target_os = "espidf",
    not(any(target_arch = "riscv32", target_arch = "xtensa"))
))]
compile_error!("Unsupported board - select XIAO_ESP32C3 or XIAO_ESP32S3");

impl std::fmt::Display for Board {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Board::XiaoEpaperPanel => write!(f, "XIAO 7.5\" ePaper Panel"),
            Board::XiaoDriverBoard => write!(f, "XIAO ePaper driver board"),
            Board::ReTerminalE1001 => write!(f, "reTerminal E1001"),
            Board::ReTerminalE1002 => write!(f, "reTerminal E1002"),
        }
    }
}
