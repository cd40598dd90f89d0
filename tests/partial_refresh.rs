//! Partial refresh integration tests, the full 800x480 panel against mocked hardware.
//!
//! Every test records the exact SPI bytes, DC levels and busy polls it expects and fails
//! on anything inserted, reordered or missing.
//!
//! Run with: cargo test --test partial_refresh

use embedded_graphics::mono_font::{ascii::FONT_10X20, MonoTextStyle};
use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{PrimitiveStyle, Rectangle};
use embedded_graphics::text::Text;
use display_interface::DisplayError;
use embedded_hal::spi::{ErrorKind, ErrorType, Operation, SpiDevice};
use embedded_hal_mock::eh1::delay::NoopDelay;
use embedded_hal_mock::eh1::digital::{
    Mock as PinMock, State as PinState, Transaction as PinTransaction,
};
use embedded_hal_mock::eh1::spi::{Mock as SpiMock, Transaction as SpiTransaction};
use epaper_client::uc8179::interface::STREAM_CHUNK_SIZE;
use epaper_client::{
    update_partial, Board, EPaper, Panel, RefreshConfig, RefreshError, RefreshKind,
};

type TestDisplay = EPaper<SpiMock<u8>, PinMock, PinMock, PinMock, NoopDelay>;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Expected hardware traffic, built in the order the driver produces it
#[derive(Default)]
struct Bus {
    spi: Vec<SpiTransaction<u8>>,
    dc: Vec<PinTransaction>,
    busy: Vec<PinTransaction>,
    rst: Vec<PinTransaction>,
    /// Command bytes only, for readable assertions
    commands: Vec<u8>,
}

impl Bus {
    fn write(&mut self, data: Vec<u8>) {
        self.spi.push(SpiTransaction::transaction_start());
        self.spi.push(SpiTransaction::write_vec(data));
        self.spi.push(SpiTransaction::transaction_end());
    }

    fn cmd(&mut self, command: u8) -> &mut Self {
        self.commands.push(command);
        self.dc.push(PinTransaction::set(PinState::Low));
        self.write(vec![command]);
        self
    }

    fn data(&mut self, data: &[u8]) -> &mut Self {
        self.dc.push(PinTransaction::set(PinState::High));
        self.write(data.to_vec());
        self
    }

    fn inverted(&mut self, frame: &[u8]) -> &mut Self {
        self.dc.push(PinTransaction::set(PinState::High));
        for chunk in frame.chunks(STREAM_CHUNK_SIZE) {
            self.write(chunk.iter().map(|b| !b).collect());
        }
        self
    }

    /// `busy` polls reading busy, then one reading idle
    fn busy_then_idle(&mut self, busy: usize) -> &mut Self {
        for _ in 0..busy {
            self.busy.push(PinTransaction::get(PinState::Low));
        }
        self.busy.push(PinTransaction::get(PinState::High));
        self
    }

    fn reset(&mut self) -> &mut Self {
        self.rst.extend([
            PinTransaction::set(PinState::High),
            PinTransaction::set(PinState::Low),
            PinTransaction::set(PinState::High),
        ]);
        self
    }

    fn begin(&mut self) -> &mut Self {
        self.reset()
            .cmd(0x01)
            .data(&[0x07, 0x07, 0x3F, 0x3F])
            .cmd(0x04)
            .busy_then_idle(2)
            .cmd(0x00)
            .data(&[0x1F])
            .cmd(0x61)
            .data(&[0x03, 0x20, 0x01, 0xE0])
            .cmd(0x15)
            .data(&[0x00])
            .cmd(0x50)
            .data(&[0x10, 0x07])
            .cmd(0x60)
            .data(&[0x22])
    }

    /// Partial mode registers up to and including the new image command
    fn partial_setup(&mut self) -> &mut Self {
        self.cmd(0x00)
            .data(&[0x1F])
            .cmd(0x50)
            .data(&[0x10, 0x07])
            .cmd(0xE0)
            .data(&[0x02])
            .cmd(0xE5)
            .data(&[0x5A])
            .cmd(0x13)
    }

    fn partial(&mut self, frame: &[u8]) -> &mut Self {
        self.partial_setup().inverted(frame).cmd(0x12)
    }

    fn full(&mut self, frame: &[u8]) -> &mut Self {
        self.cmd(0x00)
            .data(&[0x1F])
            .cmd(0xE0)
            .data(&[0x00])
            .cmd(0x10)
            .inverted(frame)
            .cmd(0x13)
            .inverted(frame)
            .cmd(0x12)
    }
}

struct Hardware {
    spi: SpiMock<u8>,
    busy: PinMock,
    dc: PinMock,
    rst: PinMock,
}

impl Hardware {
    fn expecting(bus: &Bus) -> Self {
        Hardware {
            spi: SpiMock::new(&bus.spi),
            busy: PinMock::new(&bus.busy),
            dc: PinMock::new(&bus.dc),
            rst: PinMock::new(&bus.rst),
        }
    }

    fn display(&self, board: Board, config: RefreshConfig) -> TestDisplay {
        EPaper::new(
            board,
            self.spi.clone(),
            self.busy.clone(),
            self.dc.clone(),
            self.rst.clone(),
            NoopDelay,
            config,
        )
    }

    fn done(&mut self) {
        self.spi.done();
        self.busy.done();
        self.dc.done();
        self.rst.done();
    }
}

/// SPI device that lets `ok_writes` writes through to the mock and fails every one after
struct FailingSpi {
    inner: SpiMock<u8>,
    ok_writes: usize,
}

impl ErrorType for FailingSpi {
    type Error = ErrorKind;
}

impl SpiDevice for FailingSpi {
    fn transaction(&mut self, operations: &mut [Operation<'_, u8>]) -> Result<(), ErrorKind> {
        if self.ok_writes == 0 {
            return Err(ErrorKind::Other);
        }
        self.ok_writes -= 1;
        self.inner
            .transaction(operations)
            .map_err(|_| ErrorKind::Other)
    }
}

/// Something recognizable on the panel: a frame, a filled box and text
fn draw_scene(display: &mut TestDisplay) {
    Rectangle::new(Point::new(0, 0), Size::new(800, 480))
        .into_styled(PrimitiveStyle::with_stroke(BinaryColor::On, 3))
        .draw(display)
        .unwrap();
    Rectangle::new(Point::new(100, 100), Size::new(123, 45))
        .into_styled(PrimitiveStyle::with_fill(BinaryColor::On))
        .draw(display)
        .unwrap();
    Text::new(
        "partial",
        Point::new(300, 240),
        MonoTextStyle::new(&FONT_10X20, BinaryColor::On),
    )
    .draw(display)
    .unwrap();
}

/// Frame as the display will hold it after `draw_scene`, built on a separate display
fn scene_frame() -> Vec<u8> {
    let mut bus = Bus::default();
    bus.begin();
    let mut hardware = Hardware::expecting(&bus);
    let mut display = hardware.display(Board::XiaoDriverBoard, RefreshConfig::default());
    display.begin().unwrap();
    draw_scene(&mut display);
    let frame = display.frame_buffer().unwrap().to_vec();
    hardware.done();
    frame
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[test]
fn not_ready_display_touches_no_hardware() {
    let mut hardware = Hardware::expecting(&Bus::default());
    let mut display = hardware.display(Board::XiaoDriverBoard, RefreshConfig::default());

    assert!(display.frame_buffer().is_none());
    assert!(matches!(
        update_partial(&mut display),
        Err(RefreshError::NotReady)
    ));
    assert!(matches!(display.update(), Err(RefreshError::NotReady)));
    assert!(matches!(display.refresh(), Err(RefreshError::NotReady)));
    hardware.done();
}

#[test]
fn color_panel_is_refused_before_any_bus_traffic() {
    let mut hardware = Hardware::expecting(&Bus::default());
    let mut display = hardware.display(Board::ReTerminalE1002, RefreshConfig::default());

    assert!(matches!(
        display.begin(),
        Err(RefreshError::Unsupported(Panel::Spectra7in3))
    ));
    assert!(display.frame_buffer().is_none());
    hardware.done();
}

#[test]
fn partial_refresh_of_800x480_streams_48000_inverted_bytes() {
    let frame = scene_frame();
    assert_eq!(frame.len(), 48_000);
    assert_eq!(frame.len() * 8, 800 * 480);

    let mut bus = Bus::default();
    bus.begin().partial(&frame).busy_then_idle(150);
    assert_eq!(bus.commands[7..], [0x00, 0x50, 0xE0, 0xE5, 0x13, 0x12]);
    let mut hardware = Hardware::expecting(&bus);
    let mut display = hardware.display(Board::XiaoDriverBoard, RefreshConfig::default());

    display.begin().unwrap();
    draw_scene(&mut display);
    update_partial(&mut display).unwrap();

    // inverted in transit only
    assert_eq!(display.frame_buffer().unwrap(), frame.as_slice());
    assert_eq!(display.partial_count(), 1);
    hardware.done();
}

#[test]
fn stuck_busy_line_reports_timeout() {
    let config = RefreshConfig::new()
        .with_busy_timeout(200)
        .with_poll_interval(10);
    let white = vec![0u8; 48_000];

    let mut bus = Bus::default();
    bus.begin().partial(&white);
    // 20 polls that all read busy, no idle
    bus.busy
        .extend((0..20).map(|_| PinTransaction::get(PinState::Low)));
    let mut hardware = Hardware::expecting(&bus);
    let mut display = hardware.display(Board::XiaoEpaperPanel, config);

    display.begin().unwrap();
    assert!(matches!(
        display.update_partial(),
        Err(RefreshError::BusyTimeout)
    ));
    assert_eq!(display.partial_count(), 0);

    // the session was released, the display is still usable
    let session = display.start_write();
    drop(session);
    hardware.done();
}

#[test]
fn refresh_alternates_partial_and_full_by_interval() {
    let config = RefreshConfig::default().with_full_refresh_interval(2);
    let white = vec![0u8; 48_000];

    let mut bus = Bus::default();
    bus.begin()
        .full(&white)
        .busy_then_idle(0)
        .partial(&white)
        .busy_then_idle(0)
        .partial(&white)
        .busy_then_idle(0)
        .full(&white)
        .busy_then_idle(0);
    let mut hardware = Hardware::expecting(&bus);
    let mut display = hardware.display(Board::ReTerminalE1001, config);

    display.begin().unwrap();
    assert!(display.needs_full_refresh());
    assert_eq!(display.refresh().unwrap(), RefreshKind::Full);
    assert_eq!(display.refresh().unwrap(), RefreshKind::Partial);
    assert_eq!(display.refresh().unwrap(), RefreshKind::Partial);
    assert_eq!(display.partial_count(), 2);
    assert_eq!(display.refresh().unwrap(), RefreshKind::Full);
    assert_eq!(display.partial_count(), 0);
    hardware.done();
}

#[test]
fn sleep_forces_full_refresh_after_wake() {
    let config = RefreshConfig::default().with_full_refresh_interval(5);
    let white = vec![0u8; 48_000];

    let mut bus = Bus::default();
    bus.begin()
        .full(&white)
        .busy_then_idle(0)
        .partial(&white)
        .busy_then_idle(0)
        .cmd(0x02)
        .busy_then_idle(1)
        .cmd(0x07)
        .data(&[0xA5])
        .begin()
        .full(&white)
        .busy_then_idle(0);
    let mut hardware = Hardware::expecting(&bus);
    let mut display = hardware.display(Board::XiaoDriverBoard, config);

    display.begin().unwrap();
    assert_eq!(display.refresh().unwrap(), RefreshKind::Full);
    assert_eq!(display.refresh().unwrap(), RefreshKind::Partial);
    display.sleep().unwrap();
    display.wake().unwrap();
    assert_eq!(display.refresh().unwrap(), RefreshKind::Full);
    hardware.done();
}

#[test]
fn clear_frame_whitens_and_refreshes_fully() {
    let white = vec![0u8; 48_000];
    let mut bus = Bus::default();
    bus.begin().full(&white).busy_then_idle(3);
    let mut hardware = Hardware::expecting(&bus);
    let mut display = hardware.display(Board::XiaoDriverBoard, RefreshConfig::default());

    display.begin().unwrap();
    draw_scene(&mut display);
    display.clear_frame().unwrap();
    assert!(display.frame_buffer().unwrap().iter().all(|&b| b == 0));
    hardware.done();
}

#[test]
fn full_refresh_after_partial_restores_measured_temperature() {
    let white = vec![0u8; 48_000];
    let mut bus = Bus::default();
    bus.begin()
        .partial(&white)
        .busy_then_idle(1)
        .full(&white)
        .busy_then_idle(4);
    assert_eq!(
        bus.commands[7..],
        [0x00, 0x50, 0xE0, 0xE5, 0x13, 0x12, 0x00, 0xE0, 0x10, 0x13, 0x12]
    );
    let mut hardware = Hardware::expecting(&bus);
    let mut display = hardware.display(Board::XiaoDriverBoard, RefreshConfig::default());

    display.begin().unwrap();
    display.update_partial().unwrap();
    display.update().unwrap();
    assert_eq!(display.partial_count(), 0);
    hardware.done();
}

#[test]
fn spi_failure_while_streaming_reports_interface_error() {
    let white = vec![0u8; 48_000];
    let mut bus = Bus::default();
    bus.begin()
        .partial_setup()
        .inverted(&white[..STREAM_CHUNK_SIZE * 3]);
    let ok_writes = bus.spi.len() / 3;
    let mut hardware = Hardware::expecting(&bus);
    let mut display = EPaper::new(
        Board::XiaoDriverBoard,
        FailingSpi {
            inner: hardware.spi.clone(),
            ok_writes,
        },
        hardware.busy.clone(),
        hardware.dc.clone(),
        hardware.rst.clone(),
        NoopDelay,
        RefreshConfig::default(),
    );

    display.begin().unwrap();
    assert!(matches!(
        update_partial(&mut display),
        Err(RefreshError::Interface(DisplayError::BusWriteError))
    ));
    assert_eq!(display.partial_count(), 0);
    assert!(display.frame_buffer().unwrap().iter().all(|&b| b == 0));

    // the session was released, the display is still usable
    let session = display.start_write();
    drop(session);
    hardware.done();
}
