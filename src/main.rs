//! Firmware for the XIAO ePaper boards and the reTerminal E1001
//!
//! Shows the splash image with a full refresh, then updates a status line with fast partial
//! refreshes before putting the panel and the chip to deep sleep. Every wake starts with a full
//! refresh, which clears the ghosting the partial refreshes left behind.

#[cfg(target_os = "espidf")]
use embedded_graphics::{
    mono_font::{ascii::FONT_10X20, MonoTextStyle},
    pixelcolor::BinaryColor,
    prelude::*,
    primitives::{PrimitiveStyle, Rectangle},
    text::Text,
};
#[cfg(target_os = "espidf")]
use epaper_client::{uc8179::FRAME_SIZE, Board, EPaper, RefreshConfig, RefreshKind};
#[cfg(target_os = "espidf")]
use esp_idf_svc::hal::{
    delay::{Delay, FreeRtos},
    gpio,
    peripherals::Peripherals,
    prelude::*,
    spi,
};

// Splash image converted to a packed 800x480 frame at build time, empty without splash.png
#[cfg(target_os = "espidf")]
const SPLASH_IMAGE: &[u8] = include_bytes!(concat!(env!("OUT_DIR"), "/splash.bin"));

/// Partial refreshes of the status line per wake
#[cfg(target_os = "espidf")]
const UPDATES_PER_WAKE: u32 = 6;

#[cfg(target_os = "espidf")]
const UPDATE_PERIOD_MS: u32 = 30_000;

#[cfg(target_os = "espidf")]
const DEEP_SLEEP_US: u64 = 10 * 60 * 1_000_000;

#[cfg(target_os = "espidf")]
const REFRESH_CONFIG: RefreshConfig = RefreshConfig::new()
    .with_busy_timeout(10_000)
    .with_full_refresh_interval(10);

/// Redraw the status line at the bottom of the panel
#[cfg(target_os = "espidf")]
fn draw_status<D>(target: &mut D, board: Board, update: u32) -> Result<(), D::Error>
where
    D: DrawTarget<Color = BinaryColor>,
{
    Rectangle::new(Point::new(0, 400), Size::new(800, 80))
        .into_styled(PrimitiveStyle::with_fill(BinaryColor::Off))
        .draw(target)?;

    let text = format!("{} - update {}/{}", board, update, UPDATES_PER_WAKE);
    Text::new(
        &text,
        Point::new(20, 430),
        MonoTextStyle::new(&FONT_10X20, BinaryColor::On),
    )
    .draw(target)?;

    Rectangle::new(
        Point::new(20, 450),
        Size::new(760 * update / UPDATES_PER_WAKE, 12),
    )
    .into_styled(PrimitiveStyle::with_fill(BinaryColor::On))
    .draw(target)?;
    Ok(())
}

// https://docs.esp-rs.org/esp-idf-svc/esp_idf_svc/
#[cfg(target_os = "espidf")]
#[allow(unreachable_code)]
fn main() -> anyhow::Result<()> {
    // It is necessary to call this function once. Otherwise some patches to the runtime
    // implemented by esp-idf-sys might not link properly. See https://github.com/esp-rs/esp-idf-template/issues/71
    esp_idf_svc::sys::link_patches();

    // Bind the log crate to the ESP Logging facilities
    esp_idf_svc::log::EspLogger::initialize_default();

    let board = Board::selected();
    log::info!(
        "{} on {:?}, combo {}, pins {:?}",
        board,
        board.chip(),
        board.combo(),
        board.pins()
    );

    let peripherals = Peripherals::take()?;
    let pins = peripherals.pins;

    // Same numbers as Board::pins(), the HAL needs them as typed pins
    #[cfg(target_arch = "riscv32")]
    let (sck, mosi, cs, busy, dc, rst) = (
        pins.gpio8, pins.gpio10, pins.gpio3, pins.gpio4, pins.gpio5, pins.gpio2,
    );
    #[cfg(target_arch = "xtensa")]
    let (sck, mosi, cs, busy, dc, rst) = (
        pins.gpio7, pins.gpio9, pins.gpio10, pins.gpio13, pins.gpio11, pins.gpio12,
    );

    log::info!("Configuring SPI");
    let driver = spi::SpiDeviceDriver::new_single(
        peripherals.spi2,
        sck,
        mosi,
        Option::<gpio::AnyIOPin>::None, // No MISO needed for display
        Some(cs),
        &spi::SpiDriverConfig::new(),
        &spi::SpiConfig::new().baudrate(4.MHz().into()), // Mode0 is the default
    )?;

    let mut display = EPaper::new(
        board,
        driver,
        gpio::PinDriver::input(busy)?,
        gpio::PinDriver::output(dc)?,
        gpio::PinDriver::output(rst)?,
        Delay::default(),
        REFRESH_CONFIG,
    );

    display.begin()?;

    let splash_fits = SPLASH_IMAGE.len() == FRAME_SIZE
        && display
            .frame_buffer()
            .is_some_and(|frame| frame.len() == FRAME_SIZE);
    if splash_fits {
        log::info!("Splash image embedded, size: {} bytes", SPLASH_IMAGE.len());
        if let Some(frame) = display.frame_buffer_mut() {
            frame.buffer_mut().copy_from_slice(SPLASH_IMAGE);
        }
    } else {
        log::warn!("Splash image not available (splash.png not found at build time)");
        Text::new(
            "epaper-client",
            Point::new(20, 40),
            MonoTextStyle::new(&FONT_10X20, BinaryColor::On),
        )
        .draw(&mut display)?;
    }
    draw_status(&mut display, board, 0)?;
    display.update()?;

    for update in 1..=UPDATES_PER_WAKE {
        FreeRtos::delay_ms(UPDATE_PERIOD_MS);
        draw_status(&mut display, board, update)?;

        match display.refresh() {
            Ok(RefreshKind::Partial) => log::info!("Update {} done (partial)", update),
            Ok(RefreshKind::Full) => log::info!("Update {} done (full)", update),
            Err(e) => log::error!("Update {} failed: {}", update, e),
        }
    }

    display.sleep()?;

    let reset_reason = esp_idf_svc::hal::reset::ResetReason::get();
    log::info!("Reset reason: {:?}", reset_reason);
    log::info!("Going to deep sleep for {} seconds", DEEP_SLEEP_US / 1_000_000);

    unsafe {
        esp_idf_svc::sys::esp_sleep_enable_timer_wakeup(DEEP_SLEEP_US);
        esp_idf_svc::sys::esp_deep_sleep_start();
    }
    Ok(())
}

#[cfg(not(target_os = "espidf"))]
fn main() {
    eprintln!("epaper-client is firmware, build it for an ESP-IDF target (esp32c3 or esp32s3)");
}
