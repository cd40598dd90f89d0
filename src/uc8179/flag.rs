/// Parameter values for the UC8179 e-paper controller registers.
///
/// Grouped by the register they are written to.
pub struct Flag;
#[allow(missing_docs)]
impl Flag {
    // Panel Setting (0x00) flags
    /// KW mode, LUT from OTP, scan up, shift right, booster on, no soft reset
    pub const PANEL_KW_OTP_LUT: u8 = 0x1F;

    // Power Setting (0x01) flags
    pub const POWER_BORDER_LDO_INTERNAL: u8 = 0x07;
    pub const POWER_VGH_VGL_20V: u8 = 0x07;
    pub const POWER_VDH_15V: u8 = 0x3F;
    pub const POWER_VDL_15V: u8 = 0x3F;

    // VCOM and Data Interval Setting (0x50) flags
    pub const BORDER_FOLLOW_LUT: u8 = 0x10;
    pub const DATA_INTERVAL_10_HSYNC: u8 = 0x07;

    // Cascade Setting (0xE0) flags
    /// TSFIX: temperature comes from Force Temperature instead of the sensor
    pub const CASCADE_TEMPERATURE_FIXED: u8 = 0x02;
    /// Temperature from the internal sensor, the full refresh waveform
    pub const CASCADE_TEMPERATURE_SENSOR: u8 = 0x00;

    // Force Temperature (0xE5) flags
    /// Selects the fast waveform from OTP
    pub const FORCE_TEMPERATURE_PARTIAL: u8 = 0x5A;

    // Dual SPI (0x15) flags
    pub const DUAL_SPI_DISABLED: u8 = 0x00;

    // TCON Setting (0x60) flags
    pub const TCON_S2G_G2S_12: u8 = 0x22;

    // Deep Sleep (0x07) flags
    pub const DEEP_SLEEP_CHECK_CODE: u8 = 0xA5;
}
