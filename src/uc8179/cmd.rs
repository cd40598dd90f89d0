/// Register addresses of the UC8179 controller
pub struct Cmd;
impl Cmd {
    // Init
    pub const PANEL_SETTING: u8 = 0x00;
    pub const POWER_SETTING: u8 = 0x01;
    pub const POWER_OFF: u8 = 0x02;
    pub const POWER_ON: u8 = 0x04;
    pub const DEEP_SLEEP: u8 = 0x07;
    pub const DUAL_SPI: u8 = 0x15;
    pub const VCOM_DATA_INTERVAL: u8 = 0x50;
    pub const TCON_SETTING: u8 = 0x60;
    pub const RESOLUTION_SETTING: u8 = 0x61;

    // Update
    pub const DATA_START_TRANSMISSION_OLD: u8 = 0x10;
    pub const DATA_START_TRANSMISSION_NEW: u8 = 0x13;
    pub const DISPLAY_REFRESH: u8 = 0x12;

    // Waveform temperature
    pub const CASCADE_SETTING: u8 = 0xE0;
    pub const FORCE_TEMPERATURE: u8 = 0xE5;
}

