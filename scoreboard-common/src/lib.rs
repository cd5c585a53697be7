pub mod control;

pub mod snapshot;

pub mod limits {
    pub const MAX_SCORE: u8 = 19;
    pub const MAX_BRIGHTNESS: u8 = 100;
    pub const MAX_BATTERY_LEVEL: u8 = 100;
}
