pub mod config;
pub mod controller;
pub mod fan;
pub mod temp;

pub const DEFAULT_THERMAL_PATH: &str = "/sys/class/thermal/thermal_zone0/temp";
