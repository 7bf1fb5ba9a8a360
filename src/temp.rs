use std::{error::Error, fs, path::PathBuf};

pub struct Temp {
    pub path: PathBuf,
}

impl Temp {
    #[must_use]
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Whole degrees Celsius, truncated from the millidegree sensor value.
    pub fn current_temp(&self) -> Result<i32, Box<dyn Error>> {
        let raw = fs::read_to_string(&self.path)?;
        let millidegrees = raw.trim_end_matches('\n').parse::<i32>()?;
        Ok(millidegrees / 1000)
    }
}
