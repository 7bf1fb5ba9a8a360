use std::{
    error::Error,
    fs,
    sync::mpsc::{Receiver, RecvTimeoutError},
    time::Duration,
};

use log::{debug, info, trace, warn};

use crate::{
    config::Config,
    fan::{Fan, FanPin},
    temp::Temp,
};

const PROC_STATUS: &str = "/proc/self/status";

/// One sensor, one fan, one policy. Fan state lives in the hardware pin;
/// every decision is derived from a fresh temperature sample plus a pin
/// read-back, never from a software copy of the state.
pub struct Controller<P: FanPin> {
    config: Config,
    temp: Temp,
    fan: Fan<P>,
}

impl<P: FanPin> Controller<P> {
    #[must_use]
    pub fn new(config: Config, temp: Temp, fan: Fan<P>) -> Self {
        Self { config, temp, fan }
    }

    /// One control iteration. A sensor failure aborts before any pin write;
    /// the caller treats it as fatal rather than guessing a fan state from
    /// a broken reading.
    pub fn tick(&mut self) -> Result<(), Box<dyn Error>> {
        let current_temp = self.temp.current_temp()?;

        if self.config.debug {
            log_mem_usage();
            debug!("CPU temperature: {current_temp}°C");
            debug!("GPIO pin state: {}", u8::from(self.fan.is_on()));
        }

        if current_temp >= self.config.start {
            debug!("Temp: {current_temp}°C, fan commanded on");
            self.fan.turn_on();
        } else if current_temp <= self.config.stop {
            if self.fan.is_on() {
                info!("Fan off (Temp: {current_temp}°C)");
                self.fan.turn_off();
            }
        } else {
            trace!("Temp: {current_temp}°C, inside dead-band, fan unchanged");
        }

        Ok(())
    }

    /// Polls until `shutdown` fires or a sensor failure bubbles up. The
    /// sleep doubles as the cancellation wait, so a signal interrupts the
    /// interval instead of waiting it out.
    pub fn run(&mut self, shutdown: &Receiver<()>) -> Result<(), Box<dyn Error>> {
        let interval = Duration::from_secs(self.config.sleep_time);

        loop {
            self.tick()?;

            trace!("Sleeping for {} seconds", self.config.sleep_time);
            match shutdown.recv_timeout(interval) {
                Ok(()) | Err(RecvTimeoutError::Disconnected) => return Ok(()),
                Err(RecvTimeoutError::Timeout) => {}
            }
        }
    }

    /// Unconditional fan-off; the only exit path that guarantees a known
    /// fan state.
    pub fn shutdown(&mut self) {
        info!("Stopping fan monitor...");
        self.fan.turn_off();
        info!("Fan monitor stopped");
    }
}

fn log_mem_usage() {
    let Ok(status) = fs::read_to_string(PROC_STATUS) else {
        warn!("Can't read {PROC_STATUS}");
        return;
    };

    for (field, label) in [
        ("VmRSS:", "resident"),
        ("VmHWM:", "peak resident"),
        ("VmSize:", "virtual"),
    ] {
        if let Some(kib) = parse_status_line(&status, field) {
            debug!("Memory usage ({label}): {} MiB", kib / 1024);
        }
    }
}

fn parse_status_line(status: &str, field: &str) -> Option<u64> {
    status
        .lines()
        .find(|line| line.starts_with(field))?
        .split_whitespace()
        .nth(1)?
        .parse()
        .ok()
}
