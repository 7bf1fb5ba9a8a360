use log::info;
use rppal::gpio::{Gpio, OutputPin};

/// Hardware seam for the fan switch. The real implementation is rppal's
/// output pin; tests substitute a recording pin.
pub trait FanPin {
    fn set_high(&mut self);
    fn set_low(&mut self);
    fn is_set_high(&self) -> bool;
}

impl FanPin for OutputPin {
    fn set_high(&mut self) {
        OutputPin::set_high(self);
    }

    fn set_low(&mut self) {
        OutputPin::set_low(self);
    }

    fn is_set_high(&self) -> bool {
        OutputPin::is_set_high(self)
    }
}

pub struct Fan<P: FanPin> {
    pub(crate) pin: P,
}

impl Fan<OutputPin> {
    /// Claims the GPIO pin and configures it as an output. Acquisition is
    /// the only fallible hardware operation; reads and writes on the
    /// configured pin don't report errors.
    pub fn open(pin: u8) -> Result<Self, rppal::gpio::Error> {
        let gpio = Gpio::new()?;
        let mut pin = gpio.get(pin)?.into_output();
        // Keep the last commanded level if the process exits without a
        // clean shutdown; only the shutdown path drives the pin low.
        pin.set_reset_on_drop(false);
        info!("Fan pin: GPIO{}", pin.pin());
        Ok(Self { pin })
    }
}

impl<P: FanPin> Fan<P> {
    #[must_use]
    pub fn new(pin: P) -> Self {
        Self { pin }
    }

    pub fn turn_on(&mut self) {
        self.pin.set_high();
    }

    pub fn turn_off(&mut self) {
        self.pin.set_low();
    }

    /// Level read back from the hardware, not a software copy of it.
    #[must_use]
    pub fn is_on(&self) -> bool {
        self.pin.is_set_high()
    }
}
