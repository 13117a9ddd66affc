//! Status LED: lit while the wireless link is up.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;

pub struct ConnectivityIndicator<P> {
    pin: P,
}

impl<P: OutputPin> ConnectivityIndicator<P> {
    pub fn new(pin: P) -> Self {
        Self { pin }
    }

    /// Drive the LED from the current wireless state.  Called every tick,
    /// no hysteresis.
    pub fn update(&mut self, wireless_connected: bool) -> Result<(), P::Error> {
        if wireless_connected {
            self.pin.set_high()
        } else {
            self.pin.set_low()
        }
    }

    /// Start-up flash sequence.  Leaves the LED off.
    pub fn boot_blink<D: DelayNs>(
        &mut self,
        delay: &mut D,
        count: u8,
        period_ms: u32,
    ) -> Result<(), P::Error> {
        for _ in 0..count {
            self.pin.set_high()?;
            delay.delay_ms(period_ms);
            self.pin.set_low()?;
            delay.delay_ms(period_ms);
        }
        Ok(())
    }

    pub fn release(self) -> P {
        self.pin
    }
}
