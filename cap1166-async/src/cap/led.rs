//! Borrowed handle for a registered LED output.

use embedded_hal::digital::OutputPin;
use embedded_hal_async::delay::DelayNs;
use embedded_hal_async::i2c::{I2c, SevenBitAddress};

use super::{Cap1166, Error};
use crate::channel::{LedBehavior, LedChannel};

/// A registered LED output, borrowed together with its controller.
///
/// Obtained from [`Cap1166::led`]. Commands go straight to the LED output
/// control and behavior registers.
pub struct Led<'a, I2cType, RstType, DelayType> {
    parent: &'a mut Cap1166<I2cType, RstType, DelayType>,
    led: LedChannel,
}

impl<'a, I2cType, RstType, DelayType, ErrorType> Led<'a, I2cType, RstType, DelayType>
where
    I2cType: I2c<SevenBitAddress, Error = ErrorType>,
    ErrorType: embedded_hal_async::i2c::Error,
    RstType: OutputPin,
    DelayType: DelayNs,
{
    pub(super) fn new(parent: &'a mut Cap1166<I2cType, RstType, DelayType>, led: LedChannel) -> Self {
        Self { parent, led }
    }

    /// The output this LED is wired to.
    pub fn channel(&self) -> u8 {
        self.led.channel()
    }

    /// Behavior programmed by [`Led::setup`].
    pub fn behavior(&self) -> LedBehavior {
        self.led.behavior()
    }

    /// Whether the output may follow its touch input.
    pub fn is_linked(&self) -> bool {
        self.led.is_linked()
    }

    /// Turns the LED on.
    pub async fn activate(&mut self) -> Result<(), Error<ErrorType>> {
        self.parent.led_on(self.led.channel()).await
    }

    /// Turns the LED off.
    pub async fn deactivate(&mut self) -> Result<(), Error<ErrorType>> {
        self.parent.led_off(self.led.channel()).await
    }

    /// Turns the LED on or off.
    pub async fn write_state(&mut self, on: bool) -> Result<(), Error<ErrorType>> {
        self.parent.set_led(self.led.channel(), on).await
    }

    /// Writes this output's behavior into the shared behavior register.
    /// Calling it again reproduces the same register bits.
    pub async fn setup(&mut self) -> Result<(), Error<ErrorType>> {
        self.parent
            .configure_led_behavior(self.led.channel(), self.led.behavior())
            .await
    }
}
