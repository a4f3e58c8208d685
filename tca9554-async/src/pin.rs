//! Pin descriptions and pin handles borrowing a [`Tca9554`].

use core::fmt;

use embedded_hal_async::i2c::{I2c, SevenBitAddress};

use crate::expander::{Error, Mode, Tca9554};

/// Description of one expander pin: number, direction and inversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GpioPin {
    number: u8,
    mode: Mode,
    inverted: bool,
}

impl GpioPin {
    /// An input on pin `number`.
    pub const fn input(number: u8) -> Self {
        Self {
            number,
            mode: Mode::Input,
            inverted: false,
        }
    }

    /// An output on pin `number`.
    pub const fn output(number: u8) -> Self {
        Self {
            number,
            mode: Mode::Output,
            inverted: false,
        }
    }

    /// Marks the pin active-low: logical high is electrical low.
    pub const fn inverted(mut self) -> Self {
        self.inverted = true;
        self
    }

    /// Pin number, 0..=7.
    pub fn number(&self) -> u8 {
        self.number
    }

    /// Direction applied by [`Pin::setup`].
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Whether the logical level is inverted.
    pub fn is_inverted(&self) -> bool {
        self.inverted
    }
}

impl fmt::Display for GpioPin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} via TCA9554", self.number)
    }
}

/// A [`GpioPin`] borrowed together with its expander.
pub struct Pin<'a, I2cType> {
    parent: &'a mut Tca9554<I2cType>,
    config: GpioPin,
}

impl<'a, I2cType, ErrorType> Pin<'a, I2cType>
where
    I2cType: I2c<SevenBitAddress, Error = ErrorType>,
    ErrorType: embedded_hal_async::i2c::Error,
{
    pub(crate) fn new(parent: &'a mut Tca9554<I2cType>, config: GpioPin) -> Self {
        Self { parent, config }
    }

    /// The pin description this handle was created from.
    pub fn config(&self) -> GpioPin {
        self.config
    }

    /// Applies the pin direction.
    pub async fn setup(&mut self) -> Result<(), Error<ErrorType>> {
        self.parent.pin_mode(self.config.number, self.config.mode).await
    }

    /// Logical level, after inversion.
    pub async fn is_high(&mut self) -> Result<bool, Error<ErrorType>> {
        let raw = self.parent.digital_read(self.config.number).await?;
        Ok(raw != self.config.inverted)
    }

    /// Logical level is low, after inversion.
    pub async fn is_low(&mut self) -> Result<bool, Error<ErrorType>> {
        Ok(!self.is_high().await?)
    }

    /// Drives the logical level `high`, after inversion.
    pub async fn set_level(&mut self, high: bool) -> Result<(), Error<ErrorType>> {
        self.parent
            .digital_write(self.config.number, high != self.config.inverted)
            .await
    }

    /// Drives the logical level high.
    pub async fn set_high(&mut self) -> Result<(), Error<ErrorType>> {
        self.set_level(true).await
    }

    /// Drives the logical level low.
    pub async fn set_low(&mut self) -> Result<(), Error<ErrorType>> {
        self.set_level(false).await
    }
}
