//! Core implementation of the TCA9554 driver.

use core::fmt;

use embedded_hal_async::i2c::{I2c, SevenBitAddress};

use crate::pin::{GpioPin, Pin};

// --- Register Addresses ---
const INPUT_PORT_REG: u8 = 0x00;
const OUTPUT_PORT_REG: u8 = 0x01;
const CONFIGURATION_REG: u8 = 0x03;

/// Number of GPIO pins on the expander.
pub const PIN_COUNT: u8 = 8;

/// Address range of the TCA9554 (A2..A0 strapped).
const TCA9554_ADDRESSES: core::ops::RangeInclusive<u8> = 0x20..=0x27;
/// Address range of the TCA9554A.
const TCA9554A_ADDRESSES: core::ops::RangeInclusive<u8> = 0x38..=0x3F;

/// A validated 7-bit I2C address of a TCA9554 or TCA9554A.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Address(u8);

impl Address {
    /// Validates `address` against the TCA9554 (0x20-0x27) and TCA9554A
    /// (0x38-0x3F) ranges.
    pub fn new(address: u8) -> Result<Self, InvalidAddress> {
        if TCA9554_ADDRESSES.contains(&address) || TCA9554A_ADDRESSES.contains(&address) {
            Ok(Self(address))
        } else {
            Err(InvalidAddress(address))
        }
    }

    /// TCA9554 address for the A2..A0 strap value `straps` (0..=7).
    pub const fn tca9554(straps: u8) -> Self {
        Self(0x20 | (straps & 0x07))
    }

    /// TCA9554A address for the A2..A0 strap value `straps` (0..=7).
    pub const fn tca9554a(straps: u8) -> Self {
        Self(0x38 | (straps & 0x07))
    }

    /// The raw 7-bit address.
    pub fn get(self) -> u8 {
        self.0
    }
}

impl Default for Address {
    fn default() -> Self {
        Self::tca9554a(0)
    }
}

impl TryFrom<u8> for Address {
    type Error = InvalidAddress;

    fn try_from(address: u8) -> Result<Self, Self::Error> {
        Self::new(address)
    }
}

/// An address outside the TCA9554/TCA9554A ranges.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidAddress(pub u8);

impl fmt::Display for InvalidAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "address 0x{:02x} is invalid, TCA9554: 0x20 - 0x27, TCA9554A: 0x38 - 0x3F",
            self.0
        )
    }
}

/// Direction of a GPIO pin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// High impedance input.
    Input,
    /// Push-pull output.
    Output,
}

/// Errors reported by the TCA9554 driver.
#[derive(Debug)]
pub enum Error<E> {
    /// The I2C transaction failed.
    I2c(E),
    /// Setup failed earlier; the device is not accessed any more.
    Failed,
    /// Pin number outside 0..=7.
    InvalidPin(u8),
}

impl<E: fmt::Debug> fmt::Display for Error<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::I2c(err) => write!(f, "I2C error: {err:?}"),
            Self::Failed => write!(f, "Communication with TCA9554 failed!"),
            Self::InvalidPin(pin) => write!(f, "invalid pin {pin}"),
        }
    }
}

/// A driver for the TCA9554 8-bit GPIO expander.
///
/// The driver keeps a copy of the configuration and output registers so pin
/// updates are single register writes. Input levels are cached until
/// [`Tca9554::reset_pin_cache`] is called, normally once per host loop.
pub struct Tca9554<I2cType> {
    i2c: I2cType,
    address: Address,
    mode_mask: u8,
    output_mask: u8,
    input_mask: u8,
    input_cache_valid: bool,
    failed: bool,
    warning: bool,
}

impl<I2cType, ErrorType> Tca9554<I2cType>
where
    I2cType: I2c<SevenBitAddress, Error = ErrorType>,
    ErrorType: embedded_hal_async::i2c::Error,
{
    /// Creates a new `Tca9554`.
    ///
    /// # Arguments
    ///
    /// * `i2c` - An I2C peripheral that implements `embedded-hal-async::i2c::I2c`.
    /// * `address` - The device address.
    pub fn new(i2c: I2cType, address: Address) -> Self {
        Self {
            i2c,
            address,
            // Power-on state: every pin an input, outputs high.
            mode_mask: 0xFF,
            output_mask: 0xFF,
            input_mask: 0x00,
            input_cache_valid: false,
            failed: false,
            warning: false,
        }
    }

    /// Releases the I2C bus.
    pub fn release(self) -> I2cType {
        self.i2c
    }

    /// Reads the current pin directions and output levels from the device.
    ///
    /// Any bus error marks the device as failed.
    pub async fn setup(&mut self) -> Result<(), Error<ErrorType>> {
        self.failed = false;
        let result = self.read_state().await;
        if let Err(err) = &result {
            log::warn!("tca9554: setup failed: {err:?}");
            self.failed = true;
        }
        result
    }

    async fn read_state(&mut self) -> Result<(), Error<ErrorType>> {
        let modes = self.read_register(CONFIGURATION_REG).await.map_err(|err| {
            log::warn!("Failed to read mode register");
            err
        })?;
        self.mode_mask = modes;

        let outputs = self.read_register(OUTPUT_PORT_REG).await.map_err(|err| {
            log::warn!("Failed to read output register");
            err
        })?;
        self.output_mask = outputs;
        log::trace!("tca9554: modes 0x{modes:02x}, outputs 0x{outputs:02x}");
        Ok(())
    }

    /// Whether setup failed.
    pub fn is_failed(&self) -> bool {
        self.failed
    }

    /// Whether the last register access failed.
    pub fn has_warning(&self) -> bool {
        self.warning
    }

    /// Direction bits, 1 = input.
    pub fn mode_mask(&self) -> u8 {
        self.mode_mask
    }

    /// Output levels last written.
    pub fn output_mask(&self) -> u8 {
        self.output_mask
    }

    /// Sets the direction of `pin` and writes the configuration register.
    pub async fn pin_mode(&mut self, pin: u8, mode: Mode) -> Result<(), Error<ErrorType>> {
        self.check_access(pin)?;
        match mode {
            Mode::Input => self.mode_mask |= 1 << pin,
            Mode::Output => self.mode_mask &= !(1 << pin),
        }
        let result = self.write_register(CONFIGURATION_REG, self.mode_mask).await;
        self.track(result, "Failed to write mode register")
    }

    /// Drives output `pin` high (`true`) or low.
    pub async fn digital_write(&mut self, pin: u8, value: bool) -> Result<(), Error<ErrorType>> {
        self.check_access(pin)?;
        if value {
            self.output_mask |= 1 << pin;
        } else {
            self.output_mask &= !(1 << pin);
        }
        let result = self.write_register(OUTPUT_PORT_REG, self.output_mask).await;
        self.track(result, "Failed to write output register")
    }

    /// Level of `pin`, reading the input register only when the cached
    /// levels were invalidated. One read refreshes every pin.
    pub async fn digital_read(&mut self, pin: u8) -> Result<bool, Error<ErrorType>> {
        self.check_access(pin)?;
        if !self.input_cache_valid {
            self.read_inputs().await?;
        }
        Ok(self.input_mask & (1 << pin) != 0)
    }

    /// Reads the input register, refreshing the cached levels.
    pub async fn read_inputs(&mut self) -> Result<u8, Error<ErrorType>> {
        if self.failed {
            return Err(Error::Failed);
        }
        let result = self.read_register(INPUT_PORT_REG).await;
        let inputs = self.track(result, "Failed to read input register")?;
        self.input_mask = inputs;
        self.input_cache_valid = true;
        Ok(inputs)
    }

    /// Invalidates every cached input level.
    pub fn reset_pin_cache(&mut self) {
        self.input_cache_valid = false;
    }

    /// A handle for the pin described by `config`.
    pub fn pin(&mut self, config: GpioPin) -> Result<Pin<'_, I2cType>, Error<ErrorType>> {
        if config.number() >= PIN_COUNT {
            return Err(Error::InvalidPin(config.number()));
        }
        Ok(Pin::new(self, config))
    }

    /// Logs the address and failure status.
    pub fn dump_config(&self) {
        log::info!("TCA9554:");
        log::info!("  Address: 0x{:02x}", self.address.get());
        if self.failed {
            log::error!("Communication with TCA9554 failed!");
        }
    }

    fn check_access(&self, pin: u8) -> Result<(), Error<ErrorType>> {
        if self.failed {
            return Err(Error::Failed);
        }
        if pin >= PIN_COUNT {
            return Err(Error::InvalidPin(pin));
        }
        Ok(())
    }

    fn track<T>(&mut self, result: Result<T, Error<ErrorType>>, msg: &str) -> Result<T, Error<ErrorType>> {
        match &result {
            Ok(_) => self.warning = false,
            Err(err) => {
                log::warn!("{msg}: {err:?}");
                self.warning = true;
            }
        }
        result
    }

    async fn read_register(&mut self, register: u8) -> Result<u8, Error<ErrorType>> {
        let mut buf = [0u8; 1];
        self.i2c
            .write_read(self.address.get(), &[register], &mut buf)
            .await
            .map_err(Error::I2c)?;
        Ok(buf[0])
    }

    async fn write_register(&mut self, register: u8, value: u8) -> Result<(), Error<ErrorType>> {
        self.i2c
            .write(self.address.get(), &[register, value])
            .await
            .map_err(Error::I2c)
    }
}
