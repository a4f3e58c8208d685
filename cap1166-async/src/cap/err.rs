//! Error types for the CAP1166 driver.

use core::fmt;

/// Identity bytes read from the device during setup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Identity {
    /// Product ID register.
    pub product_id: u8,
    /// Manufacturer ID register.
    pub manufacturer_id: u8,
    /// Revision register.
    pub revision: u8,
}

impl Identity {
    /// Whether the product and manufacturer IDs match a CAP1166.
    pub fn is_cap1166(&self) -> bool {
        self.product_id == crate::reg::EXPECTED_PRODUCT_ID
            && self.manufacturer_id == crate::reg::EXPECTED_MANUFACTURER_ID
    }
}

/// The main error type for the CAP1166 driver.
#[derive(Debug)]
pub enum Error<E> {
    /// The I2C transaction failed.
    I2c(E),
    /// The device on the bus did not identify as a CAP1166.
    CommunicationFailed(Identity),
    /// Driving the reset pin failed.
    ResetPin,
    /// Channel index out of range or already registered.
    InvalidChannel(u8),
    /// The operation needs a device that finished setup.
    NotReady,
}

impl<E: fmt::Debug> fmt::Display for Error<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::I2c(err) => write!(f, "I2C error: {err:?}"),
            Self::CommunicationFailed(id) => write!(
                f,
                "Product ID or Manufacture ID of the connected device does not match a known CAP1166 \
                 (product 0x{:02x}, manufacturer 0x{:02x})",
                id.product_id, id.manufacturer_id
            ),
            Self::ResetPin => write!(f, "failed to drive the reset pin"),
            Self::InvalidChannel(channel) => write!(f, "invalid channel {channel}"),
            Self::NotReady => write!(f, "device setup has not completed"),
        }
    }
}
