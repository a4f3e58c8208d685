//! An asynchronous, `no_std` driver for the TI TCA9554 / TCA9554A 8-bit I2C
//! GPIO expander.
//!
//! The [`Tca9554`] keeps the pin directions and output levels in sync with the
//! device and caches input levels until [`Tca9554::reset_pin_cache`] is
//! called. Individual pins are configured with [`GpioPin`] and driven through
//! [`Pin`] handles.
//!
//! # Usage
//!
//! ```no_run
//! # #![no_std]
//! # #![no_main]
//! # use esp_hal::i2c::master::I2c;
//! use tca9554_async::{Address, GpioPin, Tca9554};
//! use embassy_time::{Duration, Timer};
//!
//! #[embassy_executor::task]
//! async fn blink(i2c: I2c<'static, esp_hal::Async>) {
//!     let mut expander = Tca9554::new(i2c, Address::default());
//!     expander.setup().await.unwrap();
//!
//!     let mut led = expander.pin(GpioPin::output(0)).unwrap();
//!     led.setup().await.unwrap();
//!     loop {
//!         led.set_high().await.unwrap();
//!         Timer::after(Duration::from_millis(500)).await;
//!         led.set_low().await.unwrap();
//!         Timer::after(Duration::from_millis(500)).await;
//!     }
//! }
//! ```

#![no_std]

mod expander;
mod pin;

pub use expander::{Address, Error, InvalidAddress, Mode, Tca9554, PIN_COUNT};
pub use pin::{GpioPin, Pin};
