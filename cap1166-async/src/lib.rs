//! An asynchronous, `no_std` driver for the Microchip CAP1166 capacitive touch
//! and LED controller.
//!
//! The CAP1166 has six capacitive touch inputs and six LED outputs. This
//! driver provides a [`Cap1166`] controller that runs the chip's reset and
//! identity check, programs sensitivity, multi-touch blocking, LED linking
//! and LED brightness, and then polls the touch status into registered
//! [`TouchSensor`]s. LED outputs are switched through [`Led`] handles.
//!
//! # Usage
//!
//! To use this driver, you need an I2C peripheral implementation that satisfies the
//! `embedded-hal-async::i2c::I2c` trait, a delay provider implementing
//! `embedded-hal-async::delay::DelayNs` and, optionally, the reset GPIO pin.
//!
//! ```no_run
//! # #![no_std]
//! # #![no_main]
//! # use esp_hal::i2c::master::I2c;
//! # use esp_hal::gpio::{Level, Output, OutputConfig};
//! use cap1166_async::{Cap1166, Config, LedBehavior, LedChannel, TouchSensor};
//! use embassy_time::{Delay, Duration, Timer};
//!
//! #[embassy_executor::task]
//! async fn touch_panel(i2c: I2c<'static, esp_hal::Async>, rst: Output<'static>) {
//!     let config = Config::default().with_multiple_touches(true);
//!     let mut cap = Cap1166::new(i2c, Some(rst), Delay, config);
//!     cap.register_touch_sensor(TouchSensor::new(0)).unwrap();
//!     cap.register_led_channel(LedChannel::new(1).with_behavior(LedBehavior::Breathe).independent())
//!         .unwrap();
//!     cap.set_behavior_brightness(LedBehavior::Breathe, 80, 10);
//!     cap.setup().await.unwrap();
//!
//!     loop {
//!         if let Ok(Some(status)) = cap.poll().await {
//!             if status.is_touched(0) {
//!                 // log::info!("Touched");
//!             }
//!         }
//!         Timer::after(Duration::from_millis(20)).await;
//!     }
//! }
//! ```

#![no_std]

pub mod brightness;
pub mod channel;
pub mod conf;
pub mod reg;

mod cap;
pub use cap::*;

pub use brightness::DutyCycle;
pub use channel::{LedBehavior, LedChannel, TouchListener, TouchSensor, TouchStatus};
pub use conf::{Config, MultiTouch};
