//! Driver for the NXP PCA9546A 4-channel I2C switch.
//!
//! The PCA9546A fans one upstream I2C bus out to four downstream
//! branches. Devices that share an address, or that run at a different
//! supply voltage, go on separate branches; the host connects the
//! branches it wants by writing a 4-bit mask to the chip's single control
//! register.
//!
//! # Architecture
//!
//! - **[`Pca9546`]** — blocking driver over [`embedded_hal::i2c::I2c`].
//! - **[`AsyncPca9546`]** *(feature `async`)* — the same API over
//!   `embedded_hal_async::i2c::I2c`.
//! - **[`Channels`]** — a validated channel set that can always be
//!   written without a range check.
//!
//! Both drivers return a [`MuxError`] from every bus operation and also
//! keep a [`Status`] for the last selection attempt, for callers that
//! prefer polling.
//!
//! # Quick start
//!
//! ```no_run
//! use pca9546::{Channels, Pca9546, DEFAULT_ADDRESS};
//! # fn example<I: embedded_hal::i2c::I2c>(i2c: I) -> Result<(), pca9546::MuxError<I::Error>> {
//! let mut mux = Pca9546::new(i2c, DEFAULT_ADDRESS, 0);
//!
//! // Talk to the sensor on channel 2 only
//! mux.set_channels(Channels::CHANNEL_2)?;
//! # Ok(())
//! # }
//! ```
//!
//! # Features
//!
//! - **`async`** — enables [`AsyncPca9546`].
//! - **`defmt`** — [`defmt::Format`] implementations and driver logging.

#![cfg_attr(not(test), no_std)]

pub use channels::{
    Channels, Status, CHANNEL_1, CHANNEL_2, CHANNEL_3, CHANNEL_4, CHANNEL_COUNT, DEFAULT_ADDRESS,
    MAX_CHANNEL_MASK, NO_DATA,
};
pub use driver::Pca9546;
#[cfg(feature = "async")]
pub use driver_async::AsyncPca9546;
pub use error::MuxError;

mod channels;
mod driver;
#[cfg(feature = "async")]
mod driver_async;
mod error;
