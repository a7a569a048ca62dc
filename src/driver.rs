//! Blocking driver for the PCA9546A 4-channel I2C switch.
//!
//! [`Pca9546`] owns the upstream bus handle and the last commanded channel
//! mask. Each selection is one single-byte write to the chip's only
//! register; reads return that register.

use embedded_hal::i2c::{Error as _, ErrorKind, I2c};

use crate::channels::{Channels, Status, MAX_CHANNEL_MASK, NO_DATA};
use crate::error::MuxError;

/// Blocking driver for the PCA9546A I2C switch.
///
/// The bus is injected at construction and returned by
/// [`release`](Self::release). Sharing the upstream bus with other drivers
/// is the caller's concern (e.g. an `embedded-hal-bus` device wrapper).
///
/// # Example
///
/// ```no_run
/// use pca9546::{Channels, Pca9546, DEFAULT_ADDRESS};
/// # fn example<I: embedded_hal::i2c::I2c>(i2c: I) -> Result<(), pca9546::MuxError<I::Error>> {
/// // Connect channels 1 and 3 straight away.
/// let mut mux = Pca9546::new(i2c, DEFAULT_ADDRESS, 0b0101);
/// assert!(mux.status().is_success());
///
/// mux.set_channels(Channels::CHANNEL_2)?;
/// mux.disable_all()?;
/// # Ok(())
/// # }
/// ```
pub struct Pca9546<I2C> {
    i2c: I2C,
    address: u8,
    mask: u8,
    status: Status,
    last_error: Option<MuxError<ErrorKind>>,
}

impl<I2C> Pca9546<I2C>
where
    I2C: I2c,
{
    /// Create the driver and immediately select `initial_mask`.
    ///
    /// The bus must already be configured by the HAL. The outcome of the
    /// initial selection is reported through [`status`](Self::status) and
    /// [`last_error`](Self::last_error), not a return value. If it fails
    /// the stored mask stays at the chip's power-on value of 0.
    ///
    /// # Arguments
    /// * `i2c` — I2C peripheral (takes ownership for exclusive access)
    /// * `address` — 7-bit I2C device address (0x70–0x77, not validated)
    /// * `initial_mask` — channels to enable, bits 0–3
    pub fn new(i2c: I2C, address: u8, initial_mask: u8) -> Self {
        let mut mux = Self {
            i2c,
            address,
            mask: 0,
            status: Status::Error,
            last_error: None,
        };
        // Outcome is kept in `status` / `last_error`.
        let _ = mux.select(initial_mask);
        mux
    }

    /// Give back the bus handle. The chip keeps its last programmed state.
    pub fn release(self) -> I2C {
        self.i2c
    }

    // -----------------------------------------------------------------------
    // Channel selection
    // -----------------------------------------------------------------------

    /// Write a channel mask to the control register.
    ///
    /// Accepts a raw `u8` or a [`Channels`]. Every accepted call issues
    /// exactly one write, even if the mask is unchanged.
    ///
    /// # Errors
    /// * [`MuxError::InvalidChannelMask`] if `mask > 0x0F`. No bus traffic
    ///   occurs.
    /// * [`MuxError::I2c`] if the write transaction fails.
    ///
    /// On either error the status becomes [`Status::Error`] and the stored
    /// mask keeps its previous value.
    pub fn select<M: Into<u8>>(&mut self, mask: M) -> Result<(), MuxError<I2C::Error>> {
        let mask = mask.into();
        if mask > MAX_CHANNEL_MASK {
            #[cfg(feature = "defmt")]
            defmt::warn!("pca9546@{=u8:#x}: rejected mask {=u8:#x}", self.address, mask);
            self.status = Status::Error;
            self.last_error = Some(MuxError::InvalidChannelMask(mask));
            return Err(MuxError::InvalidChannelMask(mask));
        }

        match self.i2c.write(self.address, &[mask]) {
            Ok(()) => {
                #[cfg(feature = "defmt")]
                defmt::trace!("pca9546@{=u8:#x}: channels {=u8:#b}", self.address, mask);
                self.mask = mask;
                self.status = Status::Success;
                self.last_error = None;
                Ok(())
            }
            Err(e) => {
                #[cfg(feature = "defmt")]
                defmt::warn!("pca9546@{=u8:#x}: write failed: {}", self.address, e.kind());
                self.status = Status::Error;
                self.last_error = Some(MuxError::I2c(e.kind()));
                Err(MuxError::I2c(e))
            }
        }
    }

    /// Polling-style selection: `true` on success.
    ///
    /// Inspect [`last_error`](Self::last_error) to tell a rejected mask
    /// from a bus failure.
    pub fn select_channel(&mut self, mask: u8) -> bool {
        self.select(mask).is_ok()
    }

    /// Connect exactly the given channels.
    pub fn set_channels(&mut self, channels: Channels) -> Result<(), MuxError<I2C::Error>> {
        self.select(channels)
    }

    /// Connect `channels` in addition to the ones already connected.
    pub fn enable(&mut self, channels: Channels) -> Result<(), MuxError<I2C::Error>> {
        self.select(self.channels() | channels)
    }

    /// Disconnect `channels`, leaving the others as they are.
    pub fn disable(&mut self, channels: Channels) -> Result<(), MuxError<I2C::Error>> {
        self.select(self.channels() & !channels)
    }

    /// Disconnect every downstream channel.
    pub fn disable_all(&mut self) -> Result<(), MuxError<I2C::Error>> {
        self.select(Channels::NONE)
    }

    // -----------------------------------------------------------------------
    // Register read-back
    // -----------------------------------------------------------------------

    /// Read the control register in one single-byte transaction.
    ///
    /// The result is not compared with the stored mask.
    pub fn read_register(&mut self) -> Result<u8, MuxError<I2C::Error>> {
        let mut buf = [NO_DATA];
        self.i2c.read(self.address, &mut buf)?;
        Ok(buf[0])
    }

    /// Read the control register, returning [`NO_DATA`] (0xFF) if the bus
    /// delivers nothing.
    pub fn read_register_or_sentinel(&mut self) -> u8 {
        self.read_register().unwrap_or(NO_DATA)
    }

    /// Read back the channels the chip currently has connected.
    pub fn read_channels(&mut self) -> Result<Channels, MuxError<I2C::Error>> {
        self.read_register().map(Channels::from_bits_truncate)
    }

    // -----------------------------------------------------------------------
    // State
    // -----------------------------------------------------------------------

    pub fn address(&self) -> u8 {
        self.address
    }

    /// Last mask successfully written.
    pub fn mask(&self) -> u8 {
        self.mask
    }

    /// Last mask successfully written, as a channel set.
    pub fn channels(&self) -> Channels {
        Channels::from_bits_truncate(self.mask)
    }

    /// Outcome of the most recent selection attempt.
    pub fn status(&self) -> Status {
        self.status
    }

    /// Why the most recent selection attempt failed, if it did.
    pub fn last_error(&self) -> Option<MuxError<ErrorKind>> {
        self.last_error
    }
}
