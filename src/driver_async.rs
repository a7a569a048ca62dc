//! Async driver for the PCA9546A, built on `embedded-hal-async`.
//!
//! Same contract as [`Pca9546`](crate::Pca9546); every bus operation is an
//! `async fn` so the switch can live on an Embassy-style shared bus.

use embedded_hal_async::i2c::{Error as _, ErrorKind, I2c};

use crate::channels::{Channels, Status, MAX_CHANNEL_MASK, NO_DATA};
use crate::error::MuxError;

/// Async driver for the PCA9546A I2C switch.
///
/// # Example
///
/// ```no_run
/// # async fn example<I: embedded_hal_async::i2c::I2c>(i2c: I) -> Result<(), pca9546::MuxError<I::Error>> {
/// use pca9546::{AsyncPca9546, Channels, DEFAULT_ADDRESS};
///
/// let mut mux = AsyncPca9546::new(i2c, DEFAULT_ADDRESS, 0).await;
/// mux.set_channels(Channels::CHANNEL_4).await?;
/// # Ok(())
/// # }
/// ```
pub struct AsyncPca9546<I2C> {
    i2c: I2C,
    address: u8,
    mask: u8,
    status: Status,
    last_error: Option<MuxError<ErrorKind>>,
}

impl<I2C> AsyncPca9546<I2C>
where
    I2C: I2c,
{
    /// Create the driver and immediately select `initial_mask`.
    ///
    /// See [`Pca9546::new`](crate::Pca9546::new); the outcome is read from
    /// [`status`](Self::status).
    pub async fn new(i2c: I2C, address: u8, initial_mask: u8) -> Self {
        let mut mux = Self {
            i2c,
            address,
            mask: 0,
            status: Status::Error,
            last_error: None,
        };
        let _ = mux.select(initial_mask).await;
        mux
    }

    pub fn release(self) -> I2C {
        self.i2c
    }

    // -----------------------------------------------------------------------
    // Channel selection
    // -----------------------------------------------------------------------

    /// Write a channel mask to the control register.
    ///
    /// # Errors
    /// * [`MuxError::InvalidChannelMask`] if `mask > 0x0F` (no bus traffic)
    /// * [`MuxError::I2c`] if the write transaction fails
    pub async fn select<M: Into<u8>>(&mut self, mask: M) -> Result<(), MuxError<I2C::Error>> {
        let mask = mask.into();
        if mask > MAX_CHANNEL_MASK {
            #[cfg(feature = "defmt")]
            defmt::warn!("pca9546@{=u8:#x}: rejected mask {=u8:#x}", self.address, mask);
            self.status = Status::Error;
            self.last_error = Some(MuxError::InvalidChannelMask(mask));
            return Err(MuxError::InvalidChannelMask(mask));
        }

        if let Err(e) = self.i2c.write(self.address, &[mask]).await {
            #[cfg(feature = "defmt")]
            defmt::warn!("pca9546@{=u8:#x}: write failed: {}", self.address, e.kind());
            self.status = Status::Error;
            self.last_error = Some(MuxError::I2c(e.kind()));
            return Err(MuxError::I2c(e));
        }

        #[cfg(feature = "defmt")]
        defmt::trace!("pca9546@{=u8:#x}: channels {=u8:#b}", self.address, mask);
        self.mask = mask;
        self.status = Status::Success;
        self.last_error = None;
        Ok(())
    }

    pub async fn select_channel(&mut self, mask: u8) -> bool {
        self.select(mask).await.is_ok()
    }

    pub async fn set_channels(&mut self, channels: Channels) -> Result<(), MuxError<I2C::Error>> {
        self.select(channels).await
    }

    pub async fn enable(&mut self, channels: Channels) -> Result<(), MuxError<I2C::Error>> {
        self.select(self.channels() | channels).await
    }

    pub async fn disable(&mut self, channels: Channels) -> Result<(), MuxError<I2C::Error>> {
        self.select(self.channels() & !channels).await
    }

    pub async fn disable_all(&mut self) -> Result<(), MuxError<I2C::Error>> {
        self.select(Channels::NONE).await
    }

    // -----------------------------------------------------------------------
    // Register read-back
    // -----------------------------------------------------------------------

    pub async fn read_register(&mut self) -> Result<u8, MuxError<I2C::Error>> {
        let mut buf = [NO_DATA];
        self.i2c.read(self.address, &mut buf).await?;
        Ok(buf[0])
    }

    /// Returns [`NO_DATA`] (0xFF) if the bus delivers nothing.
    pub async fn read_register_or_sentinel(&mut self) -> u8 {
        self.read_register().await.unwrap_or(NO_DATA)
    }

    pub async fn read_channels(&mut self) -> Result<Channels, MuxError<I2C::Error>> {
        self.read_register().await.map(Channels::from_bits_truncate)
    }

    // -----------------------------------------------------------------------
    // State
    // -----------------------------------------------------------------------

    pub fn address(&self) -> u8 {
        self.address
    }

    pub fn mask(&self) -> u8 {
        self.mask
    }

    pub fn channels(&self) -> Channels {
        Channels::from_bits_truncate(self.mask)
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn last_error(&self) -> Option<MuxError<ErrorKind>> {
        self.last_error
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::channels::{CHANNEL_3, CHANNEL_4, DEFAULT_ADDRESS};
    use embassy_futures::block_on;
    use embedded_hal_mock::eh1::i2c::{Mock as I2cMock, Transaction};

    const ADDR: u8 = DEFAULT_ADDRESS;

    #[test]
    fn construction_and_selection() {
        block_on(async {
            let i2c = I2cMock::new(&[
                Transaction::write(ADDR, vec![CHANNEL_3]),
                Transaction::write(ADDR, vec![CHANNEL_3 | CHANNEL_4]),
            ]);
            let mut mux = AsyncPca9546::new(i2c, ADDR, CHANNEL_3).await;
            assert_eq!(mux.status(), Status::Success);

            mux.enable(Channels::CHANNEL_4).await.unwrap();
            assert_eq!(mux.mask(), 0x0C);
            mux.release().done();
        });
    }

    #[test]
    fn invalid_mask_keeps_state() {
        block_on(async {
            let i2c = I2cMock::new(&[Transaction::write(ADDR, vec![3])]);
            let mut mux = AsyncPca9546::new(i2c, ADDR, 3).await;

            assert!(!mux.select_channel(20).await);
            assert_eq!(mux.mask(), 3);
            assert_eq!(mux.status(), Status::Error);
            assert_eq!(mux.last_error(), Some(MuxError::InvalidChannelMask(20)));
            mux.release().done();
        });
    }

    #[test]
    fn bus_failure_and_sentinel_read() {
        block_on(async {
            let i2c = I2cMock::new(&[
                Transaction::write(ADDR, vec![1]).with_error(ErrorKind::Other),
                Transaction::read(ADDR, vec![0]).with_error(ErrorKind::Other),
            ]);
            let mut mux = AsyncPca9546::new(i2c, ADDR, 1).await;

            assert_eq!(mux.status(), Status::Error);
            assert_eq!(mux.last_error(), Some(MuxError::I2c(ErrorKind::Other)));
            assert_eq!(mux.mask(), 0);
            assert_eq!(mux.read_register_or_sentinel().await, NO_DATA);
            mux.release().done();
        });
    }
}
