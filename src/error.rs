//! Error types for the PCA9546 driver.

use core::fmt;

/// Errors that can occur when driving the I2C switch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MuxError<E> {
    /// The bus transaction failed (no acknowledge, arbitration loss, ...).
    I2c(E),

    /// Requested mask uses bits outside the low nibble (must be 0x00–0x0F).
    /// Carries the rejected value. Nothing was written to the bus.
    InvalidChannelMask(u8),
}

// Allow ergonomic `?` propagation from raw I2C errors.
impl<E> From<E> for MuxError<E> {
    fn from(error: E) -> Self {
        MuxError::I2c(error)
    }
}

impl<E: fmt::Debug> fmt::Display for MuxError<E> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            MuxError::I2c(e) => write!(f, "I2C error: {:?}", e),
            MuxError::InvalidChannelMask(mask) => {
                write!(f, "Invalid channel mask {:#04x} (must be 0x00-0x0F)", mask)
            }
        }
    }
}

#[cfg(feature = "defmt")]
impl<E: defmt::Format> defmt::Format for MuxError<E> {
    fn format(&self, f: defmt::Formatter) {
        match self {
            MuxError::I2c(e) => defmt::write!(f, "I2C error: {}", e),
            MuxError::InvalidChannelMask(mask) => {
                defmt::write!(f, "Invalid channel mask {=u8:#x}", mask)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_names_rejected_mask() {
        let err: MuxError<()> = MuxError::InvalidChannelMask(0xC8);
        assert_eq!(format!("{}", err), "Invalid channel mask 0xc8 (must be 0x00-0x0F)");
    }

    #[test]
    fn bus_errors_convert_with_question_mark() {
        fn fails() -> Result<(), MuxError<u8>> {
            Err::<(), u8>(7)?;
            Ok(())
        }
        assert_eq!(fails(), Err(MuxError::I2c(7)));
    }
}
