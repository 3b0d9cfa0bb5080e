//! Baud rate register values
//!
//! The baud control register holds a multiplier of 9600 bps, 1 through 12.

use std::fmt;

use crate::error::{Error, Result};

/// Serial speed as a multiplier of 9600 bps
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum BaudRate {
    B9600 = 1,
    B19200 = 2,
    B28800 = 3,
    B38400 = 4,
    B48000 = 5,
    B57600 = 6,
    B67200 = 7,
    B76800 = 8,
    B86400 = 9,
    B96000 = 10,
    B105600 = 11,
    B115200 = 12,
}

impl BaudRate {
    /// Register value written to the baud control register.
    pub fn multiplier(self) -> u8 {
        self as u8
    }

    /// Speed in bits per second.
    pub fn bps(self) -> u32 {
        self.multiplier() as u32 * 9600
    }
}

impl TryFrom<u8> for BaudRate {
    type Error = Error;

    fn try_from(multiplier: u8) -> Result<Self> {
        match multiplier {
            1 => Ok(Self::B9600),
            2 => Ok(Self::B19200),
            3 => Ok(Self::B28800),
            4 => Ok(Self::B38400),
            5 => Ok(Self::B48000),
            6 => Ok(Self::B57600),
            7 => Ok(Self::B67200),
            8 => Ok(Self::B76800),
            9 => Ok(Self::B86400),
            10 => Ok(Self::B96000),
            11 => Ok(Self::B105600),
            12 => Ok(Self::B115200),
            other => Err(Error::InvalidBaudMultiplier(other)),
        }
    }
}

impl fmt::Display for BaudRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} bps", self.bps())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_multiplier_and_bps() {
        assert_eq!(BaudRate::B9600.multiplier(), 1);
        assert_eq!(BaudRate::B57600.bps(), 57600);
        assert_eq!(BaudRate::B115200.bps(), 115_200);
    }

    #[test]
    fn test_try_from_multiplier() {
        assert_eq!(BaudRate::try_from(12).unwrap(), BaudRate::B115200);
        assert!(BaudRate::try_from(0).is_err());
        assert!(BaudRate::try_from(13).is_err());
    }
}
