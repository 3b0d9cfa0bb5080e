//! System parameter block
//!
//! PS_ReadSysPara replies with a 16-byte parameter block after the
//! confirmation byte. The offsets below are the device contract; getters on
//! [`SystemParameters`] read the parsed fields.

use byteorder::{BigEndian, ByteOrder};
use std::fmt;

use crate::error::{Error, Result};

// Offsets within the reply payload (confirmation byte at offset 0)
const STATUS_OFFSET: usize = 1;
const SYSTEM_ID_OFFSET: usize = 3;
const DATABASE_SIZE_OFFSET: usize = 5;
const SECURITY_LEVEL_OFFSET: usize = 7;
const ADDRESS_OFFSET: usize = 9;
const PACKET_CODE_OFFSET: usize = 13;
const BAUD_MULTIPLIER_OFFSET: usize = 15;

/// Parameter block size including the confirmation byte
const BLOCK_SIZE: usize = 17;

bitflags::bitflags! {
    /// Device status register
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct SystemStatus: u16 {
        /// Sensor is executing a command
        const BUSY = 1;
        /// A matching fingerprint pair was found
        const MATCH_FOUND = 1 << 1;
        /// Handshake password verified
        const PASSWORD_VERIFIED = 1 << 2;
        /// Image buffer holds a valid image
        const IMAGE_VALID = 1 << 3;
    }
}

/// Parsed system parameter block
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SystemParameters {
    /// Status register
    pub status: SystemStatus,

    /// System identifier code
    pub system_id: u16,

    /// Fingerprint database capacity in templates
    pub database_size: u16,

    /// Security level (match threshold), 0-5
    pub security_level: u8,

    /// Device address stored in the register block
    pub address: u32,

    /// Data packet size code
    pub packet_code: u16,

    /// Baud rate multiplier in units of 9600 bps
    pub baud_multiplier: u8,
}

impl SystemParameters {
    /// Parse the parameter block from a reply payload.
    ///
    /// `payload` must include the confirmation byte at offset 0; fields sit
    /// at their documented offsets after it. The security level and baud
    /// multiplier occupy two bytes on the wire but only the low byte is
    /// significant (levels cap at 5, multipliers at 12).
    pub fn parse(payload: &[u8]) -> Result<Self> {
        if payload.len() < BLOCK_SIZE {
            return Err(Error::ParameterBlockTooShort(payload.len()));
        }

        Ok(Self {
            status: SystemStatus::from_bits_truncate(BigEndian::read_u16(
                &payload[STATUS_OFFSET..STATUS_OFFSET + 2],
            )),
            system_id: BigEndian::read_u16(&payload[SYSTEM_ID_OFFSET..SYSTEM_ID_OFFSET + 2]),
            database_size: BigEndian::read_u16(
                &payload[DATABASE_SIZE_OFFSET..DATABASE_SIZE_OFFSET + 2],
            ),
            security_level: payload[SECURITY_LEVEL_OFFSET + 1],
            address: BigEndian::read_u32(&payload[ADDRESS_OFFSET..ADDRESS_OFFSET + 4]),
            packet_code: BigEndian::read_u16(&payload[PACKET_CODE_OFFSET..PACKET_CODE_OFFSET + 2]),
            baud_multiplier: payload[BAUD_MULTIPLIER_OFFSET + 1],
        })
    }

    /// Configured baud rate in bits per second.
    pub fn baud_rate(&self) -> u32 {
        self.baud_multiplier as u32 * 9600
    }
}

impl fmt::Display for SystemParameters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "SysPara[db={}, level={}, addr=0x{:08X}, baud={}]",
            self.database_size,
            self.security_level,
            self.address,
            self.baud_rate()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sample_block() -> Vec<u8> {
        vec![
            0x00, // confirmation
            0x00, 0x0A, // status register: MATCH_FOUND | IMAGE_VALID
            0x00, 0x09, // system id
            0x00, 0x64, // database size: 100
            0x00, 0x03, // security level: 3
            0xFF, 0xFF, 0xFF, 0xFF, // address
            0x00, 0x02, // packet code
            0x00, 0x06, // baud multiplier: 6 -> 57600
        ]
    }

    #[test]
    fn test_parse_reads_documented_offsets() {
        let params = SystemParameters::parse(&sample_block()).unwrap();

        assert_eq!(
            params.status,
            SystemStatus::MATCH_FOUND | SystemStatus::IMAGE_VALID
        );
        assert_eq!(params.system_id, 0x0009);
        assert_eq!(params.database_size, 100);
        assert_eq!(params.security_level, 3);
        assert_eq!(params.address, 0xFFFF_FFFF);
        assert_eq!(params.packet_code, 2);
        assert_eq!(params.baud_multiplier, 6);
        assert_eq!(params.baud_rate(), 57600);
    }

    #[test]
    fn test_parse_rejects_short_block() {
        assert!(matches!(
            SystemParameters::parse(&[0x00, 0x01, 0x02]),
            Err(Error::ParameterBlockTooShort(3))
        ));
    }
}
