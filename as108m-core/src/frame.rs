//! AS108M frame structure and encoding/decoding

use byteorder::{BigEndian, ByteOrder};
use bytes::{BufMut, Bytes, BytesMut};
use std::fmt;

use crate::{
    checksum,
    error::{Error, Result},
    instruction::Instruction,
};

/// Packet flag byte, third field of every frame
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum FlagKind {
    /// 0x01, command from host to sensor
    Command,
    /// 0x02, data packet with more to follow
    Data,
    /// 0x07, acknowledge packet from the sensor
    Ack,
    /// 0x08, final data packet
    End,
    /// Any other value; the frame is not interpreted further
    Indeterminate(u8),
}

impl FlagKind {
    /// Decode a wire flag byte.
    pub fn from_wire(byte: u8) -> Self {
        match byte {
            0x01 => Self::Command,
            0x02 => Self::Data,
            0x07 => Self::Ack,
            0x08 => Self::End,
            other => Self::Indeterminate(other),
        }
    }

    /// Get the wire byte for this flag.
    pub fn to_wire(self) -> u8 {
        match self {
            Self::Command => 0x01,
            Self::Data => 0x02,
            Self::Ack => 0x07,
            Self::End => 0x08,
            Self::Indeterminate(other) => other,
        }
    }
}

/// One protocol frame
///
/// # Wire format
///
/// ```text
/// ┌──────────┬───────────┬────────┬───────────┬────────────┬───────────┐
/// │  Header  │  Address  │  Flag  │  Length   │  Payload   │  Checksum │
/// │  2 bytes │  4 bytes  │ 1 byte │  2 bytes  │  N bytes   │  2 bytes  │
/// │ EF 01    │  (BE u32) │        │  (BE u16) │            │  (BE u16) │
/// └──────────┴───────────┴────────┴───────────┴────────────┴───────────┘
/// ```
///
/// The length field counts the payload plus the two checksum bytes. The
/// checksum is the 16-bit wrapping sum of flag, length and payload bytes.
///
/// # Examples
///
/// ```
/// use as108m_core::{Frame, FlagKind, Instruction, constants::DEFAULT_ADDRESS};
///
/// let frame = Frame::command(DEFAULT_ADDRESS, Instruction::GetImage, &[]).unwrap();
/// let encoded = frame.encode();
///
/// let decoded = Frame::parse(&encoded, DEFAULT_ADDRESS).unwrap();
/// assert_eq!(decoded.flag, FlagKind::Command);
/// assert_eq!(decoded.payload.as_ref(), &[0x01]);
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct Frame {
    /// Device address carried by the frame
    pub address: u32,

    /// Packet flag
    pub flag: FlagKind,

    /// Payload bytes (instruction + parameters, or confirmation + data)
    pub payload: Bytes,
}

impl Frame {
    /// Frame magic header
    pub const HEADER: [u8; 2] = [0xEF, 0x01];

    /// Maximum payload size
    pub const MAX_PAYLOAD: usize = 31;

    /// Smallest possible wire frame: header, address, flag, length, checksum
    pub const MIN_WIRE_SIZE: usize = 11;

    /// Offset of the payload within a wire frame
    const PAYLOAD_OFFSET: usize = 9;

    /// Create a frame, enforcing the payload capacity.
    pub fn new(address: u32, flag: FlagKind, payload: impl Into<Bytes>) -> Result<Self> {
        let payload = payload.into();
        if payload.len() > Self::MAX_PAYLOAD {
            return Err(Error::PayloadTooLarge {
                size: payload.len(),
                max: Self::MAX_PAYLOAD,
            });
        }

        Ok(Self {
            address,
            flag,
            payload,
        })
    }

    /// Create a command frame for an instruction and its parameters.
    pub fn command(address: u32, instruction: Instruction, params: &[u8]) -> Result<Self> {
        let mut payload = BytesMut::with_capacity(1 + params.len());
        payload.put_u8(instruction.into());
        payload.put_slice(params);

        Self::new(address, FlagKind::Command, payload.freeze())
    }

    /// Declared length field value: payload plus the two checksum bytes.
    pub fn declared_len(&self) -> u16 {
        (self.payload.len() + 2) as u16
    }

    /// Encode the frame to wire bytes.
    pub fn encode(&self) -> BytesMut {
        let mut buf = BytesMut::with_capacity(Self::MIN_WIRE_SIZE + self.payload.len());

        buf.put_slice(&Self::HEADER);
        buf.put_u32(self.address);
        buf.put_u8(self.flag.to_wire());
        buf.put_u16(self.declared_len());
        buf.put_slice(&self.payload);
        buf.put_u16(checksum::frame_sum(
            self.flag.to_wire(),
            self.declared_len(),
            &self.payload,
        ));

        buf
    }

    /// Decode and validate a frame from wire bytes.
    ///
    /// Checks run in wire order and stop at the first failure: header magic,
    /// address, flag, declared length, checksum. An unrecognized flag byte
    /// ends the parse early with [`FlagKind::Indeterminate`] and an empty
    /// payload; the checksum is not validated in that case.
    ///
    /// # Errors
    ///
    /// [`Error::AddressMismatch`] retains the received address so a
    /// forgotten device address can be recovered from the reply.
    pub fn parse(raw: &[u8], expected_address: u32) -> Result<Self> {
        if raw.len() < Self::MIN_WIRE_SIZE {
            return Err(Error::Truncated {
                expected: Self::MIN_WIRE_SIZE,
                actual: raw.len(),
            });
        }

        if raw[0..2] != Self::HEADER {
            return Err(Error::InvalidHeader {
                found: [raw[0], raw[1]],
            });
        }

        let address = BigEndian::read_u32(&raw[2..6]);
        if address != expected_address {
            return Err(Error::AddressMismatch {
                expected: expected_address,
                received: address,
            });
        }

        let flag = FlagKind::from_wire(raw[6]);
        if let FlagKind::Indeterminate(_) = flag {
            return Ok(Self {
                address,
                flag,
                payload: Bytes::new(),
            });
        }

        let declared = BigEndian::read_u16(&raw[7..9]);
        if declared < 2 {
            return Err(Error::Truncated {
                expected: 2,
                actual: declared as usize,
            });
        }

        let payload_len = declared as usize - 2;
        if payload_len > Self::MAX_PAYLOAD {
            return Err(Error::PayloadTooLarge {
                size: payload_len,
                max: Self::MAX_PAYLOAD,
            });
        }

        let total = Self::PAYLOAD_OFFSET + payload_len + 2;
        if raw.len() < total {
            return Err(Error::Truncated {
                expected: total,
                actual: raw.len(),
            });
        }

        let payload =
            Bytes::copy_from_slice(&raw[Self::PAYLOAD_OFFSET..Self::PAYLOAD_OFFSET + payload_len]);

        let calculated = checksum::frame_sum(raw[6], declared, &payload);
        let received = BigEndian::read_u16(&raw[Self::PAYLOAD_OFFSET + payload_len..total]);
        if calculated != received {
            return Err(Error::ChecksumMismatch {
                expected: calculated,
                received,
            });
        }

        Ok(Self {
            address,
            flag,
            payload,
        })
    }

    /// First payload byte of a reply, the confirmation code.
    pub fn confirmation(&self) -> Option<u8> {
        self.payload.first().copied()
    }

    /// Total size of the frame on the wire.
    pub fn wire_len(&self) -> usize {
        Self::MIN_WIRE_SIZE + self.payload.len()
    }
}

impl fmt::Debug for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Frame")
            .field("address", &format!("0x{:08X}", self.address))
            .field("flag", &self.flag)
            .field("payload", &hex::encode(&self.payload))
            .finish()
    }
}
