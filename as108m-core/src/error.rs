//! Error types for as108m-core

use crate::status::Status;

/// Result type alias for core protocol operations
pub type Result<T> = std::result::Result<T, Error>;

/// Frame parse and construction errors
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Buffer too short for the declared or minimum frame size
    #[error("frame too short: expected at least {expected} bytes, got {actual} bytes")]
    Truncated { expected: usize, actual: usize },

    /// Frame does not start with the protocol magic
    #[error("invalid frame header: {found:02X?}")]
    InvalidHeader { found: [u8; 2] },

    /// Reply address differs from the session address
    #[error("address mismatch: expected 0x{expected:08X}, received 0x{received:08X}")]
    AddressMismatch { expected: u32, received: u32 },

    /// Checksum verification failed
    #[error("checksum mismatch: expected 0x{expected:04X}, received 0x{received:04X}")]
    ChecksumMismatch { expected: u16, received: u16 },

    /// Payload exceeds the frame capacity
    #[error("payload too large: {size} bytes (max: {max} bytes)")]
    PayloadTooLarge { size: usize, max: usize },
}

impl Error {
    /// Project the error onto the response status taxonomy.
    pub fn status(&self) -> Status {
        match self {
            Self::Truncated { .. } | Self::InvalidHeader { .. } | Self::PayloadTooLarge { .. } => {
                Status::InvalidResponse
            }
            Self::AddressMismatch { .. } => Status::AddressMismatch,
            Self::ChecksumMismatch { .. } => Status::BadChecksum,
        }
    }
}
