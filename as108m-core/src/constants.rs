//! Protocol constants

use std::time::Duration;

/// Broadcast device address, the factory default
pub const DEFAULT_ADDRESS: u32 = 0xFFFF_FFFF;

/// Default receive timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(5000);

/// Settle delay between the first received byte and the drain of the rest
/// of the frame
pub const SETTLE_DELAY: Duration = Duration::from_millis(50);

/// Byte the sensor emits once after power-up
pub const POWER_UP_BYTE: u8 = 0x55;

/// System registers writable through PS_WriteReg
pub mod registers {
    /// Baud rate control, value is a multiplier of 9600 bps
    pub const BAUD_CONTROL: u8 = 4;

    /// Security level (match threshold), 0-5
    pub const SECURITY_LEVEL: u8 = 5;

    /// Data packet length code
    pub const PACKET_LENGTH: u8 = 6;
}

/// On-device feature buffer ids
pub mod buffers {
    /// Char buffer 1, holds the probe feature for search and match
    pub const CHAR_BUFFER_1: u8 = 0x01;

    /// Char buffer 2, holds the stored template during match
    pub const CHAR_BUFFER_2: u8 = 0x02;
}

/// Database scan range used by the search operation
pub mod search {
    /// First page of the scan
    pub const START_PAGE: u16 = 0x0000;

    /// Number of slots scanned from the start page
    pub const PAGE_COUNT: u16 = 0x0028;
}

/// Enrollment limits
pub mod enroll {
    /// Char buffers double as per-sample slots, so at most 5 samples
    pub const MAX_SAMPLES: u8 = 5;

    /// Default number of samples per enrollment
    pub const DEFAULT_SAMPLES: u8 = 5;
}
