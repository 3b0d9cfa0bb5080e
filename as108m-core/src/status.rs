//! Response status catalog
//!
//! Every reply frame starts with a confirmation byte. [`Status::from_code`]
//! maps the byte onto the catalog; the variants past the device codes cover
//! transport and sequencing outcomes that have no byte on the wire.

use std::fmt;

/// Classified outcome of a protocol exchange
///
/// Device-reported confirmation codes (0x00-0x1F, 0x21, 0xF0-0xF6), the
/// reserved band (0x20, 0x22-0xEF), and the transport/sequencing
/// meta-states the driver itself raises.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Status {
    /// 0x00, command executed
    Success,
    /// 0x01, data packet receiving error
    PacketReceiveError,
    /// 0x02, no finger on the sensor
    NoFinger,
    /// 0x03, fingerprint image acquisition failed
    ImageCaptureFailed,
    /// 0x04, image too dry or too light to generate a feature
    ImageTooDry,
    /// 0x05, image too humid or too blurry to generate a feature
    ImageTooBlurry,
    /// 0x06, image too amorphous to generate a feature
    ImageTooAmorphous,
    /// 0x07, too few minutiae or too small an area
    TooFewMinutiae,
    /// 0x08, fingerprint unmatched
    NoMatch,
    /// 0x09, no fingerprint found in search
    NotFound,
    /// 0x0A, template merging failed
    MergeFailed,
    /// 0x0B, page address exceeds the database range
    PageOutOfRange,
    /// 0x0C, template reading error or invalid template
    TemplateReadError,
    /// 0x0D, feature upload failed
    FeatureUploadFailed,
    /// 0x0E, module cannot receive continuous data packets
    ContinuousPacketRefused,
    /// 0x0F, image upload failed
    ImageUploadFailed,
    /// 0x10, template deletion failed
    DeleteFailed,
    /// 0x11, database clearing failed
    ClearFailed,
    /// 0x12, cannot enter low power consumption
    LowPowerFailed,
    /// 0x13, incorrect password
    WrongPassword,
    /// 0x14, system reset failed
    ResetFailed,
    /// 0x15, no valid original image in the buffer
    NoValidImage,
    /// 0x16, online upgrade failed
    UpgradeFailed,
    /// 0x17, incomplete fingerprint or finger stayed still between captures
    IncompleteFingerprint,
    /// 0x18, flash read/write error
    FlashError,
    /// 0x19, undefined error
    UndefinedError,
    /// 0x1A, invalid register
    InvalidRegister,
    /// 0x1B, wrong register distributing content number
    RegisterDistributionError,
    /// 0x1C, notepad page appointing error
    NotepadPageError,
    /// 0x1D, port operation failed
    PortOperationFailed,
    /// 0x1E, automatic enroll failed
    AutoEnrollFailed,
    /// 0x1F, fingerprint database full
    DatabaseFull,
    /// 0x21, password verification required
    MustVerifyPassword,
    /// 0xF0, continue-packet instruction, ack with 0xF0
    ContinueAckF0,
    /// 0xF1, continue-packet instruction, ack with 0xF1
    ContinueAckF1,
    /// 0xF2, sum error burning internal flash
    FlashSumError,
    /// 0xF3, packet flag error burning internal flash
    FlashFlagError,
    /// 0xF4, packet length error burning internal flash
    FlashLengthError,
    /// 0xF5, code length too long burning internal flash
    FlashCodeLengthError,
    /// 0xF6, burning internal flash failed
    FlashBurnFailed,
    /// 0x20 or 0x22-0xEF, reserved by the device
    Reserved,
    /// Reply was malformed or the code is outside the catalog
    InvalidResponse,
    /// Reply checksum did not match
    BadChecksum,
    /// Reply address did not match the session address
    AddressMismatch,
    /// No byte arrived within the receive timeout
    ReceiveTimeout,
    /// Reply carried no usable confirmation
    NoResponse,
    /// Confirmation byte not recognized for the current step
    UnknownError,
}

impl Status {
    /// Classify a raw confirmation byte.
    pub fn from_code(code: u8) -> Self {
        match code {
            0x00 => Self::Success,
            0x01 => Self::PacketReceiveError,
            0x02 => Self::NoFinger,
            0x03 => Self::ImageCaptureFailed,
            0x04 => Self::ImageTooDry,
            0x05 => Self::ImageTooBlurry,
            0x06 => Self::ImageTooAmorphous,
            0x07 => Self::TooFewMinutiae,
            0x08 => Self::NoMatch,
            0x09 => Self::NotFound,
            0x0A => Self::MergeFailed,
            0x0B => Self::PageOutOfRange,
            0x0C => Self::TemplateReadError,
            0x0D => Self::FeatureUploadFailed,
            0x0E => Self::ContinuousPacketRefused,
            0x0F => Self::ImageUploadFailed,
            0x10 => Self::DeleteFailed,
            0x11 => Self::ClearFailed,
            0x12 => Self::LowPowerFailed,
            0x13 => Self::WrongPassword,
            0x14 => Self::ResetFailed,
            0x15 => Self::NoValidImage,
            0x16 => Self::UpgradeFailed,
            0x17 => Self::IncompleteFingerprint,
            0x18 => Self::FlashError,
            0x19 => Self::UndefinedError,
            0x1A => Self::InvalidRegister,
            0x1B => Self::RegisterDistributionError,
            0x1C => Self::NotepadPageError,
            0x1D => Self::PortOperationFailed,
            0x1E => Self::AutoEnrollFailed,
            0x1F => Self::DatabaseFull,
            0x21 => Self::MustVerifyPassword,
            0xF0 => Self::ContinueAckF0,
            0xF1 => Self::ContinueAckF1,
            0xF2 => Self::FlashSumError,
            0xF3 => Self::FlashFlagError,
            0xF4 => Self::FlashLengthError,
            0xF5 => Self::FlashCodeLengthError,
            0xF6 => Self::FlashBurnFailed,
            0x20 | 0x22..=0xEF => Self::Reserved,
            _ => Self::InvalidResponse,
        }
    }

    /// Check if this status signals a completed command
    pub fn is_success(self) -> bool {
        matches!(self, Self::Success)
    }

    /// Check if the status came from the device rather than the driver
    pub fn is_device_code(self) -> bool {
        !matches!(
            self,
            Self::InvalidResponse
                | Self::BadChecksum
                | Self::AddressMismatch
                | Self::ReceiveTimeout
                | Self::NoResponse
                | Self::UnknownError
        )
    }

    /// Get a short description of the status
    pub fn description(self) -> &'static str {
        match self {
            Self::Success => "command executed",
            Self::PacketReceiveError => "data packet receiving error",
            Self::NoFinger => "no finger on the sensor",
            Self::ImageCaptureFailed => "fingerprint image acquisition failed",
            Self::ImageTooDry => "image too dry or too light",
            Self::ImageTooBlurry => "image too humid or too blurry",
            Self::ImageTooAmorphous => "image too amorphous",
            Self::TooFewMinutiae => "too few minutiae or too small an area",
            Self::NoMatch => "fingerprint unmatched",
            Self::NotFound => "no fingerprint found in search",
            Self::MergeFailed => "template merging failed",
            Self::PageOutOfRange => "page address exceeds database range",
            Self::TemplateReadError => "template reading error or invalid template",
            Self::FeatureUploadFailed => "feature upload failed",
            Self::ContinuousPacketRefused => "cannot receive continuous data packets",
            Self::ImageUploadFailed => "image upload failed",
            Self::DeleteFailed => "template deletion failed",
            Self::ClearFailed => "database clearing failed",
            Self::LowPowerFailed => "cannot enter low power consumption",
            Self::WrongPassword => "incorrect password",
            Self::ResetFailed => "system reset failed",
            Self::NoValidImage => "no valid original image in buffer",
            Self::UpgradeFailed => "online upgrade failed",
            Self::IncompleteFingerprint => "incomplete or still fingerprint",
            Self::FlashError => "flash read/write error",
            Self::UndefinedError => "undefined error",
            Self::InvalidRegister => "invalid register",
            Self::RegisterDistributionError => "wrong register distributing content number",
            Self::NotepadPageError => "notepad page appointing error",
            Self::PortOperationFailed => "port operation failed",
            Self::AutoEnrollFailed => "automatic enroll failed",
            Self::DatabaseFull => "fingerprint database full",
            Self::MustVerifyPassword => "password verification required",
            Self::ContinueAckF0 => "continue-packet ack 0xF0",
            Self::ContinueAckF1 => "continue-packet ack 0xF1",
            Self::FlashSumError => "sum error burning flash",
            Self::FlashFlagError => "packet flag error burning flash",
            Self::FlashLengthError => "packet length error burning flash",
            Self::FlashCodeLengthError => "code length too long burning flash",
            Self::FlashBurnFailed => "burning flash failed",
            Self::Reserved => "reserved confirmation code",
            Self::InvalidResponse => "invalid response",
            Self::BadChecksum => "bad checksum",
            Self::AddressMismatch => "address mismatch",
            Self::ReceiveTimeout => "receive timeout",
            Self::NoResponse => "no response",
            Self::UnknownError => "unknown error",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.description())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_device_code_mapping() {
        assert_eq!(Status::from_code(0x00), Status::Success);
        assert_eq!(Status::from_code(0x02), Status::NoFinger);
        assert_eq!(Status::from_code(0x08), Status::NoMatch);
        assert_eq!(Status::from_code(0x09), Status::NotFound);
        assert_eq!(Status::from_code(0x1F), Status::DatabaseFull);
        assert_eq!(Status::from_code(0x21), Status::MustVerifyPassword);
        assert_eq!(Status::from_code(0xF6), Status::FlashBurnFailed);
    }

    #[test]
    fn test_reserved_band() {
        assert_eq!(Status::from_code(0x20), Status::Reserved);
        assert_eq!(Status::from_code(0x22), Status::Reserved);
        assert_eq!(Status::from_code(0x80), Status::Reserved);
        assert_eq!(Status::from_code(0xEF), Status::Reserved);
    }

    #[test]
    fn test_unmapped_codes_are_invalid() {
        assert_eq!(Status::from_code(0xF7), Status::InvalidResponse);
        assert_eq!(Status::from_code(0xFF), Status::InvalidResponse);
    }

    #[test]
    fn test_is_success() {
        assert!(Status::Success.is_success());
        assert!(!Status::NoFinger.is_success());
    }

    #[test]
    fn test_is_device_code() {
        assert!(Status::NoFinger.is_device_code());
        assert!(Status::Reserved.is_device_code());
        assert!(!Status::ReceiveTimeout.is_device_code());
        assert!(!Status::UnknownError.is_device_code());
    }
}
