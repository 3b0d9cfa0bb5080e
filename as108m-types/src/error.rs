pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid security level {0} (valid: 0-5)")]
    InvalidSecurityLevel(u8),

    #[error("invalid baud multiplier {0} (valid: 1-12)")]
    InvalidBaudMultiplier(u8),

    #[error("invalid sample count {0} (valid: 1-5)")]
    InvalidSampleCount(u8),

    #[error("system parameter block too short: {0} bytes")]
    ParameterBlockTooShort(usize),
}
