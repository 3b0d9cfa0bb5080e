//! High-level error types

use as108m_core::Status;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Protocol error: {0}")]
    Core(#[from] as108m_core::Error),

    #[error("Transport error: {0}")]
    Transport(#[from] as108m_transport::Error),

    #[error("Invalid value: {0}")]
    Types(#[from] as108m_types::Error),

    #[error("Sensor fault: {0}")]
    Fault(Status),

    #[error("No finger detected after {attempts} capture polls")]
    FingerWaitTimeout { attempts: u32 },
}

impl Error {
    /// Project the error onto the response status taxonomy.
    ///
    /// Every failure an operation can return maps to exactly one [`Status`],
    /// so callers that only care about the classified outcome have a single
    /// channel to inspect.
    pub fn status(&self) -> Status {
        match self {
            Self::Core(e) => e.status(),
            Self::Transport(as108m_transport::Error::ReadTimeout) => Status::ReceiveTimeout,
            Self::Transport(_) => Status::NoResponse,
            Self::Types(_) => Status::UnknownError,
            Self::Fault(status) => *status,
            Self::FingerWaitTimeout { .. } => Status::NoFinger,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_projection() {
        assert_eq!(
            Error::Transport(as108m_transport::Error::ReadTimeout).status(),
            Status::ReceiveTimeout
        );
        assert_eq!(Error::Fault(Status::DatabaseFull).status(), Status::DatabaseFull);
        assert_eq!(
            Error::FingerWaitTimeout { attempts: 25 }.status(),
            Status::NoFinger
        );
    }
}
