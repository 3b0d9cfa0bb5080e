//! Session events
//!
//! The driver reports user-facing checkpoints through an injected handler:
//! prompts during enrollment and every fault that aborts an operation. The
//! handler is a side channel for UI feedback, not part of the protocol
//! state.

use std::fmt;

use as108m_core::Status;

/// User prompt reached during a multi-step operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Prompt {
    /// Waiting for a finger on the sensor
    TouchSensor,
    /// Waiting for the finger to be lifted
    RemoveFinger,
}

/// Notification delivered to the session event handler
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensorEvent {
    /// A prompt state was reached
    Prompt(Prompt),
    /// A step reported a fault
    Fault(Status),
}

impl fmt::Display for SensorEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Prompt(Prompt::TouchSensor) => write!(f, "touch the sensor"),
            Self::Prompt(Prompt::RemoveFinger) => write!(f, "remove finger"),
            Self::Fault(status) => write!(f, "fault: {}", status),
        }
    }
}
