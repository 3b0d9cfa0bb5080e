//! # as108m-core
//!
//! Core protocol implementation for the AS108M capacitive fingerprint
//! sensor.
//!
//! This crate provides the low-level protocol primitives:
//! - Frame structure and encoding/decoding
//! - Checksum calculation
//! - Instruction definitions
//! - Response status catalog
//! - Protocol constants

pub mod checksum;
pub mod constants;
pub mod error;
pub mod frame;
pub mod instruction;
pub mod status;

pub use error::{Error, Result};
pub use frame::{FlagKind, Frame};
pub use instruction::Instruction;
pub use status::Status;
