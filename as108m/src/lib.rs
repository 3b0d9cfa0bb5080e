//! # as108m
//!
//! Driver for the AS108M capacitive fingerprint sensor.
//!
//! The sensor speaks a fixed binary framing protocol over a byte-oriented
//! serial transport. This crate translates high-level operations — enroll,
//! search, match, delete, configure — into the framed request/response
//! exchanges the sensor expects, and classifies every reply onto a typed
//! status taxonomy.
//!
//! ## Features
//!
//! - Bit-exact frame codec with bounds-checked buffers
//! - Full response-status catalog
//! - Bounded finger-presence polling
//! - Typed prompt/fault events for UI feedback
//!
//! ## Quick Start
//!
//! ```no_run
//! use as108m::{Sensor, StreamTransport};
//! use tokio::net::TcpStream;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Any AsyncRead + AsyncWrite stream works: a serial port handle
//!     // or, as here, a ser2net-style TCP serial bridge.
//!     let stream = TcpStream::connect("192.168.4.21:3333").await?;
//!     let mut sensor = Sensor::new(StreamTransport::new(stream));
//!
//!     sensor.probe().await?;
//!     println!("database capacity: {}", sensor.database_size().await?);
//!
//!     let result = sensor.search().await?;
//!     if result.matched {
//!         println!("matched page {} with score {}", result.page_id, result.score);
//!     }
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod sensor;

// Re-exports
pub use error::{Error, Result};
pub use sensor::{RetryPolicy, Sensor};

// Re-export protocol and transport types
pub use as108m_core::{FlagKind, Frame, Instruction, Status};
pub use as108m_transport::{StreamTransport, Transport};
pub use as108m_types::{
    BaudRate, Prompt, SearchResult, SensorEvent, SystemParameters, SystemStatus,
};
