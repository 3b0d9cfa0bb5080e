//! Type definitions for the as108m driver

pub mod baud;
pub mod error;
pub mod event;
pub mod params;
pub mod search;

pub use baud::BaudRate;
pub use error::{Error, Result};
pub use event::{Prompt, SensorEvent};
pub use params::{SystemParameters, SystemStatus};
pub use search::SearchResult;
