//! High-level sensor session
//!
//! [`Sensor`] owns the transport and addressing state and implements every
//! public operation as a scripted sequence of framed exchanges. Each step
//! sends one command, reads one reply, and branches on the classified
//! confirmation byte: success continues the script, a step-specific known
//! fault aborts the whole operation with that status, and any other code
//! aborts with [`Status::UnknownError`]. Nothing is retried automatically
//! except the finger-presence polls, which are bounded by [`RetryPolicy`].

use std::time::Duration;

use byteorder::{BigEndian, ByteOrder};
use tokio::time::sleep;
use tracing::{debug, info, trace, warn};

use as108m_core::{
    constants::{buffers, enroll, registers, search, DEFAULT_ADDRESS, DEFAULT_TIMEOUT},
    Error as CoreError, Frame, Instruction, Status,
};
use as108m_transport::Transport;
use as108m_types::{
    BaudRate, Error as TypesError, Prompt, SearchResult, SensorEvent, SystemParameters,
};

use crate::error::{Error, Result};

/// Bound on the finger-presence polls
///
/// The sensor is waiting on a human during capture and removal, so the
/// driver polls with a delay between attempts; the bound guarantees the
/// wait terminates even if the hardware never reports a finger.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    /// Maximum image-capture polls per wait
    pub max_attempts: u32,

    /// Delay between polls
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 25,
            delay: Duration::from_millis(200),
        }
    }
}

type EventHandler = Box<dyn FnMut(SensorEvent) + Send>;

/// Faults each encode step can legitimately report
const ENCODE_FAULTS: &[Status] = &[
    Status::PacketReceiveError,
    Status::ImageTooAmorphous,
    Status::TooFewMinutiae,
    Status::NoValidImage,
];

/// AS108M sensor session
///
/// One logical caller drives a session at a time; every operation runs its
/// exchanges strictly sequentially on `&mut self`.
///
/// # Examples
///
/// ```no_run
/// use as108m::{Sensor, StreamTransport};
/// use tokio::net::TcpStream;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     // A ser2net-style bridge exposing the sensor's serial port
///     let stream = TcpStream::connect("192.168.4.21:3333").await?;
///     let mut sensor = Sensor::new(StreamTransport::new(stream));
///
///     sensor.probe().await?;
///
///     let result = sensor.search().await?;
///     if result.matched {
///         println!("hello, page {} (score {})", result.page_id, result.score);
///     }
///     Ok(())
/// }
/// ```
pub struct Sensor {
    transport: Box<dyn Transport>,
    address: u32,
    replied_address: Option<u32>,
    timeout: Duration,
    retry: RetryPolicy,
    handler: Option<EventHandler>,
}

impl Sensor {
    /// Create a session over an already-open transport.
    ///
    /// The address defaults to the broadcast value `0xFFFFFFFF`.
    pub fn new(transport: impl Transport + 'static) -> Self {
        Self {
            transport: Box::new(transport),
            address: DEFAULT_ADDRESS,
            replied_address: None,
            timeout: DEFAULT_TIMEOUT,
            retry: RetryPolicy::default(),
            handler: None,
        }
    }

    /// Set the target device address.
    pub fn with_address(mut self, address: u32) -> Self {
        self.address = address;
        self
    }

    /// Set the receive timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the finger-poll bound.
    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Install an event handler for prompts and faults.
    pub fn on_event(mut self, handler: impl FnMut(SensorEvent) + Send + 'static) -> Self {
        self.handler = Some(Box::new(handler));
        self
    }

    /// Address this session targets.
    pub fn target_address(&self) -> u32 {
        self.address
    }

    /// Address carried by the most recent reply, if any.
    ///
    /// Retained even when it rejected the exchange, so a forgotten device
    /// address can be recovered by probing at broadcast.
    pub fn replied_address(&self) -> Option<u32> {
        self.replied_address
    }

    /// Check that the sensor answers at the session address.
    ///
    /// Purges stale input first (the sensor emits 0x55 once after
    /// power-up), then issues a cancel and expects a clean confirmation.
    /// Safe to call repeatedly.
    pub async fn probe(&mut self) -> Result<()> {
        debug!("probing sensor at 0x{:08X}", self.address);

        self.transport.purge().await?;
        self.checked(Instruction::Cancel, &[], &[]).await?;

        info!("sensor responding at 0x{:08X}", self.address);
        Ok(())
    }

    /// Capture the presented finger and search the template database.
    ///
    /// A no-match outcome is returned as an `Ok` result with
    /// `matched == false` and the reporting status; only faults are errors.
    pub async fn search(&mut self) -> Result<SearchResult> {
        debug!("searching database for presented finger");

        self.capture_finger().await?;
        self.checked(Instruction::GetChar, &[buffers::CHAR_BUFFER_1], ENCODE_FAULTS)
            .await?;

        let [start_hi, start_lo] = search::START_PAGE.to_be_bytes();
        let [count_hi, count_lo] = search::PAGE_COUNT.to_be_bytes();
        let params = [buffers::CHAR_BUFFER_1, start_hi, start_lo, count_hi, count_lo];

        let (status, reply) = self.confirmed(Instruction::Search, &params).await?;
        match status {
            Status::Success => {
                let payload = reply.payload.as_ref();
                if payload.len() < 5 {
                    return Err(self.fault(Status::InvalidResponse));
                }
                // Page ids stay within one byte over the scanned range
                let hit = SearchResult::hit(payload[2], BigEndian::read_u16(&payload[3..5]));
                debug!("search hit: {}", hit);
                Ok(hit)
            }
            Status::NotFound => {
                self.notify(SensorEvent::Fault(Status::NotFound));
                Ok(SearchResult::no_match(Status::NotFound))
            }
            Status::PacketReceiveError => Err(self.fault(status)),
            _ => Err(self.fault(Status::UnknownError)),
        }
    }

    /// Capture the presented finger and match it against one stored page.
    ///
    /// Loads the stored template into char buffer 2 and matches it against
    /// the freshly encoded capture; the result echoes the queried page id.
    pub async fn match_finger(&mut self, page_id: u8) -> Result<SearchResult> {
        debug!("matching presented finger against page {}", page_id);

        self.capture_finger().await?;
        self.checked(Instruction::GetChar, &[buffers::CHAR_BUFFER_1], ENCODE_FAULTS)
            .await?;
        self.checked(
            Instruction::LoadChar,
            &[buffers::CHAR_BUFFER_2, 0x00, page_id],
            &[
                Status::PacketReceiveError,
                Status::PageOutOfRange,
                Status::TemplateReadError,
            ],
        )
        .await?;

        let (status, reply) = self.confirmed(Instruction::Match, &[]).await?;
        match status {
            Status::Success => {
                let payload = reply.payload.as_ref();
                if payload.len() < 3 {
                    return Err(self.fault(Status::InvalidResponse));
                }
                Ok(SearchResult::hit(page_id, BigEndian::read_u16(&payload[1..3])))
            }
            Status::NoMatch => {
                self.notify(SensorEvent::Fault(Status::NoMatch));
                Ok(SearchResult::no_match(Status::NoMatch))
            }
            Status::PacketReceiveError => Err(self.fault(status)),
            _ => Err(self.fault(Status::UnknownError)),
        }
    }

    /// Enroll a fingerprint at a database page from several samples.
    ///
    /// For each sample the handler is prompted to touch the sensor, the
    /// capture is polled until a finger is present, the image is encoded
    /// into the per-sample char buffer, and the removal of the finger is
    /// confirmed before the next sample. The samples are then merged into
    /// one template and stored at `page_id`. Any fault aborts the whole
    /// enrollment.
    pub async fn enroll(&mut self, page_id: u8, samples: u8) -> Result<()> {
        if samples == 0 || samples > enroll::MAX_SAMPLES {
            return Err(TypesError::InvalidSampleCount(samples).into());
        }

        debug!("enrolling page {} from {} samples", page_id, samples);

        for sample in 1..=samples {
            debug!("sample {}/{}", sample, samples);

            self.notify(SensorEvent::Prompt(Prompt::TouchSensor));
            self.capture_finger().await?;
            self.checked(Instruction::GetChar, &[sample], ENCODE_FAULTS).await?;

            self.notify(SensorEvent::Prompt(Prompt::RemoveFinger));
            self.wait_finger_removed().await?;
        }

        self.checked(
            Instruction::RegModel,
            &[],
            &[Status::PacketReceiveError, Status::MergeFailed],
        )
        .await?;
        self.checked(
            Instruction::StoreChar,
            &[buffers::CHAR_BUFFER_1, 0x00, page_id],
            &[
                Status::PacketReceiveError,
                Status::PageOutOfRange,
                Status::FlashError,
            ],
        )
        .await?;

        info!("enrolled template at page {}", page_id);
        Ok(())
    }

    /// Delete one stored template.
    pub async fn delete_template(&mut self, page_id: u8) -> Result<()> {
        debug!("deleting template at page {}", page_id);

        self.checked(
            Instruction::DeleteChar,
            &[0x00, page_id, 0x00, 0x01],
            &[Status::PacketReceiveError, Status::DeleteFailed],
        )
        .await?;
        Ok(())
    }

    /// Clear the whole template database.
    pub async fn empty_database(&mut self) -> Result<()> {
        warn!("clearing fingerprint database");

        self.checked(
            Instruction::Empty,
            &[],
            &[Status::PacketReceiveError, Status::ClearFailed],
        )
        .await?;
        Ok(())
    }

    /// Read the system parameter block.
    pub async fn read_parameters(&mut self) -> Result<SystemParameters> {
        let (status, reply) = self.confirmed(Instruction::ReadSysParameter, &[]).await?;
        match status {
            Status::Success => {
                let params = SystemParameters::parse(&reply.payload)?;
                debug!("system parameters: {}", params);
                Ok(params)
            }
            Status::PacketReceiveError => Err(self.fault(status)),
            _ => Err(self.fault(Status::UnknownError)),
        }
    }

    /// Fingerprint database capacity in templates.
    pub async fn database_size(&mut self) -> Result<u16> {
        Ok(self.read_parameters().await?.database_size)
    }

    /// Device address stored in the register block.
    pub async fn device_address(&mut self) -> Result<u32> {
        Ok(self.read_parameters().await?.address)
    }

    /// Configured serial speed in bits per second.
    pub async fn baud_rate(&mut self) -> Result<u32> {
        Ok(self.read_parameters().await?.baud_rate())
    }

    /// Configured security level (match threshold), 0-5.
    pub async fn match_threshold(&mut self) -> Result<u8> {
        Ok(self.read_parameters().await?.security_level)
    }

    /// Set the security level (match threshold), 0-5.
    pub async fn set_match_threshold(&mut self, level: u8) -> Result<()> {
        if level > 5 {
            return Err(TypesError::InvalidSecurityLevel(level).into());
        }

        debug!("setting match threshold to {}", level);
        self.write_register(registers::SECURITY_LEVEL, level).await
    }

    /// Set the serial speed.
    ///
    /// The sensor switches speed after replying; reopen the port at the new
    /// rate before the next exchange.
    pub async fn set_baud_rate(&mut self, baud: BaudRate) -> Result<()> {
        debug!("setting baud rate to {}", baud);
        self.write_register(registers::BAUD_CONTROL, baud.multiplier()).await
    }

    /// Rewrite the device address.
    ///
    /// On success the session address follows the device, so subsequent
    /// exchanges keep validating replies.
    pub async fn set_address(&mut self, new_address: u32) -> Result<()> {
        debug!(
            "rewriting device address 0x{:08X} -> 0x{:08X}",
            self.address, new_address
        );

        self.checked(
            Instruction::SetChipAddress,
            &new_address.to_be_bytes(),
            &[Status::PacketReceiveError],
        )
        .await?;

        self.address = new_address;
        Ok(())
    }

    // Sequencing helpers

    /// Poll image capture until a finger is present.
    async fn capture_finger(&mut self) -> Result<()> {
        for _ in 0..self.retry.max_attempts {
            let (status, _) = self.confirmed(Instruction::GetImage, &[]).await?;
            match status {
                Status::Success => return Ok(()),
                Status::NoFinger => sleep(self.retry.delay).await,
                Status::PacketReceiveError | Status::ImageCaptureFailed => {
                    return Err(self.fault(status))
                }
                _ => return Err(self.fault(Status::UnknownError)),
            }
        }

        Err(self.finger_timeout())
    }

    /// Poll image capture until the sensor reports no finger.
    async fn wait_finger_removed(&mut self) -> Result<()> {
        for _ in 0..self.retry.max_attempts {
            let (status, _) = self.confirmed(Instruction::GetImage, &[]).await?;
            match status {
                Status::NoFinger => return Ok(()),
                Status::Success => sleep(self.retry.delay).await,
                Status::PacketReceiveError | Status::ImageCaptureFailed => {
                    return Err(self.fault(status))
                }
                _ => return Err(self.fault(Status::UnknownError)),
            }
        }

        Err(self.finger_timeout())
    }

    async fn write_register(&mut self, register: u8, value: u8) -> Result<()> {
        self.checked(
            Instruction::WriteReg,
            &[register, value],
            &[Status::PacketReceiveError, Status::InvalidRegister],
        )
        .await?;
        Ok(())
    }

    /// One full exchange expecting a clean confirmation.
    ///
    /// A fault in `known` aborts with that status, anything else with
    /// [`Status::UnknownError`].
    async fn checked(
        &mut self,
        instruction: Instruction,
        params: &[u8],
        known: &[Status],
    ) -> Result<Frame> {
        let (status, reply) = self.confirmed(instruction, params).await?;

        if status.is_success() {
            return Ok(reply);
        }
        if known.contains(&status) {
            Err(self.fault(status))
        } else {
            Err(self.fault(Status::UnknownError))
        }
    }

    /// One full exchange, returning the classified confirmation.
    async fn confirmed(
        &mut self,
        instruction: Instruction,
        params: &[u8],
    ) -> Result<(Status, Frame)> {
        let request = Frame::command(self.address, instruction, params)?;

        match self.exchange(request).await {
            Ok(reply) => {
                // Indeterminate flags parse to an empty payload
                let Some(code) = reply.confirmation() else {
                    return Err(self.fault(Status::NoResponse));
                };
                Ok((Status::from_code(code), reply))
            }
            Err(e) => {
                self.notify(SensorEvent::Fault(e.status()));
                Err(e)
            }
        }
    }

    /// Send one frame and parse its reply, tracking the replied address.
    async fn exchange(&mut self, request: Frame) -> Result<Frame> {
        trace!("sending {:?}", request);
        self.transport.send(&request.encode()).await?;

        let raw = self.transport.receive(self.timeout).await?;
        match Frame::parse(&raw, self.address) {
            Ok(reply) => {
                self.replied_address = Some(reply.address);
                trace!("received {:?}", reply);
                Ok(reply)
            }
            Err(e) => {
                if let CoreError::AddressMismatch { received, .. } = &e {
                    self.replied_address = Some(*received);
                }
                warn!("reply rejected: {}", e);
                Err(e.into())
            }
        }
    }

    fn fault(&mut self, status: Status) -> Error {
        warn!("operation aborted: {}", status);
        self.notify(SensorEvent::Fault(status));
        Error::Fault(status)
    }

    fn finger_timeout(&mut self) -> Error {
        let attempts = self.retry.max_attempts;
        warn!("no finger after {} polls", attempts);
        self.notify(SensorEvent::Fault(Status::NoFinger));
        Error::FingerWaitTimeout { attempts }
    }

    fn notify(&mut self, event: SensorEvent) {
        if let Some(handler) = self.handler.as_mut() {
            handler(event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use as108m_transport::StreamTransport;

    #[tokio::test]
    async fn test_sensor_defaults() {
        let (host, _device) = tokio::io::duplex(64);
        let sensor = Sensor::new(StreamTransport::new(host));

        assert_eq!(sensor.target_address(), DEFAULT_ADDRESS);
        assert_eq!(sensor.replied_address(), None);
    }

    #[tokio::test]
    async fn test_builder_configuration() {
        let (host, _device) = tokio::io::duplex(64);
        let sensor = Sensor::new(StreamTransport::new(host))
            .with_address(0x0000_0001)
            .with_timeout(Duration::from_millis(100))
            .with_retry_policy(RetryPolicy {
                max_attempts: 3,
                delay: Duration::from_millis(1),
            });

        assert_eq!(sensor.target_address(), 0x0000_0001);
    }
}
