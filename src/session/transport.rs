//! Transport abstraction over the camera's USB endpoints.
//!
//! The session logic talks to the device exclusively through [`Transport`],
//! which keeps the handshake and streaming loop testable against in-memory
//! fakes and keeps the `rusb` dependency behind the `usb` feature.

use std::time::Duration;

use thiserror::Error;

/// Bulk endpoint carrying the frame stream.
pub const ENDPOINT_DATA: u8 = 0x85;
/// Auxiliary status endpoint, polled and discarded.
pub const ENDPOINT_STATUS: u8 = 0x81;
/// Auxiliary file-I/O endpoint, polled and discarded.
pub const ENDPOINT_FILEIO: u8 = 0x83;

/// Vendor request type for start/stop control transfers.
pub const CONTROL_REQUEST_TYPE: u8 = 0x01;
/// Vendor request code for start/stop control transfers.
pub const CONTROL_REQUEST: u8 = 0x0b;
/// `wIndex` selecting the file-I/O function.
pub const INDEX_FILEIO: u16 = 1;
/// `wIndex` selecting the video-stream function.
pub const INDEX_VIDEO: u16 = 2;

/// Timeout for control transfers and bulk data reads. The device drops the
/// handshake when control transfers take longer, so this value is part of
/// the protocol, not a tunable.
pub const TRANSFER_TIMEOUT: Duration = Duration::from_millis(100);
/// Timeout for the auxiliary endpoint polls.
pub const AUX_TIMEOUT: Duration = Duration::from_millis(10);

/// Low-level transfer failures, as reported by the concrete transport.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum TransportError {
    /// The device left the bus. Ends the session rather than retrying.
    #[error("device disconnected")]
    Disconnected,

    /// A bulk transfer failed for a reason other than timeout.
    #[error("bulk transfer failed: {0}")]
    Transfer(String),

    /// A control transfer failed or was rejected.
    #[error("control transfer failed: {0}")]
    Control(String),
}

/// One vendor control transfer of the start/stop handshake.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControlRequest {
    pub value: u16,
    pub index: u16,
    /// Payload length; the bytes themselves are always zero.
    pub data_len: usize,
    pub timeout: Duration,
}

impl ControlRequest {
    /// Stop the function selected by `index`.
    pub fn stop(index: u16) -> Self {
        Self { value: 0, index, data_len: 0, timeout: TRANSFER_TIMEOUT }
    }

    /// Start the function selected by `index`.
    pub fn start(index: u16) -> Self {
        Self { value: 1, index, data_len: 0, timeout: TRANSFER_TIMEOUT }
    }

    /// Start the video stream. Carries a two-byte zero payload and a doubled
    /// timeout; the device needs both to begin emitting frames.
    pub fn start_stream() -> Self {
        Self { value: 1, index: INDEX_VIDEO, data_len: 2, timeout: TRANSFER_TIMEOUT * 2 }
    }
}

/// Device channel used by the session.
pub trait Transport {
    /// Issue one vendor control transfer.
    fn control(&mut self, request: ControlRequest) -> Result<(), TransportError>;

    /// Read from a bulk endpoint into `buf`, returning the number of bytes
    /// received. A timeout with no data is `Ok(0)`, not an error.
    fn read_bulk(
        &mut self,
        endpoint: u8,
        buf: &mut [u8],
        timeout: Duration,
    ) -> Result<usize, TransportError>;
}
