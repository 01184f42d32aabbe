//! Camera session management.
//!
//! A session covers one device attachment: the control handshake that starts
//! the stream, the polling loop over the bulk endpoints, and frame dispatch
//! to the output sinks. The [`Transport`] trait isolates the USB plumbing so
//! the whole session is testable in memory.

mod runner;
mod state;
pub(crate) mod transport;

pub use runner::{Session, SessionEnd};
pub use state::SessionState;
pub use transport::{
    ControlRequest, Transport, TransportError, AUX_TIMEOUT, ENDPOINT_DATA, ENDPOINT_FILEIO,
    ENDPOINT_STATUS, TRANSFER_TIMEOUT,
};
