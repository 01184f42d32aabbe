//! Streaming session: handshake, polling loop, frame dispatch.

use std::thread;
use std::time::Duration;

use tracing::{debug, info, trace, warn};

use super::state::SessionState;
use super::transport::{
    Transport, TransportError, AUX_TIMEOUT, ENDPOINT_DATA, ENDPOINT_FILEIO, ENDPOINT_STATUS,
    TRANSFER_TIMEOUT,
};
use crate::decode::FrameDecoder;
use crate::sink::FrameSink;
use crate::wire::{FeedResult, FrameAssembler, DEFAULT_CAPACITY};
use crate::{Result, ThermalError};

/// Backoff after a novel streaming error before polling again.
const ERROR_BACKOFF: Duration = Duration::from_secs(1);

/// Why a session ended without a fatal error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEnd {
    /// The device left the bus; the caller may wait for it to reappear.
    DeviceRemoved,
}

/// One camera session: owns the transport, feeds decoded frames to the sink.
pub struct Session<T, S> {
    transport: T,
    decoder: FrameDecoder,
    sink: S,
    assembler: FrameAssembler,
    /// Thermal frames still to drop after a flat-field correction.
    suppress_thermal: u8,
    last_stream_error: Option<String>,
}

impl<T: Transport, S: FrameSink> Session<T, S> {
    pub fn new(transport: T, decoder: FrameDecoder, sink: S) -> Self {
        Self {
            transport,
            decoder,
            sink,
            assembler: FrameAssembler::new(),
            suppress_thermal: 0,
            last_stream_error: None,
        }
    }

    /// Run the session to completion: handshake, then poll until the device
    /// is removed or a fatal error occurs.
    pub fn run(&mut self) -> Result<SessionEnd> {
        if let Some(end) = self.handshake()? {
            return Ok(end);
        }
        info!("stream started");
        self.stream()
    }

    /// Walk the control handshake. `Ok(Some(_))` means the device vanished
    /// mid-handshake.
    fn handshake(&mut self) -> Result<Option<SessionEnd>> {
        let mut state = SessionState::initial();
        while let Some((request, next)) = state.step() {
            debug!(?state, value = request.value, index = request.index, "control transfer");
            match self.transport.control(request) {
                Ok(()) => state = next,
                Err(TransportError::Disconnected) => return Ok(Some(SessionEnd::DeviceRemoved)),
                Err(e) => return Err(ThermalError::transport("handshake", e)),
            }
        }
        Ok(None)
    }

    fn stream(&mut self) -> Result<SessionEnd> {
        let mut buf = vec![0u8; DEFAULT_CAPACITY];
        loop {
            match self.transport.read_bulk(ENDPOINT_DATA, &mut buf, TRANSFER_TIMEOUT) {
                Ok(0) => {}
                Ok(n) => self.ingest(&buf[..n])?,
                Err(TransportError::Disconnected) => {
                    info!("device removed, ending session");
                    return Ok(SessionEnd::DeviceRemoved);
                }
                Err(e) => {
                    if self.note_stream_error(&e.to_string()) {
                        thread::sleep(ERROR_BACKOFF);
                    }
                }
            }

            // Aux endpoints must be drained or the device stalls the data
            // endpoint. Their payloads carry nothing we use, but they are the
            // removal probe, so they run on error passes too.
            for endpoint in [ENDPOINT_STATUS, ENDPOINT_FILEIO] {
                match self.transport.read_bulk(endpoint, &mut buf, AUX_TIMEOUT) {
                    Ok(n) if n > 0 => trace!(endpoint, bytes = n, "discarded aux payload"),
                    Ok(_) => {}
                    Err(TransportError::Disconnected) => {
                        info!("device removed, ending session");
                        return Ok(SessionEnd::DeviceRemoved);
                    }
                    Err(e) => trace!(endpoint, error = %e, "aux poll failed"),
                }
            }
        }
    }

    /// Feed one bulk chunk into the assembler and dispatch any completed
    /// frame. Decode failures skip the frame; only sink failures propagate.
    fn ingest(&mut self, chunk: &[u8]) -> Result<()> {
        match self.assembler.feed(chunk) {
            FeedResult::Accumulating => Ok(()),
            FeedResult::Resync => Ok(()),
            FeedResult::Frame(frame) => {
                let decoded = match self.decoder.decode(&frame) {
                    Ok(decoded) => decoded,
                    Err(e) if !e.is_fatal() => {
                        warn!(error = %e, "skipping undecodable frame");
                        return Ok(());
                    }
                    Err(e) => return Err(e),
                };

                self.sink.write_visible(&decoded.visible)?;

                // A flat-field correction blanks the sensor; the marked frame
                // and the one after it carry garbage thermal data.
                if decoded.ffc_marked {
                    debug!("flat-field correction, suppressing thermal output");
                    self.suppress_thermal = 2;
                }
                if self.suppress_thermal > 0 {
                    self.suppress_thermal -= 1;
                } else {
                    self.sink.write_thermal(&decoded.thermal_rgb)?;
                }
                Ok(())
            }
        }
    }

    /// Record a streaming error, returning whether it differs from the last
    /// one (repeats are silent; a changed message is logged and backed off).
    fn note_stream_error(&mut self, message: &str) -> bool {
        if self.last_stream_error.as_deref() == Some(message) {
            return false;
        }
        warn!(error = message, "bulk transfer failed");
        self.last_stream_error = Some(message.to_owned());
        true
    }
}
