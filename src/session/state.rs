//! Handshake state machine.
//!
//! Before the camera emits frames it must be walked through a fixed control
//! sequence: stop both functions, restart file-I/O, then start the video
//! stream. The machine here is pure; the runner issues the planned transfers.

use super::transport::{ControlRequest, INDEX_FILEIO, INDEX_VIDEO};

/// Position in the start-up handshake.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    StopVideo,
    StopFileio,
    StartFileio,
    StartVideo,
    /// Handshake done; the device is emitting frames.
    Streaming,
}

impl SessionState {
    /// Entry point of the handshake.
    pub fn initial() -> Self {
        SessionState::StopVideo
    }

    /// The control transfer to issue in this state and the state that
    /// follows, or `None` once streaming.
    pub fn step(self) -> Option<(ControlRequest, SessionState)> {
        match self {
            SessionState::StopVideo => {
                Some((ControlRequest::stop(INDEX_VIDEO), SessionState::StopFileio))
            }
            SessionState::StopFileio => {
                Some((ControlRequest::stop(INDEX_FILEIO), SessionState::StartFileio))
            }
            SessionState::StartFileio => {
                Some((ControlRequest::start(INDEX_FILEIO), SessionState::StartVideo))
            }
            SessionState::StartVideo => {
                Some((ControlRequest::start_stream(), SessionState::Streaming))
            }
            SessionState::Streaming => None,
        }
    }

    pub fn is_streaming(self) -> bool {
        self == SessionState::Streaming
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::transport::TRANSFER_TIMEOUT;

    #[test]
    fn handshake_walks_stop_stop_start_start() {
        let mut state = SessionState::initial();
        let mut requests = Vec::new();
        while let Some((request, next)) = state.step() {
            requests.push(request);
            state = next;
        }
        assert!(state.is_streaming());

        assert_eq!(
            requests,
            vec![
                ControlRequest::stop(INDEX_VIDEO),
                ControlRequest::stop(INDEX_FILEIO),
                ControlRequest::start(INDEX_FILEIO),
                ControlRequest::start_stream(),
            ]
        );
    }

    #[test]
    fn stream_start_carries_payload_and_doubled_timeout() {
        let request = ControlRequest::start_stream();
        assert_eq!(request.value, 1);
        assert_eq!(request.index, INDEX_VIDEO);
        assert_eq!(request.data_len, 2);
        assert_eq!(request.timeout, TRANSFER_TIMEOUT * 2);
    }

    #[test]
    fn streaming_is_terminal() {
        assert!(SessionState::Streaming.step().is_none());
    }
}
