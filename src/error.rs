//! Error types for the decoding pipeline.
//!
//! Every failure in the crate is classified along the lines the polling loop
//! cares about: transient conditions are absorbed where they occur, fatal
//! conditions propagate and terminate or restart the whole pipeline.
//!
//! ## Error Categories
//!
//! - **Transport Errors**: bulk/control transfer failures, wrapping
//!   [`TransportError`](crate::session::TransportError)
//! - **Decode Errors**: malformed or degenerate logical frames
//! - **Colormap Errors**: palette file problems at startup
//! - **Sink Errors**: output device write failures
//!
//! Use [`ThermalError::is_fatal`] to decide whether an error ends the process
//! or merely the current session/frame.

use std::path::PathBuf;
use thiserror::Error;

use crate::session::TransportError;

/// Result type alias for pipeline operations.
pub type Result<T, E = ThermalError> = std::result::Result<T, E>;

/// Main error type for the decoding pipeline.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum ThermalError {
    #[error("transport failure during {phase}")]
    Transport {
        phase: &'static str,
        #[source]
        source: TransportError,
    },

    #[error("frame decode failed in {context}: {details}")]
    Decode { context: &'static str, details: String },

    #[error("colormap error: {path}: {details}")]
    Colormap {
        path: PathBuf,
        details: String,
        #[source]
        source: Option<std::io::Error>,
    },

    #[error("failed to write {stream} frame to output device")]
    Sink {
        stream: &'static str,
        #[source]
        source: std::io::Error,
    },
}

impl ThermalError {
    /// Returns whether this error must terminate the process.
    ///
    /// Sink-write and colormap (startup) failures are unrecoverable; transport
    /// and decode failures are handled by the session loop (restart or skip).
    pub fn is_fatal(&self) -> bool {
        match self {
            ThermalError::Sink { .. } => true,
            ThermalError::Colormap { .. } => true,
            ThermalError::Transport { .. } => false,
            ThermalError::Decode { .. } => false,
        }
    }

    /// Helper constructor for decode errors.
    pub fn decode(context: &'static str, details: impl Into<String>) -> Self {
        ThermalError::Decode { context, details: details.into() }
    }

    /// Helper constructor for transport errors tagged with the phase they occurred in.
    pub fn transport(phase: &'static str, source: TransportError) -> Self {
        ThermalError::Transport { phase, source }
    }

    /// Helper constructor for colormap errors.
    pub fn colormap(
        path: PathBuf,
        details: impl Into<String>,
        source: Option<std::io::Error>,
    ) -> Self {
        ThermalError::Colormap { path, details: details.into(), source }
    }

    /// Helper constructor for sink write errors.
    pub fn sink(stream: &'static str, source: std::io::Error) -> Self {
        ThermalError::Sink { stream, source }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fatality_classification() {
        let sink = ThermalError::sink("thermal", std::io::Error::other("boom"));
        assert!(sink.is_fatal());

        let colormap = ThermalError::colormap(PathBuf::from("/p"), "short read", None);
        assert!(colormap.is_fatal());

        let decode = ThermalError::decode("thermal grid", "degenerate");
        assert!(!decode.is_fatal());

        let transport =
            ThermalError::transport("streaming", TransportError::Transfer("timeout".into()));
        assert!(!transport.is_fatal());
    }

    #[test]
    fn error_traits() {
        fn assert_send_sync_static<T: Send + Sync + 'static>() {}
        assert_send_sync_static::<ThermalError>();

        let error = ThermalError::decode("header", "truncated");
        let _: &dyn std::error::Error = &error;
    }

    #[test]
    fn messages_carry_context() {
        let err = ThermalError::decode("thermal grid", "sample offset 9999 out of range");
        let msg = err.to_string();
        assert!(msg.contains("thermal grid"));
        assert!(msg.contains("9999"));
    }
}
