//! Userspace decoder for FLIR One G3 / Pro USB thermal cameras.
//!
//! The camera multiplexes a raw 16-bit thermal sensor grid and a compressed
//! visible image into length-prefixed logical frames on a USB bulk endpoint.
//! This crate reassembles that stream, extracts and colorizes the thermal
//! data with an on-image temperature overlay, and hands both streams to
//! output sinks (typically V4L2 loopback devices).
//!
//! Pipeline stages, in stream order:
//!
//! - [`session`]: control handshake and endpoint polling over a [`Transport`]
//! - [`wire`]: chunk reassembly and logical-frame framing
//! - [`variant`]: per-model sensor geometry ([`CameraVariant`])
//! - [`decode`]: thermal extraction, statistics, overlay, colorization
//! - [`radiometry`]: raw counts to degrees Celsius
//! - [`colormap`] / [`overlay`]: palettes and the bitmap-font canvas
//! - [`sink`]: decoded-frame outputs
//!
//! [`Transport`]: session::Transport
//! [`CameraVariant`]: variant::CameraVariant

pub mod colormap;
pub mod decode;
mod error;
pub mod overlay;
pub mod radiometry;
pub mod session;
pub mod sink;
#[cfg(any(test, feature = "benchmark"))]
pub mod test_utils;
#[cfg(feature = "usb")]
pub mod usb;
pub mod variant;
pub mod wire;

pub use error::{Result, ThermalError};
