//! Output sinks for decoded frames.

use std::io::Write;

use crate::{Result, ThermalError};

/// Destination for the two output streams of a decode cycle.
///
/// Sink failures are fatal: a loopback device that stops accepting writes
/// will not recover by retrying the session.
pub trait FrameSink {
    /// Write one compressed visible image.
    fn write_visible(&mut self, data: &[u8]) -> Result<()>;

    /// Write one colorized thermal image (RGB triplets).
    fn write_thermal(&mut self, data: &[u8]) -> Result<()>;
}

impl<S: FrameSink + ?Sized> FrameSink for &mut S {
    fn write_visible(&mut self, data: &[u8]) -> Result<()> {
        (**self).write_visible(data)
    }

    fn write_thermal(&mut self, data: &[u8]) -> Result<()> {
        (**self).write_thermal(data)
    }
}

/// Sink writing each stream to its own `Write` implementor, typically a pair
/// of V4L2 loopback devices.
#[derive(Debug)]
pub struct StreamSink<V, T> {
    visible: V,
    thermal: T,
}

impl<V: Write, T: Write> StreamSink<V, T> {
    pub fn new(visible: V, thermal: T) -> Self {
        Self { visible, thermal }
    }
}

impl<V: Write, T: Write> FrameSink for StreamSink<V, T> {
    fn write_visible(&mut self, data: &[u8]) -> Result<()> {
        self.visible
            .write_all(data)
            .map_err(|e| ThermalError::sink("visible", e))
    }

    fn write_thermal(&mut self, data: &[u8]) -> Result<()> {
        self.thermal
            .write_all(data)
            .map_err(|e| ThermalError::sink("thermal", e))
    }
}
