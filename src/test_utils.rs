//! Wire-frame construction helpers shared by unit tests and benchmarks.

use crate::variant::CameraVariant;
use crate::wire::{
    FFC_MARKER, FFC_MARKER_SKEW, FRAME_SIZE_OFFSET, HEADER_LEN, JPG_SIZE_OFFSET, MAGIC,
    THERMAL_SIZE_OFFSET,
};

/// Builds syntactically valid wire frames byte by byte.
///
/// The declared frame size is `thermal + jpg + HEADER_LEN`, which leaves a
/// trailer after the visible payload covering the flat-field-correction
/// marker window, matching what the camera actually sends.
#[derive(Debug, Clone)]
pub struct WireFrameBuilder {
    thermal_size: u32,
    jpg_size: u32,
    buf: Vec<u8>,
}

impl WireFrameBuilder {
    pub fn new(thermal_size: u32, jpg_size: u32) -> Self {
        let frame_size = thermal_size + jpg_size + HEADER_LEN as u32;
        let total = frame_size as usize + HEADER_LEN;
        let mut buf = vec![0u8; total];
        buf[..MAGIC.len()].copy_from_slice(&MAGIC);
        buf[FRAME_SIZE_OFFSET..FRAME_SIZE_OFFSET + 4].copy_from_slice(&frame_size.to_le_bytes());
        buf[THERMAL_SIZE_OFFSET..THERMAL_SIZE_OFFSET + 4]
            .copy_from_slice(&thermal_size.to_le_bytes());
        buf[JPG_SIZE_OFFSET..JPG_SIZE_OFFSET + 4].copy_from_slice(&jpg_size.to_le_bytes());
        Self { thermal_size, jpg_size, buf }
    }

    /// A frame shaped for `variant`'s thermal layout, with a 64-byte visible
    /// payload. The thermal region starts all-zero; use
    /// [`uniform_thermal`](Self::uniform_thermal) and
    /// [`thermal_sample`](Self::thermal_sample) to populate it.
    pub fn for_variant(variant: CameraVariant) -> Self {
        Self::new(variant.thermal_size() as u32, 64)
    }

    /// Fill the visible payload with `byte`.
    pub fn visible_fill(mut self, byte: u8) -> Self {
        let start = HEADER_LEN + self.thermal_size as usize;
        let end = start + self.jpg_size as usize;
        self.buf[start..end].fill(byte);
        self
    }

    /// Set every sensor pixel of `variant`'s grid to `raw`.
    pub fn uniform_thermal(mut self, variant: CameraVariant, raw: u16) -> Self {
        let (width, height) = variant.sensor_size();
        for y in 0..height {
            for x in 0..width {
                let offset = variant.pixel_offset(x, y);
                self.buf[offset..offset + 2].copy_from_slice(&raw.to_le_bytes());
            }
        }
        self
    }

    /// Set the sensor pixel at `(x, y)` to `raw`.
    pub fn thermal_sample(mut self, variant: CameraVariant, x: usize, y: usize, raw: u16) -> Self {
        let offset = variant.pixel_offset(x, y);
        self.buf[offset..offset + 2].copy_from_slice(&raw.to_le_bytes());
        self
    }

    /// Stamp the flat-field-correction marker into its trailer window.
    pub fn ffc(mut self) -> Self {
        let offset = HEADER_LEN + self.thermal_size as usize + self.jpg_size as usize
            + FFC_MARKER_SKEW;
        self.buf[offset..offset + FFC_MARKER.len()].copy_from_slice(FFC_MARKER);
        self
    }

    pub fn build(self) -> Vec<u8> {
        self.buf
    }
}
