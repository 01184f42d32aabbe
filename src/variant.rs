//! Camera model variants.

use crate::wire::THERMAL_PAYLOAD_OFFSET;

/// Supported camera models.
///
/// The two variants differ in image dimensions and in the exact byte layout
/// of the thermal payload. The per-row offset formulas are reverse-engineered
/// protocol constants and are preserved exactly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CameraVariant {
    /// FLIR ONE G3 (default): 80×60 sensor rendered on an 80×80 canvas.
    G3,
    /// FLIR ONE Pro: 160×120 sensor rendered on a 160×128 canvas.
    Pro,
}

impl CameraVariant {
    /// Output canvas dimensions (thermal image plus the text strip below it).
    pub fn display_size(&self) -> (usize, usize) {
        match self {
            CameraVariant::G3 => (80, 80),
            CameraVariant::Pro => (160, 128),
        }
    }

    /// Raw sensor grid dimensions.
    pub fn sensor_size(&self) -> (usize, usize) {
        match self {
            CameraVariant::G3 => (80, 60),
            CameraVariant::Pro => (160, 120),
        }
    }

    /// Byte offset of the 16-bit sample for pixel `(x, y)` within a logical
    /// frame.
    ///
    /// G3 rows carry 2 trailing pad bytes (`W+2` sample stride); Pro rows
    /// carry 4, plus a 4-byte mid-row header insertion after half-width.
    /// Both payloads start 32 bytes into the frame.
    pub fn pixel_offset(&self, x: usize, y: usize) -> usize {
        let (w, _) = self.sensor_size();
        match self {
            CameraVariant::G3 => 2 * (y * (w + 2) + x) + THERMAL_PAYLOAD_OFFSET,
            CameraVariant::Pro => {
                let mut pos = 2 * (y * (w + 4) + x) + THERMAL_PAYLOAD_OFFSET;
                if x > w / 2 {
                    pos += 4;
                }
                pos
            }
        }
    }

    /// Thermal payload size in bytes, implied by the row layout.
    pub fn thermal_size(&self) -> usize {
        let (w, h) = self.sensor_size();
        let stride = match self {
            CameraVariant::G3 => w + 2,
            CameraVariant::Pro => w + 4,
        };
        2 * stride * h
    }

    /// Maximum characters that fit on one overlay text line.
    pub fn max_line_chars(&self) -> usize {
        let (w, _) = self.display_size();
        match self {
            CameraVariant::G3 => w / 6 + 1,
            CameraVariant::Pro => w / 6,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn g3_row_layout() {
        let v = CameraVariant::G3;
        assert_eq!(v.pixel_offset(0, 0), 32);
        assert_eq!(v.pixel_offset(1, 0), 34);
        // Row stride is (80 + 2) samples.
        assert_eq!(v.pixel_offset(0, 1), 2 * 82 + 32);
        // Last sample fits in the declared payload.
        let last = v.pixel_offset(79, 59);
        assert!(last + 2 <= 28 + v.thermal_size());
    }

    #[test]
    fn pro_mid_row_insertion() {
        let v = CameraVariant::Pro;
        assert_eq!(v.pixel_offset(80, 0), 2 * 80 + 32);
        // Past half-width the 4-byte insertion shifts everything.
        assert_eq!(v.pixel_offset(81, 0), 2 * 81 + 32 + 4);
        let last = v.pixel_offset(159, 119);
        assert!(last + 2 <= 28 + v.thermal_size());
    }

    #[test]
    fn text_line_limits() {
        assert_eq!(CameraVariant::G3.max_line_chars(), 14);
        assert_eq!(CameraVariant::Pro.max_line_chars(), 26);
    }
}
