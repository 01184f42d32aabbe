//! Logical frame view over assembled bytes.

use super::{read_u16_le, read_u32_le};
use super::{
    FFC_MARKER, FFC_MARKER_SKEW, FRAME_SIZE_OFFSET, HEADER_LEN, JPG_SIZE_OFFSET,
    THERMAL_SIZE_OFFSET,
};
use crate::Result;

/// One complete application-level unit of the camera's stream.
///
/// Borrows the reassembly buffer; the frame must be consumed before the next
/// chunk is fed. Carries the three header-derived lengths and exposes
/// bounds-checked access to the payloads so the decoder never does unchecked
/// offset arithmetic on the raw bytes.
#[derive(Debug, Clone, Copy)]
pub struct LogicalFrame<'a> {
    data: &'a [u8],
    frame_size: u32,
    thermal_size: u32,
    jpg_size: u32,
}

impl<'a> LogicalFrame<'a> {
    /// Build a frame view over fully-accumulated bytes, reading the header
    /// fields at their fixed offsets.
    pub(super) fn parse(data: &'a [u8]) -> Result<Self> {
        let frame_size = read_u32_le(data, FRAME_SIZE_OFFSET)?;
        let thermal_size = read_u32_le(data, THERMAL_SIZE_OFFSET)?;
        let jpg_size = read_u32_le(data, JPG_SIZE_OFFSET)?;
        Ok(Self { data, frame_size, thermal_size, jpg_size })
    }

    /// Declared frame size (payload bytes after the 28-byte header).
    pub fn frame_size(&self) -> u32 {
        self.frame_size
    }

    /// Declared thermal payload size.
    pub fn thermal_size(&self) -> u32 {
        self.thermal_size
    }

    /// Declared visible payload size.
    pub fn jpg_size(&self) -> u32 {
        self.jpg_size
    }

    /// Offset of the visible payload within the frame.
    pub fn visible_offset(&self) -> usize {
        HEADER_LEN + self.thermal_size as usize
    }

    /// The opaque visible-image payload, passed through undecoded.
    pub fn visible(&self) -> Result<&'a [u8]> {
        let start = self.visible_offset();
        let end = start + self.jpg_size as usize;
        self.data.get(start..end).ok_or_else(|| {
            crate::ThermalError::decode(
                "visible payload",
                format!("range {start}..{end} out of frame ({} bytes)", self.data.len()),
            )
        })
    }

    /// One 16-bit thermal sample at an absolute frame offset.
    pub fn sample(&self, offset: usize) -> Result<u16> {
        read_u16_le(self.data, offset)
    }

    /// Whether the frame carries the flat-field-correction marker.
    ///
    /// The marker lives 17 bytes past the end of the visible payload. A frame
    /// too short to contain the marker window simply is not marked.
    pub fn ffc_marked(&self) -> bool {
        let start = self.visible_offset() + self.jpg_size as usize + FFC_MARKER_SKEW;
        matches!(self.data.get(start..start + 3), Some(window) if window == FFC_MARKER)
    }
}
