//! Wire format of the camera's bulk stream.
//!
//! The camera emits logical frames over the bulk data endpoint with no
//! transport-level delimiting beyond a leading magic marker. The layout,
//! shared by the reassembler and the decoder, is:
//!
//! ```text
//! offset 0   magic marker          EF BE 00 00
//! offset 8   FrameSize             u32 little-endian
//! offset 12  ThermalSize           u32 little-endian
//! offset 16  JpgSize               u32 little-endian
//! offset 32  thermal payload       variant-dependent rows of u16 LE samples
//! offset 28+ThermalSize            visible payload (opaque MJPEG), JpgSize bytes
//! offset 28+ThermalSize+JpgSize+17 optional ASCII "FFC" marker, 3 bytes
//! ```
//!
//! A frame is complete once `FrameSize + 28` bytes have accumulated since the
//! marker. The offsets below are empirically reverse-engineered protocol
//! constants; they must not be "simplified".

mod assembler;
mod frame;

pub use assembler::{FeedResult, FrameAssembler, DEFAULT_CAPACITY};
pub use frame::LogicalFrame;

use crate::{Result, ThermalError};

/// Magic marker that opens every logical frame.
pub const MAGIC: [u8; 4] = [0xEF, 0xBE, 0x00, 0x00];

/// Offset of the `FrameSize` header field.
pub const FRAME_SIZE_OFFSET: usize = 8;
/// Offset of the `ThermalSize` header field.
pub const THERMAL_SIZE_OFFSET: usize = 12;
/// Offset of the `JpgSize` header field.
pub const JPG_SIZE_OFFSET: usize = 16;

/// Bytes of header accounted for by `FrameSize + HEADER_LEN` completion.
pub const HEADER_LEN: usize = 28;
/// Smallest accumulation that allows reading all three size fields.
pub const MIN_HEADER_BYTES: usize = JPG_SIZE_OFFSET + 4;

/// Start of the thermal payload within the frame.
pub const THERMAL_PAYLOAD_OFFSET: usize = 32;

/// Distance from the end of the visible payload to the FFC marker.
pub const FFC_MARKER_SKEW: usize = 17;
/// The flat-field-correction marker itself.
pub const FFC_MARKER: &[u8; 3] = b"FFC";

/// Bounds-checked little-endian u32 read.
pub fn read_u32_le(data: &[u8], offset: usize) -> Result<u32> {
    match data.get(offset..offset + 4) {
        Some(b) => Ok(u32::from_le_bytes([b[0], b[1], b[2], b[3]])),
        None => Err(ThermalError::decode(
            "header",
            format!("need 4 bytes at offset {offset}, have {}", data.len()),
        )),
    }
}

/// Bounds-checked little-endian u16 read.
pub fn read_u16_le(data: &[u8], offset: usize) -> Result<u16> {
    match data.get(offset..offset + 2) {
        Some(b) => Ok(u16::from_le_bytes([b[0], b[1]])),
        None => Err(ThermalError::decode(
            "thermal payload",
            format!("sample offset {offset} out of range ({} bytes)", data.len()),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn u32_reads_little_endian() {
        let data = [0u8, 0, 0, 0, 0, 0, 0, 0, 0x64, 0, 0, 0];
        assert_eq!(read_u32_le(&data, FRAME_SIZE_OFFSET).unwrap(), 100);
    }

    #[test]
    fn out_of_range_reads_are_errors() {
        let data = [0u8; 10];
        assert!(read_u32_le(&data, 8).is_err());
        assert!(read_u16_le(&data, 9).is_err());
        assert!(read_u16_le(&data, 8).is_ok());
    }
}
