//! Color lookup table for false-color rendering.

use std::fs;
use std::path::Path;

use crate::{Result, ThermalError};

/// Exact byte size of a palette file: 256 RGB triplets.
pub const COLORMAP_BYTES: usize = 768;

/// Immutable 256-entry RGB lookup table, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Colormap {
    table: [[u8; 3]; 256],
}

impl Colormap {
    /// Load a palette from a raw file of exactly 768 bytes.
    ///
    /// Any other size is a startup-fatal error; a partial palette is never
    /// accepted.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let bytes = fs::read(path).map_err(|e| {
            ThermalError::colormap(path.to_path_buf(), "failed to read palette file", Some(e))
        })?;
        Self::from_slice(&bytes).map_err(|_| {
            ThermalError::colormap(
                path.to_path_buf(),
                format!("palette must be exactly {COLORMAP_BYTES} bytes, got {}", bytes.len()),
                None,
            )
        })
    }

    /// Build a palette from an in-memory buffer of exactly 768 bytes.
    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        if bytes.len() != COLORMAP_BYTES {
            return Err(ThermalError::decode(
                "colormap",
                format!("expected {COLORMAP_BYTES} bytes, got {}", bytes.len()),
            ));
        }
        let mut table = [[0u8; 3]; 256];
        for (i, rgb) in bytes.chunks_exact(3).enumerate() {
            table[i] = [rgb[0], rgb[1], rgb[2]];
        }
        Ok(Self { table })
    }

    /// Linear grayscale palette, useful for tests and as a fallback.
    pub fn grayscale() -> Self {
        let mut table = [[0u8; 3]; 256];
        for (i, entry) in table.iter_mut().enumerate() {
            *entry = [i as u8; 3];
        }
        Self { table }
    }

    /// RGB triplet for a grayscale intensity.
    pub fn rgb(&self, index: u8) -> [u8; 3] {
        self.table[index as usize]
    }

    /// Palette entry for preview gradients: maps position `i` out of `n`
    /// across the full table.
    pub fn sample(&self, i: usize, n: usize) -> [u8; 3] {
        debug_assert!(n > 0);
        self.table[(i * 256 / n).min(255)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn exact_size_round_trips() {
        let mut bytes = vec![0u8; COLORMAP_BYTES];
        bytes[3] = 10;
        bytes[4] = 20;
        bytes[5] = 30;
        let map = Colormap::from_slice(&bytes).unwrap();
        assert_eq!(map.rgb(1), [10, 20, 30]);
    }

    #[test]
    fn short_palette_file_is_fatal() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(&vec![0u8; COLORMAP_BYTES - 1]).unwrap();
        let err = Colormap::from_path(file.path()).unwrap_err();
        assert!(err.is_fatal());
        assert!(err.to_string().contains("767"));
    }

    #[test]
    fn oversized_palette_is_rejected() {
        assert!(Colormap::from_slice(&vec![0u8; COLORMAP_BYTES + 1]).is_err());
    }

    #[test]
    fn gradient_sampling_spans_the_table() {
        let map = Colormap::grayscale();
        assert_eq!(map.sample(0, 80), [0, 0, 0]);
        assert_eq!(map.sample(79, 80), [252, 252, 252]);
    }
}
