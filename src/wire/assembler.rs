//! Streaming frame reassembly.
//!
//! Bulk reads deliver arbitrary-length chunks with no framing of their own.
//! The assembler accumulates chunks and resynchronizes on the magic marker:
//! any mid-stream corruption is self-healing only once the marker reappears
//! at a chunk boundary.

use tracing::{trace, warn};

use super::{LogicalFrame, HEADER_LEN, MAGIC, MIN_HEADER_BYTES};
use super::{read_u32_le, FRAME_SIZE_OFFSET};

/// Default accumulation capacity, 1 MiB (the size the vendor app uses).
pub const DEFAULT_CAPACITY: usize = 1 << 20;

/// Result of feeding one chunk to the assembler.
#[derive(Debug)]
pub enum FeedResult<'a> {
    /// No complete frame yet, keep feeding.
    Accumulating,
    /// Accumulated bytes did not start with the magic marker; the buffer was
    /// discarded and the assembler is hunting for the next marker.
    Resync,
    /// A complete logical frame. Must be consumed before the next `feed`.
    Frame(LogicalFrame<'a>),
}

/// Accumulates transport chunks into logical frames.
#[derive(Debug)]
pub struct FrameAssembler {
    buf: Vec<u8>,
    capacity: usize,
    /// Set when a frame was emitted; the buffer is recycled on the next feed.
    emitted: bool,
}

impl FrameAssembler {
    /// Assembler with the default 1 MiB capacity.
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    /// Assembler with an explicit maximum accumulation capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self { buf: Vec::with_capacity(capacity.min(DEFAULT_CAPACITY)), capacity, emitted: false }
    }

    /// Bytes currently accumulated.
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// Whether the accumulator is empty.
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Consume one transport chunk.
    ///
    /// The buffer is reset before appending when the chunk itself begins with
    /// the magic marker (a new frame started regardless of what we were
    /// accumulating) or when appending would exceed capacity. After appending,
    /// a buffer that does not start with the marker is discarded
    /// ([`FeedResult::Resync`]). A frame is complete once `FrameSize + 28`
    /// bytes have accumulated.
    pub fn feed(&mut self, chunk: &[u8]) -> FeedResult<'_> {
        if self.emitted {
            self.buf.clear();
            self.emitted = false;
        }

        if chunk.starts_with(&MAGIC) || self.buf.len() + chunk.len() >= self.capacity {
            self.buf.clear();
        }
        self.buf.extend_from_slice(chunk);

        // The marker prefix must hold even while fewer than 4 bytes are in.
        let head = self.buf.len().min(MAGIC.len());
        if self.buf[..head] != MAGIC[..head] {
            self.buf.clear();
            warn!("bad magic, resynchronizing");
            return FeedResult::Resync;
        }

        if self.buf.len() < MIN_HEADER_BYTES {
            return FeedResult::Accumulating;
        }

        // Header is in; wait until the declared size is reached.
        let frame_size = match read_u32_le(&self.buf, FRAME_SIZE_OFFSET) {
            Ok(size) => size as usize,
            Err(_) => unreachable!("length checked above"),
        };
        if frame_size.saturating_add(HEADER_LEN) > self.buf.len() {
            trace!(
                accumulated = self.buf.len(),
                needed = frame_size + HEADER_LEN,
                "waiting for more chunks"
            );
            return FeedResult::Accumulating;
        }

        self.emitted = true;
        match LogicalFrame::parse(&self.buf) {
            Ok(frame) => FeedResult::Frame(frame),
            Err(_) => unreachable!("header bounds checked above"),
        }
    }
}

impl Default for FrameAssembler {
    fn default() -> Self {
        Self::new()
    }
}
