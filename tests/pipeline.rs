//! End-to-end pipeline tests: scripted transport in, recorded sinks out.

use std::collections::VecDeque;
use std::time::Duration;

use thermocast::colormap::Colormap;
use thermocast::decode::FrameDecoder;
use thermocast::session::{
    ControlRequest, Session, SessionEnd, Transport, TransportError, ENDPOINT_DATA,
};
use thermocast::sink::FrameSink;
use thermocast::variant::CameraVariant;
use thermocast::wire::{
    FFC_MARKER, FFC_MARKER_SKEW, FRAME_SIZE_OFFSET, HEADER_LEN, JPG_SIZE_OFFSET, MAGIC,
    THERMAL_SIZE_OFFSET,
};
use thermocast::Result;

const JPG_SIZE: usize = 64;

/// A complete wire frame for `variant`: uniform 2000-count grid with one hot
/// pixel, a constant-fill visible payload, and an optional FFC marker.
fn frame_bytes(variant: CameraVariant, visible_byte: u8, ffc: bool) -> Vec<u8> {
    let thermal_size = variant.thermal_size();
    let frame_size = (thermal_size + JPG_SIZE + HEADER_LEN) as u32;
    let mut buf = vec![0u8; frame_size as usize + HEADER_LEN];

    buf[..MAGIC.len()].copy_from_slice(&MAGIC);
    buf[FRAME_SIZE_OFFSET..FRAME_SIZE_OFFSET + 4].copy_from_slice(&frame_size.to_le_bytes());
    buf[THERMAL_SIZE_OFFSET..THERMAL_SIZE_OFFSET + 4]
        .copy_from_slice(&(thermal_size as u32).to_le_bytes());
    buf[JPG_SIZE_OFFSET..JPG_SIZE_OFFSET + 4].copy_from_slice(&(JPG_SIZE as u32).to_le_bytes());

    let (width, height) = variant.sensor_size();
    for y in 0..height {
        for x in 0..width {
            let offset = variant.pixel_offset(x, y);
            buf[offset..offset + 2].copy_from_slice(&2000u16.to_le_bytes());
        }
    }
    let hot = variant.pixel_offset(width / 3, height / 3);
    buf[hot..hot + 2].copy_from_slice(&3100u16.to_le_bytes());

    let visible_start = HEADER_LEN + thermal_size;
    buf[visible_start..visible_start + JPG_SIZE].fill(visible_byte);

    if ffc {
        let marker = visible_start + JPG_SIZE + FFC_MARKER_SKEW;
        buf[marker..marker + FFC_MARKER.len()].copy_from_slice(FFC_MARKER);
    }
    buf
}

struct ScriptedTransport {
    controls: Vec<ControlRequest>,
    chunks: VecDeque<Vec<u8>>,
}

impl ScriptedTransport {
    fn new(chunks: Vec<Vec<u8>>) -> Self {
        Self { controls: Vec::new(), chunks: chunks.into() }
    }
}

impl Transport for ScriptedTransport {
    fn control(&mut self, request: ControlRequest) -> Result<(), TransportError> {
        self.controls.push(request);
        Ok(())
    }

    fn read_bulk(
        &mut self,
        endpoint: u8,
        buf: &mut [u8],
        _timeout: Duration,
    ) -> Result<usize, TransportError> {
        if endpoint != ENDPOINT_DATA {
            return Ok(0);
        }
        match self.chunks.pop_front() {
            Some(chunk) => {
                buf[..chunk.len()].copy_from_slice(&chunk);
                Ok(chunk.len())
            }
            None => Err(TransportError::Disconnected),
        }
    }
}

#[derive(Default)]
struct RecordingSink {
    visible: Vec<Vec<u8>>,
    thermal: Vec<Vec<u8>>,
}

impl FrameSink for RecordingSink {
    fn write_visible(&mut self, data: &[u8]) -> Result<()> {
        self.visible.push(data.to_vec());
        Ok(())
    }

    fn write_thermal(&mut self, data: &[u8]) -> Result<()> {
        self.thermal.push(data.to_vec());
        Ok(())
    }
}

fn run_session(variant: CameraVariant, chunks: Vec<Vec<u8>>) -> (RecordingSink, SessionEnd) {
    let transport = ScriptedTransport::new(chunks);
    let decoder = FrameDecoder::new(variant, Colormap::grayscale());
    let mut sink = RecordingSink::default();
    let end = Session::new(transport, decoder, &mut sink).run().unwrap();
    (sink, end)
}

#[test]
fn noisy_chunked_stream_yields_clean_frames() {
    let variant = CameraVariant::G3;
    let frame = frame_bytes(variant, 0xC4, false);

    // Mid-stream debris before the first marker, then the frame split into
    // transfer-sized chunks.
    let mut chunks = vec![vec![0x00, 0x17, 0x2A, 0x90]];
    chunks.extend(frame.chunks(512).map(<[u8]>::to_vec));

    let (sink, end) = run_session(variant, chunks);
    assert_eq!(end, SessionEnd::DeviceRemoved);
    assert_eq!(sink.visible.len(), 1);
    assert_eq!(sink.thermal.len(), 1);
    assert_eq!(sink.visible[0], vec![0xC4; JPG_SIZE]);

    let (w, h) = variant.display_size();
    assert_eq!(sink.thermal[0].len(), w * h * 3);
}

#[test]
fn back_to_back_frames_in_one_session() {
    let variant = CameraVariant::Pro;
    let chunks = vec![
        frame_bytes(variant, 0x01, false),
        frame_bytes(variant, 0x02, false),
        frame_bytes(variant, 0x03, false),
    ];

    let (sink, _) = run_session(variant, chunks);
    assert_eq!(sink.visible.len(), 3);
    assert_eq!(sink.thermal.len(), 3);
    assert_eq!(sink.visible[1], vec![0x02; JPG_SIZE]);
}

#[test]
fn ffc_drops_two_thermal_frames_but_no_visible_ones() {
    let variant = CameraVariant::G3;
    let chunks = vec![
        frame_bytes(variant, 0x01, true),
        frame_bytes(variant, 0x02, false),
        frame_bytes(variant, 0x03, false),
    ];

    let (sink, _) = run_session(variant, chunks);
    assert_eq!(sink.visible.len(), 3);
    assert_eq!(sink.thermal.len(), 1);
}

#[test]
fn control_sequence_is_stop_stop_start_start() {
    use std::cell::RefCell;
    use std::rc::Rc;

    struct Capture(Rc<RefCell<Vec<(u16, u16)>>>);
    impl Transport for Capture {
        fn control(&mut self, request: ControlRequest) -> Result<(), TransportError> {
            self.0.borrow_mut().push((request.value, request.index));
            Ok(())
        }
        fn read_bulk(
            &mut self,
            _endpoint: u8,
            _buf: &mut [u8],
            _timeout: Duration,
        ) -> Result<usize, TransportError> {
            Err(TransportError::Disconnected)
        }
    }

    let log = Rc::new(RefCell::new(Vec::new()));
    let transport = Capture(Rc::clone(&log));
    let decoder = FrameDecoder::new(CameraVariant::G3, Colormap::grayscale());
    let mut sink = RecordingSink::default();
    let end = Session::new(transport, decoder, &mut sink).run().unwrap();

    assert_eq!(end, SessionEnd::DeviceRemoved);
    // Stop video, stop file-I/O, start file-I/O, start video.
    assert_eq!(*log.borrow(), vec![(0, 2), (0, 1), (1, 1), (1, 2)]);
}
