use std::fs::OpenOptions;
use std::path::PathBuf;
use std::thread;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use thermocast::colormap::Colormap;
use thermocast::decode::FrameDecoder;
use thermocast::session::{Session, SessionEnd};
use thermocast::sink::StreamSink;
use thermocast::usb::UsbTransport;
use thermocast::variant::CameraVariant;

/// Stream a FLIR One G3/Pro camera to a pair of V4L2 loopback devices.
///
/// The loopback devices must exist before start-up (v4l2loopback with at
/// least two devices); the visible MJPEG stream goes to the first, the
/// thermal stream to the second.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Palette file: 256 RGB triplets, exactly 768 bytes.
    palette: PathBuf,

    /// Decode for the FLIR One Pro (160x120 sensor) instead of the G3.
    #[arg(long)]
    pro: bool,

    /// Invert the palette.
    #[arg(short, long)]
    invert: bool,

    /// Render the palette gradient instead of sensor data.
    #[arg(short, long)]
    preview: bool,

    /// First loopback device number: visible goes to /dev/video<N>,
    /// thermal to /dev/video<N+1>.
    #[arg(short, long, default_value_t = 1)]
    video: u16,
}

/// Device node pair for a base loopback number: `(visible, thermal)`.
fn device_paths(video: u16) -> (String, String) {
    let n = u32::from(video);
    (format!("/dev/video{n}"), format!("/dev/video{}", n + 1))
}

/// Wait between device-acquisition attempts.
const REATTACH_DELAY: Duration = Duration::from_secs(1);

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let args = Args::parse();
    let variant = if args.pro { CameraVariant::Pro } else { CameraVariant::G3 };
    let colormap = Colormap::from_path(&args.palette)?;
    let decoder =
        FrameDecoder::new(variant, colormap).invert(args.invert).preview(args.preview);

    let (visible_path, thermal_path) = device_paths(args.video);
    let visible = OpenOptions::new()
        .write(true)
        .open(&visible_path)
        .with_context(|| format!("opening visible output {visible_path}"))?;
    let thermal = OpenOptions::new()
        .write(true)
        .open(&thermal_path)
        .with_context(|| format!("opening thermal output {thermal_path}"))?;
    let mut sink = StreamSink::new(visible, thermal);

    info!(?variant, thermal = %thermal_path, visible = %visible_path, "starting");

    loop {
        let transport = match UsbTransport::acquire() {
            Ok(transport) => transport,
            Err(e) => {
                warn!(error = %e, "camera not available, retrying");
                thread::sleep(REATTACH_DELAY);
                continue;
            }
        };

        let mut session = Session::new(transport, decoder.clone(), &mut sink);
        match session.run() {
            Ok(SessionEnd::DeviceRemoved) => {
                info!("waiting for the camera to reappear");
                thread::sleep(REATTACH_DELAY);
            }
            Err(e) if e.is_fatal() => return Err(e).context("session failed"),
            Err(e) => {
                warn!(error = %e, "session aborted, restarting");
                thread::sleep(REATTACH_DELAY);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn visible_takes_the_first_device_node() {
        let (visible, thermal) = device_paths(1);
        assert_eq!(visible, "/dev/video1");
        assert_eq!(thermal, "/dev/video2");
    }

    #[test]
    fn device_numbers_span_the_full_flag_range() {
        let (visible, thermal) = device_paths(u16::MAX);
        assert_eq!(visible, "/dev/video65535");
        assert_eq!(thermal, "/dev/video65536");
    }
}
