//! `rusb`-backed transport for the physical camera.

use std::time::Duration;

use rusb::{DeviceHandle, GlobalContext};
use tracing::{debug, info, warn};

use crate::session::transport::{
    ControlRequest, Transport, TransportError, CONTROL_REQUEST, CONTROL_REQUEST_TYPE,
};
use crate::{Result, ThermalError};

const VENDOR_ID: u16 = 0x09cb;
const PRODUCT_ID: u16 = 0x1996;
/// The camera only streams from configuration 3.
const CONFIGURATION: u8 = 3;
const INTERFACES: [u8; 3] = [0, 1, 2];

fn map_bulk_error(e: rusb::Error) -> TransportError {
    match e {
        rusb::Error::NoDevice => TransportError::Disconnected,
        other => TransportError::Transfer(other.to_string()),
    }
}

fn map_control_error(e: rusb::Error) -> TransportError {
    match e {
        rusb::Error::NoDevice => TransportError::Disconnected,
        other => TransportError::Control(other.to_string()),
    }
}

/// Open handle to the camera with its interfaces claimed.
pub struct UsbTransport {
    handle: DeviceHandle<GlobalContext>,
}

impl UsbTransport {
    /// Find the camera on the bus, select its streaming configuration and
    /// claim all three interfaces.
    pub fn acquire() -> Result<Self> {
        let mut handle = rusb::open_device_with_vid_pid(VENDOR_ID, PRODUCT_ID).ok_or_else(|| {
            ThermalError::transport(
                "device open",
                TransportError::Transfer(format!(
                    "device {VENDOR_ID:04x}:{PRODUCT_ID:04x} not found"
                )),
            )
        })?;

        handle
            .set_active_configuration(CONFIGURATION)
            .map_err(|e| ThermalError::transport("set configuration", map_control_error(e)))?;
        for interface in INTERFACES {
            handle
                .claim_interface(interface)
                .map_err(|e| ThermalError::transport("claim interface", map_control_error(e)))?;
            debug!(interface, "claimed interface");
        }

        info!("camera attached");
        Ok(Self { handle })
    }
}

impl Transport for UsbTransport {
    fn control(&mut self, request: ControlRequest) -> std::result::Result<(), TransportError> {
        let payload = vec![0u8; request.data_len];
        self.handle
            .write_control(
                CONTROL_REQUEST_TYPE,
                CONTROL_REQUEST,
                request.value,
                request.index,
                &payload,
                request.timeout,
            )
            .map(|_| ())
            .map_err(map_control_error)
    }

    fn read_bulk(
        &mut self,
        endpoint: u8,
        buf: &mut [u8],
        timeout: Duration,
    ) -> std::result::Result<usize, TransportError> {
        match self.handle.read_bulk(endpoint, buf, timeout) {
            Ok(n) => Ok(n),
            // A timeout discards any partial data; treat it as an empty poll.
            Err(rusb::Error::Timeout) => Ok(0),
            Err(e) => Err(map_bulk_error(e)),
        }
    }
}

impl Drop for UsbTransport {
    fn drop(&mut self) {
        for interface in INTERFACES {
            if let Err(e) = self.handle.release_interface(interface) {
                warn!(interface, error = %e, "failed to release interface");
            }
        }
        // Leave the device in a re-attachable state for the next session.
        if let Err(e) = self.handle.reset() {
            debug!(error = %e, "device reset failed");
        }
    }
}
