//! Frame decoding: thermal extraction, statistics, overlay, colorization.
//!
//! One decode cycle takes a complete [`LogicalFrame`] and produces the two
//! output blobs: the untouched visible payload and a false-colored thermal
//! image annotated with min/center/max temperatures, a clock, a center
//! crosshair and a hot-spot marker. All intermediate buffers are scoped to
//! the cycle and discarded after the sink writes.

use chrono::Local;
use tracing::{debug, trace};

use crate::colormap::Colormap;
use crate::overlay::{Canvas, DEFAULT_COLOR};
use crate::radiometry::temperature_celsius;
use crate::variant::CameraVariant;
use crate::wire::LogicalFrame;
use crate::{Result, ThermalError};

/// Raw 16-bit sensor grid for one frame, with derived statistics.
#[derive(Debug, Clone)]
pub struct ThermalGrid {
    width: usize,
    height: usize,
    samples: Vec<u16>,
    min: u16,
    max: u16,
    max_pos: (usize, usize),
}

impl ThermalGrid {
    /// Extract the sensor grid from a logical frame using the variant's
    /// row layout.
    ///
    /// Fails when the frame is too short for the layout, or when no pixel
    /// ever raises the maximum above the zero sentinel (a degenerate grid
    /// would otherwise place the hot-spot marker at an undefined position).
    pub fn extract(frame: &LogicalFrame<'_>, variant: CameraVariant) -> Result<Self> {
        let (width, height) = variant.sensor_size();
        let mut samples = vec![0u16; width * height];
        let mut min = u16::MAX;
        let mut max = 0u16;
        let mut max_pos = None;

        for y in 0..height {
            for x in 0..width {
                let v = frame.sample(variant.pixel_offset(x, y))?;
                samples[y * width + x] = v;
                if v < min {
                    min = v;
                }
                // Strict comparison: first occurrence wins on ties.
                if v > max {
                    max = v;
                    max_pos = Some((x, y));
                }
            }
        }

        let max_pos = max_pos.ok_or_else(|| {
            ThermalError::decode("thermal grid", "degenerate grid: no maximum detected")
        })?;

        Ok(Self { width, height, samples, min, max, max_pos })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Raw count at `(x, y)`.
    pub fn at(&self, x: usize, y: usize) -> u16 {
        self.samples[y * self.width + x]
    }

    pub fn min(&self) -> u16 {
        self.min
    }

    pub fn max(&self) -> u16 {
        self.max
    }

    /// Coordinate of the hottest pixel.
    pub fn max_pos(&self) -> (usize, usize) {
        self.max_pos
    }

    /// Average of the four raw counts in the 2×2 block at the grid center,
    /// the "object" reading, as opposed to the single hottest pixel.
    pub fn center_average(&self) -> u16 {
        let hw = self.width / 2;
        let hh = self.height / 2;
        let sum = u32::from(self.at(hw - 1, hh - 1))
            + u32::from(self.at(hw, hh - 1))
            + u32::from(self.at(hw - 1, hh))
            + u32::from(self.at(hw, hh));
        (sum / 4) as u16
    }
}

/// Displayed temperatures and raw statistics for one decoded frame.
#[derive(Debug, Clone, Copy)]
pub struct FrameStats {
    pub raw_min: u16,
    pub raw_max: u16,
    pub raw_center: u16,
    pub max_pos: (usize, usize),
    pub celsius_min: f64,
    pub celsius_center: f64,
    pub celsius_max: f64,
}

/// One fully-decoded frame ready for the output sinks.
#[derive(Debug, Clone)]
pub struct DecodedFrame {
    /// Opaque compressed visible image, forwarded verbatim.
    pub visible: Vec<u8>,
    /// Colorized thermal image, RGB triplets, display dimensions.
    pub thermal_rgb: Vec<u8>,
    /// Whether the frame carried the flat-field-correction marker.
    pub ffc_marked: bool,
    /// Absent in palette-preview mode.
    pub stats: Option<FrameStats>,
}

/// Decodes logical frames for one camera variant and palette configuration.
#[derive(Debug, Clone)]
pub struct FrameDecoder {
    variant: CameraVariant,
    colormap: Colormap,
    invert: bool,
    preview: bool,
}

impl FrameDecoder {
    pub fn new(variant: CameraVariant, colormap: Colormap) -> Self {
        Self { variant, colormap, invert: false, preview: false }
    }

    /// Map grayscale through the inverted palette.
    pub fn invert(mut self, invert: bool) -> Self {
        self.invert = invert;
        self
    }

    /// Render the palette gradient instead of sensor data.
    pub fn preview(mut self, preview: bool) -> Self {
        self.preview = preview;
        self
    }

    pub fn variant(&self) -> CameraVariant {
        self.variant
    }

    /// Decode one logical frame, stamping the current local time into the
    /// overlay.
    pub fn decode(&self, frame: &LogicalFrame<'_>) -> Result<DecodedFrame> {
        self.decode_with_clock(frame, &Local::now().format("%H:%M:%S").to_string())
    }

    /// Decode with an explicit clock string (deterministic for tests).
    pub fn decode_with_clock(&self, frame: &LogicalFrame<'_>, clock: &str) -> Result<DecodedFrame> {
        let visible = frame.visible()?.to_vec();
        let ffc_marked = frame.ffc_marked();

        if self.preview {
            trace!("palette preview frame");
            return Ok(DecodedFrame {
                visible,
                thermal_rgb: self.preview_gradient(),
                ffc_marked,
                stats: None,
            });
        }

        let grid = ThermalGrid::extract(frame, self.variant)?;
        let stats = self.stats_for(&grid);
        let canvas = self.compose(&grid, &stats, clock);

        debug!(
            raw_min = stats.raw_min,
            raw_max = stats.raw_max,
            max_x = stats.max_pos.0,
            max_y = stats.max_pos.1,
            ffc = ffc_marked,
            "decoded frame"
        );

        Ok(DecodedFrame { visible, thermal_rgb: self.colorize(&canvas), ffc_marked, stats: Some(stats) })
    }

    fn stats_for(&self, grid: &ThermalGrid) -> FrameStats {
        let raw_center = grid.center_average();
        FrameStats {
            raw_min: grid.min(),
            raw_max: grid.max(),
            raw_center,
            max_pos: grid.max_pos(),
            celsius_min: temperature_celsius(grid.min()),
            celsius_center: temperature_celsius(raw_center),
            celsius_max: temperature_celsius(grid.max()),
        }
    }

    /// Rescale the grid into the display canvas and draw the overlay.
    fn compose(&self, grid: &ThermalGrid, stats: &FrameStats, clock: &str) -> Canvas {
        let (width, height) = self.variant.display_size();
        let (ow, oh) = self.variant.sensor_size();
        let mut canvas = Canvas::new(width, height);

        // Linear rescale of raw counts into 0..=255; a flat grid maps to a
        // single level with no division by zero.
        let delta = u32::from(stats.raw_max - stats.raw_min).max(1);
        let scale = 0x10000 / delta;
        for y in 0..oh {
            for x in 0..ow {
                let v = (u32::from(grid.at(x, y) - stats.raw_min) * scale) >> 8;
                canvas.put(x, y, v.min(255) as u8);
            }
        }

        // Temperature line(s) and clock, just below the image area.
        let line1 = format!("'C {:.1}/{:.1}/", stats.celsius_min, stats.celsius_center);
        let line2 = format!("{:.1} {clock}", stats.celsius_max);
        let limit = self.variant.max_line_chars() - 1;
        match self.variant {
            CameraVariant::Pro => {
                let mut line = line1 + &line2;
                line.truncate(limit);
                canvas.draw_text(1, oh, &line, DEFAULT_COLOR);
            }
            CameraVariant::G3 => {
                let mut line1 = line1;
                let mut line2 = line2;
                line1.truncate(limit);
                line2.truncate(limit);
                canvas.draw_text(1, oh + 2, &line1, DEFAULT_COLOR);
                canvas.draw_text(1, oh + 12, &line2, DEFAULT_COLOR);
            }
        }

        // Center crosshair.
        let (hw, hh) = (ow / 2, oh / 2);
        canvas.draw_text(hw - 2, hh - 3, "+", DEFAULT_COLOR);

        // Hot-spot marker, pulled inside the drawable margin.
        let (max_x, max_y) = stats.max_pos;
        let mx = max_x.saturating_sub(4).min(ow - 10);
        let my = max_y.saturating_sub(4).min(oh - 10);
        canvas.draw_text(ow - 6, my, "<", DEFAULT_COLOR);
        canvas.draw_text(mx, oh - 8, "|", DEFAULT_COLOR);

        canvas
    }

    fn colorize(&self, canvas: &Canvas) -> Vec<u8> {
        let mut rgb = Vec::with_capacity(canvas.pixels().len() * 3);
        for &gray in canvas.pixels() {
            let index = if self.invert { 255 - gray } else { gray };
            rgb.extend_from_slice(&self.colormap.rgb(index));
        }
        rgb
    }

    /// Horizontal palette gradient at display dimensions.
    fn preview_gradient(&self) -> Vec<u8> {
        let (width, height) = self.variant.display_size();
        let mut rgb = Vec::with_capacity(width * height * 3);
        for _y in 0..height {
            for x in 0..width {
                rgb.extend_from_slice(&self.colormap.sample(x, width));
            }
        }
        rgb
    }
}
