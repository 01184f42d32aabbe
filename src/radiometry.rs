//! Radiometric model.
//!
//! Converts one raw sensor count into an object temperature estimate via the
//! Planck-law formula used by the vendor's calibration, with fixed emissivity
//! and reflected-temperature assumptions. The constants are build-time
//! calibration values, not derived from the device.

/// Planck calibration constant R1.
pub const PLANCK_R1: f64 = 16528.178;
/// Planck calibration constant R2.
pub const PLANCK_R2: f64 = 0.012258549;
/// Planck calibration constant B.
pub const PLANCK_B: f64 = 1427.5;
/// Planck calibration constant F.
pub const PLANCK_F: f64 = 1.0;
/// Planck calibration constant O (offset).
pub const PLANCK_O: f64 = -1307.0;
/// Assumed emissivity of the observed object.
pub const EMISSIVITY: f64 = 0.95;
/// Assumed temperature of reflected radiation, in degrees Celsius.
pub const TEMP_REFLECTED: f64 = 20.0;

const KELVIN_OFFSET: f64 = 273.15;

/// Estimated object temperature in degrees Celsius for one raw sensor count.
///
/// Applies the fixed ×4 sensor correction, subtracts the radiance reflected
/// off the object (emissivity < 1), and inverts the Planck curve. Returns
/// `NaN` for raw counts below the formula's physical domain (~500 for these
/// constants); real sensor counts sit well above it.
pub fn temperature_celsius(raw: u16) -> f64 {
    // Mystery correction factor, applied in f64 so large counts cannot wrap.
    let raw = f64::from(raw) * 4.0;

    // Radiance of reflected objects for the assumed ambient temperature.
    let raw_refl = PLANCK_R1
        / (PLANCK_R2 * ((PLANCK_B / (TEMP_REFLECTED + KELVIN_OFFSET)).exp() - PLANCK_F))
        - PLANCK_O;

    // Radiance attributable to the object itself.
    let raw_obj = (raw - (1.0 - EMISSIVITY) * raw_refl) / EMISSIVITY;

    PLANCK_B / (PLANCK_R1 / (PLANCK_R2 * (raw_obj + PLANCK_O)) + PLANCK_F).ln() - KELVIN_OFFSET
}
