//! Autopilot / navigate control path
//!
//! Desired roll comes from a proportional controller on heading error,
//! scaled by a piecewise airspeed schedule that suppresses roll authority
//! at low airspeed and caps it at high airspeed. Desired pitch follows
//! the same proportional height law as the stabilized altitude hold; no
//! stick override exists here because this path is stick-independent.

use core::f32::consts::PI;

use crate::control::stabilized::height_error_to_pitch;
use crate::control::ControlState;
use crate::parameters::ControlParams;
use crate::snapshot::SensorSnapshot;

/// Cruising airspeed the roll schedule is normalized against, m/s
pub const CRUISE_SPEED_MS: f32 = 20.0;

/// Upper bound of the airspeed gain schedule (reached at 30 m/s)
pub const AIRSPEED_GAIN_MAX: f32 = 1.5;

/// Lower bound of the airspeed gain schedule (reached at 13.2 m/s)
pub const AIRSPEED_GAIN_MIN: f32 = 0.66;

/// Wrap a heading difference into (-pi, pi]
///
/// Both headings are bounded angles, so the difference is already within
/// [-2pi, 2pi) and a single correction suffices.
pub fn wrap_heading_error(error_rad: f32) -> f32 {
    if error_rad > PI {
        error_rad - 2.0 * PI
    } else if error_rad <= -PI {
        error_rad + 2.0 * PI
    } else {
        error_rad
    }
}

/// Airspeed-dependent roll gain: `speed / 20`, clamped to [0.66, 1.5]
///
/// Continuous at both boundaries; monotonic in between.
pub fn airspeed_gain(speed_ms: f32) -> f32 {
    (speed_ms / CRUISE_SPEED_MS).clamp(AIRSPEED_GAIN_MIN, AIRSPEED_GAIN_MAX)
}

/// Update desired roll/pitch from navigation error
pub fn update_desired(state: &mut ControlState, sensors: &SensorSnapshot, params: &ControlParams) {
    let heading_error = wrap_heading_error(sensors.desired_heading - sensors.gps_heading);

    // shortest turn direction, proportional authority only
    let roll = params.heading_to_roll.p * heading_error;
    state.desired_roll = roll * airspeed_gain(sensors.gps_speed);

    state.desired_pitch = height_error_to_pitch(
        state.desired_height,
        sensors.pressure_height,
        params.max_pitch,
    );
}
