use serde::{Deserialize, Serialize};
use simcore::WheelState;

use crate::config::{DEFAULT_ENTRY_ANGLE_DEG, EXIT_ANGLE_DEG};

/// Per-call wheel inputs supplied by the vehicle model. No bounds are enforced.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WheelKinematics {
    /// Tire width (m)
    pub tire_width: f64,
    /// Tire radius (m)
    pub tire_radius: f64,
    /// Pressure-plate main dimension, the contact length proxy (m)
    pub contact_length: f64,
    /// Slip ratio, conventionally in [-1, 1]
    pub slip_ratio: f64,
}

impl WheelKinematics {
    pub fn new(tire_width: f64, tire_radius: f64, contact_length: f64, slip_ratio: f64) -> Self {
        WheelKinematics {
            tire_width,
            tire_radius,
            contact_length,
            slip_ratio,
        }
    }

    pub fn with_slip_ratio(mut self, slip_ratio: f64) -> Self {
        self.slip_ratio = slip_ratio;
        self
    }
}

impl From<&WheelState> for WheelKinematics {
    fn from(wheel: &WheelState) -> Self {
        WheelKinematics {
            tire_width: wheel.tire_width,
            tire_radius: wheel.tire_radius,
            contact_length: wheel.contact_length,
            slip_ratio: wheel.slip_ratio,
        }
    }
}

/// Kinematics plus the contact arc `[exit_angle, entry_angle]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContactGeometry {
    pub kinematics: WheelKinematics,
    /// Angle where soil first meets the wheel (rad)
    pub entry_angle: f64,
    /// Angle where soil leaves the wheel (rad)
    pub exit_angle: f64,
}

impl ContactGeometry {
    pub fn new(kinematics: WheelKinematics, entry_angle: f64) -> Self {
        ContactGeometry {
            kinematics,
            entry_angle,
            exit_angle: EXIT_ANGLE_DEG.to_radians(),
        }
    }

    /// Geometry at the default fixed entry angle.
    pub fn with_default_entry(kinematics: WheelKinematics) -> Self {
        Self::new(kinematics, DEFAULT_ENTRY_ANGLE_DEG.to_radians())
    }

    pub fn arc_width(&self) -> f64 {
        self.entry_angle - self.exit_angle
    }

    pub fn contains(&self, angle: f64) -> bool {
        angle >= self.exit_angle && angle <= self.entry_angle
    }
}
