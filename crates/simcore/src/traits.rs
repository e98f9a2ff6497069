use serde::{Deserialize, Serialize};

// Mechanical Traits
/// Integrated soil reaction on one wheel.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ContactReaction {
    /// Vertical load capacity (N)
    pub vertical_load: f64,
    /// Motion resistance (N)
    pub motion_resistance: f64,
    /// Thrust (N)
    pub thrust: f64,
    /// Driving torque (N·m)
    pub torque: f64,
}

impl ContactReaction {
    /// Net longitudinal force, thrust minus resistance.
    pub fn drawbar_pull(&self) -> f64 {
        self.thrust - self.motion_resistance
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WheelState {
    pub tire_width: f64,
    pub tire_radius: f64,
    /// Pressure-plate characteristic dimension used as contact length proxy
    pub contact_length: f64,
    pub slip_ratio: f64,
    /// Load the vehicle places on this wheel (N)
    pub applied_load: f64,
    /// Entry angle used by the last contact evaluation (rad)
    pub entry_angle: f64,
    pub reaction: ContactReaction,
}

impl WheelState {
    pub fn new(tire_width: f64, tire_radius: f64, contact_length: f64) -> Self {
        WheelState {
            tire_width,
            tire_radius,
            contact_length,
            slip_ratio: 0.0,
            applied_load: 0.0,
            entry_angle: 0.0,
            reaction: ContactReaction::default(),
        }
    }

    pub fn with_slip_ratio(mut self, slip_ratio: f64) -> Self {
        self.slip_ratio = slip_ratio;
        self
    }

    pub fn with_applied_load(mut self, applied_load: f64) -> Self {
        self.applied_load = applied_load;
        self
    }
}

// General Traits
#[derive(Debug, Default)]
pub struct TrueState {
    pub wheel_states: Vec<WheelState>,
}

#[derive(Debug, Default)]
pub struct SimState {
    pub true_state: TrueState,
}

#[derive(Debug, Clone, Copy)]
pub struct SimContext {
    pub dt: f64,
    pub t: f64,
}

pub trait Model {
    fn reset(&mut self);
}

pub trait MechanicsModel: Model {
    fn step_physics(&mut self, ctx: SimContext, state: &mut SimState);
}
