use serde::{Deserialize, Serialize};

use crate::config::{SolverConfig, DEFAULT_ENTRY_ANGLE_DEG};
use crate::geometry::WheelKinematics;
use crate::integrator::ContactIntegrator;
use crate::line_search::EquilibriumSolver;

/// How the contact entry angle is chosen for an evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum EntryAngleStrategy {
    /// Constant entry angle (rad)
    FixedAngle { angle: f64 },
    /// Entry angle whose vertical load balances `target_load` (N)
    SolvedAngle { target_load: f64 },
}

impl Default for EntryAngleStrategy {
    fn default() -> Self {
        EntryAngleStrategy::FixedAngle {
            angle: DEFAULT_ENTRY_ANGLE_DEG.to_radians(),
        }
    }
}

impl EntryAngleStrategy {
    pub fn fixed_degrees(angle_deg: f64) -> Self {
        EntryAngleStrategy::FixedAngle {
            angle: angle_deg.to_radians(),
        }
    }

    pub fn resolve(
        &self,
        integrator: ContactIntegrator<'_>,
        solver: &SolverConfig,
        kinematics: &WheelKinematics,
    ) -> f64 {
        match *self {
            EntryAngleStrategy::FixedAngle { angle } => angle,
            EntryAngleStrategy::SolvedAngle { target_load } => {
                EquilibriumSolver::new(integrator, solver)
                    .solve(kinematics, target_load)
                    .reported_angle
            }
        }
    }
}
