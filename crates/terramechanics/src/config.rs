//! Numeric configuration for the contact integrator and line search
//!
//! Every constant the inner loops depend on lives here and is passed in by
//! reference, so several terrain/vehicle setups can run side by side.

use std::f64::consts::FRAC_PI_2;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::entry_angle::EntryAngleStrategy;
use crate::error::TerrainError;

/// Exit angle of the contact arc (deg). Fixed policy, not derived.
pub const EXIT_ANGLE_DEG: f64 = -5.0;
/// Entry angle used when no solver is involved (deg)
pub const DEFAULT_ENTRY_ANGLE_DEG: f64 = 45.0;
/// Angle reported by the line search under [`ResultPolicy::LegacyConstant`] (deg)
pub const LEGACY_SOLVED_ANGLE_DEG: f64 = 20.0;

/// How the fixed-step quadrature turns the arc width into a step count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StepRounding {
    /// `trunc(width / increment)`
    Truncate,
    /// `trunc(width / increment) + 1`
    TruncatePlusOne,
}

impl StepRounding {
    pub fn step_count(self, width: f64, increment: f64) -> usize {
        let steps = (width / increment).trunc();
        // Negative or NaN ratios saturate to zero in the cast
        let steps = steps as usize;
        match self {
            StepRounding::Truncate => steps,
            StepRounding::TruncatePlusOne => steps.saturating_add(1),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IntegrationConfig {
    /// Nominal angular increment of the quadrature (rad)
    pub angular_step_target: f64,
    /// Rounding used by the vertical load pass
    pub vertical_rounding: StepRounding,
    /// Rounding used by the resistance, thrust and torque passes
    pub reaction_rounding: StepRounding,
    /// Largest step count a single pass may run
    pub max_steps: usize,
}

impl Default for IntegrationConfig {
    fn default() -> Self {
        IntegrationConfig {
            angular_step_target: 10.0_f64.to_radians(),
            vertical_rounding: StepRounding::Truncate,
            reaction_rounding: StepRounding::TruncatePlusOne,
            max_steps: 10_000,
        }
    }
}

impl IntegrationConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_angular_step_target(mut self, step: f64) -> Self {
        self.angular_step_target = step;
        self
    }

    pub fn with_max_steps(mut self, max_steps: usize) -> Self {
        self.max_steps = max_steps;
        self
    }

    /// Use the same rounding convention for all four passes.
    pub fn with_uniform_rounding(mut self, rounding: StepRounding) -> Self {
        self.vertical_rounding = rounding;
        self.reaction_rounding = rounding;
        self
    }
}

/// What the line search hands back once it stops.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ResultPolicy {
    /// The parabolic vertex estimate
    #[default]
    Estimate,
    /// Run the search for its diagnostics but report the legacy constant
    LegacyConstant,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverConfig {
    /// First trial step of the bracketing phase (rad)
    pub initial_step: f64,
    /// Maximum halvings of the initial step, and maximum bracket expansions
    pub retry_budget: u32,
    /// Convergence threshold on successive vertex estimates (rad)
    pub tolerance: f64,
    /// Iteration cap of the interpolation phase
    pub max_iterations: u32,
    /// Largest trial entry angle the search may evaluate (rad)
    pub max_entry_angle: f64,
    pub result_policy: ResultPolicy,
}

impl Default for SolverConfig {
    fn default() -> Self {
        SolverConfig {
            initial_step: 5.0_f64.to_radians(),
            retry_budget: 20,
            tolerance: 0.01,
            max_iterations: 100,
            max_entry_angle: FRAC_PI_2,
            result_policy: ResultPolicy::Estimate,
        }
    }
}

impl SolverConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_initial_step(mut self, step: f64) -> Self {
        self.initial_step = step;
        self
    }

    pub fn with_retry_budget(mut self, budget: u32) -> Self {
        self.retry_budget = budget;
        self
    }

    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    pub fn with_max_iterations(mut self, iterations: u32) -> Self {
        self.max_iterations = iterations;
        self
    }

    pub fn with_max_entry_angle(mut self, angle: f64) -> Self {
        self.max_entry_angle = angle;
        self
    }

    pub fn with_result_policy(mut self, policy: ResultPolicy) -> Self {
        self.result_policy = policy;
        self
    }
}

/// Top-level configuration for a terrain contact setup
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TerramechanicsConfig {
    pub integration: IntegrationConfig,
    pub solver: SolverConfig,
    pub entry_angle: EntryAngleStrategy,
    /// Solve each wheel's entry angle against the load found on the bus
    pub solve_for_applied_load: bool,
    /// Emit every stress sample at trace level
    pub log_samples: bool,
}

impl TerramechanicsConfig {
    pub fn from_json_str(json: &str) -> Result<Self, TerrainError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, TerrainError> {
        let contents = fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }

    pub fn with_entry_angle(mut self, strategy: EntryAngleStrategy) -> Self {
        self.entry_angle = strategy;
        self
    }

    pub fn with_solver(mut self, solver: SolverConfig) -> Self {
        self.solver = solver;
        self
    }

    pub fn with_integration(mut self, integration: IntegrationConfig) -> Self {
        self.integration = integration;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_step_counts_for_reference_arc() {
        let config = IntegrationConfig::default();
        let width = DEFAULT_ENTRY_ANGLE_DEG.to_radians() - EXIT_ANGLE_DEG.to_radians();

        let vertical = config.vertical_rounding.step_count(width, config.angular_step_target);
        let reaction = config.reaction_rounding.step_count(width, config.angular_step_target);

        assert_eq!(vertical, 5);
        assert_eq!(reaction, 6);
    }

    #[test]
    fn test_narrow_arc_truncates_to_zero_steps() {
        let step = 10.0_f64.to_radians();
        assert_eq!(StepRounding::Truncate.step_count(5.0_f64.to_radians(), step), 0);
        assert_eq!(StepRounding::TruncatePlusOne.step_count(5.0_f64.to_radians(), step), 1);
        assert_eq!(StepRounding::Truncate.step_count(-1.0, step), 0);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = TerramechanicsConfig::from_json_str(
            r#"{ "solver": { "tolerance": 0.001 }, "log_samples": true }"#,
        )
        .unwrap();

        assert_eq!(config.solver.tolerance, 0.001);
        assert_eq!(config.solver.max_iterations, 100);
        assert!(config.log_samples);
        assert_eq!(config.integration, IntegrationConfig::default());
        assert_eq!(config.entry_angle, EntryAngleStrategy::default());
    }

    #[test]
    fn test_strategy_selected_from_json() {
        let config = TerramechanicsConfig::from_json_str(
            r#"{ "entry_angle": { "SolvedAngle": { "target_load": 1500.0 } } }"#,
        )
        .unwrap();
        assert_eq!(config.entry_angle, EntryAngleStrategy::SolvedAngle { target_load: 1500.0 });

        let roundtrip: TerramechanicsConfig =
            serde_json::from_str(&serde_json::to_string(&config).unwrap()).unwrap();
        assert_eq!(roundtrip, config);
    }

    #[test]
    fn test_malformed_json_is_config_error() {
        let err = TerramechanicsConfig::from_json_str("{ not json").unwrap_err();
        assert!(matches!(err, TerrainError::Config(_)));
    }
}
