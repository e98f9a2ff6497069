//! Wheel/soil contact-patch terramechanics
//!
//! This crate provides:
//! - Soil parameter presets and custom soils
//! - Reece radial and Janosi-Hanamoto shear stress along the contact arc
//! - Fixed-step integration of vertical load, motion resistance, thrust and torque
//! - A line search for the entry angle that balances an applied load
//! - A bus-facing mechanics model publishing reactions per wheel

pub mod config;
pub mod entry_angle;
pub mod error;
pub mod geometry;
pub mod integrator;
pub mod line_search;
pub mod observer;
pub mod soil;
pub mod stress;
pub mod wheel;

pub use config::{IntegrationConfig, ResultPolicy, SolverConfig, StepRounding, TerramechanicsConfig};
pub use entry_angle::EntryAngleStrategy;
pub use error::{NumericDegeneracy, TerrainError};
pub use geometry::{ContactGeometry, WheelKinematics};
pub use integrator::ContactIntegrator;
pub use line_search::{Bracket, EquilibriumSolver, LineSearchReport, SearchEvent, SearchPhase};
pub use observer::{LogObserver, NullObserver, RecordingObserver, StressObserver};
pub use simcore::ContactReaction as ReactionResult;
pub use soil::{SoilClass, SoilParameters};
pub use stress::{max_radial_stress_angle, RadialArc, StressField, StressSample};
pub use wheel::TerrainContactModel;
