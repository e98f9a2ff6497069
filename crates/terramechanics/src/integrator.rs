//! Fixed-step quadrature of the stress field over the contact arc
//!
//! Each reaction is its own full pass: the arc `[exit, entry]` is cut into
//! `N` equal steps (N from the configured rounding convention), the stress
//! field is sampled at all `N + 1` grid angles including both ends, and each
//! sample is weighted by the step width.

use simcore::ContactReaction;

use crate::config::{IntegrationConfig, StepRounding};
use crate::error::NumericDegeneracy;
use crate::geometry::{ContactGeometry, WheelKinematics};
use crate::observer::StressObserver;
use crate::soil::SoilParameters;
use crate::stress::StressField;

#[derive(Clone, Copy)]
pub struct ContactIntegrator<'a> {
    soil: &'a SoilParameters,
    config: &'a IntegrationConfig,
    observer: &'a dyn StressObserver,
}

impl<'a> ContactIntegrator<'a> {
    pub fn new(
        soil: &'a SoilParameters,
        config: &'a IntegrationConfig,
        observer: &'a dyn StressObserver,
    ) -> Self {
        ContactIntegrator {
            soil,
            config,
            observer,
        }
    }

    pub fn soil(&self) -> &SoilParameters {
        self.soil
    }

    pub fn observer(&self) -> &'a dyn StressObserver {
        self.observer
    }

    fn step_count(&self, width: f64, rounding: StepRounding) -> usize {
        let increment = self.config.angular_step_target;
        if !(increment > 0.0) {
            return 0;
        }
        rounding.step_count(width, increment)
    }

    /// Rectangle sum of `integrand(field, angle) * Δθ` over the arc grid.
    fn sweep<F>(&self, geometry: ContactGeometry, rounding: StepRounding, mut integrand: F) -> f64
    where
        F: FnMut(&StressField<'a>, f64) -> f64,
    {
        let width = geometry.arc_width();
        let steps = self.step_count(width, rounding);
        if steps == 0 {
            self.observer
                .on_degeneracy(NumericDegeneracy::ZeroStepCount { width });
            return 0.0;
        }
        if steps > self.config.max_steps {
            self.observer.on_degeneracy(NumericDegeneracy::StepCountExceeded {
                width,
                steps,
                limit: self.config.max_steps,
            });
            return 0.0;
        }

        let field = StressField::new(self.soil, geometry, self.observer);
        let step = width / steps as f64;
        let mut sum = 0.0;
        for i in 0..=steps {
            let angle = geometry.exit_angle + i as f64 * step;
            sum += integrand(&field, angle) * step;
        }
        sum
    }

    /// Vertical load capacity (N) for a trial entry angle. Also the line
    /// search objective.
    pub fn vertical_stress(&self, entry_angle: f64, kinematics: &WheelKinematics) -> f64 {
        let geometry = ContactGeometry::new(*kinematics, entry_angle);
        let sum = self.sweep(geometry, self.config.vertical_rounding, |field, angle| {
            let sample = field.sample(angle);
            if angle >= 0.0 {
                sample.radial * angle.cos() + sample.shear * angle.sin()
            } else {
                sample.radial * angle.cos() - sample.shear * angle.sin()
            }
        });
        sum * kinematics.tire_width * kinematics.tire_radius / 2.0
    }

    /// Motion resistance (N). Resistive over the whole arc, no sign flip.
    pub fn motion_resistance(&self, entry_angle: f64, kinematics: &WheelKinematics) -> f64 {
        let geometry = ContactGeometry::new(*kinematics, entry_angle);
        let sum = self.sweep(geometry, self.config.reaction_rounding, |field, angle| {
            field.radial_stress(angle) * angle.sin()
        });
        sum * kinematics.tire_width * kinematics.tire_radius / 2.0
    }

    /// Thrust (N)
    pub fn thrust(&self, entry_angle: f64, kinematics: &WheelKinematics) -> f64 {
        let geometry = ContactGeometry::new(*kinematics, entry_angle);
        let sum = self.sweep(geometry, self.config.reaction_rounding, |field, angle| {
            let shear = field.sample(angle).shear;
            if angle >= 0.0 {
                shear * angle.cos()
            } else {
                -shear * angle.cos()
            }
        });
        sum * kinematics.tire_width * kinematics.tire_radius / 2.0
    }

    /// Driving torque (N·m)
    pub fn torque(&self, entry_angle: f64, kinematics: &WheelKinematics) -> f64 {
        let geometry = ContactGeometry::new(*kinematics, entry_angle);
        let sum = self.sweep(geometry, self.config.reaction_rounding, |field, angle| {
            let shear = field.sample(angle).shear;
            if angle >= 0.0 {
                shear
            } else {
                -shear
            }
        });
        let radius = kinematics.tire_radius;
        sum * kinematics.tire_width * radius * radius / 4.0
    }

    /// All four reactions, one independent pass each.
    pub fn evaluate(&self, entry_angle: f64, kinematics: &WheelKinematics) -> ContactReaction {
        ContactReaction {
            vertical_load: self.vertical_stress(entry_angle, kinematics),
            motion_resistance: self.motion_resistance(entry_angle, kinematics),
            thrust: self.thrust(entry_angle, kinematics),
            torque: self.torque(entry_angle, kinematics),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::observer::{NullObserver, RecordingObserver};
    use approx::assert_relative_eq;

    fn reference_kinematics(slip_ratio: f64) -> WheelKinematics {
        WheelKinematics::new(0.2, 0.3, 0.1, slip_ratio)
    }

    fn entry() -> f64 {
        45.0_f64.to_radians()
    }

    #[test]
    fn test_sandy_reference_reactions() {
        let soil = SoilParameters::from_preset("sandy").unwrap();
        let config = IntegrationConfig::default();
        let recorder = RecordingObserver::new();
        let integrator = ContactIntegrator::new(&soil, &config, &recorder);

        let reaction = integrator.evaluate(entry(), &reference_kinematics(0.2));

        assert!(reaction.vertical_load.is_finite());
        assert_relative_eq!(reaction.vertical_load, 422_503.300_722_875_7, max_relative = 1e-9);
        assert_relative_eq!(reaction.motion_resistance, 120_043.219_784_260_9, max_relative = 1e-9);
        assert_relative_eq!(reaction.thrust, 158_422.413_359_806_7, max_relative = 1e-9);
        assert_relative_eq!(reaction.torque, 25_007.656_155_030_99, max_relative = 1e-9);
        assert!(recorder.degeneracies.borrow().is_empty());
    }

    #[test]
    fn test_reactions_are_bitwise_repeatable() {
        let soil = SoilParameters::sandy();
        let config = IntegrationConfig::default();
        let integrator = ContactIntegrator::new(&soil, &config, &NullObserver);
        let kin = reference_kinematics(0.2);

        let first = integrator.evaluate(entry(), &kin);
        let second = integrator.evaluate(entry(), &kin);

        assert_eq!(first.vertical_load.to_bits(), second.vertical_load.to_bits());
        assert_eq!(first.motion_resistance.to_bits(), second.motion_resistance.to_bits());
        assert_eq!(first.thrust.to_bits(), second.thrust.to_bits());
        assert_eq!(first.torque.to_bits(), second.torque.to_bits());
    }

    #[test]
    fn test_pass_grids_follow_rounding_conventions() {
        let soil = SoilParameters::sandy();
        let config = IntegrationConfig::default();
        let recorder = RecordingObserver::new();
        let integrator = ContactIntegrator::new(&soil, &config, &recorder);
        let kin = reference_kinematics(0.2);

        // 5 steps -> 6 samples
        integrator.vertical_stress(entry(), &kin);
        assert_eq!(recorder.samples.borrow().len(), 6);
        recorder.clear();

        // 6 steps -> 7 samples, both arc ends included
        integrator.thrust(entry(), &kin);
        let samples = recorder.samples.borrow();
        assert_eq!(samples.len(), 7);
        assert_relative_eq!(samples[0].0, (-5.0_f64).to_radians());
        assert_relative_eq!(samples[6].0, entry(), max_relative = 1e-12);
    }

    #[test]
    fn test_zero_slip_reactions() {
        let soil = SoilParameters::sandy();
        let config = IntegrationConfig::default();
        let integrator = ContactIntegrator::new(&soil, &config, &NullObserver);

        let reaction = integrator.evaluate(entry(), &reference_kinematics(0.0));
        assert_relative_eq!(reaction.vertical_load, 412_231.358_844_025_35, max_relative = 1e-9);
        assert_relative_eq!(reaction.thrust, 100_187.039_775_666_55, max_relative = 1e-9);
        assert!(reaction.thrust < integrator.thrust(entry(), &reference_kinematics(0.2)));
    }

    #[test]
    fn test_vertical_load_grows_with_entry_angle() {
        let soil = SoilParameters::sandy();
        let config = IntegrationConfig::default();
        let integrator = ContactIntegrator::new(&soil, &config, &NullObserver);
        let kin = reference_kinematics(0.2);

        let shallow = integrator.vertical_stress(20.0_f64.to_radians(), &kin);
        let medium = integrator.vertical_stress(30.0_f64.to_radians(), &kin);
        let deep = integrator.vertical_stress(entry(), &kin);
        assert!(shallow < medium && medium < deep);
    }

    #[test]
    fn test_narrow_arc_is_degenerate_for_vertical_pass_only() {
        let soil = SoilParameters::sandy();
        let config = IntegrationConfig::default();
        let recorder = RecordingObserver::new();
        let integrator = ContactIntegrator::new(&soil, &config, &recorder);
        let kin = reference_kinematics(0.2);
        let narrow = 4.0_f64.to_radians();

        assert_eq!(integrator.vertical_stress(narrow, &kin), 0.0);
        assert!(matches!(
            recorder.degeneracies.borrow().as_slice(),
            [NumericDegeneracy::ZeroStepCount { .. }]
        ));

        recorder.clear();
        assert!(integrator.motion_resistance(narrow, &kin).is_finite());
        assert!(!recorder
            .degeneracies
            .borrow()
            .iter()
            .any(|d| matches!(d, NumericDegeneracy::ZeroStepCount { .. })));
    }

    #[test]
    fn test_uniform_rounding_changes_vertical_grid() {
        let soil = SoilParameters::sandy();
        let config = IntegrationConfig::default().with_uniform_rounding(StepRounding::TruncatePlusOne);
        let recorder = RecordingObserver::new();
        let integrator = ContactIntegrator::new(&soil, &config, &recorder);

        integrator.vertical_stress(entry(), &reference_kinematics(0.2));
        assert_eq!(recorder.samples.borrow().len(), 7);
    }

    #[test]
    fn test_non_positive_increment_yields_zero() {
        let soil = SoilParameters::sandy();
        let config = IntegrationConfig::default().with_angular_step_target(0.0);
        let integrator = ContactIntegrator::new(&soil, &config, &NullObserver);

        let reaction = integrator.evaluate(entry(), &reference_kinematics(0.2));
        assert_eq!(reaction, ContactReaction::default());
    }

    #[test]
    fn test_tiny_increment_hits_step_limit() {
        let soil = SoilParameters::sandy();
        let config = IntegrationConfig::default().with_angular_step_target(1e-12);
        let recorder = RecordingObserver::new();
        let integrator = ContactIntegrator::new(&soil, &config, &recorder);

        assert_eq!(integrator.vertical_stress(entry(), &reference_kinematics(0.2)), 0.0);
        assert!(recorder.samples.borrow().is_empty());
        assert!(matches!(
            recorder.degeneracies.borrow().as_slice(),
            [NumericDegeneracy::StepCountExceeded { limit: 10_000, steps, .. }] if *steps > 10_000
        ));
    }

    #[test]
    fn test_step_limit_is_inclusive() {
        let soil = SoilParameters::sandy();
        // 45 deg to -5 deg in 1 deg steps: 50 steps, 51 samples
        let config = IntegrationConfig::default()
            .with_angular_step_target(1.0_f64.to_radians())
            .with_max_steps(50);
        let recorder = RecordingObserver::new();
        let integrator = ContactIntegrator::new(&soil, &config, &recorder);

        let load = integrator.vertical_stress(entry(), &reference_kinematics(0.2));
        assert!(load > 0.0);
        assert!(recorder.degeneracies.borrow().is_empty());
        assert_eq!(recorder.samples.borrow().len(), 51);
    }
}
