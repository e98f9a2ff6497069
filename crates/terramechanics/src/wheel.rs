use log::debug;
use simcore::{MechanicsModel, Model, SimContext, SimState};

use crate::config::TerramechanicsConfig;
use crate::entry_angle::EntryAngleStrategy;
use crate::geometry::WheelKinematics;
use crate::integrator::ContactIntegrator;
use crate::observer::LogObserver;
use crate::soil::SoilParameters;

/// Publishes soil reactions for every wheel on the bus.
///
/// Wheel `i` runs on `soils[i]`; wheels beyond the soil list are left alone.
pub struct TerrainContactModel {
    pub soils: Vec<SoilParameters>,
    pub config: TerramechanicsConfig,
}

impl TerrainContactModel {
    pub fn new(config: TerramechanicsConfig) -> Self {
        TerrainContactModel {
            soils: Vec::new(),
            config,
        }
    }

    pub fn add_wheel_soil(&mut self, soil: SoilParameters) {
        self.soils.push(soil);
    }

    fn strategy_for(&self, applied_load: f64) -> EntryAngleStrategy {
        if self.config.solve_for_applied_load {
            EntryAngleStrategy::SolvedAngle {
                target_load: applied_load,
            }
        } else {
            self.config.entry_angle
        }
    }
}

impl Model for TerrainContactModel {
    fn reset(&mut self) {
        // Soil and configuration are immutable, nothing carries across steps
    }
}

impl MechanicsModel for TerrainContactModel {
    fn step_physics(&mut self, ctx: SimContext, state: &mut SimState) {
        let observer = LogObserver::new(self.config.log_samples);
        for (i, (soil, wheel)) in self
            .soils
            .iter()
            .zip(state.true_state.wheel_states.iter_mut())
            .enumerate()
        {
            let integrator = ContactIntegrator::new(soil, &self.config.integration, &observer);
            let kinematics = WheelKinematics::from(&*wheel);

            let entry_angle = self.strategy_for(wheel.applied_load).resolve(
                integrator,
                &self.config.solver,
                &kinematics,
            );
            wheel.entry_angle = entry_angle;
            wheel.reaction = integrator.evaluate(entry_angle, &kinematics);

            debug!(
                "t={:.4} wheel {} on {}: entry={:.4} rad {:?}",
                ctx.t, i, soil.classification, entry_angle, wheel.reaction
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{IntegrationConfig, SolverConfig};
    use crate::observer::NullObserver;
    use simcore::{ContactReaction, TrueState, WheelState};

    fn create_test_state(num_wheels: usize) -> SimState {
        let wheel_states = (0..num_wheels)
            .map(|_| {
                WheelState::new(0.2, 0.3, 0.1)
                    .with_slip_ratio(0.2)
                    .with_applied_load(100_000.0)
            })
            .collect();
        SimState {
            true_state: TrueState { wheel_states },
        }
    }

    #[test]
    fn test_step_writes_reaction_for_each_wheel() {
        let mut model = TerrainContactModel::new(TerramechanicsConfig::default());
        model.add_wheel_soil(SoilParameters::sandy());
        model.add_wheel_soil(SoilParameters::clayey());
        let mut state = create_test_state(2);

        model.step_physics(SimContext { dt: 0.01, t: 0.0 }, &mut state);

        let soil = SoilParameters::sandy();
        let integration = IntegrationConfig::default();
        let expected = ContactIntegrator::new(&soil, &integration, &NullObserver)
            .evaluate(45.0_f64.to_radians(), &WheelKinematics::new(0.2, 0.3, 0.1, 0.2));

        let wheels = &state.true_state.wheel_states;
        assert_eq!(wheels[0].reaction, expected);
        assert_eq!(wheels[0].entry_angle, 45.0_f64.to_radians());
        assert_ne!(wheels[1].reaction, ContactReaction::default());
        assert_ne!(wheels[1].reaction, expected);
    }

    #[test]
    fn test_wheels_without_soil_are_untouched() {
        let mut model = TerrainContactModel::new(TerramechanicsConfig::default());
        model.add_wheel_soil(SoilParameters::sandy());
        let mut state = create_test_state(2);

        model.step_physics(SimContext { dt: 0.01, t: 0.0 }, &mut state);

        assert_eq!(state.true_state.wheel_states[1].reaction, ContactReaction::default());
        assert_eq!(state.true_state.wheel_states[1].entry_angle, 0.0);
    }

    #[test]
    fn test_solve_for_applied_load_uses_bus_load() {
        let config = TerramechanicsConfig {
            solve_for_applied_load: true,
            ..Default::default()
        };
        let mut model = TerrainContactModel::new(config);
        model.add_wheel_soil(SoilParameters::sandy());
        let mut state = create_test_state(1);

        model.step_physics(SimContext { dt: 0.01, t: 0.0 }, &mut state);

        let soil = SoilParameters::sandy();
        let integration = IntegrationConfig::default();
        let solver = SolverConfig::default();
        let expected = EntryAngleStrategy::SolvedAngle { target_load: 100_000.0 }.resolve(
            ContactIntegrator::new(&soil, &integration, &NullObserver),
            &solver,
            &WheelKinematics::new(0.2, 0.3, 0.1, 0.2),
        );

        let wheel = &state.true_state.wheel_states[0];
        assert_eq!(wheel.entry_angle, expected);
        assert!(wheel.entry_angle < 45.0_f64.to_radians());
    }
}
