use std::env;
use std::error::Error;
use std::fs;

use log::{info, LevelFilter};
use serde::{Deserialize, Serialize};
use simcore::{ContactReaction, MechanicsModel, SimContext, SimState, TrueState, WheelState};
use simplelog::{ColorChoice, Config, TermLogger, TerminalMode};
use terramechanics::{SoilParameters, TerrainContactModel, TerramechanicsConfig, WheelKinematics};

#[derive(Debug, Deserialize)]
struct CustomSoil {
    name: String,
    k1: f64,
    k2: f64,
    n: f64,
    cohesion: f64,
    friction_angle_deg: f64,
    shear_modulus: f64,
    density: f64,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum SoilSource {
    Preset(String),
    Custom(CustomSoil),
}

impl SoilSource {
    fn build(&self) -> Result<SoilParameters, terramechanics::TerrainError> {
        match self {
            SoilSource::Preset(name) => SoilParameters::from_preset(name),
            SoilSource::Custom(c) => Ok(SoilParameters::custom(
                &c.name,
                c.k1,
                c.k2,
                c.n,
                c.cohesion,
                c.friction_angle_deg,
                c.shear_modulus,
                c.density,
            )),
        }
    }
}

#[derive(Debug, Deserialize)]
struct Scenario {
    soil: SoilSource,
    wheel: WheelKinematics,
    #[serde(default)]
    applied_load: f64,
    #[serde(default)]
    config: TerramechanicsConfig,
}

impl Default for Scenario {
    fn default() -> Self {
        Scenario {
            soil: SoilSource::Preset("sandy".to_string()),
            wheel: WheelKinematics::new(0.2, 0.3, 0.1, 0.2),
            applied_load: 0.0,
            config: TerramechanicsConfig::default(),
        }
    }
}

#[derive(Debug, Serialize)]
struct ScenarioOutput {
    soil: String,
    entry_angle_deg: f64,
    reaction: ContactReaction,
    drawbar_pull: f64,
}

fn main() -> Result<(), Box<dyn Error>> {
    let mut scenario_path = None;
    let mut level = LevelFilter::Info;
    for arg in env::args().skip(1) {
        match arg.as_str() {
            "-v" | "--verbose" => level = LevelFilter::Debug,
            "--trace" => level = LevelFilter::Trace,
            path => scenario_path = Some(path.to_string()),
        }
    }

    TermLogger::init(level, Config::default(), TerminalMode::Mixed, ColorChoice::Auto)?;

    let scenario: Scenario = match &scenario_path {
        Some(path) => {
            info!("loading scenario from {path}");
            serde_json::from_str(&fs::read_to_string(path)?)?
        }
        None => {
            info!("no scenario given, running sandy reference wheel");
            Scenario::default()
        }
    };

    let soil = scenario.soil.build()?;
    let classification = soil.classification.to_string();

    let wheel = WheelState::new(
        scenario.wheel.tire_width,
        scenario.wheel.tire_radius,
        scenario.wheel.contact_length,
    )
    .with_slip_ratio(scenario.wheel.slip_ratio)
    .with_applied_load(scenario.applied_load);

    let mut state = SimState {
        true_state: TrueState {
            wheel_states: vec![wheel],
        },
    };

    let mut model = TerrainContactModel::new(scenario.config);
    model.add_wheel_soil(soil);
    model.step_physics(SimContext { dt: 0.0, t: 0.0 }, &mut state);

    let wheel = &state.true_state.wheel_states[0];
    let output = ScenarioOutput {
        soil: classification,
        entry_angle_deg: wheel.entry_angle.to_degrees(),
        reaction: wheel.reaction,
        drawbar_pull: wheel.reaction.drawbar_pull(),
    };
    println!("{}", serde_json::to_string_pretty(&output)?);

    Ok(())
}
