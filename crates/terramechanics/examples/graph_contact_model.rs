use plotters::prelude::*;
use simcore::{MechanicsModel, SimContext, SimState, TrueState, WheelState};
use terramechanics::{
    ContactGeometry, NullObserver, SoilParameters, StressField, TerrainContactModel,
    TerramechanicsConfig, WheelKinematics,
};

fn draw_series(
    filename: &str,
    title: &str,
    x_label: &str,
    y_label: &str,
    x: &[f64],
    series: &[(&str, &[f64], RGBColor)],
) -> Result<(), Box<dyn std::error::Error>> {
    let root = BitMapBackend::new(filename, (1024, 768)).into_drawing_area();
    root.fill(&WHITE)?;

    let x_min = x.iter().cloned().fold(f64::INFINITY, f64::min);
    let x_max = x.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    let y_min = series
        .iter()
        .flat_map(|(_, y, _)| y.iter().cloned())
        .fold(f64::INFINITY, f64::min);
    let y_max = series
        .iter()
        .flat_map(|(_, y, _)| y.iter().cloned())
        .fold(f64::NEG_INFINITY, f64::max);

    let mut chart = ChartBuilder::on(&root)
        .caption(title, ("Arial", 28))
        .margin(20)
        .x_label_area_size(40)
        .y_label_area_size(80)
        .build_cartesian_2d(x_min..x_max, y_min..y_max)?;

    chart.configure_mesh().x_desc(x_label).y_desc(y_label).draw()?;

    for (label, y, color) in series {
        let color = *color;
        chart
            .draw_series(LineSeries::new(
                x.iter().cloned().zip(y.iter().cloned()),
                &color,
            ))?
            .label(*label)
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color.filled()));
    }

    chart.configure_series_labels().border_style(&BLACK).draw()?;

    root.present()?;
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let soil = SoilParameters::from_preset("sandy")?;
    let kinematics = WheelKinematics::new(0.2, 0.3, 0.1, 0.2);

    // 1) Stress distribution over the contact arc at the default entry angle
    let field = StressField::new(&soil, ContactGeometry::with_default_entry(kinematics), &NullObserver);
    let mut angles = Vec::new();
    let mut radial = Vec::new();
    let mut shear = Vec::new();
    for tenth_deg in -60..=460 {
        let angle_deg = tenth_deg as f64 / 10.0;
        let sample = field.sample(angle_deg.to_radians());
        angles.push(angle_deg);
        radial.push(sample.radial / 1000.0);
        shear.push(sample.shear / 1000.0);
    }

    draw_series(
        "stress_vs_contact_angle.png",
        "Contact Stress vs Angle (sandy, s = 0.2)",
        "Contact Angle [deg]",
        "Stress [kPa]",
        &angles,
        &[("radial", radial.as_slice(), BLUE), ("shear", shear.as_slice(), RED)],
    )?;

    // 2) Thrust and drawbar pull vs slip ratio through the bus model
    let mut model = TerrainContactModel::new(TerramechanicsConfig::default());
    model.add_wheel_soil(soil);
    let mut state = SimState {
        true_state: TrueState {
            wheel_states: vec![WheelState::new(0.2, 0.3, 0.1)],
        },
    };

    let mut slips = Vec::new();
    let mut thrust = Vec::new();
    let mut drawbar = Vec::new();
    let n = 201;
    for i in 0..n {
        let slip = -0.9 + 1.8 * (i as f64) / ((n - 1) as f64);
        state.true_state.wheel_states[0].slip_ratio = slip;

        model.step_physics(SimContext { dt: 0.0, t: 0.0 }, &mut state);

        let reaction = state.true_state.wheel_states[0].reaction;
        slips.push(slip);
        thrust.push(reaction.thrust);
        drawbar.push(reaction.drawbar_pull());
    }

    draw_series(
        "thrust_vs_slip_ratio.png",
        "Thrust vs Slip Ratio (sandy)",
        "Slip Ratio [-]",
        "Force [N]",
        &slips,
        &[("thrust", thrust.as_slice(), BLUE), ("drawbar pull", drawbar.as_slice(), GREEN)],
    )?;

    println!("Wrote plots: stress_vs_contact_angle.png, thrust_vs_slip_ratio.png");

    Ok(())
}
