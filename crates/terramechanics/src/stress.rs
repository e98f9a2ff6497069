//! Stress distribution along the wheel/soil contact arc
//!
//! Radial stress follows the Reece pressure-sinkage form, split into a front
//! arc (peak angle to entry angle) and a rear arc (exit angle to peak angle).
//! The rear arc reuses the front shape through a linear angle remapping so the
//! two meet at the peak. Shear stress is Mohr-Coulomb capacity mobilized by
//! the Janosi-Hanamoto exponential law.
//!
//! Angles are measured from the downward vertical through the axle, positive
//! toward the direction of travel.

use std::f64::consts::FRAC_PI_4;

use crate::error::NumericDegeneracy;
use crate::geometry::ContactGeometry;
use crate::observer::StressObserver;
use crate::soil::SoilParameters;

/// Radial and shear stress at one contact angle (Pa)
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct StressSample {
    pub radial: f64,
    pub shear: f64,
}

/// Which Reece form governs an angle inside the contact arc.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RadialArc {
    /// `[peak, entry]`
    Front,
    /// `[exit, peak)`
    Rear,
}

/// Angle of peak radial stress for a given slip ratio (rad).
///
/// Root of `tan θ = κ·s` with `κ = tan(π/4 − φ/2)`, clamped into `[0, φ/3]`.
pub fn max_radial_stress_angle(soil: &SoilParameters, slip_ratio: f64) -> f64 {
    let kappa = (FRAC_PI_4 - soil.friction_angle / 2.0).tan();
    let root = (kappa * slip_ratio).atan();
    // max last: a negative friction angle pins the peak to zero
    root.min(soil.friction_angle / 3.0).max(0.0)
}

/// Stateless stress evaluation over one contact geometry.
pub struct StressField<'a> {
    soil: &'a SoilParameters,
    geometry: ContactGeometry,
    peak_angle: f64,
    observer: &'a dyn StressObserver,
}

impl<'a> StressField<'a> {
    pub fn new(
        soil: &'a SoilParameters,
        geometry: ContactGeometry,
        observer: &'a dyn StressObserver,
    ) -> Self {
        let peak_angle = max_radial_stress_angle(soil, geometry.kinematics.slip_ratio);
        StressField {
            soil,
            geometry,
            peak_angle,
            observer,
        }
    }

    pub fn geometry(&self) -> &ContactGeometry {
        &self.geometry
    }

    pub fn exit_angle(&self) -> f64 {
        self.geometry.exit_angle
    }

    pub fn entry_angle(&self) -> f64 {
        self.geometry.entry_angle
    }

    pub fn max_radial_stress_angle(&self) -> f64 {
        self.peak_angle
    }

    /// `None` outside `[exit, entry]`.
    pub fn arc(&self, angle: f64) -> Option<RadialArc> {
        if !self.geometry.contains(angle) {
            None
        } else if angle >= self.peak_angle {
            Some(RadialArc::Front)
        } else {
            Some(RadialArc::Rear)
        }
    }

    /// `(c·k1 + ρ·g·b·k2)·(r/b)^n`
    fn pressure_coefficient(&self) -> f64 {
        let soil = self.soil;
        let kin = &self.geometry.kinematics;
        let b = kin.contact_length;
        (soil.cohesion * soil.k1 + soil.unit_weight() * b * soil.k2)
            * (kin.tire_radius / b).powf(soil.n)
    }

    fn sinkage_stress(&self, angle: f64) -> f64 {
        let base = angle.cos() - self.geometry.entry_angle.cos();
        if base < 0.0 {
            self.observer
                .on_degeneracy(NumericDegeneracy::NegativeSinkageBase { angle, base });
            return 0.0;
        }
        self.pressure_coefficient() * base.powf(self.soil.n)
    }

    pub fn radial_stress_front(&self, angle: f64) -> f64 {
        self.sinkage_stress(angle)
    }

    pub fn radial_stress_rear(&self, angle: f64) -> f64 {
        let exit = self.geometry.exit_angle;
        let entry = self.geometry.entry_angle;
        let span = self.peak_angle - exit;
        if span <= 0.0 {
            self.observer
                .on_degeneracy(NumericDegeneracy::CollapsedRearArc { span });
            return 0.0;
        }
        let mapped = entry - (angle - exit) / span * (entry - self.peak_angle);
        self.sinkage_stress(mapped)
    }

    /// Radial stress at `angle`; exactly zero off the contact arc.
    pub fn radial_stress(&self, angle: f64) -> f64 {
        match self.arc(angle) {
            Some(RadialArc::Front) => self.radial_stress_front(angle),
            Some(RadialArc::Rear) => self.radial_stress_rear(angle),
            None => 0.0,
        }
    }

    /// Mohr-Coulomb shear capacity
    pub fn max_shear(&self, normal_stress: f64) -> f64 {
        self.soil.cohesion + normal_stress * self.soil.friction_angle.tan()
    }

    /// Janosi shear displacement accumulated from the entry angle (m)
    pub fn shear_displacement(&self, angle: f64) -> f64 {
        let entry = self.geometry.entry_angle;
        let kin = &self.geometry.kinematics;
        kin.tire_radius
            * ((entry - angle) - (1.0 - kin.slip_ratio) * (entry.sin() - angle.sin()))
    }

    /// Shear stress mobilized by a given displacement.
    pub fn mobilized_shear(&self, normal_stress: f64, displacement: f64) -> f64 {
        self.max_shear(normal_stress)
            * (1.0 - (-displacement / self.soil.shear_modulus_x).exp())
    }

    pub fn shear_stress(&self, angle: f64, normal_stress: f64) -> f64 {
        let shear = self.mobilized_shear(normal_stress, self.shear_displacement(angle));
        self.observer.on_stress_sample(
            angle,
            StressSample {
                radial: normal_stress,
                shear,
            },
        );
        shear
    }

    pub fn sample(&self, angle: f64) -> StressSample {
        let radial = self.radial_stress(angle);
        StressSample {
            radial,
            shear: self.shear_stress(angle, radial),
        }
    }
}
