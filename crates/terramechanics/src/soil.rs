//! Soil material constants
//!
//! Reece-form pressure-sinkage coefficients together with the Mohr-Coulomb
//! and Janosi shear parameters for one terrain classification.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TerrainError;

/// Gravitational acceleration used for the soil weight term (m/s²)
pub const STANDARD_GRAVITY: f64 = 9.81;

/// Terrain classification
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SoilClass {
    Sandy,
    Loamy,
    Clayey,
    HeavyClay,
    Custom(String),
}

impl fmt::Display for SoilClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SoilClass::Sandy => write!(f, "sandy"),
            SoilClass::Loamy => write!(f, "loamy"),
            SoilClass::Clayey => write!(f, "clayey"),
            SoilClass::HeavyClay => write!(f, "heavy_clay"),
            SoilClass::Custom(name) => write!(f, "{name}"),
        }
    }
}

/// Immutable soil parameter set. Shared by reference across every stress
/// evaluation for the terrain it describes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SoilParameters {
    pub classification: SoilClass,
    /// Cohesive pressure-sinkage coefficient (dimensionless)
    pub k1: f64,
    /// Frictional pressure-sinkage coefficient (dimensionless)
    pub k2: f64,
    /// Sinkage exponent
    pub n: f64,
    /// Cohesion (Pa)
    pub cohesion: f64,
    /// Internal friction angle (rad)
    pub friction_angle: f64,
    /// Shear deformation modulus along the rolling direction (m)
    pub shear_modulus_x: f64,
    /// Shear deformation modulus across the rolling direction (m)
    pub shear_modulus_y: f64,
    /// Bulk density (kg/m³)
    pub density: f64,
}

impl SoilParameters {
    /// Look up a catalogued soil by name (case-insensitive).
    pub fn from_preset(name: &str) -> Result<Self, TerrainError> {
        let soil = match name.trim().to_ascii_lowercase().as_str() {
            "sandy" | "sand" => Self::sandy(),
            "loamy" | "loam" => Self::loamy(),
            "clayey" | "clay" => Self::clayey(),
            "heavy_clay" | "heavy-clay" => Self::heavy_clay(),
            _ => return Err(TerrainError::UnknownPreset(name.to_string())),
        };
        Ok(soil)
    }

    /// User-defined soil. The friction angle is given in degrees and stored in
    /// radians; nothing else is checked.
    #[allow(clippy::too_many_arguments)]
    pub fn custom(
        name: &str,
        k1: f64,
        k2: f64,
        n: f64,
        cohesion: f64,
        friction_angle_deg: f64,
        shear_modulus: f64,
        density: f64,
    ) -> Self {
        SoilParameters {
            classification: SoilClass::Custom(name.to_string()),
            k1,
            k2,
            n,
            cohesion,
            friction_angle: friction_angle_deg.to_radians(),
            shear_modulus_x: shear_modulus,
            shear_modulus_y: shear_modulus,
            density,
        }
    }

    pub fn sandy() -> Self {
        SoilParameters {
            classification: SoilClass::Sandy,
            k1: 2.0,
            k2: 17659.75,
            n: 0.77,
            cohesion: 130.0,
            friction_angle: 31.1_f64.to_radians(),
            shear_modulus_x: 0.038,
            shear_modulus_y: 0.038,
            density: 1600.0,
        }
    }

    pub fn loamy() -> Self {
        SoilParameters {
            classification: SoilClass::Loamy,
            k1: 5.3,
            k2: 1515.0,
            n: 0.7,
            cohesion: 1700.0,
            friction_angle: 29.0_f64.to_radians(),
            shear_modulus_x: 0.025,
            shear_modulus_y: 0.025,
            density: 1500.0,
        }
    }

    pub fn clayey() -> Self {
        SoilParameters {
            classification: SoilClass::Clayey,
            k1: 13.19,
            k2: 692.15,
            n: 0.5,
            cohesion: 4140.0,
            friction_angle: 13.0_f64.to_radians(),
            shear_modulus_x: 0.006,
            shear_modulus_y: 0.006,
            density: 1800.0,
        }
    }

    pub fn heavy_clay() -> Self {
        SoilParameters {
            classification: SoilClass::HeavyClay,
            k1: 12.70,
            k2: 1555.95,
            n: 0.13,
            cohesion: 68950.0,
            friction_angle: 34.0_f64.to_radians(),
            shear_modulus_x: 0.006,
            shear_modulus_y: 0.006,
            density: 1900.0,
        }
    }

    /// Soil unit weight ρ·g (N/m³)
    pub fn unit_weight(&self) -> f64 {
        self.density * STANDARD_GRAVITY
    }
}

impl FromStr for SoilParameters {
    type Err = TerrainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_preset(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::FRAC_PI_2;

    #[test]
    fn test_sandy_preset_constants() {
        let soil = SoilParameters::from_preset("sandy").unwrap();
        assert_eq!(soil.classification, SoilClass::Sandy);
        assert_eq!(soil.k1, 2.0);
        assert_eq!(soil.k2, 17659.75);
        assert_eq!(soil.n, 0.77);
        assert_eq!(soil.cohesion, 130.0);
        assert_relative_eq!(soil.friction_angle, 31.1_f64.to_radians());
        assert_eq!(soil.shear_modulus_x, 0.038);
        assert_eq!(soil.shear_modulus_y, 0.038);
        assert_eq!(soil.density, 1600.0);
    }

    #[test]
    fn test_preset_lookup_is_case_insensitive() {
        let soil: SoilParameters = "  Loamy ".parse().unwrap();
        assert_eq!(soil.classification, SoilClass::Loamy);
    }

    #[test]
    fn test_unknown_preset_is_rejected() {
        match SoilParameters::from_preset("lunar_regolith") {
            Err(TerrainError::UnknownPreset(name)) => assert_eq!(name, "lunar_regolith"),
            other => panic!("expected UnknownPreset, got {other:?}"),
        }
    }

    #[test]
    fn test_presets_satisfy_invariants() {
        for name in ["sandy", "loamy", "clayey", "heavy_clay"] {
            let soil = SoilParameters::from_preset(name).unwrap();
            assert!(soil.friction_angle >= 0.0 && soil.friction_angle < FRAC_PI_2, "{name}");
            assert!(soil.n > 0.0, "{name}");
        }
    }

    #[test]
    fn test_custom_converts_degrees_once() {
        let soil = SoilParameters::custom("test", 1.0, 2.0, 0.5, 10.0, 90.0, 0.01, 1000.0);
        assert_relative_eq!(soil.friction_angle, FRAC_PI_2);
        assert_eq!(soil.shear_modulus_x, soil.shear_modulus_y);
        assert_eq!(soil.classification, SoilClass::Custom("test".to_string()));
    }

    #[test]
    fn test_custom_accepts_nonphysical_values() {
        let soil = SoilParameters::custom("odd", -1.0, -2.0, -0.5, -10.0, -30.0, -0.01, -5.0);
        assert!(soil.k1 < 0.0 && soil.n < 0.0 && soil.density < 0.0);
        assert_relative_eq!(soil.friction_angle, (-30.0_f64).to_radians());
    }
}
