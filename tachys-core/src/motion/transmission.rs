//! Motor to stage transmission

use core::f64::consts::PI;

/// Units of stage positions and their derivatives
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct StageUnits {
    pub position: &'static str,
    pub velocity: &'static str,
    pub acceleration: &'static str,
}

const MILLIMETERS: StageUnits = StageUnits {
    position: "mm",
    velocity: "mm/s",
    acceleration: "mm/s^2",
};

const DEGREES: StageUnits = StageUnits {
    position: "deg",
    velocity: "deg/s",
    acceleration: "deg/s^2",
};

/// Mechanical coupling between motor shaft and stage
///
/// `gear_ratio` is motor turns per output turn.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Transmission {
    /// Rotary stage, positions in degrees
    Rotary { gear_ratio: f64 },
    /// Lead screw driven linear stage, positions in millimeters
    Screw { lead_mm: f64, gear_ratio: f64 },
}

impl Default for Transmission {
    fn default() -> Self {
        Transmission::Rotary { gear_ratio: 1.0 }
    }
}

impl Transmission {
    pub fn gear_ratio(&self) -> f64 {
        match *self {
            Transmission::Rotary { gear_ratio } | Transmission::Screw { gear_ratio, .. } => gear_ratio,
        }
    }

    /// Stage units per motor radian
    pub fn scale(&self) -> f64 {
        match *self {
            Transmission::Rotary { gear_ratio } => 180.0 / PI / gear_ratio,
            Transmission::Screw { lead_mm, gear_ratio } => lead_mm / (2.0 * PI) / gear_ratio,
        }
    }

    /// Convert a motor quantity (rad, rad/s, rad/s^2) to stage units
    pub fn to_stage(&self, motor: f64) -> f64 {
        motor * self.scale()
    }

    /// Convert a stage quantity to motor units (rad, rad/s, rad/s^2)
    pub fn to_motor(&self, stage: f64) -> f64 {
        stage / self.scale()
    }

    /// Load inertia seen from the motor shaft [kg m^2]
    ///
    /// `load_inertia` is the inertia on the output side of the gearing
    /// (screw or rotary table), `payload_mass` the moved mass of a linear
    /// stage. Rotary stages ignore the payload mass.
    pub fn reflected_inertia(&self, load_inertia: f64, payload_mass: f64) -> f64 {
        match *self {
            Transmission::Rotary { gear_ratio } => load_inertia / (gear_ratio * gear_ratio),
            Transmission::Screw { lead_mm, gear_ratio } => {
                let radius = lead_mm * 1e-3 / (2.0 * PI);
                (load_inertia + payload_mass * radius * radius) / (gear_ratio * gear_ratio)
            }
        }
    }

    pub fn units(&self) -> StageUnits {
        match self {
            Transmission::Rotary { .. } => DEGREES,
            Transmission::Screw { .. } => MILLIMETERS,
        }
    }

    /// Check that lead and gear ratio are finite and positive
    pub fn is_valid(&self) -> bool {
        let positive = |v: f64| v.is_finite() && v > 0.0;
        match *self {
            Transmission::Rotary { gear_ratio } => positive(gear_ratio),
            Transmission::Screw { lead_mm, gear_ratio } => positive(lead_mm) && positive(gear_ratio),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rotary_scale() {
        let direct = Transmission::default();
        assert!((direct.to_stage(PI) - 180.0).abs() < 1e-9);

        let geared = Transmission::Rotary { gear_ratio: 10.0 };
        assert!((geared.to_stage(2.0 * PI) - 36.0).abs() < 1e-9);
        assert!((geared.to_motor(36.0) - 2.0 * PI).abs() < 1e-9);
        assert_eq!(geared.units().velocity, "deg/s");
    }

    #[test]
    fn test_screw_scale() {
        let screw = Transmission::Screw { lead_mm: 10.0, gear_ratio: 2.0 };
        // two motor turns move one lead
        assert!((screw.to_stage(4.0 * PI) - 10.0).abs() < 1e-9);
        assert_eq!(screw.units().position, "mm");
    }

    #[test]
    fn test_reflected_inertia() {
        let rotary = Transmission::Rotary { gear_ratio: 5.0 };
        assert!((rotary.reflected_inertia(2.5e-3, 100.0) - 1e-4).abs() < 1e-15);

        // 2 pi mm lead: 1 mm radius of gyration
        let screw = Transmission::Screw { lead_mm: 2.0 * PI, gear_ratio: 1.0 };
        assert!((screw.reflected_inertia(1e-6, 4.0) - 5e-6).abs() < 1e-15);
    }

    #[test]
    fn test_validity() {
        assert!(Transmission::default().is_valid());
        assert!(!Transmission::Rotary { gear_ratio: 0.0 }.is_valid());
        assert!(!Transmission::Screw { lead_mm: -1.0, gear_ratio: 1.0 }.is_valid());
        assert!(!Transmission::Screw { lead_mm: 5.0, gear_ratio: f64::NAN }.is_valid());
    }
}
