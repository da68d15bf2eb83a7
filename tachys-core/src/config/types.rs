//! Configuration type definitions
//!
//! These types describe one stage: motor parameters, drive, mechanics and
//! the moves to plan. With the `serde` feature they deserialize from the
//! stage description file.

use heapless::{FnvIndexMap, String, Vec};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::deduce::{MAX_MODEL_DESC_LEN, MAX_NAME_LEN};
use crate::motion::{DriveLimits, Mechanics, Transmission};

use super::validate::ConfigError;

/// Maximum label length
pub const MAX_LABEL_LEN: usize = 32;

/// Maximum moves per config
pub const MAX_MOVES: usize = 8;

/// Maximum motor parameters per config (power of two)
pub const MAX_MOTOR_PARAMS: usize = 32;

/// Motor parameters by attribute name
pub type MotorParams = FnvIndexMap<String<MAX_NAME_LEN>, f64, MAX_MOTOR_PARAMS>;

/// Motor configuration
///
/// `params` may use any attribute of the motor model; the remaining ones
/// are deduced.
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MotorConfig {
    /// Motor name
    pub name: String<MAX_LABEL_LEN>,
    /// Free text description, carried into the motor model
    #[cfg_attr(feature = "serde", serde(default))]
    pub desc: Option<String<MAX_MODEL_DESC_LEN>>,
    /// Datasheet values
    pub params: MotorParams,
}

impl MotorConfig {
    /// Parameters as deduction inputs
    pub fn inputs(&self) -> Vec<(&str, f64), MAX_MOTOR_PARAMS> {
        self.params
            .iter()
            .map(|(name, value)| (name.as_str(), *value))
            .collect()
    }
}

/// Drive configuration
///
/// Currents are phase current amplitudes.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DriveConfig {
    /// DC bus voltage [V]
    pub dc_bus_voltage: f64,
    /// Peak current [A]
    pub peak_current: f64,
    /// Continuous current [A]
    pub continuous_current: f64,
}

impl From<&DriveConfig> for DriveLimits {
    fn from(config: &DriveConfig) -> Self {
        DriveLimits {
            dc_bus_voltage: config.dc_bus_voltage,
            peak_current: config.peak_current,
            continuous_current: config.continuous_current,
        }
    }
}

/// Transmission type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum TransmissionKind {
    /// Rotary table, positions in degrees
    #[default]
    Rotary,
    /// Lead screw, positions in millimeters
    Screw,
}

/// Mechanics configuration
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct MechanicsConfig {
    /// Transmission type
    pub transmission: TransmissionKind,
    /// Screw lead [mm], required for screws
    pub lead_mm: Option<f64>,
    /// Motor turns per output turn
    pub gear_ratio: f64,
    /// Moved mass [kg]
    pub payload_mass: f64,
    /// Load inertia behind the gearing [kg m^2]
    pub load_inertia: f64,
    /// Friction torque at the motor shaft [N m]
    pub friction_torque: f64,
    /// Mechanical speed limit [stage units/s]
    pub max_speed: Option<f64>,
}

impl Default for MechanicsConfig {
    fn default() -> Self {
        Self {
            transmission: TransmissionKind::Rotary,
            lead_mm: None,
            gear_ratio: 1.0,
            payload_mass: 0.0,
            load_inertia: 0.0,
            friction_torque: 0.0,
            max_speed: None,
        }
    }
}

impl MechanicsConfig {
    pub fn transmission(&self) -> Result<Transmission, ConfigError> {
        match self.transmission {
            TransmissionKind::Rotary => Ok(Transmission::Rotary {
                gear_ratio: self.gear_ratio,
            }),
            TransmissionKind::Screw => match self.lead_mm {
                Some(lead_mm) => Ok(Transmission::Screw {
                    lead_mm,
                    gear_ratio: self.gear_ratio,
                }),
                None => Err(ConfigError::MissingLead),
            },
        }
    }

    pub fn mechanics(&self) -> Result<Mechanics, ConfigError> {
        Ok(Mechanics {
            transmission: self.transmission()?,
            load_inertia: self.load_inertia,
            payload_mass: self.payload_mass,
            friction_torque: self.friction_torque,
            max_speed: self.max_speed,
        })
    }
}

/// Point to point move
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MoveConfig {
    /// Move name
    pub name: String<MAX_LABEL_LEN>,
    /// Signed distance [stage units]
    pub distance: f64,
    /// Cruise velocity, maximum speed if absent [stage units/s]
    pub velocity: Option<f64>,
    /// Acceleration override [stage units/s^2]
    pub acceleration: Option<f64>,
    /// Deceleration override [stage units/s^2]
    pub deceleration: Option<f64>,
    /// Standstill time after the move [s]
    #[cfg_attr(feature = "serde", serde(default))]
    pub dwell: f64,
}

/// Stage configuration
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct StageConfig {
    /// Stage name
    pub name: String<MAX_LABEL_LEN>,
    pub motor: MotorConfig,
    pub drive: DriveConfig,
    #[cfg_attr(feature = "serde", serde(default))]
    pub mechanics: MechanicsConfig,
    #[cfg_attr(feature = "serde", serde(default))]
    pub moves: Vec<MoveConfig, MAX_MOVES>,
}

impl StageConfig {
    /// Look up a move by name
    pub fn find_move(&self, name: &str) -> Option<&MoveConfig> {
        self.moves.iter().find(|m| m.name == name)
    }
}
