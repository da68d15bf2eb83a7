//! Configuration validation
//!
//! Validation reports every problem of a config at once instead of
//! stopping at the first one.

use core::fmt;

use heapless::{String, Vec};

use crate::deduce::engine::bounded_name;
use crate::deduce::MAX_NAME_LEN;
use crate::pmsm::NOMINAL;

use super::types::{
    MoveConfig, StageConfig, TransmissionKind, MAX_LABEL_LEN, MAX_MOTOR_PARAMS, MAX_MOVES,
};

/// Errors per motor parameter, drive, mechanics and move
const MOTOR_PARAM_ERRORS: usize = 1;
const DRIVE_ERRORS: usize = 4;
const MECHANICS_ERRORS: usize = 6;
const MOVE_ERRORS: usize = 6;

/// Upper bound of the errors [`StageConfig::validate`] can report
pub const MAX_CONFIG_ERRORS: usize =
    MOTOR_PARAM_ERRORS * MAX_MOTOR_PARAMS + DRIVE_ERRORS + MECHANICS_ERRORS + MOVE_ERRORS * MAX_MOVES;

/// Collected validation errors
pub type ConfigErrors = Vec<ConfigError, MAX_CONFIG_ERRORS>;

/// Configuration errors
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Motor parameter that is not a motor model attribute
    UnknownMotorParameter(String<MAX_NAME_LEN>),
    /// Motor parameter that is not finite
    InvalidMotorParameter(String<MAX_NAME_LEN>),
    /// Drive value not finite and positive
    InvalidDrive(&'static str),
    /// Continuous current above the peak current
    ContinuousAbovePeak,
    /// Mechanics value out of range
    InvalidMechanics(&'static str),
    /// Screw transmission without `lead_mm`
    MissingLead,
    /// Two moves share a name
    DuplicateMove(String<MAX_LABEL_LEN>),
    /// Move value out of range
    InvalidMove {
        name: String<MAX_LABEL_LEN>,
        field: &'static str,
    },
    /// No move with that name
    UnknownMove(String<MAX_LABEL_LEN>),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::UnknownMotorParameter(name) => {
                write!(f, "[motor] unknown parameter '{name}'")
            }
            ConfigError::InvalidMotorParameter(name) => {
                write!(f, "[motor] parameter '{name}' must be a finite number")
            }
            ConfigError::InvalidDrive(field) => write!(f, "[drive] {field} must be positive"),
            ConfigError::ContinuousAbovePeak => {
                write!(f, "[drive] continuous_current exceeds peak_current")
            }
            ConfigError::InvalidMechanics(field) => {
                write!(f, "[mechanics] {field} is out of range")
            }
            ConfigError::MissingLead => {
                write!(f, "[mechanics] screw transmission requires 'lead_mm'")
            }
            ConfigError::DuplicateMove(name) => write!(f, "[[moves]] duplicate name '{name}'"),
            ConfigError::InvalidMove { name, field } => {
                write!(f, "[[moves]] '{name}': {field} is out of range")
            }
            ConfigError::UnknownMove(name) => write!(f, "no move named '{name}'"),
        }
    }
}

impl core::error::Error for ConfigError {}

fn positive(value: f64) -> bool {
    value.is_finite() && value > 0.0
}

fn non_negative(value: f64) -> bool {
    value.is_finite() && value >= 0.0
}

impl StageConfig {
    /// Check the whole config, collecting every error
    ///
    /// [`MAX_CONFIG_ERRORS`] bounds what a config within the type capacities
    /// can produce, so no error is lost.
    pub fn validate(&self) -> Result<(), ConfigErrors> {
        let mut errors = ConfigErrors::new();
        let mut report = |error: ConfigError| {
            let pushed = errors.push(error);
            debug_assert!(pushed.is_ok(), "MAX_CONFIG_ERRORS too small");
        };

        for (name, value) in self.motor.params.iter() {
            if NOMINAL.attribute(name).is_none() {
                report(ConfigError::UnknownMotorParameter(name.clone()));
            } else if !value.is_finite() {
                report(ConfigError::InvalidMotorParameter(name.clone()));
            }
        }

        let drive = &self.drive;
        for (field, value) in [
            ("dc_bus_voltage", drive.dc_bus_voltage),
            ("peak_current", drive.peak_current),
            ("continuous_current", drive.continuous_current),
        ] {
            if !positive(value) {
                report(ConfigError::InvalidDrive(field));
            }
        }
        if drive.continuous_current > drive.peak_current {
            report(ConfigError::ContinuousAbovePeak);
        }

        let mech = &self.mechanics;
        if !positive(mech.gear_ratio) {
            report(ConfigError::InvalidMechanics("gear_ratio"));
        }
        match (mech.transmission, mech.lead_mm) {
            (TransmissionKind::Screw, None) => report(ConfigError::MissingLead),
            (_, Some(lead)) if !positive(lead) => {
                report(ConfigError::InvalidMechanics("lead_mm"))
            }
            _ => {}
        }
        for (field, value) in [
            ("payload_mass", mech.payload_mass),
            ("load_inertia", mech.load_inertia),
            ("friction_torque", mech.friction_torque),
        ] {
            if !non_negative(value) {
                report(ConfigError::InvalidMechanics(field));
            }
        }
        if mech.max_speed.is_some_and(|v| !positive(v)) {
            report(ConfigError::InvalidMechanics("max_speed"));
        }

        for (index, m) in self.moves.iter().enumerate() {
            if self.moves[..index].iter().any(|other| other.name == m.name) {
                report(ConfigError::DuplicateMove(m.name.clone()));
            }
            let invalid = |field| ConfigError::InvalidMove {
                name: m.name.clone(),
                field,
            };
            if !m.distance.is_finite() {
                report(invalid("distance"));
            }
            for (field, value) in [
                ("velocity", m.velocity),
                ("acceleration", m.acceleration),
                ("deceleration", m.deceleration),
            ] {
                if value.is_some_and(|v| !positive(v)) {
                    report(invalid(field));
                }
            }
            if !non_negative(m.dwell) {
                report(invalid("dwell"));
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Look up a move by name, as an error if absent
    pub fn require_move(&self, name: &str) -> Result<&MoveConfig, ConfigError> {
        self.find_move(name)
            .ok_or_else(|| ConfigError::UnknownMove(bounded_name(name)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{DriveConfig, MechanicsConfig};

    fn label<const N: usize>(s: &str) -> String<N> {
        String::try_from(s).unwrap()
    }

    fn valid() -> StageConfig {
        let mut config = StageConfig {
            name: label("x-stage"),
            drive: DriveConfig {
                dc_bus_voltage: 48.0,
                peak_current: 10.0,
                continuous_current: 4.0,
            },
            mechanics: MechanicsConfig {
                transmission: TransmissionKind::Screw,
                lead_mm: Some(10.0),
                ..Default::default()
            },
            ..Default::default()
        };
        config.motor.params.insert(label("Rll"), 0.9).unwrap();
        config.motor.params.insert(label("Kt"), 0.11).unwrap();
        config
            .moves
            .push(MoveConfig {
                name: label("stroke"),
                distance: 300.0,
                velocity: Some(400.0),
                ..Default::default()
            })
            .unwrap();
        config
    }

    #[test]
    fn test_valid_config() {
        assert_eq!(valid().validate(), Ok(()));
    }

    #[test]
    fn test_errors_are_collected() {
        let mut config = valid();
        config.motor.params.insert(label("Rx"), 1.0).unwrap();
        config.drive.peak_current = 0.0;
        config.mechanics.lead_mm = None;
        config.mechanics.gear_ratio = -1.0;
        let copy = config.moves[0].clone();
        config.moves.push(copy).unwrap();

        let errors = config.validate().unwrap_err();
        assert!(errors.contains(&ConfigError::UnknownMotorParameter(label("Rx"))));
        assert!(errors.contains(&ConfigError::InvalidDrive("peak_current")));
        assert!(errors.contains(&ConfigError::MissingLead));
        assert!(errors.contains(&ConfigError::InvalidMechanics("gear_ratio")));
        assert!(errors.contains(&ConfigError::DuplicateMove(label("stroke"))));
    }

    #[test]
    fn test_move_fields() {
        let mut config = valid();
        config.moves[0].velocity = Some(-1.0);
        config.moves[0].dwell = f64::NAN;
        let errors = config.validate().unwrap_err();
        assert_eq!(errors.len(), 2);
        assert_eq!(
            errors[0],
            ConfigError::InvalidMove {
                name: label("stroke"),
                field: "velocity"
            }
        );
    }

    #[test]
    fn test_continuous_above_peak() {
        let mut config = valid();
        config.drive.continuous_current = 12.0;
        assert_eq!(
            config.validate(),
            Err(ConfigErrors::from_slice(&[ConfigError::ContinuousAbovePeak]).unwrap())
        );
    }

    #[test]
    fn test_every_move_error_kept() {
        let mut config = valid();
        config.moves.clear();
        for _ in 0..MAX_MOVES {
            config
                .moves
                .push(MoveConfig {
                    name: label("bad"),
                    distance: f64::NAN,
                    velocity: Some(-1.0),
                    acceleration: Some(0.0),
                    deceleration: Some(-2.0),
                    dwell: -0.1,
                })
                .unwrap();
        }
        config.drive.peak_current = f64::NAN;

        let errors = config.validate().unwrap_err();
        // 5 per move, a duplicate for all but the first, one for the drive
        assert_eq!(errors.len(), 5 * MAX_MOVES + (MAX_MOVES - 1) + 1);
        let duplicates = errors
            .iter()
            .filter(|e| matches!(e, ConfigError::DuplicateMove(_)))
            .count();
        assert_eq!(duplicates, MAX_MOVES - 1);
        assert_eq!(
            errors.last(),
            Some(&ConfigError::InvalidMove {
                name: label("bad"),
                field: "dwell"
            })
        );
    }

    #[test]
    fn test_error_bound() {
        use core::fmt::Write;

        let mut config = StageConfig::default();
        for i in 0..MAX_MOTOR_PARAMS {
            let mut name: String<MAX_NAME_LEN> = label("unknown_");
            write!(name, "{i}").unwrap();
            config.motor.params.insert(name, 1.0).unwrap();
        }
        config.drive.continuous_current = f64::INFINITY;
        config.mechanics = MechanicsConfig {
            transmission: TransmissionKind::Rotary,
            lead_mm: Some(-1.0),
            gear_ratio: 0.0,
            payload_mass: -1.0,
            load_inertia: -1.0,
            friction_torque: -1.0,
            max_speed: Some(0.0),
        };
        for _ in 0..MAX_MOVES {
            config
                .moves
                .push(MoveConfig {
                    name: label("bad"),
                    distance: f64::INFINITY,
                    velocity: Some(-1.0),
                    acceleration: Some(-1.0),
                    deceleration: Some(-1.0),
                    dwell: -1.0,
                })
                .unwrap();
        }
        // the first move cannot be a duplicate
        let errors = config.validate().unwrap_err();
        assert_eq!(errors.len(), MAX_CONFIG_ERRORS - 1);
    }

    #[test]
    fn test_require_move() {
        let config = valid();
        assert!(config.require_move("stroke").is_ok());
        assert_eq!(
            config.require_move("missing"),
            Err(ConfigError::UnknownMove(label("missing")))
        );
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(
            ConfigError::InvalidDrive("peak_current").to_string(),
            "[drive] peak_current must be positive"
        );
        assert_eq!(
            ConfigError::MissingLead.to_string(),
            "[mechanics] screw transmission requires 'lead_mm'"
        );
        assert_eq!(
            ConfigError::ContinuousAbovePeak.to_string(),
            "[drive] continuous_current exceeds peak_current"
        );
    }
}
