//! Stage motion
//!
//! Transmission between motor and stage, dynamic limits of the motor set
//! and trapezoidal point to point moves.

pub mod limits;
pub mod profile;
pub mod transmission;

pub use limits::{
    DriveLimits, DynamicLimits, LimitSheet, LimitsError, Mechanics, MotorConstants, MoveLimits,
    Parameter, ThermalCheck, VOLTAGE_RESERVE,
};
pub use profile::{Phase, PhaseKind, ProfileError, Samples, Setpoint, TrapezoidalProfile};
pub use transmission::{StageUnits, Transmission};
