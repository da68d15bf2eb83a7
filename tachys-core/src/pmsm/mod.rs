//! Permanent magnet synchronous motor model

pub mod nominal;
pub mod schema;

pub use nominal::{
    flux_from_nominal, nominal_operating_point, NominalMode, NominalParams, OperatingPoint, Root,
};
pub use schema::{NOMINAL, ROTARY, ROTARY_DQ, RAD_S_TO_RPM, RPM_TO_RAD_S};

use crate::deduce::{Model, ModelError, DEFAULT_REL_TOLERANCE};
use crate::motion::{LimitsError, MotorConstants};

/// Motor model with a rated operating point
#[derive(Debug, Clone)]
pub struct Pmsm {
    model: Model,
}

impl Pmsm {
    /// Deduce the model from any consistent set of [`NOMINAL`] attributes
    pub fn deduce(name: &str, params: &[(&str, f64)]) -> Result<Self, ModelError> {
        Self::deduce_with_tolerance(name, params, DEFAULT_REL_TOLERANCE)
    }

    pub fn deduce_with_tolerance(
        name: &str,
        params: &[(&str, f64)],
        rel_tolerance: f64,
    ) -> Result<Self, ModelError> {
        Ok(Self {
            model: Model::deduce(&NOMINAL, name, params, rel_tolerance)?,
        })
    }

    pub fn model(&self) -> &Model {
        &self.model
    }

    pub fn name(&self) -> &str {
        self.model.name()
    }

    pub fn desc(&self) -> &str {
        self.model.desc()
    }

    /// Attach a free text description
    pub fn with_desc(self, desc: &str) -> Result<Self, ModelError> {
        Ok(Self {
            model: self.model.with_desc(desc)?,
        })
    }

    pub fn is_fully_defined(&self) -> bool {
        self.model.is_fully_defined()
    }

    /// Phase resistance [Ohm]
    pub fn resistance(&self) -> Option<f64> {
        self.model.value("R")
    }

    /// Direct axis inductance [H]
    pub fn inductance_d(&self) -> Option<f64> {
        self.model.value("Ld")
    }

    /// Quadrature axis inductance [H]
    pub fn inductance_q(&self) -> Option<f64> {
        self.model.value("Lq")
    }

    /// Rotor flux linkage [Wb]
    pub fn flux(&self) -> Option<f64> {
        self.model.value("Fm")
    }

    pub fn pole_pairs(&self) -> Option<f64> {
        self.model.value("N")
    }

    /// Rotor inertia [kg m^2]
    pub fn inertia(&self) -> Option<f64> {
        self.model.value("J")
    }

    /// Torque constant [N m/A]
    pub fn torque_constant(&self) -> Option<f64> {
        self.model.value("Kt")
    }

    /// Rated phase current amplitude [A]
    pub fn rated_current(&self) -> Option<f64> {
        self.model.value("In")
    }

    /// Rated speed [rad/s]
    pub fn rated_speed(&self) -> Option<f64> {
        self.model.value("vn")
    }

    /// Rated operating point, `None` if the nameplate is incomplete or
    /// has no solution
    pub fn operating_point(&self, mode: NominalMode, root: Root) -> Option<OperatingPoint> {
        let params = NominalParams {
            resistance: self.resistance()?,
            inductance: self.model.value("L")?,
            pole_pairs: self.pole_pairs()?,
            speed: self.rated_speed()?,
            power: self.model.value("Pn")?,
            current: self.rated_current()?,
            voltage: self.model.value("Un")?,
        };
        nominal_operating_point(&params, mode, root, self.inertia())
    }

    /// Constants needed by the limit computation
    pub fn constants(&self) -> Result<MotorConstants, LimitsError> {
        let require = |name: &'static str| self.model.value(name).ok_or(LimitsError::MissingParameter(name));
        Ok(MotorConstants {
            resistance: require("R")?,
            inductance_q: require("Lq")?,
            flux: require("Fm")?,
            pole_pairs: require("N")?,
            rotor_inertia: require("J")?,
            rated_current: self.rated_current(),
        })
    }
}
