//! Stage computation pipeline
//!
//! Config -> motor model -> dynamic limits -> move limits -> profile.

use eyre::{bail, Context};
use tachys_core::config::{MoveConfig, StageConfig};
use tachys_core::motion::{
    DriveLimits, DynamicLimits, LimitSheet, MoveLimits, StageUnits, ThermalCheck,
    TrapezoidalProfile,
};
use tachys_core::pmsm::Pmsm;
use tracing::{debug, info, warn};

/// Move to plan, in stage units
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct MoveRequest {
    pub distance: f64,
    /// Cruise velocity, maximum speed if absent
    pub velocity: Option<f64>,
    pub acceleration: Option<f64>,
    pub deceleration: Option<f64>,
    /// Standstill after the move [s]
    pub dwell: f64,
}

impl From<&MoveConfig> for MoveRequest {
    fn from(config: &MoveConfig) -> Self {
        Self {
            distance: config.distance,
            velocity: config.velocity,
            acceleration: config.acceleration,
            deceleration: config.deceleration,
            dwell: config.dwell,
        }
    }
}

/// Planned move with its checks
#[derive(Debug, Clone)]
pub struct MovePlan {
    pub limits: MoveLimits,
    pub profile: TrapezoidalProfile,
    pub thermal: ThermalCheck,
    pub sheet: LimitSheet,
}

impl MovePlan {
    /// No limit exceeded and the drive can supply the current
    pub fn is_feasible(&self) -> bool {
        self.sheet.exceeded().next().is_none() && self.thermal.is_ok()
    }
}

/// Stage with its deduced motor and dynamic limits
#[derive(Debug, Clone)]
pub struct Stage {
    config: StageConfig,
    motor: Pmsm,
    limits: DynamicLimits,
}

impl Stage {
    /// Deduce the motor and compute the dynamic limits
    ///
    /// `config` must be validated.
    pub fn new(config: StageConfig) -> eyre::Result<Self> {
        let motor = {
            let motor_name = if config.motor.name.is_empty() {
                config.name.as_str()
            } else {
                config.motor.name.as_str()
            };
            let inputs = config.motor.inputs();
            let motor = Pmsm::deduce(motor_name, inputs.as_slice())
                .wrap_err_with(|| format!("failed to deduce motor model `{motor_name}`"))?;
            match &config.motor.desc {
                Some(desc) => motor.with_desc(desc)?,
                None => motor,
            }
        };
        if !motor.is_fully_defined() {
            debug!("motor model `{}` is not fully defined", motor.name());
        }

        let constants = motor
            .constants()
            .wrap_err("motor parameters do not determine the motor dynamics")?;
        let mechanics = config
            .mechanics
            .mechanics()
            .wrap_err("invalid mechanics")?;
        let limits = DynamicLimits::new(constants, DriveLimits::from(&config.drive), mechanics)
            .wrap_err_with(|| format!("failed to compute limits of stage `{}`", config.name))?;

        info!(
            "stage `{}`: peak torque {:.4} N m, max speed {:.2} rad/s",
            config.name,
            limits.peak_torque(),
            limits.max_speed()
        );
        Ok(Self {
            config,
            motor,
            limits,
        })
    }

    pub fn name(&self) -> &str {
        &self.config.name
    }

    pub fn config(&self) -> &StageConfig {
        &self.config
    }

    pub fn motor(&self) -> &Pmsm {
        &self.motor
    }

    pub fn limits(&self) -> &DynamicLimits {
        &self.limits
    }

    pub fn units(&self) -> StageUnits {
        self.limits.transmission().units()
    }

    /// Limits for a move, with its acceleration overrides applied
    ///
    /// Overrides may exceed what the motor can deliver; the limit sheet
    /// flags them.
    pub fn move_limits(&self, request: &MoveRequest) -> eyre::Result<MoveLimits> {
        let mut limits = self
            .limits
            .move_limits(request.velocity)
            .wrap_err("no usable move limits")?;
        if let Some(requested) = request.velocity.filter(|&v| v > limits.velocity) {
            warn!(
                "velocity {requested} clamped to {} {}",
                limits.velocity,
                self.units().velocity
            );
        }
        if let Some(acceleration) = request.acceleration {
            limits.acceleration = acceleration;
        }
        if let Some(deceleration) = request.deceleration {
            limits.deceleration = deceleration;
        }
        if !limits.is_valid() {
            bail!("move limits must be positive: {limits:?}");
        }
        Ok(limits)
    }

    /// Plan a move and check it against the stage limits
    pub fn plan(&self, request: &MoveRequest) -> eyre::Result<MovePlan> {
        let limits = self.move_limits(request)?;
        let profile = TrapezoidalProfile::plan(request.distance, &limits)
            .wrap_err_with(|| format!("cannot plan a move of {}", request.distance))?;
        let thermal = self
            .limits
            .thermal_check(&profile, request.dwell)
            .wrap_err("invalid dwell time")?;
        let sheet = self.limits.sheet(&limits);

        debug!(
            "planned {} in {:.4} s, peak velocity {:.3}",
            request.distance,
            profile.duration(),
            profile.peak_velocity()
        );
        for entry in sheet.exceeded() {
            warn!("{} = {} exceeds its maximum", entry.name, entry.value);
        }
        Ok(MovePlan {
            limits,
            profile,
            thermal,
            sheet,
        })
    }
}
