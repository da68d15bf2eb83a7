//! Dynamic limits of a motor driven stage
//!
//! The motor runs with zero d-axis current. At electrical speed `we` the
//! q-axis current is limited by the drive peak current and by the voltage
//! the DC bus can supply:
//!
//! ```text
//! (R Iq + we Fm)^2 + (we Lq Iq)^2 <= Umax^2,    Umax = Vdc / sqrt(3)
//! ```
//!
//! Torque is `Kt Iq` with `Kt = 3/2 N Fm`. Motor side quantities are in
//! rad, rad/s and rad/s^2. Stage side quantities are in the units of the
//! [`Transmission`].

use core::fmt;

use heapless::Vec;
#[allow(unused_imports)]
use num_traits::Float;

use super::profile::TrapezoidalProfile;
use super::transmission::Transmission;

/// Share of the no-load speed kept as voltage reserve for control
pub const VOLTAGE_RESERVE: f64 = 0.1;

/// Maximum number of entries in a [`LimitSheet`]
pub const MAX_SHEET_ENTRIES: usize = 16;

/// Entries of [`DynamicLimits::sheet`]
const SHEET_ENTRIES: usize = 13;
const _: () = assert!(SHEET_ENTRIES <= MAX_SHEET_ENTRIES);

const SQRT_3: f64 = 1.732_050_807_568_877_2;

/// Limit computation errors
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LimitsError {
    /// Model attribute required for the computation is undefined
    MissingParameter(&'static str),
    /// Parameter is not finite or out of range
    InvalidParameter(&'static str),
    /// Friction torque is not below the peak torque
    InsufficientTorque { peak: f64, friction: f64 },
    /// Supply voltage cannot drive the friction current at standstill
    InsufficientVoltage,
}

impl fmt::Display for LimitsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LimitsError::MissingParameter(name) => write!(f, "motor parameter `{name}` is not defined"),
            LimitsError::InvalidParameter(name) => write!(f, "parameter `{name}` is out of range"),
            LimitsError::InsufficientTorque { peak, friction } => write!(
                f,
                "peak torque {peak} N m does not overcome friction torque {friction} N m"
            ),
            LimitsError::InsufficientVoltage => {
                write!(f, "DC bus voltage too low to drive the friction current")
            }
        }
    }
}

impl core::error::Error for LimitsError {}

/// Motor constants used by the limit computation
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MotorConstants {
    /// Phase resistance [Ohm]
    pub resistance: f64,
    /// Quadrature axis inductance [H]
    pub inductance_q: f64,
    /// Rotor flux linkage [Wb]
    pub flux: f64,
    /// Pole pairs
    pub pole_pairs: f64,
    /// Rotor inertia [kg m^2]
    pub rotor_inertia: f64,
    /// Rated phase current amplitude [A], if known
    pub rated_current: Option<f64>,
}

impl MotorConstants {
    /// Torque constant [N m/A]
    pub fn torque_constant(&self) -> f64 {
        1.5 * self.pole_pairs * self.flux
    }
}

/// Drive output limits
///
/// Currents are phase current amplitudes.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DriveLimits {
    /// DC bus voltage [V]
    pub dc_bus_voltage: f64,
    /// Peak current [A]
    pub peak_current: f64,
    /// Continuous current [A]
    pub continuous_current: f64,
}

impl DriveLimits {
    /// Highest phase voltage amplitude the drive can apply [V]
    pub fn phase_voltage(&self) -> f64 {
        self.dc_bus_voltage / SQRT_3
    }
}

/// Mechanics between motor and payload
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Mechanics {
    pub transmission: Transmission,
    /// Inertia on the output side of the gearing [kg m^2]
    pub load_inertia: f64,
    /// Moved mass of a linear stage [kg]
    pub payload_mass: f64,
    /// Friction torque at the motor shaft [N m]
    pub friction_torque: f64,
    /// Mechanical speed cap in stage units per second
    pub max_speed: Option<f64>,
}

/// Kinematic limits of a move, in stage units
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MoveLimits {
    pub velocity: f64,
    pub acceleration: f64,
    pub deceleration: f64,
}

impl MoveLimits {
    /// Check that every limit is finite and positive
    pub fn is_valid(&self) -> bool {
        [self.velocity, self.acceleration, self.deceleration]
            .iter()
            .all(|v| v.is_finite() && *v > 0.0)
    }
}

/// Current demand of a move cycle
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ThermalCheck {
    /// RMS q-axis current over move and dwell [A]
    pub rms_current: f64,
    /// Highest q-axis current during the move [A]
    pub peak_current: f64,
    /// Allowed continuous current [A]
    pub continuous_limit: f64,
    /// Allowed peak current [A]
    pub peak_limit: f64,
    /// Move time plus dwell [s]
    pub cycle_time: f64,
}

impl ThermalCheck {
    pub fn is_ok(&self) -> bool {
        self.rms_current <= self.continuous_limit
            && self.peak_current <= self.peak_limit * (1.0 + 1e-9)
    }
}

/// Named value with its absolute maximum
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Parameter {
    pub name: &'static str,
    pub value: f64,
    pub max: Option<f64>,
    pub units: &'static str,
    pub desc: &'static str,
}

impl Parameter {
    pub fn is_exceeded(&self) -> bool {
        self.max.is_some_and(|max| self.value > max * (1.0 + 1e-9))
    }
}

/// Table of computed limits
#[derive(Debug, Clone, Default)]
pub struct LimitSheet {
    entries: Vec<Parameter, MAX_SHEET_ENTRIES>,
}

impl LimitSheet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry, handing it back once the sheet is full
    pub fn push(&mut self, entry: Parameter) -> Result<(), Parameter> {
        self.entries.push(entry)
    }

    pub fn entries(&self) -> &[Parameter] {
        &self.entries
    }

    pub fn get(&self, name: &str) -> Option<&Parameter> {
        self.entries.iter().find(|entry| entry.name == name)
    }

    /// Entries whose value exceeds their maximum
    pub fn exceeded(&self) -> impl Iterator<Item = &Parameter> {
        self.entries.iter().filter(|entry| entry.is_exceeded())
    }
}

/// Speed and acceleration limits of a motor, drive and mechanics set
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DynamicLimits {
    motor: MotorConstants,
    drive: DriveLimits,
    mechanics: Mechanics,
    total_inertia: f64,
    no_load_speed: f64,
    corner_speed: f64,
    max_speed: f64,
}

fn check(name: &'static str, value: f64, allow_zero: bool) -> Result<f64, LimitsError> {
    let in_range = if allow_zero { value >= 0.0 } else { value > 0.0 };
    if value.is_finite() && in_range {
        Ok(value)
    } else {
        Err(LimitsError::InvalidParameter(name))
    }
}

impl DynamicLimits {
    pub fn new(
        motor: MotorConstants,
        drive: DriveLimits,
        mechanics: Mechanics,
    ) -> Result<Self, LimitsError> {
        check("R", motor.resistance, false)?;
        check("Lq", motor.inductance_q, true)?;
        check("Fm", motor.flux, false)?;
        check("N", motor.pole_pairs, false)?;
        check("J", motor.rotor_inertia, false)?;
        if let Some(rated) = motor.rated_current {
            check("In", rated, false)?;
        }
        check("dc_bus_voltage", drive.dc_bus_voltage, false)?;
        check("peak_current", drive.peak_current, false)?;
        check("continuous_current", drive.continuous_current, false)?;
        check("load_inertia", mechanics.load_inertia, true)?;
        check("payload_mass", mechanics.payload_mass, true)?;
        check("friction_torque", mechanics.friction_torque, true)?;
        if !mechanics.transmission.is_valid() {
            return Err(LimitsError::InvalidParameter("transmission"));
        }
        if let Some(cap) = mechanics.max_speed {
            check("max_speed", cap, false)?;
        }

        let kt = motor.torque_constant();
        let peak = kt * drive.peak_current;
        if peak <= mechanics.friction_torque {
            return Err(LimitsError::InsufficientTorque {
                peak,
                friction: mechanics.friction_torque,
            });
        }

        let total_inertia = motor.rotor_inertia
            + mechanics
                .transmission
                .reflected_inertia(mechanics.load_inertia, mechanics.payload_mass);

        let mut limits = Self {
            motor,
            drive,
            mechanics,
            total_inertia,
            no_load_speed: 0.0,
            corner_speed: 0.0,
            max_speed: 0.0,
        };

        let friction_current = mechanics.friction_torque / kt;
        if motor.resistance * friction_current >= drive.phase_voltage() {
            return Err(LimitsError::InsufficientVoltage);
        }
        limits.no_load_speed = limits.speed_at_current(friction_current);
        limits.corner_speed = limits.speed_at_current(drive.peak_current);

        let usable = limits.no_load_speed * (1.0 - VOLTAGE_RESERVE);
        limits.max_speed = match mechanics.max_speed {
            Some(cap) => usable.min(mechanics.transmission.to_motor(cap)),
            None => usable,
        };

        Ok(limits)
    }

    pub fn motor(&self) -> &MotorConstants {
        &self.motor
    }

    pub fn drive(&self) -> &DriveLimits {
        &self.drive
    }

    pub fn mechanics(&self) -> &Mechanics {
        &self.mechanics
    }

    pub fn transmission(&self) -> &Transmission {
        &self.mechanics.transmission
    }

    /// Motor plus reflected load inertia [kg m^2]
    pub fn total_inertia(&self) -> f64 {
        self.total_inertia
    }

    pub fn torque_constant(&self) -> f64 {
        self.motor.torque_constant()
    }

    /// Torque at peak current [N m]
    pub fn peak_torque(&self) -> f64 {
        self.torque_constant() * self.drive.peak_current
    }

    /// Speed at which the supply only drives the friction current [rad/s]
    pub fn no_load_speed(&self) -> f64 {
        self.no_load_speed
    }

    /// Highest speed with full peak current [rad/s]
    pub fn corner_speed(&self) -> f64 {
        self.corner_speed
    }

    /// Highest usable speed [rad/s]
    pub fn max_speed(&self) -> f64 {
        self.max_speed
    }

    /// Highest q-axis current at mechanical `speed` [A]
    pub fn max_q_current(&self, speed: f64) -> f64 {
        let MotorConstants {
            resistance: r,
            inductance_q: lq,
            flux,
            pole_pairs,
            ..
        } = self.motor;
        let u = self.drive.phase_voltage();
        let we = pole_pairs * speed.abs();

        let a = r * r + (we * lq).powi(2);
        let b = 2.0 * r * we * flux;
        let c = (we * flux).powi(2) - u * u;
        let disc = b * b - 4.0 * a * c;
        if disc < 0.0 {
            return 0.0;
        }
        ((-b + disc.sqrt()) / (2.0 * a)).clamp(0.0, self.drive.peak_current)
    }

    /// Highest mechanical speed at which `current` still fits the supply [rad/s]
    pub fn speed_at_current(&self, current: f64) -> f64 {
        let MotorConstants {
            resistance: r,
            inductance_q: lq,
            flux,
            pole_pairs,
            ..
        } = self.motor;
        let u = self.drive.phase_voltage();

        let a = flux * flux + (lq * current).powi(2);
        let b = 2.0 * r * current * flux;
        let c = (r * current).powi(2) - u * u;
        if c >= 0.0 {
            return 0.0;
        }
        let disc = b * b - 4.0 * a * c;
        (-b + disc.sqrt()) / (2.0 * a) / pole_pairs
    }

    /// Acceleration available at mechanical `speed` [rad/s^2]
    pub fn acceleration_at(&self, speed: f64) -> f64 {
        let torque = self.torque_constant() * self.max_q_current(speed);
        ((torque - self.mechanics.friction_torque) / self.total_inertia).max(0.0)
    }

    /// Acceleration from standstill [rad/s^2]
    pub fn stall_acceleration(&self) -> f64 {
        self.acceleration_at(0.0)
    }

    /// Braking with peak torque, assisted by friction [rad/s^2]
    pub fn max_deceleration(&self) -> f64 {
        (self.peak_torque() + self.mechanics.friction_torque) / self.total_inertia
    }

    /// Stage limits for a move cruising at `velocity` (stage units)
    ///
    /// The velocity is clamped to the maximum speed, `None` requests the
    /// maximum speed. The acceleration is the one still available at the
    /// cruise velocity, so it holds along the whole ramp.
    pub fn move_limits(&self, velocity: Option<f64>) -> Result<MoveLimits, LimitsError> {
        let transmission = self.mechanics.transmission;
        let max_velocity = transmission.to_stage(self.max_speed);
        let velocity = match velocity {
            Some(v) => check("velocity", v, false)?.min(max_velocity),
            None => max_velocity,
        };

        let acceleration = transmission.to_stage(self.acceleration_at(transmission.to_motor(velocity)));
        let limits = MoveLimits {
            velocity,
            acceleration,
            deceleration: transmission.to_stage(self.max_deceleration()),
        };
        if !limits.is_valid() {
            return Err(LimitsError::InsufficientTorque {
                peak: self.peak_torque(),
                friction: self.mechanics.friction_torque,
            });
        }
        Ok(limits)
    }

    /// q-axis current needed to follow a move cycle
    ///
    /// Friction opposes the motion. No current flows during the dwell.
    pub fn thermal_check(
        &self,
        profile: &TrapezoidalProfile,
        dwell: f64,
    ) -> Result<ThermalCheck, LimitsError> {
        check("dwell", dwell, true)?;
        let transmission = self.mechanics.transmission;
        let kt = self.torque_constant();

        let direction = if profile.distance() < 0.0 { -1.0 } else { 1.0 };

        let mut squared = 0.0;
        let mut peak: f64 = 0.0;
        for phase in profile.phases() {
            if phase.duration <= 0.0 {
                continue;
            }
            let torque = self.total_inertia * transmission.to_motor(phase.acceleration)
                + direction * self.mechanics.friction_torque;
            let current = (torque / kt).abs();
            squared += current * current * phase.duration;
            peak = peak.max(current);
        }

        let cycle_time = profile.duration() + dwell;
        let rms_current = if cycle_time > 0.0 {
            (squared / cycle_time).sqrt()
        } else {
            0.0
        };

        let continuous_limit = match self.motor.rated_current {
            Some(rated) => rated.min(self.drive.continuous_current),
            None => self.drive.continuous_current,
        };

        Ok(ThermalCheck {
            rms_current,
            peak_current: peak,
            continuous_limit,
            peak_limit: self.drive.peak_current,
            cycle_time,
        })
    }

    /// Limit sheet of the motor set and of a chosen move
    pub fn sheet(&self, limits: &MoveLimits) -> LimitSheet {
        let transmission = self.mechanics.transmission;
        let units = transmission.units();
        let stage = |motor: f64| transmission.to_stage(motor);
        let entry = |name, value, max, units, desc| Parameter {
            name,
            value,
            max,
            units,
            desc,
        };

        let available = stage(self.acceleration_at(transmission.to_motor(limits.velocity)));
        let entries: [Parameter; SHEET_ENTRIES] = [
            entry("Umax", self.drive.phase_voltage(), None, "V", "Available phase voltage amplitude."),
            entry("Kt", self.torque_constant(), None, "N m/A", "Torque constant."),
            entry("Tpk", self.peak_torque(), None, "N m", "Peak torque."),
            entry("Tf", self.mechanics.friction_torque, Some(self.peak_torque()), "N m", "Friction torque."),
            entry("J", self.total_inertia, None, "kg m^2", "Rotor and reflected load inertia."),
            entry("v_noload", stage(self.no_load_speed), None, units.velocity, "No-load speed."),
            entry("v_corner", stage(self.corner_speed), None, units.velocity, "Highest speed with peak torque."),
            entry("v_max", stage(self.max_speed), None, units.velocity, "Maximum usable speed."),
            entry("a_stall", stage(self.stall_acceleration()), None, units.acceleration, "Acceleration from standstill."),
            entry("d_max", stage(self.max_deceleration()), None, units.acceleration, "Maximum deceleration."),
            entry("velocity", limits.velocity, Some(stage(self.max_speed)), units.velocity, "Move velocity."),
            entry("acceleration", limits.acceleration, Some(available), units.acceleration, "Move acceleration."),
            entry("deceleration", limits.deceleration, Some(stage(self.max_deceleration())), units.acceleration, "Move deceleration."),
        ];
        // fits, see SHEET_ENTRIES
        LimitSheet {
            entries: entries.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::f64::consts::PI;

    fn motor() -> MotorConstants {
        MotorConstants {
            resistance: 0.5,
            inductance_q: 1e-3,
            flux: 0.01,
            pole_pairs: 4.0,
            rotor_inertia: 1e-5,
            rated_current: Some(5.0),
        }
    }

    fn drive() -> DriveLimits {
        DriveLimits {
            dc_bus_voltage: 48.0,
            peak_current: 10.0,
            continuous_current: 4.0,
        }
    }

    fn mechanics() -> Mechanics {
        Mechanics {
            transmission: Transmission::Screw {
                lead_mm: 10.0,
                gear_ratio: 1.0,
            },
            load_inertia: 1e-6,
            payload_mass: 2.0,
            friction_torque: 0.01,
            max_speed: None,
        }
    }

    fn limits() -> DynamicLimits {
        DynamicLimits::new(motor(), drive(), mechanics()).unwrap()
    }

    #[test]
    fn test_stall_values() {
        let l = limits();
        assert!((l.torque_constant() - 0.06).abs() < 1e-12);
        assert!((l.peak_torque() - 0.6).abs() < 1e-12);
        assert_eq!(l.max_q_current(0.0), 10.0);

        let reflected = 1e-6 + 2.0 * (0.01 / (2.0 * PI)).powi(2);
        assert!((l.total_inertia() - (1e-5 + reflected)).abs() < 1e-15);
        assert!((l.stall_acceleration() - 0.59 / l.total_inertia()).abs() < 1e-6);
        assert!((l.max_deceleration() - 0.61 / l.total_inertia()).abs() < 1e-6);
    }

    #[test]
    fn test_no_load_speed_is_voltage_limit() {
        let l = limits();
        // at no-load speed the friction current uses the whole voltage
        let friction_current = 0.01 / 0.06;
        assert!((l.max_q_current(l.no_load_speed()) - friction_current).abs() < 1e-9);
        assert!(l.acceleration_at(l.no_load_speed()) < 1e-6);
    }

    #[test]
    fn test_corner_speed_keeps_peak_current() {
        let l = limits();
        assert!(l.corner_speed() > 0.0);
        assert!(l.corner_speed() <= l.no_load_speed());
        assert!((l.max_q_current(l.corner_speed() * 0.999) - 10.0).abs() < 1e-9);
        assert!(l.max_q_current(l.corner_speed() * 1.01) < 10.0);
    }

    #[test]
    fn test_acceleration_decreases_with_speed() {
        let l = limits();
        let mut last = f64::INFINITY;
        for step in 0..=20 {
            let speed = l.no_load_speed() * step as f64 / 20.0;
            let accel = l.acceleration_at(speed);
            assert!(accel <= last + 1e-9);
            last = accel;
        }
        assert!(l.max_deceleration() >= l.stall_acceleration());
    }

    #[test]
    fn test_max_speed_reserve_and_cap() {
        let l = limits();
        assert!((l.max_speed() - 0.9 * l.no_load_speed()).abs() < 1e-9);

        let mut capped = mechanics();
        capped.max_speed = Some(100.0);
        let l = DynamicLimits::new(motor(), drive(), capped).unwrap();
        let stage = l.transmission().to_stage(l.max_speed());
        assert!((stage - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_move_limits_clamps_velocity() {
        let l = limits();
        let max = l.transmission().to_stage(l.max_speed());

        let fast = l.move_limits(Some(max * 10.0)).unwrap();
        assert!((fast.velocity - max).abs() < 1e-9);

        let slow = l.move_limits(Some(max / 10.0)).unwrap();
        assert!((slow.velocity - max / 10.0).abs() < 1e-9);
        assert!(slow.acceleration >= fast.acceleration);
        assert_eq!(slow.deceleration, fast.deceleration);

        assert_eq!(l.move_limits(None).unwrap(), fast);
        assert_eq!(
            l.move_limits(Some(-1.0)),
            Err(LimitsError::InvalidParameter("velocity"))
        );
    }

    #[test]
    fn test_insufficient_torque() {
        let mut m = mechanics();
        m.friction_torque = 1.0;
        assert!(matches!(
            DynamicLimits::new(motor(), drive(), m),
            Err(LimitsError::InsufficientTorque { .. })
        ));
    }

    #[test]
    fn test_insufficient_voltage() {
        let mut d = drive();
        d.dc_bus_voltage = 0.1;
        let mut m = mechanics();
        m.friction_torque = 0.5;
        assert_eq!(
            DynamicLimits::new(motor(), d, m),
            Err(LimitsError::InsufficientVoltage)
        );
    }

    #[test]
    fn test_invalid_parameters() {
        let mut m = motor();
        m.flux = 0.0;
        assert_eq!(
            DynamicLimits::new(m, drive(), mechanics()),
            Err(LimitsError::InvalidParameter("Fm"))
        );

        let mut d = drive();
        d.peak_current = f64::NAN;
        assert_eq!(
            DynamicLimits::new(motor(), d, mechanics()),
            Err(LimitsError::InvalidParameter("peak_current"))
        );

        let mut mech = mechanics();
        mech.transmission = Transmission::Rotary { gear_ratio: 0.0 };
        assert_eq!(
            DynamicLimits::new(motor(), drive(), mech),
            Err(LimitsError::InvalidParameter("transmission"))
        );
    }

    #[test]
    fn test_thermal_check() {
        let l = limits();
        let move_limits = l.move_limits(Some(100.0)).unwrap();
        let profile = TrapezoidalProfile::plan(200.0, &move_limits).unwrap();

        let busy = l.thermal_check(&profile, 0.0).unwrap();
        let idle = l.thermal_check(&profile, 10.0).unwrap();
        assert!(idle.rms_current < busy.rms_current);
        assert!(busy.peak_current <= 10.0 + 1e-9);
        assert_eq!(busy.continuous_limit, 4.0);
        assert!((idle.cycle_time - profile.duration() - 10.0).abs() < 1e-12);
        assert!(idle.is_ok());

        assert!(l.thermal_check(&profile, -1.0).is_err());
    }

    #[test]
    fn test_sheet_flags_exceeded() {
        let l = limits();
        let mut move_limits = l.move_limits(None).unwrap();
        let sheet = l.sheet(&move_limits);
        assert_eq!(sheet.entries().len(), SHEET_ENTRIES);
        assert_eq!(sheet.exceeded().count(), 0);
        assert!(sheet.get("v_max").is_some());

        move_limits.acceleration *= 2.0;
        let sheet = l.sheet(&move_limits);
        let exceeded: std::vec::Vec<_> = sheet.exceeded().map(|p| p.name).collect();
        assert_eq!(exceeded, ["acceleration"]);
        assert_eq!(sheet.get("acceleration").unwrap().units, "mm/s^2");
    }

    #[test]
    fn test_full_sheet_hands_entry_back() {
        let entry = |name| Parameter {
            name,
            value: 1.0,
            max: None,
            units: "V",
            desc: "",
        };
        let mut sheet = LimitSheet::new();
        for _ in 0..MAX_SHEET_ENTRIES {
            assert!(sheet.push(entry("fill")).is_ok());
        }
        let rejected = sheet.push(entry("extra")).unwrap_err();
        assert_eq!(rejected.name, "extra");
        assert_eq!(sheet.entries().len(), MAX_SHEET_ENTRIES);
        assert!(sheet.get("extra").is_none());
    }
}
