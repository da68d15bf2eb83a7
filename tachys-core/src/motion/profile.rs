//! Trapezoidal motion profile
//!
//! A point to point move accelerates at constant acceleration, cruises at
//! constant velocity and decelerates to standstill. Moves too short to
//! reach the cruise velocity have no cruise phase (triangular profile).
//!
//! Positions are relative to the start of the move. All quantities are in
//! stage units.

use core::fmt;

#[allow(unused_imports)]
use num_traits::Float;

use super::limits::MoveLimits;

/// Profile planning errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ProfileError {
    /// Distance is not finite
    InvalidDistance,
    /// Velocity, acceleration or deceleration not finite and positive
    InvalidLimits,
    /// Sampling period not finite and positive
    InvalidTimeStep,
}

impl fmt::Display for ProfileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProfileError::InvalidDistance => write!(f, "move distance must be finite"),
            ProfileError::InvalidLimits => {
                write!(f, "velocity, acceleration and deceleration must be positive")
            }
            ProfileError::InvalidTimeStep => write!(f, "sampling period must be positive"),
        }
    }
}

impl core::error::Error for ProfileError {}

/// Profile phase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PhaseKind {
    Acceleration,
    Cruise,
    Deceleration,
}

impl PhaseKind {
    pub fn name(&self) -> &'static str {
        match self {
            PhaseKind::Acceleration => "acceleration",
            PhaseKind::Cruise => "cruise",
            PhaseKind::Deceleration => "deceleration",
        }
    }
}

/// One constant acceleration segment of a profile
///
/// Velocities, acceleration and distance are signed and follow the
/// direction of the move.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Phase {
    pub kind: PhaseKind,
    /// Start time [s]
    pub start: f64,
    /// Duration [s]
    pub duration: f64,
    pub start_velocity: f64,
    pub end_velocity: f64,
    pub acceleration: f64,
    /// Distance covered during the phase
    pub distance: f64,
}

impl Phase {
    pub fn end(&self) -> f64 {
        self.start + self.duration
    }
}

/// Position, velocity and acceleration at a point in time
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Setpoint {
    pub time: f64,
    pub position: f64,
    pub velocity: f64,
    pub acceleration: f64,
}

/// Planned trapezoidal move
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TrapezoidalProfile {
    distance: f64,
    limits: MoveLimits,
    /// +1.0 or -1.0
    direction: f64,
    /// Reached velocity magnitude
    peak_velocity: f64,
    t_accel: f64,
    t_cruise: f64,
    t_decel: f64,
}

impl TrapezoidalProfile {
    /// Plan a move of `distance` within `limits`
    pub fn plan(distance: f64, limits: &MoveLimits) -> Result<Self, ProfileError> {
        if !distance.is_finite() {
            return Err(ProfileError::InvalidDistance);
        }
        if !limits.is_valid() {
            return Err(ProfileError::InvalidLimits);
        }

        let MoveLimits {
            velocity: v,
            acceleration: a,
            deceleration: b,
        } = *limits;
        let direction = if distance < 0.0 { -1.0 } else { 1.0 };
        let d = distance.abs();

        if d == 0.0 {
            return Ok(Self {
                distance,
                limits: *limits,
                direction,
                peak_velocity: 0.0,
                t_accel: 0.0,
                t_cruise: 0.0,
                t_decel: 0.0,
            });
        }

        let ramp_distance = v * v / (2.0 * a) + v * v / (2.0 * b);
        let (peak, t_cruise) = if ramp_distance <= d {
            (v, ((d - ramp_distance) / v).max(0.0))
        } else {
            ((2.0 * d * a * b / (a + b)).sqrt(), 0.0)
        };

        Ok(Self {
            distance,
            limits: *limits,
            direction,
            peak_velocity: peak,
            t_accel: peak / a,
            t_cruise,
            t_decel: peak / b,
        })
    }

    /// Signed move distance
    pub fn distance(&self) -> f64 {
        self.distance
    }

    pub fn limits(&self) -> &MoveLimits {
        &self.limits
    }

    /// Total move time [s]
    pub fn duration(&self) -> f64 {
        self.t_accel + self.t_cruise + self.t_decel
    }

    /// Highest velocity magnitude reached
    pub fn peak_velocity(&self) -> f64 {
        self.peak_velocity
    }

    /// Zero distance move
    pub fn is_empty(&self) -> bool {
        self.peak_velocity == 0.0
    }

    /// Check if the move is too short to reach the velocity limit
    pub fn is_triangular(&self) -> bool {
        !self.is_empty() && self.peak_velocity < self.limits.velocity
    }

    /// Acceleration, cruise and deceleration phases
    ///
    /// The cruise phase of a triangular profile has zero duration.
    pub fn phases(&self) -> [Phase; 3] {
        let dir = self.direction;
        let peak = dir * self.peak_velocity;
        let accel = self.limits.acceleration;
        let decel = self.limits.deceleration;

        [
            Phase {
                kind: PhaseKind::Acceleration,
                start: 0.0,
                duration: self.t_accel,
                start_velocity: 0.0,
                end_velocity: peak,
                acceleration: dir * accel,
                distance: 0.5 * peak * self.t_accel,
            },
            Phase {
                kind: PhaseKind::Cruise,
                start: self.t_accel,
                duration: self.t_cruise,
                start_velocity: peak,
                end_velocity: peak,
                acceleration: 0.0,
                distance: peak * self.t_cruise,
            },
            Phase {
                kind: PhaseKind::Deceleration,
                start: self.t_accel + self.t_cruise,
                duration: self.t_decel,
                start_velocity: peak,
                end_velocity: 0.0,
                acceleration: -dir * decel,
                distance: 0.5 * peak * self.t_decel,
            },
        ]
    }

    /// Phase active at time `t`
    ///
    /// Phases are half open `[start, end)`, except that the end of the
    /// move belongs to the last phase. Zero length phases are never
    /// returned. `None` outside the move.
    pub fn phase_at(&self, t: f64) -> Option<Phase> {
        if self.is_empty() || !(0.0..=self.duration()).contains(&t) {
            return None;
        }
        let phases = self.phases();
        phases
            .iter()
            .find(|phase| phase.duration > 0.0 && t < phase.end())
            .or_else(|| phases.iter().rev().find(|phase| phase.duration > 0.0))
            .copied()
    }

    /// Setpoint at time `t`, clamped to the start and end of the move
    pub fn sample(&self, t: f64) -> Setpoint {
        let dir = self.direction;
        let peak = self.peak_velocity;
        let a = self.limits.acceleration;
        let b = self.limits.deceleration;
        let t_cruise_end = self.t_accel + self.t_cruise;

        if t >= self.duration() {
            return Setpoint {
                time: t,
                position: self.distance,
                velocity: 0.0,
                acceleration: 0.0,
            };
        }
        if t < 0.0 {
            return Setpoint {
                time: t,
                ..Default::default()
            };
        }

        let (position, velocity, acceleration) = if t < self.t_accel {
            (0.5 * a * t * t, a * t, a)
        } else if t < t_cruise_end {
            let accel_distance = 0.5 * peak * self.t_accel;
            (accel_distance + peak * (t - self.t_accel), peak, 0.0)
        } else {
            let tau = t - t_cruise_end;
            let before = 0.5 * peak * self.t_accel + peak * self.t_cruise;
            (before + peak * tau - 0.5 * b * tau * tau, peak - b * tau, -b)
        };

        Setpoint {
            time: t,
            position: dir * position,
            velocity: dir * velocity,
            acceleration: dir * acceleration,
        }
    }

    /// Setpoints every `dt` seconds, ending with the exact final setpoint
    pub fn samples(&self, dt: f64) -> Result<Samples, ProfileError> {
        if !(dt.is_finite() && dt > 0.0) {
            return Err(ProfileError::InvalidTimeStep);
        }
        Ok(Samples {
            profile: *self,
            dt,
            index: 0,
            done: false,
        })
    }
}

/// Iterator over profile setpoints at a fixed period
#[derive(Debug, Clone)]
pub struct Samples {
    profile: TrapezoidalProfile,
    dt: f64,
    index: u32,
    done: bool,
}

impl Iterator for Samples {
    type Item = Setpoint;

    fn next(&mut self) -> Option<Setpoint> {
        if self.done {
            return None;
        }
        let duration = self.profile.duration();
        let t = self.index as f64 * self.dt;
        if t < duration && self.index < u32::MAX {
            self.index += 1;
            Some(self.profile.sample(t))
        } else {
            self.done = true;
            Some(self.profile.sample(duration))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const EPS: f64 = 1e-9;

    fn limits(velocity: f64, acceleration: f64, deceleration: f64) -> MoveLimits {
        MoveLimits {
            velocity,
            acceleration,
            deceleration,
        }
    }

    #[test]
    fn test_trapezoid() {
        // 1 s ramps of 50 mm each, 100 mm cruise
        let p = TrapezoidalProfile::plan(200.0, &limits(100.0, 100.0, 100.0)).unwrap();
        assert!(!p.is_triangular());
        assert!((p.duration() - 3.0).abs() < EPS);
        assert_eq!(p.peak_velocity(), 100.0);

        let mid = p.sample(1.5);
        assert!((mid.position - 100.0).abs() < EPS);
        assert_eq!(mid.velocity, 100.0);
        assert_eq!(mid.acceleration, 0.0);

        let end = p.sample(3.0);
        assert_eq!(end.position, 200.0);
        assert_eq!(end.velocity, 0.0);
    }

    #[test]
    fn test_triangle() {
        // ramps would need 100 mm, only 50 mm available
        let p = TrapezoidalProfile::plan(50.0, &limits(100.0, 100.0, 100.0)).unwrap();
        assert!(p.is_triangular());
        let expected = (2.0 * 50.0 * 100.0 * 100.0 / 200.0f64).sqrt();
        assert!((p.peak_velocity() - expected).abs() < EPS);
        assert_eq!(p.phases()[1].duration, 0.0);
        assert!((p.sample(p.duration() / 2.0).position - 25.0).abs() < EPS);
    }

    #[test]
    fn test_asymmetric_ramps() {
        let p = TrapezoidalProfile::plan(100.0, &limits(50.0, 100.0, 25.0)).unwrap();
        let [accel, cruise, decel] = p.phases();
        assert!((accel.duration - 0.5).abs() < EPS);
        assert!((decel.duration - 2.0).abs() < EPS);
        assert!((accel.distance - 12.5).abs() < EPS);
        assert!((decel.distance - 50.0).abs() < EPS);
        assert!((cruise.distance - 37.5).abs() < EPS);
        assert_eq!(decel.acceleration, -25.0);
    }

    #[test]
    fn test_negative_distance() {
        let p = TrapezoidalProfile::plan(-200.0, &limits(100.0, 100.0, 100.0)).unwrap();
        let s = p.sample(0.5);
        assert!(s.position < 0.0);
        assert!(s.velocity < 0.0);
        assert!(s.acceleration < 0.0);
        assert_eq!(p.sample(10.0).position, -200.0);
        assert!(p.phases().iter().all(|phase| phase.distance <= 0.0));
    }

    #[test]
    fn test_zero_distance() {
        let p = TrapezoidalProfile::plan(0.0, &limits(100.0, 100.0, 100.0)).unwrap();
        assert!(p.is_empty());
        assert!(!p.is_triangular());
        assert_eq!(p.duration(), 0.0);
        assert_eq!(p.phase_at(0.0), None);
        assert_eq!(p.sample(0.0), Setpoint::default());

        let samples: Vec<_> = p.samples(0.01).unwrap().collect();
        assert_eq!(samples.len(), 1);
    }

    #[test]
    fn test_invalid_inputs() {
        let ok = limits(1.0, 1.0, 1.0);
        assert_eq!(TrapezoidalProfile::plan(f64::NAN, &ok), Err(ProfileError::InvalidDistance));
        assert_eq!(
            TrapezoidalProfile::plan(1.0, &limits(0.0, 1.0, 1.0)),
            Err(ProfileError::InvalidLimits)
        );
        assert_eq!(
            TrapezoidalProfile::plan(1.0, &limits(1.0, f64::INFINITY, 1.0)),
            Err(ProfileError::InvalidLimits)
        );
        let p = TrapezoidalProfile::plan(1.0, &ok).unwrap();
        assert!(p.samples(0.0).is_err());
        assert!(p.samples(-1.0).is_err());
    }

    #[test]
    fn test_phase_at() {
        let p = TrapezoidalProfile::plan(200.0, &limits(100.0, 100.0, 100.0)).unwrap();
        assert_eq!(p.phase_at(-0.1), None);
        assert_eq!(p.phase_at(0.0).unwrap().kind, PhaseKind::Acceleration);
        assert_eq!(p.phase_at(1.0).unwrap().kind, PhaseKind::Cruise);
        assert_eq!(p.phase_at(2.5).unwrap().kind, PhaseKind::Deceleration);
        assert_eq!(p.phase_at(3.0).unwrap().kind, PhaseKind::Deceleration);
        assert_eq!(p.phase_at(3.1), None);

        let tri = TrapezoidalProfile::plan(50.0, &limits(100.0, 100.0, 100.0)).unwrap();
        assert_eq!(tri.phase_at(tri.phases()[1].start).unwrap().kind, PhaseKind::Deceleration);
    }

    #[test]
    fn test_samples_end_exactly() {
        let p = TrapezoidalProfile::plan(200.0, &limits(100.0, 100.0, 100.0)).unwrap();
        let samples: Vec<_> = p.samples(0.1).unwrap().collect();
        assert_eq!(samples[0].time, 0.0);
        let last = samples.last().unwrap();
        assert_eq!(last.time, p.duration());
        assert_eq!(last.position, 200.0);
        assert!(samples.windows(2).all(|w| w[0].time < w[1].time));
        assert!(samples.len() == 30 || samples.len() == 31);
    }

    proptest! {
        #[test]
        fn test_profile_invariants(
            distance in -1000.0..1000.0f64,
            velocity in 0.1..500.0f64,
            acceleration in 0.1..5000.0f64,
            deceleration in 0.1..5000.0f64,
        ) {
            let lim = limits(velocity, acceleration, deceleration);
            let p = TrapezoidalProfile::plan(distance, &lim).unwrap();

            prop_assert_eq!(p.sample(p.duration()).position, distance);
            prop_assert!(p.peak_velocity() <= velocity * (1.0 + 1e-12));

            let phases = p.phases();
            let total: f64 = phases.iter().map(|phase| phase.duration).sum();
            prop_assert!(phases.iter().all(|phase| phase.duration >= 0.0));
            prop_assert!((total - p.duration()).abs() <= 1e-9 * p.duration().max(1.0));

            let covered: f64 = phases.iter().map(|phase| phase.distance).sum();
            prop_assert!((covered - distance).abs() <= 1e-6 * distance.abs().max(1.0));

            for phase in phases.iter().filter(|phase| phase.duration > 0.0) {
                let end = p.sample(phase.end() - 1e-12 * p.duration());
                prop_assert!(end.velocity.abs() <= velocity * (1.0 + 1e-9));
                prop_assert!(end.velocity * distance >= -1e-9);
            }
        }

        #[test]
        fn test_position_continuous(
            distance in 1.0..1000.0f64,
            velocity in 1.0..500.0f64,
            acceleration in 1.0..5000.0f64,
        ) {
            let p = TrapezoidalProfile::plan(distance, &limits(velocity, acceleration, acceleration)).unwrap();
            for phase in p.phases() {
                let t = phase.start;
                let before = p.sample(t - 1e-9);
                let after = p.sample(t);
                prop_assert!((after.position - before.position).abs() <= velocity * 1e-8 + 1e-9);
            }
        }
    }
}
