//! Rated operating point
//!
//! Given the nameplate data (speed, power, current and voltage at the rated
//! point) and the winding parameters, solve for the rotor flux linkage and
//! the dq current and voltage. The current angle follows from the voltage
//! equation, which is quadratic in its cotangent.

#[allow(unused_imports)]
use num_traits::Float;

use crate::foc::PointDq;

/// Nameplate and winding data of the rated point
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct NominalParams {
    /// Phase resistance [Ohm]
    pub resistance: f64,
    /// Inductance [H]
    pub inductance: f64,
    /// Pole pairs
    pub pole_pairs: f64,
    /// Rated speed [rad/s]
    pub speed: f64,
    /// Rated mechanical power [W]
    pub power: f64,
    /// Rated phase current amplitude [A]
    pub current: f64,
    /// Rated phase voltage amplitude [V]
    pub voltage: f64,
}

/// Direction of power flow at the rated point
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum NominalMode {
    Motor,
    Generator,
}

/// Root of the current angle equation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Root {
    Plus,
    Minus,
}

impl Root {
    fn sign(self) -> f64 {
        match self {
            Root::Plus => 1.0,
            Root::Minus => -1.0,
        }
    }
}

/// Solved rated operating point
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct OperatingPoint {
    /// Rotor flux linkage [Wb]
    pub flux: f64,
    /// Stator current [A]
    pub current: PointDq,
    /// Stator voltage [V]
    pub voltage: PointDq,
    /// Small signal stability, `None` if the inertia is unknown
    pub stable: Option<bool>,
}

/// Solve the rated operating point
///
/// Returns `None` if no real solution exists.
pub fn nominal_operating_point(
    params: &NominalParams,
    mode: NominalMode,
    root: Root,
    inertia: Option<f64>,
) -> Option<OperatingPoint> {
    let NominalParams {
        resistance: r,
        inductance: l,
        pole_pairs: n,
        speed: vn,
        power: pn,
        current: i_n,
        voltage: un,
    } = *params;

    let motor = mode == NominalMode::Motor;
    let loss = if motor { 4.0 / 3.0 * pn * r } else { -4.0 / 3.0 * pn * r };
    let we = n * vn;

    // a ctg^2 + b ctg + c = 0
    let a = 4.0 / 9.0 * (pn / i_n).powi(2);
    let b = 4.0 / 3.0 * we * l * pn;
    let c = (r * i_n).powi(2) + (we * l * i_n).powi(2) + loss + a - un * un;
    let disc = b * b - 4.0 * a * c;
    if !(disc >= 0.0) {
        return None;
    }

    let ctg = (-b + root.sign() * disc.sqrt()) / (2.0 * a);
    let iq = i_n * (1.0 / (1.0 + ctg * ctg)).sqrt();
    let id = (i_n * i_n - iq * iq).max(0.0).sqrt() * if ctg < 0.0 { -1.0 } else { 1.0 };
    let flux = 2.0 / 3.0 * pn / (we * iq);
    if !flux.is_finite() {
        return None;
    }

    let (voltage, a_matrix) = if motor {
        (
            PointDq::new(r * id - we * l * iq, r * iq + we * l * id + we * flux),
            [
                [-r / l, we, n * iq],
                [-we, -r / l, -n * id - n * flux],
                [0.0, 0.0, 0.0],
            ],
        )
    } else {
        (
            PointDq::new(r * id + we * l * iq, r * iq - we * l * id - we * flux),
            [
                [-r / l, -we, -n * iq],
                [we, -r / l, n * id + n * flux],
                [0.0, 0.0, 0.0],
            ],
        )
    };

    let stable = inertia.and_then(|j| {
        let mut m = a_matrix;
        m[2][1] = 1.5 * n * flux / j;
        is_stable(&m)
    });

    Some(OperatingPoint {
        flux,
        current: PointDq::new(id, iq),
        voltage,
        stable,
    })
}

/// Rotor flux linkage at the rated point, NaN if there is no solution
pub fn flux_from_nominal(params: &NominalParams, mode: NominalMode, root: Root) -> f64 {
    nominal_operating_point(params, mode, root, None).map_or(f64::NAN, |point| point.flux)
}

/// Routh-Hurwitz test of a 3x3 system matrix
///
/// All eigenvalues have a negative real part iff the coefficients of the
/// characteristic polynomial `s^3 + c2 s^2 + c1 s + c0` satisfy
/// `c2 > 0`, `c0 > 0` and `c2 c1 > c0`. `None` if the matrix is not finite.
fn is_stable(m: &[[f64; 3]; 3]) -> Option<bool> {
    if m.iter().flatten().any(|v| !v.is_finite()) {
        return None;
    }

    let trace = m[0][0] + m[1][1] + m[2][2];
    let minors = m[0][0] * m[1][1] - m[0][1] * m[1][0] + m[0][0] * m[2][2] - m[0][2] * m[2][0]
        + m[1][1] * m[2][2]
        - m[1][2] * m[2][1];
    let det = m[0][0] * (m[1][1] * m[2][2] - m[1][2] * m[2][1])
        - m[0][1] * (m[1][0] * m[2][2] - m[1][2] * m[2][0])
        + m[0][2] * (m[1][0] * m[2][1] - m[1][1] * m[2][0]);

    let c2 = -trace;
    let c1 = minors;
    let c0 = -det;
    Some(c2 > 0.0 && c0 > 0.0 && c2 * c1 > c0)
}
