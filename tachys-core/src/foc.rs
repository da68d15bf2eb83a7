//! Reference frames of a three-phase machine
//!
//! - [`PointAbc`]: phase quantities
//! - [`PointXy`]: stationary two-phase frame (alpha/beta)
//! - [`PointDq`]: frame rotating with the rotor flux
//!
//! The Clarke transform is amplitude invariant: a balanced three-phase
//! system of amplitude `U` maps to a vector of length `U`.

use core::ops::{Add, Mul, Neg, Sub};

#[allow(unused_imports)]
use num_traits::Float;

const SQRT_3: f64 = 1.732_050_807_568_877_2;
const FRAC_SQRT_3_2: f64 = SQRT_3 / 2.0;

/// Three phase quantities
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PointAbc {
    pub a: f64,
    pub b: f64,
    pub c: f64,
}

/// Stationary two-phase frame
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PointXy {
    pub x: f64,
    pub y: f64,
}

/// Rotating frame, d along the rotor flux
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PointDq {
    pub d: f64,
    pub q: f64,
}

impl PointAbc {
    pub const fn new(a: f64, b: f64, c: f64) -> Self {
        Self { a, b, c }
    }

    /// Clarke transform
    pub fn clarke(self) -> PointXy {
        PointXy {
            x: (2.0 * self.a - self.b - self.c) / 3.0,
            y: (self.b - self.c) / SQRT_3,
        }
    }

    pub fn norm(self) -> f64 {
        (self.a * self.a + self.b * self.b + self.c * self.c).sqrt()
    }
}

impl PointXy {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Clarke transform of two measured phases, assuming `a + b + c = 0`
    pub fn clarke_two_phase(a: f64, b: f64) -> Self {
        Self {
            x: a,
            y: (a + 2.0 * b) / SQRT_3,
        }
    }

    /// Inverse Clarke transform
    pub fn clarke_inv(self) -> PointAbc {
        PointAbc {
            a: self.x,
            b: -0.5 * self.x + FRAC_SQRT_3_2 * self.y,
            c: -0.5 * self.x - FRAC_SQRT_3_2 * self.y,
        }
    }

    /// Park transform, `angle` is the electrical angle in radians
    pub fn park(self, angle: f64) -> PointDq {
        let (sin, cos) = angle.sin_cos();
        PointDq {
            d: cos * self.x + sin * self.y,
            q: -sin * self.x + cos * self.y,
        }
    }

    pub fn norm(self) -> f64 {
        self.x.hypot(self.y)
    }
}

impl PointDq {
    pub const fn new(d: f64, q: f64) -> Self {
        Self { d, q }
    }

    /// Inverse Park transform, `angle` is the electrical angle in radians
    pub fn park_inv(self, angle: f64) -> PointXy {
        let (sin, cos) = angle.sin_cos();
        PointXy {
            x: cos * self.d - sin * self.q,
            y: sin * self.d + cos * self.q,
        }
    }

    pub fn norm(self) -> f64 {
        self.d.hypot(self.q)
    }
}

macro_rules! impl_point_ops {
    ($point:ident { $($field:ident),+ }) => {
        impl Add for $point {
            type Output = Self;
            fn add(self, rhs: Self) -> Self {
                Self { $($field: self.$field + rhs.$field),+ }
            }
        }

        impl Sub for $point {
            type Output = Self;
            fn sub(self, rhs: Self) -> Self {
                Self { $($field: self.$field - rhs.$field),+ }
            }
        }

        impl Neg for $point {
            type Output = Self;
            fn neg(self) -> Self {
                Self { $($field: -self.$field),+ }
            }
        }

        impl Mul<f64> for $point {
            type Output = Self;
            fn mul(self, rhs: f64) -> Self {
                Self { $($field: self.$field * rhs),+ }
            }
        }
    };
}

impl_point_ops!(PointAbc { a, b, c });
impl_point_ops!(PointXy { x, y });
impl_point_ops!(PointDq { d, q });
