//! Target-agnostic core logic for the positioner limits calculator
//!
//! This crate contains all calculation logic that does not depend on
//! files, terminals or any particular host:
//!
//! - Parameter deduction engine (named attributes, rules, validators)
//! - Permanent magnet synchronous motor model and rated operating point
//! - Reference frame transforms (Clarke / Park)
//! - Dynamic limits of a motor driven stage
//! - Trapezoidal motion profiles
//! - Configuration type definitions

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod config;
pub mod deduce;
pub mod foc;
pub mod motion;
pub mod pmsm;
