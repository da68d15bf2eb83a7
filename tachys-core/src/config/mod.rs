//! Configuration types
//!
//! Stage description: motor, drive, mechanics and moves.

pub mod types;
pub mod validate;

pub use types::*;
pub use validate::*;
