//! Fixed-point deduction of model variables

use core::fmt;

use heapless::{FnvIndexMap, String};
#[allow(unused_imports)]
use num_traits::Float;

use super::schema::Schema;

/// Maximum number of distinct variables in one deduction (power of two)
pub const MAX_VARIABLES: usize = 64;

/// Maximum length of a variable name kept in error reports
pub const MAX_NAME_LEN: usize = 32;

/// Default relative tolerance for values deduced along different paths
pub const DEFAULT_REL_TOLERANCE: f64 = 0.05;

/// Known variable values by name
pub type Variables = FnvIndexMap<&'static str, f64, MAX_VARIABLES>;

/// Deduction errors
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DeduceError {
    /// Input name is not an attribute of the schema
    UnknownVariable(String<MAX_NAME_LEN>),
    /// A rule (or an input) produced NaN
    NotANumber(&'static str),
    /// Two deduction paths disagree beyond the tolerance
    Contradiction {
        name: &'static str,
        known: f64,
        deduced: f64,
    },
    /// More variables than [`MAX_VARIABLES`]
    TooManyVariables,
}

impl fmt::Display for DeduceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeduceError::UnknownVariable(name) => write!(f, "unknown variable `{name}`"),
            DeduceError::NotANumber(name) => write!(f, "variable `{name}` is NaN"),
            DeduceError::Contradiction {
                name,
                known,
                deduced,
            } => write!(
                f,
                "value of `{name}` is {known}, but it contradicts the deduced value {deduced}"
            ),
            DeduceError::TooManyVariables => write!(f, "too many variables (max {MAX_VARIABLES})"),
        }
    }
}

impl core::error::Error for DeduceError {}

/// Copy a name into a bounded string, truncating if needed
pub(crate) fn bounded_name<const N: usize>(name: &str) -> String<N> {
    let mut out = String::new();
    for c in name.chars() {
        if out.push(c).is_err() {
            break;
        }
    }
    out
}

/// Deduce every variable reachable from `inputs` through the schema rules
///
/// Each pass applies every rule whose inputs are all known. New values are
/// added, known values must agree with the deduced ones within
/// `rel_tolerance`. Iteration stops after a pass that added nothing.
pub fn deduce(
    schema: &Schema,
    inputs: &[(&str, f64)],
    rel_tolerance: f64,
) -> Result<Variables, DeduceError> {
    let mut variables = Variables::new();

    for &(name, value) in inputs {
        let attr = schema
            .attribute(name)
            .ok_or_else(|| DeduceError::UnknownVariable(bounded_name(name)))?;
        if value.is_nan() {
            return Err(DeduceError::NotANumber(attr.name));
        }
        merge(&mut variables, attr.name, value, rel_tolerance)?;
    }

    loop {
        let mut deduced = 0usize;

        for rule in schema.rules() {
            let Some(value) = rule.apply(&variables) else {
                continue;
            };
            let name = rule.output();
            if value.is_nan() {
                return Err(DeduceError::NotANumber(name));
            }
            if merge(&mut variables, name, value, rel_tolerance)? {
                deduced += 1;
            }
        }

        if deduced == 0 {
            break;
        }
    }

    Ok(variables)
}

/// Insert a value or check it against the known one
///
/// Returns true if the variable was new.
fn merge(
    variables: &mut Variables,
    name: &'static str,
    value: f64,
    rel_tolerance: f64,
) -> Result<bool, DeduceError> {
    match variables.get(&name) {
        Some(&known) => {
            if (value - known).abs() > rel_tolerance * known.abs().max(value.abs()) {
                Err(DeduceError::Contradiction {
                    name,
                    known,
                    deduced: value,
                })
            } else {
                Ok(false)
            }
        }
        None => {
            variables
                .insert(name, value)
                .map_err(|_| DeduceError::TooManyVariables)?;
            Ok(true)
        }
    }
}
