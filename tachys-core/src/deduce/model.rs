//! Deduced models
//!
//! A [`Model`] stores the base attribute values of a schema. Every other
//! attribute is evaluated on access.

use core::fmt;

use heapless::{FnvIndexMap, String};

use super::attribute::{Attribute, AttributeKind, MAX_RULE_INPUTS};
use super::engine::{bounded_name, deduce, DeduceError, MAX_NAME_LEN};
use super::schema::Schema;

/// Maximum number of base attributes in a schema chain (power of two)
pub const MAX_BASE_ATTRIBUTES: usize = 16;

/// Maximum model name length
pub const MAX_MODEL_NAME_LEN: usize = 32;

/// Maximum model description length
pub const MAX_MODEL_DESC_LEN: usize = 64;

/// Attribute value annotated with units and description
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Quantity {
    /// Value, or `None` if the model does not define it
    pub value: Option<f64>,
    /// Physical units
    pub units: Option<&'static str>,
    /// Description
    pub desc: Option<&'static str>,
}

/// Model errors
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ModelError {
    /// Deduction failed
    Deduce(DeduceError),
    /// Name is not an attribute of the schema
    UnknownAttribute(String<MAX_NAME_LEN>),
    /// Attempt to assign a derived attribute
    ReadOnly(&'static str),
    /// Strict validator with undefined inputs
    Undefined(&'static str),
    /// Validator failed
    Invalid(&'static str),
    /// Model name longer than [`MAX_MODEL_NAME_LEN`]
    NameTooLong,
    /// Description longer than [`MAX_MODEL_DESC_LEN`]
    DescTooLong,
    /// More base values than [`MAX_BASE_ATTRIBUTES`]
    TooManyValues,
}

impl From<DeduceError> for ModelError {
    fn from(e: DeduceError) -> Self {
        ModelError::Deduce(e)
    }
}

impl fmt::Display for ModelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModelError::Deduce(e) => write!(f, "deduction failed: {e}"),
            ModelError::UnknownAttribute(name) => write!(f, "unknown attribute `{name}`"),
            ModelError::ReadOnly(name) => write!(f, "attribute `{name}` is read-only"),
            ModelError::Undefined(desc) => write!(f, "{desc}: attributes must be defined"),
            ModelError::Invalid(desc) => write!(f, "{desc}"),
            ModelError::NameTooLong => {
                write!(f, "model name longer than {MAX_MODEL_NAME_LEN} characters")
            }
            ModelError::DescTooLong => {
                write!(f, "model description longer than {MAX_MODEL_DESC_LEN} characters")
            }
            ModelError::TooManyValues => {
                write!(f, "more than {MAX_BASE_ATTRIBUTES} base attributes")
            }
        }
    }
}

impl core::error::Error for ModelError {}

/// Model instance over a static schema
#[derive(Debug, Clone)]
pub struct Model {
    schema: &'static Schema,
    name: String<MAX_MODEL_NAME_LEN>,
    desc: String<MAX_MODEL_DESC_LEN>,
    values: FnvIndexMap<&'static str, f64, MAX_BASE_ATTRIBUTES>,
}

impl Model {
    /// Create a model with every base attribute undefined
    pub fn undefined(schema: &'static Schema, name: &str) -> Result<Self, ModelError> {
        let name = String::try_from(name).map_err(|_| ModelError::NameTooLong)?;
        Ok(Self {
            schema,
            name,
            desc: String::new(),
            values: FnvIndexMap::new(),
        })
    }

    /// Deduce a model from any consistent set of attribute values
    ///
    /// Base attributes not reachable from the inputs take the schema
    /// default, if any, and stay undefined otherwise. The result is
    /// validated.
    pub fn deduce(
        schema: &'static Schema,
        name: &str,
        inputs: &[(&str, f64)],
        rel_tolerance: f64,
    ) -> Result<Self, ModelError> {
        let variables = deduce(schema, inputs, rel_tolerance)?;
        let mut model = Self::undefined(schema, name)?;

        for base in schema.base_names() {
            if let Some(&value) = variables.get(&base) {
                model.store(base, value)?;
            }
        }
        for &(base, value) in schema.defaults() {
            if !model.values.contains_key(&base) {
                model.store(base, value)?;
            }
        }

        model.validate()?;
        Ok(model)
    }

    /// Model name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Free text description, empty if not given
    pub fn desc(&self) -> &str {
        &self.desc
    }

    pub fn set_desc(&mut self, desc: &str) -> Result<(), ModelError> {
        self.desc = String::try_from(desc).map_err(|_| ModelError::DescTooLong)?;
        Ok(())
    }

    /// Builder form of [`Model::set_desc`]
    pub fn with_desc(mut self, desc: &str) -> Result<Self, ModelError> {
        self.set_desc(desc)?;
        Ok(self)
    }

    /// Schema this model follows
    pub fn schema(&self) -> &'static Schema {
        self.schema
    }

    /// Value of an attribute, `None` if unknown or undefined
    pub fn value(&self, name: &str) -> Option<f64> {
        self.schema
            .attribute(name)
            .and_then(|attr| self.evaluate(attr))
    }

    /// Value of an attribute with units and description
    pub fn get(&self, name: &str) -> Result<Quantity, ModelError> {
        let attr = self
            .schema
            .attribute(name)
            .ok_or_else(|| ModelError::UnknownAttribute(bounded_name(name)))?;
        Ok(self.quantity(attr))
    }

    /// Annotated value of a schema attribute
    pub fn quantity(&self, attr: &Attribute) -> Quantity {
        let (units, desc) = self.annotation(attr);
        Quantity {
            value: self.evaluate(attr),
            units,
            desc,
        }
    }

    /// Assign an attribute
    ///
    /// Aliases and scaled aliases write through to the attribute they refer
    /// to. Derived attributes cannot be assigned.
    pub fn set(&mut self, name: &str, value: f64) -> Result<(), ModelError> {
        let attr = self
            .schema
            .attribute(name)
            .ok_or_else(|| ModelError::UnknownAttribute(bounded_name(name)))?;
        self.assign(attr, value)
    }

    /// Check if every base attribute is defined
    pub fn is_fully_defined(&self) -> bool {
        self.schema
            .base_names()
            .all(|name| self.values.contains_key(&name))
    }

    /// Run every validator along the schema chain
    ///
    /// Validators with undefined inputs are skipped unless strict.
    pub fn validate(&self) -> Result<(), ModelError> {
        for validator in self.schema.validators() {
            let mut args = [0.0; MAX_RULE_INPUTS];
            let mut defined = true;
            for (slot, name) in args.iter_mut().zip(validator.inputs) {
                match self.value(name) {
                    Some(value) => *slot = value,
                    None => defined = false,
                }
            }

            if !defined {
                if validator.strict {
                    return Err(ModelError::Undefined(validator.desc));
                }
                continue;
            }

            if !(validator.check)(&args[..validator.inputs.len()]) {
                return Err(ModelError::Invalid(validator.desc));
            }
        }
        Ok(())
    }

    /// Attributes of a display group with their annotated values
    pub fn rows<'a>(
        &'a self,
        group: &'a str,
    ) -> impl Iterator<Item = (&'static Attribute, Quantity)> + 'a {
        self.schema
            .attributes_in_group(group)
            .map(move |attr| (attr, self.quantity(attr)))
    }

    fn store(&mut self, name: &'static str, value: f64) -> Result<(), ModelError> {
        self.values
            .insert(name, value)
            .map_err(|_| ModelError::TooManyValues)?;
        Ok(())
    }

    fn evaluate(&self, attr: &Attribute) -> Option<f64> {
        match attr.kind {
            AttributeKind::Base => self.values.get(&attr.name).copied(),
            AttributeKind::Alias { of } => self.evaluate(self.schema.attribute(of)?),
            AttributeKind::Scaled { of, scale } => self
                .evaluate(self.schema.attribute(of)?)
                .map(|value| value * scale),
            AttributeKind::Derived { inputs, func } => {
                let mut args = [0.0; MAX_RULE_INPUTS];
                for (slot, name) in args.iter_mut().zip(inputs) {
                    *slot = self.evaluate(self.schema.attribute(name)?)?;
                }
                let value = func(&args[..inputs.len()]);
                (!value.is_nan()).then_some(value)
            }
        }
    }

    fn assign(&mut self, attr: &Attribute, value: f64) -> Result<(), ModelError> {
        match attr.kind {
            AttributeKind::Base => self.store(attr.name, value),
            AttributeKind::Alias { of } => {
                let target = self.schema.attribute(of).ok_or(ModelError::ReadOnly(attr.name))?;
                self.assign(target, value)
            }
            AttributeKind::Scaled { of, scale } => {
                let target = self.schema.attribute(of).ok_or(ModelError::ReadOnly(attr.name))?;
                self.assign(target, value / scale)
            }
            AttributeKind::Derived { .. } => Err(ModelError::ReadOnly(attr.name)),
        }
    }

    /// Units and description, following aliases that declare none
    fn annotation(&self, attr: &Attribute) -> (Option<&'static str>, Option<&'static str>) {
        let mut units = attr.units;
        let mut desc = attr.desc;
        let mut current = attr;
        while let AttributeKind::Alias { of } = current.kind {
            match self.schema.attribute(of) {
                Some(target) => {
                    units = units.or(target.units);
                    desc = desc.or(target.desc);
                    current = target;
                }
                None => break,
            }
        }
        (units, desc)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::deduce::{Rule, Validator, DEFAULT_REL_TOLERANCE};

    static MOTOR: Schema = Schema {
        name: "Motor",
        parent: None,
        attributes: &[
            Attribute::base("R", Some("Ohm"), "Phase resistance.", &["resistance"]),
            Attribute::base("N", None, "Pole pairs.", &["poles"]),
            Attribute::base("Fm", Some("Wb"), "Rotor flux linkage.", &["flux"]),
            Attribute::base("L2", Some("H"), "Inductance harmonic.", &[]),
            Attribute::alias("Rph", "R", &["resistance"]),
            Attribute::scaled("Rll", 2.0, "R", Some("Ohm"), "Line to line resistance.", &["resistance"]),
            Attribute::derived("Kt", Some("N m/A"), "Torque constant.", &["Fm", "N"], |v| 1.5 * v[0] * v[1], &["flux"]),
            Attribute::alias("torque_constant", "Kt", &[]),
        ],
        rules: &[Rule::map("Fm", &["N", "Kt"], |v| v[1] / (1.5 * v[0]))],
        validators: &[Validator::new("Resistance must be positive", &["R"], |v| v[0] > 0.0)],
        defaults: &[("L2", 0.0)],
    };

    static STRICT: Schema = Schema {
        name: "Strict",
        parent: Some(&MOTOR),
        attributes: &[],
        rules: &[],
        validators: &[Validator::new("Flux is required", &["Fm"], |v| v[0] > 0.0).strict()],
        defaults: &[],
    };

    fn motor() -> Model {
        Model::deduce(
            &MOTOR,
            "test",
            &[("Rll", 1.0), ("N", 4.0), ("torque_constant", 0.12)],
            DEFAULT_REL_TOLERANCE,
        )
        .unwrap()
    }

    #[test]
    fn test_deduced_base_values() {
        let model = motor();
        assert_eq!(model.name(), "test");
        assert_eq!(model.value("R"), Some(0.5));
        assert!((model.value("Fm").unwrap() - 0.02).abs() < 1e-12);
        assert_eq!(model.value("L2"), Some(0.0));
        assert!(model.is_fully_defined());
    }

    #[test]
    fn test_alias_and_scaled_reads() {
        let model = motor();
        assert_eq!(model.value("Rph"), Some(0.5));
        assert_eq!(model.value("Rll"), Some(1.0));
        assert!((model.value("torque_constant").unwrap() - 0.12).abs() < 1e-12);
    }

    #[test]
    fn test_alias_inherits_annotation() {
        let model = motor();
        let q = model.get("Rph").unwrap();
        assert_eq!(q.units, Some("Ohm"));
        assert_eq!(q.desc, Some("Phase resistance."));

        let q = model.get("torque_constant").unwrap();
        assert_eq!(q.units, Some("N m/A"));
    }

    #[test]
    fn test_set_writes_through() {
        let mut model = motor();
        model.set("Rll", 3.0).unwrap();
        assert_eq!(model.value("R"), Some(1.5));
        model.set("Rph", 0.7).unwrap();
        assert_eq!(model.value("R"), Some(0.7));
    }

    #[test]
    fn test_derived_is_read_only() {
        let mut model = motor();
        assert_eq!(model.set("Kt", 1.0), Err(ModelError::ReadOnly("Kt")));
        assert_eq!(model.set("torque_constant", 1.0), Err(ModelError::ReadOnly("Kt")));
    }

    #[test]
    fn test_partial_model() {
        let model = Model::deduce(&MOTOR, "partial", &[("R", 0.5)], DEFAULT_REL_TOLERANCE).unwrap();
        assert!(!model.is_fully_defined());
        assert_eq!(model.value("Kt"), None);
        assert_eq!(model.get("Kt").unwrap().value, None);
    }

    #[test]
    fn test_validator_rejects() {
        let err = Model::deduce(&MOTOR, "bad", &[("R", -1.0)], DEFAULT_REL_TOLERANCE).unwrap_err();
        assert_eq!(err, ModelError::Invalid("Resistance must be positive"));
    }

    #[test]
    fn test_strict_validator_requires_inputs() {
        let err = Model::deduce(&STRICT, "strict", &[("R", 1.0)], DEFAULT_REL_TOLERANCE).unwrap_err();
        assert_eq!(err, ModelError::Undefined("Flux is required"));
    }

    #[test]
    fn test_unknown_attribute() {
        let model = motor();
        assert!(matches!(model.get("nope"), Err(ModelError::UnknownAttribute(_))));
        assert_eq!(model.value("nope"), None);
    }

    #[test]
    fn test_rows_by_group() {
        let model = motor();
        let names: std::vec::Vec<_> = model.rows("resistance").map(|(a, _)| a.name).collect();
        assert_eq!(names, ["R", "Rph", "Rll"]);
        assert_eq!(model.rows("base").count(), 4);
    }

    #[test]
    fn test_description() {
        let model = Model::deduce(&MOTOR, "m", &[("R", 0.5)], DEFAULT_REL_TOLERANCE).unwrap();
        assert_eq!(model.desc(), "");

        let model = model.with_desc("Frameless servo motor").unwrap();
        assert_eq!(model.desc(), "Frameless servo motor");

        let mut model = model;
        let long = "x".repeat(MAX_MODEL_DESC_LEN + 1);
        assert_eq!(model.set_desc(&long), Err(ModelError::DescTooLong));
        assert_eq!(model.desc(), "Frameless servo motor");
    }

    #[test]
    fn test_name_too_long() {
        let err = Model::undefined(&MOTOR, "a model name that is far too long to fit").unwrap_err();
        assert_eq!(err, ModelError::NameTooLong);
    }
}
