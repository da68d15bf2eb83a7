//! Parameter deduction
//!
//! Models are declared as static [`Schema`]s of named attributes. Given any
//! consistent subset of attribute values, [`deduce`] fills in every value
//! reachable through the schema rules and [`Model`] keeps the base values.

pub mod attribute;
pub mod engine;
pub mod model;
pub mod schema;

pub use attribute::{Attribute, AttributeKind, CheckFn, Rule, RuleFn, Validator, MAX_RULE_INPUTS};
pub use engine::{deduce, DeduceError, Variables, DEFAULT_REL_TOLERANCE, MAX_NAME_LEN, MAX_VARIABLES};
pub use model::{
    Model, ModelError, Quantity, MAX_BASE_ATTRIBUTES, MAX_MODEL_DESC_LEN, MAX_MODEL_NAME_LEN,
};
pub use schema::{name_is_valid, Schema, SchemaError, MAX_SCHEMA_DEPTH};
