//! Attribute, rule and validator declarations
//!
//! These are plain `'static` data so that whole model schemas can be
//! declared as statics without allocation.

use super::engine::Variables;

/// Maximum number of inputs a rule or validator may take
pub const MAX_RULE_INPUTS: usize = 8;

/// Function computing one value from the rule inputs (in declaration order)
pub type RuleFn = fn(&[f64]) -> f64;

/// Predicate over validator inputs (in declaration order)
pub type CheckFn = fn(&[f64]) -> bool;

/// How an attribute obtains its value
#[derive(Debug, Clone, Copy)]
pub enum AttributeKind {
    /// Stored value
    Base,
    /// Same value as another attribute
    Alias { of: &'static str },
    /// `scale` times the value of another attribute
    Scaled { of: &'static str, scale: f64 },
    /// Read-only function of other attributes
    Derived {
        inputs: &'static [&'static str],
        func: RuleFn,
    },
}

/// A named model attribute
#[derive(Debug, Clone, Copy)]
pub struct Attribute {
    /// Identifier (`^[A-Za-z][A-Za-z0-9_]*$`)
    pub name: &'static str,
    /// Physical units, if any
    pub units: Option<&'static str>,
    /// Human readable description
    pub desc: Option<&'static str>,
    /// Display groups this attribute belongs to
    pub groups: &'static [&'static str],
    /// Value source
    pub kind: AttributeKind,
}

impl Attribute {
    /// Stored attribute. Always member of the `base` group.
    pub const fn base(
        name: &'static str,
        units: Option<&'static str>,
        desc: &'static str,
        groups: &'static [&'static str],
    ) -> Self {
        Self {
            name,
            units,
            desc: Some(desc),
            groups,
            kind: AttributeKind::Base,
        }
    }

    /// Alias of another attribute. Units and description are inherited.
    pub const fn alias(
        name: &'static str,
        of: &'static str,
        groups: &'static [&'static str],
    ) -> Self {
        Self {
            name,
            units: None,
            desc: None,
            groups,
            kind: AttributeKind::Alias { of },
        }
    }

    /// Attribute equal to `scale * of`
    pub const fn scaled(
        name: &'static str,
        scale: f64,
        of: &'static str,
        units: Option<&'static str>,
        desc: &'static str,
        groups: &'static [&'static str],
    ) -> Self {
        Self {
            name,
            units,
            desc: Some(desc),
            groups,
            kind: AttributeKind::Scaled { of, scale },
        }
    }

    /// Read-only attribute computed from `inputs`
    pub const fn derived(
        name: &'static str,
        units: Option<&'static str>,
        desc: &'static str,
        inputs: &'static [&'static str],
        func: RuleFn,
        groups: &'static [&'static str],
    ) -> Self {
        Self {
            name,
            units,
            desc: Some(desc),
            groups,
            kind: AttributeKind::Derived { inputs, func },
        }
    }

    /// Check if this is a stored attribute
    pub fn is_base(&self) -> bool {
        matches!(self.kind, AttributeKind::Base)
    }

    /// Check group membership
    ///
    /// `all` matches every attribute, `base` matches every stored attribute.
    pub fn in_group(&self, group: &str) -> bool {
        group == "all" || (group == "base" && self.is_base()) || self.groups.contains(&group)
    }

    /// Names of the attributes this one reads from
    pub fn references(&self) -> &[&'static str] {
        match &self.kind {
            AttributeKind::Base => &[],
            AttributeKind::Alias { of } | AttributeKind::Scaled { of, .. } => {
                core::slice::from_ref(of)
            }
            AttributeKind::Derived { inputs, .. } => *inputs,
        }
    }

    /// Deduction rules implied by this attribute
    ///
    /// Aliases and scaled aliases work in both directions, derived
    /// attributes only forward.
    pub fn rules(&self) -> impl Iterator<Item = Rule> {
        let pair = match self.kind {
            AttributeKind::Base => [None, None],
            AttributeKind::Alias { of } => [
                Some(Rule::scale(self.name, of, 1.0)),
                Some(Rule::scale(of, self.name, 1.0)),
            ],
            AttributeKind::Scaled { of, scale } => [
                Some(Rule::scale(self.name, of, scale)),
                Some(Rule::scale(of, self.name, 1.0 / scale)),
            ],
            AttributeKind::Derived { inputs, func } => [Some(Rule::map(self.name, inputs, func)), None],
        };
        pair.into_iter().flatten()
    }
}

/// A deduction rule producing one variable from others
#[derive(Debug, Clone, Copy)]
pub enum Rule {
    /// `output = func(inputs...)`
    Map {
        output: &'static str,
        inputs: &'static [&'static str],
        func: RuleFn,
    },
    /// `output = factor * input`
    Scale {
        output: &'static str,
        input: &'static str,
        factor: f64,
    },
}

impl Rule {
    pub const fn map(output: &'static str, inputs: &'static [&'static str], func: RuleFn) -> Self {
        Self::Map {
            output,
            inputs,
            func,
        }
    }

    pub const fn scale(output: &'static str, input: &'static str, factor: f64) -> Self {
        Self::Scale {
            output,
            input,
            factor,
        }
    }

    /// Name of the produced variable
    pub fn output(&self) -> &'static str {
        match *self {
            Rule::Map { output, .. } | Rule::Scale { output, .. } => output,
        }
    }

    /// Names of the consumed variables
    pub fn inputs(&self) -> &[&'static str] {
        match self {
            Rule::Map { inputs, .. } => *inputs,
            Rule::Scale { input, .. } => core::slice::from_ref(input),
        }
    }

    /// Apply the rule if all of its inputs are known
    pub fn apply(&self, variables: &Variables) -> Option<f64> {
        match *self {
            Rule::Scale { input, factor, .. } => variables.get(&input).map(|value| value * factor),
            Rule::Map { inputs, func, .. } => {
                let mut args = [0.0; MAX_RULE_INPUTS];
                for (slot, name) in args.iter_mut().zip(inputs) {
                    *slot = *variables.get(name)?;
                }
                Some(func(&args[..inputs.len()]))
            }
        }
    }
}

/// Consistency check over a set of attributes
#[derive(Debug, Clone, Copy)]
pub struct Validator {
    /// Failure message
    pub desc: &'static str,
    /// Attributes passed to `check`, in order
    pub inputs: &'static [&'static str],
    /// Returns true if the model is consistent
    pub check: CheckFn,
    /// Fail when an input is undefined instead of skipping the check
    pub strict: bool,
}

impl Validator {
    pub const fn new(desc: &'static str, inputs: &'static [&'static str], check: CheckFn) -> Self {
        Self {
            desc,
            inputs,
            check,
            strict: false,
        }
    }

    pub const fn strict(mut self) -> Self {
        self.strict = true;
        self
    }
}
