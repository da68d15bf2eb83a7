//! Model schemas
//!
//! A schema is a static declaration of attributes, extra rules, validators
//! and defaults. Schemas extend a parent schema; everything declared along
//! the chain applies, root first.

use core::fmt;

use heapless::Vec;

use super::attribute::{Attribute, AttributeKind, Rule, Validator, MAX_RULE_INPUTS};

/// Maximum length of a schema chain
pub const MAX_SCHEMA_DEPTH: usize = 4;

/// Model schema declaration
#[derive(Debug)]
pub struct Schema {
    /// Model type name
    pub name: &'static str,
    /// Extended schema, if any
    pub parent: Option<&'static Schema>,
    /// Attributes declared by this schema
    pub attributes: &'static [Attribute],
    /// Rules not implied by the attributes
    pub rules: &'static [Rule],
    /// Consistency checks
    pub validators: &'static [Validator],
    /// Values for base attributes left undefined by deduction
    pub defaults: &'static [(&'static str, f64)],
}

/// Schema declaration errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SchemaError {
    /// Name does not match `^[A-Za-z][A-Za-z0-9_]*$`
    InvalidName(&'static str),
    /// Attribute declared twice along the chain
    Duplicate(&'static str),
    /// Reference to an attribute that does not exist
    Unresolved {
        from: &'static str,
        target: &'static str,
    },
    /// Rule or validator with more than [`MAX_RULE_INPUTS`] inputs
    TooManyInputs(&'static str),
    /// Chain longer than [`MAX_SCHEMA_DEPTH`]
    TooDeep,
}

impl fmt::Display for SchemaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SchemaError::InvalidName(name) => write!(
                f,
                "attribute name `{name}` must contain only alphanumeric characters and underscores"
            ),
            SchemaError::Duplicate(name) => write!(f, "duplicate attribute `{name}`"),
            SchemaError::Unresolved { from, target } => {
                write!(f, "`{from}` requires attribute `{target}` to exist")
            }
            SchemaError::TooManyInputs(name) => {
                write!(f, "`{name}` takes more than {MAX_RULE_INPUTS} inputs")
            }
            SchemaError::TooDeep => write!(f, "schema chain deeper than {MAX_SCHEMA_DEPTH}"),
        }
    }
}

impl core::error::Error for SchemaError {}

/// Check an attribute identifier
pub fn name_is_valid(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        _ => false,
    }
}

impl Schema {
    /// Schemas along the chain, root first
    fn chain(&self) -> Vec<&Schema, MAX_SCHEMA_DEPTH> {
        let mut chain: Vec<&Schema, MAX_SCHEMA_DEPTH> = Vec::new();
        let mut current = Some(self);
        while let Some(schema) = current {
            if chain.push(schema).is_err() {
                break;
            }
            current = schema.parent;
        }
        chain.reverse();
        chain
    }

    /// Number of schemas along the chain (unbounded, for verification)
    fn depth(&self) -> usize {
        let mut depth = 1;
        let mut current = self.parent;
        while let Some(schema) = current {
            depth += 1;
            current = schema.parent;
        }
        depth
    }

    /// All attributes along the chain
    pub fn attributes(&self) -> impl Iterator<Item = &'static Attribute> + '_ {
        self.chain()
            .into_iter()
            .flat_map(|schema| schema.attributes.iter())
    }

    /// All deduction rules along the chain
    ///
    /// Per schema, explicit rules come before the attribute rules.
    pub fn rules(&self) -> impl Iterator<Item = Rule> + '_ {
        self.chain().into_iter().flat_map(|schema| {
            schema
                .rules
                .iter()
                .copied()
                .chain(schema.attributes.iter().flat_map(Attribute::rules))
        })
    }

    /// All validators along the chain
    pub fn validators(&self) -> impl Iterator<Item = &'static Validator> + '_ {
        self.chain()
            .into_iter()
            .flat_map(|schema| schema.validators.iter())
    }

    /// All defaults along the chain
    pub fn defaults(&self) -> impl Iterator<Item = &'static (&'static str, f64)> + '_ {
        self.chain()
            .into_iter()
            .flat_map(|schema| schema.defaults.iter())
    }

    /// Look up an attribute by name
    pub fn attribute(&self, name: &str) -> Option<&'static Attribute> {
        self.attributes().find(|attr| attr.name == name)
    }

    /// Attributes that belong to a display group
    pub fn attributes_in_group<'a>(
        &'a self,
        group: &'a str,
    ) -> impl Iterator<Item = &'static Attribute> + 'a {
        self.attributes().filter(move |attr| attr.in_group(group))
    }

    /// Names of the stored attributes
    pub fn base_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.attributes()
            .filter(|attr| attr.is_base())
            .map(|attr| attr.name)
    }

    /// Display groups used along the chain, in first-use order
    pub fn groups<const N: usize>(&self) -> Vec<&'static str, N> {
        let mut groups: Vec<&'static str, N> = Vec::new();
        for attr in self.attributes() {
            for group in attr.groups {
                if !groups.contains(group) && groups.push(*group).is_err() {
                    return groups;
                }
            }
        }
        groups
    }

    /// Check the declaration for consistency
    pub fn verify(&self) -> Result<(), SchemaError> {
        if self.depth() > MAX_SCHEMA_DEPTH {
            return Err(SchemaError::TooDeep);
        }

        for (index, attr) in self.attributes().enumerate() {
            if !name_is_valid(attr.name) {
                return Err(SchemaError::InvalidName(attr.name));
            }
            if self
                .attributes()
                .take(index)
                .any(|other| other.name == attr.name)
            {
                return Err(SchemaError::Duplicate(attr.name));
            }
            self.resolve_all(attr.name, attr.references())?;
            if let AttributeKind::Derived { inputs, .. } = attr.kind {
                if inputs.len() > MAX_RULE_INPUTS {
                    return Err(SchemaError::TooManyInputs(attr.name));
                }
            }
        }

        for rule in self.rules() {
            if rule.inputs().len() > MAX_RULE_INPUTS {
                return Err(SchemaError::TooManyInputs(rule.output()));
            }
            self.resolve_all(rule.output(), rule.inputs())?;
            self.resolve_all(rule.output(), &[rule.output()])?;
        }

        for validator in self.validators() {
            if validator.inputs.len() > MAX_RULE_INPUTS {
                return Err(SchemaError::TooManyInputs(validator.desc));
            }
            self.resolve_all(validator.desc, validator.inputs)?;
        }

        for &(name, _) in self.defaults() {
            match self.attribute(name) {
                Some(attr) if attr.is_base() => {}
                _ => {
                    return Err(SchemaError::Unresolved {
                        from: self.name,
                        target: name,
                    })
                }
            }
        }

        Ok(())
    }

    fn resolve_all(&self, from: &'static str, targets: &[&'static str]) -> Result<(), SchemaError> {
        for &target in targets {
            if self.attribute(target).is_none() {
                return Err(SchemaError::Unresolved { from, target });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    static ROOT: Schema = Schema {
        name: "Root",
        parent: None,
        attributes: &[
            Attribute::base("R", Some("Ohm"), "resistance", &["resistance"]),
            Attribute::alias("Rph", "R", &["resistance"]),
        ],
        rules: &[],
        validators: &[],
        defaults: &[],
    };

    static CHILD: Schema = Schema {
        name: "Child",
        parent: Some(&ROOT),
        attributes: &[
            Attribute::base("L", Some("H"), "inductance", &["inductance"]),
            Attribute::base("L2", Some("H"), "harmonic", &["inductance"]),
        ],
        rules: &[Rule::map("R", &["L"], |v| v[0])],
        validators: &[Validator::new("positive", &["L"], |v| v[0] > 0.0)],
        defaults: &[("L2", 0.0)],
    };

    static DUPLICATE: Schema = Schema {
        name: "Duplicate",
        parent: Some(&ROOT),
        attributes: &[Attribute::base("R", Some("Ohm"), "again", &[])],
        rules: &[],
        validators: &[],
        defaults: &[],
    };

    static DANGLING: Schema = Schema {
        name: "Dangling",
        parent: None,
        attributes: &[Attribute::alias("Rph", "R", &[])],
        rules: &[],
        validators: &[],
        defaults: &[],
    };

    static BAD_NAME: Schema = Schema {
        name: "BadName",
        parent: None,
        attributes: &[Attribute::base("1R", None, "starts with a digit", &[])],
        rules: &[],
        validators: &[],
        defaults: &[],
    };

    #[test]
    fn test_chain_order() {
        let names: std::vec::Vec<_> = CHILD.attributes().map(|a| a.name).collect();
        assert_eq!(names, ["R", "Rph", "L", "L2"]);
    }

    #[test]
    fn test_rules_include_parent() {
        // Rph alias gives two rules, CHILD has one explicit rule
        assert_eq!(CHILD.rules().count(), 3);
        assert_eq!(ROOT.rules().count(), 2);
    }

    #[test]
    fn test_lookup_and_groups() {
        assert!(CHILD.attribute("Rph").is_some());
        assert!(ROOT.attribute("L").is_none());
        assert_eq!(CHILD.attributes_in_group("inductance").count(), 2);
        assert_eq!(CHILD.attributes_in_group("base").count(), 3);

        let groups: Vec<&str, 8> = CHILD.groups();
        assert_eq!(groups.as_slice(), &["resistance", "inductance"]);

        let bases: std::vec::Vec<_> = CHILD.base_names().collect();
        assert_eq!(bases, ["R", "L", "L2"]);
    }

    #[test]
    fn test_verify_ok() {
        assert_eq!(ROOT.verify(), Ok(()));
        assert_eq!(CHILD.verify(), Ok(()));
    }

    #[test]
    fn test_verify_errors() {
        assert_eq!(DUPLICATE.verify(), Err(SchemaError::Duplicate("R")));
        assert_eq!(
            DANGLING.verify(),
            Err(SchemaError::Unresolved {
                from: "Rph",
                target: "R"
            })
        );
        assert_eq!(BAD_NAME.verify(), Err(SchemaError::InvalidName("1R")));
    }

    #[test]
    fn test_name_validation() {
        assert!(name_is_valid("Kemf_llrms_rpm"));
        assert!(name_is_valid("L2"));
        assert!(!name_is_valid(""));
        assert!(!name_is_valid("_R"));
        assert!(!name_is_valid("R-ll"));
    }
}
