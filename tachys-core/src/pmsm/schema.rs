//! PMSM model schemas
//!
//! [`ROTARY`] describes the machine with equal d and q inductance,
//! [`ROTARY_DQ`] adds saliency and [`NOMINAL`] adds the rated operating
//! point from the nameplate.

use core::f64::consts::{FRAC_1_SQRT_2, PI};

use super::nominal::{flux_from_nominal, NominalMode, NominalParams, Root};
use crate::deduce::{Attribute, Rule, Schema, Validator};

pub const SQRT_3: f64 = 1.732_050_807_568_877_2;
/// sqrt(3/2)
pub const SQRT_3_2: f64 = 1.224_744_871_391_589;
/// rpm to rad/s
pub const RPM_TO_RAD_S: f64 = PI / 30.0;
/// rad/s to rpm
pub const RAD_S_TO_RPM: f64 = 30.0 / PI;

/// Rotary machine with a single inductance
pub static ROTARY: Schema = Schema {
    name: "Rotary",
    parent: None,
    attributes: &[
        Attribute::base("L", Some("H"), "Motor inductance as it is present in the model.", &["inductance"]),
        Attribute::base("R", Some("Ohm"), "Phase resistance (between zero point and phase).", &["resistance"]),
        Attribute::base("Fm", Some("Wb"), "Rotor flux linkage.", &["flux"]),
        Attribute::base("N", None, "Number of pole pairs.", &["poles"]),
        Attribute::base("J", Some("kg m^2"), "Rotor inertia.", &["inertia"]),
        Attribute::alias("Rph", "R", &["resistance"]),
        Attribute::alias("n_pole_pairs", "N", &["poles"]),
        Attribute::scaled("Lph", 2.0 / 3.0, "L", Some("H"), "Measured phase inductance (between zero point and phase).", &["inductance"]),
        Attribute::scaled("Lll", 2.0, "L", Some("H"), "Measured line to line inductance.", &["inductance"]),
        Attribute::scaled("Rll", 2.0, "R", Some("Ohm"), "Measured line to line resistance.", &["resistance"]),
        Attribute::scaled("n_poles", 2.0, "N", None, "Number of poles.", &["poles"]),
        Attribute::derived("Kemf", Some("V s"), "Back EMF constant: speed in rad/s to phase voltage amplitude.", &["Fm", "N"], |v| v[1] * v[0], &["flux"]),
        Attribute::derived("Kt", Some("N m/A"), "Torque constant.", &["Fm", "N"], |v| 1.5 * v[1] * v[0], &["flux"]),
        Attribute::scaled("Kemf_llrms_rpm", RPM_TO_RAD_S * SQRT_3_2, "Kemf", Some("V/rpm"), "Back EMF constant: speed in rpm to rms line to line voltage.", &["flux"]),
        Attribute::scaled("Kemf_rpm", RPM_TO_RAD_S, "Kemf", Some("V/rpm"), "Back EMF constant: speed in rpm to phase voltage amplitude.", &["flux"]),
    ],
    rules: &[
        Rule::map("Fm", &["N", "Kt"], |v| v[1] / (1.5 * v[0])),
        Rule::map("Fm", &["N", "Kemf"], |v| v[1] / v[0]),
    ],
    validators: &[],
    defaults: &[],
};

/// Rotary machine with distinct d and q inductance
pub static ROTARY_DQ: Schema = Schema {
    name: "RotaryDq",
    parent: Some(&ROTARY),
    attributes: &[
        Attribute::base("L2", Some("H"), "Second inductance harmonic.", &["inductance"]),
        Attribute::derived("Ld", Some("H"), "Direct axis inductance.", &["L", "L2"], |v| v[0] + v[1], &["inductance"]),
        Attribute::derived("Lq", Some("H"), "Quadrature axis inductance.", &["L", "L2"], |v| v[0] - v[1], &["inductance"]),
    ],
    rules: &[
        Rule::map("L", &["Ld", "Lq"], |v| (v[0] + v[1]) / 2.0),
        Rule::map("L2", &["Ld", "Lq"], |v| (v[0] - v[1]) / 2.0),
    ],
    validators: &[],
    defaults: &[("L2", 0.0)],
};

/// Rotary machine with a rated operating point
pub static NOMINAL: Schema = Schema {
    name: "Nominal",
    parent: Some(&ROTARY_DQ),
    attributes: &[
        Attribute::base("Un", Some("V"), "Rated phase voltage amplitude (between phase and zero point).", &[]),
        Attribute::base("In", Some("A"), "Rated phase current amplitude.", &[]),
        Attribute::base("vn", Some("rad/s"), "Rated speed.", &[]),
        Attribute::base("Tn", Some("N m"), "Rated torque.", &[]),
        Attribute::alias("rated_speed", "vn", &["rated_speed", "rated"]),
        Attribute::alias("rated_torque", "Tn", &["rated_torque", "rated"]),
        Attribute::scaled("rated_ac_voltage", SQRT_3_2, "Un", Some("V"), "Rated three phase rms voltage.", &["rated_voltage", "rated"]),
        Attribute::scaled("Un_rms", FRAC_1_SQRT_2, "Un", Some("V"), "Rated phase rms voltage.", &[]),
        Attribute::scaled("rated_dc_voltage", SQRT_3, "Un", Some("V"), "DC bus voltage.", &["rated_voltage", "rated"]),
        Attribute::scaled("In_rms", FRAC_1_SQRT_2, "In", Some("A"), "Rated rms phase current.", &[]),
        Attribute::scaled("rated_speed_rpm", RAD_S_TO_RPM, "vn", Some("rpm"), "Rated speed.", &["rated_speed", "rated"]),
        Attribute::alias("rated_current", "In_rms", &["rated_current", "rated"]),
        Attribute::alias("rated_ac_phase_voltage", "Un_rms", &["rated_voltage", "rated"]),
        Attribute::derived("Pn", Some("W"), "Rated power.", &["vn", "Tn"], |v| v[0] * v[1], &[]),
        Attribute::derived("fn", Some("Hz"), "Rated electrical frequency.", &["N", "vn"], |v| v[0] * v[1] / (2.0 * PI), &[]),
        Attribute::alias("rated_power", "Pn", &["rated_power", "rated"]),
        Attribute::alias("rated_frequency", "fn", &["rated_speed", "rated"]),
    ],
    rules: &[
        Rule::map("vn", &["Pn", "Tn"], |v| v[0] / v[1]),
        Rule::map("vn", &["N", "fn"], |v| 2.0 * PI * v[1] / v[0]),
        Rule::map("Tn", &["vn", "Pn"], |v| v[1] / v[0]),
        Rule::map("Fm", &["R", "L", "N", "vn", "Pn", "In", "Un"], |v| {
            let params = NominalParams {
                resistance: v[0],
                inductance: v[1],
                pole_pairs: v[2],
                speed: v[3],
                power: v[4],
                current: v[5],
                voltage: v[6],
            };
            flux_from_nominal(&params, NominalMode::Motor, Root::Plus)
        }),
    ],
    validators: &[Validator::new(
        "Mechanical power output must not be greater than electrical power input",
        &["Un_rms", "In_rms", "Pn"],
        |v| 3.0 * v[0] * v[1] > v[2],
    )],
    defaults: &[],
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schemas_verify() {
        assert_eq!(ROTARY.verify(), Ok(()));
        assert_eq!(ROTARY_DQ.verify(), Ok(()));
        assert_eq!(NOMINAL.verify(), Ok(()));
    }

    #[test]
    fn test_base_attributes() {
        let bases: std::vec::Vec<_> = NOMINAL.base_names().collect();
        assert_eq!(bases, ["L", "R", "Fm", "N", "J", "L2", "Un", "In", "vn", "Tn"]);
    }

    #[test]
    fn test_groups() {
        let groups: heapless::Vec<&str, 16> = NOMINAL.groups();
        assert!(groups.contains(&"rated"));
        assert!(groups.contains(&"inductance"));
        assert_eq!(NOMINAL.attributes_in_group("poles").count(), 3);
    }
}
