//! Tables of models, limits and profiles

use tachys_core::deduce::Model;
use tachys_core::motion::{LimitSheet, ThermalCheck, TrapezoidalProfile};

use crate::table::{Cell, Table};

/// Significant digits of formatted values
const SIGNIFICANT_DIGITS: i32 = 6;

/// Format a value with six significant digits like C's `%g`
pub fn format_value(value: f64) -> String {
    if value == 0.0 {
        return "0".to_owned();
    }
    if !value.is_finite() {
        return value.to_string();
    }

    let precision = (SIGNIFICANT_DIGITS - 1) as usize;
    let scientific = format!("{value:.precision$e}");
    let (mantissa, exponent) = scientific.split_once('e').unwrap_or((&scientific, "0"));
    let exponent: i32 = exponent.parse().unwrap_or(0);

    if exponent < -4 || exponent >= SIGNIFICANT_DIGITS {
        let sign = if exponent < 0 { '-' } else { '+' };
        format!("{}e{sign}{:02}", trim_zeros(mantissa), exponent.abs())
    } else {
        let decimals = (SIGNIFICANT_DIGITS - 1 - exponent) as usize;
        trim_zeros(&format!("{value:.decimals$}")).to_owned()
    }
}

fn trim_zeros(text: &str) -> &str {
    if text.contains('.') {
        text.trim_end_matches('0').trim_end_matches('.')
    } else {
        text
    }
}

fn number(value: f64) -> Cell {
    Cell::number(format_value(value))
}

fn optional(value: Option<f64>) -> Cell {
    value.map_or_else(Cell::empty, number)
}

/// Model attributes of a display group
pub fn model_table(model: &Model, group: &str) -> Table {
    let mut table = Table::new(["name", "value", "units", "description"]);
    for (attr, quantity) in model.rows(group) {
        table.push_row([
            Cell::text(attr.name),
            optional(quantity.value),
            Cell::text(quantity.units.unwrap_or("")),
            Cell::text(quantity.desc.unwrap_or("")),
        ]);
    }
    table
}

/// Computed limits with their maxima
pub fn limits_table(sheet: &LimitSheet) -> Table {
    let mut table = Table::new(["name", "value", "max", "units", "status", "description"]);
    for entry in sheet.entries() {
        table.push_row([
            Cell::text(entry.name),
            number(entry.value),
            optional(entry.max),
            Cell::text(entry.units),
            Cell::text(if entry.is_exceeded() { "EXCEEDED" } else { "" }),
            Cell::text(entry.desc),
        ]);
    }
    table
}

/// Phases of a planned move
pub fn phases_table(profile: &TrapezoidalProfile) -> Table {
    let mut table = Table::new([
        "phase",
        "start",
        "duration",
        "v_start",
        "v_end",
        "acceleration",
        "distance",
    ]);
    for phase in profile.phases() {
        table.push_row([
            Cell::text(phase.kind.name()),
            number(phase.start),
            number(phase.duration),
            number(phase.start_velocity),
            number(phase.end_velocity),
            number(phase.acceleration),
            number(phase.distance),
        ]);
    }
    table
}

/// Current demand of a move cycle
pub fn thermal_table(check: &ThermalCheck) -> Table {
    let mut table = Table::new(["name", "value", "max", "units"]);
    table.push_row([
        Cell::text("rms current"),
        number(check.rms_current),
        number(check.continuous_limit),
        Cell::text("A"),
    ]);
    table.push_row([
        Cell::text("peak current"),
        number(check.peak_current),
        number(check.peak_limit),
        Cell::text("A"),
    ]);
    table.push_row([
        Cell::text("cycle time"),
        number(check.cycle_time),
        Cell::empty(),
        Cell::text("s"),
    ]);
    table
}
