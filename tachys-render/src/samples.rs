//! CSV export of profile samples

use std::io;

use serde::Serialize;
use tachys_core::motion::TrapezoidalProfile;

use crate::RenderError;

#[derive(Debug, Serialize)]
struct Row {
    t: f64,
    position: f64,
    velocity: f64,
    acceleration: f64,
}

/// Write `t,position,velocity,acceleration` rows every `dt` seconds
///
/// Returns the number of rows written.
pub fn write_samples<W: io::Write>(
    writer: W,
    profile: &TrapezoidalProfile,
    dt: f64,
) -> Result<usize, RenderError> {
    let mut csv = csv::Writer::from_writer(writer);
    let mut rows = 0;
    for setpoint in profile.samples(dt)? {
        csv.serialize(Row {
            t: setpoint.time,
            position: setpoint.position,
            velocity: setpoint.velocity,
            acceleration: setpoint.acceleration,
        })?;
        rows += 1;
    }
    csv.flush()?;
    Ok(rows)
}
