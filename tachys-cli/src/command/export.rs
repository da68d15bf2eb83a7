use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;

use eyre::Context;
use tachys_render::format_value;
use tracing::{debug, info};

use super::{load_stage, Executable};
use crate::record::LimitsRecord;
use crate::stage::MoveRequest;

#[derive(Debug, clap::Args)]
/// Write the move limits as a binary record
pub struct Export {
    /// Stage description file
    config: PathBuf,
    /// Output file
    #[clap(short, long, value_name = "FILE")]
    output: PathBuf,
    /// Cruise velocity, maximum speed if absent
    #[clap(long)]
    velocity: Option<f64>,
}

impl Export {
    fn run(&self, out: &mut impl Write) -> eyre::Result<()> {
        let stage = load_stage(&self.config)?;
        let limits = stage.move_limits(&MoveRequest {
            velocity: self.velocity,
            ..Default::default()
        })?;

        let bytes = LimitsRecord::new(limits).to_bytes()?;
        fs::write(&self.output, &bytes)
            .wrap_err_with(|| format!("failed to write `{}`", self.output.display()))?;
        info!("wrote {} bytes to {}", bytes.len(), self.output.display());

        let written = fs::read(&self.output)
            .wrap_err_with(|| format!("failed to read back `{}`", self.output.display()))?;
        let record = LimitsRecord::from_bytes(&written)?;
        debug!("read back record version {}", record.version);

        let units = stage.units();
        writeln!(
            out,
            "velocity {} {}, acceleration {} {}, deceleration {} {}",
            format_value(record.limits.velocity),
            units.velocity,
            format_value(record.limits.acceleration),
            units.acceleration,
            format_value(record.limits.deceleration),
            units.acceleration
        )?;
        Ok(())
    }
}

impl Executable for Export {
    fn execute(self) -> eyre::Result<()> {
        self.run(&mut io::stdout().lock())
    }
}
