use std::io::{self, Write};
use std::path::PathBuf;

use tachys_render::{limits_table, TableFormat};

use super::{load_stage, status, Executable};
use crate::stage::MoveRequest;

#[derive(Debug, clap::Args)]
/// Print the dynamic limits of a stage
pub struct Limits {
    /// Stage description file
    config: PathBuf,
    /// Cruise velocity to evaluate, maximum speed if absent
    #[clap(long)]
    velocity: Option<f64>,
    /// Table format: simple, markdown or html
    #[clap(long, default_value_t = TableFormat::Simple)]
    format: TableFormat,
}

impl Limits {
    fn run(&self, out: &mut impl Write) -> eyre::Result<()> {
        let stage = load_stage(&self.config)?;
        let limits = stage.move_limits(&MoveRequest {
            velocity: self.velocity,
            ..Default::default()
        })?;
        let sheet = stage.limits().sheet(&limits);

        write!(out, "{}", limits_table(&sheet).render(self.format)?)?;
        let exceeded: Vec<&str> = sheet.exceeded().map(|p| p.name).collect();
        writeln!(
            out,
            "\nstage {}: {}",
            stage.name(),
            status(
                exceeded.is_empty(),
                "within limits",
                &format!("exceeded: {}", exceeded.join(", "))
            )
        )?;
        Ok(())
    }
}

impl Executable for Limits {
    fn execute(self) -> eyre::Result<()> {
        self.run(&mut io::stdout().lock())
    }
}
