use std::io::{self, Write};
use std::path::PathBuf;

use colored::Colorize;
use tachys_render::format_value;

use super::{load_stage, status, Executable};

#[derive(Debug, clap::Args)]
/// Load and validate a stage description
pub struct Check {
    /// Stage description file
    config: PathBuf,
}

impl Check {
    fn run(&self, out: &mut impl Write) -> eyre::Result<()> {
        let stage = load_stage(&self.config)?;
        let motor = stage.motor();

        writeln!(out, "stage {}: {}", stage.name(), "ok".green())?;
        writeln!(
            out,
            "motor {}: {}",
            motor.name(),
            status(motor.is_fully_defined(), "fully defined", "not fully defined")
        )?;
        if !motor.desc().is_empty() {
            writeln!(out, "  {}", motor.desc())?;
        }
        for m in &stage.config().moves {
            writeln!(
                out,
                "move {}: {} {}",
                m.name,
                format_value(m.distance),
                stage.units().position
            )?;
        }
        Ok(())
    }
}

impl Executable for Check {
    fn execute(self) -> eyre::Result<()> {
        self.run(&mut io::stdout().lock())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::tests::{output, sample_config};

    #[test]
    fn test_check_sample() {
        let check = Check {
            config: sample_config(),
        };
        let text = output(|out| check.run(out)).unwrap();
        assert!(text.contains("stage x-stage"));
        assert!(text.contains("motor BLDC 57"));
        assert!(text.contains("57 mm brushless servo, 8 poles"));
        assert!(text.contains("move full-stroke: 300 mm"));
        assert!(text.contains("move index: -5 mm"));
    }

    #[test]
    fn test_check_missing_file() {
        let check = Check {
            config: PathBuf::from("does-not-exist.toml"),
        };
        assert!(output(|out| check.run(out)).is_err());
    }
}
