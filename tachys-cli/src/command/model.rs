use std::io::{self, Write};
use std::path::PathBuf;

use eyre::bail;
use tachys_core::pmsm::{NominalMode, Root};
use tachys_render::{format_value, model_table, TableFormat};

use super::{load_stage, status, Executable};

/// Groups known to the motor schema
const MAX_GROUPS: usize = 16;

#[derive(Debug, clap::Args)]
/// Deduce the motor model and print its attributes
pub struct Model {
    /// Stage description file
    config: PathBuf,
    /// Attribute group to print, all groups if absent
    #[clap(long)]
    group: Option<String>,
    /// Table format: simple, markdown or html
    #[clap(long, default_value_t = TableFormat::Simple)]
    format: TableFormat,
}

impl Model {
    fn run(&self, out: &mut impl Write) -> eyre::Result<()> {
        let stage = load_stage(&self.config)?;
        let motor = stage.motor();
        let model = motor.model();

        writeln!(
            out,
            "motor {}: {}",
            motor.name(),
            status(motor.is_fully_defined(), "fully defined", "not fully defined")
        )?;
        if !motor.desc().is_empty() {
            writeln!(out, "{}", motor.desc())?;
        }

        match &self.group {
            Some(group) => {
                let table = model_table(model, group);
                if table.is_empty() {
                    bail!("motor model has no attribute group `{group}`");
                }
                write!(out, "{}", table.render(self.format)?)?;
            }
            None => {
                for group in model.schema().groups::<MAX_GROUPS>() {
                    writeln!(out, "\n{group}")?;
                    write!(out, "{}", model_table(model, group).render(self.format)?)?;
                }
            }
        }

        if let Some(point) = motor.operating_point(NominalMode::Motor, Root::Plus) {
            writeln!(out, "\nrated operating point")?;
            writeln!(
                out,
                "  Id {} A, Iq {} A, Ud {} V, Uq {} V",
                format_value(point.current.d),
                format_value(point.current.q),
                format_value(point.voltage.d),
                format_value(point.voltage.q)
            )?;
            if let Some(stable) = point.stable {
                writeln!(out, "  {}", status(stable, "stable", "unstable"))?;
            }
        }
        Ok(())
    }
}

impl Executable for Model {
    fn execute(self) -> eyre::Result<()> {
        self.run(&mut io::stdout().lock())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::tests::{output, sample_config};

    fn args(group: Option<&str>, format: TableFormat) -> Model {
        Model {
            config: sample_config(),
            group: group.map(str::to_owned),
            format,
        }
    }

    #[test]
    fn test_single_group() {
        let model = args(Some("resistance"), TableFormat::Simple);
        let text = output(|out| model.run(out)).unwrap();
        assert!(text.contains("motor BLDC 57"));
        assert!(text.contains("57 mm brushless servo, 8 poles"));
        assert!(text.contains("Rll"));
        assert!(text.contains("0.45"));
        assert!(!text.contains("Kemf_rpm"));
    }

    #[test]
    fn test_all_groups_markdown() {
        let model = args(None, TableFormat::Markdown);
        let text = output(|out| model.run(out)).unwrap();
        for group in ["inductance", "resistance", "flux", "poles", "inertia"] {
            assert!(text.contains(&format!("\n{group}\n")), "missing group {group}");
        }
        assert!(text.contains("| Kt "));
    }

    #[test]
    fn test_unknown_group() {
        let model = args(Some("thermal"), TableFormat::Simple);
        let error = output(|out| model.run(out)).unwrap_err();
        assert!(error.to_string().contains("no attribute group `thermal`"));
    }
}
