use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use eyre::{bail, Context};
use tachys_core::config::StageConfig;
use tachys_render::{
    format_value, phases_table, profile_svg, thermal_table, write_samples, PlotOptions,
    TableFormat,
};
use tracing::info;

use super::{load_stage, status, Executable};
use crate::stage::MoveRequest;

#[derive(Debug, clap::Args)]
/// Plan a move and check it against the stage limits
pub struct Profile {
    /// Stage description file
    config: PathBuf,
    /// Configured move to plan, the first one if absent
    #[clap(long = "move", value_name = "NAME")]
    name: Option<String>,
    /// Move distance, overrides the configured one
    #[clap(long, allow_hyphen_values = true)]
    distance: Option<f64>,
    /// Cruise velocity
    #[clap(long)]
    velocity: Option<f64>,
    /// Acceleration
    #[clap(long)]
    acceleration: Option<f64>,
    /// Deceleration
    #[clap(long)]
    deceleration: Option<f64>,
    /// Standstill after the move [s]
    #[clap(long)]
    dwell: Option<f64>,
    /// Sample interval of the CSV export [s]
    #[clap(long, default_value_t = 0.001)]
    dt: f64,
    /// Write an SVG plot of the profile
    #[clap(long, value_name = "FILE")]
    svg: Option<PathBuf>,
    /// Write profile samples as CSV
    #[clap(long, value_name = "FILE")]
    csv: Option<PathBuf>,
    /// Table format: simple, markdown or html
    #[clap(long, default_value_t = TableFormat::Simple)]
    format: TableFormat,
}

impl Profile {
    /// Configured move with the command line overrides applied
    fn request(&self, config: &StageConfig) -> eyre::Result<MoveRequest> {
        let mut request = match (&self.name, config.moves.first()) {
            (Some(name), _) => MoveRequest::from(config.require_move(name)?),
            (None, _) if self.distance.is_some() => MoveRequest::default(),
            (None, Some(first)) => MoveRequest::from(first),
            (None, None) => bail!("no move configured, pass `--distance`"),
        };

        if let Some(distance) = self.distance {
            request.distance = distance;
        }
        request.velocity = self.velocity.or(request.velocity);
        request.acceleration = self.acceleration.or(request.acceleration);
        request.deceleration = self.deceleration.or(request.deceleration);
        if let Some(dwell) = self.dwell {
            request.dwell = dwell;
        }
        Ok(request)
    }

    fn run(&self, out: &mut impl Write) -> eyre::Result<()> {
        let stage = load_stage(&self.config)?;
        let request = self.request(stage.config())?;
        let plan = stage.plan(&request)?;
        let units = stage.units();
        let profile = &plan.profile;

        writeln!(
            out,
            "move {} {}: {} s, peak velocity {} {}{}",
            format_value(request.distance),
            units.position,
            format_value(profile.duration()),
            format_value(profile.peak_velocity()),
            units.velocity,
            if profile.is_triangular() { " (triangular)" } else { "" }
        )?;
        writeln!(
            out,
            "limits: velocity {} {}, acceleration {} {}, deceleration {} {}",
            format_value(plan.limits.velocity),
            units.velocity,
            format_value(plan.limits.acceleration),
            units.acceleration,
            format_value(plan.limits.deceleration),
            units.acceleration
        )?;
        write!(out, "{}", phases_table(profile).render(self.format)?)?;
        writeln!(out)?;
        write!(out, "{}", thermal_table(&plan.thermal).render(self.format)?)?;
        writeln!(
            out,
            "\n{}",
            status(plan.is_feasible(), "feasible", "exceeds the stage limits")
        )?;

        if let Some(path) = &self.svg {
            let title = format!(
                "{}: {} {}",
                stage.name(),
                format_value(request.distance),
                units.position
            );
            let svg = profile_svg(profile, &units, &title, &PlotOptions::default());
            fs::write(path, svg)
                .wrap_err_with(|| format!("failed to write plot to `{}`", path.display()))?;
            info!("wrote plot to {}", path.display());
        }
        if let Some(path) = &self.csv {
            let file = File::create(path)
                .wrap_err_with(|| format!("failed to create `{}`", path.display()))?;
            let rows = write_samples(BufWriter::new(file), profile, self.dt)
                .wrap_err_with(|| format!("failed to write samples to `{}`", path.display()))?;
            info!("wrote {rows} samples to {}", path.display());
        }
        Ok(())
    }
}

impl Executable for Profile {
    fn execute(self) -> eyre::Result<()> {
        self.run(&mut io::stdout().lock())
    }
}
