use std::path::Path;

use colored::Colorize;

use crate::config::load_config;
use crate::stage::Stage;

pub use check::Check;
pub use export::Export;
pub use limits::Limits;
pub use model::Model;
pub use profile::Profile;

mod check;
mod export;
mod limits;
mod model;
mod profile;

pub trait Executable {
    fn execute(self) -> eyre::Result<()>;
}

#[derive(Debug, clap::Subcommand)]
pub enum Command {
    Check(Check),
    Model(Model),
    Limits(Limits),
    Profile(Profile),
    Export(Export),
}

impl Executable for Command {
    fn execute(self) -> eyre::Result<()> {
        match self {
            Command::Check(args) => args.execute(),
            Command::Model(args) => args.execute(),
            Command::Limits(args) => args.execute(),
            Command::Profile(args) => args.execute(),
            Command::Export(args) => args.execute(),
        }
    }
}

fn load_stage(path: &Path) -> eyre::Result<Stage> {
    Stage::new(load_config(path)?)
}

fn status(ok: bool, good: &str, bad: &str) -> String {
    if ok {
        good.green().to_string()
    } else {
        bad.bold().red().to_string()
    }
}
