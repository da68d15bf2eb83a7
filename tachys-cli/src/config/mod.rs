//! Stage description file loading
//!
//! The file is TOML. Every validation problem is reported at once in a
//! single boxed message.

use std::fs;
use std::path::Path;

use eyre::{bail, Context};
use tachys_core::config::{ConfigError, StageConfig};
use tracing::{debug, info};

/// Text width inside the error box
const BOX_WIDTH: usize = 64;

/// Parse and validate a stage description
pub fn parse_config(text: &str) -> eyre::Result<StageConfig> {
    let config: StageConfig = toml::from_str(text).wrap_err("invalid stage description")?;
    if let Err(errors) = config.validate() {
        bail!("{}", format_errors(&config.name, &errors));
    }
    Ok(config)
}

/// Read, parse and validate a stage description file
pub fn load_config(path: &Path) -> eyre::Result<StageConfig> {
    let text = fs::read_to_string(path)
        .wrap_err_with(|| format!("failed to read `{}`", path.display()))?;
    debug!("read {} bytes from {}", text.len(), path.display());

    let config =
        parse_config(&text).wrap_err_with(|| format!("failed to load `{}`", path.display()))?;
    info!(
        "loaded stage `{}`: {} motor parameters, {} moves",
        config.name,
        config.motor.params.len(),
        config.moves.len()
    );
    Ok(config)
}

/// Box drawn list of validation errors
pub fn format_errors(stage: &str, errors: &[ConfigError]) -> String {
    let rule = "═".repeat(BOX_WIDTH + 2);
    let plural = if errors.len() == 1 { "" } else { "s" };
    let title = format!("ERROR: {} problem{plural} in stage `{stage}`", errors.len());

    let mut lines = vec![
        format!("╔{rule}╗"),
        format!("║ {} ║", fit(&title, BOX_WIDTH)),
        format!("╠{rule}╣"),
    ];
    lines.extend(
        errors
            .iter()
            .map(|e| format!("║ • {} ║", fit(&e.to_string(), BOX_WIDTH - 2))),
    );
    lines.push(format!("╚{rule}╝"));
    lines.join("\n")
}

/// Pad or truncate to exactly `width` characters
fn fit(text: &str, width: usize) -> String {
    if text.chars().count() > width {
        let truncated: String = text.chars().take(width - 3).collect();
        format!("{truncated}...")
    } else {
        format!("{text:<width$}")
    }
}
