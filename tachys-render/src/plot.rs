//! SVG plot of a motion profile
//!
//! Three stacked panels share the time axis: position, velocity and
//! acceleration. Velocity and acceleration are piecewise linear and drawn
//! from the phase corners; position is sampled.

use std::fmt::Write;

use tachys_core::motion::{StageUnits, TrapezoidalProfile};

use crate::sheet::format_value;

const MARGIN_LEFT: f64 = 80.0;
const MARGIN_RIGHT: f64 = 20.0;
const MARGIN_TOP: f64 = 40.0;
const MARGIN_BOTTOM: f64 = 40.0;
const PANEL_GAP: f64 = 30.0;

/// Plot dimensions
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlotOptions {
    /// Total width [px]
    pub width: f64,
    /// Height of one panel [px]
    pub panel_height: f64,
    /// Position samples over the move
    pub samples: usize,
}

impl Default for PlotOptions {
    fn default() -> Self {
        Self {
            width: 800.0,
            panel_height: 180.0,
            samples: 400,
        }
    }
}

struct Panel {
    label: String,
    color: &'static str,
    points: Vec<(f64, f64)>,
}

/// Render the profile as a standalone SVG document
pub fn profile_svg(
    profile: &TrapezoidalProfile,
    units: &StageUnits,
    title: &str,
    options: &PlotOptions,
) -> String {
    let duration = profile.duration();
    let t_end = if duration > 0.0 { duration } else { 1.0 };
    let phases = profile.phases();

    let samples = options.samples.max(2);
    let position = (0..samples)
        .map(|i| duration * i as f64 / (samples - 1) as f64)
        .map(|t| (t, profile.sample(t).position))
        .collect();

    let mut velocity = vec![(0.0, 0.0)];
    let mut acceleration = vec![(0.0, 0.0)];
    for phase in phases.iter().filter(|p| p.duration > 0.0) {
        velocity.push((phase.end(), phase.end_velocity));
        acceleration.push((phase.start, phase.acceleration));
        acceleration.push((phase.end(), phase.acceleration));
    }
    acceleration.push((duration, 0.0));

    let panels = [
        Panel {
            label: format!("position [{}]", units.position),
            color: "#1f77b4",
            points: position,
        },
        Panel {
            label: format!("velocity [{}]", units.velocity),
            color: "#2ca02c",
            points: velocity,
        },
        Panel {
            label: format!("acceleration [{}]", units.acceleration),
            color: "#d62728",
            points: acceleration,
        },
    ];

    let plot_width = options.width - MARGIN_LEFT - MARGIN_RIGHT;
    let height = MARGIN_TOP
        + MARGIN_BOTTOM
        + panels.len() as f64 * options.panel_height
        + (panels.len() - 1) as f64 * PANEL_GAP;
    let map_x = |t: f64| MARGIN_LEFT + t / t_end * plot_width;

    let mut svg = String::new();
    let _ = writeln!(
        svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{height}" viewBox="0 0 {w} {height}" font-family="sans-serif" font-size="12">"#,
        w = options.width,
    );
    let _ = writeln!(svg, r#"<rect width="100%" height="100%" fill="white"/>"#);
    let _ = writeln!(
        svg,
        r#"<text x="{}" y="{}" font-size="16" text-anchor="middle">{}</text>"#,
        options.width / 2.0,
        MARGIN_TOP / 2.0 + 5.0,
        escape(title)
    );

    for (index, panel) in panels.iter().enumerate() {
        let top = MARGIN_TOP + index as f64 * (options.panel_height + PANEL_GAP);
        let bottom = top + options.panel_height;
        let (lo, hi) = value_range(&panel.points);
        let map_y = |v: f64| bottom - (v - lo) / (hi - lo) * options.panel_height;

        let _ = writeln!(
            svg,
            r##"<rect x="{MARGIN_LEFT}" y="{top}" width="{plot_width}" height="{}" fill="none" stroke="#444"/>"##,
            options.panel_height
        );
        if lo < 0.0 && hi > 0.0 {
            let y0 = map_y(0.0);
            let _ = writeln!(
                svg,
                r##"<line x1="{MARGIN_LEFT}" y1="{y0:.2}" x2="{:.2}" y2="{y0:.2}" stroke="#bbb"/>"##,
                MARGIN_LEFT + plot_width
            );
        }
        for phase in phases.iter().filter(|p| p.duration > 0.0 && p.start > 0.0) {
            let x = map_x(phase.start);
            let _ = writeln!(
                svg,
                r##"<line x1="{x:.2}" y1="{top}" x2="{x:.2}" y2="{bottom}" stroke="#999" stroke-dasharray="4 3"/>"##
            );
        }

        let points: Vec<String> = panel
            .points
            .iter()
            .map(|&(t, v)| format!("{:.2},{:.2}", map_x(t), map_y(v)))
            .collect();
        let _ = writeln!(
            svg,
            r#"<polyline fill="none" stroke="{}" stroke-width="2" points="{}"/>"#,
            panel.color,
            points.join(" ")
        );

        let _ = writeln!(
            svg,
            r#"<text x="{}" y="{}" font-weight="bold">{}</text>"#,
            MARGIN_LEFT + 6.0,
            top + 16.0,
            escape(&panel.label)
        );
        for (value, y) in [(hi, top + 4.0), (lo, bottom)] {
            let _ = writeln!(
                svg,
                r#"<text x="{}" y="{y}" text-anchor="end">{}</text>"#,
                MARGIN_LEFT - 6.0,
                format_value(value)
            );
        }
    }

    let axis_y = height - MARGIN_BOTTOM + 18.0;
    let _ = writeln!(
        svg,
        r#"<text x="{MARGIN_LEFT}" y="{axis_y}" text-anchor="middle">0</text>"#
    );
    let _ = writeln!(
        svg,
        r#"<text x="{}" y="{axis_y}" text-anchor="middle">{}</text>"#,
        MARGIN_LEFT + plot_width,
        format_value(duration)
    );
    let _ = writeln!(
        svg,
        r#"<text x="{}" y="{}" text-anchor="middle">time [s]</text>"#,
        MARGIN_LEFT + plot_width / 2.0,
        axis_y + 14.0
    );
    svg.push_str("</svg>\n");
    svg
}

/// Value range including zero, never empty
fn value_range(points: &[(f64, f64)]) -> (f64, f64) {
    let (lo, hi) = points
        .iter()
        .fold((0.0f64, 0.0f64), |(lo, hi), &(_, v)| (lo.min(v), hi.max(v)));
    if hi - lo > 0.0 {
        let pad = 0.05 * (hi - lo);
        (lo - if lo < 0.0 { pad } else { 0.0 }, hi + if hi > 0.0 { pad } else { 0.0 })
    } else {
        (-1.0, 1.0)
    }
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;")
}
