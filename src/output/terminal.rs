//! Terminal output formatting with colors and box drawing.

use colored::Colorize;

use crate::inference::InferenceOutcome;
use crate::types::Param;

/// Minimum inner width of the summary box, in columns.
const MIN_WIDTH: usize = 56;

/// One row of a rendered summary box.
enum Row {
    Text(String),
    Rule,
}

/// Format an inference outcome for human-readable terminal output.
///
/// Shows the posterior mean of each seabed parameter with a 95% credible
/// half-width, the convergence status, and the dataset size.
pub fn format_posterior(outcome: &InferenceOutcome, observations: usize) -> String {
    let header = if outcome.is_converged() {
        format!("{} {}", "\u{2713}".green().bold(), "CONVERGED".green().bold())
    } else {
        format!("{} {}", "\u{26A0}".yellow().bold(), "DEGRADED".yellow().bold())
    };

    let mut rows = vec![Row::Text(header), Row::Rule];

    let posterior = outcome.posterior();
    let mean = posterior.mean();
    for param in [Param::DensityRatio, Param::SpeedRatio, Param::Attenuation] {
        let i = param.index();
        let half_width = 1.96 * posterior.std_dev(param);
        rows.push(Row::Text(format!(
            "{:<14} {:>10.5} \u{00B1} {:.5}",
            param.label(),
            mean[i],
            half_width
        )));
    }

    rows.push(Row::Rule);
    rows.push(Row::Text(format!("Observations: {observations}")));
    if let Some(diagnostic) = outcome.diagnostic() {
        rows.push(Row::Text(
            format!("Warning: {diagnostic}").yellow().to_string(),
        ));
    }

    render_box(&rows)
}

/// Draw rows inside a box sized to the widest visible line.
fn render_box(rows: &[Row]) -> String {
    let inner = rows
        .iter()
        .map(|row| match row {
            Row::Text(line) => visible_width(line) + 2,
            Row::Rule => 0,
        })
        .max()
        .unwrap_or(0)
        .max(MIN_WIDTH);
    let rule = "\u{2500}".repeat(inner);

    let mut output = format!("\u{250C}{rule}\u{2510}\n");
    for row in rows {
        match row {
            Row::Text(line) => {
                let padding = " ".repeat(inner - 2 - visible_width(line));
                output.push_str(&format!("\u{2502} {line}{padding} \u{2502}\n"));
            }
            Row::Rule => output.push_str(&format!("\u{251C}{rule}\u{2524}\n")),
        }
    }
    output.push_str(&format!("\u{2514}{rule}\u{2518}\n"));
    output
}

/// Number of printable columns, skipping ANSI CSI sequences.
///
/// A CSI sequence is `ESC [`, parameter and intermediate bytes, then one
/// final byte in `0x40..=0x7e`.
fn visible_width(s: &str) -> usize {
    enum Scan {
        Text,
        Escape,
        Csi,
    }

    let mut width = 0;
    let mut state = Scan::Text;
    for ch in s.chars() {
        state = match state {
            Scan::Text if ch == '\u{1b}' => Scan::Escape,
            Scan::Text => {
                width += 1;
                Scan::Text
            }
            Scan::Escape if ch == '[' => Scan::Csi,
            // Lone escape followed by anything else: drop both.
            Scan::Escape => Scan::Text,
            Scan::Csi if ('\u{40}'..='\u{7e}').contains(&ch) => Scan::Text,
            Scan::Csi => Scan::Csi,
        };
    }
    width
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inference::GaussianPosterior;
    use crate::types::{Matrix3, Vector3};

    fn outcome() -> InferenceOutcome {
        let mean = Vector3::new(1.5, 1.2, 0.001);
        let covariance = Matrix3::from_diagonal(&Vector3::new(1e-4, 1e-4, 1e-8));
        InferenceOutcome::Converged(GaussianPosterior::new(mean, covariance).unwrap())
    }

    #[test]
    fn formatted_output_names_every_parameter() {
        let text = format_posterior(&outcome(), 210);
        assert!(text.contains("density ratio"));
        assert!(text.contains("speed ratio"));
        assert!(text.contains("attenuation"));
        assert!(text.contains("210"));
    }

    #[test]
    fn degraded_outcome_carries_its_warning() {
        let degraded = InferenceOutcome::Degraded {
            posterior: outcome().into_posterior(),
            diagnostic: "acceptance rate 0.010 outside healthy range".to_string(),
        };
        let text = format_posterior(&degraded, 12);
        assert!(text.contains("DEGRADED"));
        assert!(text.contains("acceptance rate"));
    }

    #[test]
    fn box_edges_align_despite_color_codes() {
        let text = format_posterior(&outcome(), 210);
        let widths: Vec<usize> = text.lines().map(visible_width).collect();
        assert!(!widths.is_empty());
        assert!(widths.iter().all(|&w| w == widths[0]));
    }

    #[test]
    fn visible_width_skips_csi_sequences() {
        assert_eq!(visible_width("\u{1b}[32mgreen\u{1b}[0m"), 5);
        assert_eq!(visible_width("\u{1b}[1;33mwarn\u{1b}[0m ok"), 7);
        assert_eq!(visible_width("plain"), 5);
    }
}
