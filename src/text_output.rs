//! Human-readable report
//!
//! Table layout follows the strace-style summary: fixed-width numeric
//! columns, then the component path last so long paths don't break the grid.

use crate::pipeline::AnalysisReport;

const RULE: &str = "--------- ---------- ----------- ----------- ---------- ------------------";

/// Render the full report as text
pub fn render(report: &AnalysisReport) -> String {
    let mut output = String::new();

    if report.components.is_empty() && report.unfittable.is_empty() {
        output.push_str("No components analysed.\n");
    } else {
        output.push_str(&components_table(report));
    }

    if !report.unfittable.is_empty() {
        output.push_str(&format!(
            "\nUnfittable components ({}):\n",
            report.unfittable.len()
        ));
        for component in &report.unfittable {
            output.push_str(&format!("  {}\n", component));
        }
    }

    if !report.missing_instances.is_empty() {
        output.push_str(&format!(
            "\nInstances without properties ({}): {}\n",
            report.missing_instances.len(),
            report.missing_instances.join(", ")
        ));
    }

    if !report.failures.is_empty() {
        output.push_str(&format!("\nFailed traces ({}):\n", report.failures.len()));
        for failure in &report.failures {
            match &failure.instance_id {
                Some(id) => output.push_str(&format!(
                    "  {} [{}]: {}\n",
                    failure.source, id, failure.reason
                )),
                None => output.push_str(&format!("  {}: {}\n", failure.source, failure.reason)),
            }
        }
    }

    output.push_str(&format!(
        "\n{} instances, {} components fitted, {} unfittable, {} failed traces\n",
        report.instances_analyzed,
        report.components.len(),
        report.unfittable.len(),
        report.failures.len()
    ));
    output
}

fn components_table(report: &AnalysisReport) -> String {
    let mut output = String::new();
    output.push_str("       R2   mean(ms)  stddev(ms)  median(ms)   property component / complexity\n");
    output.push_str(RULE);
    output.push('\n');

    for analysis in &report.components {
        let best = analysis.best();
        let summary = report.summaries.get(&analysis.component);
        output.push_str(&format!(
            "{:>9.4} {:>10.3} {:>11.3} {:>11.3} {:>10} {}\n",
            best.r_squared,
            summary.map_or(0.0, |s| s.mean),
            summary.map_or(0.0, |s| s.stddev),
            summary.map_or(0.0, |s| s.median),
            analysis.property,
            analysis.component
        ));
        output.push_str(&format!("{:>56}{}\n", "", best.label()));

        for runner_up in analysis.fits.iter().skip(1) {
            output.push_str(&format!(
                "{:>56}  {} (R2 {:.4})\n",
                "",
                runner_up.label(),
                runner_up.r_squared
            ));
        }
    }

    output.push_str(RULE);
    output.push('\n');
    output
}
