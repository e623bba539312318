//! 导入结果显示：每一行单独一条

use colored::Colorize;

use crate::workflow::{ImportReport, RowOutcome};

pub fn render_import_report(report: &ImportReport) -> String {
    let mut output = String::new();
    for outcome in &report.outcomes {
        let line = match outcome {
            RowOutcome::Inserted { line, title, id } => format!(
                "{} line {:>3}  {}  {}",
                "✓".green(),
                line,
                title,
                format!("({})", id).dimmed()
            ),
            RowOutcome::Skipped { warning } => format!(
                "{} line {:>3}  skipped: {}",
                "⚠".yellow(),
                warning.line(),
                warning
            ),
            RowOutcome::Failed {
                line,
                title,
                reason,
            } => format!("{} line {:>3}  {}  failed: {}", "✗".red(), line, title, reason),
        };
        output.push_str(&line);
        output.push('\n');
    }
    output.push_str(&format!(
        "{} inserted, {} skipped, {} failed\n",
        report.inserted(),
        report.skipped(),
        report.failed()
    ));
    output
}
