use std::io::IsTerminal;

use anstyle::{AnsiColor, Effects, Style};

use optpkg_installer::{FileOperation, TaskReport, TaskSummary};

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum OutputStyle {
    Plain,
    Rich,
}

pub fn current_output_style() -> OutputStyle {
    if std::env::var_os("NO_COLOR").is_none() && std::io::stdout().is_terminal() {
        OutputStyle::Rich
    } else {
        OutputStyle::Plain
    }
}

#[derive(Copy, Clone, Debug)]
pub struct TerminalRenderer {
    style: OutputStyle,
}

impl TerminalRenderer {
    pub fn current() -> Self {
        Self {
            style: current_output_style(),
        }
    }

    pub fn print_summary(&self, summary: &TaskSummary) {
        for line in summary_lines(summary, self.style) {
            println!("{line}");
        }
    }

    pub fn print_preview(&self, operations: &[FileOperation]) {
        for line in preview_lines(operations, self.style) {
            println!("{line}");
        }
    }

    pub fn print_report(&self, report: &TaskReport) {
        for line in report_lines(report, self.style) {
            println!("{line}");
        }
    }

    pub fn print_status(&self, status: &str, message: &str) {
        let prefix = match self.style {
            OutputStyle::Plain => status.to_string(),
            OutputStyle::Rich => colorize(action_style(), status),
        };
        println!("{prefix}: {message}");
    }
}

fn action_style() -> Style {
    Style::new()
        .fg_color(Some(AnsiColor::BrightBlue.into()))
        .effects(Effects::BOLD)
}

fn warn_style() -> Style {
    Style::new().fg_color(Some(AnsiColor::Yellow.into()))
}

fn overwrite_style() -> Style {
    Style::new().fg_color(Some(AnsiColor::BrightRed.into()))
}

fn colorize(style: Style, text: &str) -> String {
    format!("{}{}{}", style.render(), text, style.render_reset())
}

pub fn summary_lines(summary: &TaskSummary, style: OutputStyle) -> Vec<String> {
    let header = format!("{}: {}", summary.action, summary.name);
    let mut lines = vec![match style {
        OutputStyle::Plain => header,
        OutputStyle::Rich => colorize(action_style(), &header),
    }];
    for (key, value) in &summary.details {
        lines.push(format!("  {key}: {value}"));
    }
    lines
}

/// One line per planned operation. A deletion is encoded as an operation
/// whose source equals its destination.
pub fn preview_lines(operations: &[FileOperation], style: OutputStyle) -> Vec<String> {
    if operations.is_empty() {
        return vec!["No planned changes".to_string()];
    }

    operations
        .iter()
        .map(|op| {
            if op.source == op.dest {
                return format!("  delete {}", op.dest.display());
            }
            let verb = if op.alias_like { "link" } else { "copy" };
            let mut line = format!("  {verb} {} -> {}", op.source.display(), op.dest.display());
            if op.replaces_existing() {
                let marker = match style {
                    OutputStyle::Plain => " (replaces existing)".to_string(),
                    OutputStyle::Rich => colorize(overwrite_style(), " (replaces existing)"),
                };
                line.push_str(&marker);
            }
            line
        })
        .collect()
}

pub fn report_lines(report: &TaskReport, style: OutputStyle) -> Vec<String> {
    let mut lines = Vec::new();
    for path in &report.created {
        lines.push(format!("created {}", path.display()));
    }
    for path in &report.deleted {
        lines.push(format!("deleted {}", path.display()));
    }
    for warning in &report.warnings {
        let line = format!("warning: {warning}");
        lines.push(match style {
            OutputStyle::Plain => line,
            OutputStyle::Rich => colorize(warn_style(), &line),
        });
    }
    if lines.is_empty() {
        lines.push("No files were changed".to_string());
    }
    lines
}
