use std::fmt;

use colored::Colorize;

use crate::wizard::ValidationReport;

#[derive(Clone, Copy, PartialEq, Eq)]
enum Style {
    Header,
    Info,
    Success,
    Warning,
    Error,
}

/// Colored terminal output for the wizard and the subcommands.
pub struct Formatter {
    colors: bool,
}

impl Formatter {
    pub fn new() -> Self {
        Self {
            colors: std::env::var_os("NO_COLOR").is_none(),
        }
    }

    pub fn plain() -> Self {
        Self { colors: false }
    }

    pub fn print_header(&self, title: impl fmt::Display) {
        println!("\n{}", self.header_text(title));
    }

    pub fn header_text(&self, title: impl fmt::Display) -> String {
        self.apply_style(Style::Header, title)
    }

    pub fn print_info(&self, message: impl fmt::Display) {
        println!("{}", self.apply_style(Style::Info, message));
    }

    pub fn print_success(&self, message: impl fmt::Display) {
        println!("{}", self.apply_style(Style::Success, message));
    }

    pub fn print_warning(&self, message: impl fmt::Display) {
        println!("{}", self.apply_style(Style::Warning, message));
    }

    pub fn print_error(&self, message: impl fmt::Display) {
        eprintln!("{}", self.apply_style(Style::Error, message));
    }

    /// One line per validation message, plus the offending field keys.
    pub fn report_lines(&self, report: &ValidationReport) -> Vec<String> {
        let mut lines: Vec<String> = report
            .errors
            .iter()
            .map(|message| self.apply_style(Style::Error, message))
            .collect();
        if !report.invalid_fields.is_empty() {
            let fields = report
                .invalid_fields
                .iter()
                .map(|field| field.to_string())
                .collect::<Vec<_>>()
                .join(", ");
            lines.push(self.apply_style(Style::Info, format!("Fields: {}", fields)));
        }
        lines
    }

    pub fn print_report(&self, report: &ValidationReport) {
        for line in self.report_lines(report) {
            println!("{}", line);
        }
    }

    fn apply_style(&self, style: Style, message: impl fmt::Display) -> String {
        let text = match style {
            Style::Header => format!("=== {} ===", message),
            Style::Success => format!("✔ {}", message),
            Style::Warning => format!("⚠ {}", message),
            Style::Error => format!("✖ {}", message),
            Style::Info => message.to_string(),
        };
        if !self.colors {
            return text;
        }
        match style {
            Style::Header => text.bold().cyan().to_string(),
            Style::Success => text.green().to_string(),
            Style::Warning => text.yellow().to_string(),
            Style::Error => text.red().to_string(),
            Style::Info => text,
        }
    }
}

impl Default for Formatter {
    fn default() -> Self {
        Self::new()
    }
}
