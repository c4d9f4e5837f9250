//! Output formatting for the pathfinder CLI (table, json)

use clap::ValueEnum;
use colored::Colorize;
use pathfinder_core::{Diagnostic, Diagnostics, Step};
use serde::{Deserialize, Serialize};
use tabled::{Table, Tabled};

/// Output format options
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// ASCII table format (default)
    #[default]
    Table,
    /// JSON format
    Json,
}

/// Context for output rendering
pub struct OutputContext {
    pub format: OutputFormat,
    pub quiet: bool,
}

impl OutputContext {
    pub fn new(format: OutputFormat, no_color: bool, quiet: bool) -> Self {
        if no_color {
            colored::control::set_override(false);
        }
        Self { format, quiet }
    }

    /// Print a success message (unless in quiet mode)
    pub fn success(&self, msg: &str) {
        if !self.quiet {
            eprintln!("{}", msg.green());
        }
    }

    /// Print an info message (unless in quiet mode)
    pub fn info(&self, msg: &str) {
        if !self.quiet {
            eprintln!("{}", msg);
        }
    }

    /// Print data in the configured format
    pub fn print<T: Tabled + Serialize>(&self, data: &[T]) {
        match self.format {
            OutputFormat::Table => {
                if data.is_empty() {
                    if !self.quiet {
                        println!("No data");
                    }
                } else {
                    println!("{}", Table::new(data));
                }
            }
            OutputFormat::Json => {
                println!(
                    "{}",
                    serde_json::to_string_pretty(data).unwrap_or_else(|_| "[]".to_string())
                );
            }
        }
    }

    /// Print key-value pairs, or `value` itself as JSON
    pub fn print_kv<T: Serialize>(&self, pairs: &[(&str, String)], value: &T) {
        match self.format {
            OutputFormat::Table => {
                for (key, value) in pairs {
                    println!("{}: {}", key.bold(), value);
                }
            }
            OutputFormat::Json => {
                println!(
                    "{}",
                    serde_json::to_string_pretty(value).unwrap_or_else(|_| "{}".to_string())
                );
            }
        }
    }

    /// Print diagnostics to stderr in the order they were raised
    pub fn diagnostics(&self, diagnostics: &Diagnostics) {
        if diagnostics.is_empty() {
            return;
        }
        match self.format {
            OutputFormat::Table => {
                for diagnostic in diagnostics {
                    eprintln!("{}", render_diagnostic(diagnostic));
                }
            }
            OutputFormat::Json => {
                eprintln!(
                    "{}",
                    serde_json::to_string_pretty(diagnostics).unwrap_or_else(|_| "[]".to_string())
                );
            }
        }
    }
}

fn render_diagnostic(diagnostic: &Diagnostic) -> String {
    let mut header = format!("Error: {}", diagnostic.summary);
    if let Some(attribute) = &diagnostic.attribute {
        header.push_str(&format!(" ({})", attribute));
    }
    let detail = diagnostic
        .detail
        .lines()
        .map(|line| format!("  {}", line))
        .collect::<Vec<_>>()
        .join("\n");
    format!("{} [{}]\n{}", header.red().bold(), diagnostic.kind, detail)
}

/// Format a boolean for table output
pub fn yes_no(value: bool) -> String {
    if value { "yes" } else { "no" }.to_string()
}

// =============================================================================
// Display types for various commands
// =============================================================================

/// Network display for the wifi command
#[derive(Debug, Tabled, Serialize)]
pub struct WifiRow {
    #[tabled(rename = "SSID")]
    pub ssid: String,
    #[tabled(rename = "RSSI (dBm)")]
    pub rssi: f64,
    #[tabled(rename = "Encrypted")]
    pub encrypted: String,
}

/// Step display for plan, apply and refresh
#[derive(Debug, Tabled, Serialize)]
pub struct StepRow {
    #[tabled(rename = "#")]
    pub index: usize,
    #[tabled(rename = "Angle")]
    pub angle: i64,
    #[tabled(rename = "Direction")]
    pub direction: String,
    #[tabled(rename = "Distance")]
    pub distance: f64,
}

impl StepRow {
    pub fn rows(steps: &[Step]) -> Vec<Self> {
        steps
            .iter()
            .enumerate()
            .map(|(index, step)| StepRow {
                index,
                angle: step.angle,
                direction: step.direction.clone(),
                distance: step.distance,
            })
            .collect()
    }
}
