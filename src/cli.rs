//! CLI command definitions and output rendering

use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::PathBuf;

use crate::domain::PlanSet;
use crate::events::HostEvent;
use crate::host::AppliedSignal;

/// archost - keep an arc's suggested plans fresh
#[derive(Parser)]
#[command(
    name = "archost",
    about = "Debounced single-flight replanning for live arc sessions",
    version,
    after_help = "Logs are written to: ~/.local/share/archost/logs/archost.log"
)]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true, help = "Path to config file")]
    pub config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands
#[derive(Subcommand)]
pub enum Command {
    /// Open an arc, plan once and print the suggestions
    Plan {
        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,
    },

    /// Plan, apply one suggestion and print the replanned suggestions
    Apply {
        /// Plan id, recipe name or a fragment of either
        #[arg(value_name = "NAME")]
        name: String,

        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,
    },

    /// Keep the arc open, reload on manifest changes and print every event
    Watch {
        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,
    },
}

/// Output format for command results
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" | "plain" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            _ => Err(format!("Unknown format: {}. Use: text or json", s)),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Text => write!(f, "text"),
            Self::Json => write!(f, "json"),
        }
    }
}

/// Render a plan set for the terminal
pub fn render_plans(session_id: &str, plans: &PlanSet) -> String {
    let mut out = format!("{} {}\n", "Suggestions for".bold(), session_id.cyan());
    if plans.is_empty() {
        out.push_str(&format!("  {}\n", "(no plans)".dimmed()));
        return out;
    }
    for plan in plans {
        out.push_str(&format!("  {} {}", plan.id.green(), plan.name));
        if !plan.description.is_empty() {
            out.push_str(&format!(" - {}", plan.description.dimmed()));
        }
        out.push('\n');
        if !plan.particles.is_empty() {
            out.push_str(&format!("      particles: {}\n", plan.particles.join(", ")));
        }
    }
    out
}

/// Render an applied-plan signal for the terminal
pub fn render_applied(signal: &AppliedSignal) -> String {
    format!(
        "{} {} (settled {}ms at {})\n",
        "Applied".green().bold(),
        signal.plan.name,
        signal.settle_delay.as_millis(),
        signal.applied_at.format("%H:%M:%S%.3f")
    )
}

/// Render one host event as a single line
pub fn render_event(event: &HostEvent) -> String {
    match event {
        HostEvent::PlansCleared { session_id } => {
            format!("{} {}", "plans-cleared".yellow(), session_id)
        }
        HostEvent::PlansReady { session_id, plans } => {
            format!("{} {} [{}]", "plans-ready".green(), session_id, plans.names().join(", "))
        }
        HostEvent::PlanApplied { session_id, plan } => {
            format!("{} {} {}", "plan-applied".cyan(), session_id, plan.name)
        }
    }
}
