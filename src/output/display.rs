//! Display functions for command results

use colored::Colorize;

use super::formatters::{checked_glyph, status_emoji, utterance};
use crate::commands::{DemoReport, StressResult};

/// Print the walkthrough transcript.
pub fn print_demo_report(report: &DemoReport) {
    println!("\n{}", "─".repeat(60).cyan());
    println!(
        "Scripted session against target {}",
        report.target.to_uppercase().bright_yellow().bold()
    );
    println!("{}", "─".repeat(60).cyan());

    for (i, step) in report.steps.iter().enumerate() {
        println!("\nStep {}: {}", i + 1, step.action.bold());
        if step.announcements.is_empty() {
            println!("  {}", "(nothing announced)".dimmed());
        }
        for announcement in &step.announcements {
            println!("  {} {}", "speaks".green(), utterance(announcement));
        }
        if let Some(focused) = &step.focused {
            println!("  {} {}", "focus →".blue(), focused);
        }
    }

    println!("\n{}", "Final board".bold());
    for (labels, statuses) in report.board_labels.iter().zip(&report.board_statuses) {
        let emoji: String = statuses
            .iter()
            .map(|s| status_emoji(s.as_deref()))
            .collect();
        let spoken: Vec<&str> = labels.iter().map(String::as_str).collect();
        println!("  {}  {}", emoji, spoken.join(" | "));
    }

    println!("\n{}", "Settings".bold());
    for (name, state) in &report.toggles {
        println!("  {} {}", checked_glyph(Some(state)), name);
    }
    println!();
}

/// Print the stress-run statistics.
pub fn print_stress_result(result: &StressResult) {
    println!("\n{}", "═".repeat(60).cyan());
    println!(" Mutation churn results ");
    println!("{}", "═".repeat(60).cyan());

    println!("Rounds:            {}", result.rounds);
    println!("Environment writes: {}", result.env_writes);
    println!("Engine writes:      {}", result.engine_writes);
    println!(
        "Duration:           {:.2}s ({:.0} rounds/s)",
        result.duration.as_secs_f64(),
        result.rounds as f64 / result.duration.as_secs_f64().max(f64::EPSILON)
    );

    if result.label_mismatches == 0 && result.toggle_mismatches == 0 {
        println!("\n{}", "✓ every announced name matches its derivation".green());
    } else {
        println!(
            "\n{} {} tile label(s), {} toggle state(s) diverged",
            "✗".red(),
            result.label_mismatches,
            result.toggle_mismatches
        );
    }
}
