//! Terminal output for command-layer results. The only place (besides the
//! menu) that writes to stdout.

use colored::*;

use armory::commands::{CategoryStatus, CmdMessage, HealthReport, HealthStatus, MessageLevel};
use armory::config::Settings;

pub fn print_messages(messages: &[CmdMessage]) {
    for message in messages {
        match message.level {
            MessageLevel::Info => println!("{}", message.content.dimmed()),
            MessageLevel::Success => println!("{}", message.content.green()),
            MessageLevel::Warning => println!("{}", message.content.yellow()),
            MessageLevel::Error => println!("{}", message.content.red()),
        }
    }
}

pub fn print_categories(categories: &[CategoryStatus]) {
    if categories.is_empty() {
        println!("No tools cataloged.");
        return;
    }

    for category in categories {
        println!(
            "\n{} {}",
            category.name.bold().cyan(),
            format!(
                "[{}/{} installed]",
                category.installed_count(),
                category.tools.len()
            )
            .dimmed()
        );
        if !category.description.is_empty() {
            println!("  {}", category.description.dimmed());
        }
        for tool in &category.tools {
            let marker = if tool.installed {
                "✓".green()
            } else {
                "✗".red()
            };
            println!("  {} {:<12} {}", marker, tool.name.bold(), tool.description);
            if let Some(version) = &tool.version {
                println!("      {}", version.dimmed());
            }
            if let Some(path) = &tool.path {
                println!("      {}", path.display().to_string().dimmed());
            }
            if let Some(hint) = &tool.install_hint {
                println!("      {}", format!("install: {}", hint).dimmed());
            }
        }
    }
    println!();
}

pub fn print_health(report: &HealthReport) {
    println!("{}", "System Health".bold());

    let user = if report.is_root {
        format!("{} {}", report.user, "(root)".yellow())
    } else {
        report.user.clone()
    };
    println!("  user:      {}", user);

    println!(
        "  tools:     {}/{} installed ({:.0}%)",
        report.installed_tools,
        report.total_tools,
        report.coverage_percent()
    );

    if report.has_terminal() {
        println!("  terminals: {}", report.terminals.join(", "));
    } else {
        println!("  terminals: {}", "none found".red());
    }

    match report.status {
        HealthStatus::Healthy => println!("  status:    {}", "healthy".green()),
        HealthStatus::NeedsAttention => {
            println!("  status:    {}", "needs attention".yellow())
        }
    }

    if !report.missing.is_empty() {
        println!("\n{}", "Missing tools".bold());
        for tool in &report.missing {
            println!(
                "  {} ({}) {}",
                tool.name,
                tool.category,
                format!("- {}", tool.install_hint).dimmed()
            );
        }
    }
    println!();
}

pub fn print_settings(settings: &Settings) {
    for key in Settings::keys() {
        if let Some(value) = settings.get(key) {
            println!("{} = {}", key, value);
        }
    }
}
