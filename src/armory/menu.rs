//! Interactive two-level menu: categories, then tools, then a guided
//! parameter prompt ending in a launch. Reads stdin line by line; EOF
//! anywhere exits cleanly.

use colored::*;
use std::io::{self, BufRead, Write};

use armory::api::ArmoryApi;
use armory::commands::CategoryStatus;
use armory::error::{ArmoryError, Result};
use armory::inventory::ToolStatus;
use armory::model::{ParamKind, ParameterValues, ToolSpec};
use armory::probe::HostProbe;

use crate::render;

pub fn run(api: &mut ArmoryApi<HostProbe>) -> Result<()> {
    let stdin = io::stdin();
    let mut input = stdin.lock();

    println!(
        "{} {}",
        "armory".bold().cyan(),
        format!("v{}", env!("CARGO_PKG_VERSION")).dimmed()
    );
    println!("{}", "security tool launcher".dimmed());

    loop {
        let categories = api.list_tools()?.categories;
        print_main_menu(&categories);

        let Some(choice) = prompt(&mut input, "\narmory> ")? else {
            return Ok(());
        };
        match choice.as_str() {
            "" => {}
            "q" | "quit" | "exit" => return Ok(()),
            "s" => {
                let result = api.health()?;
                if let Some(report) = &result.health {
                    render::print_health(report);
                }
                render::print_messages(&result.messages);
            }
            "h" | "?" => print_help(),
            other => match parse_selection(other, categories.len()) {
                Some(n) => {
                    let category_id = categories[n - 1].id.clone();
                    if category_menu(api, &mut input, &category_id)? {
                        return Ok(());
                    }
                }
                None => println!("{}", "Invalid selection.".red()),
            },
        }
    }
}

/// Returns true when the user asked to quit the whole program.
fn category_menu(
    api: &mut ArmoryApi<HostProbe>,
    input: &mut impl BufRead,
    category_id: &str,
) -> Result<bool> {
    loop {
        let categories = api.list_tools()?.categories;
        let Some(category) = categories.iter().find(|c| c.id == category_id) else {
            return Ok(false);
        };

        println!("\n{}", category.name.bold().cyan());
        if !category.description.is_empty() {
            println!("{}", category.description.dimmed());
        }
        for (i, tool) in category.tools.iter().enumerate() {
            let marker = if tool.installed {
                "✓".green()
            } else {
                "✗".red()
            };
            let version = tool
                .version
                .as_deref()
                .map(|v| format!("  {}", v).dimmed().to_string())
                .unwrap_or_default();
            println!("  {}) {} {}{}", i + 1, marker, tool.name.bold(), version);
        }
        println!("  {}", "b) back   r) refresh   q) quit".dimmed());

        let Some(choice) = prompt(input, &format!("{}> ", category.id))? else {
            return Ok(true);
        };
        match choice.as_str() {
            "" => {}
            "b" | "back" => return Ok(false),
            "q" | "quit" | "exit" => return Ok(true),
            "r" => {
                api.refresh(None);
                println!("{}", "Tool status refreshed.".dimmed());
            }
            other => match parse_selection(other, category.tools.len()) {
                Some(n) => {
                    let tool = category.tools[n - 1].clone();
                    launch_flow(api, input, &tool)?;
                }
                None => println!("{}", "Invalid selection.".red()),
            },
        }
    }
}

fn launch_flow(
    api: &mut ArmoryApi<HostProbe>,
    input: &mut impl BufRead,
    status: &ToolStatus,
) -> Result<()> {
    if !status.installed {
        println!("{} is not installed.", status.name.red());
        if let Some(hint) = &status.install_hint {
            println!("  {}", format!("install: {}", hint).dimmed());
        }
        return Ok(());
    }

    let Some(tool) = api.catalog().find_tool(&status.tool_id) else {
        return Ok(());
    };
    let tool_id = tool.tool_id.to_string();
    let spec = tool.spec.clone();

    println!("\n{} - {}", spec.name.bold(), spec.description);
    if !spec.examples.is_empty() {
        for example in &spec.examples {
            println!("  {}", format!("e.g. {}", example).dimmed());
        }
    }

    let Some(values) = collect_parameters(&spec, input)? else {
        return Ok(());
    };

    let result = match api.plan_launch(&tool_id, &values) {
        Ok(result) => result,
        Err(e) => {
            println!("{}", e.to_string().red());
            return Ok(());
        }
    };
    render::print_messages(&result.messages);
    let Some(plan) = result.plan else {
        return Ok(());
    };

    println!("\ncommand: {}", plan.rendered.bold());
    let Some(answer) = prompt(input, "launch? [Y/n] ")? else {
        return Ok(());
    };
    if matches!(answer.to_lowercase().as_str(), "n" | "no") {
        println!("{}", "Aborted.".dimmed());
        return Ok(());
    }

    match api.dispatcher().launch(&plan.tool_name, &plan.rendered) {
        Ok(launched) => println!(
            "{}",
            format!(
                "Launched {} in {} (pid {})",
                plan.tool_name, launched.terminal, launched.pid
            )
            .green()
        ),
        Err(e) => println!("{}", e.to_string().red()),
    }
    Ok(())
}

/// Prompt for each parameter in declaration order. Empty input falls through
/// to the default (or skips an optional parameter); bad input re-prompts.
/// Returns None on EOF.
fn collect_parameters(
    spec: &ToolSpec,
    input: &mut impl BufRead,
) -> Result<Option<ParameterValues>> {
    let mut values = ParameterValues::new();
    for (name, param) in &spec.parameters {
        loop {
            let mut hints = Vec::new();
            if !param.description.is_empty() {
                hints.push(param.description.clone());
            }
            match param.kind {
                ParamKind::Choice => hints.push(param.choices.join("/")),
                ParamKind::Boolean => hints.push("true/false".to_string()),
                ParamKind::Input => {}
            }
            if let Some(default) = &param.default {
                hints.push(format!("default: {}", default));
            } else if param.required {
                hints.push("required".to_string());
            }

            let label = format!("  {} {}: ", name, format!("({})", hints.join(", ")).dimmed());
            let Some(raw) = prompt(input, &label)? else {
                return Ok(None);
            };

            if raw.is_empty() {
                if param.required && param.default.is_none() {
                    println!("    {}", "this parameter is required".red());
                    continue;
                }
                break;
            }

            // Validate here so mistakes re-prompt instead of failing the
            // whole launch afterwards.
            let valid = match param.kind {
                ParamKind::Choice => param.choices.iter().any(|c| c == &raw),
                ParamKind::Boolean => matches!(
                    raw.to_lowercase().as_str(),
                    "true" | "yes" | "1" | "false" | "no" | "0"
                ),
                ParamKind::Input => true,
            };
            if !valid {
                match param.kind {
                    ParamKind::Choice => println!(
                        "    {}",
                        format!("must be one of: {}", param.choices.join(", ")).red()
                    ),
                    _ => println!("    {}", "enter true or false".red()),
                }
                continue;
            }

            values.insert(name.clone(), raw);
            break;
        }
    }
    Ok(Some(values))
}

fn print_main_menu(categories: &[CategoryStatus]) {
    println!("\n{}", "Categories".bold());
    for (i, category) in categories.iter().enumerate() {
        println!(
            "  {}) {} {}",
            i + 1,
            category.name,
            format!("[{}/{}]", category.installed_count(), category.tools.len()).dimmed()
        );
    }
    println!("  {}", "s) system health   h) help   q) quit".dimmed());
}

fn print_help() {
    println!("\n{}", "Help".bold());
    println!("  Pick a category by number, then a tool by number.");
    println!("  Each tool asks for its parameters; press Enter to accept a default.");
    println!("  Tools open in a new terminal window and keep running after armory exits.");
    println!("  s - system health check");
    println!("  r - re-probe installed tools (inside a category)");
    println!("  b - back, q - quit");
}

fn parse_selection(choice: &str, len: usize) -> Option<usize> {
    match choice.parse::<usize>() {
        Ok(n) if (1..=len).contains(&n) => Some(n),
        _ => None,
    }
}

/// Print a prompt and read one trimmed line. None means EOF.
fn prompt(input: &mut impl BufRead, text: &str) -> Result<Option<String>> {
    print!("{}", text);
    io::stdout().flush().map_err(ArmoryError::Io)?;

    let mut line = String::new();
    let read = input.read_line(&mut line).map_err(ArmoryError::Io)?;
    if read == 0 {
        println!();
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use armory::model::ParameterSpec;

    fn spec(params: &[(&str, ParameterSpec)]) -> ToolSpec {
        ToolSpec {
            name: "nmap".into(),
            description: "scanner".into(),
            command: "nmap".into(),
            parameters: params
                .iter()
                .map(|(k, v)| (k.to_string(), v.clone()))
                .collect(),
            command_template: "nmap {target}".into(),
            examples: vec![],
        }
    }

    #[test]
    fn collect_parameters_reads_in_declaration_order() {
        let spec = spec(&[
            ("target", ParameterSpec::input("Target").required()),
            ("ports", ParameterSpec::input("Ports").with_default("1-1000")),
        ]);
        let mut input = "10.0.0.1\n\n".as_bytes();
        let values = collect_parameters(&spec, &mut input).unwrap().unwrap();
        assert_eq!(values.get("target").unwrap(), "10.0.0.1");
        // Empty input skips; the default is applied downstream.
        assert!(values.get("ports").is_none());
    }

    #[test]
    fn collect_parameters_reprompts_on_missing_required() {
        let spec = spec(&[("target", ParameterSpec::input("Target").required())]);
        let mut input = "\n\n10.0.0.1\n".as_bytes();
        let values = collect_parameters(&spec, &mut input).unwrap().unwrap();
        assert_eq!(values.get("target").unwrap(), "10.0.0.1");
    }

    #[test]
    fn collect_parameters_reprompts_on_bad_choice() {
        let spec = spec(&[("mode", ParameterSpec::choice("Mode", &["dir", "dns"]))]);
        let mut input = "fuzz\ndns\n".as_bytes();
        let values = collect_parameters(&spec, &mut input).unwrap().unwrap();
        assert_eq!(values.get("mode").unwrap(), "dns");
    }

    #[test]
    fn collect_parameters_returns_none_on_eof() {
        let spec = spec(&[("target", ParameterSpec::input("Target").required())]);
        let mut input = "".as_bytes();
        assert!(collect_parameters(&spec, &mut input).unwrap().is_none());
    }

    #[test]
    fn selection_parsing_rejects_out_of_range() {
        assert_eq!(parse_selection("2", 3), Some(2));
        assert_eq!(parse_selection("0", 3), None);
        assert_eq!(parse_selection("4", 3), None);
        assert_eq!(parse_selection("x", 3), None);
    }
}
