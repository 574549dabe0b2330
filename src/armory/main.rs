use clap::Parser;
use colored::*;
use directories::ProjectDirs;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use armory::api::ArmoryApi;
use armory::commands::config::ConfigAction;
use armory::error::{ArmoryError, Result};
use armory::model::ParameterValues;
use armory::probe::HostProbe;

mod args;
mod menu;
mod render;

use args::{Cli, Commands};

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    if cli.no_color {
        colored::control::set_override(false);
    }

    if let Err(e) = run(cli) {
        eprintln!("{} {}", "Error:".red().bold(), e);
        std::process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let default_filter = if verbose { "armory=debug" } else { "armory=warn" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: Cli) -> Result<()> {
    let config_dir = match &cli.config_dir {
        Some(dir) => dir.clone(),
        None => default_config_dir()?,
    };

    let mut api = ArmoryApi::open(HostProbe::new(), config_dir)?;
    if !api.settings().use_colors {
        colored::control::set_override(false);
    }

    match cli.command {
        Some(Commands::Health) => handle_health(&mut api),
        Some(Commands::List) => handle_list(&mut api),
        Some(Commands::Launch {
            tool,
            params,
            print,
        }) => handle_launch(&mut api, &tool, &params, print),
        Some(Commands::Setup) => handle_setup(&mut api),
        Some(Commands::Config { key, value }) => handle_config(&mut api, key, value),
        Some(Commands::TerminalTest { terminal }) => {
            handle_terminal_test(&api, terminal.as_deref())
        }
        Some(Commands::Cleanup) => handle_cleanup(&api),
        None => menu::run(&mut api),
    }
}

fn default_config_dir() -> Result<PathBuf> {
    let dirs = ProjectDirs::from("com", "armory", "armory")
        .ok_or_else(|| ArmoryError::Config("could not determine config directory".into()))?;
    Ok(dirs.config_dir().to_path_buf())
}

fn handle_health(api: &mut ArmoryApi<HostProbe>) -> Result<()> {
    let result = api.health()?;
    if let Some(report) = &result.health {
        render::print_health(report);
    }
    render::print_messages(&result.messages);
    Ok(())
}

fn handle_list(api: &mut ArmoryApi<HostProbe>) -> Result<()> {
    let result = api.list_tools()?;
    render::print_categories(&result.categories);
    render::print_messages(&result.messages);
    Ok(())
}

fn handle_launch(
    api: &mut ArmoryApi<HostProbe>,
    tool: &str,
    params: &[String],
    print: bool,
) -> Result<()> {
    let values = parse_params(params)?;
    let result = api.plan_launch(tool, &values)?;
    render::print_messages(&result.messages);

    let plan = result
        .plan
        .ok_or_else(|| ArmoryError::Launch("no launch plan produced".into()))?;

    if print {
        println!("{}", plan.rendered);
        return Ok(());
    }

    let launched = api.dispatcher().launch(&plan.tool_name, &plan.rendered)?;
    println!(
        "{}",
        format!(
            "Launched {} in {} (pid {})",
            plan.tool_name, launched.terminal, launched.pid
        )
        .green()
    );
    Ok(())
}

fn handle_setup(api: &mut ArmoryApi<HostProbe>) -> Result<()> {
    let result = api.setup()?;
    render::print_messages(&result.messages);
    Ok(())
}

fn handle_config(
    api: &mut ArmoryApi<HostProbe>,
    key: Option<String>,
    value: Option<String>,
) -> Result<()> {
    let action = match (key, value) {
        (None, _) => ConfigAction::ShowAll,
        (Some(key), None) => ConfigAction::ShowKey(key),
        (Some(key), Some(value)) => ConfigAction::Set(key, value),
    };

    let result = api.config(action)?;
    if let Some(settings) = &result.settings {
        render::print_settings(settings);
    }
    render::print_messages(&result.messages);
    Ok(())
}

fn handle_terminal_test(api: &ArmoryApi<HostProbe>, terminal: Option<&str>) -> Result<()> {
    let launched = api.dispatcher().test_terminal(terminal)?;
    println!(
        "{}",
        format!(
            "Opened a test window in {} (pid {})",
            launched.terminal, launched.pid
        )
        .green()
    );
    Ok(())
}

fn handle_cleanup(api: &ArmoryApi<HostProbe>) -> Result<()> {
    let result = api.cleanup()?;
    render::print_messages(&result.messages);
    Ok(())
}

/// Turn repeated `-p key=value` arguments into parameter values.
fn parse_params(pairs: &[String]) -> Result<ParameterValues> {
    let mut values = ParameterValues::new();
    for pair in pairs {
        let (key, value) = pair
            .split_once('=')
            .ok_or_else(|| ArmoryError::validation(pair, "expected key=value"))?;
        values.insert(key.trim().to_string(), value.to_string());
    }
    Ok(values)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_params_splits_on_first_equals() {
        let values =
            parse_params(&["target=10.0.0.1".into(), "data=a=b&c=d".into()]).unwrap();
        assert_eq!(values.get("target").unwrap(), "10.0.0.1");
        assert_eq!(values.get("data").unwrap(), "a=b&c=d");
    }

    #[test]
    fn parse_params_rejects_missing_equals() {
        assert!(parse_params(&["target".into()]).is_err());
    }
}
