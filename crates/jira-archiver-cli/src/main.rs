use std::fs;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{ArgAction, ColorChoice, Parser, Subcommand};
use console::style;
use dialoguer::{Confirm, Input, Password};
use jira_archiver_core::{
    ArchiveAction, ArchiveOutcome, Archiver, JiraClient, RunReport, Settings, SlackNotifier,
};
use tracing::level_filters::LevelFilter;
use tracing::warn;

/// Archive Jira projects that have seen no activity for a while.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true, args_conflicts_with_subcommands = true)]
struct Cli {
    /// Set the verbosity level. Use -v for debug, -vv for trace.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Control when to use color output.
    #[arg(long, value_name = "WHEN", global = true, default_value_t = ColorChoice::Auto)]
    color: ColorChoice,

    /// Archive projects inactive for at least this many days [default: 180, or the configured value].
    #[arg(long, value_name = "DAYS")]
    days: Option<u64>,

    /// Report what would be archived without archiving anything.
    #[arg(long)]
    dry_run: bool,

    /// Do not post the run summary to Slack.
    #[arg(long)]
    no_notify: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Initializes the configuration file interactively.
    Init,
    /// Show the configuration path and Jira URL being used.
    Paths,
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.color);

    match cli.command {
        Some(Commands::Init) => handle_init().map(|_| ExitCode::SUCCESS),
        Some(Commands::Paths) => handle_paths().map(|_| ExitCode::SUCCESS),
        None => handle_archive(cli.days, cli.dry_run, cli.no_notify, cli.color),
    }
}

fn init_tracing(verbosity: u8, color: ColorChoice) {
    let level = match verbosity {
        0 => LevelFilter::INFO,
        1 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    };

    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_ansi(color != ColorChoice::Never)
        .init();
}

fn handle_archive(days: Option<u64>, dry_run: bool, no_notify: bool, color: ColorChoice) -> Result<ExitCode> {
    if color == ColorChoice::Never {
        console::set_colors_enabled(false);
    }

    let mut settings =
        Settings::new().context("Failed to load settings. Try running 'jira-archiver init'")?;
    if let Some(days) = days {
        settings.inactivity_days = days;
    }
    let client = JiraClient::from_settings(&settings).context("Failed to set up the Jira client")?;
    let notifier = if no_notify {
        None
    } else {
        SlackNotifier::from_settings(&settings).context("Failed to set up Slack notifications")?
    };

    let archiver = Archiver::new(settings, client);
    let report = archiver
        .run_archive_process(dry_run)
        .context("The archiving process failed")?;

    print_report(&report);

    if let Some(notifier) = notifier {
        if let Err(e) = notifier.send(&report.summary()) {
            warn!(error = %e, "Slack notification failed.");
        }
    }

    if report.has_failures() {
        Ok(ExitCode::FAILURE)
    } else {
        Ok(ExitCode::SUCCESS)
    }
}

fn print_report(report: &RunReport) {
    if report.dry_run {
        println!("{}", style("-- DRY RUN --").yellow().bold());
    }
    if report.outcomes.is_empty() {
        println!("No projects found.");
        return;
    }

    for outcome in &report.outcomes {
        println!("{}", styled_line(outcome));
    }

    println!();
    if report.dry_run {
        println!(
            "{} project(s) would be archived, {} skipped.",
            report.count(ArchiveAction::WouldArchive),
            report.count(ArchiveAction::Skipped)
        );
        println!("Run without --dry-run to perform these actions.");
    } else {
        println!(
            "{} project(s) archived, {} failed, {} skipped.",
            report.count(ArchiveAction::Archived),
            report.count(ArchiveAction::Failed),
            report.count(ArchiveAction::Skipped)
        );
    }

    let failures = report.failures();
    if !failures.is_empty() {
        eprintln!("{}", style("Errors:").red().bold());
        for failure in failures {
            eprintln!("- {}", failure);
        }
    }
}

fn styled_line(outcome: &ArchiveOutcome) -> String {
    let line = style(outcome.report_line());
    let line = match outcome.action {
        ArchiveAction::Archived => line.green(),
        ArchiveAction::WouldArchive => line.yellow(),
        ArchiveAction::Skipped => line.dim(),
        ArchiveAction::Failed => line.red().bold(),
    };
    line.to_string()
}

fn handle_init() -> Result<()> {
    println!("{}", style("Welcome to Jira Archiver setup!").bold());
    let config_path = Settings::config_path()?;
    if config_path.exists() {
        let overwrite = Confirm::new()
            .with_prompt("A configuration file already exists. Do you want to overwrite it?")
            .default(false)
            .interact()?;
        if !overwrite {
            println!("Initialization cancelled.");
            return Ok(());
        }
    }

    let existing = Settings::new().ok();
    let new_settings = interactive_config(existing.as_ref())?;
    save_settings(&new_settings)?;
    println!(
        "\n{}",
        style("Configuration saved successfully!").green().bold()
    );
    Ok(())
}

fn handle_paths() -> Result<()> {
    let settings = Settings::new().context("Failed to load settings.")?;
    let jira_url = settings
        .jira_base_url()
        .unwrap_or_else(|_| "(not configured)".to_string());

    println!("{}", style("Configuration paths:").bold());
    println!(
        "- Config file: {}",
        style(Settings::config_path()?.display()).yellow()
    );
    println!("- Jira URL:    {}", style(jira_url).yellow());
    Ok(())
}

fn interactive_config(existing: Option<&Settings>) -> Result<Settings> {
    let theme = dialoguer::theme::ColorfulTheme::default();

    let domain: String = Input::with_theme(&theme)
        .with_prompt("Jira Cloud tenant (the part before .atlassian.net)")
        .with_initial_text(existing.and_then(|s| s.domain.clone()).unwrap_or_default())
        .interact_text()?;

    let email: String = Input::with_theme(&theme)
        .with_prompt("Account email")
        .with_initial_text(existing.and_then(|s| s.email.clone()).unwrap_or_default())
        .interact_text()?;

    let api_token = Password::with_theme(&theme)
        .with_prompt("API token")
        .interact()?;

    let inactivity_days: u64 = Input::with_theme(&theme)
        .with_prompt("Archive projects after how many days of inactivity?")
        .default(existing.map_or(180, |s| s.inactivity_days))
        .interact_text()?;

    let defaults = existing.cloned().unwrap_or_default();
    Ok(Settings {
        domain: Some(domain),
        email: Some(email),
        api_token: Some(api_token),
        inactivity_days,
        ..defaults
    })
}

/// Helper to serialize and save settings to the config file.
fn save_settings(settings: &Settings) -> Result<()> {
    let path = Settings::config_path()?;
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).context("Could not create config directory")?;
    }
    let toml_string =
        toml::to_string_pretty(settings).context("Could not serialize settings to TOML")?;
    fs::write(&path, toml_string)
        .with_context(|| format!("Could not write config to '{}'", path.display()))?;
    Ok(())
}
